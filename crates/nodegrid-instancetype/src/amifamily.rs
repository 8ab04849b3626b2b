//! AMI family defaults.
//!
//! Which block device is the node's root volume, how big it is when the
//! provisioning config does not override it, and how much of it the OS
//! image itself takes.

use nodegrid_core::config::{AMI_FAMILY_AL2, AMI_FAMILY_BOTTLEROCKET, AMI_FAMILY_UBUNTU};
use nodegrid_core::Quantity;

/// Default root volume size when no block-device override applies.
pub const DEFAULT_VOLUME_SIZE_GIB: i64 = 20;

/// Filesystem overhead reserved on the root volume.
pub const EPHEMERAL_OVERHEAD_GIB: i64 = 5;

/// Storage-related constants for one AMI family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmiFamily {
    pub name: String,
    /// Device name of the volume backing ephemeral storage.
    pub ephemeral_block_device: String,
    pub default_volume_size: Quantity,
    pub ephemeral_overhead: Quantity,
}

/// Resolves an AMI family identifier to its defaults.
pub trait AmiFamilyResolver: Send + Sync {
    fn resolve(&self, family: &str) -> AmiFamily;
}

/// The AMI families nodegrid ships with.
///
/// Unknown identifiers resolve to AL2.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinAmiFamilies;

impl AmiFamilyResolver for BuiltinAmiFamilies {
    fn resolve(&self, family: &str) -> AmiFamily {
        let (name, device) = match family {
            AMI_FAMILY_BOTTLEROCKET => (AMI_FAMILY_BOTTLEROCKET, "/dev/xvdb"),
            AMI_FAMILY_UBUNTU => (AMI_FAMILY_UBUNTU, "/dev/sda1"),
            _ => (AMI_FAMILY_AL2, "/dev/xvda"),
        };
        AmiFamily {
            name: name.to_string(),
            ephemeral_block_device: device.to_string(),
            default_volume_size: Quantity::from_gibibytes(DEFAULT_VOLUME_SIZE_GIB),
            ephemeral_overhead: Quantity::from_gibibytes(EPHEMERAL_OVERHEAD_GIB),
        }
    }
}

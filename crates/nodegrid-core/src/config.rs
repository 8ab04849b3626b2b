//! Provisioning configuration parser.
//!
//! The provider-specific settings a provisioner carries: which AMI family
//! nodes boot, block-device overrides, pod density and the pod-ENI flag.
//! A single config is shared read-only by every instance type built in a
//! provisioning pass.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::quantity::Quantity;

pub const AMI_FAMILY_AL2: &str = "AL2";
pub const AMI_FAMILY_BOTTLEROCKET: &str = "Bottlerocket";
pub const AMI_FAMILY_UBUNTU: &str = "Ubuntu";

pub const SUPPORTED_AMI_FAMILIES: &[&str] = &[AMI_FAMILY_BOTTLEROCKET, AMI_FAMILY_AL2, AMI_FAMILY_UBUNTU];

/// Container runtimes each AMI family can run. Empty for unknown families.
pub fn supported_container_runtimes(ami_family: &str) -> &'static [&'static str] {
    match ami_family {
        AMI_FAMILY_BOTTLEROCKET => &["containerd"],
        AMI_FAMILY_AL2 | AMI_FAMILY_UBUNTU => &["dockerd", "containerd"],
        _ => &[],
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisioningConfig {
    /// AMI family nodes boot from ("AL2", "Bottlerocket", "Ubuntu").
    pub ami_family: String,
    /// Overrides for the block devices attached at launch.
    pub block_device_mappings: Option<Vec<BlockDeviceMapping>>,
    /// Explicit pod capacity; replaces the ENI-limited value when set.
    pub max_pods: Option<i32>,
    /// Account for branch network interfaces (security groups for pods).
    pub enable_pod_eni: bool,
    /// Container runtime to configure on the node.
    pub container_runtime: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDeviceMapping {
    pub device_name: String,
    pub ebs: Option<BlockDevice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDevice {
    pub volume_size: Option<Quantity>,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            ami_family: AMI_FAMILY_AL2.to_string(),
            block_device_mappings: None,
            max_pods: None,
            enable_pod_eni: false,
            container_runtime: None,
        }
    }
}

impl ProvisioningConfig {
    /// Read and validate a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a TOML config.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ProvisioningConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !SUPPORTED_AMI_FAMILIES.contains(&self.ami_family.as_str()) {
            return Err(ConfigError::UnsupportedAmiFamily(self.ami_family.clone()));
        }
        if let Some(runtime) = &self.container_runtime {
            if !supported_container_runtimes(&self.ami_family).contains(&runtime.as_str()) {
                return Err(ConfigError::UnsupportedContainerRuntime {
                    family: self.ami_family.clone(),
                    runtime: runtime.clone(),
                });
            }
        }
        if let Some(max_pods) = self.max_pods {
            if max_pods <= 0 {
                return Err(ConfigError::InvalidMaxPods(max_pods));
            }
        }
        for (index, mapping) in self.block_device_mappings.iter().flatten().enumerate() {
            if mapping.device_name.trim().is_empty() {
                return Err(ConfigError::EmptyDeviceName(index));
            }
        }
        Ok(())
    }

    /// Volume size configured for `device_name`, if the config overrides it.
    pub fn volume_size_for(&self, device_name: &str) -> Option<Quantity> {
        self.block_device_mappings
            .iter()
            .flatten()
            .find(|mapping| mapping.device_name == device_name)
            .and_then(|mapping| mapping.ebs.as_ref())
            .and_then(|ebs| ebs.volume_size)
    }
}

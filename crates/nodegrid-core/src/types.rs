//! Cloud-side input types: offerings and raw machine-type metadata.
//!
//! [`InstanceTypeInfo`] mirrors the shape of a describe-instance-types
//! response. Every field is optional on the wire; required fields are
//! checked when an instance type is built from it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownCapacityType;

// ── Offering ──────────────────────────────────────────────────────

/// How a machine is purchased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapacityType {
    OnDemand,
    Spot,
}

impl CapacityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapacityType::OnDemand => "on-demand",
            CapacityType::Spot => "spot",
        }
    }
}

impl fmt::Display for CapacityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CapacityType {
    type Err = UnknownCapacityType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on-demand" => Ok(CapacityType::OnDemand),
            "spot" => Ok(CapacityType::Spot),
            other => Err(UnknownCapacityType(other.to_string())),
        }
    }
}

/// A purchasable (zone, capacity type) combination for a machine type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offering {
    pub zone: String,
    pub capacity_type: CapacityType,
}

impl Offering {
    pub fn new(zone: impl Into<String>, capacity_type: CapacityType) -> Self {
        Self {
            zone: zone.into(),
            capacity_type,
        }
    }
}

// ── Instance type metadata ────────────────────────────────────────

/// Raw metadata for one purchasable machine type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceTypeInfo {
    pub instance_type: Option<String>,
    #[serde(rename = "VCpuInfo")]
    pub vcpu_info: Option<VCpuInfo>,
    pub memory_info: Option<MemoryInfo>,
    pub gpu_info: Option<GpuInfo>,
    pub inference_accelerator_info: Option<InferenceAcceleratorInfo>,
    pub network_info: Option<NetworkInfo>,
    pub processor_info: Option<ProcessorInfo>,
    pub instance_storage_info: Option<InstanceStorageInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VCpuInfo {
    #[serde(rename = "DefaultVCpus")]
    pub default_vcpus: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryInfo {
    #[serde(rename = "SizeInMiB")]
    pub size_in_mib: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GpuInfo {
    #[serde(default)]
    pub gpus: Vec<GpuDeviceInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GpuDeviceInfo {
    pub name: Option<String>,
    pub manufacturer: Option<String>,
    pub count: Option<i64>,
    pub memory_info: Option<MemoryInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InferenceAcceleratorInfo {
    #[serde(default)]
    pub accelerators: Vec<InferenceDeviceInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InferenceDeviceInfo {
    pub name: Option<String>,
    pub manufacturer: Option<String>,
    pub count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkInfo {
    pub maximum_network_interfaces: Option<i64>,
    pub ipv4_addresses_per_interface: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessorInfo {
    #[serde(default)]
    pub supported_architectures: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceStorageInfo {
    #[serde(rename = "TotalSizeInGB")]
    pub total_size_in_gb: Option<i64>,
}

impl InstanceTypeInfo {
    /// The machine-type name, or `""` when absent.
    pub fn name(&self) -> &str {
        self.instance_type.as_deref().unwrap_or_default()
    }
}

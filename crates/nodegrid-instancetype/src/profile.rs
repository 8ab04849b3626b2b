//! Validated view of raw machine-type metadata.
//!
//! [`MachineProfile::from_info`] is the construction boundary: required
//! fields are checked once here, optional sections collapse to zero, and
//! every derivation downstream works on plain integers.

use nodegrid_core::InstanceTypeInfo;

use crate::error::{InstanceTypeError, InstanceTypeResult};

/// Upper bound on any count or size read from metadata. Keeps the milli
/// and per-mille conversions downstream well inside `i64`.
pub const MAX_METADATA_VALUE: i64 = 1 << 32;

/// One GPU descriptor with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuDevice {
    pub name: String,
    pub manufacturer: String,
    pub count: i64,
    pub memory_mib: i64,
}

impl GpuDevice {
    /// Same GPU model, ignoring how many of them are attached.
    pub fn same_model(&self, other: &GpuDevice) -> bool {
        self.name == other.name
            && self.manufacturer == other.manufacturer
            && self.memory_mib == other.memory_mib
    }
}

/// One inference-accelerator descriptor with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accelerator {
    pub name: String,
    pub manufacturer: String,
    pub count: i64,
}

/// The shape of a machine type, validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineProfile {
    pub name: String,
    pub vcpus: i64,
    pub memory_mib: i64,
    pub max_network_interfaces: i64,
    pub ipv4_addresses_per_interface: i64,
    pub architectures: Vec<String>,
    pub gpus: Vec<GpuDevice>,
    pub accelerators: Vec<Accelerator>,
    pub local_storage_gb: i64,
}

impl MachineProfile {
    /// Validate `info` and extract a profile.
    ///
    /// Fails with [`InstanceTypeError::IncompleteMetadata`] when the name,
    /// vCPU count, memory size or network descriptor is missing, and with
    /// [`InstanceTypeError::InvalidMetadata`] when a count is negative or
    /// above [`MAX_METADATA_VALUE`].
    pub fn from_info(info: &InstanceTypeInfo) -> InstanceTypeResult<Self> {
        let name = match info.instance_type.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(incomplete("", "InstanceType")),
        };

        let vcpus = info
            .vcpu_info
            .as_ref()
            .and_then(|v| v.default_vcpus)
            .ok_or_else(|| incomplete(&name, "VCpuInfo.DefaultVCpus"))?;
        let memory_mib = info
            .memory_info
            .as_ref()
            .and_then(|m| m.size_in_mib)
            .ok_or_else(|| incomplete(&name, "MemoryInfo.SizeInMiB"))?;
        let network = info
            .network_info
            .as_ref()
            .ok_or_else(|| incomplete(&name, "NetworkInfo"))?;
        let max_network_interfaces = network
            .maximum_network_interfaces
            .ok_or_else(|| incomplete(&name, "NetworkInfo.MaximumNetworkInterfaces"))?;
        let ipv4_addresses_per_interface = network
            .ipv4_addresses_per_interface
            .ok_or_else(|| incomplete(&name, "NetworkInfo.Ipv4AddressesPerInterface"))?;

        in_range(&name, "VCpuInfo.DefaultVCpus", vcpus)?;
        in_range(&name, "MemoryInfo.SizeInMiB", memory_mib)?;
        in_range(&name, "NetworkInfo.MaximumNetworkInterfaces", max_network_interfaces)?;
        in_range(&name, "NetworkInfo.Ipv4AddressesPerInterface", ipv4_addresses_per_interface)?;
        // The pod formula subtracts the interface's primary address.
        if ipv4_addresses_per_interface < 1 {
            return Err(InstanceTypeError::InvalidMetadata {
                name,
                field: "NetworkInfo.Ipv4AddressesPerInterface",
                value: ipv4_addresses_per_interface,
            });
        }
        let eni_pods = max_network_interfaces
            .checked_mul(ipv4_addresses_per_interface - 1)
            .and_then(|pods| pods.checked_add(2))
            .filter(|pods| *pods <= MAX_METADATA_VALUE);
        if eni_pods.is_none() {
            return Err(InstanceTypeError::InvalidMetadata {
                name,
                field: "NetworkInfo.MaximumNetworkInterfaces",
                value: max_network_interfaces,
            });
        }

        let mut gpus = Vec::new();
        for gpu in info.gpu_info.iter().flat_map(|g| &g.gpus) {
            let count = gpu.count.unwrap_or(0);
            in_range(&name, "GpuInfo.Gpus.Count", count)?;
            gpus.push(GpuDevice {
                name: gpu.name.clone().unwrap_or_default(),
                manufacturer: gpu.manufacturer.clone().unwrap_or_default(),
                count,
                memory_mib: gpu
                    .memory_info
                    .as_ref()
                    .and_then(|m| m.size_in_mib)
                    .unwrap_or(0),
            });
        }

        let mut accelerators = Vec::new();
        for accelerator in info
            .inference_accelerator_info
            .iter()
            .flat_map(|a| &a.accelerators)
        {
            let count = accelerator.count.unwrap_or(0);
            in_range(&name, "InferenceAcceleratorInfo.Accelerators.Count", count)?;
            accelerators.push(Accelerator {
                name: accelerator.name.clone().unwrap_or_default(),
                manufacturer: accelerator.manufacturer.clone().unwrap_or_default(),
                count,
            });
        }

        let local_storage_gb = info
            .instance_storage_info
            .as_ref()
            .and_then(|s| s.total_size_in_gb)
            .unwrap_or(0);
        in_range(&name, "InstanceStorageInfo.TotalSizeInGB", local_storage_gb)?;

        let architectures = info
            .processor_info
            .as_ref()
            .map(|p| p.supported_architectures.clone())
            .unwrap_or_default();

        Ok(Self {
            name,
            vcpus,
            memory_mib,
            max_network_interfaces,
            ipv4_addresses_per_interface,
            architectures,
            gpus,
            accelerators,
            local_storage_gb,
        })
    }

    /// Pods the node can run given its network-interface and address limits.
    ///
    /// `max ENIs × (IPv4 addresses per ENI − 1) + 2`; the two extra pods
    /// use host networking and never consume an ENI address.
    pub fn eni_limited_pods(&self) -> i64 {
        self.max_network_interfaces * (self.ipv4_addresses_per_interface - 1) + 2
    }

    pub fn gpu_count(&self) -> i64 {
        self.gpus.iter().map(|g| g.count).sum()
    }

    pub fn gpu_count_by_manufacturer(&self, manufacturer: &str) -> i64 {
        self.gpus
            .iter()
            .filter(|g| g.manufacturer == manufacturer)
            .map(|g| g.count)
            .sum()
    }

    pub fn accelerator_count(&self) -> i64 {
        self.accelerators.iter().map(|a| a.count).sum()
    }
}

fn incomplete(name: &str, field: &'static str) -> InstanceTypeError {
    InstanceTypeError::IncompleteMetadata {
        name: name.to_string(),
        field,
    }
}

fn in_range(name: &str, field: &'static str, value: i64) -> InstanceTypeResult<()> {
    if !(0..=MAX_METADATA_VALUE).contains(&value) {
        return Err(InstanceTypeError::InvalidMetadata {
            name: name.to_string(),
            field,
            value,
        });
    }
    Ok(())
}

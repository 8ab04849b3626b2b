//! Allocatable resource computation.

use nodegrid_core::resources::{
    RESOURCE_AMD_GPU, RESOURCE_AWS_NEURON, RESOURCE_AWS_POD_ENI, RESOURCE_CPU,
    RESOURCE_EPHEMERAL_STORAGE, RESOURCE_MEMORY, RESOURCE_NVIDIA_GPU, RESOURCE_PODS,
    RESOURCE_SMARTER_DEVICES_FUSE,
};
use nodegrid_core::{Format, ProvisioningConfig, Quantity, ResourceList};

use crate::amifamily::AmiFamily;
use crate::interface_limits::BranchInterfaceLimits;
use crate::profile::MachineProfile;

/// Share of physical memory left after the VM takes its cut, per mille.
/// Assumes the hypervisor consumes less than 7.25% of a machine's memory.
pub const VM_AVAILABLE_MEMORY_PER_MILLE: i64 = 925;

pub const NVIDIA_MANUFACTURER: &str = "NVIDIA";
pub const AMD_MANUFACTURER: &str = "AMD";

pub fn compute_resources(
    profile: &MachineProfile,
    config: &ProvisioningConfig,
    ami_family: &AmiFamily,
    interface_limits: &dyn BranchInterfaceLimits,
) -> ResourceList {
    [
        (RESOURCE_CPU, cpu(profile)),
        (RESOURCE_MEMORY, memory(profile)),
        (RESOURCE_EPHEMERAL_STORAGE, ephemeral_storage(config, ami_family)),
        (RESOURCE_PODS, pods(profile, config)),
        (
            RESOURCE_AWS_POD_ENI,
            pod_eni(&profile.name, config.enable_pod_eni, interface_limits),
        ),
        (RESOURCE_NVIDIA_GPU, count(profile.gpu_count_by_manufacturer(NVIDIA_MANUFACTURER))),
        (RESOURCE_AMD_GPU, count(profile.gpu_count_by_manufacturer(AMD_MANUFACTURER))),
        (RESOURCE_AWS_NEURON, count(profile.accelerator_count())),
        (RESOURCE_SMARTER_DEVICES_FUSE, count(1)),
    ]
    .into_iter()
    .collect()
}

pub fn cpu(profile: &MachineProfile) -> Quantity {
    count(profile.vcpus)
}

/// `floor(memory MiB × 0.925)` MiB.
pub fn memory(profile: &MachineProfile) -> Quantity {
    Quantity::from_mebibytes(profile.memory_mib * VM_AVAILABLE_MEMORY_PER_MILLE / 1000)
}

/// The config's volume size for the family's root device, else the
/// family default.
pub fn ephemeral_storage(config: &ProvisioningConfig, ami_family: &AmiFamily) -> Quantity {
    config
        .volume_size_for(&ami_family.ephemeral_block_device)
        .unwrap_or(ami_family.default_volume_size)
}

pub fn pods(profile: &MachineProfile, config: &ProvisioningConfig) -> Quantity {
    match config.max_pods {
        Some(max_pods) => count(i64::from(max_pods)),
        None => count(profile.eni_limited_pods()),
    }
}

/// Branch interfaces usable by pods. Zero unless the feature is enabled
/// and the table marks the type as trunking-compatible.
pub fn pod_eni(
    instance_type: &str,
    enabled: bool,
    interface_limits: &dyn BranchInterfaceLimits,
) -> Quantity {
    if !enabled {
        return count(0);
    }
    match interface_limits.limits(instance_type) {
        Some(limits) if limits.is_trunking_compatible => count(limits.branch_interface),
        _ => count(0),
    }
}

fn count(value: i64) -> Quantity {
    Quantity::new(value, Format::DecimalSi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amifamily::{AmiFamilyResolver, BuiltinAmiFamilies};
    use crate::interface_limits::{InterfaceLimits, StaticInterfaceLimits};
    use crate::profile::{Accelerator, GpuDevice};
    use nodegrid_core::config::{BlockDevice, BlockDeviceMapping};

    fn make_profile(name: &str, vcpus: i64, memory_mib: i64) -> MachineProfile {
        MachineProfile {
            name: name.to_string(),
            vcpus,
            memory_mib,
            max_network_interfaces: 3,
            ipv4_addresses_per_interface: 10,
            architectures: vec!["x86_64".to_string()],
            gpus: Vec::new(),
            accelerators: Vec::new(),
            local_storage_gb: 0,
        }
    }

    fn gpu(manufacturer: &str, count: i64) -> GpuDevice {
        GpuDevice {
            name: "gpu".to_string(),
            manufacturer: manufacturer.to_string(),
            count,
            memory_mib: 0,
        }
    }

    fn compute(profile: &MachineProfile, config: &ProvisioningConfig) -> ResourceList {
        let ami = BuiltinAmiFamilies.resolve(&config.ami_family);
        compute_resources(profile, config, &ami, &StaticInterfaceLimits::new())
    }

    fn get(list: &ResourceList, name: &str) -> String {
        list.get(name).unwrap().to_string()
    }

    #[test]
    fn lists_every_resource() {
        let list = compute(&make_profile("m5.large", 2, 8192), &ProvisioningConfig::default());
        assert_eq!(list.len(), 9);
        assert_eq!(get(&list, RESOURCE_CPU), "2");
        assert_eq!(get(&list, RESOURCE_MEMORY), "7577Mi");
        assert_eq!(get(&list, RESOURCE_EPHEMERAL_STORAGE), "20Gi");
        assert_eq!(get(&list, RESOURCE_PODS), "29");
        assert_eq!(get(&list, RESOURCE_AWS_POD_ENI), "0");
        assert_eq!(get(&list, RESOURCE_NVIDIA_GPU), "0");
        assert_eq!(get(&list, RESOURCE_AMD_GPU), "0");
        assert_eq!(get(&list, RESOURCE_AWS_NEURON), "0");
        assert_eq!(get(&list, RESOURCE_SMARTER_DEVICES_FUSE), "1");
    }

    #[test]
    fn memory_is_floored() {
        // 1000 × 0.925 = 925 exactly; 999 × 0.925 = 924.075.
        assert_eq!(memory(&make_profile("a", 1, 1000)).to_string(), "925Mi");
        assert_eq!(memory(&make_profile("a", 1, 999)).to_string(), "924Mi");
    }

    #[test]
    fn max_pods_override_wins() {
        let config = ProvisioningConfig {
            max_pods: Some(110),
            ..Default::default()
        };
        let profile = make_profile("m5.large", 2, 8192);
        assert_eq!(pods(&profile, &config).to_string(), "110");
        assert_eq!(pods(&profile, &ProvisioningConfig::default()).to_string(), "29");
    }

    #[test]
    fn block_device_override_for_root_device() {
        let config = ProvisioningConfig {
            block_device_mappings: Some(vec![
                BlockDeviceMapping {
                    device_name: "/dev/xvdb".to_string(),
                    ebs: Some(BlockDevice {
                        volume_size: Some(Quantity::from_gibibytes(500)),
                    }),
                },
                BlockDeviceMapping {
                    device_name: "/dev/xvda".to_string(),
                    ebs: Some(BlockDevice {
                        volume_size: Some(Quantity::from_gibibytes(100)),
                    }),
                },
            ]),
            ..Default::default()
        };
        let al2 = BuiltinAmiFamilies.resolve("AL2");
        assert_eq!(ephemeral_storage(&config, &al2).to_string(), "100Gi");

        let bottlerocket = BuiltinAmiFamilies.resolve("Bottlerocket");
        assert_eq!(ephemeral_storage(&config, &bottlerocket).to_string(), "500Gi");

        let ubuntu = BuiltinAmiFamilies.resolve("Ubuntu");
        assert_eq!(ephemeral_storage(&config, &ubuntu).to_string(), "20Gi");
    }

    #[test]
    fn gpus_counted_per_manufacturer() {
        let mut profile = make_profile("mixed.xlarge", 8, 32768);
        profile.gpus = vec![gpu("NVIDIA", 4), gpu("AMD", 2), gpu("NVIDIA", 1), gpu("Xilinx", 3)];
        profile.accelerators = vec![
            Accelerator {
                name: "Inferentia".to_string(),
                manufacturer: "AWS".to_string(),
                count: 4,
            },
            Accelerator {
                name: "Other".to_string(),
                manufacturer: "Acme".to_string(),
                count: 1,
            },
        ];

        let list = compute(&profile, &ProvisioningConfig::default());
        assert_eq!(get(&list, RESOURCE_NVIDIA_GPU), "5");
        assert_eq!(get(&list, RESOURCE_AMD_GPU), "2");
        assert_eq!(get(&list, RESOURCE_AWS_NEURON), "5");
    }

    #[test]
    fn pod_eni_requires_flag_table_entry_and_trunking() {
        let table = StaticInterfaceLimits::new()
            .with(
                "m5.large",
                InterfaceLimits {
                    branch_interface: 9,
                    is_trunking_compatible: true,
                },
            )
            .with(
                "t3.large",
                InterfaceLimits {
                    branch_interface: 9,
                    is_trunking_compatible: false,
                },
            );

        assert_eq!(pod_eni("m5.large", true, &table).to_string(), "9");
        assert_eq!(pod_eni("m5.large", false, &table).to_string(), "0");
        assert_eq!(pod_eni("t3.large", true, &table).to_string(), "0");
        assert_eq!(pod_eni("c5.large", true, &table).to_string(), "0");
    }
}

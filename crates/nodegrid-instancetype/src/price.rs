//! Relative price heuristic.
//!
//! A dimensionless score used to rank machine types that satisfy the same
//! constraints. It is not a monetary cost.

use crate::profile::MachineProfile;

pub const CPU_COST_WEIGHT: f64 = 1.0;
pub const MEMORY_MIB_COST_WEIGHT: f64 = 1.0 / 1024.0;
pub const GPU_COST_WEIGHT: f64 = 5.0;
pub const INFERENCE_COST_WEIGHT: f64 = 5.0;
pub const LOCAL_STORAGE_GIB_COST_WEIGHT: f64 = 1.0 / 100.0;

pub fn price(profile: &MachineProfile) -> f64 {
    CPU_COST_WEIGHT * profile.vcpus as f64
        + MEMORY_MIB_COST_WEIGHT * profile.memory_mib as f64
        + GPU_COST_WEIGHT * profile.gpu_count() as f64
        + INFERENCE_COST_WEIGHT * profile.accelerator_count() as f64
        + LOCAL_STORAGE_GIB_COST_WEIGHT * profile.local_storage_gb as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Accelerator, GpuDevice};

    fn make_profile(vcpus: i64, memory_mib: i64) -> MachineProfile {
        MachineProfile {
            name: "test.large".to_string(),
            vcpus,
            memory_mib,
            max_network_interfaces: 3,
            ipv4_addresses_per_interface: 10,
            architectures: Vec::new(),
            gpus: Vec::new(),
            accelerators: Vec::new(),
            local_storage_gb: 0,
        }
    }

    #[test]
    fn weighs_cpu_and_memory() {
        // 2 + 8192 / 1024.
        assert_eq!(price(&make_profile(2, 8192)), 10.0);
    }

    #[test]
    fn weighs_accelerators_and_storage() {
        let mut profile = make_profile(4, 16384);
        profile.gpus = vec![GpuDevice {
            name: "T4".to_string(),
            manufacturer: "NVIDIA".to_string(),
            count: 1,
            memory_mib: 16384,
        }];
        profile.accelerators = vec![Accelerator {
            name: "Inferentia".to_string(),
            manufacturer: "AWS".to_string(),
            count: 2,
        }];
        profile.local_storage_gb = 200;

        // 4 + 16 + 5 + 10 + 2.
        assert!((price(&profile) - 37.0).abs() < 1e-9);
    }

    #[test]
    fn monotonic_in_vcpus() {
        let mut previous = price(&make_profile(1, 4096));
        for vcpus in 2..=64 {
            let current = price(&make_profile(vcpus, 4096));
            assert!(current > previous, "{vcpus} vCPUs should cost more");
            previous = current;
        }
    }
}

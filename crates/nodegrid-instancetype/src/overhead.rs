//! Reserved-resource computation.
//!
//! Node allocatable is capacity minus kube-reserved, system-reserved and
//! the eviction threshold. The formulas follow Bottlerocket's defaults;
//! they are exact only for ENI-limited nodes.

use nodegrid_core::resources::{RESOURCE_CPU, RESOURCE_EPHEMERAL_STORAGE, RESOURCE_MEMORY};
use nodegrid_core::{Format, Quantity, ResourceList};

use crate::amifamily::AmiFamily;
use crate::profile::MachineProfile;

pub const SYSTEM_RESERVED_CPU_MILLIS: i64 = 100;
pub const SYSTEM_RESERVED_MEMORY_MIB: i64 = 100;
pub const EVICTION_THRESHOLD_MEMORY_MIB: i64 = 100;

/// A slice of the machine's milli-CPU reserved at `basis_points` / 10000.
struct CpuBand {
    start: i64,
    end: i64,
    basis_points: i64,
}

const CPU_BANDS: [CpuBand; 4] = [
    CpuBand { start: 0, end: 1000, basis_points: 600 },
    CpuBand { start: 1000, end: 2000, basis_points: 100 },
    CpuBand { start: 2000, end: 4000, basis_points: 50 },
    CpuBand { start: 4000, end: 1 << 31, basis_points: 25 },
];

pub fn compute_overhead(profile: &MachineProfile, ami_family: &AmiFamily) -> ResourceList {
    let cpu_millis = SYSTEM_RESERVED_CPU_MILLIS + kube_reserved_cpu_millis(profile.vcpus * 1000);
    let memory_mib = kube_reserved_memory_mib(profile.eni_limited_pods())
        + SYSTEM_RESERVED_MEMORY_MIB
        + EVICTION_THRESHOLD_MEMORY_MIB;

    [
        (RESOURCE_CPU, Quantity::from_milli(cpu_millis, Format::DecimalSi)),
        (RESOURCE_MEMORY, Quantity::from_mebibytes(memory_mib)),
        (RESOURCE_EPHEMERAL_STORAGE, ami_family.ephemeral_overhead),
    ]
    .into_iter()
    .collect()
}

/// Banded kube-reserved CPU: 6% of the first core, 1% of the second,
/// 0.5% of the next two and 0.25% of the rest.
pub fn kube_reserved_cpu_millis(total_millis: i64) -> i64 {
    CPU_BANDS
        .iter()
        .filter(|band| total_millis >= band.start)
        .map(|band| {
            let covered = total_millis.min(band.end) - band.start;
            covered * band.basis_points / 10_000
        })
        .sum()
}

/// Kube-reserved memory scales with the pods the node could ever hold.
pub fn kube_reserved_memory_mib(max_pods: i64) -> i64 {
    11 * max_pods + 255
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amifamily::{AmiFamilyResolver, BuiltinAmiFamilies};

    fn make_profile(vcpus: i64, max_enis: i64, ips_per_eni: i64) -> MachineProfile {
        MachineProfile {
            name: "test.large".to_string(),
            vcpus,
            memory_mib: 8192,
            max_network_interfaces: max_enis,
            ipv4_addresses_per_interface: ips_per_eni,
            architectures: Vec::new(),
            gpus: Vec::new(),
            accelerators: Vec::new(),
            local_storage_gb: 0,
        }
    }

    #[test]
    fn cpu_bands() {
        assert_eq!(kube_reserved_cpu_millis(0), 0);
        assert_eq!(kube_reserved_cpu_millis(500), 30);
        assert_eq!(kube_reserved_cpu_millis(1000), 60);
        assert_eq!(kube_reserved_cpu_millis(2000), 70);
        assert_eq!(kube_reserved_cpu_millis(4000), 80);
        // 96 vCPU: 60 + 10 + 10 + 92000 × 0.25%.
        assert_eq!(kube_reserved_cpu_millis(96_000), 310);
    }

    #[test]
    fn two_vcpu_overhead() {
        let ami = BuiltinAmiFamilies.resolve("AL2");
        let overhead = compute_overhead(&make_profile(2, 3, 10), &ami);
        assert_eq!(overhead.get(RESOURCE_CPU).unwrap().milli_value(), 170);
        assert_eq!(overhead.get(RESOURCE_CPU).unwrap().to_string(), "170m");
    }

    #[test]
    fn memory_overhead_from_eni_pods() {
        let ami = BuiltinAmiFamilies.resolve("AL2");
        // 3 × (10 − 1) + 2 = 29 pods → (11 × 29 + 255) + 100 + 100.
        let overhead = compute_overhead(&make_profile(2, 3, 10), &ami);
        assert_eq!(overhead.get(RESOURCE_MEMORY).unwrap().to_string(), "774Mi");
        assert_eq!(kube_reserved_memory_mib(29), 574);
    }

    #[test]
    fn always_three_entries() {
        let ami = BuiltinAmiFamilies.resolve("Bottlerocket");
        let overhead = compute_overhead(&make_profile(0, 0, 1), &ami);
        assert_eq!(overhead.len(), 3);
        assert_eq!(overhead.get(RESOURCE_CPU).unwrap().to_string(), "100m");
        assert_eq!(overhead.get(RESOURCE_EPHEMERAL_STORAGE).unwrap().to_string(), "5Gi");
    }
}

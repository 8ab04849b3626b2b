//! Requirement synthesis.
//!
//! Builds the label → admissible-values mapping a machine type satisfies:
//! upstream well-known labels, offering-derived zone and capacity type,
//! and the instance labels under the registry's domain.

use nodegrid_core::labels::{
    LABEL_ARCH_STABLE, LABEL_CAPACITY_TYPE, LABEL_INSTANCE_TYPE_STABLE, LABEL_OS_STABLE,
    LABEL_TOPOLOGY_ZONE, OPERATING_SYSTEM_LINUX,
};
use nodegrid_core::{LabelRegistry, Offering, Requirements};
use tracing::warn;

use crate::profile::{GpuDevice, MachineProfile};

pub fn compute_requirements(
    profile: &MachineProfile,
    architecture: &str,
    offerings: &[Offering],
    labels: &LabelRegistry,
) -> Requirements {
    let keys = labels.keys();
    let mut requirements = Requirements::new();

    // Well-known upstream.
    requirements.insert_single(LABEL_INSTANCE_TYPE_STABLE, profile.name.as_str());
    requirements.insert_single(LABEL_ARCH_STABLE, architecture);
    requirements.insert_single(LABEL_OS_STABLE, OPERATING_SYSTEM_LINUX);
    requirements.insert(LABEL_TOPOLOGY_ZONE, offerings.iter().map(|o| o.zone.as_str()));
    requirements.insert(
        LABEL_CAPACITY_TYPE,
        offerings.iter().map(|o| o.capacity_type.as_str()),
    );

    // Resources.
    requirements.insert_single(keys.cpu.as_str(), profile.vcpus.to_string());
    requirements.insert_single(keys.memory.as_str(), profile.memory_mib.to_string());

    if let Some((family, size)) = family_and_size(&profile.name) {
        let mut instance = Requirements::new();
        instance.insert_single(keys.family.as_str(), family);
        instance.insert_single(keys.size.as_str(), size);
        requirements.add(instance);
    }

    if let Some(gpu) = single_gpu_model(profile) {
        let mut gpu_labels = Requirements::new();
        gpu_labels.insert_single(keys.gpu_name.as_str(), lower_kebab_case(&gpu.name));
        gpu_labels.insert_single(
            keys.gpu_manufacturer.as_str(),
            lower_kebab_case(&gpu.manufacturer),
        );
        gpu_labels.insert_single(keys.gpu_count.as_str(), gpu.count.to_string());
        gpu_labels.insert_single(keys.gpu_memory.as_str(), gpu.memory_mib.to_string());
        requirements.add(gpu_labels);
    }

    requirements
}

/// Split `m5.large` into `("m5", "large")`. Anything that is not exactly
/// two dot-separated parts has no family/size.
pub fn family_and_size(name: &str) -> Option<(&str, &str)> {
    let mut parts = name.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(family), Some(size), None) => Some((family, size)),
        _ => None,
    }
}

/// The GPU model when every descriptor names the same one, with counts
/// summed. Machine types mixing GPU models get no GPU labels.
fn single_gpu_model(profile: &MachineProfile) -> Option<GpuDevice> {
    let first = profile.gpus.first()?;
    if profile.gpus.iter().any(|g| !g.same_model(first)) {
        warn!(
            instance_type = %profile.name,
            models = profile.gpus.len(),
            "multiple GPU models on one instance type; GPU labels omitted"
        );
        return None;
    }
    Some(GpuDevice {
        count: profile.gpu_count(),
        ..first.clone()
    })
}

pub fn lower_kebab_case(s: &str) -> String {
    s.replace(' ', "-").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodegrid_core::CapacityType;

    fn make_profile(name: &str) -> MachineProfile {
        MachineProfile {
            name: name.to_string(),
            vcpus: 2,
            memory_mib: 8192,
            max_network_interfaces: 3,
            ipv4_addresses_per_interface: 10,
            architectures: vec!["x86_64".to_string()],
            gpus: Vec::new(),
            accelerators: Vec::new(),
            local_storage_gb: 0,
        }
    }

    fn gpu(name: &str, manufacturer: &str, count: i64, memory_mib: i64) -> GpuDevice {
        GpuDevice {
            name: name.to_string(),
            manufacturer: manufacturer.to_string(),
            count,
            memory_mib,
        }
    }

    fn values(reqs: &Requirements, key: &str) -> Vec<String> {
        reqs.get(key).unwrap().iter().cloned().collect()
    }

    #[test]
    fn upstream_labels() {
        let offerings = vec![
            Offering::new("us-west-2a", CapacityType::Spot),
            Offering::new("us-west-2b", CapacityType::OnDemand),
            Offering::new("us-west-2a", CapacityType::OnDemand),
        ];
        let reqs = compute_requirements(
            &make_profile("m5.large"),
            "amd64",
            &offerings,
            &LabelRegistry::default(),
        );

        assert_eq!(reqs.single(LABEL_INSTANCE_TYPE_STABLE), Some("m5.large"));
        assert_eq!(reqs.single(LABEL_ARCH_STABLE), Some("amd64"));
        assert_eq!(reqs.single(LABEL_OS_STABLE), Some("linux"));
        assert_eq!(values(&reqs, LABEL_TOPOLOGY_ZONE), vec!["us-west-2a", "us-west-2b"]);
        assert_eq!(values(&reqs, LABEL_CAPACITY_TYPE), vec!["on-demand", "spot"]);
        assert_eq!(reqs.single("karpenter.k8s.aws/instance.cpu"), Some("2"));
        assert_eq!(reqs.single("karpenter.k8s.aws/instance.memory"), Some("8192"));
    }

    #[test]
    fn no_offerings_yields_empty_sets() {
        let reqs = compute_requirements(
            &make_profile("m5.large"),
            "amd64",
            &[],
            &LabelRegistry::default(),
        );
        assert!(reqs.get(LABEL_TOPOLOGY_ZONE).unwrap().is_empty());
        assert!(reqs.get(LABEL_CAPACITY_TYPE).unwrap().is_empty());
    }

    #[test]
    fn family_and_size_labels() {
        let labels = LabelRegistry::default();
        let reqs = compute_requirements(&make_profile("m5.large"), "amd64", &[], &labels);
        assert_eq!(reqs.single(&labels.keys().family), Some("m5"));
        assert_eq!(reqs.single(&labels.keys().size), Some("large"));

        let metal = compute_requirements(&make_profile("metal"), "amd64", &[], &labels);
        assert!(!metal.has(&labels.keys().family));
        assert!(!metal.has(&labels.keys().size));
    }

    #[test]
    fn split_requires_exactly_two_parts() {
        assert_eq!(family_and_size("m5.large"), Some(("m5", "large")));
        assert_eq!(family_and_size("metal"), None);
        assert_eq!(family_and_size("a.b.c"), None);
    }

    #[test]
    fn single_gpu_model_labels() {
        let labels = LabelRegistry::default();
        let mut profile = make_profile("p4d.24xlarge");
        profile.gpus = vec![gpu("A100", "NVIDIA", 8, 40960)];

        let reqs = compute_requirements(&profile, "amd64", &[], &labels);
        let keys = labels.keys();
        assert_eq!(reqs.single(&keys.gpu_name), Some("a100"));
        assert_eq!(reqs.single(&keys.gpu_manufacturer), Some("nvidia"));
        assert_eq!(reqs.single(&keys.gpu_count), Some("8"));
        assert_eq!(reqs.single(&keys.gpu_memory), Some("40960"));
    }

    #[test]
    fn multiple_gpu_models_omit_labels() {
        let labels = LabelRegistry::default();
        let mut profile = make_profile("g-mixed.xlarge");
        profile.gpus = vec![gpu("A100", "NVIDIA", 4, 40960), gpu("MI100", "AMD", 2, 32768)];

        let reqs = compute_requirements(&profile, "amd64", &[], &labels);
        let keys = labels.keys();
        for key in [&keys.gpu_name, &keys.gpu_manufacturer, &keys.gpu_count, &keys.gpu_memory] {
            assert!(!reqs.has(key), "{key} should be omitted");
        }
    }

    #[test]
    fn repeated_descriptor_of_one_model_is_labeled() {
        let labels = LabelRegistry::default();
        let mut profile = make_profile("g5.12xlarge");
        profile.gpus = vec![gpu("A10G", "NVIDIA", 2, 24576), gpu("A10G", "NVIDIA", 2, 24576)];

        let reqs = compute_requirements(&profile, "amd64", &[], &labels);
        assert_eq!(reqs.single(&labels.keys().gpu_count), Some("4"));
    }

    #[test]
    fn kebab_case_normalization() {
        assert_eq!(lower_kebab_case("Radeon Pro V520"), "radeon-pro-v520");
        assert_eq!(lower_kebab_case("NVIDIA"), "nvidia");
        assert_eq!(lower_kebab_case("Xilinx"), "xilinx");
    }
}

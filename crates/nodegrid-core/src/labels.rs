//! Label vocabulary.
//!
//! Upstream well-known label keys are plain constants. The instance labels
//! under the provider's own domain live in a [`LabelRegistry`], built once
//! and passed to whatever needs it. These strings are a contract with the
//! scheduler and with user workloads; renaming any of them is a breaking
//! change.

use std::collections::BTreeSet;

// ── Upstream well-known labels ────────────────────────────────────

pub const LABEL_INSTANCE_TYPE_STABLE: &str = "node.kubernetes.io/instance-type";
pub const LABEL_ARCH_STABLE: &str = "kubernetes.io/arch";
pub const LABEL_OS_STABLE: &str = "kubernetes.io/os";
pub const LABEL_TOPOLOGY_ZONE: &str = "topology.kubernetes.io/zone";
pub const LABEL_CAPACITY_TYPE: &str = "karpenter.sh/capacity-type";

pub const ARCHITECTURE_AMD64: &str = "amd64";
pub const ARCHITECTURE_ARM64: &str = "arm64";
pub const OPERATING_SYSTEM_LINUX: &str = "linux";

/// Domain used for instance labels unless overridden.
pub const DEFAULT_LABEL_DOMAIN: &str = "karpenter.k8s.aws";

/// Label domains reserved for the orchestrator itself.
pub const UPSTREAM_RESTRICTED_DOMAINS: &[&str] = &["kubernetes.io", "k8s.io", "karpenter.sh"];

/// Cloud architecture identifier → orchestrator architecture identifier.
pub const CLOUD_TO_KUBE_ARCHITECTURES: &[(&str, &str)] = &[
    ("x86_64", ARCHITECTURE_AMD64),
    (ARCHITECTURE_ARM64, ARCHITECTURE_ARM64),
];

/// Look up the canonical architecture for a cloud identifier.
pub fn kube_architecture(cloud: &str) -> Option<&'static str> {
    CLOUD_TO_KUBE_ARCHITECTURES
        .iter()
        .find(|(from, _)| *from == cloud)
        .map(|(_, to)| *to)
}

/// Whether `arch` is one of the canonical architecture identifiers.
pub fn is_supported_architecture(arch: &str) -> bool {
    CLOUD_TO_KUBE_ARCHITECTURES.iter().any(|(_, to)| *to == arch)
}

/// Instance label keys, namespaced under the registry's domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceLabelKeys {
    pub family: String,
    pub size: String,
    pub cpu: String,
    pub memory: String,
    pub gpu_name: String,
    pub gpu_manufacturer: String,
    pub gpu_count: String,
    pub gpu_memory: String,
}

impl InstanceLabelKeys {
    fn for_domain(domain: &str) -> Self {
        Self {
            family: format!("{domain}/instance.family"),
            size: format!("{domain}/instance.size"),
            cpu: format!("{domain}/instance.cpu"),
            memory: format!("{domain}/instance.memory"),
            gpu_name: format!("{domain}/instance.gpu.name"),
            gpu_manufacturer: format!("{domain}/instance.gpu.manufacturer"),
            gpu_count: format!("{domain}/instance.gpu.count"),
            gpu_memory: format!("{domain}/instance.gpu.memory"),
        }
    }

    fn all(&self) -> [&str; 8] {
        [
            self.family.as_str(),
            self.size.as_str(),
            self.cpu.as_str(),
            self.memory.as_str(),
            self.gpu_name.as_str(),
            self.gpu_manufacturer.as_str(),
            self.gpu_count.as_str(),
            self.gpu_memory.as_str(),
        ]
    }
}

/// Immutable registry of label keys and restricted label domains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRegistry {
    domain: String,
    keys: InstanceLabelKeys,
    restricted_domains: BTreeSet<String>,
    well_known: BTreeSet<String>,
}

impl LabelRegistry {
    /// Build a registry for the given provider label domain.
    ///
    /// The domain itself is restricted, and every instance label key is
    /// registered as well-known.
    pub fn new(domain: impl Into<String>) -> Self {
        let domain = domain.into();
        let keys = InstanceLabelKeys::for_domain(&domain);

        let mut restricted_domains: BTreeSet<String> =
            UPSTREAM_RESTRICTED_DOMAINS.iter().map(|d| d.to_string()).collect();
        restricted_domains.insert(domain.clone());

        let mut well_known: BTreeSet<String> = [
            LABEL_INSTANCE_TYPE_STABLE,
            LABEL_ARCH_STABLE,
            LABEL_OS_STABLE,
            LABEL_TOPOLOGY_ZONE,
            LABEL_CAPACITY_TYPE,
        ]
        .iter()
        .map(|k| k.to_string())
        .collect();
        well_known.extend(keys.all().iter().map(|k| k.to_string()));

        Self {
            domain,
            keys,
            restricted_domains,
            well_known,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn keys(&self) -> &InstanceLabelKeys {
        &self.keys
    }

    pub fn well_known_labels(&self) -> impl Iterator<Item = &str> {
        self.well_known.iter().map(String::as_str)
    }

    pub fn is_well_known(&self, key: &str) -> bool {
        self.well_known.contains(key)
    }

    /// Whether a user may not set `key` on a node template.
    ///
    /// A key is restricted when its prefix is a restricted domain or a
    /// subdomain of one, unless the key is well-known.
    pub fn is_restricted(&self, key: &str) -> bool {
        if self.is_well_known(key) {
            return false;
        }
        let Some((prefix, _)) = key.split_once('/') else {
            return false;
        };
        self.restricted_domains.iter().any(|domain| {
            prefix == domain.as_str()
                || prefix
                    .strip_suffix(domain.as_str())
                    .is_some_and(|rest| rest.ends_with('.'))
        })
    }
}

impl Default for LabelRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL_DOMAIN)
    }
}

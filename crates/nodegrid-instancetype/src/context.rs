//! Collaborators shared by every instance type built in a provisioning pass.

use std::fmt;
use std::sync::Arc;

use nodegrid_core::LabelRegistry;

use crate::amifamily::{AmiFamilyResolver, BuiltinAmiFamilies};
use crate::interface_limits::{BranchInterfaceLimits, StaticInterfaceLimits};

/// Label vocabulary, AMI-family lookup and branch-interface table.
///
/// Built once, never mutated, and cheap to clone across threads.
#[derive(Clone)]
pub struct DerivationContext {
    labels: Arc<LabelRegistry>,
    ami_families: Arc<dyn AmiFamilyResolver>,
    interface_limits: Arc<dyn BranchInterfaceLimits>,
}

impl DerivationContext {
    pub fn new(
        labels: LabelRegistry,
        ami_families: Arc<dyn AmiFamilyResolver>,
        interface_limits: Arc<dyn BranchInterfaceLimits>,
    ) -> Self {
        Self {
            labels: Arc::new(labels),
            ami_families,
            interface_limits,
        }
    }

    pub fn with_labels(mut self, labels: LabelRegistry) -> Self {
        self.labels = Arc::new(labels);
        self
    }

    pub fn with_ami_families(mut self, ami_families: Arc<dyn AmiFamilyResolver>) -> Self {
        self.ami_families = ami_families;
        self
    }

    pub fn with_interface_limits(mut self, interface_limits: Arc<dyn BranchInterfaceLimits>) -> Self {
        self.interface_limits = interface_limits;
        self
    }

    pub fn labels(&self) -> &LabelRegistry {
        &self.labels
    }

    pub fn ami_families(&self) -> &dyn AmiFamilyResolver {
        self.ami_families.as_ref()
    }

    pub fn interface_limits(&self) -> &dyn BranchInterfaceLimits {
        self.interface_limits.as_ref()
    }
}

impl Default for DerivationContext {
    fn default() -> Self {
        Self::new(
            LabelRegistry::default(),
            Arc::new(BuiltinAmiFamilies),
            Arc::new(StaticInterfaceLimits::default()),
        )
    }
}

impl fmt::Debug for DerivationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivationContext")
            .field("label_domain", &self.labels.domain())
            .finish_non_exhaustive()
    }
}

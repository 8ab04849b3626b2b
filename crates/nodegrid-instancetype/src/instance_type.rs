//! The instance-type model handed to the provisioning scheduler.

use std::sync::Arc;

use nodegrid_core::labels::LABEL_ARCH_STABLE;
use nodegrid_core::{InstanceTypeInfo, Offering, ProvisioningConfig, Requirements, ResourceList};
use tracing::debug;

use crate::architecture::normalize_architecture;
use crate::context::DerivationContext;
use crate::error::InstanceTypeResult;
use crate::overhead::compute_overhead;
use crate::price::price;
use crate::profile::MachineProfile;
use crate::requirements::compute_requirements;
use crate::resources::compute_resources;

/// A purchasable machine type with everything the scheduler needs to know
/// about it.
///
/// Built once per provisioning pass and never mutated, so it can be shared
/// across threads without locking. The provisioning config is shared with
/// every other instance type built from it.
#[derive(Debug, Clone)]
pub struct InstanceType {
    info: InstanceTypeInfo,
    profile: MachineProfile,
    offerings: Vec<Offering>,
    config: Arc<ProvisioningConfig>,
    requirements: Requirements,
    resources: ResourceList,
    overhead: ResourceList,
    price: f64,
}

impl InstanceType {
    /// Validate `info` and derive requirements, resources, overhead and
    /// price.
    pub fn new(
        info: InstanceTypeInfo,
        offerings: Vec<Offering>,
        config: Arc<ProvisioningConfig>,
        ctx: &DerivationContext,
    ) -> InstanceTypeResult<Self> {
        let profile = MachineProfile::from_info(&info)?;
        let ami_family = ctx.ami_families().resolve(&config.ami_family);

        let architecture = normalize_architecture(&profile.name, &profile.architectures);
        let requirements = compute_requirements(&profile, &architecture, &offerings, ctx.labels());
        let resources = compute_resources(&profile, &config, &ami_family, ctx.interface_limits());
        let overhead = compute_overhead(&profile, &ami_family);
        let price = price(&profile);

        debug!(
            instance_type = %profile.name,
            %architecture,
            ami_family = %ami_family.name,
            offerings = offerings.len(),
            price,
            "derived instance type"
        );

        Ok(Self {
            info,
            profile,
            offerings,
            config,
            requirements,
            resources,
            overhead,
            price,
        })
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    pub fn resources(&self) -> &ResourceList {
        &self.resources
    }

    /// Resources the node runtime reserves; subtract from [`Self::resources`]
    /// to get node allocatable.
    pub fn overhead(&self) -> &ResourceList {
        &self.overhead
    }

    pub fn offerings(&self) -> &[Offering] {
        &self.offerings
    }

    /// Relative ranking score. Not a monetary cost.
    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn info(&self) -> &InstanceTypeInfo {
        &self.info
    }

    pub fn profile(&self) -> &MachineProfile {
        &self.profile
    }

    pub fn config(&self) -> &Arc<ProvisioningConfig> {
        &self.config
    }

    /// The derived architecture value. May be a diagnostic string for
    /// unrecognized architectures; check it with
    /// [`nodegrid_core::labels::is_supported_architecture`].
    pub fn architecture(&self) -> Option<&str> {
        self.requirements.single(LABEL_ARCH_STABLE)
    }

    /// `resources − overhead`.
    pub fn allocatable(&self) -> ResourceList {
        self.resources.subtract(&self.overhead)
    }
}

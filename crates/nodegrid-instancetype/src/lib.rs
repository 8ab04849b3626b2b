//! nodegrid instance-type model — what a node of a given machine type offers.
//!
//! Derives, from raw cloud metadata and a provisioning config, the data the
//! provisioning scheduler consumes for each candidate machine type. It does
//! NOT pick machine types or bin-pack workloads; it only describes them.
//!
//! # Components
//!
//! - **`profile`** — Validated view of raw metadata (construction boundary)
//! - **`architecture`** — Cloud → canonical architecture normalization
//! - **`requirements`** — Label requirements a machine type satisfies
//! - **`resources`** — Allocatable capacity, including extended resources
//! - **`overhead`** — Kube-reserved, system-reserved and eviction threshold
//! - **`price`** — Dimensionless ranking score
//! - **`amifamily`** / **`interface_limits`** — Lookup seams for AMI defaults
//!   and branch-interface capabilities
//! - **`instance_type`** — The immutable [`InstanceType`] composition root
//! - **`catalog`** — Build a whole catalog for one provisioning pass
//!
//! # Example
//!
//! ```text
//! m5.large (2 vCPU, 8192 MiB, 3 ENIs × 10 IPv4)
//!   resources: cpu=2 memory=7577Mi pods=29 ephemeral-storage=20Gi ...
//!   overhead:  cpu=170m memory=774Mi ephemeral-storage=5Gi
//!   price:     10.0
//! ```

pub mod amifamily;
pub mod architecture;
pub mod catalog;
pub mod context;
pub mod error;
pub mod instance_type;
pub mod interface_limits;
pub mod overhead;
pub mod price;
pub mod profile;
pub mod requirements;
pub mod resources;

pub use amifamily::{AmiFamily, AmiFamilyResolver, BuiltinAmiFamilies};
pub use architecture::normalize_architecture;
pub use catalog::{CatalogReport, RejectedInstanceType, build_instance_types, cheapest_first, load_catalog, load_offerings};
pub use context::DerivationContext;
pub use error::{InstanceTypeError, InstanceTypeResult};
pub use instance_type::InstanceType;
pub use interface_limits::{BranchInterfaceLimits, InterfaceLimits, StaticInterfaceLimits};
pub use profile::MachineProfile;

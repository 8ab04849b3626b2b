//! Catalog-wide construction.
//!
//! Turns a describe-instance-types catalog plus per-type offerings into
//! instance types for one provisioning pass. Records with unusable metadata
//! are skipped and reported instead of failing the whole pass.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use nodegrid_core::labels::is_supported_architecture;
use nodegrid_core::{InstanceTypeInfo, Offering, ProvisioningConfig};
use serde::Deserialize;
use tracing::{info, warn};

use crate::context::DerivationContext;
use crate::error::{InstanceTypeError, InstanceTypeResult};
use crate::instance_type::InstanceType;

/// Outcome of building a catalog.
#[derive(Debug, Default)]
pub struct CatalogReport {
    pub instance_types: Vec<InstanceType>,
    pub rejected: Vec<RejectedInstanceType>,
    /// Built types whose architecture is not canonical. They stay in the
    /// catalog but match no architecture requirement.
    pub unsupported_architecture: usize,
}

/// A catalog record that could not be turned into an instance type.
#[derive(Debug)]
pub struct RejectedInstanceType {
    pub name: String,
    pub error: InstanceTypeError,
}

/// Build an instance type for every record in `infos`.
///
/// `offerings` is keyed by machine-type name; types with no entry get no
/// offerings. Fails only if `config` itself is invalid.
pub fn build_instance_types(
    infos: Vec<InstanceTypeInfo>,
    offerings: &HashMap<String, Vec<Offering>>,
    config: Arc<ProvisioningConfig>,
    ctx: &DerivationContext,
) -> InstanceTypeResult<CatalogReport> {
    config.validate()?;

    let mut report = CatalogReport::default();
    for record in infos {
        let name = record.name().to_string();
        let type_offerings = offerings.get(&name).cloned().unwrap_or_default();

        match InstanceType::new(record, type_offerings, Arc::clone(&config), ctx) {
            Ok(instance_type) => {
                if !instance_type
                    .architecture()
                    .is_some_and(is_supported_architecture)
                {
                    report.unsupported_architecture += 1;
                }
                report.instance_types.push(instance_type);
            }
            Err(error) => {
                warn!(instance_type = %name, %error, "skipping instance type");
                report.rejected.push(RejectedInstanceType { name, error });
            }
        }
    }

    info!(
        built = report.instance_types.len(),
        rejected = report.rejected.len(),
        unsupported_architecture = report.unsupported_architecture,
        "built instance type catalog"
    );
    Ok(report)
}

/// Sort by price, cheapest first. Equal prices order by name so the
/// result is stable across runs.
pub fn cheapest_first(instance_types: &mut [InstanceType]) {
    instance_types.sort_by(|a, b| {
        a.price()
            .total_cmp(&b.price())
            .then_with(|| a.name().cmp(b.name()))
    });
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Describe {
        #[serde(rename = "InstanceTypes")]
        instance_types: Vec<InstanceTypeInfo>,
    },
    List(Vec<InstanceTypeInfo>),
}

/// Load a catalog from JSON: either a describe-instance-types response
/// (`{"InstanceTypes": [...]}`) or a bare array of records.
pub fn load_catalog(path: &Path) -> anyhow::Result<Vec<InstanceTypeInfo>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    let file: CatalogFile = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse catalog {}", path.display()))?;
    Ok(match file {
        CatalogFile::Describe { instance_types } => instance_types,
        CatalogFile::List(instance_types) => instance_types,
    })
}

/// Load offerings from JSON, keyed by machine-type name.
pub fn load_offerings(path: &Path) -> anyhow::Result<HashMap<String, Vec<Offering>>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read offerings {}", path.display()))?;
    let offerings = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse offerings {}", path.display()))?;
    Ok(offerings)
}

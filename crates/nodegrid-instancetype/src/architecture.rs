//! Architecture normalization.

use nodegrid_core::labels::kube_architecture;
use tracing::warn;

/// Map the cloud-reported architectures to the canonical identifier.
///
/// Returns the first identifier the table recognizes. When none is
/// recognized the raw list comes back as `[a b c]`; that string is never a
/// canonical architecture, so the instance type matches no architecture
/// requirement.
pub fn normalize_architecture(instance_type: &str, supported: &[String]) -> String {
    if let Some(arch) = supported.iter().find_map(|a| kube_architecture(a)) {
        return arch.to_string();
    }
    let diagnostic = format!("[{}]", supported.join(" "));
    warn!(
        instance_type,
        architectures = %diagnostic,
        "unrecognized architecture"
    );
    diagnostic
}

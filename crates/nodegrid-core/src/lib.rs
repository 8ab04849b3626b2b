pub mod config;
pub mod error;
pub mod labels;
pub mod quantity;
pub mod requirements;
pub mod resources;
pub mod types;

pub use config::ProvisioningConfig;
pub use error::{ConfigError, QuantityError, UnknownCapacityType};
pub use labels::LabelRegistry;
pub use quantity::{Format, Quantity};
pub use requirements::Requirements;
pub use resources::ResourceList;
pub use types::*;

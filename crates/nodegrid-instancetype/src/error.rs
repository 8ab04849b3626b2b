//! Instance-type construction errors.

use nodegrid_core::ConfigError;
use thiserror::Error;

/// Errors that can occur while building an instance type.
#[derive(Debug, Error)]
pub enum InstanceTypeError {
    #[error("incomplete machine-type metadata for {name:?}: missing {field}")]
    IncompleteMetadata { name: String, field: &'static str },

    #[error("invalid machine-type metadata for {name:?}: {field} = {value}")]
    InvalidMetadata {
        name: String,
        field: &'static str,
        value: i64,
    },

    #[error("invalid provisioning config: {0}")]
    Config(#[from] ConfigError),
}

pub type InstanceTypeResult<T> = Result<T, InstanceTypeError>;

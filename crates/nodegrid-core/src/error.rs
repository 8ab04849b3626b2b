//! Error types shared by nodegrid crates.

use thiserror::Error;

/// Errors produced while parsing a resource quantity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantityError {
    #[error("empty quantity")]
    Empty,

    #[error("invalid quantity: {0}")]
    Invalid(String),

    #[error("unknown quantity suffix {suffix:?} in {input:?}")]
    UnknownSuffix { input: String, suffix: String },

    #[error("quantity out of range: {0}")]
    OutOfRange(String),
}

/// A capacity type string that is neither `on-demand` nor `spot`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown capacity type: {0:?}")]
pub struct UnknownCapacityType(pub String);

/// Errors produced while loading or validating a provisioning config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unsupported AMI family: {0}")]
    UnsupportedAmiFamily(String),

    #[error("container runtime {runtime:?} is not supported by AMI family {family}")]
    UnsupportedContainerRuntime { family: String, runtime: String },

    #[error("max_pods must be positive, got {0}")]
    InvalidMaxPods(i32),

    #[error("block device mapping {0} has an empty device name")]
    EmptyDeviceName(usize),
}

//! Branch network interface capability table.
//!
//! Keyed by machine-type name. Only trunking-compatible types can attach
//! branch interfaces, which back pods that get their own security groups.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Branch-interface capability of one machine type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceLimits {
    pub branch_interface: i64,
    pub is_trunking_compatible: bool,
}

/// Keyed lookup of branch-interface capabilities.
pub trait BranchInterfaceLimits: Send + Sync {
    fn limits(&self, instance_type: &str) -> Option<InterfaceLimits>;
}

/// A map-backed capability table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticInterfaceLimits(HashMap<String, InterfaceLimits>);

impl StaticInterfaceLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, instance_type: impl Into<String>, limits: InterfaceLimits) -> Self {
        self.0.insert(instance_type.into(), limits);
        self
    }

    /// Parse a table of `[<instance type>]` sections.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn from_json_str(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl BranchInterfaceLimits for StaticInterfaceLimits {
    fn limits(&self, instance_type: &str) -> Option<InterfaceLimits> {
        self.0.get(instance_type).copied()
    }
}

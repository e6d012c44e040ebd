//! Configuration types for flattened-name decoding.
//!
//! All types implement [`serde::Deserialize`] for loading from external
//! sources such as a TOML file.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration root.
//! - [`RegistryConfig`] - Controls how the [`Registry`](crate::Registry) attaches leaves.
//! - [`AttachPolicy`] - What to do when a leaf fits several containers.
//!
//! # Example
//!
//! ```
//! # use flatname::config::{AppConfig, AttachPolicy};
//! let config = AppConfig::default();
//! assert_eq!(config.registry().attach_policy(), AttachPolicy::FirstMatch);
//! ```

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Registry configuration section.
    #[serde(default)]
    registry: RegistryConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified registry configuration.
    pub fn new(registry: RegistryConfig) -> Self {
        Self { registry }
    }

    /// Returns the registry configuration.
    pub fn registry(&self) -> &RegistryConfig {
        &self.registry
    }
}

/// Policy for leaves whose name fits more than one container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttachPolicy {
    /// Take the most specific container; further matches are ignored.
    #[default]
    FirstMatch,

    /// Fail if the most specific match is tied with another match.
    Strict,
}

/// Configuration for a [`Registry`](crate::Registry).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryConfig {
    /// Leaf attachment policy.
    #[serde(default)]
    attach_policy: AttachPolicy,
}

impl RegistryConfig {
    /// Creates a new [`RegistryConfig`] with the given attach policy.
    pub fn new(attach_policy: AttachPolicy) -> Self {
        Self { attach_policy }
    }

    /// Returns the leaf attachment policy.
    pub fn attach_policy(&self) -> AttachPolicy {
        self.attach_policy
    }
}

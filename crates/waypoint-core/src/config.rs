//! Engine configuration
//!
//! Configuration only tunes how the engine *reports* what it does; no option
//! changes the state a reconciliation computes.

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// What to do when a dynamic level has no context, no same-named old info,
/// and no pre-transition snapshot, so the old info is adopted as-is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleFallbackPolicy {
    /// Adopt the old info silently
    #[default]
    Tolerate,
    /// Adopt the old info and emit a `warn` event naming the level
    Warn,
}

/// Reconciliation engine configuration
///
/// # Example
///
/// ```
/// use waypoint_core::config::{EngineConfig, StaleFallbackPolicy};
///
/// let config = EngineConfig::from_toml_str(r#"stale_fallback = "warn""#).unwrap();
/// assert_eq!(config.stale_fallback, StaleFallbackPolicy::Warn);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub stale_fallback: StaleFallbackPolicy,
}

impl EngineConfig {
    /// Parse configuration from TOML; missing keys take their defaults
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the document is not valid TOML or has unknown keys
    /// or values.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }
}

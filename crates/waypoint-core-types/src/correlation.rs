//! Correlation types for transition tracking
//!
//! Every reconciliation call is tagged with a `TransitionId` so that the
//! start/end events it emits, and any error it returns, can be tied together
//! by the navigation controller that drives the engine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single transition attempt
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransitionId(String);

impl TransitionId {
    /// Generate a new TransitionId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for ids minted by the caller)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for TransitionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TransitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_id_generation() {
        let id1 = TransitionId::new();
        let id2 = TransitionId::new();

        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
    }

    #[test]
    fn test_transition_id_display() {
        let id = TransitionId::new();
        assert_eq!(format!("{}", id), id.as_str());
    }

    #[test]
    fn test_transition_id_from_string() {
        let id = TransitionId::from_string("t-1".to_string());
        assert_eq!(id.as_str(), "t-1");
    }

    #[test]
    fn test_serialization() {
        let id = TransitionId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: TransitionId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}

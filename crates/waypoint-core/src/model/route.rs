use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Serialized URL parameters of one chain level: segment name -> value
pub type Params = BTreeMap<String, String>;

/// Static definition of one level of a named route chain
///
/// Produced by the route registry and never mutated afterwards; chains share
/// descriptors through `Arc<RouteDescriptor>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteDescriptor {
    /// Name of the route handler at this level (e.g. "post")
    pub handler_name: String,

    /// Dynamic segment names in declaration order (e.g. ["post_id"])
    pub dynamic_segment_names: Vec<String>,
}

impl RouteDescriptor {
    /// Create a descriptor for a handler with the given dynamic segments
    pub fn new<I, S>(handler_name: impl Into<String>, dynamic_segment_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            handler_name: handler_name.into(),
            dynamic_segment_names: dynamic_segment_names.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a descriptor for a handler without dynamic segments
    pub fn leaf(handler_name: impl Into<String>) -> Self {
        Self {
            handler_name: handler_name.into(),
            dynamic_segment_names: Vec::new(),
        }
    }

    pub fn handler_name(&self) -> &str {
        &self.handler_name
    }

    pub fn dynamic_segment_names(&self) -> &[String] {
        &self.dynamic_segment_names
    }

    /// Whether this level has any dynamic segment to parameterize
    pub fn has_dynamic_segments(&self) -> bool {
        !self.dynamic_segment_names.is_empty()
    }
}

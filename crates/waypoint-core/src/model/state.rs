use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use super::handler_info::HandlerInfo;

/// Query-parameter mapping of a transition (keys unique)
pub type QueryParams = BTreeMap<String, Value>;

/// Full resolved-or-pending chain plus query params at one point in time
///
/// `handler_infos` is root-first; index `i` always corresponds to level `i`
/// of the route chain the state was reconciled against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionState {
    pub handler_infos: Vec<Arc<HandlerInfo>>,
    pub query_params: QueryParams,
}

impl TransitionState {
    /// Create an empty state (no active route)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state from root-first handler infos with no query params
    pub fn from_handler_infos<I>(handler_infos: I) -> Self
    where
        I: IntoIterator<Item = HandlerInfo>,
    {
        Self {
            handler_infos: handler_infos.into_iter().map(Arc::new).collect(),
            query_params: QueryParams::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.handler_infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handler_infos.is_empty()
    }

    /// Handler info at chain level `index`, if the state is that deep
    pub fn handler_info(&self, index: usize) -> Option<&Arc<HandlerInfo>> {
        self.handler_infos.get(index)
    }

    /// Handler names, root-first
    pub fn route_names(&self) -> Vec<&str> {
        self.handler_infos.iter().map(|info| info.name()).collect()
    }
}

/// Overwrite-merge `source` into `target`
pub fn merge_query_params(target: &mut QueryParams, source: &QueryParams) {
    for (key, value) in source {
        target.insert(key.clone(), value.clone());
    }
}

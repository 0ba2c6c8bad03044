//! Transition intents
//!
//! A [`NamedTransitionIntent`] is a requested destination: the target route
//! name, the caller's context values, query params, and optionally a pivot
//! route for partial refreshes and a pre-transition snapshot to borrow
//! contexts from while an older transition is still resolving.

use std::sync::Arc;

use waypoint_core_types::TransitionId;

use super::context::{ContextArg, ModelRef};
use super::state::{QueryParams, TransitionState};
use crate::errors::{ExError, Result, WaypointError};

/// One positional argument of a `transition_to(name, ...args)` style call
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionArg {
    Context(ContextArg),
    QueryParams(QueryParams),
}

impl From<ContextArg> for TransitionArg {
    fn from(value: ContextArg) -> Self {
        TransitionArg::Context(value)
    }
}

impl From<&str> for TransitionArg {
    fn from(value: &str) -> Self {
        TransitionArg::Context(value.into())
    }
}

impl From<i64> for TransitionArg {
    fn from(value: i64) -> Self {
        TransitionArg::Context(value.into())
    }
}

impl From<ModelRef> for TransitionArg {
    fn from(value: ModelRef) -> Self {
        TransitionArg::Context(value.into())
    }
}

/// A requested destination for the reconciliation engine
#[derive(Debug, Clone, Default)]
pub struct NamedTransitionIntent {
    /// Correlation id for every event and error of this attempt
    pub transition_id: TransitionId,

    /// Route name to look up in the registry
    pub target_name: String,

    /// Handler name of an already-active level to refresh from
    pub pivot_route: Option<String>,

    /// Context values, consumed leaf-first (last element first)
    pub contexts: Vec<ContextArg>,

    pub query_params: QueryParams,

    /// Snapshot taken before an overlapping transition began; read-only
    pub pre_transition_state: Option<Arc<TransitionState>>,
}

impl NamedTransitionIntent {
    pub fn new(target_name: impl Into<String>) -> Self {
        Self {
            target_name: target_name.into(),
            ..Self::default()
        }
    }

    /// Build an intent from a positional argument list
    ///
    /// A trailing `QueryParams` argument becomes the intent's query params;
    /// everything before it is a context.
    ///
    /// # Errors
    ///
    /// `InvalidArguments` if a `QueryParams` argument appears anywhere but last.
    pub fn from_args<I>(target_name: impl Into<String>, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = TransitionArg>,
    {
        let mut args: Vec<TransitionArg> = args.into_iter().collect();
        let query_params = match args.pop() {
            Some(TransitionArg::QueryParams(qp)) => qp,
            Some(other) => {
                args.push(other);
                QueryParams::new()
            }
            None => QueryParams::new(),
        };

        let mut contexts = Vec::with_capacity(args.len());
        for (position, arg) in args.into_iter().enumerate() {
            match arg {
                TransitionArg::Context(context) => contexts.push(context),
                TransitionArg::QueryParams(_) => {
                    return Err(WaypointError::InvalidArguments {
                        reason: format!(
                            "query params must be the last argument, found at position {}",
                            position
                        ),
                    })
                }
            }
        }

        Ok(Self {
            contexts,
            query_params,
            ..Self::new(target_name)
        })
    }

    pub fn with_transition_id(mut self, transition_id: TransitionId) -> Self {
        self.transition_id = transition_id;
        self
    }

    pub fn with_pivot(mut self, pivot_route: impl Into<String>) -> Self {
        self.pivot_route = Some(pivot_route.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<ContextArg>) -> Self {
        self.contexts.push(context.into());
        self
    }

    pub fn with_contexts<I, C>(mut self, contexts: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ContextArg>,
    {
        self.contexts.extend(contexts.into_iter().map(Into::into));
        self
    }

    pub fn with_query_params(mut self, query_params: QueryParams) -> Self {
        self.query_params = query_params;
        self
    }

    pub fn with_pre_transition_state(mut self, state: Arc<TransitionState>) -> Self {
        self.pre_transition_state = Some(state);
        self
    }

    /// Structured report for an error raised while reconciling this intent
    pub fn error_report(&self, err: WaypointError) -> ExError {
        ExError::from(err)
            .with_op("reconcile")
            .with_transition_id(self.transition_id.clone())
    }
}

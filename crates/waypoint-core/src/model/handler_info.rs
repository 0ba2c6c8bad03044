//! Per-level resolution records
//!
//! A [`HandlerInfo`] describes how one level of a route chain stands in a
//! transition attempt: already resolved, waiting on its params, or waiting
//! on a caller-supplied object. Values are immutable once built and shared
//! through `Arc`; reconciliation either adopts an existing `Arc` or builds a
//! fresh one.

use std::sync::Arc;

use super::context::ModelRef;
use super::route::{Params, RouteDescriptor};
use crate::registry::{serialize_context, RouteRegistry};

/// Resolution state of one chain level
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerState {
    /// Concrete context plus its serialized params; terminal for the level
    Resolved {
        context: Option<ModelRef>,
        params: Params,
    },
    /// Params known, context not yet looked up
    UnresolvedByParam { params: Params },
    /// Caller-supplied object, params not yet derived
    UnresolvedByObject { context: Option<ModelRef> },
}

/// Resolution record for one level of a route chain
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerInfo {
    route: Arc<RouteDescriptor>,
    state: HandlerState,
}

impl HandlerInfo {
    pub fn resolved(route: Arc<RouteDescriptor>, context: Option<ModelRef>, params: Params) -> Self {
        Self {
            route,
            state: HandlerState::Resolved { context, params },
        }
    }

    pub fn by_param(route: Arc<RouteDescriptor>, params: Params) -> Self {
        Self {
            route,
            state: HandlerState::UnresolvedByParam { params },
        }
    }

    pub fn by_object(route: Arc<RouteDescriptor>, context: Option<ModelRef>) -> Self {
        Self {
            route,
            state: HandlerState::UnresolvedByObject { context },
        }
    }

    /// Route handler name
    pub fn name(&self) -> &str {
        self.route.handler_name()
    }

    pub fn route(&self) -> &Arc<RouteDescriptor> {
        &self.route
    }

    pub fn state(&self) -> &HandlerState {
        &self.state
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.state, HandlerState::Resolved { .. })
    }

    /// Context carried by this level, if any
    pub fn context(&self) -> Option<&ModelRef> {
        match &self.state {
            HandlerState::Resolved { context, .. } => context.as_ref(),
            HandlerState::UnresolvedByObject { context } => context.as_ref(),
            HandlerState::UnresolvedByParam { .. } => None,
        }
    }

    /// Params of this level
    ///
    /// By-object levels have not derived theirs yet and report none; they
    /// only gain params through [`Self::become_resolved`].
    pub fn params(&self) -> Params {
        match &self.state {
            HandlerState::Resolved { params, .. } | HandlerState::UnresolvedByParam { params } => {
                params.clone()
            }
            HandlerState::UnresolvedByObject { .. } => Params::new(),
        }
    }

    /// Params this level would carry if resolved to `model`
    fn serialize(&self, registry: &dyn RouteRegistry, model: Option<&ModelRef>) -> Params {
        match &self.state {
            HandlerState::UnresolvedByObject { context } => {
                serialize_context(registry, &self.route, model.or(context.as_ref()))
            }
            HandlerState::Resolved { params, .. } | HandlerState::UnresolvedByParam { params } => {
                params.clone()
            }
        }
    }

    /// Resolve synchronously with the given context, bypassing model hooks
    pub fn become_resolved(&self, registry: &dyn RouteRegistry, context: Option<ModelRef>) -> Self {
        let params = self.serialize(registry, context.as_ref());
        Self::resolved(Arc::clone(&self.route), context, params)
    }

    /// Whether this candidate differs materially from `incumbent`
    ///
    /// An absent incumbent is always superseded. Otherwise the route names
    /// are compared, then whatever this variant carries: context identity for
    /// by-object, params for by-param, both for resolved.
    pub fn should_supersede(&self, incumbent: Option<&HandlerInfo>) -> bool {
        let Some(incumbent) = incumbent else {
            return true;
        };
        if self.name() != incumbent.name() {
            return true;
        }
        match &self.state {
            HandlerState::UnresolvedByObject { context } => context.as_ref() != incumbent.context(),
            HandlerState::UnresolvedByParam { params } => *params != incumbent.params(),
            HandlerState::Resolved { context, params } => {
                context.as_ref() != incumbent.context() || *params != incumbent.params()
            }
        }
    }
}

//! Per-level handler info construction
//!
//! Two strategies: param-form construction soaks up primitive contexts (or
//! reuses old params), and context-preferring construction tries, in order,
//! a caller object, the same-named old info, the pre-transition snapshot,
//! and finally whatever old info sits at the level.

use std::sync::Arc;

use crate::config::StaleFallbackPolicy;
use crate::errors::{Result, WaypointError};
use crate::model::{ContextArg, HandlerInfo, Params, RouteDescriptor, TransitionState};

/// LIFO view over the intent's context list
///
/// Popping moves a cursor; the borrowed list itself is never modified.
#[derive(Debug)]
pub(crate) struct ContextStack<'a> {
    items: &'a [ContextArg],
    remaining: usize,
}

impl<'a> ContextStack<'a> {
    pub(crate) fn new(items: &'a [ContextArg]) -> Self {
        Self {
            items,
            remaining: items.len(),
        }
    }

    pub(crate) fn peek(&self) -> Option<&'a ContextArg> {
        self.remaining
            .checked_sub(1)
            .map(|top| &self.items[top])
    }

    pub(crate) fn pop(&mut self) -> Option<&'a ContextArg> {
        let top = self.peek()?;
        self.remaining -= 1;
        Some(top)
    }

    pub(crate) fn remaining(&self) -> usize {
        self.remaining
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.remaining == 0
    }
}

/// Inputs shared by every level of one walk
pub(crate) struct LevelInputs<'a> {
    pub pre_transition_state: Option<&'a TransitionState>,
    pub stale_fallback: StaleFallbackPolicy,
}

/// Build an `UnresolvedByParam` info from primitive contexts and old params
///
/// Segment names are visited last-to-first. A primitive on top of the stack
/// is popped and stringified; otherwise the old info at this level supplies
/// the value, but only when it belongs to the same route.
pub(crate) fn create_param_handler_info(
    route: &Arc<RouteDescriptor>,
    stack: &mut ContextStack<'_>,
    old: Option<&Arc<HandlerInfo>>,
) -> Result<Arc<HandlerInfo>> {
    let old_params = old
        .filter(|old| old.name() == route.handler_name())
        .map(|old| old.params())
        .unwrap_or_default();

    let mut params = Params::new();
    for name in route.dynamic_segment_names().iter().rev() {
        if let Some(ContextArg::Param(value)) = stack.peek() {
            params.insert(name.clone(), value.to_param_string());
            stack.pop();
            continue;
        }

        match old_params.get(name) {
            Some(value) => {
                params.insert(name.clone(), value.clone());
            }
            None => {
                return Err(WaypointError::InsufficientParameters {
                    route_name: route.handler_name().to_string(),
                })
            }
        }
    }

    Ok(Arc::new(HandlerInfo::by_param(Arc::clone(route), params)))
}

/// Build the handler info for a dynamic level outside the forced zone
///
/// When nothing at all is left to fall back on (no context, no snapshot and
/// no old info at this index) the level fails with `InsufficientParameters`
/// instead of leaving a hole in the chain.
pub(crate) fn handler_info_for_dynamic_segment(
    route: &Arc<RouteDescriptor>,
    stack: &mut ContextStack<'_>,
    old: Option<&Arc<HandlerInfo>>,
    index: usize,
    inputs: &LevelInputs<'_>,
) -> Result<Arc<HandlerInfo>> {
    match stack.peek() {
        Some(ContextArg::Param(_)) => {
            return create_param_handler_info(route, stack, old);
        }
        Some(ContextArg::Object(model)) => {
            stack.pop();
            return Ok(Arc::new(HandlerInfo::by_object(
                Arc::clone(route),
                Some(model.clone()),
            )));
        }
        None => {}
    }

    if let Some(old) = old.filter(|old| old.name() == route.handler_name()) {
        tracing::trace!(route = route.handler_name(), index = index, "reusing old handler info");
        return Ok(Arc::clone(old));
    }

    if let Some(pre) = inputs.pre_transition_state {
        let context = pre
            .handler_info(index)
            .and_then(|info| info.context().cloned());
        tracing::debug!(
            route = route.handler_name(),
            index = index,
            has_context = context.is_some(),
            "borrowing context from pre-transition state"
        );
        return Ok(Arc::new(HandlerInfo::by_object(Arc::clone(route), context)));
    }

    match old {
        Some(old) => {
            match inputs.stale_fallback {
                StaleFallbackPolicy::Warn => tracing::warn!(
                    route = route.handler_name(),
                    index = index,
                    adopted = old.name(),
                    "no context supplied for dynamic segment; keeping old handler info"
                ),
                StaleFallbackPolicy::Tolerate => tracing::debug!(
                    route = route.handler_name(),
                    index = index,
                    adopted = old.name(),
                    "no context supplied for dynamic segment; keeping old handler info"
                ),
            }
            Ok(Arc::clone(old))
        }
        None => Err(WaypointError::InsufficientParameters {
            route_name: route.handler_name().to_string(),
        }),
    }
}

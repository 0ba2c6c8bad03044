//! Chain reconciliation
//!
//! Computes the handler-info chain for a transition from the intent, the
//! previously active state, and the route chain of the destination. Levels
//! whose old info is still valid are adopted by `Arc`; everything at or
//! below the shallowest changed level is rebuilt and left unresolved so the
//! collaborators re-run their hooks.
//!
//! ## Logging Ownership
//!
//! `apply_to_state` and `reconcile_chain` own lifecycle logging
//! (`log_op_start!`/`log_op_end!`/`log_op_error!`). Per-level decisions are
//! emitted at `debug`/`trace` only.

mod construct;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::config::EngineConfig;
use crate::errors::{Result, WaypointError};
use crate::model::{
    merge_query_params, HandlerInfo, HandlerState, NamedTransitionIntent, RouteDescriptor,
    TransitionState,
};
use crate::registry::RouteRegistry;
use crate::{log_op_end, log_op_error, log_op_start};

use construct::{
    create_param_handler_info, handler_info_for_dynamic_segment, ContextStack, LevelInputs,
};

/// Kind of reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileMode {
    /// A real transition; changed descendants are re-invalidated
    Final,
    /// A speculative pass; every adopted level is force-resolved
    Intermediate,
    /// An equality test against the live state (is this destination active?)
    ActiveCheck,
}

impl ReconcileMode {
    /// Map the `(is_intermediate, checking_if_active)` flag pair to a mode
    ///
    /// An active check is always an intermediate pass, so `(true, true)` is
    /// the only active-check combination.
    ///
    /// # Errors
    ///
    /// `InvalidArguments` for `(false, true)`.
    pub fn from_flags(is_intermediate: bool, checking_if_active: bool) -> Result<Self> {
        match (is_intermediate, checking_if_active) {
            (true, true) => Ok(ReconcileMode::ActiveCheck),
            (true, false) => Ok(ReconcileMode::Intermediate),
            (false, false) => Ok(ReconcileMode::Final),
            (false, true) => Err(WaypointError::InvalidArguments {
                reason: "an active check must be an intermediate pass".to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileMode::Final => "final",
            ReconcileMode::Intermediate => "intermediate",
            ReconcileMode::ActiveCheck => "active_check",
        }
    }
}

impl fmt::Display for ReconcileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one reconciliation
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub state: TransitionState,

    /// Shallowest level that changed; equals the chain length when nothing did
    pub invalidate_index: usize,
}

/// Reconciliation engine bound to a route registry
///
/// Holds no state between calls; every call reads its inputs and returns a
/// fresh [`TransitionState`].
pub struct Reconciler<'r> {
    registry: &'r dyn RouteRegistry,
    config: EngineConfig,
}

impl<'r> Reconciler<'r> {
    pub fn new(registry: &'r dyn RouteRegistry) -> Self {
        Self::with_config(registry, EngineConfig::default())
    }

    pub fn with_config(registry: &'r dyn RouteRegistry, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Reconcile `intent` against `old_state` using the registry's chain
    ///
    /// The target route is the last descriptor of the chain for
    /// `intent.target_name`.
    ///
    /// # Errors
    ///
    /// - `UnknownRoute` / `EmptyRouteChain` from the registry
    /// - `InsufficientParameters` if a dynamic segment cannot be satisfied
    /// - `TooManyContextObjects` if contexts remain after the walk
    pub fn apply_to_state(
        &self,
        intent: &NamedTransitionIntent,
        old_state: &TransitionState,
        is_intermediate: bool,
    ) -> Result<TransitionState> {
        let mode = if is_intermediate {
            ReconcileMode::Intermediate
        } else {
            ReconcileMode::Final
        };
        log_op_start!(
            "reconcile",
            transition_id = intent.transition_id.as_str(),
            target = intent.target_name.as_str(),
            mode = mode.as_str()
        );
        let start = Instant::now();

        let result = self
            .registry
            .handlers_for(&intent.target_name)
            .and_then(|chain| {
                let target_route = match chain.last() {
                    Some(route) => route.handler_name().to_string(),
                    None => {
                        return Err(WaypointError::EmptyRouteChain {
                            route_name: intent.target_name.clone(),
                        })
                    }
                };
                self.reconcile_chain_impl(intent, old_state, &chain, &target_route, mode)
            })
            .map_err(|e| {
                log_op_error!(
                    "reconcile",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    transition_id = intent.transition_id.as_str()
                );
                e
            })?;

        log_op_end!(
            "reconcile",
            duration_ms = start.elapsed().as_millis() as u64,
            transition_id = intent.transition_id.as_str(),
            chain_len = result.state.len() as u64,
            invalidate_index = result.invalidate_index as u64
        );

        Ok(result.state)
    }

    /// Reconcile against an explicit chain
    ///
    /// Used for partial chains and for active checks, where the caller
    /// already holds the descriptors and the target route name.
    ///
    /// # Errors
    ///
    /// `InsufficientParameters` or `TooManyContextObjects`.
    pub fn apply_to_handlers(
        &self,
        intent: &NamedTransitionIntent,
        old_state: &TransitionState,
        chain: &[Arc<RouteDescriptor>],
        target_route: &str,
        mode: ReconcileMode,
    ) -> Result<TransitionState> {
        self.reconcile_chain(intent, old_state, chain, target_route, mode)
            .map(|reconciliation| reconciliation.state)
    }

    /// Like [`Self::apply_to_handlers`], also reporting the final boundary
    ///
    /// # Errors
    ///
    /// `InsufficientParameters` or `TooManyContextObjects`.
    pub fn reconcile_chain(
        &self,
        intent: &NamedTransitionIntent,
        old_state: &TransitionState,
        chain: &[Arc<RouteDescriptor>],
        target_route: &str,
        mode: ReconcileMode,
    ) -> Result<Reconciliation> {
        log_op_start!(
            "reconcile_chain",
            transition_id = intent.transition_id.as_str(),
            target = target_route,
            mode = mode.as_str(),
            chain_len = chain.len() as u64
        );
        let start = Instant::now();

        let result = self
            .reconcile_chain_impl(intent, old_state, chain, target_route, mode)
            .map_err(|e| {
                log_op_error!(
                    "reconcile_chain",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    transition_id = intent.transition_id.as_str()
                );
                e
            })?;

        log_op_end!(
            "reconcile_chain",
            duration_ms = start.elapsed().as_millis() as u64,
            transition_id = intent.transition_id.as_str(),
            invalidate_index = result.invalidate_index as u64
        );

        Ok(result)
    }

    fn reconcile_chain_impl(
        &self,
        intent: &NamedTransitionIntent,
        old_state: &TransitionState,
        chain: &[Arc<RouteDescriptor>],
        target_route: &str,
        mode: ReconcileMode,
    ) -> Result<Reconciliation> {
        let registry = self.registry;
        let inputs = LevelInputs {
            pre_transition_state: intent.pre_transition_state.as_deref(),
            stale_fallback: self.config.stale_fallback,
        };
        let mut stack = ContextStack::new(&intent.contexts);

        let mut invalidate_index = intent
            .pivot_route
            .as_deref()
            .and_then(|pivot| chain.iter().position(|route| route.handler_name() == pivot))
            .unwrap_or(chain.len());

        // Filled leaf-first, reversed once the walk is done.
        let mut handler_infos: Vec<Arc<HandlerInfo>> = Vec::with_capacity(chain.len());

        for (i, route) in chain.iter().enumerate().rev() {
            let old = old_state.handler_info(i);

            let mut candidate = if route.has_dynamic_segments() && i < invalidate_index {
                handler_info_for_dynamic_segment(route, &mut stack, old, i, &inputs)?
            } else {
                create_param_handler_info(route, &mut stack, old)?
            };

            if mode == ReconcileMode::ActiveCheck {
                candidate = Arc::new(self.settle_for_active_check(route, &candidate, old));
            }

            let adopted = match old {
                Some(old)
                    if i < invalidate_index
                        && !candidate.should_supersede(Some(old.as_ref())) =>
                {
                    Arc::clone(old)
                }
                _ => {
                    invalidate_index = invalidate_index.min(i);
                    candidate
                }
            };

            let adopted = if mode == ReconcileMode::Intermediate {
                Arc::new(adopted.become_resolved(registry, adopted.context().cloned()))
            } else {
                adopted
            };

            handler_infos.push(adopted);
        }

        if !stack.is_empty() {
            tracing::debug!(
                target_route,
                leftover = stack.remaining() as u64,
                "context objects left after walking the chain"
            );
            return Err(WaypointError::TooManyContextObjects {
                target_route: target_route.to_string(),
            });
        }

        handler_infos.reverse();

        if mode == ReconcileMode::Final {
            invalidate_children(&mut handler_infos, invalidate_index);
        }

        let mut state = TransitionState {
            handler_infos,
            ..TransitionState::default()
        };
        merge_query_params(&mut state.query_params, &intent.query_params);

        Ok(Reconciliation {
            state,
            invalidate_index,
        })
    }

    /// Resolve a candidate for an active check
    ///
    /// Matching contexts are taken as proof of matching params, so routes
    /// without a serializer can still be reported active. The old context is
    /// always carried over so only params decide supersession.
    fn settle_for_active_check(
        &self,
        route: &RouteDescriptor,
        candidate: &HandlerInfo,
        old: Option<&Arc<HandlerInfo>>,
    ) -> HandlerInfo {
        let resolved = candidate.become_resolved(self.registry, candidate.context().cloned());
        let old_context = old.and_then(|old| old.context().cloned());

        let params = match (old, &old_context) {
            (Some(old), Some(old_context))
                if route.has_dynamic_segments() && resolved.context() == Some(old_context) =>
            {
                old.params()
            }
            _ => resolved.params(),
        };

        HandlerInfo::resolved(Arc::clone(resolved.route()), old_context, params)
    }
}

/// Demote resolved infos at or below `from` back to param form
fn invalidate_children(handler_infos: &mut [Arc<HandlerInfo>], from: usize) {
    for slot in handler_infos.iter_mut().skip(from) {
        let replacement = match slot.state() {
            HandlerState::Resolved { params, .. } => {
                Some(HandlerInfo::by_param(Arc::clone(slot.route()), params.clone()))
            }
            _ => None,
        };
        if let Some(replacement) = replacement {
            *slot = Arc::new(replacement);
        }
    }
}

/// Reconcile with a default-configured engine
///
/// # Errors
///
/// See [`Reconciler::apply_to_state`].
pub fn reconcile(
    registry: &dyn RouteRegistry,
    intent: &NamedTransitionIntent,
    old_state: &TransitionState,
    is_intermediate: bool,
) -> Result<TransitionState> {
    Reconciler::new(registry).apply_to_state(intent, old_state, is_intermediate)
}

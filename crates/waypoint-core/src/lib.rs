//! Waypoint Core - route-transition reconciliation engine
//!
//! Given a destination (a named route plus context values and query params)
//! and the previously active route chain, computes the new chain: levels
//! that are still valid are reused as-is, the rest are marked for
//! re-resolution by the surrounding navigation controller.
//!
//! This crate provides:
//! - The handler-info data model and transition state/intent types
//! - The route registry contract and an in-memory route table
//! - The reconciliation engine (final, intermediate and active-check passes)
//! - The structured error and logging facilities
//!
//! # Example
//!
//! ```
//! use waypoint_core::{reconcile, NamedTransitionIntent, RouteTable, TransitionState};
//!
//! let routes = RouteTable::from_definitions(vec![(
//!     "post",
//!     vec![("application", vec![]), ("post", vec!["post_id"])],
//! )]);
//! let intent = NamedTransitionIntent::new("post").with_context("9");
//!
//! let state = reconcile(&routes, &intent, &TransitionState::new(), false).unwrap();
//! assert_eq!(state.route_names(), vec!["application", "post"]);
//! ```

pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod reconcile;
pub mod registry;

pub use waypoint_core_types;

// Re-export commonly used types
pub use config::{EngineConfig, StaleFallbackPolicy};
pub use errors::{ExError, ExErrorKind, Result, WaypointError};
pub use model::{
    ContextArg, HandlerInfo, HandlerState, ModelRef, NamedTransitionIntent, Params, ParamValue,
    QueryParams, RouteDescriptor, TransitionArg, TransitionState,
};
pub use reconcile::{reconcile, ReconcileMode, Reconciler, Reconciliation};
pub use registry::{RouteRegistry, RouteTable};

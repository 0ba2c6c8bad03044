pub mod context;
pub mod handler_info;
pub mod intent;
pub mod route;
pub mod state;

pub use context::{ContextArg, ModelRef, ParamValue};
pub use handler_info::{HandlerInfo, HandlerState};
pub use intent::{NamedTransitionIntent, TransitionArg};
pub use route::{Params, RouteDescriptor};
pub use state::{merge_query_params, QueryParams, TransitionState};

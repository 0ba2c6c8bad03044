use std::sync::Arc;

use waypoint_core::{HandlerInfo, ModelRef, Params, RouteTable, TransitionState};

/// Route table used across the scenario tests
///
/// - `index`:   application > index
/// - `post`:    application > post(post_id)
/// - `comment`: application > post(post_id) > comment(comment_id)
/// - `thread`:  application > thread(forum, topic)
#[allow(dead_code)]
pub fn blog_routes() -> RouteTable {
    RouteTable::from_definitions(vec![
        ("index", vec![("application", vec![]), ("index", vec![])]),
        (
            "post",
            vec![("application", vec![]), ("post", vec!["post_id"])],
        ),
        (
            "comment",
            vec![
                ("application", vec![]),
                ("post", vec!["post_id"]),
                ("comment", vec!["comment_id"]),
            ],
        ),
        (
            "thread",
            vec![("application", vec![]), ("thread", vec!["forum", "topic"])],
        ),
    ])
}

/// Build a params map from literal pairs
#[allow(dead_code)]
pub fn params(pairs: &[(&str, &str)]) -> Params {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Resolved info for a registered handler, without a context
#[allow(dead_code)]
pub fn resolved(table: &RouteTable, handler: &str, pairs: &[(&str, &str)]) -> HandlerInfo {
    let route = table.descriptor(handler).expect("handler is registered");
    HandlerInfo::resolved(route, None, params(pairs))
}

/// Resolved info for a registered handler carrying `model`
#[allow(dead_code)]
pub fn resolved_with(
    table: &RouteTable,
    handler: &str,
    model: &ModelRef,
    pairs: &[(&str, &str)],
) -> HandlerInfo {
    let route = table.descriptor(handler).expect("handler is registered");
    HandlerInfo::resolved(route, Some(model.clone()), params(pairs))
}

/// Active state `application > post(5)` with `post` backed by `model`
#[allow(dead_code)]
pub fn active_post_state(table: &RouteTable, model: &ModelRef) -> TransitionState {
    TransitionState::from_handler_infos([
        resolved(table, "application", &[]),
        resolved_with(table, "post", model, &[("post_id", "5")]),
    ])
}

/// True when both states hold the very same `Arc` at `index`
#[allow(dead_code)]
pub fn same_level(a: &TransitionState, b: &TransitionState, index: usize) -> bool {
    match (a.handler_info(index), b.handler_info(index)) {
        (Some(x), Some(y)) => Arc::ptr_eq(x, y),
        _ => false,
    }
}

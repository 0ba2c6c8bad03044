#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Property checks over randomly shaped chains
//!
//! Every generated case is well-formed: the old state is fully resolved on
//! the same chain, and contexts supply every segment of a leaf-side suffix
//! of the chain, so reconciliation succeeds and only the boundary and
//! reuse decisions vary. The conservation properties then add or drop a
//! single context and expect the matching error.

use std::sync::Arc;

use proptest::prelude::*;
use waypoint_core::{
    ContextArg, HandlerInfo, NamedTransitionIntent, Params, ReconcileMode, Reconciler,
    Reconciliation, RouteDescriptor, RouteRegistry, RouteTable, TransitionState, WaypointError,
};

#[derive(Debug, Clone)]
struct Case {
    old_values: Vec<Vec<u8>>,
    new_values: Vec<Vec<u8>>,
    supplied_from: usize,
    pivot: Option<usize>,
}

impl Case {
    fn depth(&self) -> usize {
        self.old_values.len()
    }

    fn segment_names(level: usize, count: usize) -> Vec<String> {
        (0..count).map(|j| format!("r{}_s{}", level, j)).collect()
    }

    fn params(level: usize, values: &[u8]) -> Params {
        Self::segment_names(level, values.len())
            .into_iter()
            .zip(values.iter().map(u8::to_string))
            .collect()
    }

    fn routes(&self) -> RouteTable {
        let chain: Vec<RouteDescriptor> = self
            .old_values
            .iter()
            .enumerate()
            .map(|(level, values)| {
                RouteDescriptor::new(format!("r{}", level), Self::segment_names(level, values.len()))
            })
            .collect();
        let mut table = RouteTable::new();
        table.add_route("target", chain);
        table
    }

    fn old_state(&self, chain: &[Arc<RouteDescriptor>]) -> TransitionState {
        TransitionState::from_handler_infos(chain.iter().enumerate().map(|(level, route)| {
            HandlerInfo::resolved(
                Arc::clone(route),
                None,
                Self::params(level, &self.old_values[level]),
            )
        }))
    }

    fn contexts(&self) -> Vec<ContextArg> {
        self.new_values[self.supplied_from..]
            .iter()
            .flatten()
            .map(|value| ContextArg::from(value.to_string()))
            .collect()
    }

    fn intent(
        &self,
        chain: &[Arc<RouteDescriptor>],
        contexts: Vec<ContextArg>,
    ) -> NamedTransitionIntent {
        let mut intent = NamedTransitionIntent::new("target").with_contexts(contexts);
        if let Some(pivot) = self.pivot {
            intent = intent.with_pivot(chain[pivot].handler_name());
        }
        intent
    }

    /// Handler name of the shallowest level with a dynamic segment
    fn first_dynamic_level(&self) -> Option<String> {
        self.new_values
            .iter()
            .position(|values| !values.is_empty())
            .map(|level| format!("r{}", level))
    }

    fn reconcile(
        &self,
        old: Option<&TransitionState>,
        contexts: Vec<ContextArg>,
        mode: ReconcileMode,
    ) -> Result<(TransitionState, Reconciliation), WaypointError> {
        let routes = self.routes();
        let chain = routes.handlers_for("target").unwrap();
        let old = match old {
            Some(old) => old.clone(),
            None => self.old_state(&chain),
        };
        let target = chain[chain.len() - 1].handler_name().to_string();
        Reconciler::new(&routes)
            .reconcile_chain(&self.intent(&chain, contexts), &old, &chain, &target, mode)
            .map(|outcome| (old, outcome))
    }

    fn run(&self, mode: ReconcileMode) -> (TransitionState, Reconciliation) {
        self.reconcile(None, self.contexts(), mode).unwrap()
    }
}

fn case_strategy() -> impl Strategy<Value = Case> {
    prop::collection::vec(0usize..=2, 1..=4)
        .prop_flat_map(|segments| {
            let depth = segments.len();
            let values = |segments: &[usize]| -> Vec<_> {
                segments
                    .iter()
                    .map(|&n| prop::collection::vec(1u8..=3, n))
                    .collect()
            };
            (
                values(&segments),
                values(&segments),
                0..=depth,
                prop::option::of(0..depth),
            )
        })
        .prop_map(|(old_values, new_values, supplied_from, pivot)| Case {
            old_values,
            new_values,
            supplied_from,
            pivot,
        })
}

proptest! {
    #[test]
    fn prop_output_matches_chain(case in case_strategy()) {
        let (old, outcome) = case.run(ReconcileMode::Final);

        prop_assert_eq!(outcome.state.len(), case.depth());
        prop_assert_eq!(outcome.state.route_names(), old.route_names());
    }

    #[test]
    fn prop_levels_above_boundary_are_reused(case in case_strategy()) {
        let (old, outcome) = case.run(ReconcileMode::Final);

        if let Some(pivot) = case.pivot {
            prop_assert!(outcome.invalidate_index <= pivot);
        }
        prop_assert!(outcome.invalidate_index <= case.depth());
        for i in 0..outcome.invalidate_index {
            prop_assert!(Arc::ptr_eq(&old.handler_infos[i], &outcome.state.handler_infos[i]));
        }
    }

    #[test]
    fn prop_nothing_resolved_below_boundary(case in case_strategy()) {
        let (_, outcome) = case.run(ReconcileMode::Final);

        for info in &outcome.state.handler_infos[outcome.invalidate_index..] {
            prop_assert!(!info.is_resolved());
        }
    }

    #[test]
    fn prop_intermediate_output_fully_resolved(case in case_strategy()) {
        let (_, outcome) = case.run(ReconcileMode::Intermediate);

        prop_assert!(outcome.state.handler_infos.iter().all(|info| info.is_resolved()));
    }

    #[test]
    fn prop_supplied_values_reach_params(case in case_strategy()) {
        let (_, outcome) = case.run(ReconcileMode::Final);

        for level in case.supplied_from..case.depth() {
            prop_assert_eq!(
                outcome.state.handler_infos[level].params(),
                Case::params(level, &case.new_values[level])
            );
        }
    }

    #[test]
    fn prop_unchanged_values_keep_everything(case in case_strategy()) {
        let mut unchanged = case.clone();
        unchanged.new_values = case.old_values.clone();
        unchanged.pivot = None;
        let (old, outcome) = unchanged.run(ReconcileMode::Final);

        prop_assert_eq!(outcome.invalidate_index, case.depth());
        for (before, after) in old.handler_infos.iter().zip(&outcome.state.handler_infos) {
            prop_assert!(Arc::ptr_eq(before, after));
        }
    }

    #[test]
    fn prop_one_extra_context_is_rejected(case in case_strategy()) {
        let mut full = case.clone();
        full.supplied_from = 0;
        let mut contexts = full.contexts();
        contexts.insert(0, ContextArg::from("extra"));

        let err = full.reconcile(None, contexts, ReconcileMode::Final).unwrap_err();

        prop_assert_eq!(
            err,
            WaypointError::TooManyContextObjects {
                target_route: format!("r{}", case.depth() - 1)
            }
        );
    }

    #[test]
    fn prop_one_missing_context_is_rejected(case in case_strategy()) {
        let mut full = case.clone();
        full.supplied_from = 0;
        let first_dynamic = full.first_dynamic_level();
        prop_assume!(first_dynamic.is_some());
        let mut contexts = full.contexts();
        contexts.remove(0);

        let err = full
            .reconcile(Some(&TransitionState::new()), contexts, ReconcileMode::Final)
            .unwrap_err();

        prop_assert_eq!(
            err,
            WaypointError::InsufficientParameters {
                route_name: first_dynamic.unwrap()
            }
        );
    }
}

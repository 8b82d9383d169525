//! Dependency-respecting ordering of admitted hooks.

use super::ScheduledHook;
use std::collections::HashMap;
use tracing::warn;

/// Stable topological sort of admitted hooks (Kahn's algorithm).
///
/// The incoming order (descending score) is preserved among independent
/// hooks: whenever several hooks are ready, the one earliest in the input
/// runs first. Dependencies naming hooks outside the candidate set are
/// treated as already satisfied. A dependency cycle is logged and the
/// affected hooks are appended in input order rather than dropped.
pub fn resolve_order(hooks: Vec<ScheduledHook>) -> Vec<ScheduledHook> {
    let index_of: HashMap<&str, usize> = hooks
        .iter()
        .enumerate()
        .map(|(i, h)| (h.hook_id.as_str(), i))
        .collect();

    let mut in_degree = vec![0usize; hooks.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); hooks.len()];
    for (i, hook) in hooks.iter().enumerate() {
        for dep in &hook.dependencies {
            if let Some(&dep_idx) = index_of.get(dep.as_str()) {
                in_degree[i] += 1;
                dependents[dep_idx].push(i);
            }
        }
    }

    let mut ordered_indices = Vec::with_capacity(hooks.len());
    let mut placed = vec![false; hooks.len()];

    loop {
        // Lowest input index among ready hooks keeps the sort stable
        let next = (0..hooks.len()).find(|&i| !placed[i] && in_degree[i] == 0);
        let Some(next) = next else { break };

        placed[next] = true;
        ordered_indices.push(next);
        for &dependent in &dependents[next] {
            in_degree[dependent] -= 1;
        }
    }

    if ordered_indices.len() < hooks.len() {
        warn!("dependency cycle among candidate hooks; appending cyclic hooks in score order");
        for i in 0..hooks.len() {
            if !placed[i] {
                ordered_indices.push(i);
            }
        }
    }

    let mut slots: Vec<Option<ScheduledHook>> = hooks.into_iter().map(Some).collect();
    ordered_indices
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::{HookAdmission, HookMetadata, HookPriority};

    fn hook(id: &str, score: f64, deps: &[&str]) -> ScheduledHook {
        ScheduledHook {
            hook_id: id.to_string(),
            metadata: HookMetadata::new(HookPriority::Normal),
            priority_score: score,
            estimated_cost: 100,
            estimated_time_ms: 50.0,
            decision: HookAdmission::Execute,
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            retry_count: 0,
            max_retries: 2,
        }
    }

    fn ids(hooks: &[ScheduledHook]) -> Vec<&str> {
        hooks.iter().map(|h| h.hook_id.as_str()).collect()
    }

    #[test]
    fn test_chain_orders_dependencies_first() {
        // Input in score order puts the dependent first
        let ordered = resolve_order(vec![
            hook("c", 90.0, &["b"]),
            hook("b", 80.0, &["a"]),
            hook("a", 70.0, &[]),
        ]);
        assert_eq!(ids(&ordered), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_independent_hooks_keep_score_order() {
        let ordered = resolve_order(vec![
            hook("high", 90.0, &[]),
            hook("mid", 50.0, &[]),
            hook("low", 10.0, &[]),
        ]);
        assert_eq!(ids(&ordered), vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_absent_dependency_is_satisfied() {
        // "a" depends on a hook that was filtered out earlier
        let ordered = resolve_order(vec![hook("a", 90.0, &["ghost"]), hook("b", 50.0, &[])]);
        assert_eq!(ids(&ordered), vec!["a", "b"]);
    }

    #[test]
    fn test_diamond_dependencies() {
        let ordered = resolve_order(vec![
            hook("sink", 95.0, &["left", "right"]),
            hook("left", 80.0, &["root"]),
            hook("right", 70.0, &["root"]),
            hook("root", 10.0, &[]),
        ]);
        assert_eq!(ids(&ordered), vec!["root", "left", "right", "sink"]);
    }

    #[test]
    fn test_cycle_falls_back_to_input_order() {
        let ordered = resolve_order(vec![
            hook("solo", 99.0, &[]),
            hook("a", 90.0, &["b"]),
            hook("b", 80.0, &["a"]),
        ]);
        // Nothing is dropped; the cycle keeps its input order
        assert_eq!(ids(&ordered), vec!["solo", "a", "b"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(resolve_order(Vec::new()).is_empty());
    }
}

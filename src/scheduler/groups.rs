//! Execution group formation and group-order optimization.
//!
//! The group builder walks the dependency-ordered hook list and batches
//! parallel-eligible hooks together; everything else runs in its own
//! sequential group. The order optimizer then reorders groups, within the
//! dependency partial order, so that short groups finish first.

use super::ScheduledHook;
use crate::phase::PhaseParameters;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How the hooks inside one execution group run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupExecutionMode {
    /// Member hooks may run concurrently
    Parallel,
    /// Member hooks run one after another
    Sequential,
}

/// An ordered batch of hooks scheduled to run together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionGroup {
    /// Position in the final plan, contiguous from 1
    pub group_id: usize,
    /// Parallel or sequential execution
    pub mode: GroupExecutionMode,
    /// Member hooks, in order
    pub hooks: Vec<ScheduledHook>,
    /// Expected group duration (max of members when parallel)
    pub estimated_time_ms: f64,
    /// Expected group token cost (sum of members)
    pub estimated_tokens: u32,
    /// Time a caller waits for the whole group to finish
    pub max_wait_time_ms: f64,
}

impl ExecutionGroup {
    fn parallel(hooks: Vec<ScheduledHook>) -> Self {
        let estimated_time_ms = hooks
            .iter()
            .map(|h| h.estimated_time_ms)
            .fold(0.0_f64, f64::max);
        let estimated_tokens = hooks.iter().map(|h| h.estimated_cost).sum();
        Self {
            group_id: 0,
            mode: GroupExecutionMode::Parallel,
            hooks,
            estimated_time_ms,
            estimated_tokens,
            max_wait_time_ms: estimated_time_ms,
        }
    }

    fn sequential(hook: ScheduledHook) -> Self {
        let estimated_time_ms = hook.estimated_time_ms;
        let estimated_tokens = hook.estimated_cost;
        Self {
            group_id: 0,
            mode: GroupExecutionMode::Sequential,
            hooks: vec![hook],
            estimated_time_ms,
            estimated_tokens,
            max_wait_time_ms: estimated_time_ms,
        }
    }

    /// Ids of the member hooks.
    pub fn hook_ids(&self) -> impl Iterator<Item = &str> {
        self.hooks.iter().map(|h| h.hook_id.as_str())
    }
}

/// Partition a dependency-ordered hook list into execution groups.
///
/// A hook joins the open parallel batch when it is parallel-safe, the
/// phase prefers parallel execution, and it has no dependency on a member
/// of that batch. A same-batch dependency closes the batch. At most
/// `max_parallel_groups` parallel groups are formed per plan; overflow
/// hooks run sequentially.
pub fn build_groups(
    ordered: Vec<ScheduledHook>,
    params: &PhaseParameters,
    max_parallel_groups: usize,
) -> Vec<ExecutionGroup> {
    let mut groups = Vec::new();
    let mut batch: Vec<ScheduledHook> = Vec::new();
    let mut parallel_groups_formed = 0usize;

    let flush = |groups: &mut Vec<ExecutionGroup>, batch: &mut Vec<ScheduledHook>| {
        if !batch.is_empty() {
            groups.push(ExecutionGroup::parallel(std::mem::take(batch)));
        }
    };

    for hook in ordered {
        let eligible = hook.metadata.parallel_safe && params.prefer_parallel;
        if !eligible {
            flush(&mut groups, &mut batch);
            groups.push(ExecutionGroup::sequential(hook));
            continue;
        }

        let depends_on_batch = hook
            .dependencies
            .iter()
            .any(|dep| batch.iter().any(|member| &member.hook_id == dep));
        if depends_on_batch {
            flush(&mut groups, &mut batch);
        }

        if !batch.is_empty() {
            batch.push(hook);
        } else if parallel_groups_formed < max_parallel_groups {
            parallel_groups_formed += 1;
            batch.push(hook);
        } else {
            groups.push(ExecutionGroup::sequential(hook));
        }
    }
    flush(&mut groups, &mut batch);

    groups
}

/// Reorder groups so smaller waits come first where dependencies allow,
/// then assign contiguous `group_id`s starting at 1.
pub fn optimize_order(groups: Vec<ExecutionGroup>) -> Vec<ExecutionGroup> {
    let member_ids: Vec<HashSet<&str>> = groups.iter().map(|g| g.hook_ids().collect()).collect();

    // Group-level dependency edges implied by member hook dependencies
    let mut in_degree = vec![0usize; groups.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); groups.len()];
    for (j, group) in groups.iter().enumerate() {
        for hook in &group.hooks {
            for dep in &hook.dependencies {
                for (i, ids) in member_ids.iter().enumerate() {
                    if i != j && ids.contains(dep.as_str()) {
                        in_degree[j] += 1;
                        dependents[i].push(j);
                    }
                }
            }
        }
    }

    let mut order = Vec::with_capacity(groups.len());
    let mut placed = vec![false; groups.len()];
    while order.len() < groups.len() {
        let next = (0..groups.len())
            .filter(|&i| !placed[i] && in_degree[i] == 0)
            .min_by(|&a, &b| {
                groups[a]
                    .max_wait_time_ms
                    .total_cmp(&groups[b].max_wait_time_ms)
                    .then(a.cmp(&b))
            });
        // Group-level cycles cannot arise from an already-ordered hook
        // list, but fall back to input order rather than loop forever.
        let next = match next {
            Some(i) => i,
            None => match (0..groups.len()).find(|&i| !placed[i]) {
                Some(i) => i,
                None => break,
            },
        };

        placed[next] = true;
        order.push(next);
        for &dependent in &dependents[next] {
            in_degree[dependent] = in_degree[dependent].saturating_sub(1);
        }
    }

    let mut slots: Vec<Option<ExecutionGroup>> = groups.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|i| slots[i].take())
        .enumerate()
        .map(|(pos, mut group)| {
            group.group_id = pos + 1;
            group
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::{HookAdmission, HookMetadata, HookPriority};
    use crate::phase::Phase;

    fn hook(id: &str, parallel_safe: bool, time: f64, deps: &[&str]) -> ScheduledHook {
        let mut metadata = HookMetadata::new(HookPriority::Normal).with_execution_time(time);
        metadata.parallel_safe = parallel_safe;
        ScheduledHook {
            hook_id: id.to_string(),
            metadata,
            priority_score: 50.0,
            estimated_cost: 100,
            estimated_time_ms: time,
            decision: HookAdmission::Execute,
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            retry_count: 0,
            max_retries: 2,
        }
    }

    fn parallel_params() -> PhaseParameters {
        PhaseParameters::for_phase(Phase::Green)
    }

    #[test]
    fn test_parallel_safe_hooks_merge_into_one_group() {
        let groups = build_groups(
            vec![hook("a", true, 100.0, &[]), hook("b", true, 250.0, &[])],
            &parallel_params(),
            3,
        );

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].mode, GroupExecutionMode::Parallel);
        assert_eq!(groups[0].hooks.len(), 2);
        // Group time is the max of member times, tokens the sum
        assert_eq!(groups[0].estimated_time_ms, 250.0);
        assert_eq!(groups[0].estimated_tokens, 200);
    }

    #[test]
    fn test_sequential_phase_never_parallelizes() {
        let params = PhaseParameters::for_phase(Phase::Sync);
        let groups = build_groups(
            vec![hook("a", true, 100.0, &[]), hook("b", true, 100.0, &[])],
            &params,
            3,
        );

        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.mode == GroupExecutionMode::Sequential));
    }

    #[test]
    fn test_unsafe_hook_breaks_the_batch() {
        let groups = build_groups(
            vec![
                hook("a", true, 100.0, &[]),
                hook("solo", false, 100.0, &[]),
                hook("b", true, 100.0, &[]),
            ],
            &parallel_params(),
            3,
        );

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].mode, GroupExecutionMode::Parallel);
        assert_eq!(groups[1].mode, GroupExecutionMode::Sequential);
        assert_eq!(groups[2].mode, GroupExecutionMode::Parallel);
    }

    #[test]
    fn test_same_batch_dependency_closes_batch() {
        let groups = build_groups(
            vec![hook("a", true, 100.0, &[]), hook("b", true, 100.0, &["a"])],
            &parallel_params(),
            3,
        );

        // "b" depends on "a" so they cannot share a batch
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].hooks[0].hook_id, "a");
        assert_eq!(groups[1].hooks[0].hook_id, "b");
    }

    #[test]
    fn test_max_parallel_groups_cap() {
        let ordered = vec![
            hook("a", true, 100.0, &[]),
            hook("b", true, 100.0, &["a"]),
            hook("c", true, 100.0, &["b"]),
        ];
        let groups = build_groups(ordered, &parallel_params(), 2);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].mode, GroupExecutionMode::Parallel);
        assert_eq!(groups[1].mode, GroupExecutionMode::Parallel);
        // Cap reached: the third batch is forced sequential
        assert_eq!(groups[2].mode, GroupExecutionMode::Sequential);
    }

    #[test]
    fn test_optimizer_runs_short_groups_first() {
        let groups = build_groups(
            vec![hook("slow", false, 900.0, &[]), hook("fast", false, 50.0, &[])],
            &parallel_params(),
            3,
        );
        let plan = optimize_order(groups);

        assert_eq!(plan[0].hooks[0].hook_id, "fast");
        assert_eq!(plan[1].hooks[0].hook_id, "slow");
    }

    #[test]
    fn test_optimizer_respects_dependencies() {
        let groups = build_groups(
            vec![
                hook("slow-root", false, 900.0, &[]),
                hook("fast-dependent", false, 50.0, &["slow-root"]),
            ],
            &parallel_params(),
            3,
        );
        let plan = optimize_order(groups);

        // The fast group cannot jump ahead of its dependency
        assert_eq!(plan[0].hooks[0].hook_id, "slow-root");
        assert_eq!(plan[1].hooks[0].hook_id, "fast-dependent");
    }

    #[test]
    fn test_group_ids_contiguous_from_one() {
        let groups = build_groups(
            vec![
                hook("a", false, 300.0, &[]),
                hook("b", false, 100.0, &[]),
                hook("c", false, 200.0, &[]),
            ],
            &parallel_params(),
            3,
        );
        let plan = optimize_order(groups);

        let ids: Vec<usize> = plan.iter().map(|g| g.group_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}

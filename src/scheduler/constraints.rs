//! Aggregate budget enforcement across all admitted hooks.

use super::ScheduledHook;
use super::context::SchedulingContext;
use crate::hooks::{HookAdmission, HookPriority};
use tracing::debug;

/// Defer admitted hooks that collectively blow the budget.
///
/// Walks hooks in descending score order, accumulating cost and time for
/// execute-decision hooks. A hook whose addition would exceed the token or
/// time budget is flipped to defer — never skip, since it was individually
/// admissible. Critical hooks bypass the check and do not accumulate.
pub fn enforce_aggregate_budget(hooks: &mut [ScheduledHook], ctx: &SchedulingContext) {
    let mut order: Vec<usize> = (0..hooks.len()).collect();
    order.sort_by(|&a, &b| {
        hooks[b]
            .priority_score
            .total_cmp(&hooks[a].priority_score)
            .then_with(|| hooks[a].hook_id.cmp(&hooks[b].hook_id))
    });

    let mut total_cost: u64 = 0;
    let mut total_time_ms: f64 = 0.0;

    for idx in order {
        let hook = &mut hooks[idx];
        if !hook.decision.is_execute() || hook.metadata.priority == HookPriority::Critical {
            continue;
        }

        let next_cost = total_cost + hook.estimated_cost as u64;
        let next_time = total_time_ms + hook.estimated_time_ms;
        if next_cost > ctx.available_token_budget as u64 || next_time > ctx.max_execution_time_ms {
            debug!(hook_id = %hook.hook_id, "aggregate budget exceeded, deferring");
            hook.decision = HookAdmission::Defer;
            continue;
        }

        total_cost = next_cost;
        total_time_ms = next_time;
    }
}

//! Per-hook admission decisions.
//!
//! Turns a hook's estimates into an initial execute/defer/skip decision.
//! The checks run in a fixed order; the aggregate budget across all
//! admitted hooks is enforced separately by the constraint filter.

use super::context::SchedulingContext;
use crate::config::SchedulerConfig;
use crate::hooks::{HookAdmission, HookMetadata, HookPriority};

/// Decide whether a hook runs this cycle.
///
/// Checks, in order:
/// 1. Critical hooks always execute.
/// 2. Cost over the token budget: skip.
/// 3. Time over the wall-clock budget: defer.
/// 4. Relevance below the floor: skip.
/// 5. Reliability below the floor: defer.
/// 6. System load over the defer threshold: defer.
/// 7. Otherwise: execute.
pub fn decide(
    metadata: &HookMetadata,
    ctx: &SchedulingContext,
    config: &SchedulerConfig,
    estimated_cost: u32,
    estimated_time_ms: f64,
) -> HookAdmission {
    if metadata.priority == HookPriority::Critical {
        return HookAdmission::Execute;
    }
    if estimated_cost > ctx.available_token_budget {
        return HookAdmission::Skip;
    }
    if estimated_time_ms > ctx.max_execution_time_ms {
        return HookAdmission::Defer;
    }
    if metadata.relevance_for(ctx.phase) < config.relevance_floor {
        return HookAdmission::Skip;
    }
    if metadata.success_rate < config.reliability_floor {
        return HookAdmission::Defer;
    }
    if ctx.system_load > config.load_defer_threshold {
        return HookAdmission::Defer;
    }
    HookAdmission::Execute
}

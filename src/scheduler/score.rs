//! Strategy-dependent priority scoring.
//!
//! Every strategy produces a non-negative score in a comparable range
//! (bounded by the priority base weights), so scores are meaningful for
//! relative ordering only. Callers break ties by hook id for determinism.

use super::context::SchedulingContext;
use super::strategy::SchedulingStrategy;
use crate::hooks::HookMetadata;
use crate::phase::PhaseParameters;

/// Reference figure for the time/cost decay factors. A hook at this cost
/// or duration scores half the factor of a free one; the factor stays in
/// (0, 1] and decreases strictly as cost or time grows.
const NORMALIZATION_SCALE: f64 = 1000.0;

/// Compute the priority score for a hook under the active strategy.
pub fn priority_score(
    metadata: &HookMetadata,
    ctx: &SchedulingContext,
    params: &PhaseParameters,
    strategy: SchedulingStrategy,
) -> f64 {
    match strategy {
        SchedulingStrategy::PriorityFirst => priority_component(metadata),
        SchedulingStrategy::PhaseOptimized => phase_component(metadata, ctx, params),
        SchedulingStrategy::PerformanceFirst => performance_component(metadata),
        SchedulingStrategy::TokenEfficient => token_component(metadata),
        SchedulingStrategy::Balanced => {
            (priority_component(metadata)
                + phase_component(metadata, ctx, params)
                + performance_component(metadata)
                + token_component(metadata))
                / 4.0
        }
    }
}

fn priority_component(metadata: &HookMetadata) -> f64 {
    metadata.priority.base_weight() * metadata.success_rate
}

fn phase_component(
    metadata: &HookMetadata,
    ctx: &SchedulingContext,
    params: &PhaseParameters,
) -> f64 {
    metadata.priority.base_weight()
        * metadata.relevance_for(ctx.phase)
        * metadata.success_rate
        * params.weight_for(metadata.priority)
}

fn performance_component(metadata: &HookMetadata) -> f64 {
    let time = metadata.estimated_execution_time_ms.max(0.0);
    let speed = NORMALIZATION_SCALE / (NORMALIZATION_SCALE + time);
    metadata.priority.base_weight() * speed * metadata.success_rate
}

fn token_component(metadata: &HookMetadata) -> f64 {
    let cost = metadata.token_cost_estimate as f64;
    let thrift = NORMALIZATION_SCALE / (NORMALIZATION_SCALE + cost);
    metadata.priority.base_weight() * thrift * metadata.success_rate
}

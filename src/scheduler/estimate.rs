//! Per-hook cost and time estimation.
//!
//! Estimates start from the registry-supplied base figures and are shaped
//! by phase relevance and system load. All factors compose
//! multiplicatively and estimated time never drops below its base.

use super::context::SchedulingContext;
use crate::config::SchedulerConfig;
use crate::hooks::HookMetadata;

/// Expected token cost of running a hook in this context.
///
/// Low phase relevance signals likely wasted tokens and inflates the
/// estimate; high relevance discounts it; high system load adds a
/// contention factor.
pub fn estimate_cost(
    metadata: &HookMetadata,
    ctx: &SchedulingContext,
    config: &SchedulerConfig,
) -> u32 {
    let mut cost = metadata.token_cost_estimate as f64;

    let relevance = metadata.relevance_for(ctx.phase);
    if relevance < config.relevance_low {
        cost *= config.low_relevance_penalty;
    } else if relevance >= config.relevance_high {
        cost *= config.high_relevance_discount;
    }

    if ctx.system_load > config.load_overhead_threshold {
        cost *= config.load_contention_factor;
    }

    cost.round() as u32
}

/// Expected wall-clock time of running a hook in this context.
///
/// Scaled up by system load and by historical unreliability, never below
/// the base estimate.
pub fn estimate_time(metadata: &HookMetadata, ctx: &SchedulingContext) -> f64 {
    let base = metadata.estimated_execution_time_ms;
    let scaled = base * (1.0 + 0.5 * ctx.system_load) * (1.0 + (1.0 - metadata.success_rate) * 0.2);
    scaled.max(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::{HookEvent, HookPriority};
    use crate::phase::Phase;

    fn ctx() -> SchedulingContext {
        SchedulingContext::new(HookEvent::PrePhase, Phase::Green)
    }

    fn metadata(relevance: f64) -> HookMetadata {
        HookMetadata::new(HookPriority::Normal)
            .with_relevance(Phase::Green, relevance)
            .with_token_cost(1000)
            .with_execution_time(100.0)
    }

    #[test]
    fn test_high_relevance_discounts_cost() {
        let config = SchedulerConfig::default();
        let cost = estimate_cost(&metadata(0.9), &ctx(), &config);
        assert!(cost <= 1000);
        assert_eq!(cost, 700);
    }

    #[test]
    fn test_low_relevance_inflates_cost() {
        let config = SchedulerConfig::default();
        let cost = estimate_cost(&metadata(0.1), &ctx(), &config);
        assert!(cost > 1000);
        assert_eq!(cost, 1500);
    }

    #[test]
    fn test_missing_relevance_counts_as_low() {
        let config = SchedulerConfig::default();
        let meta = HookMetadata::new(HookPriority::Normal).with_token_cost(1000);
        assert_eq!(estimate_cost(&meta, &ctx(), &config), 1500);
    }

    #[test]
    fn test_load_contention_composes_with_relevance() {
        let config = SchedulerConfig::default();
        let loaded = ctx().with_system_load(0.9);
        // 1000 * 1.5 * 1.3
        assert_eq!(estimate_cost(&metadata(0.1), &loaded, &config), 1950);
        // 1000 * 0.7 * 1.3
        assert_eq!(estimate_cost(&metadata(0.9), &loaded, &config), 910);
    }

    #[test]
    fn test_cost_monotone_in_system_load() {
        let config = SchedulerConfig::default();
        let meta = metadata(0.5);
        let mut previous = 0;
        for load in [0.0, 0.2, 0.5, 0.8, 0.85, 1.0] {
            let cost = estimate_cost(&meta, &ctx().with_system_load(load), &config);
            assert!(cost >= previous, "cost decreased at load {}", load);
            previous = cost;
        }
    }

    #[test]
    fn test_time_never_below_base() {
        let meta = metadata(0.5).with_success_rate(1.0);
        let idle = ctx().with_system_load(0.0);
        assert_eq!(estimate_time(&meta, &idle), 100.0);
    }

    #[test]
    fn test_time_scales_with_load_and_unreliability() {
        let meta = metadata(0.5).with_success_rate(0.5);
        let loaded = ctx().with_system_load(1.0);
        // 100 * 1.5 * 1.1
        let time = estimate_time(&meta, &loaded);
        assert!((time - 165.0).abs() < 1e-9);
    }
}

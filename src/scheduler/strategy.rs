//! Scheduling strategies and context-driven strategy selection.

use super::context::SchedulingContext;
use crate::config::SchedulerConfig;
use crate::phase::Phase;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The scoring/estimation policy in effect for one scheduling call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingStrategy {
    /// Rank purely by priority and reliability
    PriorityFirst,
    /// Favor fast hooks under tight time budgets
    PerformanceFirst,
    /// Weight hooks by relevance to the current phase
    #[default]
    PhaseOptimized,
    /// Favor cheap hooks under tight token budgets
    TokenEfficient,
    /// Equal-weighted blend of the other four
    Balanced,
}

impl SchedulingStrategy {
    /// Returns all strategies.
    pub fn all() -> &'static [SchedulingStrategy] {
        &[
            SchedulingStrategy::PriorityFirst,
            SchedulingStrategy::PerformanceFirst,
            SchedulingStrategy::PhaseOptimized,
            SchedulingStrategy::TokenEfficient,
            SchedulingStrategy::Balanced,
        ]
    }

    /// Returns the strategy name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchedulingStrategy::PriorityFirst => "priority_first",
            SchedulingStrategy::PerformanceFirst => "performance_first",
            SchedulingStrategy::PhaseOptimized => "phase_optimized",
            SchedulingStrategy::TokenEfficient => "token_efficient",
            SchedulingStrategy::Balanced => "balanced",
        }
    }
}

impl std::fmt::Display for SchedulingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Select the strategy for one scheduling call. First match wins.
pub fn select_strategy(config: &SchedulerConfig, ctx: &SchedulingContext) -> SchedulingStrategy {
    if !config.adaptive_selection {
        return config.default_strategy;
    }

    let strategy = if ctx.available_token_budget < config.low_token_threshold {
        SchedulingStrategy::TokenEfficient
    } else if ctx.max_execution_time_ms < config.tight_time_threshold_ms {
        SchedulingStrategy::PerformanceFirst
    } else if ctx.system_load > config.high_load_threshold {
        SchedulingStrategy::PriorityFirst
    } else if ctx.phase == Phase::Sync {
        // Sync always uses the phase-aware strategy
        SchedulingStrategy::PhaseOptimized
    } else {
        config.default_strategy
    };

    debug!(
        event = %ctx.event,
        phase = %ctx.phase,
        strategy = %strategy,
        "selected scheduling strategy"
    );

    strategy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::HookEvent;

    fn ctx() -> SchedulingContext {
        SchedulingContext::new(HookEvent::PrePhase, Phase::Green)
    }

    #[test]
    fn test_zero_budget_selects_token_efficient() {
        let config = SchedulerConfig::default();
        let ctx = ctx().with_token_budget(0);
        assert_eq!(
            select_strategy(&config, &ctx),
            SchedulingStrategy::TokenEfficient
        );
    }

    #[test]
    fn test_tight_time_selects_performance_first() {
        let config = SchedulerConfig::default();
        let ctx = ctx().with_max_execution_time(200.0);
        assert_eq!(
            select_strategy(&config, &ctx),
            SchedulingStrategy::PerformanceFirst
        );
    }

    #[test]
    fn test_high_load_selects_priority_first() {
        let config = SchedulerConfig::default();
        let ctx = ctx().with_system_load(0.95);
        assert_eq!(
            select_strategy(&config, &ctx),
            SchedulingStrategy::PriorityFirst
        );
    }

    #[test]
    fn test_sync_phase_selects_phase_optimized() {
        let config =
            SchedulerConfig::default().with_default_strategy(SchedulingStrategy::Balanced);
        let ctx = SchedulingContext::new(HookEvent::PostPhase, Phase::Sync);
        assert_eq!(
            select_strategy(&config, &ctx),
            SchedulingStrategy::PhaseOptimized
        );
    }

    #[test]
    fn test_rule_order_budget_beats_time() {
        // First rule wins even when a later rule would also fire
        let config = SchedulerConfig::default();
        let ctx = ctx().with_token_budget(100).with_max_execution_time(100.0);
        assert_eq!(
            select_strategy(&config, &ctx),
            SchedulingStrategy::TokenEfficient
        );
    }

    #[test]
    fn test_default_strategy_when_no_rule_fires() {
        let config =
            SchedulerConfig::default().with_default_strategy(SchedulingStrategy::Balanced);
        assert_eq!(select_strategy(&config, &ctx()), SchedulingStrategy::Balanced);
    }

    #[test]
    fn test_adaptive_selection_disabled() {
        let config = SchedulerConfig::default()
            .with_adaptive_selection(false)
            .with_default_strategy(SchedulingStrategy::PriorityFirst);
        let ctx = ctx().with_token_budget(0);
        assert_eq!(
            select_strategy(&config, &ctx),
            SchedulingStrategy::PriorityFirst
        );
    }
}

//! Adaptive strategy-performance tracking.
//!
//! After every scheduling call the tracker updates an exponential moving
//! average of how the chosen strategy behaved: what fraction of candidates
//! it admitted and how much of the time budget the plan consumed. The
//! state is process-lifetime and in-memory only; restarts start fresh.

use super::strategy::SchedulingStrategy;
use crate::phase::{Phase, PhaseParameters};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

/// Rolling performance record for one strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyPerformance {
    /// EMA of the fraction of candidates admitted per schedule
    pub success_rate: f64,
    /// EMA of budget efficiency (1 = plan used none of the time budget)
    pub avg_efficiency: f64,
    /// Number of scheduling calls that used this strategy
    pub usage_count: u64,
}

impl Default for StrategyPerformance {
    fn default() -> Self {
        Self {
            success_rate: 1.0,
            avg_efficiency: 0.8,
            usage_count: 0,
        }
    }
}

/// One entry in the recent-schedule history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub strategy: SchedulingStrategy,
    pub phase: Phase,
    pub candidate_count: usize,
    pub executed_count: usize,
    pub estimated_total_time_ms: f64,
}

/// Read-only snapshot of tracker state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingStatistics {
    /// Per-strategy rolling performance
    pub strategies: HashMap<SchedulingStrategy, StrategyPerformance>,
    /// Total scheduling calls since construction
    pub total_schedules: u64,
    /// Most recent schedule records, oldest first
    pub recent: Vec<ScheduleRecord>,
}

/// Static parameters plus rule-based recommendations for one phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseInsights {
    pub phase: Phase,
    pub parameters: PhaseParameters,
    pub optimization_recommendations: Vec<String>,
}

#[derive(Debug, Default)]
struct PhaseHistory {
    schedules: u64,
    parallel_eligible_hooks: u64,
}

#[derive(Debug)]
struct TrackerState {
    strategies: HashMap<SchedulingStrategy, StrategyPerformance>,
    total_schedules: u64,
    recent: VecDeque<ScheduleRecord>,
    phases: HashMap<Phase, PhaseHistory>,
}

/// Process-lifetime tracker of strategy outcomes.
///
/// Interior mutability behind a mutex: scheduling calls from different
/// call sites may record concurrently.
#[derive(Debug)]
pub struct PerformanceTracker {
    ema_alpha: f64,
    recent_cap: usize,
    state: Mutex<TrackerState>,
}

impl PerformanceTracker {
    /// Create a tracker with every strategy at its initial performance.
    pub fn new(ema_alpha: f64, recent_cap: usize) -> Self {
        let strategies = SchedulingStrategy::all()
            .iter()
            .map(|s| (*s, StrategyPerformance::default()))
            .collect();

        Self {
            ema_alpha,
            recent_cap,
            state: Mutex::new(TrackerState {
                strategies,
                total_schedules: 0,
                recent: VecDeque::new(),
                phases: HashMap::new(),
            }),
        }
    }

    /// Record the outcome of one scheduling call.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &self,
        strategy: SchedulingStrategy,
        phase: Phase,
        candidate_count: usize,
        executed_count: usize,
        parallel_eligible: usize,
        estimated_total_time_ms: f64,
        max_execution_time_ms: f64,
    ) {
        let executed_fraction = if candidate_count == 0 {
            1.0
        } else {
            executed_count as f64 / candidate_count as f64
        };
        let time_usage =
            (estimated_total_time_ms / max_execution_time_ms.max(1.0)).clamp(0.0, 1.0);
        let efficiency = 1.0 - time_usage;

        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let state = &mut *guard;

        let perf = state.strategies.entry(strategy).or_default();
        perf.usage_count += 1;
        perf.success_rate = ema(perf.success_rate, executed_fraction, self.ema_alpha);
        perf.avg_efficiency = ema(perf.avg_efficiency, efficiency, self.ema_alpha);

        state.total_schedules += 1;

        let history = state.phases.entry(phase).or_default();
        history.schedules += 1;
        history.parallel_eligible_hooks += parallel_eligible as u64;

        state.recent.push_back(ScheduleRecord {
            strategy,
            phase,
            candidate_count,
            executed_count,
            estimated_total_time_ms,
        });
        while state.recent.len() > self.recent_cap {
            state.recent.pop_front();
        }
    }

    /// Snapshot the current statistics.
    pub fn statistics(&self) -> SchedulingStatistics {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        SchedulingStatistics {
            strategies: state.strategies.clone(),
            total_schedules: state.total_schedules,
            recent: state.recent.iter().cloned().collect(),
        }
    }

    /// Build insights for a phase from its static parameters and the
    /// recorded history.
    pub fn phase_insights(&self, phase: Phase, parameters: &PhaseParameters) -> PhaseInsights {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let mut recommendations = Vec::new();

        match state.phases.get(&phase) {
            Some(history) if history.schedules > 0 => {
                let avg_parallel =
                    history.parallel_eligible_hooks as f64 / history.schedules as f64;

                if !parameters.prefer_parallel && avg_parallel >= 2.0 {
                    recommendations.push(format!(
                        "Phase averages {:.1} parallel-safe hooks per schedule; consider enabling parallel execution",
                        avg_parallel
                    ));
                }
                if parameters.prefer_parallel && history.schedules >= 5 && avg_parallel < 1.0 {
                    recommendations.push(
                        "Fewer than one parallel-safe hook per schedule; parallel preference adds little here"
                            .to_string(),
                    );
                }
            }
            _ => {
                recommendations.push("No scheduling history for this phase yet".to_string());
            }
        }

        for (strategy, perf) in &state.strategies {
            if perf.usage_count >= 5 && perf.success_rate < 0.5 {
                recommendations.push(format!(
                    "Strategy {} admits under half of its candidates ({:.0}%); admission thresholds may be too strict",
                    strategy,
                    perf.success_rate * 100.0
                ));
            }
        }

        PhaseInsights {
            phase,
            parameters: parameters.clone(),
            optimization_recommendations: recommendations,
        }
    }
}

fn ema(previous: f64, sample: f64, alpha: f64) -> f64 {
    (1.0 - alpha) * previous + alpha * sample
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> PerformanceTracker {
        PerformanceTracker::new(0.3, 5)
    }

    #[test]
    fn test_initial_performance() {
        let stats = tracker().statistics();
        assert_eq!(stats.total_schedules, 0);
        assert_eq!(stats.strategies.len(), SchedulingStrategy::all().len());
        for perf in stats.strategies.values() {
            assert_eq!(perf.success_rate, 1.0);
            assert_eq!(perf.avg_efficiency, 0.8);
            assert_eq!(perf.usage_count, 0);
        }
    }

    #[test]
    fn test_record_updates_ema() {
        let tracker = tracker();
        // 2 of 4 candidates admitted, half the time budget consumed
        tracker.record(
            SchedulingStrategy::Balanced,
            Phase::Green,
            4,
            2,
            1,
            500.0,
            1000.0,
        );

        let stats = tracker.statistics();
        let perf = &stats.strategies[&SchedulingStrategy::Balanced];
        assert_eq!(perf.usage_count, 1);
        // 0.7 * 1.0 + 0.3 * 0.5
        assert!((perf.success_rate - 0.85).abs() < 1e-9);
        // 0.7 * 0.8 + 0.3 * 0.5
        assert!((perf.avg_efficiency - 0.71).abs() < 1e-9);
        assert_eq!(stats.total_schedules, 1);
        assert_eq!(stats.recent.len(), 1);
    }

    #[test]
    fn test_zero_candidates_counts_as_full_success() {
        let tracker = tracker();
        tracker.record(
            SchedulingStrategy::PriorityFirst,
            Phase::Spec,
            0,
            0,
            0,
            0.0,
            1000.0,
        );
        let perf = &tracker.statistics().strategies[&SchedulingStrategy::PriorityFirst];
        assert_eq!(perf.success_rate, 1.0);
    }

    #[test]
    fn test_recent_history_is_bounded() {
        let tracker = tracker();
        for _ in 0..12 {
            tracker.record(
                SchedulingStrategy::Balanced,
                Phase::Green,
                1,
                1,
                0,
                10.0,
                1000.0,
            );
        }
        let stats = tracker.statistics();
        assert_eq!(stats.recent.len(), 5);
        assert_eq!(stats.total_schedules, 12);
    }

    #[test]
    fn test_insights_without_history() {
        let params = PhaseParameters::for_phase(Phase::Red);
        let insights = tracker().phase_insights(Phase::Red, &params);
        assert_eq!(insights.phase, Phase::Red);
        assert!(
            insights.optimization_recommendations[0].contains("No scheduling history")
        );
    }

    #[test]
    fn test_insights_suggest_enabling_parallel() {
        let tracker = tracker();
        // Sync prefers sequential, but schedules keep seeing parallel-safe hooks
        for _ in 0..3 {
            tracker.record(
                SchedulingStrategy::PhaseOptimized,
                Phase::Sync,
                4,
                4,
                3,
                100.0,
                1000.0,
            );
        }
        let params = PhaseParameters::for_phase(Phase::Sync);
        let insights = tracker.phase_insights(Phase::Sync, &params);
        assert!(
            insights
                .optimization_recommendations
                .iter()
                .any(|r| r.contains("enabling parallel execution"))
        );
    }

    #[test]
    fn test_insights_flag_strict_admission() {
        let tracker = tracker();
        for _ in 0..10 {
            tracker.record(
                SchedulingStrategy::TokenEfficient,
                Phase::Green,
                10,
                1,
                0,
                100.0,
                1000.0,
            );
        }
        let params = PhaseParameters::for_phase(Phase::Green);
        let insights = tracker.phase_insights(Phase::Green, &params);
        assert!(
            insights
                .optimization_recommendations
                .iter()
                .any(|r| r.contains("token_efficient"))
        );
    }
}

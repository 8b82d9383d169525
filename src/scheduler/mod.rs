//! The phase-optimized hook scheduler.
//!
//! [`HookScheduler`] is the main entry point. One scheduling call selects a
//! strategy for the context, estimates and scores every candidate hook,
//! makes per-hook admission decisions, enforces the aggregate budget,
//! orders admitted hooks by dependencies, and batches them into execution
//! groups for the external execution engine.
//!
//! # Usage
//!
//! ```ignore
//! use hooksched::{HookEvent, HookScheduler, Phase, SchedulingContext, StaticRegistry};
//!
//! let scheduler = HookScheduler::default();
//! let ctx = SchedulingContext::new(HookEvent::PrePhase, Phase::Green)
//!     .with_token_budget(8000)
//!     .with_max_execution_time(5000.0);
//!
//! let result = scheduler.schedule_hooks(&registry, &ctx).await?;
//! for group in &result.execution_plan {
//!     // hand groups to the executor; parallel groups may run concurrently
//! }
//! ```

pub mod admission;
pub mod constraints;
pub mod context;
pub mod dependency;
pub mod estimate;
pub mod feedback;
pub mod groups;
pub mod score;
pub mod strategy;

// Re-exports for convenience
pub use context::SchedulingContext;
pub use feedback::{
    PhaseInsights, ScheduleRecord, SchedulingStatistics, StrategyPerformance,
};
pub use groups::{ExecutionGroup, GroupExecutionMode};
pub use strategy::SchedulingStrategy;

use crate::config::SchedulerConfig;
use crate::errors::SchedulerError;
use crate::hooks::{HookAdmission, HookMetadata, HookRegistry, RegisteredHook};
use crate::phase::{Phase, PhaseParameters};
use anyhow::Result;
use feedback::PerformanceTracker;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

fn default_max_retries() -> u32 {
    2
}

/// A candidate hook with its per-call scheduling derivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledHook {
    /// Opaque hook identifier
    pub hook_id: String,
    /// The hook's metadata, normalized at ingestion
    pub metadata: HookMetadata,
    /// Strategy-dependent priority score
    pub priority_score: f64,
    /// Context-adjusted token cost
    pub estimated_cost: u32,
    /// Context-adjusted execution time
    pub estimated_time_ms: f64,
    /// The admission decision
    pub decision: HookAdmission,
    /// Hook ids this hook must run after
    pub dependencies: HashSet<String>,
    /// Retries already attempted (owned by the caller across cycles)
    #[serde(default)]
    pub retry_count: u32,
    /// Retry ceiling for deferred hooks
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Final output of one scheduling call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingResult {
    /// Admitted hooks, in final plan order
    pub scheduled_hooks: Vec<ScheduledHook>,
    /// Ordered execution groups for the executor
    pub execution_plan: Vec<ExecutionGroup>,
    /// Expected total plan duration (groups run back to back)
    pub estimated_total_time_ms: f64,
    /// Expected total token cost of the plan
    pub estimated_total_tokens: u32,
    /// Hooks not running this cycle
    pub skipped_hooks: Vec<ScheduledHook>,
    /// Hooks eligible for a later cycle
    pub deferred_hooks: Vec<ScheduledHook>,
    /// The strategy actually used
    pub strategy: SchedulingStrategy,
}

impl SchedulingResult {
    fn empty(strategy: SchedulingStrategy) -> Self {
        Self {
            scheduled_hooks: Vec::new(),
            execution_plan: Vec::new(),
            estimated_total_time_ms: 0.0,
            estimated_total_tokens: 0,
            skipped_hooks: Vec::new(),
            deferred_hooks: Vec::new(),
            strategy,
        }
    }
}

/// Schedules registered hooks under token, time, and load constraints.
///
/// Owns the static per-phase parameter table and the process-lifetime
/// strategy-performance tracker. The scheduling computation itself is a
/// pure function of its inputs; only the tracker is mutated, behind a
/// mutex, so concurrent calls from different call sites are safe.
#[derive(Debug)]
pub struct HookScheduler {
    config: SchedulerConfig,
    phases: HashMap<Phase, PhaseParameters>,
    tracker: PerformanceTracker,
}

impl Default for HookScheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl HookScheduler {
    /// Create a scheduler with the default phase parameter table.
    pub fn new(config: SchedulerConfig) -> Self {
        let tracker = PerformanceTracker::new(config.ema_alpha, config.recent_history);
        Self {
            config,
            phases: PhaseParameters::table(),
            tracker,
        }
    }

    /// Override the parameters for one phase.
    pub fn with_phase_parameters(mut self, phase: Phase, params: PhaseParameters) -> Self {
        self.phases.insert(phase, params);
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Schedule the hooks registered for the context's event.
    ///
    /// Fetches candidates from the registry, then runs the pure
    /// [`schedule_candidates`](Self::schedule_candidates) pipeline.
    pub async fn schedule_hooks(
        &self,
        registry: &dyn HookRegistry,
        ctx: &SchedulingContext,
    ) -> Result<SchedulingResult> {
        let candidates = registry.hooks_for_event(ctx.event).await?;
        Ok(self.schedule_candidates(candidates, ctx))
    }

    /// Run the scheduling pipeline over an explicit candidate list.
    ///
    /// No candidates is not an error: the result has an empty plan and
    /// zero totals.
    pub fn schedule_candidates(
        &self,
        candidates: Vec<RegisteredHook>,
        ctx: &SchedulingContext,
    ) -> SchedulingResult {
        let params = self.phase_parameters(ctx.phase);
        let strategy = strategy::select_strategy(&self.config, ctx);

        if candidates.is_empty() {
            self.tracker
                .record(strategy, ctx.phase, 0, 0, 0, 0.0, ctx.max_execution_time_ms);
            return SchedulingResult::empty(strategy);
        }

        let candidate_count = candidates.len();
        let mut hooks: Vec<ScheduledHook> = Vec::with_capacity(candidate_count);
        let mut skipped: Vec<ScheduledHook> = Vec::new();

        for RegisteredHook { hook_id, metadata } in candidates {
            if !metadata.is_schedulable() {
                let err = SchedulerError::InvalidMetadata {
                    hook_id: hook_id.clone(),
                    reason: "non-finite numeric field".to_string(),
                };
                warn!(%err, "skipping hook with invalid metadata");
                skipped.push(unschedulable(hook_id, metadata));
                continue;
            }
            for warning in metadata.validate() {
                warn!(hook_id = %hook_id, "{}", warning);
            }
            let metadata = metadata.normalized();

            let estimated_cost = estimate::estimate_cost(&metadata, ctx, &self.config);
            let estimated_time_ms = estimate::estimate_time(&metadata, ctx);
            let priority_score = score::priority_score(&metadata, ctx, &params, strategy);
            let decision =
                admission::decide(&metadata, ctx, &self.config, estimated_cost, estimated_time_ms);
            let dependencies = metadata.dependencies.iter().cloned().collect();

            hooks.push(ScheduledHook {
                hook_id,
                metadata,
                priority_score,
                estimated_cost,
                estimated_time_ms,
                decision,
                dependencies,
                retry_count: 0,
                max_retries: default_max_retries(),
            });
        }

        constraints::enforce_aggregate_budget(&mut hooks, ctx);

        let mut execute = Vec::new();
        let mut deferred = Vec::new();
        for hook in hooks {
            match hook.decision {
                HookAdmission::Execute => execute.push(hook),
                HookAdmission::Defer => deferred.push(hook),
                HookAdmission::Skip => skipped.push(hook),
            }
        }

        execute.sort_by(|a, b| {
            b.priority_score
                .total_cmp(&a.priority_score)
                .then_with(|| a.hook_id.cmp(&b.hook_id))
        });

        let parallel_eligible = execute.iter().filter(|h| h.metadata.parallel_safe).count();

        let ordered = dependency::resolve_order(execute);
        let plan = groups::optimize_order(groups::build_groups(
            ordered,
            &params,
            self.config.max_parallel_groups,
        ));

        let scheduled_hooks: Vec<ScheduledHook> = plan
            .iter()
            .flat_map(|g| g.hooks.iter().cloned())
            .collect();
        let estimated_total_tokens: u32 = plan.iter().map(|g| g.estimated_tokens).sum();
        let estimated_total_time_ms: f64 = plan.iter().map(|g| g.estimated_time_ms).sum();

        debug!(
            event = %ctx.event,
            phase = %ctx.phase,
            strategy = %strategy,
            scheduled = scheduled_hooks.len(),
            deferred = deferred.len(),
            skipped = skipped.len(),
            groups = plan.len(),
            "scheduling complete"
        );

        self.tracker.record(
            strategy,
            ctx.phase,
            candidate_count,
            scheduled_hooks.len(),
            parallel_eligible,
            estimated_total_time_ms,
            ctx.max_execution_time_ms,
        );

        SchedulingResult {
            scheduled_hooks,
            execution_plan: plan,
            estimated_total_time_ms,
            estimated_total_tokens,
            skipped_hooks: skipped,
            deferred_hooks: deferred,
            strategy,
        }
    }

    /// Snapshot the strategy-performance statistics.
    pub fn statistics(&self) -> SchedulingStatistics {
        self.tracker.statistics()
    }

    /// Static parameters plus rule-based recommendations for a phase.
    pub fn phase_insights(&self, phase: Phase) -> PhaseInsights {
        let params = self.phase_parameters(phase);
        self.tracker.phase_insights(phase, &params)
    }

    fn phase_parameters(&self, phase: Phase) -> PhaseParameters {
        self.phases
            .get(&phase)
            .cloned()
            .unwrap_or_else(|| PhaseParameters::for_phase(phase))
    }
}

fn unschedulable(hook_id: String, metadata: HookMetadata) -> ScheduledHook {
    let estimated_cost = metadata.token_cost_estimate;
    ScheduledHook {
        hook_id,
        metadata,
        priority_score: 0.0,
        estimated_cost,
        estimated_time_ms: 0.0,
        decision: HookAdmission::Skip,
        dependencies: HashSet::new(),
        retry_count: 0,
        max_retries: default_max_retries(),
    }
}

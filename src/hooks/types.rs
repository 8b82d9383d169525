//! Core hook types consumed by the scheduler.
//!
//! This module defines:
//! - `HookEvent`: the lifecycle events that can trigger hooks
//! - `HookPriority`: the four-level priority ladder with base score weights
//! - `HookMetadata`: the per-hook descriptor the registry supplies
//! - `HookAdmission`: the per-hook execute/defer/skip decision

use crate::phase::Phase;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lifecycle events that can trigger hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookEvent {
    /// Before phase execution
    PrePhase,
    /// After phase completion
    PostPhase,
    /// Before each iteration
    PreIteration,
    /// After each iteration
    PostIteration,
    /// When a phase exceeds its budget
    OnFailure,
    /// When an approval gate is presented
    OnApproval,
}

impl HookEvent {
    /// Returns all possible hook events.
    pub fn all() -> &'static [HookEvent] {
        &[
            HookEvent::PrePhase,
            HookEvent::PostPhase,
            HookEvent::PreIteration,
            HookEvent::PostIteration,
            HookEvent::OnFailure,
            HookEvent::OnApproval,
        ]
    }

    /// Returns the event name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            HookEvent::PrePhase => "pre_phase",
            HookEvent::PostPhase => "post_phase",
            HookEvent::PreIteration => "pre_iteration",
            HookEvent::PostIteration => "post_iteration",
            HookEvent::OnFailure => "on_failure",
            HookEvent::OnApproval => "on_approval",
        }
    }
}

impl std::fmt::Display for HookEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for HookEvent {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pre_phase" | "prephase" => Ok(HookEvent::PrePhase),
            "post_phase" | "postphase" => Ok(HookEvent::PostPhase),
            "pre_iteration" | "preiteration" => Ok(HookEvent::PreIteration),
            "post_iteration" | "postiteration" => Ok(HookEvent::PostIteration),
            "on_failure" | "onfailure" => Ok(HookEvent::OnFailure),
            "on_approval" | "onapproval" => Ok(HookEvent::OnApproval),
            _ => anyhow::bail!(
                "Invalid hook event '{}'. Valid values: pre_phase, post_phase, pre_iteration, post_iteration, on_failure, on_approval",
                s
            ),
        }
    }
}

/// Priority ladder for hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPriority {
    /// Always admitted, regardless of budget, time, or load
    Critical,
    High,
    Normal,
    Low,
}

impl HookPriority {
    /// Base score weight used by every scoring strategy.
    pub fn base_weight(&self) -> f64 {
        match self {
            HookPriority::Critical => 100.0,
            HookPriority::High => 75.0,
            HookPriority::Normal => 50.0,
            HookPriority::Low => 25.0,
        }
    }
}

/// The per-hook admission decision.
///
/// `Skip` means "do not run this cycle, no retry implied"; `Defer` means
/// "eligible to run in a later cycle". Retry accounting belongs to the
/// caller via `retry_count`/`max_retries` on the scheduled hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HookAdmission {
    /// Run in this scheduling cycle
    #[default]
    Execute,
    /// Eligible to run in a later cycle
    Defer,
    /// Do not run this cycle
    Skip,
}

impl HookAdmission {
    /// Check if this decision admits the hook.
    pub fn is_execute(&self) -> bool {
        matches!(self, HookAdmission::Execute)
    }
}

/// Descriptor for a registered hook, supplied by the external registry.
///
/// All fields are mandatory; out-of-range numeric values are clamped at
/// ingestion and non-finite values make the hook unschedulable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookMetadata {
    /// Priority level
    pub priority: HookPriority,
    /// How applicable this hook is to each phase (0..1)
    pub phase_relevance: HashMap<Phase, f64>,
    /// Historical reliability (0..1)
    pub success_rate: f64,
    /// Expected token cost of one execution
    pub token_cost_estimate: u32,
    /// Expected wall-clock time of one execution
    pub estimated_execution_time_ms: f64,
    /// Whether this hook may run concurrently with others
    pub parallel_safe: bool,
    /// Hook ids this hook must run after
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl HookMetadata {
    /// Create metadata with neutral defaults for the given priority.
    pub fn new(priority: HookPriority) -> Self {
        Self {
            priority,
            phase_relevance: HashMap::new(),
            success_rate: 1.0,
            token_cost_estimate: 0,
            estimated_execution_time_ms: 0.0,
            parallel_safe: false,
            dependencies: Vec::new(),
        }
    }

    /// Set the relevance score for a phase.
    pub fn with_relevance(mut self, phase: Phase, relevance: f64) -> Self {
        self.phase_relevance.insert(phase, relevance);
        self
    }

    /// Set the same relevance score for every phase.
    pub fn with_uniform_relevance(mut self, relevance: f64) -> Self {
        for phase in Phase::all() {
            self.phase_relevance.insert(*phase, relevance);
        }
        self
    }

    /// Set the historical success rate.
    pub fn with_success_rate(mut self, rate: f64) -> Self {
        self.success_rate = rate;
        self
    }

    /// Set the token cost estimate.
    pub fn with_token_cost(mut self, tokens: u32) -> Self {
        self.token_cost_estimate = tokens;
        self
    }

    /// Set the execution time estimate.
    pub fn with_execution_time(mut self, time_ms: f64) -> Self {
        self.estimated_execution_time_ms = time_ms;
        self
    }

    /// Mark this hook as safe for parallel execution.
    pub fn parallel_safe(mut self) -> Self {
        self.parallel_safe = true;
        self
    }

    /// Add a dependency on another hook id.
    pub fn with_dependency(mut self, hook_id: impl Into<String>) -> Self {
        self.dependencies.push(hook_id.into());
        self
    }

    /// Relevance for a phase; a missing entry counts as fully irrelevant.
    pub fn relevance_for(&self, phase: Phase) -> f64 {
        self.phase_relevance.get(&phase).copied().unwrap_or(0.0)
    }

    /// Check that the numeric fields are finite and usable.
    ///
    /// An unschedulable hook is skipped with a warning rather than
    /// propagated as an error.
    pub fn is_schedulable(&self) -> bool {
        self.success_rate.is_finite()
            && self.estimated_execution_time_ms.is_finite()
            && self.estimated_execution_time_ms >= 0.0
            && self.phase_relevance.values().all(|r| r.is_finite())
    }

    /// Validate this metadata and return warnings for out-of-range values.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !(0.0..=1.0).contains(&self.success_rate) {
            warnings.push(format!(
                "success_rate {} outside 0..1, clamping",
                self.success_rate
            ));
        }
        for (phase, relevance) in &self.phase_relevance {
            if !(0.0..=1.0).contains(relevance) {
                warnings.push(format!(
                    "phase_relevance[{}] {} outside 0..1, clamping",
                    phase, relevance
                ));
            }
        }

        warnings
    }

    /// Return a copy with all rates clamped into their documented ranges.
    pub fn normalized(&self) -> Self {
        let mut normalized = self.clone();
        normalized.success_rate = normalized.success_rate.clamp(0.0, 1.0);
        for relevance in normalized.phase_relevance.values_mut() {
            *relevance = relevance.clamp(0.0, 1.0);
        }
        normalized
    }
}

/// A hook id paired with its metadata, as returned by the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredHook {
    /// Opaque hook identifier (a name or path)
    pub hook_id: String,
    /// The hook's scheduling metadata
    pub metadata: HookMetadata,
}

impl RegisteredHook {
    /// Pair a hook id with its metadata.
    pub fn new(hook_id: impl Into<String>, metadata: HookMetadata) -> Self {
        Self {
            hook_id: hook_id.into(),
            metadata,
        }
    }
}

//! Development lifecycle phases and their static tuning parameters.
//!
//! This module provides:
//! - `Phase` enum representing the ordered lifecycle stages
//! - `PhaseParameters` struct holding per-phase scheduling tuning
//! - The default parameter table built once at scheduler construction

use crate::hooks::HookPriority;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A stage of the development lifecycle.
///
/// Each phase owns an immutable [`PhaseParameters`] profile that shapes
/// how hooks are scheduled while the workflow is in that phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Specification and planning
    Spec,
    /// Failing tests are written
    Red,
    /// Implementation until tests pass
    Green,
    /// Code improvement with tests green
    Refactor,
    /// Synchronization with the upstream state
    Sync,
}

impl Phase {
    /// Returns all phases in lifecycle order.
    pub fn all() -> &'static [Phase] {
        &[
            Phase::Spec,
            Phase::Red,
            Phase::Green,
            Phase::Refactor,
            Phase::Sync,
        ]
    }

    /// Returns the phase name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Spec => "spec",
            Phase::Red => "red",
            Phase::Green => "green",
            Phase::Refactor => "refactor",
            Phase::Sync => "sync",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spec" => Ok(Phase::Spec),
            "red" => Ok(Phase::Red),
            "green" => Ok(Phase::Green),
            "refactor" => Ok(Phase::Refactor),
            "sync" => Ok(Phase::Sync),
            _ => anyhow::bail!(
                "Invalid phase '{}'. Valid values: spec, red, green, refactor, sync",
                s
            ),
        }
    }
}

/// Static per-phase scheduling tuning.
///
/// Created once when a scheduler is constructed and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseParameters {
    /// Soft wall-clock budget for all hooks in this phase
    pub max_total_time_ms: f64,
    /// Fraction of the context token budget reserved for this phase
    pub token_budget_ratio: f64,
    /// Per-priority score multipliers applied by the phase-aware strategy
    pub priority_weights: HashMap<HookPriority, f64>,
    /// Whether this phase favors parallel hook execution
    pub prefer_parallel: bool,
}

impl PhaseParameters {
    /// Look up the weight multiplier for a priority, defaulting to 1.0.
    pub fn weight_for(&self, priority: HookPriority) -> f64 {
        self.priority_weights.get(&priority).copied().unwrap_or(1.0)
    }

    /// Default tuning for a single phase.
    pub fn for_phase(phase: Phase) -> Self {
        let weights = |c: f64, h: f64, n: f64, l: f64| {
            HashMap::from([
                (HookPriority::Critical, c),
                (HookPriority::High, h),
                (HookPriority::Normal, n),
                (HookPriority::Low, l),
            ])
        };

        match phase {
            Phase::Spec => Self {
                max_total_time_ms: 3000.0,
                token_budget_ratio: 0.25,
                priority_weights: weights(2.0, 1.5, 1.0, 0.5),
                prefer_parallel: false,
            },
            Phase::Red => Self {
                max_total_time_ms: 2500.0,
                token_budget_ratio: 0.20,
                priority_weights: weights(2.0, 1.4, 1.0, 0.6),
                prefer_parallel: true,
            },
            Phase::Green => Self {
                max_total_time_ms: 5000.0,
                token_budget_ratio: 0.30,
                priority_weights: weights(2.0, 1.5, 1.1, 0.5),
                prefer_parallel: true,
            },
            Phase::Refactor => Self {
                max_total_time_ms: 4000.0,
                token_budget_ratio: 0.25,
                priority_weights: weights(1.8, 1.3, 1.0, 0.7),
                prefer_parallel: true,
            },
            Phase::Sync => Self {
                max_total_time_ms: 1500.0,
                token_budget_ratio: 0.15,
                priority_weights: weights(2.0, 1.2, 0.8, 0.4),
                prefer_parallel: false,
            },
        }
    }

    /// Build the full default parameter table.
    pub fn table() -> HashMap<Phase, PhaseParameters> {
        Phase::all()
            .iter()
            .map(|p| (*p, PhaseParameters::for_phase(*p)))
            .collect()
    }
}

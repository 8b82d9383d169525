//! Per-call scheduling context.

use crate::hooks::HookEvent;
use crate::phase::Phase;
use serde::{Deserialize, Serialize};

/// Immutable input describing one scheduling call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingContext {
    /// The lifecycle event being scheduled
    pub event: HookEvent,
    /// The current development phase
    pub phase: Phase,
    /// Opaque user input, used only as a sizing/relevance signal
    #[serde(default)]
    pub user_input: String,
    /// Tokens available to hooks in this cycle
    pub available_token_budget: u32,
    /// Wall-clock budget for this cycle
    pub max_execution_time_ms: f64,
    /// Current system load (0..1)
    #[serde(default = "default_system_load")]
    pub system_load: f64,
}

fn default_system_load() -> f64 {
    0.5
}

impl SchedulingContext {
    /// Create a context with default budgets for an event and phase.
    pub fn new(event: HookEvent, phase: Phase) -> Self {
        Self {
            event,
            phase,
            user_input: String::new(),
            available_token_budget: 8000,
            max_execution_time_ms: 5000.0,
            system_load: default_system_load(),
        }
    }

    /// Set the user input signal.
    pub fn with_user_input(mut self, input: impl Into<String>) -> Self {
        self.user_input = input.into();
        self
    }

    /// Set the available token budget.
    pub fn with_token_budget(mut self, budget: u32) -> Self {
        self.available_token_budget = budget;
        self
    }

    /// Set the wall-clock budget.
    pub fn with_max_execution_time(mut self, time_ms: f64) -> Self {
        self.max_execution_time_ms = time_ms;
        self
    }

    /// Set the current system load, clamped to 0..1.
    pub fn with_system_load(mut self, load: f64) -> Self {
        self.system_load = load.clamp(0.0, 1.0);
        self
    }
}

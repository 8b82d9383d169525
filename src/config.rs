//! Scheduler configuration and named tunables.
//!
//! Every threshold the scheduling pipeline consults is a named field here,
//! loadable from a TOML file. Defaults match observed production behavior;
//! all of them are tunable, none are contracts.
//!
//! ```toml
//! default_strategy = "phase_optimized"
//! adaptive_selection = true
//! low_token_threshold = 2000
//! tight_time_threshold_ms = 300.0
//! max_parallel_groups = 3
//! ```

use crate::errors::SchedulerError;
use crate::scheduler::SchedulingStrategy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable configuration for a [`HookScheduler`](crate::scheduler::HookScheduler).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Strategy used when no selection rule fires
    #[serde(default)]
    pub default_strategy: SchedulingStrategy,

    /// When false, strategy selection always returns the default strategy
    #[serde(default = "default_true")]
    pub adaptive_selection: bool,

    /// Token budgets below this select the token-efficient strategy
    #[serde(default = "default_low_token_threshold")]
    pub low_token_threshold: u32,

    /// Time budgets below this select the performance-first strategy
    #[serde(default = "default_tight_time_threshold_ms")]
    pub tight_time_threshold_ms: f64,

    /// System load above this selects the priority-first strategy
    #[serde(default = "default_high_load_threshold")]
    pub high_load_threshold: f64,

    /// Phase relevance below this inflates a hook's cost estimate
    #[serde(default = "default_relevance_low")]
    pub relevance_low: f64,

    /// Phase relevance at or above this discounts a hook's cost estimate
    #[serde(default = "default_relevance_high")]
    pub relevance_high: f64,

    /// Cost multiplier for low-relevance hooks
    #[serde(default = "default_low_relevance_penalty")]
    pub low_relevance_penalty: f64,

    /// Cost multiplier for high-relevance hooks
    #[serde(default = "default_high_relevance_discount")]
    pub high_relevance_discount: f64,

    /// System load above this applies the contention cost factor
    #[serde(default = "default_load_overhead_threshold")]
    pub load_overhead_threshold: f64,

    /// Cost multiplier under load contention
    #[serde(default = "default_load_contention_factor")]
    pub load_contention_factor: f64,

    /// Hooks below this phase relevance are skipped outright
    #[serde(default = "default_relevance_floor")]
    pub relevance_floor: f64,

    /// Hooks below this historical success rate are deferred
    #[serde(default = "default_reliability_floor")]
    pub reliability_floor: f64,

    /// System load above this defers non-critical hooks
    #[serde(default = "default_load_defer_threshold")]
    pub load_defer_threshold: f64,

    /// Maximum parallel execution groups in one plan
    #[serde(default = "default_max_parallel_groups")]
    pub max_parallel_groups: usize,

    /// Smoothing factor for strategy-performance moving averages
    #[serde(default = "default_ema_alpha")]
    pub ema_alpha: f64,

    /// Number of recent schedule records retained for statistics
    #[serde(default = "default_recent_history")]
    pub recent_history: usize,
}

fn default_true() -> bool {
    true
}

fn default_low_token_threshold() -> u32 {
    2000
}

fn default_tight_time_threshold_ms() -> f64 {
    300.0
}

fn default_high_load_threshold() -> f64 {
    0.85
}

fn default_relevance_low() -> f64 {
    0.3
}

fn default_relevance_high() -> f64 {
    0.7
}

fn default_low_relevance_penalty() -> f64 {
    1.5
}

fn default_high_relevance_discount() -> f64 {
    0.7
}

fn default_load_overhead_threshold() -> f64 {
    0.8
}

fn default_load_contention_factor() -> f64 {
    1.3
}

fn default_relevance_floor() -> f64 {
    0.2
}

fn default_reliability_floor() -> f64 {
    0.3
}

fn default_load_defer_threshold() -> f64 {
    0.9
}

fn default_max_parallel_groups() -> usize {
    3
}

fn default_ema_alpha() -> f64 {
    0.3
}

fn default_recent_history() -> usize {
    20
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_strategy: SchedulingStrategy::default(),
            adaptive_selection: true,
            low_token_threshold: default_low_token_threshold(),
            tight_time_threshold_ms: default_tight_time_threshold_ms(),
            high_load_threshold: default_high_load_threshold(),
            relevance_low: default_relevance_low(),
            relevance_high: default_relevance_high(),
            low_relevance_penalty: default_low_relevance_penalty(),
            high_relevance_discount: default_high_relevance_discount(),
            load_overhead_threshold: default_load_overhead_threshold(),
            load_contention_factor: default_load_contention_factor(),
            relevance_floor: default_relevance_floor(),
            reliability_floor: default_reliability_floor(),
            load_defer_threshold: default_load_defer_threshold(),
            max_parallel_groups: default_max_parallel_groups(),
            ema_alpha: default_ema_alpha(),
            recent_history: default_recent_history(),
        }
    }
}

impl SchedulerConfig {
    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, SchedulerError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(path).map_err(|source| SchedulerError::ConfigReadFailed {
                path: path.to_path_buf(),
                source,
            })?;

        toml::from_str(&content).map_err(|source| SchedulerError::ConfigParseFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Set the default strategy.
    pub fn with_default_strategy(mut self, strategy: SchedulingStrategy) -> Self {
        self.default_strategy = strategy;
        self
    }

    /// Enable or disable adaptive strategy selection.
    pub fn with_adaptive_selection(mut self, enabled: bool) -> Self {
        self.adaptive_selection = enabled;
        self
    }

    /// Set the maximum number of parallel groups per plan.
    pub fn with_max_parallel_groups(mut self, max: usize) -> Self {
        self.max_parallel_groups = max;
        self
    }

    /// Set the EMA smoothing factor.
    pub fn with_ema_alpha(mut self, alpha: f64) -> Self {
        self.ema_alpha = alpha.clamp(0.0, 1.0);
        self
    }
}

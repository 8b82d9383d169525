//! Phase-optimized hook scheduler for multi-phase development orchestration.
//!
//! This crate decides, for a lifecycle event and development phase, which
//! registered hooks run, in what order, and whether they run in parallel or
//! sequentially — under hard constraints on token budget, wall-clock time,
//! and system load. It does not execute hooks itself: the execution engine
//! consumes the [`SchedulingResult`] this crate produces.
//!
//! # Pipeline
//!
//! For one call to [`HookScheduler::schedule_hooks`]:
//!
//! 1. A [`SchedulingStrategy`] is selected from the context.
//! 2. Each candidate hook gets a cost/time estimate and a priority score.
//! 3. The admission engine assigns an initial execute/defer/skip decision.
//! 4. The constraint filter defers hooks that blow the aggregate budget.
//! 5. Admitted hooks are topologically ordered and batched into
//!    parallel/sequential execution groups.
//! 6. Group order is optimized for time-to-first-completion, and the
//!    outcome is recorded in the adaptive strategy-performance tracker.
//!
//! [`SchedulingResult`]: scheduler::SchedulingResult
//! [`SchedulingStrategy`]: scheduler::SchedulingStrategy
//! [`HookScheduler::schedule_hooks`]: scheduler::HookScheduler::schedule_hooks

pub mod config;
pub mod errors;
pub mod hooks;
pub mod phase;
pub mod scheduler;

// Re-exports for convenience
pub use config::SchedulerConfig;
pub use errors::SchedulerError;
pub use hooks::{
    HookAdmission, HookEvent, HookMetadata, HookPriority, HookRegistry, RegisteredHook,
    StaticRegistry,
};
pub use phase::{Phase, PhaseParameters};
pub use scheduler::{
    ExecutionGroup, GroupExecutionMode, HookScheduler, ScheduledHook, SchedulingContext,
    SchedulingResult, SchedulingStrategy,
};

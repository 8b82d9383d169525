//! Hook types and the registry seam.
//!
//! The scheduler treats hooks as opaque units of auxiliary work described
//! by [`HookMetadata`]. It never executes them: it consumes metadata from a
//! [`HookRegistry`] and emits admission decisions and execution groups for
//! the external execution engine.
//!
//! # Hook Events
//!
//! - `PrePhase` / `PostPhase` - around phase execution
//! - `PreIteration` / `PostIteration` - around each iteration
//! - `OnFailure` - when a phase exceeds its budget
//! - `OnApproval` - when an approval gate is presented

pub mod registry;
pub mod types;

// Re-exports for convenience
pub use registry::{HookRegistry, StaticRegistry};
pub use types::{HookAdmission, HookEvent, HookMetadata, HookPriority, RegisteredHook};

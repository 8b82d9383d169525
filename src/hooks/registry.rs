//! The registry seam between the scheduler and the hook execution engine.
//!
//! The scheduler never owns hook definitions; it asks a [`HookRegistry`]
//! for the candidates registered against an event. The registry may be
//! backed by configuration files, a daemon, or anything else — the only
//! in-crate implementation is [`StaticRegistry`], an in-memory map used
//! for construction-time wiring and tests.

use super::types::{HookEvent, HookMetadata, RegisteredHook};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Source of candidate hooks for a scheduling call.
#[async_trait]
pub trait HookRegistry: Send + Sync {
    /// Return the hooks registered for an event. May be empty.
    async fn hooks_for_event(&self, event: HookEvent) -> Result<Vec<RegisteredHook>>;
}

/// In-memory hook registry.
#[derive(Debug, Default)]
pub struct StaticRegistry {
    hooks: HashMap<HookEvent, Vec<RegisteredHook>>,
}

impl StaticRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook for an event.
    pub fn register(
        &mut self,
        event: HookEvent,
        hook_id: impl Into<String>,
        metadata: HookMetadata,
    ) {
        self.hooks
            .entry(event)
            .or_default()
            .push(RegisteredHook::new(hook_id, metadata));
    }

    /// Total number of registered hooks across all events.
    pub fn hook_count(&self) -> usize {
        self.hooks.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl HookRegistry for StaticRegistry {
    async fn hooks_for_event(&self, event: HookEvent) -> Result<Vec<RegisteredHook>> {
        Ok(self.hooks.get(&event).cloned().unwrap_or_default())
    }
}

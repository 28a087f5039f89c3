use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionState {
    Enabled,
    Busy,
    Disabled,
}

/// State of the swap action for the current intent.
///
/// Every intent gets a new generation. Disabling is recorded against a generation,
/// so a submission finishing after its intent has been replaced leaves the new
/// intent enabled. The busy flag is only ever held through a [`BusyGuard`].
#[derive(Debug)]
pub struct ActionSurface {
    busy: AtomicBool,
    generation: AtomicU64,
    disabled_generation: AtomicU64,
}

impl Default for ActionSurface {
    fn default() -> Self {
        Self {
            busy: AtomicBool::new(false),
            generation: AtomicU64::new(1),
            disabled_generation: AtomicU64::new(0),
        }
    }
}

impl ActionSurface {
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled_generation.load(Ordering::SeqCst) == self.generation()
    }

    /// True once `generation`, or an intent delivered after it, has been disabled
    pub fn is_disabled_at(&self, generation: u64) -> bool {
        self.disabled_generation.load(Ordering::SeqCst) >= generation
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> ActionState {
        if self.is_disabled() {
            ActionState::Disabled
        } else if self.is_busy() {
            ActionState::Busy
        } else {
            ActionState::Enabled
        }
    }

    /// Start tracking a new intent and return its generation
    pub fn reset(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Disable the action for `generation`. Has no visible effect if that
    /// generation is no longer the current one.
    pub fn disable(&self, generation: u64) {
        self.disabled_generation.fetch_max(generation, Ordering::SeqCst);
    }

    /// Take the busy flag unless the action is disabled or already running
    pub fn try_acquire(&self) -> Option<BusyGuard<'_>> {
        if self.is_disabled() {
            return None;
        }

        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| BusyGuard { surface: self })
    }
}

#[derive(Debug)]
pub struct BusyGuard<'a> {
    surface: &'a ActionSurface,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.surface.busy.store(false, Ordering::SeqCst);
    }
}

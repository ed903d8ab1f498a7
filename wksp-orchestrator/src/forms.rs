//! Multi-tab form validity gating.
//!
//! Each editor tab registers a validity handle as it renders; actions that
//! span tabs (create, configure runtime) ask the registry whether any of the
//! tabs they depend on currently reports invalid. A tab that never
//! registered is treated as valid: not yet rendered means not blocking.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const TAB_SETTINGS: &str = "settings";
pub const TAB_RUNTIME: &str = "runtime";
pub const TAB_STACKS: &str = "stacks";

/// Shared validity flag for one form. The owning UI section flips it as the
/// user types; the registry only ever reads it.
#[derive(Debug, Clone)]
pub struct FormHandle {
    invalid: Arc<AtomicBool>,
}

impl FormHandle {
    /// A handle reporting valid.
    pub fn valid() -> Self {
        Self {
            invalid: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A handle reporting invalid.
    pub fn invalid() -> Self {
        Self {
            invalid: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn set_valid(&self, valid: bool) {
        self.invalid.store(!valid, Ordering::Relaxed);
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid.load(Ordering::Relaxed)
    }
}

impl Default for FormHandle {
    fn default() -> Self {
        Self::valid()
    }
}

/// Registry of per-tab validity handles.
#[derive(Debug, Default)]
pub struct FormRegistry {
    forms: HashMap<String, FormHandle>,
}

impl FormRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the handle for a tab; re-registration replaces the old handle.
    pub fn register(&mut self, tab_id: impl Into<String>, handle: FormHandle) {
        self.forms.insert(tab_id.into(), handle);
    }

    /// True iff any named tab has a registered handle reporting invalid.
    pub fn is_any_invalid(&self, tab_ids: &[&str]) -> bool {
        tab_ids
            .iter()
            .any(|tab_id| self.forms.get(*tab_id).is_some_and(|f| f.is_invalid()))
    }

    /// Whether the create action is currently blocked.
    ///
    /// Checks the settings and runtime tabs; when no predefined stack is
    /// selected the custom-recipe path is active, so the stacks tab must
    /// validate too.
    pub fn is_create_blocked(&self, stack_selected: bool) -> bool {
        if stack_selected {
            self.is_any_invalid(&[TAB_SETTINGS, TAB_RUNTIME])
        } else {
            self.is_any_invalid(&[TAB_SETTINGS, TAB_RUNTIME, TAB_STACKS])
        }
    }

    /// Whether runtime configuration is currently blocked.
    pub fn is_runtime_blocked(&self, stack_selected: bool) -> bool {
        !stack_selected && self.is_any_invalid(&[TAB_STACKS])
    }
}

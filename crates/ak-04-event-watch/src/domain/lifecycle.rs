//! Filter lifecycle state machine.
//!
//! ```text
//! Created ──start──→ Running ──stop──→ Stopped ──start──→ Running
//!    │                  │                 │
//!    └──────────────────┴──uninstall──────┴──→ Uninstalled (terminal)
//! ```

use std::fmt;

use crate::error::WatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterLifecycle {
    #[default]
    Created,
    Running,
    Stopped,
    Uninstalled,
}

/// What a `start()` call should do from the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartAction {
    Start,
    AlreadyRunning,
}

impl FilterLifecycle {
    pub fn is_running(&self) -> bool {
        matches!(self, FilterLifecycle::Running)
    }

    pub fn is_uninstalled(&self) -> bool {
        matches!(self, FilterLifecycle::Uninstalled)
    }

    pub fn on_start(&self) -> Result<StartAction, WatchError> {
        match self {
            FilterLifecycle::Uninstalled => Err(WatchError::Uninstalled),
            FilterLifecycle::Running => Ok(StartAction::AlreadyRunning),
            FilterLifecycle::Created | FilterLifecycle::Stopped => Ok(StartAction::Start),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterLifecycle::Created => "created",
            FilterLifecycle::Running => "running",
            FilterLifecycle::Stopped => "stopped",
            FilterLifecycle::Uninstalled => "uninstalled",
        }
    }
}

impl fmt::Display for FilterLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

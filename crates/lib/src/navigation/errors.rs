//! Error types for the navigation module.

use std::time::Duration;

use thiserror::Error;

use super::ContextId;

/// Errors that can occur while coordinating navigation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NavigationError {
    /// A context's root page cannot be popped.
    #[error("Cannot pop the root page of context {context}")]
    CannotPopRootPage { context: ContextId },

    /// `pop_modal` was called while no modal is presented.
    #[error("No modal is presented")]
    NoModalPresented,

    /// The context named by the platform is not on the context stack.
    #[error("Unknown navigation context: {0}")]
    UnknownContext(ContextId),

    /// The caller stopped waiting; the navigation change itself is not undone.
    #[error("Transition did not finish within {timeout:?}")]
    TransitionTimedOut { timeout: Duration },

    /// The UI loop has shut down.
    #[error("Navigation UI loop is not running")]
    Stopped,

    /// A message could not be delivered to the UI loop.
    #[error("Failed to send command to the navigation UI loop: {0}")]
    CommandSend(String),

    /// A background or spawned task failed (panicked or was aborted).
    #[error("Navigation task failed: {0}")]
    TaskFailed(String),

    /// The navigator was created outside of a tokio runtime.
    #[error("A tokio runtime is required to create a navigator: {0}")]
    NoRuntime(String),
}

impl NavigationError {
    /// Check if the UI loop can no longer be reached.
    pub fn is_stopped(&self) -> bool {
        matches!(
            self,
            NavigationError::Stopped | NavigationError::CommandSend(_)
        )
    }

    /// Check if this is a caller-side timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, NavigationError::TransitionTimedOut { .. })
    }

    /// Check if the requested change was refused because the stack state forbids it.
    pub fn is_invalid_state(&self) -> bool {
        matches!(
            self,
            NavigationError::CannotPopRootPage { .. }
                | NavigationError::NoModalPresented
                | NavigationError::UnknownContext(_)
        )
    }
}

impl From<NavigationError> for crate::Error {
    fn from(err: NavigationError) -> Self {
        crate::Error::Navigation(err)
    }
}

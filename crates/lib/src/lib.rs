//!
//! Pagestack: a navigation coordinator for stack-based, page-oriented user interfaces.
//!
//! ## Core Concepts
//!
//! * **Pages (`view::Page`)**: A displayable screen bound to a view-model. Pages are produced
//!   by a [`view::ViewLocator`] and owned by whichever navigation context holds them.
//! * **Navigation contexts (`navigation::NavigationContext`)**: One back-stack of pages. The
//!   root context always exists; presenting a modal *with its own stack* adds another one.
//! * **Context stack**: The ordered collection of live contexts. The last one is active and
//!   receives every page push and pop.
//! * **Navigator (`navigation::Navigator`)**: The cloneable handle callers use. Every
//!   operation returns a [`transition::Completion`] that resolves once the platform reports
//!   the transition finished.
//! * **Platform (`platform::Platform`)**: The UI toolkit glue that actually draws and
//!   animates. It is only ever called from the UI loop.
//!
//! View resolution runs on tokio's blocking pool; every mutation of navigation state and
//! every platform call happens on the single UI loop task.

pub mod config;
pub mod navigation;
pub mod platform;
pub mod splice;
pub mod transition;
pub mod view;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::NavigatorConfig;
pub use navigation::{
    ContextId, ModalKind, ModalPopped, NavigationSnapshot, Navigator, PoppedPage, UiLoop,
};
pub use platform::{Platform, PlatformHandle};
pub use transition::{Completion, Transition, TransitionDone};
pub use view::{Page, PageId, PageViewModel, View, ViewLocator, ViewRegistry};

/// Result type used throughout the Pagestack library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Pagestack library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured view resolution errors from the view module
    #[error(transparent)]
    View(view::ViewError),

    /// Index violations from the splice module
    #[error(transparent)]
    Splice(splice::SpliceError),

    /// Structured navigation errors from the navigation module
    #[error(transparent)]
    Navigation(navigation::NavigationError),

    /// Configuration errors from the config module
    #[error(transparent)]
    Config(config::ConfigError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::View(_) => "view",
            Error::Splice(_) => "splice",
            Error::Navigation(_) => "navigation",
            Error::Config(_) => "config",
        }
    }

    /// Check if this error means no page could be produced for a view-model.
    ///
    /// Covers both a missing registration and a registration that produced something
    /// other than a page.
    pub fn is_resolution_error(&self) -> bool {
        matches!(self, Error::View(_))
    }

    /// Check if this error is a missing view registration.
    pub fn is_not_registered(&self) -> bool {
        match self {
            Error::View(view_err) => view_err.is_not_registered(),
            _ => false,
        }
    }

    /// Check if the resolver returned something that is not a page.
    pub fn is_type_mismatch(&self) -> bool {
        match self {
            Error::View(view_err) => view_err.is_type_mismatch(),
            _ => false,
        }
    }

    /// Check if this error is a caller bug (an invalid index for back-stack surgery).
    pub fn is_precondition_error(&self) -> bool {
        matches!(self, Error::Splice(_))
    }

    /// Check if this error is navigation-related.
    pub fn is_navigation_error(&self) -> bool {
        matches!(self, Error::Navigation(_))
    }

    /// Check if this error means the UI loop is no longer running.
    pub fn is_stopped(&self) -> bool {
        match self {
            Error::Navigation(nav_err) => nav_err.is_stopped(),
            _ => false,
        }
    }

    /// Check if the navigation state refused the operation (root page, no modal).
    pub fn is_invalid_state(&self) -> bool {
        match self {
            Error::Navigation(nav_err) => nav_err.is_invalid_state(),
            _ => false,
        }
    }

    /// Check if this error is a caller-side transition timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Navigation(nav_err) => nav_err.is_timeout(),
            _ => false,
        }
    }

    /// Check if this error is configuration-related.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

//! The seam between the navigator and a UI toolkit.
//!
//! A [`Platform`] draws and animates. The navigator owns the navigation model and tells the
//! platform what changed; the platform reports back when each transition is over through
//! the [`TransitionDone`] token it was given, and reports pops it performed on its own
//! (back button, swipe gesture) through a [`PlatformHandle`].

use tokio::sync::mpsc;
use tracing::debug;

use crate::{
    Result,
    navigation::{ContextId, NavigationError, PlatformEvent},
    transition::{Transition, TransitionDone},
    view::Page,
};

/// Rendering and animation primitives of a UI toolkit.
///
/// Every method is called from the UI loop only, one call at a time.
pub trait Platform: Send + 'static {
    /// Perform `transition`, animated or not, and call [`TransitionDone::finish`] once it
    /// is over. Finishing may happen synchronously inside this call or later from any
    /// thread. A token that is never finished stalls the operation that started it.
    fn perform_transition(&mut self, transition: Transition, animate: bool, done: TransitionDone);

    /// Replace the pages of `context` without a visible transition.
    ///
    /// Used when a push resets the stack and for back-stack surgery.
    fn set_pages(&mut self, context: ContextId, pages: &[Page]);
}

/// Lets a platform report navigation the user performed directly.
#[derive(Debug, Clone)]
pub struct PlatformHandle {
    events: mpsc::UnboundedSender<PlatformEvent>,
}

impl PlatformHandle {
    pub(crate) fn new(events: mpsc::UnboundedSender<PlatformEvent>) -> Self {
        Self { events }
    }

    /// Report that the top page of `context` was popped by the user.
    ///
    /// The pop already happened on screen, so no transition is requested: the navigator
    /// drops the page from its model and publishes it on the popped-page stream.
    pub fn page_popped_interactively(&self, context: ContextId) -> Result<()> {
        debug!(%context, "Interactive pop reported");
        self.events
            .send(PlatformEvent::InteractivePop { context })
            .map_err(|e| NavigationError::CommandSend(e.to_string()))?;
        Ok(())
    }
}

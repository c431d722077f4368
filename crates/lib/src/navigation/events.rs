//! Navigation events published to subscribers.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;

use super::{ContextId, ModalKind, context::PopHook};
use crate::{
    Result,
    view::{Page, PageViewModel},
};

/// A page that left a navigation context through a pop.
#[derive(Debug, Clone)]
pub struct PoppedPage {
    /// The context the page was popped from
    pub context: ContextId,
    /// The page that was popped
    pub page: Page,
}

impl PoppedPage {
    /// The view-model of the popped page.
    pub fn view_model(&self) -> Option<&Arc<dyn PageViewModel>> {
        self.page.view_model()
    }
}

/// A modal dismissal that finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalPopped {
    pub kind: ModalKind,
}

/// Subscribers of one event stream.
///
/// Every subscriber owns an unbounded queue, so a slow reader never loses events. Queues
/// whose receiver was dropped are pruned on the next publish.
pub(crate) struct Subscribers<T> {
    senders: Arc<Mutex<Vec<mpsc::UnboundedSender<T>>>>,
}

impl<T> Clone for Subscribers<T> {
    fn clone(&self) -> Self {
        Self {
            senders: Arc::clone(&self.senders),
        }
    }
}

impl<T: Clone> Subscribers<T> {
    pub(crate) fn new() -> Self {
        Self {
            senders: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register a subscriber. It receives every event published from now on.
    pub(crate) fn subscribe(&self) -> mpsc::UnboundedReceiver<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().push(tx);
        rx
    }

    /// Deliver `event` to every live subscriber.
    pub(crate) fn publish(&self, event: &T) {
        self.lock().retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<mpsc::UnboundedSender<T>>> {
        self.senders.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Forwards one context's pops onto the navigator-wide popped-page stream.
///
/// One of these is attached to every context when it joins the context stack, which is
/// what merges all contexts that ever existed into a single stream.
pub(crate) struct ForwardingHook {
    subscribers: Subscribers<PoppedPage>,
}

impl ForwardingHook {
    pub(crate) fn new(subscribers: Subscribers<PoppedPage>) -> Self {
        Self { subscribers }
    }
}

impl PopHook for ForwardingHook {
    fn on_page_popped(&self, popped: &PoppedPage) -> Result<()> {
        self.subscribers.publish(popped);
        Ok(())
    }
}

//! Bridging platform transitions into single-shot completions.
//!
//! A platform transition reports that it finished through a callback. Here that callback is
//! a [`TransitionDone`] token: the platform receives one per transition and calls
//! [`TransitionDone::finish`] when the animation (or the immediate update) is over.
//! `finish` consumes the token, so a transition can report at most once.
//!
//! The UI loop keeps a [`TransitionBridge`] holding one pending continuation per
//! transition. Finishing a token queues its id back to the loop, which takes the
//! continuation out of the bridge and runs it. A token dropped without `finish` leaves its
//! continuation pending forever: the operation that started it never completes.

use std::{
    collections::HashMap,
    fmt,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use tokio::{runtime::Handle, sync::mpsc, time::Instant};
use tracing::{trace, warn};

use crate::{
    Result,
    navigation::{ContextId, ModalView, NavigationError, PlatformEvent},
    view::Page,
};

/// A visible change the platform is asked to perform.
#[derive(Debug, Clone)]
pub enum Transition {
    /// Push `page` on top of `context`.
    Push { context: ContextId, page: Page },
    /// Pop the top page of `context`; `page` is the page leaving the screen.
    Pop { context: ContextId, page: Page },
    /// Present `modal` over the `host` context.
    Present { host: ContextId, modal: ModalView },
    /// Dismiss `modal`, which was presented over the `host` context.
    Dismiss { host: ContextId, modal: ModalView },
}

impl Transition {
    /// Short name of the transition kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Transition::Push { .. } => "push",
            Transition::Pop { .. } => "pop",
            Transition::Present { .. } => "present",
            Transition::Dismiss { .. } => "dismiss",
        }
    }
}

/// Identifier of one in-flight transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(u64);

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The "did finish" callback handed to the platform with every transition.
///
/// Call [`finish`](Self::finish) exactly when the transition is over. It may be called
/// from any thread, including synchronously from inside
/// [`Platform::perform_transition`](crate::Platform::perform_transition).
#[must_use = "a transition that is never finished never completes"]
pub struct TransitionDone {
    id: TransitionId,
    events: mpsc::UnboundedSender<PlatformEvent>,
    finished: bool,
}

impl TransitionDone {
    pub fn id(&self) -> TransitionId {
        self.id
    }

    /// Report that the transition finished.
    pub fn finish(mut self) {
        self.finished = true;
        trace!(transition = %self.id, "Transition finished");
        // A closed channel means the UI loop is gone; nobody is left to notify.
        let _ = self.events.send(PlatformEvent::TransitionFinished(self.id));
    }
}

impl fmt::Debug for TransitionDone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionDone")
            .field("id", &self.id)
            .finish()
    }
}

impl Drop for TransitionDone {
    fn drop(&mut self) {
        if !self.finished {
            warn!(
                transition = %self.id,
                "Transition callback dropped without finishing; its operation will never complete"
            );
        }
    }
}

/// Pending continuations keyed by transition, owned by the UI loop.
pub(crate) struct TransitionBridge<C> {
    next_id: u64,
    pending: HashMap<TransitionId, C>,
    events: mpsc::UnboundedSender<PlatformEvent>,
}

impl<C> TransitionBridge<C> {
    pub(crate) fn new(events: mpsc::UnboundedSender<PlatformEvent>) -> Self {
        Self {
            next_id: 0,
            pending: HashMap::new(),
            events,
        }
    }

    /// Register `continuation` and mint the token for its transition.
    pub(crate) fn begin(&mut self, continuation: C) -> TransitionDone {
        let id = TransitionId(self.next_id);
        self.next_id += 1;
        self.pending.insert(id, continuation);
        TransitionDone {
            id,
            events: self.events.clone(),
            finished: false,
        }
    }

    /// Take the continuation for a finished transition.
    ///
    /// Returns `None` for ids that are unknown or already completed.
    pub(crate) fn complete(&mut self, id: TransitionId) -> Option<C> {
        self.pending.remove(&id)
    }

    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// The asynchronous result of a navigation operation.
///
/// The operation is already running when a `Completion` is handed out; dropping it only
/// discards interest in the outcome, it never stops the navigation change.
#[must_use = "dropping a Completion does not cancel the operation, but its error is lost"]
pub struct Completion {
    inner: Pin<Box<dyn Future<Output = Result<()>> + Send>>,
}

impl Completion {
    /// Spawn `operation` on `runtime` and wrap its outcome.
    ///
    /// With a `timeout`, the completion fails with
    /// [`NavigationError::TransitionTimedOut`] once that much time has passed since this
    /// call. The operation itself keeps running.
    pub(crate) fn spawn<F>(runtime: &Handle, operation: F, timeout: Option<Duration>) -> Self
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        let task = runtime.spawn(operation);
        let deadline = timeout.map(|t| (Instant::now() + t, t));

        let inner = async move {
            let joined = match deadline {
                Some((deadline, timeout)) => tokio::time::timeout_at(deadline, task)
                    .await
                    .map_err(|_| NavigationError::TransitionTimedOut { timeout })?,
                None => task.await,
            };
            joined.map_err(|e| NavigationError::TaskFailed(e.to_string()))?
        };

        Self {
            inner: Box::pin(inner),
        }
    }
}

impl Future for Completion {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion").finish_non_exhaustive()
    }
}

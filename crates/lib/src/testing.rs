//! Platforms for driving a navigator without a UI toolkit.
//!
//! Enabled with the `testing` feature.
//!
//! - [`ImmediatePlatform`] finishes every transition as soon as it is requested.
//! - [`ManualPlatform`] holds every transition until the test finishes it, so tests
//!   control finish order and can simulate stalled transitions.
//!
//! Both are cheap to clone; clones share their recordings.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

use crate::{
    navigation::ContextId,
    platform::Platform,
    transition::{Transition, TransitionDone},
    view::{Page, PageId},
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One call to [`Platform::set_pages`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetPagesCall {
    pub context: ContextId,
    pub pages: Vec<PageId>,
}

#[derive(Debug, Default)]
struct Recording {
    transitions: Vec<(Transition, bool)>,
    set_pages: Vec<SetPagesCall>,
}

impl Recording {
    fn set_pages(&mut self, context: ContextId, pages: &[Page]) {
        self.set_pages.push(SetPagesCall {
            context,
            pages: pages.iter().map(Page::id).collect(),
        });
    }
}

/// Finishes each transition synchronously, inside `perform_transition`.
#[derive(Debug, Clone, Default)]
pub struct ImmediatePlatform {
    recording: Arc<Mutex<Recording>>,
}

impl ImmediatePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every transition performed so far, with its `animate` flag.
    pub fn transitions(&self) -> Vec<(Transition, bool)> {
        lock(&self.recording).transitions.clone()
    }

    /// Kinds of the transitions performed so far, in order.
    pub fn transition_kinds(&self) -> Vec<&'static str> {
        lock(&self.recording)
            .transitions
            .iter()
            .map(|(t, _)| t.kind())
            .collect()
    }

    pub fn set_pages_calls(&self) -> Vec<SetPagesCall> {
        lock(&self.recording).set_pages.clone()
    }
}

impl Platform for ImmediatePlatform {
    fn perform_transition(&mut self, transition: Transition, animate: bool, done: TransitionDone) {
        lock(&self.recording).transitions.push((transition, animate));
        done.finish();
    }

    fn set_pages(&mut self, context: ContextId, pages: &[Page]) {
        lock(&self.recording).set_pages(context, pages);
    }
}

#[derive(Debug, Default)]
struct ManualState {
    pending: Vec<(Transition, TransitionDone)>,
    recording: Recording,
}

/// Holds transitions until the test finishes them.
#[derive(Debug, Clone, Default)]
pub struct ManualPlatform {
    state: Arc<Mutex<ManualState>>,
    requested: Arc<Notify>,
}

impl ManualPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of transitions requested and not finished or dropped yet.
    pub fn pending_len(&self) -> usize {
        lock(&self.state).pending.len()
    }

    /// Kinds of the pending transitions, oldest first.
    pub fn pending_kinds(&self) -> Vec<&'static str> {
        lock(&self.state)
            .pending
            .iter()
            .map(|(t, _)| t.kind())
            .collect()
    }

    /// Wait until at least `count` transitions are pending.
    pub async fn wait_for_pending(&self, count: usize) {
        loop {
            let notified = self.requested.notified();
            tokio::pin!(notified);
            // Register before checking so a request in between is not missed
            notified.as_mut().enable();

            if self.pending_len() >= count {
                return;
            }
            notified.await;
        }
    }

    /// Finish the oldest pending transition. Returns `false` if none is pending.
    pub fn finish_next(&self) -> bool {
        self.finish(0)
    }

    /// Finish the pending transition at `index` (0 is the oldest).
    ///
    /// Returns `false` if there is no such transition.
    pub fn finish(&self, index: usize) -> bool {
        let token = {
            let mut state = lock(&self.state);
            if index >= state.pending.len() {
                return false;
            }
            state.pending.remove(index).1
        };
        token.finish();
        true
    }

    /// Finish every pending transition, oldest first. Returns how many were finished.
    pub fn finish_all(&self) -> usize {
        let pending: Vec<_> = lock(&self.state).pending.drain(..).collect();
        let count = pending.len();
        for (_, token) in pending {
            token.finish();
        }
        count
    }

    /// Drop the pending transition at `index` without finishing it, as a platform that
    /// cancelled an animation would.
    pub fn abandon(&self, index: usize) -> bool {
        let token = {
            let mut state = lock(&self.state);
            if index >= state.pending.len() {
                return false;
            }
            state.pending.remove(index).1
        };
        drop(token);
        true
    }

    /// Every transition requested so far, with its `animate` flag.
    pub fn transitions(&self) -> Vec<(Transition, bool)> {
        lock(&self.state).recording.transitions.clone()
    }

    pub fn transition_kinds(&self) -> Vec<&'static str> {
        lock(&self.state)
            .recording
            .transitions
            .iter()
            .map(|(t, _)| t.kind())
            .collect()
    }

    pub fn set_pages_calls(&self) -> Vec<SetPagesCall> {
        lock(&self.state).recording.set_pages.clone()
    }
}

impl Platform for ManualPlatform {
    fn perform_transition(&mut self, transition: Transition, animate: bool, done: TransitionDone) {
        {
            let mut state = lock(&self.state);
            state
                .recording
                .transitions
                .push((transition.clone(), animate));
            state.pending.push((transition, done));
        }
        self.requested.notify_waiters();
    }

    fn set_pages(&mut self, context: ContextId, pages: &[Page]) {
        lock(&self.state).recording.set_pages(context, pages);
    }
}

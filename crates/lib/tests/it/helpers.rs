use std::{sync::Arc, time::Duration};

use pagestack::{
    PageViewModel, PoppedPage, View, ViewRegistry,
    navigation::{ContextSnapshot, NavigationSnapshot},
};
use tokio::sync::mpsc::{self, error::TryRecvError};

// Re-export TestContext for convenience
pub use crate::context::TestContext;

/// How long a test waits for something that should happen promptly.
pub const PROMPT: Duration = Duration::from_secs(5);

/// How long a test waits before deciding something did not happen.
pub const QUIET: Duration = Duration::from_millis(100);

/// A screen view-model, registered with a page view by [`test_registry`].
#[derive(Debug)]
pub struct Screen {
    id: String,
}

impl PageViewModel for Screen {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A view-model nothing is registered for.
#[derive(Debug)]
pub struct Unregistered;

impl PageViewModel for Unregistered {
    fn id(&self) -> &str {
        "unregistered"
    }
}

/// A view-model whose registration produces a view that is not a page.
#[derive(Debug)]
pub struct Headline;

impl PageViewModel for Headline {
    fn id(&self) -> &str {
        "headline"
    }
}

pub struct Banner;

impl View for Banner {}

pub fn screen(id: &str) -> Arc<dyn PageViewModel> {
    Arc::new(Screen { id: id.to_string() })
}

pub fn test_registry() -> ViewRegistry {
    let mut registry = ViewRegistry::new();
    registry
        .register_page::<Screen>(None, "ScreenPage")
        .register_page::<Screen>(Some("compact"), "CompactScreenPage")
        .register::<Headline, _>(None, || Box::new(Banner));
    registry
}

/// View-model ids of a context's pages, bottom to top.
pub fn page_ids(context: &ContextSnapshot) -> Vec<String> {
    context
        .pages
        .iter()
        .map(|p| p.view_model.clone().unwrap_or_default())
        .collect()
}

/// View-model ids of the active context's pages.
pub fn active_ids(snapshot: &NavigationSnapshot) -> Vec<String> {
    page_ids(snapshot.active().expect("context stack is never empty"))
}

/// View-model id of a popped page.
pub fn popped_id(popped: &PoppedPage) -> String {
    popped
        .view_model()
        .map(|vm| vm.id().to_string())
        .expect("popped page has a view-model")
}

/// Receive the next event or fail the test.
pub async fn next_event<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> T {
    tokio::time::timeout(PROMPT, rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

/// Assert no event is waiting.
pub fn assert_no_event<T: std::fmt::Debug>(rx: &mut mpsc::UnboundedReceiver<T>) {
    match rx.try_recv() {
        Err(TryRecvError::Empty) => {}
        other => panic!("expected no event, got {other:?}"),
    }
}

/// Take every event already waiting.
pub fn drain_events<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> Vec<T> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}

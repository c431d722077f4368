//! A platform that draws nothing and logs every request.

use std::time::Duration;

use pagestack::{ContextId, Page, Platform, Transition, TransitionDone};
use tracing::info;

/// Finishes animated transitions after `delay`, everything else at once.
#[derive(Debug, Clone)]
pub struct LoggingPlatform {
    delay: Duration,
}

impl LoggingPlatform {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Platform for LoggingPlatform {
    fn perform_transition(&mut self, transition: Transition, animate: bool, done: TransitionDone) {
        match &transition {
            Transition::Push { context, page } | Transition::Pop { context, page } => info!(
                kind = transition.kind(),
                %context,
                view_type = page.view_type(),
                title = page.title().unwrap_or_default(),
                animate,
                "Performing transition"
            ),
            Transition::Present { host, modal } | Transition::Dismiss { host, modal } => info!(
                kind = transition.kind(),
                %host,
                modal = ?modal.kind(),
                animate,
                "Performing transition"
            ),
        }

        if !animate || self.delay.is_zero() {
            done.finish();
            return;
        }

        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            done.finish();
        });
    }

    fn set_pages(&mut self, context: ContextId, pages: &[Page]) {
        let titles: Vec<&str> = pages.iter().filter_map(Page::title).collect();
        info!(%context, ?titles, "Replacing pages");
    }
}

//! Test context for navigator setup.
//!
//! Provides a composable `TestContext` that owns a running navigator together with the
//! test platform driving it, so tests can both navigate and inspect what the platform saw.

use std::sync::Arc;

use pagestack::{
    Navigator, NavigatorConfig, NavigationSnapshot, Platform,
    testing::{ImmediatePlatform, ManualPlatform},
};

use crate::helpers::{active_ids, screen, test_registry};

/// A running navigator and a handle on its platform.
///
/// - `TestContext::new()` - transitions finish immediately
/// - `TestContext::manual()` - transitions finish when the test says so
/// - `.with_pages(&[...])` - pushes initial pages onto the root context
pub struct TestContext<P> {
    navigator: Navigator,
    platform: P,
}

impl TestContext<ImmediatePlatform> {
    pub fn new() -> Self {
        Self::with_config(NavigatorConfig::default())
    }

    pub fn with_config(config: NavigatorConfig) -> Self {
        Self::start(config, ImmediatePlatform::new())
    }

    /// Push `ids` onto the root context, in order.
    pub async fn with_pages(self, ids: &[&str]) -> Self {
        for id in ids {
            self.navigator
                .push_page(screen(id), None, false, false)
                .await
                .expect("Failed to push initial page");
        }
        self
    }
}

impl TestContext<ManualPlatform> {
    pub fn manual() -> Self {
        Self::manual_with_config(NavigatorConfig::default())
    }

    pub fn manual_with_config(config: NavigatorConfig) -> Self {
        Self::start(config, ManualPlatform::new())
    }

    /// Push `ids` onto the root context, finishing each transition.
    pub async fn with_pages(self, ids: &[&str]) -> Self {
        for id in ids {
            let push = self.navigator.push_page(screen(id), None, false, false);
            self.platform.wait_for_pending(1).await;
            assert!(self.platform.finish_next());
            push.await.expect("Failed to push initial page");
        }
        self
    }
}

impl<P: Platform + Clone> TestContext<P> {
    fn start(config: NavigatorConfig, platform: P) -> Self {
        let navigator = Navigator::start(config, Arc::new(test_registry()), platform.clone())
            .expect("Failed to start navigator");
        Self {
            navigator,
            platform,
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub async fn snapshot(&self) -> NavigationSnapshot {
        self.navigator
            .snapshot()
            .await
            .expect("Failed to read snapshot")
    }

    /// View-model ids of the active context's pages.
    pub async fn active_ids(&self) -> Vec<String> {
        active_ids(&self.snapshot().await)
    }
}

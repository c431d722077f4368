//! Navigation coordination.
//!
//! A [`Navigator`] is a cheap, cloneable handle. Each operation runs in two stages: view
//! resolution on tokio's blocking pool, then a command to the [`UiLoop`], which
//! mutates the context stack and drives the platform. The [`Completion`] returned to the
//! caller resolves once the platform reports the transition finished.
//!
//! ## Example
//!
//! ```rust,no_run
//! # use std::sync::Arc;
//! # use pagestack::{ContextId, Navigator, NavigatorConfig, Page, PageViewModel, Platform};
//! # use pagestack::{Transition, TransitionDone, ViewRegistry};
//! # #[derive(Debug)] struct Home;
//! # impl PageViewModel for Home { fn id(&self) -> &str { "home" } }
//! # struct Toolkit;
//! # impl Platform for Toolkit {
//! #     fn perform_transition(&mut self, _: Transition, _: bool, done: TransitionDone) { done.finish() }
//! #     fn set_pages(&mut self, _: ContextId, _: &[Page]) {}
//! # }
//! # async fn example() -> pagestack::Result<()> {
//! let mut registry = ViewRegistry::new();
//! registry.register_page::<Home>(None, "HomePage");
//!
//! let navigator = Navigator::start(NavigatorConfig::default(), Arc::new(registry), Toolkit)?;
//! navigator.push_page(Arc::new(Home), None, false, true).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::{
    runtime::Handle,
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tracing::debug;

mod context;
mod errors;
mod events;
mod snapshot;
mod ui_loop;

pub use context::{ContextId, ModalKind, ModalView, NavigationContext, PopHook, PopHookCollection};
pub use errors::NavigationError;
pub use events::{ModalPopped, PoppedPage};
pub use snapshot::{ContextSnapshot, NavigationSnapshot, PageSnapshot};
pub(crate) use ui_loop::PlatformEvent;
pub use ui_loop::UiLoop;

use events::Subscribers;
use ui_loop::UiCommand;

use crate::{
    Result,
    config::NavigatorConfig,
    platform::{Platform, PlatformHandle},
    transition::Completion,
    view::{self, Page, PageViewModel, ViewLocator},
};

/// Handle for driving navigation.
///
/// Clones share the same UI loop and event streams. The loop stops after
/// [`shutdown`](Self::shutdown) or when the last handle is dropped.
#[derive(Clone)]
pub struct Navigator {
    commands: mpsc::Sender<UiCommand>,
    platform_events: mpsc::UnboundedSender<PlatformEvent>,
    locator: Arc<dyn ViewLocator>,
    runtime: Handle,
    page_popped: Subscribers<PoppedPage>,
    modal_popped: Subscribers<ModalPopped>,
    config: Arc<NavigatorConfig>,
}

impl Navigator {
    /// Create a navigator and the UI loop that serves it.
    ///
    /// The loop does nothing until [`UiLoop::run`] is awaited. Use this when the loop must
    /// run on a particular thread; otherwise prefer [`Navigator::start`].
    ///
    /// # Errors
    /// - [`ConfigError`](crate::config::ConfigError) if `config` is invalid
    /// - [`NavigationError::NoRuntime`] outside of a tokio runtime
    pub fn new(
        config: NavigatorConfig,
        locator: Arc<dyn ViewLocator>,
        platform: impl Platform,
    ) -> Result<(Self, UiLoop)> {
        config.validate()?;
        let runtime =
            Handle::try_current().map_err(|e| NavigationError::NoRuntime(e.to_string()))?;

        let (command_tx, command_rx) = mpsc::channel(config.command_buffer);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let page_popped = Subscribers::new();
        let modal_popped = Subscribers::new();

        let ui_loop = UiLoop::new(
            Box::new(platform),
            command_rx,
            event_rx,
            event_tx.clone(),
            page_popped.clone(),
            modal_popped.clone(),
            NavigationContext::new(),
            config.animate_modals,
        );

        let navigator = Self {
            commands: command_tx,
            platform_events: event_tx,
            locator,
            runtime,
            page_popped,
            modal_popped,
            config: Arc::new(config),
        };

        Ok((navigator, ui_loop))
    }

    /// Create a navigator and spawn its UI loop on the current tokio runtime.
    pub fn start(
        config: NavigatorConfig,
        locator: Arc<dyn ViewLocator>,
        platform: impl Platform,
    ) -> Result<Self> {
        let (navigator, ui_loop) = Self::new(config, locator, platform)?;
        navigator.runtime.spawn(ui_loop.run());
        Ok(navigator)
    }

    /// Push a page for `view_model` onto the active context.
    ///
    /// With `reset_stack`, every page of the active context is discarded first.
    ///
    /// # Errors
    /// Resolution errors fail the completion before anything is mutated.
    pub fn push_page(
        &self,
        view_model: Arc<dyn PageViewModel>,
        contract: Option<&str>,
        reset_stack: bool,
        animate: bool,
    ) -> Completion {
        debug!(view_model = view_model.id(), ?contract, reset_stack, animate, "push_page");
        let resolve = self.resolve_in_background(view_model, contract);
        let commands = self.commands.clone();

        self.spawn(async move {
            let page = resolve
                .await
                .map_err(|e| NavigationError::TaskFailed(e.to_string()))??;
            request(&commands, |response| UiCommand::PushPage {
                page,
                reset_stack,
                animate,
                response,
            })
            .await?
        })
    }

    /// Pop the top page of the active context.
    ///
    /// Once the transition finishes the popped page is published on
    /// [`page_popped`](Self::page_popped), before this completion resolves.
    ///
    /// # Errors
    /// [`NavigationError::CannotPopRootPage`] when only the root page is left.
    pub fn pop_page(&self, animate: bool) -> Completion {
        debug!(animate, "pop_page");
        let commands = self.commands.clone();
        self.spawn(async move {
            request(&commands, |response| UiCommand::PopPage { animate, response }).await?
        })
    }

    /// Present a page for `view_model` modally.
    ///
    /// With `with_own_stack`, the page becomes the root of a new navigation context. That
    /// context becomes active only once the presentation has finished.
    pub fn push_modal(
        &self,
        view_model: Arc<dyn PageViewModel>,
        contract: Option<&str>,
        with_own_stack: bool,
    ) -> Completion {
        debug!(view_model = view_model.id(), ?contract, with_own_stack, "push_modal");
        let resolve = self.resolve_in_background(view_model, contract);
        let commands = self.commands.clone();

        self.spawn(async move {
            let page = resolve
                .await
                .map_err(|e| NavigationError::TaskFailed(e.to_string()))??;
            request(&commands, |response| UiCommand::PushModal {
                page,
                with_own_stack,
                response,
            })
            .await?
        })
    }

    /// Dismiss the most recently presented modal.
    ///
    /// Emits on [`modal_popped`](Self::modal_popped) when the dismissal finishes. If the
    /// modal owned a navigation context, that context leaves the stack.
    ///
    /// # Errors
    /// [`NavigationError::NoModalPresented`] when nothing is presented.
    pub fn pop_modal(&self) -> Completion {
        debug!("pop_modal");
        let commands = self.commands.clone();
        self.spawn(async move { request(&commands, |response| UiCommand::PopModal { response }).await? })
    }

    /// Insert a page for `view_model` at `index` of the active context, without a
    /// transition.
    ///
    /// The view is resolved on the calling task.
    ///
    /// # Errors
    /// - Resolution errors, with nothing mutated
    /// - [`SpliceError`](crate::splice::SpliceError) when `index` is greater than the
    ///   number of pages
    pub async fn insert_page(
        &self,
        index: usize,
        view_model: Arc<dyn PageViewModel>,
        contract: Option<&str>,
    ) -> Result<()> {
        debug!(index, view_model = view_model.id(), ?contract, "insert_page");
        let page = view::resolve_page(self.locator.as_ref(), &view_model, contract)?;
        request(&self.commands, |response| UiCommand::InsertPage {
            index,
            page,
            response,
        })
        .await?
    }

    /// Remove the page at `index` of the active context, without a transition.
    ///
    /// Removed pages are not published on [`page_popped`](Self::page_popped).
    ///
    /// # Errors
    /// [`SpliceError`](crate::splice::SpliceError) when `index` is not a valid position.
    pub async fn remove_page(&self, index: usize) -> Result<()> {
        debug!(index, "remove_page");
        request(&self.commands, |response| UiCommand::RemovePage {
            index,
            response,
        })
        .await?
    }

    /// Subscribe to pops from every navigation context, in transition finish order.
    ///
    /// Only pops that finish after subscribing are received. None are ever dropped: the
    /// queue is unbounded, so drop the receiver once it is no longer read.
    pub fn page_popped(&self) -> mpsc::UnboundedReceiver<PoppedPage> {
        self.page_popped.subscribe()
    }

    /// Subscribe to finished modal dismissals.
    pub fn modal_popped(&self) -> mpsc::UnboundedReceiver<ModalPopped> {
        self.modal_popped.subscribe()
    }

    /// Read the current navigation state from the UI loop.
    pub async fn snapshot(&self) -> Result<NavigationSnapshot> {
        request(&self.commands, |response| UiCommand::Snapshot { response }).await
    }

    /// Stop the UI loop.
    ///
    /// Operations still waiting on a transition fail with [`NavigationError::Stopped`].
    pub async fn shutdown(&self) -> Result<()> {
        self.commands
            .send(UiCommand::Shutdown)
            .await
            .map_err(|e| NavigationError::CommandSend(e.to_string()))?;
        Ok(())
    }

    /// Handle the platform uses to report pops performed by the user.
    pub fn platform_handle(&self) -> PlatformHandle {
        PlatformHandle::new(self.platform_events.clone())
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Run view resolution on the blocking pool.
    fn resolve_in_background(
        &self,
        view_model: Arc<dyn PageViewModel>,
        contract: Option<&str>,
    ) -> JoinHandle<Result<Page>> {
        let locator = Arc::clone(&self.locator);
        let contract = contract.map(str::to_string);
        self.runtime.spawn_blocking(move || {
            view::resolve_page(locator.as_ref(), &view_model, contract.as_deref())
        })
    }

    fn spawn<F>(&self, operation: F) -> Completion
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        Completion::spawn(&self.runtime, operation, self.config.transition_timeout())
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("config", &self.config)
            .field("page_popped_subscribers", &self.page_popped.len())
            .field("modal_popped_subscribers", &self.modal_popped.len())
            .finish_non_exhaustive()
    }
}

/// Send a command built around a fresh response channel and wait for the answer.
async fn request<T>(
    commands: &mpsc::Sender<UiCommand>,
    build: impl FnOnce(oneshot::Sender<T>) -> UiCommand,
) -> Result<T> {
    let (tx, rx) = oneshot::channel();
    commands
        .send(build(tx))
        .await
        .map_err(|e| NavigationError::CommandSend(e.to_string()))?;

    // The loop dropped the response: it stopped before answering
    rx.await.map_err(|_| NavigationError::Stopped.into())
}

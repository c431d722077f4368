//! The UI loop: sole owner of navigation state.
//!
//! Every mutation of the context stack and every platform call happens here, one message
//! at a time, so navigation state needs no locking. Transitions do not block the loop: each one
//! registers a continuation in the [`TransitionBridge`] and the loop keeps serving
//! commands until the platform reports the finish.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{Instrument, debug, info, info_span, trace, warn};

use super::{
    ContextId, ModalKind, ModalPopped, ModalView, NavigationContext, NavigationError, PoppedPage,
    events::{ForwardingHook, Subscribers},
    snapshot::{ContextSnapshot, NavigationSnapshot},
};
use crate::{
    Result,
    platform::Platform,
    transition::{Transition, TransitionBridge, TransitionDone, TransitionId},
    view::Page,
};

type Response = oneshot::Sender<Result<()>>;

/// Commands sent to the UI loop by [`Navigator`](super::Navigator) handles.
pub(crate) enum UiCommand {
    /// Push an already resolved page onto the active context
    PushPage {
        page: Page,
        reset_stack: bool,
        animate: bool,
        response: Response,
    },
    /// Pop the top page of the active context
    PopPage { animate: bool, response: Response },
    /// Present an already resolved page modally
    PushModal {
        page: Page,
        with_own_stack: bool,
        response: Response,
    },
    /// Dismiss the topmost modal
    PopModal { response: Response },
    /// Insert a page into the active context without a transition
    InsertPage {
        index: usize,
        page: Page,
        response: Response,
    },
    /// Remove a page from the active context without a transition
    RemovePage { index: usize, response: Response },
    /// Read the current state
    Snapshot {
        response: oneshot::Sender<NavigationSnapshot>,
    },
    /// Stop the loop
    Shutdown,
}

// Manual Debug impl: oneshot senders carry no useful state and pages are summarized by
// their view type.
impl std::fmt::Debug for UiCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PushPage {
                page,
                reset_stack,
                animate,
                ..
            } => f
                .debug_struct("PushPage")
                .field("view_type", &page.view_type())
                .field("reset_stack", reset_stack)
                .field("animate", animate)
                .finish(),
            Self::PopPage { animate, .. } => {
                f.debug_struct("PopPage").field("animate", animate).finish()
            }
            Self::PushModal {
                page,
                with_own_stack,
                ..
            } => f
                .debug_struct("PushModal")
                .field("view_type", &page.view_type())
                .field("with_own_stack", with_own_stack)
                .finish(),
            Self::PopModal { .. } => write!(f, "PopModal"),
            Self::InsertPage { index, page, .. } => f
                .debug_struct("InsertPage")
                .field("index", index)
                .field("view_type", &page.view_type())
                .finish(),
            Self::RemovePage { index, .. } => {
                f.debug_struct("RemovePage").field("index", index).finish()
            }
            Self::Snapshot { .. } => write!(f, "Snapshot"),
            Self::Shutdown => write!(f, "Shutdown"),
        }
    }
}

/// Messages the platform side sends back to the UI loop.
#[derive(Debug)]
pub(crate) enum PlatformEvent {
    /// A transition token was finished
    TransitionFinished(TransitionId),
    /// The user popped the top page of a context directly
    InteractivePop { context: ContextId },
}

/// A modal currently on screen.
#[derive(Debug, Clone)]
struct ModalRecord {
    host: ContextId,
    view: ModalView,
}

/// What to do once a transition finishes.
enum Continuation {
    PagePushed {
        response: Response,
    },
    PagePopped {
        popped: PoppedPage,
        hooks: super::context::PopHookCollection,
        response: Response,
    },
    ModalPresented {
        record: ModalRecord,
        context: Option<NavigationContext>,
        response: Response,
    },
    ModalDismissed {
        record: ModalRecord,
        response: Response,
    },
}

/// The single serialized execution context for navigation state.
///
/// Obtained from [`Navigator::new`](super::Navigator::new). Drive it with [`run`](Self::run)
/// on whichever task or thread is the UI thread of the application, or let
/// [`Navigator::start`](super::Navigator::start) spawn it.
pub struct UiLoop {
    platform: Box<dyn Platform>,
    root: NavigationContext,
    modal_contexts: Vec<NavigationContext>,
    modals: Vec<ModalRecord>,
    bridge: TransitionBridge<Continuation>,
    commands: mpsc::Receiver<UiCommand>,
    platform_events: mpsc::UnboundedReceiver<PlatformEvent>,
    page_popped: Subscribers<PoppedPage>,
    modal_popped: Subscribers<ModalPopped>,
    animate_modals: bool,
}

impl UiLoop {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        platform: Box<dyn Platform>,
        commands: mpsc::Receiver<UiCommand>,
        platform_events: mpsc::UnboundedReceiver<PlatformEvent>,
        platform_events_tx: mpsc::UnboundedSender<PlatformEvent>,
        page_popped: Subscribers<PoppedPage>,
        modal_popped: Subscribers<ModalPopped>,
        root: NavigationContext,
        animate_modals: bool,
    ) -> Self {
        let mut root = root;
        root.add_pop_hook(Arc::new(ForwardingHook::new(page_popped.clone())));

        Self {
            platform,
            root,
            modal_contexts: Vec::new(),
            modals: Vec::new(),
            bridge: TransitionBridge::new(platform_events_tx),
            commands,
            platform_events,
            page_popped,
            modal_popped,
            animate_modals,
        }
    }

    /// Process commands and platform events until shutdown.
    ///
    /// Returns after [`Navigator::shutdown`](super::Navigator::shutdown) or once every
    /// navigator handle has been dropped. Operations still waiting for a transition then
    /// fail with [`NavigationError::Stopped`].
    pub async fn run(mut self) {
        async move {
            info!(root = %self.root.id(), "Starting navigation UI loop");

            loop {
                tokio::select! {
                    // Finishes first, so a completion never waits behind newer commands
                    biased;

                    Some(event) = self.platform_events.recv() => {
                        self.handle_platform_event(event);
                    }

                    command = self.commands.recv() => match command {
                        Some(UiCommand::Shutdown) | None => {
                            info!(
                                pending_transitions = self.bridge.pending_len(),
                                "Navigation UI loop shutting down"
                            );
                            break;
                        }
                        Some(command) => self.handle_command(command),
                    },
                }
            }
        }
        .instrument(info_span!("ui_loop"))
        .await
    }

    fn active(&self) -> &NavigationContext {
        self.modal_contexts.last().unwrap_or(&self.root)
    }

    fn active_mut(&mut self) -> &mut NavigationContext {
        self.modal_contexts.last_mut().unwrap_or(&mut self.root)
    }

    fn context_mut(&mut self, id: ContextId) -> Option<&mut NavigationContext> {
        if self.root.id() == id {
            return Some(&mut self.root);
        }
        self.modal_contexts.iter_mut().find(|c| c.id() == id)
    }

    fn handle_command(&mut self, command: UiCommand) {
        debug!(?command, "Handling navigation command");

        match command {
            UiCommand::PushPage {
                page,
                reset_stack,
                animate,
                response,
            } => self.push_page(page, reset_stack, animate, response),

            UiCommand::PopPage { animate, response } => self.pop_page(animate, response),

            UiCommand::PushModal {
                page,
                with_own_stack,
                response,
            } => self.push_modal(page, with_own_stack, response),

            UiCommand::PopModal { response } => self.pop_modal(response),

            UiCommand::InsertPage {
                index,
                page,
                response,
            } => {
                let result = self.insert_page(index, page);
                let _ = response.send(result);
            }

            UiCommand::RemovePage { index, response } => {
                let result = self.remove_page(index);
                let _ = response.send(result);
            }

            UiCommand::Snapshot { response } => {
                let _ = response.send(self.snapshot());
            }

            // Handled by the loop itself
            UiCommand::Shutdown => {}
        }
    }

    fn handle_platform_event(&mut self, event: PlatformEvent) {
        match event {
            PlatformEvent::TransitionFinished(id) => match self.bridge.complete(id) {
                Some(continuation) => self.finish(continuation),
                None => warn!(transition = %id, "Ignoring finish of unknown or already finished transition"),
            },
            PlatformEvent::InteractivePop { context } => self.interactive_pop(context),
        }
    }

    /// Hand `transition` to the platform with a fresh token for `continuation`.
    fn begin_transition(
        &mut self,
        transition: Transition,
        animate: bool,
        continuation: Continuation,
    ) {
        let done: TransitionDone = self.bridge.begin(continuation);
        trace!(transition = %done.id(), kind = transition.kind(), animate, "Starting transition");
        self.platform.perform_transition(transition, animate, done);
    }

    fn push_page(&mut self, page: Page, reset_stack: bool, animate: bool, response: Response) {
        let context = self.active_mut();
        let context_id = context.id();

        if reset_stack {
            debug!(context = %context_id, discarded = context.len(), "Resetting page stack");
            context.clear();
        }
        context.push(page.clone());

        if reset_stack {
            self.platform.set_pages(context_id, &[]);
        }
        self.begin_transition(
            Transition::Push {
                context: context_id,
                page,
            },
            animate,
            Continuation::PagePushed { response },
        );
    }

    fn pop_page(&mut self, animate: bool, response: Response) {
        let context = self.active_mut();
        let context_id = context.id();

        let Some(page) = context.pop() else {
            let _ = response.send(Err(NavigationError::CannotPopRootPage {
                context: context_id,
            }
            .into()));
            return;
        };
        let hooks = context.pop_hooks().clone();

        self.begin_transition(
            Transition::Pop {
                context: context_id,
                page: page.clone(),
            },
            animate,
            Continuation::PagePopped {
                popped: PoppedPage {
                    context: context_id,
                    page,
                },
                hooks,
                response,
            },
        );
    }

    fn push_modal(&mut self, page: Page, with_own_stack: bool, response: Response) {
        let host = self.active().id();

        let (view, context) = if with_own_stack {
            let context = NavigationContext::with_root(page.clone());
            let view = ModalView::Stack {
                context: context.id(),
                root: page,
            };
            (view, Some(context))
        } else {
            (ModalView::Page(page), None)
        };

        let record = ModalRecord {
            host,
            view: view.clone(),
        };
        self.begin_transition(
            Transition::Present { host, modal: view },
            self.animate_modals,
            Continuation::ModalPresented {
                record,
                context,
                response,
            },
        );
    }

    fn pop_modal(&mut self, response: Response) {
        let Some(record) = self.modals.pop() else {
            let _ = response.send(Err(NavigationError::NoModalPresented.into()));
            return;
        };

        let modal = self.on_screen(&record.view);
        self.begin_transition(
            Transition::Dismiss { host: record.host, modal },
            self.animate_modals,
            Continuation::ModalDismissed { record, response },
        );
    }

    /// `view` as it is now: a modal context's root may have been replaced since it was
    /// presented.
    fn on_screen(&self, view: &ModalView) -> ModalView {
        match view {
            ModalView::Stack { context, root } => {
                let root = self
                    .modal_contexts
                    .iter()
                    .find(|c| c.id() == *context)
                    .and_then(|c| c.pages().first())
                    .unwrap_or(root);
                ModalView::Stack {
                    context: *context,
                    root: root.clone(),
                }
            }
            ModalView::Page(_) => view.clone(),
        }
    }

    fn insert_page(&mut self, index: usize, page: Page) -> Result<()> {
        let context = self.active_mut();
        context.insert_page(index, page)?;
        let context_id = context.id();
        let pages = context.pages().to_vec();
        self.platform.set_pages(context_id, &pages);
        Ok(())
    }

    fn remove_page(&mut self, index: usize) -> Result<()> {
        let context = self.active_mut();
        let removed = context.remove_page(index)?;
        let context_id = context.id();
        let pages = context.pages().to_vec();
        debug!(context = %context_id, page = %removed.id(), index, "Removed page");
        self.platform.set_pages(context_id, &pages);
        Ok(())
    }

    fn interactive_pop(&mut self, context_id: ContextId) {
        let Some(context) = self.context_mut(context_id) else {
            warn!(context = %context_id, "Interactive pop reported for unknown context");
            return;
        };
        let Some(page) = context.pop() else {
            warn!(context = %context_id, "Interactive pop reported on a root page; ignoring");
            return;
        };

        let popped = PoppedPage {
            context: context_id,
            page,
        };
        let _ = context.pop_hooks().execute_hooks(&popped);
    }

    fn finish(&mut self, continuation: Continuation) {
        match continuation {
            Continuation::PagePushed { response } => {
                let _ = response.send(Ok(()));
            }

            Continuation::PagePopped {
                popped,
                hooks,
                response,
            } => {
                // Subscribers see the pop before the caller's completion resolves
                let _ = hooks.execute_hooks(&popped);
                let _ = response.send(Ok(()));
            }

            Continuation::ModalPresented {
                record,
                context,
                response,
            } => {
                if let Some(mut context) = context {
                    context.add_pop_hook(Arc::new(ForwardingHook::new(self.page_popped.clone())));
                    debug!(context = %context.id(), depth = self.modal_contexts.len() + 2, "Context joined the stack");
                    self.modal_contexts.push(context);
                }
                self.modals.push(record);
                let _ = response.send(Ok(()));
            }

            Continuation::ModalDismissed { record, response } => {
                let kind = record.view.kind();
                if let ModalView::Stack { context, .. } = record.view {
                    self.remove_modal_context(context);
                }
                self.modal_popped.publish(&ModalPopped { kind });
                let _ = response.send(Ok(()));
            }
        }
    }

    fn remove_modal_context(&mut self, id: ContextId) {
        match self.modal_contexts.iter().position(|c| c.id() == id) {
            Some(index) => {
                if index + 1 != self.modal_contexts.len() {
                    warn!(context = %id, "Dismissed context was not the active one");
                }
                self.modal_contexts.remove(index);
                debug!(context = %id, depth = self.modal_contexts.len() + 1, "Context left the stack");
            }
            None => warn!(context = %id, "Dismissed context is not on the stack"),
        }
    }

    fn snapshot(&self) -> NavigationSnapshot {
        let contexts = std::iter::once(&self.root)
            .chain(self.modal_contexts.iter())
            .map(ContextSnapshot::of)
            .collect();
        let modals: Vec<ModalKind> = self.modals.iter().map(|m| m.view.kind()).collect();

        NavigationSnapshot {
            contexts,
            modals,
            pending_transitions: self.bridge.pending_len(),
        }
    }
}

impl std::fmt::Debug for UiLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiLoop")
            .field("root", &self.root.id())
            .field("depth", &(self.modal_contexts.len() + 1))
            .field("modals", &self.modals.len())
            .field("pending_transitions", &self.bridge.pending_len())
            .finish()
    }
}

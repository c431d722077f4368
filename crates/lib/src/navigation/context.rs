//! Navigation contexts and their pop notifications.

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::events::PoppedPage;
use crate::{
    Result,
    splice,
    view::{Page, PageId},
};

/// Identity of a [`NavigationContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextId(Uuid);

impl ContextId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a modal presentation put on screen.
#[derive(Debug, Clone)]
pub enum ModalView {
    /// A single page, presented without a back-stack of its own.
    Page(Page),
    /// A new navigation context. `root` is its first page when the transition starts.
    Stack { context: ContextId, root: Page },
}

impl ModalView {
    pub fn kind(&self) -> ModalKind {
        match self {
            ModalView::Page(_) => ModalKind::Plain,
            ModalView::Stack { .. } => ModalKind::WithStack,
        }
    }
}

/// Whether a modal owns a navigation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalKind {
    Plain,
    WithStack,
}

/// Receives the pops of one navigation context.
///
/// Hooks run on the UI loop right after the pop transition finished, in finish order.
pub trait PopHook: Send + Sync {
    /// Called once per page popped from the context.
    fn on_page_popped(&self, popped: &PoppedPage) -> Result<()>;
}

/// The pop listeners attached to a context.
#[derive(Clone, Default)]
pub struct PopHookCollection {
    hooks: Vec<Arc<dyn PopHook>>,
}

impl PopHookCollection {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    pub fn add_hook(&mut self, hook: Arc<dyn PopHook>) {
        self.hooks.push(hook);
    }

    /// Run every hook in registration order.
    ///
    /// A failing hook does not stop the others; the first error is returned.
    pub fn execute_hooks(&self, popped: &PoppedPage) -> Result<()> {
        let mut first_error = None;

        for hook in &self.hooks {
            if let Err(e) = hook.on_page_popped(popped) {
                tracing::error!(context = %popped.context, "Pop hook failed: {e}");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl fmt::Debug for PopHookCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopHookCollection")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

/// One back-stack of pages.
///
/// The last page is the one on screen. Only the UI loop mutates a context.
#[derive(Debug)]
pub struct NavigationContext {
    id: ContextId,
    pages: Vec<Page>,
    pop_hooks: PopHookCollection,
}

impl NavigationContext {
    /// An empty context, like the root one at startup.
    pub fn new() -> Self {
        Self {
            id: ContextId::generate(),
            pages: Vec::new(),
            pop_hooks: PopHookCollection::new(),
        }
    }

    /// A context whose back-stack starts with `root`.
    pub fn with_root(root: Page) -> Self {
        let mut context = Self::new();
        context.pages.push(root);
        context
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn top(&self) -> Option<&Page> {
        self.pages.last()
    }

    pub fn contains(&self, page: PageId) -> bool {
        self.pages.iter().any(|p| p.id() == page)
    }

    pub fn pop_hooks(&self) -> &PopHookCollection {
        &self.pop_hooks
    }

    pub fn add_pop_hook(&mut self, hook: Arc<dyn PopHook>) {
        self.pop_hooks.add_hook(hook);
    }

    pub(crate) fn push(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Remove the top page unless it is the root page.
    pub(crate) fn pop(&mut self) -> Option<Page> {
        if self.pages.len() < 2 {
            return None;
        }
        self.pages.pop()
    }

    /// Drop every page. Back-stack history is lost.
    pub(crate) fn clear(&mut self) {
        self.pages.clear();
    }

    pub(crate) fn insert_page(&mut self, index: usize, page: Page) -> Result<()> {
        self.pages = splice::insert_at(&self.pages, page, index)?;
        Ok(())
    }

    pub(crate) fn remove_page(&mut self, index: usize) -> Result<Page> {
        let removed = self
            .pages
            .get(index)
            .cloned()
            .ok_or(splice::SpliceError::IndexOutOfBounds {
                index,
                len: self.pages.len(),
            })?;
        self.pages = splice::remove_at(&self.pages, index)?;
        Ok(removed)
    }
}

impl Default for NavigationContext {
    fn default() -> Self {
        Self::new()
    }
}

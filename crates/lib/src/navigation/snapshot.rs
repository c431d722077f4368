//! Point-in-time views of the navigation state.

use serde::{Deserialize, Serialize};

use super::{ContextId, ModalKind, NavigationContext};
use crate::view::{Page, PageId};

/// One page as seen in a [`NavigationSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub id: PageId,
    pub view_type: String,
    pub title: Option<String>,
    /// `id()` of the bound view-model, if any
    pub view_model: Option<String>,
}

impl PageSnapshot {
    fn of(page: &Page) -> Self {
        Self {
            id: page.id(),
            view_type: page.view_type().to_string(),
            title: page.title().map(str::to_string),
            view_model: page.view_model().map(|vm| vm.id().to_string()),
        }
    }
}

/// One context as seen in a [`NavigationSnapshot`]. Pages are listed bottom to top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub id: ContextId,
    pub pages: Vec<PageSnapshot>,
}

impl ContextSnapshot {
    pub(crate) fn of(context: &NavigationContext) -> Self {
        Self {
            id: context.id(),
            pages: context.pages().iter().map(PageSnapshot::of).collect(),
        }
    }

    /// View types of the pages, bottom to top.
    pub fn view_types(&self) -> Vec<&str> {
        self.pages.iter().map(|p| p.view_type.as_str()).collect()
    }
}

/// The context stack and modal stack at one moment on the UI loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationSnapshot {
    /// Root first, active last. Never empty.
    pub contexts: Vec<ContextSnapshot>,
    /// Presented modals, oldest first
    pub modals: Vec<ModalKind>,
    /// Transitions handed to the platform that have not finished yet
    pub pending_transitions: usize,
}

impl NavigationSnapshot {
    /// Number of live navigation contexts.
    pub fn depth(&self) -> usize {
        self.contexts.len()
    }

    pub fn root(&self) -> Option<&ContextSnapshot> {
        self.contexts.first()
    }

    /// The context that receives page pushes and pops.
    pub fn active(&self) -> Option<&ContextSnapshot> {
        self.contexts.last()
    }
}

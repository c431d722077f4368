//! View resolution and page decoration.
//!
//! A [`ViewLocator`] maps a view-model (plus an optional contract string) to a [`View`].
//! Only views that convert into a [`Page`] can be navigated to. [`resolve_page`] is the
//! whole resolution stage of a push: locate, bind the view-model, apply the title.

use std::{
    any::{TypeId, type_name},
    collections::HashMap,
    fmt,
    sync::Arc,
};

use tracing::trace;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod errors;

pub use errors::ViewError;

/// The logical screen a page displays.
///
/// View-models are supplied by the caller and outlive any page built for them; pages hold
/// an `Arc` to their view-model, never the reverse.
pub trait PageViewModel: fmt::Debug + Send + Sync + 'static {
    /// Identifier of the screen. Doubles as the resource key for the page title.
    fn id(&self) -> &str;

    /// Runtime type used to look up registrations.
    fn view_model_type(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Human readable type name, used in error messages.
    fn type_name(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// Anything a [`ViewLocator`] may hand back.
///
/// A locator is free to produce objects that are not pages (headers, cells, overlays...).
/// Those fail with [`ViewError::NotAPage`] when used for navigation.
pub trait View: Send + 'static {
    /// Type name of the view, used in error messages.
    fn view_type(&self) -> &'static str {
        type_name::<Self>()
    }

    /// Convert into a navigable page, if this view is one.
    fn into_page(self: Box<Self>) -> Option<Page> {
        None
    }
}

/// Unique identity of a [`Page`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(Uuid);

impl PageId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A displayable screen bound to a view-model.
///
/// Cloning a page clones the handle, not the screen: both clones share the same [`PageId`].
#[derive(Debug, Clone)]
pub struct Page {
    id: PageId,
    view_type: &'static str,
    view_model: Option<Arc<dyn PageViewModel>>,
    title: Option<String>,
}

impl Page {
    /// Create an unbound page for the given view type.
    pub fn new(view_type: &'static str) -> Self {
        Self {
            id: PageId::generate(),
            view_type,
            view_model: None,
            title: None,
        }
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    pub fn view_type(&self) -> &'static str {
        self.view_type
    }

    /// The view-model bound to this page, if any.
    pub fn view_model(&self) -> Option<&Arc<dyn PageViewModel>> {
        self.view_model.as_ref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Bind a view-model, replacing any previous binding.
    pub fn bind_view_model(&mut self, view_model: Arc<dyn PageViewModel>) {
        self.view_model = Some(view_model);
    }

    /// Set the visible title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }
}

impl View for Page {
    fn view_type(&self) -> &'static str {
        self.view_type
    }

    fn into_page(self: Box<Self>) -> Option<Page> {
        Some(*self)
    }
}

/// Resolves views for view-models.
///
/// Called from tokio's blocking pool, so implementations may do non-trivial work.
pub trait ViewLocator: Send + Sync {
    /// Produce the view registered for `view_model` and `contract`, or `None` when no
    /// registration matches.
    fn resolve_view(
        &self,
        view_model: &dyn PageViewModel,
        contract: Option<&str>,
    ) -> Option<Box<dyn View>>;
}

type ViewFactory = Box<dyn Fn() -> Box<dyn View> + Send + Sync>;

/// A [`ViewLocator`] backed by explicit registrations.
///
/// Registrations are keyed by the view-model's concrete type and an optional contract. A
/// lookup with a contract only matches registrations made with that same contract.
#[derive(Default)]
pub struct ViewRegistry {
    factories: HashMap<(TypeId, Option<String>), ViewFactory>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for view-models of type `VM`.
    ///
    /// A later registration for the same key replaces the earlier one.
    pub fn register<VM, F>(&mut self, contract: Option<&str>, factory: F) -> &mut Self
    where
        VM: PageViewModel,
        F: Fn() -> Box<dyn View> + Send + Sync + 'static,
    {
        self.factories.insert(
            (TypeId::of::<VM>(), contract.map(str::to_string)),
            Box::new(factory),
        );
        self
    }

    /// Register a plain [`Page`] of the given view type for view-models of type `VM`.
    pub fn register_page<VM: PageViewModel>(
        &mut self,
        contract: Option<&str>,
        view_type: &'static str,
    ) -> &mut Self {
        self.register::<VM, _>(contract, move || Box::new(Page::new(view_type)))
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRegistry")
            .field("registrations", &self.factories.len())
            .finish()
    }
}

impl ViewLocator for ViewRegistry {
    fn resolve_view(
        &self,
        view_model: &dyn PageViewModel,
        contract: Option<&str>,
    ) -> Option<Box<dyn View>> {
        let key = (view_model.view_model_type(), contract.map(str::to_string));
        self.factories.get(&key).map(|factory| factory())
    }
}

/// Locate the page for `view_model` and bind the view-model onto it.
///
/// # Errors
/// - [`ViewError::NotRegistered`] when the locator has nothing for the pair
/// - [`ViewError::NotAPage`] when the located view is not a page
pub fn locate_page_for(
    locator: &dyn ViewLocator,
    view_model: &Arc<dyn PageViewModel>,
    contract: Option<&str>,
) -> Result<Page, ViewError> {
    let view = locator
        .resolve_view(&**view_model, contract)
        .ok_or_else(|| ViewError::NotRegistered {
            view_model_type: view_model.type_name(),
            contract: contract.map(str::to_string),
        })?;

    let view_type = view.view_type();
    let mut page = view.into_page().ok_or_else(|| ViewError::NotAPage {
        view_type,
        view_model_type: view_model.type_name(),
        contract: contract.map(str::to_string),
    })?;

    page.bind_view_model(Arc::clone(view_model));
    Ok(page)
}

/// Set the page's visible title from a resource key.
///
/// Localized lookup is left to the platform; the key is used as the title as-is.
pub fn set_page_title(page: &mut Page, title_key: &str) {
    page.set_title(title_key);
}

/// Locate, bind and title a page. This is the resolution stage of every push.
pub fn resolve_page(
    locator: &dyn ViewLocator,
    view_model: &Arc<dyn PageViewModel>,
    contract: Option<&str>,
) -> crate::Result<Page> {
    let mut page = locate_page_for(locator, view_model, contract)?;
    set_page_title(&mut page, view_model.id());
    trace!(
        page = %page.id(),
        view_type = page.view_type(),
        view_model = view_model.id(),
        "Resolved page"
    );
    Ok(page)
}

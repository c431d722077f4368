//! View resolution error types.

use thiserror::Error;

/// Errors that can occur while producing a page for a view-model.
///
/// Both variants abort the requesting operation before the UI loop sees it, so no
/// navigation state is touched.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Clone, Error)]
pub enum ViewError {
    /// No view is registered for the (view-model type, contract) pair.
    #[error(
        "No view could be located for type '{view_model_type}', contract '{}'. Be sure the locator has an appropriate registration",
        .contract.as_deref().unwrap_or("")
    )]
    NotRegistered {
        /// Type name of the view-model
        view_model_type: &'static str,
        /// Contract used for the lookup
        contract: Option<String>,
    },

    /// A view was resolved but it cannot be displayed as a page.
    #[error(
        "Resolved view '{view_type}' for type '{view_model_type}', contract '{}' is not a Page",
        .contract.as_deref().unwrap_or("")
    )]
    NotAPage {
        /// Type name of the resolved view
        view_type: &'static str,
        /// Type name of the view-model
        view_model_type: &'static str,
        /// Contract used for the lookup
        contract: Option<String>,
    },
}

impl ViewError {
    /// Check if no registration matched.
    pub fn is_not_registered(&self) -> bool {
        matches!(self, ViewError::NotRegistered { .. })
    }

    /// Check if the resolver returned something other than a page.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, ViewError::NotAPage { .. })
    }

    /// Type name of the view-model the lookup was for.
    pub fn view_model_type(&self) -> &'static str {
        match self {
            ViewError::NotRegistered {
                view_model_type, ..
            }
            | ViewError::NotAPage {
                view_model_type, ..
            } => view_model_type,
        }
    }
}

impl From<ViewError> for crate::Error {
    fn from(err: ViewError) -> Self {
        crate::Error::View(err)
    }
}

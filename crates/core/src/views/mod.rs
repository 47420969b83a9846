//! Page state machines.
//!
//! Each view owns the state of one dashboard page. Async operations take
//! the [`Session`](crate::session::Session) and an API implementation and
//! return `Some(route)` when the page should be left.

pub mod allowlist;
pub mod delete;
pub mod detail;
pub mod form;
pub mod list;

pub use allowlist::AllowlistPanel;
pub use delete::DeleteFlow;
pub use detail::{DetailRow, DetailView};
pub use form::{FormMode, FormView};
pub use list::ListView;

use crate::api::{ApiError, FailureClass};
use crate::i18n::{t, LOAD_FAILED};
use crate::locale::Locale;
use crate::route::Route;

/// Lifecycle of a page's initial load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    /// Localized message replacing the page content.
    Failed(String),
    /// The page was left for the login screen; its data is discarded.
    Redirected,
}

impl Phase {
    pub fn is_ready(&self) -> bool {
        matches!(self, Phase::Ready)
    }
}

/// Phase and route after a failed initial load.
pub(crate) fn load_failure(
    view: &'static str,
    error: &ApiError,
    locale: Locale,
) -> (Phase, Option<Route>) {
    match error.class() {
        FailureClass::MissingAuth | FailureClass::AuthRejected => {
            tracing::info!(view, "Session rejected, redirecting to login");
            (Phase::Redirected, Some(Route::Login))
        }
        FailureClass::Fatal | FailureClass::Rejected => {
            tracing::error!(view, error = %error, "Failed to load");
            (Phase::Failed(t(locale, LOAD_FAILED).to_string()), None)
        }
    }
}

//! The seam between views and the backend.
//!
//! Views are written against [`ResourceApi`] and [`AdminAllowlistApi`];
//! the `expo-admin-client` crate implements them over HTTP and tests
//! implement them in memory.

use async_trait::async_trait;

use crate::allowlist::{AllowlistReply, NewAdmin, TelegramAdmin};
use crate::payload::Payload;
use crate::record::Record;
use crate::resource::ResourceDescriptor;
use crate::session::Token;
use crate::types::DbId;

/// Errors from a backend call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No token was available for a protected call.
    #[error("No authentication token")]
    MissingAuth,

    /// The server answered 401.
    #[error("Authentication rejected by the server")]
    Unauthorized,

    /// The request never produced a response (network, DNS, TLS, timeout,
    /// unreadable upload file).
    #[error("Request failed: {0}")]
    Transport(String),

    /// The response body was not what the resource promises.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Any other non-2xx answer.
    #[error("Server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// How a view reacts to a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Redirect to login, no message.
    MissingAuth,
    /// Redirect to login, discard view state.
    AuthRejected,
    /// Network or parse failure: localized error replaces the view.
    Fatal,
    /// Server refused a write or read: logged, inline message, no
    /// navigation.
    Rejected,
}

impl ApiError {
    pub fn class(&self) -> FailureClass {
        match self {
            ApiError::MissingAuth => FailureClass::MissingAuth,
            ApiError::Unauthorized => FailureClass::AuthRejected,
            ApiError::Transport(_) | ApiError::Decode(_) => FailureClass::Fatal,
            ApiError::Status { .. } => FailureClass::Rejected,
        }
    }

    /// Whether this failure ends the page view with a login redirect.
    pub fn redirects_to_login(&self) -> bool {
        matches!(
            self.class(),
            FailureClass::MissingAuth | FailureClass::AuthRejected
        )
    }
}

/// CRUD calls against one resource collection.
#[async_trait]
pub trait ResourceApi: Send + Sync {
    /// `GET {endpoint}` with the bearer token.
    async fn list(
        &self,
        token: &Token,
        resource: &ResourceDescriptor,
    ) -> Result<Vec<Record>, ApiError>;

    /// `GET {endpoint}/{id}` with the bearer token, unwrapped according to
    /// the resource's detail shape.
    async fn get(
        &self,
        token: &Token,
        resource: &ResourceDescriptor,
        id: DbId,
    ) -> Result<Record, ApiError>;

    /// `POST {endpoint}`. Returns the created row when the server echoes
    /// one, an empty record otherwise.
    async fn create(
        &self,
        token: &Token,
        resource: &ResourceDescriptor,
        payload: &Payload,
    ) -> Result<Record, ApiError>;

    /// `PUT {endpoint}/{id}` with the full editable field set.
    async fn update(
        &self,
        token: &Token,
        resource: &ResourceDescriptor,
        id: DbId,
        payload: &Payload,
    ) -> Result<Record, ApiError>;

    /// `DELETE {endpoint}/{id}`.
    async fn remove(
        &self,
        token: &Token,
        resource: &ResourceDescriptor,
        id: DbId,
    ) -> Result<(), ApiError>;

    /// Anonymous `GET {endpoint}` used to fill foreign-key selects.
    async fn reference_list(&self, resource: &ResourceDescriptor) -> Result<Vec<Record>, ApiError>;
}

/// Telegram admin allowlist calls (`admin/all`, `admin/add`,
/// `admin/remove`).
#[async_trait]
pub trait AdminAllowlistApi: Send + Sync {
    async fn list_admins(&self, token: &Token) -> Result<Vec<TelegramAdmin>, ApiError>;

    async fn add_admin(&self, token: &Token, admin: &NewAdmin) -> Result<AllowlistReply, ApiError>;

    async fn remove_admin(&self, token: &Token, username: &str)
        -> Result<AllowlistReply, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_classes_follow_taxonomy() {
        assert_eq!(ApiError::MissingAuth.class(), FailureClass::MissingAuth);
        assert_eq!(ApiError::Unauthorized.class(), FailureClass::AuthRejected);
        assert_eq!(ApiError::Transport("dns".into()).class(), FailureClass::Fatal);
        assert_eq!(ApiError::Decode("eof".into()).class(), FailureClass::Fatal);
        assert_eq!(
            ApiError::Status {
                status: 422,
                body: String::new()
            }
            .class(),
            FailureClass::Rejected
        );
    }

    #[test]
    fn only_auth_failures_redirect() {
        assert!(ApiError::Unauthorized.redirects_to_login());
        assert!(ApiError::MissingAuth.redirects_to_login());
        assert!(!ApiError::Transport("x".into()).redirects_to_login());
    }

    #[test]
    fn status_error_display() {
        let err = ApiError::Status {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.to_string(), "Server returned HTTP 500: boom");
    }
}

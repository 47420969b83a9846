//! Confirm-before-delete sub-state.
//!
//! `Idle -> Confirming -> Deleting -> Idle`, with `Confirming -> Idle` on
//! cancel. While `Deleting`, the dialog's buttons are disabled and no
//! other transition is accepted.

use crate::api::ResourceApi;
use crate::resource::ResourceDescriptor;
use crate::session::Session;
use crate::types::DbId;

/// Result of a confirmed delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DeleteOutcome {
    /// The dialog was not in `Confirming`; nothing was sent.
    NotConfirmed,
    Deleted(DbId),
    /// The server refused or the call failed; the record is still there.
    Failed,
    /// No token, or the server answered 401.
    Unauthorized,
}

/// Run the confirmed delete of `flow`'s target and return the flow to
/// `Idle`.
pub(crate) async fn confirm<A>(
    flow: &mut DeleteFlow,
    session: &Session,
    api: &A,
    resource: &ResourceDescriptor,
) -> DeleteOutcome
where
    A: ResourceApi + ?Sized,
{
    let Ok(token) = session.require() else {
        flow.finish();
        return DeleteOutcome::Unauthorized;
    };
    let Some(id) = flow.begin() else {
        return DeleteOutcome::NotConfirmed;
    };

    let result = api.remove(token, resource, id).await;
    flow.finish();

    match result {
        Ok(()) => {
            tracing::info!(resource = resource.endpoint, id, "Record deleted");
            DeleteOutcome::Deleted(id)
        }
        Err(e) if e.redirects_to_login() => DeleteOutcome::Unauthorized,
        Err(e) => {
            tracing::warn!(resource = resource.endpoint, id, error = %e, "Delete failed");
            DeleteOutcome::Failed
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteFlow {
    #[default]
    Idle,
    Confirming(DbId),
    Deleting(DbId),
}

impl DeleteFlow {
    /// Open the confirmation dialog for `id`. Only accepted from `Idle`.
    pub fn request(&mut self, id: DbId) -> bool {
        match self {
            DeleteFlow::Idle => {
                *self = DeleteFlow::Confirming(id);
                true
            }
            _ => false,
        }
    }

    /// Close the dialog without deleting. Ignored while a delete is in
    /// flight.
    pub fn cancel(&mut self) -> bool {
        match self {
            DeleteFlow::Confirming(_) => {
                *self = DeleteFlow::Idle;
                true
            }
            _ => false,
        }
    }

    /// Confirm: move to `Deleting` and return the target id.
    pub fn begin(&mut self) -> Option<DbId> {
        match *self {
            DeleteFlow::Confirming(id) => {
                *self = DeleteFlow::Deleting(id);
                Some(id)
            }
            _ => None,
        }
    }

    /// The delete call returned, successfully or not.
    pub fn finish(&mut self) {
        *self = DeleteFlow::Idle;
    }

    pub fn dialog_open(&self) -> bool {
        !matches!(self, DeleteFlow::Idle)
    }

    pub fn buttons_enabled(&self) -> bool {
        !matches!(self, DeleteFlow::Deleting(_))
    }

    pub fn target(&self) -> Option<DbId> {
        match *self {
            DeleteFlow::Idle => None,
            DeleteFlow::Confirming(id) | DeleteFlow::Deleting(id) => Some(id),
        }
    }
}

//! List view: all rows of one resource, with delete.

use crate::api::ResourceApi;
use crate::gallery::{group_by_project, GalleryGroup, GalleryItem};
use crate::i18n::{t, DELETE_FAILED};
use crate::locale::Locale;
use crate::options::row_label;
use crate::record::Record;
use crate::resource::{ResourceDescriptor, ResourceKind};
use crate::route::Route;
use crate::session::Session;
use crate::types::DbId;

use super::delete::{self, DeleteOutcome};
use super::{load_failure, DeleteFlow, Phase};

#[derive(Debug)]
pub struct ListView {
    resource: &'static ResourceDescriptor,
    locale: Locale,
    phase: Phase,
    items: Vec<Record>,
    delete: DeleteFlow,
    notice: Option<String>,
}

impl ListView {
    pub fn new(kind: ResourceKind, locale: Locale) -> Self {
        Self {
            resource: kind.descriptor(),
            locale,
            phase: Phase::Loading,
            items: Vec::new(),
            delete: DeleteFlow::Idle,
            notice: None,
        }
    }

    /// Fetch the collection. Without a token no request is made.
    pub async fn load<A>(&mut self, session: &Session, api: &A) -> Option<Route>
    where
        A: ResourceApi + ?Sized,
    {
        let token = match session.require() {
            Ok(token) => token,
            Err(route) => return self.redirect(route),
        };

        self.phase = Phase::Loading;
        match api.list(token, self.resource).await {
            Ok(items) => {
                tracing::debug!(
                    resource = self.resource.endpoint,
                    count = items.len(),
                    "List loaded"
                );
                self.items = items;
                self.phase = Phase::Ready;
                None
            }
            Err(e) => {
                self.items.clear();
                let (phase, route) = load_failure("list", &e, self.locale);
                self.phase = phase;
                route
            }
        }
    }

    fn redirect(&mut self, route: Route) -> Option<Route> {
        self.items.clear();
        self.delete.finish();
        self.phase = Phase::Redirected;
        Some(route)
    }

    pub fn resource(&self) -> &'static ResourceDescriptor {
        self.resource
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn items(&self) -> &[Record] {
        &self.items
    }

    /// Display label of a row.
    pub fn label(&self, record: &Record) -> String {
        row_label(self.resource, record)
    }

    /// Gallery rows grouped by project. Empty for other resources.
    pub fn groups(&self) -> Vec<GalleryGroup> {
        if self.resource.kind != ResourceKind::Gallery {
            return Vec::new();
        }
        group_by_project(self.items.iter().filter_map(GalleryItem::from_record))
    }

    pub fn delete_state(&self) -> DeleteFlow {
        self.delete
    }

    /// Non-blocking message from the last failed delete.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn request_delete(&mut self, id: DbId) -> bool {
        let opened = self.delete.request(id);
        if opened {
            self.notice = None;
        }
        opened
    }

    pub fn cancel_delete(&mut self) -> bool {
        self.delete.cancel()
    }

    /// Delete the confirmed row. On success the row is dropped locally
    /// without a refetch; on failure it stays and a notice is set.
    pub async fn confirm_delete<A>(&mut self, session: &Session, api: &A) -> Option<Route>
    where
        A: ResourceApi + ?Sized,
    {
        match delete::confirm(&mut self.delete, session, api, self.resource).await {
            DeleteOutcome::Deleted(id) => {
                self.items.retain(|r| r.id() != Some(id));
                None
            }
            DeleteOutcome::Failed => {
                self.notice = Some(t(self.locale, DELETE_FAILED).to_string());
                None
            }
            DeleteOutcome::Unauthorized => self.redirect(Route::Login),
            DeleteOutcome::NotConfirmed => None,
        }
    }

    pub fn add_route(&self) -> Route {
        Route::Add(self.resource.kind)
    }

    /// Where a row's title links to: its Detail view, or its edit form for
    /// resources without one.
    pub fn row_route(&self, id: DbId) -> Route {
        if self.resource.has_detail {
            Route::Detail(self.resource.kind, id)
        } else {
            Route::Edit(self.resource.kind, id)
        }
    }
}

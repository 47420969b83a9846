//! Detail view: one record, its locale variants side by side.

use crate::api::ResourceApi;
use crate::i18n::{t, DELETE_FAILED, NOT_FOUND};
use crate::locale::{split_localized, Locale};
use crate::markup::TrustedMarkup;
use crate::organizers::{OrganizerEntry, OrganizerList};
use crate::record::{to_input_date, Record};
use crate::resource::{FieldKind, ResourceDescriptor, ResourceKind};
use crate::route::Route;
use crate::session::Session;
use crate::types::DbId;

use super::delete::{self, DeleteOutcome};
use super::{load_failure, DeleteFlow, Phase};

/// One row of the detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailRow {
    Plain {
        field: &'static str,
        value: String,
    },
    /// A locale triple, e.g. `text_tk` / `text_en` / `text_ru` under `text`.
    Localized {
        base: String,
        tk: TrustedMarkup,
        en: TrustedMarkup,
        ru: TrustedMarkup,
    },
    /// Stored path of an uploaded file, empty when none.
    File { field: &'static str, path: String },
    /// Organizers with content, each with the row index an edit removes
    /// it by.
    Organizers(Vec<(usize, OrganizerEntry)>),
}

#[derive(Debug)]
pub struct DetailView {
    resource: &'static ResourceDescriptor,
    id: DbId,
    locale: Locale,
    phase: Phase,
    record: Option<Record>,
    delete: DeleteFlow,
    notice: Option<String>,
}

impl DetailView {
    pub fn new(kind: ResourceKind, id: DbId, locale: Locale) -> Self {
        Self {
            resource: kind.descriptor(),
            id,
            locale,
            phase: Phase::Loading,
            record: None,
            delete: DeleteFlow::Idle,
            notice: None,
        }
    }

    pub async fn load<A>(&mut self, session: &Session, api: &A) -> Option<Route>
    where
        A: ResourceApi + ?Sized,
    {
        let token = match session.require() {
            Ok(token) => token,
            Err(route) => return self.redirect(route),
        };

        self.phase = Phase::Loading;
        match api.get(token, self.resource, self.id).await {
            Ok(record) if record.id().is_some() => {
                self.record = Some(record);
                self.phase = Phase::Ready;
                None
            }
            Ok(_) => {
                tracing::warn!(resource = self.resource.endpoint, id = self.id, "Empty record");
                self.phase = Phase::Failed(t(self.locale, NOT_FOUND).to_string());
                None
            }
            Err(e) => {
                self.record = None;
                let (phase, route) = load_failure("detail", &e, self.locale);
                self.phase = phase;
                route
            }
        }
    }

    fn redirect(&mut self, route: Route) -> Option<Route> {
        self.record = None;
        self.phase = Phase::Redirected;
        Some(route)
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn record(&self) -> Option<&Record> {
        self.record.as_ref()
    }

    pub fn edit_route(&self) -> Route {
        Route::Edit(self.resource.kind, self.id)
    }

    /// Rows in schema order. Locale triples are merged into one row at the
    /// position of their first field.
    pub fn rows(&self) -> Vec<DetailRow> {
        let Some(record) = &self.record else {
            return Vec::new();
        };

        let mut rows = Vec::new();
        let mut seen_bases: Vec<&str> = Vec::new();
        for field in self.resource.fields {
            match field.kind {
                FieldKind::Organizers => {
                    rows.push(DetailRow::Organizers(
                        OrganizerList::from_record(record).indexed_entries(),
                    ));
                }
                FieldKind::File { .. } => rows.push(DetailRow::File {
                    field: field.name,
                    path: record.text(field.name),
                }),
                _ => match split_localized(field.name) {
                    Some((base, _)) => {
                        if seen_bases.contains(&base) {
                            continue;
                        }
                        seen_bases.push(base);
                        rows.push(DetailRow::Localized {
                            base: base.to_string(),
                            tk: record.localized(base, Locale::Tk),
                            en: record.localized(base, Locale::En),
                            ru: record.localized(base, Locale::Ru),
                        });
                    }
                    None => {
                        let raw = record.text(field.name);
                        let value = match field.kind {
                            FieldKind::Date => to_input_date(&raw).unwrap_or(raw),
                            _ => raw,
                        };
                        rows.push(DetailRow::Plain {
                            field: field.name,
                            value,
                        });
                    }
                },
            }
        }
        rows
    }

    pub fn delete_state(&self) -> DeleteFlow {
        self.delete
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn request_delete(&mut self) -> bool {
        let opened = self.delete.request(self.id);
        if opened {
            self.notice = None;
        }
        opened
    }

    pub fn cancel_delete(&mut self) -> bool {
        self.delete.cancel()
    }

    /// Delete this record. Success navigates to the List view.
    pub async fn confirm_delete<A>(&mut self, session: &Session, api: &A) -> Option<Route>
    where
        A: ResourceApi + ?Sized,
    {
        match delete::confirm(&mut self.delete, session, api, self.resource).await {
            DeleteOutcome::Deleted(_) => Some(Route::List(self.resource.kind)),
            DeleteOutcome::Failed => {
                self.notice = Some(t(self.locale, DELETE_FAILED).to_string());
                None
            }
            DeleteOutcome::Unauthorized => self.redirect(Route::Login),
            DeleteOutcome::NotConfirmed => None,
        }
    }
}

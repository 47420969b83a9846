//! Add / Edit form view.
//!
//! Loading fetches the options of every foreign-key select concurrently
//! (and, on Edit, the record itself). Submitting validates locally, sends
//! the payload, and on success navigates away; failures keep every field
//! as entered.

use std::collections::BTreeMap;

use futures::future::join_all;

use crate::api::ResourceApi;
use crate::form::FormState;
use crate::i18n::{t, NOT_FOUND, REQUIRED_FIELD, SAVE_FAILED};
use crate::locale::Locale;
use crate::options::{options_from_records, RefOption};
use crate::resource::{ResourceDescriptor, ResourceKind};
use crate::route::Route;
use crate::session::Session;
use crate::types::DbId;

use super::{load_failure, Phase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(DbId),
}

#[derive(Debug)]
pub struct FormView {
    resource: &'static ResourceDescriptor,
    mode: FormMode,
    locale: Locale,
    phase: Phase,
    form: FormState,
    options: BTreeMap<ResourceKind, Vec<RefOption>>,
    error: Option<String>,
}

/// Options of every select of `resource`, fetched anonymously and
/// concurrently. A failed fetch leaves that select empty.
async fn load_options<A>(
    resource: &ResourceDescriptor,
    api: &A,
) -> BTreeMap<ResourceKind, Vec<RefOption>>
where
    A: ResourceApi + ?Sized,
{
    let fetches = resource.reference_dependencies().into_iter().map(|kind| async move {
        let target = kind.descriptor();
        (kind, api.reference_list(target).await)
    });

    join_all(fetches)
        .await
        .into_iter()
        .map(|(kind, result)| {
            let options = match result {
                Ok(records) => options_from_records(kind.descriptor(), &records),
                Err(e) => {
                    tracing::error!(reference = kind.descriptor().endpoint, error = %e, "Failed to load select options");
                    Vec::new()
                }
            };
            (kind, options)
        })
        .collect()
}

impl FormView {
    pub fn new(kind: ResourceKind, mode: FormMode, locale: Locale) -> Self {
        let resource = kind.descriptor();
        Self {
            resource,
            mode,
            locale,
            phase: Phase::Loading,
            form: FormState::empty(resource),
            options: BTreeMap::new(),
            error: None,
        }
    }

    pub fn add(kind: ResourceKind, locale: Locale) -> Self {
        Self::new(kind, FormMode::Add, locale)
    }

    pub fn edit(kind: ResourceKind, id: DbId, locale: Locale) -> Self {
        Self::new(kind, FormMode::Edit(id), locale)
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

        let id = match self.mode {
            FormMode::Add => {
                self.options = load_options(self.resource, api).await;
                self.phase = Phase::Ready;
                return None;
            }
            FormMode::Edit(id) => id,
        };

        let (record, options) = futures::join!(
            api.get(token, self.resource, id),
            load_options(self.resource, api)
        );
        self.options = options;

        match record {
            Ok(record) if record.id().is_some() => {
                self.form = FormState::from_record(self.resource, &record);
                self.phase = Phase::Ready;
                None
            }
            Ok(_) => {
                tracing::warn!(resource = self.resource.endpoint, id, "Empty record");
                self.phase = Phase::Failed(t(self.locale, NOT_FOUND).to_string());
                None
            }
            Err(e) => {
                let (phase, route) = load_failure("form", &e, self.locale);
                if route.is_some() {
                    return self.redirect(Route::Login);
                }
                self.phase = phase;
                None
            }
        }
    }

    fn redirect(&mut self, route: Route) -> Option<Route> {
        self.form = FormState::empty(self.resource);
        self.options.clear();
        self.error = None;
        self.phase = Phase::Redirected;
        Some(route)
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    /// Options of the select targeting `kind`; empty when unavailable.
    pub fn options(&self, kind: ResourceKind) -> &[RefOption] {
        self.options.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Inline message of the last failed submit.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Validate and send. `Some(route)` on success or on an authentication
    /// failure; `None` when the form stays open.
    pub async fn submit<A>(&mut self, session: &Session, api: &A) -> Option<Route>
    where
        A: ResourceApi + ?Sized,
    {
        let token = match session.require() {
            Ok(token) => token,
            Err(route) => return self.redirect(route),
        };
        if !self.phase.is_ready() {
            return None;
        }

        let editing = matches!(self.mode, FormMode::Edit(_));
        if let Err(e) = self.form.validate(editing) {
            tracing::debug!(resource = self.resource.endpoint, error = %e, "Form invalid");
            self.error = Some(format!("{}: {e}", t(self.locale, REQUIRED_FIELD)));
            return None;
        }

        let payload = match self.mode {
            FormMode::Add => self.form.create_payload(),
            FormMode::Edit(_) => self.form.update_payload(),
        };
        let payload = match payload {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(resource = self.resource.endpoint, error = %e, "Failed to build payload");
                self.error = Some(t(self.locale, SAVE_FAILED).to_string());
                return None;
            }
        };

        let result = match self.mode {
            FormMode::Add => api.create(token, self.resource, &payload).await,
            FormMode::Edit(id) => api.update(token, self.resource, id, &payload).await,
        };

        match result {
            Ok(_) => {
                self.error = None;
                match self.mode {
                    FormMode::Add => {
                        tracing::info!(resource = self.resource.endpoint, "Record created");
                        self.form.reset();
                        Some(Route::List(self.resource.kind))
                    }
                    FormMode::Edit(id) => {
                        tracing::info!(resource = self.resource.endpoint, id, "Record updated");
                        Some(Route::after_edit(self.resource.kind, id))
                    }
                }
            }
            Err(e) if e.redirects_to_login() => self.redirect(Route::Login),
            Err(e) => {
                tracing::error!(resource = self.resource.endpoint, error = %e, "Save failed");
                self.error = Some(t(self.locale, SAVE_FAILED).to_string());
                None
            }
        }
    }
}

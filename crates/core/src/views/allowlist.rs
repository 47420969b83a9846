//! Telegram admin allowlist panel.

use crate::allowlist::{normalize_username, NewAdmin, TelegramAdmin};
use crate::api::{AdminAllowlistApi, ApiError};
use crate::i18n::{t, REQUIRED_FIELD};
use crate::locale::Locale;
use crate::route::Route;
use crate::session::Session;

use super::{load_failure, Phase};

#[derive(Debug)]
pub struct AllowlistPanel {
    locale: Locale,
    phase: Phase,
    admins: Vec<TelegramAdmin>,
    draft: NewAdmin,
    pending_removal: Option<String>,
    message: Option<String>,
}

impl AllowlistPanel {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            phase: Phase::Loading,
            admins: Vec::new(),
            draft: NewAdmin::default(),
            pending_removal: None,
            message: None,
        }
    }

    pub async fn load<A>(&mut self, session: &Session, api: &A) -> Option<Route>
    where
        A: AdminAllowlistApi + ?Sized,
    {
        let token = match session.require() {
            Ok(token) => token,
            Err(route) => return self.redirect(route),
        };

        match api.list_admins(token).await {
            Ok(admins) => {
                self.admins = admins;
                self.phase = Phase::Ready;
                None
            }
            Err(e) => {
                self.admins.clear();
                let (phase, route) = load_failure("allowlist", &e, self.locale);
                if route.is_some() {
                    return self.redirect(Route::Login);
                }
                self.phase = phase;
                None
            }
        }
    }

    fn redirect(&mut self, route: Route) -> Option<Route> {
        self.admins.clear();
        self.pending_removal = None;
        self.phase = Phase::Redirected;
        Some(route)
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn admins(&self) -> &[TelegramAdmin] {
        &self.admins
    }

    pub fn draft(&self) -> &NewAdmin {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut NewAdmin {
        &mut self.draft
    }

    /// Outcome of the last add or remove.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn pending_removal(&self) -> Option<&str> {
        self.pending_removal.as_deref()
    }

    /// Add the drafted admin. A blank username sends nothing and leaves a
    /// message naming the field. Success clears the draft and reloads the
    /// list.
    pub async fn add<A>(&mut self, session: &Session, api: &A) -> Option<Route>
    where
        A: AdminAllowlistApi + ?Sized,
    {
        let token = match session.require() {
            Ok(token) => token,
            Err(route) => return self.redirect(route),
        };
        let Some(username) = normalize_username(&self.draft.username) else {
            self.message = Some(format!("{}: username", t(self.locale, REQUIRED_FIELD)));
            return None;
        };
        let admin = NewAdmin {
            username,
            full_name: self.draft.full_name.trim().to_string(),
        };

        match api.add_admin(token, &admin).await {
            Ok(reply) if reply.success => {
                tracing::info!(username = %admin.username, "Telegram admin added");
                self.message = Some(format!("Admin {} added", admin.username));
                self.draft = NewAdmin::default();
                self.load(session, api).await
            }
            Ok(reply) => {
                self.message = Some(format!("Error: {}", reply.error.unwrap_or_default()));
                None
            }
            Err(e) => self.call_failed(e, "Error adding admin"),
        }
    }

    pub fn request_removal(&mut self, username: impl Into<String>) {
        self.pending_removal = Some(username.into());
    }

    pub fn cancel_removal(&mut self) {
        self.pending_removal = None;
    }

    /// Remove the admin awaiting confirmation. Success reloads the list.
    pub async fn confirm_removal<A>(&mut self, session: &Session, api: &A) -> Option<Route>
    where
        A: AdminAllowlistApi + ?Sized,
    {
        let token = match session.require() {
            Ok(token) => token,
            Err(route) => return self.redirect(route),
        };
        let username = self.pending_removal.take()?;

        match api.remove_admin(token, &username).await {
            Ok(reply) if reply.success => {
                tracing::info!(username = %username, "Telegram admin removed");
                self.message = Some(format!("Admin {username} removed"));
                self.load(session, api).await
            }
            Ok(reply) => {
                self.message = Some(format!("Error: {}", reply.error.unwrap_or_default()));
                None
            }
            Err(e) => self.call_failed(e, "Error removing admin"),
        }
    }

    fn call_failed(&mut self, error: ApiError, message: &str) -> Option<Route> {
        if error.redirects_to_login() {
            return self.redirect(Route::Login);
        }
        tracing::error!(error = %error, "{message}");
        self.message = Some(message.to_string());
        None
    }
}

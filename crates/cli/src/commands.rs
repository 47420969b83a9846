//! One function per subcommand. Each drives a view and reports the route
//! it ends on.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use expo_admin_client::{ClientConfig, FileTokenStore, HttpResourceApi};
use expo_admin_core::locale::Locale;
use expo_admin_core::resource::ResourceKind;
use expo_admin_core::route::Route;
use expo_admin_core::session::Session;
use expo_admin_core::types::DbId;
use expo_admin_core::views::{AllowlistPanel, DetailView, FormView, ListView, Phase};

use crate::edits::FormEdits;
use crate::render;

/// Where a command ended and whether it failed.
#[derive(Debug, Default)]
pub struct Outcome {
    pub route: Option<Route>,
    pub failed: bool,
}

impl Outcome {
    fn at(route: Route) -> Self {
        Self {
            route: Some(route),
            failed: false,
        }
    }

    fn failed_at(route: Route) -> Self {
        Self {
            route: Some(route),
            failed: true,
        }
    }
}

/// Configuration, stored session and HTTP backend of one run.
pub struct Console {
    pub config: ClientConfig,
    pub store: FileTokenStore,
    pub session: Session,
    pub api: HttpResourceApi,
}

impl Console {
    pub async fn connect(locale: Option<&str>) -> Result<Self> {
        let mut config = ClientConfig::from_env().context("Invalid configuration")?;
        if let Some(code) = locale {
            config.locale = Locale::from_code(code)
                .with_context(|| format!("Unknown locale `{code}`, expected tk, en or ru"))?;
        }
        let store = FileTokenStore::new(config.token_file.clone());
        let session = store.session().await?;
        let api = HttpResourceApi::new(&config)?;
        tracing::debug!(api_url = %config.api_url, locale = %config.locale, "Console ready");
        Ok(Self {
            config,
            store,
            session,
            api,
        })
    }

    fn locale(&self) -> Locale {
        self.config.locale
    }
}

/// Outcome of a page whose load may have failed.
fn after_load(phase: &Phase, left_to: Option<Route>, current: Route) -> Option<Outcome> {
    if let Some(route) = left_to {
        return Some(Outcome::at(route));
    }
    match phase {
        Phase::Failed(message) => {
            render::failure(message);
            Some(Outcome::failed_at(current))
        }
        _ => None,
    }
}

pub async fn list(console: &Console, resource: &str) -> Result<Outcome> {
    let kind = ResourceKind::from_slug(resource)?;
    let mut view = ListView::new(kind, console.locale());
    let left_to = view.load(&console.session, &console.api).await;
    if let Some(outcome) = after_load(view.phase(), left_to, Route::List(kind)) {
        return Ok(outcome);
    }
    render::list(&view, &console.config.static_url, console.locale());
    Ok(Outcome::at(Route::List(kind)))
}

pub async fn show(console: &Console, resource: &str, id: DbId) -> Result<Outcome> {
    let kind = ResourceKind::from_slug(resource)?;
    let current = if kind.descriptor().has_detail {
        Route::Detail(kind, id)
    } else {
        Route::Edit(kind, id)
    };
    let mut view = DetailView::new(kind, id, console.locale());
    let left_to = view.load(&console.session, &console.api).await;
    if let Some(outcome) = after_load(view.phase(), left_to, current) {
        return Ok(outcome);
    }
    render::detail(&view, &console.config.static_url);
    Ok(Outcome::at(current))
}

pub async fn add(console: &Console, resource: &str, edits: &FormEdits) -> Result<Outcome> {
    let kind = ResourceKind::from_slug(resource)?;
    let view = FormView::add(kind, console.locale());
    submit_form(console, view, Route::Add(kind), edits).await
}

pub async fn edit(console: &Console, resource: &str, id: DbId, edits: &FormEdits) -> Result<Outcome> {
    let kind = ResourceKind::from_slug(resource)?;
    let view = FormView::edit(kind, id, console.locale());
    submit_form(console, view, Route::Edit(kind, id), edits).await
}

async fn submit_form(
    console: &Console,
    mut view: FormView,
    current: Route,
    edits: &FormEdits,
) -> Result<Outcome> {
    let left_to = view.load(&console.session, &console.api).await;
    if let Some(outcome) = after_load(view.phase(), left_to, current) {
        return Ok(outcome);
    }

    edits.apply(view.form_mut())?;
    match view.submit(&console.session, &console.api).await {
        Some(route) => Ok(Outcome::at(route)),
        None => {
            if let Some(message) = view.error() {
                render::failure(message);
            }
            Ok(Outcome::failed_at(current))
        }
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

pub async fn delete(console: &Console, resource: &str, id: DbId, yes: bool) -> Result<Outcome> {
    let kind = ResourceKind::from_slug(resource)?;
    let current = Route::List(kind);
    let mut view = ListView::new(kind, console.locale());
    let left_to = view.load(&console.session, &console.api).await;
    if let Some(outcome) = after_load(view.phase(), left_to, current) {
        return Ok(outcome);
    }

    let Some(record) = view.items().iter().find(|r| r.id() == Some(id)) else {
        anyhow::bail!("{} {id} does not exist", kind.descriptor().name);
    };
    let label = view.label(record);

    view.request_delete(id);
    if !yes && !confirm(&format!("Delete {label}?"))? {
        view.cancel_delete();
        return Ok(Outcome::at(current));
    }

    if let Some(route) = view.confirm_delete(&console.session, &console.api).await {
        return Ok(Outcome::at(route));
    }
    match view.notice() {
        Some(notice) => {
            render::failure(notice);
            Ok(Outcome::failed_at(current))
        }
        None => {
            println!("Deleted {label}");
            Ok(Outcome::at(current))
        }
    }
}

pub async fn admins(console: &Console) -> Result<Outcome> {
    let mut panel = AllowlistPanel::new(console.locale());
    let left_to = panel.load(&console.session, &console.api).await;
    if let Some(outcome) = after_load(panel.phase(), left_to, Route::Allowlist) {
        return Ok(outcome);
    }
    render::admins(&panel);
    Ok(Outcome::at(Route::Allowlist))
}

pub async fn add_admin(console: &Console, username: &str, full_name: &str) -> Result<Outcome> {
    let mut panel = AllowlistPanel::new(console.locale());
    panel.draft_mut().username = username.to_string();
    panel.draft_mut().full_name = full_name.to_string();
    if let Some(route) = panel.add(&console.session, &console.api).await {
        return Ok(Outcome::at(route));
    }
    allowlist_result(&panel)
}

pub async fn remove_admin(console: &Console, username: &str, yes: bool) -> Result<Outcome> {
    let mut panel = AllowlistPanel::new(console.locale());
    panel.request_removal(username);
    if !yes && !confirm(&format!("Remove admin {username}?"))? {
        panel.cancel_removal();
        return Ok(Outcome::at(Route::Allowlist));
    }
    if let Some(route) = panel.confirm_removal(&console.session, &console.api).await {
        return Ok(Outcome::at(route));
    }
    allowlist_result(&panel)
}

fn allowlist_result(panel: &AllowlistPanel) -> Result<Outcome> {
    match panel.message() {
        Some(message) if panel.phase().is_ready() => {
            println!("{message}");
            render::admins(panel);
            Ok(Outcome::at(Route::Allowlist))
        }
        Some(message) => {
            render::failure(message);
            Ok(Outcome::failed_at(Route::Allowlist))
        }
        None => Ok(Outcome::failed_at(Route::Allowlist)),
    }
}

pub fn session_status(console: &Console) -> Result<Outcome> {
    render::session(&console.session, console.store.path(), chrono::Utc::now());
    Ok(Outcome::default())
}

pub async fn set_token(console: &Console, token: &str) -> Result<Outcome> {
    console.store.save(token).await?;
    render::session(&Session::new(Some(token.to_string())), console.store.path(), chrono::Utc::now());
    Ok(Outcome::default())
}

pub async fn clear_token(console: &Console) -> Result<Outcome> {
    console.store.clear().await?;
    println!("Token cleared");
    Ok(Outcome::at(Route::Login))
}

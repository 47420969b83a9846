//! Terminal output.

use std::path::Path;

use expo_admin_core::assets::asset_url;
use expo_admin_core::i18n::{t, EMPTY_LIST, UNTITLED};
use expo_admin_core::locale::Locale;
use expo_admin_core::resource::{Encoding, ResourceKind};
use expo_admin_core::route::Route;
use expo_admin_core::session::Session;
use expo_admin_core::types::Timestamp;
use expo_admin_core::views::{AllowlistPanel, DetailRow, DetailView, ListView};

pub fn route(route: &Route) {
    println!("-> {route}");
}

pub fn failure(message: &str) {
    eprintln!("{message}");
}

fn url_or_dash(static_url: &str, path: &str) -> String {
    asset_url(static_url, path).unwrap_or_else(|| "-".to_string())
}

pub fn resources() {
    println!("{:<18} {:<22} {:<10} ROUTE", "ENDPOINT", "NAME", "BODY");
    for kind in ResourceKind::all() {
        let d = kind.descriptor();
        let body = match d.encoding() {
            Encoding::Json => "json",
            Encoding::Multipart => "multipart",
        };
        println!(
            "{:<18} {:<22} {:<10} {}",
            d.endpoint,
            d.name,
            body,
            Route::List(*kind)
        );
    }
    println!("{:<18} {:<22} {:<10} {}", "admin", "telegram admin", "json", Route::Allowlist);
}

pub fn list(view: &ListView, static_url: &str, locale: Locale) {
    if view.items().is_empty() {
        println!("{}", t(locale, EMPTY_LIST));
        return;
    }

    if view.resource().kind == ResourceKind::Gallery {
        for group in view.groups() {
            let title = match locale {
                Locale::Tk => group.tk.as_deref(),
                Locale::En => group.en.as_deref(),
                Locale::Ru => group.ru.as_deref(),
            }
            .unwrap_or(t(locale, UNTITLED));
            println!("{title} (project {}, {} images)", group.project_id, group.images.len());
            for image in &group.images {
                println!("  {:>5}  {}", image.id, url_or_dash(static_url, &image.image));
            }
        }
        return;
    }

    for record in view.items() {
        let id = record.id().map(|id| id.to_string()).unwrap_or_default();
        println!("{id:>5}  {}", view.label(record));
    }
}

pub fn detail(view: &DetailView, static_url: &str) {
    for row in view.rows() {
        match row {
            DetailRow::Plain { field, value } => println!("{field}: {value}"),
            DetailRow::File { field, path } => {
                println!("{field}: {}", url_or_dash(static_url, &path))
            }
            DetailRow::Localized { base, tk, en, ru } => {
                let heading = if base.is_empty() { "title" } else { base.as_str() };
                println!("{heading}:");
                for (locale, value) in [(Locale::Tk, tk), (Locale::En, en), (Locale::Ru, ru)] {
                    println!("  {:<8} {}", locale.label(), value.plain_text());
                }
            }
            DetailRow::Organizers(entries) => {
                println!("organizers:");
                for (index, entry) in entries {
                    let logo = entry
                        .organizer_logo
                        .as_deref()
                        .map(|p| url_or_dash(static_url, p))
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "  {index}. {} / {} / {}  logo: {logo}",
                        entry.organizer_tk, entry.organizer_en, entry.organizer_ru
                    );
                }
            }
        }
    }
}

pub fn admins(panel: &AllowlistPanel) {
    println!("{:<5} {:<24} {:<28} ADDED", "ID", "USERNAME", "NAME");
    for admin in panel.admins() {
        println!(
            "{:<5} @{:<23} {:<28} {}",
            admin.id,
            admin.username,
            admin.display_name(),
            admin.added_on().unwrap_or_default()
        );
    }
}

pub fn session(session: &Session, token_file: &Path, now: Timestamp) {
    println!("token file: {}", token_file.display());
    if session.token().is_none() {
        println!("not signed in");
        return;
    }
    match (session.expires_at(), session.remaining(now)) {
        (Some(at), Some(left)) if !left.is_zero() => {
            println!("signed in, token expires {at} ({} min left)", left.as_secs() / 60)
        }
        (Some(at), _) => println!("token expired at {at}"),
        _ => println!("signed in, token expiry unknown"),
    }
}

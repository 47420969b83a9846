//! `expo-admin` -- terminal console for the exhibition site's backend.
//!
//! Drives the same List / Detail / Form views as the web dashboard and
//! prints the route each command lands on.
//!
//! # Environment variables
//!
//! | Variable                    | Required | Default                        | Description                     |
//! |-----------------------------|----------|--------------------------------|---------------------------------|
//! | `EXPO_API_URL`              | yes      | --                             | Backend base URL                |
//! | `EXPO_STATIC_URL`           | no       | `EXPO_API_URL`                 | Base URL of uploaded files      |
//! | `EXPO_TOKEN_FILE`           | no       | `$HOME/.expo-admin/auth_token` | Persisted bearer token          |
//! | `EXPO_REQUEST_TIMEOUT_SECS` | no       | `30`                           | Per-request timeout             |
//! | `EXPO_UI_LOCALE`            | no       | `ru`                           | Locale of interface messages    |
//! | `RUST_LOG`                  | no       | `expo_admin=info`              | Log filter                      |

mod commands;
mod edits;
mod render;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use expo_admin_core::types::DbId;

use commands::{Console, Outcome};
use edits::FormEdits;

#[derive(Parser)]
#[command(name = "expo-admin")]
#[command(version)]
#[command(about = "Manage exhibition site content from the terminal")]
struct Cli {
    /// Interface locale (tk, en, ru); overrides EXPO_UI_LOCALE
    #[arg(long, global = true)]
    locale: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List managed resources and their routes
    Resources,

    /// List all rows of a resource
    List {
        /// Resource endpoint or route segment, e.g. `projects`
        resource: String,
    },

    /// Show one record with its locale variants side by side
    Show { resource: String, id: DbId },

    /// Create a record
    Add {
        resource: String,
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Update a record; unspecified fields keep their current values
    Edit {
        resource: String,
        id: DbId,
        #[command(flatten)]
        fields: FieldArgs,
        /// Remove the organizer at this index (repeatable)
        #[arg(long = "remove-organizer", value_name = "INDEX")]
        remove_organizer: Vec<usize>,
    },

    /// Delete a record after confirmation
    Delete {
        resource: String,
        id: DbId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Telegram bot admin allowlist
    Admins {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Stored authentication token
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
}

#[derive(Args)]
struct FieldArgs {
    /// Set a text field (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    set: Vec<String>,

    /// Attach a file to a file field (repeatable)
    #[arg(long = "file", value_name = "FIELD=PATH")]
    file: Vec<String>,

    /// Add an organizer: `tk|en|ru` with an optional `|logo-path`
    #[arg(long = "organizer", value_name = "TK|EN|RU[|LOGO]")]
    organizer: Vec<String>,
}

#[derive(Subcommand)]
enum AdminCommands {
    /// List allowed admins
    List,
    /// Allow a Telegram user
    Add {
        /// Telegram username, with or without `@`
        username: String,
        #[arg(long)]
        full_name: Option<String>,
    },
    /// Revoke a Telegram user
    Remove {
        username: String,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// Show whether a token is stored and when it expires
    Status,
    /// Store a token obtained from the login page
    SetToken { token: String },
    /// Forget the stored token
    Clear,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "expo_admin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(outcome) => {
            if let Some(route) = &outcome.route {
                render::route(route);
            }
            if outcome.failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<Outcome> {
    let locale = cli.locale.as_deref();
    match cli.command {
        Commands::Resources => {
            render::resources();
            Ok(Outcome::default())
        }
        Commands::List { resource } => {
            let console = Console::connect(locale).await?;
            commands::list(&console, &resource).await
        }
        Commands::Show { resource, id } => {
            let console = Console::connect(locale).await?;
            commands::show(&console, &resource, id).await
        }
        Commands::Add { resource, fields } => {
            let edits = FormEdits::parse(&fields.set, &fields.file, &fields.organizer, &[])?;
            let console = Console::connect(locale).await?;
            commands::add(&console, &resource, &edits).await
        }
        Commands::Edit {
            resource,
            id,
            fields,
            remove_organizer,
        } => {
            let edits = FormEdits::parse(
                &fields.set,
                &fields.file,
                &fields.organizer,
                &remove_organizer,
            )?;
            let console = Console::connect(locale).await?;
            commands::edit(&console, &resource, id, &edits).await
        }
        Commands::Delete { resource, id, yes } => {
            let console = Console::connect(locale).await?;
            commands::delete(&console, &resource, id, yes).await
        }
        Commands::Admins { command } => {
            let console = Console::connect(locale).await?;
            match command {
                AdminCommands::List => commands::admins(&console).await,
                AdminCommands::Add {
                    username,
                    full_name,
                } => {
                    let full_name = full_name.unwrap_or_default();
                    commands::add_admin(&console, &username, &full_name).await
                }
                AdminCommands::Remove { username, yes } => {
                    commands::remove_admin(&console, &username, yes).await
                }
            }
        }
        Commands::Session { command } => {
            let console = Console::connect(locale).await?;
            match command {
                SessionCommands::Status => commands::session_status(&console),
                SessionCommands::SetToken { token } => commands::set_token(&console, &token).await,
                SessionCommands::Clear => commands::clear_token(&console).await,
            }
        }
    }
}

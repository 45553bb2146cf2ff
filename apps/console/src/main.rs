use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{EventFormController, HostEvent, Persistence, RemoteStore, ShellUser};
use shared::domain::EventField;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod console;

use config::{load_settings, Settings};
use console::{ConsoleShell, ConsoleView};

#[derive(Parser, Debug)]
#[command(name = "event-form", about = "Create and list events from the terminal")]
struct Cli {
    /// TOML settings file (defaults to ./event-form.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Keep events in the local list only, even when a remote store is configured
    #[arg(long)]
    offline: bool,
    #[arg(long)]
    user_id: Option<i64>,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    username: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill in the event form and submit it
    Create {
        #[arg(long, default_value = "")]
        name: String,
        /// YYYY-MM-DD
        #[arg(long, default_value = "")]
        date: String,
        /// HH:MM
        #[arg(long, default_value = "")]
        time: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Show the stored events
    List,
}

fn persistence_for(settings: &Settings, offline: bool) -> Result<Persistence> {
    if offline {
        return Ok(Persistence::Offline);
    }
    match settings.remote_store_config() {
        Some(config) => {
            let store = RemoteStore::new(config).context("failed to set up remote store")?;
            info!(url = %store.table_url(), "using remote event store");
            Ok(Persistence::remote(store))
        }
        None => {
            info!("no remote store configured; events stay in this session only");
            Ok(Persistence::Offline)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;
    let persistence = persistence_for(&settings, cli.offline)?;

    let user = cli.user_id.map(|id| ShellUser {
        id: Some(id),
        first_name: cli.first_name.clone(),
        last_name: cli.last_name.clone(),
        username: cli.username.clone(),
    });
    let shell = Arc::new(ConsoleShell::new(settings.theme.clone(), user));
    let view = Arc::new(ConsoleView::default());
    let controller = EventFormController::new(shell, view.clone(), persistence);
    controller.initialize();

    match cli.command {
        Command::Create {
            name,
            date,
            time,
            location,
            description,
        } => {
            if let Err(err) = controller.load_events().await {
                warn!(%err, "continuing without the stored event list");
            }

            controller.open_modal().await;
            for (field, value) in [
                (EventField::Name, &name),
                (EventField::Date, &date),
                (EventField::Time, &time),
                (EventField::Location, &location),
                (EventField::Description, &description),
            ] {
                view.type_into(field, value);
            }

            let created = controller
                .handle_host_event(HostEvent::MainButtonPressed)
                .await
                .context("event was not created")?;
            if let Some(record) = created {
                info!(name = %record.name, "event submitted");
            }
            view.print_list();
        }
        Command::List => {
            if controller.load_events().await?.is_none() {
                println!("Offline mode: no stored events to show.");
                return Ok(());
            }
            view.print_list();
        }
    }

    Ok(())
}

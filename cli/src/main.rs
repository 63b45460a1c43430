//! plantlux command-line client
//!
//! Drives the sync controller against a live inventory service.
//!
//! Usage:
//!   plantlux --base-url http://192.168.1.10:5000 list --lux 420
//!   plantlux add --name Fern --category Tropical --required-lux 200
//!   plantlux delete 7

use std::{io::Write, path::PathBuf, sync::Arc};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use plantlux_cli::{is_affirmative, render_rows, EditFields, Settings};
use plantlux_sync::{
    DeleteConfirmation, HttpInventoryClient, Outcome, PlantRepository, SyncController,
};
use plantlux_types::{PlantDraft, PlantId};
use tracing::{debug, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "plantlux")]
#[command(about = "Plant catalog client for the plantlux inventory service")]
struct Args {
    /// Inventory service base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Path to a JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all plants
    List {
        /// Ambient light reading to judge each plant against
        #[arg(long)]
        lux: Option<f64>,
    },
    /// Add a plant
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        required_lux: String,
        #[arg(long)]
        image: Option<String>,
    },
    /// Edit a plant; unset fields keep their current value
    Edit {
        id: PlantId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        required_lux: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Delete a plant
    Delete {
        id: PlantId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the light recommendation for one plant
    Status {
        id: PlantId,
        #[arg(long)]
        lux: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str()));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    }
    .with_overrides(args.base_url.clone(), args.timeout);
    debug!("Using inventory at {}", settings.inventory.base_url);

    let client = HttpInventoryClient::new(settings.inventory.clone())
        .context("Failed to build inventory client")?;
    let controller =
        SyncController::spawn(PlantRepository::new(Arc::new(client)), settings.controller);

    controller.reload().await.context("Failed to load plants")?;

    match args.command {
        Command::List { lux } => {
            if let Some(lux) = lux {
                controller.set_light(lux);
            }
            let snapshot = controller.snapshot();
            if snapshot.records.is_empty() {
                println!("No plants.");
            }
            for row in render_rows(&snapshot, lux.is_some()) {
                println!("{row}");
            }
        }
        Command::Add {
            name,
            category,
            required_lux,
            image,
        } => {
            let draft = PlantDraft {
                name,
                category,
                required_lux,
                image_ref: image.unwrap_or_default(),
            };
            let new = draft.validate()?;
            let name = new.name.clone();
            let outcome = controller.create(new).await.context("Failed to add plant")?;
            info!("Created at revision {}", outcome.revision());
            println!("Added {name}.");
        }
        Command::Edit {
            id,
            name,
            category,
            required_lux,
            image,
        } => {
            let Some(existing) = controller.find_by_id(id) else {
                bail!("No plant with id {id}");
            };
            let fields = EditFields {
                name,
                category,
                required_lux,
                image,
            };
            let desired = fields.draft_for(&existing).apply_to(&existing)?;
            let outcome = controller
                .update(desired)
                .await
                .context("Failed to update plant")?;
            match outcome {
                Outcome::Synced { .. } => println!("Updated plant {id}."),
                Outcome::AlreadyConverged { .. } => {
                    println!("Plant {id} no longer exists; list refreshed.")
                }
            }
        }
        Command::Delete { id, yes } => {
            let Some(target) = controller.find_by_id(id) else {
                bail!("No plant with id {id}");
            };
            let name = target.name.clone();
            let mut confirmation = DeleteConfirmation::new(controller.clone());
            confirmation.request(target);

            if yes || prompt(&format!("Delete '{name}'? [y/N] "))? {
                confirmation.confirm().await.context("Failed to delete plant")?;
                println!("Deleted {name}.");
            } else {
                confirmation.cancel().await.context("Failed to reload plants")?;
                println!("Kept {name}.");
            }
        }
        Command::Status { id, lux } => {
            controller.set_light(lux);
            let Some(plant) = controller.find_by_id(id) else {
                bail!("No plant with id {id}");
            };
            let report = plant.light_report(lux)?;
            println!("{} ({}): {}", plant.name, report.status, report);
        }
    }

    Ok(())
}

fn prompt(question: &str) -> Result<bool> {
    let mut stdout = std::io::stdout();
    stdout.write_all(question.as_bytes())?;
    stdout.flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

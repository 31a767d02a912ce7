use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use drizzle_core::{Config, LocationSlot, OpenWeatherMapRetriever, SettingsStore, WeatherViewModel};
use inquire::{Password, Text};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "drizzle", version, about = "Current weather and forecast for your places")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show weather pages, one per location.
    Show {
        /// Location names; defaults to the three saved locations.
        locations: Vec<String>,

        /// Only fetch current conditions.
        #[arg(long)]
        no_forecast: bool,

        /// Print the fetched records as JSON instead of pages.
        #[arg(long)]
        json: bool,
    },

    /// Inspect or change the saved locations.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Store the OpenWeatherMap API key.
    Configure,
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Print the saved locations.
    Show,

    /// Set one location slot.
    Set {
        /// Slot name: a, b or c.
        slot: LocationSlot,

        location: String,
    },

    /// Edit all slots interactively.
    Edit,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { locations, no_forecast, json } => {
                show(locations, no_forecast, json).await
            }
            Command::Settings { action } => settings(action),
            Command::Configure => configure(),
        }
    }
}

async fn show(locations: Vec<String>, no_forecast: bool, json: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let mut retriever = OpenWeatherMapRetriever::from_config(&config)?;
    if no_forecast {
        retriever = retriever.with_forecast(false);
    }

    let locations = if locations.is_empty() {
        SettingsStore::open_default()?.locations()
    } else {
        locations
    };

    let model = Arc::new(WeatherViewModel::new(retriever));
    let mut rx = model.subscribe();
    let handle = model.spawn_load(locations);

    while rx.changed().await.is_ok() {
        if !rx.borrow_and_update().is_loading {
            break;
        }
        if !json {
            eprintln!("Loading");
        }
    }

    handle.await.context("Weather load task failed")??;

    let data = model.snapshot().data.unwrap_or_default();
    if json {
        println!("{}", serde_json::to_string_pretty(&*data)?);
    } else {
        render::print_pages(&data, chrono::Utc::now());
    }

    Ok(())
}

fn settings(action: SettingsAction) -> anyhow::Result<()> {
    let mut store = SettingsStore::open_default()?;

    match action {
        SettingsAction::Show => {
            for slot in LocationSlot::all() {
                println!("{:<12} {}", slot.label(), store.location(*slot));
            }
        }
        SettingsAction::Set { slot, location } => {
            store.set_location(slot, location)?;
            println!("{} set to: {}", slot.label(), store.location(slot));
        }
        SettingsAction::Edit => {
            for slot in LocationSlot::all() {
                let prompt = format!("{}:", slot.label());
                let current = store.location(*slot).to_string();
                let answer = Text::new(&prompt).with_initial_value(&current).prompt()?;
                store.set_location(*slot, answer)?;
            }
            println!("Saved to {}", store.path().display());
        }
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .with_help_message("Create one at https://home.openweathermap.org/api_keys")
        .prompt()?;

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved API key to {}", Config::config_file_path()?.display());
    Ok(())
}

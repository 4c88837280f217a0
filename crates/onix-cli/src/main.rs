//! ox
//!
//! Ansible dynamic inventory and resource management for the Onix CMDB

use std::process::ExitCode;

use clap::Parser;
use color_eyre::Result;
use onix_api::{ModuleOutcome, Resource};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod crud;

use cli::{Cli, Commands};
use config::{Config, Settings};
use crud::CrudRequest;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = Config::load_default(cli.config.as_deref())?;

    // stdout carries the JSON document, logs go to stderr
    let filter = EnvFilter::try_from_env("OX_LOG")
        .or_else(|_| EnvFilter::try_new(&config.onix.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::resolve(&config.onix, &cli.connection);

    let outcome = match cli.command {
        Commands::Inventory(args) => {
            let output = commands::inventory(&settings, &config.onix, &args).await?;
            print_json(&output)?;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Setup => match commands::setup(&settings).await {
            Ok(facts) => {
                print_json(&facts)?;
                return Ok(ExitCode::SUCCESS);
            }
            Err(err) => ModuleOutcome::failure(err.to_string()),
        },
        Commands::Item(args) => commands::crud(&settings, CrudRequest::item(&args)).await,
        Commands::ItemType(args) => {
            commands::crud(&settings, CrudRequest::named(Resource::ItemType, &args)).await
        }
        Commands::Link(args) => commands::crud(&settings, CrudRequest::link(&args)).await,
        Commands::LinkType(args) => {
            commands::crud(&settings, CrudRequest::named(Resource::LinkType, &args)).await
        }
        Commands::LinkRule(args) => {
            commands::crud(&settings, CrudRequest::link_rule(&args)).await
        }
        Commands::Model(args) => {
            commands::crud(&settings, CrudRequest::named(Resource::Model, &args)).await
        }
    };

    print_json(&outcome)?;
    Ok(if outcome.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

//! armm - Android Repo Manifest Management
//!
//! Main entry point for the armm CLI.

mod commands;

use armm::config::ArmmConfig;
use armm::manifest::{Attributes, ManifestStore, Query};
use armm::output;
use clap::Parser;
use commands::{Cli, Commands};
use std::process;

fn main() {
    // Initialize logging
    if let Err(e) = armm::logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> armm::Result<()> {
    let config = match cli.config {
        Some(ref path) => ArmmConfig::load(path)?,
        None => ArmmConfig::load_default()?,
    };

    let path = cli.file.clone().unwrap_or_else(|| config.manifest.clone());
    let format = cli.format.unwrap_or(config.format);

    tracing::debug!(path = %path.display(), ?format, "Resolved manifest settings");

    match cli.command {
        Commands::Init { force } => {
            let store = ManifestStore::init(&path, force)?.with_indent(config.indent);
            store.save()?;
            tracing::info!(path = %store.path().display(), "Initialized empty manifest");
        }

        Commands::Set {
            element,
            project,
            attrs,
        } => {
            let attrs: Attributes = attrs.into_iter().collect();
            let mut store = ManifestStore::load(&path)?.with_indent(config.indent);

            if let Some(ref project) = project {
                store.manifest_mut().pset(project, element, &attrs)?;
            } else {
                store.manifest_mut().set(element, &attrs)?;
            }
            store.save()?;
            tracing::info!(path = %store.path().display(), %element, "Manifest updated");
        }

        Commands::Remove {
            element,
            name,
            project,
            attrs,
        } => {
            let name = name.as_deref().unwrap_or_default();
            let attrs: Vec<&str> = attrs.iter().map(String::as_str).collect();
            let mut store = ManifestStore::load(&path)?.with_indent(config.indent);

            if let Some(ref project) = project {
                store.manifest_mut().premove(project, element, name, &attrs)?;
            } else {
                store.manifest_mut().remove(element, name, &attrs)?;
            }
            store.save()?;
            tracing::info!(path = %store.path().display(), %element, "Manifest updated");
        }

        Commands::List {
            element,
            project,
            keys,
            values,
            attr,
        } => {
            let query = Query::from_pairs(element, &keys, &values, attr.as_deref())?;
            let store = ManifestStore::load(&path)?;

            let results = match project {
                Some(ref project) => store.manifest().plist(project, &query),
                None => store.manifest().list(&query),
            };
            print!("{}", output::render(&results, format)?);
        }

        Commands::Elements => {
            print!("{}", output::render_registry(format)?);
        }
    }

    Ok(())
}

// src/main.rs

//! Command-line entry point: loads the configured seed fixture, validates it,
//! and reports what it contains.

use anyhow::Result;
use graphdb_seed::config::Config;
use graphdb_seed::core::state::SeedStore;
use std::env;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{filter::EnvFilter, prelude::*};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    run_app().await
}

async fn run_app() -> Result<()> {
    // Define version information.
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let args: Vec<String> = env::args().collect();

    if args.contains(&"--version".to_string()) {
        println!("graphdb-seed version {VERSION}");
        return Ok(());
    }

    // An explicit --config must exist; the default path is optional.
    let explicit_config = flag_value(&args, "--config");
    let config_path = explicit_config.unwrap_or(DEFAULT_CONFIG_PATH);
    let mut config = if explicit_config.is_some() || Path::new(config_path).exists() {
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Failed to load configuration from \"{config_path}\": {e:#}");
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    if args.iter().any(|arg| arg == "--fixture") {
        match flag_value(&args, "--fixture") {
            Some(path) => config.fixture_path = path.into(),
            None => {
                eprintln!("--fixture flag requires a value");
                std::process::exit(1);
            }
        }
    }

    // RUST_LOG wins over the configured level.
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone());
    tracing_subscriber::registry()
        .with(EnvFilter::new(log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                // stdout is reserved for --dump output.
                .with_writer(std::io::stderr),
        )
        .init();

    let store = match SeedStore::open(&config.fixture_path, config.load_options()).await {
        Ok(store) => store,
        Err(e) => {
            error!("Seed loading failed: {}", e);
            return Err(e.into());
        }
    };
    let snapshot = store.snapshot();

    if args.iter().any(|arg| arg == "--check") {
        info!("Fixture '{}' is valid.", store.path().display());
        return Ok(());
    }

    if args.iter().any(|arg| arg == "--dump") {
        println!("{}", snapshot.fixture().to_json_pretty()?);
        return Ok(());
    }

    for user in snapshot.users().iter() {
        let authorities: Vec<&str> = user
            .granted_authorities()
            .iter()
            .map(String::as_str)
            .collect();
        info!(
            "User '{}' (scheme: {}, admin: {}): {} own queries, authorities [{}]",
            user.username(),
            user.credential().scheme().unwrap_or("none"),
            user.is_admin(),
            snapshot.queries().queries_for(user.username()).count(),
            authorities.join(", ")
        );
    }
    info!(
        "{} of {} saved queries are shared.",
        snapshot.queries().shared_queries().count(),
        snapshot.queries().len()
    );

    Ok(())
}

/// Returns the argument following `flag`, if any.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

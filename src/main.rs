//! spa-shell
//!
//! Command-line front end for the application shell.
//!
//! ```text
//!   config file ──▶ ShellConfig ──┬──▶ local storage ──▶ ApiClient ──▶ backend API
//!                                 │
//!                                 └──▶ Router (app routes) ──▶ Navigation
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use spa_shell::config::{load_config, ShellConfig};
use spa_shell::observability::init_logging;
use spa_shell::routing::{app_router, RouteTarget};
use spa_shell::storage::open_store;
use spa_shell::ApiClient;

#[derive(Parser)]
#[command(name = "spa-shell")]
#[command(about = "Inspect routes and call the backend API with stored credentials", long_about = None)]
struct Cli {
    /// Configuration file (TOML). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the route table
    Routes,
    /// Navigate to one or more paths and print the resulting view
    Resolve {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// GET a path from the backend API and print the JSON response
    Get { path: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ShellConfig::default(),
    };
    init_logging(&config.observability)?;

    tracing::debug!(
        base_url = %config.api.base_url,
        router_base = %config.router.base,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Routes => {
            let router = app_router(&config.router.base)?;
            for route in router.routes() {
                let target = match &route.target {
                    RouteTarget::View(component) => format!("view {}", component.id()),
                    RouteTarget::Lazy(_) => "lazy view".to_string(),
                    RouteTarget::Redirect(to) => format!("redirect {}", to),
                };
                println!(
                    "{:<20} {:<8} {}",
                    route.path,
                    route.name.as_deref().unwrap_or("-"),
                    target
                );
            }
        }
        Commands::Resolve { paths } => {
            let router = app_router(&config.router.base)?;
            for path in paths {
                let nav = router.navigate(&path).await?;
                match &nav.redirected_from {
                    Some(from) => println!("{} -> {} (redirected from {}) => {}", path, nav.path, from, nav.component.id()),
                    None => println!("{} -> {} => {}", path, nav.path, nav.component.id()),
                }
            }
        }
        Commands::Get { path } => {
            let store = open_store(&config.storage)?;
            let client = ApiClient::from_store(&config.api, &*store)?;
            let json: Value = client.get_json(&path).await?;
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use portfolio_site::config::{load_config, SiteConfig};
use portfolio_site::routing::Params;
use portfolio_site::App;

#[derive(Parser)]
#[command(name = "site-cli")]
#[command(about = "Inspect routes and query the content API", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the route table
    Routes,
    /// Resolve a path to its route and parameters
    Resolve { path: String },
    /// Build the path for a named route
    Url {
        name: String,
        /// Route parameter as key=value (repeatable)
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// GET a content API path and print the JSON body
    Fetch { path: String },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SiteConfig::default(),
    };
    let app = App::new(config)?;

    match cli.command {
        Commands::Routes => {
            for route in app.routes().routes() {
                println!("{:<16} {:<18} {}", route.name, route.pattern.as_str(), route.view.id());
            }
        }
        Commands::Resolve { path } => match app.routes().resolve(&path) {
            Ok(resolved) => {
                let out = serde_json::json!({
                    "route": resolved.name,
                    "view": resolved.view.id(),
                    "params": resolved.params,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Url { name, params } => {
            let params: Params = params.into_iter().collect();
            println!("{}", app.routes().navigate(&name, &params)?);
        }
        Commands::Fetch { path } => {
            let json: Value = app.api().get_json(&path).await?;
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}

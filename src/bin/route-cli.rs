use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use segment_router::config::{load_config, ConfigError};
use segment_router::routing::{PathResolution, Router};

#[derive(Parser)]
#[command(name = "route-cli")]
#[command(about = "Inspect and test segment-router route tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a route table
    Check { config: PathBuf },
    /// Match one or more paths
    Match {
        config: PathBuf,
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// List registered routes in match order
    Routes { config: PathBuf },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { config } => match load_config(&config) {
            Ok(config) => {
                println!(
                    "OK: {} route(s), duplicate policy {:?}",
                    config.routes.len(),
                    config.duplicate_policy
                );
            }
            Err(ConfigError::Validation(errors)) => {
                eprintln!("Invalid route table ({} problem(s)):", errors.len());
                for e in &errors {
                    eprintln!("  - {}", e);
                }
                std::process::exit(1);
            }
            Err(e) => return Err(e.into()),
        },
        Commands::Match { config, paths } => {
            let router = build_router(&config)?;
            for path in &paths {
                let resolution = PathResolution::new(path, router.match_path(path));
                println!("{}", serde_json::to_string_pretty(&resolution)?);
            }
        }
        Commands::Routes { config } => {
            let router = build_router(&config)?;
            let tree = router.load();
            for (pattern, name) in tree.routes() {
                println!("{:<40} {}", pattern, name);
            }
        }
    }

    Ok(())
}

fn build_router(path: &Path) -> Result<Router<String>, Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    Router::from_config(&config).map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        messages.join("; ").into()
    })
}

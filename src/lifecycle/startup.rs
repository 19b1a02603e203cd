//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize logging and metrics
//! - Build the first route tree
//! - Apply validated config updates until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order: config, logging, metrics, routes
//! - After startup, a bad config only costs a failed reload

use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;
use tokio::sync::{broadcast, mpsc};

use crate::config::{load_config, ConfigError, RouterConfig};
use crate::lifecycle::ShutdownReason;
use crate::observability::{logging, metrics};
use crate::routing::{RegistrationError, Router};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{} route(s) failed to register", .0.len())]
    Routes(Vec<RegistrationError>),

    #[error("invalid metrics address `{0}`")]
    MetricsAddress(String),

    #[error("metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

/// Everything a running resolver needs.
pub struct Services {
    pub config: RouterConfig,
    pub router: Router<String>,
}

/// Load `path` and bring subsystems up in order.
///
/// Metrics need a Tokio runtime when enabled.
pub fn start(path: &Path) -> Result<Services, StartupError> {
    let config = load_config(path)?;

    if let Err(e) = logging::init_logging(&config.observability) {
        eprintln!("Logging already initialized: {}", e);
    }

    tracing::info!(
        config = %path.display(),
        routes = config.routes.len(),
        duplicate_policy = ?config.duplicate_policy,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let router = Router::from_config(&config).map_err(StartupError::Routes)?;
    tracing::info!(routes = router.load().len(), "Route tree built");

    Ok(Services { config, router })
}

/// Rebuild the router for every config update until shutdown or the
/// update channel closes.
pub async fn apply_updates(
    router: Router<String>,
    mut updates: mpsc::UnboundedReceiver<RouterConfig>,
    mut shutdown: broadcast::Receiver<ShutdownReason>,
) {
    loop {
        tokio::select! {
            update = updates.recv() => {
                let Some(config) = update else {
                    tracing::debug!("Config update channel closed");
                    break;
                };
                match router.reload(&config) {
                    Ok(revision) => tracing::info!(revision, routes = config.routes.len(), "Routes reloaded"),
                    Err(errors) => {
                        for e in &errors {
                            tracing::warn!(error = %e, "Reload rejected");
                        }
                    }
                }
            }
            reason = shutdown.recv() => {
                match reason {
                    Ok(reason) => tracing::info!(%reason, "Reload task stopping"),
                    Err(_) => tracing::info!("Reload task stopping"),
                }
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouteConfig;
    use crate::lifecycle::Shutdown;

    fn config(routes: &[(&str, &str)]) -> RouterConfig {
        RouterConfig {
            routes: routes
                .iter()
                .map(|(name, pattern)| RouteConfig {
                    name: name.to_string(),
                    pattern: pattern.to_string(),
                })
                .collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_apply_updates_swaps_tree() {
        let router = Router::from_config(&config(&[("old", "/old")])).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        let shutdown = Shutdown::new();

        let task = tokio::spawn(apply_updates(router.clone(), rx, shutdown.subscribe()));

        tx.send(config(&[("new", "/new/{id}")])).unwrap();
        drop(tx);
        task.await.unwrap();

        assert_eq!(router.revision(), 1);
        assert!(router.match_path("/old").is_none());
        assert_eq!(router.match_path("/new/3").unwrap().route, "new");
    }

    #[tokio::test]
    async fn test_apply_updates_stops_on_shutdown() {
        let router = Router::default();
        let (_tx, rx) = mpsc::unbounded_channel();
        let shutdown = Shutdown::new();

        let task = tokio::spawn(apply_updates(router, rx, shutdown.subscribe()));
        shutdown.trigger(ShutdownReason::Signal);
        task.await.unwrap();
    }
}

//! Engine binary.
//!
//! Boots the routing engine from configuration, registers the built-in
//! status module, and either serves HTTP or dispatches a single CLI
//! route.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::net::TcpListener;

use gantry::config::{load_config, EngineConfig};
use gantry::http::{ActionResponse, HttpServer, Method};
use gantry::observability::{logging, metrics};
use gantry::orm::{Model, Query, SqliteExecutor};
use gantry::routing::{
    Controller, ControllerRegistry, Module, ModuleRoutes, RouteOptions, Router,
};

#[derive(Parser)]
#[command(name = "gantry", about = "Modular MVC routing engine", version)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (the default when no subcommand is given).
    Serve,
    /// Dispatch one CLI route and print the response.
    Cli {
        /// Route path, e.g. `/status/refresh`.
        path: String,
    },
}

/// Built-in status module: engine identity plus a view of the tables
/// reachable through the configured database.
struct StatusModule {
    executor: Arc<SqliteExecutor>,
}

impl Module for StatusModule {
    fn name(&self) -> &'static str {
        "Status"
    }

    fn routes(&self, routes: &mut ModuleRoutes<'_>) {
        routes.api(
            Method::Get,
            "/api/v1/status",
            RouteOptions::new("StatusController", "show"),
        );
        routes.api(
            Method::Cli,
            "/status/refresh",
            RouteOptions::new("StatusController", "refresh"),
        );
    }

    fn controllers(&self, registry: &mut ControllerRegistry) {
        let executor = self.executor.clone();
        registry.register(self.name(), "StatusController", move || StatusController {
            executor: executor.clone(),
        });
    }
}

struct StatusController {
    executor: Arc<SqliteExecutor>,
}

impl Controller for StatusController {
    fn has_action(&self, action: &str) -> bool {
        matches!(action, "show" | "refresh")
    }

    fn call(&self, action: &str, _parameters: &[String]) -> gantry::Result<ActionResponse> {
        match action {
            "show" => {
                let tables: Vec<serde_json::Value> =
                    Query::table(self.executor.clone(), "sqlite_master")
                        .select(["name"])
                        .filter("type", "=", "table")
                        .all()?
                        .iter()
                        .map(Model::to_json)
                        .collect();

                Ok(ActionResponse::Json(json!({
                    "engine": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION"),
                    "tables": tables,
                })))
            }
            "refresh" => Ok(ActionResponse::Json(json!({ "refreshed": true }))),
            _ => unreachable!("dispatcher checks has_action first"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };

    logging::init(&config.observability.log_filter);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "configuration loaded"
    );

    let executor = Arc::new(SqliteExecutor::open(&config.database.path)?);
    tracing::info!(path = %config.database.path, "database opened");

    let status = StatusModule { executor };
    let router = Arc::new(Router::from_modules(&[&status]));

    match args.command.unwrap_or(Command::Serve) {
        Command::Cli { path } => {
            let dispatched = router.dispatch_cli(&path)?;
            match dispatched.response {
                ActionResponse::Json(value) => {
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
                ActionResponse::View { body, .. } => println!("{body}"),
                ActionResponse::Empty => {}
            }
        }
        Command::Serve => {
            if config.observability.metrics_enabled {
                match config.observability.metrics_address.parse() {
                    Ok(addr) => metrics::init_metrics(addr),
                    Err(_) => tracing::error!(
                        metrics_address = %config.observability.metrics_address,
                        "failed to parse metrics address"
                    ),
                }
            }

            let listener = TcpListener::bind(&config.listener.bind_address).await?;
            tracing::info!(address = %listener.local_addr()?, "listening for connections");

            let server = HttpServer::new(&config, router);
            server.run(listener).await?;

            tracing::info!("shutdown complete");
        }
    }

    Ok(())
}

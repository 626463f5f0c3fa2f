use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;
use thiserror::Error;

use crate::api::{self, AppState, views::NoteView};
use crate::config::{Config, ConfigError};
use crate::markdown::{render_markdown, render_terminal};
use crate::store::Store;
use crate::utils::{Profile, expand_path};

#[derive(Parser)]
#[command(name = "marknote")]
#[command(about = "Markdown notes in notebooks and tags, served over a small JSON API")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses a separate dev config)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default if no subcommand)
    Serve {
        /// Address to bind, overrides the config file
        #[arg(long)]
        host: Option<String>,
        /// Port to bind, overrides the config file
        #[arg(long)]
        port: Option<u16>,
        /// Start with an empty store instead of the demo data
        #[arg(long)]
        no_seed: bool,
    },
    /// Render a markdown file to the terminal, or to sanitized HTML
    Render {
        /// Markdown file to render
        file: PathBuf,
        /// Print HTML instead of terminal output
        #[arg(long)]
        html: bool,
    },
    /// Print the demo dataset as JSON
    Fixtures,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Server error: {0}")]
    ServerError(#[from] std::io::Error),
    #[error("Failed to serialize output: {0}")]
    SerializeError(#[from] serde_json::Error),
}

impl Cli {
    /// The selected subcommand, `serve` when none was given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve {
            host: None,
            port: None,
            no_seed: false,
        })
    }

    /// Load the config named by `--config`, or the profile's default one
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        match &self.config {
            Some(path) => Config::load_from(&expand_path(path)),
            None => {
                let profile = if self.dev { Profile::Dev } else { Profile::Prod };
                Config::load_with_profile(profile)
            }
        }
    }
}

/// Handle the serve command
pub async fn handle_serve(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
    no_seed: bool,
) -> Result<(), CliError> {
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if no_seed {
        config.seed_demo_data = false;
    }

    let store = if config.seed_demo_data {
        Store::with_demo_data()
    } else {
        Store::new()
    };
    let addr = config.socket_addr()?;
    let app = api::app(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Handle the render command
pub fn handle_render(file: PathBuf, html: bool) -> Result<(), CliError> {
    let markdown = fs::read_to_string(&file).map_err(|source| CliError::ReadError {
        path: file.clone(),
        source,
    })?;

    if html {
        println!("{}", render_markdown(&markdown));
    } else {
        print!("{}", render_terminal(&markdown));
    }
    Ok(())
}

/// Handle the fixtures command
pub fn handle_fixtures() -> Result<(), CliError> {
    println!("{}", fixtures_json()?);
    Ok(())
}

/// The demo dataset as pretty-printed JSON
pub fn fixtures_json() -> Result<String, CliError> {
    let store = Store::with_demo_data();
    let notes: Vec<NoteView> = store
        .get_notes(None)
        .into_iter()
        .map(|note| NoteView::with_tags(&store, note))
        .collect();

    let dataset = json!({
        "notebooks": store.get_notebooks(),
        "notes": notes,
        "tags": store.get_tags(),
        "searchHistory": store.get_search_history(),
    });
    Ok(serde_json::to_string_pretty(&dataset)?)
}

/// Resolve on Ctrl-C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::parse_from(["marknote"]);
        assert!(matches!(
            cli.command(),
            Commands::Serve {
                host: None,
                port: None,
                no_seed: false
            }
        ));
    }

    #[test]
    fn serve_flags_parse() {
        let cli = Cli::parse_from(["marknote", "--dev", "serve", "--port", "8080", "--no-seed"]);
        assert!(cli.dev);
        assert!(matches!(
            cli.command(),
            Commands::Serve {
                port: Some(8080),
                no_seed: true,
                ..
            }
        ));
    }

    #[test]
    fn explicit_config_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "port = 7000\n").unwrap();

        let cli = Cli::parse_from(["marknote", "--config", path.to_str().unwrap(), "fixtures"]);
        let config = cli.load_config().unwrap();
        assert_eq!(config.port, 7000);
    }

    #[test]
    fn fixtures_json_lists_demo_data() {
        let json: serde_json::Value = serde_json::from_str(&fixtures_json().unwrap()).unwrap();
        assert_eq!(json["notebooks"].as_array().unwrap().len(), 3);
        assert_eq!(json["notes"].as_array().unwrap().len(), 4);
        assert_eq!(json["searchHistory"][0]["query"], "website design");
        assert!(json["notes"][0]["tags"].is_array());
    }

    #[test]
    fn render_missing_file_reports_path() {
        let err = handle_render(PathBuf::from("/definitely/not/here.md"), true).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.md"));
    }
}

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::AppConfig;
use crate::routes::app_router;
use crate::runtime_config::RuntimeConfig;
use crate::server::{AppService, HttpServer};
use crate::state::AppState;
use crate::static_files::StaticFiles;
use crate::store::{to_pretty, Kind, Store};
use crate::templates::Templates;

/// Command-line interface for kuweb
#[derive(Debug, Parser)]
#[command(name = "kuweb")]
#[command(about = "Small web application backed by JSON files", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// TOML configuration file
        #[arg(short, long, env = "KUWEB_CONFIG")]
        config: Option<PathBuf>,

        /// Interface to bind (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory of JSON collection files (overrides the config file)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Print the stored records of one kind
    Dump {
        /// Record kind: user, message or todo
        kind: String,

        #[arg(short, long, env = "KUWEB_CONFIG")]
        config: Option<PathBuf>,

        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path),
        None => Ok(AppConfig::default()),
    }
}

/// Build the application state from `config`, bind the server and block
/// until the accept loop ends.
fn serve(config: &AppConfig) -> Result<()> {
    RuntimeConfig::from_env().apply();

    let store = Store::open(&config.storage.data_dir).with_context(|| {
        format!(
            "cannot open data directory {}",
            config.storage.data_dir.display()
        )
    })?;
    let state = AppState::new(
        store,
        Templates::new(&config.web.template_dir),
        StaticFiles::new(&config.web.static_dir),
    );
    let service = AppService::new(app_router(), state);
    let addr = config.bind_addr();
    let handle = HttpServer(service)
        .start(addr.as_str())
        .with_context(|| format!("cannot bind {addr}"))?;
    info!(addr = %handle.addr(), "Listening");

    handle
        .join()
        .map_err(|_| anyhow!("accept loop terminated abnormally"))
}

/// Pretty JSON of every stored record of `kind`.
pub(super) fn dump(kind: &str, data_dir: &Path) -> Result<String> {
    let kind = Kind::parse(kind).ok_or_else(|| anyhow!("unknown record kind `{kind}`"))?;
    let store = Store::open(data_dir)?;
    let records = store.load(kind)?;
    Ok(to_pretty(&records))
}

/// Execute an already parsed command line.
pub fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            data_dir,
        } => {
            let mut config = load_config(config.as_ref())?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(data_dir) = data_dir {
                config.storage.data_dir = data_dir;
            }
            serve(&config)
        }
        Commands::Dump {
            kind,
            config,
            data_dir,
        } => {
            let config = load_config(config.as_ref())?;
            let data_dir = data_dir.unwrap_or(config.storage.data_dir);
            println!("{}", dump(&kind, &data_dir)?);
            Ok(())
        }
    }
}

/// Parse `std::env::args` and run the selected command.
pub fn run_cli() -> Result<()> {
    run_command(Cli::parse())
}

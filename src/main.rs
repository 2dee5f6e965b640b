//! # Mailflow CLI
//!
//! Command-line interface for the Mailflow dashboard backend.
//!
//! ## Usage
//!
//! ```bash
//! # Run the HTTP API
//! mailflow serve --listen 0.0.0.0:8080 --storage-url https://xyz.example.co
//!
//! # Show the AI settings in effect (API key masked)
//! mailflow config show
//!
//! # Write default AI settings files
//! mailflow config init
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use mailflow::{
    MailflowError,
    ai::ConfigStore,
    server::{self, ServerConfig},
};

/// Mailflow - email template editor and dashboard backend
#[derive(Parser, Debug)]
#[command(name = "mailflow")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding ai-config.json and ai-prompts.json
    #[arg(long, global = true, env = "MAILFLOW_CONFIG_DIR", default_value = "config")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Address to listen on
        #[arg(long, env = "MAILFLOW_LISTEN", default_value = "127.0.0.1:8080")]
        listen: String,

        /// Hosted backend base URL (auth, storage, database)
        #[arg(long, env = "MAILFLOW_STORAGE_URL")]
        storage_url: String,

        /// Hosted backend service key
        #[arg(long, env = "MAILFLOW_STORAGE_KEY", hide_env_values = true)]
        storage_key: String,

        /// Storage bucket for user assets
        #[arg(long, env = "MAILFLOW_BUCKET", default_value = "email-assets")]
        bucket: String,
    },

    /// Inspect or create the AI settings files
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the AI config and prompts in effect
    Show,

    /// Write default AI config and prompts
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), MailflowError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            listen,
            storage_url,
            storage_key,
            bucket,
        } => {
            server::serve(ServerConfig {
                listen_addr: listen,
                storage_url,
                storage_key,
                bucket,
                config_dir: cli.config_dir,
            })
            .await
        }
        Commands::Config { action } => {
            let store = ConfigStore::new(cli.config_dir);
            match action {
                ConfigAction::Show => {
                    let settings = serde_json::json!({
                        "config": store.load_config().redacted(),
                        "prompts": store.load_prompts(),
                    });
                    let text = serde_json::to_string_pretty(&settings)
                        .map_err(mailflow::error::ConfigError::from)?;
                    println!("{}", text);
                }
                ConfigAction::Init { force } => {
                    let written = store.init(force)?;
                    if written.is_empty() {
                        println!(
                            "AI settings already exist in {} (use --force to overwrite)",
                            store.dir().display()
                        );
                    }
                    for path in written {
                        println!("Wrote {}", path.display());
                    }
                }
            }
            Ok(())
        }
    }
}

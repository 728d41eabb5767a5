//! # Epitome CLI
//!
//! *"From many words, the essence"*
//!
//! The main command-line interface for the Epitome summarization stack.

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "epitome")]
#[command(author = "Daemoniorum Engineering")]
#[command(version)]
#[command(about = "Summarization model serving", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the inference server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// API generation served at bare /infer (v1 or v2)
        #[arg(short, long, default_value = "v2")]
        api: String,

        /// Pipeline to preload, as `<id>=<repo>` or a bare repo ID.
        /// Repeatable.
        #[arg(short, long)]
        model: Vec<String>,

        /// Registry id the v1 endpoint serves
        #[arg(short, long)]
        default_model: Option<String>,
    },

    /// Summarize a prompt locally, without a server
    Summarize {
        /// The text to summarize
        prompt: String,

        /// Model to use (HuggingFace repo ID or local path)
        #[arg(short, long)]
        model: Option<String>,

        /// Maximum summary length in tokens
        #[arg(long)]
        max_length: Option<u32>,

        /// Minimum summary length in tokens
        #[arg(long)]
        min_length: Option<u32>,
    },

    /// Manage models
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Display version and build info
    Version,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ModelAction {
    /// Download a model into the local cache
    Pull {
        /// Model identifier (HuggingFace repo ID)
        model: String,

        /// Specific revision to download
        #[arg(short, long)]
        revision: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set default model
    SetModel {
        /// Model identifier (HuggingFace repo ID or local path)
        model: String,
    },

    /// Clear default model
    ClearModel,

    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let telemetry_config = pelican::TelemetryConfig::new("epitome").with_log_level(&cli.log_level);
    let telemetry_config = if cli.json_logs {
        telemetry_config.with_json_logs()
    } else {
        telemetry_config
    };
    pelican::init_logging(&telemetry_config);

    let cfg = config::Config::load();

    match cli.command {
        Commands::Serve {
            host,
            port,
            api,
            model,
            default_model,
        } => {
            // Fall back to configured pipelines when none are given.
            let specs = if model.is_empty() {
                cfg.models.clone()
            } else {
                model
            };
            commands::serve(host, port, api, specs, default_model).await?;
        }

        Commands::Summarize {
            prompt,
            model,
            max_length,
            min_length,
        } => {
            let model = model.or(cfg.default_model.clone());
            let max_length = max_length.unwrap_or(cfg.max_length);
            let min_length = min_length.unwrap_or(cfg.min_length);
            commands::summarize(prompt, model, max_length, min_length).await?;
        }

        Commands::Model { action } => match action {
            ModelAction::Pull { model, revision } => commands::model_pull(model, revision)?,
        },

        Commands::Version => {
            commands::version();
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                config::show_config();
            }
            ConfigAction::SetModel { model } => {
                let mut cfg = config::Config::load();
                match cfg.set_default_model(&model) {
                    Ok(()) => {
                        println!("Default model set to: {}", model);
                        println!("Config saved to: {}", config::Config::config_path().display());
                    }
                    Err(e) => {
                        eprintln!("Failed to save config: {}", e);
                    }
                }
            }
            ConfigAction::ClearModel => {
                let mut cfg = config::Config::load();
                match cfg.clear_default_model() {
                    Ok(()) => {
                        println!("Default model cleared.");
                    }
                    Err(e) => {
                        eprintln!("Failed to save config: {}", e);
                    }
                }
            }
            ConfigAction::Path => {
                println!("{}", config::Config::config_path().display());
            }
        },
    }

    Ok(())
}

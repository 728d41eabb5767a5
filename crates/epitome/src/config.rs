//! Configuration management for the Epitome CLI.
//!
//! Configuration is loaded from (in order of precedence):
//! 1. Command-line arguments
//! 2. Environment variables (EPITOME_*)
//! 3. Config file (~/.config/epitome/config.toml)
//! 4. Default values

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default model for `summarize` when --model is not specified.
    #[serde(default)]
    pub default_model: Option<String>,

    /// Pipelines `serve` preloads when no --model flags are given, as
    /// `<id>=<repo>` specs.
    #[serde(default = "default_models")]
    pub models: Vec<String>,

    /// Default maximum summary length.
    #[serde(default = "default_max_length")]
    pub max_length: u32,

    /// Default minimum summary length.
    #[serde(default = "default_min_length")]
    pub min_length: u32,

    /// Server host.
    #[serde(default = "default_host")]
    pub server_host: String,

    /// Server port.
    #[serde(default = "default_port")]
    pub server_port: u16,
}

fn default_models() -> Vec<String> {
    vec!["t5=t5-small".to_string()]
}

fn default_max_length() -> u32 {
    142
}

fn default_min_length() -> u32 {
    56
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_model: None,
            models: default_models(),
            max_length: default_max_length(),
            min_length: default_min_length(),
            server_host: default_host(),
            server_port: default_port(),
        }
    }
}

impl Config {
    /// Loads configuration from all sources.
    ///
    /// Reports warnings for configuration errors but falls back to defaults.
    pub fn load() -> Self {
        let config_path = Self::config_path();

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_path))
            .merge(Env::prefixed("EPITOME_"));

        match figment.extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                eprintln!("\x1b[33mWarning:\x1b[0m Configuration error, using defaults");
                eprintln!("  Config file: {}", config_path.display());
                eprintln!("  Error: {}", e);
                eprintln!();
                eprintln!("  To fix, edit or delete the config file:");
                eprintln!("    rm {}", config_path.display());
                eprintln!();
                Config::default()
            }
        }
    }

    /// Returns the path to the config file.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Returns the path to the config directory.
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("epitome")
    }

    /// Saves the current configuration to the config file.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_dir = Self::config_dir();
        std::fs::create_dir_all(&config_dir)?;

        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

        std::fs::write(Self::config_path(), toml_str)?;
        Ok(())
    }

    /// Sets the default model and saves.
    pub fn set_default_model(&mut self, model: &str) -> Result<(), std::io::Error> {
        self.default_model = Some(model.to_string());
        self.save()
    }

    /// Clears the default model and saves.
    pub fn clear_default_model(&mut self) -> Result<(), std::io::Error> {
        self.default_model = None;
        self.save()
    }
}

/// Prints the current configuration and its sources.
pub fn show_config() {
    let config = Config::load();
    let config_path = Config::config_path();

    println!("Epitome Configuration");
    println!("=====================\n");

    println!("Config file: {}", config_path.display());
    if config_path.exists() {
        println!("Status: Found\n");
    } else {
        println!("Status: Not found (using defaults)\n");
    }

    println!("Current settings:");
    println!(
        "  default_model: {}",
        config.default_model.as_deref().unwrap_or("(not set)")
    );
    println!("  models: {}", config.models.join(", "));
    println!("  max_length: {}", config.max_length);
    println!("  min_length: {}", config.min_length);
    println!("  server_host: {}", config.server_host);
    println!("  server_port: {}", config.server_port);

    println!("\nEnvironment variables:");
    println!("  EPITOME_DEFAULT_MODEL");
    println!("  EPITOME_MAX_LENGTH");
    println!("  EPITOME_MIN_LENGTH");
    println!("  EPITOME_SERVER_HOST");
    println!("  EPITOME_SERVER_PORT");
}

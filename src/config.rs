// Configuration management for route-lister
// Supports CLI arguments, config file (TOML), and environment variables

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use tracing::Level;

/// route-lister - Print the kernel routing table as structured records
#[derive(Parser, Debug, Clone)]
#[command(name = "route-lister")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Output format
    #[arg(short, long, value_enum, env = "ROUTE_LISTER_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Logging level (error, warn, info, debug, trace)
    #[arg(short, long, env = "ROUTE_LISTER_LOG")]
    pub log_level: Option<String>,

    /// Path to configuration file
    #[arg(short, long, env = "ROUTE_LISTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Program used to list routes
    #[arg(long, env = "ROUTE_LISTER_PROGRAM")]
    pub program: Option<String>,

    /// Print only the route that would be used to reach this address
    #[arg(long)]
    pub lookup: Option<IpAddr>,

    /// Emit compact JSON instead of pretty-printed
    #[arg(long, env = "ROUTE_LISTER_COMPACT")]
    pub compact: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Text,
}

/// Configuration file structure (TOML format)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Route listing command
    #[serde(default)]
    pub command: CommandConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Program to execute
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments listing the main routing table
    #[serde(default = "default_args")]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Pretty-print JSON
    #[serde(default = "default_true")]
    pub pretty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_program() -> String {
    "ip".to_string()
}
fn default_args() -> Vec<String> {
    vec!["route".to_string(), "list".to_string()]
}
fn default_format() -> OutputFormat {
    OutputFormat::Json
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for CommandConfig {
    fn default() -> Self {
        CommandConfig {
            program: default_program(),
            args: default_args(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            format: default_format(),
            pretty: default_true(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

/// Merged configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub program: String,
    pub args: Vec<String>,
    pub format: OutputFormat,
    pub pretty: bool,
    pub log_level: Level,
    pub lookup: Option<IpAddr>,
}

impl Config {
    /// Load configuration from all sources (CLI args, config file, defaults)
    /// Priority: CLI args > Environment variables > Config file > Defaults
    pub fn load() -> anyhow::Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    pub fn from_args(cli_args: CliArgs) -> anyhow::Result<Self> {
        let config_file = if let Some(config_path) = &cli_args.config {
            read_config_file(config_path)?
        } else {
            // Try loading from default locations
            let default_paths = [
                PathBuf::from("route-lister.toml"),
                PathBuf::from("config.toml"),
            ];

            match default_paths.iter().find(|path| path.exists()) {
                Some(path) => read_config_file(path)?,
                None => ConfigFile::default(),
            }
        };

        Self::merge(cli_args, config_file)
    }

    fn merge(cli_args: CliArgs, config_file: ConfigFile) -> anyhow::Result<Self> {
        let program = cli_args.program.unwrap_or(config_file.command.program);
        let format = cli_args.format.unwrap_or(config_file.output.format);
        let pretty = !cli_args.compact && config_file.output.pretty;

        let log_level = parse_log_level(
            cli_args
                .log_level
                .as_deref()
                .unwrap_or(&config_file.logging.level),
        )?;

        Ok(Config {
            program,
            args: config_file.command.args,
            format,
            pretty,
            log_level,
            lookup: cli_args.lookup,
        })
    }
}

fn read_config_file(path: &Path) -> anyhow::Result<ConfigFile> {
    let config_content = std::fs::read_to_string(path)?;
    Ok(toml::from_str::<ConfigFile>(&config_content)?)
}

fn parse_log_level(level_str: &str) -> anyhow::Result<Level> {
    match level_str.to_lowercase().as_str() {
        "error" => Ok(Level::ERROR),
        "warn" => Ok(Level::WARN),
        "info" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" => Ok(Level::TRACE),
        _ => Err(anyhow::anyhow!("Invalid log level: {}", level_str)),
    }
}

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{ConfigError, PipelineConfig};

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "recording-architect.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "recording-architect",
    version,
    about = "Turn recorded browser scripts into page-object architectures"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: recording-architect.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the page-object architecture of a recorded script
    Analyze {
        /// Recorded script file
        script: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
        format: OutputFormat,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Append stage trace events to this JSONL file
        #[arg(long)]
        trace: Option<String>,
    },

    /// List the actions extracted from a recorded script
    Actions {
        /// Recorded script file
        script: String,
    },

    /// List the interaction patterns recognized in a recorded script
    Patterns {
        /// Recorded script file
        script: String,
    },

    /// Show the ranked locator strategies of every targeted action
    Locators {
        /// Recorded script file
        script: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Summary,
    Json,
    Yaml,
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load the pipeline config. A missing file yields defaults; an unreadable,
/// malformed or invalid one is an error.
pub fn load_config(path: Option<&str>) -> Result<PipelineConfig, ConfigError> {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => PipelineConfig::from_yaml(config_path, &content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PipelineConfig::default()),
        Err(source) => Err(ConfigError::Read {
            path: config_path.to_string(),
            source,
        }),
    }
}

use clap::Parser;
use recording_architect::cli::commands::{cmd_actions, cmd_analyze, cmd_locators, cmd_patterns};
use recording_architect::cli::config::{Cli, Commands, load_config};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            script,
            format,
            output,
            trace,
        } => {
            cmd_analyze(&script, format, output.as_deref(), trace.as_deref(), config)?;
        }
        Commands::Actions { script } => cmd_actions(&script)?,
        Commands::Patterns { script } => cmd_patterns(&script, &config)?,
        Commands::Locators { script } => cmd_locators(&script)?,
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

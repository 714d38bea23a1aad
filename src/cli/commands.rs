use tracing::info;

use crate::Pipeline;
use crate::cli::config::OutputFormat;
use crate::config::PipelineConfig;
use crate::locator::generate;
use crate::pattern::detect_patterns;
use crate::report::{format_actions, format_locators, format_patterns, format_summary};
use crate::script::{Action, extract};
use crate::trace::TraceLogger;

// ============================================================================
// analyze subcommand
// ============================================================================

pub fn cmd_analyze(
    script: &str,
    format: OutputFormat,
    output: Option<&str>,
    trace: Option<&str>,
    config: PipelineConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let tracer = match trace {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };
    let architecture = Pipeline::new(config).with_tracer(tracer).run_file(script)?;

    let rendered = match format {
        OutputFormat::Summary => format_summary(&architecture),
        OutputFormat::Json => serde_json::to_string_pretty(&architecture)? + "\n",
        OutputFormat::Yaml => serde_yaml::to_string(&architecture)?,
    };

    match output {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            info!(path, "wrote architecture");
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

// ============================================================================
// Inspection subcommands
// ============================================================================

pub fn cmd_actions(script: &str) -> Result<(), Box<dyn std::error::Error>> {
    let actions = load_actions(script)?;
    print!("{}", format_actions(&actions));
    Ok(())
}

pub fn cmd_patterns(script: &str, config: &PipelineConfig) -> Result<(), Box<dyn std::error::Error>> {
    let actions = load_actions(script)?;
    let patterns = detect_patterns(&actions, config);
    print!("{}", format_patterns(&patterns));
    Ok(())
}

pub fn cmd_locators(script: &str) -> Result<(), Box<dyn std::error::Error>> {
    let actions = load_actions(script)?;
    let locators: Vec<_> = actions.iter().map(generate).collect();
    print!("{}", format_locators(&actions, &locators));
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Read and extract a script file.
pub fn load_actions(path: &str) -> Result<Vec<Action>, Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    Ok(extract(&source)?)
}

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    architecture::{Architecture, build_elements, build_methods, extract_navigation, organize},
    config::PipelineConfig,
    context::extract_contexts,
    naming::ModuleRegistries,
    pattern::detect_patterns,
    script::{Action, ParseError, extract},
    trace::{TraceEvent, TraceLogger},
};

pub mod architecture;
pub mod cli;
pub mod config;
pub mod context;
pub mod locator;
pub mod naming;
pub mod pattern;
pub mod report;
pub mod script;
pub mod trace;

/// Fatal pipeline failures. Everything else degrades to an omission.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read script {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

// ============================================================================
// Pipeline
// ============================================================================

/// Script → actions → patterns → contexts → locators/names → architecture.
pub struct Pipeline {
    config: PipelineConfig,
    tracer: TraceLogger,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            tracer: TraceLogger::disabled(),
        }
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run_file(&self, path: impl AsRef<Path>) -> Result<Architecture, PipelineError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| PipelineError::Read {
            path: path.display().to_string(),
            source,
        })?;
        self.run(&source)
    }

    /// Parse `source` and analyze its actions. A parse failure yields no
    /// partial result.
    pub fn run(&self, source: &str) -> Result<Architecture, PipelineError> {
        let actions = extract(source)?;
        self.tracer
            .log(&TraceEvent::now("extract").with_count(actions.len()));
        Ok(self.analyze(&actions))
    }

    /// Run every stage after extraction. Infallible: anything that cannot
    /// be materialized is recorded as an omission.
    pub fn analyze(&self, actions: &[Action]) -> Architecture {
        let patterns = detect_patterns(actions, &self.config);
        self.tracer
            .log(&TraceEvent::now("patterns").with_count(patterns.len()));

        let contexts = extract_contexts(actions, &patterns, &self.config);
        self.tracer
            .log(&TraceEvent::now("contexts").with_count(contexts.len()));

        let mut navigation = extract_navigation(actions, &contexts, &self.config);
        self.tracer.log(
            &TraceEvent::now("navigation").with_count(
                navigation
                    .shared
                    .as_ref()
                    .map(|s| s.elements.len())
                    .unwrap_or(0),
            ),
        );

        let mut registries = ModuleRegistries::new();
        let element_set = build_elements(actions, &contexts, &mut navigation, &mut registries);
        self.tracer
            .log(&TraceEvent::now("elements").with_count(element_set.elements.len()));

        let (methods, method_omissions) =
            build_methods(actions, &patterns, &contexts, &element_set, &mut registries);
        self.tracer
            .log(&TraceEvent::now("methods").with_count(methods.len()));

        let mut omissions = element_set.omissions;
        omissions.extend(method_omissions);
        let architecture = organize(navigation, element_set.elements, methods, omissions);

        for omission in &architecture.omissions {
            debug!(
                kind = omission.kind.as_str(),
                action = ?omission.action_index,
                subject = %omission.subject,
                "omitted"
            );
            self.tracer
                .log(&TraceEvent::now("omission").with_omission(omission));
        }

        let fingerprint = architecture.fingerprint();
        info!(
            actions = actions.len(),
            patterns = patterns.len(),
            groupings = architecture.page_groupings.len(),
            elements = architecture.element_count(),
            methods = architecture.method_count(),
            omissions = architecture.omissions.len(),
            fingerprint = %fingerprint,
            "architecture built"
        );
        self.tracer.log(
            &TraceEvent::now("organize")
                .with_count(architecture.page_groupings.len())
                .with_detail(fingerprint),
        );

        architecture
    }
}

/// Run the full pipeline over recorded script text.
pub fn run_pipeline(source: &str, config: &PipelineConfig) -> Result<Architecture, PipelineError> {
    Pipeline::new(config.clone()).run(source)
}

/// Run every stage after extraction over already-extracted actions.
pub fn analyze_actions(actions: &[Action], config: &PipelineConfig) -> Architecture {
    Pipeline::new(config.clone()).analyze(actions)
}

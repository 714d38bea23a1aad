pub mod error;
pub mod pipeline_config;
pub mod vocabulary;

pub use error::ConfigError;
pub use pipeline_config::{DetectionConfig, PipelineConfig};
pub use vocabulary::{ModuleDefinition, Vocabulary};

pub mod context_model;
pub mod extractor;

pub use context_model::{ElementContext, ElementKind, UNKNOWN_MODULE, context_at};
pub use extractor::{element_kind, extract_contexts, extract_element_context, resolve_module};

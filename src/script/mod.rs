//! Recorded script parsing and action extraction.

pub mod action_model;
pub mod ast;
pub mod error;
pub mod extractor;
pub mod syntax;

pub use action_model::{
    Action, ActionType, LocatorDescriptor, LocatorKind, action_at, position_of,
};
pub use error::ParseError;
pub use extractor::{extract, extract_program};
pub use syntax::parse;

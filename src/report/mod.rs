pub mod console;

pub use console::{format_actions, format_locators, format_patterns, format_summary};

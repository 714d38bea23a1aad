pub mod registry;
pub mod resolver;
pub mod step_text;

pub use registry::{ModuleRegistries, NameRegistry};
pub use resolver::{
    action_method_base, base_element_name, pattern_method_base, resolve_element_name,
    resolve_method_name, sanitize_hint, to_camel_case, to_pascal_case,
};
pub use step_text::{describe_action, describe_pattern};

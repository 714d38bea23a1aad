use serde::{Deserialize, Serialize};

use crate::script::ActionType;

/// Module name for entities no rule could place.
pub const UNKNOWN_MODULE: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Button,
    Link,
    Textbox,
    Dropdown,
    Option,
    Checkbox,
    Radio,
    Table,
    Row,
    Toast,
    Heading,
    Dialog,
    Image,
    Generic,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Button => "button",
            ElementKind::Link => "link",
            ElementKind::Textbox => "textbox",
            ElementKind::Dropdown => "dropdown",
            ElementKind::Option => "option",
            ElementKind::Checkbox => "checkbox",
            ElementKind::Radio => "radio",
            ElementKind::Table => "table",
            ElementKind::Row => "row",
            ElementKind::Toast => "toast",
            ElementKind::Heading => "heading",
            ElementKind::Dialog => "dialog",
            ElementKind::Image => "image",
            ElementKind::Generic => "element",
        }
    }
}

/// What an action's target is, where it lives and why it was touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementContext {
    pub action_index: usize,
    pub element_kind: ElementKind,

    /// Owning module, or `Unknown`
    pub module: String,

    pub purpose: String,
    pub action_type: ActionType,

    /// Human-facing label of the target (name, placeholder, label or text)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_term: Option<String>,
}

impl ElementContext {
    pub fn is_assigned(&self) -> bool {
        self.module != UNKNOWN_MODULE
    }
}

/// Context of the action recorded at `index`.
pub fn context_at(contexts: &[ElementContext], index: usize) -> Option<&ElementContext> {
    match contexts.binary_search_by_key(&index, |c| c.action_index) {
        Ok(pos) => contexts.get(pos),
        Err(_) => contexts.iter().find(|c| c.action_index == index),
    }
}

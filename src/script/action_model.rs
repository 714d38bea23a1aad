use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Recorded actions
// ============================================================================

/// Normalized classification of a recorded interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Navigation,
    Click,
    Fill,
    Select,
    Check,
    Uncheck,
    Press,
    Hover,
    Upload,
    Wait,
    Assertion,
    Generic,
}

impl ActionType {
    /// Classify a recorder method name using the fixed method table.
    ///
    /// `verified` is true when the call hangs off an `expect(...)` receiver,
    /// in which case every `to*` matcher is an assertion.
    pub fn from_method(method: &str, verified: bool) -> ActionType {
        if verified && method.starts_with("to") {
            return ActionType::Assertion;
        }

        match method {
            "click" | "dblclick" | "tap" => ActionType::Click,
            "fill" | "type" | "pressSequentially" | "clear" => ActionType::Fill,
            "selectOption" => ActionType::Select,
            "check" | "setChecked" => ActionType::Check,
            "uncheck" => ActionType::Uncheck,
            "press" => ActionType::Press,
            "hover" => ActionType::Hover,
            "setInputFiles" => ActionType::Upload,
            "goto" | "goBack" | "goForward" | "reload" => ActionType::Navigation,
            "waitForURL" | "waitForLoadState" | "waitForTimeout" | "waitForSelector" => {
                ActionType::Wait
            }
            "isVisible" | "isHidden" | "textContent" => ActionType::Assertion,
            _ => ActionType::Generic,
        }
    }

    /// Short verb used in step descriptions and method names.
    pub fn verb(&self) -> &'static str {
        match self {
            ActionType::Navigation => "open",
            ActionType::Click => "click",
            ActionType::Fill => "fill",
            ActionType::Select => "select",
            ActionType::Check => "check",
            ActionType::Uncheck => "uncheck",
            ActionType::Press => "press",
            ActionType::Hover => "hover",
            ActionType::Upload => "upload",
            ActionType::Wait => "wait",
            ActionType::Assertion => "verify",
            ActionType::Generic => "perform",
        }
    }
}

/// How the recorder located the target element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorKind {
    Role,
    Text,
    Placeholder,
    Label,
    TestId,
    RawSelector,
}

/// How the recorder located the element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocatorDescriptor {
    pub kind: LocatorKind,

    /// Role name, text, placeholder, label, test id or raw selector
    pub value: String,

    /// Accessible name (`{ name: ... }` option)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// `{ exact: true }` option
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact: Option<bool>,

    /// Source text of the enclosing locator chain, when the target was
    /// located inside another locator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl LocatorDescriptor {
    pub fn new(kind: LocatorKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            name: None,
            exact: None,
            scope: None,
        }
    }

    pub fn role(role: &str, name: Option<&str>) -> Self {
        Self {
            name: name.map(|n| n.to_string()),
            ..Self::new(LocatorKind::Role, role)
        }
    }

    pub fn with_exact(mut self, exact: bool) -> Self {
        self.exact = Some(exact);
        self
    }

    /// Role name when this descriptor is role-based.
    pub fn role_name(&self) -> Option<&str> {
        match self.kind {
            LocatorKind::Role => Some(self.value.as_str()),
            _ => None,
        }
    }

    /// Best human-facing label: accessible name, then the value for
    /// text-like kinds.
    pub fn human_label(&self) -> Option<&str> {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return Some(name);
        }
        match self.kind {
            LocatorKind::Text | LocatorKind::Placeholder | LocatorKind::Label => {
                Some(self.value.as_str()).filter(|v| !v.trim().is_empty())
            }
            _ => None,
        }
    }

    /// Lowercased haystack of every string in the descriptor, used by the
    /// keyword detectors.
    pub fn search_text(&self) -> String {
        let mut text = self.value.to_lowercase();
        if let Some(name) = &self.name {
            text.push(' ');
            text.push_str(&name.to_lowercase());
        }
        text
    }
}

/// One normalized recorded interaction step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Stable identifier, `action-<n>` with n 1-based
    pub id: String,

    /// Canonical position in the recorded sequence
    pub index: usize,

    pub action_type: ActionType,

    /// Recorder method name (`click`, `fill`, `toBeVisible`, ...)
    pub method: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<LocatorDescriptor>,

    /// Positional arguments, trailing options object excluded
    #[serde(default)]
    pub args: Vec<Value>,

    /// Trailing object-literal argument
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,

    /// 1-based source line of the awaited call
    pub line: usize,

    pub raw_text: String,
}

impl Action {
    pub fn new(index: usize, action_type: ActionType, method: impl Into<String>) -> Self {
        Self {
            id: format!("action-{}", index + 1),
            index,
            action_type,
            method: method.into(),
            target: None,
            args: Vec::new(),
            options: Map::new(),
            line: 0,
            raw_text: String::new(),
        }
    }

    pub fn with_target(mut self, target: LocatorDescriptor) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    /// First positional argument rendered as a string (fill value, URL,
    /// expected text).
    pub fn first_arg_text(&self) -> Option<String> {
        self.args.first().and_then(value_as_text)
    }

    /// URL of a `goto` navigation.
    pub fn url(&self) -> Option<String> {
        match self.action_type {
            ActionType::Navigation => self.first_arg_text(),
            _ => None,
        }
    }

    pub fn is_click(&self) -> bool {
        self.action_type == ActionType::Click
    }

    pub fn is_fill(&self) -> bool {
        self.action_type == ActionType::Fill
    }

    pub fn is_assertion(&self) -> bool {
        self.action_type == ActionType::Assertion
    }

    pub fn target_role(&self) -> Option<&str> {
        self.target.as_ref().and_then(|t| t.role_name())
    }

    pub fn target_label(&self) -> Option<&str> {
        self.target.as_ref().and_then(|t| t.human_label())
    }

    pub fn target_text(&self) -> String {
        self.target
            .as_ref()
            .map(|t| t.search_text())
            .unwrap_or_default()
    }
}

/// Position of the action recorded at `index`.
///
/// Indices survive upstream filtering, so a list may have gaps; it is
/// still ordered by index.
pub fn position_of(actions: &[Action], index: usize) -> Option<usize> {
    match actions.binary_search_by_key(&index, |a| a.index) {
        Ok(pos) => Some(pos),
        Err(_) => actions.iter().position(|a| a.index == index),
    }
}

/// The action recorded at `index`, wherever it sits in the list.
pub fn action_at(actions: &[Action], index: usize) -> Option<&Action> {
    position_of(actions, index).and_then(|pos| actions.get(pos))
}

/// Render a scalar JSON value as plain text.
pub fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

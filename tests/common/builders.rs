use recording_architect::script::{Action, ActionType, LocatorDescriptor, LocatorKind};
use serde_json::{Value, json};

// ============================================================================
// Action builders
// ============================================================================

/// Re-number actions so `index`/`id` match their positions.
pub fn sequence(actions: Vec<Action>) -> Vec<Action> {
    actions
        .into_iter()
        .enumerate()
        .map(|(i, mut action)| {
            action.index = i;
            action.id = format!("action-{}", i + 1);
            action.line = i + 1;
            action
        })
        .collect()
}

pub fn goto(url: &str) -> Action {
    Action::new(0, ActionType::Navigation, "goto").with_args(vec![json!(url)])
}

pub fn click(target: LocatorDescriptor) -> Action {
    Action::new(0, ActionType::Click, "click").with_target(target)
}

pub fn fill(target: LocatorDescriptor, value: &str) -> Action {
    Action::new(0, ActionType::Fill, "fill")
        .with_target(target)
        .with_args(vec![json!(value)])
}

pub fn expect_visible(target: LocatorDescriptor) -> Action {
    Action::new(0, ActionType::Assertion, "toBeVisible").with_target(target)
}

pub fn expect_text(target: LocatorDescriptor, text: &str) -> Action {
    Action::new(0, ActionType::Assertion, "toContainText")
        .with_target(target)
        .with_args(vec![Value::String(text.to_string())])
}

pub fn untargeted(action_type: ActionType, method: &str) -> Action {
    Action::new(0, action_type, method)
}

// ============================================================================
// Descriptor builders
// ============================================================================

pub fn role(role: &str, name: &str) -> LocatorDescriptor {
    LocatorDescriptor::role(role, Some(name))
}

pub fn bare_role(role: &str) -> LocatorDescriptor {
    LocatorDescriptor::role(role, None)
}

pub fn link(name: &str) -> LocatorDescriptor {
    role("link", name)
}

pub fn button(name: &str) -> LocatorDescriptor {
    role("button", name)
}

pub fn text(value: &str) -> LocatorDescriptor {
    LocatorDescriptor::new(LocatorKind::Text, value)
}

pub fn placeholder(value: &str) -> LocatorDescriptor {
    LocatorDescriptor::new(LocatorKind::Placeholder, value)
}

pub fn label(value: &str) -> LocatorDescriptor {
    LocatorDescriptor::new(LocatorKind::Label, value)
}

pub fn test_id(value: &str) -> LocatorDescriptor {
    LocatorDescriptor::new(LocatorKind::TestId, value)
}

pub fn css(value: &str) -> LocatorDescriptor {
    LocatorDescriptor::new(LocatorKind::RawSelector, value)
}

// ============================================================================
// Canned sequences
// ============================================================================

pub const LOGIN_URL: &str = "https://hr.example.com/web/index.php/auth/login";

/// goto, username, password, login click, dashboard heading check.
pub fn login_sequence() -> Vec<Action> {
    sequence(vec![
        goto(LOGIN_URL),
        fill(placeholder("Username"), "Admin"),
        fill(placeholder("Password"), "admin123"),
        click(button("Login")),
        expect_visible(role("heading", "Dashboard")),
    ])
}

/// Admin and PIM link clicks, each followed by module-specific work.
pub fn navigation_sequence() -> Vec<Action> {
    sequence(vec![
        click(link("Admin")),
        click(button("Add")),
        fill(label("Username"), "jdoe"),
        click(link("PIM")),
        fill(placeholder("Type for hints..."), "Peter"),
        click(button("Save")),
    ])
}

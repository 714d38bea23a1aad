use crate::context::ElementContext;
use crate::pattern::{ModalDecision, Pattern, PatternData};
use crate::script::{Action, ActionType};

// ============================================================================
// Human-readable steps
// ============================================================================

/// One-line description of a single action, e.g.
/// `Enter "Admin" into Username field`.
pub fn describe_action(action: &Action, ctx: &ElementContext) -> String {
    let label = ctx
        .business_term
        .clone()
        .unwrap_or_else(|| ctx.element_kind.as_str().to_string());
    let kind = ctx.element_kind.as_str();
    let value = action.first_arg_text();

    match action.action_type {
        ActionType::Navigation => match action.url() {
            Some(url) => format!("Open \"{}\"", url),
            None => format!("Navigate ({})", action.method),
        },
        ActionType::Click => {
            if ctx.business_term.is_some() {
                format!("Click \"{}\" {}", label, kind)
            } else {
                format!("Click {}", kind)
            }
        }
        ActionType::Fill => match value {
            Some(value) if action.method != "clear" => {
                format!("Enter \"{}\" into {} field", value, label)
            }
            _ => format!("Clear {} field", label),
        },
        ActionType::Select => format!(
            "Select \"{}\" in {} dropdown",
            value.unwrap_or_default(),
            label
        ),
        ActionType::Check => format!("Check {}", label),
        ActionType::Uncheck => format!("Uncheck {}", label),
        ActionType::Press => format!("Press \"{}\"", value.unwrap_or_default()),
        ActionType::Hover => format!("Hover over {}", label),
        ActionType::Upload => format!(
            "Upload \"{}\" to {}",
            value.unwrap_or_default(),
            label
        ),
        ActionType::Wait => match value {
            Some(value) => format!("Wait for {}", value),
            None => format!("Wait ({})", action.method),
        },
        ActionType::Assertion => describe_assertion(action, ctx.business_term.as_deref(), kind),
        ActionType::Generic => format!("Perform {}", action.method),
    }
}

fn describe_assertion(action: &Action, term: Option<&str>, kind: &str) -> String {
    let subject = match (term, &action.target) {
        (Some(term), Some(_)) => format!("\"{}\" {}", term, kind),
        (None, Some(_)) => kind.to_string(),
        (_, None) => "page".to_string(),
    };
    let value = action.first_arg_text().unwrap_or_default();

    match action.method.as_str() {
        "toBeVisible" | "isVisible" => format!("Verify {} is visible", subject),
        "toBeHidden" | "isHidden" => format!("Verify {} is hidden", subject),
        "toHaveText" | "toContainText" | "textContent" => {
            format!("Verify {} has text \"{}\"", subject, value)
        }
        "toHaveValue" => format!("Verify {} has value \"{}\"", subject, value),
        "toHaveURL" => format!("Verify page URL matches \"{}\"", value),
        "toHaveTitle" => format!("Verify page title is \"{}\"", value),
        "toBeChecked" => format!("Verify {} is checked", subject),
        "toBeEnabled" => format!("Verify {} is enabled", subject),
        "toBeDisabled" => format!("Verify {} is disabled", subject),
        "toHaveCount" => format!("Verify {} count is {}", subject, value),
        other => format!("Verify {} ({})", subject, other),
    }
}

/// One-line description of a recognized pattern, e.g. `Log in as "Admin"`.
pub fn describe_pattern(pattern: &Pattern) -> String {
    match &pattern.data {
        PatternData::Login { username, .. } => format!("Log in as \"{}\"", username),
        PatternData::Dropdown {
            field_context,
            option_text,
            ..
        } => format!("Select \"{}\" from {} dropdown", option_text, field_context),
        PatternData::Modal {
            decision,
            button_name,
            ..
        } => match decision {
            ModalDecision::Confirm => format!("Confirm dialog with \"{}\"", button_name),
            ModalDecision::Cancel => format!("Cancel dialog with \"{}\"", button_name),
        },
        PatternData::Search { criteria, .. } => {
            let parts: Vec<String> = criteria
                .iter()
                .filter(|c| !c.field.is_empty())
                .map(|c| match &c.value {
                    Some(value) => format!("{} \"{}\"", c.field, value),
                    None => c.field.clone(),
                })
                .collect();
            if parts.is_empty() {
                "Run search".to_string()
            } else {
                format!("Search by {}", parts.join(", "))
            }
        }
        PatternData::Navigation {
            module, heading, ..
        } => match heading {
            Some(heading) => format!("Navigate to {} and verify \"{}\" heading", module, heading),
            None => format!("Navigate to {}", module),
        },
    }
}

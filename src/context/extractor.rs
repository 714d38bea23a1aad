use crate::config::{PipelineConfig, Vocabulary};
use crate::pattern::{ModalDecision, Pattern, PatternData, PatternType, patterns_covering};
use crate::script::{Action, ActionType, LocatorKind, position_of};

use super::context_model::{ElementContext, ElementKind, UNKNOWN_MODULE};

// ============================================================================
// Element kind
// ============================================================================

/// Selector substrings mapped to kinds, checked in order.
const SELECTOR_KEYWORDS: &[(&[&str], ElementKind)] = &[
    (&["toast", "snackbar", "notification", "alert"], ElementKind::Toast),
    (&["modal", "dialog"], ElementKind::Dialog),
    (&["checkbox"], ElementKind::Checkbox),
    (&["radio"], ElementKind::Radio),
    (&["select", "dropdown", "combobox"], ElementKind::Dropdown),
    (&["option", "listbox"], ElementKind::Option),
    (&["row", "tr:", "tr."], ElementKind::Row),
    (&["table", "grid"], ElementKind::Table),
    (&["heading", "h1", "h2", "h3", "h4", "h5", "h6", "title"], ElementKind::Heading),
    (&["button", "btn", "submit"], ElementKind::Button),
    (&["input", "textarea", "textbox"], ElementKind::Textbox),
    (&["link", "a["], ElementKind::Link),
    (&["img", "image", "icon"], ElementKind::Image),
];

/// Kind of the action's target: role first, then selector keywords, then
/// the locate method, then the action itself.
pub fn element_kind(action: &Action) -> ElementKind {
    let Some(target) = &action.target else {
        return ElementKind::Generic;
    };

    if let Some(kind) = target.role_name().and_then(kind_for_role) {
        return kind;
    }

    if matches!(target.kind, LocatorKind::RawSelector | LocatorKind::TestId) {
        let selector = target.value.to_lowercase();
        for (keywords, kind) in SELECTOR_KEYWORDS {
            if keywords.iter().any(|k| selector.contains(k)) {
                return *kind;
            }
        }
    }

    let by_method = match target.kind {
        LocatorKind::Placeholder | LocatorKind::Label => ElementKind::Textbox,
        _ => ElementKind::Generic,
    };
    if by_method != ElementKind::Generic {
        return by_method;
    }

    match action.action_type {
        ActionType::Fill => ElementKind::Textbox,
        ActionType::Select => ElementKind::Dropdown,
        ActionType::Check | ActionType::Uncheck => ElementKind::Checkbox,
        _ => ElementKind::Generic,
    }
}

fn kind_for_role(role: &str) -> Option<ElementKind> {
    let kind = match role {
        "button" => ElementKind::Button,
        "link" => ElementKind::Link,
        "textbox" | "searchbox" | "spinbutton" => ElementKind::Textbox,
        "combobox" | "listbox" => ElementKind::Dropdown,
        "option" | "menuitem" | "listitem" => ElementKind::Option,
        "checkbox" | "switch" => ElementKind::Checkbox,
        "radio" => ElementKind::Radio,
        "table" | "grid" => ElementKind::Table,
        "row" => ElementKind::Row,
        "alert" | "status" => ElementKind::Toast,
        "heading" => ElementKind::Heading,
        "dialog" | "alertdialog" => ElementKind::Dialog,
        "img" => ElementKind::Image,
        _ => return None,
    };
    Some(kind)
}

// ============================================================================
// Context extraction
// ============================================================================

/// Context for every action, in the order of `actions`. Look one up by
/// recorded index with [`context_at`](super::context_at).
pub fn extract_contexts(
    actions: &[Action],
    patterns: &[Pattern],
    config: &PipelineConfig,
) -> Vec<ElementContext> {
    actions
        .iter()
        .map(|action| extract_element_context(action, patterns, actions, &config.vocabulary))
        .collect()
}

/// Infer kind, owning module and purpose of one action. Pure.
pub fn extract_element_context(
    action: &Action,
    patterns: &[Pattern],
    all_actions: &[Action],
    vocab: &Vocabulary,
) -> ElementContext {
    let kind = element_kind(action);
    let business_term = business_term(action);
    let pattern = patterns_covering(patterns, action.index);

    ElementContext {
        action_index: action.index,
        element_kind: kind,
        module: resolve_module(action, pattern, all_actions, vocab),
        purpose: purpose(action, pattern, kind, business_term.as_deref()),
        action_type: action.action_type,
        business_term,
    }
}

/// Whitespace-normalized human label of the target.
pub fn business_term(action: &Action) -> Option<String> {
    let label = action.target.as_ref()?.human_label()?;
    let normalized = label.split_whitespace().collect::<Vec<_>>().join(" ");
    (!normalized.is_empty()).then_some(normalized)
}

// ============================================================================
// Module resolution
// ============================================================================

/// Owning module of an action.
///
/// Order: navigation URL (navigation actions only), most recent open module
/// link (the backward scan ends at the first navigation action), login
/// pattern membership, username/password selectors, else `Unknown`.
pub fn resolve_module(
    action: &Action,
    pattern: Option<&Pattern>,
    all_actions: &[Action],
    vocab: &Vocabulary,
) -> String {
    if action.action_type == ActionType::Navigation {
        return module_for_navigation(action, vocab).unwrap_or_else(|| UNKNOWN_MODULE.to_string());
    }

    if let Some(module) = module_from_history(action.index, all_actions, vocab) {
        return module;
    }

    if pattern.is_some_and(|p| p.pattern_type == PatternType::Login) {
        return vocab.login_module.clone();
    }

    let text = action.target_text();
    if action.target.is_some() && (vocab.is_username(&text) || vocab.is_password(&text)) {
        return vocab.login_module.clone();
    }

    UNKNOWN_MODULE.to_string()
}

fn module_for_navigation(action: &Action, vocab: &Vocabulary) -> Option<String> {
    let url = action.url()?;
    if let Some(module) = vocab.module_for_url(&url) {
        return Some(module.name.clone());
    }
    vocab.is_login(&url).then(|| vocab.login_module.clone())
}

/// Walk backward from the action recorded at `index` to the latest module
/// link click. The scan ends at the first page load; a navigation only
/// names a module for itself.
fn module_from_history(index: usize, all_actions: &[Action], vocab: &Vocabulary) -> Option<String> {
    let pos = position_of(all_actions, index)?;
    for action in all_actions[..=pos].iter().rev() {
        if action.action_type == ActionType::Navigation {
            return None;
        }
        if action.is_click() && action.target_role() == Some("link") {
            let module = action
                .target
                .as_ref()
                .and_then(|t| t.name.as_deref())
                .and_then(|name| vocab.module_for_text(name));
            if let Some(module) = module {
                return Some(module.name.clone());
            }
        }
    }
    None
}

// ============================================================================
// Purpose
// ============================================================================

fn purpose(
    action: &Action,
    pattern: Option<&Pattern>,
    kind: ElementKind,
    term: Option<&str>,
) -> String {
    if let Some(phrase) = pattern.and_then(|p| pattern_purpose(p, action.index)) {
        return phrase;
    }

    let label = term
        .map(|t| t.to_lowercase())
        .unwrap_or_else(|| kind.as_str().to_string());

    match action.action_type {
        ActionType::Click => match kind {
            ElementKind::Button if label.contains("search") => "execute search".to_string(),
            ElementKind::Button => format!("click {}", label),
            ElementKind::Link => format!("open {} link", label),
            ElementKind::Checkbox | ElementKind::Radio => format!("toggle {}", label),
            ElementKind::Row => "select row".to_string(),
            _ => format!("click {}", label),
        },
        ActionType::Fill => format!("enter {}", label),
        ActionType::Select => format!("select {}", label),
        ActionType::Check => format!("check {}", label),
        ActionType::Uncheck => format!("uncheck {}", label),
        ActionType::Press => format!(
            "press {}",
            action.first_arg_text().unwrap_or_else(|| "key".to_string())
        ),
        ActionType::Hover => format!("hover {}", label),
        ActionType::Upload => format!("upload file to {}", label),
        ActionType::Wait => "wait for page".to_string(),
        ActionType::Assertion => format!("verify {}", label),
        ActionType::Navigation => "open page".to_string(),
        ActionType::Generic => format!("perform {}", action.method),
    }
}

/// Fixed phrase for an action's role inside a pattern.
fn pattern_purpose(pattern: &Pattern, index: usize) -> Option<String> {
    let phrase = match &pattern.data {
        PatternData::Login {
            username_index,
            password_index,
            submit_index,
            ..
        } => {
            if index == *username_index {
                "enter username".to_string()
            } else if index == *password_index {
                "enter password".to_string()
            } else if index == *submit_index {
                "submit login".to_string()
            } else {
                return None;
            }
        }
        PatternData::Dropdown {
            field_context,
            option_text,
            trigger_index,
            ..
        } => {
            if index == *trigger_index {
                format!("open {} dropdown", field_context.to_lowercase())
            } else {
                format!("choose {}", option_text)
            }
        }
        PatternData::Modal {
            decision,
            assertion_index,
            button_index,
            ..
        } => {
            if index == *assertion_index {
                "verify confirmation dialog".to_string()
            } else if index == *button_index {
                match decision {
                    ModalDecision::Confirm => "confirm dialog".to_string(),
                    ModalDecision::Cancel => "cancel dialog".to_string(),
                }
            } else {
                return None;
            }
        }
        PatternData::Search {
            button_index,
            verification_index,
            ..
        } => {
            if index == *button_index {
                "execute search".to_string()
            } else if Some(index) == *verification_index {
                "verify search results".to_string()
            } else {
                "enter search criteria".to_string()
            }
        }
        PatternData::Navigation {
            module, link_index, ..
        } => {
            if index == *link_index {
                format!("navigate to {}", module)
            } else {
                format!("verify {} page", module)
            }
        }
    };
    Some(phrase)
}

use tracing::{debug, trace};

use crate::config::{PipelineConfig, Vocabulary};
use crate::script::action_model::value_as_text;
use crate::script::{Action, ActionType, LocatorKind, position_of};

use super::pattern_model::{ModalDecision, Pattern, PatternData, PatternType, SearchCriterion};

/// Roles the recorder uses for dropdown triggers.
const TRIGGER_ROLES: &[&str] = &["combobox", "listbox"];

/// Roles the recorder uses for dropdown options.
const OPTION_ROLES: &[&str] = &["option", "listitem", "menuitem"];

/// Action types that can feed a search form.
const CRITERIA_TYPES: &[ActionType] = &[
    ActionType::Fill,
    ActionType::Click,
    ActionType::Select,
    ActionType::Check,
    ActionType::Uncheck,
    ActionType::Press,
];

// ============================================================================
// Scan
// ============================================================================

/// Detect non-overlapping motifs with a single greedy left-to-right scan.
///
/// At each cursor position the detectors run in priority order (dropdown,
/// modal, login, search, navigation). A match consumes its span and the
/// cursor jumps past it; otherwise the cursor advances by one.
///
/// Detectors take a position in `actions` and report the recorded
/// `Action::index` of every action they name.
pub fn detect_patterns(actions: &[Action], config: &PipelineConfig) -> Vec<Pattern> {
    let mut patterns = Vec::new();
    let mut i = 0;

    while i < actions.len() {
        let found = detect_dropdown_at(actions, i, config)
            .or_else(|| detect_modal_at(actions, i, config))
            .or_else(|| detect_login_at(actions, i, config))
            .or_else(|| detect_search_at(actions, i, config))
            .or_else(|| detect_navigation_at(actions, i, config));

        match found {
            Some(pattern) => {
                trace!(
                    pattern = pattern.pattern_type.as_str(),
                    start = pattern.start_index,
                    end = pattern.end_index,
                    "pattern matched"
                );
                i = position_of(actions, pattern.end_index).unwrap_or(i) + 1;
                patterns.push(pattern);
            }
            None => i += 1,
        }
    }

    debug!(count = patterns.len(), "detected patterns");
    patterns
}

// ============================================================================
// Dropdown: click(trigger) immediately followed by click(option)
// ============================================================================

pub fn detect_dropdown_at(actions: &[Action], i: usize, config: &PipelineConfig) -> Option<Pattern> {
    let vocab = &config.vocabulary;
    let trigger = actions.get(i)?;
    let option = actions.get(i + 1)?;

    if !is_dropdown_trigger(trigger, vocab) || !is_dropdown_option(option, vocab) {
        return None;
    }

    let option_text = option
        .target
        .as_ref()
        .map(|t| t.human_label().unwrap_or(&t.value).trim().to_string())
        .unwrap_or_default();
    let field_context = dropdown_field_context(trigger, &option_text);

    Some(Pattern {
        pattern_type: PatternType::Dropdown,
        start_index: trigger.index,
        end_index: option.index,
        confidence: config.detection.dropdown_confidence,
        data: PatternData::Dropdown {
            field_context,
            option_text,
            trigger_index: trigger.index,
            option_index: option.index,
        },
    })
}

fn is_dropdown_trigger(action: &Action, vocab: &Vocabulary) -> bool {
    if !action.is_click() {
        return false;
    }
    let Some(target) = &action.target else {
        return false;
    };
    target
        .role_name()
        .is_some_and(|r| TRIGGER_ROLES.contains(&r))
        || vocab.is_dropdown(&target.search_text())
}

fn is_dropdown_option(action: &Action, vocab: &Vocabulary) -> bool {
    if !action.is_click() {
        return false;
    }
    let Some(target) = &action.target else {
        return false;
    };
    match target.kind {
        LocatorKind::Text => true,
        LocatorKind::Role => OPTION_ROLES.contains(&target.value.as_str()),
        LocatorKind::RawSelector => vocab.is_option(&target.value),
        _ => false,
    }
}

/// Infer what a dropdown filters by, from the trigger first and the chosen
/// option second.
fn dropdown_field_context(trigger: &Action, option_text: &str) -> String {
    let trigger_text = trigger.target_text();
    for (keyword, field) in [("status", "Status"), ("role", "Role"), ("type", "Type")] {
        if trigger_text.contains(keyword) {
            return field.to_string();
        }
    }

    match option_text.trim().to_lowercase().as_str() {
        "enabled" | "disabled" | "active" | "inactive" => "Status".to_string(),
        "admin" | "ess" => "Role".to_string(),
        _ => "Filter".to_string(),
    }
}

// ============================================================================
// Modal: dialog assertion, then confirm/cancel click within the window
// ============================================================================

pub fn detect_modal_at(actions: &[Action], i: usize, config: &PipelineConfig) -> Option<Pattern> {
    let vocab = &config.vocabulary;
    let assertion = actions.get(i)?;
    if !assertion.is_assertion() {
        return None;
    }

    let dialog_text = assertion_text(assertion);
    if !vocab.is_dialog(&dialog_text) {
        return None;
    }

    let end = (i + config.detection.modal_window).min(actions.len());
    for action in actions.iter().take(end).skip(i + 1) {
        if !action.is_click() {
            continue;
        }
        let Some(target) = &action.target else {
            continue;
        };
        let label = target.search_text();
        let decision = if vocab.is_cancel(&label) {
            ModalDecision::Cancel
        } else if vocab.is_confirm(&label) {
            ModalDecision::Confirm
        } else {
            continue;
        };

        return Some(Pattern {
            pattern_type: PatternType::Modal,
            start_index: assertion.index,
            end_index: action.index,
            confidence: config.detection.modal_confidence,
            data: PatternData::Modal {
                dialog_text: dialog_text.trim().to_string(),
                decision,
                button_name: target.human_label().unwrap_or(&target.value).to_string(),
                assertion_index: assertion.index,
                button_index: action.index,
            },
        });
    }
    None
}

/// Everything an assertion says: its locator strings plus expected values.
fn assertion_text(action: &Action) -> String {
    let mut text = action
        .target
        .as_ref()
        .map(|t| {
            let mut s = t.value.clone();
            if let Some(name) = &t.name {
                s.push(' ');
                s.push_str(name);
            }
            s
        })
        .unwrap_or_default();
    for arg in action.args.iter().filter_map(value_as_text) {
        text.push(' ');
        text.push_str(&arg);
    }
    text
}

// ============================================================================
// Login: fill(username), fill(password), click(login) in order
// ============================================================================

pub fn detect_login_at(actions: &[Action], i: usize, config: &PipelineConfig) -> Option<Pattern> {
    let vocab = &config.vocabulary;
    let first = actions.get(i)?;
    if !is_username_fill(first, vocab) {
        return None;
    }

    let end = (i + config.detection.login_window).min(actions.len());
    let password_pos = (i + 1..end).find(|&j| is_password_fill(&actions[j], vocab))?;
    let password = &actions[password_pos];
    let submit = actions[password_pos + 1..end].iter().find(|action| {
        action.is_click() && action.target.is_some() && vocab.is_login(&action.target_text())
    })?;

    Some(Pattern {
        pattern_type: PatternType::Login,
        start_index: first.index,
        end_index: submit.index,
        confidence: config.detection.login_confidence,
        data: PatternData::Login {
            username: first.first_arg_text().unwrap_or_default(),
            password: password.first_arg_text().unwrap_or_default(),
            username_index: first.index,
            password_index: password.index,
            submit_index: submit.index,
        },
    })
}

fn is_username_fill(action: &Action, vocab: &Vocabulary) -> bool {
    action.is_fill()
        && action.target.is_some()
        && vocab.is_username(&action.target_text())
        && !vocab.is_password(&action.target_text())
}

fn is_password_fill(action: &Action, vocab: &Vocabulary) -> bool {
    action.is_fill() && action.target.is_some() && vocab.is_password(&action.target_text())
}

// ============================================================================
// Search: criteria inputs, search click, optional verification
// ============================================================================

pub fn detect_search_at(actions: &[Action], i: usize, config: &PipelineConfig) -> Option<Pattern> {
    let vocab = &config.vocabulary;
    let start = actions.get(i)?;
    let end = (i + config.detection.search_window).min(actions.len());

    let mut criteria = Vec::new();
    let mut button_pos = None;

    for (j, action) in actions.iter().enumerate().take(end).skip(i) {
        if action.action_type == ActionType::Navigation || is_module_link_click(action, vocab) {
            break;
        }
        if action.is_click() && action.target.is_some() && is_search_button(action, vocab) {
            button_pos = Some(j);
            break;
        }
        if !CRITERIA_TYPES.contains(&action.action_type) {
            break;
        }
        criteria.push(SearchCriterion {
            action_index: action.index,
            field: action
                .target
                .as_ref()
                .map(|t| t.human_label().unwrap_or(&t.value).to_string())
                .unwrap_or_default(),
            value: action.first_arg_text(),
        });
    }

    let button_pos = button_pos?;
    let button_index = actions[button_pos].index;
    let verification_index = actions
        .get(button_pos + 1)
        .filter(|a| a.is_assertion())
        .map(|a| a.index);

    Some(Pattern {
        pattern_type: PatternType::Search,
        start_index: start.index,
        end_index: verification_index.unwrap_or(button_index),
        confidence: config.detection.search_confidence,
        data: PatternData::Search {
            criteria,
            button_index,
            verification_index,
        },
    })
}

fn is_search_button(action: &Action, vocab: &Vocabulary) -> bool {
    let Some(target) = &action.target else {
        return false;
    };
    // A search link is navigation, not a form submit
    if target.role_name() == Some("link") {
        return false;
    }
    vocab.is_search(&target.search_text())
}

// ============================================================================
// Navigation: module link click, optional heading assertion
// ============================================================================

pub fn detect_navigation_at(
    actions: &[Action],
    i: usize,
    config: &PipelineConfig,
) -> Option<Pattern> {
    let vocab = &config.vocabulary;
    let link = actions.get(i)?;
    if !link.is_click() || link.target_role() != Some("link") {
        return None;
    }
    let link_name = link.target.as_ref()?.name.clone()?;
    let module = vocab.module_for_text(&link_name)?;

    let heading = if config.detection.navigation_window >= 2 {
        actions
            .get(i + 1)
            .filter(|a| a.is_assertion() && a.target_role() == Some("heading"))
    } else {
        None
    };
    let heading_index = heading.map(|h| h.index);

    Some(Pattern {
        pattern_type: PatternType::Navigation,
        start_index: link.index,
        end_index: heading_index.unwrap_or(link.index),
        confidence: config.detection.navigation_confidence,
        data: PatternData::Navigation {
            module: module.name.clone(),
            link_name: link_name.trim().to_string(),
            link_index: link.index,
            heading: heading.and_then(|h| h.target_label().map(str::to_string)),
            heading_index,
        },
    })
}

/// Click on a link whose accessible name names a known module.
pub fn is_module_link_click(action: &Action, vocab: &Vocabulary) -> bool {
    action.is_click()
        && action.target_role() == Some("link")
        && action
            .target
            .as_ref()
            .and_then(|t| t.name.as_deref())
            .is_some_and(|name| vocab.module_for_text(name).is_some())
}

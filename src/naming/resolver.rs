use crate::context::{ElementContext, ElementKind, UNKNOWN_MODULE};
use crate::pattern::{ModalDecision, Pattern, PatternData};
use crate::script::{Action, ActionType, LocatorDescriptor, LocatorKind, action_at};

use super::registry::NameRegistry;

/// Words kept from free text when building identifiers.
const MAX_NAME_WORDS: usize = 4;

/// Leading button words that name the button on their own (`saveButton`).
const BUTTON_VERBS: &[&str] = &[
    "save", "submit", "cancel", "delete", "add", "edit", "search", "login", "logout", "reset",
    "close", "confirm", "next", "back", "ok", "yes", "no", "update", "apply", "upload",
    "export", "import", "remove", "create", "continue", "finish",
];

// ============================================================================
// Case helpers
// ============================================================================

fn words(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in text.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        // camelCase boundary
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out.truncate(MAX_NAME_WORDS);
    out
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `"User Role"` → `userRole`. Empty when the text has no alphanumerics.
pub fn to_camel_case(text: &str) -> String {
    let pascal = to_pascal_case(text);
    let mut chars = pascal.chars();
    let camel: String = match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    };
    ensure_identifier(camel)
}

/// `"user role"` → `UserRole`.
pub fn to_pascal_case(text: &str) -> String {
    words(text).iter().map(|w| capitalize(w)).collect()
}

/// Identifiers cannot start with a digit.
fn ensure_identifier(name: String) -> String {
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("item{}", name)
    } else {
        name
    }
}

/// PascalCase suffix from an accessible name or role; None if nothing
/// usable remains.
pub fn sanitize_hint(hint: &str) -> Option<String> {
    let pascal = to_pascal_case(hint);
    (!pascal.is_empty()).then_some(pascal)
}

fn with_suffix(stem: &str, suffix: &str) -> String {
    let stem = to_camel_case(stem);
    if stem.is_empty() {
        return to_camel_case(suffix);
    }
    if stem.to_lowercase().ends_with(&suffix.to_lowercase()) {
        stem
    } else {
        format!("{}{}", stem, capitalize(suffix))
    }
}

// ============================================================================
// Element names
// ============================================================================

/// Label used for naming: the business term, else a test id.
fn naming_label(ctx: &ElementContext, descriptor: Option<&LocatorDescriptor>) -> Option<String> {
    ctx.business_term.clone().or_else(|| {
        descriptor
            .filter(|d| d.kind == LocatorKind::TestId)
            .map(|d| d.value.clone())
    })
}

/// Base element name from fixed per-kind rules.
pub fn base_element_name(ctx: &ElementContext, descriptor: Option<&LocatorDescriptor>) -> String {
    let label = naming_label(ctx, descriptor).unwrap_or_default();
    let haystack = format!(
        "{} {}",
        label.to_lowercase(),
        descriptor.map(|d| d.search_text()).unwrap_or_default()
    );

    match ctx.element_kind {
        ElementKind::Textbox => {
            if haystack.contains("username") || haystack.contains("user name") {
                "usernameInput".to_string()
            } else if haystack.contains("password") {
                "passwordInput".to_string()
            } else if haystack.contains("email") {
                "emailInput".to_string()
            } else if haystack.contains("search") {
                "searchInput".to_string()
            } else {
                with_suffix(&label, "Field")
            }
        }
        ElementKind::Button => {
            let first = words(&label)
                .first()
                .map(|w| w.to_lowercase())
                .unwrap_or_default();
            let first = if first == "log" && haystack.contains("log in") {
                "login".to_string()
            } else {
                first
            };
            if BUTTON_VERBS.contains(&first.as_str()) {
                format!("{}Button", first)
            } else {
                with_suffix(&label, "Button")
            }
        }
        ElementKind::Link => with_suffix(&label, "Link"),
        ElementKind::Option => with_suffix(&label, "Option"),
        ElementKind::Radio => with_suffix(&label, "Radio"),
        ElementKind::Image => with_suffix(&label, "Image"),
        ElementKind::Row => with_suffix(&label, "Row"),
        ElementKind::Dropdown => "dropdown".to_string(),
        ElementKind::Checkbox => "checkbox".to_string(),
        ElementKind::Table => "dataTable".to_string(),
        ElementKind::Toast => "toastMessage".to_string(),
        ElementKind::Heading => "pageHeading".to_string(),
        ElementKind::Dialog => "dialog".to_string(),
        ElementKind::Generic => with_suffix(&label, "Element"),
    }
}

/// Unique element name through the collision tiers: base, module-prefixed
/// base, base plus hint. None when every tier is taken.
pub fn resolve_element_name(
    base: &str,
    module: &str,
    hint: Option<&str>,
    registry: &mut NameRegistry,
) -> Option<String> {
    let mut tiers = vec![base.to_string()];

    let prefix = to_camel_case(module);
    if !prefix.is_empty() {
        tiers.push(format!("{}{}", prefix, upper_first(base)));
    }
    if let Some(suffix) = hint.and_then(sanitize_hint) {
        tiers.push(format!("{}{}", base, suffix));
    }

    tiers.into_iter().find(|name| registry.claim_element(name))
}

/// Unique method name: `name`, `name2`, `name3`, ...
pub fn resolve_method_name(base: &str, registry: &mut NameRegistry) -> String {
    if registry.claim_method(base) {
        return base.to_string();
    }
    let mut n = 2usize;
    loop {
        let candidate = format!("{}{}", base, n);
        if registry.claim_method(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// Method names
// ============================================================================

/// Base method name for a recognized pattern.
pub fn pattern_method_base(pattern: &Pattern, actions: &[Action], module: &str) -> String {
    match &pattern.data {
        PatternData::Login { .. } => "login".to_string(),
        PatternData::Dropdown { field_context, .. } => {
            format!("select{}", non_empty_pascal(field_context, "Option"))
        }
        PatternData::Modal { decision, .. } => match decision {
            ModalDecision::Confirm => "confirmDialog".to_string(),
            ModalDecision::Cancel => "cancelDialog".to_string(),
        },
        PatternData::Search {
            button_index,
            criteria,
            ..
        } => {
            let button_rest = action_at(actions, *button_index)
                .and_then(|a| a.target_label())
                .map(|label| {
                    label
                        .split_whitespace()
                        .filter(|w| !w.eq_ignore_ascii_case("search"))
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .filter(|rest| !rest.trim().is_empty());
            let subject = button_rest
                .or_else(|| (module != UNKNOWN_MODULE).then(|| module.to_string()))
                .or_else(|| criteria.first().map(|c| c.field.clone()))
                .unwrap_or_default();
            format!("search{}", non_empty_pascal(&subject, "Records"))
        }
        PatternData::Navigation { module, .. } => {
            format!("navigateTo{}", non_empty_pascal(module, "Page"))
        }
    }
}

/// Base method name for an action outside any pattern.
pub fn action_method_base(action: &Action, ctx: &ElementContext, element_base: &str) -> String {
    let field = ctx
        .business_term
        .as_deref()
        .map(to_pascal_case)
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| upper_first(element_base));

    match action.action_type {
        ActionType::Click => format!("click{}", non_empty(upper_first(element_base), "Element")),
        ActionType::Fill => format!("fill{}", non_empty(field, "Field")),
        ActionType::Select => format!("select{}", non_empty(field, "Option")),
        ActionType::Check => format!("check{}", non_empty(field, "Option")),
        ActionType::Uncheck => format!("uncheck{}", non_empty(field, "Option")),
        ActionType::Assertion => {
            format!("verify{}", non_empty(upper_first(element_base), "Page"))
        }
        ActionType::Navigation => {
            if ctx.is_assigned() {
                format!("open{}Page", to_pascal_case(&ctx.module))
            } else {
                "openPage".to_string()
            }
        }
        _ => format!("perform{}", non_empty(to_pascal_case(&action.method), "Action")),
    }
}

fn non_empty_pascal(text: &str, fallback: &str) -> String {
    non_empty(to_pascal_case(text), fallback)
}

fn non_empty(text: String, fallback: &str) -> String {
    if text.is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

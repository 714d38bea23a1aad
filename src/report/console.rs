use crate::architecture::{Architecture, ElementDefinition, MethodDefinition};
use crate::locator::GeneratedLocators;
use crate::pattern::Pattern;
use crate::script::Action;

// ============================================================================
// Console summaries
// ============================================================================

/// Format an architecture for terminal output.
///
/// Produces output like:
/// ```text
/// === Shared Navigation (2 elements) ===
///   adminLink            role=link[name="Admin"] (90)
///   navigateToModule(moduleName)
///
/// === Admin (3 elements, 2 methods) ===
///   ...
///
/// === Omissions: 1 ===
///   [unassigned_module] action 4: clickElement
/// ```
pub fn format_summary(architecture: &Architecture) -> String {
    let mut out = String::new();

    if let Some(shared) = &architecture.shared_navigation {
        out.push_str(&format!(
            "=== Shared Navigation ({} elements) ===\n",
            shared.elements.len()
        ));
        for element in &shared.elements {
            out.push_str(&format_element(element));
        }
        out.push_str(&format_method(&shared.method));
        out.push('\n');
    }

    for grouping in &architecture.page_groupings {
        out.push_str(&format!(
            "=== {} ({} elements, {} methods) ===\n",
            grouping.module,
            grouping.elements.len(),
            grouping.methods.len()
        ));
        for element in &grouping.elements {
            out.push_str(&format_element(element));
        }
        for method in &grouping.methods {
            out.push_str(&format_method(method));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "=== Omissions: {} ===\n",
        architecture.omissions.len()
    ));
    for omission in &architecture.omissions {
        let at = omission
            .action_index
            .map(|i| format!("action {}: ", i))
            .unwrap_or_default();
        out.push_str(&format!(
            "  [{}] {}{} ({})\n",
            omission.kind.as_str(),
            at,
            omission.subject,
            omission.detail
        ));
    }

    out
}

fn format_element(element: &ElementDefinition) -> String {
    format!(
        "  {:<24} {} ({})\n",
        element.name, element.locators.primary.value, element.locators.stability_score
    )
}

fn format_method(method: &MethodDefinition) -> String {
    let params: Vec<&str> = method.parameters.iter().map(|p| p.name.as_str()).collect();
    format!(
        "  {}({})  -- {}\n",
        method.name,
        params.join(", "),
        method.step_text
    )
}

/// One line per extracted action.
pub fn format_actions(actions: &[Action]) -> String {
    let mut out = format!("=== Actions: {} ===\n", actions.len());
    for action in actions {
        let target = action
            .target
            .as_ref()
            .map(|t| match &t.name {
                Some(name) => format!("{:?} {} \"{}\"", t.kind, t.value, name),
                None => format!("{:?} {}", t.kind, t.value),
            })
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "  {:>3} L{:<4} {:<11} {:<14} {}\n",
            action.index,
            action.line,
            action.action_type.verb(),
            action.method,
            target
        ));
    }
    out
}

/// One line per recognized pattern.
pub fn format_patterns(patterns: &[Pattern]) -> String {
    let mut out = format!("=== Patterns: {} ===\n", patterns.len());
    for pattern in patterns {
        out.push_str(&format!(
            "  {:<10} [{}..={}] confidence {:.2}\n",
            pattern.pattern_type.as_str(),
            pattern.start_index,
            pattern.end_index,
            pattern.confidence
        ));
    }
    out
}

/// Ranked strategies of each targeted action.
pub fn format_locators(actions: &[Action], locators: &[GeneratedLocators]) -> String {
    let mut out = String::new();
    for (action, generated) in actions.iter().zip(locators) {
        if action.target.is_none() {
            continue;
        }
        out.push_str(&format!(
            "=== {} {} (stability {}) ===\n",
            action.id, action.method, generated.stability_score
        ));
        for strategy in generated.all() {
            out.push_str(&format!(
                "  {:>3}  {:<12} {}\n",
                strategy.stability,
                format!("{:?}", strategy.strategy_type),
                strategy.value
            ));
        }
    }
    out
}

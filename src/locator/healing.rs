//! Self-healing formatting: render ranked strategies as raw selectors a
//! runtime can try in order.

use super::strategy_model::{GeneratedLocators, LocatorStrategy, StrategyType};

/// Characters that only appear in selector syntax, never in plain UI text.
const CSS_SPECIAL: &[char] = &['#', '.', '[', ']', '>', ':', '=', '*', '~', '+', '(', ')', '"', '\''];

/// Render a strategy as one canonical raw selector (CSS or XPath).
///
/// Plain text is not valid CSS, so text-valued and bare-role strategies
/// become an XPath text predicate.
pub fn to_canonical_selector(strategy: &LocatorStrategy) -> String {
    let value = strategy.value.as_str();
    match strategy.strategy_type {
        StrategyType::Xpath => value.to_string(),
        StrategyType::Css if looks_like_css(value) => value.to_string(),
        StrategyType::Css => text_predicate(value),
        StrategyType::TestId => format!("[data-testid=\"{}\"]", value),
        StrategyType::Placeholder => format!("[placeholder=\"{}\"]", value),
        StrategyType::Label => format!(
            "//label[normalize-space()={}]/following::input[1]",
            xpath_literal(value)
        ),
        // `role=button[name="Save"]` is already engine syntax
        StrategyType::Role if value.starts_with("role=") => value.to_string(),
        StrategyType::Role | StrategyType::Text => text_predicate(value),
    }
}

/// Canonical selectors for the whole fallback chain, duplicates removed.
pub fn fallback_chain(locators: &GeneratedLocators) -> Vec<String> {
    let mut chain: Vec<String> = Vec::new();
    for selector in locators.all().map(to_canonical_selector) {
        if !chain.contains(&selector) {
            chain.push(selector);
        }
    }
    chain
}

/// Heuristic: does `value` read as a CSS selector rather than UI text?
///
/// Sentence-like text (spaces, no selector characters) and a bare
/// title-case word ("Save") are treated as text.
pub fn looks_like_css(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return false;
    }
    if value.contains(CSS_SPECIAL) {
        return true;
    }
    if value.contains(char::is_whitespace) {
        return false;
    }
    !is_title_case_word(value)
}

fn is_title_case_word(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => chars.all(|c| c.is_lowercase()),
        _ => false,
    }
}

/// `//*[text()="v" or contains(text(),"v")]`
pub fn text_predicate(value: &str) -> String {
    let literal = xpath_literal(value.trim());
    format!("//*[text()={} or contains(text(),{})]", literal, literal)
}

/// Quote a string for XPath 1.0, falling back to `concat()` when it holds
/// both quote kinds.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }
    if !value.contains('\'') {
        return format!("'{}'", value);
    }
    let parts: Vec<String> = value
        .split('"')
        .map(|part| format!("\"{}\"", part))
        .collect();
    format!("concat({})", parts.join(", '\"', "))
}

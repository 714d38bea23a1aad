use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::script::{Action, LocatorDescriptor, LocatorKind};

use super::healing::xpath_literal;
use super::strategy_model::{GeneratedLocators, LocatorStrategy, StrategyType, stability};

/// Fallbacks kept after the primary.
pub const MAX_ALTERNATIVES: usize = 4;

// ============================================================================
// Raw selector markers
// ============================================================================

const RAW_BASE_SCORE: i32 = 50;

static TEST_ID_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"data-(?:testid|test-id|test|qa|cy)\b").unwrap());
static ID_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[A-Za-z_][\w-]*|\[id\s*=").unwrap());
static ARIA_LABEL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[aria-label\s*[~|^$*]?=").unwrap());
static NAME_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[name\s*=").unwrap());
static PLACEHOLDER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[placeholder\s*[~|^$*]?=").unwrap());
static ROLE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[role\s*=|^role=|internal:role=").unwrap());

static NTH_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r":nth-(?:child|of-type|last-child)\(|:nth\(|>>\s*nth=|\[\d+\]|:eq\(").unwrap()
});
static UTILITY_CLASS_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\.(?:css-[a-z0-9]+|sc-[A-Za-z]+|[A-Za-z]+-[0-9a-f]{5,}|(?:m|p|mt|mb|ml|mr|mx|my|pt|pb|pl|pr|px|py|w|h|gap|flex|grid|text|bg|col)-[\w-]+)\b",
    )
    .unwrap()
});
static COMBINATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*[>+~]\s*|\s+").unwrap());
static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[[^\]]*\]|"[^"]*"|'[^']*'"#).unwrap());

// Attribute extraction for derived alternates
static ID_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"#([A-Za-z_][\w-]*)|\[id\s*=\s*["']?([^"'\]]+)["']?\]"#).unwrap()
});
static ARIA_LABEL_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[aria-label\s*=\s*["']([^"']+)["']\]"#).unwrap());
static NAME_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[name\s*=\s*["']?([^"'\]]+)["']?\]"#).unwrap());
static TEST_ID_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[data-(?:testid|test-id)\s*=\s*["']?([^"'\]]+)["']?\]"#).unwrap()
});
static PLACEHOLDER_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[placeholder\s*=\s*["']([^"']+)["']\]"#).unwrap());

// ============================================================================
// Generation
// ============================================================================

/// Ranked locators for an action's target. No target yields the
/// zero-stability placeholder.
pub fn generate(action: &Action) -> GeneratedLocators {
    match &action.target {
        Some(descriptor) => generate_for(descriptor),
        None => GeneratedLocators::degenerate(),
    }
}

/// Enumerate every strategy derivable from a descriptor, then rank.
pub fn generate_for(descriptor: &LocatorDescriptor) -> GeneratedLocators {
    let value = descriptor.value.trim();
    let candidates = if value.is_empty() {
        Vec::new()
    } else {
        match descriptor.kind {
            LocatorKind::Role => role_strategies(value, descriptor.name.as_deref()),
            LocatorKind::Text => text_strategies(value),
            LocatorKind::Placeholder => placeholder_strategies(value),
            LocatorKind::Label => label_strategies(value),
            LocatorKind::TestId => test_id_strategies(value),
            LocatorKind::RawSelector => raw_strategies(value),
        }
    };

    let ranked = rank(candidates);
    trace!(
        kind = ?descriptor.kind,
        value = %descriptor.value,
        stability = ranked.stability_score,
        "generated locators"
    );
    ranked
}

/// Sort by descending stability (generation order breaks ties), drop
/// duplicate (type, value) pairs, keep the primary plus four fallbacks.
pub fn rank(mut candidates: Vec<LocatorStrategy>) -> GeneratedLocators {
    candidates.sort_by(|a, b| b.stability.cmp(&a.stability));

    let mut unique: Vec<LocatorStrategy> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !unique.iter().any(|u| u.same_target(&candidate)) {
            unique.push(candidate);
        }
    }

    let mut iter = unique.into_iter();
    let Some(primary) = iter.next() else {
        return GeneratedLocators::degenerate();
    };
    let alternatives: Vec<LocatorStrategy> = iter.take(MAX_ALTERNATIVES).collect();
    let stability_score = primary.stability;

    GeneratedLocators {
        primary,
        alternatives,
        stability_score,
    }
}

fn role_strategies(role: &str, name: Option<&str>) -> Vec<LocatorStrategy> {
    let name = name.map(str::trim).filter(|n| !n.is_empty());
    let Some(name) = name else {
        return vec![
            LocatorStrategy::new(StrategyType::Role, role, stability::BARE_ROLE, format!("role {}", role)),
            LocatorStrategy::new(
                StrategyType::Css,
                format!("[role=\"{}\"]", role),
                stability::CSS_ATTRIBUTE,
                "role attribute",
            ),
        ];
    };

    let literal = xpath_literal(name);
    let tag = implicit_tag(role);
    vec![
        LocatorStrategy::new(
            StrategyType::Role,
            format!("role={}[name=\"{}\"]", role, name.replace('"', "\\\"")),
            stability::ROLE_NAME,
            format!("{} named {}", role, name),
        ),
        LocatorStrategy::new(
            StrategyType::Xpath,
            format!(
                "//*[@role=\"{}\" or self::{}][normalize-space()={}]",
                role, tag, literal
            ),
            stability::EXACT_TEXT,
            "role with exact accessible text",
        ),
        LocatorStrategy::new(
            StrategyType::Xpath,
            format!("//{}[contains(normalize-space(),{})]", tag, literal),
            stability::CONTAINS_TEXT,
            "tag containing accessible text",
        ),
    ]
}

/// HTML tag that carries a role implicitly.
fn implicit_tag(role: &str) -> &str {
    match role {
        "button" => "button",
        "link" => "a",
        "textbox" | "checkbox" | "radio" | "searchbox" | "spinbutton" => "input",
        "combobox" | "listbox" => "select",
        "option" => "option",
        "heading" => "h1",
        "table" | "grid" => "table",
        "row" => "tr",
        "cell" | "gridcell" => "td",
        "img" => "img",
        "dialog" | "alertdialog" => "dialog",
        other => other,
    }
}

fn text_strategies(text: &str) -> Vec<LocatorStrategy> {
    let literal = xpath_literal(text);
    vec![
        LocatorStrategy::new(StrategyType::Text, text, stability::EXACT_TEXT, "visible text"),
        LocatorStrategy::new(
            StrategyType::Xpath,
            format!("//*[normalize-space(text())={}]", literal),
            stability::EXACT_TEXT,
            "exact text",
        ),
        LocatorStrategy::new(
            StrategyType::Xpath,
            format!("//*[contains(text(),{})]", literal),
            stability::CONTAINS_TEXT,
            "contains text",
        ),
    ]
}

fn placeholder_strategies(placeholder: &str) -> Vec<LocatorStrategy> {
    vec![
        LocatorStrategy::new(
            StrategyType::Placeholder,
            placeholder,
            stability::PLACEHOLDER,
            "placeholder",
        ),
        LocatorStrategy::new(
            StrategyType::Css,
            format!("[placeholder=\"{}\"]", placeholder.replace('"', "\\\"")),
            stability::CSS_ATTRIBUTE,
            "placeholder attribute",
        ),
        LocatorStrategy::new(
            StrategyType::Xpath,
            format!("//input[@placeholder={}]", xpath_literal(placeholder)),
            stability::CSS_ATTRIBUTE,
            "input by placeholder",
        ),
    ]
}

fn label_strategies(label: &str) -> Vec<LocatorStrategy> {
    vec![
        LocatorStrategy::new(StrategyType::Label, label, stability::LABEL, "label"),
        LocatorStrategy::new(
            StrategyType::Xpath,
            format!(
                "//label[normalize-space()={}]/following::input[1]",
                xpath_literal(label)
            ),
            stability::CSS_ATTRIBUTE,
            "input following label",
        ),
    ]
}

fn test_id_strategies(test_id: &str) -> Vec<LocatorStrategy> {
    vec![
        LocatorStrategy::new(StrategyType::TestId, test_id, stability::TEST_ID, "test id"),
        LocatorStrategy::new(
            StrategyType::Css,
            format!("[data-testid=\"{}\"]", test_id),
            stability::TEST_ID_CSS,
            "test id attribute",
        ),
    ]
}

/// The recorded selector with a computed score, plus alternates for any
/// stable attribute embedded in it.
fn raw_strategies(selector: &str) -> Vec<LocatorStrategy> {
    let (strategy_type, selector) = match selector.strip_prefix("xpath=") {
        Some(xpath) => (StrategyType::Xpath, xpath),
        None if selector.starts_with("//") || selector.starts_with("(//") => {
            (StrategyType::Xpath, selector)
        }
        None => (StrategyType::Css, selector),
    };

    let mut strategies = vec![LocatorStrategy::new(
        strategy_type,
        selector,
        score_raw_selector(selector),
        "recorded selector",
    )];

    if let Some(id) = first_capture(&TEST_ID_VALUE, selector) {
        strategies.push(LocatorStrategy::new(
            StrategyType::TestId,
            id,
            stability::TEST_ID,
            "embedded test id",
        ));
    }
    if let Some(id) = first_capture(&ID_VALUE, selector) {
        strategies.push(LocatorStrategy::new(
            StrategyType::Css,
            format!("#{}", id),
            stability::ID,
            "embedded id",
        ));
    }
    if let Some(label) = first_capture(&ARIA_LABEL_VALUE, selector) {
        strategies.push(LocatorStrategy::new(
            StrategyType::Css,
            format!("[aria-label=\"{}\"]", label),
            stability::ARIA_LABEL,
            "embedded aria-label",
        ));
    }
    if let Some(placeholder) = first_capture(&PLACEHOLDER_VALUE, selector) {
        strategies.push(LocatorStrategy::new(
            StrategyType::Placeholder,
            placeholder,
            stability::PLACEHOLDER,
            "embedded placeholder",
        ));
    }
    if let Some(name) = first_capture(&NAME_VALUE, selector) {
        strategies.push(LocatorStrategy::new(
            StrategyType::Css,
            format!("[name=\"{}\"]", name),
            stability::NAME,
            "embedded name attribute",
        ));
    }
    strategies
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).and_then(|caps| {
        caps.iter()
            .skip(1)
            .flatten()
            .next()
            .map(|m| m.as_str().trim().to_string())
    })
}

// ============================================================================
// Raw selector scoring
// ============================================================================

/// Heuristic stability of a recorded CSS/XPath selector, clamped to
/// `[0, 100]`.
pub fn score_raw_selector(selector: &str) -> u8 {
    let mut score = RAW_BASE_SCORE;

    let boosts: [(&Regex, i32); 6] = [
        (&TEST_ID_MARKER, 40),
        (&ID_MARKER, 35),
        (&ARIA_LABEL_MARKER, 30),
        (&NAME_MARKER, 25),
        (&PLACEHOLDER_MARKER, 20),
        (&ROLE_MARKER, 15),
    ];
    for (marker, boost) in boosts {
        if marker.is_match(selector) {
            score += boost;
        }
    }

    if NTH_MARKER.is_match(selector) {
        score -= 25;
    }
    if combinator_count(selector) > 3 {
        score -= 15;
    }
    if UTILITY_CLASS_MARKER.is_match(selector) {
        score -= 10;
    }

    score.clamp(0, 100) as u8
}

/// Number of combinators between compound selectors, ignoring anything
/// inside brackets or quotes.
fn combinator_count(selector: &str) -> usize {
    let stripped = BRACKETED.replace_all(selector.trim(), "[]");
    COMBINATOR.find_iter(stripped.trim()).count()
}

use serde::{Deserialize, Serialize};

// ============================================================================
// Locator strategies
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategyType {
    Xpath,
    Css,
    TestId,
    Text,
    Role,
    Placeholder,
    Label,
}

/// Fixed stability tiers (0-100).
pub mod stability {
    pub const TEST_ID: u8 = 100;
    pub const ID: u8 = 95;
    pub const TEST_ID_CSS: u8 = 95;
    pub const ROLE_NAME: u8 = 90;
    pub const PLACEHOLDER: u8 = 85;
    pub const LABEL: u8 = 85;
    pub const ARIA_LABEL: u8 = 85;
    pub const NAME: u8 = 80;
    pub const EXACT_TEXT: u8 = 75;
    pub const CONTAINS_TEXT: u8 = 65;
    pub const CSS_ATTRIBUTE: u8 = 60;
    pub const BARE_ROLE: u8 = 60;
    pub const CSS_CLASS: u8 = 50;
    pub const CSS_NTH: u8 = 25;
    pub const XPATH_INDEX: u8 = 20;
}

/// One concrete, ranked way to relocate an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocatorStrategy {
    #[serde(rename = "type")]
    pub strategy_type: StrategyType,

    /// Opaque selector text; consumers apply their own escaping
    pub value: String,

    pub stability: u8,

    pub description: String,
}

impl LocatorStrategy {
    pub fn new(
        strategy_type: StrategyType,
        value: impl Into<String>,
        stability: u8,
        description: impl Into<String>,
    ) -> Self {
        Self {
            strategy_type,
            value: value.into(),
            stability: stability.min(100),
            description: description.into(),
        }
    }

    fn key(&self) -> (StrategyType, &str) {
        (self.strategy_type, self.value.as_str())
    }

    pub fn same_target(&self, other: &LocatorStrategy) -> bool {
        self.key() == other.key()
    }
}

/// Ranked strategies for one action target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneratedLocators {
    pub primary: LocatorStrategy,

    /// At most four fallbacks in descending stability
    #[serde(default)]
    pub alternatives: Vec<LocatorStrategy>,

    pub stability_score: u8,
}

impl GeneratedLocators {
    /// Zero-stability wildcard: nothing could be derived.
    pub fn degenerate() -> Self {
        Self {
            primary: LocatorStrategy::new(
                StrategyType::Css,
                "*",
                0,
                "no locator strategy could be derived",
            ),
            alternatives: Vec::new(),
            stability_score: 0,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.stability_score == 0
    }

    /// Primary first, then alternatives, in rank order.
    pub fn all(&self) -> impl Iterator<Item = &LocatorStrategy> {
        std::iter::once(&self.primary).chain(self.alternatives.iter())
    }
}

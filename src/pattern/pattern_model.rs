use serde::{Deserialize, Serialize};

use crate::script::Action;

// ============================================================================
// Recognized UI motifs
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Login,
    Dropdown,
    Modal,
    Search,
    Navigation,
}

impl PatternType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::Login => "login",
            PatternType::Dropdown => "dropdown",
            PatternType::Modal => "modal",
            PatternType::Search => "search",
            PatternType::Navigation => "navigation",
        }
    }
}

/// Which dialog button closed a modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalDecision {
    Confirm,
    Cancel,
}

/// One input collected ahead of a search submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCriterion {
    pub action_index: usize,
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Type-specific payload of a Pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatternData {
    Login {
        username: String,
        password: String,
        username_index: usize,
        password_index: usize,
        submit_index: usize,
    },
    Dropdown {
        field_context: String,
        option_text: String,
        trigger_index: usize,
        option_index: usize,
    },
    Modal {
        dialog_text: String,
        decision: ModalDecision,
        button_name: String,
        assertion_index: usize,
        button_index: usize,
    },
    Search {
        criteria: Vec<SearchCriterion>,
        button_index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        verification_index: Option<usize>,
    },
    Navigation {
        module: String,
        link_name: String,
        link_index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        heading: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        heading_index: Option<usize>,
    },
}

/// A recognized multi-action motif spanning `[start_index, end_index]`
/// (inclusive) of the action sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub pattern_type: PatternType,
    pub start_index: usize,
    pub end_index: usize,
    pub confidence: f64,
    pub data: PatternData,
}

impl Pattern {
    pub fn contains(&self, index: usize) -> bool {
        (self.start_index..=self.end_index).contains(&index)
    }

    /// Recorded indices of the actions inside the span. Filtered lists can
    /// leave gaps, so the span is not walked as a plain range.
    pub fn member_indices(&self, actions: &[Action]) -> Vec<usize> {
        actions
            .iter()
            .map(|a| a.index)
            .filter(|&i| self.contains(i))
            .collect()
    }

    /// Number of actions of `actions` the pattern consumed.
    pub fn len(&self, actions: &[Action]) -> usize {
        actions.iter().filter(|a| self.contains(a.index)).count()
    }

    pub fn is_empty(&self, actions: &[Action]) -> bool {
        self.len(actions) == 0
    }
}

/// Pattern whose span includes `index`, if any.
pub fn patterns_covering(patterns: &[Pattern], index: usize) -> Option<&Pattern> {
    patterns.iter().find(|p| p.contains(index))
}

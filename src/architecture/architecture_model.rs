use serde::{Deserialize, Serialize};

use crate::context::ElementKind;
use crate::locator::GeneratedLocators;
use crate::pattern::PatternType;
use crate::script::{ActionType, LocatorDescriptor};

/// Owner recorded on shared navigation elements and their method.
pub const SHARED_NAVIGATION_MODULE: &str = "SharedNavigation";

// ============================================================================
// Elements
// ============================================================================

/// A named, materialized element of one module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDefinition {
    /// Unique within `module`
    pub name: String,
    pub module: String,
    pub element_kind: ElementKind,
    pub descriptor: LocatorDescriptor,
    pub locators: GeneratedLocators,
    pub purpose: String,

    /// Actions that touched this element, in sequence order
    pub action_indices: Vec<usize>,
}

/// How a method step reaches its element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ElementRef {
    /// Element of the method's own page grouping
    Named(String),
    /// Element of the shared navigation component
    Shared(String),
    /// No materialized element; canonical raw selector instead
    Inline(String),
}

// ============================================================================
// Methods
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodParameter {
    pub name: String,

    /// Value seen in the recording
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodStep {
    pub action_index: usize,
    pub action_type: ActionType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<ElementRef>,

    /// Parameter feeding this step's value, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,

    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDefinition {
    /// Unique within `module`
    pub name: String,
    pub module: String,

    #[serde(default)]
    pub parameters: Vec<MethodParameter>,

    #[serde(default)]
    pub steps: Vec<MethodStep>,

    /// Originating pattern, if the method wraps one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<PatternType>,

    pub step_text: String,
}

impl MethodDefinition {
    pub fn action_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.steps.iter().map(|s| s.action_index)
    }
}

// ============================================================================
// Groupings
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageGrouping {
    pub module: String,
    pub elements: Vec<ElementDefinition>,
    pub methods: Vec<MethodDefinition>,
}

impl PageGrouping {
    pub fn new(module: &str) -> Self {
        Self {
            module: module.to_string(),
            elements: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn element(&self, name: &str) -> Option<&ElementDefinition> {
        self.elements.iter().find(|e| e.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodDefinition> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Cross-module links plus one parametrized "navigate to module" method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedNavigation {
    pub elements: Vec<ElementDefinition>,
    pub method: MethodDefinition,
}

// ============================================================================
// Omissions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OmissionKind {
    UnresolvedLocator,
    DegenerateLocator,
    NameCollisionExhausted,
    UnassignedModule,
    TiedMethodModule,
}

impl OmissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OmissionKind::UnresolvedLocator => "unresolved_locator",
            OmissionKind::DegenerateLocator => "degenerate_locator",
            OmissionKind::NameCollisionExhausted => "name_collision_exhausted",
            OmissionKind::UnassignedModule => "unassigned_module",
            OmissionKind::TiedMethodModule => "tied_method_module",
        }
    }
}

/// Why something was left out of the artifact graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Omission {
    pub kind: OmissionKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_index: Option<usize>,

    /// Element or method the omission concerns
    pub subject: String,

    pub detail: String,
}

impl Omission {
    pub fn new(
        kind: OmissionKind,
        action_index: Option<usize>,
        subject: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            action_index,
            subject: subject.into(),
            detail: detail.into(),
        }
    }
}

// ============================================================================
// Result
// ============================================================================

/// The pipeline's artifact graph, handed to an external emitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Architecture {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_navigation: Option<SharedNavigation>,

    /// Ordered by module name
    pub page_groupings: Vec<PageGrouping>,

    #[serde(default)]
    pub omissions: Vec<Omission>,
}

impl Architecture {
    pub fn grouping(&self, module: &str) -> Option<&PageGrouping> {
        self.page_groupings.iter().find(|g| g.module == module)
    }

    pub fn element_count(&self) -> usize {
        self.page_groupings.iter().map(|g| g.elements.len()).sum::<usize>()
            + self
                .shared_navigation
                .as_ref()
                .map(|s| s.elements.len())
                .unwrap_or(0)
    }

    pub fn method_count(&self) -> usize {
        self.page_groupings.iter().map(|g| g.methods.len()).sum::<usize>()
            + usize::from(self.shared_navigation.is_some())
    }

    /// SHA-1 of the canonical JSON form; equal graphs share a fingerprint.
    pub fn fingerprint(&self) -> String {
        use sha1::{Digest, Sha1};

        let json = serde_json::to_string(self).unwrap_or_default();
        let mut hasher = Sha1::new();
        hasher.update(json.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::config::PipelineConfig;
use crate::context::{ElementContext, UNKNOWN_MODULE, context_at};
use crate::locator::generate_for;
use crate::naming::{NameRegistry, base_element_name, resolve_element_name};
use crate::pattern::PatternType;
use crate::pattern::detector::is_module_link_click;
use crate::script::{Action, LocatorDescriptor};

use super::architecture_model::{
    Architecture, ElementDefinition, MethodDefinition, MethodParameter, Omission, OmissionKind,
    PageGrouping, SHARED_NAVIGATION_MODULE, SharedNavigation,
};

/// Name of the synthesized shared navigation method.
pub const NAVIGATE_METHOD: &str = "navigateToModule";

/// Its single parameter.
pub const NAVIGATE_PARAMETER: &str = "moduleName";

// ============================================================================
// Shared navigation extraction
// ============================================================================

/// Shared navigation component plus the actions it absorbed.
#[derive(Debug, Clone, Default)]
pub struct NavigationExtraction {
    pub shared: Option<SharedNavigation>,

    /// Action index -> shared element name
    pub refs: BTreeMap<usize, String>,

    pub omissions: Vec<Omission>,
}

impl NavigationExtraction {
    /// Route another action on a shared link's descriptor (an assertion,
    /// a hover) to that shared element. Returns the element name.
    pub fn absorb(&mut self, index: usize, descriptor: &LocatorDescriptor) -> Option<String> {
        let element = self
            .shared
            .as_mut()?
            .elements
            .iter_mut()
            .find(|e| &e.descriptor == descriptor)?;
        if !element.action_indices.contains(&index) {
            element.action_indices.push(index);
            element.action_indices.sort_unstable();
        }
        self.refs.insert(index, element.name.clone());
        Some(element.name.clone())
    }
}

/// Collect every module link click into one element per distinct link name.
pub fn extract_navigation(
    actions: &[Action],
    contexts: &[ElementContext],
    config: &PipelineConfig,
) -> NavigationExtraction {
    let vocab = &config.vocabulary;
    let mut registry = NameRegistry::new();
    let mut elements: Vec<ElementDefinition> = Vec::new();
    let mut by_link: BTreeMap<String, usize> = BTreeMap::new();
    let mut extraction = NavigationExtraction::default();
    let mut first_module: Option<String> = None;

    for action in actions.iter().filter(|a| is_module_link_click(a, vocab)) {
        let (Some(descriptor), Some(ctx)) = (&action.target, context_at(contexts, action.index)) else {
            continue;
        };
        let link_name = descriptor.name.as_deref().unwrap_or_default().trim();
        let key = link_name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        if let Some(&pos) = by_link.get(&key) {
            elements[pos].action_indices.push(action.index);
            extraction.refs.insert(action.index, elements[pos].name.clone());
            continue;
        }

        let module = vocab
            .module_for_text(link_name)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| link_name.to_string());
        let base = base_element_name(ctx, Some(descriptor));
        let Some(name) =
            resolve_element_name(&base, SHARED_NAVIGATION_MODULE, Some(link_name), &mut registry)
        else {
            extraction.omissions.push(Omission::new(
                OmissionKind::NameCollisionExhausted,
                Some(action.index),
                base,
                format!("shared link \"{}\"", link_name),
            ));
            continue;
        };

        first_module.get_or_insert_with(|| module.clone());
        by_link.insert(key, elements.len());
        extraction.refs.insert(action.index, name.clone());
        elements.push(ElementDefinition {
            name,
            module: SHARED_NAVIGATION_MODULE.to_string(),
            element_kind: ctx.element_kind,
            descriptor: descriptor.clone(),
            locators: generate_for(descriptor),
            purpose: format!("navigate to {}", module),
            action_indices: vec![action.index],
        });
    }

    if !elements.is_empty() {
        debug!(links = elements.len(), "extracted shared navigation");
        extraction.shared = Some(SharedNavigation {
            elements,
            method: navigate_method(first_module),
        });
    }
    extraction
}

fn navigate_method(example: Option<String>) -> MethodDefinition {
    MethodDefinition {
        name: NAVIGATE_METHOD.to_string(),
        module: SHARED_NAVIGATION_MODULE.to_string(),
        parameters: vec![MethodParameter {
            name: NAVIGATE_PARAMETER.to_string(),
            example,
        }],
        steps: Vec::new(),
        pattern: Some(PatternType::Navigation),
        step_text: format!("Navigate to the module named by {}", NAVIGATE_PARAMETER),
    }
}

// ============================================================================
// Module assignment
// ============================================================================

/// Module owning a strict majority of `indices`.
///
/// No strict majority is a tie; a majority of `Unknown` is unassigned.
pub fn assign_module(
    indices: &[usize],
    contexts: &[ElementContext],
) -> Result<String, OmissionKind> {
    let mut votes: BTreeMap<&str, usize> = BTreeMap::new();
    for ctx in indices.iter().filter_map(|&i| context_at(contexts, i)) {
        *votes.entry(ctx.module.as_str()).or_default() += 1;
    }

    let total: usize = votes.values().sum();
    let Some((module, count)) = votes.iter().max_by_key(|(_, count)| **count) else {
        return Err(OmissionKind::UnassignedModule);
    };
    if count * 2 <= total {
        return Err(OmissionKind::TiedMethodModule);
    }
    if *module == UNKNOWN_MODULE {
        return Err(OmissionKind::UnassignedModule);
    }
    Ok(module.to_string())
}

// ============================================================================
// Partition
// ============================================================================

/// Partition elements and methods into page groupings ordered by module
/// name. Shared navigation elements never enter a grouping, and `Unknown`
/// entities are dropped.
pub fn organize(
    navigation: NavigationExtraction,
    elements: Vec<ElementDefinition>,
    methods: Vec<MethodDefinition>,
    mut omissions: Vec<Omission>,
) -> Architecture {
    let shared_actions: BTreeSet<usize> = navigation.refs.keys().copied().collect();
    let mut groupings: BTreeMap<String, PageGrouping> = BTreeMap::new();

    for element in elements {
        if element.action_indices.iter().any(|i| shared_actions.contains(i)) {
            continue;
        }
        if element.module == UNKNOWN_MODULE {
            omissions.push(Omission::new(
                OmissionKind::UnassignedModule,
                element.action_indices.first().copied(),
                element.name.clone(),
                "element has no owning module",
            ));
            continue;
        }
        groupings
            .entry(element.module.clone())
            .or_insert_with(|| PageGrouping::new(&element.module))
            .elements
            .push(element);
    }

    for method in methods {
        if method.module == UNKNOWN_MODULE {
            omissions.push(Omission::new(
                OmissionKind::UnassignedModule,
                method.steps.first().map(|s| s.action_index),
                method.name.clone(),
                "method has no owning module",
            ));
            continue;
        }
        groupings
            .entry(method.module.clone())
            .or_insert_with(|| PageGrouping::new(&method.module))
            .methods
            .push(method);
    }

    let mut all_omissions = navigation.omissions;
    all_omissions.extend(omissions);

    Architecture {
        shared_navigation: navigation.shared,
        page_groupings: groupings.into_values().collect(),
        omissions: all_omissions,
    }
}

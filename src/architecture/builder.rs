use std::collections::{BTreeMap, HashMap};

use crate::context::{ElementContext, context_at};
use crate::locator::generate;
use crate::locator::healing::to_canonical_selector;
use crate::naming::{
    ModuleRegistries, action_method_base, base_element_name, describe_action, describe_pattern,
    pattern_method_base, resolve_element_name, resolve_method_name, to_camel_case,
};
use crate::pattern::{Pattern, PatternData, patterns_covering};
use crate::script::{Action, ActionType, LocatorDescriptor, action_at, position_of};

use super::architecture_model::{
    ElementDefinition, ElementRef, MethodDefinition, MethodParameter, MethodStep, Omission,
    OmissionKind,
};
use super::organizer::{NavigationExtraction, assign_module};

/// Action types that need a located element to mean anything.
const TARGETED_TYPES: &[ActionType] = &[
    ActionType::Click,
    ActionType::Fill,
    ActionType::Select,
    ActionType::Check,
    ActionType::Uncheck,
    ActionType::Hover,
    ActionType::Upload,
];

// ============================================================================
// Elements
// ============================================================================

/// Materialized elements and how every targeted action refers to its element.
#[derive(Debug, Clone, Default)]
pub struct ElementSet {
    pub elements: Vec<ElementDefinition>,

    /// Action index -> reference used by method steps
    pub refs: BTreeMap<usize, ElementRef>,

    pub omissions: Vec<Omission>,
}

/// Materialize one Element Definition per (module, descriptor).
///
/// Any action on a shared navigation link's descriptor refers to the shared
/// element and is absorbed into `navigation`.
///
/// Skipped with an omission: missing target, zero-stability locators,
/// unknown module, or every naming tier taken. Skipped actions fall back to
/// an inline selector reference when one exists.
pub fn build_elements(
    actions: &[Action],
    contexts: &[ElementContext],
    navigation: &mut NavigationExtraction,
    registries: &mut ModuleRegistries,
) -> ElementSet {
    let mut set = ElementSet::default();
    let mut seen: HashMap<(String, LocatorDescriptor), usize> = HashMap::new();

    for action in actions {
        let index = action.index;
        if let Some(shared) = navigation.refs.get(&index) {
            set.refs.insert(index, ElementRef::Shared(shared.clone()));
            continue;
        }
        if let Some(shared) = action
            .target
            .as_ref()
            .and_then(|descriptor| navigation.absorb(index, descriptor))
        {
            set.refs.insert(index, ElementRef::Shared(shared));
            continue;
        }
        let Some(ctx) = context_at(contexts, index) else {
            set.omissions.push(Omission::new(
                OmissionKind::UnassignedModule,
                Some(index),
                action.method.clone(),
                "no context was extracted for the action",
            ));
            continue;
        };

        let Some(descriptor) = &action.target else {
            if action.is_assertion() || TARGETED_TYPES.contains(&action.action_type) {
                set.omissions.push(Omission::new(
                    OmissionKind::UnresolvedLocator,
                    Some(index),
                    action.method.clone(),
                    "no locator could be recovered from the call chain",
                ));
            }
            continue;
        };

        let locators = generate(action);
        if locators.is_degenerate() {
            set.omissions.push(Omission::new(
                OmissionKind::DegenerateLocator,
                Some(index),
                descriptor.value.clone(),
                "no locator strategy could be derived",
            ));
            continue;
        }
        let inline = ElementRef::Inline(to_canonical_selector(&locators.primary));

        if !ctx.is_assigned() {
            set.omissions.push(Omission::new(
                OmissionKind::UnassignedModule,
                Some(index),
                descriptor.value.clone(),
                "element has no owning module",
            ));
            set.refs.insert(index, inline);
            continue;
        }

        let key = (ctx.module.clone(), descriptor.clone());
        if let Some(&pos) = seen.get(&key) {
            let element = &mut set.elements[pos];
            element.action_indices.push(index);
            set.refs.insert(index, ElementRef::Named(element.name.clone()));
            continue;
        }

        let base = base_element_name(ctx, Some(descriptor));
        let hint = descriptor
            .name
            .as_deref()
            .or(ctx.business_term.as_deref())
            .or(descriptor.role_name());
        let registry = registries.for_module(&ctx.module);
        let Some(name) = resolve_element_name(&base, &ctx.module, hint, registry) else {
            set.omissions.push(Omission::new(
                OmissionKind::NameCollisionExhausted,
                Some(index),
                base,
                format!("every name tier is taken in {}", ctx.module),
            ));
            set.refs.insert(index, inline);
            continue;
        };

        seen.insert(key, set.elements.len());
        set.refs.insert(index, ElementRef::Named(name.clone()));
        set.elements.push(ElementDefinition {
            name,
            module: ctx.module.clone(),
            element_kind: ctx.element_kind,
            descriptor: descriptor.clone(),
            locators,
            purpose: ctx.purpose.clone(),
            action_indices: vec![index],
        });
    }

    set
}

// ============================================================================
// Methods
// ============================================================================

/// One Method Definition per pattern and one per action outside every
/// pattern, in sequence order.
pub fn build_methods(
    actions: &[Action],
    patterns: &[Pattern],
    contexts: &[ElementContext],
    elements: &ElementSet,
    registries: &mut ModuleRegistries,
) -> (Vec<MethodDefinition>, Vec<Omission>) {
    let mut methods = Vec::new();
    let mut omissions = Vec::new();
    let mut pos = 0;

    while let Some(first) = actions.get(pos) {
        let (indices, pattern) = match patterns_covering(patterns, first.index) {
            Some(pattern) => (pattern.member_indices(actions), Some(pattern)),
            None => (vec![first.index], None),
        };
        pos = indices
            .last()
            .and_then(|&last| position_of(actions, last))
            .map_or(pos, |last| last.max(pos))
            + 1;

        let module = match assign_module(&indices, contexts) {
            Ok(module) => module,
            Err(kind) => {
                let subject = pattern
                    .map(|p| p.pattern_type.as_str().to_string())
                    .unwrap_or_else(|| first.method.clone());
                omissions.push(Omission::new(
                    kind,
                    indices.first().copied(),
                    subject,
                    "method has no single owning module",
                ));
                continue;
            }
        };

        let base = match pattern {
            Some(pattern) => pattern_method_base(pattern, actions, &module),
            None => {
                let Some(ctx) = context_at(contexts, first.index) else {
                    continue;
                };
                let element_base = first
                    .target
                    .as_ref()
                    .map(|descriptor| base_element_name(ctx, Some(descriptor)))
                    .unwrap_or_default();
                action_method_base(first, ctx, &element_base)
            }
        };
        let name = resolve_method_name(&base, registries.for_module(&module));

        let (parameters, steps) = method_steps(&indices, pattern, actions, contexts, elements);
        let step_text = match pattern {
            Some(pattern) => describe_pattern(pattern),
            None => steps
                .first()
                .map(|s| s.description.clone())
                .unwrap_or_default(),
        };

        methods.push(MethodDefinition {
            name,
            module,
            parameters,
            steps,
            pattern: pattern.map(|p| p.pattern_type),
            step_text,
        });
    }

    (methods, omissions)
}

/// Steps for each constituent action, binding recorded values to
/// parameters.
fn method_steps(
    indices: &[usize],
    pattern: Option<&Pattern>,
    actions: &[Action],
    contexts: &[ElementContext],
    elements: &ElementSet,
) -> (Vec<MethodParameter>, Vec<MethodStep>) {
    let mut parameters: Vec<MethodParameter> = Vec::new();
    let mut steps = Vec::new();

    let dropdown_option = match pattern.map(|p| &p.data) {
        Some(PatternData::Dropdown {
            field_context,
            option_text,
            option_index,
            ..
        }) => Some((*option_index, field_context.as_str(), option_text.as_str())),
        _ => None,
    };

    for &i in indices {
        let (Some(action), Some(ctx)) = (action_at(actions, i), context_at(contexts, i)) else {
            continue;
        };

        let binding = match dropdown_option {
            Some((option_index, field, option)) if option_index == i => {
                Some((field.to_string(), Some(option.to_string())))
            }
            _ if takes_value(action) => Some((
                ctx.business_term.clone().unwrap_or_else(|| "value".to_string()),
                action.first_arg_text(),
            )),
            _ => None,
        };
        let parameter = binding.map(|(stem, example)| {
            let name = unique_parameter(&parameters, &stem);
            parameters.push(MethodParameter {
                name: name.clone(),
                example,
            });
            name
        });

        steps.push(MethodStep {
            action_index: i,
            action_type: action.action_type,
            element: elements.refs.get(&i).cloned(),
            parameter,
            description: describe_action(action, ctx),
        });
    }

    (parameters, steps)
}

fn takes_value(action: &Action) -> bool {
    matches!(
        action.action_type,
        ActionType::Fill | ActionType::Select | ActionType::Upload
    ) && action.method != "clear"
}

fn unique_parameter(existing: &[MethodParameter], stem: &str) -> String {
    let base = match to_camel_case(stem) {
        name if name.is_empty() => "value".to_string(),
        name => name,
    };
    if !existing.iter().any(|p| p.name == base) {
        return base;
    }
    (2..)
        .map(|n| format!("{}{}", base, n))
        .find(|candidate| !existing.iter().any(|p| &p.name == candidate))
        .unwrap_or(base)
}

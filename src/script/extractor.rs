use std::collections::HashMap;

use serde_json::{Map, Number, Value};
use tracing::debug;

use super::action_model::{Action, ActionType, LocatorDescriptor, LocatorKind, value_as_text};
use super::ast::{Expr, Program, PropKey, Property, Span, Visitor, walk_program};
use super::error::ParseError;
use super::syntax::parse;

/// Calls that refine a locator without changing what it targets.
const REFINERS: &[&str] = &["first", "last", "nth", "filter", "and", "or", "not", "describe"];

/// Segments allowed between `expect(...)` and the matcher.
const MATCHER_MODIFIERS: &[&str] = &["not", "resolves", "rejects"];

/// Bound on chain and alias recursion.
const MAX_ALIAS_DEPTH: usize = 32;

// ============================================================================
// Extraction entry points
// ============================================================================

/// Parse recorded script source and extract its ordered action sequence.
///
/// A parse failure aborts extraction; no partial list is returned.
pub fn extract(source: &str) -> Result<Vec<Action>, ParseError> {
    let program = parse(source)?;
    Ok(extract_program(&program, source))
}

/// Extract actions from an already-parsed program, visiting every awaited
/// call in source order.
pub fn extract_program(program: &Program, source: &str) -> Vec<Action> {
    let mut collector = ActionCollector {
        source,
        scopes: Scopes::default(),
        actions: Vec::new(),
    };
    walk_program(program, &mut collector);

    debug!(count = collector.actions.len(), "extracted actions");
    collector.actions
}

struct ActionCollector<'a> {
    source: &'a str,
    scopes: Scopes<'a>,
    actions: Vec<Action>,
}

impl<'a> Visitor<'a> for ActionCollector<'a> {
    fn expr(&mut self, expr: &'a Expr) {
        if let Expr::Await { argument, span } = expr {
            if let Expr::Call { callee, args, .. } = argument.as_ref() {
                let index = self.actions.len();
                let action = build_action(index, callee, args, *span, self.source, &self.scopes);
                self.actions.push(action);
            }
        }
    }

    fn declare(&mut self, name: &'a str, init: &'a Expr) {
        self.scopes.declare(name, init);
    }

    fn enter_scope(&mut self) {
        self.scopes.frames.push(HashMap::new());
    }

    fn exit_scope(&mut self) {
        self.scopes.frames.pop();
    }
}

/// `const name = <expr>` bindings visible at the current point of the walk,
/// innermost function body or block last.
#[derive(Default)]
struct Scopes<'a> {
    frames: Vec<HashMap<&'a str, &'a Expr>>,
}

impl<'a> Scopes<'a> {
    fn declare(&mut self, name: &'a str, init: &'a Expr) {
        if self.frames.is_empty() {
            self.frames.push(HashMap::new());
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name, init);
        }
    }

    fn lookup(&self, name: &str) -> Option<&'a Expr> {
        self.frames.iter().rev().find_map(|frame| frame.get(name).copied())
    }
}

// ============================================================================
// Action construction
// ============================================================================

fn build_action(
    index: usize,
    callee: &Expr,
    args: &[Expr],
    span: Span,
    source: &str,
    scopes: &Scopes,
) -> Action {
    let method = callee.callee_name().unwrap_or("anonymous").to_string();
    let receiver = match callee {
        Expr::Member { object, .. } => Some(object.as_ref()),
        _ => None,
    };

    let verification = receiver.and_then(verification_subject);
    let verified = verification.is_some();
    let target = match verification {
        // Verification wrappers carry the locator inside `expect(...)`
        Some(subject) => subject.and_then(|s| locator_from_expr(s, source, scopes, 0)),
        None => receiver.and_then(|r| locator_from_expr(r, source, scopes, 0)),
    };

    let (positional, options) = split_options(args);

    let mut action = Action::new(index, ActionType::from_method(&method, verified), method);
    action.target = target;
    action.args = positional.iter().map(evaluate).collect();
    action.options = options;
    action.line = span.line;
    action.raw_text = source
        .get(span.start..span.end)
        .unwrap_or_default()
        .trim()
        .to_string();
    action
}

/// If `receiver` is `expect(x)` (optionally `.soft`, `.not`, ...), return
/// the wrapped subject. The inner option is `None` for `expect()`.
fn verification_subject(receiver: &Expr) -> Option<Option<&Expr>> {
    let mut current = receiver;
    loop {
        match current {
            Expr::Member {
                object, property, ..
            } if MATCHER_MODIFIERS.contains(&property.as_str()) => current = object,
            Expr::Call { callee, args, .. } if is_expect_callee(callee) => {
                return Some(args.first());
            }
            _ => return None,
        }
    }
}

fn is_expect_callee(callee: &Expr) -> bool {
    match callee {
        Expr::Ident(name) => name == "expect",
        Expr::Member {
            object, property, ..
        } => {
            matches!(object.as_ref(), Expr::Ident(name) if name == "expect")
                && matches!(property.as_str(), "soft" | "poll")
        }
        _ => false,
    }
}

/// Split a trailing object literal off the argument list.
fn split_options(args: &[Expr]) -> (&[Expr], Map<String, Value>) {
    match args.split_last() {
        Some((last @ Expr::Object(_), rest)) => {
            let options = match evaluate(last) {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            (rest, options)
        }
        _ => (args, Map::new()),
    }
}

// ============================================================================
// Locator chain recovery
// ============================================================================

/// Walk a call chain backward to the nearest locator-producing call.
fn locator_from_expr(
    expr: &Expr,
    source: &str,
    scopes: &Scopes,
    depth: usize,
) -> Option<LocatorDescriptor> {
    if depth > MAX_ALIAS_DEPTH {
        return None;
    }
    match expr {
        Expr::Call { callee, args, .. } => {
            let Expr::Member {
                object, property, ..
            } = callee.as_ref()
            else {
                return None;
            };

            if let Some(mut descriptor) = descriptor_for(property, args) {
                if locator_from_expr(object, source, scopes, depth + 1).is_some() {
                    descriptor.scope = Some(render_expr(object, source));
                }
                return Some(descriptor);
            }
            if REFINERS.contains(&property.as_str()) {
                return locator_from_expr(object, source, scopes, depth + 1);
            }
            None
        }
        Expr::Await { argument, .. } => locator_from_expr(argument, source, scopes, depth + 1),
        Expr::Ident(name) => scopes
            .lookup(name)
            .and_then(|init| locator_from_expr(init, source, scopes, depth + 1)),
        _ => None,
    }
}

/// Build a descriptor when `method` is one of the recorder's locate calls.
fn descriptor_for(method: &str, args: &[Expr]) -> Option<LocatorDescriptor> {
    let first = args.first().map(evaluate).and_then(|v| value_as_text(&v))?;
    let options = match args.get(1).map(evaluate) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    let exact = options.get("exact").and_then(Value::as_bool);

    let mut descriptor = match method {
        "getByRole" => {
            let mut d = LocatorDescriptor::new(LocatorKind::Role, first);
            d.name = options.get("name").and_then(value_as_text);
            d
        }
        "getByText" => LocatorDescriptor::new(LocatorKind::Text, first),
        "getByPlaceholder" => LocatorDescriptor::new(LocatorKind::Placeholder, first),
        "getByLabel" => LocatorDescriptor::new(LocatorKind::Label, first),
        "getByTestId" => LocatorDescriptor::new(LocatorKind::TestId, first),
        "getByAltText" => {
            LocatorDescriptor::new(LocatorKind::RawSelector, format!("[alt=\"{}\"]", first))
        }
        "getByTitle" => {
            LocatorDescriptor::new(LocatorKind::RawSelector, format!("[title=\"{}\"]", first))
        }
        "locator" | "$" | "frameLocator" => raw_selector_descriptor(&first),
        _ => return None,
    };
    descriptor.exact = exact;
    Some(descriptor)
}

/// Interpret Playwright selector-engine prefixes inside `locator(...)`.
fn raw_selector_descriptor(selector: &str) -> LocatorDescriptor {
    let trimmed = selector.trim();
    if let Some(text) = trimmed.strip_prefix("text=") {
        let text = text.trim_matches('"');
        return LocatorDescriptor::new(LocatorKind::Text, text);
    }
    if let Some(id) = trimmed
        .strip_prefix("data-testid=")
        .or_else(|| trimmed.strip_prefix("internal:testid="))
    {
        return LocatorDescriptor::new(LocatorKind::TestId, id.trim_matches('"'));
    }
    let css = trimmed.strip_prefix("css=").unwrap_or(trimmed);
    LocatorDescriptor::new(LocatorKind::RawSelector, css)
}

// ============================================================================
// Argument evaluation
// ============================================================================

/// Evaluate a literal or structured argument into a plain value.
pub fn evaluate(expr: &Expr) -> Value {
    match expr {
        Expr::Str(s) | Expr::Template(s) => Value::String(s.clone()),
        Expr::Num(n) => number_value(*n),
        Expr::Bool(b) => Value::Bool(*b),
        Expr::Null => Value::Null,
        Expr::Regex { pattern, flags } => Value::String(format!("/{}/{}", pattern, flags)),
        Expr::Array(items) => Value::Array(items.iter().map(evaluate).collect()),
        Expr::Object(props) => {
            let mut map = Map::new();
            for prop in props {
                match prop {
                    Property::KeyValue {
                        key: PropKey::Named(key),
                        value,
                    } => {
                        map.insert(key.clone(), evaluate(value));
                    }
                    Property::Shorthand(name) => {
                        map.insert(name.clone(), Value::String(name.clone()));
                    }
                    _ => {}
                }
            }
            Value::Object(map)
        }
        Expr::Unary { op, argument } if op == "-" => match argument.as_ref() {
            Expr::Num(n) => number_value(-n),
            _ => Value::Null,
        },
        Expr::Ident(_) | Expr::Member { .. } => {
            member_path(expr).map(Value::String).unwrap_or(Value::Null)
        }
        _ => Value::Null,
    }
}

fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// Dotted path of an identifier/member chain (`process.env.USER`).
fn member_path(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Ident(name) => Some(name.clone()),
        Expr::Member {
            object, property, ..
        } => member_path(object).map(|base| format!("{}.{}", base, property)),
        _ => None,
    }
}

/// Short source rendering of a chain, used for locator scopes.
fn render_expr(expr: &Expr, source: &str) -> String {
    match expr {
        Expr::Call { span, .. } => source
            .get(span.start..span.end)
            .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
            .unwrap_or_default(),
        _ => member_path(expr).unwrap_or_default(),
    }
}

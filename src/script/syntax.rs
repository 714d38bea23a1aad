use tracing::debug;
use tree_sitter::{Node, Parser};

use super::ast::{ArrowBody, Expr, Program, PropKey, Property, Span, Stmt};
use super::error::ParseError;

/// Kinds with no runtime effect on a recording.
const INERT_STATEMENTS: &[&str] = &[
    "break_statement",
    "continue_statement",
    "debugger_statement",
    "empty_statement",
    "hash_bang_line",
    "interface_declaration",
    "type_alias_declaration",
    "enum_declaration",
    "ambient_declaration",
    "abstract_method_signature",
];

const SNIPPET_CHARS: usize = 40;

// ============================================================================
// Entry point
// ============================================================================

/// Parse TypeScript (or plain JavaScript) source into a [`Program`].
///
/// Any error or missing node anywhere in the tree fails the whole parse.
pub fn parse(source: &str) -> Result<Program, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
        .map_err(|e| ParseError::Grammar(e.to_string()))?;
    let tree = parser.parse(source, None).ok_or(ParseError::NoTree)?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(first_error(root, source));
    }

    let body = statements(root, source);
    debug!(statements = body.len(), "parsed script");
    Ok(Program { body })
}

/// Earliest error or missing node, in source order.
fn first_error(root: Node, source: &str) -> ParseError {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        let at = node.start_position();
        if node.is_missing() {
            return ParseError::Missing {
                expected: node.kind().to_string(),
                line: at.row + 1,
                column: at.column + 1,
            };
        }
        if node.is_error() {
            return ParseError::Syntax {
                line: at.row + 1,
                column: at.column + 1,
                near: snippet(node, source),
            };
        }
        let mut cursor = node.walk();
        let broken: Vec<Node> = node
            .children(&mut cursor)
            .filter(|c| c.has_error() || c.is_missing())
            .collect();
        stack.extend(broken.into_iter().rev());
    }

    let at = root.start_position();
    ParseError::Syntax {
        line: at.row + 1,
        column: at.column + 1,
        near: snippet(root, source),
    }
}

fn snippet(node: Node, source: &str) -> String {
    text(node, source)
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .chars()
        .take(SNIPPET_CHARS)
        .collect()
}

// ============================================================================
// Node helpers
// ============================================================================

fn text<'s>(node: Node, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or_default()
}

fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect()
}

fn first_named<'t>(node: Node<'t>) -> Option<Node<'t>> {
    named_children(node).into_iter().next()
}

fn span(node: Node) -> Span {
    Span {
        start: node.start_byte(),
        end: node.end_byte(),
        line: node.start_position().row + 1,
    }
}

fn field_expr(node: Node, name: &str, source: &str) -> Box<Expr> {
    Box::new(
        node.child_by_field_name(name)
            .map(|child| lower_expr(child, source))
            .unwrap_or(Expr::Null),
    )
}

fn field_text(node: Node, name: &str, source: &str) -> String {
    node.child_by_field_name(name)
        .map(|child| text(child, source).to_string())
        .unwrap_or_default()
}

fn is_async(node: Node) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor).any(|c| c.kind() == "async")
}

// ============================================================================
// Statements
// ============================================================================

fn statements(node: Node, source: &str) -> Vec<Stmt> {
    let mut out = Vec::new();
    for child in named_children(node) {
        lower_stmt_into(child, source, &mut out);
    }
    out
}

/// Lower one statement node, flattening declarations into one `Declare`
/// per declarator.
fn lower_stmt_into(node: Node, source: &str, out: &mut Vec<Stmt>) {
    match node.kind() {
        "lexical_declaration" | "variable_declaration" => {
            for declarator in named_children(node) {
                if declarator.kind() != "variable_declarator" {
                    continue;
                }
                out.push(Stmt::Declare {
                    name: field_text(declarator, "name", source),
                    init: declarator
                        .child_by_field_name("value")
                        .map(|value| lower_expr(value, source)),
                });
            }
        }
        "export_statement" => {
            if let Some(declaration) = node.child_by_field_name("declaration") {
                lower_stmt_into(declaration, source, out);
            } else if let Some(value) = node.child_by_field_name("value") {
                out.push(Stmt::Expr(lower_expr(value, source)));
            } else {
                out.push(Stmt::Module(text(node, source).trim().to_string()));
            }
        }
        _ => out.push(lower_stmt(node, source)),
    }
}

fn lower_stmt(node: Node, source: &str) -> Stmt {
    let kind = node.kind();
    if INERT_STATEMENTS.contains(&kind) {
        return Stmt::Empty;
    }

    match kind {
        "import_statement" => Stmt::Module(text(node, source).trim().to_string()),
        "lexical_declaration" | "variable_declaration" | "export_statement" => {
            let mut out = Vec::new();
            lower_stmt_into(node, source, &mut out);
            match <[Stmt; 1]>::try_from(out) {
                Ok([stmt]) => stmt,
                Err(out) => Stmt::Block(out),
            }
        }
        "expression_statement" => first_named(node)
            .map(|e| Stmt::Expr(lower_expr(e, source)))
            .unwrap_or(Stmt::Empty),
        "statement_block" => Stmt::Block(statements(node, source)),
        "function_declaration" | "generator_function_declaration" => Stmt::Function {
            name: field_text(node, "name", source),
            body: body_statements(node, source),
        },
        "class_declaration" | "abstract_class_declaration" => {
            Stmt::Block(class_members(node, source))
        }
        "if_statement" => Stmt::If {
            test: *field_expr(node, "condition", source),
            then: Box::new(field_stmt(node, "consequence", source)),
            otherwise: node
                .child_by_field_name("alternative")
                .map(|alt| Box::new(else_branch(alt, source))),
        },
        "for_statement" | "for_in_statement" | "while_statement" | "do_statement" => {
            lower_loop(node, source)
        }
        "try_statement" => Stmt::Try {
            block: body_statements(node, source),
            handler: node
                .child_by_field_name("handler")
                .map(|h| body_statements(h, source)),
            finalizer: node
                .child_by_field_name("finalizer")
                .map(|f| body_statements(f, source)),
        },
        "return_statement" => Stmt::Return(first_named(node).map(|e| lower_expr(e, source))),
        "throw_statement" => Stmt::Throw(
            first_named(node)
                .map(|e| lower_expr(e, source))
                .unwrap_or(Expr::Null),
        ),
        "labeled_statement" => field_stmt(node, "body", source),
        "switch_statement" => lower_switch(node, source),
        _ => Stmt::Expr(lower_expr(node, source)),
    }
}

fn field_stmt(node: Node, name: &str, source: &str) -> Stmt {
    node.child_by_field_name(name)
        .map(|child| lower_stmt(child, source))
        .unwrap_or(Stmt::Empty)
}

fn body_statements(node: Node, source: &str) -> Vec<Stmt> {
    node.child_by_field_name("body")
        .map(|body| statements(body, source))
        .unwrap_or_default()
}

fn else_branch(node: Node, source: &str) -> Stmt {
    if node.kind() == "else_clause" {
        return first_named(node)
            .map(|stmt| lower_stmt(stmt, source))
            .unwrap_or(Stmt::Empty);
    }
    lower_stmt(node, source)
}

/// Every loop form: the header is whatever sits outside the body.
fn lower_loop(node: Node, source: &str) -> Stmt {
    let body = node.child_by_field_name("body");
    let header = named_children(node)
        .into_iter()
        .filter(|child| Some(child.id()) != body.map(|b| b.id()))
        .flat_map(|child| header_exprs(child, source))
        .collect();
    Stmt::Loop {
        header,
        body: Box::new(body.map(|b| lower_stmt(b, source)).unwrap_or(Stmt::Empty)),
    }
}

fn header_exprs(node: Node, source: &str) -> Vec<Expr> {
    match node.kind() {
        "lexical_declaration" | "variable_declaration" => named_children(node)
            .into_iter()
            .filter_map(|declarator| declarator.child_by_field_name("value"))
            .map(|value| lower_expr(value, source))
            .collect(),
        "expression_statement" => first_named(node)
            .map(|e| lower_expr(e, source))
            .into_iter()
            .collect(),
        "empty_statement" => Vec::new(),
        _ => vec![lower_expr(node, source)],
    }
}

fn lower_switch(node: Node, source: &str) -> Stmt {
    let mut out = Vec::new();
    if let Some(value) = node.child_by_field_name("value") {
        out.push(Stmt::Expr(lower_expr(value, source)));
    }
    let cases = node
        .child_by_field_name("body")
        .map(named_children)
        .unwrap_or_default();
    for case in cases {
        let value = case.child_by_field_name("value");
        if let Some(value) = value {
            out.push(Stmt::Expr(lower_expr(value, source)));
        }
        for child in named_children(case) {
            if Some(child.id()) != value.map(|v| v.id()) {
                lower_stmt_into(child, source, &mut out);
            }
        }
    }
    Stmt::Block(out)
}

/// Methods become functions; field initializers and static blocks are kept
/// for the calls they make.
fn class_members(node: Node, source: &str) -> Vec<Stmt> {
    let members = node
        .child_by_field_name("body")
        .map(named_children)
        .unwrap_or_default();
    members
        .into_iter()
        .filter_map(|member| match member.kind() {
            "method_definition" => Some(Stmt::Function {
                name: field_text(member, "name", source),
                body: body_statements(member, source),
            }),
            "public_field_definition" | "field_definition" => member
                .child_by_field_name("value")
                .map(|value| Stmt::Expr(lower_expr(value, source))),
            "class_static_block" => Some(Stmt::Block(body_statements(member, source))),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Expressions
// ============================================================================

fn lower_expr(node: Node, source: &str) -> Expr {
    match node.kind() {
        "identifier"
        | "property_identifier"
        | "shorthand_property_identifier"
        | "private_property_identifier"
        | "this"
        | "super"
        | "undefined" => Expr::Ident(text(node, source).to_string()),
        "string" => Expr::Str(string_value(text(node, source))),
        "template_string" => Expr::Template(template_body(text(node, source)).to_string()),
        "number" => Expr::Num(number_value(text(node, source))),
        "true" => Expr::Bool(true),
        "false" => Expr::Bool(false),
        "null" => Expr::Null,
        "regex" => Expr::Regex {
            pattern: field_text(node, "pattern", source),
            flags: field_text(node, "flags", source),
        },
        "array" => Expr::Array(
            named_children(node)
                .into_iter()
                .map(|item| lower_expr(item, source))
                .collect(),
        ),
        "object" => Expr::Object(
            named_children(node)
                .into_iter()
                .filter_map(|prop| property(prop, source))
                .collect(),
        ),
        "member_expression" => Expr::Member {
            object: field_expr(node, "object", source),
            property: field_text(node, "property", source),
            optional: node.child_by_field_name("optional_chain").is_some(),
        },
        "subscript_expression" => Expr::Index {
            object: field_expr(node, "object", source),
            index: field_expr(node, "index", source),
        },
        "call_expression" => Expr::Call {
            callee: field_expr(node, "function", source),
            args: node
                .child_by_field_name("arguments")
                .map(|args| arguments(args, source))
                .unwrap_or_default(),
            span: span(node),
        },
        "new_expression" => Expr::New {
            callee: field_expr(node, "constructor", source),
            args: node
                .child_by_field_name("arguments")
                .map(|args| arguments(args, source))
                .unwrap_or_default(),
        },
        "await_expression" => Expr::Await {
            argument: Box::new(
                first_named(node)
                    .map(|e| lower_expr(e, source))
                    .unwrap_or(Expr::Null),
            ),
            span: span(node),
        },
        "arrow_function" => Expr::Function {
            params: node
                .child_by_field_name("parameters")
                .or_else(|| node.child_by_field_name("parameter"))
                .map(|p| text(p, source).to_string())
                .unwrap_or_default(),
            body: arrow_body(node, source),
            is_async: is_async(node),
        },
        "function_expression" | "function" | "generator_function" => Expr::Function {
            params: field_text(node, "parameters", source),
            body: ArrowBody::Block(body_statements(node, source)),
            is_async: is_async(node),
        },
        "unary_expression" => Expr::Unary {
            op: field_text(node, "operator", source),
            argument: field_expr(node, "argument", source),
        },
        "update_expression" => Expr::Update {
            op: field_text(node, "operator", source),
            argument: field_expr(node, "argument", source),
        },
        "binary_expression" => Expr::Binary {
            op: field_text(node, "operator", source),
            left: field_expr(node, "left", source),
            right: field_expr(node, "right", source),
        },
        "ternary_expression" => Expr::Conditional {
            test: field_expr(node, "condition", source),
            consequent: field_expr(node, "consequence", source),
            alternate: field_expr(node, "alternative", source),
        },
        "assignment_expression" => Expr::Assign {
            op: "=".to_string(),
            target: field_expr(node, "left", source),
            value: field_expr(node, "right", source),
        },
        "augmented_assignment_expression" => Expr::Assign {
            op: field_text(node, "operator", source),
            target: field_expr(node, "left", source),
            value: field_expr(node, "right", source),
        },
        "spread_element" => Expr::Spread(Box::new(
            first_named(node)
                .map(|e| lower_expr(e, source))
                .unwrap_or(Expr::Null),
        )),
        // Type-only wrappers around a value
        "parenthesized_expression"
        | "as_expression"
        | "satisfies_expression"
        | "non_null_expression" => first_named(node)
            .map(|e| lower_expr(e, source))
            .unwrap_or(Expr::Null),
        "type_assertion" => named_children(node)
            .pop()
            .map(|e| lower_expr(e, source))
            .unwrap_or(Expr::Null),
        _ => {
            let children = named_children(node);
            if children.is_empty() {
                Expr::Null
            } else {
                Expr::Sequence(children.into_iter().map(|c| lower_expr(c, source)).collect())
            }
        }
    }
}

fn arguments(node: Node, source: &str) -> Vec<Expr> {
    if node.kind() != "arguments" {
        // Tagged template
        return vec![lower_expr(node, source)];
    }
    named_children(node)
        .into_iter()
        .map(|arg| lower_expr(arg, source))
        .collect()
}

fn arrow_body(node: Node, source: &str) -> ArrowBody {
    match node.child_by_field_name("body") {
        Some(body) if body.kind() == "statement_block" => {
            ArrowBody::Block(statements(body, source))
        }
        Some(body) => ArrowBody::Expr(Box::new(lower_expr(body, source))),
        None => ArrowBody::Block(Vec::new()),
    }
}

fn property(node: Node, source: &str) -> Option<Property> {
    match node.kind() {
        "pair" => Some(Property::KeyValue {
            key: property_key(node.child_by_field_name("key")?, source),
            value: *field_expr(node, "value", source),
        }),
        "shorthand_property_identifier" => {
            Some(Property::Shorthand(text(node, source).to_string()))
        }
        "spread_element" => Some(Property::Spread(lower_expr(first_named(node)?, source))),
        "method_definition" => Some(Property::KeyValue {
            key: property_key(node.child_by_field_name("name")?, source),
            value: Expr::Function {
                params: field_text(node, "parameters", source),
                body: ArrowBody::Block(body_statements(node, source)),
                is_async: is_async(node),
            },
        }),
        _ => None,
    }
}

fn property_key(node: Node, source: &str) -> PropKey {
    match node.kind() {
        "string" => PropKey::Named(string_value(text(node, source))),
        "computed_property_name" => PropKey::Computed(Box::new(
            first_named(node)
                .map(|e| lower_expr(e, source))
                .unwrap_or(Expr::Null),
        )),
        _ => PropKey::Named(text(node, source).to_string()),
    }
}

// ============================================================================
// Literals
// ============================================================================

/// Value of a quoted string literal with escapes resolved.
fn string_value(raw: &str) -> String {
    let inner = raw.get(1..raw.len().saturating_sub(1)).unwrap_or_default();
    unescape(inner)
}

/// Raw text between the backticks; substitutions are kept verbatim.
fn template_body(raw: &str) -> &str {
    raw.strip_prefix('`')
        .and_then(|s| s.strip_suffix('`'))
        .unwrap_or(raw)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                push_code_point(&mut out, &hex);
            }
            Some('u') => {
                let hex: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    chars.by_ref().take_while(|&c| c != '}').collect()
                } else {
                    chars.by_ref().take(4).collect()
                };
                push_code_point(&mut out, &hex);
            }
            // Line continuation
            Some('\r') => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            Some('\n') | Some('\u{2028}') | Some('\u{2029}') => {}
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn push_code_point(out: &mut String, hex: &str) {
    if let Some(ch) = u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
        out.push(ch);
    }
}

fn number_value(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|&c| c != '_').collect();
    let lower = cleaned.trim_end_matches('n').to_ascii_lowercase();
    let radix = |digits: &str, radix: u32| {
        i64::from_str_radix(digits, radix)
            .map(|n| n as f64)
            .unwrap_or(f64::NAN)
    };
    if let Some(digits) = lower.strip_prefix("0x") {
        radix(digits, 16)
    } else if let Some(digits) = lower.strip_prefix("0o") {
        radix(digits, 8)
    } else if let Some(digits) = lower.strip_prefix("0b") {
        radix(digits, 2)
    } else {
        lower.parse().unwrap_or(f64::NAN)
    }
}

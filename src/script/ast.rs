// ============================================================================
// Tagged-variant syntax tree for recorded scripts
// ============================================================================

/// Byte span into the original source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `import ...` / `export ...` header line, kept as raw text
    Module(String),
    Declare {
        name: String,
        init: Option<Expr>,
    },
    Function {
        name: String,
        body: Vec<Stmt>,
    },
    Expr(Expr),
    Block(Vec<Stmt>),
    If {
        test: Expr,
        then: Box<Stmt>,
        otherwise: Option<Box<Stmt>>,
    },
    /// `for`/`while` loops; the header is kept as expressions when parseable
    Loop {
        header: Vec<Expr>,
        body: Box<Stmt>,
    },
    Try {
        block: Vec<Stmt>,
        handler: Option<Vec<Stmt>>,
        finalizer: Option<Vec<Stmt>>,
    },
    Return(Option<Expr>),
    Throw(Expr),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropKey {
    Named(String),
    Computed(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    KeyValue { key: PropKey, value: Expr },
    Shorthand(String),
    Spread(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    Block(Vec<Stmt>),
    Expr(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    Str(String),
    Template(String),
    Num(f64),
    Bool(bool),
    Null,
    Regex {
        pattern: String,
        flags: String,
    },
    Array(Vec<Expr>),
    Object(Vec<Property>),
    Member {
        object: Box<Expr>,
        property: String,
        optional: bool,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        span: Span,
    },
    New {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Await {
        argument: Box<Expr>,
        span: Span,
    },
    Function {
        params: String,
        body: ArrowBody,
        is_async: bool,
    },
    Unary {
        op: String,
        argument: Box<Expr>,
    },
    Update {
        op: String,
        argument: Box<Expr>,
    },
    Binary {
        op: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    Assign {
        op: String,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Spread(Box<Expr>),
    Sequence(Vec<Expr>),
}

impl Expr {
    /// Name of the property or identifier being invoked by a call.
    pub fn callee_name(&self) -> Option<&str> {
        match self {
            Expr::Ident(name) => Some(name),
            Expr::Member { property, .. } => Some(property),
            _ => None,
        }
    }
}

// ============================================================================
// Scoped pre-order visitor
// ============================================================================

/// Callbacks for [`walk_program`]. Expressions arrive parents first, in
/// source order. Every function body and block opens a scope; a declaration
/// is reported after its initializer has been walked.
pub trait Visitor<'a> {
    fn expr(&mut self, _expr: &'a Expr) {}
    fn declare(&mut self, _name: &'a str, _init: &'a Expr) {}
    fn enter_scope(&mut self) {}
    fn exit_scope(&mut self) {}
}

pub fn walk_program<'a, V: Visitor<'a>>(program: &'a Program, visitor: &mut V) {
    walk_block(&program.body, visitor);
}

fn walk_block<'a, V: Visitor<'a>>(body: &'a [Stmt], visitor: &mut V) {
    visitor.enter_scope();
    body.iter().for_each(|s| walk_stmt(s, visitor));
    visitor.exit_scope();
}

fn walk_stmt<'a, V: Visitor<'a>>(stmt: &'a Stmt, visitor: &mut V) {
    match stmt {
        Stmt::Module(_) | Stmt::Empty => {}
        Stmt::Declare { name, init } => {
            if let Some(init) = init {
                walk_expr(init, visitor);
                visitor.declare(name, init);
            }
        }
        Stmt::Function { body, .. } | Stmt::Block(body) => walk_block(body, visitor),
        Stmt::Expr(expr) | Stmt::Throw(expr) => walk_expr(expr, visitor),
        Stmt::Return(expr) => {
            if let Some(expr) = expr {
                walk_expr(expr, visitor);
            }
        }
        Stmt::If {
            test,
            then,
            otherwise,
        } => {
            walk_expr(test, visitor);
            walk_stmt(then, visitor);
            if let Some(otherwise) = otherwise {
                walk_stmt(otherwise, visitor);
            }
        }
        Stmt::Loop { header, body } => {
            header.iter().for_each(|e| walk_expr(e, visitor));
            walk_stmt(body, visitor);
        }
        Stmt::Try {
            block,
            handler,
            finalizer,
        } => {
            walk_block(block, visitor);
            for part in [handler, finalizer].into_iter().flatten() {
                walk_block(part, visitor);
            }
        }
    }
}

fn walk_expr<'a, V: Visitor<'a>>(expr: &'a Expr, visitor: &mut V) {
    visitor.expr(expr);
    match expr {
        Expr::Ident(_)
        | Expr::Str(_)
        | Expr::Template(_)
        | Expr::Num(_)
        | Expr::Bool(_)
        | Expr::Null
        | Expr::Regex { .. } => {}
        Expr::Array(items) | Expr::Sequence(items) => {
            items.iter().for_each(|e| walk_expr(e, visitor));
        }
        Expr::Object(props) => {
            for prop in props {
                match prop {
                    Property::KeyValue { key, value } => {
                        if let PropKey::Computed(key) = key {
                            walk_expr(key, visitor);
                        }
                        walk_expr(value, visitor);
                    }
                    Property::Spread(value) => walk_expr(value, visitor),
                    Property::Shorthand(_) => {}
                }
            }
        }
        Expr::Member { object, .. } => walk_expr(object, visitor),
        Expr::Index { object, index } => {
            walk_expr(object, visitor);
            walk_expr(index, visitor);
        }
        Expr::Call { callee, args, .. } | Expr::New { callee, args } => {
            walk_expr(callee, visitor);
            args.iter().for_each(|e| walk_expr(e, visitor));
        }
        Expr::Await { argument, .. }
        | Expr::Unary { argument, .. }
        | Expr::Update { argument, .. }
        | Expr::Spread(argument) => walk_expr(argument, visitor),
        Expr::Function { body, .. } => match body {
            ArrowBody::Block(stmts) => walk_block(stmts, visitor),
            ArrowBody::Expr(e) => walk_expr(e, visitor),
        },
        Expr::Binary { left, right, .. } => {
            walk_expr(left, visitor);
            walk_expr(right, visitor);
        }
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => {
            walk_expr(test, visitor);
            walk_expr(consequent, visitor);
            walk_expr(alternate, visitor);
        }
        Expr::Assign { target, value, .. } => {
            walk_expr(target, visitor);
            walk_expr(value, visitor);
        }
    }
}

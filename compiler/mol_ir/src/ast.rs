//! Syntax tree for MOL programs.
//!
//! A plain owned tree: every node owns its children and carries the span it
//! was parsed from. Function bodies and listener bodies sit behind `Rc` so the
//! evaluator can keep them alive inside closures without copying the tree.

use std::fmt;
use std::rc::Rc;

use crate::{Name, Span};

/// A parsed program: the top-level statement list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// A sequence of statements executed in its own scope.
pub type Block = Vec<Stmt>;

#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    /// `show expr`
    Show(Expr),
    /// `let name (: Type)? be value`
    Let {
        name: Name,
        ty: Option<TypeAnnotation>,
        value: Expr,
    },
    /// `let [a, b, ...rest] be value`
    LetList {
        names: Vec<Name>,
        rest: Option<Name>,
        value: Expr,
    },
    /// `let {x, y} be value`
    LetMap { keys: Vec<Name>, value: Expr },
    /// `set name to value`
    Set { name: Name, value: Expr },
    /// `set target.field to value`
    SetField {
        target: Expr,
        field: Name,
        value: Expr,
    },
    /// `set target[index] to value`
    SetIndex {
        target: Expr,
        index: Expr,
        value: Expr,
    },
    /// `if c then .. elif c then .. else .. end`; `branches[0]` is the `if`.
    If {
        branches: Vec<(Expr, Block)>,
        else_body: Option<Block>,
    },
    While {
        condition: Expr,
        body: Block,
    },
    For {
        var: Name,
        iterable: Expr,
        body: Block,
    },
    /// `define` and `pipeline` declarations.
    Function(Rc<FunctionDecl>),
    Return(Option<Expr>),
    Guard {
        condition: Expr,
        message: Option<String>,
    },
    Try {
        body: Block,
        rescue: Option<RescueClause>,
        ensure: Option<Block>,
    },
    /// `begin .. end`
    Block(Block),

    // Domain statements
    Trigger(Expr),
    Listen {
        event: Expr,
        body: Rc<[Stmt]>,
    },
    Link {
        source: Expr,
        target: Expr,
    },
    Process {
        target: Expr,
        with: Option<Expr>,
    },
    Access(Expr),
    Sync(Expr),
    Evolve(Expr),
    Emit(Expr),

    Expr(Expr),
}

/// `rescue name? body`
#[derive(Clone, Debug, PartialEq)]
pub struct RescueClause {
    pub name: Option<Name>,
    pub body: Block,
}

/// A declared type name in `let x : Number be ..` or a parameter list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TypeAnnotation {
    pub name: Name,
    pub span: Span,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FunctionKind {
    /// `define f(..) .. end`
    Function,
    /// `pipeline p(..) .. end`; differs from `Function` in name only.
    Pipeline,
    /// `fn(..) -> expr`
    Lambda,
}

impl FunctionKind {
    pub fn keyword(self) -> &'static str {
        match self {
            FunctionKind::Function => "define",
            FunctionKind::Pipeline => "pipeline",
            FunctionKind::Lambda => "fn",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: Name,
    pub ty: Option<TypeAnnotation>,
    pub default: Option<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FunctionBody {
    Block(Block),
    Expr(Expr),
}

/// A function, pipeline or lambda declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDecl {
    /// `Name::EMPTY` for lambdas.
    pub name: Name,
    pub kind: FunctionKind,
    pub params: Vec<Param>,
    pub body: FunctionBody,
    pub span: Span,
}

impl FunctionDecl {
    /// Number of parameters without a default value.
    pub fn required_params(&self) -> usize {
        self.params.iter().filter(|p| p.default.is_none()).count()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Number(f64),
    Text(String),
    Bool(bool),
    Null,
    FString(Vec<FStringPart>),
    List(Vec<Expr>),
    Map(Vec<(String, Expr)>),
    Var(Name),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// `callee(args)`
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `receiver.method(args)`
    MethodCall {
        receiver: Box<Expr>,
        method: Name,
        args: Vec<Expr>,
    },
    /// `receiver.field`
    Field {
        receiver: Box<Expr>,
        field: Name,
    },
    /// `receiver[index]`
    Index {
        receiver: Box<Expr>,
        index: Box<Expr>,
    },
    /// `seed |> stage_1 |> .. |> stage_n`, flattened left to right.
    Pipe {
        seed: Box<Expr>,
        stages: Vec<Expr>,
    },
    Lambda(Rc<FunctionDecl>),
    Match {
        subject: Box<Expr>,
        arms: Vec<MatchArm>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum FStringPart {
    Literal(String),
    Expr(Expr),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    /// `??`
    Coalesce,
}

impl BinaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Coalesce => "??",
        }
    }

    /// Operators whose right operand is only evaluated on demand.
    pub fn is_short_circuit(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or | BinaryOp::Coalesce)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "not",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchArm {
    pub pattern: Pattern,
    pub guard: Option<Expr>,
    /// The arm's value is the value of its last expression statement.
    pub body: Block,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PatternKind {
    /// `_`
    Wildcard,
    Number(f64),
    Text(String),
    Bool(bool),
    Null,
    Binding(Name),
    /// `[p, q]` or `[p, ...rest]`
    List {
        items: Vec<Pattern>,
        rest: Option<Name>,
    },
}

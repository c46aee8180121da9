use crate::lexer::Pos;

/// One node of the literal-expression tree. Immutable after parsing; the
/// position points at the first token of the production for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub pos: Pos,
}

impl Expr {
    pub fn new(kind: ExprKind, pos: Pos) -> Self {
        Self { kind, pos }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    NoneLit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Unary minus; the parser only ever puts a numeric literal underneath.
    Neg(Box<Expr>),
    List(Vec<Expr>),
    Tuple(Vec<Expr>),
    Dict(Vec<(Expr, Expr)>),
    Call { name: String, args: Vec<Expr> },
    /// Bare identifier. Only `none`/`true`/`false` (any casing) survive
    /// evaluation; everything else is rejected there.
    Name(String),
}

//! Expression nodes.

use crate::arena::Handle;
use crate::decl::{BufferDecl, FunctionDecl, SamplerDecl, StructDecl, VarDecl};
use crate::denoter::TypeDenoter;
use crate::flags::AstFlags;
use crate::intrinsic::Intrinsic;
use crate::span::SourceArea;
use crate::types::{AssignOp, BinaryOp, DataType, UnaryOp};

/// An expression node: source area, analyzer flags, the lazily cached type
/// denoter, and the variant payload.
#[derive(Clone, Debug)]
pub struct Expr {
    pub area: SourceArea,
    pub flags: AstFlags,
    /// Lazily resolved type; see `Program::type_of`. Reset when a referenced
    /// declaration changes type.
    pub cached_ty: Option<TypeDenoter>,
    pub kind: ExprKind,
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self {
            area: SourceArea::IGNORE,
            flags: AstFlags::EMPTY,
            cached_ty: None,
            kind,
        }
    }

    pub fn with_area(kind: ExprKind, area: SourceArea) -> Self {
        Self {
            area,
            ..Self::new(kind)
        }
    }

    /// Clears the cached type denoter; it is re-resolved on next access.
    pub fn reset_type(&mut self) {
        self.cached_ty = None;
    }
}

/// The expression variants.
#[derive(Clone, Debug)]
pub enum ExprKind {
    /// A literal token, kept textual so suffix rewrites stay exact.
    Literal { value: String, data_type: DataType },
    Binary {
        op: BinaryOp,
        lhs: Handle<Expr>,
        rhs: Handle<Expr>,
    },
    Unary {
        op: UnaryOp,
        expr: Handle<Expr>,
    },
    /// Postfix `++`/`--`.
    PostUnary {
        op: UnaryOp,
        expr: Handle<Expr>,
    },
    Ternary {
        condition: Handle<Expr>,
        then_expr: Handle<Expr>,
        else_expr: Handle<Expr>,
    },
    Cast {
        target: TypeDenoter,
        expr: Handle<Expr>,
    },
    Call(CallExpr),
    Object(ObjectExpr),
    /// Subscript access with one handle per `[...]` index.
    Array {
        prefix: Handle<Expr>,
        indices: Vec<Handle<Expr>>,
    },
    Assign {
        lvalue: Handle<Expr>,
        op: AssignOp,
        value: Handle<Expr>,
    },
    /// `{ a, b, c }` initializer list.
    Initializer { exprs: Vec<Handle<Expr>> },
    /// Name/value field list of a pipeline-state block.
    StateInitializer { fields: Vec<StateValue> },
    Bracket { expr: Handle<Expr> },
}

/// A function, intrinsic, or type-constructor call.
#[derive(Clone, Debug, Default)]
pub struct CallExpr {
    /// Callee name for plain function calls.
    pub ident: Option<String>,
    /// Object prefix for method calls (`tex.Sample(...)`).
    pub prefix: Option<Handle<Expr>>,
    /// Set when the callee resolves to an intrinsic.
    pub intrinsic: Option<Intrinsic>,
    /// Back reference to the called function declaration.
    pub function: Option<Handle<FunctionDecl>>,
    /// Set for type-constructor calls such as `float4(...)`.
    pub type_ctor: Option<TypeDenoter>,
    pub arguments: Vec<Handle<Expr>>,
}

/// An identifier reference, optionally behind a prefix expression.
#[derive(Clone, Debug)]
pub struct ObjectExpr {
    pub prefix: Option<Handle<Expr>>,
    pub ident: String,
    /// Back reference to the declaration that introduced the identifier.
    pub symbol: Option<SymbolRef>,
}

/// Back reference from a use to its declaration. Never owning; the arenas
/// own declaration lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolRef {
    Var(Handle<VarDecl>),
    Buffer(Handle<BufferDecl>),
    Sampler(Handle<SamplerDecl>),
    Struct(Handle<StructDecl>),
    Function(Handle<FunctionDecl>),
}

/// A single `name = value` entry of a sampler or pipeline-state block.
#[derive(Clone, Debug)]
pub struct StateValue {
    pub name: String,
    pub value: Handle<Expr>,
    pub area: SourceArea,
}

impl StateValue {
    pub fn new(name: impl Into<String>, value: Handle<Expr>) -> Self {
        Self {
            name: name.into(),
            value,
            area: SourceArea::IGNORE,
        }
    }
}

impl ExprKind {
    /// Shorthand for a literal expression payload.
    pub fn literal(value: impl Into<String>, data_type: DataType) -> Self {
        Self::Literal {
            value: value.into(),
            data_type,
        }
    }

    /// Shorthand for an unprefixed identifier reference.
    pub fn object(ident: impl Into<String>, symbol: Option<SymbolRef>) -> Self {
        Self::Object(ObjectExpr {
            prefix: None,
            ident: ident.into(),
            symbol,
        })
    }
}

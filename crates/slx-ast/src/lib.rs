//! Typed AST for the SLX shader cross-compiler.
//!
//! An arena-based tree over the source shader: the upstream parser and
//! analyzer build and annotate it, the reflection analyzer reads it, and the
//! GLSL/VKSL lowering passes mutate it in place before emission. Nodes are
//! addressed by typed [`Handle`]s into arenas owned by [`Program`]; back
//! references from uses to declarations are handles and never own.

pub mod arena;
mod decl;
mod denoter;
pub mod error;
pub mod eval;
mod expr;
mod flags;
pub mod intrinsic;
mod program;
mod semantic;
mod span;
mod stmt;
pub mod types;

pub use arena::{Arena, Handle};
pub use decl::{
    AliasDecl, Attribute, BufferDecl, DefaultValue, ExtModifiers, FunctionDecl, Register,
    SamplerDecl, SemanticMap, StateDecl, StructDecl, TypeSpecifier, UniformBufferDecl, VarDecl,
};
pub use denoter::{
    AliasTypeDenoter, ArrayTypeDenoter, BufferTypeDenoter, SamplerTypeDenoter, StructTypeDenoter,
    TypeDenoter,
};
pub use error::{MapError, TypeError};
pub use eval::{Variant, evaluate_or_default};
pub use expr::{CallExpr, Expr, ExprKind, ObjectExpr, StateValue, SymbolRef};
pub use flags::AstFlags;
pub use intrinsic::Intrinsic;
pub use program::{Program, array_dim_sizes};
pub use semantic::{IndexedSemantic, Semantic, is_system_semantic, is_user_semantic};
pub use span::{SourceArea, SourcePosition};
pub use stmt::{Stmt, StmtKind, SwitchCase};
pub use types::{
    AssignOp, AttributeType, BinaryOp, BufferType, CtrlTransfer, DataType, InterpModifier,
    OutputVersion, RegisterType, SamplerType, ShaderTarget, StateType, StorageClass, TypeModifier,
    UnaryOp, UniformBufferType,
};

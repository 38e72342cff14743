//! Statement nodes.

use crate::arena::Handle;
use crate::decl::{
    AliasDecl, BufferDecl, FunctionDecl, SamplerDecl, StateDecl, StructDecl, TypeSpecifier,
    UniformBufferDecl, VarDecl,
};
use crate::expr::Expr;
use crate::flags::AstFlags;
use crate::span::SourceArea;
use crate::types::CtrlTransfer;

/// A statement node: source area, analyzer flags, and the variant payload.
#[derive(Clone, Debug)]
pub struct Stmt {
    pub area: SourceArea,
    pub flags: AstFlags,
    pub kind: StmtKind,
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Self {
            area: SourceArea::IGNORE,
            flags: AstFlags::EMPTY,
            kind,
        }
    }

    pub fn with_area(kind: StmtKind, area: SourceArea) -> Self {
        Self {
            area,
            ..Self::new(kind)
        }
    }
}

/// The statement variants. Declaration statements link into the declaration
/// arenas; control-flow bodies are statement handles so conversion can
/// replace a bare statement with a code block in place.
#[derive(Clone, Debug)]
pub enum StmtKind {
    Null,
    CodeBlock {
        stmts: Vec<Handle<Stmt>>,
    },
    VarDeclStmt {
        type_spec: TypeSpecifier,
        decls: Vec<Handle<VarDecl>>,
    },
    BufferDeclStmt {
        decls: Vec<Handle<BufferDecl>>,
    },
    SamplerDeclStmt {
        decls: Vec<Handle<SamplerDecl>>,
    },
    StructDeclStmt {
        decl: Handle<StructDecl>,
    },
    FunctionDeclStmt {
        decl: Handle<FunctionDecl>,
    },
    UniformBufferDeclStmt {
        decl: Handle<UniformBufferDecl>,
    },
    StateDeclStmt {
        decl: Handle<StateDecl>,
    },
    AliasDeclStmt {
        /// Present when the alias wraps an inline (possibly anonymous)
        /// struct declaration.
        struct_decl: Option<Handle<StructDecl>>,
        aliases: Vec<Handle<AliasDecl>>,
    },
    For {
        init: Option<Handle<Stmt>>,
        condition: Option<Handle<Expr>>,
        iteration: Option<Handle<Expr>>,
        body: Handle<Stmt>,
    },
    While {
        condition: Handle<Expr>,
        body: Handle<Stmt>,
    },
    DoWhile {
        body: Handle<Stmt>,
        condition: Handle<Expr>,
    },
    If {
        condition: Handle<Expr>,
        body: Handle<Stmt>,
        else_body: Option<Handle<Stmt>>,
    },
    Switch {
        selector: Handle<Expr>,
        cases: Vec<SwitchCase>,
    },
    Expr {
        expr: Handle<Expr>,
    },
    Return {
        expr: Option<Handle<Expr>>,
    },
    CtrlTransfer {
        transfer: CtrlTransfer,
    },
}

/// One `case`/`default` arm of a switch statement.
#[derive(Clone, Debug)]
pub struct SwitchCase {
    /// `None` for the `default` arm.
    pub expr: Option<Handle<Expr>>,
    pub stmts: Vec<Handle<Stmt>>,
}

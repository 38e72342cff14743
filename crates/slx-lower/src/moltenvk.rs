//! MoltenVK compatibility pass.
//!
//! MoltenVK cannot express `imageBuffer`, which `RWBuffer` would lower to;
//! the pass retypes every `RWBuffer` declaration to `RWStructuredBuffer`
//! (preserving the generic payload and size) and invalidates the cached
//! type denoter of every expression that depends on a retyped symbol.

use std::collections::HashSet;

use slx_ast::{
    BufferDecl, BufferType, Expr, ExprKind, Handle, Program, Stmt, StmtKind, SymbolRef,
};

/// Rewrites `RWBuffer` declarations for MoltenVK output.
#[derive(Debug, Default)]
pub struct MoltenVkConverter {
    converted: HashSet<Handle<BufferDecl>>,
}

impl MoltenVkConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn convert(&mut self, program: &mut Program) {
        for (handle, decl) in program.buffer_decls.iter_mut() {
            if decl.ty.buffer_type == BufferType::RWBuffer {
                decl.ty.buffer_type = BufferType::RWStructuredBuffer;
                self.converted.insert(handle);
            }
        }

        if self.converted.is_empty() {
            return;
        }
        log::debug!("retyped {} RWBuffer declaration(s)", self.converted.len());

        let stmts = program.global_stmts.clone();
        for stmt in stmts {
            self.visit_stmt(program, stmt);
        }
    }

    fn visit_stmt(&mut self, program: &mut Program, stmt: Handle<Stmt>) {
        let kind = program.stmts[stmt].kind.clone();
        match kind {
            StmtKind::CodeBlock { stmts } => {
                for child in stmts {
                    self.visit_stmt(program, child);
                }
            }
            StmtKind::VarDeclStmt { decls, .. } => {
                for decl in decls {
                    if let Some(init) = program.var_decls[decl].initializer {
                        self.visit_expr(program, init);
                    }
                }
            }
            StmtKind::StructDeclStmt { decl } => {
                let functions = program.struct_decls[decl].functions.clone();
                for function in functions {
                    self.visit_function(program, function);
                }
            }
            StmtKind::FunctionDeclStmt { decl } => self.visit_function(program, decl),
            StmtKind::For {
                init,
                condition,
                iteration,
                body,
            } => {
                if let Some(init) = init {
                    self.visit_stmt(program, init);
                }
                if let Some(condition) = condition {
                    self.visit_expr(program, condition);
                }
                if let Some(iteration) = iteration {
                    self.visit_expr(program, iteration);
                }
                self.visit_stmt(program, body);
            }
            StmtKind::While { condition, body } | StmtKind::DoWhile { body, condition } => {
                self.visit_expr(program, condition);
                self.visit_stmt(program, body);
            }
            StmtKind::If {
                condition,
                body,
                else_body,
            } => {
                self.visit_expr(program, condition);
                self.visit_stmt(program, body);
                if let Some(else_body) = else_body {
                    self.visit_stmt(program, else_body);
                }
            }
            StmtKind::Switch { selector, cases } => {
                self.visit_expr(program, selector);
                for case in cases {
                    if let Some(expr) = case.expr {
                        self.visit_expr(program, expr);
                    }
                    for child in case.stmts {
                        self.visit_stmt(program, child);
                    }
                }
            }
            StmtKind::Expr { expr } => {
                // Expression-statement roots always re-resolve when a
                // dependent symbol was retyped.
                if self.visit_expr(program, expr) {
                    program.reset_expr_type(expr);
                }
            }
            StmtKind::Return { expr: Some(expr) } => {
                self.visit_expr(program, expr);
            }
            _ => {}
        }
    }

    fn visit_function(&mut self, program: &mut Program, decl: Handle<slx_ast::FunctionDecl>) {
        let body = program.function_decls[decl].body.clone();
        for stmt in body {
            self.visit_stmt(program, stmt);
        }
    }

    /// Returns `true` if the expression (or a sub-expression) references a
    /// retyped symbol; dependent arms reset their cached type on the way up.
    fn visit_expr(&mut self, program: &mut Program, expr: Handle<Expr>) -> bool {
        let kind = program.exprs[expr].kind.clone();
        let dirty = match kind {
            ExprKind::Object(object) => {
                let mut dirty = object
                    .prefix
                    .map(|p| self.visit_expr(program, p))
                    .unwrap_or(false);
                if let Some(SymbolRef::Buffer(buffer)) = object.symbol {
                    dirty |= self.converted.contains(&buffer);
                }
                dirty
            }
            ExprKind::Array { prefix, indices } => {
                let mut dirty = self.visit_expr(program, prefix);
                for index in indices {
                    dirty |= self.visit_expr(program, index);
                }
                dirty
            }
            ExprKind::Call(call) => {
                let mut dirty = call
                    .prefix
                    .map(|p| self.visit_expr(program, p))
                    .unwrap_or(false);
                for arg in call.arguments {
                    dirty |= self.visit_expr(program, arg);
                }
                dirty
            }
            ExprKind::Binary { lhs, rhs, .. } => {
                self.visit_expr(program, lhs) | self.visit_expr(program, rhs)
            }
            ExprKind::Unary { expr: sub, .. }
            | ExprKind::PostUnary { expr: sub, .. }
            | ExprKind::Cast { expr: sub, .. }
            | ExprKind::Bracket { expr: sub } => self.visit_expr(program, sub),
            ExprKind::Ternary {
                condition,
                then_expr,
                else_expr,
            } => {
                self.visit_expr(program, condition)
                    | self.visit_expr(program, then_expr)
                    | self.visit_expr(program, else_expr)
            }
            ExprKind::Assign { lvalue, value, .. } => {
                self.visit_expr(program, lvalue) | self.visit_expr(program, value)
            }
            ExprKind::Initializer { exprs } => {
                let mut dirty = false;
                for sub in exprs {
                    dirty |= self.visit_expr(program, sub);
                }
                dirty
            }
            ExprKind::Literal { .. } | ExprKind::StateInitializer { .. } => false,
        };

        if dirty {
            // Only the known-dependent arms carry a stale cached type.
            if matches!(
                program.exprs[expr].kind,
                ExprKind::Object(_) | ExprKind::Array { .. } | ExprKind::Call(_)
            ) {
                program.reset_expr_type(expr);
            }
        }
        dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slx_ast::{BufferTypeDenoter, DataType, TypeDenoter};

    #[test]
    fn retypes_rw_buffer_and_preserves_generic() {
        let mut program = Program::new();
        let buffer = program.buffer_decls.append(BufferDecl::new(
            "data",
            BufferTypeDenoter::with_generic(
                BufferType::RWBuffer,
                TypeDenoter::Base(DataType::Float4),
            ),
        ));

        MoltenVkConverter::new().convert(&mut program);

        let ty = &program.buffer_decls[buffer].ty;
        assert_eq!(ty.buffer_type, BufferType::RWStructuredBuffer);
        assert_eq!(
            ty.generic.as_deref(),
            Some(&TypeDenoter::Base(DataType::Float4))
        );
    }

    #[test]
    fn leaves_other_buffers_alone() {
        let mut program = Program::new();
        let buffer = program.buffer_decls.append(BufferDecl::new(
            "tex",
            BufferTypeDenoter::new(BufferType::Texture2D),
        ));

        MoltenVkConverter::new().convert(&mut program);
        assert_eq!(program.buffer_decls[buffer].ty.buffer_type, BufferType::Texture2D);
    }

    #[test]
    fn invalidates_dependent_expression_types() {
        let mut program = Program::new();
        let buffer = program.buffer_decls.append(BufferDecl::new(
            "data",
            BufferTypeDenoter::with_generic(
                BufferType::RWBuffer,
                TypeDenoter::Base(DataType::Float),
            ),
        ));

        let object = program.add_expr(ExprKind::object("data", Some(SymbolRef::Buffer(buffer))));
        let index = program.add_expr(ExprKind::literal("0", DataType::Int));
        let access = program.add_expr(ExprKind::Array {
            prefix: object,
            indices: vec![index],
        });
        let stmt = program.add_stmt(StmtKind::Expr { expr: access });
        program.global_stmts.push(stmt);

        // Prime the caches with the pre-conversion types.
        let before = program.type_of(object);
        assert!(matches!(before, TypeDenoter::Buffer(ref b) if b.buffer_type == BufferType::RWBuffer));
        let _ = program.type_of(access);
        let _ = program.type_of(index);

        MoltenVkConverter::new().convert(&mut program);

        // The caches were reset; re-resolution sees the new buffer type.
        assert!(program.exprs[object].cached_ty.is_none());
        assert!(program.exprs[access].cached_ty.is_none());
        let after = program.type_of(object);
        assert!(
            matches!(after, TypeDenoter::Buffer(ref b) if b.buffer_type == BufferType::RWStructuredBuffer)
        );
        // The literal index never depended on the symbol.
        assert!(program.exprs[index].cached_ty.is_some());
    }
}

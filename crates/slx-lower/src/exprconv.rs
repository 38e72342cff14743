//! Expression pre-conversion.
//!
//! Rewrites expression forms that plain GLSL cannot express before the main
//! conversion runs: vector comparisons become compare intrinsics, scalar
//! swizzles become constructor calls, initializer lists become type
//! constructors, and read/write texture accesses become image load/store
//! calls. Targets with the 420pack extension keep vector subscripts and
//! initializer lists as-is.

use slx_ast::intrinsic::{compare_op_to_intrinsic, is_interlocked_intrinsic};
use slx_ast::types::{
    base_data_type, is_rw_texture_buffer_type, is_scalar_type, subscript_data_type,
};
use slx_ast::{
    CallExpr, DataType, Expr, ExprKind, Handle, Intrinsic, Program, Stmt, StmtKind, TypeDenoter,
};

/// Flag set selecting the individual conversions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExprConvertFlags(u32);

impl ExprConvertFlags {
    pub const EMPTY: Self = Self(0);
    /// Compare operators on vector operands become compare intrinsics.
    pub const VECTOR_COMPARE: Self = Self(1);
    /// Swizzles over scalar prefixes become vector constructors.
    pub const VECTOR_SUBSCRIPTS: Self = Self(1 << 1);
    /// Initializer lists over base types become type constructors.
    pub const INITIALIZER: Self = Self(1 << 2);
    /// RW-texture subscripts become image load/store calls.
    pub const IMAGE_ACCESS: Self = Self(1 << 3);
    /// All conversions.
    pub const ALL: Self = Self(0b1111);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl std::ops::BitOr for ExprConvertFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Applies the selected expression conversions over a whole program.
#[derive(Debug)]
pub struct ExprConverter {
    flags: ExprConvertFlags,
}

impl ExprConverter {
    pub fn new(flags: ExprConvertFlags) -> Self {
        Self { flags }
    }

    pub fn convert(&mut self, program: &mut Program) {
        let stmts = program.global_stmts.clone();
        for stmt in stmts {
            self.convert_stmt(program, stmt);
        }
    }

    fn convert_function(&mut self, program: &mut Program, decl: Handle<slx_ast::FunctionDecl>) {
        let body = program.function_decls[decl].body.clone();
        for stmt in body {
            self.convert_stmt(program, stmt);
        }
    }

    fn convert_stmt(&mut self, program: &mut Program, stmt: Handle<Stmt>) {
        let kind = program.stmts[stmt].kind.clone();
        match kind {
            StmtKind::CodeBlock { stmts } => {
                for child in stmts {
                    self.convert_stmt(program, child);
                }
            }
            StmtKind::VarDeclStmt { decls, .. } => {
                for decl in decls {
                    self.convert_var_decl(program, decl);
                }
            }
            StmtKind::StructDeclStmt { decl } => {
                let members = program.struct_decls[decl].members.clone();
                for member in members {
                    self.convert_stmt(program, member);
                }
                let functions = program.struct_decls[decl].functions.clone();
                for function in functions {
                    self.convert_function(program, function);
                }
            }
            StmtKind::FunctionDeclStmt { decl } => self.convert_function(program, decl),
            StmtKind::UniformBufferDeclStmt { decl } => {
                let members = program.uniform_buffer_decls[decl].members.clone();
                for member in members {
                    self.convert_stmt(program, member);
                }
            }
            StmtKind::For {
                init,
                condition,
                iteration,
                body,
            } => {
                if let Some(init) = init {
                    self.convert_stmt(program, init);
                }
                if let Some(condition) = condition {
                    self.convert_expr(program, condition, false);
                }
                if let Some(iteration) = iteration {
                    self.convert_expr(program, iteration, false);
                }
                self.convert_stmt(program, body);
            }
            StmtKind::While { condition, body } | StmtKind::DoWhile { body, condition } => {
                self.convert_expr(program, condition, false);
                self.convert_stmt(program, body);
            }
            StmtKind::If {
                condition,
                body,
                else_body,
            } => {
                self.convert_expr(program, condition, false);
                self.convert_stmt(program, body);
                if let Some(else_body) = else_body {
                    self.convert_stmt(program, else_body);
                }
            }
            StmtKind::Switch { selector, cases } => {
                self.convert_expr(program, selector, false);
                for case in cases {
                    if let Some(expr) = case.expr {
                        self.convert_expr(program, expr, false);
                    }
                    for child in case.stmts {
                        self.convert_stmt(program, child);
                    }
                }
            }
            StmtKind::Expr { expr } => self.convert_expr(program, expr, false),
            StmtKind::Return { expr: Some(expr) } => self.convert_expr(program, expr, false),
            _ => {}
        }
    }

    fn convert_var_decl(&mut self, program: &mut Program, decl: Handle<slx_ast::VarDecl>) {
        let Some(init) = program.var_decls[decl].initializer else {
            return;
        };
        self.convert_expr(program, init, false);

        if !self.flags.contains(ExprConvertFlags::INITIALIZER) {
            return;
        }

        // `{ ... }` over a vector/matrix local becomes a type constructor;
        // array initializers are left for the unrolling phase.
        let is_initializer = matches!(program.exprs[init].kind, ExprKind::Initializer { .. });
        let var_ty = program.var_decls[decl].ty.clone();
        if is_initializer && var_ty.is_base() && !var_ty.is_scalar() {
            let ExprKind::Initializer { exprs } = program.exprs[init].kind.clone() else {
                return;
            };
            program.exprs[init].kind = ExprKind::Call(CallExpr {
                type_ctor: Some(var_ty),
                arguments: exprs,
                ..CallExpr::default()
            });
            program.reset_expr_type(init);
        }
    }

    /// Converts one expression bottom-up. `skip_image_access` suppresses the
    /// image-load rewrite for subscripts that must survive as l-values
    /// (interlocked destinations).
    fn convert_expr(&mut self, program: &mut Program, expr: Handle<Expr>, skip_image_access: bool) {
        let kind = program.exprs[expr].kind.clone();
        match kind {
            ExprKind::Binary { op, lhs, rhs } => {
                self.convert_expr(program, lhs, false);
                self.convert_expr(program, rhs, false);

                if self.flags.contains(ExprConvertFlags::VECTOR_COMPARE)
                    && op.is_compare()
                    && program.type_of(lhs).is_vector()
                {
                    if let Some(intrinsic) = compare_op_to_intrinsic(op) {
                        program.exprs[expr].kind = ExprKind::Call(CallExpr {
                            intrinsic: Some(intrinsic),
                            arguments: vec![lhs, rhs],
                            ..CallExpr::default()
                        });
                        program.reset_expr_type(expr);
                    }
                }
            }

            ExprKind::Object(object) => {
                if let Some(prefix) = object.prefix {
                    self.convert_expr(program, prefix, false);

                    if self.flags.contains(ExprConvertFlags::VECTOR_SUBSCRIPTS)
                        && object.symbol.is_none()
                    {
                        self.convert_scalar_swizzle(program, expr, prefix, &object.ident);
                    }
                }
            }

            ExprKind::Array { prefix, indices } => {
                self.convert_expr(program, prefix, false);
                for &index in &indices {
                    self.convert_expr(program, index, false);
                }

                if self.flags.contains(ExprConvertFlags::IMAGE_ACCESS)
                    && !skip_image_access
                    && indices.len() == 1
                    && self.is_rw_image_access(program, prefix)
                {
                    program.exprs[expr].kind = ExprKind::Call(CallExpr {
                        intrinsic: Some(Intrinsic::ImageLoad),
                        arguments: vec![prefix, indices[0]],
                        ..CallExpr::default()
                    });
                    program.reset_expr_type(expr);
                }
            }

            ExprKind::Assign { lvalue, op, value } => {
                // A plain store into an RW texture becomes imageStore.
                let store_target = if self.flags.contains(ExprConvertFlags::IMAGE_ACCESS)
                    && op == slx_ast::AssignOp::Set
                {
                    self.image_store_target(program, lvalue)
                } else {
                    None
                };

                match store_target {
                    Some((image, coord)) => {
                        self.convert_expr(program, image, false);
                        self.convert_expr(program, coord, false);
                        self.convert_expr(program, value, false);
                        program.exprs[expr].kind = ExprKind::Call(CallExpr {
                            intrinsic: Some(Intrinsic::ImageStore),
                            arguments: vec![image, coord, value],
                            ..CallExpr::default()
                        });
                        program.reset_expr_type(expr);
                    }
                    None => {
                        self.convert_expr(program, lvalue, true);
                        self.convert_expr(program, value, false);
                    }
                }
            }

            ExprKind::Call(call) => {
                if let Some(prefix) = call.prefix {
                    self.convert_expr(program, prefix, false);
                }
                let interlocked = call.intrinsic.is_some_and(is_interlocked_intrinsic);
                for (i, &arg) in call.arguments.iter().enumerate() {
                    self.convert_expr(program, arg, interlocked && i == 0);
                }
            }

            ExprKind::Unary { expr: sub, .. }
            | ExprKind::PostUnary { expr: sub, .. }
            | ExprKind::Cast { expr: sub, .. }
            | ExprKind::Bracket { expr: sub } => {
                self.convert_expr(program, sub, skip_image_access);
            }

            ExprKind::Ternary {
                condition,
                then_expr,
                else_expr,
            } => {
                self.convert_expr(program, condition, false);
                self.convert_expr(program, then_expr, false);
                self.convert_expr(program, else_expr, false);
            }

            ExprKind::Initializer { exprs } => {
                for sub in exprs {
                    self.convert_expr(program, sub, false);
                }
            }

            ExprKind::Literal { .. } | ExprKind::StateInitializer { .. } => {}
        }
    }

    /// Rewrites `scalar.xxx` into `float3(scalar)` style constructors.
    fn convert_scalar_swizzle(
        &mut self,
        program: &mut Program,
        expr: Handle<Expr>,
        prefix: Handle<Expr>,
        subscript: &str,
    ) {
        let prefix_ty = program.type_of(prefix);
        let TypeDenoter::Base(base) = prefix_ty.aliased() else {
            return;
        };
        if !is_scalar_type(*base) {
            return;
        }
        let Ok((result, indices)) = subscript_data_type(*base, subscript) else {
            return;
        };
        if indices.len() < 2 {
            return;
        }

        program.exprs[expr].kind = ExprKind::Call(CallExpr {
            type_ctor: Some(TypeDenoter::Base(result)),
            arguments: vec![prefix],
            ..CallExpr::default()
        });
        program.reset_expr_type(expr);
    }

    fn is_rw_image_access(&self, program: &Program, prefix: Handle<Expr>) -> bool {
        program
            .fetch_buffer_decl(prefix)
            .is_some_and(|buffer| is_rw_texture_buffer_type(program.buffer_decls[buffer].ty.buffer_type))
    }

    /// Returns `(image, coordinate)` when the l-value is a one-dimensional
    /// subscript into an RW texture.
    fn image_store_target(
        &self,
        program: &Program,
        lvalue: Handle<Expr>,
    ) -> Option<(Handle<Expr>, Handle<Expr>)> {
        let lvalue = program.fetch_non_bracket(lvalue);
        let ExprKind::Array { prefix, indices } = &program.exprs[lvalue].kind else {
            return None;
        };
        if indices.len() != 1 || !self.is_rw_image_access(program, *prefix) {
            return None;
        }
        Some((*prefix, indices[0]))
    }
}

/// Wraps an expression node in a cast to `target`, in place: the node's
/// handle afterwards denotes the cast, with the original payload moved to a
/// fresh node.
pub fn wrap_in_cast(program: &mut Program, expr: Handle<Expr>, target: TypeDenoter) {
    let inner = program.exprs[expr].clone();
    let inner = program.exprs.append(inner);
    program.exprs[expr].kind = ExprKind::Cast {
        target,
        expr: inner,
    };
    program.reset_expr_type(expr);
}

/// Wraps `expr` in a cast when its base data type differs from `target`.
/// With `match_size` unset only the scalar base is compared.
pub fn convert_expr_if_cast_required(
    program: &mut Program,
    expr: Handle<Expr>,
    target: DataType,
    match_size: bool,
) {
    let ty = program.type_of(expr);
    let TypeDenoter::Base(current) = ty.aliased() else {
        return;
    };
    if *current == DataType::Undefined {
        return;
    }
    let matches = if match_size {
        *current == target
    } else {
        base_data_type(*current) == base_data_type(target)
    };
    if !matches {
        wrap_in_cast(program, expr, TypeDenoter::Base(target));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slx_ast::{
        AssignOp, BufferDecl, BufferType, BufferTypeDenoter, ObjectExpr, SymbolRef, TypeSpecifier,
        VarDecl,
    };

    fn convert_all(program: &mut Program) {
        ExprConverter::new(ExprConvertFlags::ALL).convert(program);
    }

    /// `RWTexture2D<uint> tex;` plus an object reference and an index
    /// literal, the common setup for the image-access rewrites.
    fn rw_texture_access(program: &mut Program) -> (Handle<Expr>, Handle<Expr>, Handle<Expr>) {
        let tex = program.buffer_decls.append(BufferDecl::new(
            "tex",
            BufferTypeDenoter::with_generic(
                BufferType::RWTexture2D,
                TypeDenoter::Base(DataType::UInt),
            ),
        ));
        let object = program.add_expr(ExprKind::object("tex", Some(SymbolRef::Buffer(tex))));
        let index = program.add_expr(ExprKind::literal("0", DataType::Int));
        let access = program.add_expr(ExprKind::Array {
            prefix: object,
            indices: vec![index],
        });
        (object, index, access)
    }

    #[test]
    fn scalar_swizzle_becomes_vector_constructor() {
        let mut program = Program::new();
        let s = program
            .var_decls
            .append(VarDecl::new("s", TypeDenoter::Base(DataType::Float)));
        let object = program.add_expr(ExprKind::object("s", Some(SymbolRef::Var(s))));
        let swizzle = program.add_expr(ExprKind::Object(ObjectExpr {
            prefix: Some(object),
            ident: "xxx".to_string(),
            symbol: None,
        }));
        let stmt = program.add_stmt(StmtKind::Expr { expr: swizzle });
        program.global_stmts.push(stmt);

        convert_all(&mut program);

        let ExprKind::Call(call) = &program.exprs[swizzle].kind else {
            panic!("scalar swizzle must become a constructor call");
        };
        assert_eq!(call.type_ctor, Some(TypeDenoter::Base(DataType::Float3)));
        assert_eq!(call.arguments, vec![object]);
    }

    #[test]
    fn vector_swizzle_is_left_alone() {
        let mut program = Program::new();
        let v = program
            .var_decls
            .append(VarDecl::new("v", TypeDenoter::Base(DataType::Float4)));
        let object = program.add_expr(ExprKind::object("v", Some(SymbolRef::Var(v))));
        let swizzle = program.add_expr(ExprKind::Object(ObjectExpr {
            prefix: Some(object),
            ident: "xy".to_string(),
            symbol: None,
        }));
        let stmt = program.add_stmt(StmtKind::Expr { expr: swizzle });
        program.global_stmts.push(stmt);

        convert_all(&mut program);

        assert!(matches!(
            program.exprs[swizzle].kind,
            ExprKind::Object(_)
        ));
    }

    #[test]
    fn rw_texture_read_becomes_image_load() {
        let mut program = Program::new();
        let (object, index, access) = rw_texture_access(&mut program);
        let stmt = program.add_stmt(StmtKind::Expr { expr: access });
        program.global_stmts.push(stmt);

        convert_all(&mut program);

        let ExprKind::Call(call) = &program.exprs[access].kind else {
            panic!("RW texture read must become imageLoad");
        };
        assert_eq!(call.intrinsic, Some(Intrinsic::ImageLoad));
        assert_eq!(call.arguments, vec![object, index]);
    }

    #[test]
    fn rw_texture_store_becomes_image_store() {
        let mut program = Program::new();
        let (object, index, access) = rw_texture_access(&mut program);
        let value = program.add_expr(ExprKind::literal("7", DataType::Int));
        let assign = program.add_expr(ExprKind::Assign {
            lvalue: access,
            op: AssignOp::Set,
            value,
        });
        let stmt = program.add_stmt(StmtKind::Expr { expr: assign });
        program.global_stmts.push(stmt);

        convert_all(&mut program);

        let ExprKind::Call(call) = &program.exprs[assign].kind else {
            panic!("RW texture store must become imageStore");
        };
        assert_eq!(call.intrinsic, Some(Intrinsic::ImageStore));
        assert_eq!(call.arguments, vec![object, index, value]);
        // The l-value subscript was consumed by the store, not turned into
        // a nested imageLoad.
        assert!(matches!(
            program.exprs[access].kind,
            ExprKind::Array { .. }
        ));
    }

    #[test]
    fn interlocked_destination_keeps_its_subscript() {
        let mut program = Program::new();
        let (_, _, access) = rw_texture_access(&mut program);
        let one = program.add_expr(ExprKind::literal("1", DataType::Int));
        let call = program.add_expr(ExprKind::Call(CallExpr {
            intrinsic: Some(Intrinsic::InterlockedAdd),
            arguments: vec![access, one],
            ..CallExpr::default()
        }));
        let stmt = program.add_stmt(StmtKind::Expr { expr: call });
        program.global_stmts.push(stmt);

        convert_all(&mut program);

        // The atomic destination survives as a subscript for the image
        // atomic rewrite that runs later in the main converter.
        assert!(matches!(
            program.exprs[access].kind,
            ExprKind::Array { .. }
        ));
    }

    #[test]
    fn initializer_list_becomes_type_constructor() {
        let mut program = Program::new();
        let elements: Vec<_> = ["1.0", "2.0", "3.0"]
            .iter()
            .map(|v| program.add_expr(ExprKind::literal(*v, DataType::Float)))
            .collect();
        let init = program.add_expr(ExprKind::Initializer {
            exprs: elements.clone(),
        });
        let var = program
            .var_decls
            .append(VarDecl::new("v", TypeDenoter::Base(DataType::Float3)));
        program.var_decls[var].initializer = Some(init);
        let stmt = program.add_stmt(StmtKind::VarDeclStmt {
            type_spec: TypeSpecifier::new(TypeDenoter::Base(DataType::Float3)),
            decls: vec![var],
        });
        program.global_stmts.push(stmt);

        convert_all(&mut program);

        let ExprKind::Call(call) = &program.exprs[init].kind else {
            panic!("initializer list must become a type constructor");
        };
        assert_eq!(call.type_ctor, Some(TypeDenoter::Base(DataType::Float3)));
        assert_eq!(call.arguments, elements);
    }

    #[test]
    fn array_initializers_are_left_for_unrolling() {
        let mut program = Program::new();
        let element = program.add_expr(ExprKind::literal("1.0", DataType::Float));
        let init = program.add_expr(ExprKind::Initializer {
            exprs: vec![element],
        });
        let array_ty = TypeDenoter::Array(slx_ast::ArrayTypeDenoter {
            base: Box::new(TypeDenoter::Base(DataType::Float)),
            dims: vec![1],
        });
        let var = program.var_decls.append(VarDecl::new("w", array_ty.clone()));
        program.var_decls[var].initializer = Some(init);
        let stmt = program.add_stmt(StmtKind::VarDeclStmt {
            type_spec: TypeSpecifier::new(array_ty),
            decls: vec![var],
        });
        program.global_stmts.push(stmt);

        convert_all(&mut program);

        assert!(matches!(
            program.exprs[init].kind,
            ExprKind::Initializer { .. }
        ));
    }
}

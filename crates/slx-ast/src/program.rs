//! The program root: arena storage for every node category, the live
//! top-level statement list, the disabled-node bucket, and on-demand type
//! resolution for expressions.

use crate::arena::{Arena, Handle};
use crate::decl::{
    AliasDecl, BufferDecl, FunctionDecl, SamplerDecl, StateDecl, StructDecl, UniformBufferDecl,
    VarDecl,
};
use crate::denoter::{ArrayTypeDenoter, SamplerTypeDenoter, StructTypeDenoter, TypeDenoter};
use crate::expr::{CallExpr, Expr, ExprKind, SymbolRef};
use crate::intrinsic::Intrinsic;
use crate::stmt::{Stmt, StmtKind};
use crate::types::{self, DataType, data_type_from_shape, subscript_data_type, vector_data_type};

/// The root of a parsed shader program.
///
/// Owns all node arenas. Passes receive `&mut Program` and address nodes by
/// handle; reflection only reads, lowering mutates in place. A node a pass
/// removes from the live tree is disabled inside its arena
/// (`program.stmts.disable(...)`) rather than deallocated, so back
/// references held elsewhere keep resolving.
#[derive(Clone, Debug, Default)]
pub struct Program {
    pub exprs: Arena<Expr>,
    pub stmts: Arena<Stmt>,
    pub var_decls: Arena<VarDecl>,
    pub buffer_decls: Arena<BufferDecl>,
    pub sampler_decls: Arena<SamplerDecl>,
    pub struct_decls: Arena<StructDecl>,
    pub alias_decls: Arena<AliasDecl>,
    pub function_decls: Arena<FunctionDecl>,
    pub uniform_buffer_decls: Arena<UniformBufferDecl>,
    pub state_decls: Arena<StateDecl>,

    /// Live top-level statements in source order.
    pub global_stmts: Vec<Handle<Stmt>>,
    /// The entry-point function, marked by the upstream analyzer.
    pub entry_point: Option<Handle<FunctionDecl>>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an expression node with no source area.
    pub fn add_expr(&mut self, kind: ExprKind) -> Handle<Expr> {
        self.exprs.append(Expr::new(kind))
    }

    /// Appends a statement node with no source area.
    pub fn add_stmt(&mut self, kind: StmtKind) -> Handle<Stmt> {
        self.stmts.append(Stmt::new(kind))
    }

    /* ----- Navigation helpers ----- */

    /// Strips bracket expressions.
    pub fn fetch_non_bracket(&self, mut expr: Handle<Expr>) -> Handle<Expr> {
        while let ExprKind::Bracket { expr: inner } = &self.exprs[expr].kind {
            expr = *inner;
        }
        expr
    }

    /// Walks to the l-value object expression behind brackets and subscripts.
    pub fn fetch_lvalue(&self, expr: Handle<Expr>) -> Option<Handle<Expr>> {
        let expr = self.fetch_non_bracket(expr);
        match &self.exprs[expr].kind {
            ExprKind::Object(_) => Some(expr),
            ExprKind::Array { prefix, .. } => self.fetch_lvalue(*prefix),
            _ => None,
        }
    }

    /// Returns the variable declaration an expression resolves to, if any.
    pub fn fetch_var_decl(&self, expr: Handle<Expr>) -> Option<Handle<VarDecl>> {
        match self.fetch_symbol(expr) {
            Some(SymbolRef::Var(var)) => Some(var),
            _ => None,
        }
    }

    /// Returns the buffer declaration an expression resolves to, if any.
    pub fn fetch_buffer_decl(&self, expr: Handle<Expr>) -> Option<Handle<BufferDecl>> {
        match self.fetch_symbol(expr) {
            Some(SymbolRef::Buffer(buffer)) => Some(buffer),
            _ => None,
        }
    }

    /// Returns the symbol behind an l-value expression, if any.
    pub fn fetch_symbol(&self, expr: Handle<Expr>) -> Option<SymbolRef> {
        let lvalue = self.fetch_lvalue(expr)?;
        match &self.exprs[lvalue].kind {
            ExprKind::Object(object) => object.symbol,
            _ => None,
        }
    }

    /// Returns the first declarator of a `VarDeclStmt`, used for function
    /// parameters which carry exactly one.
    pub fn param_var_decl(&self, param: Handle<Stmt>) -> Option<Handle<VarDecl>> {
        match &self.stmts[param].kind {
            StmtKind::VarDeclStmt { decls, .. } => decls.first().copied(),
            _ => None,
        }
    }

    /* ----- Struct helpers ----- */

    /// Counts the variable members of a struct across its member statements.
    pub fn num_member_variables(&self, decl: Handle<StructDecl>) -> usize {
        self.struct_decls[decl]
            .members
            .iter()
            .map(|&stmt| match &self.stmts[stmt].kind {
                StmtKind::VarDeclStmt { decls, .. } => decls.len(),
                _ => 0,
            })
            .sum()
    }

    /// Collects the type denoter of every direct variable member, one entry
    /// per declarator.
    pub fn collect_member_type_denoters(&self, decl: Handle<StructDecl>) -> Vec<TypeDenoter> {
        let mut denoters = Vec::new();
        for &stmt in &self.struct_decls[decl].members {
            if let StmtKind::VarDeclStmt { decls, .. } = &self.stmts[stmt].kind {
                for &var in decls {
                    denoters.push(self.var_decls[var].ty.clone());
                }
            }
        }
        denoters
    }

    /// Returns `true` if `base` is `derived` itself or appears in its base
    /// chain.
    pub fn struct_is_base_of(
        &self,
        base: Handle<StructDecl>,
        derived: Handle<StructDecl>,
    ) -> bool {
        let mut current = Some(derived);
        while let Some(handle) = current {
            if handle == base {
                return true;
            }
            current = self.struct_decls[handle].base_struct;
        }
        false
    }

    /// Finds a variable member by identifier, searching base structs.
    pub fn find_member_var(
        &self,
        decl: Handle<StructDecl>,
        ident: &str,
    ) -> Option<Handle<VarDecl>> {
        let mut current = Some(decl);
        while let Some(handle) = current {
            for &stmt in &self.struct_decls[handle].members {
                if let StmtKind::VarDeclStmt { decls, .. } = &self.stmts[stmt].kind {
                    for &var in decls {
                        if self.var_decls[var].ident == ident {
                            return Some(var);
                        }
                    }
                }
            }
            current = self.struct_decls[handle].base_struct;
        }
        None
    }

    /* ----- Function helpers ----- */

    /// Returns the parameter type denoters of a function, for overload
    /// comparison.
    pub fn function_signature(&self, decl: Handle<FunctionDecl>) -> Vec<TypeDenoter> {
        self.function_decls[decl]
            .parameters
            .iter()
            .filter_map(|&param| self.param_var_decl(param))
            .map(|var| self.var_decls[var].ty.clone())
            .collect()
    }

    /// Compares two function signatures, ignoring buffer generic sub-types.
    pub fn signatures_equal(&self, lhs: Handle<FunctionDecl>, rhs: Handle<FunctionDecl>) -> bool {
        let a = self.function_signature(lhs);
        let b = self.function_signature(rhs);
        a.len() == b.len()
            && a.iter()
                .zip(b.iter())
                .all(|(x, y)| x.equals_ignore_generic(y))
    }

    /* ----- Initializer helpers ----- */

    /// Descends into a nested initializer along an index path, yielding the
    /// element expression for one array index tuple.
    pub fn initializer_sub_expr(
        &self,
        init: Handle<Expr>,
        indices: &[usize],
    ) -> Option<Handle<Expr>> {
        let mut current = init;
        for &index in indices {
            match &self.exprs[current].kind {
                ExprKind::Initializer { exprs } => {
                    current = *exprs.get(index)?;
                }
                _ => return None,
            }
        }
        Some(current)
    }

    /* ----- Type resolution ----- */

    /// Resolves an expression's type denoter, memoizing per node.
    pub fn type_of(&mut self, expr: Handle<Expr>) -> TypeDenoter {
        if let Some(ty) = &self.exprs[expr].cached_ty {
            return ty.clone();
        }
        let ty = self.compute_type(expr);
        self.exprs[expr].cached_ty = Some(ty.clone());
        ty
    }

    /// Clears one expression's cached type denoter.
    pub fn reset_expr_type(&mut self, expr: Handle<Expr>) {
        self.exprs[expr].reset_type();
    }

    fn compute_type(&mut self, expr: Handle<Expr>) -> TypeDenoter {
        let kind = self.exprs[expr].kind.clone();
        match kind {
            ExprKind::Literal { data_type, .. } => TypeDenoter::Base(data_type),

            ExprKind::Binary { op, lhs, rhs } => {
                let lhs_ty = self.type_of(lhs);
                if op.is_boolean() {
                    let dim = vector_dim_of(&lhs_ty);
                    TypeDenoter::Base(vector_data_type(DataType::Bool, dim.max(1)))
                } else {
                    let rhs_ty = self.type_of(rhs);
                    promote(&lhs_ty, &rhs_ty)
                }
            }

            ExprKind::Unary { op, expr } => {
                let ty = self.type_of(expr);
                if op.is_logical() {
                    let dim = vector_dim_of(&ty);
                    TypeDenoter::Base(vector_data_type(DataType::Bool, dim.max(1)))
                } else {
                    ty
                }
            }

            ExprKind::PostUnary { expr, .. } => self.type_of(expr),

            ExprKind::Ternary { then_expr, .. } => self.type_of(then_expr),

            ExprKind::Cast { target, .. } => target,

            ExprKind::Call(call) => self.compute_call_type(&call),

            ExprKind::Object(object) => {
                if let Some(symbol) = object.symbol {
                    self.symbol_type(symbol)
                } else if let Some(prefix) = object.prefix {
                    let prefix_ty = self.type_of(prefix);
                    self.member_type(&prefix_ty, &object.ident)
                } else {
                    TypeDenoter::Base(DataType::Undefined)
                }
            }

            ExprKind::Array { prefix, indices } => {
                let mut ty = self.type_of(prefix);
                for _ in 0..indices.len() {
                    match ty.subscripted() {
                        Some(sub) => ty = sub,
                        None => return TypeDenoter::Base(DataType::Undefined),
                    }
                }
                ty
            }

            ExprKind::Assign { lvalue, .. } => self.type_of(lvalue),

            ExprKind::Initializer { .. } | ExprKind::StateInitializer { .. } => {
                TypeDenoter::Base(DataType::Undefined)
            }

            ExprKind::Bracket { expr } => self.type_of(expr),
        }
    }

    fn symbol_type(&mut self, symbol: SymbolRef) -> TypeDenoter {
        match symbol {
            SymbolRef::Var(var) => self.var_decls[var].ty.clone(),
            SymbolRef::Buffer(buffer) => TypeDenoter::Buffer(self.buffer_decls[buffer].ty.clone()),
            SymbolRef::Sampler(sampler) => TypeDenoter::Sampler(SamplerTypeDenoter {
                sampler_type: self.sampler_decls[sampler].sampler_type,
            }),
            SymbolRef::Struct(decl) => TypeDenoter::Struct(StructTypeDenoter {
                ident: self.struct_decls[decl].ident.clone(),
                decl: Some(decl),
            }),
            SymbolRef::Function(_) => TypeDenoter::Void,
        }
    }

    fn member_type(&mut self, prefix_ty: &TypeDenoter, ident: &str) -> TypeDenoter {
        match prefix_ty.aliased() {
            TypeDenoter::Struct(s) => match s.decl.and_then(|d| self.find_member_var(d, ident)) {
                Some(var) => self.var_decls[var].ty.clone(),
                None => TypeDenoter::Base(DataType::Undefined),
            },
            TypeDenoter::Base(t) => match subscript_data_type(*t, ident) {
                Ok((result, _)) => TypeDenoter::Base(result),
                Err(_) => TypeDenoter::Base(DataType::Undefined),
            },
            _ => TypeDenoter::Base(DataType::Undefined),
        }
    }

    fn compute_call_type(&mut self, call: &CallExpr) -> TypeDenoter {
        if let Some(ctor) = &call.type_ctor {
            return ctor.clone();
        }
        if let Some(function) = call.function {
            return self.function_decls[function].return_type.denoter.clone();
        }
        if let Some(intrinsic) = call.intrinsic {
            return self.intrinsic_call_type(intrinsic, &call.arguments);
        }
        TypeDenoter::Void
    }

    fn intrinsic_call_type(
        &mut self,
        intrinsic: Intrinsic,
        arguments: &[Handle<Expr>],
    ) -> TypeDenoter {
        use Intrinsic::*;

        let arg_ty = |this: &mut Self, index: usize| {
            arguments
                .get(index)
                .map(|&arg| this.type_of(arg))
                .unwrap_or(TypeDenoter::Void)
        };

        match intrinsic {
            Equal | NotEqual | LessThan | LessThanEqual | GreaterThan | GreaterThanEqual | Not => {
                let dim = vector_dim_of(&arg_ty(self, 0)).max(1);
                TypeDenoter::Base(vector_data_type(DataType::Bool, dim))
            }

            ImageStore => TypeDenoter::Void,

            ImageLoad => arg_ty(self, 0)
                .as_buffer()
                .and_then(|b| b.generic.as_deref().cloned())
                .unwrap_or(TypeDenoter::Base(DataType::Float4)),

            ImageAtomicAdd | ImageAtomicAnd | ImageAtomicOr | ImageAtomicXor | ImageAtomicMin
            | ImageAtomicMax | ImageAtomicCompSwap | ImageAtomicExchange => {
                if arguments.len() >= 3 {
                    arg_ty(self, 2)
                } else {
                    TypeDenoter::Base(DataType::UInt)
                }
            }

            _ if crate::intrinsic::is_texture_compare_intrinsic(intrinsic) => {
                TypeDenoter::Base(DataType::Float)
            }

            _ if crate::intrinsic::is_texture_intrinsic(intrinsic) => {
                TypeDenoter::Base(DataType::Float4)
            }

            _ => {
                // Component-wise math intrinsics take the first argument's type.
                let ty = arg_ty(self, 0);
                if matches!(ty, TypeDenoter::Void) {
                    TypeDenoter::Void
                } else {
                    ty
                }
            }
        }
    }
}

/// Vector dimension of a base denoter, 0 otherwise.
fn vector_dim_of(ty: &TypeDenoter) -> u32 {
    match ty.aliased() {
        TypeDenoter::Base(t) => types::vector_type_dim(*t),
        _ => 0,
    }
}

/// Promotes two operand types to the common result type of an arithmetic
/// binary expression: the wider shape wins, then the higher-ranked base.
fn promote(lhs: &TypeDenoter, rhs: &TypeDenoter) -> TypeDenoter {
    let (TypeDenoter::Base(a), TypeDenoter::Base(b)) = (lhs.aliased(), rhs.aliased()) else {
        return lhs.aliased().clone();
    };

    let (Some((abase, arows, acols)), Some((bbase, brows, bcols))) =
        (types::data_type_shape(*a), types::data_type_shape(*b))
    else {
        return TypeDenoter::Base(DataType::Undefined);
    };

    let rank = |t: DataType| match t {
        DataType::Bool => 0,
        DataType::Int => 1,
        DataType::UInt => 2,
        DataType::Half => 3,
        DataType::Float => 4,
        DataType::Double => 5,
        _ => 0,
    };
    let base = if rank(abase) >= rank(bbase) {
        abase
    } else {
        bbase
    };
    TypeDenoter::Base(data_type_from_shape(
        base,
        arows.max(brows),
        acols.max(bcols),
    ))
}

/// Returns the dimension sizes of an array type denoter, treating
/// unspecified (`-1`) dimensions as empty.
pub fn array_dim_sizes(array: &ArrayTypeDenoter) -> Vec<usize> {
    array
        .dims
        .iter()
        .map(|&d| if d < 0 { 0 } else { d as usize })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::VarDecl;
    use crate::denoter::BufferTypeDenoter;
    use crate::types::BufferType;

    fn literal(program: &mut Program, value: &str, ty: DataType) -> Handle<Expr> {
        program.add_expr(ExprKind::literal(value, ty))
    }

    #[test]
    fn literal_and_binary_types() {
        let mut program = Program::new();
        let one = literal(&mut program, "1", DataType::Int);
        let two = literal(&mut program, "2.0", DataType::Float);
        let add = program.add_expr(ExprKind::Binary {
            op: crate::types::BinaryOp::Add,
            lhs: one,
            rhs: two,
        });
        assert_eq!(program.type_of(add), TypeDenoter::Base(DataType::Float));

        let less = program.add_expr(ExprKind::Binary {
            op: crate::types::BinaryOp::Less,
            lhs: one,
            rhs: two,
        });
        assert_eq!(program.type_of(less), TypeDenoter::Base(DataType::Bool));
    }

    #[test]
    fn object_type_through_symbol() {
        let mut program = Program::new();
        let var = program
            .var_decls
            .append(VarDecl::new("v", TypeDenoter::Base(DataType::Float3)));
        let object = program.add_expr(ExprKind::object("v", Some(SymbolRef::Var(var))));
        assert_eq!(program.type_of(object), TypeDenoter::Base(DataType::Float3));
    }

    #[test]
    fn swizzle_member_type() {
        let mut program = Program::new();
        let var = program
            .var_decls
            .append(VarDecl::new("v", TypeDenoter::Base(DataType::Float4)));
        let object = program.add_expr(ExprKind::object("v", Some(SymbolRef::Var(var))));
        let swizzle = program.add_expr(ExprKind::Object(crate::expr::ObjectExpr {
            prefix: Some(object),
            ident: "xy".to_string(),
            symbol: None,
        }));
        assert_eq!(
            program.type_of(swizzle),
            TypeDenoter::Base(DataType::Float2)
        );
    }

    #[test]
    fn buffer_subscript_type() {
        let mut program = Program::new();
        let buffer = program.buffer_decls.append(crate::decl::BufferDecl::new(
            "tex",
            BufferTypeDenoter::with_generic(
                BufferType::RWTexture2D,
                TypeDenoter::Base(DataType::UInt),
            ),
        ));
        let object = program.add_expr(ExprKind::object("tex", Some(SymbolRef::Buffer(buffer))));
        let index = literal(&mut program, "0", DataType::Int);
        let access = program.add_expr(ExprKind::Array {
            prefix: object,
            indices: vec![index],
        });
        assert_eq!(program.type_of(access), TypeDenoter::Base(DataType::UInt));
    }

    #[test]
    fn type_cache_resets() {
        let mut program = Program::new();
        let var = program
            .var_decls
            .append(VarDecl::new("v", TypeDenoter::Base(DataType::Int)));
        let object = program.add_expr(ExprKind::object("v", Some(SymbolRef::Var(var))));
        assert_eq!(program.type_of(object), TypeDenoter::Base(DataType::Int));

        // Change the declaration's type; the stale cache must be reset by
        // the caller before the new type becomes visible.
        program.var_decls[var].ty = TypeDenoter::Base(DataType::Float);
        assert_eq!(program.type_of(object), TypeDenoter::Base(DataType::Int));
        program.reset_expr_type(object);
        assert_eq!(program.type_of(object), TypeDenoter::Base(DataType::Float));
    }

    #[test]
    fn disabled_stmts_stay_owned_by_their_arena() {
        let mut program = Program::new();
        let stmt = program.add_stmt(StmtKind::Null);
        program.global_stmts.push(stmt);
        program.global_stmts.clear();
        program.stmts.disable(stmt);
        assert!(program.stmts.is_disabled(stmt));
        // The arena still owns the node.
        assert!(matches!(program.stmts[stmt].kind, StmtKind::Null));
    }

    #[test]
    fn initializer_sub_expr_path() {
        let mut program = Program::new();
        let a = literal(&mut program, "1", DataType::Int);
        let b = literal(&mut program, "2", DataType::Int);
        let inner = program.add_expr(ExprKind::Initializer { exprs: vec![a, b] });
        let c = literal(&mut program, "3", DataType::Int);
        let inner2 = program.add_expr(ExprKind::Initializer { exprs: vec![c] });
        let outer = program.add_expr(ExprKind::Initializer {
            exprs: vec![inner, inner2],
        });

        assert_eq!(program.initializer_sub_expr(outer, &[0, 1]), Some(b));
        assert_eq!(program.initializer_sub_expr(outer, &[1, 0]), Some(c));
        assert_eq!(program.initializer_sub_expr(outer, &[1, 1]), None);
    }
}

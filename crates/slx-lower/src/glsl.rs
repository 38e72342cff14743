//! The GLSL/VKSL converter.
//!
//! Rewrites a typed program in place until it is directly emittable as GLSL
//! or Vulkan-GLSL: entry-point identifier discipline, scoped renaming
//! against collisions and reserved words, sampler-state removal,
//! member-function flattening with a synthetic `self` parameter, intrinsic
//! rewriting, dead-code pruning, array-initializer unrolling, and the
//! smaller shape fixes GLSL requires (no empty structs, braced control-flow
//! bodies, no `static` storage class).

use slx_ast::intrinsic::is_texture_intrinsic;
use slx_ast::types::{
    buffer_type_texture_dim, is_rw_texture_buffer_type, texture_type_to_sampler_type,
    vector_data_type,
};
use slx_ast::{
    AstFlags, BufferDecl, CallExpr, DataType, Expr, ExprKind, FunctionDecl, Handle, Intrinsic,
    ObjectExpr, OutputVersion, Program, SamplerDecl, SamplerType, SamplerTypeDenoter, ShaderTarget,
    StmtKind, StorageClass, StructDecl, SymbolRef, TypeDenoter, TypeSpecifier, VarDecl,
    array_dim_sizes, AssignOp, Stmt,
};

use crate::error::ConvertError;
use crate::exprconv::{ExprConvertFlags, ExprConverter, convert_expr_if_cast_required};
use crate::func_name::FuncNameConverter;
use crate::keywords::is_reserved_glsl_keyword;
use crate::scope::ScopeStack;

/// Identifier mangling configuration.
#[derive(Clone, Debug)]
pub struct NameMangling {
    /// Prefix for shader-input semantic identifiers.
    pub input_prefix: String,
    /// Prefix for shader-output semantic identifiers.
    pub output_prefix: String,
    /// Prefix applied when renaming against reserved words or `gl_`.
    pub reserved_word_prefix: String,
    /// Prefix applied when renaming local collisions or anonymous structs.
    pub temporary_prefix: String,
    /// Prefix of the synthetic `self` parameter.
    pub namespace_prefix: String,
    /// Entry-point I/O uses the raw semantic name where the stage allows.
    pub use_always_semantics: bool,
}

impl Default for NameMangling {
    fn default() -> Self {
        Self {
            input_prefix: "xsv_".to_string(),
            output_prefix: "xsv_".to_string(),
            reserved_word_prefix: "xsr_".to_string(),
            temporary_prefix: "xst_".to_string(),
            namespace_prefix: "xsn_".to_string(),
            use_always_semantics: false,
        }
    }
}

/// Conversion options.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConvertOptions {
    /// Replace every renameable identifier with an obfuscated `_<n>` token.
    pub obfuscate: bool,
    /// Expand array initializers into per-element assignments.
    pub unroll_array_initializers: bool,
}

/// A declaration whose identifier participates in scope registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DeclRef {
    Var(Handle<VarDecl>),
    Buffer(Handle<BufferDecl>),
    Sampler(Handle<SamplerDecl>),
}

/// Lowers a program toward GLSL or VKSL output.
#[derive(Debug)]
pub struct GlslConverter {
    target: ShaderTarget,
    mangling: NameMangling,
    options: ConvertOptions,
    is_vksl: bool,
    supports_420pack: bool,

    scopes: ScopeStack,
    struct_stack: Vec<Handle<StructDecl>>,
    function_stack: Vec<Handle<FunctionDecl>>,
    self_param_stack: Vec<Handle<VarDecl>>,
    /// Globally reserved declarations, for cross-scope collision detection.
    global_reserved: Vec<Handle<VarDecl>>,
    anonym_counter: u32,
    obfuscation_counter: u32,
}

impl GlslConverter {
    pub fn new(
        target: ShaderTarget,
        mangling: NameMangling,
        options: ConvertOptions,
        version: OutputVersion,
    ) -> Self {
        Self {
            target,
            mangling,
            options,
            is_vksl: version.is_vksl(),
            supports_420pack: version.supports_420pack(),
            scopes: ScopeStack::new(),
            struct_stack: Vec::new(),
            function_stack: Vec::new(),
            self_param_stack: Vec::new(),
            global_reserved: Vec::new(),
            anonym_counter: 0,
            obfuscation_counter: 0,
        }
    }

    /// Runs the full conversion over `program`.
    pub fn convert(&mut self, program: &mut Program) -> Result<(), ConvertError> {
        log::debug!(
            "lowering for {} ({})",
            self.target,
            if self.is_vksl { "VKSL" } else { "GLSL" }
        );

        let mut flags = ExprConvertFlags::ALL;
        if self.supports_420pack {
            // The 420pack extension keeps initializer lists and vector
            // subscripts legal in the output.
            flags.remove(ExprConvertFlags::VECTOR_SUBSCRIPTS | ExprConvertFlags::INITIALIZER);
        }
        ExprConverter::new(flags).convert(program);

        self.visit_program(program)?;

        // Function names convert after the main pass, since owner structs
        // may have been renamed along the way.
        FuncNameConverter::new(self.mangling.clone()).convert(program);
        Ok(())
    }

    /* ----- Program ----- */

    fn visit_program(&mut self, program: &mut Program) -> Result<(), ConvertError> {
        self.scopes.open();

        if let Some(entry_point) = program.entry_point {
            let decl = &program.function_decls[entry_point];
            let inputs = decl.input_semantics.var_decl_refs.clone();
            let inputs_sv = decl.input_semantics.var_decl_refs_sv.clone();
            let outputs = decl.output_semantics.var_decl_refs.clone();
            let outputs_sv = decl.output_semantics.var_decl_refs_sv.clone();

            // Reserve entry-point I/O identifiers by stage: vertex inputs
            // and fragment outputs may take the raw semantic string.
            match self.target {
                ShaderTarget::VertexShader => {
                    if self.mangling.use_always_semantics {
                        self.rename_in_out_var_idents(program, &inputs, true, true);
                    }
                    self.rename_in_out_var_idents(program, &outputs, false, false);
                }
                ShaderTarget::FragmentShader => {
                    self.rename_in_out_var_idents(program, &inputs, true, false);
                    if self.mangling.use_always_semantics {
                        self.rename_in_out_var_idents(program, &outputs, false, true);
                    }
                }
                _ => {
                    self.rename_in_out_var_idents(program, &inputs, true, false);
                    self.rename_in_out_var_idents(program, &outputs, false, false);
                }
            }

            for var in inputs.iter().chain(&outputs).chain(&inputs_sv).chain(&outputs_sv) {
                self.register_decl_ident(program, DeclRef::Var(*var), true);
            }
        }

        let stmts = program.global_stmts.clone();
        for stmt in stmts {
            self.visit_stmt(program, stmt)?;
        }

        if !self.is_vksl {
            self.remove_sampler_state_globals(program);
        }

        self.scopes.close();
        Ok(())
    }

    /// Moves top-level sampler-state declarations into the disabled bucket;
    /// GLSL has no sampler-state objects.
    fn remove_sampler_state_globals(&mut self, program: &mut Program) {
        let stmts = std::mem::take(&mut program.global_stmts);
        for stmt in stmts {
            let is_sampler_state = match &program.stmts[stmt].kind {
                StmtKind::SamplerDeclStmt { .. } => true,
                StmtKind::VarDeclStmt { type_spec, .. } => type_spec.denoter.is_sampler_state(),
                _ => false,
            };
            if is_sampler_state {
                program.stmts.disable(stmt);
            } else {
                program.global_stmts.push(stmt);
            }
        }
    }

    /* ----- Statements ----- */

    fn visit_stmt(&mut self, program: &mut Program, stmt: Handle<Stmt>) -> Result<(), ConvertError> {
        let kind = program.stmts[stmt].kind.clone();
        match kind {
            StmtKind::CodeBlock { .. } => self.visit_code_block(program, stmt, true),

            StmtKind::VarDeclStmt { decls, .. } => {
                // `static` is a reserved word in GLSL.
                if let StmtKind::VarDeclStmt { type_spec, .. } = &mut program.stmts[stmt].kind {
                    type_spec.remove_storage_class(StorageClass::Static);
                }
                for decl in decls {
                    self.visit_var_decl(program, decl)?;
                }
                Ok(())
            }

            StmtKind::BufferDeclStmt { decls } => {
                for decl in decls {
                    self.register_decl_ident(program, DeclRef::Buffer(decl), false);
                }
                Ok(())
            }

            StmtKind::SamplerDeclStmt { decls } => {
                for decl in decls {
                    self.register_decl_ident(program, DeclRef::Sampler(decl), false);
                }
                Ok(())
            }

            StmtKind::StructDeclStmt { decl } => self.visit_struct_decl(program, decl),

            StmtKind::FunctionDeclStmt { decl } => self.visit_function_decl(program, decl),

            StmtKind::UniformBufferDeclStmt { decl } => {
                let members = program.uniform_buffer_decls[decl].members.clone();
                for member in members {
                    self.visit_stmt(program, member)?;
                }
                Ok(())
            }

            StmtKind::AliasDeclStmt {
                struct_decl,
                aliases,
            } => {
                // An anonymous struct behind an alias takes the first alias
                // name; the alias itself disappears in GLSL.
                if let Some(struct_decl) = struct_decl {
                    if program.struct_decls[struct_decl].is_anonymous() {
                        if let Some(&first) = aliases.first() {
                            program.struct_decls[struct_decl].ident =
                                program.alias_decls[first].ident.clone();
                        }
                    }
                    self.visit_struct_decl(program, struct_decl)?;
                }
                Ok(())
            }

            StmtKind::StateDeclStmt { .. } | StmtKind::Null | StmtKind::CtrlTransfer { .. } => {
                Ok(())
            }

            StmtKind::For {
                init,
                condition,
                iteration,
                body,
            } => {
                let body = self.reparent_entry_point_return(program, stmt, body);
                self.scopes.open();
                if let Some(init) = init {
                    self.visit_stmt(program, init)?;
                }
                if let Some(condition) = condition {
                    self.visit_expr(program, condition)?;
                }
                if let Some(iteration) = iteration {
                    self.visit_expr(program, iteration)?;
                }
                self.visit_loop_body(program, body)?;
                self.scopes.close();
                Ok(())
            }

            StmtKind::While { condition, body } => {
                let body = self.reparent_entry_point_return(program, stmt, body);
                self.scopes.open();
                self.visit_expr(program, condition)?;
                self.visit_loop_body(program, body)?;
                self.scopes.close();
                Ok(())
            }

            StmtKind::DoWhile { body, condition } => {
                let body = self.reparent_entry_point_return(program, stmt, body);
                self.scopes.open();
                self.visit_loop_body(program, body)?;
                self.visit_expr(program, condition)?;
                self.scopes.close();
                Ok(())
            }

            StmtKind::If {
                condition,
                body,
                else_body,
            } => {
                let body = self.reparent_entry_point_return(program, stmt, body);
                self.scopes.open();
                self.visit_expr(program, condition)?;
                self.visit_stmt(program, body)?;
                self.scopes.close();

                if let Some(else_body) = else_body {
                    let else_body = self.reparent_entry_point_else(program, stmt, else_body);
                    self.scopes.open();
                    self.visit_stmt(program, else_body)?;
                    self.scopes.close();
                }
                Ok(())
            }

            StmtKind::Switch { selector, .. } => {
                self.scopes.open();
                self.visit_expr(program, selector)?;

                let mut cases = match &program.stmts[stmt].kind {
                    StmtKind::Switch { cases, .. } => cases.clone(),
                    _ => unreachable!(),
                };
                for case in &mut cases {
                    case.stmts
                        .retain(|&s| !program.stmts[s].flags.contains(AstFlags::DEAD_CODE));
                }
                if let StmtKind::Switch { cases: dst, .. } = &mut program.stmts[stmt].kind {
                    *dst = cases.clone();
                }

                for case in cases {
                    if let Some(expr) = case.expr {
                        self.visit_expr(program, expr)?;
                    }
                    for child in case.stmts {
                        self.visit_stmt(program, child)?;
                    }
                }
                self.scopes.close();
                Ok(())
            }

            StmtKind::Expr { expr } => self.visit_expr(program, expr),
            StmtKind::Return { expr } => match expr {
                Some(expr) => self.visit_expr(program, expr),
                None => Ok(()),
            },
        }
    }

    /// Visits a loop body; a body that is itself a code block does not open
    /// a second scope.
    fn visit_loop_body(
        &mut self,
        program: &mut Program,
        body: Handle<Stmt>,
    ) -> Result<(), ConvertError> {
        if matches!(program.stmts[body].kind, StmtKind::CodeBlock { .. }) {
            self.visit_code_block(program, body, false)
        } else {
            self.visit_stmt(program, body)
        }
    }

    fn visit_code_block(
        &mut self,
        program: &mut Program,
        block: Handle<Stmt>,
        open_scope: bool,
    ) -> Result<(), ConvertError> {
        if open_scope {
            self.scopes.open();
        }

        let mut stmts = match &program.stmts[block].kind {
            StmtKind::CodeBlock { stmts } => stmts.clone(),
            _ => unreachable!(),
        };
        self.prune_and_unroll(program, &mut stmts);
        if let StmtKind::CodeBlock { stmts: dst } = &mut program.stmts[block].kind {
            *dst = stmts.clone();
        }

        for stmt in stmts {
            self.visit_stmt(program, stmt)?;
        }

        if open_scope {
            self.scopes.close();
        }
        Ok(())
    }

    /// Drops dead statements and expands array initializers in a statement
    /// list.
    fn prune_and_unroll(&mut self, program: &mut Program, stmts: &mut Vec<Handle<Stmt>>) {
        stmts.retain(|&s| !program.stmts[s].flags.contains(AstFlags::DEAD_CODE));

        if !self.options.unroll_array_initializers {
            return;
        }

        let mut index = 0;
        while index < stmts.len() {
            let stmt = stmts[index];
            index += 1;

            let StmtKind::VarDeclStmt { decls, .. } = &program.stmts[stmt].kind else {
                continue;
            };
            let decls = decls.clone();

            let mut unrolled = Vec::new();
            for decl in decls {
                unrolled.extend(self.unroll_var_decl_initializer(program, decl));
            }
            for (offset, new_stmt) in unrolled.into_iter().enumerate() {
                stmts.insert(index + offset, new_stmt);
            }
        }
    }

    /// Expands one array initializer into per-element assignments, walking
    /// the index space in lexicographic order (outermost dimension slowest).
    fn unroll_var_decl_initializer(
        &mut self,
        program: &mut Program,
        var: Handle<VarDecl>,
    ) -> Vec<Handle<Stmt>> {
        let ty = program.var_decls[var].ty.clone();
        let Some(array) = ty.as_array() else {
            return Vec::new();
        };
        let Some(init) = program.var_decls[var].initializer else {
            return Vec::new();
        };
        if !matches!(program.exprs[init].kind, ExprKind::Initializer { .. }) {
            return Vec::new();
        }

        let dims = array_dim_sizes(array);
        if dims.is_empty() || dims.contains(&0) {
            return Vec::new();
        }

        let ident = program.var_decls[var].ident.clone();
        let mut result = Vec::new();
        let mut indices = vec![0usize; dims.len()];
        loop {
            if let Some(element) = program.initializer_sub_expr(init, &indices) {
                let object = program.add_expr(ExprKind::object(
                    ident.clone(),
                    Some(SymbolRef::Var(var)),
                ));
                let index_exprs = indices
                    .iter()
                    .map(|i| program.add_expr(ExprKind::literal(i.to_string(), DataType::Int)))
                    .collect();
                let access = program.add_expr(ExprKind::Array {
                    prefix: object,
                    indices: index_exprs,
                });
                let assign = program.add_expr(ExprKind::Assign {
                    lvalue: access,
                    op: AssignOp::Set,
                    value: element,
                });
                result.push(program.add_stmt(StmtKind::Expr { expr: assign }));
            }

            // Advance the index odometer, innermost dimension fastest.
            let mut dim = dims.len();
            loop {
                if dim == 0 {
                    program.var_decls[var].initializer = None;
                    return result;
                }
                dim -= 1;
                indices[dim] += 1;
                if indices[dim] < dims[dim] {
                    break;
                }
                indices[dim] = 0;
            }
        }
    }

    /// Wraps a bare `return` body in a code block inside the entry point and
    /// patches the parent statement's body handle.
    fn reparent_entry_point_return(
        &mut self,
        program: &mut Program,
        parent: Handle<Stmt>,
        body: Handle<Stmt>,
    ) -> Handle<Stmt> {
        let wrapped = self.make_code_block_in_return(program, body);
        if wrapped != body {
            match &mut program.stmts[parent].kind {
                StmtKind::For { body, .. }
                | StmtKind::While { body, .. }
                | StmtKind::DoWhile { body, .. }
                | StmtKind::If { body, .. } => *body = wrapped,
                _ => {}
            }
        }
        wrapped
    }

    fn reparent_entry_point_else(
        &mut self,
        program: &mut Program,
        parent: Handle<Stmt>,
        else_body: Handle<Stmt>,
    ) -> Handle<Stmt> {
        let wrapped = self.make_code_block_in_return(program, else_body);
        if wrapped != else_body {
            if let StmtKind::If { else_body, .. } = &mut program.stmts[parent].kind {
                *else_body = Some(wrapped);
            }
        }
        wrapped
    }

    fn make_code_block_in_return(
        &self,
        program: &mut Program,
        body: Handle<Stmt>,
    ) -> Handle<Stmt> {
        let inside_entry_point = self
            .function_stack
            .last()
            .is_some_and(|&f| program.function_decls[f].is_entry_point());
        if inside_entry_point && matches!(program.stmts[body].kind, StmtKind::Return { .. }) {
            program.add_stmt(StmtKind::CodeBlock { stmts: vec![body] })
        } else {
            body
        }
    }

    /* ----- Declarations ----- */

    fn visit_var_decl(
        &mut self,
        program: &mut Program,
        decl: Handle<VarDecl>,
    ) -> Result<(), ConvertError> {
        self.register_decl_ident(program, DeclRef::Var(decl), false);
        if let Some(init) = program.var_decls[decl].initializer {
            self.visit_expr(program, init)?;
        }
        Ok(())
    }

    fn visit_struct_decl(
        &mut self,
        program: &mut Program,
        decl: Handle<StructDecl>,
    ) -> Result<(), ConvertError> {
        if program.struct_decls[decl].is_anonymous() {
            program.struct_decls[decl].ident =
                format!("{}anonym{}", self.mangling.temporary_prefix, self.anonym_counter);
            self.anonym_counter += 1;
        }

        let mut ident = std::mem::take(&mut program.struct_decls[decl].ident);
        self.rename_reserved_keyword(&mut ident);
        program.struct_decls[decl].ident = ident;

        self.struct_stack.push(decl);
        self.scopes.open();
        let members = program.struct_decls[decl].members.clone();
        for member in members {
            self.visit_stmt(program, member)?;
        }
        let functions = program.struct_decls[decl].functions.clone();
        for function in functions {
            self.visit_function_decl(program, function)?;
        }
        self.scopes.close();
        self.struct_stack.pop();

        if !self.is_vksl {
            self.remove_sampler_state_members(program, decl);
        }

        // GLSL forbids empty structs; give one a dummy member.
        if program.num_member_variables(decl) == 0 {
            let mut dummy = VarDecl::new(
                format!("{}dummy", self.mangling.temporary_prefix),
                TypeDenoter::Base(DataType::Int),
            );
            dummy.struct_ref = Some(decl);
            let var = program.var_decls.append(dummy);
            let member = program.add_stmt(StmtKind::VarDeclStmt {
                type_spec: TypeSpecifier::new(TypeDenoter::Base(DataType::Int)),
                decls: vec![var],
            });
            program.struct_decls[decl].members.push(member);
        }
        Ok(())
    }

    fn remove_sampler_state_members(&mut self, program: &mut Program, decl: Handle<StructDecl>) {
        let members = std::mem::take(&mut program.struct_decls[decl].members);
        let mut kept = Vec::new();
        for member in members {
            let is_sampler_state = match &program.stmts[member].kind {
                StmtKind::VarDeclStmt { type_spec, .. } => type_spec.denoter.is_sampler_state(),
                _ => false,
            };
            if is_sampler_state {
                program.stmts.disable(member);
            } else {
                kept.push(member);
            }
        }
        program.struct_decls[decl].members = kept;
    }

    fn visit_function_decl(
        &mut self,
        program: &mut Program,
        decl: Handle<FunctionDecl>,
    ) -> Result<(), ConvertError> {
        self.function_stack.push(decl);
        self.scopes.open();
        let result = self.convert_function_decl(program, decl);
        self.scopes.close();
        self.function_stack.pop();
        result
    }

    fn convert_function_decl(
        &mut self,
        program: &mut Program,
        decl: Handle<FunctionDecl>,
    ) -> Result<(), ConvertError> {
        let self_param = self.insert_self_parameter(program, decl);
        if let Some(var) = self_param {
            self.self_param_stack.push(var);
        }

        if !program.function_decls[decl].is_entry_point() {
            let mut ident = std::mem::take(&mut program.function_decls[decl].ident);
            self.rename_reserved_keyword(&mut ident);
            program.function_decls[decl].ident = ident;
        } else {
            self.propagate_dynamic_array_params(program, decl);
        }

        let parameters = program.function_decls[decl].parameters.clone();
        for param in parameters {
            self.visit_stmt(program, param)?;
        }

        let mut body = std::mem::take(&mut program.function_decls[decl].body);
        self.prune_and_unroll(program, &mut body);
        program.function_decls[decl].body = body.clone();
        for stmt in body {
            self.visit_stmt(program, stmt)?;
        }

        if !self.is_vksl {
            self.remove_sampler_state_params(program, decl);
        }

        if self_param.is_some() {
            self.self_param_stack.pop();
        }
        Ok(())
    }

    /// Gives a non-static member function its leading `self` parameter.
    /// Returns the active `self` variable, inserted or pre-existing.
    fn insert_self_parameter(
        &mut self,
        program: &mut Program,
        decl: Handle<FunctionDecl>,
    ) -> Option<Handle<VarDecl>> {
        let struct_ref = program.function_decls[decl].struct_ref?;
        if program.function_decls[decl].is_static() {
            return None;
        }

        // Already flattened: the first parameter is the self parameter.
        if let Some(&first) = program.function_decls[decl].parameters.first() {
            if let Some(var) = program.param_var_decl(first) {
                if program.var_decls[var].flags.contains(AstFlags::SELF_PARAMETER) {
                    return Some(var);
                }
            }
        }

        let struct_ty = TypeDenoter::Struct(slx_ast::StructTypeDenoter {
            ident: program.struct_decls[struct_ref].ident.clone(),
            decl: Some(struct_ref),
        });
        let mut var = VarDecl::new(
            format!("{}self", self.mangling.namespace_prefix),
            struct_ty.clone(),
        );
        var.flags |= AstFlags::SELF_PARAMETER;
        let var = program.var_decls.append(var);

        let param = program.add_stmt(StmtKind::VarDeclStmt {
            type_spec: TypeSpecifier::new(struct_ty),
            decls: vec![var],
        });
        program.function_decls[decl].parameters.insert(0, param);
        Some(var)
    }

    /// Marks array-typed entry-point parameters (and the members of their
    /// struct payloads) as dynamic arrays.
    fn propagate_dynamic_array_params(&mut self, program: &mut Program, decl: Handle<FunctionDecl>) {
        let parameters = program.function_decls[decl].parameters.clone();
        for param in parameters {
            let Some(var) = program.param_var_decl(param) else {
                continue;
            };
            let ty = program.var_decls[var].ty.clone();
            let Some(array) = ty.as_array() else {
                continue;
            };
            program.var_decls[var].flags |= AstFlags::DYNAMIC_ARRAY;

            if let Some(struct_td) = array.base.as_struct() {
                if let Some(struct_decl) = struct_td.decl {
                    let members = program.struct_decls[struct_decl].members.clone();
                    for member in members {
                        if let StmtKind::VarDeclStmt { decls, .. } = &program.stmts[member].kind {
                            for &member_var in decls.clone().iter() {
                                program.var_decls[member_var].flags |= AstFlags::DYNAMIC_ARRAY;
                            }
                        }
                    }
                }
            }
        }
    }

    fn remove_sampler_state_params(&mut self, program: &mut Program, decl: Handle<FunctionDecl>) {
        let parameters = std::mem::take(&mut program.function_decls[decl].parameters);
        let mut kept = Vec::new();
        for param in parameters {
            let is_sampler_state = match &program.stmts[param].kind {
                StmtKind::VarDeclStmt { type_spec, .. } => type_spec.denoter.is_sampler_state(),
                _ => false,
            };
            if is_sampler_state {
                program.stmts.disable(param);
            } else {
                kept.push(param);
            }
        }
        program.function_decls[decl].parameters = kept;
    }

    /* ----- Identifier discipline ----- */

    fn rename_in_out_var_idents(
        &mut self,
        program: &mut Program,
        vars: &[Handle<VarDecl>],
        input: bool,
        use_semantic_only: bool,
    ) {
        for &var in vars {
            let semantic = program.var_decls[var].semantic.to_string();
            program.var_decls[var].ident = if use_semantic_only {
                semantic
            } else if input {
                format!("{}{}", self.mangling.input_prefix, semantic)
            } else {
                format!("{}{}", self.mangling.output_prefix, semantic)
            };
        }
    }

    fn decl_ident<'a>(&self, program: &'a Program, decl: DeclRef) -> &'a str {
        match decl {
            DeclRef::Var(h) => &program.var_decls[h].ident,
            DeclRef::Buffer(h) => &program.buffer_decls[h].ident,
            DeclRef::Sampler(h) => &program.sampler_decls[h].ident,
        }
    }

    fn with_decl_ident(
        &mut self,
        program: &mut Program,
        decl: DeclRef,
        f: impl FnOnce(&mut Self, &mut String),
    ) {
        let mut ident = match decl {
            DeclRef::Var(h) => std::mem::take(&mut program.var_decls[h].ident),
            DeclRef::Buffer(h) => std::mem::take(&mut program.buffer_decls[h].ident),
            DeclRef::Sampler(h) => std::mem::take(&mut program.sampler_decls[h].ident),
        };
        f(self, &mut ident);
        match decl {
            DeclRef::Var(h) => program.var_decls[h].ident = ident,
            DeclRef::Buffer(h) => program.buffer_decls[h].ident = ident,
            DeclRef::Sampler(h) => program.sampler_decls[h].ident = ident,
        }
    }

    fn register_decl_ident(&mut self, program: &mut Program, decl: DeclRef, global: bool) {
        if self.must_rename_decl_ident(program, decl) {
            let prefix = self.mangling.temporary_prefix.clone();
            self.with_decl_ident(program, decl, |_, ident| {
                ident.insert_str(0, &prefix);
            });
        }

        self.with_decl_ident(program, decl, |this, ident| {
            this.rename_reserved_keyword(ident);
        });

        if global {
            if let DeclRef::Var(var) = decl {
                self.global_reserved.push(var);
            }
        } else {
            let ident = self.decl_ident(program, decl).to_string();
            self.scopes.register(&ident);
        }
    }

    fn must_rename_decl_ident(&self, program: &Program, decl: DeclRef) -> bool {
        if let DeclRef::Var(var) = decl {
            // Struct members and shader inputs keep their names.
            if !self.struct_stack.is_empty()
                || program.var_decls[var].flags.contains(AstFlags::SHADER_INPUT)
            {
                return false;
            }

            // A collision against a globally reserved identifier forces a
            // rename, unless this declaration is the reserved one.
            let ident = &program.var_decls[var].ident;
            if let Some(&reserved) = self
                .global_reserved
                .iter()
                .find(|&&r| &program.var_decls[r].ident == ident)
            {
                return reserved != var;
            }
        }

        self.scopes
            .contains_in_current(self.decl_ident(program, decl))
    }

    /// Renames an identifier that collides with a reserved GLSL word or the
    /// `gl_` namespace. With obfuscation enabled every call renames.
    fn rename_reserved_keyword(&mut self, ident: &mut String) -> bool {
        if self.options.obfuscate {
            *ident = format!("_{}", self.obfuscation_counter);
            self.obfuscation_counter += 1;
            return true;
        }
        if is_reserved_glsl_keyword(ident) || ident.starts_with("gl_") {
            ident.insert_str(0, &self.mangling.reserved_word_prefix);
            return true;
        }
        false
    }

    /* ----- Expressions ----- */

    fn visit_expr(&mut self, program: &mut Program, expr: Handle<Expr>) -> Result<(), ConvertError> {
        let kind = program.exprs[expr].kind.clone();
        match kind {
            ExprKind::Literal { value, .. } => {
                // 'h'/'H' suffixes do not exist in GLSL; promote to float.
                if value.ends_with(['h', 'H']) {
                    let mut value = value;
                    value.pop();
                    value.push('f');
                    program.exprs[expr].kind = ExprKind::Literal {
                        value,
                        data_type: DataType::Float,
                    };
                    program.reset_expr_type(expr);
                }
                Ok(())
            }

            ExprKind::Cast { target, expr: sub } => {
                if self.convert_cast_to_struct(program, expr, &target, sub)? {
                    // Visit the freshly built constructor arguments.
                    let args = match &program.exprs[expr].kind {
                        ExprKind::Call(call) => call.arguments.clone(),
                        _ => Vec::new(),
                    };
                    for arg in args {
                        self.visit_expr(program, arg)?;
                    }
                    Ok(())
                } else {
                    self.visit_expr(program, sub)
                }
            }

            ExprKind::Call(call) => self.visit_call_expr(program, expr, call),

            ExprKind::Object(object) => self.visit_object_expr(program, expr, object),

            ExprKind::Binary { lhs, rhs, .. } => {
                self.visit_expr(program, lhs)?;
                self.visit_expr(program, rhs)
            }
            ExprKind::Unary { expr: sub, .. }
            | ExprKind::PostUnary { expr: sub, .. }
            | ExprKind::Bracket { expr: sub } => self.visit_expr(program, sub),
            ExprKind::Ternary {
                condition,
                then_expr,
                else_expr,
            } => {
                self.visit_expr(program, condition)?;
                self.visit_expr(program, then_expr)?;
                self.visit_expr(program, else_expr)
            }
            ExprKind::Array { prefix, indices } => {
                self.visit_expr(program, prefix)?;
                for index in indices {
                    self.visit_expr(program, index)?;
                }
                Ok(())
            }
            ExprKind::Assign { lvalue, value, .. } => {
                self.visit_expr(program, lvalue)?;
                self.visit_expr(program, value)
            }
            ExprKind::Initializer { exprs } => {
                for sub in exprs {
                    self.visit_expr(program, sub)?;
                }
                Ok(())
            }
            ExprKind::StateInitializer { .. } => Ok(()),
        }
    }

    /// Expands `(S)literal` into the constructor `S(literal, ..., literal)`
    /// with one copy per direct member. Returns `true` when converted.
    fn convert_cast_to_struct(
        &mut self,
        program: &mut Program,
        expr: Handle<Expr>,
        target: &TypeDenoter,
        sub: Handle<Expr>,
    ) -> Result<bool, ConvertError> {
        let Some(struct_td) = target.as_struct() else {
            return Ok(false);
        };
        let Some(decl) = struct_td.decl else {
            return Ok(false);
        };
        if !matches!(program.exprs[sub].kind, ExprKind::Literal { .. }) {
            return Ok(false);
        }

        let member_types = program.collect_member_type_denoters(decl);
        let mut arguments = Vec::with_capacity(member_types.len());
        for member_ty in member_types {
            let literal = program.exprs[sub].clone();
            let literal = program.exprs.append(literal);
            arguments.push(program.add_expr(ExprKind::Cast {
                target: member_ty,
                expr: literal,
            }));
        }

        program.exprs[expr].kind = ExprKind::Call(CallExpr {
            type_ctor: Some(target.clone()),
            arguments,
            ..CallExpr::default()
        });
        program.reset_expr_type(expr);
        Ok(true)
    }

    fn visit_call_expr(
        &mut self,
        program: &mut Program,
        expr: Handle<Expr>,
        mut call: CallExpr,
    ) -> Result<(), ConvertError> {
        if let Some(prefix) = call.prefix {
            self.visit_expr(program, prefix)?;
        }

        if let Some(intrinsic) = call.intrinsic {
            // Texture method calls carry the texture object as prefix; GLSL
            // wants it as the first argument, VKSL as a combined
            // texture/sampler binding.
            if is_texture_intrinsic(intrinsic) {
                if let Some(prefix) = call.prefix {
                    if self.is_vksl {
                        if let Some(&arg0) = call.arguments.first() {
                            if program.type_of(arg0).is_sampler_state() {
                                call.arguments[0] =
                                    make_texture_sampler_binding_call(program, prefix, arg0);
                            }
                        }
                    } else if call.arguments.first() != Some(&prefix) {
                        call.arguments.insert(0, prefix);
                    }
                }
            }
        }

        if !self.is_vksl {
            // Sampler-state arguments have no GLSL counterpart.
            let mut kept = Vec::with_capacity(call.arguments.len());
            for &arg in &call.arguments {
                if program.type_of(arg).is_sampler_state() {
                    program.exprs.disable(arg);
                } else {
                    kept.push(arg);
                }
            }
            call.arguments = kept;
        }

        program.exprs[expr].kind = ExprKind::Call(call.clone());

        if call.intrinsic.is_some() {
            self.convert_intrinsic_call(program, expr)?;
        } else {
            self.convert_function_call(program, expr)?;
        }

        let arguments = match &program.exprs[expr].kind {
            ExprKind::Call(call) => call.arguments.clone(),
            _ => Vec::new(),
        };
        for arg in arguments {
            self.visit_expr(program, arg)?;
        }
        Ok(())
    }

    fn convert_intrinsic_call(
        &mut self,
        program: &mut Program,
        expr: Handle<Expr>,
    ) -> Result<(), ConvertError> {
        let ExprKind::Call(call) = program.exprs[expr].kind.clone() else {
            return Ok(());
        };
        match call.intrinsic {
            Some(Intrinsic::Saturate) => self.convert_intrinsic_saturate(program, expr, call),
            Some(
                Intrinsic::TextureSample2
                | Intrinsic::TextureSample3
                | Intrinsic::TextureSample4
                | Intrinsic::TextureSample5,
            ) => {
                self.convert_intrinsic_texture_sample(program, call, 2);
                Ok(())
            }
            Some(
                Intrinsic::TextureSampleLevel3
                | Intrinsic::TextureSampleLevel4
                | Intrinsic::TextureSampleLevel5,
            ) => {
                self.convert_intrinsic_texture_sample(program, call, 3);
                Ok(())
            }
            Some(intrinsic) if slx_ast::intrinsic::is_interlocked_intrinsic(intrinsic) => {
                self.convert_intrinsic_image_atomic(program, expr, call);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// `saturate(x)` becomes `clamp(x, T(0), T(1))` with `T` the type of `x`.
    fn convert_intrinsic_saturate(
        &mut self,
        program: &mut Program,
        expr: Handle<Expr>,
        mut call: CallExpr,
    ) -> Result<(), ConvertError> {
        let area = program.exprs[expr].area;
        if call.arguments.len() != 1 {
            return Err(ConvertError::InvalidIntrinsicArgCount {
                name: "saturate",
                area,
            });
        }

        let arg_ty = program.type_of(call.arguments[0]);
        if !arg_ty.is_base() {
            return Err(ConvertError::InvalidIntrinsicArgType {
                name: "saturate",
                area,
            });
        }

        call.intrinsic = Some(Intrinsic::Clamp);
        for bound in ["0", "1"] {
            let literal = program.add_expr(ExprKind::literal(bound, DataType::Int));
            call.arguments.push(program.add_expr(ExprKind::Cast {
                target: arg_ty.clone(),
                expr: literal,
            }));
        }
        program.exprs[expr].kind = ExprKind::Call(call);
        program.reset_expr_type(expr);
        Ok(())
    }

    /// Coerces the location (and offset) arguments of a sample intrinsic to
    /// the vector size implied by the texture kind.
    fn convert_intrinsic_texture_sample(
        &mut self,
        program: &mut Program,
        call: CallExpr,
        offset_index: usize,
    ) {
        let Some(dim) = call
            .prefix
            .and_then(|p| program.fetch_buffer_decl(p))
            .map(|b| buffer_type_texture_dim(program.buffer_decls[b].ty.buffer_type))
            .filter(|&d| d > 0)
        else {
            return;
        };

        if call.arguments.len() >= 2 {
            convert_expr_if_cast_required(
                program,
                call.arguments[1],
                vector_data_type(DataType::Float, dim),
                true,
            );
        }
        if call.arguments.len() > offset_index {
            convert_expr_if_cast_required(
                program,
                call.arguments[offset_index],
                vector_data_type(DataType::Int, dim),
                true,
            );
        }
    }

    /// Remaps `Interlocked*` intrinsics whose destination is a read/write
    /// texture to the corresponding `imageAtomic*` form, promoting the
    /// subscript into an explicit coordinate argument.
    fn convert_intrinsic_image_atomic(
        &mut self,
        program: &mut Program,
        expr: Handle<Expr>,
        mut call: CallExpr,
    ) {
        if call.arguments.len() < 2 {
            return;
        }
        let intrinsic = match call.intrinsic {
            Some(i) => i,
            None => return,
        };

        let arg0 = call.arguments[0];
        if let ExprKind::Array { prefix, indices } = program.exprs[arg0].kind.clone() {
            let is_rw_texture = program
                .type_of(prefix)
                .as_buffer()
                .is_some_and(|b| is_rw_texture_buffer_type(b.buffer_type));
            if !is_rw_texture {
                return;
            }

            call.intrinsic =
                Some(slx_ast::intrinsic::interlocked_to_image_atomic_intrinsic(intrinsic));

            // Promote the last subscript into the coordinate argument.
            let mut indices = indices;
            if let Some(coordinate) = indices.pop() {
                call.arguments.insert(1, coordinate);
            }
            if indices.is_empty() {
                call.arguments[0] = prefix;
            } else if let ExprKind::Array { indices: dst, .. } = &mut program.exprs[arg0].kind {
                *dst = indices;
            }

            program.exprs[expr].kind = ExprKind::Call(call);
            program.reset_expr_type(expr);
        } else {
            let is_rw_texture = program
                .type_of(arg0)
                .as_buffer()
                .is_some_and(|b| is_rw_texture_buffer_type(b.buffer_type));
            if is_rw_texture {
                call.intrinsic =
                    Some(slx_ast::intrinsic::interlocked_to_image_atomic_intrinsic(intrinsic));
                program.exprs[expr].kind = ExprKind::Call(call);
                program.reset_expr_type(expr);
            }
        }
    }

    /// Member-function calls flatten to global calls: static calls drop
    /// their prefix, instance calls take the object (or the enclosing
    /// `self`) as their first argument.
    fn convert_function_call(
        &mut self,
        program: &mut Program,
        expr: Handle<Expr>,
    ) -> Result<(), ConvertError> {
        let ExprKind::Call(mut call) = program.exprs[expr].kind.clone() else {
            return Ok(());
        };
        let Some(function) = call.function else {
            return Ok(());
        };
        if !program.function_decls[function].is_member() {
            return Ok(());
        }

        if program.function_decls[function].is_static() {
            call.prefix = None;
        } else if let Some(prefix) = call.prefix.take() {
            call.arguments.insert(0, prefix);
        } else if let Some(&self_param) = self.self_param_stack.last() {
            let ident = program.var_decls[self_param].ident.clone();
            let object =
                program.add_expr(ExprKind::object(ident, Some(SymbolRef::Var(self_param))));
            call.arguments.insert(0, object);
        } else {
            return Err(ConvertError::MissingSelfParam {
                function: program.function_decls[function].ident.clone(),
                area: program.exprs[expr].area,
            });
        }

        program.exprs[expr].kind = ExprKind::Call(call);
        Ok(())
    }

    fn visit_object_expr(
        &mut self,
        program: &mut Program,
        expr: Handle<Expr>,
        object: ObjectExpr,
    ) -> Result<(), ConvertError> {
        if let Some(prefix) = object.prefix {
            self.convert_entry_point_struct_prefix(program, expr, prefix);
            if let ExprKind::Object(object) = &program.exprs[expr].kind {
                if let Some(prefix) = object.prefix {
                    return self.visit_expr(program, prefix);
                }
            }
            return Ok(());
        }

        // A bare reference to a member of the enclosing struct becomes
        // `self.<member>`.
        let (Some(&self_param), Some(&active_struct)) =
            (self.self_param_stack.last(), self.struct_stack.last())
        else {
            return Ok(());
        };
        let Some(SymbolRef::Var(var)) = object.symbol else {
            return Ok(());
        };
        if var == self_param {
            return Ok(());
        }
        let Some(owner) = program.var_decls[var].struct_ref else {
            return Ok(());
        };
        if owner == active_struct || program.struct_is_base_of(owner, active_struct) {
            let ident = program.var_decls[self_param].ident.clone();
            let prefix =
                program.add_expr(ExprKind::object(ident, Some(SymbolRef::Var(self_param))));
            if let ExprKind::Object(object) = &mut program.exprs[expr].kind {
                object.prefix = Some(prefix);
            }
            program.reset_expr_type(expr);
        }
        Ok(())
    }

    /// Handles object prefixes that denote entry-point struct instances:
    /// non-entry-point parameter structs mark the access immutable; global
    /// entry-point I/O variables lose the prefix entirely.
    fn convert_entry_point_struct_prefix(
        &mut self,
        program: &mut Program,
        object_expr: Handle<Expr>,
        prefix: Handle<Expr>,
    ) {
        let prefix = program.fetch_non_bracket(prefix);
        match program.exprs[prefix].kind.clone() {
            ExprKind::Object(prefix_object) => {
                let Some(SymbolRef::Var(var)) = prefix_object.symbol else {
                    return;
                };
                let var_ty = program.var_decls[var].ty.clone();
                let Some(struct_td) = var_ty.as_struct() else {
                    return;
                };

                if self.mark_immutable_for_nep_struct(program, object_expr, struct_td.decl) {
                    return;
                }

                let own_var = match &program.exprs[object_expr].kind {
                    ExprKind::Object(object) => match object.symbol {
                        Some(SymbolRef::Var(v)) => Some(v),
                        _ => None,
                    },
                    _ => None,
                };
                if own_var.is_some_and(|v| self.is_global_in_out_var(program, v)) {
                    if let ExprKind::Object(object) = &mut program.exprs[object_expr].kind {
                        object.prefix = None;
                    }
                    program.reset_expr_type(object_expr);
                }
            }
            ExprKind::Array {
                prefix: array_prefix,
                ..
            } => {
                let Some(var) = program.fetch_var_decl(array_prefix) else {
                    return;
                };
                let var_ty = program.var_decls[var].ty.clone();
                let Some(array) = var_ty.as_array() else {
                    return;
                };
                if let Some(struct_td) = array.base.as_struct() {
                    self.mark_immutable_for_nep_struct(program, object_expr, struct_td.decl);
                }
            }
            _ => {}
        }
    }

    fn mark_immutable_for_nep_struct(
        &mut self,
        program: &mut Program,
        object_expr: Handle<Expr>,
        struct_decl: Option<Handle<StructDecl>>,
    ) -> bool {
        let Some(decl) = struct_decl else {
            return false;
        };
        if program.struct_decls[decl]
            .flags
            .contains(AstFlags::NON_ENTRY_POINT_PARAM)
        {
            program.exprs[object_expr].flags |= AstFlags::IMMUTABLE;
            true
        } else {
            false
        }
    }

    fn is_global_in_out_var(&self, program: &Program, var: Handle<VarDecl>) -> bool {
        let Some(entry_point) = program.entry_point else {
            return false;
        };
        let decl = &program.function_decls[entry_point];
        decl.input_semantics.contains(var) || decl.output_semantics.contains(var)
    }
}

/// Builds the combined texture/sampler binding call VKSL uses in place of a
/// separate sampler-state argument.
fn make_texture_sampler_binding_call(
    program: &mut Program,
    texture: Handle<Expr>,
    sampler: Handle<Expr>,
) -> Handle<Expr> {
    let sampler_type = program
        .fetch_buffer_decl(texture)
        .and_then(|b| texture_type_to_sampler_type(program.buffer_decls[b].ty.buffer_type))
        .unwrap_or(SamplerType::Sampler2D);

    program.add_expr(ExprKind::Call(CallExpr {
        type_ctor: Some(TypeDenoter::Sampler(SamplerTypeDenoter { sampler_type })),
        arguments: vec![texture, sampler],
        ..CallExpr::default()
    }))
}

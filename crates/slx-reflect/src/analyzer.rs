//! The reflection analyzer: a read-only traversal over the program that
//! populates a [`ReflectionData`] record.

use slx_ast::{
    DefaultValue, ExtModifiers, FunctionDecl, Handle, Program, Register, ShaderTarget, StateType,
    Stmt, StmtKind, TypeDenoter, TypeSpecifier, Variant, VarDecl, evaluate_or_default,
    types::is_storage_buffer_type,
};

use crate::data::{
    BindingSlot, FunctionReflection, Parameter, ParameterFlags, ReflectionData, SamplerState,
    Uniform, UniformFlags, UniformKind, buffer_type_index, data_type_index, var_type_from_denoter,
};
use crate::error::{Report, Reporter};
use crate::state;

/// Reflects a program's external contract.
///
/// The traversal covers all live top-level statements and the disabled
/// bucket; it never mutates the program and never aborts on a field-level
/// failure.
pub struct ReflectionAnalyzer<'a> {
    program: &'a Program,
    target: ShaderTarget,
    data: ReflectionData,
    reporter: Reporter,
}

impl<'a> ReflectionAnalyzer<'a> {
    /// Runs reflection over `program` for the given shader target.
    pub fn reflect(
        program: &'a Program,
        target: ShaderTarget,
        enable_warnings: bool,
    ) -> (ReflectionData, Vec<Report>) {
        let mut analyzer = Self {
            program,
            target,
            data: ReflectionData::default(),
            reporter: Reporter::new(enable_warnings),
        };

        for &stmt in &program.global_stmts {
            analyzer.visit_stmt(stmt);
        }
        for &stmt in program.stmts.disabled() {
            analyzer.visit_stmt(stmt);
        }

        analyzer.reflect_entry_point_attributes();

        (analyzer.data, analyzer.reporter.into_reports())
    }

    fn binding_point(&self, registers: &[Register]) -> i32 {
        Register::for_target(registers, self.target)
            .map(|r| r.slot)
            .unwrap_or(-1)
    }

    fn eval_int(&self, expr: slx_ast::Handle<slx_ast::Expr>) -> i32 {
        evaluate_or_default(self.program, expr, Variant::Int(0)).to_int() as i32
    }

    /* ----- Entry point ----- */

    fn reflect_entry_point_attributes(&mut self) {
        let Some(entry_point) = self.program.entry_point else {
            return;
        };
        let decl = &self.program.function_decls[entry_point];

        for &var in &decl.input_semantics.var_decl_refs {
            self.data
                .input_attributes
                .push(self.user_attribute_slot(var));
        }
        for &var in &decl.input_semantics.var_decl_refs_sv {
            self.data
                .input_attributes
                .push(self.system_attribute_slot(var));
        }

        for &var in &decl.output_semantics.var_decl_refs {
            self.data
                .output_attributes
                .push(self.user_attribute_slot(var));
        }
        for &var in &decl.output_semantics.var_decl_refs_sv {
            self.data
                .output_attributes
                .push(self.system_attribute_slot(var));
        }

        // A system-value return semantic (e.g. a fragment output) is an
        // output attribute as well.
        if decl.semantic.is_system_value() {
            self.data.output_attributes.push(BindingSlot::new(
                decl.semantic.to_string(),
                decl.semantic.index(),
            ));
        }
    }

    fn user_attribute_slot(&self, var: Handle<VarDecl>) -> BindingSlot {
        let decl = &self.program.var_decls[var];
        BindingSlot::new(decl.ident.clone(), decl.semantic.index())
    }

    fn system_attribute_slot(&self, var: Handle<VarDecl>) -> BindingSlot {
        let decl = &self.program.var_decls[var];
        BindingSlot::new(decl.semantic.to_string(), decl.semantic.index())
    }

    /* ----- Statement dispatch ----- */

    fn visit_stmt(&mut self, stmt: Handle<Stmt>) {
        match &self.program.stmts[stmt].kind {
            StmtKind::SamplerDeclStmt { decls } => {
                for &decl in decls {
                    self.reflect_sampler_decl(decl);
                }
            }
            StmtKind::StateDeclStmt { decl } => self.reflect_state_decl(*decl),
            StmtKind::FunctionDeclStmt { decl } => self.reflect_function_decl(*decl),
            StmtKind::StructDeclStmt { decl } => {
                // Member functions are part of the program's function set.
                for &function in &self.program.struct_decls[*decl].functions {
                    self.reflect_function_decl(function);
                }
            }
            StmtKind::UniformBufferDeclStmt { decl } => self.reflect_uniform_buffer_decl(*decl),
            StmtKind::BufferDeclStmt { decls } => {
                for &decl in decls {
                    self.reflect_buffer_decl(decl);
                }
            }
            _ => {}
        }
    }

    /* ----- Samplers ----- */

    fn reflect_sampler_decl(&mut self, decl: Handle<slx_ast::SamplerDecl>) {
        let sampler = &self.program.sampler_decls[decl];

        let mut sampler_state = SamplerState::default();
        for value in &sampler.values {
            state::reflect_sampler_value(self.program, &mut self.reporter, value, &mut sampler_state);
            sampler_state.is_non_default = true;
        }
        sampler_state.alias = sampler.alias.clone();

        self.data
            .sampler_states
            .insert(sampler.ident.clone(), sampler_state);

        self.data
            .uniforms
            .push(Uniform::new(sampler.ident.clone(), UniformKind::Sampler));
    }

    /* ----- Pipeline states ----- */

    fn reflect_state_decl(&mut self, decl: Handle<slx_ast::StateDecl>) {
        let state_decl = &self.program.state_decls[decl];
        let Some(initializer) = state_decl.initializer else {
            return;
        };
        let fields = match &self.program.exprs[initializer].kind {
            slx_ast::ExprKind::StateInitializer { fields } => fields,
            _ => return,
        };

        match state_decl.state_type {
            StateType::Rasterizer => {
                for field in fields {
                    state::reflect_rasterizer_value(
                        self.program,
                        &mut self.reporter,
                        field,
                        &mut self.data.rasterizer_state,
                    );
                }
            }
            StateType::Depth => {
                for field in fields {
                    state::reflect_depth_value(
                        self.program,
                        &mut self.reporter,
                        field,
                        &mut self.data.depth_state,
                    );
                }
            }
            StateType::Stencil => {
                for field in fields {
                    state::reflect_stencil_value(
                        self.program,
                        &mut self.reporter,
                        field,
                        &mut self.data.stencil_state,
                    );
                }
            }
            StateType::Blend => {
                let mut target_index = 0;
                for field in fields {
                    state::reflect_blend_value(
                        self.program,
                        &mut self.reporter,
                        field,
                        &mut self.data.blend_state,
                        &mut target_index,
                    );
                }
            }
            StateType::Options => {
                for field in fields {
                    state::reflect_options_value(
                        self.program,
                        &mut self.reporter,
                        field,
                        &mut self.data.global_options,
                    );
                }
            }
        }
    }

    /* ----- Functions ----- */

    fn reflect_function_decl(&mut self, decl: Handle<FunctionDecl>) {
        let function = &self.program.function_decls[decl];

        if function.is_entry_point() {
            self.reflect_attributes(decl);
        }

        let mut reflection = FunctionReflection {
            ident: function.ident.clone(),
            return_type: var_type_from_denoter(&function.return_type.denoter),
            parameters: Vec::new(),
        };

        for &param in &function.parameters {
            let StmtKind::VarDeclStmt { type_spec, decls } = &self.program.stmts[param].kind else {
                continue;
            };
            let Some(&var) = decls.first() else {
                continue;
            };

            let mut flags = ParameterFlags::EMPTY;
            if type_spec.is_input {
                flags |= ParameterFlags::IN;
            }
            if type_spec.is_output {
                flags |= ParameterFlags::OUT;
            }

            reflection.parameters.push(Parameter {
                ident: self.program.var_decls[var].ident.clone(),
                var_type: var_type_from_denoter(&type_spec.denoter),
                flags,
            });
        }

        self.data.functions.push(reflection);
    }

    fn reflect_attributes(&mut self, decl: Handle<FunctionDecl>) {
        let function = &self.program.function_decls[decl];
        for attrib in &function.attribs {
            if attrib.attribute_type == slx_ast::AttributeType::NumThreads
                && self.target == ShaderTarget::ComputeShader
                && attrib.arguments.len() == 3
            {
                self.data.num_threads.x = self.eval_int(attrib.arguments[0]);
                self.data.num_threads.y = self.eval_int(attrib.arguments[1]);
                self.data.num_threads.z = self.eval_int(attrib.arguments[2]);
            }
        }
    }

    /* ----- Uniform buffers ----- */

    fn reflect_uniform_buffer_decl(&mut self, decl: Handle<slx_ast::UniformBufferDecl>) {
        let buffer = &self.program.uniform_buffer_decls[decl];

        self.data.constant_buffers.push(BindingSlot::new(
            buffer.ident.clone(),
            self.binding_point(&buffer.slot_registers),
        ));
        let block_index = self.data.constant_buffers.len() as i32 - 1;

        let mut uniform = Uniform::new(buffer.ident.clone(), UniformKind::UniformBuffer);
        if buffer.ext_modifiers.contains(ExtModifiers::INTERNAL) {
            uniform.flags |= UniformFlags::INTERNAL;
        }
        self.data.uniforms.push(uniform);

        for &member in &buffer.members {
            let StmtKind::VarDeclStmt { type_spec, decls } = &self.program.stmts[member].kind
            else {
                continue;
            };

            let (kind, base_type) = classify_member(type_spec);
            // Modifier flags, sprite-UV refs, and default values exist only
            // on base-typed members; array/buffer/unresolved members are
            // classified `Variable` but carry none of them.
            let is_base_member = matches!(type_spec.denoter.aliased(), TypeDenoter::Base(_));

            for &var in decls {
                let var_decl = &self.program.var_decls[var];

                let mut uniform = Uniform::new(var_decl.ident.clone(), kind);
                uniform.base_type = base_type;
                uniform.uniform_block = block_index;

                if is_base_member {
                    if type_spec.ext_modifiers.contains(ExtModifiers::INTERNAL) {
                        uniform.flags |= UniformFlags::INTERNAL;
                    }
                    if type_spec.ext_modifiers.contains(ExtModifiers::COLOR) {
                        uniform.flags |= UniformFlags::COLOR;
                    }
                    if let Some(sprite_uv) = &type_spec.sprite_uv_ref {
                        uniform.sprite_uv_ref = sprite_uv.clone();
                    }
                    if let Some(default_value) = var_decl.default_value {
                        uniform.default_value = self.push_default_value(default_value);
                    }
                }

                self.data.uniforms.push(uniform);
            }
        }
    }

    fn push_default_value(&mut self, value: DefaultValue) -> i32 {
        self.data.default_values.push(value);
        self.data.default_values.len() as i32 - 1
    }

    /* ----- Buffers ----- */

    fn reflect_buffer_decl(&mut self, decl: Handle<slx_ast::BufferDecl>) {
        let buffer = &self.program.buffer_decls[decl];

        let slot = BindingSlot::new(
            buffer.ident.clone(),
            self.binding_point(&buffer.slot_registers),
        );
        if is_storage_buffer_type(buffer.ty.buffer_type) {
            self.data.storage_buffers.push(slot);
        } else {
            self.data.textures.push(slot);
        }

        let mut uniform = Uniform::new(buffer.ident.clone(), UniformKind::Buffer);
        uniform.base_type = buffer_type_index(buffer.ty.buffer_type);

        if buffer.ext_modifiers.contains(ExtModifiers::INTERNAL) {
            uniform.flags |= UniformFlags::INTERNAL;
        }
        if buffer.ext_modifiers.contains(ExtModifiers::COLOR) {
            uniform.flags |= UniformFlags::COLOR;
        }
        if let Some(handle) = buffer.default_value {
            uniform.default_value = self.push_default_value(DefaultValue::Handle(handle));
        }

        self.data.uniforms.push(uniform);
    }
}

/// Classifies a uniform-buffer member as a nested struct or a plain
/// variable, yielding the reflected base-type index.
fn classify_member(type_spec: &TypeSpecifier) -> (UniformKind, i32) {
    match type_spec.denoter.aliased() {
        TypeDenoter::Struct(_) => (UniformKind::Struct, 0),
        TypeDenoter::Base(data_type) => (UniformKind::Variable, data_type_index(*data_type)),
        _ => (UniformKind::Variable, 0),
    }
}

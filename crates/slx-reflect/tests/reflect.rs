//! Integration tests: reflect programmatically built programs and check the
//! record and its text dump.

use slx_ast::*;
use slx_reflect::*;

fn keyword(program: &mut Program, name: &str) -> Handle<Expr> {
    program.add_expr(ExprKind::object(name, None))
}

fn int_literal(program: &mut Program, value: &str) -> Handle<Expr> {
    program.add_expr(ExprKind::literal(value, DataType::Int))
}

fn bool_literal(program: &mut Program, value: bool) -> Handle<Expr> {
    program.add_expr(ExprKind::literal(if value { "true" } else { "false" }, DataType::Bool))
}

fn state_block(program: &mut Program, fields: Vec<StateValue>) -> Handle<Expr> {
    program.add_expr(ExprKind::StateInitializer { fields })
}

fn push_state_decl(program: &mut Program, state_type: StateType, initializer: Handle<Expr>) {
    let decl = program.state_decls.append(StateDecl {
        ident: String::new(),
        state_type,
        initializer: Some(initializer),
        flags: AstFlags::EMPTY,
        area: SourceArea::IGNORE,
    });
    let stmt = program.add_stmt(StmtKind::StateDeclStmt { decl });
    program.global_stmts.push(stmt);
}

#[test]
fn sampler_state_reflection() {
    let mut program = Program::new();

    let mut sampler = SamplerDecl::new("gDepthSamp", SamplerType::SamplerState);
    let filter = keyword(&mut program, "point");
    sampler.values.push(StateValue::new("Filter", filter));
    let address = keyword(&mut program, "clamp");
    sampler.values.push(StateValue::new("AddressU", address));
    let aniso = int_literal(&mut program, "8");
    sampler.values.push(StateValue::new("MaxAnisotropy", aniso));

    // BorderColor = float4(0.1, 0.2, 0.3, 1.0)
    let components: Vec<_> = ["0.1", "0.2", "0.3", "1.0"]
        .iter()
        .map(|v| program.add_expr(ExprKind::literal(*v, DataType::Float)))
        .collect();
    let border = program.add_expr(ExprKind::Call(CallExpr {
        type_ctor: Some(TypeDenoter::Base(DataType::Float4)),
        arguments: components,
        ..CallExpr::default()
    }));
    sampler.values.push(StateValue::new("BorderColor", border));

    let decl = program.sampler_decls.append(sampler);
    let stmt = program.add_stmt(StmtKind::SamplerDeclStmt { decls: vec![decl] });
    program.global_stmts.push(stmt);

    let (data, reports) = reflect(&program, ShaderTarget::FragmentShader, true);
    assert!(reports.is_empty(), "unexpected reports: {reports:?}");

    let state = &data.sampler_states["gDepthSamp"];
    assert!(state.is_non_default);
    assert_eq!(state.filter_min, Filter::Point);
    assert_eq!(state.filter_mip, Filter::Point);
    assert_eq!(state.address_u, TextureAddressMode::Clamp);
    assert_eq!(state.address_v, TextureAddressMode::Wrap);
    assert_eq!(state.max_anisotropy, 8);
    assert_eq!(state.border_color, [0.1, 0.2, 0.3, 1.0]);

    // The sampler also shows up as an opaque uniform.
    assert!(
        data.uniforms
            .iter()
            .any(|u| u.ident == "gDepthSamp" && u.kind == UniformKind::Sampler)
    );
}

#[test]
fn border_color_scalar_cast_broadcasts() {
    let mut program = Program::new();

    let mut sampler = SamplerDecl::new("samp", SamplerType::SamplerState);
    let half = program.add_expr(ExprKind::literal("0.5", DataType::Float));
    let cast = program.add_expr(ExprKind::Cast {
        target: TypeDenoter::Base(DataType::Float4),
        expr: half,
    });
    sampler.values.push(StateValue::new("BorderColor", cast));
    let decl = program.sampler_decls.append(sampler);
    let stmt = program.add_stmt(StmtKind::SamplerDeclStmt { decls: vec![decl] });
    program.global_stmts.push(stmt);

    let (data, _) = reflect(&program, ShaderTarget::FragmentShader, true);
    assert_eq!(data.sampler_states["samp"].border_color, [0.5; 4]);
}

#[test]
fn unknown_sampler_keyword_maps_warn() {
    let mut program = Program::new();

    let mut sampler = SamplerDecl::new("samp", SamplerType::SamplerState);
    let bogus = keyword(&mut program, "bilinear");
    sampler.values.push(StateValue::new("Filter", bogus));
    let decl = program.sampler_decls.append(sampler);
    let stmt = program.add_stmt(StmtKind::SamplerDeclStmt { decls: vec![decl] });
    program.global_stmts.push(stmt);

    let (data, reports) = reflect(&program, ShaderTarget::FragmentShader, true);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].severity, Severity::Warning);
    // The default stands.
    assert_eq!(data.sampler_states["samp"].filter_min, Filter::Linear);
}

#[test]
fn rasterizer_and_depth_states() {
    let mut program = Program::new();

    let scissor = bool_literal(&mut program, true);
    let cull = keyword(&mut program, "cw");
    let raster = state_block(
        &mut program,
        vec![
            StateValue::new("scissor", scissor),
            StateValue::new("cull", cull),
        ],
    );
    push_state_decl(&mut program, StateType::Rasterizer, raster);

    let write = bool_literal(&mut program, false);
    let compare = keyword(&mut program, "lte");
    let bias = program.add_expr(ExprKind::literal("0.5", DataType::Float));
    let depth = state_block(
        &mut program,
        vec![
            StateValue::new("write", write),
            StateValue::new("compare", compare),
            StateValue::new("bias", bias),
        ],
    );
    push_state_decl(&mut program, StateType::Depth, depth);

    let (data, reports) = reflect(&program, ShaderTarget::FragmentShader, true);
    assert!(reports.is_empty());
    assert!(data.rasterizer_state.scissor_enable);
    assert_eq!(data.rasterizer_state.cull_mode, CullMode::Clockwise);
    assert!(!data.depth_state.write_enable);
    assert_eq!(data.depth_state.compare_func, ComparisonFunc::LessEqual);
    assert_eq!(data.depth_state.depth_bias, 0.5);
}

#[test]
fn stencil_state_with_face_blocks() {
    let mut program = Program::new();

    let enabled = bool_literal(&mut program, true);
    let reference = int_literal(&mut program, "3");
    let fail = keyword(&mut program, "incrwrap");
    let compare = keyword(&mut program, "never");
    let front = state_block(
        &mut program,
        vec![
            StateValue::new("fail", fail),
            StateValue::new("compare", compare),
        ],
    );
    let stencil = state_block(
        &mut program,
        vec![
            StateValue::new("enabled", enabled),
            StateValue::new("reference", reference),
            StateValue::new("front", front),
        ],
    );
    push_state_decl(&mut program, StateType::Stencil, stencil);

    let (data, reports) = reflect(&program, ShaderTarget::FragmentShader, true);
    assert!(reports.is_empty());
    assert!(data.stencil_state.enabled);
    assert_eq!(data.stencil_state.reference, 3);
    assert_eq!(data.stencil_state.front.fail, StencilOpType::IncrementWrap);
    assert_eq!(data.stencil_state.front.compare_func, ComparisonFunc::Never);
    // The back face keeps its defaults.
    assert_eq!(data.stencil_state.back.fail, StencilOpType::Keep);
}

/// Three `target` blocks; the second carries `index = 5`. The implicit
/// counter resumes after the explicit index, so targets 0, 5, and 6 are
/// populated.
#[test]
fn blend_target_indexing_resumes_after_explicit_index() {
    let mut program = Program::new();

    let mut fields = Vec::new();
    for explicit_index in [None, Some("5"), None] {
        let enabled = bool_literal(&mut program, true);
        let mut target_fields = vec![StateValue::new("enabled", enabled)];
        if let Some(index) = explicit_index {
            let index = int_literal(&mut program, index);
            target_fields.push(StateValue::new("index", index));
        }
        let target = state_block(&mut program, target_fields);
        fields.push(StateValue::new("target", target));
    }
    let blend = state_block(&mut program, fields);
    push_state_decl(&mut program, StateType::Blend, blend);

    let (data, reports) = reflect(&program, ShaderTarget::FragmentShader, true);
    assert!(reports.is_empty());

    let enabled: Vec<usize> = data
        .blend_state
        .targets
        .iter()
        .enumerate()
        .filter(|(_, t)| t.enabled)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(enabled, vec![0, 5, 6]);
}

#[test]
fn blend_targets_past_the_cap_are_dropped() {
    let mut program = Program::new();

    let mut fields = Vec::new();
    for _ in 0..10 {
        let enabled = bool_literal(&mut program, true);
        let target = state_block(&mut program, vec![StateValue::new("enabled", enabled)]);
        fields.push(StateValue::new("target", target));
    }
    let blend = state_block(&mut program, fields);
    push_state_decl(&mut program, StateType::Blend, blend);

    let (data, reports) = reflect(&program, ShaderTarget::FragmentShader, true);
    assert!(reports.is_empty());
    assert!(data.blend_state.targets.iter().all(|t| t.enabled));
}

/// `forward` and `transparent` route to their own fields.
#[test]
fn options_forward_and_transparent_are_independent() {
    let mut program = Program::new();

    let forward = bool_literal(&mut program, true);
    let sort = keyword(&mut program, "backtofront");
    let options = state_block(
        &mut program,
        vec![
            StateValue::new("forward", forward),
            StateValue::new("sort", sort),
        ],
    );
    push_state_decl(&mut program, StateType::Options, options);

    let (data, reports) = reflect(&program, ShaderTarget::FragmentShader, true);
    assert!(reports.is_empty());
    assert!(data.global_options.forward);
    assert!(!data.global_options.transparent);
    assert_eq!(data.global_options.sort_mode, SortMode::BackToFront);
}

#[test]
fn unknown_state_keyword_is_an_error() {
    let mut program = Program::new();

    let value = bool_literal(&mut program, true);
    let raster = state_block(&mut program, vec![StateValue::new("wireframe", value)]);
    push_state_decl(&mut program, StateType::Rasterizer, raster);

    let (_, reports) = reflect(&program, ShaderTarget::FragmentShader, true);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].severity, Severity::Error);
    assert!(matches!(
        reports[0].kind,
        ReportKind::UnknownStateKeyword("rasterizer")
    ));
}

#[test]
fn buffer_bindings_split_by_storage_kind() {
    let mut program = Program::new();

    let mut texture = BufferDecl::new("albedo", BufferTypeDenoter::new(BufferType::Texture2D));
    texture.slot_registers.push(Register {
        register_type: RegisterType::TextureBuffer,
        slot: 3,
        target: Some(ShaderTarget::FragmentShader),
    });
    let texture = program.buffer_decls.append(texture);

    let storage = BufferDecl::new(
        "particles",
        BufferTypeDenoter::with_generic(
            BufferType::RWStructuredBuffer,
            TypeDenoter::Base(DataType::Float4),
        ),
    );
    let storage = program.buffer_decls.append(storage);

    let stmt = program.add_stmt(StmtKind::BufferDeclStmt {
        decls: vec![texture, storage],
    });
    program.global_stmts.push(stmt);

    let (data, _) = reflect(&program, ShaderTarget::FragmentShader, true);
    assert_eq!(data.textures, vec![BindingSlot::new("albedo", 3)]);
    assert_eq!(data.storage_buffers, vec![BindingSlot::new("particles", -1)]);

    // Another stage does not see the fragment-only register.
    let (data, _) = reflect(&program, ShaderTarget::VertexShader, true);
    assert_eq!(data.textures, vec![BindingSlot::new("albedo", -1)]);

    let buffer_uniforms: Vec<_> = data
        .uniforms
        .iter()
        .filter(|u| u.kind == UniformKind::Buffer)
        .collect();
    assert_eq!(buffer_uniforms.len(), 2);
}

#[test]
fn uniform_buffer_members_and_default_values() {
    let mut program = Program::new();

    let mut tint = VarDecl::new("tint", TypeDenoter::Base(DataType::Float4));
    let mut payload = [0.0f32; 16];
    payload[..4].copy_from_slice(&[1.0, 0.5, 0.25, 1.0]);
    tint.default_value = Some(DefaultValue::Matrix(payload));
    let tint = program.var_decls.append(tint);

    let mut spec = TypeSpecifier::new(TypeDenoter::Base(DataType::Float4));
    spec.ext_modifiers |= ExtModifiers::COLOR;
    spec.sprite_uv_ref = Some("gAlbedoTex".to_string());
    let member = program.add_stmt(StmtKind::VarDeclStmt {
        type_spec: spec,
        decls: vec![tint],
    });

    let buffer = program.uniform_buffer_decls.append(UniformBufferDecl {
        ident: "Params".to_string(),
        buffer_type: UniformBufferType::ConstantBuffer,
        slot_registers: vec![Register::new(RegisterType::ConstantBuffer, 0)],
        members: vec![member],
        ext_modifiers: ExtModifiers::EMPTY,
        flags: AstFlags::EMPTY,
        area: SourceArea::IGNORE,
    });
    let stmt = program.add_stmt(StmtKind::UniformBufferDeclStmt { decl: buffer });
    program.global_stmts.push(stmt);

    let (data, _) = reflect(&program, ShaderTarget::VertexShader, true);

    assert_eq!(data.constant_buffers, vec![BindingSlot::new("Params", 0)]);

    let block = data
        .uniforms
        .iter()
        .find(|u| u.kind == UniformKind::UniformBuffer)
        .unwrap();
    assert_eq!(block.ident, "Params");

    let tint = data
        .uniforms
        .iter()
        .find(|u| u.kind == UniformKind::Variable)
        .unwrap();
    assert_eq!(tint.ident, "tint");
    assert_eq!(tint.uniform_block, 0);
    assert!(tint.flags.contains(UniformFlags::COLOR));
    assert_eq!(tint.sprite_uv_ref, "gAlbedoTex");
    assert_eq!(tint.default_value, 0);
    assert!(matches!(
        data.default_values[0],
        DefaultValue::Matrix(m) if m[0] == 1.0 && m[3] == 1.0
    ));
}

/// Array- and buffer-typed members classify as `Variable` but never pick up
/// the base-type-only extras (modifier flags, sprite UVs, default values).
#[test]
fn non_base_uniform_members_skip_variable_extras() {
    let mut program = Program::new();

    let mut weights = VarDecl::new(
        "weights",
        TypeDenoter::Array(ArrayTypeDenoter {
            base: Box::new(TypeDenoter::Base(DataType::Float4)),
            dims: vec![4],
        }),
    );
    weights.default_value = Some(DefaultValue::Matrix([0.0; 16]));
    let weights = program.var_decls.append(weights);

    let mut spec = TypeSpecifier::new(TypeDenoter::Array(ArrayTypeDenoter {
        base: Box::new(TypeDenoter::Base(DataType::Float4)),
        dims: vec![4],
    }));
    spec.ext_modifiers |= ExtModifiers::INTERNAL | ExtModifiers::COLOR;
    spec.sprite_uv_ref = Some("gAlbedoTex".to_string());
    let member = program.add_stmt(StmtKind::VarDeclStmt {
        type_spec: spec,
        decls: vec![weights],
    });

    let buffer = program.uniform_buffer_decls.append(UniformBufferDecl {
        ident: "Params".to_string(),
        buffer_type: UniformBufferType::ConstantBuffer,
        slot_registers: Vec::new(),
        members: vec![member],
        ext_modifiers: ExtModifiers::EMPTY,
        flags: AstFlags::EMPTY,
        area: SourceArea::IGNORE,
    });
    let stmt = program.add_stmt(StmtKind::UniformBufferDeclStmt { decl: buffer });
    program.global_stmts.push(stmt);

    let (data, _) = reflect(&program, ShaderTarget::VertexShader, true);

    let weights = data
        .uniforms
        .iter()
        .find(|u| u.ident == "weights")
        .unwrap();
    assert_eq!(weights.kind, UniformKind::Variable);
    assert_eq!(weights.base_type, 0);
    assert_eq!(weights.uniform_block, 0);
    assert!(!weights.flags.contains(UniformFlags::INTERNAL));
    assert!(!weights.flags.contains(UniformFlags::COLOR));
    assert!(weights.sprite_uv_ref.is_empty());
    assert_eq!(weights.default_value, -1);
    assert!(data.default_values.is_empty());
}

#[test]
fn entry_point_attributes_and_num_threads() {
    let mut program = Program::new();

    // in: float2 uv : TEXCOORD0 (user), uint3 id : SV_DispatchThreadID
    let mut uv = VarDecl::new("uv", TypeDenoter::Base(DataType::Float2));
    uv.semantic = IndexedSemantic::user_defined("TEXCOORD0");
    let uv = program.var_decls.append(uv);

    let mut id = VarDecl::new("id", TypeDenoter::Base(DataType::UInt3));
    id.semantic = IndexedSemantic::new(Semantic::DispatchThreadId, 0);
    let id = program.var_decls.append(id);

    let mut main = FunctionDecl::new("main", TypeSpecifier::new(TypeDenoter::Void));
    main.flags |= AstFlags::ENTRY_POINT;
    main.input_semantics.var_decl_refs.push(uv);
    main.input_semantics.var_decl_refs_sv.push(id);

    // [numthreads(8, 8, 2 * 2)]
    let x = int_literal(&mut program, "8");
    let y = int_literal(&mut program, "8");
    let two_a = int_literal(&mut program, "2");
    let two_b = int_literal(&mut program, "2");
    let z = program.add_expr(ExprKind::Binary {
        op: BinaryOp::Mul,
        lhs: two_a,
        rhs: two_b,
    });
    main.attribs.push(Attribute {
        attribute_type: AttributeType::NumThreads,
        arguments: vec![x, y, z],
        area: SourceArea::IGNORE,
    });

    let main = program.function_decls.append(main);
    program.entry_point = Some(main);
    let stmt = program.add_stmt(StmtKind::FunctionDeclStmt { decl: main });
    program.global_stmts.push(stmt);

    let (data, _) = reflect(&program, ShaderTarget::ComputeShader, true);

    assert_eq!(data.num_threads, NumThreads { x: 8, y: 8, z: 4 });
    assert_eq!(
        data.input_attributes,
        vec![
            BindingSlot::new("uv", 0),
            BindingSlot::new("SV_DispatchThreadID", 0),
        ]
    );

    // The function record is reflected too.
    assert_eq!(data.functions.len(), 1);
    assert_eq!(data.functions[0].ident, "main");
    assert_eq!(data.functions[0].return_type, VarType::Void);

    // A non-compute target ignores numthreads.
    let (data, _) = reflect(&program, ShaderTarget::VertexShader, true);
    assert_eq!(data.num_threads, NumThreads::default());
}

#[test]
fn printer_renders_populated_record() {
    let mut program = Program::new();

    let mut sampler = SamplerDecl::new("samp", SamplerType::SamplerState);
    let filter = keyword(&mut program, "aniso");
    sampler.values.push(StateValue::new("Filter", filter));
    let decl = program.sampler_decls.append(sampler);
    let stmt = program.add_stmt(StmtKind::SamplerDeclStmt { decls: vec![decl] });
    program.global_stmts.push(stmt);

    let (data, _) = reflect(&program, ShaderTarget::FragmentShader, true);
    let output = print_reflection(&data);

    assert!(output.contains("Sampler States:"));
    assert!(output.contains("samp"));
    assert!(output.contains("FilterMin      = aniso"));
    assert!(output.contains("Number of Threads:"));
}

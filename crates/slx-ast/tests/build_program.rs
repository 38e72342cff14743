//! Integration test: build a small shader program programmatically and
//! exercise type resolution, constant evaluation, and the disabled bucket.

use slx_ast::*;

/// Builds the skeleton of:
///
/// ```hlsl
/// struct Light { float3 color; float intensity; };
/// RWTexture2D<uint> counters;
/// float4 main(float2 uv : TEXCOORD0) : SV_Target
/// {
///     float s = 0.25 * 4.0;
///     return float4(uv, s, 1.0);
/// }
/// ```
fn build() -> (Program, Handle<Expr>, Handle<Expr>) {
    let mut program = Program::new();

    // struct Light
    let light = program.struct_decls.append(StructDecl::new("Light"));
    let color = program
        .var_decls
        .append(VarDecl::new("color", TypeDenoter::Base(DataType::Float3)));
    program.var_decls[color].struct_ref = Some(light);
    let intensity = program
        .var_decls
        .append(VarDecl::new("intensity", TypeDenoter::Base(DataType::Float)));
    program.var_decls[intensity].struct_ref = Some(light);
    let members = program.add_stmt(StmtKind::VarDeclStmt {
        type_spec: TypeSpecifier::new(TypeDenoter::Base(DataType::Float3)),
        decls: vec![color, intensity],
    });
    program.struct_decls[light].members.push(members);
    let light_stmt = program.add_stmt(StmtKind::StructDeclStmt { decl: light });
    program.global_stmts.push(light_stmt);

    // RWTexture2D<uint> counters
    let counters = program.buffer_decls.append(BufferDecl::new(
        "counters",
        BufferTypeDenoter::with_generic(BufferType::RWTexture2D, TypeDenoter::Base(DataType::UInt)),
    ));
    let counters_stmt = program.add_stmt(StmtKind::BufferDeclStmt {
        decls: vec![counters],
    });
    program.global_stmts.push(counters_stmt);

    // float s = 0.25 * 4.0;
    let quarter = program.add_expr(ExprKind::literal("0.25", DataType::Float));
    let four = program.add_expr(ExprKind::literal("4.0", DataType::Float));
    let product = program.add_expr(ExprKind::Binary {
        op: BinaryOp::Mul,
        lhs: quarter,
        rhs: four,
    });
    let s = program
        .var_decls
        .append(VarDecl::new("s", TypeDenoter::Base(DataType::Float)));
    program.var_decls[s].initializer = Some(product);
    let s_stmt = program.add_stmt(StmtKind::VarDeclStmt {
        type_spec: TypeSpecifier::new(TypeDenoter::Base(DataType::Float)),
        decls: vec![s],
    });

    // return float4(uv, s, 1.0);
    let uv = program
        .var_decls
        .append(VarDecl::new("uv", TypeDenoter::Base(DataType::Float2)));
    program.var_decls[uv].semantic = IndexedSemantic::user_defined("TEXCOORD0");
    program.var_decls[uv].flags |= AstFlags::SHADER_INPUT;

    let uv_ref = program.add_expr(ExprKind::object("uv", Some(SymbolRef::Var(uv))));
    let s_ref = program.add_expr(ExprKind::object("s", Some(SymbolRef::Var(s))));
    let one = program.add_expr(ExprKind::literal("1.0", DataType::Float));
    let ctor = program.add_expr(ExprKind::Call(CallExpr {
        type_ctor: Some(TypeDenoter::Base(DataType::Float4)),
        arguments: vec![uv_ref, s_ref, one],
        ..CallExpr::default()
    }));
    let return_stmt = program.add_stmt(StmtKind::Return { expr: Some(ctor) });

    let uv_param = program.add_stmt(StmtKind::VarDeclStmt {
        type_spec: TypeSpecifier {
            is_input: true,
            ..TypeSpecifier::new(TypeDenoter::Base(DataType::Float2))
        },
        decls: vec![uv],
    });

    let mut main = FunctionDecl::new(
        "main",
        TypeSpecifier::new(TypeDenoter::Base(DataType::Float4)),
    );
    main.flags |= AstFlags::ENTRY_POINT;
    main.semantic = IndexedSemantic::new(Semantic::Target, 0);
    main.parameters.push(uv_param);
    main.body = vec![s_stmt, return_stmt];
    main.input_semantics.var_decl_refs.push(uv);
    let main = program.function_decls.append(main);
    program.entry_point = Some(main);
    let main_stmt = program.add_stmt(StmtKind::FunctionDeclStmt { decl: main });
    program.global_stmts.push(main_stmt);

    (program, product, ctor)
}

#[test]
fn type_resolution_over_the_tree() {
    let (mut program, product, ctor) = build();

    assert_eq!(program.type_of(product), TypeDenoter::Base(DataType::Float));
    assert_eq!(program.type_of(ctor), TypeDenoter::Base(DataType::Float4));
}

#[test]
fn constant_evaluation_of_initializer() {
    let (program, product, _) = build();
    let value = evaluate_or_default(&program, product, Variant::Real(0.0));
    assert_eq!(value, Variant::Real(1.0));
}

#[test]
fn struct_member_lookup_and_bases() {
    let (program, _, _) = build();
    let light = program
        .struct_decls
        .iter()
        .find(|(_, s)| s.ident == "Light")
        .map(|(h, _)| h)
        .unwrap();

    assert_eq!(program.num_member_variables(light), 2);
    assert!(program.find_member_var(light, "intensity").is_some());
    assert!(program.find_member_var(light, "specular").is_none());

    let denoters = program.collect_member_type_denoters(light);
    assert_eq!(
        denoters,
        vec![
            TypeDenoter::Base(DataType::Float3),
            TypeDenoter::Base(DataType::Float),
        ]
    );
}

#[test]
fn buffer_subscript_resolves_generic_payload() {
    let (mut program, _, _) = build();
    let counters = program
        .buffer_decls
        .iter()
        .find(|(_, b)| b.ident == "counters")
        .map(|(h, _)| h)
        .unwrap();

    let object = program.add_expr(ExprKind::object(
        "counters",
        Some(SymbolRef::Buffer(counters)),
    ));
    let index = program.add_expr(ExprKind::literal("0", DataType::Int));
    let access = program.add_expr(ExprKind::Array {
        prefix: object,
        indices: vec![index],
    });
    assert_eq!(program.type_of(access), TypeDenoter::Base(DataType::UInt));
}

#[test]
fn disabled_nodes_keep_back_references_valid() {
    let (mut program, _, _) = build();

    // Remove the buffer declaration statement from the live tree.
    let buffer_stmt = program.global_stmts[1];
    program.global_stmts.remove(1);
    program.stmts.disable(buffer_stmt);

    // The declaration is still addressable through its handle.
    let StmtKind::BufferDeclStmt { decls } = &program.stmts[buffer_stmt].kind else {
        panic!("expected BufferDeclStmt");
    };
    let buffer = decls[0];
    assert_eq!(program.buffer_decls[buffer].ident, "counters");
}

#[test]
fn entry_point_semantics() {
    let (program, _, _) = build();
    let main = program.entry_point.unwrap();
    let decl = &program.function_decls[main];
    assert!(decl.is_entry_point());
    assert_eq!(decl.input_semantics.var_decl_refs.len(), 1);
    assert!(decl.semantic.is_system_value());
    assert_eq!(decl.semantic.to_string(), "SV_Target");
}

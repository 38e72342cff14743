//! Deterministic function-name mangling.
//!
//! Runs after the main conversion: member functions take their owning
//! struct's (possibly renamed) identifier as a prefix, and overloaded
//! identifiers are disambiguated with an index suffix. Call sites read the
//! new names through their declaration back references, so resolution is
//! unaffected.

use std::collections::HashMap;

use slx_ast::{FunctionDecl, Handle, Program};

use crate::glsl::NameMangling;

#[derive(Debug)]
pub struct FuncNameConverter {
    mangling: NameMangling,
}

impl FuncNameConverter {
    pub fn new(mangling: NameMangling) -> Self {
        Self { mangling }
    }

    pub fn convert(&self, program: &mut Program) {
        self.rename_member_functions(program);
        self.rename_overloads(program);
    }

    /// Member functions become globals named `<ns><Struct>_<ident>`.
    fn rename_member_functions(&self, program: &mut Program) {
        let functions: Vec<Handle<FunctionDecl>> = program.function_decls.handles().collect();
        for function in functions {
            if program.function_decls[function].is_entry_point() {
                continue;
            }
            let Some(struct_ref) = program.function_decls[function].struct_ref else {
                continue;
            };
            let prefix = format!(
                "{}{}_",
                self.mangling.namespace_prefix, program.struct_decls[struct_ref].ident
            );
            let decl = &mut program.function_decls[function];
            if !decl.ident.starts_with(&prefix) {
                decl.ident = format!("{}{}", prefix, decl.ident);
            }
        }
    }

    /// Overload groups take an index suffix in declaration order. The
    /// signature comparison ignores buffer generic sub-types, so overloads
    /// GLSL cannot tell apart (`Buffer<float>` vs `Buffer<int>`) count as
    /// colliding; groups whose signatures all differ keep their shared name
    /// and overload in the output.
    fn rename_overloads(&self, program: &mut Program) {
        let mut groups: HashMap<String, Vec<Handle<FunctionDecl>>> = HashMap::new();
        for (handle, decl) in program.function_decls.iter() {
            if decl.is_entry_point() {
                continue;
            }
            groups.entry(decl.ident.clone()).or_default().push(handle);
        }

        let mut groups: Vec<_> = groups.into_iter().collect();
        groups.sort_by(|a, b| a.0.cmp(&b.0));

        for (ident, members) in groups {
            let collides = members.iter().enumerate().any(|(i, &a)| {
                members[i + 1..]
                    .iter()
                    .any(|&b| program.signatures_equal(a, b))
            });
            if !collides {
                continue;
            }
            // Ambiguous overload set: every member gets a positional suffix.
            for (index, &function) in members.iter().enumerate() {
                program.function_decls[function].ident = format!("{ident}_{index}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slx_ast::{TypeDenoter, TypeSpecifier};

    fn make_function(program: &mut Program, ident: &str) -> Handle<FunctionDecl> {
        program.function_decls.append(FunctionDecl::new(
            ident,
            TypeSpecifier::new(TypeDenoter::Void),
        ))
    }

    fn add_param(program: &mut Program, function: Handle<FunctionDecl>, ty: TypeDenoter) {
        let var = program.var_decls.append(slx_ast::VarDecl::new("arg", ty.clone()));
        let stmt = program.add_stmt(slx_ast::StmtKind::VarDeclStmt {
            type_spec: TypeSpecifier::new(ty),
            decls: vec![var],
        });
        program.function_decls[function].parameters.push(stmt);
    }

    #[test]
    fn overloads_get_index_suffixes() {
        let mut program = Program::new();
        let a = make_function(&mut program, "lerp3");
        let b = make_function(&mut program, "lerp3");
        let c = make_function(&mut program, "unique");

        FuncNameConverter::new(NameMangling::default()).convert(&mut program);

        assert_eq!(program.function_decls[a].ident, "lerp3_0");
        assert_eq!(program.function_decls[b].ident, "lerp3_1");
        assert_eq!(program.function_decls[c].ident, "unique");
    }

    #[test]
    fn distinct_signatures_keep_overloading() {
        use slx_ast::{BufferType, BufferTypeDenoter, DataType};

        let mut program = Program::new();
        let by_float = make_function(&mut program, "pick");
        add_param(&mut program, by_float, TypeDenoter::Base(DataType::Float));
        let by_int = make_function(&mut program, "pick");
        add_param(&mut program, by_int, TypeDenoter::Base(DataType::Int));

        // Buffer generics are invisible to GLSL overload resolution, so
        // these two do collide.
        let by_float_buffer = make_function(&mut program, "fetch");
        add_param(
            &mut program,
            by_float_buffer,
            TypeDenoter::Buffer(BufferTypeDenoter::with_generic(
                BufferType::Buffer,
                TypeDenoter::Base(DataType::Float),
            )),
        );
        let by_int_buffer = make_function(&mut program, "fetch");
        add_param(
            &mut program,
            by_int_buffer,
            TypeDenoter::Buffer(BufferTypeDenoter::with_generic(
                BufferType::Buffer,
                TypeDenoter::Base(DataType::Int),
            )),
        );

        FuncNameConverter::new(NameMangling::default()).convert(&mut program);

        assert_eq!(program.function_decls[by_float].ident, "pick");
        assert_eq!(program.function_decls[by_int].ident, "pick");
        assert_eq!(program.function_decls[by_float_buffer].ident, "fetch_0");
        assert_eq!(program.function_decls[by_int_buffer].ident, "fetch_1");
    }

    #[test]
    fn member_functions_take_struct_prefix() {
        let mut program = Program::new();
        let light = program
            .struct_decls
            .append(slx_ast::StructDecl::new("Light"));
        let get_color = make_function(&mut program, "getColor");
        program.function_decls[get_color].struct_ref = Some(light);

        let converter = FuncNameConverter::new(NameMangling::default());
        converter.convert(&mut program);
        assert_eq!(program.function_decls[get_color].ident, "xsn_Light_getColor");

        // A second run is a no-op.
        converter.convert(&mut program);
        assert_eq!(program.function_decls[get_color].ident, "xsn_Light_getColor");
    }

    #[test]
    fn entry_point_is_exempt() {
        let mut program = Program::new();
        let main = make_function(&mut program, "main");
        let main2 = make_function(&mut program, "main");
        program.function_decls[main].flags |= slx_ast::AstFlags::ENTRY_POINT;

        FuncNameConverter::new(NameMangling::default()).convert(&mut program);

        assert_eq!(program.function_decls[main].ident, "main");
        // The non-entry-point namesake stays in a one-element group.
        assert_eq!(program.function_decls[main2].ident, "main");
    }
}

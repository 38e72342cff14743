//! GLSL/VKSL lowering for the SLX shader cross-compiler.
//!
//! Mutates a typed [`slx_ast::Program`] in place until a downstream emitter
//! can print it as GLSL or Vulkan-GLSL: expression pre-conversion, scoped
//! identifier mangling, sampler-state removal, member-function flattening,
//! intrinsic rewriting, dead-code pruning, array-initializer unrolling, and
//! the MoltenVK buffer compatibility pass.

mod error;
mod exprconv;
mod func_name;
mod glsl;
mod keywords;
mod moltenvk;
mod scope;

pub use error::ConvertError;
pub use exprconv::{ExprConvertFlags, ExprConverter, convert_expr_if_cast_required, wrap_in_cast};
pub use func_name::FuncNameConverter;
pub use glsl::{ConvertOptions, GlslConverter, NameMangling};
pub use keywords::is_reserved_glsl_keyword;
pub use moltenvk::MoltenVkConverter;

use slx_ast::Program;

/// A conversion pass over a program.
pub trait Converter {
    /// Human-readable pass name.
    fn name(&self) -> &str;

    /// Runs the pass; lowering passes abort on irrecoverable invariant
    /// violations.
    fn run(&mut self, program: &mut Program) -> Result<(), ConvertError>;
}

impl Converter for GlslConverter {
    fn name(&self) -> &str {
        "glsl-convert"
    }

    fn run(&mut self, program: &mut Program) -> Result<(), ConvertError> {
        self.convert(program)
    }
}

impl Converter for MoltenVkConverter {
    fn name(&self) -> &str {
        "moltenvk-convert"
    }

    fn run(&mut self, program: &mut Program) -> Result<(), ConvertError> {
        self.convert(program);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slx_ast::{OutputVersion, ShaderTarget};

    #[test]
    fn passes_run_in_sequence_through_the_trait() {
        let mut program = Program::new();
        let mut passes: Vec<Box<dyn Converter>> = vec![
            Box::new(GlslConverter::new(
                ShaderTarget::FragmentShader,
                NameMangling::default(),
                ConvertOptions::default(),
                OutputVersion::Vksl450,
            )),
            Box::new(MoltenVkConverter::new()),
        ];

        for pass in &mut passes {
            pass.run(&mut program).unwrap_or_else(|e| {
                panic!("pass {} failed: {e}", pass.name());
            });
        }
    }
}

//! Shader reflection for the SLX cross-compiler.
//!
//! Walks a typed [`slx_ast::Program`] and extracts its external contract
//! into a plain-data [`ReflectionData`] record: resource bindings, entry
//! point attributes, uniforms with default values, function signatures,
//! compute thread counts, and the pipeline-state blocks (rasterizer, depth,
//! stencil, blend, sampler, global options) declared through the embedded
//! state-initializer language.
//!
//! Reflection is strictly read-only and never aborts: field-level problems
//! are collected as [`Report`]s while the defaults stand.

mod analyzer;
pub mod data;
mod error;
mod printer;
mod state;

pub use analyzer::ReflectionAnalyzer;
pub use data::{
    BindingSlot, BlendFactor, BlendOpType, BlendOperation, BlendState, BlendTarget,
    ComparisonFunc, CullMode, DepthState, FillMode, Filter, FunctionReflection, GlobalOptions,
    NumThreads, Parameter, ParameterFlags, RasterizerState, ReflectionData, SamplerState,
    SortMode, StencilOpType, StencilOperation, StencilState, TextureAddressMode, Uniform,
    UniformFlags, UniformKind, VarType,
};
pub use error::{Report, ReportKind, Reporter, Severity};
pub use printer::print_reflection;

use slx_ast::{Program, ShaderTarget};

/// Reflects `program` for the given shader target, returning the record and
/// the diagnostics gathered along the way.
pub fn reflect(
    program: &Program,
    target: ShaderTarget,
    enable_warnings: bool,
) -> (ReflectionData, Vec<Report>) {
    ReflectionAnalyzer::reflect(program, target, enable_warnings)
}

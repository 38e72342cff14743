//! Interpretation of the pipeline-state initializer language.
//!
//! Every state field is a `name = value` pair; values are literals,
//! enumeration keywords, nested initializer blocks, or (for `BorderColor`)
//! constant-evaluated vector expressions. Failures are reported and the
//! default stands.

use slx_ast::{Expr, ExprKind, Handle, Program, StateValue, Variant, evaluate_or_default};

use crate::data::{
    BlendOperation, BlendState, BlendTarget, DepthState, GlobalOptions, RasterizerState,
    SamplerState, StencilOperation, StencilState,
};
use crate::error::{ReportKind, Reporter};

/// Parses a literal value, or `None` when the expression is not a literal.
fn literal_variant(program: &Program, expr: Handle<Expr>) -> Option<Variant> {
    match &program.exprs[expr].kind {
        ExprKind::Literal { value, .. } => Variant::parse(value),
        _ => None,
    }
}

/// Returns the identifier of a bare object expression, used as an
/// enumeration keyword.
fn object_ident<'a>(program: &'a Program, expr: Handle<Expr>) -> Option<&'a str> {
    match &program.exprs[expr].kind {
        ExprKind::Object(object) if object.prefix.is_none() => Some(&object.ident),
        _ => None,
    }
}

/// Returns the field list of a nested state initializer.
fn state_fields<'a>(program: &'a Program, expr: Handle<Expr>) -> Option<&'a [StateValue]> {
    match &program.exprs[expr].kind {
        ExprKind::StateInitializer { fields } => Some(fields),
        _ => None,
    }
}

fn eval_f32(program: &Program, expr: Handle<Expr>) -> f32 {
    evaluate_or_default(program, expr, Variant::Real(0.0)).to_real() as f32
}

/// Interprets a numeric literal field, coercing into the destination type.
macro_rules! literal_field {
    ($program:ident, $reporter:ident, $value:ident, $dst:expr, $coerce:ident) => {
        match literal_variant($program, $value.value) {
            Some(variant) => $dst = variant.$coerce() as _,
            None => $reporter.error(ReportKind::ExpectedLiteral, $value.area),
        }
    };
}

/// Interprets a boolean literal field.
macro_rules! literal_bool_field {
    ($program:ident, $reporter:ident, $value:ident, $dst:expr) => {
        match literal_variant($program, $value.value) {
            Some(variant) => $dst = variant.to_bool(),
            None => $reporter.error(ReportKind::ExpectedLiteral, $value.area),
        }
    };
}

/// Resolves a keyword into an enumerator, reporting a warning on failure.
macro_rules! keyword_field_warn {
    ($program:ident, $reporter:ident, $value:ident, $dst:expr) => {
        match object_ident($program, $value.value) {
            Some(ident) => match ident.parse() {
                Ok(parsed) => $dst = parsed,
                Err(err) => $reporter.warning(ReportKind::MapFailure(err), $value.area),
            },
            None => $reporter.error(ReportKind::ExpectedStateKeyword, $value.area),
        }
    };
}

/// Resolves a keyword into an enumerator, reporting an error on failure.
macro_rules! keyword_field {
    ($program:ident, $reporter:ident, $value:ident, $dst:expr) => {
        match object_ident($program, $value.value) {
            Some(ident) => match ident.parse() {
                Ok(parsed) => $dst = parsed,
                Err(err) => $reporter.error(ReportKind::MapFailure(err), $value.area),
            },
            None => $reporter.error(ReportKind::ExpectedStateKeyword, $value.area),
        }
    };
}

/* ----- Sampler states ----- */

pub(crate) fn reflect_sampler_value(
    program: &Program,
    reporter: &mut Reporter,
    value: &StateValue,
    state: &mut SamplerState,
) {
    match value.name.as_str() {
        "MipLODBias" => literal_field!(program, reporter, value, state.mip_lod_bias, to_real),
        "MaxAnisotropy" => literal_field!(program, reporter, value, state.max_anisotropy, to_int),
        "MinLOD" => literal_field!(program, reporter, value, state.min_lod, to_real),
        "MaxLOD" => literal_field!(program, reporter, value, state.max_lod, to_real),
        "Filter" => {
            // A single filter keyword drives all three filter stages.
            match object_ident(program, value.value) {
                Some(ident) => match ident.parse() {
                    Ok(filter) => {
                        state.filter_min = filter;
                        state.filter_max = filter;
                        state.filter_mip = filter;
                    }
                    Err(err) => reporter.warning(ReportKind::MapFailure(err), value.area),
                },
                None => reporter.error(ReportKind::ExpectedStateKeyword, value.area),
            }
        }
        "AddressU" => keyword_field_warn!(program, reporter, value, state.address_u),
        "AddressV" => keyword_field_warn!(program, reporter, value, state.address_v),
        "AddressW" => keyword_field_warn!(program, reporter, value, state.address_w),
        "ComparisonFunc" => keyword_field!(program, reporter, value, state.comparison_func),
        "BorderColor" => reflect_border_color(program, reporter, value, state),
        _ => reporter.error(ReportKind::UnknownStateKeyword("sampler"), value.area),
    }
}

fn reflect_border_color(
    program: &Program,
    reporter: &mut Reporter,
    value: &StateValue,
    state: &mut SamplerState,
) {
    match &program.exprs[value.value].kind {
        ExprKind::Call(call) => {
            // Vector constructor: evaluate all four components.
            let is_vector_ctor = call.type_ctor.as_ref().is_some_and(|ctor| ctor.is_vector());
            if is_vector_ctor && call.arguments.len() == 4 {
                for (dst, &arg) in state.border_color.iter_mut().zip(&call.arguments) {
                    *dst = eval_f32(program, arg);
                }
            } else {
                reporter.warning(ReportKind::InvalidArgType("BorderColor"), value.area);
            }
        }
        ExprKind::Cast { expr, .. } => {
            // A scalar cast broadcasts to all four components.
            let component = eval_f32(program, *expr);
            state.border_color = [component; 4];
        }
        ExprKind::Initializer { exprs } => {
            if exprs.len() == 4 {
                for (dst, &arg) in state.border_color.iter_mut().zip(exprs) {
                    *dst = eval_f32(program, arg);
                }
            } else {
                reporter.warning(ReportKind::InvalidArgCount("BorderColor"), value.area);
            }
        }
        _ => reporter.warning(ReportKind::InvalidArgType("BorderColor"), value.area),
    }
}

/* ----- Rasterizer state ----- */

pub(crate) fn reflect_rasterizer_value(
    program: &Program,
    reporter: &mut Reporter,
    value: &StateValue,
    state: &mut RasterizerState,
) {
    match value.name.as_str() {
        "scissor" => literal_bool_field!(program, reporter, value, state.scissor_enable),
        "multisample" => {
            literal_bool_field!(program, reporter, value, state.multisample_enable)
        }
        "lineaa" => literal_bool_field!(program, reporter, value, state.antialiased_line_enable),
        "fill" => keyword_field!(program, reporter, value, state.fill_mode),
        "cull" => keyword_field!(program, reporter, value, state.cull_mode),
        _ => reporter.error(ReportKind::UnknownStateKeyword("rasterizer"), value.area),
    }
}

/* ----- Depth state ----- */

pub(crate) fn reflect_depth_value(
    program: &Program,
    reporter: &mut Reporter,
    value: &StateValue,
    state: &mut DepthState,
) {
    match value.name.as_str() {
        "read" => literal_bool_field!(program, reporter, value, state.read_enable),
        "write" => literal_bool_field!(program, reporter, value, state.write_enable),
        "compare" => keyword_field!(program, reporter, value, state.compare_func),
        "bias" => literal_field!(program, reporter, value, state.depth_bias, to_real),
        "scaledBias" => literal_field!(program, reporter, value, state.scaled_depth_bias, to_real),
        "clip" => literal_bool_field!(program, reporter, value, state.depth_clip),
        _ => reporter.error(ReportKind::UnknownStateKeyword("depth"), value.area),
    }
}

/* ----- Stencil state ----- */

fn reflect_stencil_operation_value(
    program: &Program,
    reporter: &mut Reporter,
    value: &StateValue,
    operation: &mut StencilOperation,
) {
    match value.name.as_str() {
        "fail" => keyword_field!(program, reporter, value, operation.fail),
        "zfail" => keyword_field!(program, reporter, value, operation.zfail),
        "pass" => keyword_field!(program, reporter, value, operation.pass),
        "compare" => keyword_field!(program, reporter, value, operation.compare_func),
        _ => reporter.error(
            ReportKind::UnknownStateKeyword("stencil operation"),
            value.area,
        ),
    }
}

pub(crate) fn reflect_stencil_value(
    program: &Program,
    reporter: &mut Reporter,
    value: &StateValue,
    state: &mut StencilState,
) {
    match value.name.as_str() {
        "enabled" => literal_bool_field!(program, reporter, value, state.enabled),
        "reference" => literal_field!(program, reporter, value, state.reference, to_int),
        "readmask" => literal_field!(program, reporter, value, state.read_mask, to_int),
        "writemask" => literal_field!(program, reporter, value, state.write_mask, to_int),
        "back" => match state_fields(program, value.value) {
            Some(fields) => {
                for field in fields {
                    reflect_stencil_operation_value(program, reporter, field, &mut state.back);
                }
            }
            None => reporter.error(ReportKind::ExpectedStateInitializer, value.area),
        },
        "front" => match state_fields(program, value.value) {
            Some(fields) => {
                for field in fields {
                    reflect_stencil_operation_value(program, reporter, field, &mut state.front);
                }
            }
            None => reporter.error(ReportKind::ExpectedStateInitializer, value.area),
        },
        _ => reporter.error(ReportKind::UnknownStateKeyword("stencil"), value.area),
    }
}

/* ----- Blend state ----- */

fn reflect_blend_operation_value(
    program: &Program,
    reporter: &mut Reporter,
    value: &StateValue,
    operation: &mut BlendOperation,
) {
    match value.name.as_str() {
        "source" => keyword_field!(program, reporter, value, operation.source),
        "dest" => keyword_field!(program, reporter, value, operation.destination),
        "op" => keyword_field!(program, reporter, value, operation.operation),
        _ => reporter.error(
            ReportKind::UnknownStateKeyword("blend operation"),
            value.area,
        ),
    }
}

fn reflect_blend_target_value(
    program: &Program,
    reporter: &mut Reporter,
    value: &StateValue,
    target: &mut BlendTarget,
) {
    match value.name.as_str() {
        "enabled" => literal_bool_field!(program, reporter, value, target.enabled),
        "writemask" => literal_field!(program, reporter, value, target.write_mask, to_int),
        "color" => match state_fields(program, value.value) {
            Some(fields) => {
                for field in fields {
                    reflect_blend_operation_value(program, reporter, field, &mut target.color_op);
                }
            }
            None => reporter.error(ReportKind::ExpectedStateInitializer, value.area),
        },
        "alpha" => match state_fields(program, value.value) {
            Some(fields) => {
                for field in fields {
                    reflect_blend_operation_value(program, reporter, field, &mut target.alpha_op);
                }
            }
            None => reporter.error(ReportKind::ExpectedStateInitializer, value.area),
        },
        // Consumed by the outer target dispatcher.
        "index" => {}
        _ => reporter.error(ReportKind::UnknownStateKeyword("blend target"), value.area),
    }
}

pub(crate) fn reflect_blend_value(
    program: &Program,
    reporter: &mut Reporter,
    value: &StateValue,
    state: &mut BlendState,
    target_index: &mut usize,
) {
    match value.name.as_str() {
        "dither" => literal_bool_field!(program, reporter, value, state.alpha_to_coverage),
        "independant" => literal_bool_field!(program, reporter, value, state.independent_blend),
        "target" => match state_fields(program, value.value) {
            Some(fields) => {
                // An explicit index inside the block overrides the running
                // counter; the implicit counter resumes after it.
                for field in fields {
                    if field.name == "index" {
                        match literal_variant(program, field.value) {
                            Some(variant) => *target_index = variant.to_int() as usize,
                            None => reporter.error(ReportKind::ExpectedLiteral, field.area),
                        }
                    }
                }

                if *target_index < BlendState::MAX_NUM_RENDER_TARGETS {
                    for field in fields {
                        reflect_blend_target_value(
                            program,
                            reporter,
                            field,
                            &mut state.targets[*target_index],
                        );
                    }
                    *target_index += 1;
                }
            }
            None => reporter.error(ReportKind::ExpectedStateInitializer, value.area),
        },
        _ => reporter.error(ReportKind::UnknownStateKeyword("blend"), value.area),
    }
}

/* ----- Global options ----- */

pub(crate) fn reflect_options_value(
    program: &Program,
    reporter: &mut Reporter,
    value: &StateValue,
    options: &mut GlobalOptions,
) {
    match value.name.as_str() {
        "separable" => literal_bool_field!(program, reporter, value, options.separable),
        "priority" => literal_field!(program, reporter, value, options.priority, to_int),
        "transparent" => literal_bool_field!(program, reporter, value, options.transparent),
        "forward" => literal_bool_field!(program, reporter, value, options.forward),
        "sort" => keyword_field!(program, reporter, value, options.sort_mode),
        _ => reporter.error(ReportKind::UnknownStateKeyword("options"), value.area),
    }
}

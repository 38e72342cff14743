//! Human-readable text dump of a reflection record.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::data::{
    BindingSlot, BlendOperation, BlendState, DepthState, GlobalOptions, NumThreads,
    RasterizerState, ReflectionData, SamplerState, StencilOperation, StencilState,
};

const INDENT: &str = "  ";

struct PrinterState {
    out: String,
    indent: usize,
}

impl PrinterState {
    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.indent += 1;
        f(self);
        self.indent -= 1;
    }
}

/// Prints the reflection data in a fixed section order; empty sections show
/// `< none >`.
pub fn print_reflection(data: &ReflectionData) -> String {
    let mut p = PrinterState {
        out: String::new(),
        indent: 0,
    };

    p.line("Code Reflection:");
    p.nested(|p| {
        print_idents(p, &data.macros, "Macros");
        print_binding_slots(p, &data.textures, "Textures");
        print_binding_slots(p, &data.storage_buffers, "Storage Buffers");
        print_binding_slots(p, &data.constant_buffers, "Constant Buffers");
        print_binding_slots(p, &data.input_attributes, "Input Attributes");
        print_binding_slots(p, &data.output_attributes, "Output Attributes");
        print_sampler_states(p, &data.sampler_states, "Sampler States");
        print_rasterizer_state(p, &data.rasterizer_state, "Rasterizer state");
        print_depth_state(p, &data.depth_state, "Depth state");
        print_stencil_state(p, &data.stencil_state, "Stencil state");
        print_blend_state(p, &data.blend_state, "Blend state");
        print_global_options(p, &data.global_options, "Global options");
        print_num_threads(p, &data.num_threads, "Number of Threads");
    });

    p.out
}

fn print_idents(p: &mut PrinterState, idents: &[String], title: &str) {
    p.line(&format!("{title}:"));
    p.nested(|p| {
        if idents.is_empty() {
            p.line("< none >");
        } else {
            for ident in idents {
                p.line(ident);
            }
        }
    });
}

fn print_binding_slots(p: &mut PrinterState, slots: &[BindingSlot], title: &str) {
    p.line(&format!("{title}:"));
    p.nested(|p| {
        if slots.is_empty() {
            p.line("< none >");
            return;
        }

        // Right-align the location column on the widest index.
        let max_location = slots.iter().map(|s| s.location).max().unwrap_or(-1);
        let width = max_location.to_string().len();

        for slot in slots {
            let mut line = String::new();
            if max_location >= 0 {
                if slot.location >= 0 {
                    write!(line, "{:>width$}: ", slot.location).unwrap();
                } else {
                    write!(line, "{:width$}  ", "").unwrap();
                }
            }
            line.push_str(&slot.ident);
            p.line(&line);
        }
    });
}

fn print_sampler_states(
    p: &mut PrinterState,
    samplers: &BTreeMap<String, SamplerState>,
    title: &str,
) {
    p.line(&format!("{title}:"));
    p.nested(|p| {
        if samplers.is_empty() {
            p.line("< none >");
            return;
        }

        for (ident, smpl) in samplers {
            p.line(ident);
            p.nested(|p| {
                let c = &smpl.border_color;
                p.line(&format!("AddressU       = {}", smpl.address_u));
                p.line(&format!("AddressV       = {}", smpl.address_v));
                p.line(&format!("AddressW       = {}", smpl.address_w));
                p.line(&format!(
                    "BorderColor    = {{ {}, {}, {}, {} }}",
                    c[0], c[1], c[2], c[3]
                ));
                p.line(&format!("ComparisonFunc = {}", smpl.comparison_func));
                p.line(&format!("FilterMin      = {}", smpl.filter_min));
                p.line(&format!("FilterMax      = {}", smpl.filter_max));
                p.line(&format!("FilterMip      = {}", smpl.filter_mip));
                p.line(&format!("MaxAnisotropy  = {}", smpl.max_anisotropy));
                p.line(&format!("MaxLOD         = {}", smpl.max_lod));
                p.line(&format!("MinLOD         = {}", smpl.min_lod));
                p.line(&format!("MipLODBias     = {}", smpl.mip_lod_bias));
            });
        }
    });
}

fn print_rasterizer_state(p: &mut PrinterState, state: &RasterizerState, title: &str) {
    p.line(&format!("{title}:"));
    p.nested(|p| {
        p.line(&format!("FillMode        = {}", state.fill_mode));
        p.line(&format!("CullMode        = {}", state.cull_mode));
        p.line(&format!("AALine          = {}", state.antialiased_line_enable));
        p.line(&format!("Multisample     = {}", state.multisample_enable));
        p.line(&format!("Scissor         = {}", state.scissor_enable));
    });
}

fn print_depth_state(p: &mut PrinterState, state: &DepthState, title: &str) {
    p.line(&format!("{title}:"));
    p.nested(|p| {
        p.line(&format!("ReadEnable       = {}", state.read_enable));
        p.line(&format!("WriteEnable      = {}", state.write_enable));
        p.line(&format!("ComparisonFunc   = {}", state.compare_func));
        p.line(&format!("DepthBias        = {}", state.depth_bias));
        p.line(&format!("ScaledDepthBias  = {}", state.scaled_depth_bias));
        p.line(&format!("DepthClip        = {}", state.depth_clip));
    });
}

fn print_stencil_operation(p: &mut PrinterState, op: &StencilOperation) {
    p.line(&format!("Fail            = {}", op.fail));
    p.line(&format!("ZFail           = {}", op.zfail));
    p.line(&format!("Pass            = {}", op.pass));
    p.line(&format!("ComparisonFunc  = {}", op.compare_func));
}

fn print_stencil_state(p: &mut PrinterState, state: &StencilState, title: &str) {
    p.line(&format!("{title}:"));
    p.nested(|p| {
        p.line(&format!("Enabled         = {}", state.enabled));
        p.line(&format!("Reference       = {}", state.reference));
        p.line(&format!("ReadMask        = {}", state.read_mask));
        p.line(&format!("WriteMask       = {}", state.write_mask));

        p.line("Back");
        p.nested(|p| print_stencil_operation(p, &state.back));

        p.line("Front");
        p.nested(|p| print_stencil_operation(p, &state.front));
    });
}

fn print_blend_operation(p: &mut PrinterState, op: &BlendOperation) {
    p.line(&format!("Source          = {}", op.source));
    p.line(&format!("Destination     = {}", op.destination));
    p.line(&format!("Operation       = {}", op.operation));
}

fn print_blend_state(p: &mut PrinterState, state: &BlendState, title: &str) {
    p.line(&format!("{title}:"));
    p.nested(|p| {
        p.line(&format!("AlphaToCoverage       = {}", state.alpha_to_coverage));
        p.line(&format!("IndependantBlend      = {}", state.independent_blend));

        for (i, target) in state.targets.iter().enumerate() {
            p.line(&format!("Target {i}"));
            p.nested(|p| {
                p.line(&format!("Enabled         = {}", target.enabled));
                p.line(&format!("WriteMask       = {}", target.write_mask));
                p.line("Color");
                p.nested(|p| print_blend_operation(p, &target.color_op));
                p.line("Alpha");
                p.nested(|p| print_blend_operation(p, &target.alpha_op));
            });
        }
    });
}

fn print_global_options(p: &mut PrinterState, options: &GlobalOptions, title: &str) {
    p.line(&format!("{title}:"));
    p.nested(|p| {
        p.line(&format!("SortMode            = {}", options.sort_mode));
        p.line(&format!("Separable           = {}", options.separable));
        p.line(&format!("Transparent         = {}", options.transparent));
        p.line(&format!("Forward             = {}", options.forward));
        p.line(&format!("Priority            = {}", options.priority));
    });
}

fn print_num_threads(p: &mut PrinterState, num_threads: &NumThreads, title: &str) {
    p.line(&format!("{title}:"));
    p.nested(|p| {
        p.line(&format!("X = {}", num_threads.x));
        p.line(&format!("Y = {}", num_threads.y));
        p.line(&format!("Z = {}", num_threads.z));
    });
}

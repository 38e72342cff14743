//! Reserved GLSL identifiers.

use std::collections::HashSet;
use std::sync::OnceLock;

/// GLSL keywords and builtin type names that a shader identifier must not
/// collide with. The `gl_` prefix is checked separately.
#[rustfmt::skip]
static RESERVED: &[&str] = &[
    // Keywords
    "attribute", "const", "uniform", "varying", "buffer", "shared", "coherent",
    "volatile", "restrict", "readonly", "writeonly", "atomic_uint", "layout",
    "centroid", "flat", "smooth", "noperspective", "patch", "sample", "invariant",
    "precise", "break", "continue", "do", "for", "while", "switch", "case",
    "default", "if", "else", "subroutine", "in", "out", "inout", "true", "false",
    "discard", "return", "lowp", "mediump", "highp", "precision", "struct",
    // Scalar and vector types
    "void", "bool", "int", "uint", "float", "double",
    "vec2", "vec3", "vec4", "dvec2", "dvec3", "dvec4",
    "bvec2", "bvec3", "bvec4", "ivec2", "ivec3", "ivec4", "uvec2", "uvec3", "uvec4",
    // Matrix types
    "mat2", "mat3", "mat4", "mat2x2", "mat2x3", "mat2x4",
    "mat3x2", "mat3x3", "mat3x4", "mat4x2", "mat4x3", "mat4x4",
    "dmat2", "dmat3", "dmat4", "dmat2x2", "dmat2x3", "dmat2x4",
    "dmat3x2", "dmat3x3", "dmat3x4", "dmat4x2", "dmat4x3", "dmat4x4",
    // Opaque types
    "sampler1D", "sampler2D", "sampler3D", "samplerCube",
    "sampler1DArray", "sampler2DArray", "samplerCubeArray",
    "sampler1DShadow", "sampler2DShadow", "samplerCubeShadow",
    "sampler1DArrayShadow", "sampler2DArrayShadow", "samplerCubeArrayShadow",
    "sampler2DMS", "sampler2DMSArray", "sampler2DRect", "sampler2DRectShadow",
    "samplerBuffer", "isampler1D", "isampler2D", "isampler3D", "isamplerCube",
    "usampler1D", "usampler2D", "usampler3D", "usamplerCube",
    "image1D", "image2D", "image3D", "imageCube", "image2DArray", "imageBuffer",
    "iimage1D", "iimage2D", "iimage3D", "uimage1D", "uimage2D", "uimage3D",
    // Common builtin functions shadow-able by user identifiers
    "texture", "texelFetch", "textureLod", "textureGrad", "textureGather",
    "mix", "clamp", "fract", "mod", "dFdx", "dFdy", "fwidth",
    // Reserved for future use
    "common", "partition", "active", "asm", "class", "union", "enum", "typedef",
    "template", "this", "resource", "goto", "inline", "noinline", "public",
    "static", "extern", "external", "interface", "long", "short", "half",
    "fixed", "unsigned", "superp", "input", "output", "hvec2", "hvec3", "hvec4",
    "fvec2", "fvec3", "fvec4", "filter", "sizeof", "cast", "namespace", "using",
];

/// Returns `true` if the identifier is a reserved GLSL word.
pub fn is_reserved_glsl_keyword(ident: &str) -> bool {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| RESERVED.iter().copied().collect())
        .contains(ident)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_reserved() {
        assert!(is_reserved_glsl_keyword("uniform"));
        assert!(is_reserved_glsl_keyword("vec3"));
        assert!(is_reserved_glsl_keyword("sampler2D"));
        assert!(is_reserved_glsl_keyword("input"));
        assert!(!is_reserved_glsl_keyword("lightColor"));
        assert!(!is_reserved_glsl_keyword("gl_Position")); // prefix rule, not a keyword
    }
}

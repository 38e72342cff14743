//! Intrinsic function taxonomy.
//!
//! One enumerator per recognized intrinsic, partitioned by the predicates
//! below. As in [`crate::types`], the predicates are ordered range checks,
//! so variant order is load-bearing: global intrinsics first, then the
//! texture object methods, stream-output methods, and the GLSL-only image
//! forms that lowering rewrites into.

use crate::types::BinaryOp;

/// A built-in function known to the compiler.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[rustfmt::skip]
pub enum Intrinsic {
    // Global intrinsics
    Abort,
    Abs,
    ACos,
    All,
    AllMemoryBarrier,
    AllMemoryBarrierWithGroupSync,
    Any,
    AsDouble,
    AsFloat,
    ASin,
    AsInt,
    AsUInt1,
    AsUInt3,
    ATan,
    ATan2,
    Ceil,
    Clamp,
    Clip,
    Cos,
    CosH,
    CountBits,
    Cross,
    Ddx,
    DdxCoarse,
    DdxFine,
    Ddy,
    DdyCoarse,
    DdyFine,
    Degrees,
    Determinant,
    DeviceMemoryBarrier,
    DeviceMemoryBarrierWithGroupSync,
    Distance,
    Dot,
    Equal,              // GLSL vector compare
    Exp,
    Exp2,
    F16toF32,
    F32toF16,
    FaceForward,
    FirstBitHigh,
    FirstBitLow,
    Floor,
    Fma,
    FMod,
    Frac,
    FrExp,
    FWidth,
    GreaterThan,        // GLSL vector compare
    GreaterThanEqual,   // GLSL vector compare
    GroupMemoryBarrier,
    GroupMemoryBarrierWithGroupSync,
    InterlockedAdd,
    InterlockedAnd,
    InterlockedCompareExchange,
    InterlockedCompareStore,
    InterlockedExchange,
    InterlockedMax,
    InterlockedMin,
    InterlockedOr,
    InterlockedXor,
    IsFinite,
    IsInf,
    IsNaN,
    LdExp,
    Length,
    Lerp,
    LessThan,           // GLSL vector compare
    LessThanEqual,      // GLSL vector compare
    Lit,
    Log,
    Log10,
    Log2,
    Mad,
    Max,
    Min,
    ModF,
    Mul,
    Normalize,
    Not,                // GLSL vector compare
    NotEqual,           // GLSL vector compare
    Pow,
    Radians,
    Rcp,
    Reflect,
    Refract,
    ReverseBits,
    Round,
    RSqrt,
    Saturate,
    Sign,
    Sin,
    SinCos,
    SinH,
    SmoothStep,
    Sqrt,
    Step,
    Tan,
    TanH,
    Transpose,
    Trunc,

    // Texture object methods
    TextureGetDimensions,
    TextureQueryLod,
    TextureQueryLodUnclamped,

    TextureLoad1,
    TextureLoad2,
    TextureLoad3,

    TextureSample2,
    TextureSample3,
    TextureSample4,
    TextureSample5,
    TextureSampleBias3,
    TextureSampleBias4,
    TextureSampleBias5,
    TextureSampleBias6,
    TextureSampleCmp3,
    TextureSampleCmp4,
    TextureSampleCmp5,
    TextureSampleCmp6,
    TextureSampleCmpLevelZero3,
    TextureSampleCmpLevelZero4,
    TextureSampleCmpLevelZero5,
    TextureSampleGrad4,
    TextureSampleGrad5,
    TextureSampleGrad6,
    TextureSampleGrad7,
    TextureSampleLevel3,
    TextureSampleLevel4,
    TextureSampleLevel5,

    TextureGather2,
    TextureGatherRed2,
    TextureGatherGreen2,
    TextureGatherBlue2,
    TextureGatherAlpha2,
    TextureGather3,
    TextureGather4,
    TextureGatherRed3,
    TextureGatherRed4,
    TextureGatherGreen3,
    TextureGatherGreen4,
    TextureGatherBlue3,
    TextureGatherBlue4,
    TextureGatherAlpha3,
    TextureGatherAlpha4,
    TextureGatherRed6,
    TextureGatherRed7,
    TextureGatherGreen6,
    TextureGatherGreen7,
    TextureGatherBlue6,
    TextureGatherBlue7,
    TextureGatherAlpha6,
    TextureGatherAlpha7,
    TextureGatherCmp3,
    TextureGatherCmpRed3,
    TextureGatherCmpGreen3,
    TextureGatherCmpBlue3,
    TextureGatherCmpAlpha3,
    TextureGatherCmp4,
    TextureGatherCmp5,
    TextureGatherCmpRed4,
    TextureGatherCmpRed5,
    TextureGatherCmpGreen4,
    TextureGatherCmpGreen5,
    TextureGatherCmpBlue4,
    TextureGatherCmpBlue5,
    TextureGatherCmpAlpha4,
    TextureGatherCmpAlpha5,
    TextureGatherCmpRed7,
    TextureGatherCmpRed8,
    TextureGatherCmpGreen7,
    TextureGatherCmpGreen8,
    TextureGatherCmpBlue7,
    TextureGatherCmpBlue8,
    TextureGatherCmpAlpha7,
    TextureGatherCmpAlpha8,

    // Stream-output object methods
    StreamOutputAppend,
    StreamOutputRestartStrip,

    // GLSL-only image forms
    ImageLoad,
    ImageStore,
    ImageAtomicAdd,
    ImageAtomicAnd,
    ImageAtomicOr,
    ImageAtomicXor,
    ImageAtomicMin,
    ImageAtomicMax,
    ImageAtomicCompSwap,
    ImageAtomicExchange,
}

/// Intrinsics callable without an object prefix.
pub fn is_global_intrinsic(t: Intrinsic) -> bool {
    t >= Intrinsic::Abort && t <= Intrinsic::Trunc
}

/// Methods of a texture object.
pub fn is_texture_intrinsic(t: Intrinsic) -> bool {
    t >= Intrinsic::TextureGetDimensions && t <= Intrinsic::TextureGatherCmpAlpha8
}

/// Texture gather methods, with and without compare.
pub fn is_texture_gather_intrinsic(t: Intrinsic) -> bool {
    t >= Intrinsic::TextureGather2 && t <= Intrinsic::TextureGatherCmpAlpha8
}

/// Texture sample methods (`Sample*` and `SampleLevel*` families).
pub fn is_texture_sample_intrinsic(t: Intrinsic) -> bool {
    t >= Intrinsic::TextureSample2 && t <= Intrinsic::TextureSampleLevel5
}

/// Texture sample or gather methods that perform a depth comparison.
pub fn is_texture_compare_intrinsic(t: Intrinsic) -> bool {
    (t >= Intrinsic::TextureSampleCmp3 && t <= Intrinsic::TextureSampleCmpLevelZero5)
        || (t >= Intrinsic::TextureGatherCmp3 && t <= Intrinsic::TextureGatherCmpAlpha8)
}

/// Compare-sample methods restricted to the first mip level.
pub fn is_texture_compare_level_zero_intrinsic(t: Intrinsic) -> bool {
    t >= Intrinsic::TextureSampleCmpLevelZero3 && t <= Intrinsic::TextureSampleCmpLevelZero5
}

/// Texture load methods (`Load` overloads).
pub fn is_texture_load_intrinsic(t: Intrinsic) -> bool {
    t >= Intrinsic::TextureLoad1 && t <= Intrinsic::TextureLoad3
}

/// Methods of a stream-output object.
pub fn is_stream_output_intrinsic(t: Intrinsic) -> bool {
    matches!(
        t,
        Intrinsic::StreamOutputAppend | Intrinsic::StreamOutputRestartStrip
    )
}

/// GLSL image load/store/atomic forms.
pub fn is_image_intrinsic(t: Intrinsic) -> bool {
    t >= Intrinsic::ImageLoad && t <= Intrinsic::ImageAtomicExchange
}

/// `Interlocked*` atomic intrinsics.
pub fn is_interlocked_intrinsic(t: Intrinsic) -> bool {
    t >= Intrinsic::InterlockedAdd && t <= Intrinsic::InterlockedXor
}

/// Returns the GLSL compare-vector intrinsic for a comparison operator.
pub fn compare_op_to_intrinsic(op: BinaryOp) -> Option<Intrinsic> {
    match op {
        BinaryOp::Equal => Some(Intrinsic::Equal),
        BinaryOp::NotEqual => Some(Intrinsic::NotEqual),
        BinaryOp::Less => Some(Intrinsic::LessThan),
        BinaryOp::Greater => Some(Intrinsic::GreaterThan),
        BinaryOp::LessEqual => Some(Intrinsic::LessThanEqual),
        BinaryOp::GreaterEqual => Some(Intrinsic::GreaterThanEqual),
        _ => None,
    }
}

/// Maps an `Interlocked*` intrinsic to its `ImageAtomic*` form, for atomic
/// operations whose destination is a read/write texture. Non-interlocked
/// input is returned unchanged.
pub fn interlocked_to_image_atomic_intrinsic(t: Intrinsic) -> Intrinsic {
    match t {
        Intrinsic::InterlockedAdd => Intrinsic::ImageAtomicAdd,
        Intrinsic::InterlockedAnd => Intrinsic::ImageAtomicAnd,
        Intrinsic::InterlockedOr => Intrinsic::ImageAtomicOr,
        Intrinsic::InterlockedXor => Intrinsic::ImageAtomicXor,
        Intrinsic::InterlockedMin => Intrinsic::ImageAtomicMin,
        Intrinsic::InterlockedMax => Intrinsic::ImageAtomicMax,
        Intrinsic::InterlockedCompareExchange => Intrinsic::ImageAtomicCompSwap,
        Intrinsic::InterlockedExchange => Intrinsic::ImageAtomicExchange,
        _ => t,
    }
}

/// Number of offset parameters accepted by a gather intrinsic (0, 1, or 4).
pub fn gather_offset_param_count(t: Intrinsic) -> usize {
    use Intrinsic::*;
    match t {
        TextureGather3 | TextureGather4 | TextureGatherRed3 | TextureGatherRed4
        | TextureGatherGreen3 | TextureGatherGreen4 | TextureGatherBlue3 | TextureGatherBlue4
        | TextureGatherAlpha3 | TextureGatherAlpha4 | TextureGatherCmp4 | TextureGatherCmp5
        | TextureGatherCmpRed4 | TextureGatherCmpRed5 | TextureGatherCmpGreen4
        | TextureGatherCmpGreen5 | TextureGatherCmpBlue4 | TextureGatherCmpBlue5
        | TextureGatherCmpAlpha4 | TextureGatherCmpAlpha5 => 1,

        TextureGatherRed6 | TextureGatherRed7 | TextureGatherGreen6 | TextureGatherGreen7
        | TextureGatherBlue6 | TextureGatherBlue7 | TextureGatherAlpha6 | TextureGatherAlpha7
        | TextureGatherCmpRed7 | TextureGatherCmpRed8 | TextureGatherCmpGreen7
        | TextureGatherCmpGreen8 | TextureGatherCmpBlue7 | TextureGatherCmpBlue8
        | TextureGatherCmpAlpha7 | TextureGatherCmpAlpha8 => 4,

        _ => 0,
    }
}

/// Maps a gather intrinsic to the component it fetches (red 0, green 1,
/// blue 2, alpha 3). The channel-less `Gather`/`GatherCmp` forms fetch red.
pub fn gather_component_index(t: Intrinsic) -> usize {
    use Intrinsic::*;
    match t {
        TextureGatherGreen2 | TextureGatherGreen3 | TextureGatherGreen4 | TextureGatherGreen6
        | TextureGatherGreen7 | TextureGatherCmpGreen3 | TextureGatherCmpGreen4
        | TextureGatherCmpGreen5 | TextureGatherCmpGreen7 | TextureGatherCmpGreen8 => 1,

        TextureGatherBlue2 | TextureGatherBlue3 | TextureGatherBlue4 | TextureGatherBlue6
        | TextureGatherBlue7 | TextureGatherCmpBlue3 | TextureGatherCmpBlue4
        | TextureGatherCmpBlue5 | TextureGatherCmpBlue7 | TextureGatherCmpBlue8 => 2,

        TextureGatherAlpha2 | TextureGatherAlpha3 | TextureGatherAlpha4 | TextureGatherAlpha6
        | TextureGatherAlpha7 | TextureGatherCmpAlpha3 | TextureGatherCmpAlpha4
        | TextureGatherCmpAlpha5 | TextureGatherCmpAlpha7 | TextureGatherCmpAlpha8 => 3,

        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_partitions() {
        assert!(is_global_intrinsic(Intrinsic::Saturate));
        assert!(is_global_intrinsic(Intrinsic::InterlockedAdd));
        assert!(!is_global_intrinsic(Intrinsic::TextureSample2));

        assert!(is_texture_intrinsic(Intrinsic::TextureSample2));
        assert!(is_texture_intrinsic(Intrinsic::TextureGatherCmpAlpha8));
        assert!(!is_texture_intrinsic(Intrinsic::ImageLoad));

        assert!(is_texture_sample_intrinsic(Intrinsic::TextureSampleLevel4));
        assert!(!is_texture_sample_intrinsic(Intrinsic::TextureGather2));

        assert!(is_texture_gather_intrinsic(Intrinsic::TextureGatherRed6));
        assert!(is_texture_compare_intrinsic(Intrinsic::TextureSampleCmp4));
        assert!(is_texture_compare_intrinsic(Intrinsic::TextureGatherCmp4));
        assert!(!is_texture_compare_intrinsic(Intrinsic::TextureSample3));

        assert!(is_texture_compare_level_zero_intrinsic(
            Intrinsic::TextureSampleCmpLevelZero3
        ));
        assert!(!is_texture_compare_level_zero_intrinsic(
            Intrinsic::TextureSampleCmp3
        ));

        assert!(is_texture_load_intrinsic(Intrinsic::TextureLoad2));
        assert!(is_stream_output_intrinsic(Intrinsic::StreamOutputAppend));
        assert!(is_image_intrinsic(Intrinsic::ImageAtomicCompSwap));
        assert!(is_interlocked_intrinsic(Intrinsic::InterlockedXor));
        assert!(!is_interlocked_intrinsic(Intrinsic::ImageAtomicAdd));
    }

    #[test]
    fn compare_op_map() {
        assert_eq!(
            compare_op_to_intrinsic(BinaryOp::Less),
            Some(Intrinsic::LessThan)
        );
        assert_eq!(
            compare_op_to_intrinsic(BinaryOp::NotEqual),
            Some(Intrinsic::NotEqual)
        );
        assert_eq!(compare_op_to_intrinsic(BinaryOp::Add), None);
    }

    #[test]
    fn interlocked_map() {
        assert_eq!(
            interlocked_to_image_atomic_intrinsic(Intrinsic::InterlockedAdd),
            Intrinsic::ImageAtomicAdd
        );
        assert_eq!(
            interlocked_to_image_atomic_intrinsic(Intrinsic::InterlockedCompareExchange),
            Intrinsic::ImageAtomicCompSwap
        );
        // Identity on non-interlocked input.
        assert_eq!(
            interlocked_to_image_atomic_intrinsic(Intrinsic::Clamp),
            Intrinsic::Clamp
        );
    }

    #[test]
    fn gather_maps() {
        assert_eq!(gather_offset_param_count(Intrinsic::TextureGather2), 0);
        assert_eq!(gather_offset_param_count(Intrinsic::TextureGatherRed3), 1);
        assert_eq!(gather_offset_param_count(Intrinsic::TextureGatherAlpha6), 4);

        assert_eq!(gather_component_index(Intrinsic::TextureGather2), 0);
        assert_eq!(gather_component_index(Intrinsic::TextureGatherGreen3), 1);
        assert_eq!(gather_component_index(Intrinsic::TextureGatherBlue4), 2);
        assert_eq!(gather_component_index(Intrinsic::TextureGatherCmpAlpha5), 3);
    }
}

//! Enumerated types of the shader language: operators, scalar/vector/matrix
//! data types, buffer and sampler kinds, and the small supporting enums.
//!
//! Predicates are implemented as ordered range checks over the enum layout,
//! so the declaration order of variants is load-bearing.

use std::fmt;
use std::str::FromStr;

use crate::error::{MapError, TypeError};

/// Generates `to_str`, [`fmt::Display`], and [`FromStr`] for an enum from a
/// variant↔string table.
#[macro_export]
macro_rules! enum_strings {
    ($ty:ident, $($variant:ident => $name:literal),+ $(,)?) => {
        impl $ty {
            /// Returns the textual form of this enumerator.
            pub fn to_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }

        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.to_str())
            }
        }

        impl ::std::str::FromStr for $ty {
            type Err = $crate::error::MapError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Self::$variant),)+
                    _ => Err($crate::error::MapError::new(s, stringify!($ty))),
                }
            }
        }
    };
}

/* ----- Assignment operators ----- */

/// Assignment operator: `=`, `+=`, `-=`, `*=`, `/=`, `%=`, `<<=`, `>>=`,
/// `|=`, `&=`, `^=`.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum AssignOp {
    Set,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    LShift,
    RShift,
    Or,
    And,
    Xor,
}

enum_strings!(AssignOp,
    Set => "=",
    Add => "+=",
    Sub => "-=",
    Mul => "*=",
    Div => "/=",
    Mod => "%=",
    LShift => "<<=",
    RShift => ">>=",
    Or => "|=",
    And => "&=",
    Xor => "^=",
);

impl AssignOp {
    pub fn is_bitwise(self) -> bool {
        self >= Self::LShift && self <= Self::Xor
    }

    /// Returns the equivalent binary operator, or `None` for plain `=`.
    pub fn to_binary_op(self) -> Option<BinaryOp> {
        match self {
            Self::Set => None,
            Self::Add => Some(BinaryOp::Add),
            Self::Sub => Some(BinaryOp::Sub),
            Self::Mul => Some(BinaryOp::Mul),
            Self::Div => Some(BinaryOp::Div),
            Self::Mod => Some(BinaryOp::Mod),
            Self::LShift => Some(BinaryOp::LShift),
            Self::RShift => Some(BinaryOp::RShift),
            Self::Or => Some(BinaryOp::Or),
            Self::And => Some(BinaryOp::And),
            Self::Xor => Some(BinaryOp::Xor),
        }
    }
}

/* ----- Binary operators ----- */

/// Binary operator: `&&`, `||`, `|`, `^`, `&`, `<<`, `>>`, `+`, `-`, `*`,
/// `/`, `%`, `==`, `!=`, `<`, `>`, `<=`, `>=`.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum BinaryOp {
    LogicalAnd,
    LogicalOr,
    Or,
    Xor,
    And,
    LShift,
    RShift,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
}

enum_strings!(BinaryOp,
    LogicalAnd => "&&",
    LogicalOr => "||",
    Or => "|",
    Xor => "^",
    And => "&",
    LShift => "<<",
    RShift => ">>",
    Add => "+",
    Sub => "-",
    Mul => "*",
    Div => "/",
    Mod => "%",
    Equal => "==",
    NotEqual => "!=",
    Less => "<",
    Greater => ">",
    LessEqual => "<=",
    GreaterEqual => ">=",
);

impl BinaryOp {
    pub fn is_logical(self) -> bool {
        matches!(self, Self::LogicalAnd | Self::LogicalOr)
    }

    pub fn is_bitwise(self) -> bool {
        self >= Self::Or && self <= Self::RShift
    }

    pub fn is_compare(self) -> bool {
        self >= Self::Equal && self <= Self::GreaterEqual
    }

    /// Logical or compare operator, i.e. the result type is boolean.
    pub fn is_boolean(self) -> bool {
        self.is_logical() || self.is_compare()
    }
}

/* ----- Unary operators ----- */

/// Unary operator: `!`, `~`, `+`, `-`, `++`, `--`.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum UnaryOp {
    LogicalNot,
    Not,
    Nop,
    Negate,
    Inc,
    Dec,
}

enum_strings!(UnaryOp,
    LogicalNot => "!",
    Not => "~",
    Nop => "+",
    Negate => "-",
    Inc => "++",
    Dec => "--",
);

impl UnaryOp {
    pub fn is_logical(self) -> bool {
        self == Self::LogicalNot
    }

    pub fn is_bitwise(self) -> bool {
        self == Self::Not
    }

    /// Operators that require an l-value operand.
    pub fn is_lvalue_op(self) -> bool {
        matches!(self, Self::Inc | Self::Dec)
    }
}

/* ----- Control transfer ----- */

/// Control transfer statement kind: `break`, `continue`, `discard`.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum CtrlTransfer {
    Break,
    Continue,
    Discard,
}

enum_strings!(CtrlTransfer,
    Break => "break",
    Continue => "continue",
    Discard => "discard",
);

/* ----- Data types ----- */

/// Base data type enumeration: scalars, vectors, and matrices over
/// `bool`/`int`/`uint`/`half`/`float`/`double`, plus `string`.
///
/// Variant order groups scalars, then vectors, then matrices; the range
/// predicates below depend on it.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[rustfmt::skip]
pub enum DataType {
    Undefined,

    String,

    // Scalar types
    Bool, Int, UInt, Half, Float, Double,

    // Vector types
    Bool2, Bool3, Bool4,
    Int2, Int3, Int4,
    UInt2, UInt3, UInt4,
    Half2, Half3, Half4,
    Float2, Float3, Float4,
    Double2, Double3, Double4,

    // Matrix types
    Bool2x2, Bool2x3, Bool2x4, Bool3x2, Bool3x3, Bool3x4, Bool4x2, Bool4x3, Bool4x4,
    Int2x2, Int2x3, Int2x4, Int3x2, Int3x3, Int3x4, Int4x2, Int4x3, Int4x4,
    UInt2x2, UInt2x3, UInt2x4, UInt3x2, UInt3x3, UInt3x4, UInt4x2, UInt4x3, UInt4x4,
    Half2x2, Half2x3, Half2x4, Half3x2, Half3x3, Half3x4, Half4x2, Half4x3, Half4x4,
    Float2x2, Float2x3, Float2x4, Float3x2, Float3x3, Float3x4, Float4x2, Float4x3, Float4x4,
    Double2x2, Double2x3, Double2x4, Double3x2, Double3x3, Double3x4, Double4x2, Double4x3, Double4x4,
}

/// Builds the shape/compose/name tables for every scalar, vector, and matrix
/// data type from one entry list.
macro_rules! data_type_table {
    ($(($variant:ident, $base:ident, $rows:literal, $cols:literal, $name:literal)),+ $(,)?) => {
        /// Splits a data type into its scalar base and `(rows, columns)`
        /// shape: scalars are `(1, 1)`, vectors `(n, 1)`, matrices `(r, c)`.
        /// `String` and `Undefined` have no shape.
        pub fn data_type_shape(t: DataType) -> Option<(DataType, u32, u32)> {
            match t {
                $(DataType::$variant => Some((DataType::$base, $rows, $cols)),)+
                _ => None,
            }
        }

        /// Rebuilds a data type from its scalar base and shape.
        pub fn data_type_from_shape(base: DataType, rows: u32, cols: u32) -> DataType {
            match (base, rows, cols) {
                $((DataType::$base, $rows, $cols) => DataType::$variant,)+
                _ => DataType::Undefined,
            }
        }

        impl DataType {
            /// Returns the textual form of this data type.
            pub fn to_str(self) -> &'static str {
                match self {
                    Self::Undefined => "<undefined>",
                    Self::String => "string",
                    $(Self::$variant => $name,)+
                }
            }
        }

        impl FromStr for DataType {
            type Err = MapError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    "string" => Ok(Self::String),
                    $($name => Ok(Self::$variant),)+
                    _ => Err(MapError::new(s, "DataType")),
                }
            }
        }
    };
}

#[rustfmt::skip]
data_type_table!(
    (Bool, Bool, 1, 1, "bool"), (Int, Int, 1, 1, "int"), (UInt, UInt, 1, 1, "uint"),
    (Half, Half, 1, 1, "half"), (Float, Float, 1, 1, "float"), (Double, Double, 1, 1, "double"),

    (Bool2, Bool, 2, 1, "bool2"), (Bool3, Bool, 3, 1, "bool3"), (Bool4, Bool, 4, 1, "bool4"),
    (Int2, Int, 2, 1, "int2"), (Int3, Int, 3, 1, "int3"), (Int4, Int, 4, 1, "int4"),
    (UInt2, UInt, 2, 1, "uint2"), (UInt3, UInt, 3, 1, "uint3"), (UInt4, UInt, 4, 1, "uint4"),
    (Half2, Half, 2, 1, "half2"), (Half3, Half, 3, 1, "half3"), (Half4, Half, 4, 1, "half4"),
    (Float2, Float, 2, 1, "float2"), (Float3, Float, 3, 1, "float3"), (Float4, Float, 4, 1, "float4"),
    (Double2, Double, 2, 1, "double2"), (Double3, Double, 3, 1, "double3"), (Double4, Double, 4, 1, "double4"),

    (Bool2x2, Bool, 2, 2, "bool2x2"), (Bool2x3, Bool, 2, 3, "bool2x3"), (Bool2x4, Bool, 2, 4, "bool2x4"),
    (Bool3x2, Bool, 3, 2, "bool3x2"), (Bool3x3, Bool, 3, 3, "bool3x3"), (Bool3x4, Bool, 3, 4, "bool3x4"),
    (Bool4x2, Bool, 4, 2, "bool4x2"), (Bool4x3, Bool, 4, 3, "bool4x3"), (Bool4x4, Bool, 4, 4, "bool4x4"),
    (Int2x2, Int, 2, 2, "int2x2"), (Int2x3, Int, 2, 3, "int2x3"), (Int2x4, Int, 2, 4, "int2x4"),
    (Int3x2, Int, 3, 2, "int3x2"), (Int3x3, Int, 3, 3, "int3x3"), (Int3x4, Int, 3, 4, "int3x4"),
    (Int4x2, Int, 4, 2, "int4x2"), (Int4x3, Int, 4, 3, "int4x3"), (Int4x4, Int, 4, 4, "int4x4"),
    (UInt2x2, UInt, 2, 2, "uint2x2"), (UInt2x3, UInt, 2, 3, "uint2x3"), (UInt2x4, UInt, 2, 4, "uint2x4"),
    (UInt3x2, UInt, 3, 2, "uint3x2"), (UInt3x3, UInt, 3, 3, "uint3x3"), (UInt3x4, UInt, 3, 4, "uint3x4"),
    (UInt4x2, UInt, 4, 2, "uint4x2"), (UInt4x3, UInt, 4, 3, "uint4x3"), (UInt4x4, UInt, 4, 4, "uint4x4"),
    (Half2x2, Half, 2, 2, "half2x2"), (Half2x3, Half, 2, 3, "half2x3"), (Half2x4, Half, 2, 4, "half2x4"),
    (Half3x2, Half, 3, 2, "half3x2"), (Half3x3, Half, 3, 3, "half3x3"), (Half3x4, Half, 3, 4, "half3x4"),
    (Half4x2, Half, 4, 2, "half4x2"), (Half4x3, Half, 4, 3, "half4x3"), (Half4x4, Half, 4, 4, "half4x4"),
    (Float2x2, Float, 2, 2, "float2x2"), (Float2x3, Float, 2, 3, "float2x3"), (Float2x4, Float, 2, 4, "float2x4"),
    (Float3x2, Float, 3, 2, "float3x2"), (Float3x3, Float, 3, 3, "float3x3"), (Float3x4, Float, 3, 4, "float3x4"),
    (Float4x2, Float, 4, 2, "float4x2"), (Float4x3, Float, 4, 3, "float4x3"), (Float4x4, Float, 4, 4, "float4x4"),
    (Double2x2, Double, 2, 2, "double2x2"), (Double2x3, Double, 2, 3, "double2x3"), (Double2x4, Double, 2, 4, "double2x4"),
    (Double3x2, Double, 3, 2, "double3x2"), (Double3x3, Double, 3, 3, "double3x3"), (Double3x4, Double, 3, 4, "double3x4"),
    (Double4x2, Double, 4, 2, "double4x2"), (Double4x3, Double, 4, 3, "double4x3"), (Double4x4, Double, 4, 4, "double4x4"),
);

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Returns `true` if the data type is a scalar type.
pub fn is_scalar_type(t: DataType) -> bool {
    t >= DataType::Bool && t <= DataType::Double
}

/// Returns `true` if the data type is a vector type.
pub fn is_vector_type(t: DataType) -> bool {
    t >= DataType::Bool2 && t <= DataType::Double4
}

/// Returns `true` if the data type is a matrix type.
pub fn is_matrix_type(t: DataType) -> bool {
    t >= DataType::Bool2x2 && t <= DataType::Double4x4
}

/// Boolean base type, including all vectors and matrices of it.
pub fn is_boolean_type(t: DataType) -> bool {
    base_data_type(t) == DataType::Bool
}

/// Real base type (half, float, double), including vectors and matrices.
pub fn is_real_type(t: DataType) -> bool {
    matches!(
        base_data_type(t),
        DataType::Half | DataType::Float | DataType::Double
    )
}

/// Half-precision base type, including vectors and matrices.
pub fn is_half_real_type(t: DataType) -> bool {
    base_data_type(t) == DataType::Half
}

/// Double-precision base type, including vectors and matrices.
pub fn is_double_real_type(t: DataType) -> bool {
    base_data_type(t) == DataType::Double
}

/// Integral base type (int or uint), including vectors and matrices.
pub fn is_integral_type(t: DataType) -> bool {
    matches!(base_data_type(t), DataType::Int | DataType::UInt)
}

/// Signed-integer base type, including vectors and matrices.
pub fn is_int_type(t: DataType) -> bool {
    base_data_type(t) == DataType::Int
}

/// Unsigned-integer base type, including vectors and matrices.
pub fn is_uint_type(t: DataType) -> bool {
    base_data_type(t) == DataType::UInt
}

/// Returns the dimension of the data type interpreted as a vector:
/// 1–4 for scalars and vectors, 0 for matrices.
pub fn vector_type_dim(t: DataType) -> u32 {
    match data_type_shape(t) {
        Some((_, rows, 1)) => rows,
        _ => 0,
    }
}

/// Returns the `(rows, columns)` dimensions of the data type interpreted as
/// a matrix: scalars are `(1, 1)`, vectors `(n, 1)`, matrices `(r, c)`, and
/// `(0, 0)` for shapeless types.
pub fn matrix_type_dim(t: DataType) -> (u32, u32) {
    match data_type_shape(t) {
        Some((_, rows, cols)) => (rows, cols),
        None => (0, 0),
    }
}

/// Returns the scalar base of the data type, or `Undefined`.
pub fn base_data_type(t: DataType) -> DataType {
    match data_type_shape(t) {
        Some((base, _, _)) => base,
        None => DataType::Undefined,
    }
}

/// Returns the vector data type for a scalar base and component count
/// (a count of 1 yields the scalar itself).
pub fn vector_data_type(base: DataType, vector_size: u32) -> DataType {
    data_type_from_shape(base, vector_size, 1)
}

/// Returns the matrix data type for a scalar base and `(rows, columns)`.
pub fn matrix_data_type(base: DataType, rows: u32, cols: u32) -> DataType {
    data_type_from_shape(base, rows, cols)
}

/// Replaces double-precision types by their single-precision counterparts.
pub fn double_to_float_data_type(t: DataType) -> DataType {
    match data_type_shape(t) {
        Some((DataType::Double, rows, cols)) => data_type_from_shape(DataType::Float, rows, cols),
        _ => t,
    }
}

/// Resolves a swizzle or matrix subscript against a data type.
///
/// Vector subscripts use the `xyzw` or `rgba` character set (no mixing);
/// matrix subscripts use `_m<r><c>` (zero-based) or `_<r><c>` (one-based)
/// groups. Returns the resulting data type and the `(row, column)` index
/// pair for each fetched component.
pub fn subscript_data_type(
    t: DataType,
    subscript: &str,
) -> Result<(DataType, Vec<(u32, u32)>), TypeError> {
    let invalid = || TypeError::InvalidSubscript {
        subscript: subscript.to_string(),
        data_type: t.to_str(),
    };

    let Some((base, rows, cols)) = data_type_shape(t) else {
        return Err(invalid());
    };

    let indices = if subscript.starts_with('_') {
        parse_matrix_subscript(subscript, rows, cols).ok_or_else(invalid)?
    } else {
        if cols != 1 {
            // Matrix types require the '_' subscript notation.
            return Err(invalid());
        }
        parse_vector_subscript(subscript, rows).ok_or_else(invalid)?
    };

    let result = vector_data_type(base, indices.len() as u32);
    if result == DataType::Undefined {
        return Err(invalid());
    }
    Ok((result, indices))
}

fn parse_vector_subscript(subscript: &str, dim: u32) -> Option<Vec<(u32, u32)>> {
    if subscript.is_empty() || subscript.len() > 4 {
        return None;
    }

    let charset = |set: &str| -> Option<Vec<(u32, u32)>> {
        subscript
            .chars()
            .map(|c| set.find(c).map(|i| (i as u32, 0)))
            .collect()
    };

    let indices = charset("xyzw").or_else(|| charset("rgba"))?;
    if indices.iter().any(|&(row, _)| row >= dim) {
        return None;
    }
    Some(indices)
}

fn parse_matrix_subscript(subscript: &str, rows: u32, cols: u32) -> Option<Vec<(u32, u32)>> {
    let mut indices = Vec::new();
    let chars: Vec<char> = subscript.chars().collect();
    let zero_based = chars.get(1) == Some(&'m');
    let group_len = if zero_based { 4 } else { 3 };

    if chars.len() % group_len != 0 || chars.len() / group_len > 4 {
        return None;
    }

    for group in chars.chunks(group_len) {
        if group[0] != '_' || (zero_based && group[1] != 'm') {
            return None;
        }
        let digit = |c: char| c.to_digit(10);
        let (mut row, mut col) = if zero_based {
            (digit(group[2])?, digit(group[3])?)
        } else {
            (digit(group[1])?, digit(group[2])?)
        };
        if !zero_based {
            if row == 0 || col == 0 {
                return None;
            }
            row -= 1;
            col -= 1;
        }
        if row >= rows || col >= cols {
            return None;
        }
        indices.push((row, col));
    }

    if indices.is_empty() {
        return None;
    }
    Some(indices)
}

/* ----- Storage and modifier enums ----- */

/// Variable storage class.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum StorageClass {
    Extern,
    Precise,
    Shared,
    GroupShared,
    Static,
    Volatile,
}

/// Variable interpolation modifier.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum InterpModifier {
    NoInterpolation,
    Linear,
    Centroid,
    NoPerspective,
    Sample,
}

/// Variable type modifier.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum TypeModifier {
    Const,
    RowMajor,
    ColumnMajor,
    SNorm,
    UNorm,
}

/// Uniform buffer kind (`cbuffer` or `tbuffer`).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum UniformBufferType {
    ConstantBuffer,
    TextureBuffer,
}

/* ----- Buffer types ----- */

/// Buffer and texture object kind.
///
/// `GenericTexture` is the dimension-not-yet-known state of legacy
/// `texture` declarations.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum BufferType {
    // Storage buffers
    Buffer,
    StructuredBuffer,
    ByteAddressBuffer,
    RWBuffer,
    RWStructuredBuffer,
    RWByteAddressBuffer,
    AppendStructuredBuffer,
    ConsumeStructuredBuffer,

    // Textures
    RWTexture1D,
    RWTexture1DArray,
    RWTexture2D,
    RWTexture2DArray,
    RWTexture3D,
    Texture1D,
    Texture1DArray,
    Texture2D,
    Texture2DArray,
    Texture3D,
    TextureCube,
    TextureCubeArray,
    Texture2DMS,
    Texture2DMSArray,
    GenericTexture,

    // Patches
    InputPatch,
    OutputPatch,

    // Streams
    PointStream,
    LineStream,
    TriangleStream,
}

enum_strings!(BufferType,
    Buffer => "Buffer",
    StructuredBuffer => "StructuredBuffer",
    ByteAddressBuffer => "ByteAddressBuffer",
    RWBuffer => "RWBuffer",
    RWStructuredBuffer => "RWStructuredBuffer",
    RWByteAddressBuffer => "RWByteAddressBuffer",
    AppendStructuredBuffer => "AppendStructuredBuffer",
    ConsumeStructuredBuffer => "ConsumeStructuredBuffer",
    RWTexture1D => "RWTexture1D",
    RWTexture1DArray => "RWTexture1DArray",
    RWTexture2D => "RWTexture2D",
    RWTexture2DArray => "RWTexture2DArray",
    RWTexture3D => "RWTexture3D",
    Texture1D => "Texture1D",
    Texture1DArray => "Texture1DArray",
    Texture2D => "Texture2D",
    Texture2DArray => "Texture2DArray",
    Texture3D => "Texture3D",
    TextureCube => "TextureCube",
    TextureCubeArray => "TextureCubeArray",
    Texture2DMS => "Texture2DMS",
    Texture2DMSArray => "Texture2DMSArray",
    GenericTexture => "texture",
    InputPatch => "InputPatch",
    OutputPatch => "OutputPatch",
    PointStream => "PointStream",
    LineStream => "LineStream",
    TriangleStream => "TriangleStream",
);

/// Buffer kinds that lower to a storage (`buffer`) block.
pub fn is_storage_buffer_type(t: BufferType) -> bool {
    t >= BufferType::Buffer && t <= BufferType::ConsumeStructuredBuffer
}

/// Read/write buffer kinds, for storage buffers and textures.
pub fn is_rw_buffer_type(t: BufferType) -> bool {
    t >= BufferType::RWBuffer && t <= BufferType::RWTexture3D
}

/// Texture buffer kinds, including the read/write images.
pub fn is_texture_buffer_type(t: BufferType) -> bool {
    t >= BufferType::RWTexture1D && t <= BufferType::GenericTexture
}

/// Multi-sampled texture kinds.
pub fn is_texture_ms_buffer_type(t: BufferType) -> bool {
    matches!(t, BufferType::Texture2DMS | BufferType::Texture2DMSArray)
}

/// Read/write texture kinds, lowered to image objects.
pub fn is_rw_texture_buffer_type(t: BufferType) -> bool {
    t >= BufferType::RWTexture1D && t <= BufferType::RWTexture3D
}

/// Input or output patch kinds.
pub fn is_patch_buffer_type(t: BufferType) -> bool {
    matches!(t, BufferType::InputPatch | BufferType::OutputPatch)
}

/// Point, line, or triangle stream kinds.
pub fn is_stream_buffer_type(t: BufferType) -> bool {
    t >= BufferType::PointStream && t <= BufferType::TriangleStream
}

/// Returns the texture coordinate dimension of the buffer type in `1..=4`,
/// or 0 for non-texture kinds.
pub fn buffer_type_texture_dim(t: BufferType) -> u32 {
    match t {
        BufferType::Texture1D | BufferType::RWTexture1D => 1,

        BufferType::Texture1DArray
        | BufferType::Texture2D
        | BufferType::Texture2DMS
        | BufferType::RWTexture1DArray
        | BufferType::RWTexture2D => 2,

        BufferType::Texture2DArray
        | BufferType::Texture2DMSArray
        | BufferType::Texture3D
        | BufferType::TextureCube
        | BufferType::RWTexture2DArray
        | BufferType::RWTexture3D => 3,

        BufferType::TextureCubeArray => 4,

        _ => 0,
    }
}

/* ----- Sampler types ----- */

/// Sampler object kind, covering texture samplers and the two sampler-state
/// kinds. Whether a kind is a sampler *state* is a predicate, not a separate
/// variant.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum SamplerType {
    Sampler1D,
    Sampler2D,
    Sampler3D,
    SamplerCube,
    Sampler2DRect,
    Sampler1DArray,
    Sampler2DArray,
    SamplerCubeArray,
    SamplerBuffer,
    Sampler2DMS,
    Sampler2DMSArray,
    Sampler1DShadow,
    Sampler2DShadow,
    SamplerCubeShadow,
    Sampler2DRectShadow,
    Sampler1DArrayShadow,
    Sampler2DArrayShadow,
    SamplerCubeArrayShadow,

    // Sampler states
    SamplerState,
    SamplerComparisonState,
}

/// Maps a texture buffer type to the sampler type of a combined
/// texture/sampler binding, or `None` for non-texture buffers.
pub fn texture_type_to_sampler_type(t: BufferType) -> Option<SamplerType> {
    match t {
        BufferType::Buffer => Some(SamplerType::SamplerBuffer),
        BufferType::Texture1D => Some(SamplerType::Sampler1D),
        BufferType::Texture1DArray => Some(SamplerType::Sampler1DArray),
        BufferType::Texture2D => Some(SamplerType::Sampler2D),
        BufferType::Texture2DArray => Some(SamplerType::Sampler2DArray),
        BufferType::Texture3D => Some(SamplerType::Sampler3D),
        BufferType::TextureCube => Some(SamplerType::SamplerCube),
        BufferType::TextureCubeArray => Some(SamplerType::SamplerCubeArray),
        BufferType::Texture2DMS => Some(SamplerType::Sampler2DMS),
        BufferType::Texture2DMSArray => Some(SamplerType::Sampler2DMSArray),
        _ => None,
    }
}

/// Sampler states carry only sampling parameters and no texel source; GLSL
/// has no corresponding object, so they are removed by lowering.
pub fn is_sampler_state_type(t: SamplerType) -> bool {
    matches!(
        t,
        SamplerType::SamplerState | SamplerType::SamplerComparisonState
    )
}

/// Shadow (depth-comparison) sampler kinds.
pub fn is_shadow_sampler_type(t: SamplerType) -> bool {
    t >= SamplerType::Sampler1DShadow && t <= SamplerType::SamplerCubeArrayShadow
}

/* ----- State declarations ----- */

/// Pipeline-state block kind of a state declaration.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum StateType {
    Rasterizer,
    Depth,
    Stencil,
    Blend,
    Options,
}

/* ----- Registers ----- */

/// Register kind of a slot annotation.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum RegisterType {
    ConstantBuffer,      // 'b' register
    TextureBuffer,       // 't' register
    BufferOffset,        // 'c' register
    Sampler,             // 's' register
    UnorderedAccessView, // 'u' register
}

impl RegisterType {
    /// Returns the register kind for its single-character prefix.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'b' => Some(Self::ConstantBuffer),
            't' => Some(Self::TextureBuffer),
            'c' => Some(Self::BufferOffset),
            's' => Some(Self::Sampler),
            'u' => Some(Self::UnorderedAccessView),
            _ => None,
        }
    }

    /// Returns the single-character prefix of this register kind.
    pub fn to_char(self) -> char {
        match self {
            Self::ConstantBuffer => 'b',
            Self::TextureBuffer => 't',
            Self::BufferOffset => 'c',
            Self::Sampler => 's',
            Self::UnorderedAccessView => 'u',
        }
    }
}

/* ----- Attributes ----- */

/// Attribute kind of a `[...]` annotation.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum AttributeType {
    Branch,
    Flatten,
    Loop,
    Unroll,
    Domain,
    EarlyDepthStencil,
    Instance,
    MaxTessFactor,
    MaxVertexCount,
    NumThreads,
    OutputControlPoints,
    OutputTopology,
    Partitioning,
    PatchConstantFunc,
}

/* ----- Shader targets ----- */

/// The shader stage a compilation targets.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum ShaderTarget {
    VertexShader,
    TessellationControlShader,
    TessellationEvaluationShader,
    GeometryShader,
    FragmentShader,
    ComputeShader,
}

enum_strings!(ShaderTarget,
    VertexShader => "vertex",
    TessellationControlShader => "tess-control",
    TessellationEvaluationShader => "tess-eval",
    GeometryShader => "geometry",
    FragmentShader => "fragment",
    ComputeShader => "compute",
);

/* ----- Output versions ----- */

/// The output shader language and version.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum OutputVersion {
    Glsl110,
    Glsl120,
    Glsl130,
    Glsl140,
    Glsl150,
    Glsl330,
    Glsl400,
    Glsl410,
    Glsl420,
    Glsl430,
    Glsl440,
    Glsl450,
    Glsl460,
    Essl100,
    Essl300,
    Essl310,
    Essl320,
    Vksl450,
}

impl OutputVersion {
    /// Vulkan-flavored GLSL output.
    pub fn is_vksl(self) -> bool {
        self == Self::Vksl450
    }

    /// Versions where the `shading_language_420pack` extension is in core,
    /// i.e. initializer lists and vector subscripts survive as-is.
    pub fn supports_420pack(self) -> bool {
        (self >= Self::Glsl420 && self <= Self::Glsl460) || self.is_vksl()
    }
}

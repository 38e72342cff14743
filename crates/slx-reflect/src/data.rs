//! The reflection record: a plain-data description of a shader's external
//! contract.

use std::collections::BTreeMap;

use slx_ast::enum_strings;
use slx_ast::{BufferType, DataType, TypeDenoter};

/* ----- Pipeline-state enums ----- */
// The string forms are the keyword literals accepted by the embedded
// pipeline-state language.

/// Sampler filter kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
    None,
    Point,
    Linear,
    Anisotropic,
}

enum_strings!(Filter,
    None => "none",
    Point => "point",
    Linear => "linear",
    Anisotropic => "aniso",
);

/// Texture address mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureAddressMode {
    Wrap,
    Mirror,
    Clamp,
    Border,
    MirrorOnce,
}

enum_strings!(TextureAddressMode,
    Wrap => "wrap",
    Mirror => "mirror",
    Clamp => "clamp",
    Border => "border",
    MirrorOnce => "mirroronce",
);

/// Sample or depth comparison function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComparisonFunc {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

enum_strings!(ComparisonFunc,
    Never => "never",
    Less => "lt",
    Equal => "eq",
    LessEqual => "lte",
    Greater => "gt",
    NotEqual => "neq",
    GreaterEqual => "gte",
    Always => "always",
);

/// Rasterizer fill mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillMode {
    Wire,
    Solid,
}

enum_strings!(FillMode,
    Wire => "wire",
    Solid => "solid",
);

/// Rasterizer cull mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CullMode {
    Clockwise,
    CounterClockwise,
    None,
}

enum_strings!(CullMode,
    Clockwise => "cw",
    CounterClockwise => "ccw",
    None => "none",
);

/// Action taken on a stencil buffer entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StencilOpType {
    Keep,
    Zero,
    Replace,
    Increment,
    Decrement,
    IncrementWrap,
    DecrementWrap,
    Inverse,
}

enum_strings!(StencilOpType,
    Keep => "keep",
    Zero => "zero",
    Replace => "replace",
    Increment => "incr",
    Decrement => "decr",
    IncrementWrap => "incrwrap",
    DecrementWrap => "decrwrap",
    Inverse => "inverse",
);

/// Factor applied to one operand of the blend operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendFactor {
    One,
    Zero,
    DestinationRgb,
    SourceRgb,
    DestinationInvRgb,
    SourceInvRgb,
    DestinationAlpha,
    SourceAlpha,
    DestinationInvAlpha,
    SourceInvAlpha,
}

enum_strings!(BlendFactor,
    One => "one",
    Zero => "zero",
    DestinationRgb => "dstRGB",
    SourceRgb => "srcRGB",
    DestinationInvRgb => "dstIRGB",
    SourceInvRgb => "srcIRGB",
    DestinationAlpha => "dstA",
    SourceAlpha => "srcA",
    DestinationInvAlpha => "dstIA",
    SourceInvAlpha => "srcIA",
);

/// Operation combining the two blend operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendOpType {
    Add,
    Subtract,
    ReverseSubtract,
    Minimum,
    Maximum,
}

enum_strings!(BlendOpType,
    Add => "add",
    Subtract => "sub",
    ReverseSubtract => "rsub",
    Minimum => "min",
    Maximum => "max",
);

/// Render order of objects using the shader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortMode {
    None,
    BackToFront,
    FrontToBack,
}

enum_strings!(SortMode,
    None => "none",
    BackToFront => "backtofront",
    FrontToBack => "fronttoback",
);

/* ----- State records ----- */

/// Sampler state descriptor.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplerState {
    pub filter_min: Filter,
    pub filter_max: Filter,
    pub filter_mip: Filter,
    pub address_u: TextureAddressMode,
    pub address_v: TextureAddressMode,
    pub address_w: TextureAddressMode,
    pub mip_lod_bias: f32,
    pub max_anisotropy: u32,
    pub comparison_func: ComparisonFunc,
    pub border_color: [f32; 4],
    pub min_lod: f32,
    pub max_lod: f32,
    /// Set when the declaration overrides any default.
    pub is_non_default: bool,
    pub alias: String,
}

impl Default for SamplerState {
    fn default() -> Self {
        Self {
            filter_min: Filter::Linear,
            filter_max: Filter::Linear,
            filter_mip: Filter::Linear,
            address_u: TextureAddressMode::Wrap,
            address_v: TextureAddressMode::Wrap,
            address_w: TextureAddressMode::Wrap,
            mip_lod_bias: 0.0,
            max_anisotropy: 1,
            comparison_func: ComparisonFunc::Always,
            border_color: [0.0; 4],
            min_lod: f32::MIN,
            max_lod: f32::MAX,
            is_non_default: false,
            alias: String::new(),
        }
    }
}

/// Options controlling the rasterizer.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterizerState {
    pub fill_mode: FillMode,
    pub cull_mode: CullMode,
    pub scissor_enable: bool,
    pub multisample_enable: bool,
    pub antialiased_line_enable: bool,
}

impl Default for RasterizerState {
    fn default() -> Self {
        Self {
            fill_mode: FillMode::Solid,
            cull_mode: CullMode::CounterClockwise,
            scissor_enable: false,
            multisample_enable: true,
            antialiased_line_enable: false,
        }
    }
}

/// Options controlling depth buffer operations.
#[derive(Clone, Debug, PartialEq)]
pub struct DepthState {
    pub read_enable: bool,
    pub write_enable: bool,
    pub compare_func: ComparisonFunc,
    pub depth_bias: f32,
    pub scaled_depth_bias: f32,
    pub depth_clip: bool,
}

impl Default for DepthState {
    fn default() -> Self {
        Self {
            read_enable: true,
            write_enable: true,
            compare_func: ComparisonFunc::Less,
            depth_bias: 0.0,
            scaled_depth_bias: 0.0,
            depth_clip: true,
        }
    }
}

/// Per-face stencil operation.
#[derive(Clone, Debug, PartialEq)]
pub struct StencilOperation {
    pub fail: StencilOpType,
    pub zfail: StencilOpType,
    pub pass: StencilOpType,
    pub compare_func: ComparisonFunc,
}

impl Default for StencilOperation {
    fn default() -> Self {
        Self {
            fail: StencilOpType::Keep,
            zfail: StencilOpType::Keep,
            pass: StencilOpType::Keep,
            compare_func: ComparisonFunc::Always,
        }
    }
}

/// Options controlling stencil buffer operations.
#[derive(Clone, Debug, PartialEq)]
pub struct StencilState {
    pub enabled: bool,
    pub reference: i32,
    pub read_mask: u8,
    pub write_mask: u8,
    pub front: StencilOperation,
    pub back: StencilOperation,
}

impl Default for StencilState {
    fn default() -> Self {
        Self {
            enabled: false,
            reference: 0,
            read_mask: 0xFF,
            write_mask: 0xFF,
            front: StencilOperation::default(),
            back: StencilOperation::default(),
        }
    }
}

/// Blend operation on one subset of a render target.
#[derive(Clone, Debug, PartialEq)]
pub struct BlendOperation {
    pub source: BlendFactor,
    pub destination: BlendFactor,
    pub operation: BlendOpType,
}

impl Default for BlendOperation {
    fn default() -> Self {
        Self {
            source: BlendFactor::One,
            destination: BlendFactor::Zero,
            operation: BlendOpType::Add,
        }
    }
}

/// Blend state for a single render target.
#[derive(Clone, Debug, PartialEq)]
pub struct BlendTarget {
    pub enabled: bool,
    pub write_mask: i8,
    pub color_op: BlendOperation,
    pub alpha_op: BlendOperation,
}

impl Default for BlendTarget {
    fn default() -> Self {
        Self {
            enabled: false,
            write_mask: 0b1111,
            color_op: BlendOperation::default(),
            alpha_op: BlendOperation::default(),
        }
    }
}

/// Upper bound on addressable render targets; extra target blocks are
/// silently dropped.
pub const MAX_NUM_RENDER_TARGETS: usize = 8;

/// Blend state over all render targets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlendState {
    pub alpha_to_coverage: bool,
    pub independent_blend: bool,
    pub targets: [BlendTarget; MAX_NUM_RENDER_TARGETS],
}

impl BlendState {
    /// See [`MAX_NUM_RENDER_TARGETS`].
    pub const MAX_NUM_RENDER_TARGETS: usize = MAX_NUM_RENDER_TARGETS;
}

/// Global options applied to every program of a shader.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalOptions {
    pub sort_mode: SortMode,
    pub separable: bool,
    pub transparent: bool,
    pub forward: bool,
    pub priority: i32,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            sort_mode: SortMode::FrontToBack,
            separable: false,
            transparent: false,
            forward: false,
            priority: 0,
        }
    }
}

/* ----- Bindings and uniforms ----- */

/// Identifier/location pair the GPU binds a resource by. A location of `-1`
/// means no slot register matched the shader target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindingSlot {
    pub ident: String,
    pub location: i32,
}

impl BindingSlot {
    pub fn new(ident: impl Into<String>, location: i32) -> Self {
        Self {
            ident: ident.into(),
            location,
        }
    }
}

/// Kind of a reflected uniform entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniformKind {
    Buffer,
    UniformBuffer,
    Sampler,
    Variable,
    Struct,
}

/// Modifier flags of a reflected uniform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UniformFlags(u32);

impl UniformFlags {
    pub const EMPTY: Self = Self(0);
    pub const INTERNAL: Self = Self(1);
    pub const COLOR: Self = Self(1 << 1);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for UniformFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for UniformFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// A single element in a constant buffer or an opaque resource.
#[derive(Clone, Debug, PartialEq)]
pub struct Uniform {
    pub ident: String,
    pub kind: UniformKind,
    /// Base type index; see [`data_type_index`] and [`buffer_type_index`].
    pub base_type: i32,
    /// Index of the owning uniform block, `-1` for none.
    pub uniform_block: i32,
    /// Index into the shared default-value pool, `-1` for none.
    pub default_value: i32,
    pub flags: UniformFlags,
    /// Identifier of the texture whose sprite-animation UVs this parameter
    /// receives.
    pub sprite_uv_ref: String,
}

impl Uniform {
    pub fn new(ident: impl Into<String>, kind: UniformKind) -> Self {
        Self {
            ident: ident.into(),
            kind,
            base_type: 0,
            uniform_block: -1,
            default_value: -1,
            flags: UniformFlags::EMPTY,
            sprite_uv_ref: String::new(),
        }
    }
}

/// Index of a data type in the reflection base-type space (the enum
/// discriminant; `Undefined` is 0).
pub fn data_type_index(t: DataType) -> i32 {
    t as i32
}

/// Index of a buffer type in the reflection base-type space, offset by one
/// so 0 stays "no base type".
pub fn buffer_type_index(t: BufferType) -> i32 {
    t as i32 + 1
}

/* ----- Functions ----- */

/// Variable-shaped type of a reflected function signature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VarType {
    #[default]
    Undefined,
    Void,
    Data(DataType),
}

/// Maps a type denoter to a reflected [`VarType`]; anything but void and
/// base types is `Undefined`.
pub fn var_type_from_denoter(denoter: &TypeDenoter) -> VarType {
    match denoter.aliased() {
        TypeDenoter::Void => VarType::Void,
        TypeDenoter::Base(DataType::Undefined) | TypeDenoter::Base(DataType::String) => {
            VarType::Undefined
        }
        TypeDenoter::Base(t) => VarType::Data(*t),
        _ => VarType::Undefined,
    }
}

/// Direction flags of a reflected function parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParameterFlags(u32);

impl ParameterFlags {
    pub const EMPTY: Self = Self(0);
    pub const IN: Self = Self(1);
    pub const OUT: Self = Self(1 << 1);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for ParameterFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for ParameterFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// A single parameter of a reflected function.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub ident: String,
    pub var_type: VarType,
    pub flags: ParameterFlags,
}

/// A function defined in the program.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionReflection {
    pub ident: String,
    pub return_type: VarType,
    pub parameters: Vec<Parameter>,
}

/* ----- Defaults and thread counts ----- */

/// Thread-group dimensions of a compute shader's `numthreads` attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NumThreads {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// The complete reflection output of one compilation.
#[derive(Clone, Debug, Default)]
pub struct ReflectionData {
    /// All defined macros after pre-processing.
    pub macros: Vec<String>,
    /// Texture bindings.
    pub textures: Vec<BindingSlot>,
    /// Storage buffer bindings.
    pub storage_buffers: Vec<BindingSlot>,
    /// Constant buffer bindings.
    pub constant_buffers: Vec<BindingSlot>,
    /// Shader input attributes.
    pub input_attributes: Vec<BindingSlot>,
    /// Shader output attributes.
    pub output_attributes: Vec<BindingSlot>,
    /// Static sampler states by declared identifier.
    pub sampler_states: BTreeMap<String, SamplerState>,
    pub blend_state: BlendState,
    pub rasterizer_state: RasterizerState,
    pub depth_state: DepthState,
    pub stencil_state: StencilState,
    pub global_options: GlobalOptions,
    /// `numthreads` attribute of a compute shader.
    pub num_threads: NumThreads,
    pub uniforms: Vec<Uniform>,
    /// Shared pool the uniforms' default-value indices point into.
    pub default_values: Vec<slx_ast::DefaultValue>,
    pub functions: Vec<FunctionReflection>,
}

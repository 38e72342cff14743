//! Declaration nodes and their supporting structures.

use crate::arena::Handle;
use crate::denoter::{BufferTypeDenoter, TypeDenoter};
use crate::expr::{Expr, StateValue};
use crate::flags::AstFlags;
use crate::semantic::IndexedSemantic;
use crate::span::SourceArea;
use crate::stmt::Stmt;
use crate::types::{
    AttributeType, InterpModifier, RegisterType, SamplerType, ShaderTarget, StateType,
    StorageClass, TypeModifier, UniformBufferType,
};

/// Extended modifier flags carried on type specifiers and uniform buffers,
/// forwarded into reflection.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq)]
pub struct ExtModifiers(u32);

impl ExtModifiers {
    pub const EMPTY: Self = Self(0);
    /// Engine-internal parameter, hidden from material editors.
    pub const INTERNAL: Self = Self(1);
    /// The value is a color and editors should show a color picker.
    pub const COLOR: Self = Self(1 << 1);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for ExtModifiers {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for ExtModifiers {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// The type part of a declaration statement, shared by its declarators.
#[derive(Clone, Debug)]
pub struct TypeSpecifier {
    pub denoter: TypeDenoter,
    pub storage_classes: Vec<StorageClass>,
    pub interp_modifiers: Vec<InterpModifier>,
    pub type_modifiers: Vec<TypeModifier>,
    pub is_input: bool,
    pub is_output: bool,
    pub ext_modifiers: ExtModifiers,
    /// Identifier of the texture whose sprite-animation UVs this parameter
    /// receives, if any.
    pub sprite_uv_ref: Option<String>,
}

impl TypeSpecifier {
    pub fn new(denoter: TypeDenoter) -> Self {
        Self {
            denoter,
            storage_classes: Vec::new(),
            interp_modifiers: Vec::new(),
            type_modifiers: Vec::new(),
            is_input: false,
            is_output: false,
            ext_modifiers: ExtModifiers::EMPTY,
            sprite_uv_ref: None,
        }
    }

    /// Removes a storage class if present.
    pub fn remove_storage_class(&mut self, class: StorageClass) {
        self.storage_classes.retain(|&c| c != class);
    }
}

/// A register slot annotation (`register(vs, t0)`), optionally restricted to
/// one shader stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Register {
    pub register_type: RegisterType,
    pub slot: i32,
    /// `None` applies to every stage.
    pub target: Option<ShaderTarget>,
}

impl Register {
    pub fn new(register_type: RegisterType, slot: i32) -> Self {
        Self {
            register_type,
            slot,
            target: None,
        }
    }

    /// Returns the slot annotation matching the active shader stage.
    /// Stage-specific registers take precedence over stage-agnostic ones.
    pub fn for_target(registers: &[Register], target: ShaderTarget) -> Option<&Register> {
        registers
            .iter()
            .find(|r| r.target == Some(target))
            .or_else(|| registers.iter().find(|r| r.target.is_none()))
    }
}

/// A `[...]` attribute annotation.
#[derive(Clone, Debug)]
pub struct Attribute {
    pub attribute_type: AttributeType,
    pub arguments: Vec<Handle<Expr>>,
    pub area: SourceArea,
}

/// Raw default-value payload of a uniform declarator, tagged by the declared
/// type's shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DefaultValue {
    Bool(bool),
    Int(i32),
    Real(f32),
    IntVec([i32; 4]),
    Matrix([f32; 16]),
    /// Opaque resource handle (e.g. a default texture).
    Handle(i32),
}

/// A variable declarator.
#[derive(Clone, Debug)]
pub struct VarDecl {
    pub ident: String,
    pub ty: TypeDenoter,
    pub semantic: IndexedSemantic,
    pub initializer: Option<Handle<Expr>>,
    pub default_value: Option<DefaultValue>,
    /// The struct this variable is a member of, if any.
    pub struct_ref: Option<Handle<StructDecl>>,
    pub flags: AstFlags,
    pub area: SourceArea,
}

impl VarDecl {
    pub fn new(ident: impl Into<String>, ty: TypeDenoter) -> Self {
        Self {
            ident: ident.into(),
            ty,
            semantic: IndexedSemantic::default(),
            initializer: None,
            default_value: None,
            struct_ref: None,
            flags: AstFlags::EMPTY,
            area: SourceArea::IGNORE,
        }
    }
}

/// A buffer or texture declarator.
#[derive(Clone, Debug)]
pub struct BufferDecl {
    pub ident: String,
    pub ty: BufferTypeDenoter,
    pub slot_registers: Vec<Register>,
    /// Opaque default-value handle forwarded into reflection.
    pub default_value: Option<i32>,
    pub ext_modifiers: ExtModifiers,
    pub flags: AstFlags,
    pub area: SourceArea,
}

impl BufferDecl {
    pub fn new(ident: impl Into<String>, ty: BufferTypeDenoter) -> Self {
        Self {
            ident: ident.into(),
            ty,
            slot_registers: Vec::new(),
            default_value: None,
            ext_modifiers: ExtModifiers::EMPTY,
            flags: AstFlags::EMPTY,
            area: SourceArea::IGNORE,
        }
    }
}

/// A sampler declarator with its embedded state block.
#[derive(Clone, Debug)]
pub struct SamplerDecl {
    pub ident: String,
    pub sampler_type: SamplerType,
    /// Alias identifier from an `[alias(...)]` annotation.
    pub alias: String,
    pub values: Vec<StateValue>,
    pub slot_registers: Vec<Register>,
    pub flags: AstFlags,
    pub area: SourceArea,
}

impl SamplerDecl {
    pub fn new(ident: impl Into<String>, sampler_type: SamplerType) -> Self {
        Self {
            ident: ident.into(),
            sampler_type,
            alias: String::new(),
            values: Vec::new(),
            slot_registers: Vec::new(),
            flags: AstFlags::EMPTY,
            area: SourceArea::IGNORE,
        }
    }
}

/// A struct declaration. An empty identifier marks an anonymous struct.
#[derive(Clone, Debug)]
pub struct StructDecl {
    pub ident: String,
    pub base_struct: Option<Handle<StructDecl>>,
    /// Variable member statements (`VarDeclStmt` handles).
    pub members: Vec<Handle<Stmt>>,
    /// Member functions, flattened to globals by lowering.
    pub functions: Vec<Handle<FunctionDecl>>,
    pub flags: AstFlags,
    pub area: SourceArea,
}

impl StructDecl {
    pub fn new(ident: impl Into<String>) -> Self {
        Self {
            ident: ident.into(),
            base_struct: None,
            members: Vec::new(),
            functions: Vec::new(),
            flags: AstFlags::EMPTY,
            area: SourceArea::IGNORE,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.ident.is_empty()
    }
}

/// A type alias declaration.
#[derive(Clone, Debug)]
pub struct AliasDecl {
    pub ident: String,
    pub ty: TypeDenoter,
    pub flags: AstFlags,
    pub area: SourceArea,
}

/// The user-defined and system-value variables bound to one direction of an
/// entry point's interface.
#[derive(Clone, Debug, Default)]
pub struct SemanticMap {
    pub var_decl_refs: Vec<Handle<VarDecl>>,
    pub var_decl_refs_sv: Vec<Handle<VarDecl>>,
}

impl SemanticMap {
    pub fn contains(&self, var: Handle<VarDecl>) -> bool {
        self.var_decl_refs.contains(&var) || self.var_decl_refs_sv.contains(&var)
    }
}

/// A function declaration.
#[derive(Clone, Debug)]
pub struct FunctionDecl {
    pub ident: String,
    pub return_type: TypeSpecifier,
    /// Parameters as single-declarator `VarDeclStmt` handles, so a removed
    /// parameter can move into the disabled bucket like any statement.
    pub parameters: Vec<Handle<Stmt>>,
    pub body: Vec<Handle<Stmt>>,
    /// Return-value semantic of the entry point.
    pub semantic: IndexedSemantic,
    /// The struct this function is a member of, if any.
    pub struct_ref: Option<Handle<StructDecl>>,
    pub attribs: Vec<Attribute>,
    pub input_semantics: SemanticMap,
    pub output_semantics: SemanticMap,
    pub flags: AstFlags,
    pub area: SourceArea,
}

impl FunctionDecl {
    pub fn new(ident: impl Into<String>, return_type: TypeSpecifier) -> Self {
        Self {
            ident: ident.into(),
            return_type,
            parameters: Vec::new(),
            body: Vec::new(),
            semantic: IndexedSemantic::default(),
            struct_ref: None,
            attribs: Vec::new(),
            input_semantics: SemanticMap::default(),
            output_semantics: SemanticMap::default(),
            flags: AstFlags::EMPTY,
            area: SourceArea::IGNORE,
        }
    }

    pub fn is_member(&self) -> bool {
        self.struct_ref.is_some()
    }

    pub fn is_static(&self) -> bool {
        self.flags.contains(AstFlags::STATIC)
    }

    pub fn is_entry_point(&self) -> bool {
        self.flags.contains(AstFlags::ENTRY_POINT)
    }
}

/// A `cbuffer`/`tbuffer` declaration.
#[derive(Clone, Debug)]
pub struct UniformBufferDecl {
    pub ident: String,
    pub buffer_type: UniformBufferType,
    pub slot_registers: Vec<Register>,
    /// Member statements (`VarDeclStmt` handles).
    pub members: Vec<Handle<Stmt>>,
    pub ext_modifiers: ExtModifiers,
    pub flags: AstFlags,
    pub area: SourceArea,
}

/// A pipeline-state block declaration.
#[derive(Clone, Debug)]
pub struct StateDecl {
    pub ident: String,
    pub state_type: StateType,
    /// The `StateInitializer` expression, absent for forward declarations.
    pub initializer: Option<Handle<Expr>>,
    pub flags: AstFlags,
    pub area: SourceArea,
}

//! Type denoters: the resolved type attached to declarations and
//! expressions.

use std::fmt;

use crate::arena::Handle;
use crate::decl::StructDecl;
use crate::types::{
    self, BufferType, DataType, SamplerType, is_sampler_state_type, is_scalar_type, is_vector_type,
};

/// The resolved type of a declaration or expression.
///
/// Struct denoters refer back to their declaration by handle; the arena owns
/// the declaration's lifetime. Alias denoters keep the alias name for output
/// but resolve through [`TypeDenoter::aliased`] for every type query.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeDenoter {
    Void,
    Base(DataType),
    Buffer(BufferTypeDenoter),
    Sampler(SamplerTypeDenoter),
    Struct(StructTypeDenoter),
    Array(ArrayTypeDenoter),
    Alias(AliasTypeDenoter),
}

/// Buffer type with the generic payload type and size of `Buffer<T, N>`
/// style declarations.
#[derive(Clone, Debug, PartialEq)]
pub struct BufferTypeDenoter {
    pub buffer_type: BufferType,
    pub generic: Option<Box<TypeDenoter>>,
    pub generic_size: i32,
}

impl BufferTypeDenoter {
    pub fn new(buffer_type: BufferType) -> Self {
        Self {
            buffer_type,
            generic: None,
            generic_size: 1,
        }
    }

    pub fn with_generic(buffer_type: BufferType, generic: TypeDenoter) -> Self {
        Self {
            buffer_type,
            generic: Some(Box::new(generic)),
            generic_size: 1,
        }
    }
}

/// Sampler object or sampler-state type.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplerTypeDenoter {
    pub sampler_type: SamplerType,
}

/// Reference to a struct declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct StructTypeDenoter {
    pub ident: String,
    pub decl: Option<Handle<StructDecl>>,
}

/// Array over a base type. A dimension of `-1` denotes an unspecified size.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayTypeDenoter {
    pub base: Box<TypeDenoter>,
    pub dims: Vec<i32>,
}

/// A named alias for another type.
#[derive(Clone, Debug, PartialEq)]
pub struct AliasTypeDenoter {
    pub ident: String,
    pub base: Box<TypeDenoter>,
}

impl TypeDenoter {
    /// Resolves alias links down to the underlying denoter.
    pub fn aliased(&self) -> &TypeDenoter {
        let mut denoter = self;
        while let TypeDenoter::Alias(alias) = denoter {
            denoter = &alias.base;
        }
        denoter
    }

    pub fn is_void(&self) -> bool {
        matches!(self.aliased(), TypeDenoter::Void)
    }

    pub fn is_base(&self) -> bool {
        matches!(self.aliased(), TypeDenoter::Base(_))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.aliased(), TypeDenoter::Base(t) if is_scalar_type(*t))
    }

    pub fn is_vector(&self) -> bool {
        matches!(self.aliased(), TypeDenoter::Base(t) if is_vector_type(*t))
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.aliased(), TypeDenoter::Struct(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.aliased(), TypeDenoter::Array(_))
    }

    pub fn is_buffer(&self) -> bool {
        matches!(self.aliased(), TypeDenoter::Buffer(_))
    }

    pub fn is_sampler(&self) -> bool {
        matches!(self.aliased(), TypeDenoter::Sampler(_))
    }

    /// Returns `true` if this denotes a sampler *state* object, which GLSL
    /// cannot express.
    pub fn is_sampler_state(&self) -> bool {
        matches!(
            self.aliased(),
            TypeDenoter::Sampler(s) if is_sampler_state_type(s.sampler_type)
        )
    }

    /// Returns the base data type, or `Undefined` for non-base denoters.
    pub fn base_data_type(&self) -> DataType {
        match self.aliased() {
            TypeDenoter::Base(t) => *t,
            _ => DataType::Undefined,
        }
    }

    /// Returns the buffer denoter, walking through aliases.
    pub fn as_buffer(&self) -> Option<&BufferTypeDenoter> {
        match self.aliased() {
            TypeDenoter::Buffer(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the struct denoter, walking through aliases.
    pub fn as_struct(&self) -> Option<&StructTypeDenoter> {
        match self.aliased() {
            TypeDenoter::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the array denoter, walking through aliases.
    pub fn as_array(&self) -> Option<&ArrayTypeDenoter> {
        match self.aliased() {
            TypeDenoter::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the element type for one level of subscripting: arrays yield
    /// their base (or a shallower array), buffers their generic payload,
    /// vectors their scalar, and matrices their row vector.
    pub fn subscripted(&self) -> Option<TypeDenoter> {
        match self.aliased() {
            TypeDenoter::Array(array) => {
                if array.dims.len() > 1 {
                    Some(TypeDenoter::Array(ArrayTypeDenoter {
                        base: array.base.clone(),
                        dims: array.dims[1..].to_vec(),
                    }))
                } else {
                    Some((*array.base).clone())
                }
            }
            TypeDenoter::Buffer(buffer) => match &buffer.generic {
                Some(generic) => Some((**generic).clone()),
                None => Some(TypeDenoter::Base(DataType::Float4)),
            },
            TypeDenoter::Base(t) if is_vector_type(*t) => {
                Some(TypeDenoter::Base(types::base_data_type(*t)))
            }
            TypeDenoter::Base(t) if types::is_matrix_type(*t) => {
                let (_, cols) = types::matrix_type_dim(*t);
                Some(TypeDenoter::Base(types::vector_data_type(
                    types::base_data_type(*t),
                    cols,
                )))
            }
            _ => None,
        }
    }

    /// Compares two denoters for overload resolution, ignoring buffer
    /// generic sub-types (GLSL draws no distinction between, e.g.,
    /// `Buffer<float>` and `Buffer<int>`).
    pub fn equals_ignore_generic(&self, other: &TypeDenoter) -> bool {
        match (self.aliased(), other.aliased()) {
            (TypeDenoter::Buffer(a), TypeDenoter::Buffer(b)) => a.buffer_type == b.buffer_type,
            (TypeDenoter::Array(a), TypeDenoter::Array(b)) => {
                a.dims == b.dims && a.base.equals_ignore_generic(&b.base)
            }
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for TypeDenoter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => f.write_str("void"),
            Self::Base(t) => f.write_str(t.to_str()),
            Self::Buffer(b) => match &b.generic {
                Some(generic) => write!(f, "{}<{}>", b.buffer_type.to_str(), generic),
                None => f.write_str(b.buffer_type.to_str()),
            },
            Self::Sampler(s) => write!(f, "{:?}", s.sampler_type),
            Self::Struct(s) => f.write_str(&s.ident),
            Self::Array(a) => {
                write!(f, "{}", a.base)?;
                for dim in &a.dims {
                    if *dim < 0 {
                        write!(f, "[]")?;
                    } else {
                        write!(f, "[{dim}]")?;
                    }
                }
                Ok(())
            }
            Self::Alias(a) => f.write_str(&a.ident),
        }
    }
}

impl From<DataType> for TypeDenoter {
    fn from(t: DataType) -> Self {
        Self::Base(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alias_of(ident: &str, base: TypeDenoter) -> TypeDenoter {
        TypeDenoter::Alias(AliasTypeDenoter {
            ident: ident.to_string(),
            base: Box::new(base),
        })
    }

    #[test]
    fn aliased_resolves_chains() {
        let ty = alias_of("A", alias_of("B", TypeDenoter::Base(DataType::Float3)));
        assert_eq!(ty.aliased(), &TypeDenoter::Base(DataType::Float3));
        assert!(ty.is_vector());
        assert_eq!(ty.base_data_type(), DataType::Float3);
    }

    #[test]
    fn sampler_state_through_alias() {
        let ty = alias_of(
            "MySampler",
            TypeDenoter::Sampler(SamplerTypeDenoter {
                sampler_type: SamplerType::SamplerComparisonState,
            }),
        );
        assert!(ty.is_sampler_state());

        let plain = TypeDenoter::Sampler(SamplerTypeDenoter {
            sampler_type: SamplerType::Sampler2D,
        });
        assert!(plain.is_sampler() && !plain.is_sampler_state());
    }

    #[test]
    fn array_subscripting() {
        let ty = TypeDenoter::Array(ArrayTypeDenoter {
            base: Box::new(TypeDenoter::Base(DataType::Float)),
            dims: vec![4, 2],
        });
        let sub = ty.subscripted().unwrap();
        assert_eq!(
            sub,
            TypeDenoter::Array(ArrayTypeDenoter {
                base: Box::new(TypeDenoter::Base(DataType::Float)),
                dims: vec![2],
            })
        );
        assert_eq!(
            sub.subscripted().unwrap(),
            TypeDenoter::Base(DataType::Float)
        );
    }

    #[test]
    fn buffer_subscripting_yields_generic() {
        let ty = TypeDenoter::Buffer(BufferTypeDenoter::with_generic(
            BufferType::RWTexture2D,
            TypeDenoter::Base(DataType::UInt),
        ));
        assert_eq!(ty.subscripted().unwrap(), TypeDenoter::Base(DataType::UInt));
    }

    #[test]
    fn vector_and_matrix_subscripting() {
        let vec = TypeDenoter::Base(DataType::Float4);
        assert_eq!(
            vec.subscripted().unwrap(),
            TypeDenoter::Base(DataType::Float)
        );

        let mat = TypeDenoter::Base(DataType::Float3x4);
        assert_eq!(
            mat.subscripted().unwrap(),
            TypeDenoter::Base(DataType::Float4)
        );
    }

    #[test]
    fn generic_sub_types_ignored_in_comparison() {
        let a = TypeDenoter::Buffer(BufferTypeDenoter::with_generic(
            BufferType::Buffer,
            TypeDenoter::Base(DataType::Float),
        ));
        let b = TypeDenoter::Buffer(BufferTypeDenoter::with_generic(
            BufferType::Buffer,
            TypeDenoter::Base(DataType::Int),
        ));
        assert!(a.equals_ignore_generic(&b));
        assert_ne!(a, b);

        let c = TypeDenoter::Buffer(BufferTypeDenoter::new(BufferType::StructuredBuffer));
        assert!(!a.equals_ignore_generic(&c));
    }

    #[test]
    fn display() {
        let ty = TypeDenoter::Array(ArrayTypeDenoter {
            base: Box::new(TypeDenoter::Base(DataType::Float3)),
            dims: vec![2, -1],
        });
        assert_eq!(ty.to_string(), "float3[2][]");
    }
}

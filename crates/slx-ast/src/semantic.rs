//! Shader semantics: system values and user-defined semantic names.

use std::cmp::Ordering;
use std::fmt;

use crate::enum_strings;

/// Semantic enumeration over the system values, plus `UserDefined` for
/// free-form user semantics.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum Semantic {
    #[default]
    Undefined,
    UserDefined,

    ClipDistance,
    CullDistance,
    Coverage,
    Depth,
    DepthGreaterEqual,
    DepthLessEqual,
    DispatchThreadId,
    DomainLocation,
    FragCoord,
    GroupId,
    GroupIndex,
    GroupThreadId,
    GsInstanceId,
    InnerCoverage,
    InsideTessFactor,
    InstanceId,
    IsFrontFace,
    OutputControlPointId,
    PointSize,
    PrimitiveId,
    RenderTargetArrayIndex,
    SampleIndex,
    StencilRef,
    Target,
    TessFactor,
    VertexId,
    VertexPosition,
    ViewportArrayIndex,
}

enum_strings!(Semantic,
    Undefined => "<undefined>",
    UserDefined => "<user-defined>",
    ClipDistance => "SV_ClipDistance",
    CullDistance => "SV_CullDistance",
    Coverage => "SV_Coverage",
    Depth => "SV_Depth",
    DepthGreaterEqual => "SV_DepthGreaterEqual",
    DepthLessEqual => "SV_DepthLessEqual",
    DispatchThreadId => "SV_DispatchThreadID",
    DomainLocation => "SV_DomainLocation",
    FragCoord => "SV_Position",
    GroupId => "SV_GroupID",
    GroupIndex => "SV_GroupIndex",
    GroupThreadId => "SV_GroupThreadID",
    GsInstanceId => "SV_GSInstanceID",
    InnerCoverage => "SV_InnerCoverage",
    InsideTessFactor => "SV_InsideTessFactor",
    InstanceId => "SV_InstanceID",
    IsFrontFace => "SV_IsFrontFace",
    OutputControlPointId => "SV_OutputControlPointID",
    PointSize => "PSIZE",
    PrimitiveId => "SV_PrimitiveID",
    RenderTargetArrayIndex => "SV_RenderTargetArrayIndex",
    SampleIndex => "SV_SampleIndex",
    StencilRef => "SV_StencilRef",
    Target => "SV_Target",
    TessFactor => "SV_TessFactor",
    VertexId => "SV_VertexID",
    VertexPosition => "POSITION",
    ViewportArrayIndex => "SV_ViewportArrayIndex",
);

/// Returns `true` if the semantic is a system value.
pub fn is_system_semantic(t: Semantic) -> bool {
    t >= Semantic::ClipDistance && t <= Semantic::ViewportArrayIndex
}

/// Returns `true` if the semantic is user defined.
pub fn is_user_semantic(t: Semantic) -> bool {
    t == Semantic::UserDefined
}

/// A [`Semantic`] paired with an integral index, and the semantic name for
/// user-defined semantics.
///
/// Ordering is a strict weak order: by semantic kind, then index, then user
/// name.
#[derive(Clone, Debug, Default, Hash, Eq, PartialEq)]
pub struct IndexedSemantic {
    semantic: Semantic,
    index: i32,
    user_name: String,
}

impl IndexedSemantic {
    /// Creates an indexed system-value semantic.
    pub fn new(semantic: Semantic, index: i32) -> Self {
        Self {
            semantic,
            index,
            user_name: String::new(),
        }
    }

    /// Creates a user-defined semantic, splitting a trailing decimal index
    /// off the name (`TEXCOORD3` becomes name `TEXCOORD`, index 3).
    pub fn user_defined(name: &str) -> Self {
        let digits = name.len() - name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        let (base, index_str) = name.split_at(name.len() - digits);
        Self {
            semantic: Semantic::UserDefined,
            index: index_str.parse().unwrap_or(0),
            user_name: base.to_string(),
        }
    }

    pub fn semantic(&self) -> Semantic {
        self.semantic
    }

    pub fn index(&self) -> i32 {
        self.index
    }

    /// Replaces the index, keeping kind and name.
    pub fn reset_index(&mut self, index: i32) {
        self.index = index;
    }

    pub fn is_valid(&self) -> bool {
        self.semantic != Semantic::Undefined
    }

    pub fn is_system_value(&self) -> bool {
        is_system_semantic(self.semantic)
    }

    pub fn is_user_defined(&self) -> bool {
        is_user_semantic(self.semantic)
    }

    /// Converts a system value to a user-defined semantic, optionally with a
    /// replacement name.
    pub fn make_user_defined(&mut self, name: &str) {
        self.semantic = Semantic::UserDefined;
        if !name.is_empty() {
            self.user_name = name.to_string();
        }
    }
}

impl fmt::Display for IndexedSemantic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_user_defined() {
            f.write_str(&self.user_name)
        } else {
            f.write_str(self.semantic.to_str())
        }
    }
}

impl PartialOrd for IndexedSemantic {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexedSemantic {
    fn cmp(&self, other: &Self) -> Ordering {
        self.semantic
            .cmp(&other.semantic)
            .then(self.index.cmp(&other.index))
            .then_with(|| self.user_name.cmp(&other.user_name))
    }
}

impl From<Semantic> for IndexedSemantic {
    fn from(semantic: Semantic) -> Self {
        Self::new(semantic, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_value_partition() {
        assert!(is_system_semantic(Semantic::FragCoord));
        assert!(is_system_semantic(Semantic::Target));
        assert!(!is_system_semantic(Semantic::UserDefined));
        assert!(!is_system_semantic(Semantic::Undefined));
    }

    #[test]
    fn user_defined_index_split() {
        let sem = IndexedSemantic::user_defined("TEXCOORD3");
        assert!(sem.is_user_defined());
        assert_eq!(sem.index(), 3);
        assert_eq!(sem.to_string(), "TEXCOORD");

        let sem = IndexedSemantic::user_defined("NORMAL");
        assert_eq!(sem.index(), 0);
        assert_eq!(sem.to_string(), "NORMAL");
    }

    #[test]
    fn system_value_to_string() {
        let sem = IndexedSemantic::new(Semantic::Target, 2);
        assert_eq!(sem.to_string(), "SV_Target");
        assert_eq!(sem.index(), 2);
    }

    #[test]
    fn strict_weak_order() {
        let a = IndexedSemantic::new(Semantic::Depth, 0);
        let b = IndexedSemantic::new(Semantic::Target, 0);
        let c = IndexedSemantic::new(Semantic::Target, 1);
        let d = IndexedSemantic::user_defined("COLOR0");
        let e = IndexedSemantic::user_defined("NORMAL0");
        assert!(a < b);
        assert!(b < c);
        assert!(d < a); // UserDefined precedes all system values
        assert!(d < e);
    }

    #[test]
    fn make_user_defined() {
        let mut sem = IndexedSemantic::new(Semantic::VertexId, 0);
        sem.make_user_defined("VERTEXID");
        assert!(sem.is_user_defined());
        assert_eq!(sem.to_string(), "VERTEXID");
    }
}

//! Semantic annotation flags on AST nodes.

/// Bitflags written by the upstream analyzer passes and consumed by
/// reflection and lowering.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq)]
pub struct AstFlags(u32);

impl AstFlags {
    /// No flags set.
    pub const EMPTY: Self = Self(0);
    /// The function is the shader entry point.
    pub const ENTRY_POINT: Self = Self(1);
    /// The variable is a shader input (exempt from renaming).
    pub const SHADER_INPUT: Self = Self(1 << 1);
    /// The node is reachable from the entry point.
    pub const REACHABLE: Self = Self(1 << 2);
    /// The statement was proven unreachable and must be pruned.
    pub const DEAD_CODE: Self = Self(1 << 3);
    /// The parameter is a synthesized `self` parameter.
    pub const SELF_PARAMETER: Self = Self(1 << 4);
    /// The variable is an array without a static dimension.
    pub const DYNAMIC_ARRAY: Self = Self(1 << 5);
    /// The expression must not be written through.
    pub const IMMUTABLE: Self = Self(1 << 6);
    /// The struct is used as a non-entry-point function parameter.
    pub const NON_ENTRY_POINT_PARAM: Self = Self(1 << 7);
    /// The declaration has `static` storage.
    pub const STATIC: Self = Self(1 << 8);

    /// Returns `true` if `self` contains all flags in `other`.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no flags are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Removes all flags in `other`.
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl std::ops::BitOr for AstFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for AstFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

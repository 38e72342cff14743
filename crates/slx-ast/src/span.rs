//! Source locations for diagnostics.

use std::fmt;

/// A position in the shader source, 1-based.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
}

impl SourcePosition {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Returns `true` if the position refers to an actual source location.
    pub fn is_valid(self) -> bool {
        self.line > 0 && self.column > 0
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The source region an AST node was parsed from.
///
/// Reports attach this to diagnostics. Nodes synthesized by conversion
/// passes use [`SourceArea::IGNORE`].
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq)]
pub struct SourceArea {
    pub pos: SourcePosition,
    pub length: u32,
}

impl SourceArea {
    /// Sentinel area for nodes without a source location.
    pub const IGNORE: Self = Self {
        pos: SourcePosition { line: 0, column: 0 },
        length: 0,
    };

    pub fn new(pos: SourcePosition, length: u32) -> Self {
        Self { pos, length }
    }

    /// Returns `true` if the area refers to an actual source region.
    pub fn is_valid(self) -> bool {
        self.pos.is_valid() && self.length > 0
    }
}

impl fmt::Display for SourceArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignore_area_is_invalid() {
        assert!(!SourceArea::IGNORE.is_valid());
        assert!(SourceArea::new(SourcePosition::new(3, 14), 5).is_valid());
    }

    #[test]
    fn display_format() {
        let area = SourceArea::new(SourcePosition::new(12, 8), 3);
        assert_eq!(area.to_string(), "12:8");
    }
}

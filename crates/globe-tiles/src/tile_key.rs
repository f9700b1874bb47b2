//! Quadtree addressing: `(level, row, column)`.

use std::fmt;

/// Identifies a tile by its position in the quadtree.
///
/// Top-level tiles sit at level 0 on a `rows x columns` grid. A tile's
/// children are at the next level with rows `2r, 2r+1` and columns `2c, 2c+1`,
/// rows growing with latitude and columns with longitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey {
    pub level: u32,
    pub row: u32,
    pub column: u32,
}

impl TileKey {
    pub const fn new(level: u32, row: u32, column: u32) -> Self {
        Self { level, row, column }
    }

    /// Keys of the four children, in quadrant order:
    /// `(2r, 2c), (2r, 2c+1), (2r+1, 2c), (2r+1, 2c+1)`.
    pub fn children(&self) -> [TileKey; 4] {
        let level = self.level + 1;
        let (r, c) = (self.row * 2, self.column * 2);
        [
            TileKey::new(level, r, c),
            TileKey::new(level, r, c + 1),
            TileKey::new(level, r + 1, c),
            TileKey::new(level, r + 1, c + 1),
        ]
    }

    /// Whether the child keys of this tile are representable.
    pub fn can_split(&self) -> bool {
        let fits = |index: u32| index.checked_mul(2).and_then(|i| i.checked_add(1)).is_some();
        self.level < u32::MAX && fits(self.row) && fits(self.column)
    }

    /// Key of the parent tile, `None` at level 0.
    pub fn parent(&self) -> Option<TileKey> {
        (self.level > 0).then(|| TileKey::new(self.level - 1, self.row / 2, self.column / 2))
    }

    /// Position of this tile in its parent's children array.
    pub fn quadrant(&self) -> usize {
        ((self.row & 1) * 2 + (self.column & 1)) as usize
    }

    /// The ancestor (or self) at `level`, `None` if `level` is deeper than this key.
    pub fn ancestor_at(&self, level: u32) -> Option<TileKey> {
        let shift = self.level.checked_sub(level)?;
        Some(TileKey::new(
            level,
            self.row.checked_shr(shift).unwrap_or(0),
            self.column.checked_shr(shift).unwrap_or(0),
        ))
    }

    /// Returns true if `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &TileKey) -> bool {
        self.level < other.level && other.ancestor_at(self.level) == Some(*self)
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}/{}/{}", self.level, self.row, self.column)
    }
}

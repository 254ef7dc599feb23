//! Affine coordinate maps and flat facelet indexing.
//!
//! A rotation of `(side, layer)` moves, for each `offset` in `0..size`, one
//! facelet on each of the four ring neighbours. Which row and column of the
//! neighbour that is depends on how the neighbour is oriented relative to the
//! rotated side; the four canonical orientations are the [`Affine`] variants.

use crate::geometry::Side;

/// One of the four orientations a ring neighbour can have.
///
/// Named after the corner the walk starts from and the direction it heads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Affine {
    /// Row = layer, walking right to left.
    UL,
    /// Column = layer, walking top to bottom.
    LD,
    /// Row = size-1-layer, walking left to right.
    DR,
    /// Column = size-1-layer, walking bottom to top.
    RU,
}

impl Affine {
    /// Row on the neighbour face.
    #[inline]
    #[must_use]
    pub const fn row(self, size: usize, layer: usize, offset: usize) -> usize {
        match self {
            Affine::UL => layer,
            Affine::LD => offset,
            Affine::DR => size - 1 - layer,
            Affine::RU => size - 1 - offset,
        }
    }

    /// Column on the neighbour face.
    #[inline]
    #[must_use]
    pub const fn column(self, size: usize, layer: usize, offset: usize) -> usize {
        match self {
            Affine::UL => size - 1 - offset,
            Affine::LD => layer,
            Affine::DR => offset,
            Affine::RU => size - 1 - layer,
        }
    }
}

/// Maps `(side, row, column)` to positions in the flat facelet array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Indexer {
    size: usize,
}

impl Indexer {
    /// Creates an indexer for a cube of the given size.
    #[must_use]
    pub const fn new(size: usize) -> Self {
        Self { size }
    }

    /// Edge length of the cube.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Number of facelets on one face.
    #[inline]
    #[must_use]
    pub const fn face_len(&self) -> usize {
        self.size * self.size
    }

    /// Total number of facelets.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        Side::COUNT * self.face_len()
    }

    /// Always false: a cube has at least one facelet per side.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Flat index of a facelet.
    #[inline]
    #[must_use]
    pub const fn index(&self, side: Side, row: usize, column: usize) -> usize {
        column + self.size * (row + self.size * side.index())
    }

    /// Flat indices of the four facelets forming one rotation cycle, in ring
    /// order. The facelet at position `k` moves to position `k + 1` (mod 4).
    #[must_use]
    pub fn cycle(&self, side: Side, layer: usize, offset: usize) -> [usize; 4] {
        let ring = side.ring();
        let maps = side.coord_maps();
        std::array::from_fn(|k| {
            let map = maps[k];
            self.index(
                ring[k],
                map.row(self.size, layer, offset),
                map.column(self.size, layer, offset),
            )
        })
    }
}

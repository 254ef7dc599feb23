//! Sides, axes and the static ring tables that drive every rotation.

use crate::error::{CubeError, CubeResult};
use crate::geometry::Affine;

/// One of the three rotation axes. Each axis pairs two opposite sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Axis {
    /// Top and bottom.
    TopBottom = 0,
    /// Left and right.
    LeftRight = 1,
    /// Front and back.
    FrontBack = 2,
}

impl Axis {
    /// All axes in ordinal order.
    pub const ALL: [Axis; 3] = [Axis::TopBottom, Axis::LeftRight, Axis::FrontBack];

    /// Ordinal of this axis, usable as an array index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The two axes that are not `self`, in ordinal order.
    #[must_use]
    pub const fn others(self) -> [Axis; 2] {
        match self {
            Axis::TopBottom => [Axis::LeftRight, Axis::FrontBack],
            Axis::LeftRight => [Axis::TopBottom, Axis::FrontBack],
            Axis::FrontBack => [Axis::TopBottom, Axis::LeftRight],
        }
    }

    /// The side with parity +1 and the side with parity -1.
    #[must_use]
    pub const fn sides(self) -> [Side; 2] {
        match self {
            Axis::TopBottom => [Side::Top, Side::Bottom],
            Axis::LeftRight => [Side::Left, Side::Right],
            Axis::FrontBack => [Side::Front, Side::Back],
        }
    }
}

/// One of the six faces, in the fixed enumeration order used by `show()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Side {
    /// Side 0.
    Top = 0,
    /// Side 1.
    Left = 1,
    /// Side 2.
    Front = 2,
    /// Side 3.
    Right = 3,
    /// Side 4.
    Back = 4,
    /// Side 5.
    Bottom = 5,
}

/// A 90 degree turn of a whole face that accompanies an edge-layer rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceTurn {
    /// The face whose own grid turns.
    pub face: Side,
    /// Number of clockwise quarter turns (1 or 3).
    pub quarter_turns: u8,
}

impl Side {
    /// Number of sides.
    pub const COUNT: usize = 6;

    /// All sides in ordinal order.
    pub const ALL: [Side; 6] = [
        Side::Top,
        Side::Left,
        Side::Front,
        Side::Right,
        Side::Back,
        Side::Bottom,
    ];

    /// Converts a raw side index.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidSide`] if `index >= 6`.
    pub fn from_index(index: usize) -> CubeResult<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(CubeError::InvalidSide(index))
    }

    /// Ordinal of this side. Also the color its facelets start with.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The axis this side rotates around.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Side::Top | Side::Bottom => Axis::TopBottom,
            Side::Left | Side::Right => Axis::LeftRight,
            Side::Front | Side::Back => Axis::FrontBack,
        }
    }

    /// +1 for top, left and front; -1 for their opposites.
    #[must_use]
    pub const fn parity(self) -> i8 {
        match self {
            Side::Top | Side::Left | Side::Front => 1,
            Side::Right | Side::Back | Side::Bottom => -1,
        }
    }

    /// The side facing away from this one.
    #[must_use]
    pub const fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Left => Side::Right,
            Side::Front => Side::Back,
            Side::Right => Side::Left,
            Side::Back => Side::Front,
            Side::Bottom => Side::Top,
        }
    }

    /// The four neighbours whose border facelets a rotation of this side
    /// drags around. A facelet at ring position `k` moves to position `k + 1`.
    #[must_use]
    pub const fn ring(self) -> [Side; 4] {
        use Side::{Back, Bottom, Front, Left, Right, Top};
        match self {
            Top => [Back, Right, Front, Left],
            Left => [Top, Front, Bottom, Back],
            Front => [Left, Top, Right, Bottom],
            Right => [Back, Bottom, Front, Top],
            Back => [Bottom, Right, Top, Left],
            Bottom => [Left, Front, Right, Back],
        }
    }

    /// Coordinate map for each entry of [`Side::ring`].
    #[must_use]
    pub const fn coord_maps(self) -> [Affine; 4] {
        use Affine::{DR, LD, RU, UL};
        match self {
            Side::Top => [UL, UL, UL, UL],
            Side::Left => [LD, LD, LD, RU],
            Side::Front => [RU, DR, LD, UL],
            Side::Right => [LD, RU, RU, RU],
            Side::Back => [DR, RU, UL, LD],
            Side::Bottom => [DR, DR, DR, DR],
        }
    }

    /// Layer index as seen from the parity +1 side of the axis.
    ///
    /// Two requests move the same physical slice iff they share an axis and
    /// a normalized layer.
    #[inline]
    #[must_use]
    pub const fn normalized_layer(self, layer: usize, size: usize) -> usize {
        if self.parity() < 0 {
            size - 1 - layer
        } else {
            layer
        }
    }

    /// The face turn implied by rotating `layer`, if it is an edge layer.
    ///
    /// Layer 0 turns this side clockwise; layer `size - 1` turns the opposite
    /// side counter-clockwise. On a 1x1x1 cube layer 0 wins.
    #[must_use]
    pub const fn face_turn(self, layer: usize, size: usize) -> Option<FaceTurn> {
        if layer == 0 {
            Some(FaceTurn {
                face: self,
                quarter_turns: 1,
            })
        } else if layer == size - 1 {
            Some(FaceTurn {
                face: self.opposite(),
                quarter_turns: 3,
            })
        } else {
            None
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Side::Top => "top",
            Side::Left => "left",
            Side::Front => "front",
            Side::Right => "right",
            Side::Back => "back",
            Side::Bottom => "bottom",
        };
        f.write_str(name)
    }
}

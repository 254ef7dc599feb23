//! # Facelet State Store
//!
//! The `6 * N * N` facelet array and the sequential rotation that mutates it.
//!
//! `FaceletState` knows nothing about threads. The concurrent [`Cube`]
//! keeps one behind a short-lived mutex; tests and tools use a bare one as
//! the trusted single-threaded reference.
//!
//! [`Cube`]: crate::Cube

use crate::error::{CubeError, CubeResult};
use crate::geometry::{Indexer, Side};

/// Colors of every facelet, addressed by `(side, row, column)`.
///
/// A color is the index of the side it started on (`0..6`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceletState {
    indexer: Indexer,
    facelets: Vec<u8>,
}

impl FaceletState {
    /// Creates a solved cube: every facelet holds its own side's color.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidSize`] if `size` is zero.
    pub fn new(size: usize) -> CubeResult<Self> {
        if size == 0 {
            return Err(CubeError::InvalidSize(size));
        }
        let indexer = Indexer::new(size);
        let face_len = indexer.face_len();
        let mut facelets = Vec::with_capacity(indexer.len());
        for side in Side::ALL {
            // Side ordinals are < 6.
            facelets.extend(std::iter::repeat(side.index() as u8).take(face_len));
        }
        Ok(Self { indexer, facelets })
    }

    /// Parses the output of [`FaceletState::serialize`] (or `show()`).
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidSize`] for a zero size and
    /// [`CubeError::InvalidState`] if `serialized` has the wrong length or a
    /// character outside `'0'..='5'`.
    pub fn from_serialized(size: usize, serialized: &str) -> CubeResult<Self> {
        let mut state = Self::new(size)?;
        if serialized.len() != state.facelets.len() {
            return Err(CubeError::InvalidState(format!(
                "{} characters for size {size}",
                serialized.len()
            )));
        }
        for (facelet, b) in state.facelets.iter_mut().zip(serialized.bytes()) {
            match b {
                b'0'..=b'5' => *facelet = b - b'0',
                _ => {
                    return Err(CubeError::InvalidState(format!(
                        "unexpected color {:?}",
                        char::from(b)
                    )));
                }
            }
        }
        Ok(state)
    }

    /// Edge length.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.indexer.size()
    }

    /// Raw facelet colors in `(side, row, column)` order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.facelets
    }

    /// Color of one facelet.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `column` is not below the cube size.
    #[must_use]
    pub fn facelet(&self, side: Side, row: usize, column: usize) -> u8 {
        assert!(row < self.size() && column < self.size(), "facelet out of range");
        self.facelets[self.indexer.index(side, row, column)]
    }

    /// Validates a raw rotation request and applies it.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidSide`] or [`CubeError::InvalidLayer`] for
    /// out-of-range input; the state is untouched in that case.
    pub fn apply(&mut self, side: usize, layer: usize) -> CubeResult<()> {
        let side = Side::from_index(side)?;
        if layer >= self.size() {
            return Err(CubeError::InvalidLayer {
                layer,
                size: self.size(),
            });
        }
        self.rotate(side, layer);
        Ok(())
    }

    /// Rotates one layer, seen from `side`, a quarter turn.
    ///
    /// `layer` must be below the cube size.
    pub fn rotate(&mut self, side: Side, layer: usize) {
        let size = self.size();
        debug_assert!(layer < size);

        for offset in 0..size {
            let cycle = self.indexer.cycle(side, layer, offset);
            let saved = cycle.map(|idx| self.facelets[idx]);
            for (k, &color) in saved.iter().enumerate() {
                self.facelets[cycle[(k + 1) % 4]] = color;
            }
        }

        if let Some(turn) = side.face_turn(layer, size) {
            for _ in 0..turn.quarter_turns {
                self.turn_face_clockwise(turn.face);
            }
        }
    }

    /// Turns one face's own grid 90 degrees clockwise.
    fn turn_face_clockwise(&mut self, face: Side) {
        let size = self.size();
        let start = self.indexer.index(face, 0, 0);
        let end = start + self.indexer.face_len();
        let saved = self.facelets[start..end].to_vec();
        let grid = &mut self.facelets[start..end];
        for x in 0..size {
            for y in 0..size {
                grid[y * size + (size - 1 - x)] = saved[x * size + y];
            }
        }
    }

    /// Serializes every facelet as one `'0'..='5'` character.
    #[must_use]
    pub fn serialize(&self) -> String {
        self.facelets.iter().map(|&c| char::from(b'0' + c)).collect()
    }

    /// Number of facelets of each color.
    #[must_use]
    pub fn color_counts(&self) -> [usize; 6] {
        let mut counts = [0usize; 6];
        for &c in &self.facelets {
            counts[usize::from(c)] += 1;
        }
        counts
    }

    /// Every color appears exactly `size * size` times.
    ///
    /// Holds after any sequence of rotations; a failure means a torn or lost
    /// update.
    #[must_use]
    pub fn is_color_balanced(&self) -> bool {
        let face_len = self.indexer.face_len();
        self.color_counts().iter().all(|&n| n == face_len)
    }

    /// Every face is a single color.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        let face_len = self.indexer.face_len();
        self.facelets
            .chunks(face_len)
            .all(|face| face.iter().all(|&c| c == face[0]))
    }
}

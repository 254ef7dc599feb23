//! # Known Sequences
//!
//! Fixed rotation sequences with their expected final states, run against
//! the concurrent cube and cross-checked with the sequential model.

use cube_core::{Cube, FaceletState, NoHooks};

use crate::error::CliResult;

/// A rotation sequence on a fresh cube and the state it must end in.
#[derive(Clone, Copy, Debug)]
pub struct KnownSequence {
    /// Short label for reports.
    pub name: &'static str,
    /// Edge length.
    pub size: usize,
    /// `(side, layer)` requests in order.
    pub moves: &'static [(usize, usize)],
    /// Expected `show()` result.
    pub expected: &'static str,
}

/// Result of running one [`KnownSequence`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    /// What the concurrent cube showed.
    pub shown: String,
    /// What the sequential model produced.
    pub model: String,
    /// Both match the expected state.
    pub passed: bool,
}

/// Every sequence `cube_validate` runs.
pub const KNOWN_SEQUENCES: [KnownSequence; 2] = [
    KnownSequence {
        name: "front then bottom slice (size 4)",
        size: 4,
        moves: &[(2, 0), (5, 1)],
        expected: concat!(
            "0000000000001111",
            "1115111544441115",
            "2222222211152222",
            "0333033322220333",
            "4444444403334444",
            "3333555555555555",
        ),
    },
    KnownSequence {
        name: "three axes, parity-reflected layers (size 3)",
        size: 3,
        moves: &[(1, 1), (0, 2), (3, 2)],
        expected: "240240340112110112502202533333333454450450110155422455",
    },
];

impl KnownSequence {
    /// Runs the moves on a fresh cube and on a fresh model.
    ///
    /// # Errors
    ///
    /// Propagates any [`CubeError`](cube_core::CubeError) from the cube or
    /// the model.
    pub fn run(&self) -> CliResult<Verdict> {
        let cube = Cube::new(self.size, NoHooks)?;
        let mut model = FaceletState::new(self.size)?;
        for &(side, layer) in self.moves {
            cube.rotate(side, layer)?;
            model.apply(side, layer)?;
        }

        let shown = cube.show()?;
        let model = model.serialize();
        let passed = shown == self.expected && model == self.expected;
        tracing::debug!(name = self.name, passed, "sequence checked");
        Ok(Verdict {
            shown,
            model,
            passed,
        })
    }
}

//! # Geometry Model
//!
//! Pure, stateless mapping from a rotation request to the facelets it moves.
//! Nothing in here locks or allocates.
//!
//! ```text
//!              ┌───────┐
//!              │ Top 0 │
//!      ┌───────┼───────┼───────┬───────┐
//!      │Left 1 │Front 2│Right 3│Back 4 │
//!      └───────┼───────┼───────┴───────┘
//!              │Bott. 5│
//!              └───────┘
//! ```

mod affine;
mod side;

pub use affine::{Affine, Indexer};
pub use side::{Axis, FaceTurn, Side};

//! # Instrumentation Hooks
//!
//! Callbacks the protocols invoke at fixed points, used by tests and tools
//! to observe or stall operations.
//!
//! ## Locks Held During Each Hook
//!
//! | hook              | held by the calling operation                  |
//! |-------------------|------------------------------------------------|
//! | `before_rotation` | shared axis lock, exclusive slice lock         |
//! | `after_rotation`  | shared axis lock, exclusive slice lock         |
//! | `before_showing`  | shared snapshot fence                          |
//! | `after_showing`   | shared snapshot fence                          |
//!
//! The setup lock is never held during a hook, and the facelet mutex is
//! never held during a hook. Hooks may block for as long as they like.
//!
//! ## Errors
//!
//! A hook error becomes the operation's result. An error from a `before_*`
//! hook skips the mutation or snapshot and the matching `after_*` hook.

use crate::error::CubeResult;
use crate::geometry::Side;

/// The four instrumentation points.
///
/// Every method defaults to a no-op.
pub trait CubeHooks: Send + Sync {
    /// Called before the facelets of a rotation move.
    fn before_rotation(&self, _side: Side, _layer: usize) -> CubeResult<()> {
        Ok(())
    }

    /// Called after the facelets of a rotation moved.
    fn after_rotation(&self, _side: Side, _layer: usize) -> CubeResult<()> {
        Ok(())
    }

    /// Called before a snapshot is taken.
    fn before_showing(&self) -> CubeResult<()> {
        Ok(())
    }

    /// Called after a snapshot was taken.
    fn after_showing(&self) -> CubeResult<()> {
        Ok(())
    }
}

/// Hook set that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHooks;

impl CubeHooks for NoHooks {}

impl<H: CubeHooks + ?Sized> CubeHooks for std::sync::Arc<H> {
    fn before_rotation(&self, side: Side, layer: usize) -> CubeResult<()> {
        (**self).before_rotation(side, layer)
    }

    fn after_rotation(&self, side: Side, layer: usize) -> CubeResult<()> {
        (**self).after_rotation(side, layer)
    }

    fn before_showing(&self) -> CubeResult<()> {
        (**self).before_showing()
    }

    fn after_showing(&self) -> CubeResult<()> {
        (**self).after_showing()
    }
}

type RotationFn = Box<dyn Fn(Side, usize) -> CubeResult<()> + Send + Sync>;
type ShowFn = Box<dyn Fn() -> CubeResult<()> + Send + Sync>;

/// Hook set assembled from closures.
///
/// ## Usage
///
/// ```rust,ignore
/// let hooks = FnHooks::new()
///     .on_before_rotation(|side, layer| {
///         println!("rotating {side} layer {layer}");
///         Ok(())
///     })
///     .on_after_showing(|| Ok(()));
/// let cube = Cube::new(3, hooks)?;
/// ```
#[derive(Default)]
pub struct FnHooks {
    before_rotation: Option<RotationFn>,
    after_rotation: Option<RotationFn>,
    before_showing: Option<ShowFn>,
    after_showing: Option<ShowFn>,
}

impl FnHooks {
    /// Empty hook set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `before_rotation` callback.
    #[must_use]
    pub fn on_before_rotation<F>(mut self, f: F) -> Self
    where
        F: Fn(Side, usize) -> CubeResult<()> + Send + Sync + 'static,
    {
        self.before_rotation = Some(Box::new(f));
        self
    }

    /// Sets the `after_rotation` callback.
    #[must_use]
    pub fn on_after_rotation<F>(mut self, f: F) -> Self
    where
        F: Fn(Side, usize) -> CubeResult<()> + Send + Sync + 'static,
    {
        self.after_rotation = Some(Box::new(f));
        self
    }

    /// Sets the `before_showing` callback.
    #[must_use]
    pub fn on_before_showing<F>(mut self, f: F) -> Self
    where
        F: Fn() -> CubeResult<()> + Send + Sync + 'static,
    {
        self.before_showing = Some(Box::new(f));
        self
    }

    /// Sets the `after_showing` callback.
    #[must_use]
    pub fn on_after_showing<F>(mut self, f: F) -> Self
    where
        F: Fn() -> CubeResult<()> + Send + Sync + 'static,
    {
        self.after_showing = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for FnHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnHooks")
            .field("before_rotation", &self.before_rotation.is_some())
            .field("after_rotation", &self.after_rotation.is_some())
            .field("before_showing", &self.before_showing.is_some())
            .field("after_showing", &self.after_showing.is_some())
            .finish()
    }
}

impl CubeHooks for FnHooks {
    fn before_rotation(&self, side: Side, layer: usize) -> CubeResult<()> {
        self.before_rotation.as_ref().map_or(Ok(()), |f| f(side, layer))
    }

    fn after_rotation(&self, side: Side, layer: usize) -> CubeResult<()> {
        self.after_rotation.as_ref().map_or(Ok(()), |f| f(side, layer))
    }

    fn before_showing(&self) -> CubeResult<()> {
        self.before_showing.as_ref().map_or(Ok(()), |f| f())
    }

    fn after_showing(&self) -> CubeResult<()> {
        self.after_showing.as_ref().map_or(Ok(()), |f| f())
    }
}

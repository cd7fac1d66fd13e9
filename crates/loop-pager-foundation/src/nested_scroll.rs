//! Cooperation with an enclosing scroll container.
//!
//! A pager can be given a parent [`NestedScrollConnection`]. Every delta is
//! offered to the parent before the pager consumes it, tagged with where it
//! came from. Wrapping the parent in [`FilterUserInput`] lets it react to
//! the user's finger while ignoring the pager's own fling and snap motion.

/// Origin of a scroll delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NestedScrollSource {
    /// A drag performed by the user.
    UserInput,
    /// Motion produced by an animation (fling, snap, programmatic scroll).
    SideEffect,
}

/// Parent side of a nested scroll relationship. All amounts are pixels
/// along the pager's main axis; returned values are what the parent consumed.
pub trait NestedScrollConnection {
    fn on_pre_scroll(&self, _available: f32, _source: NestedScrollSource) -> f32 {
        0.0
    }

    fn on_post_scroll(&self, _consumed: f32, _available: f32, _source: NestedScrollSource) -> f32 {
        0.0
    }

    fn on_pre_fling(&self, _available_velocity: f32) -> f32 {
        0.0
    }

    fn on_post_fling(&self, _consumed_velocity: f32, _available_velocity: f32) -> f32 {
        0.0
    }
}

/// Forwards only user-input scrolls to the wrapped connection.
#[derive(Debug, Clone)]
pub struct FilterUserInput<C> {
    inner: C,
}

impl<C> FilterUserInput<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: NestedScrollConnection> NestedScrollConnection for FilterUserInput<C> {
    fn on_pre_scroll(&self, available: f32, source: NestedScrollSource) -> f32 {
        match source {
            NestedScrollSource::UserInput => self.inner.on_pre_scroll(available, source),
            NestedScrollSource::SideEffect => 0.0,
        }
    }

    fn on_post_scroll(&self, consumed: f32, available: f32, source: NestedScrollSource) -> f32 {
        match source {
            NestedScrollSource::UserInput => self.inner.on_post_scroll(consumed, available, source),
            NestedScrollSource::SideEffect => 0.0,
        }
    }
}

pub trait NestedScrollConnectionExt: NestedScrollConnection + Sized {
    fn filter_user_input(self) -> FilterUserInput<Self> {
        FilterUserInput::new(self)
    }
}

impl<C: NestedScrollConnection> NestedScrollConnectionExt for C {}

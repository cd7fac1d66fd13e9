/// Axis along which pages are laid out and scrolled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Orientation::Horizontal)
    }

    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, Orientation::Vertical)
    }

    /// Picks the main-axis component out of an `(x, y)` pair.
    #[inline]
    pub fn main<T>(self, x: T, y: T) -> T {
        match self {
            Orientation::Horizontal => x,
            Orientation::Vertical => y,
        }
    }

    #[inline]
    pub fn cross<T>(self, x: T, y: T) -> T {
        match self {
            Orientation::Horizontal => y,
            Orientation::Vertical => x,
        }
    }

    /// Builds an `(x, y)` pair from main and cross components.
    #[inline]
    pub fn pack<T>(self, main: T, cross: T) -> (T, T) {
        match self {
            Orientation::Horizontal => (main, cross),
            Orientation::Vertical => (cross, main),
        }
    }
}

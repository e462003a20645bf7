//! Geometry exchanged with the host layout system.
//!
//! The host measures and positions views; this module only decides where the
//! placeholder and the floating view go once sizes are known.

use crate::gravity::Gravity;
use crate::offset::ScrollOffset;

/// Integer rectangle, in the coordinates of the host layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bounds {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

impl Bounds {
    /// Creates a new rectangle.
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Bounds {
            left,
            top,
            width,
            height,
        }
    }

    /// First row below this rectangle.
    pub const fn bottom(&self) -> i32 {
        self.top.saturating_add(self.height)
    }

    /// First column right of this rectangle.
    pub const fn right(&self) -> i32 {
        self.left.saturating_add(self.width)
    }

    /// Returns the same rectangle, moved vertically to `top`.
    #[must_use]
    pub const fn with_top(self, top: i32) -> Self {
        Bounds::new(self.left, top, self.width, self.height)
    }
}

/// Size of a view, as returned by the measure pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Measured {
    /// Measured width.
    pub width: i32,
    /// Measured height.
    pub height: i32,
}

impl Measured {
    /// Creates a new measured size.
    pub const fn new(width: i32, height: i32) -> Self {
        Measured { width, height }
    }
}

/// Result of the position pass for a sync region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Placement {
    /// Rectangle shared by the placeholder and the floating view, relative
    /// to the region.
    pub rect: Bounds,

    /// Lowest offset at which the floating view keeps following the scroll
    /// one-to-one. Past it, the floating view holds near the region bottom.
    pub last_floating_bottom_bound: ScrollOffset,
}

/// Computes the placement of the placeholder and the floating view.
///
/// * `region` is the region rectangle in document coordinates.
/// * `placeholder_top` is the top of the placeholder, relative to `region`.
/// * `natural_left` is the left position the floating view had before
///   alignment.
pub fn place(
    gravity: Gravity,
    region: Bounds,
    placeholder_top: i32,
    natural_left: i32,
    floating: Measured,
) -> Placement {
    let left = gravity.left(natural_left, region.width, floating.width);

    Placement {
        rect: Bounds::new(left, placeholder_top, floating.width, floating.height),
        last_floating_bottom_bound: region.bottom().saturating_sub(floating.height),
    }
}

/// Something able to move the floating view vertically, without a relayout.
pub trait FloatingHost {
    /// Shifts the floating view by `dy` rows.
    fn shift_floating(&mut self, dy: i32);
}

impl<F> FloatingHost for F
where
    F: FnMut(i32),
{
    fn shift_floating(&mut self, dy: i32) {
        self(dy)
    }
}

//! Offset computation for one sync region.
//!
//! A region holds a placeholder, which reserves space in the document flow,
//! and a floating view drawn over it. As the viewport scrolls, the floating
//! view follows the viewport top until it would leave the bottom of the
//! region.

use crate::config::RegionSpec;
use crate::gravity::Gravity;
use crate::layout::{self, Bounds, FloatingHost, Measured, Placement};
use crate::offset::{ScrollOffset, ViewportEvent};
use crate::source::ScrollObserver;

use log::{debug, trace};

/// Movement of the floating view caused by one offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shift {
    /// Top before the update, relative to the region.
    pub from: i32,
    /// Top after the update, relative to the region.
    pub to: i32,
}

impl Shift {
    /// Vertical delta to apply to the floating view.
    pub const fn delta(&self) -> i32 {
        self.to - self.from
    }

    /// Returns `true` if the floating view did not move.
    pub const fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// State of a single sync region.
///
/// Geometry is set by the layout passes ([`on_measure`], [`on_layout`]) and
/// read on every scroll event.
///
/// [`on_measure`]: SyncRegion::on_measure
/// [`on_layout`]: SyncRegion::on_layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRegion {
    name: String,
    gravity: Gravity,
    capped: bool,

    // Region rectangle, in document coordinates.
    region: Bounds,

    placeholder_top: i32,
    placeholder_height: i32,
    floating_width: i32,
    floating_height: i32,
    floating_left: i32,
    last_floating_bottom_bound: ScrollOffset,

    // Current floating top, relative to the region.
    floating_top: i32,

    last_offset: Option<ScrollOffset>,
}

impl SyncRegion {
    /// Creates a region with empty geometry.
    pub fn new<S: Into<String>>(name: S, gravity: Gravity) -> Self {
        SyncRegion {
            name: name.into(),
            gravity,
            capped: true,
            region: Bounds::default(),
            placeholder_top: 0,
            placeholder_height: 0,
            floating_width: 0,
            floating_height: 0,
            floating_left: 0,
            last_floating_bottom_bound: 0,
            floating_top: 0,
            last_offset: None,
        }
    }

    /// Creates a region from a resolved spec.
    pub fn from_spec(spec: &RegionSpec) -> Self {
        let mut region = Self::new(spec.name.clone(), spec.gravity);
        region.set_capped(spec.capped);
        region
    }

    /// Name used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Horizontal alignment of the floating view.
    pub fn gravity(&self) -> Gravity {
        self.gravity
    }

    /// Changes the horizontal alignment.
    ///
    /// Takes effect on the next [`on_layout`](SyncRegion::on_layout).
    pub fn set_gravity(&mut self, gravity: Gravity) {
        self.gravity = gravity;
    }

    /// Returns `true` if the floating view stops at the region bottom.
    pub fn is_capped(&self) -> bool {
        self.capped
    }

    /// Controls whether the floating view stops at the region bottom.
    ///
    /// When it does not, it keeps following the viewport top for every
    /// offset past the placeholder, even once the region is scrolled out.
    ///
    /// Defaults to `true`.
    pub fn set_capped(&mut self, capped: bool) {
        self.capped = capped;
    }

    /// Top of the region, in document coordinates.
    pub fn region_top(&self) -> i32 {
        self.region.top
    }

    /// Height of the region.
    pub fn region_height(&self) -> i32 {
        self.region.height
    }

    /// Top of the placeholder, relative to the region.
    pub fn placeholder_top(&self) -> i32 {
        self.placeholder_top
    }

    /// Height reserved by the placeholder.
    pub fn placeholder_height(&self) -> i32 {
        self.placeholder_height
    }

    /// Measured height of the floating view.
    pub fn floating_height(&self) -> i32 {
        self.floating_height
    }

    /// Left position of the floating view, relative to the region.
    pub fn floating_left(&self) -> i32 {
        self.floating_left
    }

    /// Current top of the floating view, relative to the region.
    pub fn floating_top(&self) -> i32 {
        self.floating_top
    }

    /// Offset past which the floating view stops following the scroll.
    pub fn last_floating_bottom_bound(&self) -> ScrollOffset {
        self.last_floating_bottom_bound
    }

    /// Last offset this region was synchronized with.
    pub fn last_offset(&self) -> Option<ScrollOffset> {
        self.last_offset
    }

    /// Measure pass: records the floating height.
    ///
    /// Returns the height the placeholder must be given, which is always the
    /// measured height of the floating view.
    pub fn on_measure(&mut self, floating: Measured) -> i32 {
        self.floating_height = floating.height;
        if self.placeholder_height != floating.height {
            debug!(
                "{}: placeholder height {} -> {}",
                self.name, self.placeholder_height, floating.height
            );
            self.placeholder_height = floating.height;
        }
        self.placeholder_height
    }

    /// Position pass: recomputes the region geometry.
    ///
    /// `region` is the region rectangle in document coordinates, and
    /// `placeholder_top` is relative to it. The floating view is put back on
    /// top of the placeholder; call [`resettle`](SyncRegion::resettle) or
    /// [`on_scroll`](SyncRegion::on_scroll) afterwards to follow the scroll
    /// again.
    pub fn on_layout(
        &mut self,
        region: Bounds,
        placeholder_top: i32,
        natural_left: i32,
        floating: Measured,
    ) -> Placement {
        self.on_measure(floating);

        let placement = layout::place(self.gravity, region, placeholder_top, natural_left, floating);

        self.region = region;
        self.placeholder_top = placeholder_top;
        self.floating_left = placement.rect.left;
        self.floating_width = floating.width;
        self.floating_top = placeholder_top;
        self.last_floating_bottom_bound = placement.last_floating_bottom_bound;

        debug!(
            "{}: laid out at {:?}, placeholder at {}, bound {}",
            self.name, region, placeholder_top, self.last_floating_bottom_bound
        );

        placement
    }

    /// Moves the region to a new document top, keeping its size.
    ///
    /// Some hosts only learn where a region sits after laying it out. Returns
    /// `true` if the top changed.
    pub fn set_region_top(&mut self, top: i32) -> bool {
        if self.region.top == top {
            return false;
        }

        debug!("{}: region top {} -> {}", self.name, self.region.top, top);
        self.region = self.region.with_top(top);
        self.last_floating_bottom_bound = self.region.bottom().saturating_sub(self.floating_height);
        true
    }

    /// Rectangle currently covered by the floating view, relative to the region.
    pub fn floating_bounds(&self) -> Bounds {
        Bounds::new(
            self.floating_left,
            self.floating_top,
            self.floating_width,
            self.floating_height,
        )
    }

    /// Where the floating view should be for the given offset.
    ///
    /// The result is relative to the region.
    pub fn target_top(&self, offset_y: ScrollOffset) -> i32 {
        let relative = offset_y.saturating_sub(self.region.top);

        if relative < self.placeholder_top {
            self.placeholder_top
        } else if self.capped && offset_y > self.last_floating_bottom_bound {
            // Past the bound, hold the floating view near the region bottom:
            // `relative - (offset_y - bound)`, without the overflow.
            self.last_floating_bottom_bound
                .saturating_sub(self.region.top)
        } else {
            relative
        }
    }

    /// Synchronizes the floating view with the given offset.
    pub fn on_scroll(&mut self, offset_y: ScrollOffset) -> Shift {
        let shift = Shift {
            from: self.floating_top,
            to: self.target_top(offset_y),
        };

        self.floating_top = shift.to;
        self.last_offset = Some(offset_y);

        if !shift.is_noop() {
            trace!(
                "{}: offset {} moves floating view {} -> {}",
                self.name,
                offset_y,
                shift.from,
                shift.to
            );
        }

        shift
    }

    /// Synchronizes with `offset_y`, moving the floating view through `host`.
    ///
    /// The host is only called when the floating view actually moves.
    pub fn apply<H>(&mut self, offset_y: ScrollOffset, host: &mut H) -> Shift
    where
        H: FloatingHost + ?Sized,
    {
        let shift = self.on_scroll(offset_y);
        if !shift.is_noop() {
            host.shift_floating(shift.delta());
        }
        shift
    }

    /// Re-applies the last offset, after the geometry changed.
    ///
    /// Returns `None` if this region never saw any offset.
    pub fn resettle(&mut self) -> Option<Shift> {
        self.last_offset.map(|offset| self.on_scroll(offset))
    }
}

impl ScrollObserver for SyncRegion {
    fn on_viewport_event(&mut self, event: ViewportEvent) {
        if event.is_resize() {
            debug!("{}: re-settling at {}", self.name, event.offset);
        }
        self.on_scroll(event.offset);
    }
}

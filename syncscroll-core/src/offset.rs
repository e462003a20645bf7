//! Scroll offsets and the events carrying them.

/// Vertical distance the viewport has scrolled from its origin.
///
/// This is positive in practice, but nothing here relies on it.
pub type ScrollOffset = i32;

/// What triggered a [`ViewportEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cause {
    /// The scroll position changed.
    Scroll,

    /// The viewport was resized.
    ///
    /// The event carries the current offset, so observers can re-settle
    /// against the new geometry.
    Resize,
}

/// Event broadcast by a [`ScrollSource`](crate::ScrollSource).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewportEvent {
    /// Vertical offset of the viewport.
    pub offset: ScrollOffset,

    /// Reason for this event.
    pub cause: Cause,
}

impl ViewportEvent {
    /// Event sent when the viewport scrolled to `offset`.
    pub const fn scrolled(offset: ScrollOffset) -> Self {
        ViewportEvent {
            offset,
            cause: Cause::Scroll,
        }
    }

    /// Event sent after a resize, with the current `offset`.
    pub const fn resized(offset: ScrollOffset) -> Self {
        ViewportEvent {
            offset,
            cause: Cause::Resize,
        }
    }

    /// Returns `true` if this event comes from a resize.
    pub fn is_resize(&self) -> bool {
        self.cause == Cause::Resize
    }
}

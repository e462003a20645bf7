//! Views keeping a floating child in sync with a scroll view.

mod sync_region_view;
mod sync_scroll_view;

pub use self::sync_region_view::{SyncRegionBuilder, SyncRegionView};
pub use self::sync_scroll_view::SyncScrollView;

use cursive_core::Printer;
use syncscroll_core::ScrollOffset;

// Cursive works with `usize`, the sync logic with signed offsets.
fn to_offset(value: usize) -> ScrollOffset {
    ScrollOffset::try_from(value).unwrap_or(ScrollOffset::MAX)
}

fn to_usize(value: i32) -> usize {
    usize::try_from(value).unwrap_or(0)
}

// Row where the top of the content given to `printer` would be drawn,
// even if that row is hidden above the visible area.
fn origin_row(printer: &Printer) -> i32 {
    to_offset(printer.offset.y) - to_offset(printer.content_offset.y)
}

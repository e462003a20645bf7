use super::{origin_row, to_offset};

use cursive_core::{
    event::EventResult,
    view::{ScrollStrategy, View, ViewWrapper},
    views::ScrollView,
    Printer, Vec2, With,
};
use log::trace;
use syncscroll_core::ScrollSource;

/// Vertical `ScrollView` broadcasting its offset through a [`ScrollSource`].
///
/// Every change of the viewport top is sent to the source. When the view is
/// resized, the current offset is sent again once the new layout is done, so
/// sticky regions re-settle even without scrolling.
pub struct SyncScrollView<V> {
    view: ScrollView<V>,
    source: ScrollSource,
    last_size: Option<Vec2>,
}

impl<V: View> SyncScrollView<V> {
    /// Wraps `inner` in a scroll view driving `source`.
    ///
    /// Regions inside `inner` should have been built with the same source.
    pub fn new(source: ScrollSource, inner: V) -> Self {
        let broadcaster = source.clone();
        let view = ScrollView::new(inner).on_scroll_inner(move |_, viewport| {
            let offset = to_offset(viewport.top());
            if offset != broadcaster.offset() {
                broadcaster.scroll_to(offset);
            }
            EventResult::Ignored
        });

        SyncScrollView {
            view,
            source,
            last_size: None,
        }
    }

    /// Returns the source this view drives.
    pub fn source(&self) -> &ScrollSource {
        &self.source
    }

    /// Scrolls so that `row` is at the top of the viewport.
    ///
    /// The offset is clamped to the scrollable range.
    pub fn scroll_to(&mut self, row: usize) -> EventResult {
        self.view.set_offset(Vec2::new(0, row))
    }

    /// Programmatically scroll to the top of the view.
    pub fn scroll_to_top(&mut self) -> EventResult {
        self.view.scroll_to_top()
    }

    /// Programmatically scroll to the bottom of the view.
    pub fn scroll_to_bottom(&mut self) -> EventResult {
        self.view.scroll_to_bottom()
    }

    /// Defines the way scrolling is adjusted on content or size change.
    pub fn set_scroll_strategy(&mut self, strategy: ScrollStrategy) -> EventResult {
        self.view.set_scroll_strategy(strategy)
    }

    /// Defines the way scrolling is adjusted on content or size change.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn scroll_strategy(self, strategy: ScrollStrategy) -> Self {
        self.with(|s| {
            s.set_scroll_strategy(strategy);
        })
    }

    /// Control whether scroll bars are visible.
    ///
    /// Defaults to `true`.
    pub fn set_show_scrollbars(&mut self, show_scrollbars: bool) {
        self.view.set_show_scrollbars(show_scrollbars);
    }

    /// Control whether scroll bars are visible.
    ///
    /// Chainable variant
    #[must_use]
    pub fn show_scrollbars(self, show_scrollbars: bool) -> Self {
        self.with(|s| s.set_show_scrollbars(show_scrollbars))
    }

    cursive_core::inner_getters!(self.view: ScrollView<V>);
}

impl<V: View> ViewWrapper for SyncScrollView<V> {
    cursive_core::wrap_impl!(self.view: ScrollView<V>);

    fn wrap_draw(&self, printer: &Printer) {
        self.source.set_viewport_origin(origin_row(printer));
        self.view.draw(printer);
    }

    fn wrap_layout(&mut self, size: Vec2) {
        if self.last_size != Some(size) {
            trace!("Scroll viewport resized to {:?}", size);
            self.last_size = Some(size);
            self.source.request_resettle();
        }

        self.view.layout(size);

        // The scroll strategy may have moved the viewport without any event.
        let offset = to_offset(self.view.content_viewport().top());
        if offset != self.source.offset() {
            self.source.scroll_to(offset);
        }

        // Children are laid out now, so their geometry is final.
        self.source.flush_resettle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::SyncRegionView;
    use cursive_core::buffer::PrintBuffer;
    use cursive_core::theme::Theme;
    use cursive_core::view::{Nameable, Resizable};
    use cursive_core::views::{DummyView, LinearLayout};
    use parking_lot::RwLock;
    use syncscroll_core::{RegionSpec, SyncRegion};

    // Region of 25 rows: 3 rows of intro, a placeholder matching the 2-row
    // floating child, then 20 rows of body.
    fn region(source: &ScrollSource, name: &str) -> SyncRegionView {
        SyncRegionView::builder(RegionSpec::new(name, "space", "header"))
            .child(DummyView.fixed_size((10, 3)))
            .child(DummyView.with_name("space"))
            .child(DummyView.fixed_size((10, 20)))
            .child(DummyView.fixed_size((6, 2)).with_name("header"))
            .build(source)
            .unwrap()
    }

    fn floating_top(view: &SyncScrollView<SyncRegionView>) -> i32 {
        view.get_inner().get_inner().region().floating_top()
    }

    fn nth_region(view: &SyncScrollView<LinearLayout>, i: usize) -> SyncRegion {
        view.get_inner()
            .get_inner()
            .get_child(i)
            .and_then(|child| child.downcast_ref::<SyncRegionView>())
            .unwrap()
            .region()
    }

    // Draws a 20x10 viewport, `top` rows below the top of the screen.
    fn draw<V: View>(view: &SyncScrollView<V>, top: usize) {
        let theme = Theme::default();
        let size = Vec2::new(20, 10 + top);
        let buffer = RwLock::new(PrintBuffer::new());
        buffer.write().resize(size);

        let printer = Printer::new(size, &theme, &buffer);
        view.draw(&printer.offset((0, top)));
    }

    #[test]
    fn broadcasts_scroll_offsets() {
        let source = ScrollSource::new();
        let mut view = SyncScrollView::new(source.clone(), region(&source, "single"));

        view.layout(Vec2::new(20, 10));
        assert_eq!(source.offset(), 0);
        assert_eq!(floating_top(&view), 3);

        view.scroll_to(2);
        assert_eq!(source.offset(), 2);
        assert_eq!(floating_top(&view), 3);

        view.scroll_to(9);
        assert_eq!(source.offset(), 9);
        assert_eq!(floating_top(&view), 9);

        view.scroll_to_top();
        assert_eq!(source.offset(), 0);
        assert_eq!(floating_top(&view), 3);
    }

    #[test]
    fn resize_keeps_floating_view_in_place() {
        let source = ScrollSource::new();
        let mut view = SyncScrollView::new(source.clone(), region(&source, "resized"));

        view.layout(Vec2::new(20, 10));
        view.scroll_to(7);
        assert_eq!(floating_top(&view), 7);

        view.layout(Vec2::new(30, 10));
        assert!(!source.has_pending_resettle());
        assert_eq!(source.offset(), 7);
        assert_eq!(floating_top(&view), 7);
    }

    #[test]
    fn floating_view_stops_at_region_bottom() {
        let source = ScrollSource::new();
        let content = LinearLayout::vertical()
            .child(region(&source, "capped"))
            .child(DummyView.fixed_size((10, 40)));
        let mut view = SyncScrollView::new(source.clone(), content);

        view.layout(Vec2::new(20, 10));

        view.scroll_to(20);
        let region = nth_region(&view, 0);
        assert_eq!(region.last_floating_bottom_bound(), 23);
        assert_eq!(region.floating_top(), 20);

        view.scroll_to(30);
        assert_eq!(nth_region(&view, 0).floating_top(), 23);
    }

    #[test]
    fn scroll_strategy_moves_are_broadcast() {
        let source = ScrollSource::new();
        let mut view = SyncScrollView::new(source.clone(), region(&source, "bottom"))
            .scroll_strategy(ScrollStrategy::StickToBottom);

        // 25 rows in a 10 rows viewport.
        view.layout(Vec2::new(20, 10));
        assert_eq!(source.offset(), 15);
        assert_eq!(floating_top(&view), 15);
    }

    #[test]
    fn regions_learn_document_top_when_drawn() {
        let source = ScrollSource::new();
        let content = LinearLayout::vertical()
            .child(region(&source, "first"))
            .child(region(&source, "second"))
            .child(DummyView.fixed_size((10, 40)));
        let mut view = SyncScrollView::new(source.clone(), content);

        view.layout(Vec2::new(20, 10));
        assert_eq!(nth_region(&view, 1).region_top(), 0);

        draw(&view, 2);
        assert_eq!(source.viewport_origin(), 2);
        assert_eq!(nth_region(&view, 0).region_top(), 0);
        let second = nth_region(&view, 1);
        assert_eq!(second.region_top(), 25);
        assert_eq!(second.last_floating_bottom_bound(), 48);
        assert_eq!(second.floating_top(), 3);

        for (offset, top) in [(30, 5), (45, 20), (60, 23)] {
            view.scroll_to(offset);
            draw(&view, 2);

            let second = nth_region(&view, 1);
            assert_eq!(second.region_top(), 25, "offset {offset}");
            assert_eq!(second.floating_top(), top, "offset {offset}");
        }

        // The first region was scrolled out long ago.
        assert_eq!(nth_region(&view, 0).floating_top(), 23);
    }
}

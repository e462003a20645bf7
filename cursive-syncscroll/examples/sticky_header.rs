use cursive::traits::{Nameable, Resizable};
use cursive::views::{Dialog, DummyView, Layer, LinearLayout, TextView};
use cursive_syncscroll::{RegionSpec, ScrollSource, SyncRegionView, SyncScrollView};

// A long list with a header that stays on screen while the list is scrolled.
fn main() {
    cursive::logger::init();

    let source = ScrollSource::new();

    let mut rows = LinearLayout::vertical();
    for i in 1..=60 {
        rows.add_child(TextView::new(format!("Row #{i}")));
    }

    let region = SyncRegionView::builder(RegionSpec::new("inbox", "header_space", "header"))
        .child(TextView::new("Scroll down: the header below stays on top."))
        .child(DummyView.with_name("header_space"))
        .child(rows)
        .child(Layer::new(TextView::new(" From      Subject")).with_name("header"))
        .build(&source);

    let mut siv = cursive::default();

    match region {
        Ok(region) => siv.add_layer(
            Dialog::around(SyncScrollView::new(source, region))
                .title("Inbox")
                .fixed_size((40, 15)),
        ),
        Err(err) => {
            log::error!("{err}");
            siv.add_layer(Dialog::info(err.to_string()));
        }
    }

    siv.add_global_callback('q', |s| s.quit());
    siv.add_global_callback('~', cursive::Cursive::toggle_debug_console);

    siv.run();
}

use cursive::traits::{Nameable, Resizable};
use cursive::views::{Dialog, DummyView, Layer, LinearLayout, TextView};
use cursive_syncscroll::{Error, RegionConfig, ScrollSource, SyncRegionView, SyncScrollView};

// Several regions sharing one scroll view, declared in yaml.
//
// Each floating view only sticks while its own region is on screen.
const REGIONS: &str = r#"
regions:
  - name: fruits
    placeholder: fruits_space
    floating: fruits_title
    gravity: center
  - name: vegetables
    placeholder: vegetables_space
    floating: vegetables_title
    gravity: end
"#;

fn section(
    source: &ScrollSource,
    config: &RegionConfig,
    title: &str,
    items: &[&str],
) -> Result<SyncRegionView, Error> {
    let spec = config.resolve()?;

    let mut list = LinearLayout::vertical();
    for item in items.iter().cycle().take(30) {
        list.add_child(TextView::new(format!("  {item}")));
    }

    SyncRegionView::builder(spec.clone())
        .child(DummyView.with_name(spec.placeholder))
        .child(list)
        .child(Layer::new(TextView::new(title)).with_name(spec.floating))
        .build(source)
}

fn build(source: &ScrollSource) -> Result<LinearLayout, Error> {
    let configs = RegionConfig::list_from_yaml(REGIONS)?;
    let sections = [
        ("Fruits", &["apple", "banana", "cherry"][..]),
        ("Vegetables", &["carrot", "leek", "pea", "turnip"][..]),
    ];

    let mut content = LinearLayout::vertical();
    for (config, (title, items)) in configs.iter().zip(sections) {
        content.add_child(section(source, config, title, items)?);
        content.add_child(DummyView.fixed_height(2));
    }

    Ok(content)
}

fn main() {
    cursive::logger::init();

    let source = ScrollSource::new();
    let mut siv = cursive::default();

    match build(&source) {
        Ok(content) => siv.add_layer(
            Dialog::around(SyncScrollView::new(source, content))
                .title("Groceries")
                .fixed_size((40, 20)),
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

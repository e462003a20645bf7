//! # cursive-syncscroll
//!
//! Sticky views for [Cursive](https://docs.rs/cursive): a view that stays on
//! top of a scroll view once its natural position has been scrolled past.
//!
//! * [`SyncScrollView`] wraps a `ScrollView` and broadcasts its vertical offset
//!   through a [`ScrollSource`].
//! * [`SyncRegionView`] stacks its children vertically. One of them is a
//!   placeholder, reserving space, and another one floats over it, following
//!   the scroll until the region itself leaves the screen.
//!
//! Regions are given the source explicitly when they are built:
//!
//! ```rust
//! use cursive_core::views::{DummyView, TextView};
//! use cursive_core::view::{Nameable, Resizable};
//! use cursive_syncscroll::{RegionSpec, ScrollSource, SyncRegionView, SyncScrollView};
//!
//! let source = ScrollSource::new();
//!
//! let region = SyncRegionView::builder(RegionSpec::new("intro", "space", "header"))
//!     .child(TextView::new("Some introduction."))
//!     .child(DummyView.with_name("space"))
//!     .child(TextView::new("Lots of content.").fixed_height(40))
//!     .child(TextView::new("Header").with_name("header"))
//!     .build(&source)
//!     .unwrap();
//!
//! let view = SyncScrollView::new(source, region);
//! ```
#![deny(missing_docs)]

pub mod views;

pub use self::views::{SyncRegionBuilder, SyncRegionView, SyncScrollView};

pub use syncscroll_core::{
    Attribute, Config, Error, Gravity, RegionConfig, RegionSpec, ScrollOffset, ScrollSource,
    SyncRegion,
};

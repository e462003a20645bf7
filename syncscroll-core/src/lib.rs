//! # syncscroll-core
//!
//! Keeps a "floating" view in sync with the vertical offset of a scrolling
//! viewport, so it looks pinned to the top of the viewport once its natural
//! position has been scrolled past.
//!
//! This crate has no UI dependency. A host toolkit supplies the scroll events
//! and the measured geometry, and applies the resulting positions. See
//! [`cursive-syncscroll`] for an integration with Cursive.
//!
//! Two roles cooperate:
//!
//! * A [`ScrollSource`] broadcasts every change of its vertical offset to the
//!   registered observers.
//! * A [`SyncRegion`] observes one source and computes where its floating view
//!   should be for each offset.
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use syncscroll_core::{Bounds, Gravity, Measured, ScrollSource, SyncRegion};
//!
//! let source = ScrollSource::new();
//! let region = Arc::new(Mutex::new(SyncRegion::new("header", Gravity::Start)));
//! source.register_observer(&region);
//!
//! region.lock().unwrap().on_layout(
//!     Bounds::new(0, 0, 80, 1000),
//!     300,
//!     0,
//!     Measured::new(80, 100),
//! );
//!
//! source.scroll_to(500);
//! assert_eq!(region.lock().unwrap().floating_top(), 500);
//!
//! source.scroll_to(950);
//! assert_eq!(region.lock().unwrap().floating_top(), 900);
//! ```
//!
//! [`cursive-syncscroll`]: https://docs.rs/cursive-syncscroll
#![deny(missing_docs)]

macro_rules! new_default(
    ($c:ty) => {
        impl Default for $c {
            fn default() -> Self {
                Self::new()
            }
        }
    }
);

pub mod config;
pub mod error;
pub mod gravity;
pub mod layout;
pub mod offset;
pub mod region;
pub mod source;
pub mod utils;

pub use self::config::{Config, RegionConfig, RegionSpec};
pub use self::error::{Attribute, Error};
pub use self::gravity::Gravity;
pub use self::layout::{Bounds, FloatingHost, Measured, Placement};
pub use self::offset::{Cause, ScrollOffset, ViewportEvent};
pub use self::region::{Shift, SyncRegion};
pub use self::source::{Ancestor, ObserverId, ScrollObserver, ScrollSource};

use super::{origin_row, to_offset, to_usize};

use cursive_core::{
    direction::{Absolute, Direction, Relative},
    event::{AnyCb, Event, EventResult, Key},
    view::{CannotFocus, IntoBoxedView, Selector, ViewNotFound},
    {Printer, Rect, Vec2, View, With},
};
use log::{debug, warn};
use std::sync::{Arc, Mutex};
use syncscroll_core::{
    config::{Config, RegionConfig, RegionSpec},
    source::{Ancestor, ObserverId},
    utils::lock,
    Attribute, Bounds, Error, Gravity, Measured, ScrollSource, SyncRegion,
};

/// Stacks its children vertically, keeping one of them on screen while the
/// region is scrolled.
///
/// Two children are special:
///
/// * the placeholder reserves room in the stack, and is always given the
///   height of the floating child;
/// * the floating child is not part of the stack. It is drawn over the
///   placeholder, and follows the top of the viewport once the placeholder
///   is scrolled past, until it reaches the bottom of the region.
///
/// Regions are created with [`SyncRegionView::builder`], and must be given the
/// [`ScrollSource`] of the [`SyncScrollView`](super::SyncScrollView) they
/// are placed in.
///
/// # Examples
///
/// ```rust
/// use cursive_core::views::{DummyView, TextView};
/// use cursive_core::view::Nameable;
/// use cursive_syncscroll::{Gravity, RegionSpec, ScrollSource, SyncRegionView};
///
/// let source = ScrollSource::new();
/// let spec = RegionSpec::new("menu", "menu_space", "menu").gravity(Gravity::Center);
///
/// let region = SyncRegionView::builder(spec)
///     .child(DummyView.with_name("menu_space"))
///     .child(TextView::new("File  Edit  View").with_name("menu"))
///     .build(&source)
///     .unwrap();
///
/// assert_eq!(source.observer_count(), 1);
/// drop(region);
/// assert_eq!(source.observer_count(), 0);
/// ```
pub struct SyncRegionView {
    children: Vec<Child>,
    placeholder: usize,
    floating: usize,
    focus: usize,

    region: Arc<Mutex<SyncRegion>>,
    source: ScrollSource,
    observer: ObserverId,
}

struct Child {
    view: Box<dyn View>,
    // Position in the stack. Not used for the floating child.
    position: Rect,
    // Size computed by the last measure.
    size: Vec2,
}

impl Child {
    fn new(view: Box<dyn View>) -> Self {
        Child {
            view,
            position: Rect::from_size((0, 0), (0, 0)),
            size: Vec2::zero(),
        }
    }
}

/// Collects the children of a [`SyncRegionView`] before resolving the
/// placeholder and floating references.
pub struct SyncRegionBuilder {
    spec: RegionSpec,
    children: Vec<Box<dyn View>>,
}

impl SyncRegionBuilder {
    /// Starts a region declared by `spec`.
    pub fn new(spec: RegionSpec) -> Self {
        SyncRegionBuilder {
            spec,
            children: Vec::new(),
        }
    }

    /// Starts a region from a config declaration.
    ///
    /// Fails if the declaration misses a child reference.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let spec = RegionConfig::from_config(config)?.resolve()?;
        Ok(Self::new(spec))
    }

    /// Adds a child. Chainable variant.
    #[must_use]
    pub fn child<V: IntoBoxedView>(self, view: V) -> Self {
        self.with(|s| s.add_child(view))
    }

    /// Adds a child.
    ///
    /// Children are stacked in the order they are added.
    pub fn add_child<V: IntoBoxedView>(&mut self, view: V) {
        self.children.push(view.into_boxed_view());
    }

    /// Sets the gravity of the floating child.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn gravity(self, gravity: Gravity) -> Self {
        self.with(|s| s.spec.gravity = gravity)
    }

    /// Sets whether the floating child stops at the bottom of the region.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn capped(self, capped: bool) -> Self {
        self.with(|s| s.spec.capped = capped)
    }

    /// Resolves the child references and registers the region with `source`.
    ///
    /// Each reference must name a view found in a different child.
    pub fn build(self, source: &ScrollSource) -> Result<SyncRegionView, Error> {
        let SyncRegionBuilder { spec, children } = self;
        let mut children: Vec<Child> = children.into_iter().map(Child::new).collect();

        let floating = find_child_from_name(&mut children, &spec.floating)
            .ok_or_else(|| spec.missing(Attribute::Floating))?;
        let placeholder = find_child_from_name(&mut children, &spec.placeholder)
            .ok_or_else(|| spec.missing(Attribute::Placeholder))?;

        if placeholder == floating {
            warn!(
                "{}: `{}` and `{}` are in the same child",
                spec.name, spec.placeholder, spec.floating
            );
            return Err(spec.missing(Attribute::Floating));
        }

        let region = Arc::new(Mutex::new(SyncRegion::from_spec(&spec)));
        let observer = source.register_observer(&region);
        debug!(
            "{}: registered with {} children, placeholder #{}, floating #{}",
            spec.name,
            children.len(),
            placeholder,
            floating
        );

        Ok(SyncRegionView {
            children,
            placeholder,
            floating,
            focus: 0,
            region,
            source: source.clone(),
            observer,
        })
    }

    /// Registers the region with the nearest scroll source among `ancestors`.
    ///
    /// `ancestors` goes from the closest parent outwards. Fails with
    /// `NoScrollSourceAncestor` if none of them provides a source.
    pub fn build_in<'a, A, I>(self, ancestors: I) -> Result<SyncRegionView, Error>
    where
        A: Ancestor + ?Sized + 'a,
        I: IntoIterator<Item = &'a A>,
    {
        let source = ScrollSource::nearest(ancestors, &self.spec.name)?;
        self.build(source)
    }
}

// Index of the child containing a view named `name`.
fn find_child_from_name(children: &mut [Child], name: &str) -> Option<usize> {
    let selector = Selector::Name(name);
    for (i, c) in children.iter_mut().enumerate() {
        let mut found = false;
        c.view.call_on_any(&selector, &mut |_| found = true);
        if found {
            return Some(i);
        }
    }
    None
}

impl SyncRegionView {
    /// Starts building a region declared by `spec`.
    pub fn builder(spec: RegionSpec) -> SyncRegionBuilder {
        SyncRegionBuilder::new(spec)
    }

    /// Returns a snapshot of the sync state.
    pub fn region(&self) -> SyncRegion {
        lock(&self.region).clone()
    }

    /// Name of this region.
    pub fn name(&self) -> String {
        lock(&self.region).name().to_string()
    }

    /// Current top of the floating child, relative to this view.
    pub fn floating_top(&self) -> i32 {
        lock(&self.region).floating_top()
    }

    /// Returns the source this region follows.
    pub fn source(&self) -> &ScrollSource {
        &self.source
    }

    /// Changes the horizontal alignment of the floating child.
    pub fn set_gravity(&mut self, gravity: Gravity) {
        lock(&self.region).set_gravity(gravity);
    }

    /// Controls whether the floating child stops at the bottom of the region.
    ///
    /// Defaults to `true`.
    pub fn set_capped(&mut self, capped: bool) {
        let mut region = lock(&self.region);
        region.set_capped(capped);
        region.resettle();
    }

    /// Index of the placeholder child.
    pub fn placeholder_index(&self) -> usize {
        self.placeholder
    }

    /// Index of the floating child.
    pub fn floating_index(&self) -> usize {
        self.floating
    }

    /// How many children are in this view.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if this view has no children.
    ///
    /// A built region always has at least two.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns a reference to a child.
    pub fn get_child(&self, i: usize) -> Option<&dyn View> {
        self.children.get(i).map(|c| &*c.view)
    }

    /// Returns a mutable reference to a child.
    pub fn get_child_mut(&mut self, i: usize) -> Option<&mut dyn View> {
        self.children.get_mut(i).map(|c| &mut *c.view)
    }

    /// Returns index of focused inner view
    pub fn get_focus_index(&self) -> usize {
        self.focus
    }

    /// Attempts to set the focus on the given child.
    pub fn set_focus_index(&mut self, index: usize) -> Result<EventResult, ViewNotFound> {
        self.children
            .get_mut(index)
            .and_then(|child| child.view.take_focus(Direction::none()).ok())
            .map(|res| self.set_focus_unchecked(index).and(res))
            .ok_or(ViewNotFound)
    }

    fn set_focus_unchecked(&mut self, index: usize) -> EventResult {
        if index != self.focus {
            let result = self.children[self.focus].view.on_event(Event::FocusLost);
            self.focus = index;
            result
        } else {
            EventResult::Consumed(None)
        }
    }

    // Where child `i` currently is. The floating child moves with the scroll.
    fn child_rect(&self, i: usize) -> Rect {
        let child = &self.children[i];
        if i != self.floating {
            return child.position;
        }

        let region = lock(&self.region);
        Rect::from_size(
            (
                to_usize(region.floating_left()),
                to_usize(region.floating_top()),
            ),
            child.size,
        )
    }

    // Measures every child, and returns the size of the whole stack.
    fn measure(&mut self, constraint: Vec2) -> Vec2 {
        let floating = &mut self.children[self.floating];
        floating.size = floating.view.required_size(constraint);
        let forced = lock(&self.region).on_measure(Measured::new(
            to_offset(floating.size.x),
            to_offset(floating.size.y),
        ));

        let mut total = Vec2::new(floating.size.x, 0);
        for (i, child) in self.children.iter_mut().enumerate() {
            if i == self.floating {
                continue;
            }

            child.size = child.view.required_size(constraint);
            if i == self.placeholder {
                child.size.y = to_usize(forced);
            }

            total.x = total.x.max(child.size.x);
            total.y += child.size.y;
        }

        total
    }

    fn iter_mut<'a>(
        source: Direction,
        children: &'a mut [Child],
    ) -> Box<dyn Iterator<Item = (usize, &mut Child)> + 'a> {
        let children = children.iter_mut().enumerate();
        match source {
            Direction::Rel(Relative::Back) | Direction::Abs(Absolute::Down) => {
                Box::new(children.rev())
            }
            _ => Box::new(children),
        }
    }

    fn circular_mut(
        start: usize,
        children: &mut [Child],
    ) -> impl Iterator<Item = (usize, &mut Child)> {
        let (head, tail) = children.split_at_mut(start);

        let head = head.iter_mut().enumerate();
        let tail = tail
            .iter_mut()
            .enumerate()
            .map(move |(i, c)| (i + start, c));

        tail.chain(head)
    }

    fn focuser(source: Direction) -> impl Fn((usize, &mut Child)) -> Option<(usize, EventResult)> {
        move |(i, c)| c.view.take_focus(source).ok().map(|res| (i, res))
    }

    fn move_focus(&mut self, target: Relative) -> EventResult {
        let source = Direction::Rel(target.swap());
        let len = self.children.len();
        let focus_res = match target {
            Relative::Front => Self::iter_mut(source, &mut self.children)
                .skip(len - self.focus)
                .find_map(Self::focuser(source)),
            Relative::Back => Self::iter_mut(source, &mut self.children)
                .skip(self.focus + 1)
                .find_map(Self::focuser(source)),
        };

        if let Some((i, res)) = focus_res {
            return self.set_focus_unchecked(i).and(res);
        }

        EventResult::Ignored
    }

    fn check_focus_grab(&mut self, event: &Event) -> Option<EventResult> {
        if let Event::Mouse {
            offset,
            position,
            event,
        } = *event
        {
            if !event.grabs_focus() {
                return None;
            }

            let position = position.checked_sub(offset)?;

            // The floating child is drawn on top, so it gets the click first.
            let floating = self.floating;
            let candidates: Vec<usize> = std::iter::once(floating)
                .chain((0..self.children.len()).filter(|&i| i != floating))
                .filter(|&i| self.child_rect(i).contains(position))
                .collect();

            for i in candidates {
                if let Ok(res) = self.children[i].view.take_focus(Direction::none()) {
                    return Some(self.set_focus_unchecked(i).and(res));
                }
            }
        }

        None
    }
}

impl Drop for SyncRegionView {
    fn drop(&mut self) {
        self.source.unregister(self.observer);
    }
}

impl View for SyncRegionView {
    fn draw(&self, printer: &Printer) {
        // Only now do we know where this region sits in the scrolled content.
        {
            let top = self.source.document_top(origin_row(printer));
            let mut region = lock(&self.region);
            if region.set_region_top(top) {
                region.on_scroll(self.source.offset());
            }
        }

        for (i, child) in self.children.iter().enumerate() {
            if i == self.floating {
                continue;
            }
            child
                .view
                .draw(&printer.windowed(child.position).focused(i == self.focus));
        }

        let floating = self.child_rect(self.floating);
        self.children[self.floating]
            .view
            .draw(&printer.windowed(floating).focused(self.floating == self.focus));
    }

    fn layout(&mut self, size: Vec2) {
        self.measure(size);

        let mut y = 0;
        for (i, child) in self.children.iter_mut().enumerate() {
            if i == self.floating {
                continue;
            }
            child.position = Rect::from_size((0, y), (size.x, child.size.y));
            y += child.size.y;
        }

        for (i, child) in self.children.iter_mut().enumerate() {
            let child_size = if i == self.floating {
                child.size
            } else {
                child.position.size()
            };
            child.view.layout(child_size);
        }

        let placeholder = self.children[self.placeholder].position;
        let floating = self.children[self.floating].size;

        let mut region = lock(&self.region);
        let bounds = Bounds::new(
            0,
            region.region_top(),
            to_offset(size.x),
            to_offset(size.y),
        );
        region.on_layout(
            bounds,
            to_offset(placeholder.top()),
            0,
            Measured::new(to_offset(floating.x), to_offset(floating.y)),
        );
        region.on_scroll(self.source.offset());
    }

    fn on_event(&mut self, event: Event) -> EventResult {
        if self.is_empty() {
            return EventResult::Ignored;
        }

        let res = self
            .check_focus_grab(&event)
            .unwrap_or(EventResult::Ignored);

        let top_left = self.child_rect(self.focus).top_left();
        let child = &mut self.children[self.focus];

        let result = child.view.on_event(event.relativized(top_left));

        res.and(match result {
            EventResult::Ignored => match event {
                Event::Shift(Key::Tab) | Event::Key(Key::Up) => self.move_focus(Relative::Front),
                Event::Key(Key::Tab) | Event::Key(Key::Down) => self.move_focus(Relative::Back),
                _ => EventResult::Ignored,
            },
            res => res,
        })
    }

    fn important_area(&self, size: Vec2) -> Rect {
        if self.is_empty() {
            return Rect::from_size((0, 0), size);
        }

        let rect = self.child_rect(self.focus);
        self.children[self.focus].view.important_area(rect.size()) + rect.top_left()
    }

    fn required_size(&mut self, constraint: Vec2) -> Vec2 {
        self.measure(constraint)
    }

    fn take_focus(&mut self, source: Direction) -> Result<EventResult, CannotFocus> {
        let focus_res = match source {
            Direction::Abs(Absolute::None) => {
                Self::circular_mut(self.focus, &mut self.children).find_map(Self::focuser(source))
            }
            source => Self::iter_mut(source, &mut self.children).find_map(Self::focuser(source)),
        };

        if let Some((i, res)) = focus_res {
            return Ok(self.set_focus_unchecked(i).and(res));
        }

        Err(CannotFocus)
    }

    fn call_on_any(&mut self, selector: &Selector, callback: AnyCb) {
        for child in &mut self.children {
            child.view.call_on_any(selector, callback);
        }
    }

    fn focus_view(&mut self, selector: &Selector) -> Result<EventResult, ViewNotFound> {
        let focus_res = self
            .children
            .iter_mut()
            .enumerate()
            .find_map(|(i, c)| c.view.focus_view(selector).ok().map(|res| (i, res)));
        if let Some((i, res)) = focus_res {
            return Ok(self.set_focus_unchecked(i).and(res));
        }

        Err(ViewNotFound)
    }
}

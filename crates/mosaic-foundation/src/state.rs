//! Masonry layout state management.
//!
//! Provides [`MasonryState`], which owns the data source, the resolved
//! columns, the placement and the current window, and recomputes them in
//! full whenever one of their inputs changes.

use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::columns::{ColumnPolicy, LayoutConfig};
use crate::error::Result;
use crate::item::MasonryItem;
use crate::load_more::LoadMoreTrigger;
use crate::placement::{place_items, PlacedItem, Placement, DEFAULT_TRAILING_MARGIN};
use crate::window::{compute_window, ViewportMetrics, VisibleWindow, OVERSCAN_ITEM_COUNT};

/// Snapshot of the layout for external consumption.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MasonryLayoutInfo {
    /// Range of items currently materialized.
    pub visible_range: Range<usize>,

    /// Total number of items in the data source.
    pub total_items_count: usize,

    pub column_count: usize,
    pub column_width: f32,
    pub column_gap: f32,

    /// Tallest column plus the trailing margin.
    pub content_height: f32,

    pub scroll_top: f32,
    pub viewport_height: f32,
}

/// State object for a virtualized masonry gallery.
///
/// Cloning yields another handle to the same state.
///
/// # Example
///
/// ```rust,ignore
/// let state = MasonryState::new(ColumnPolicy::default(), 48.0, 1280.0)?;
/// state.set_data_source(items.into());
/// state.apply_resize(1200.0, ViewportMetrics::new(0.0, 800.0)?)?;
/// for item in state.visible_items() {
///     println!("{} at {:?}", item.key, item.style);
/// }
/// ```
pub struct MasonryState<T> {
    inner: Rc<RefCell<MasonryStateInner<T>>>,
}

struct MasonryStateInner<T> {
    policy: ColumnPolicy,

    /// Space kept below the tallest column for the load indicator.
    trailing_margin: f32,

    layout: LayoutConfig,

    data: Rc<[T]>,

    placement: Placement,

    /// First index of each item id, for offset lookups.
    key_index: FxHashMap<String, usize>,

    viewport: ViewportMetrics,

    window: VisibleWindow,

    load_more: LoadMoreTrigger,

    /// Window commits not yet reported as rendered.
    pending_render_complete: usize,

    invalidate_callbacks: Vec<(u64, Rc<dyn Fn()>)>,
    next_callback_id: u64,
}

impl<T> Clone for MasonryState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: MasonryItem> MasonryState<T> {
    /// Creates an empty state.
    ///
    /// Column count and gap are resolved from `document_width` right away;
    /// the column width stays zero until the first [`apply_resize`], so
    /// nothing is placed before the container is measured.
    ///
    /// [`apply_resize`]: Self::apply_resize
    pub fn new(policy: ColumnPolicy, trailing_margin: f32, document_width: f32) -> Result<Self> {
        let layout = policy.unmeasured(document_width)?;
        Ok(Self {
            inner: Rc::new(RefCell::new(MasonryStateInner {
                policy,
                trailing_margin,
                layout,
                data: Rc::from(Vec::new()),
                placement: Placement::default(),
                key_index: FxHashMap::default(),
                viewport: ViewportMetrics::default(),
                window: VisibleWindow::default(),
                load_more: LoadMoreTrigger::default(),
                pending_render_complete: 0,
                invalidate_callbacks: Vec::new(),
                next_callback_id: 1,
            })),
        })
    }

    /// Creates a state with the default breakpoints and trailing margin.
    pub fn with_document_width(document_width: f32) -> Result<Self> {
        Self::new(ColumnPolicy::default(), DEFAULT_TRAILING_MARGIN, document_width)
    }

    /// Replaces the data source.
    ///
    /// Sources are compared by pointer: handing back the same `Rc` is a
    /// no-op, any other value triggers a full re-placement. Returns whether
    /// the layout was recomputed.
    pub fn set_data_source(&self, data: Rc<[T]>) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            if Rc::ptr_eq(&inner.data, &data) {
                return false;
            }
            inner.key_index = index_keys(&data);
            inner.data = data;
            inner.place();
            inner.commit_window();
        }
        self.invalidate();
        true
    }

    /// Applies a settled size change.
    ///
    /// Re-places items when the resolved columns differ from the current
    /// ones, then recomputes the window for the new viewport. Returns
    /// whether the placement changed.
    pub fn apply_resize(&self, container_width: f32, viewport: ViewportMetrics) -> Result<bool> {
        let replaced = {
            let mut inner = self.inner.borrow_mut();
            let layout = inner.policy.resolve(container_width)?;
            let replaced = layout != inner.layout;
            if replaced {
                inner.layout = layout;
                inner.place();
            }
            inner.viewport = viewport;
            inner.commit_window();
            replaced
        };
        self.invalidate();
        Ok(replaced)
    }

    /// Applies a scroll position. Returns whether the window was recomputed.
    pub fn apply_scroll(&self, viewport: ViewportMetrics) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.viewport == viewport {
                return false;
            }
            inner.viewport = viewport;
            inner.commit_window();
        }
        self.invalidate();
        true
    }

    /// Updates whether the caller has more pages to load.
    pub fn set_has_next_page(&self, has_next_page: bool) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            let changed = inner.load_more.has_next_page() != has_next_page;
            inner.load_more.set_has_next_page(has_next_page);
            changed
        };
        if changed {
            self.invalidate();
        }
    }

    /// Records a sentinel visibility change. Returns true on a rising edge,
    /// when the caller should request more data.
    pub fn update_sentinel_visibility(&self, visible: bool) -> bool {
        self.inner.borrow_mut().load_more.update_visibility(visible)
    }

    /// Number of append requests reported so far.
    pub fn append_request_count(&self) -> u64 {
        self.inner.borrow().load_more.request_count()
    }

    /// Top of the load sentinel, present only while more pages exist.
    pub fn sentinel_top(&self) -> Option<f32> {
        let inner = self.inner.borrow();
        inner
            .load_more
            .sentinel_top(inner.content_height(), inner.trailing_margin)
    }

    pub fn data_source(&self) -> Rc<[T]> {
        self.inner.borrow().data.clone()
    }

    pub fn layout_config(&self) -> LayoutConfig {
        self.inner.borrow().layout
    }

    pub fn viewport(&self) -> ViewportMetrics {
        self.inner.borrow().viewport
    }

    pub fn trailing_margin(&self) -> f32 {
        self.inner.borrow().trailing_margin
    }

    /// Accumulated height of each column.
    pub fn column_heights(&self) -> Vec<f32> {
        self.inner.borrow().placement.column_heights.to_vec()
    }

    /// Tallest column plus the trailing margin.
    pub fn content_height(&self) -> f32 {
        self.inner.borrow().content_height()
    }

    /// Whether a placement with at least one column exists.
    pub fn has_layout(&self) -> bool {
        self.inner.borrow().placement.has_columns()
    }

    pub fn visible_window(&self) -> VisibleWindow {
        self.inner.borrow().window.clone()
    }

    pub fn visible_range(&self) -> Range<usize> {
        self.inner.borrow().window.range.clone()
    }

    /// Clones of the items in the current window.
    pub fn visible_items(&self) -> Vec<PlacedItem> {
        self.with_visible(|items, _| items.iter().map(|(placed, _)| (*placed).clone()).collect())
    }

    /// Runs `f` over the current window without cloning placements.
    ///
    /// Each entry pairs the placement with its source item. The second
    /// argument is the full placement, for callers that need column data.
    /// `f` must not call back into this state mutably.
    pub fn with_visible<R>(&self, f: impl FnOnce(&[(&PlacedItem, &T)], &Placement) -> R) -> R {
        let inner = self.inner.borrow();
        let range = inner.window.range.clone();
        let pairs: Vec<(&PlacedItem, &T)> = inner.placement.items[range]
            .iter()
            .map(|placed| (placed, &inner.data[placed.origin_index]))
            .collect();
        f(&pairs, &inner.placement)
    }

    /// Placement of every item, in source order.
    pub fn placed_items(&self) -> Vec<PlacedItem> {
        self.inner.borrow().placement.items.clone()
    }

    /// Content offset of the first item with `id`, for scroll-to-item.
    pub fn item_offset(&self, id: &str) -> Option<f32> {
        let inner = self.inner.borrow();
        let index = *inner.key_index.get(id)?;
        inner.placement.items.get(index).map(|placed| placed.style.top)
    }

    /// Returns the layout info from the last recomputation.
    pub fn layout_info(&self) -> MasonryLayoutInfo {
        let inner = self.inner.borrow();
        MasonryLayoutInfo {
            visible_range: inner.window.range.clone(),
            total_items_count: inner.data.len(),
            column_count: inner.layout.column_count,
            column_width: inner.layout.column_width,
            column_gap: inner.layout.column_gap,
            content_height: inner.content_height(),
            scroll_top: inner.viewport.scroll_top,
            viewport_height: inner.viewport.viewport_height,
        }
    }

    /// Returns and clears the number of window commits awaiting a
    /// render-complete notification.
    pub fn take_render_completions(&self) -> usize {
        std::mem::take(&mut self.inner.borrow_mut().pending_render_complete)
    }

    /// Adds a callback fired after every layout or window change.
    pub fn add_invalidate_callback(&self, callback: Box<dyn Fn()>) -> u64 {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_callback_id;
        inner.next_callback_id += 1;
        inner.invalidate_callbacks.push((id, Rc::from(callback)));
        id
    }

    /// Removes an invalidation callback.
    pub fn remove_invalidate_callback(&self, id: u64) {
        let mut inner = self.inner.borrow_mut();
        inner.invalidate_callbacks.retain(|(cb_id, _)| *cb_id != id);
    }

    fn invalidate(&self) {
        let callbacks: Vec<Rc<dyn Fn()>> = self
            .inner
            .borrow()
            .invalidate_callbacks
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in callbacks {
            callback();
        }
    }
}

impl<T: MasonryItem> MasonryStateInner<T> {
    fn place(&mut self) {
        self.placement = place_items(&self.data, &self.layout);
    }

    fn commit_window(&mut self) {
        self.window = compute_window(&self.placement.items, self.viewport, OVERSCAN_ITEM_COUNT);
        self.pending_render_complete += 1;
    }

    fn content_height(&self) -> f32 {
        self.placement.content_height(self.trailing_margin)
    }
}

fn index_keys<T: MasonryItem>(data: &[T]) -> FxHashMap<String, usize> {
    let mut index = FxHashMap::default();
    for (i, item) in data.iter().enumerate() {
        index.entry(item.id().to_owned()).or_insert(i);
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::DataItem;
    use std::cell::Cell;

    fn gallery(len: usize) -> Rc<[DataItem]> {
        (0..len)
            .map(|i| DataItem::new(format!("photo-{i}"), 100.0, 100.0))
            .collect::<Vec<_>>()
            .into()
    }

    fn viewport(top: f32, height: f32) -> ViewportMetrics {
        ViewportMetrics::new(top, height).unwrap()
    }

    #[test]
    fn nothing_placed_before_first_resize() {
        let state = MasonryState::with_document_width(1000.0).unwrap();
        state.set_data_source(gallery(10));
        assert_eq!(state.layout_config().column_count, 3);
        assert!(!state.has_layout());
        assert!(state.visible_items().is_empty());
        assert_eq!(state.content_height(), 48.0);
    }

    #[test]
    fn resize_places_and_windows() {
        let state = MasonryState::with_document_width(500.0).unwrap();
        state.set_data_source(gallery(100));
        let replaced = state.apply_resize(500.0, viewport(0.0, 800.0)).unwrap();
        assert!(replaced);
        // One 500-wide column of squares, 524 per row.
        assert_eq!(state.layout_config().column_width, 500.0);
        assert_eq!(state.visible_range(), 0..22);
        assert_eq!(state.content_height(), 100.0 * 524.0 + 48.0);
    }

    #[test]
    fn same_columns_do_not_replace() {
        let state = MasonryState::with_document_width(500.0).unwrap();
        state.set_data_source(gallery(4));
        assert!(state.apply_resize(500.0, viewport(0.0, 800.0)).unwrap());
        assert!(!state.apply_resize(500.0, viewport(0.0, 700.0)).unwrap());
    }

    #[test]
    fn same_data_source_is_ignored() {
        let state = MasonryState::with_document_width(500.0).unwrap();
        let data = gallery(4);
        assert!(state.set_data_source(data.clone()));
        assert!(!state.set_data_source(data));
        // Equal contents in a new allocation count as a change.
        assert!(state.set_data_source(gallery(4)));
    }

    #[test]
    fn scroll_moves_window() {
        let state = MasonryState::with_document_width(500.0).unwrap();
        state.set_data_source(gallery(200));
        state.apply_resize(500.0, viewport(0.0, 800.0)).unwrap();
        assert!(state.apply_scroll(viewport(52_400.0, 800.0)));
        let window = state.visible_window();
        assert_eq!(window.first_visible, 100);
        assert_eq!(window.range, 80..122);
        assert!(!state.apply_scroll(viewport(52_400.0, 800.0)));
    }

    #[test]
    fn render_completions_accumulate_per_commit() {
        let state = MasonryState::with_document_width(500.0).unwrap();
        state.set_data_source(gallery(5));
        state.apply_resize(500.0, viewport(0.0, 800.0)).unwrap();
        state.apply_scroll(viewport(10.0, 800.0));
        assert_eq!(state.take_render_completions(), 3);
        assert_eq!(state.take_render_completions(), 0);
    }

    #[test]
    fn sentinel_follows_pagination_flag() {
        let state = MasonryState::with_document_width(500.0).unwrap();
        state.set_data_source(gallery(2));
        state.apply_resize(500.0, viewport(0.0, 800.0)).unwrap();
        assert_eq!(state.sentinel_top(), None);
        assert!(!state.update_sentinel_visibility(true));

        state.set_has_next_page(true);
        assert_eq!(state.sentinel_top(), Some(1_048.0));
        assert!(state.update_sentinel_visibility(true));
        assert!(!state.update_sentinel_visibility(true));
        assert_eq!(state.append_request_count(), 1);
    }

    #[test]
    fn item_offset_finds_first_match() {
        let state = MasonryState::with_document_width(500.0).unwrap();
        state.set_data_source(gallery(10));
        state.apply_resize(500.0, viewport(0.0, 800.0)).unwrap();
        assert_eq!(state.item_offset("photo-3"), Some(3.0 * 524.0));
        assert_eq!(state.item_offset("missing"), None);
    }

    #[test]
    fn invalidate_callbacks_fire_and_unregister() {
        let state = MasonryState::with_document_width(500.0).unwrap();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let reader = state.clone();
        let id = state.add_invalidate_callback(Box::new(move || {
            // Reading state from a callback is allowed.
            let _ = reader.visible_range();
            counter.set(counter.get() + 1);
        }));
        state.set_data_source(gallery(3));
        assert_eq!(hits.get(), 1);
        state.remove_invalidate_callback(id);
        state.set_data_source(gallery(3));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn rejected_resize_keeps_previous_layout() {
        let state = MasonryState::with_document_width(500.0).unwrap();
        state.set_data_source(gallery(3));
        state.apply_resize(500.0, viewport(0.0, 800.0)).unwrap();
        assert!(state.apply_resize(f32::NAN, viewport(0.0, 800.0)).is_err());
        assert_eq!(state.layout_config().column_width, 500.0);
        assert_eq!(state.placed_items().len(), 3);
    }

    #[test]
    fn layout_info_snapshot() {
        let state = MasonryState::with_document_width(900.0).unwrap();
        state.set_data_source(gallery(8));
        state.apply_resize(900.0, viewport(0.0, 600.0)).unwrap();
        let info = state.layout_info();
        assert_eq!(info.total_items_count, 8);
        assert_eq!(info.column_count, 3);
        assert_eq!(info.column_gap, 24.0);
        assert_eq!(info.visible_range, 0..8);
        assert_eq!(info.viewport_height, 600.0);
    }
}

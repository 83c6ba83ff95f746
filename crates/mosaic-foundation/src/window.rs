//! Viewport windowing.
//!
//! Selects the contiguous run of placed items around the visible region so
//! that only those are materialized.

use std::ops::Range;

use crate::error::{LayoutError, Result};
use crate::placement::PlacedItem;

/// Items materialized on each side of the visible run.
pub const OVERSCAN_ITEM_COUNT: usize = 20;

/// Scroll position and visible height of the gallery container.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportMetrics {
    /// Distance the container's top edge has scrolled above the window.
    pub scroll_top: f32,
    /// Height of the part of the container that is inside the window.
    pub viewport_height: f32,
}

impl ViewportMetrics {
    pub fn new(scroll_top: f32, viewport_height: f32) -> Result<Self> {
        let usable = |v: f32| v.is_finite() && v >= 0.0;
        if usable(scroll_top) && usable(viewport_height) {
            Ok(Self {
                scroll_top,
                viewport_height,
            })
        } else {
            Err(LayoutError::InvalidViewport {
                scroll_top,
                viewport_height,
            })
        }
    }

    /// Derives metrics from the container's bounding box relative to the
    /// window.
    ///
    /// `rect_top` is negative once the container has scrolled past the top
    /// of the window.
    pub fn from_container_rect(rect_top: f32, rect_height: f32, window_height: f32) -> Result<Self> {
        let scroll_top = if rect_top >= 0.0 { 0.0 } else { -rect_top };
        let visible_top = rect_top.max(0.0);
        let visible_bottom = (rect_top + rect_height).min(window_height);
        Self::new(scroll_top, (visible_bottom - visible_top).max(0.0))
    }

    /// Bottom edge of the visible region in content coordinates.
    pub fn scroll_bottom(&self) -> f32 {
        self.scroll_top + self.viewport_height
    }
}

/// Outcome of a window computation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisibleWindow {
    /// First item not fully scrolled past, or `len` when there is none.
    pub first_visible: usize,
    /// First item entirely below the fold, or `len` when there is none.
    pub last_visible: usize,
    /// Overscanned range to materialize.
    pub range: Range<usize>,
}

impl VisibleWindow {
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Computes the materialized range for `items` at the given viewport.
///
/// `items` must be in placement order, where `top` never decreases; the
/// fold is found with a binary search on that ordering. The first visible
/// item is found with a forward scan because bottoms are not ordered.
pub fn compute_window(
    items: &[PlacedItem],
    viewport: ViewportMetrics,
    overscan: usize,
) -> VisibleWindow {
    let len = items.len();
    let fold = viewport.scroll_bottom();

    let first_visible = items
        .iter()
        .position(|item| item.style.bottom() > viewport.scroll_top)
        .unwrap_or(len);
    let last_visible = items.partition_point(|item| item.style.top < fold);

    let start = first_visible.saturating_sub(overscan);
    let end = last_visible.saturating_add(overscan).min(len).max(start);

    log::trace!(
        "mosaic: window {}..{} of {} (first {}, fold {})",
        start,
        end,
        len,
        first_visible,
        last_visible
    );

    VisibleWindow {
        first_visible,
        last_visible,
        range: start..end,
    }
}

/// Returns the slice of `items` to materialize, with the standard overscan.
pub fn window_items(items: &[PlacedItem], viewport: ViewportMetrics) -> &[PlacedItem] {
    let window = compute_window(items, viewport, OVERSCAN_ITEM_COUNT);
    &items[window.range]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::ItemStyle;

    /// A single column of 100-unit items with no gap.
    fn column(len: usize) -> Vec<PlacedItem> {
        (0..len)
            .map(|i| PlacedItem {
                origin_index: i,
                column: 0,
                key: format!("k_{i}"),
                style: ItemStyle {
                    width: 100.0,
                    height: 100.0,
                    top: i as f32 * 100.0,
                    left: 0.0,
                },
            })
            .collect()
    }

    fn viewport(top: f32, height: f32) -> ViewportMetrics {
        ViewportMetrics::new(top, height).unwrap()
    }

    #[test]
    fn top_of_list() {
        let items = column(100);
        let window = compute_window(&items, viewport(0.0, 250.0), OVERSCAN_ITEM_COUNT);
        assert_eq!(window.first_visible, 0);
        assert_eq!(window.last_visible, 3);
        assert_eq!(window.range, 0..23);
    }

    #[test]
    fn middle_of_list() {
        let items = column(100);
        let window = compute_window(&items, viewport(5_000.0, 300.0), OVERSCAN_ITEM_COUNT);
        assert_eq!(window.first_visible, 50);
        assert_eq!(window.last_visible, 53);
        assert_eq!(window.range, 30..73);
    }

    #[test]
    fn partially_scrolled_item_stays_visible() {
        let items = column(10);
        let window = compute_window(&items, viewport(150.0, 100.0), 0);
        assert_eq!(window.range, 1..3);
    }

    #[test]
    fn nothing_below_fold_clamps_to_end() {
        let items = column(30);
        let window = compute_window(&items, viewport(2_800.0, 500.0), OVERSCAN_ITEM_COUNT);
        assert_eq!(window.last_visible, 30);
        assert_eq!(window.range, 8..30);
    }

    #[test]
    fn scrolled_past_everything_keeps_tail() {
        let items = column(50);
        let window = compute_window(&items, viewport(10_000.0, 400.0), OVERSCAN_ITEM_COUNT);
        assert_eq!(window.first_visible, 50);
        assert_eq!(window.range, 30..50);
    }

    #[test]
    fn empty_items() {
        let window = compute_window(&[], viewport(0.0, 400.0), OVERSCAN_ITEM_COUNT);
        assert!(window.is_empty());
        assert_eq!(window.range, 0..0);
    }

    #[test]
    fn window_is_contiguous_subset() {
        let items = column(64);
        for step in 0..80 {
            let top = step as f32 * 97.0;
            for height in [0.0, 50.0, 480.0, 2_000.0] {
                let window = compute_window(&items, viewport(top, height), OVERSCAN_ITEM_COUNT);
                assert!(window.range.start <= window.range.end);
                assert!(window.range.end <= items.len());
            }
        }
    }

    #[test]
    fn window_items_slices_source() {
        let items = column(100);
        let slice = window_items(&items, viewport(5_000.0, 300.0));
        assert_eq!(slice.len(), 43);
        assert_eq!(slice[0].origin_index, 30);
    }

    #[test]
    fn metrics_from_rect() {
        // Container starts below the top of the window.
        let m = ViewportMetrics::from_container_rect(120.0, 5_000.0, 800.0).unwrap();
        assert_eq!(m, viewport(0.0, 680.0));

        // Container scrolled 900 units above the window.
        let m = ViewportMetrics::from_container_rect(-900.0, 5_000.0, 800.0).unwrap();
        assert_eq!(m, viewport(900.0, 800.0));

        // Container end is inside the window.
        let m = ViewportMetrics::from_container_rect(-4_700.0, 5_000.0, 800.0).unwrap();
        assert_eq!(m, viewport(4_700.0, 300.0));

        // Container entirely below the window.
        let m = ViewportMetrics::from_container_rect(1_000.0, 5_000.0, 800.0).unwrap();
        assert_eq!(m.viewport_height, 0.0);
    }

    #[test]
    fn metrics_reject_nan() {
        assert!(ViewportMetrics::new(f32::NAN, 10.0).is_err());
        assert!(ViewportMetrics::new(0.0, -1.0).is_err());
    }
}

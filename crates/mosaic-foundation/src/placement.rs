//! Masonry placement.
//!
//! Assigns every item of a data source to a column using the greedy
//! shortest-column-first heuristic and computes its absolute position.
//! Placement is a pure function of the items and the [`LayoutConfig`]; it
//! is recomputed wholesale whenever either changes.

use smallvec::SmallVec;

use crate::columns::LayoutConfig;
use crate::item::MasonryItem;

/// Vertical space reserved below the tallest column for the load indicator.
pub const DEFAULT_TRAILING_MARGIN: f32 = 48.0;

/// Accumulated height per column. Column counts are small, so this stays
/// inline for every realistic breakpoint table.
pub type ColumnHeights = SmallVec<[f32; 8]>;

/// Absolute geometry of a placed item, in layout units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ItemStyle {
    pub width: f32,
    pub height: f32,
    pub top: f32,
    pub left: f32,
}

impl ItemStyle {
    /// Bottom edge of the item.
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// True when the item's vertical span `[top, bottom)` overlaps
    /// `[start, end)`.
    pub fn intersects(&self, start: f32, end: f32) -> bool {
        self.bottom() > start && self.top < end
    }
}

/// An item after placement.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedItem {
    /// Position of the item in the data source.
    pub origin_index: usize,

    /// Column the item was placed into.
    pub column: usize,

    /// Reconciliation key, `"{id}_{origin_index}"`. Item ids alone may repeat.
    pub key: String,

    /// Computed geometry.
    pub style: ItemStyle,
}

impl PlacedItem {
    /// 1-based index shown to the item renderer.
    pub fn display_index(&self) -> usize {
        self.origin_index + 1
    }
}

/// Result of placing a data source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Placement {
    /// One entry per data item, in source order.
    pub items: Vec<PlacedItem>,

    /// Final accumulated height of each column, trailing gap included.
    pub column_heights: ColumnHeights,
}

impl Placement {
    /// Height of the tallest column, or 0 for an empty layout.
    pub fn max_column_height(&self) -> f32 {
        self.column_heights.iter().copied().fold(0.0, f32::max)
    }

    /// Total scrollable height: tallest column plus the trailing margin.
    pub fn content_height(&self, trailing_margin: f32) -> f32 {
        self.max_column_height() + trailing_margin
    }

    /// True once at least one column has been laid out.
    pub fn has_columns(&self) -> bool {
        !self.column_heights.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Height an item takes in a column of the given width.
pub fn item_height<T: MasonryItem + ?Sized>(item: &T, column_width: f32) -> f32 {
    column_width / item.aspect_ratio()
}

/// Places `items` into `config.column_count` columns.
///
/// The first `column_count` items seed one column each at `top = 0`. Every
/// later item goes to the column with the smallest accumulated height
/// (lowest index on ties) and grows it by `item_height + column_gap`.
///
/// Returns an empty placement while the column width is zero, i.e. before
/// the container has been measured.
pub fn place_items<T: MasonryItem>(items: &[T], config: &LayoutConfig) -> Placement {
    if config.is_unmeasured() || config.column_count == 0 {
        return Placement::default();
    }

    let column_count = config.column_count;
    let gap = config.column_gap;
    let mut heights = ColumnHeights::with_capacity(column_count);
    let mut placed = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let height = item_height(item, config.column_width);

        let (column, top) = if index < column_count {
            heights.push(height + gap);
            (index, 0.0)
        } else {
            let column = shortest_column(&heights);
            let top = heights[column];
            heights[column] = top + height + gap;
            (column, top)
        };

        placed.push(PlacedItem {
            origin_index: index,
            column,
            key: format!("{}_{}", item.id(), index),
            style: ItemStyle {
                width: config.column_width,
                height,
                top,
                left: config.column_left(column),
            },
        });
    }

    log::debug!(
        "mosaic: placed {} items into {} columns (width {:.2}, gap {})",
        placed.len(),
        heights.len(),
        config.column_width,
        gap
    );

    Placement {
        items: placed,
        column_heights: heights,
    }
}

/// Index of the smallest height; the first one wins ties.
fn shortest_column(heights: &[f32]) -> usize {
    let mut best = 0;
    for (index, &height) in heights.iter().enumerate().skip(1) {
        if height < heights[best] {
            best = index;
        }
    }
    best
}

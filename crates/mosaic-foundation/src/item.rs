//! Item contracts for masonry layouts.
//!
//! Defines the [`MasonryItem`] trait through which the placer reads the
//! caller's data, plus [`DataItem`], a ready-made implementation.

/// Provides the information the masonry placer needs about one item.
///
/// Implementations are treated as immutable: a changed data source is
/// expected to arrive as a new collection.
pub trait MasonryItem {
    /// Stable identifier. Not required to be unique across the list.
    fn id(&self) -> &str;

    /// Intrinsic width, used only for the aspect ratio.
    fn intrinsic_width(&self) -> f32;

    /// Intrinsic height, used only for the aspect ratio.
    fn intrinsic_height(&self) -> f32;

    /// Width over height, or 1.0 when either dimension is unusable.
    fn aspect_ratio(&self) -> f32 {
        aspect_ratio(self.intrinsic_width(), self.intrinsic_height())
    }
}

impl<T: MasonryItem + ?Sized> MasonryItem for &T {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn intrinsic_width(&self) -> f32 {
        (**self).intrinsic_width()
    }

    fn intrinsic_height(&self) -> f32 {
        (**self).intrinsic_height()
    }
}

/// Computes `width / height`, falling back to a square for zero, negative
/// or non-finite dimensions.
pub fn aspect_ratio(width: f32, height: f32) -> f32 {
    let usable = |v: f32| v.is_finite() && v > 0.0;
    if usable(width) && usable(height) {
        width / height
    } else {
        log::trace!("mosaic: degenerate intrinsic size {width}x{height}, using square");
        1.0
    }
}

/// A minimal caller item: identifier and intrinsic size.
#[derive(Clone, Debug, PartialEq)]
pub struct DataItem {
    pub id: String,
    pub width: f32,
    pub height: f32,
}

impl DataItem {
    pub fn new(id: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }
}

impl MasonryItem for DataItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn intrinsic_width(&self) -> f32 {
        self.width
    }

    fn intrinsic_height(&self) -> f32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_of_regular_item() {
        assert_eq!(DataItem::new("a", 100.0, 50.0).aspect_ratio(), 2.0);
        assert_eq!(DataItem::new("b", 100.0, 200.0).aspect_ratio(), 0.5);
    }

    #[test]
    fn degenerate_sizes_fall_back_to_square() {
        assert_eq!(aspect_ratio(0.0, 100.0), 1.0);
        assert_eq!(aspect_ratio(100.0, 0.0), 1.0);
        assert_eq!(aspect_ratio(-5.0, 10.0), 1.0);
        assert_eq!(aspect_ratio(f32::NAN, 10.0), 1.0);
        assert_eq!(aspect_ratio(10.0, f32::INFINITY), 1.0);
    }

    #[test]
    fn references_forward_to_item() {
        let item = DataItem::new("x", 30.0, 10.0);
        let by_ref: &DataItem = &item;
        assert_eq!(MasonryItem::id(&by_ref), "x");
        assert_eq!(by_ref.aspect_ratio(), 3.0);
    }
}

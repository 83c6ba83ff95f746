//! Item fixtures for layout tests.

use std::rc::Rc;

use mosaic_foundation::DataItem;

/// Common photo aspect ratios, as intrinsic `(width, height)`.
pub const PHOTO_SIZES: [(f32, f32); 6] = [
    (4000.0, 3000.0),
    (3000.0, 4000.0),
    (1920.0, 1080.0),
    (1080.0, 1920.0),
    (2048.0, 2048.0),
    (3000.0, 2000.0),
];

/// `count` items cycling through [`PHOTO_SIZES`], with ids `photo-{i}`.
pub fn photo_gallery(count: usize) -> Rc<[DataItem]> {
    photo_page(0, count)
}

/// A page of photos whose ids continue from `offset`.
pub fn photo_page(offset: usize, count: usize) -> Rc<[DataItem]> {
    (offset..offset + count)
        .map(|i| {
            let (width, height) = PHOTO_SIZES[i % PHOTO_SIZES.len()];
            DataItem::new(format!("photo-{i}"), width, height)
        })
        .collect::<Vec<_>>()
        .into()
}

/// `count` square items with ids `square-{i}`.
pub fn square_items(count: usize) -> Rc<[DataItem]> {
    (0..count)
        .map(|i| DataItem::new(format!("square-{i}"), 1.0, 1.0))
        .collect::<Vec<_>>()
        .into()
}

/// Concatenates two data sources into a new one, as a pager appending a page.
pub fn appended(current: &[DataItem], page: &[DataItem]) -> Rc<[DataItem]> {
    current.iter().chain(page).cloned().collect::<Vec<_>>().into()
}

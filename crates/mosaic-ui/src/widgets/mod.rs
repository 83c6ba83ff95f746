mod virtual_masonry;

pub use virtual_masonry::*;

//! Widget layer for Mosaic.
//!
//! Binds the pure layout core from `mosaic-foundation` to a host: sensor
//! wiring, event rate limiting, deferred render notifications and item
//! materialization through a caller-supplied render function.

pub mod widgets;

pub use widgets::*;

// Re-export from foundation - single source of truth
pub use mosaic_foundation::{
    Breakpoint, ColumnFallback, DataItem, ItemStyle, LayoutError, MasonryItem, MasonryLayoutInfo,
    MasonryState, PlacedItem, ResizeEvent, ScrollEvent, SensorSubscription, ViewportMetrics,
    ViewportSensor, VisibilityEvent,
};

//! Foundation layer for Mosaic.
//!
//! Pure, framework-agnostic building blocks for a virtualized masonry
//! gallery. Nothing here touches a concrete view system: the host feeds in
//! measurements and reads back placements.
//!
//! # Architecture
//!
//! - [`resolve_columns`] - breakpoint table to column count/width/gap
//! - [`place_items`] - greedy shortest-column masonry placement
//! - [`window_items`] - contiguous overscanned slice around the viewport
//! - [`LoadMoreTrigger`] - rising-edge detector for the load sentinel
//! - [`Throttle`] / [`Debounce`] - event rate limiting driven by explicit time
//! - [`ViewportSensor`] - abstraction over resize/scroll/visibility observers
//! - [`MasonryState`] - state holder that recomputes all of the above on triggers

pub mod columns;
pub mod error;
pub mod item;
pub mod load_more;
pub mod placement;
pub mod rate_limit;
pub mod sensor;
pub mod state;
pub mod window;

pub use columns::*;
pub use error::{ColumnSource, LayoutError, Result};
pub use item::*;
pub use load_more::*;
pub use placement::*;
pub use rate_limit::*;
pub use sensor::*;
pub use state::*;
pub use window::*;

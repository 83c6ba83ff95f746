//! Error types for layout computation.

/// Result type alias for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Where a rejected column count came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSource {
    /// A breakpoint entry, by position in the table.
    Breakpoint(usize),
    /// The fallback used when no breakpoint matched.
    Fallback,
    /// A layout config handed directly to the placer.
    Config,
}

impl std::fmt::Display for ColumnSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnSource::Breakpoint(index) => write!(f, "breakpoint #{index}"),
            ColumnSource::Fallback => write!(f, "fallback"),
            ColumnSource::Config => write!(f, "layout config"),
        }
    }
}

/// Errors produced when measurements or configuration cannot yield a layout.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// Container width is negative or not a finite number.
    #[error("invalid container width {width}")]
    InvalidContainerWidth { width: f32 },

    /// A column count of zero was requested.
    #[error("{origin} requests zero columns")]
    ZeroColumns { origin: ColumnSource },

    /// Column gap is negative or not a finite number.
    #[error("invalid column gap {gap}")]
    InvalidGap { gap: f32 },

    /// Column width is not a finite number.
    #[error("invalid column width {width}")]
    InvalidColumnWidth { width: f32 },

    /// Scroll offset or viewport height is not usable.
    #[error("invalid viewport: scroll_top {scroll_top}, height {viewport_height}")]
    InvalidViewport { scroll_top: f32, viewport_height: f32 },
}

impl LayoutError {
    /// Returns true when the error came from a platform measurement rather
    /// than from caller configuration.
    pub fn is_measurement(&self) -> bool {
        matches!(
            self,
            LayoutError::InvalidContainerWidth { .. } | LayoutError::InvalidViewport { .. }
        )
    }
}

//! Column resolution.
//!
//! Maps the measured container width to a column count, column width and
//! gap using an ordered breakpoint table.

use crate::error::{ColumnSource, LayoutError, Result};

/// Default gap between columns, in layout units.
pub const DEFAULT_COLUMN_GAP: f32 = 24.0;

/// Column count used when the container is wider than every breakpoint.
pub const DEFAULT_MAX_COLUMNS: usize = 4;

/// One row of the breakpoint table.
///
/// Applies to any container whose width is at most `max_width`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Breakpoint {
    pub max_width: f32,
    pub columns: usize,
    pub gap: f32,
}

impl Breakpoint {
    pub const fn new(max_width: f32, columns: usize, gap: f32) -> Self {
        Self {
            max_width,
            columns,
            gap,
        }
    }
}

/// Default responsive tiers: phone, tablet, small desktop, desktop.
pub const DEFAULT_BREAKPOINTS: [Breakpoint; 4] = [
    Breakpoint::new(620.0, 1, DEFAULT_COLUMN_GAP),
    Breakpoint::new(768.0, 2, DEFAULT_COLUMN_GAP),
    Breakpoint::new(1024.0, 3, DEFAULT_COLUMN_GAP),
    Breakpoint::new(1280.0, 4, DEFAULT_COLUMN_GAP),
];

/// Column count and gap used when no breakpoint matches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnFallback {
    pub columns: usize,
    pub gap: f32,
}

impl Default for ColumnFallback {
    fn default() -> Self {
        Self {
            columns: DEFAULT_MAX_COLUMNS,
            gap: DEFAULT_COLUMN_GAP,
        }
    }
}

/// Breakpoint table plus fallback, as configured by the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnPolicy {
    pub breakpoints: Vec<Breakpoint>,
    pub fallback: ColumnFallback,
}

impl Default for ColumnPolicy {
    fn default() -> Self {
        Self {
            breakpoints: DEFAULT_BREAKPOINTS.to_vec(),
            fallback: ColumnFallback::default(),
        }
    }
}

impl ColumnPolicy {
    pub fn new(breakpoints: Vec<Breakpoint>, fallback: ColumnFallback) -> Self {
        Self {
            breakpoints,
            fallback,
        }
    }

    /// See [`resolve_columns`].
    pub fn resolve(&self, container_width: f32) -> Result<LayoutConfig> {
        resolve_columns(container_width, &self.breakpoints, self.fallback)
    }

    /// Column count and gap for a width, with the column width left at zero.
    pub fn unmeasured(&self, document_width: f32) -> Result<LayoutConfig> {
        let (column_count, column_gap) =
            match_breakpoint(document_width, &self.breakpoints, self.fallback)?;
        Ok(LayoutConfig {
            column_count,
            column_width: 0.0,
            column_gap,
        })
    }
}

/// Resolved column geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Number of columns, always at least 1.
    pub column_count: usize,
    /// Width of a single column. Zero until the container has been measured.
    pub column_width: f32,
    /// Horizontal gap between adjacent columns, and vertical gap between
    /// stacked items.
    pub column_gap: f32,
}

impl LayoutConfig {
    /// Creates a config, checking the invariants the placer relies on.
    pub fn new(column_count: usize, column_width: f32, column_gap: f32) -> Result<Self> {
        if column_count == 0 {
            return Err(LayoutError::ZeroColumns {
                origin: ColumnSource::Config,
            });
        }
        if !column_width.is_finite() {
            return Err(LayoutError::InvalidColumnWidth {
                width: column_width,
            });
        }
        check_gap(column_gap)?;
        Ok(Self {
            column_count,
            column_width: column_width.max(0.0),
            column_gap,
        })
    }

    /// Horizontal offset of the given column's left edge.
    pub fn column_left(&self, column: usize) -> f32 {
        column as f32 * (self.column_width + self.column_gap)
    }

    /// True when the container has not produced a usable column width yet.
    pub fn is_unmeasured(&self) -> bool {
        self.column_width <= 0.0
    }
}

/// Picks column count and gap for `width` without computing column width.
///
/// First match wins, so the table must be ordered from narrowest to widest.
pub fn match_breakpoint(
    width: f32,
    breakpoints: &[Breakpoint],
    fallback: ColumnFallback,
) -> Result<(usize, f32)> {
    let (columns, gap, origin) = breakpoints
        .iter()
        .enumerate()
        .find(|(_, bp)| width <= bp.max_width)
        .map(|(index, bp)| (bp.columns, bp.gap, ColumnSource::Breakpoint(index)))
        .unwrap_or((fallback.columns, fallback.gap, ColumnSource::Fallback));

    if columns == 0 {
        return Err(LayoutError::ZeroColumns { origin });
    }
    check_gap(gap)?;
    Ok((columns, gap))
}

/// Resolves the column layout for a container of the given width.
///
/// Column width is `(width - (count - 1) * gap) / count`, so `count` equal
/// columns with `gap` between them fill the container exactly. When the
/// gaps alone exceed the container, the width floors at zero and placement
/// produces an empty layout.
pub fn resolve_columns(
    container_width: f32,
    breakpoints: &[Breakpoint],
    fallback: ColumnFallback,
) -> Result<LayoutConfig> {
    if !container_width.is_finite() || container_width < 0.0 {
        return Err(LayoutError::InvalidContainerWidth {
            width: container_width,
        });
    }

    let (column_count, column_gap) = match_breakpoint(container_width, breakpoints, fallback)?;
    let gaps = (column_count - 1) as f32 * column_gap;
    let column_width = ((container_width - gaps) / column_count as f32).max(0.0);

    log::debug!(
        "mosaic: width {} resolved to {} columns of {:.2} (gap {})",
        container_width,
        column_count,
        column_width,
        column_gap
    );

    Ok(LayoutConfig {
        column_count,
        column_width,
        column_gap,
    })
}

fn check_gap(gap: f32) -> Result<()> {
    if gap.is_finite() && gap >= 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidGap { gap })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE: [Breakpoint; 1] = [Breakpoint::new(620.0, 1, 24.0)];

    #[test]
    fn narrow_container_matches_breakpoint() {
        let config = resolve_columns(500.0, &SINGLE, ColumnFallback::default()).unwrap();
        assert_eq!(config.column_count, 1);
        assert_eq!(config.column_gap, 24.0);
        assert_eq!(config.column_width, 500.0);
    }

    #[test]
    fn wide_container_uses_fallback() {
        let config = resolve_columns(900.0, &SINGLE, ColumnFallback::default()).unwrap();
        assert_eq!(config.column_count, 4);
        assert_eq!(config.column_gap, 24.0);
        // (900 - 3 * 24) / 4
        assert_eq!(config.column_width, 207.0);
    }

    #[test]
    fn boundary_width_is_inclusive() {
        let config =
            resolve_columns(768.0, &DEFAULT_BREAKPOINTS, ColumnFallback::default()).unwrap();
        assert_eq!(config.column_count, 2);
    }

    #[test]
    fn first_match_wins_on_unsorted_table() {
        let table = [
            Breakpoint::new(1280.0, 4, 16.0),
            Breakpoint::new(620.0, 1, 8.0),
        ];
        let config = resolve_columns(400.0, &table, ColumnFallback::default()).unwrap();
        assert_eq!(config.column_count, 4);
        assert_eq!(config.column_gap, 16.0);
    }

    #[test]
    fn columns_and_gaps_fill_container() {
        for width in [320.0_f32, 700.0, 1000.0, 1200.0, 1920.0] {
            let config =
                resolve_columns(width, &DEFAULT_BREAKPOINTS, ColumnFallback::default()).unwrap();
            assert!(config.column_count >= 1);
            let used = config.column_left(config.column_count - 1) + config.column_width;
            assert!((used - width).abs() < 1e-3, "width {width} used {used}");
        }
    }

    #[test]
    fn zero_width_floors_column_width() {
        let config = resolve_columns(0.0, &DEFAULT_BREAKPOINTS, ColumnFallback::default()).unwrap();
        assert_eq!(config.column_count, 1);
        assert_eq!(config.column_width, 0.0);
        assert!(config.is_unmeasured());
    }

    #[test]
    fn gaps_wider_than_container_floor_at_zero() {
        let fallback = ColumnFallback {
            columns: 4,
            gap: 100.0,
        };
        let config = resolve_columns(200.0, &[], fallback).unwrap();
        assert_eq!(config.column_width, 0.0);
    }

    #[test]
    fn rejects_zero_columns() {
        let table = [Breakpoint::new(620.0, 0, 24.0)];
        let err = resolve_columns(300.0, &table, ColumnFallback::default()).unwrap_err();
        assert_eq!(
            err,
            LayoutError::ZeroColumns {
                origin: ColumnSource::Breakpoint(0)
            }
        );

        let fallback = ColumnFallback { columns: 0, gap: 0.0 };
        let err = resolve_columns(300.0, &[], fallback).unwrap_err();
        assert_eq!(
            err,
            LayoutError::ZeroColumns {
                origin: ColumnSource::Fallback
            }
        );
    }

    #[test]
    fn rejects_bad_measurements() {
        let fallback = ColumnFallback::default();
        assert!(matches!(
            resolve_columns(f32::NAN, &DEFAULT_BREAKPOINTS, fallback),
            Err(LayoutError::InvalidContainerWidth { .. })
        ));
        assert!(matches!(
            resolve_columns(-1.0, &DEFAULT_BREAKPOINTS, fallback),
            Err(LayoutError::InvalidContainerWidth { .. })
        ));
        let fallback = ColumnFallback {
            columns: 2,
            gap: -4.0,
        };
        assert!(matches!(
            resolve_columns(900.0, &[], fallback),
            Err(LayoutError::InvalidGap { .. })
        ));
    }

    #[test]
    fn policy_unmeasured_keeps_count_and_gap() {
        let policy = ColumnPolicy::default();
        let config = policy.unmeasured(1000.0).unwrap();
        assert_eq!(config.column_count, 3);
        assert_eq!(config.column_gap, 24.0);
        assert!(config.is_unmeasured());
        assert_eq!(policy.resolve(1000.0).unwrap().column_count, 3);
    }

    #[test]
    fn layout_config_rejects_zero_columns() {
        assert!(LayoutConfig::new(0, 100.0, 0.0).is_err());
        assert!(LayoutConfig::new(1, f32::INFINITY, 0.0).is_err());
        let config = LayoutConfig::new(3, 200.0, 24.0).unwrap();
        assert_eq!(config.column_left(2), 448.0);
    }
}

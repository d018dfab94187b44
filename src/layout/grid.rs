use thiserror::Error;

use crate::config::GridConfig;
use crate::ir::{ContainerSize, GridPosition};

use super::types::PanelRect;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("container dimensions must be positive, got {width}x{height}")]
    InvalidContainer { width: f32, height: f32 },
    #[error("grid requires positive columns, rows and gap")]
    InvalidGrid,
    #[error("columns {start}..={end} fall outside 1..={max}")]
    ColumnOutOfBounds { start: u32, end: u32, max: u32 },
    #[error("rows {start}..={end} fall outside 1..={max}")]
    RowOutOfBounds { start: u32, end: u32, max: u32 },
}

/// Resolve a grid position to an absolute pixel rectangle. Pure: the same
/// position, grid and container always produce the same rectangle.
pub fn resolve_panel_rect(
    position: GridPosition,
    grid: &GridConfig,
    container: ContainerSize,
) -> Result<PanelRect, GridError> {
    if container.width <= 0.0 || container.height <= 0.0 {
        return Err(GridError::InvalidContainer {
            width: container.width,
            height: container.height,
        });
    }
    if grid.columns == 0 || grid.rows == 0 || grid.gap <= 0.0 {
        return Err(GridError::InvalidGrid);
    }

    let column_end = position
        .column_start
        .saturating_add(position.column_span)
        .saturating_sub(1);
    if position.column_start < 1 || position.column_span < 1 || column_end > grid.columns {
        return Err(GridError::ColumnOutOfBounds {
            start: position.column_start,
            end: column_end,
            max: grid.columns,
        });
    }
    let row_end = position
        .row_start
        .saturating_add(position.row_span)
        .saturating_sub(1);
    if position.row_start < 1 || position.row_span < 1 || row_end > grid.rows {
        return Err(GridError::RowOutOfBounds {
            start: position.row_start,
            end: row_end,
            max: grid.rows,
        });
    }

    let columns = grid.columns as f32;
    let rows = grid.rows as f32;
    let cell_width = (container.width - 2.0 * grid.padding - (columns - 1.0) * grid.gap) / columns;
    let cell_height = (container.height - 2.0 * grid.padding - (rows - 1.0) * grid.gap) / rows;

    let column_span = position.column_span as f32;
    let row_span = position.row_span as f32;
    Ok(PanelRect {
        x: grid.padding + (position.column_start - 1) as f32 * (cell_width + grid.gap),
        y: grid.padding + (position.row_start - 1) as f32 * (cell_height + grid.gap),
        width: column_span * cell_width + (column_span - 1.0) * grid.gap,
        height: row_span * cell_height + (row_span - 1.0) * grid.gap,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(column_start: u32, row_start: u32, column_span: u32, row_span: u32) -> GridPosition {
        GridPosition {
            column_start,
            row_start,
            column_span,
            row_span,
        }
    }

    #[test]
    fn first_column_starts_at_padding() {
        let grid = GridConfig::default();
        let container = ContainerSize::new(1280.0, 800.0);
        let rect = resolve_panel_rect(position(1, 1, 2, 1), &grid, container).unwrap();
        assert_eq!(rect.x, 32.0);
        assert_eq!(rect.y, 32.0);
    }

    #[test]
    fn last_column_ends_at_container_minus_padding() {
        let grid = GridConfig::default();
        let container = ContainerSize::new(1280.0, 800.0);
        let rect = resolve_panel_rect(position(11, 1, 2, 1), &grid, container).unwrap();
        assert!((rect.right() - (1280.0 - 32.0)).abs() < 0.01);
    }

    #[test]
    fn span_width_includes_interior_gaps() {
        let grid = GridConfig::default();
        let container = ContainerSize::new(1280.0, 800.0);
        let one = resolve_panel_rect(position(1, 1, 1, 1), &grid, container).unwrap();
        let three = resolve_panel_rect(position(1, 1, 3, 1), &grid, container).unwrap();
        assert!((three.width - (3.0 * one.width + 2.0 * grid.gap)).abs() < 0.01);
    }

    #[test]
    fn span_past_grid_edge_is_an_error() {
        let grid = GridConfig::default();
        let container = ContainerSize::new(1280.0, 800.0);
        let err = resolve_panel_rect(position(12, 1, 2, 1), &grid, container).unwrap_err();
        assert!(matches!(err, GridError::ColumnOutOfBounds { end: 13, .. }));
        let err = resolve_panel_rect(position(1, 8, 1, 2), &grid, container).unwrap_err();
        assert!(matches!(err, GridError::RowOutOfBounds { end: 9, .. }));
    }

    #[test]
    fn zero_indexed_positions_are_rejected() {
        let grid = GridConfig::default();
        let container = ContainerSize::new(1280.0, 800.0);
        assert!(resolve_panel_rect(position(0, 1, 1, 1), &grid, container).is_err());
        assert!(resolve_panel_rect(position(1, 1, 0, 1), &grid, container).is_err());
    }

    #[test]
    fn degenerate_container_is_an_error() {
        let grid = GridConfig::default();
        let err = resolve_panel_rect(position(1, 1, 1, 1), &grid, ContainerSize::new(0.0, 600.0))
            .unwrap_err();
        assert!(matches!(err, GridError::InvalidContainer { .. }));
    }
}

// TABLE:
// ┌──────────────────────────────────────────────────────────────────────────┐
// │                      Player sprite sheet layout                          │
// ├───────────────────┬──────────────────────────────────────────────────────┤
// │ row (frame_y)     │ one row per state, see PlayerStateId::animation_row  │
// │ column (frame_x)  │ animation frame, advanced by the frame timer         │
// │ cell size         │ player width x height, no padding between cells      │
// └───────────────────┴──────────────────────────────────────────────────────┘
use crate::engine::{Point, Rect, Size};
use crate::player::Snapshot;

/// Uniform grid over a sprite sheet image.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpriteGrid {
    cell: Size,
}

impl SpriteGrid {
    pub fn new(cell: Size) -> Self {
        SpriteGrid { cell }
    }

    /// source rectangle of (column, row) on the sheet
    pub fn cell(&self, column: u32, row: u32) -> Rect {
        Rect::new(
            Point {
                x: f64::from(column) * self.cell.width,
                y: f64::from(row) * self.cell.height,
            },
            self.cell,
        )
    }

    /// (source, destination) for drawing the player as of `snapshot`
    pub fn frame_for(&self, snapshot: &Snapshot) -> (Rect, Rect) {
        let source = self.cell(snapshot.frame_index, snapshot.animation_row);
        let destination = Rect::new(snapshot.position, self.cell);
        (source, destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::state::PlayerStateId;
    use approx::assert_relative_eq;

    const CELL: Size = Size {
        width: 200.0,
        height: 181.83,
    };

    #[test]
    fn cells_step_by_cell_size() {
        let grid = SpriteGrid::new(CELL);
        let rect = grid.cell(3, 7);
        assert_relative_eq!(rect.position.x, 600.0);
        assert_relative_eq!(rect.position.y, 7.0 * 181.83);
        assert_eq!(rect.size, CELL);
        assert_eq!(grid.cell(0, 0).position, Point::default());
    }

    #[test]
    fn frame_draws_at_player_position() {
        let grid = SpriteGrid::new(CELL);
        let snapshot = Snapshot {
            position: Point { x: 12.5, y: 40.0 },
            animation_row: 6,
            frame_index: 2,
            max_frame: 8,
            state: PlayerStateId::RunningRight,
        };
        let (source, destination) = grid.frame_for(&snapshot);
        assert_relative_eq!(source.position.x, 400.0);
        assert_relative_eq!(source.position.y, 6.0 * 181.83);
        assert_eq!(destination.position, snapshot.position);
        assert_eq!(destination.size, CELL);
    }
}

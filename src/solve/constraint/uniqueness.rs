use super::Constraint;
use crate::collections::square::Coord;
use crate::collections::Square;
use crate::puzzle::Value;

/// No value may repeat within a row or column (the Latin square rule)
#[derive(Clone, Copy, Default)]
pub(crate) struct RowColUniqueness;

impl Constraint for RowColUniqueness {
    fn can_place(&self, grid: &Square<Value>, coord: Coord, value: Value) -> bool {
        let width = grid.width();
        for col in 0..width {
            if col != coord.col() && grid[Coord::new(col, coord.row())] == value {
                return false;
            }
        }
        for row in 0..width {
            if row != coord.row() && grid[Coord::new(coord.col(), row)] == value {
                return false;
            }
        }
        true
    }
}

/// No value may repeat within a box (the Sudoku rule)
#[derive(Clone, Copy)]
pub(crate) struct BoxUniqueness {
    box_rows: usize,
    box_cols: usize,
}

impl BoxUniqueness {
    pub fn new(box_rows: usize, box_cols: usize) -> Self {
        Self { box_rows, box_cols }
    }

    fn box_origin(&self, coord: Coord) -> Coord {
        Coord::new(
            coord.col() / self.box_cols * self.box_cols,
            coord.row() / self.box_rows * self.box_rows,
        )
    }
}

impl Constraint for BoxUniqueness {
    fn can_place(&self, grid: &Square<Value>, coord: Coord, value: Value) -> bool {
        let origin = self.box_origin(coord);
        for row in origin.row()..origin.row() + self.box_rows {
            for col in origin.col()..origin.col() + self.box_cols {
                let other = Coord::new(col, row);
                if other != coord && grid[other] == value {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{BoxUniqueness, Constraint, RowColUniqueness};
    use crate::collections::square::Coord;
    use crate::collections::Square;
    use crate::puzzle::UNFILLED;

    #[test]
    fn row_col_uniqueness() {
        let mut grid = Square::with_width_and_value(4, UNFILLED);
        grid[Coord::new(0, 1)] = 3;
        grid[Coord::new(2, 3)] = 2;
        let constraint = RowColUniqueness;
        // 3 is already in column 0
        assert!(!constraint.can_place(&grid, Coord::new(0, 2), 3));
        // 2 is already in row 3
        assert!(!constraint.can_place(&grid, Coord::new(0, 3), 2));
        assert!(constraint.can_place(&grid, Coord::new(0, 2), 2));
        // replacing a cell with its own value is fine
        assert!(constraint.can_place(&grid, Coord::new(0, 1), 3));
    }

    #[test]
    fn box_uniqueness() {
        let mut grid = Square::with_width_and_value(6, UNFILLED);
        grid[Coord::new(0, 0)] = 5;
        let constraint = BoxUniqueness::new(2, 3);
        assert!(!constraint.can_place(&grid, Coord::new(2, 1), 5));
        assert!(constraint.can_place(&grid, Coord::new(3, 1), 5));
        assert!(constraint.can_place(&grid, Coord::new(2, 2), 5));
    }
}

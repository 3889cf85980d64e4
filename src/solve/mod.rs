//! Backtracking search over constrained grids

pub use self::constraint::cage::evaluate_cage_complete;

pub(crate) mod constraint;

use crate::collections::square::Coord;
use crate::collections::Square;
use crate::killer::KillerPuzzle;
use crate::puzzle::{value_range, Cage, Operator, Puzzle, Solution, Value, UNFILLED};

use self::constraint::{
    BoxUniqueness, CageConstraint, ConstraintSet, KillerCageConstraint, RowColUniqueness,
};

/// Depth-first search over the empty cells of a grid in row-major
/// order, pruned by a per-cell candidate list and a constraint set
///
/// The solver never mutates the grid it is given; both entry points
/// work on a private clone.
pub struct Solver {
    constraints: ConstraintSet,
    candidates: Square<Vec<Value>>,
}

impl Solver {
    pub(crate) fn new(constraints: ConstraintSet, candidates: Square<Vec<Value>>) -> Self {
        Self {
            constraints,
            candidates,
        }
    }

    /// Solver for a KenKen puzzle
    pub fn for_puzzle(puzzle: &Puzzle) -> Self {
        Self::from_cages(puzzle.width(), puzzle.cages(), puzzle.flags().zero)
    }

    pub(crate) fn from_cages(width: usize, cages: &[Cage], zero_allowed: bool) -> Self {
        let mut constraints = ConstraintSet::new();
        constraints.push(RowColUniqueness);
        for cage in cages {
            constraints.push(CageConstraint::new(cage));
        }
        Self::new(constraints, kenken_candidates(width, zero_allowed, cages))
    }

    /// Solver for a Killer Sudoku puzzle
    pub fn for_killer(puzzle: &KillerPuzzle) -> Self {
        let mut constraints = ConstraintSet::new();
        constraints.push(RowColUniqueness);
        constraints.push(BoxUniqueness::new(puzzle.box_rows(), puzzle.box_cols()));
        for cage in puzzle.cages() {
            constraints.push(KillerCageConstraint::new(cage.cell_ids(), cage.sum()));
        }
        Self::new(constraints, full_candidates(puzzle.width()))
    }

    /// Finds the first solution reachable from `grid`, if any
    pub fn solve(&self, grid: &Square<Value>) -> Option<Solution> {
        let mut grid = grid.clone();
        if self.solve_recursive(&mut grid) {
            Some(grid)
        } else {
            None
        }
    }

    fn solve_recursive(&self, grid: &mut Square<Value>) -> bool {
        let coord = match first_empty_cell(grid) {
            None => return true,
            Some(coord) => coord,
        };
        let cell_id = grid.index_of(coord);
        for &value in &self.candidates[cell_id] {
            if self.constraints.can_place(grid, coord, value) {
                grid[coord] = value;
                if self.solve_recursive(grid) {
                    return true;
                }
                grid[coord] = UNFILLED;
            }
        }
        false
    }

    /// Counts solutions reachable from `grid`, giving up once the count
    /// exceeds `cap`
    ///
    /// The return value is exact while it is `<= cap`; a return of
    /// `cap + 1` means "more than cap". Callers checking uniqueness
    /// pass `cap = 2` and compare against 1.
    pub fn count_solutions(&self, grid: &Square<Value>, cap: usize) -> usize {
        let mut grid = grid.clone();
        let mut count = 0;
        self.count_recursive(&mut grid, cap, &mut count);
        count
    }

    fn count_recursive(&self, grid: &mut Square<Value>, cap: usize, count: &mut usize) {
        if *count > cap {
            return;
        }
        let coord = match first_empty_cell(grid) {
            None => {
                *count += 1;
                return;
            }
            Some(coord) => coord,
        };
        let cell_id = grid.index_of(coord);
        for &value in &self.candidates[cell_id] {
            if *count > cap {
                break;
            }
            if self.constraints.can_place(grid, coord, value) {
                grid[coord] = value;
                self.count_recursive(grid, cap, count);
                grid[coord] = UNFILLED;
            }
        }
    }
}

/// The first cell in row-major order with no value
fn first_empty_cell(grid: &Square<Value>) -> Option<Coord> {
    grid.iter()
        .position(|&value| value == UNFILLED)
        .map(|i| grid.coord_at(i))
}

/// Per-cell candidate values derived from the owning cage's operator
/// and target
fn kenken_candidates(width: usize, zero_allowed: bool, cages: &[Cage]) -> Square<Vec<Value>> {
    let mut candidates: Square<Vec<Value>> = Square::with_width(width);
    for cage in cages {
        let values = cage_candidates(width, zero_allowed, cage.operator(), cage.target());
        for &cell_id in cage.cell_ids() {
            candidates[cell_id] = values.clone();
        }
    }
    candidates
}

fn full_candidates(width: usize) -> Square<Vec<Value>> {
    let values: Vec<Value> = value_range(width, false).collect();
    Square::with_width_and_value(width, values)
}

/// The values a cell could hold, judged by its cage alone
pub(crate) fn cage_candidates(
    width: usize,
    zero_allowed: bool,
    operator: Operator,
    target: Value,
) -> Vec<Value> {
    let max_value = width as Value;
    value_range(width, zero_allowed)
        .filter(|&v| match operator {
            Operator::Multiply => {
                (target == 0 && v == 0) || (target != 0 && v != 0 && target % v == 0)
            }
            Operator::Divide => {
                v != 0 && (v * target <= max_value || (target != 0 && v % target == 0))
            }
            Operator::Gcd => v != 0 && target != 0 && v % target == 0,
            Operator::Lcm => v != 0 && target % v == 0,
            Operator::Modulo => v != 0 && v > target,
            Operator::Add | Operator::Subtract | Operator::Hide => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{cage_candidates, ConstraintSet, RowColUniqueness, Solver};
    use crate::collections::Square;
    use crate::puzzle::{value_range, Operator, UNFILLED};

    fn latin_solver(width: usize) -> Solver {
        let mut constraints = ConstraintSet::new();
        constraints.push(RowColUniqueness);
        let values: Vec<_> = value_range(width, false).collect();
        Solver::new(constraints, Square::with_width_and_value(width, values))
    }

    #[test]
    fn counts_all_order_3_latin_squares() {
        let grid = Square::with_width_and_value(3, UNFILLED);
        assert_eq!(12, latin_solver(3).count_solutions(&grid, 100));
    }

    #[test]
    fn count_stops_just_past_cap() {
        let grid = Square::with_width_and_value(3, UNFILLED);
        assert_eq!(3, latin_solver(3).count_solutions(&grid, 2));
    }

    #[test]
    fn solve_leaves_input_untouched() {
        let grid = Square::with_width_and_value(3, UNFILLED);
        let solution = latin_solver(3).solve(&grid).unwrap();
        assert!(grid.iter().all(|&v| v == UNFILLED));
        assert!(solution.iter().all(|&v| (1..=3).contains(&v)));
    }

    #[test]
    fn multiply_candidates_divide_target() {
        assert_eq!(vec![1, 2, 3, 6], cage_candidates(6, false, Operator::Multiply, 6));
    }

    #[test]
    fn modulo_candidates_exceed_target() {
        assert_eq!(vec![3, 4, 5, 6], cage_candidates(6, false, Operator::Modulo, 2));
    }
}

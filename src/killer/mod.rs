//! Killer Sudoku puzzles
//!
//! The Sudoku cousin of the KenKen generator: box uniqueness on top of
//! the Latin square rule, and every cage is a sum with no repeated
//! values inside it.

pub use self::id::{decode, encode};

mod id;

use std::fmt;
use std::fmt::Display;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::collections::Square;
use crate::error::UnsupportedGridSize;
use crate::generate::grow_cages;
use crate::puzzle::{CageId, CellId, Difficulty, Solution, Value, UNFILLED};
use crate::solve::constraint::{BoxUniqueness, Constraint, RowColUniqueness};
use crate::solve::Solver;

/// Cage size distributions per difficulty; see the KenKen tables for
/// the weighting scheme
const KILLER_CAGE_SIZES: [&[usize]; 3] = [
    &[1, 2, 2, 2, 2, 3, 3, 3],
    &[2, 2, 2, 3, 3, 3, 4],
    &[2, 2, 3, 3, 3, 4, 4, 5],
];

/// The box shape for each supported grid size
pub fn box_config(width: usize) -> Result<(usize, usize), UnsupportedGridSize> {
    let config = match width {
        4 => (2, 2),
        6 => (2, 3),
        9 => (3, 3),
        12 => (3, 4),
        _ => return Err(UnsupportedGridSize(width)),
    };
    Ok(config)
}

/// A cage in a Killer Sudoku puzzle: its values must be distinct and
/// sum to `sum`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KillerCage {
    id: CageId,
    cell_ids: Vec<CellId>,
    sum: Value,
}

impl KillerCage {
    pub fn new(id: CageId, cell_ids: impl Into<Vec<CellId>>, sum: Value) -> Self {
        let mut cell_ids = cell_ids.into();
        debug_assert!(!cell_ids.is_empty());
        cell_ids.sort_unstable();
        Self { id, cell_ids, sum }
    }

    pub fn id(&self) -> CageId {
        self.id
    }

    pub fn cell_ids(&self) -> &[CellId] {
        &self.cell_ids
    }

    pub fn sum(&self) -> Value {
        self.sum
    }
}

/// A generated or decoded Killer Sudoku puzzle
#[derive(Clone, Debug)]
pub struct KillerPuzzle {
    width: usize,
    box_rows: usize,
    box_cols: usize,
    cages: Vec<KillerCage>,
    cage_map: Square<CageId>,
    solution: Solution,
    difficulty: Difficulty,
}

impl KillerPuzzle {
    pub(crate) fn new(
        width: usize,
        cages: Vec<KillerCage>,
        solution: Solution,
        difficulty: Difficulty,
    ) -> Result<Self, UnsupportedGridSize> {
        let (box_rows, box_cols) = box_config(width)?;
        let mut cage_map = Square::with_width_and_value(width, 0);
        for cage in &cages {
            for &cell_id in cage.cell_ids() {
                cage_map[cell_id] = cage.id();
            }
        }
        Ok(Self {
            width,
            box_rows,
            box_cols,
            cages,
            cage_map,
            solution,
            difficulty,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn box_rows(&self) -> usize {
        self.box_rows
    }

    pub fn box_cols(&self) -> usize {
        self.box_cols
    }

    pub fn cages(&self) -> &[KillerCage] {
        &self.cages
    }

    pub fn cage_map(&self) -> &Square<CageId> {
        &self.cage_map
    }

    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

/// Generates a Killer Sudoku puzzle with exactly one solution
///
/// `Ok(None)` means no valid puzzle was found within `max_attempts`;
/// an unsupported width fails immediately.
pub fn generate_puzzle(
    width: usize,
    difficulty: Difficulty,
    max_attempts: u32,
    rng: &mut impl Rng,
) -> Result<Option<KillerPuzzle>, UnsupportedGridSize> {
    let (box_rows, box_cols) = box_config(width)?;
    for attempt in 1..=max_attempts {
        let solution = match sudoku_grid(width, box_rows, box_cols, rng) {
            None => continue,
            Some(solution) => solution,
        };
        let cage_cells = grow_cages(
            width,
            KILLER_CAGE_SIZES[difficulty.index()],
            Some(&solution),
            rng,
        );
        let cages: Vec<KillerCage> = cage_cells
            .into_iter()
            .enumerate()
            .map(|(id, cells)| {
                let sum = cells.iter().map(|&i| solution[i]).sum();
                KillerCage::new(id, cells, sum)
            })
            .collect();
        if !cages
            .iter()
            .all(|cage| sum_achievable(width, cage.sum(), cage.cell_ids().len()))
        {
            debug!("attempt {}: unachievable cage sum", attempt);
            continue;
        }
        let puzzle = KillerPuzzle::new(width, cages, solution, difficulty)?;
        let empty = Square::with_width_and_value(width, UNFILLED);
        let count = Solver::for_killer(&puzzle).count_solutions(&empty, 2);
        if count != 1 {
            debug!("attempt {}: {} solutions", attempt, count);
            continue;
        }
        info!("killer puzzle generated in {} attempts", attempt);
        return Ok(Some(puzzle));
    }
    info!(
        "failed to generate a killer puzzle after {} attempts",
        max_attempts
    );
    Ok(None)
}

/// A filled Sudoku grid produced by randomized backtracking
fn sudoku_grid(
    width: usize,
    box_rows: usize,
    box_cols: usize,
    rng: &mut impl Rng,
) -> Option<Solution> {
    let row_col = RowColUniqueness;
    let boxes = BoxUniqueness::new(box_rows, box_cols);
    let mut grid = Square::with_width_and_value(width, UNFILLED);
    let values: Vec<Value> = (1..=width as Value).collect();
    if fill_cell(&mut grid, 0, &row_col, &boxes, &values, rng) {
        Some(grid)
    } else {
        None
    }
}

fn fill_cell(
    grid: &mut Square<Value>,
    cell_id: CellId,
    row_col: &RowColUniqueness,
    boxes: &BoxUniqueness,
    values: &[Value],
    rng: &mut impl Rng,
) -> bool {
    if cell_id == grid.len() {
        return true;
    }
    let coord = grid.coord_at(cell_id);
    let mut shuffled = values.to_vec();
    shuffled.shuffle(rng);
    for value in shuffled {
        if row_col.can_place(grid, coord, value) && boxes.can_place(grid, coord, value) {
            grid[coord] = value;
            if fill_cell(grid, cell_id + 1, row_col, boxes, values, rng) {
                return true;
            }
            grid[coord] = UNFILLED;
        }
    }
    false
}

/// Whether `cage_size` distinct values in `1..=width` can sum to
/// `target`
pub(crate) fn sum_achievable(width: usize, target: Value, cage_size: usize) -> bool {
    if cage_size > width {
        return false;
    }
    let k = cage_size as Value;
    let n = width as Value;
    let min = k * (k + 1) / 2;
    let max = k * (2 * n - k + 1) / 2;
    target >= min && target <= max
}

impl Display for KillerPuzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({}x{} boxes)", self.width, self.box_rows, self.box_cols)?;
        for row in self.cage_map.rows() {
            for &cage_id in row {
                write!(f, "{}", (b'A' + cage_id as u8) as char)?;
            }
            writeln!(f)?;
        }
        for cage in &self.cages {
            writeln!(f, "{}", cage.sum())?;
        }
        Ok(())
    }
}

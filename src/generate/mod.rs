//! Puzzle generation

pub(crate) use self::cages::grow_cages;

pub use self::cages::generate_cages;

mod cages;
mod operators;

use std::convert::TryFrom;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::collections::Square;
use crate::puzzle::{
    Cage, Difficulty, HiddenClue, Operator, Puzzle, Solution, SpecialFlags, Value, UNFILLED,
};
use crate::solve::Solver;

use self::operators::assign_operators;

/// Default bound on generation retries
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Generates a puzzle with exactly one solution, or `None` if no valid
/// puzzle was found within `max_attempts`
///
/// Running out of attempts is an expected outcome on unlucky
/// flag/size combinations, not an error; the caller decides whether
/// to retry or report failure.
pub fn generate_puzzle(
    width: usize,
    difficulty: Difficulty,
    flags: SpecialFlags,
    max_attempts: u32,
    rng: &mut impl Rng,
) -> Option<Puzzle> {
    for attempt in 1..=max_attempts {
        let solution = latin_square(width, flags.zero, rng);
        let cage_cells = generate_cages(width, difficulty, rng);
        if flags.hidden && !has_interior_singleton(width, &cage_cells) {
            debug!("attempt {}: no interior singleton cage", attempt);
            continue;
        }
        let assigned = assign_operators(&solution, cage_cells, flags, rng);
        if flags.requires_special() && !assigned.has_special {
            debug!("attempt {}: no special operator cage", attempt);
            continue;
        }
        let solver = Solver::from_cages(width, &assigned.cages, flags.zero);
        let count = solver.count_solutions(&starting_grid(width, &assigned.cages), 2);
        if count != 1 {
            debug!("attempt {}: {} solutions", attempt, count);
            continue;
        }
        if let Some(hidden) = assigned.hidden {
            if !hidden_clue_is_forced(width, &assigned.cages, hidden, flags.zero) {
                debug!("attempt {}: hidden clue not uniquely inferable", attempt);
                continue;
            }
        }
        info!("puzzle generated in {} attempts", attempt);
        return Some(Puzzle::new(
            width,
            assigned.cages,
            solution,
            difficulty,
            flags,
            assigned.hidden,
        ));
    }
    info!("failed to generate a puzzle after {} attempts", max_attempts);
    None
}

/// A Latin square with a shuffled layout
///
/// Builds the cyclic square `((i + j) mod n) + 1`, shuffles the rows,
/// transposes, and shuffles the rows again. This decorrelates the
/// cyclic pattern well enough for puzzle use but does not sample
/// uniformly from all Latin squares; every output is a row/column
/// permutation of the one cyclic square.
pub fn latin_square(width: usize, zero_allowed: bool, rng: &mut impl Rng) -> Solution {
    let mut rows: Vec<Vec<Value>> = (0..width)
        .map(|i| {
            (0..width)
                .map(|j| ((i + j) % width) as Value + 1)
                .collect()
        })
        .collect();
    rows.shuffle(rng);
    let mut transposed: Vec<Vec<Value>> = (0..width)
        .map(|j| (0..width).map(|i| rows[i][j]).collect())
        .collect();
    transposed.shuffle(rng);
    let shift = if zero_allowed { 1 } else { 0 };
    let elements = transposed
        .into_iter()
        .flatten()
        .map(|value| value - shift)
        .collect::<Vec<_>>();
    Square::try_from(elements).unwrap()
}

/// The grid the uniqueness check starts from: every singleton cage
/// pre-filled, except a hidden one
pub(crate) fn starting_grid(width: usize, cages: &[Cage]) -> Square<Value> {
    let mut grid = Square::with_width_and_value(width, UNFILLED);
    for cage in cages {
        if cage.is_singleton() && cage.operator() != Operator::Hide {
            grid[cage.cell_ids()[0]] = cage.target();
        }
    }
    grid
}

fn has_interior_singleton(width: usize, cage_cells: &[Vec<usize>]) -> bool {
    cage_cells.iter().any(|cells| {
        if cells.len() != 1 {
            return false;
        }
        let (col, row) = (cells[0] % width, cells[0] / width);
        col != 0 && col != width - 1 && row != 0 && row != width - 1
    })
}

/// Whether the non-hidden clues pin down the hidden cell on their own:
/// exactly one legal value, substituted as the hidden cage's target,
/// may leave the grid solvable
fn hidden_clue_is_forced(
    width: usize,
    cages: &[Cage],
    hidden: HiddenClue,
    zero_allowed: bool,
) -> bool {
    let mut solvable = 0;
    for test_value in crate::puzzle::value_range(width, zero_allowed) {
        let test_cages: Vec<Cage> = cages
            .iter()
            .map(|cage| {
                if cage.id() == hidden.cage_id {
                    cage.with_target(test_value)
                } else {
                    cage.clone()
                }
            })
            .collect();
        let solver = Solver::from_cages(width, &test_cages, zero_allowed);
        let mut grid = starting_grid(width, &test_cages);
        // the hidden cell itself is pinned to the value under test
        grid[test_cages[hidden.cage_id].cell_ids()[0]] = test_value;
        if solver.count_solutions(&grid, 1) >= 1 {
            solvable += 1;
            if solvable > 1 {
                return false;
            }
        }
    }
    solvable == 1
}

/// A calendar date identifying a daily puzzle
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PuzzleDate {
    pub year: u32,
    pub month: u32,
    pub day: u32,
}

impl PuzzleDate {
    pub fn new(year: u32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    fn seed(self) -> u64 {
        u64::from(self.year) * 10_000 + u64::from(self.month) * 100 + u64::from(self.day)
    }
}

/// Generates the daily puzzle for a date
///
/// The grid size (6-8), difficulty and the hidden-cage requirement all
/// derive deterministically from the date, as does the generation RNG,
/// so every caller gets the same puzzle for the same date.
pub fn generate_daily_puzzle(date: PuzzleDate) -> Option<Puzzle> {
    let mut rng = StdRng::seed_from_u64(date.seed());
    let x: u64 = rng.gen_range(0, 1000);
    let width = (x % 3 + 6) as usize;
    let difficulty = match rng.gen_range(0, 3) {
        0 => Difficulty::Easy,
        1 => Difficulty::Medium,
        _ => Difficulty::Hard,
    };
    let flags = SpecialFlags {
        hidden: x % 5 == 0,
        ..SpecialFlags::default()
    };
    generate_puzzle(width, difficulty, flags, DEFAULT_MAX_ATTEMPTS, &mut rng)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{generate_puzzle, hidden_clue_is_forced, latin_square, DEFAULT_MAX_ATTEMPTS};
    use crate::puzzle::{Difficulty, SpecialFlags, Value};
    use crate::solve::Solver;

    #[test]
    fn hidden_clue_pins_exactly_one_value() {
        let flags = SpecialFlags {
            hidden: true,
            ..SpecialFlags::default()
        };
        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let puzzle =
                match generate_puzzle(5, Difficulty::Easy, flags, DEFAULT_MAX_ATTEMPTS, &mut rng) {
                    None => continue,
                    Some(puzzle) => puzzle,
                };
            let hidden = puzzle.hidden().unwrap();
            assert!(hidden_clue_is_forced(5, puzzle.cages(), hidden, false));
            return;
        }
        panic!("no hidden puzzle generated across 5 seeds");
    }

    #[test]
    fn generated_puzzle_solves_to_its_own_solution() {
        let mut rng = StdRng::seed_from_u64(42);
        let puzzle = generate_puzzle(
            4,
            Difficulty::Easy,
            SpecialFlags::default(),
            DEFAULT_MAX_ATTEMPTS,
            &mut rng,
        )
        .expect("no 4x4 puzzle in 100 attempts");
        let solver = Solver::for_puzzle(&puzzle);
        assert_eq!(1, solver.count_solutions(&puzzle.starting_grid(), 2));
        assert_eq!(
            puzzle.solution(),
            &solver.solve(&puzzle.starting_grid()).unwrap()
        );
    }

    #[test]
    fn latin_square_rows_and_cols_are_permutations() {
        let mut rng = StdRng::seed_from_u64(2);
        for &width in &[1, 2, 5, 9] {
            let square = latin_square(width, false, &mut rng);
            let expected: Vec<Value> = (1..=width as Value).collect();
            for row in square.rows() {
                let mut row = row.to_vec();
                row.sort_unstable();
                assert_eq!(expected, row);
            }
            let transposed = square.transpose();
            for col in transposed.rows() {
                let mut col = col.to_vec();
                col.sort_unstable();
                assert_eq!(expected, col);
            }
        }
    }

    #[test]
    fn latin_square_zero_mode_shifts_range() {
        let mut rng = StdRng::seed_from_u64(2);
        let square = latin_square(4, true, &mut rng);
        assert!(square.iter().all(|&v| (0..4).contains(&v)));
    }
}

//! KenKen puzzles with extended operators

pub use self::cage::{Cage, Operator};

pub mod id;

mod cage;

use std::fmt;
use std::fmt::Display;
use std::ops::RangeInclusive;

use itertools::Itertools;

use crate::collections::square::Coord;
use crate::collections::Square;
use crate::solve::evaluate_cage_complete;

pub type CageId = usize;
pub type CellId = usize;
pub type Value = i32;
pub type Solution = Square<Value>;

/// Marker for a cell with no value
pub const UNFILLED: Value = -1;

/// Puzzle difficulty tier, controls the cage size distribution
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn index(self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        let difficulty = match index {
            0 => Difficulty::Easy,
            1 => Difficulty::Medium,
            2 => Difficulty::Hard,
            _ => return None,
        };
        Some(difficulty)
    }
}

/// Which optional puzzle features are enabled
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SpecialFlags {
    /// Allow `%` cages
    pub modulo: bool,
    /// Allow `gcd` cages
    pub gcd: bool,
    /// Allow `lcm` cages
    pub lcm: bool,
    /// Values range over `0..=n-1` instead of `1..=n`
    pub zero: bool,
    /// Require one hidden-clue cage
    pub hidden: bool,
}

impl SpecialFlags {
    /// Whether generation must produce at least one special-operator cage
    pub fn requires_special(self) -> bool {
        self.modulo || self.gcd || self.lcm
    }

    pub(crate) fn word(self) -> usize {
        (self.modulo as usize) * 16
            + (self.gcd as usize) * 8
            + (self.lcm as usize) * 4
            + (self.zero as usize) * 2
            + self.hidden as usize
    }

    pub(crate) fn from_word(word: usize) -> Self {
        Self {
            modulo: word & 16 != 0,
            gcd: word & 8 != 0,
            lcm: word & 4 != 0,
            zero: word & 2 != 0,
            hidden: word & 1 != 0,
        }
    }
}

/// The hidden-clue cage of a puzzle and the value it conceals
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HiddenClue {
    pub cage_id: CageId,
    pub value: Value,
}

/// The legal cell values for a grid of the given width
pub fn value_range(width: usize, zero_allowed: bool) -> RangeInclusive<Value> {
    if zero_allowed {
        0..=width as Value - 1
    } else {
        1..=width as Value
    }
}

/// A generated or decoded puzzle, immutable once built
#[derive(Clone, Debug)]
pub struct Puzzle {
    width: usize,
    cages: Vec<Cage>,
    cage_map: Square<CageId>,
    solution: Solution,
    difficulty: Difficulty,
    flags: SpecialFlags,
    hidden: Option<HiddenClue>,
}

impl Puzzle {
    pub(crate) fn new(
        width: usize,
        cages: Vec<Cage>,
        solution: Solution,
        difficulty: Difficulty,
        flags: SpecialFlags,
        hidden: Option<HiddenClue>,
    ) -> Self {
        let cage_map = cage_map(width, &cages);
        Self {
            width,
            cages,
            cage_map,
            solution,
            difficulty,
            flags,
            hidden,
        }
    }

    /// The width and height of the puzzle
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn cages(&self) -> &[Cage] {
        &self.cages
    }

    pub fn cage(&self, id: CageId) -> &Cage {
        &self.cages[id]
    }

    /// The cage containing the given cell
    pub fn cage_at(&self, coord: Coord) -> &Cage {
        &self.cages[self.cage_map[coord]]
    }

    /// Maps each cell to the ID of the cage containing it
    pub fn cage_map(&self) -> &Square<CageId> {
        &self.cage_map
    }

    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn flags(&self) -> SpecialFlags {
        self.flags
    }

    pub fn hidden(&self) -> Option<HiddenClue> {
        self.hidden
    }

    /// The legal cell values for this puzzle
    pub fn value_range(&self) -> RangeInclusive<Value> {
        value_range(self.width, self.flags.zero)
    }

    /// The grid a player starts from: singleton cages pre-filled with
    /// their targets, except the hidden cage
    pub fn starting_grid(&self) -> Square<Value> {
        crate::generate::starting_grid(self.width, &self.cages)
    }

    /// Checks that a grid is a valid solution to this puzzle
    pub fn verify_solution(&self, solution: &Solution) -> bool {
        if solution.width() != self.width {
            return false;
        }
        let range = self.value_range();
        let rows_ok = solution.rows().all(|row| values_distinct(row, &range));
        let transposed = solution.transpose();
        let cols_ok = transposed.rows().all(|col| values_distinct(col, &range));
        let cages_ok = self.cages.iter().all(|cage| {
            let values: Vec<Value> = cage.cell_ids().iter().map(|&i| solution[i]).collect();
            evaluate_cage_complete(&values, cage.operator(), cage.target())
        });
        rows_ok && cols_ok && cages_ok
    }
}

fn values_distinct(values: &[Value], range: &RangeInclusive<Value>) -> bool {
    values.iter().all(|v| range.contains(v))
        && values.iter().sorted().tuple_windows().all(|(a, b)| a != b)
}

/// Create a square of values where each value is the ID of the cage
/// containing that position
pub(crate) fn cage_map(width: usize, cages: &[Cage]) -> Square<CageId> {
    let mut cage_map = Square::with_width_and_value(width, 0);
    for cage in cages {
        for &cell_id in cage.cell_ids() {
            cage_map[cell_id] = cage.id();
        }
    }
    cage_map
}

impl Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.width)?;
        for row in self.cage_map.rows() {
            for &cage_id in row {
                write!(f, "{}", (b'A' + cage_id as u8) as char)?;
            }
            writeln!(f)?;
        }
        for cage in &self.cages {
            match cage.operator() {
                Operator::Hide => writeln!(f, "?")?,
                operator => {
                    writeln!(f, "{}{}", cage.target(), operator.symbol().unwrap())?
                }
            }
        }
        Ok(())
    }
}

//! Shareable Killer Sudoku IDs
//!
//! Same scheme as the KenKen IDs minus the operator section: the
//! header is two characters (width and difficulty, no flag word) and
//! every cage record carries only a sum, all in the header alphabet.

use vec_map::VecMap;

use crate::collections::Square;
use crate::error::{DecodeError, DecodeErrorKind, KillerIdError};
use crate::killer::{KillerCage, KillerPuzzle};
use crate::puzzle::id::{
    char_index, combine_target, decode_cage_grid, decode_target_high, set_char, CHAR_SET,
};
use crate::puzzle::{Difficulty, Value, UNFILLED};
use crate::solve::Solver;

const BASE: usize = 53;

/// Encodes a Killer Sudoku puzzle as its shareable ID
///
/// # Panics
///
/// Panics if the puzzle's width or cage count exceeds the alphabet
/// length (53).
pub fn encode(puzzle: &KillerPuzzle) -> String {
    assert!(puzzle.width() < CHAR_SET.len());
    assert!(puzzle.cages().len() <= CHAR_SET.len());
    let mut id = String::new();
    id.push(set_char(CHAR_SET, puzzle.width()));
    id.push(set_char(CHAR_SET, puzzle.difficulty().index()));
    id.push('-');
    for &cage_id in puzzle.cage_map().iter() {
        id.push(set_char(CHAR_SET, cage_id));
    }
    id.push('-');
    for cage in puzzle.cages() {
        id.push(set_char(CHAR_SET, cage.id()));
        let sum = cage.sum() as usize;
        id.push(set_char(CHAR_SET, sum % BASE));
        id.push_str(&(sum / BASE).to_string());
        id.push('*');
    }
    id
}

/// Decodes a Killer Sudoku ID, re-deriving the solution
pub fn decode(id: &str) -> Result<KillerPuzzle, KillerIdError> {
    const INVALID_HEADER: DecodeError = DecodeError::from_kind(DecodeErrorKind::InvalidHeader);

    let mut parts = id.splitn(3, '-');
    let (header, grid_part, sums_part) = match (parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(grid), Some(sums)) => (header, grid, sums),
        _ => return Err(INVALID_HEADER.into()),
    };

    let header_chars: Vec<char> = header.chars().collect();
    if header_chars.len() != 2 {
        return Err(INVALID_HEADER.into());
    }
    let width = char_index(CHAR_SET, header_chars[0])
        .ok_or_else(|| DecodeError::new(DecodeErrorKind::InvalidHeader, header_chars[0], 0))?;
    let difficulty_index = char_index(CHAR_SET, header_chars[1])
        .ok_or_else(|| DecodeError::new(DecodeErrorKind::InvalidHeader, header_chars[1], 1))?;
    let difficulty = Difficulty::from_index(difficulty_index).ok_or(INVALID_HEADER)?;

    let cage_cells = decode_cage_grid(grid_part, width)?;
    let sums = decode_sum_records(sums_part)?;

    let mut cages = Vec::with_capacity(cage_cells.len());
    for (new_id, (&raw_id, cells)) in cage_cells.iter().enumerate() {
        let &sum = sums
            .get(raw_id)
            .ok_or_else(|| DecodeError::from_kind(DecodeErrorKind::InvalidOperatorRecord))?;
        cages.push(KillerCage::new(new_id, cells.clone(), sum));
    }

    let empty = Square::with_width_and_value(width, UNFILLED);
    // KillerPuzzle::new performs the box-config lookup
    let mut puzzle = KillerPuzzle::new(width, cages, empty.clone(), difficulty)?;
    let solution = Solver::for_killer(&puzzle)
        .solve(&empty)
        .ok_or_else(|| DecodeError::from_kind(DecodeErrorKind::Unsolvable))?;
    puzzle.solution = solution;
    Ok(puzzle)
}

/// Cage sums keyed by raw cage ID
fn decode_sum_records(sums_part: &str) -> Result<VecMap<Value>, DecodeError> {
    let mut sums = VecMap::new();
    for record in sums_part.split('*').filter(|s| !s.is_empty()) {
        let chars: Vec<char> = record.chars().collect();
        if chars.len() < 2 {
            return Err(DecodeError::from_kind(
                DecodeErrorKind::InvalidOperatorRecord,
            ));
        }
        let invalid =
            |c: char, i: usize| DecodeError::new(DecodeErrorKind::InvalidOperatorRecord, c, i);
        let raw_id = char_index(CHAR_SET, chars[0]).ok_or_else(|| invalid(chars[0], 0))?;
        let low = char_index(CHAR_SET, chars[1]).ok_or_else(|| invalid(chars[1], 1))?;
        let high = decode_target_high(&chars[2..])?;
        let sum = combine_target(high, low)?;
        if sums.insert(raw_id, sum).is_some() {
            return Err(invalid(chars[0], 0));
        }
    }
    Ok(sums)
}

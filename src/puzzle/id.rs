//! Shareable puzzle IDs
//!
//! A puzzle ID is a printable string `<header>-<cagegrid>-<cageops>`
//! describing the cage layout and clues of a puzzle, but never its
//! solution; [`decode`] re-derives the solution with the solver. The
//! two 53-character alphabets are fixed and must not change, or
//! previously shared IDs stop resolving.

use std::collections::VecDeque;

use once_cell::sync::Lazy;
use vec_map::VecMap;

use crate::collections::Square;
use crate::error::{DecodeError, DecodeErrorKind};
use crate::puzzle::{
    Cage, CellId, Difficulty, HiddenClue, Operator, Puzzle, SpecialFlags, Value, UNFILLED,
};
use crate::solve::Solver;
use crate::{HashMap, LinkedHashMap};

/// Alphabet for the header and the cage grid section
pub(crate) const CHAR_SET: &str = "ugMyQszjSnLoDBfVOPrTNvYEJmKbRixItceClXqkAFUHdGwZahpW";

/// Alphabet for cage IDs and targets in the operator section
pub(crate) const OP_CHAR_SET: &str = "PprTndbsGOWQCgxUkFfqEMDXLwHuvmVihcjyIztBRKNAoSZaeYlJ";

const BASE: usize = 53;

const OPERATORS: [Operator; 8] = [
    Operator::Add,
    Operator::Subtract,
    Operator::Multiply,
    Operator::Divide,
    Operator::Modulo,
    Operator::Gcd,
    Operator::Lcm,
    Operator::Hide,
];

fn operator_char(operator: Operator) -> char {
    match operator {
        Operator::Add => 'q',
        Operator::Multiply => 'p',
        Operator::Subtract => 'G',
        Operator::Divide => 'e',
        Operator::Gcd => 'k',
        Operator::Lcm => 'Z',
        Operator::Modulo => 'W',
        Operator::Hide => 'h',
    }
}

static CHAR_TO_OPERATOR: Lazy<HashMap<char, Operator>> = Lazy::new(|| {
    OPERATORS
        .iter()
        .map(|&operator| (operator_char(operator), operator))
        .collect()
});

pub(crate) fn set_char(set: &str, index: usize) -> char {
    set.as_bytes()[index] as char
}

// both alphabets are pure ASCII, so byte offset == char offset
pub(crate) fn char_index(set: &str, c: char) -> Option<usize> {
    set.find(c)
}

/// Encodes a puzzle as its shareable ID
///
/// # Panics
///
/// Panics if the puzzle's width or cage count exceeds the alphabet
/// length (53).
pub fn encode(puzzle: &Puzzle) -> String {
    assert!(puzzle.width() < CHAR_SET.len());
    assert!(puzzle.cages().len() <= CHAR_SET.len());
    let mut id = String::new();
    id.push(set_char(CHAR_SET, puzzle.width()));
    id.push(set_char(CHAR_SET, puzzle.difficulty().index()));
    id.push(set_char(CHAR_SET, puzzle.flags().word()));
    id.push('-');
    for &cage_id in puzzle.cage_map().iter() {
        id.push(set_char(CHAR_SET, cage_id));
    }
    id.push('-');
    for cage in puzzle.cages() {
        id.push(set_char(OP_CHAR_SET, cage.id()));
        id.push(operator_char(cage.operator()));
        let target = cage.target() as usize;
        id.push(set_char(OP_CHAR_SET, target % BASE));
        id.push_str(&(target / BASE).to_string());
        id.push('*');
    }
    id
}

/// Decodes a puzzle ID, re-deriving the solution
///
/// Cage IDs are renumbered to their order of first appearance in the
/// grid section; the cage cell-sets, operators and targets are
/// preserved exactly.
pub fn decode(id: &str) -> Result<Puzzle, DecodeError> {
    const INVALID_HEADER: DecodeError = DecodeError::from_kind(DecodeErrorKind::InvalidHeader);

    let mut parts = id.splitn(3, '-');
    let (header, grid_part, ops_part) = match (parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(grid), Some(ops)) => (header, grid, ops),
        _ => return Err(INVALID_HEADER),
    };

    let mut header_chars: VecDeque<char> = header.chars().collect();
    if header_chars.len() != 3 {
        return Err(INVALID_HEADER);
    }
    let width = decode_header_char(header_chars.pop_front().unwrap(), 0)?;
    if width == 0 {
        return Err(INVALID_HEADER);
    }
    let difficulty_index = decode_header_char(header_chars.pop_front().unwrap(), 1)?;
    let difficulty = Difficulty::from_index(difficulty_index).ok_or(INVALID_HEADER)?;
    let flag_char = header_chars.pop_front().unwrap();
    let flag_word = decode_header_char(flag_char, 2)?;
    if flag_word >= 32 {
        return Err(DecodeError::new(DecodeErrorKind::InvalidHeader, flag_char, 2));
    }
    let flags = SpecialFlags::from_word(flag_word);

    let cage_cells = decode_cage_grid(grid_part, width)?;
    let records = decode_operator_records(ops_part)?;

    let mut cages = Vec::with_capacity(cage_cells.len());
    let mut hidden = None;
    for (new_id, (&raw_id, cells)) in cage_cells.iter().enumerate() {
        let &(operator, target) = records
            .get(raw_id)
            .ok_or_else(|| DecodeError::from_kind(DecodeErrorKind::InvalidOperatorRecord))?;
        if operator == Operator::Hide {
            hidden = Some(HiddenClue {
                cage_id: new_id,
                value: target,
            });
        }
        cages.push(Cage::new(new_id, cells.clone(), operator, target));
    }

    // the ID stores only the cage description; recover the solution by
    // solving from the singleton-prefilled grid
    let solver = Solver::from_cages(width, &cages, flags.zero);
    let mut grid = Square::with_width_and_value(width, UNFILLED);
    for cage in &cages {
        if cage.is_singleton() {
            grid[cage.cell_ids()[0]] = cage.target();
        }
    }
    let solution = solver
        .solve(&grid)
        .ok_or_else(|| DecodeError::from_kind(DecodeErrorKind::Unsolvable))?;

    Ok(Puzzle::new(width, cages, solution, difficulty, flags, hidden))
}

fn decode_header_char(c: char, index: usize) -> Result<usize, DecodeError> {
    char_index(CHAR_SET, c).ok_or_else(|| DecodeError::new(DecodeErrorKind::InvalidHeader, c, index))
}

/// Cage cells keyed by raw cage ID, in order of first appearance
pub(crate) fn decode_cage_grid(
    grid_part: &str,
    width: usize,
) -> Result<LinkedHashMap<usize, Vec<CellId>>, DecodeError> {
    let mut cage_cells: LinkedHashMap<usize, Vec<CellId>> = LinkedHashMap::default();
    let mut cell_count = 0;
    for (cell_id, c) in grid_part.chars().enumerate() {
        let raw_id = char_index(CHAR_SET, c)
            .ok_or_else(|| DecodeError::new(DecodeErrorKind::InvalidCageGrid, c, cell_id))?;
        cage_cells
            .entry(raw_id)
            .or_insert_with(Vec::new)
            .push(cell_id);
        cell_count += 1;
    }
    if cell_count != width.pow(2) {
        return Err(DecodeError::from_kind(DecodeErrorKind::InvalidCageGrid));
    }
    Ok(cage_cells)
}

/// `(operator, target)` keyed by raw cage ID
fn decode_operator_records(ops_part: &str) -> Result<VecMap<(Operator, Value)>, DecodeError> {
    let mut records = VecMap::new();
    for record in ops_part.split('*').filter(|s| !s.is_empty()) {
        let chars: Vec<char> = record.chars().collect();
        if chars.len() < 3 {
            return Err(DecodeError::from_kind(
                DecodeErrorKind::InvalidOperatorRecord,
            ));
        }
        let invalid = |c: char, i: usize| DecodeError::new(DecodeErrorKind::InvalidOperatorRecord, c, i);
        let raw_id = char_index(OP_CHAR_SET, chars[0]).ok_or_else(|| invalid(chars[0], 0))?;
        let operator = *CHAR_TO_OPERATOR
            .get(&chars[1])
            .ok_or_else(|| invalid(chars[1], 1))?;
        let low = char_index(OP_CHAR_SET, chars[2]).ok_or_else(|| invalid(chars[2], 2))?;
        let high = decode_target_high(&chars[3..])?;
        let target = combine_target(high, low)?;
        if records.insert(raw_id, (operator, target)).is_some() {
            return Err(invalid(chars[0], 0));
        }
    }
    Ok(records)
}

/// The decimal high part of a target; absent digits mean zero
pub(crate) fn decode_target_high(digits: &[char]) -> Result<usize, DecodeError> {
    if digits.is_empty() {
        return Ok(0);
    }
    digits
        .iter()
        .collect::<String>()
        .parse()
        .map_err(|_| DecodeError::from_kind(DecodeErrorKind::InvalidOperatorRecord))
}

/// Reassembles a target from its alphabet-encoded low part and decimal
/// high part, rejecting values that do not fit a [`Value`]
pub(crate) fn combine_target(high: usize, low: usize) -> Result<Value, DecodeError> {
    high.checked_mul(BASE)
        .and_then(|h| h.checked_add(low))
        .filter(|&target| target <= Value::max_value() as usize)
        .map(|target| target as Value)
        .ok_or_else(|| DecodeError::from_kind(DecodeErrorKind::InvalidOperatorRecord))
}

#[cfg(test)]
mod tests {
    use super::{decode, encode};
    use crate::error::DecodeErrorKind;
    use crate::generate::{generate_puzzle, DEFAULT_MAX_ATTEMPTS};
    use crate::puzzle::{Cage, Difficulty, Operator, Puzzle, Solution, SpecialFlags};
    use crate::collections::Square;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::convert::TryFrom;

    fn tiny_puzzle() -> Puzzle {
        let cages = vec![
            Cage::new(0, vec![0, 1], Operator::Add, 3),
            Cage::new(1, vec![2], Operator::Add, 2),
            Cage::new(2, vec![3], Operator::Add, 1),
        ];
        let solution = Solution::try_from(vec![1, 2, 2, 1]).unwrap();
        Puzzle::new(
            2,
            cages,
            solution,
            Difficulty::Easy,
            SpecialFlags::default(),
            None,
        )
    }

    #[test]
    fn encode_is_bit_exact() {
        assert_eq!("Muu-uugM-PqT0*pqr0*rqp0*", encode(&tiny_puzzle()));
    }

    #[test]
    fn decode_inverts_encode() {
        let puzzle = tiny_puzzle();
        let decoded = decode(&encode(&puzzle)).unwrap();
        assert_eq!(puzzle.width(), decoded.width());
        assert_eq!(puzzle.difficulty(), decoded.difficulty());
        assert_eq!(puzzle.flags(), decoded.flags());
        assert_eq!(puzzle.cages(), decoded.cages());
        assert_eq!(puzzle.solution(), decoded.solution());
    }

    #[test]
    fn round_trips_generated_puzzles() {
        let mut rng = StdRng::seed_from_u64(99);
        let puzzle = generate_puzzle(
            5,
            Difficulty::Medium,
            SpecialFlags::default(),
            DEFAULT_MAX_ATTEMPTS,
            &mut rng,
        )
        .unwrap();
        let decoded = decode(&encode(&puzzle)).unwrap();
        assert_eq!(puzzle.solution(), decoded.solution());
        assert_eq!(puzzle.cages(), decoded.cages());
        assert_eq!(encode(&puzzle), encode(&decoded));
    }

    #[test]
    fn targets_above_the_alphabet_length_round_trip() {
        // a 2-cage whose product exceeds one alphabet character
        let cages = vec![
            Cage::new(0, vec![0, 1], Operator::Multiply, 56),
            Cage::new(1, vec![2], Operator::Add, 7),
            Cage::new(2, vec![3], Operator::Add, 8),
        ];
        // not a real solvable puzzle; only the record codec is at stake
        let solution = Square::try_from(vec![7, 8, 8, 7]).unwrap();
        let puzzle = Puzzle::new(
            2,
            cages,
            solution,
            Difficulty::Easy,
            SpecialFlags::default(),
            None,
        );
        let id = encode(&puzzle);
        assert!(id.contains("PpT1*"), "high digit missing from {}", id);
        assert_eq!(12, super::decode_target_high(&['1', '2']).unwrap());
        assert_eq!(0, super::decode_target_high(&[]).unwrap());
    }

    #[test]
    fn malformed_ids_yield_structured_errors() {
        for (id, kind) in &[
            ("", DecodeErrorKind::InvalidHeader),
            ("Muu-uugM", DecodeErrorKind::InvalidHeader),
            ("M1u-uugM-PqT0*pqr0*rqp0*", DecodeErrorKind::InvalidHeader),
            ("Muu-u1gM-PqT0*pqr0*rqp0*", DecodeErrorKind::InvalidCageGrid),
            ("Muu-uugMg-PqT0*pqr0*rqp0*", DecodeErrorKind::InvalidCageGrid),
            ("Muu-uugM-Pq*pqr0*rqp0*", DecodeErrorKind::InvalidOperatorRecord),
            ("Muu-uugM-PqT0*pqr0*", DecodeErrorKind::InvalidOperatorRecord),
            ("Muu-uugM-P+T0*pqr0*rqp0*", DecodeErrorKind::InvalidOperatorRecord),
            // two records for cage 0
            ("Muu-uugM-PqT0*PqT0*rqp0*", DecodeErrorKind::InvalidOperatorRecord),
        ] {
            let error = decode(id).unwrap_err();
            assert_eq!(*kind, error.kind(), "{}", id);
        }
    }

    #[test]
    fn unsolvable_id_is_reported() {
        // the 2-cell cage demands a sum of 4 (two 2s), clashing with
        // the pre-filled singletons
        let error = decode("Muu-uugM-Pqn0*pqr0*rqp0*").unwrap_err();
        assert_eq!(DecodeErrorKind::Unsolvable, error.kind());
    }
}

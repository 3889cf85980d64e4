use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::collections::square::Coord;
use crate::collections::Square;
use crate::puzzle::{CellId, Difficulty, Solution, Value};
use crate::LinkedHashSet;

/// Cage size distributions per difficulty. Sampling is uniform over the
/// entries, so repeated sizes carry the weight. Higher tiers have fewer
/// (or no) singletons and larger maximum sizes.
const KENKEN_CAGE_SIZES: [&[usize]; 3] = [
    &[1, 2, 2, 2, 2, 2, 3, 3, 3, 3, 4],
    &[1, 2, 2, 2, 2, 2, 2, 3, 3, 3, 3, 3, 4, 4, 5],
    &[
        2, 2, 2, 2, 2, 2, 2, 2, 3, 3, 3, 3, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 6,
    ],
];

/// Partitions the grid into cages for a KenKen puzzle
pub fn generate_cages(
    width: usize,
    difficulty: Difficulty,
    rng: &mut impl Rng,
) -> Vec<Vec<CellId>> {
    grow_cages(width, KENKEN_CAGE_SIZES[difficulty.index()], None, rng)
}

/// Partitions the grid by randomized BFS region growth
///
/// Each region is rooted at the first unassigned cell in row-major
/// order and grown over unassigned 4-neighbors, visiting neighbors in
/// randomized order so region shapes are irregular. A region may come
/// up smaller than its sampled target size if it runs out of
/// unassigned neighbors; that is accepted, not retried.
///
/// With `distinct_values` set, a cell whose solution value already
/// occurs in the region is skipped (the Killer Sudoku no-repeat rule).
pub(crate) fn grow_cages(
    width: usize,
    sizes: &[usize],
    distinct_values: Option<&Solution>,
    rng: &mut impl Rng,
) -> Vec<Vec<CellId>> {
    let mut cage_map: Square<Option<usize>> = Square::with_width(width);
    let mut cages: Vec<Vec<CellId>> = Vec::new();
    let mut unassigned = width.pow(2);
    while unassigned > 0 {
        let target_size = *sizes.choose(rng).unwrap();
        let root = first_unassigned_cell(&cage_map).unwrap();
        let cells = grow_region(
            &mut cage_map,
            cages.len(),
            root,
            target_size,
            distinct_values,
            rng,
        );
        debug_assert!(!cells.is_empty());
        unassigned -= cells.len();
        cages.push(cells);
    }
    cages
}

fn first_unassigned_cell(cage_map: &Square<Option<usize>>) -> Option<Coord> {
    cage_map
        .iter()
        .position(Option::is_none)
        .map(|i| cage_map.coord_at(i))
}

fn grow_region(
    cage_map: &mut Square<Option<usize>>,
    cage_id: usize,
    root: Coord,
    target_size: usize,
    distinct_values: Option<&Solution>,
    rng: &mut impl Rng,
) -> Vec<CellId> {
    let width = cage_map.width();
    let mut cells = Vec::with_capacity(target_size);
    let mut values: Vec<Value> = Vec::with_capacity(target_size);
    let mut queue = VecDeque::new();
    let mut seen = LinkedHashSet::default();
    queue.push_back(root);
    seen.insert(root);
    while cells.len() < target_size {
        let coord = match queue.pop_front() {
            None => break,
            Some(coord) => coord,
        };
        if cage_map[coord].is_some() {
            continue;
        }
        if let Some(solution) = distinct_values {
            if values.contains(&solution[coord]) {
                continue;
            }
            values.push(solution[coord]);
        }
        cage_map[coord] = Some(cage_id);
        cells.push(cage_map.index_of(coord));
        let mut neighbors: Vec<Coord> = coord.neighbors(width).collect();
        neighbors.shuffle(rng);
        for neighbor in neighbors {
            if cage_map[neighbor].is_none() && seen.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }
    cells
}

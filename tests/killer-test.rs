use rand::rngs::StdRng;
use rand::SeedableRng;

use cagey::collections::Square;
use cagey::killer;
use cagey::puzzle::Difficulty;
use cagey::solve::Solver;

fn generate_with_seeds(width: usize, difficulty: Difficulty, seeds: &[u64]) -> killer::KillerPuzzle {
    for &seed in seeds {
        let mut rng = StdRng::seed_from_u64(seed);
        if let Some(puzzle) = killer::generate_puzzle(width, difficulty, 100, &mut rng).unwrap() {
            return puzzle;
        }
    }
    panic!("no {0}x{0} killer puzzle found", width)
}

#[test]
fn unsupported_width_fails_fast() {
    let mut rng = StdRng::seed_from_u64(0);
    let result = killer::generate_puzzle(5, Difficulty::Easy, 100, &mut rng);
    assert!(result.is_err());
}

#[test]
fn generates_a_valid_killer_puzzle() {
    let puzzle = generate_with_seeds(6, Difficulty::Easy, &[1, 2, 3]);
    assert_eq!(6, puzzle.width());
    assert_eq!((2, 3), (puzzle.box_rows(), puzzle.box_cols()));

    // cages partition the grid and carry correct sums over distinct values
    let mut covered = vec![0; 36];
    for cage in puzzle.cages() {
        let mut values = Vec::new();
        for &cell_id in cage.cell_ids() {
            covered[cell_id] += 1;
            values.push(puzzle.solution()[cell_id]);
        }
        assert_eq!(cage.sum(), values.iter().sum::<i32>());
        values.sort_unstable();
        values.dedup();
        assert_eq!(values.len(), cage.cell_ids().len(), "repeated value in cage");
    }
    assert!(covered.iter().all(|&count| count == 1));
}

#[test]
fn killer_puzzles_have_a_unique_solution() {
    let puzzle = generate_with_seeds(6, Difficulty::Medium, &[4, 5, 6]);
    let solver = Solver::for_killer(&puzzle);
    let empty = Square::with_width_and_value(6, -1);
    assert_eq!(1, solver.count_solutions(&empty, 2));
    assert_eq!(puzzle.solution(), &solver.solve(&empty).unwrap());
}

#[test]
fn round_trip_preserves_the_puzzle() {
    let puzzle = generate_with_seeds(4, Difficulty::Easy, &[7, 8, 9]);
    let encoded = killer::encode(&puzzle);
    let decoded = killer::decode(&encoded).unwrap();
    assert_eq!(puzzle.cages(), decoded.cages());
    assert_eq!(puzzle.solution(), decoded.solution());
    assert_eq!(encoded, killer::encode(&decoded));
}

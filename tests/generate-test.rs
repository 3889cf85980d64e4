use rand::rngs::StdRng;
use rand::SeedableRng;

use cagey::generate::{generate_daily_puzzle, generate_puzzle, PuzzleDate, DEFAULT_MAX_ATTEMPTS};
use cagey::puzzle::{id, Difficulty, Operator, Puzzle, SpecialFlags};
use cagey::solve::{evaluate_cage_complete, Solver};

fn generate_with_seeds(
    width: usize,
    difficulty: Difficulty,
    flags: SpecialFlags,
    seeds: &[u64],
) -> Puzzle {
    for &seed in seeds {
        let mut rng = StdRng::seed_from_u64(seed);
        if let Some(puzzle) = generate_puzzle(width, difficulty, flags, DEFAULT_MAX_ATTEMPTS, &mut rng)
        {
            return puzzle;
        }
    }
    panic!(
        "no {}x{} puzzle found in {} attempts across {} seeds",
        width,
        width,
        DEFAULT_MAX_ATTEMPTS,
        seeds.len()
    )
}

fn assert_cages_partition_grid(puzzle: &Puzzle) {
    let mut covered = vec![0; puzzle.width().pow(2)];
    for cage in puzzle.cages() {
        assert!(!cage.cell_ids().is_empty());
        for &cell_id in cage.cell_ids() {
            covered[cell_id] += 1;
        }
    }
    assert!(
        covered.iter().all(|&count| count == 1),
        "cages do not partition the grid: {:?}",
        covered
    );
}

fn assert_solution_satisfies_cages(puzzle: &Puzzle) {
    for cage in puzzle.cages() {
        let values: Vec<_> = cage
            .cell_ids()
            .iter()
            .map(|&i| puzzle.solution()[i])
            .collect();
        assert!(
            evaluate_cage_complete(&values, cage.operator(), cage.target()),
            "cage {} ({:?}, target {}) does not hold over {:?}",
            cage.id(),
            cage.operator(),
            cage.target(),
            values
        );
    }
}

#[test]
fn generates_a_valid_4x4_easy_puzzle() {
    let puzzle = generate_with_seeds(4, Difficulty::Easy, SpecialFlags::default(), &[0, 1, 2]);
    assert_eq!(4, puzzle.width());
    assert!(puzzle.verify_solution(puzzle.solution()));
    assert_cages_partition_grid(&puzzle);
    assert_solution_satisfies_cages(&puzzle);
    assert!(puzzle.hidden().is_none());
}

#[test]
fn generated_puzzles_have_a_unique_solution() {
    for (width, difficulty) in &[
        (4, Difficulty::Easy),
        (5, Difficulty::Medium),
        (6, Difficulty::Hard),
    ] {
        let puzzle = generate_with_seeds(*width, *difficulty, SpecialFlags::default(), &[7, 8, 9]);
        let solver = Solver::for_puzzle(&puzzle);
        assert_eq!(1, solver.count_solutions(&puzzle.starting_grid(), 2));
        let solved = solver.solve(&puzzle.starting_grid()).unwrap();
        assert_eq!(puzzle.solution(), &solved);
    }
}

#[test]
fn special_flags_force_a_special_cage() {
    let flags = SpecialFlags {
        lcm: true,
        ..SpecialFlags::default()
    };
    let puzzle = generate_with_seeds(5, Difficulty::Medium, flags, &[10, 11, 12]);
    let has_special = puzzle
        .cages()
        .iter()
        .any(|cage| cage.cell_ids().len() > 1 && cage.operator().is_special());
    assert!(has_special);
}

#[test]
fn zero_flag_shifts_the_value_range() {
    let flags = SpecialFlags {
        zero: true,
        ..SpecialFlags::default()
    };
    let puzzle = generate_with_seeds(4, Difficulty::Easy, flags, &[13, 14, 15]);
    assert!(puzzle.solution().iter().all(|&v| (0..4).contains(&v)));
    assert_solution_satisfies_cages(&puzzle);
}

#[test]
fn hidden_puzzles_conceal_an_interior_singleton() {
    let flags = SpecialFlags {
        hidden: true,
        ..SpecialFlags::default()
    };
    let puzzle = generate_with_seeds(5, Difficulty::Easy, flags, &[16, 17, 18, 19]);
    let hidden = puzzle.hidden().expect("hidden flag set but no hidden cage");
    let cage = puzzle.cage(hidden.cage_id);
    assert_eq!(Operator::Hide, cage.operator());
    assert_eq!(1, cage.cell_ids().len());
    assert_eq!(puzzle.solution()[cage.cell_ids()[0]], hidden.value);
    // the hidden cell is never pre-filled
    assert_eq!(-1, puzzle.starting_grid()[cage.cell_ids()[0]]);
    // yet the remaining clues still force the whole grid
    let solver = Solver::for_puzzle(&puzzle);
    assert_eq!(1, solver.count_solutions(&puzzle.starting_grid(), 2));
}

#[test]
fn round_trip_preserves_the_puzzle() {
    for (width, flags) in &[
        (4, SpecialFlags::default()),
        (
            5,
            SpecialFlags {
                gcd: true,
                ..SpecialFlags::default()
            },
        ),
    ] {
        let puzzle = generate_with_seeds(*width, Difficulty::Medium, *flags, &[20, 21, 22]);
        let encoded = id::encode(&puzzle);
        let decoded = id::decode(&encoded).unwrap();
        assert_eq!(puzzle.solution(), decoded.solution());
        assert_eq!(puzzle.cages(), decoded.cages());
        assert_eq!(puzzle.flags(), decoded.flags());
        assert_eq!(puzzle.difficulty(), decoded.difficulty());
        assert_eq!(encoded, id::encode(&decoded));
    }
}

#[test]
fn daily_puzzle_is_deterministic() {
    let date = PuzzleDate::new(2026, 8, 7);
    let first = generate_daily_puzzle(date).map(|p| id::encode(&p));
    let second = generate_daily_puzzle(date).map(|p| id::encode(&p));
    assert_eq!(first, second);
    if let Some(encoded) = first {
        let puzzle = id::decode(&encoded).unwrap();
        assert!((6..=8).contains(&puzzle.width()));
    }
}

#![warn(rust_2018_idioms)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unused_qualifications)]

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::SeedableRng;

use cagey::generate::{generate_daily_puzzle, generate_puzzle};
use cagey::killer;
use cagey::puzzle::{id, Operator, Puzzle, Solution};

use crate::options::{Generate, Mode, Options};
use crate::puzzle_folder_builder::PuzzleFolderBuilder;

mod options;
mod puzzle_folder_builder;

fn main() -> Result<()> {
    env_logger::init();
    let options = Options::from_args()?;
    match options.mode().clone() {
        Mode::Generate(generate) => run_generate(&options, &generate),
        Mode::Decode { id, killer } => run_decode(&options, &id, killer),
        Mode::Daily { date } => {
            let puzzle = generate_daily_puzzle(date)
                .ok_or_else(|| anyhow!("no daily puzzle found for {:?}", date))?;
            emit_puzzle(&options, &puzzle)
        }
    }
}

fn run_generate(options: &Options, generate: &Generate) -> Result<()> {
    let mut rng = match options.seed() {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    for number in 1..=generate.count {
        if generate.count > 1 {
            println!("Generating puzzle {}/{}", number, generate.count);
        }
        if generate.killer {
            let puzzle = killer::generate_puzzle(
                generate.width,
                generate.difficulty,
                generate.max_attempts,
                &mut rng,
            )?
            .ok_or_else(|| exhausted(generate.max_attempts))?;
            emit_killer_puzzle(options, &puzzle)?;
        } else {
            let puzzle = generate_puzzle(
                generate.width,
                generate.difficulty,
                generate.flags,
                generate.max_attempts,
                &mut rng,
            )
            .ok_or_else(|| exhausted(generate.max_attempts))?;
            emit_puzzle(options, &puzzle)?;
        }
    }
    Ok(())
}

fn exhausted(max_attempts: u32) -> anyhow::Error {
    anyhow!(
        "no puzzle with a unique solution found within {} attempts; try again or relax the flags",
        max_attempts
    )
}

fn run_decode(options: &Options, id: &str, killer: bool) -> Result<()> {
    if killer {
        let puzzle = killer::decode(id)?;
        emit_killer_puzzle(options, &puzzle)
    } else {
        let puzzle = id::decode(id)?;
        emit_puzzle(options, &puzzle)
    }
}

fn emit_puzzle(options: &Options, puzzle: &Puzzle) -> Result<()> {
    let id = id::encode(puzzle);
    print_puzzle(puzzle);
    println!("ID: {}", id);
    if options.show_solution() {
        println!("{}", puzzle.solution());
    }
    save_puzzle(options, &id, puzzle, puzzle.solution())
}

fn emit_killer_puzzle(options: &Options, puzzle: &killer::KillerPuzzle) -> Result<()> {
    let id = killer::encode(puzzle);
    print_killer_puzzle(puzzle);
    println!("ID: {}", id);
    if options.show_solution() {
        println!("{}", puzzle.solution());
    }
    save_puzzle(options, &id, puzzle, puzzle.solution())
}

fn print_puzzle(puzzle: &Puzzle) {
    let cages = puzzle
        .cages()
        .iter()
        .map(|cage| {
            let label = match cage.operator() {
                Operator::Hide => "?".to_string(),
                operator => format!("{}{}", cage.target(), operator.symbol().unwrap()),
            };
            format!(" {:>2}: {}", cage.id(), label)
        })
        .join("\n");
    println!("{}{}", cage_grid(puzzle.cage_map()), cages);
}

fn print_killer_puzzle(puzzle: &killer::KillerPuzzle) {
    let cages = puzzle
        .cages()
        .iter()
        .map(|cage| format!(" {:>2}: {}", cage.id(), cage.sum()))
        .join("\n");
    println!("{}{}", cage_grid(puzzle.cage_map()), cages);
}

fn cage_grid(cage_map: &cagey::collections::Square<usize>) -> String {
    let mut s = String::new();
    for row in cage_map.rows() {
        for &cage_id in row {
            s.push((b'A' + cage_id as u8) as char);
        }
        s.push('\n');
    }
    s
}

fn save_puzzle(
    options: &Options,
    id: &str,
    puzzle: &impl ToString,
    solution: &Solution,
) -> Result<()> {
    if !options.save_puzzle() {
        return Ok(());
    }
    let output_path = options.output_path().unwrap();
    fs::create_dir_all(output_path)?;
    let folder_builder = PuzzleFolderBuilder::new()?;
    folder_builder.write_id(id)?;
    folder_builder.write_puzzle(puzzle)?;
    folder_builder.write_solution(solution)?;
    let path = next_puzzle_path(output_path);
    folder_builder.save(&path)?;
    println!("Saved puzzle to {}", path.display());
    Ok(())
}

fn next_puzzle_path(output_path: &std::path::Path) -> PathBuf {
    (1..)
        .map(|i| output_path.join(format!("puzzle_{}", i)))
        .find(|path| !path.exists())
        .unwrap()
}

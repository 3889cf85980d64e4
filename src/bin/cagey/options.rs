use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;

use cagey::generate::{PuzzleDate, DEFAULT_MAX_ATTEMPTS};
use cagey::puzzle::{Difficulty, SpecialFlags};

const DEFAULT_PUZZLE_WIDTH: usize = 4;
const DEFAULT_PATH: &str = "output";

#[derive(Clone)]
pub(crate) struct Options {
    output_path: Option<PathBuf>,
    mode: Mode,
    seed: Option<u64>,
    show_solution: bool,
    save_puzzle: bool,
}

#[derive(Clone)]
pub(crate) enum Mode {
    Generate(Generate),
    Decode { id: String, killer: bool },
    Daily { date: PuzzleDate },
}

#[derive(Clone)]
pub(crate) struct Generate {
    pub count: u32,
    pub width: usize,
    pub difficulty: Difficulty,
    pub flags: SpecialFlags,
    pub killer: bool,
    pub max_attempts: u32,
}

impl Options {
    pub fn from_args() -> Result<Self> {
        Self::from_arg_matches(&clap_app().get_matches())
    }

    fn from_arg_matches(matches: &ArgMatches<'_>) -> Result<Self> {
        let mode = if let Some(id) = matches.value_of("id") {
            Mode::Decode {
                id: id.into(),
                killer: matches.is_present("killer"),
            }
        } else if let Some(date) = matches.value_of("daily") {
            Mode::Daily {
                date: parse_date(date)?,
            }
        } else {
            let difficulty = match matches.value_of("difficulty") {
                None => Difficulty::Easy,
                Some(s) => {
                    let index = s.parse().with_context(|| "invalid difficulty")?;
                    Difficulty::from_index(index)
                        .ok_or_else(|| anyhow!("difficulty must be 0, 1 or 2"))?
                }
            };
            Mode::Generate(Generate {
                count: parse_or(matches, "count", 1)?,
                width: parse_or(matches, "width", DEFAULT_PUZZLE_WIDTH)?,
                difficulty,
                flags: SpecialFlags {
                    modulo: matches.is_present("modulo"),
                    gcd: matches.is_present("gcd"),
                    lcm: matches.is_present("lcm"),
                    zero: matches.is_present("zero"),
                    hidden: matches.is_present("hidden"),
                },
                killer: matches.is_present("killer"),
                max_attempts: parse_or(matches, "max_attempts", DEFAULT_MAX_ATTEMPTS)?,
            })
        };
        let mut options = Self {
            output_path: None,
            mode,
            seed: match matches.value_of("seed") {
                None => None,
                Some(s) => Some(s.parse().with_context(|| "invalid seed")?),
            },
            show_solution: matches.is_present("show_solution"),
            save_puzzle: matches.is_present("save_puzzle"),
        };
        if options.save_puzzle {
            options.output_path = Some(matches.value_of("output_path").unwrap().into());
        } else if matches.occurrences_of("output_path") != 0 {
            return Err(anyhow!("output path specified but nothing to save"));
        }
        Ok(options)
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn show_solution(&self) -> bool {
        self.show_solution
    }

    pub fn save_puzzle(&self) -> bool {
        self.save_puzzle
    }
}

fn parse_or<T: std::str::FromStr>(matches: &ArgMatches<'_>, name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match matches.value_of(name) {
        None => Ok(default),
        Some(s) => s.parse().with_context(|| format!("invalid {}", name)),
    }
}

fn parse_date(s: &str) -> Result<PuzzleDate> {
    let parts: Vec<&str> = s.split('-').collect();
    let invalid = || anyhow!("dates look like 2026-08-07");
    if parts.len() != 3 {
        return Err(invalid());
    }
    let numbers: Vec<u32> = parts
        .iter()
        .map(|p| p.parse())
        .collect::<Result<_, _>>()
        .map_err(|_| invalid())?;
    if !(1..=12).contains(&numbers[1]) || !(1..=31).contains(&numbers[2]) {
        return Err(invalid());
    }
    Ok(PuzzleDate::new(numbers[0], numbers[1], numbers[2]))
}

fn clap_app() -> clap::App<'static, 'static> {
    use clap::{App, AppSettings, Arg, ArgGroup};

    App::new("Cagey")
        .help_message("Generate and solve KenKen and Killer Sudoku puzzles")
        .setting(AppSettings::ArgRequiredElseHelp)
        .group(
            ArgGroup::with_name("source")
                .args(&["generate", "id", "daily"])
                .required(true),
        )
        .arg(
            Arg::with_name("generate")
                .short("g")
                .long("generate")
                .help("generate puzzle(s)")
                .display_order(1),
        )
        .arg(
            Arg::with_name("id")
                .short("i")
                .long("id")
                .takes_value(true)
                .value_name("ID")
                .help("reconstruct a puzzle from its ID")
                .display_order(1),
        )
        .arg(
            Arg::with_name("daily")
                .long("daily")
                .takes_value(true)
                .value_name("DATE")
                .help("generate the daily puzzle for a date (YYYY-MM-DD)")
                .display_order(1),
        )
        .arg(
            Arg::with_name("killer")
                .short("k")
                .long("killer")
                .help("Killer Sudoku instead of KenKen"),
        )
        .arg(
            Arg::with_name("width")
                .short("w")
                .long("width")
                .takes_value(true)
                .value_name("WIDTH")
                .requires("generate")
                .help("the width and height of the generated puzzle"),
        )
        .arg(
            Arg::with_name("count")
                .short("c")
                .long("count")
                .takes_value(true)
                .requires("generate")
                .help("the number of puzzles to generate"),
        )
        .arg(
            Arg::with_name("difficulty")
                .short("d")
                .long("difficulty")
                .takes_value(true)
                .requires("generate")
                .help("difficulty tier: 0 easy, 1 medium, 2 hard"),
        )
        .arg(
            Arg::with_name("modulo")
                .long("modulo")
                .requires("generate")
                .conflicts_with("killer")
                .help("allow % cages"),
        )
        .arg(
            Arg::with_name("gcd")
                .long("gcd")
                .requires("generate")
                .conflicts_with("killer")
                .help("allow gcd cages"),
        )
        .arg(
            Arg::with_name("lcm")
                .long("lcm")
                .requires("generate")
                .conflicts_with("killer")
                .help("allow lcm cages"),
        )
        .arg(
            Arg::with_name("zero")
                .long("zero")
                .requires("generate")
                .conflicts_with("killer")
                .help("values range over 0..n-1 instead of 1..n"),
        )
        .arg(
            Arg::with_name("hidden")
                .long("hidden")
                .requires("generate")
                .conflicts_with("killer")
                .help("require a hidden-clue cage"),
        )
        .arg(
            Arg::with_name("max_attempts")
                .long("max-attempts")
                .takes_value(true)
                .requires("generate")
                .help("generation retries before giving up"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .help("seed the generator for reproducible puzzles"),
        )
        .arg(
            Arg::with_name("show_solution")
                .short("s")
                .long("show-solution")
                .help("print the solution grid"),
        )
        .arg(
            Arg::with_name("save_puzzle")
                .long("save-puzzle")
                .help("save the puzzle, its ID and its solution to a folder"),
        )
        .arg(
            Arg::with_name("output_path")
                .short("o")
                .long("output-path")
                .help("directory to save puzzle folders in")
                .default_value(DEFAULT_PATH),
        )
}

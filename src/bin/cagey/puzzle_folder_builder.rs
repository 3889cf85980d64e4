use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::{fs, io};

use tempfile::TempDir;

use cagey::puzzle::Solution;

/// Stages a puzzle's files in a temporary directory so that a partial
/// failure never leaves a half-written folder in the output path
pub(crate) struct PuzzleFolderBuilder {
    temp_dir: TempDir,
}

impl PuzzleFolderBuilder {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            temp_dir: tempfile::tempdir()?,
        })
    }

    pub fn write_id(&self, id: &str) -> io::Result<()> {
        self.write_file("id", id)
    }

    pub fn write_puzzle(&self, puzzle: &impl ToString) -> io::Result<()> {
        self.write_file("puzzle", &puzzle.to_string())
    }

    pub fn write_solution(&self, solution: &Solution) -> io::Result<()> {
        self.write_file("solution", &solution.to_string())
    }

    fn write_file(&self, name: &str, contents: &str) -> io::Result<()> {
        let mut file = File::create(self.temp_dir.path().join(name))?;
        file.write_all(contents.as_bytes())
    }

    pub fn save<P: AsRef<Path>>(self, path: P) -> io::Result<()> {
        fs::rename(&self.temp_dir, path)
    }
}

//! Generate and solve KenKen and Killer Sudoku puzzles

#![warn(rust_2018_idioms)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unused_qualifications)]

#[macro_use]
extern crate log;

pub mod collections;
pub mod error;
pub mod generate;
pub mod killer;
pub mod puzzle;
pub mod solve;

pub(crate) type HashMap<K, V> = ahash::AHashMap<K, V>;
pub(crate) type LinkedHashMap<K, V> = linked_hash_map::LinkedHashMap<K, V, ahash::RandomState>;
pub(crate) type LinkedHashSet<T> = linked_hash_set::LinkedHashSet<T, ahash::RandomState>;

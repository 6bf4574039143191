//! # OrderGrid
//!
//! Resolves a strict total order from a square matrix of partial pairwise relations.
//!
//! Each cell says whether the row entity is greater than, less than or unresolved
//! against the column entity. Parsing yields a [`RelationMatrix`], normalization
//! fills the diagonal and mirrors every known inequality, and [`resolve`] peels off
//! maximal entities one pass at a time until every unknown cell is decided.
//!
//! ```
//! let solution = order_grid::solve("ABCD A=>-- B-=>- C--=> D---=").unwrap();
//! assert_eq!(solution.order, vec![0, 1, 2, 3]);
//! ```
mod error;
mod matrix;
mod relation;
pub mod request;
mod solver;

pub use error::{PuzzleError, Result};
pub use matrix::{label, PuzzleFormat, RelationMatrix};
pub use relation::Relation;
pub use solver::{is_maximal, resolve, resolve_observed, solve, solve_with, Solution};

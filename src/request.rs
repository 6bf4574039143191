//! Pulling the puzzle out of the raw request parameter.
//!
//! The parameter starts with a fixed-length question line, then the grid with
//! arbitrary line breaks.

use crate::error::Result;
use crate::solver::solve;

/// Length of the question text preceding the grid.
pub const PUZZLE_PREFIX_LEN: usize = 26;

/// Drop the question prefix, turn every line break into a space and trim.
pub fn extract_puzzle(param: &str) -> String {
    let body: String = param.chars().skip(PUZZLE_PREFIX_LEN).collect();
    body.replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
        .trim()
        .to_string()
}

/// Solve the puzzle carried by a request parameter and render it as a labeled grid.
pub fn solve_request(param: &str) -> Result<String> {
    let solution = solve(&extract_puzzle(param))?;
    Ok(solution.into_matrix().to_grid())
}

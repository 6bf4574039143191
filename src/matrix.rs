use crate::error::{PuzzleError, Result};
use crate::relation::Relation;
use serde::{Serialize, Serializer};
use std::fmt;
use tracing::trace;

/// Shape of the raw puzzle string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleFormat {
    /// Number of entities being ranked.
    pub entities: usize,
}

impl Default for PuzzleFormat {
    fn default() -> Self {
        Self { entities: 4 }
    }
}

impl PuzzleFormat {
    pub fn new(entities: usize) -> Self {
        Self { entities }
    }

    /// Header of n labels, n rows of `label + n symbols`, n separators.
    ///
    /// `None` when the length does not fit in a `usize`.
    pub fn expected_len(&self) -> Option<usize> {
        let n = self.entities;
        n.checked_mul(n)?.checked_add(n.checked_mul(3)?)
    }
}

/// Label of the entity at `index`: A, B, C, ...
pub fn label(index: usize) -> char {
    u32::try_from(index)
        .ok()
        .and_then(|i| char::from_u32('A' as u32 + i))
        .unwrap_or('?')
}

/// Square matrix of pairwise relations; `cells[i][j]` is how entity i compares to j.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationMatrix {
    pub cells: Vec<Vec<Relation>>,
}

impl RelationMatrix {
    /// Wrap rows that are already relation symbols. Rows must form a square.
    pub fn from_rows(rows: Vec<Vec<Relation>>) -> Result<Self> {
        let n = rows.len();
        if let Some((r, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(PuzzleError::MalformedInput(format!(
                "row {r} has {} relations, expected {n}",
                row.len()
            )));
        }
        Ok(Self { cells: rows })
    }

    /// Parse a puzzle in the default four-entity format.
    pub fn parse(raw: &str) -> Result<Self> {
        Self::parse_with(raw, &PuzzleFormat::default())
    }

    /// Parse `"ABCD A=>>- B<=-- ..."`: the header token and each row's leading
    /// label are dropped, the remaining characters are the row's relations.
    pub fn parse_with(raw: &str, format: &PuzzleFormat) -> Result<Self> {
        let n = format.entities;
        let expected = format.expected_len().ok_or_else(|| {
            PuzzleError::MalformedInput(format!("{n} entities is too many for a puzzle string"))
        })?;
        let found = raw.chars().count();
        if found != expected {
            return Err(PuzzleError::InvalidLength { expected, found });
        }

        let tokens: Vec<&str> = raw.split_whitespace().collect();
        if tokens.len() != n + 1 {
            return Err(PuzzleError::MalformedInput(format!(
                "expected {} tokens (header + {n} rows), found {}",
                n + 1,
                tokens.len()
            )));
        }

        let mut cells = Vec::with_capacity(n);
        for (r, token) in tokens[1..].iter().enumerate() {
            let symbols: Vec<char> = token.chars().skip(1).collect();
            if symbols.len() != n {
                return Err(PuzzleError::MalformedInput(format!(
                    "row {r} has {} relations, expected {n}",
                    symbols.len()
                )));
            }
            let mut row = Vec::with_capacity(n);
            for (c, &ch) in symbols.iter().enumerate() {
                let rel = if c == r {
                    // overwritten by `normalize`
                    Relation::from_char(ch).unwrap_or(Relation::Unknown)
                } else {
                    match Relation::from_char(ch) {
                        Some(Relation::Equal) | None => {
                            return Err(PuzzleError::MalformedInput(format!(
                                "invalid relation {ch:?} at row {r}, column {c}"
                            )))
                        }
                        Some(rel) => rel,
                    }
                };
                row.push(rel);
            }
            cells.push(row);
        }
        Ok(Self { cells })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize, column: usize) -> Relation {
        self.cells[row][column]
    }

    pub fn row(&self, row: usize) -> &[Relation] {
        &self.cells[row]
    }

    /// Set the diagonal to `Equal` and mirror every inequality across it, so each
    /// row carries everything known about its entity.
    ///
    /// Rows are visited in order and each inequality overwrites its mirror, so on
    /// conflicting input the cell above the diagonal wins.
    pub fn normalize(&mut self) {
        let n = self.len();
        for r in 0..n {
            self.cells[r][r] = Relation::Equal;
            for c in 0..n {
                let rel = self.cells[r][c];
                if rel.is_inequality() {
                    trace!(row = r, column = c, symbol = %rel, "mirror");
                    self.cells[c][r] = rel.mirrored();
                }
            }
        }
    }

    /// First off-diagonal `Unknown` cell in row-major order.
    pub fn first_unknown(&self) -> Option<(usize, usize)> {
        self.cells.iter().enumerate().find_map(|(r, row)| {
            row.iter()
                .enumerate()
                .find(|&(c, &rel)| c != r && rel == Relation::Unknown)
                .map(|(c, _)| (r, c))
        })
    }

    pub fn is_resolved(&self) -> bool {
        self.first_unknown().is_none()
    }

    /// Diagonal all `Equal`, every off-diagonal pair mirrored (`Unknown` on both sides allowed).
    pub fn is_consistent(&self) -> bool {
        let n = self.len();
        (0..n).all(|r| {
            self.cells[r][r] == Relation::Equal
                && (0..n).filter(|&c| c != r).all(|c| {
                    let rel = self.cells[r][c];
                    rel != Relation::Equal && self.cells[c][r] == rel.mirrored()
                })
        })
    }

    fn row_string(&self, row: usize) -> String {
        self.cells[row].iter().map(|rel| rel.as_char()).collect()
    }

    /// Labeled text grid: a header of entity labels, then one labeled line per row.
    pub fn to_grid(&self) -> String {
        let mut lines = Vec::with_capacity(self.len() + 1);
        let header: String = std::iter::once(' ').chain((0..self.len()).map(label)).collect();
        lines.push(header);
        for r in 0..self.len() {
            lines.push(format!("{}{}", label(r), self.row_string(r)));
        }
        lines.join("\n")
    }
}

impl fmt::Display for RelationMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_grid())
    }
}

impl Serialize for RelationMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq((0..self.len()).map(|r| self.row_string(r)))
    }
}

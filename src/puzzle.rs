//! Puzzle representation and the text board format.
//!
//! A board file holds one line per row. A line containing a comma is split
//! on commas, otherwise on whitespace; blank lines are skipped. Every token
//! is a region id. The grid must be square, and each region must hold
//! exactly one queen in a valid solution.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use smallvec::SmallVec;

use crate::error::{Error, Result};

/// Color-region identifier as it appears in board files.
pub type RegionId = u32;

/// A board coordinate, `(row, col)`.
pub type Cell = (usize, usize);

/// Largest supported board edge. The solver keeps column domains as `u64`
/// bitmasks, one bit per column.
pub const MAX_BOARD: usize = 64;

/// A parsed board: dimension `n` and a row-major grid of region ids.
/// Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    id: String,
    n: usize,
    grid: Vec<RegionId>,
}

impl Puzzle {
    /// Reads and parses a board file. The puzzle id is the file stem.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("puzzle")
            .to_string();
        Self::from_text(id, &text)
    }

    /// Parses a board from in-memory text.
    pub fn from_text(id: impl Into<String>, text: &str) -> Result<Self> {
        let id = id.into();
        let parse_err = |reason: String| Error::Parse {
            id: id.clone(),
            reason,
        };

        let mut rows: Vec<Vec<RegionId>> = Vec::new();
        for line in text.lines() {
            let tokens = split_tokens(line);
            if tokens.is_empty() {
                continue;
            }
            let mut row = Vec::with_capacity(tokens.len());
            for token in tokens {
                let region: RegionId = token.parse().map_err(|_| {
                    parse_err(format!("row {}: invalid region id '{token}'", rows.len()))
                })?;
                row.push(region);
            }
            rows.push(row);
        }

        let n = rows.len();
        if n == 0 {
            return Err(parse_err("empty board".into()));
        }
        if n > MAX_BOARD {
            return Err(parse_err(format!(
                "board edge {n} exceeds maximum {MAX_BOARD}"
            )));
        }
        for (r, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(parse_err(format!(
                    "row {r} has {} cells, expected {n} for a square board",
                    row.len()
                )));
            }
        }

        Ok(Puzzle {
            id,
            n,
            grid: rows.into_iter().flatten().collect(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Board edge length.
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn region_at(&self, row: usize, col: usize) -> RegionId {
        self.grid[row * self.n + col]
    }

    /// Board rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[RegionId]> {
        self.grid.chunks(self.n)
    }

    /// Groups cells by region id, in ascending region order.
    pub fn regions(&self) -> BTreeMap<RegionId, SmallVec<[Cell; 8]>> {
        let mut regions: BTreeMap<RegionId, SmallVec<[Cell; 8]>> = BTreeMap::new();
        for row in 0..self.n {
            for col in 0..self.n {
                regions
                    .entry(self.region_at(row, col))
                    .or_default()
                    .push((row, col));
            }
        }
        regions
    }
}

/// Splits a board line into region tokens: on commas when present,
/// otherwise on whitespace. Empty tokens are dropped.
pub(crate) fn split_tokens(line: &str) -> Vec<&str> {
    if line.contains(',') {
        line.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    } else {
        line.split_whitespace().collect()
    }
}

/// Queen columns, one per row. Only the solver constructs these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    columns: Vec<u16>,
}

impl Solution {
    pub(crate) fn new(columns: Vec<u16>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[u16] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Queen positions as `(row, col)` pairs.
    pub fn queens(&self) -> impl Iterator<Item = Cell> + '_ {
        self.columns
            .iter()
            .enumerate()
            .map(|(row, &col)| (row, col as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comma_separated() {
        let puzzle = Puzzle::from_text("t", "0,1\n1,0\n").unwrap();
        assert_eq!(puzzle.n(), 2);
        assert_eq!(puzzle.region_at(0, 0), 0);
        assert_eq!(puzzle.region_at(1, 0), 1);
    }

    #[test]
    fn test_parse_whitespace_separated() {
        let puzzle = Puzzle::from_text("t", "0 1\n1 0\n").unwrap();
        assert_eq!(puzzle.n(), 2);
        assert_eq!(puzzle.region_at(0, 1), 1);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let puzzle = Puzzle::from_text("t", "\n0,1\n\n1,0\n\n").unwrap();
        assert_eq!(puzzle.n(), 2);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Puzzle::from_text("t", "0,1\n0,1,2\n").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_non_square_rejected() {
        let err = Puzzle::from_text("t", "0,1,2\n0,1,2\n").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_empty_board_rejected() {
        let err = Puzzle::from_text("t", "\n  \n").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_bad_token_rejected() {
        let err = Puzzle::from_text("t", "0,x\n1,0\n").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_regions_grouping() {
        let puzzle = Puzzle::from_text("t", "0,0\n1,1\n").unwrap();
        let regions = puzzle.regions();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[&0].as_slice(), &[(0, 0), (0, 1)]);
        assert_eq!(regions[&1].as_slice(), &[(1, 0), (1, 1)]);
    }

    #[test]
    fn test_solution_queens() {
        let solution = Solution::new(vec![1, 3, 0, 2]);
        let queens: Vec<Cell> = solution.queens().collect();
        assert_eq!(queens, vec![(0, 1), (1, 3), (2, 0), (3, 2)]);
    }
}

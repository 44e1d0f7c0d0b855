//! Translation of a parsed board into a declarative constraint model.
//!
//! One integer variable per row holds that row's queen column, with domain
//! `[0, n-1]`. The three puzzle rules become three constraint forms:
//! all-different over the row columns, exactly-one-queen per region, and a
//! minimum column gap between consecutive rows (queens one row apart must
//! sit more than one column apart, which is the 8-adjacency rule once each
//! row holds exactly one queen).

use crate::error::{Error, Result};
use crate::puzzle::{Cell, Puzzle};

/// A constraint over the per-row column variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// The listed rows' queen columns are pairwise distinct.
    AllDifferent { rows: Vec<usize> },

    /// Exactly one of the listed cells holds a queen.
    ExactlyOne { cells: Vec<Cell> },

    /// Queens in the two rows sit more than `gap` columns apart.
    MinColumnGap {
        row_a: usize,
        row_b: usize,
        gap: u16,
    },
}

/// The constraint model for one board: `n` row variables plus constraints.
#[derive(Debug, Clone)]
pub struct QueensModel {
    n: usize,
    constraints: Vec<Constraint>,
}

impl QueensModel {
    pub fn new(n: usize, constraints: Vec<Constraint>) -> Self {
        Self { n, constraints }
    }

    /// Number of row variables (equals the board edge).
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Checks that every referenced row and cell is in range and that the
    /// region structure can pin exactly one queen per row.
    pub fn validate(&self) -> Result<()> {
        let mut region_groups = 0usize;
        for constraint in &self.constraints {
            match constraint {
                Constraint::AllDifferent { rows } => {
                    if rows.is_empty() {
                        return Err(Error::Model("empty all-different group".into()));
                    }
                    for &row in rows {
                        if row >= self.n {
                            return Err(Error::Model(format!("row {row} out of range")));
                        }
                    }
                }
                Constraint::ExactlyOne { cells } => {
                    region_groups += 1;
                    if cells.is_empty() {
                        return Err(Error::Model("empty region group".into()));
                    }
                    for &(row, col) in cells {
                        if row >= self.n || col >= self.n {
                            return Err(Error::Model(format!(
                                "cell ({row}, {col}) out of range"
                            )));
                        }
                    }
                }
                Constraint::MinColumnGap { row_a, row_b, .. } => {
                    if *row_a >= self.n || *row_b >= self.n {
                        return Err(Error::Model(format!(
                            "gap rows ({row_a}, {row_b}) out of range"
                        )));
                    }
                    if row_a == row_b {
                        return Err(Error::Model(format!("gap over single row {row_a}")));
                    }
                }
            }
        }
        if region_groups != self.n {
            return Err(Error::Model(format!(
                "expected {} region groups, found {region_groups}",
                self.n
            )));
        }
        Ok(())
    }
}

/// Transcribes the three puzzle rules into a [`QueensModel`].
pub fn build_model(puzzle: &Puzzle) -> QueensModel {
    let n = puzzle.n();
    let mut constraints = Vec::with_capacity(2 * n);

    // One queen per column (one per row is implied by the encoding).
    constraints.push(Constraint::AllDifferent {
        rows: (0..n).collect(),
    });

    // No queens at cell distance 1: consecutive rows must differ in
    // column by more than 1.
    for row in 0..n.saturating_sub(1) {
        constraints.push(Constraint::MinColumnGap {
            row_a: row,
            row_b: row + 1,
            gap: 1,
        });
    }

    // One queen per color region.
    for cells in puzzle.regions().into_values() {
        constraints.push(Constraint::ExactlyOne {
            cells: cells.into_vec(),
        });
    }

    QueensModel::new(n, constraints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Puzzle;

    const BOARD_4X4: &str = "2,0,1,1\n1,2,2,1\n2,2,3,3\n2,2,3,3\n";

    #[test]
    fn test_build_model_constraint_counts() {
        let puzzle = Puzzle::from_text("t", BOARD_4X4).unwrap();
        let model = build_model(&puzzle);

        assert_eq!(model.n(), 4);
        // 1 all-different + 3 row gaps + 4 regions.
        assert_eq!(model.constraint_count(), 8);
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_region_group_per_region() {
        let puzzle = Puzzle::from_text("t", BOARD_4X4).unwrap();
        let model = build_model(&puzzle);

        let groups: Vec<_> = model
            .constraints()
            .iter()
            .filter(|c| matches!(c, Constraint::ExactlyOne { .. }))
            .collect();
        assert_eq!(groups.len(), 4);
    }

    #[test]
    fn test_validate_rejects_out_of_range_row() {
        let model = QueensModel::new(
            2,
            vec![
                Constraint::AllDifferent { rows: vec![0, 5] },
                Constraint::ExactlyOne { cells: vec![(0, 0)] },
                Constraint::ExactlyOne { cells: vec![(1, 1)] },
            ],
        );
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_region_count_mismatch() {
        // 2x2 board with a single region cannot hold one queen per row.
        let puzzle = Puzzle::from_text("t", "0,0\n0,0\n").unwrap();
        let model = build_model(&puzzle);
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_self_gap() {
        let model = QueensModel::new(
            1,
            vec![
                Constraint::ExactlyOne { cells: vec![(0, 0)] },
                Constraint::MinColumnGap {
                    row_a: 0,
                    row_b: 0,
                    gap: 1,
                },
            ],
        );
        assert!(model.validate().is_err());
    }
}

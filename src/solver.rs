//! Depth-first search with forward checking over a queens model.
//!
//! Rows are assigned in order. Column domains are per-row `u64` bitmasks;
//! every assignment propagates into later rows (all-different removes the
//! taken column, the adjacency gap blanks the neighbouring span, a
//! satisfied region removes its remaining cells) and a wiped-out domain or
//! a region left without candidates backtracks immediately.

use std::time::{Duration, Instant};

use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::model::{build_model, Constraint, QueensModel};
use crate::puzzle::{Cell, Puzzle, Solution};

/// Search configuration.
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Keep searching after the first solution and report the total count.
    /// Dataset puzzles are single-solution; a count above one indicates a
    /// modeling bug or a malformed board.
    pub count_all: bool,
    /// Abort after this many search nodes (0 = unbounded).
    pub node_limit: usize,
}

/// Outcome of one solve call.
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub solution: Solution,
    /// Number of solutions found; 1 unless [`SolverConfig::count_all`] is
    /// set, in which case it is the exact total.
    pub solutions_found: usize,
    pub nodes_explored: usize,
    pub elapsed: Duration,
}

/// Raw search result, before the driver turns "no solution" into an error.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub first: Option<Vec<u16>>,
    pub solutions: usize,
    pub nodes: usize,
    pub truncated: bool,
}

/// Builds the model for a puzzle, validates it, and runs the search.
///
/// Returns an error when the model is inconsistent, when the search space
/// is exhausted without a solution, or when the node limit cuts the search
/// short. Finding more than one solution is reported in the result and
/// logged as a warning.
pub fn solve(puzzle: &Puzzle, config: &SolverConfig) -> Result<SolveReport> {
    let start = Instant::now();
    let model = build_model(puzzle);
    model.validate()?;

    let outcome = solve_model(&model, config);
    let elapsed = start.elapsed();

    match outcome.first {
        Some(columns) => {
            if outcome.solutions > 1 {
                log::warn!(
                    "{}: {} solutions found, expected exactly one",
                    puzzle.id(),
                    outcome.solutions
                );
            }
            Ok(SolveReport {
                solution: Solution::new(columns),
                solutions_found: outcome.solutions,
                nodes_explored: outcome.nodes,
                elapsed,
            })
        }
        None if outcome.truncated => Err(Error::SearchLimit {
            id: puzzle.id().to_string(),
            nodes: outcome.nodes,
        }),
        None => Err(Error::Unsolvable {
            id: puzzle.id().to_string(),
        }),
    }
}

/// Runs the search over an already-built model.
pub fn solve_model(model: &QueensModel, config: &SolverConfig) -> SearchOutcome {
    Engine::new(model, config).run()
}

struct Engine<'m> {
    n: usize,
    all_diff: Vec<&'m [usize]>,
    gaps: Vec<(usize, usize, u16)>,
    groups: Vec<&'m [Cell]>,
    /// Region group index per cell, row-major.
    cell_group: Vec<Option<usize>>,
    config: &'m SolverConfig,
}

impl<'m> Engine<'m> {
    fn new(model: &'m QueensModel, config: &'m SolverConfig) -> Self {
        let n = model.n();
        let mut all_diff = Vec::new();
        let mut gaps = Vec::new();
        let mut groups = Vec::new();
        for constraint in model.constraints() {
            match constraint {
                Constraint::AllDifferent { rows } => all_diff.push(rows.as_slice()),
                Constraint::MinColumnGap { row_a, row_b, gap } => {
                    gaps.push((*row_a, *row_b, *gap));
                }
                Constraint::ExactlyOne { cells } => groups.push(cells.as_slice()),
            }
        }

        let mut cell_group = vec![None; n * n];
        for (g, cells) in groups.iter().enumerate() {
            for &(row, col) in *cells {
                cell_group[row * n + col] = Some(g);
            }
        }

        Engine {
            n,
            all_diff,
            gaps,
            groups,
            cell_group,
            config,
        }
    }

    fn run(&self) -> SearchOutcome {
        let domains: SmallVec<[u64; 16]> = smallvec::smallvec![full_mask(self.n); self.n];
        let has_queen: SmallVec<[bool; 16]> = smallvec::smallvec![false; self.groups.len()];
        let mut columns = Vec::with_capacity(self.n);
        let mut out = SearchOutcome::default();
        self.dfs(0, &domains, &has_queen, &mut columns, &mut out);
        out
    }

    /// Returns `true` when the search should stop.
    fn dfs(
        &self,
        row: usize,
        domains: &[u64],
        has_queen: &[bool],
        columns: &mut Vec<u16>,
        out: &mut SearchOutcome,
    ) -> bool {
        if row == self.n {
            out.solutions += 1;
            if out.first.is_none() {
                out.first = Some(columns.clone());
            }
            return !self.config.count_all;
        }

        let mut bits = domains[row];
        while bits != 0 {
            let col = bits.trailing_zeros() as u16;
            bits &= bits - 1;

            out.nodes += 1;
            if self.config.node_limit > 0 && out.nodes > self.config.node_limit {
                out.truncated = true;
                return true;
            }

            let mut next_domains: SmallVec<[u64; 16]> = SmallVec::from_slice(domains);
            let mut next_queens: SmallVec<[bool; 16]> = SmallVec::from_slice(has_queen);
            if !self.assign(row, col, &mut next_domains, &mut next_queens) {
                continue;
            }

            columns.push(col);
            let stop = self.dfs(row + 1, &next_domains, &next_queens, columns, out);
            columns.pop();
            if stop {
                return true;
            }
        }
        false
    }

    /// Places a queen at `(row, col)` and forward-checks the later rows.
    /// Returns `false` on a dead end.
    fn assign(
        &self,
        row: usize,
        col: u16,
        domains: &mut [u64],
        has_queen: &mut [bool],
    ) -> bool {
        domains[row] = 1u64 << col;

        for rows in &self.all_diff {
            if rows.contains(&row) {
                for &other in rows.iter() {
                    if other > row {
                        domains[other] &= !(1u64 << col);
                    }
                }
            }
        }

        for &(row_a, row_b, gap) in &self.gaps {
            let other = if row_a == row {
                row_b
            } else if row_b == row {
                row_a
            } else {
                continue;
            };
            if other > row {
                domains[other] &= !span_mask(col, gap, self.n);
            }
        }

        if let Some(g) = self.cell_group[row * self.n + col as usize] {
            has_queen[g] = true;
            for &(other_row, other_col) in self.groups[g] {
                if other_row > row {
                    domains[other_row] &= !(1u64 << other_col);
                }
            }
        }

        for &domain in domains.iter().skip(row + 1) {
            if domain == 0 {
                return false;
            }
        }

        for (g, cells) in self.groups.iter().enumerate() {
            if has_queen[g] {
                continue;
            }
            let live = cells
                .iter()
                .any(|&(r, c)| r > row && domains[r] & (1u64 << c) != 0);
            if !live {
                return false;
            }
        }

        true
    }
}

fn full_mask(n: usize) -> u64 {
    if n >= 64 {
        u64::MAX
    } else {
        (1u64 << n) - 1
    }
}

/// Bits `col - gap ..= col + gap`, clamped to the board.
fn span_mask(col: u16, gap: u16, n: usize) -> u64 {
    let lo = col.saturating_sub(gap) as usize;
    let hi = ((col + gap) as usize).min(n - 1);
    let width = hi - lo + 1;
    if width >= 64 {
        full_mask(n)
    } else {
        ((1u64 << width) - 1) << lo
    }
}

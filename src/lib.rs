//! Constraint-based solver for LinkedIn Queens puzzles.
//!
//! Boards are plain-text grids of color-region ids. Each board is parsed,
//! transcribed into a small finite-domain constraint model (all-different
//! columns, one queen per region, no adjacent queens), solved by the
//! in-crate backtracking search, and rendered back out as a marked-up text
//! grid and a PNG.

pub mod batch;
pub mod error;
pub mod model;
pub mod puzzle;
pub mod render;
pub mod solver;

// Re-export main types
pub use batch::{solve_one, BatchRunner, BatchSummary, OutputPaths, PuzzleReport};
pub use error::{Error, Result};
pub use model::{build_model, Constraint, QueensModel};
pub use puzzle::{Cell, Puzzle, RegionId, Solution};
pub use render::{parse_queen_columns, render_image, solution_grid};
pub use solver::{solve, solve_model, SolveReport, SolverConfig};

//! Per-puzzle driver and sequential batch runner.
//!
//! A batch iterates the `.txt` boards of a directory in sorted order,
//! yielding one report per file. A failing puzzle is logged and counted;
//! the batch carries on. The summary reports aggregate throughput as
//! puzzles per second.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::puzzle::Puzzle;
use crate::render;
use crate::solver::{solve, SolveReport, SolverConfig};

/// Where to write a puzzle's artifacts. `None` skips that artifact.
#[derive(Debug, Clone, Default)]
pub struct OutputPaths {
    pub text: Option<PathBuf>,
    pub image: Option<PathBuf>,
}

impl OutputPaths {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Parses, solves, and renders a single board file.
pub fn solve_one(
    path: &Path,
    config: &SolverConfig,
    outputs: &OutputPaths,
) -> Result<(Puzzle, SolveReport)> {
    let puzzle = Puzzle::from_file(path)?;
    let report = solve(&puzzle, config)?;
    log::debug!(
        "{}: solved in {:?} ({} nodes)",
        puzzle.id(),
        report.elapsed,
        report.nodes_explored
    );

    if let Some(text) = &outputs.text {
        render::write_solution_text(text, &puzzle, &report.solution)?;
        log::info!("{}: wrote {}", puzzle.id(), text.display());
    }
    if let Some(image) = &outputs.image {
        render::save_image(image, &puzzle, &report.solution)?;
        log::info!("{}: wrote {}", puzzle.id(), image.display());
    }

    Ok((puzzle, report))
}

/// One entry in a batch: puzzle id, solve outcome, and wall-clock time for
/// the whole parse-solve-render pipeline.
#[derive(Debug)]
pub struct PuzzleReport {
    pub id: String,
    pub outcome: Result<SolveReport>,
    pub elapsed: Duration,
}

/// Aggregated batch statistics.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub puzzles: usize,
    pub solved: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl BatchSummary {
    /// Solved puzzles per second of wall-clock time.
    pub fn puzzles_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.solved as f64 / secs
        } else {
            0.0
        }
    }
}

/// Sequential runner over a directory of board files.
#[derive(Debug)]
pub struct BatchRunner {
    files: Vec<PathBuf>,
    solver: SolverConfig,
    out_dir: Option<PathBuf>,
}

impl BatchRunner {
    /// Collects the `.txt` files of `dir` in sorted order. When `out_dir`
    /// is set, each puzzle writes `<stem>.txt` and `<stem>.png` there.
    pub fn new(dir: &Path, solver: SolverConfig, out_dir: Option<PathBuf>) -> Result<Self> {
        let mut files = Vec::new();
        for entry in dir.read_dir().map_err(|e| Error::io(dir, e))? {
            let entry = entry.map_err(|e| Error::io(dir, e))?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "txt") {
                files.push(path);
            }
        }
        files.sort();

        Ok(Self {
            files,
            solver,
            out_dir,
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Lazily solves the batch, one report per file. Restartable: each call
    /// walks the file list from the start.
    pub fn reports(&self) -> impl Iterator<Item = PuzzleReport> + '_ {
        self.files.iter().map(move |path| {
            let started = Instant::now();
            let id = file_stem_id(path);
            let outputs = match &self.out_dir {
                Some(dir) => OutputPaths {
                    text: Some(dir.join(format!("{id}.txt"))),
                    image: Some(dir.join(format!("{id}.png"))),
                },
                None => OutputPaths::none(),
            };
            let outcome = solve_one(path, &self.solver, &outputs).map(|(_, report)| report);
            PuzzleReport {
                id,
                outcome,
                elapsed: started.elapsed(),
            }
        })
    }

    /// Consumes the reports, logging failures, and aggregates the summary.
    pub fn run(&self) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for report in self.reports() {
            summary.puzzles += 1;
            summary.elapsed += report.elapsed;
            match &report.outcome {
                Ok(solved) => {
                    summary.solved += 1;
                    log::debug!(
                        "{}: {} nodes in {:?}",
                        report.id,
                        solved.nodes_explored,
                        solved.elapsed
                    );
                }
                Err(err) => {
                    summary.failed += 1;
                    log::error!("{}: {err}", report.id);
                }
            }
        }
        summary
    }
}

pub(crate) fn file_stem_id(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("puzzle")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const BOARD_4X4: &str = "2,0,1,1\n1,2,2,1\n2,2,3,3\n2,2,3,3\n";
    const BOARD_STRIPED: &str = "0,1,2,3\n0,1,2,3\n0,1,2,3\n0,1,2,3\n";

    #[test]
    fn test_solve_one_writes_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let board = dir.path().join("170.txt");
        fs::write(&board, BOARD_4X4).unwrap();

        let outputs = OutputPaths {
            text: Some(dir.path().join("out/170.txt")),
            image: Some(dir.path().join("out/170.png")),
        };
        let (puzzle, report) =
            solve_one(&board, &SolverConfig::default(), &outputs).unwrap();

        assert_eq!(puzzle.id(), "170");
        assert_eq!(report.solution.columns(), &[1, 3, 0, 2]);
        assert!(outputs.text.as_ref().unwrap().exists());
        assert!(outputs.image.as_ref().unwrap().exists());
    }

    #[test]
    fn test_batch_produces_artifact_per_puzzle() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("1.txt"), BOARD_4X4).unwrap();
        fs::write(dir.path().join("2.txt"), BOARD_STRIPED).unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();
        let out_dir = dir.path().join("out");

        let runner = BatchRunner::new(
            dir.path(),
            SolverConfig::default(),
            Some(out_dir.clone()),
        )
        .unwrap();
        assert_eq!(runner.len(), 2);

        let summary = runner.run();
        assert_eq!(summary.puzzles, 2);
        assert_eq!(summary.solved, 2);
        assert_eq!(summary.failed, 0);

        for stem in ["1", "2"] {
            assert!(out_dir.join(format!("{stem}.txt")).exists());
            assert!(out_dir.join(format!("{stem}.png")).exists());
        }
    }

    #[test]
    fn test_batch_skips_failures_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.txt"), "0,1\n0,1,2\n").unwrap();
        fs::write(dir.path().join("good.txt"), BOARD_4X4).unwrap();

        let runner = BatchRunner::new(dir.path(), SolverConfig::default(), None).unwrap();
        let summary = runner.run();

        assert_eq!(summary.puzzles, 2);
        assert_eq!(summary.solved, 1);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn test_reports_iterator_is_restartable() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("1.txt"), BOARD_4X4).unwrap();

        let runner = BatchRunner::new(dir.path(), SolverConfig::default(), None).unwrap();
        assert_eq!(runner.reports().count(), 1);
        assert_eq!(runner.reports().count(), 1);
    }

    #[test]
    fn test_summary_consistent_with_reports() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("1.txt"), BOARD_4X4).unwrap();
        fs::write(dir.path().join("2.txt"), BOARD_4X4).unwrap();

        let runner = BatchRunner::new(dir.path(), SolverConfig::default(), None).unwrap();
        let per_puzzle: Duration = runner.reports().map(|r| r.elapsed).sum();
        let summary = runner.run();

        assert_eq!(summary.puzzles, 2);
        // Two sequential passes over the same two boards; both totals are
        // sums of per-puzzle timings.
        assert!(per_puzzle > Duration::ZERO);
        assert!(summary.elapsed > Duration::ZERO);
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let runner = BatchRunner::new(dir.path(), SolverConfig::default(), None).unwrap();
        assert!(runner.is_empty());

        let summary = runner.run();
        assert_eq!(summary.puzzles, 0);
        assert_eq!(summary.puzzles_per_second(), 0.0);
    }
}

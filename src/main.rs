//! CLI entry point for the queens solver.
//!
//! Usage:
//!   queens-solver solve <puzzle.txt> [options]
//!   queens-solver batch <dir> [options]
//!
//! Options:
//!   --image <path>      Solution PNG path (solve; default ./outputs/<stem>.png)
//!   --text <path>       Solution text path (solve; default ./outputs/<stem>.txt)
//!   --out-dir <dir>     Artifact directory (batch; default ./outputs)
//!   --no-save           Skip writing output artifacts
//!   --count-all         Count every solution instead of stopping at the first
//!   --node-limit <n>    Abort search after n nodes (default: unbounded)
//!   --verbose           Debug-level logging

mod batch;
mod error;
mod model;
mod puzzle;
mod render;
mod solver;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use batch::{file_stem_id, solve_one, BatchRunner, BatchSummary, OutputPaths};
use error::Result;
use solver::SolverConfig;

#[derive(Parser)]
#[command(name = "queens-solver")]
#[command(about = "Constraint-based solver for LinkedIn Queens puzzles")]
#[command(version)]
struct Cli {
    /// Debug-level logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a single board file
    Solve {
        /// Path to the board text file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Where to write the solution image
        #[arg(long)]
        image: Option<PathBuf>,

        /// Where to write the solution text grid
        #[arg(long)]
        text: Option<PathBuf>,

        /// Skip writing output artifacts
        #[arg(long)]
        no_save: bool,

        /// Keep searching and report the total number of solutions
        #[arg(long)]
        count_all: bool,

        /// Abort search after this many nodes (0 = unbounded)
        #[arg(long, default_value = "0")]
        node_limit: usize,
    },

    /// Solve every .txt board in a directory
    Batch {
        /// Directory of board text files
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Directory for solution artifacts
        #[arg(long, default_value = "./outputs")]
        out_dir: PathBuf,

        /// Skip writing output artifacts
        #[arg(long)]
        no_save: bool,

        /// Keep searching and report the total number of solutions
        #[arg(long)]
        count_all: bool,

        /// Abort search after this many nodes per puzzle (0 = unbounded)
        #[arg(long, default_value = "0")]
        node_limit: usize,
    },
}

/// Output format for a single solve
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    id: String,
    n: usize,
    columns: Vec<u16>,
    solutions_found: usize,
    nodes_explored: usize,
    time_elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_path: Option<String>,
}

/// Output format for a batch run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchOutput {
    puzzles: usize,
    solved: usize,
    failed: usize,
    time_elapsed_ms: u64,
    puzzles_per_second: f64,
}

fn main() {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    match run(cli.command) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn run(command: Commands) -> Result<i32> {
    match command {
        Commands::Solve {
            file,
            image,
            text,
            no_save,
            count_all,
            node_limit,
        } => {
            let config = SolverConfig {
                count_all,
                node_limit,
            };

            let outputs = if no_save {
                OutputPaths::none()
            } else {
                let stem = file_stem_id(&file);
                let out_dir = PathBuf::from("./outputs");
                OutputPaths {
                    text: Some(text.unwrap_or_else(|| out_dir.join(format!("{stem}.txt")))),
                    image: Some(image.unwrap_or_else(|| out_dir.join(format!("{stem}.png")))),
                }
            };

            let (puzzle, report) = solve_one(&file, &config, &outputs)?;

            let output = SolveOutput {
                id: puzzle.id().to_string(),
                n: puzzle.n(),
                columns: report.solution.columns().to_vec(),
                solutions_found: report.solutions_found,
                nodes_explored: report.nodes_explored,
                time_elapsed_ms: report.elapsed.as_millis() as u64,
                text_path: outputs.text.map(|p| p.display().to_string()),
                image_path: outputs.image.map(|p| p.display().to_string()),
            };
            println!("{}", serde_json::to_string_pretty(&output).unwrap());

            Ok(0)
        }

        Commands::Batch {
            dir,
            out_dir,
            no_save,
            count_all,
            node_limit,
        } => {
            let config = SolverConfig {
                count_all,
                node_limit,
            };
            let out_dir = if no_save { None } else { Some(out_dir) };

            let runner = BatchRunner::new(&dir, config, out_dir)?;
            let summary = runner.run();

            println!("{}", serde_json::to_string_pretty(&format_summary(&summary)).unwrap());

            Ok(if summary.failed == 0 { 0 } else { 1 })
        }
    }
}

fn format_summary(summary: &BatchSummary) -> BatchOutput {
    BatchOutput {
        puzzles: summary.puzzles,
        solved: summary.solved,
        failed: summary.failed,
        time_elapsed_ms: summary.elapsed.as_millis() as u64,
        puzzles_per_second: summary.puzzles_per_second(),
    }
}

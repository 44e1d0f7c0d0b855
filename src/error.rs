//! Crate-wide error type.
//!
//! Follows the taxonomy of the pipeline: parse, model, solve, render, I/O.
//! None of these are recovered internally; they abort the current puzzle
//! and bubble up to the caller.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed puzzle text.
    #[error("{id}: {reason}")]
    Parse { id: String, reason: String },

    /// The constraint model references variables or cells out of range,
    /// or the region structure cannot pin one queen per region.
    #[error("invalid model: {0}")]
    Model(String),

    /// The search space was exhausted without finding a solution.
    #[error("{id}: no solution exists")]
    Unsolvable { id: String },

    /// The node limit was hit before any solution was found.
    #[error("{id}: search stopped after {nodes} nodes without a solution")]
    SearchLimit { id: String, nodes: usize },

    /// A board cannot be drawn (unknown region color, canvas too small,
    /// malformed solution grid).
    #[error("render: {0}")]
    Render(String),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl Error {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

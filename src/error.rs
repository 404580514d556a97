//! Fatal errors: anything here aborts the run with a non-zero exit.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
    /// The raw dataset could not be read from disk.
    #[error("cannot read input file {path}: {source}")]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The raw dataset is not valid JSON or breaks the input contract.
    #[error("invalid input file {path}: {source}")]
    InputInvalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The store could not be opened or its schema created.
    #[error("store unavailable: {0:#}")]
    StoreUnavailable(anyhow::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

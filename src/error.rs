//! Error taxonomy for a reconciliation run.
//!
//! Two tiers: [`RunError`] aborts the whole run (there is nothing
//! meaningful to diff without a base locale), while [`LocaleError`] is
//! caught at the orchestrator boundary and recorded as that locale's
//! failure without touching its siblings.

use std::path::PathBuf;

use thiserror::Error;

use crate::provider::ProviderError;

/// Fatal errors that abort the run before or after locale processing.
#[derive(Error, Debug)]
pub enum RunError {
    /// The base locale file does not exist in the input directory.
    #[error("base locale file not found: {path}")]
    BaseFileMissing { path: PathBuf },

    /// The base locale file could not be read.
    #[error("failed to read base locale file {path}: {source}")]
    BaseFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The base locale file is not valid JSON.
    #[error("failed to parse base locale file {path}: {source}")]
    BaseFileParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The output subdirectory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The final report could not be written.
    #[error("failed to write report {path}: {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors scoped to a single target locale's pipeline.
#[derive(Error, Debug)]
pub enum LocaleError {
    /// The target locale file could not be read.
    #[error("failed to read locale file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The target locale file is not valid JSON.
    #[error("failed to parse locale file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The translation provider call failed (network, quota, auth).
    #[error("translation provider failed: {0}")]
    Provider(#[from] ProviderError),

    /// A source value contains the batch delimiter and would silently
    /// shift every translation after it.
    #[error("value for key '{key}' contains the batch delimiter")]
    DelimiterInValue { key: String },

    /// The provider returned a different number of items than were sent.
    #[error("batch misaligned: sent {sent} values, received {received} translations")]
    BatchMisaligned { sent: usize, received: usize },

    /// An intermediate path segment is occupied by a leaf value.
    #[error("structural conflict at '{path}': segment holds a non-object value")]
    StructuralConflict { path: String },

    /// The rehydrated tree could not be written out.
    #[error("failed to write locale file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

//! OCR collaborator seam.
//!
//! The extraction logic itself (CGPA, certificate category, domain scoring)
//! lives in an external script. This module only hands it a file and reads
//! back untrusted JSON.

pub mod ocr;
pub mod process;
pub mod types;

pub use ocr::*;
pub use process::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to start OCR process {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("OCR process timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("OCR process exited with {code:?}: {stderr}")]
    ProcessFailed { code: Option<i32>, stderr: String },

    #[error("OCR output is not valid JSON: {0}")]
    InvalidOutput(#[from] serde_json::Error),

    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),
}

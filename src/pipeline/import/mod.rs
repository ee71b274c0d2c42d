pub mod format;
pub mod importer;

pub use format::*;
pub use importer::*;

use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("No file uploaded")]
    EmptyFile,

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("File too large: {size_mb:.1}MB exceeds {max_mb:.1}MB limit")]
    FileTooLarge { size_mb: f64, max_mb: f64 },

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

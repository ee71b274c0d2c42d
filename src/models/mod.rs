pub mod account;
pub mod document;
pub mod enums;
pub mod student;

pub use account::*;
pub use document::*;
pub use enums::*;
pub use student::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid {field} value: {value}")]
    InvalidEnum { field: String, value: String },
}

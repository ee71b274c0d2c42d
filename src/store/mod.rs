//! In-memory stores. Contents are lost on restart.
//!
//! Each store is constructed once per process and shared by handle.
//! Mutations take the write lock, so concurrent uploads never lose appends.

pub mod accounts;
pub mod documents;

pub use accounts::{AccountStore, DEMO_PASSWORD};
pub use documents::{DocumentStore, StudentQuery};

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store lock poisoned")]
    LockPoisoned,

    #[error("Document not found: {0}")]
    DocumentNotFound(Uuid),

    #[error("Account already exists: {0}")]
    AccountExists(String),

    #[error("Invalid account: {0}")]
    InvalidAccount(String),

    #[error("Invalid credentials")]
    InvalidCredentials,
}

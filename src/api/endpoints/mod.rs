//! API endpoint handlers.
//!
//! One module per portal area. Handlers stay thin: parsing and status
//! mapping here, behavior in `pipeline` and `store`.

pub mod auth;
pub mod documents;
pub mod health;
pub mod merit;
pub mod students;

//! API middleware.
//!
//! Only request logging; the portal issues no tokens to validate.

pub mod audit;

pub mod export;
pub mod extraction;
pub mod import;
pub mod ranking;
pub mod scoring;

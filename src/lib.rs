// src/lib.rs
pub mod duck;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod output;

pub use error::ScrapeError;

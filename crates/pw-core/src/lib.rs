//! pw-core: shared types, errors, and configuration.
//!
//! This crate is the foundational dependency for the other pw-* crates,
//! providing the [`Photo`] model, a unified error type, filename
//! sanitizing for the upload directory, and application configuration.

pub mod config;
pub mod error;
pub mod filename;
pub mod photo;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use photo::{Photo, PhotoId};

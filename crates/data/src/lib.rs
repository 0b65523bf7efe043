//! Data storage and bundled datasets for the totals model.
//!
//! This crate provides:
//! - CSV game log reading and writing
//! - JSON adjustment context files and a file-backed context provider
//! - A built-in fallback game log
//! - A seeded synthetic league generator

pub mod context_file;
pub mod csv_storage;
pub mod error;
pub mod fallback;
pub mod synthetic;

pub use context_file::{load_context, save_context, FileContextProvider};
pub use csv_storage::CsvStorage;
pub use error::DataFileError;
pub use fallback::fallback_games;
pub use synthetic::{generate_games, synthetic_teams, SyntheticConfig};

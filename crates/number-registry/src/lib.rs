//! Local registry of claimed disposable numbers.
//!
//! Numbers live in a single JSON array (`db.json`) in the registry
//! directory. Positions in that array are the only way to address an entry
//! and shift whenever an earlier entry is removed.

mod error;
mod store;

pub use error::RegistryError;
pub use store::{appended, resolve_dir, without, NumberRegistry, DB_FILE_NAME, DEFAULT_DIR_NAME};

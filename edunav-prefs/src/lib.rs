//! # edunav-prefs - Durable Preference Storage
//!
//! A small key/value store that survives across sessions, in the spirit of a
//! browser's local storage: string keys, string values, read once at startup
//! and written on every mutation.
//!
//! ## Key Features
//! - `KeyValueStore` trait so callers can swap the backing store in tests
//! - In-memory store for tests and ephemeral sessions
//! - File store with crash-safe saves (temp file + rename) and a backup copy
//! - Corrupt files degrade to an empty store instead of failing startup

pub mod error;
pub mod persistence;
pub mod store;

pub use error::{PrefError, PrefResult};
pub use persistence::{FileStore, PersistenceConfig};
pub use store::{KeyValueStore, MemoryStore};

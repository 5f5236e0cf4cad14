//! LMDB storage backend for the curio ledger.
//!
//! Implements the `curio-store` traits using the `heed` LMDB bindings.
//! Records and their three secondary indexes live as named databases within
//! a single environment, so every mutation commits as one write transaction.

pub mod environment;
pub mod error;
pub mod records;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use records::LmdbRecordStore;

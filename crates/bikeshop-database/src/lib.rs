//! # bikeshop-database
//!
//! SQLite connection management, embedded migrations and concrete
//! repository implementations for all bike shop entities.
//!
//! Lookups that miss return `Ok(None)`; only genuine I/O or constraint
//! failures surface as errors.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;

//! Shared type definitions used across the workspace.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};

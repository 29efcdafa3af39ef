//! dockaff-common — Shared types and errors used across all dockaff crates.

pub mod error;
pub mod structure;

// Re-export commonly used types
pub use error::{DockaffError, Result};
pub use structure::{StructureFile, StructureRole};

//! Literal encoding, destination table layouts, and upsert statement output.

pub mod literal;
pub mod table;
pub mod writer;

pub use literal::SqlValue;
pub use table::{TableSpec, row_values};
pub use writer::{ArtifactStats, UpsertWriter, write_artifact};

pub mod args;
pub mod classify;
pub mod code_system;
pub mod common;
pub mod constants;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod progress;
pub mod readers;
pub mod record;
pub mod schema_map;
pub mod sql;
pub mod summary;

//! Application layer: request validation, query execution and result encoding.

pub mod encode;
pub mod error;
pub mod format;
pub mod query;
pub mod sync;

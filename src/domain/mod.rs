//! Domain layer: result model, type inference and the VOTable document tree.

pub mod column;
pub mod error;
pub mod result;
pub mod value;
pub mod votable;

pub use column::{ColumnDescriptor, Datatype};
pub use error::DomainError;
pub use result::ResultSet;
pub use value::Value;

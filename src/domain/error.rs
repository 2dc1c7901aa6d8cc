use thiserror::Error;

use super::column::Datatype;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("inconsistent column type in `{column}`: expected {expected}, found {found}")]
    InconsistentColumn {
        column: String,
        expected: Datatype,
        found: Datatype,
    },
}

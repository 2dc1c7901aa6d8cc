use crate::application::query::QueryError;

/// Keep the database's own wording so it reaches the error document unchanged.
pub fn map_sqlx_error(err: sqlx::Error) -> QueryError {
    match err {
        sqlx::Error::Database(db) => QueryError::Database(db.message().to_string()),
        sqlx::Error::ColumnDecode { index, source } => QueryError::Decode {
            column: index,
            message: source.to_string(),
        },
        other => QueryError::Database(other.to_string()),
    }
}

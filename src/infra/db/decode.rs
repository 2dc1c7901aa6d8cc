//! Postgres row decoding into canonical values.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde_json::Value as JsonValue;
use sqlx::{Column, Row, TypeInfo, postgres::PgRow};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339,
    macros::format_description,
};
use uuid::Uuid;

use crate::{application::query::QueryError, domain::Value};

/// Column name and value pairs in the order the database returned them.
pub fn decode_row(row: &PgRow) -> Result<Vec<(String, Value)>, QueryError> {
    row.columns()
        .iter()
        .map(|column| {
            let name = column.name();
            let value = decode_column(row, column.ordinal(), name, column.type_info().name())?;
            Ok((name.to_string(), value))
        })
        .collect()
}

fn decode_column(
    row: &PgRow,
    index: usize,
    column: &str,
    type_name: &str,
) -> Result<Value, QueryError> {
    let value = match type_name {
        "BOOL" => Value::from(get::<bool>(row, index, column)?),
        "\"CHAR\"" => Value::from(get::<i8>(row, index, column)?),
        "INT2" => Value::from(get::<i16>(row, index, column)?),
        "INT4" => Value::from(get::<i32>(row, index, column)?),
        "INT8" => Value::from(get::<i64>(row, index, column)?),
        "FLOAT4" => Value::from(get::<f32>(row, index, column)?),
        "FLOAT8" => Value::from(get::<f64>(row, index, column)?),
        "NUMERIC" => match get::<Decimal>(row, index, column)? {
            Some(decimal) => Value::Double(numeric_to_double(decimal, column)?),
            None => Value::Null,
        },
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => Value::from(get::<String>(row, index, column)?),
        "UUID" => Value::from(get::<Uuid>(row, index, column)?.map(|id| id.to_string())),
        "JSON" | "JSONB" => {
            Value::from(get::<JsonValue>(row, index, column)?.map(|json| json.to_string()))
        }
        "DATE" => Value::from(get::<Date>(row, index, column)?.map(|date| date.to_string())),
        "TIMESTAMP" => match get::<PrimitiveDateTime>(row, index, column)? {
            Some(timestamp) => Value::Text(format_timestamp(timestamp, column)?),
            None => Value::Null,
        },
        "TIMESTAMPTZ" => match get::<OffsetDateTime>(row, index, column)? {
            Some(timestamp) => Value::Text(
                timestamp
                    .format(&Rfc3339)
                    .map_err(|err| decode_error(column, err))?,
            ),
            None => Value::Null,
        },
        other => {
            return Err(QueryError::UnsupportedType {
                column: column.to_string(),
                type_name: other.to_string(),
            });
        }
    };
    Ok(value)
}

fn get<'r, T>(row: &'r PgRow, index: usize, column: &str) -> Result<Option<T>, QueryError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get::<Option<T>, _>(index)
        .map_err(|err| decode_error(column, err))
}

fn numeric_to_double(decimal: Decimal, column: &str) -> Result<f64, QueryError> {
    decimal
        .to_f64()
        .ok_or_else(|| decode_error(column, format!("numeric {decimal} does not fit a double")))
}

fn format_timestamp(timestamp: PrimitiveDateTime, column: &str) -> Result<String, QueryError> {
    timestamp
        .format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]"
        ))
        .map_err(|err| decode_error(column, err))
}

fn decode_error(column: &str, err: impl std::fmt::Display) -> QueryError {
    QueryError::Decode {
        column: column.to_string(),
        message: err.to_string(),
    }
}

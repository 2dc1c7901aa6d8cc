//! CSV and TSV encoding through one delimiter-parameterised writer.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::{application::error::TapError, domain::ResultSet};

pub const COMMA: u8 = b',';
pub const TAB: u8 = b'\t';

/// Header line of column names, then one line per row.
///
/// A result without columns produces an empty body.
pub fn encode(result: &ResultSet, delimiter: u8) -> Result<Vec<u8>, TapError> {
    if result.columns().is_empty() {
        return Ok(Vec::new());
    }

    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(Terminator::Any(b'\n'))
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(result.columns()).map_err(csv_error)?;
    for row in result.rows() {
        writer
            .write_record(row.iter().map(ToString::to_string))
            .map_err(csv_error)?;
    }

    writer
        .into_inner()
        .map_err(|err| TapError::Serialization(format!("failed to flush delimited output: {err}")))
}

fn csv_error(err: csv::Error) -> TapError {
    TapError::Serialization(format!("failed to write delimited output: {err}"))
}

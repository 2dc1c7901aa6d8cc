//! HTML table encoder.

use crate::{
    application::error::TapError,
    domain::ResultSet,
    presentation::views::{ResultsTemplate, render_template},
};

/// Columns follow the same alphabetical union as every other format; cells
/// missing from a row render empty.
pub fn encode(result: &ResultSet) -> Result<String, TapError> {
    render_template(&ResultsTemplate::from_result(result))
        .map_err(|err| TapError::Serialization(format!("{err}: {}", err.error)))
}

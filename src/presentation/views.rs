use askama::{Error as AskamaError, Template};
use thiserror::Error;

use crate::domain::ResultSet;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

/// One `<table>` with a header row and a row per result row.
#[derive(Template)]
#[template(path = "results.html")]
pub struct ResultsTemplate<'a> {
    pub columns: &'a [String],
    pub rows: Vec<Vec<String>>,
}

impl<'a> ResultsTemplate<'a> {
    pub fn from_result(result: &'a ResultSet) -> Self {
        let rows = result
            .rows()
            .iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect();
        Self {
            columns: result.columns(),
            rows,
        }
    }
}

pub fn render_template<T: Template>(template: &T) -> Result<String, TemplateRenderError> {
    template.render().map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
    })
}

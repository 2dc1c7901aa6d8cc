//! Output formats and FORMAT/RESPONSEFORMAT resolution.

use std::{fmt, str::FromStr};

use super::error::TapError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResponseFormat {
    #[default]
    VoTable,
    Csv,
    Tsv,
    Fits,
    Text,
    Html,
}

impl ResponseFormat {
    pub const ALL: [ResponseFormat; 6] = [
        ResponseFormat::VoTable,
        ResponseFormat::Csv,
        ResponseFormat::Tsv,
        ResponseFormat::Fits,
        ResponseFormat::Text,
        ResponseFormat::Html,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResponseFormat::VoTable => "votable",
            ResponseFormat::Csv => "csv",
            ResponseFormat::Tsv => "tsv",
            ResponseFormat::Fits => "fits",
            ResponseFormat::Text => "text",
            ResponseFormat::Html => "html",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ResponseFormat::VoTable => VOTABLE_CONTENT_TYPE,
            ResponseFormat::Csv => "text/csv",
            ResponseFormat::Tsv => "text/tab-separated-values",
            ResponseFormat::Fits => "application/fits",
            ResponseFormat::Text => "text/plain",
            ResponseFormat::Html => "text/html",
        }
    }

    /// Pick the output format from the two mutually exclusive parameters.
    ///
    /// Neither given selects VOTable. Both given is an error even when they
    /// agree.
    pub fn resolve(
        format: Option<&str>,
        response_format: Option<&str>,
    ) -> Result<Self, TapError> {
        match (format, response_format) {
            (Some(_), Some(_)) => Err(TapError::ConflictingFormatParams),
            (Some(name), None) | (None, Some(name)) => name.parse(),
            (None, None) => Ok(ResponseFormat::default()),
        }
    }
}

pub const VOTABLE_CONTENT_TYPE: &str = "application/x-votable+xml";

impl FromStr for ResponseFormat {
    type Err = TapError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ResponseFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == value)
            .ok_or_else(|| TapError::InvalidFormat(value.to_string()))
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

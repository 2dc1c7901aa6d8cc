//! VOTable document model.
//!
//! The tree has a fixed shape: one `RESOURCE` holding `INFO` elements and at
//! most one `TABLE`. Cell values are always text.

use super::column::{ColumnDescriptor, Datatype};
use super::result::ResultSet;

pub const VOTABLE_VERSION: &str = "1.4";
pub const VOTABLE_NAMESPACE: &str = "http://www.ivoa.net/xml/VOTable/v1.4";
pub const RESOURCE_TYPE: &str = "results";
pub const TABLE_NAME: &str = "results";
pub const TABLE_DESCRIPTION: &str = "Results of the query";

pub const QUERY_STATUS: &str = "QUERY_STATUS";
pub const ERROR_DETAIL: &str = "ERROR_DETAIL";
pub const ERROR_CODE: &str = "ERROR_CODE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoTable {
    pub version: String,
    pub xmlns: String,
    pub resource: Resource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub kind: String,
    pub infos: Vec<Info>,
    pub tables: Vec<Table>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Info {
    pub name: String,
    pub value: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<Field>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Field {
    pub name: String,
    pub datatype: String,
    pub arraysize: Option<String>,
    pub unit: Option<String>,
    pub description: Option<String>,
}

impl Info {
    pub fn with_value(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: Some(value.into()),
            description: None,
        }
    }

    pub fn with_description(name: &str, description: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: None,
            description: Some(description.into()),
        }
    }
}

impl From<&ColumnDescriptor> for Field {
    fn from(column: &ColumnDescriptor) -> Self {
        let arraysize = match (column.datatype, column.width) {
            (Datatype::Char, Some(width)) if width > 0 => Some(format!("{width}*")),
            _ => None,
        };
        Self {
            name: column.name.clone(),
            datatype: column.datatype.as_str().to_string(),
            arraysize,
            unit: None,
            description: None,
        }
    }
}

impl VoTable {
    fn with_resource(resource: Resource) -> Self {
        Self {
            version: VOTABLE_VERSION.to_string(),
            xmlns: VOTABLE_NAMESPACE.to_string(),
            resource,
        }
    }

    /// Successful result document: `QUERY_STATUS=OK` and one table.
    pub fn from_result(result: &ResultSet) -> Self {
        let fields = result.descriptors().iter().map(Field::from).collect();
        let rows = result
            .rows()
            .iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect();

        Self::with_resource(Resource {
            kind: RESOURCE_TYPE.to_string(),
            infos: vec![Info::with_value(QUERY_STATUS, "OK")],
            tables: vec![Table {
                name: TABLE_NAME.to_string(),
                description: Some(TABLE_DESCRIPTION.to_string()),
                fields,
                rows,
            }],
        })
    }

    /// Error document: status, detail and code, no table.
    pub fn error(detail: impl Into<String>, status: u16) -> Self {
        Self::with_resource(Resource {
            kind: RESOURCE_TYPE.to_string(),
            infos: vec![
                Info::with_value(QUERY_STATUS, "ERROR"),
                Info::with_description(ERROR_DETAIL, detail),
                Info::with_value(ERROR_CODE, status.to_string()),
            ],
            tables: Vec::new(),
        })
    }

    pub fn info(&self, name: &str) -> Option<&Info> {
        self.resource.infos.iter().find(|info| info.name == name)
    }

    pub fn table(&self) -> Option<&Table> {
        self.resource.tables.first()
    }
}

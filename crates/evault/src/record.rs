//! Case document records.
//!
//! A [`CaseRecord`] is one entry of the remote document collection. Every field
//! is optional: the collection is loosely typed and nothing guarantees a
//! document carries all of them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};

/// A field of a [`CaseRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Name of the case, e.g. "Smith v. Jones".
    CaseName,
    /// Case identifier.
    CaseId,
    /// Client name.
    Client,
    /// Presiding judge.
    Judge,
    /// Lawyer on the case.
    Lawyer,
    /// Address of whoever uploaded the document.
    UploaderAddress,
    /// Location of the PDF.
    DocumentUrl,
}

impl Field {
    /// Every field, in card order.
    pub const ALL: [Field; 7] = [
        Field::CaseName,
        Field::CaseId,
        Field::Client,
        Field::Judge,
        Field::Lawyer,
        Field::UploaderAddress,
        Field::DocumentUrl,
    ];

    /// Fields the search query is matched against.
    pub const SEARCHABLE: [Field; 3] = [Field::CaseName, Field::Lawyer, Field::Judge];

    /// Key of this field in a stored document.
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::CaseName => "caseName",
            Self::CaseId => "caseId",
            Self::Client => "client",
            Self::Judge => "judge",
            Self::Lawyer => "lawyer",
            Self::UploaderAddress => "address",
            Self::DocumentUrl => "pdfUrl",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// One case document as stored in the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    /// Name of the case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_name: Option<String>,

    /// Case identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_id: Option<String>,

    /// Client name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,

    /// Judge name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judge: Option<String>,

    /// Lawyer name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lawyer: Option<String>,

    /// Uploader address.
    #[serde(default, rename = "address", skip_serializing_if = "Option::is_none")]
    pub uploader_address: Option<String>,

    /// URL of the PDF document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
}

impl CaseRecord {
    /// Decode a record from the plain field map of a document.
    ///
    /// Absent and null fields become `None`. Numbers and booleans are kept in
    /// their textual form; any other shape is dropped.
    #[must_use]
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        let get = |field: Field| text_value(field, fields.get(field.wire_name()));
        Self {
            case_name: get(Field::CaseName),
            case_id: get(Field::CaseId),
            client: get(Field::Client),
            judge: get(Field::Judge),
            lawyer: get(Field::Lawyer),
            uploader_address: get(Field::UploaderAddress),
            pdf_url: get(Field::DocumentUrl),
        }
    }

    /// Get the value of a field, if present.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::CaseName => &self.case_name,
            Field::CaseId => &self.case_id,
            Field::Client => &self.client,
            Field::Judge => &self.judge,
            Field::Lawyer => &self.lawyer,
            Field::UploaderAddress => &self.uploader_address,
            Field::DocumentUrl => &self.pdf_url,
        };
        value.as_deref()
    }

    /// The document link of this record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingLink`] if the record has no `pdfUrl` or it is empty.
    pub fn document_link(&self) -> Result<&str> {
        self.pdf_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| Error::MissingLink {
                case_id: self.case_id.clone().unwrap_or_default(),
            })
    }

    /// Names of the fields this record lacks.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_none())
            .collect()
    }
}

fn text_value(field: Field, value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        other => {
            debug!(%field, kind = value_kind(other), "Ignoring non-text field");
            None
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

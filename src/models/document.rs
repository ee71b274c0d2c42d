use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use uuid::Uuid;

use super::enums::DocumentType;

/// Owner key for documents uploaded without an email.
pub const UNKNOWN_STUDENT_ID: &str = "unknown";
pub const UNKNOWN_STUDENT_NAME: &str = "Unknown Student";
/// Placeholder for roll number, course and year when the uploader omits them.
pub const MISSING_FIELD: &str = "-";

/// One uploaded file plus its OCR-derived fields and computed points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub file_name: String,
    pub extracted_data: ExtractedData,
    pub points: u32,
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_by: String,
    pub student_name: String,
    pub roll_no: String,
    pub course: String,
    pub year: String,
}

impl Document {
    /// Key used to group documents by student.
    pub fn owner(&self) -> &str {
        if self.uploaded_by.is_empty() {
            UNKNOWN_STUDENT_ID
        } else {
            &self.uploaded_by
        }
    }
}

/// Uploader details sent by the front end alongside the file.
///
/// Every field is optional; blanks fall back to the placeholders above.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentInfo {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub roll_no: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: Option<String>,
}

impl StudentInfo {
    pub fn owner_id(&self) -> String {
        non_blank(&self.email).unwrap_or(UNKNOWN_STUDENT_ID).to_string()
    }

    pub fn display_name(&self) -> String {
        non_blank(&self.name).unwrap_or(UNKNOWN_STUDENT_NAME).to_string()
    }

    pub fn roll_no_or_default(&self) -> String {
        non_blank(&self.roll_no).unwrap_or(MISSING_FIELD).to_string()
    }

    pub fn course_or_default(&self) -> String {
        non_blank(&self.course).unwrap_or(MISSING_FIELD).to_string()
    }

    pub fn year_or_default(&self) -> String {
        non_blank(&self.year).unwrap_or(MISSING_FIELD).to_string()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

// ═══════════════════════════════════════════════════════════
// Extracted fields
// ═══════════════════════════════════════════════════════════

/// Serde tag of [`ExtractedData`]. OCR keys with this name are dropped.
pub const EXTRACTED_KIND_TAG: &str = "kind";

/// OCR output, keyed by the document type it was extracted for.
///
/// `Partial` holds whatever the OCR collaborator returned when it does not
/// fit the typed shape, including `null` when extraction failed outright.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractedData {
    Marksheet(MarksheetFields),
    Certificate(CertificateFields),
    Partial { raw: Value },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarksheetFields {
    #[serde(default, alias = "student_name", skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    #[serde(default, alias = "roll_number", deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub roll_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub cgpa: Option<f64>,
    #[serde(default)]
    pub sgpas: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(default, alias = "is_lead", skip_serializing_if = "Option::is_none")]
    pub is_lead: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExtractedData {
    /// Interpret a raw OCR result for `doc_type`. Never fails.
    pub fn from_ocr(doc_type: DocumentType, raw: Value) -> Self {
        let mut fields = match raw {
            Value::Object(fields) => fields,
            other => return Self::Partial { raw: other },
        };
        // Would serialize next to the enum tag as a duplicate key.
        if let Some(kind) = fields.remove(EXTRACTED_KIND_TAG) {
            tracing::debug!(doc_type = %doc_type, %kind, "Dropped reserved key from OCR result");
        }
        let raw = Value::Object(fields);

        let parsed = match doc_type {
            DocumentType::Marksheet => {
                serde_json::from_value::<MarksheetFields>(raw.clone()).map(Self::Marksheet)
            }
            DocumentType::Certificate => {
                serde_json::from_value::<CertificateFields>(raw.clone()).map(Self::Certificate)
            }
        };

        match parsed {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!(
                    doc_type = %doc_type,
                    error = %e,
                    "OCR result does not match typed fields, keeping raw"
                );
                Self::Partial { raw }
            }
        }
    }

    /// Extraction that produced nothing usable.
    pub fn empty() -> Self {
        Self::Partial { raw: Value::Null }
    }

    /// Document type of the typed variants; `None` for `Partial`.
    pub fn doc_type(&self) -> Option<DocumentType> {
        match self {
            Self::Marksheet(_) => Some(DocumentType::Marksheet),
            Self::Certificate(_) => Some(DocumentType::Certificate),
            Self::Partial { .. } => None,
        }
    }

    /// The `points` value as the OCR collaborator reported it, if numeric.
    pub fn reported_points(&self) -> Option<&Number> {
        match self {
            Self::Marksheet(fields) => fields.points.as_ref(),
            Self::Certificate(fields) => fields.points.as_ref(),
            Self::Partial { raw } => match raw.get("points") {
                Some(Value::Number(n)) => Some(n),
                _ => None,
            },
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Lenient deserializers (OCR output mixes strings and numbers)
// ═══════════════════════════════════════════════════════════

/// Accept a string or a number, keeping it as a string.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// Accept a number or a numeric string such as `"8.42"`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected numeric string, got {s:?}"))),
        Some(other) => Err(D::Error::custom(format!("expected number, got {other}"))),
    }
}

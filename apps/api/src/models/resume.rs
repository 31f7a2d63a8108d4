use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

/// Fields the model extracted from a résumé.
///
/// Recognized keys are `name`, `email`, `phone`, `skills`, `education` and
/// `work_experience`, but nothing beyond "is a JSON object" is enforced: missing or
/// oddly-typed keys are kept as the model returned them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredRecord(pub Map<String, Value>);

impl StructuredRecord {
    pub fn name(&self) -> Option<&str> {
        self.text_field("name")
    }

    pub fn email(&self) -> Option<&str> {
        self.text_field("email")
    }

    pub fn phone(&self) -> Option<&str> {
        self.text_field("phone")
    }

    /// Number of entries under `skills`, zero when absent or not a list.
    pub fn skill_count(&self) -> usize {
        self.0
            .get("skills")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    fn text_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// Qualitative review of a `StructuredRecord`: `resume_rating`, `improvement_areas`,
/// `upskill_suggestions`. Same best-effort object guarantee as `StructuredRecord`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisRecord(pub Map<String, Value>);

impl AnalysisRecord {
    /// The model's 1–10 rating, if it gave an integer one. Not range-checked.
    pub fn resume_rating(&self) -> Option<i64> {
        self.0.get("resume_rating").and_then(Value::as_i64)
    }
}

/// Stands in for a stage result that could not be produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPlaceholder {
    pub error: String,
    pub raw: String,
}

/// What gets stored as `llm_analysis`: the analysis itself or the placeholder that replaced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Analyzed(AnalysisRecord),
    Failed(ErrorPlaceholder),
}

impl AnalysisOutcome {
    pub fn to_value(&self) -> Value {
        match self {
            AnalysisOutcome::Analyzed(record) => Value::Object(record.0.clone()),
            AnalysisOutcome::Failed(placeholder) => serde_json::json!({
                "error": placeholder.error,
                "raw": placeholder.raw,
            }),
        }
    }
}

/// Everything the persistence gateway needs to append one row.
#[derive(Debug, Clone)]
pub struct NewResume {
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub extracted_data: Value,
    pub llm_analysis: Value,
}

/// Row shape of `resumes_v2`.
#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: i32,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub extracted_data: Option<Value>,
    pub llm_analysis: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ResumeSummary {
    pub id: i32,
    pub filename: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeDetail {
    pub id: i32,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub extracted_data: Value,
    pub llm_analysis: Value,
}

impl From<ResumeRow> for ResumeDetail {
    fn from(row: ResumeRow) -> Self {
        let empty = || Value::Object(Map::new());
        Self {
            id: row.id,
            filename: row.filename,
            uploaded_at: row.uploaded_at,
            name: row.name,
            email: row.email,
            phone: row.phone,
            extracted_data: row.extracted_data.unwrap_or_else(empty),
            llm_analysis: row.llm_analysis.unwrap_or_else(empty),
        }
    }
}

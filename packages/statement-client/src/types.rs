use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

/// Date format the API uses for date cells.
const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Column definitions
// =============================================================================

/// Opaque column identifier, unique within one schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColumnId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A column the user wants extracted, as sent in the `columns` form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub id: ColumnId,

    /// Label presented to the service and used as the row key
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(
        rename = "isRequired",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_required: Option<bool>,
}

impl ColumnDefinition {
    /// Create a column with a freshly generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ColumnId::generate(),
            name: name.into(),
            description: None,
            is_required: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.is_required = Some(required);
        self
    }
}

// =============================================================================
// Transactions
// =============================================================================

/// A single cell value in an extracted row.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    /// Floats display without a trailing `.0`, so `100.0` shows as `100`
    Number(serde_json::Number),
    Date(NaiveDate),
}

impl CellValue {
    /// Interpret a text cell, promoting ISO dates to [`CellValue::Date`].
    pub fn parse_text(text: &str) -> Self {
        match NaiveDate::parse_from_str(text, DATE_FORMAT) {
            Ok(date) if date.format(DATE_FORMAT).to_string() == text => CellValue::Date(date),
            _ => CellValue::Text(text.to_string()),
        }
    }

    /// Convert a JSON value from the API. `null` means the cell is absent.
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(Self::parse_text(&s)),
            serde_json::Value::Number(n) => Some(CellValue::Number(n)),
            serde_json::Value::Bool(b) => Some(CellValue::Text(b.to_string())),
            other => Some(CellValue::Text(other.to_string())),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => match n.as_f64() {
                Some(value) if n.is_f64() => write!(f, "{}", value),
                _ => write!(f, "{}", n),
            },
            CellValue::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Number(n) => n.serialize(serializer),
            CellValue::Date(_) => serializer.serialize_str(&self.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value.into())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(CellValue::Number)
            .unwrap_or_else(|| CellValue::Text(value.to_string()))
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

/// One extracted transaction row.
///
/// Fields are keyed by column name in the order the API returned them. The
/// key set is not guaranteed to match the requested schema. When the API
/// repeats a key the last occurrence wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "IndexMap<String, serde_json::Value>")]
pub struct Transaction {
    pub id: String,
    #[serde(flatten)]
    pub fields: IndexMap<String, CellValue>,
}

impl Transaction {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: IndexMap::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.fields.insert(column.into(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields.get(column)
    }

    /// Display value for a column; missing cells render as an empty string.
    ///
    /// A column named `id` shows the row id unless the row also carries an
    /// `id` field of its own.
    pub fn display(&self, column: &str) -> String {
        match self.get(column) {
            Some(value) => value.to_string(),
            None if column == "id" => self.id.clone(),
            None => String::new(),
        }
    }
}

impl From<IndexMap<String, serde_json::Value>> for Transaction {
    fn from(mut raw: IndexMap<String, serde_json::Value>) -> Self {
        let id = match raw.shift_remove("id") {
            Some(serde_json::Value::String(s)) => s,
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };

        let fields = raw
            .into_iter()
            .filter_map(|(key, value)| CellValue::from_json(value).map(|v| (key, v)))
            .collect();

        Self { id, fields }
    }
}

// =============================================================================
// API responses
// =============================================================================

/// Body of `POST /process-bank-statement-json`.
///
/// On success the service sends `transactions`; when processing fails it
/// still answers 200 with `success: false` and a `message`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ExtractionResponse {
    pub transactions: Option<Vec<Transaction>>,
    pub success: Option<bool>,
    pub message: Option<String>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// Body of `GET /column-suggestions`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ColumnSuggestions {
    /// Suggestions for one bank (`?bank_name=` was given)
    ForBank {
        bank: String,
        suggested_columns: Vec<String>,
    },
    /// The full catalogue keyed by bank, plus the generic column set
    Catalogue {
        all_bank_suggestions: IndexMap<String, Vec<String>>,
        generic_columns: Vec<String>,
    },
}

impl ColumnSuggestions {
    /// The column names to offer: the bank's own set, or the generic one.
    pub fn columns(&self) -> &[String] {
        match self {
            ColumnSuggestions::ForBank {
                suggested_columns, ..
            } => suggested_columns,
            ColumnSuggestions::Catalogue {
                generic_columns, ..
            } => generic_columns,
        }
    }

    /// Bank names known to the service (empty for a single-bank answer).
    pub fn banks(&self) -> Vec<&str> {
        match self {
            ColumnSuggestions::ForBank { .. } => Vec::new(),
            ColumnSuggestions::Catalogue {
                all_bank_suggestions,
                ..
            } => all_bank_suggestions.keys().map(String::as_str).collect(),
        }
    }
}

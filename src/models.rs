use serde::{Deserialize, Serialize};
use sheet_header_detect::{ColumnMapping, DetectionResult, FieldDefinition, MappingSuggestion};

pub const DEFAULT_FIELDS_URL: &str = "http://localhost:8000/api/v1/uploads/";
pub const DEFAULT_UPLOAD_KINDS: &str = "consumers,routes,products,order_books";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const FIELDS_CACHE_KEY_PREFIX: &str = "upload:fields:v1:";
pub const FIELDS_CACHE_TTL_SECONDS: u32 = 6 * 60 * 60;

/// Backend field definitions for one upload kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldDefinitions {
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub default_mapping: ColumnMapping,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldDefinitionsResponse {
    pub kind: String,
    pub fields: Vec<FieldDefinition>,
    pub default_mapping: ColumnMapping,
    pub cached: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DetectHeadersResponse {
    #[serde(flatten)]
    pub result: DetectionResult,
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<MappingSuggestion>,
    pub detected_at: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CompareMappingsRequest {
    pub columns: Vec<String>,
    pub saved_mapping: ColumnMapping,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

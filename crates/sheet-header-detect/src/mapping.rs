use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

/// Backend field name to source column name.
pub type ColumnMapping = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingComparison {
    pub has_changes: bool,
    pub missing_columns: Vec<String>,
    pub new_columns: Vec<String>,
    pub message: String,
}

/// Compare freshly detected columns with a previously saved mapping.
#[must_use]
pub fn compare_column_mappings(columns: &[String], saved: &ColumnMapping) -> MappingComparison {
    let present = columns.iter().map(String::as_str).collect::<HashSet<_>>();
    let mapped = saved
        .values()
        .map(|column| column.trim())
        .filter(|column| !column.is_empty())
        .collect::<Vec<_>>();

    let mut missing_columns: Vec<String> = Vec::new();
    for column in &mapped {
        if !present.contains(column) && !missing_columns.iter().any(|seen| seen == column) {
            missing_columns.push((*column).to_string());
        }
    }

    let mapped_set = mapped.into_iter().collect::<HashSet<_>>();
    let mut new_columns: Vec<String> = Vec::new();
    for column in columns {
        if !mapped_set.contains(column.as_str()) && !new_columns.contains(column) {
            new_columns.push(column.clone());
        }
    }

    let has_changes = !missing_columns.is_empty() || !new_columns.is_empty();
    let message = if has_changes {
        let mut parts = Vec::new();
        if !missing_columns.is_empty() {
            parts.push(format!(
                "{} saved column(s) missing from the file: {}",
                missing_columns.len(),
                missing_columns.join(", ")
            ));
        }
        if !new_columns.is_empty() {
            parts.push(format!(
                "{} new column(s) in the file: {}",
                new_columns.len(),
                new_columns.join(", ")
            ));
        }
        format!("file structure changed; {}", parts.join("; "))
    } else {
        "file structure matches the saved mapping".to_string()
    };

    MappingComparison {
        has_changes,
        missing_columns,
        new_columns,
        message,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingSuggestion {
    pub mapping: ColumnMapping,
    pub unmapped_required: Vec<String>,
    pub unused_columns: Vec<String>,
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

fn field_keys(field: &FieldDefinition) -> BTreeSet<String> {
    std::iter::once(field.name.as_str())
        .chain(field.label.as_deref())
        .chain(field.aliases.iter().map(String::as_str))
        .map(normalize)
        .filter(|key| !key.is_empty())
        .collect()
}

/// Pre-fill a mapping from the backend default and name matching.
///
/// Each column is assigned to at most one field. Default mappings are
/// honoured first, then fields are matched in declaration order.
#[must_use]
pub fn suggest_mapping(
    fields: &[FieldDefinition],
    default_mapping: &ColumnMapping,
    columns: &[String],
) -> MappingSuggestion {
    let mut claimed: HashSet<&str> = HashSet::new();
    let mut mapping = ColumnMapping::new();

    for field in fields {
        if let Some(column) = default_mapping.get(&field.name)
            && columns.contains(column)
            && claimed.insert(column.as_str())
        {
            mapping.insert(field.name.clone(), column.clone());
        }
    }

    for field in fields {
        if mapping.contains_key(&field.name) {
            continue;
        }

        let keys = field_keys(field);
        if let Some(column) = columns
            .iter()
            .find(|column| !claimed.contains(column.as_str()) && keys.contains(&normalize(column)))
        {
            claimed.insert(column.as_str());
            mapping.insert(field.name.clone(), column.clone());
        }
    }

    let unmapped_required = fields
        .iter()
        .filter(|field| field.required && !mapping.contains_key(&field.name))
        .map(|field| field.name.clone())
        .collect();
    let unused_columns = columns
        .iter()
        .filter(|column| !claimed.contains(column.as_str()))
        .cloned()
        .collect();

    MappingSuggestion {
        mapping,
        unmapped_required,
        unused_columns,
    }
}

/// Problems that block a bulk upload with this mapping.
#[must_use]
pub fn validate_mapping(
    fields: &[FieldDefinition],
    mapping: &ColumnMapping,
    columns: &[String],
) -> Vec<String> {
    let mut problems = Vec::new();

    for field in fields.iter().filter(|field| field.required) {
        let mapped = mapping
            .get(&field.name)
            .is_some_and(|column| !column.trim().is_empty());
        if !mapped {
            problems.push(format!("required field '{}' has no column", field.name));
        }
    }

    for (field, column) in mapping {
        if !column.trim().is_empty() && !columns.contains(column) {
            problems.push(format!(
                "field '{field}' is mapped to '{column}', which is not in the file"
            ));
        }
    }

    problems
}

use worker::Env;

use crate::field_source::validate_upload_kind;
use crate::models::{DEFAULT_FIELDS_URL, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_UPLOAD_KINDS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub fields_url: String,
    pub upload_kinds: Vec<String>,
    pub max_upload_bytes: usize,
    pub backend_token: Option<String>,
}

impl WorkerConfig {
    pub fn from_env(env: &Env) -> Self {
        let var = |name: &str| env.var(name).map(|value| value.to_string()).ok();

        Self {
            fields_url: var("FIELDS_URL").unwrap_or_else(|| DEFAULT_FIELDS_URL.to_string()),
            upload_kinds: parse_upload_kinds(
                var("UPLOAD_KINDS").as_deref().unwrap_or(DEFAULT_UPLOAD_KINDS),
            ),
            max_upload_bytes: parse_max_upload_bytes(var("MAX_UPLOAD_BYTES").as_deref()),
            backend_token: env
                .secret("BACKEND_TOKEN")
                .map(|value| value.to_string())
                .ok()
                .filter(|token| !token.trim().is_empty()),
        }
    }
}

/// Comma-separated upload kinds; invalid and repeated entries are dropped.
pub fn parse_upload_kinds(raw: &str) -> Vec<String> {
    let mut kinds: Vec<String> = Vec::new();
    for kind in raw.split(',').filter_map(|value| validate_upload_kind(value).ok()) {
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    kinds
}

pub fn parse_max_upload_bytes(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|&bytes| bytes > 0)
        .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES)
}

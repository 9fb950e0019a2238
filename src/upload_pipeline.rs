use sheet_header_detect::{DetectOptions, DetectionResult, SourceFormat, detect_headers_from_bytes};

use crate::cache;
use crate::config::WorkerConfig;
use crate::error::ApiError;
use crate::field_source;
use crate::models::{FIELDS_CACHE_KEY_PREFIX, FIELDS_CACHE_TTL_SECONDS, FieldDefinitions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
    Bypass,
}

impl CacheStatus {
    pub const fn as_header_value(self) -> &'static str {
        match self {
            Self::Hit => "HIT",
            Self::Miss => "MISS",
            Self::Bypass => "BYPASS",
        }
    }
}

/// An uploaded file as received by the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

pub fn fields_cache_key(kind: &str) -> String {
    format!("{FIELDS_CACHE_KEY_PREFIX}{kind}")
}

pub fn detect_upload(
    upload: &Upload,
    format: Option<SourceFormat>,
) -> Result<DetectionResult, ApiError> {
    let options = DetectOptions {
        format,
        ..DetectOptions::default()
    };
    Ok(detect_headers_from_bytes(
        &upload.bytes,
        upload.file_name.as_deref(),
        &options,
    )?)
}

pub async fn load_field_definitions(
    config: &WorkerConfig,
    kind: &str,
    force: bool,
) -> Result<(FieldDefinitions, CacheStatus), ApiError> {
    let cache_key = fields_cache_key(kind);
    if !force && let Some(cached) = cache::get_json::<FieldDefinitions>(&cache_key).await? {
        return Ok((cached, CacheStatus::Hit));
    }

    let definitions = field_source::fetch_field_definitions(config, kind).await?;
    cache::put_json(&cache_key, &definitions, FIELDS_CACHE_TTL_SECONDS).await?;

    let status = if force {
        CacheStatus::Bypass
    } else {
        CacheStatus::Miss
    };
    Ok((definitions, status))
}

pub async fn refresh_all_kinds(config: &WorkerConfig) -> Result<(), ApiError> {
    if config.upload_kinds.is_empty() {
        return Err(ApiError::NotFound(
            "no upload kinds configured for refresh".to_string(),
        ));
    }

    for kind in &config.upload_kinds {
        if let Err(error) = load_field_definitions(config, kind, true).await {
            worker::console_error!("field definition refresh failed for '{}': {}", kind, error);
        }
    }

    Ok(())
}

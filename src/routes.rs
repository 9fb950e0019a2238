use std::collections::HashMap;
use std::str::FromStr;

use chrono::Utc;
use serde::Serialize;
use sheet_header_detect::{
    MappingComparison, SourceFormat, compare_column_mappings, suggest_mapping,
};
use worker::{Context, Env, FormEntry, Request, Response, Result, RouteContext, Router};

use crate::config::WorkerConfig;
use crate::error::ApiError;
use crate::field_source::validate_upload_kind;
use crate::models::{CompareMappingsRequest, DetectHeadersResponse, FieldDefinitionsResponse};
use crate::upload_pipeline::{self, CacheStatus, Upload};

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: WorkerConfig,
}

pub async fn handle(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    let state = AppState {
        config: WorkerConfig::from_env(&env),
    };

    Router::with_data(state)
        .post_async("/api/v1/detect_headers", detect_headers_route)
        .post_async("/api/v1/compare_mappings", compare_mappings_route)
        .get_async("/api/v1/fields", fields_route)
        .run(req, env)
        .await
}

async fn detect_headers_route(mut req: Request, ctx: RouteContext<AppState>) -> Result<Response> {
    match detect_headers_response(&mut req, &ctx.data.config).await {
        Ok(response) => json_response(&response),
        Err(error) => error.into_response(),
    }
}

async fn compare_mappings_route(mut req: Request, _ctx: RouteContext<AppState>) -> Result<Response> {
    match compare_mappings_response(&mut req).await {
        Ok(response) => json_response(&response),
        Err(error) => error.into_response(),
    }
}

async fn fields_route(req: Request, ctx: RouteContext<AppState>) -> Result<Response> {
    match fields_response(&req, &ctx.data.config).await {
        Ok((response, cache_status)) => {
            let mut response = json_response(&response)?;
            response
                .headers_mut()
                .set("X-Cache-Status", cache_status.as_header_value())?;
            Ok(response)
        }
        Err(error) => error.into_response(),
    }
}

async fn detect_headers_response(
    req: &mut Request,
    config: &WorkerConfig,
) -> Result<DetectHeadersResponse, ApiError> {
    let query = parse_query(req)?;
    let format = parse_format_query(&query)?;
    let kind = query
        .get("kind")
        .map(String::as_str)
        .map(validate_upload_kind)
        .transpose()?;

    let upload = read_upload(req, &query, config.max_upload_bytes).await?;
    let result = upload_pipeline::detect_upload(&upload, format)?;

    worker::console_log!(
        "header detection completed: file={:?}, header_row={}, columns={}",
        upload.file_name,
        result.source_row,
        result.columns.len()
    );

    let suggestion = match kind {
        Some(kind) => {
            let (definitions, _) =
                upload_pipeline::load_field_definitions(config, &kind, false).await?;
            Some(suggest_mapping(
                &definitions.fields,
                &definitions.default_mapping,
                &result.columns,
            ))
        }
        None => None,
    };

    Ok(DetectHeadersResponse {
        warning: result.warning(),
        result,
        file_name: upload.file_name,
        suggestion,
        detected_at: Utc::now().to_rfc3339(),
    })
}

async fn compare_mappings_response(
    req: &mut Request,
) -> Result<MappingComparison, ApiError> {
    let body = req
        .json::<CompareMappingsRequest>()
        .await
        .map_err(|error| ApiError::BadRequest(format!("invalid JSON body: {error}")))?;
    if body.columns.is_empty() {
        return Err(ApiError::BadRequest(
            "columns must contain at least one name".to_string(),
        ));
    }

    Ok(compare_column_mappings(&body.columns, &body.saved_mapping))
}

async fn fields_response(
    req: &Request,
    config: &WorkerConfig,
) -> Result<(FieldDefinitionsResponse, CacheStatus), ApiError> {
    let query = parse_query(req)?;
    let raw_kind = query
        .get("kind")
        .ok_or_else(|| ApiError::BadRequest("missing 'kind' query parameter".to_string()))?;
    let kind = validate_upload_kind(raw_kind)?;
    let force = parse_flag_query(&query, "force");

    let (definitions, cache_status) =
        upload_pipeline::load_field_definitions(config, &kind, force).await?;

    Ok((
        FieldDefinitionsResponse {
            kind,
            fields: definitions.fields,
            default_mapping: definitions.default_mapping,
            cached: cache_status == CacheStatus::Hit,
        },
        cache_status,
    ))
}

async fn read_upload(
    req: &mut Request,
    query: &HashMap<String, String>,
    max_bytes: usize,
) -> Result<Upload, ApiError> {
    if let Some(length) = req
        .headers()
        .get("Content-Length")?
        .and_then(|value| value.trim().parse::<usize>().ok())
    {
        check_upload_size(length, max_bytes)?;
    }

    let content_type = req.headers().get("Content-Type")?.unwrap_or_default();
    let upload = if is_multipart(&content_type) {
        let form = req.form_data().await?;
        match form.get("file") {
            Some(FormEntry::File(file)) => Upload {
                file_name: Some(file.name()).filter(|name| !name.is_empty()),
                bytes: file.bytes().await?,
            },
            _ => {
                return Err(ApiError::BadRequest(
                    "multipart body must contain a 'file' field".to_string(),
                ));
            }
        }
    } else {
        Upload {
            file_name: query.get("filename").cloned(),
            bytes: req.bytes().await?,
        }
    };

    check_upload_size(upload.bytes.len(), max_bytes)?;
    Ok(upload)
}

pub fn check_upload_size(length: usize, max_bytes: usize) -> Result<(), ApiError> {
    if length > max_bytes {
        return Err(ApiError::PayloadTooLarge(format!(
            "upload is {length} bytes; the limit is {max_bytes} bytes"
        )));
    }
    Ok(())
}

pub fn is_multipart(content_type: &str) -> bool {
    content_type
        .trim()
        .to_ascii_lowercase()
        .starts_with("multipart/form-data")
}

fn json_response<T>(payload: &T) -> Result<Response>
where
    T: Serialize,
{
    let mut response = Response::from_json(payload)?;
    response.headers_mut().set("Cache-Control", "no-store")?;
    Ok(response)
}

fn parse_query(req: &Request) -> Result<HashMap<String, String>, ApiError> {
    let url = req.url()?;
    let query = url
        .query_pairs()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect::<HashMap<_, _>>();
    Ok(query)
}

pub fn parse_format_query(
    query: &HashMap<String, String>,
) -> Result<Option<SourceFormat>, ApiError> {
    query
        .get("format")
        .filter(|value| !value.trim().is_empty())
        .map(|value| SourceFormat::from_str(value).map_err(ApiError::BadRequest))
        .transpose()
}

pub fn parse_flag_query(query: &HashMap<String, String>, name: &str) -> bool {
    query.get(name).is_some_and(|value| {
        let lowered = value.trim().to_ascii_lowercase();
        lowered == "true" || lowered == "1" || lowered == "yes"
    })
}

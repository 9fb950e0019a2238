use regex::Regex;
use url::Url;
use worker::{Fetch, Headers, Method, Request, RequestInit};

use crate::config::WorkerConfig;
use crate::error::ApiError;
use crate::models::FieldDefinitions;

pub fn validate_upload_kind(raw: &str) -> Result<String, ApiError> {
    let kind = raw.trim().to_ascii_lowercase();
    let kind_re =
        Regex::new(r"^[a-z][a-z0-9_]{0,31}$").map_err(|error| ApiError::Internal(error.to_string()))?;
    if kind_re.is_match(&kind) {
        Ok(kind)
    } else {
        Err(ApiError::BadRequest(format!(
            "invalid upload kind '{}'",
            raw.trim()
        )))
    }
}

pub fn field_definitions_url(base_url: &str, kind: &str) -> Result<Url, ApiError> {
    let mut base = Url::parse(base_url)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(&format!("{}/fields/", urlencoding::encode(kind)))?)
}

pub async fn fetch_field_definitions(
    config: &WorkerConfig,
    kind: &str,
) -> Result<FieldDefinitions, ApiError> {
    let url = field_definitions_url(&config.fields_url, kind)?;

    let mut headers = Headers::new();
    headers.set("Accept", "application/json")?;
    if let Some(token) = &config.backend_token {
        headers.set("Authorization", &format!("Bearer {token}"))?;
    }
    let mut init = RequestInit::new();
    init.with_method(Method::Get).with_headers(headers);

    let request = Request::new_with_init(url.as_str(), &init)?;
    let mut response = Fetch::Request(request).send().await?;
    let status = response.status_code();
    if status == 404 {
        return Err(ApiError::NotFound(format!("unknown upload kind '{kind}'")));
    }
    if status >= 400 {
        return Err(ApiError::Upstream(format!(
            "failed to fetch field definitions: status {status}"
        )));
    }

    let body = response.text().await?;
    parse_field_definitions(&body)
}

/// Parse the backend payload, dropping default mappings for unknown fields.
pub fn parse_field_definitions(body: &str) -> Result<FieldDefinitions, ApiError> {
    let mut definitions = serde_json::from_str::<FieldDefinitions>(body)?;
    definitions.fields.retain(|field| !field.name.trim().is_empty());
    if definitions.fields.is_empty() {
        return Err(ApiError::Upstream(
            "backend returned no field definitions".to_string(),
        ));
    }

    let fields = &definitions.fields;
    definitions
        .default_mapping
        .retain(|name, column| !column.trim().is_empty() && fields.iter().any(|field| &field.name == name));
    Ok(definitions)
}

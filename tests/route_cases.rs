use std::collections::HashMap;

use pretty_assertions::assert_eq;

use gasdesk_upload_worker::config::{parse_max_upload_bytes, parse_upload_kinds};
use gasdesk_upload_worker::error::ApiError;
use gasdesk_upload_worker::field_source::{
    field_definitions_url, parse_field_definitions, validate_upload_kind,
};
use gasdesk_upload_worker::models::DEFAULT_MAX_UPLOAD_BYTES;
use gasdesk_upload_worker::routes::{
    check_upload_size, is_multipart, parse_flag_query, parse_format_query,
};
use gasdesk_upload_worker::upload_pipeline::{Upload, detect_upload, fields_cache_key};
use sheet_header_detect::SourceFormat;

fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect()
}

#[test]
fn upload_kinds_are_normalized_and_validated() {
    assert_eq!(
        validate_upload_kind(" Consumers ").expect("valid kind"),
        "consumers"
    );
    assert!(matches!(
        validate_upload_kind("../admin"),
        Err(ApiError::BadRequest(_))
    ));
    assert_eq!(
        parse_upload_kinds("consumers, routes,,bad kind,routes"),
        vec!["consumers".to_string(), "routes".to_string()]
    );
}

#[test]
fn max_upload_bytes_falls_back_to_default() {
    assert_eq!(parse_max_upload_bytes(Some("2048")), 2048);
    assert_eq!(parse_max_upload_bytes(Some("0")), DEFAULT_MAX_UPLOAD_BYTES);
    assert_eq!(parse_max_upload_bytes(Some("ten")), DEFAULT_MAX_UPLOAD_BYTES);
    assert_eq!(parse_max_upload_bytes(None), DEFAULT_MAX_UPLOAD_BYTES);
}

#[test]
fn field_definitions_url_joins_kind_under_base_path() {
    let url = field_definitions_url("https://backend.example.com/api/v1/uploads", "consumers")
        .expect("url builds");
    assert_eq!(
        url.as_str(),
        "https://backend.example.com/api/v1/uploads/consumers/fields/"
    );
}

#[test]
fn field_definitions_drop_unknown_default_mappings() {
    let body = r#"{
        "fields": [
            {"name": "consumer_no", "label": "Consumer No", "required": true},
            {"name": "mobile", "aliases": ["Phone"]}
        ],
        "default_mapping": {"consumer_no": "Consumer No", "legacy": "Old Column", "mobile": ""}
    }"#;

    let definitions = parse_field_definitions(body).expect("definitions parse");
    assert_eq!(definitions.fields.len(), 2);
    assert!(definitions.fields[0].required);
    assert_eq!(definitions.fields[1].aliases, vec!["Phone".to_string()]);
    assert_eq!(
        definitions.default_mapping.keys().collect::<Vec<_>>(),
        vec!["consumer_no"]
    );
}

#[test]
fn empty_field_definitions_are_an_upstream_error() {
    let err = parse_field_definitions(r#"{"fields": []}"#).expect_err("no fields");
    assert_eq!(err.status_code(), 502);

    let err = parse_field_definitions("not json").expect_err("bad json");
    assert_eq!(err.code(), "parse_error");
}

#[test]
fn format_and_flag_queries() {
    assert_eq!(
        parse_format_query(&query(&[("format", "xlsx")])).expect("format"),
        Some(SourceFormat::Workbook)
    );
    assert_eq!(parse_format_query(&query(&[])).expect("no format"), None);
    assert!(parse_format_query(&query(&[("format", "pdf")])).is_err());

    assert!(parse_flag_query(&query(&[("force", "Yes")]), "force"));
    assert!(!parse_flag_query(&query(&[("force", "0")]), "force"));
}

#[test]
fn upload_size_and_content_type_checks() {
    assert!(check_upload_size(10, 10).is_ok());
    let err = check_upload_size(11, 10).expect_err("too large");
    assert_eq!(err.status_code(), 413);

    assert!(is_multipart("Multipart/Form-Data; boundary=xyz"));
    assert!(!is_multipart("text/csv"));
}

#[test]
fn detection_errors_map_to_validation_responses() {
    let upload = Upload {
        file_name: Some("consumers.csv".to_string()),
        bytes: Vec::new(),
    };
    let err = detect_upload(&upload, None).expect_err("empty upload");
    assert_eq!(err.status_code(), 422);
    assert_eq!(err.message(), "file is empty");
}

#[test]
fn detects_raw_csv_upload() {
    let upload = Upload {
        file_name: Some("order_book.csv".to_string()),
        bytes: b"Order Book - October\n\nBooking No,Consumer No,Qty\nB-1,1001,1\nB-2,1002,2\n"
            .to_vec(),
    };

    let result = detect_upload(&upload, None).expect("detection succeeds");
    assert_eq!(result.header_row_index, 2);
    assert_eq!(result.columns, vec!["Booking No", "Consumer No", "Qty"]);
    assert_eq!(result.source, SourceFormat::Csv);
}

#[test]
fn cache_keys_are_versioned_per_kind() {
    assert_eq!(fields_cache_key("routes"), "upload:fields:v1:routes");
}

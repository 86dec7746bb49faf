use super::*;

// =============================================================================
// RESPONSE PARSING
// =============================================================================

#[test]
fn parse_extracts_first_image_url() {
    let text = r#"{"created":1700000000,"data":[{"url":"https://img.example/one.png"},{"url":"https://img.example/two.png"}]}"#;
    let url = parse_image_response(text).expect("url");
    assert_eq!(url, "https://img.example/one.png");
}

#[test]
fn parse_empty_data_is_empty_response() {
    let err = parse_image_response(r#"{"data":[]}"#).unwrap_err();
    assert!(matches!(err, TransformError::EmptyResponse));
}

#[test]
fn parse_missing_data_is_empty_response() {
    let err = parse_image_response("{}").unwrap_err();
    assert!(matches!(err, TransformError::EmptyResponse));
}

#[test]
fn parse_datum_without_url_is_skipped() {
    let text = r#"{"data":[{"b64_json":"zzzz"},{"url":"https://img.example/one.png"}]}"#;
    let url = parse_image_response(text).expect("url");
    assert_eq!(url, "https://img.example/one.png");
}

#[test]
fn parse_invalid_json_is_parse_error() {
    let err = parse_image_response("not json").unwrap_err();
    assert!(matches!(err, TransformError::ApiParse(_)));
}

// =============================================================================
// CONFIG
// =============================================================================

// Process env is shared across test threads; serialize the config tests.
static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[test]
fn config_requires_api_key() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe { std::env::remove_var("OPENAI_API_KEY") };
    let err = TransformConfig::from_env().unwrap_err();
    assert!(matches!(err, TransformError::MissingApiKey { var } if var == "OPENAI_API_KEY"));
}

#[test]
fn config_defaults_apply() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        std::env::set_var("OPENAI_API_KEY", "sk-test");
        std::env::remove_var("TRANSFORM_BASE_URL");
        std::env::remove_var("TRANSFORM_IMAGE_SIZE");
        std::env::remove_var("TRANSFORM_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("TRANSFORM_CONNECT_TIMEOUT_SECS");
    }
    let config = TransformConfig::from_env().expect("config");
    assert_eq!(config.base_url, DEFAULT_TRANSFORM_BASE_URL);
    assert_eq!(config.image_size, DEFAULT_IMAGE_SIZE);
    assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    assert_eq!(config.connect_timeout_secs, DEFAULT_CONNECT_TIMEOUT_SECS);
    unsafe { std::env::remove_var("OPENAI_API_KEY") };
}

#[test]
fn config_trims_trailing_slash_from_base_url() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        std::env::set_var("OPENAI_API_KEY", "sk-test");
        std::env::set_var("TRANSFORM_BASE_URL", "https://proxy.example/v1/");
    }
    let config = TransformConfig::from_env().expect("config");
    assert_eq!(config.base_url, "https://proxy.example/v1");
    unsafe {
        std::env::remove_var("OPENAI_API_KEY");
        std::env::remove_var("TRANSFORM_BASE_URL");
    }
}

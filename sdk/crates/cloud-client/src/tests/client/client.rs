use crate::Client;

use std::time::Duration;

use cloud_config::Config;

#[test]
fn test_base_url_trailing_slash_trimmed() {
    let client = Client::new("http://localhost:8000/");
    assert_eq!(client.base_url, "http://localhost:8000");
}

#[test]
fn test_base_url_no_trailing_slash() {
    let client = Client::new("http://localhost:8000");
    assert_eq!(client.base_url, "http://localhost:8000");
}

#[test]
fn test_token_none_by_default() {
    let client = Client::new("http://localhost:8000");
    assert!(client.token().is_none());
}

#[test]
fn test_token_replaced_and_cleared() {
    let client = Client::new("http://localhost:8000");

    client.set_token(Some("abc".to_string()));
    assert_eq!(client.token(), Some("abc".to_string()));

    client.set_token(None);
    assert!(client.token().is_none());
}

#[test]
fn test_with_timeout_keeps_base_url() {
    let client = Client::with_timeout("http://localhost:8000/", Duration::from_secs(3)).unwrap();
    assert_eq!(client.base_url, "http://localhost:8000");
}

#[test]
fn test_from_config_applies_api_url_and_token() {
    let mut config = Config::default();
    config.app.api_url = "https://api.example.com/".to_string();
    config.auth.token = Some("configured".to_string());

    let client = Client::from_config(&config).unwrap();

    assert_eq!(client.base_url, "https://api.example.com");
    assert_eq!(client.token(), Some("configured".to_string()));
}

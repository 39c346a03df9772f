//! API key resolution from the process environment.
//!
//! Kept as a single test in its own binary: it mutates process-wide variables.

use retro_diffusion::{ClientConfig, ErrorCode, RetroDiffusionClient};

#[test]
fn test_api_key_resolution_from_environment() {
    std::env::remove_var("RD_TOKEN");
    std::env::remove_var("RD_API_KEY");

    // nothing configured: construction fails before any namespace exists
    let err = RetroDiffusionClient::new().unwrap_err();
    assert_eq!(err.code(), ErrorCode::Configuration);
    assert!(err.message().starts_with("API key is required"));

    std::env::set_var("RD_API_KEY", "from-api-key");
    let client = RetroDiffusionClient::new().unwrap();
    assert_eq!(client.config().api_key(), "from-api-key");

    std::env::set_var("RD_TOKEN", "from-token");
    let client = RetroDiffusionClient::new().unwrap();
    assert_eq!(client.config().api_key(), "from-token");

    // empty values are skipped
    std::env::set_var("RD_TOKEN", "");
    let client = RetroDiffusionClient::new().unwrap();
    assert_eq!(client.config().api_key(), "from-api-key");

    // explicit config beats the environment
    let client = RetroDiffusionClient::with_config(ClientConfig {
        api_key: Some("explicit".to_string()),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(client.config().api_key(), "explicit");
    assert!(!format!("{:?}", client).contains("explicit"));

    std::env::remove_var("RD_TOKEN");
    std::env::remove_var("RD_API_KEY");
}

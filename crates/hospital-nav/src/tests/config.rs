use crate::{AppError, config::Config};

use std::time::Duration;

use hospital_nav_core::{AUTO_CLEAR_DELAY, DEFAULT_BASE_URL, NoticeStyle};

/// WHAT: Empty file yields the full default configuration
/// WHY: First launch and hand-trimmed files must both work
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_file_when_parsing_then_defaults_apply() {
    // Given/When: Parsing an empty document
    let config = Config::parse("").unwrap();

    // Then: Defaults throughout
    assert_eq!(config, Config::default());
    assert_eq!(config.backend.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.backend.path_endpoint, "/shortest-path");
    assert_eq!(config.backend.request_timeout_secs, 30);
    assert_eq!(config.behavior.validation_notice, NoticeStyle::Alert);
    assert!(config.behavior.show_graph_after_route);
    assert!(!config.behavior.auto_clear);
    assert!(config.behavior.open_images);
    assert_eq!(config.audio.selected_device, None);
}

/// WHAT: Partial sections keep defaults for missing fields
/// WHY: Users edit only the keys they care about
#[test]
#[allow(clippy::unwrap_used)]
fn given_partial_sections_when_parsing_then_missing_fields_defaulted() {
    // Given: A file overriding a few keys
    let contents = r#"
        [backend]
        base_url = "http://nav.local:8080"
        path_endpoint = "/get_path"

        [behavior]
        validation_notice = "inline"
        auto_clear = true

        [audio]
        selected_device = "USB Microphone"
    "#;

    // When: Parsing
    let config = Config::parse(contents).unwrap();

    // Then: Overrides applied, the rest defaulted
    assert_eq!(config.backend.base_url, "http://nav.local:8080");
    assert_eq!(config.backend.voice_endpoint, "/voice_path");
    assert_eq!(config.behavior.validation_notice, NoticeStyle::Inline);
    assert_eq!(config.audio.selected_device.as_deref(), Some("USB Microphone"));

    let endpoints = config.endpoints().unwrap();
    assert_eq!(
        endpoints.path_url().unwrap().as_str(),
        "http://nav.local:8080/get_path"
    );

    let settings = config.controller_settings();
    assert_eq!(settings.validation_notice, NoticeStyle::Inline);
    assert_eq!(settings.auto_clear, Some(AUTO_CLEAR_DELAY));
}

/// WHAT: Auto-clear uses the configured delay only when enabled
/// WHY: A stray delay value must not switch the revert on
#[test]
#[allow(clippy::unwrap_used)]
fn given_auto_clear_secs_when_building_settings_then_enabled_flag_respected() {
    // Given: Delay set with the flag off, then on
    let off = Config::parse("[behavior]\nauto_clear_secs = 10\n").unwrap();
    let on = Config::parse("[behavior]\nauto_clear = true\nauto_clear_secs = 10\n").unwrap();

    // When/Then: Only the enabled config arms the timer
    assert_eq!(off.controller_settings().auto_clear, None);
    assert_eq!(
        on.controller_settings().auto_clear,
        Some(Duration::from_secs(10))
    );
}

/// WHAT: Saved form parses back to the same configuration
/// WHY: The atomic save must not lose settings
#[test]
#[allow(clippy::unwrap_used)]
fn given_custom_config_when_serializing_then_parses_back_equal() {
    // Given: A non-default configuration
    let mut config = Config::default();
    config.behavior.auto_clear = true;
    config.behavior.auto_clear_secs = Some(5);
    config.audio.selected_device = Some("Headset".to_string());

    // When: Serializing and parsing
    let text = toml::to_string_pretty(&config).unwrap();
    let parsed = Config::parse(&text).unwrap();

    // Then: Equal
    assert_eq!(parsed, config);
}

/// WHAT: Unknown notice style is a config error
/// WHY: Typos should fail loudly at startup
#[test]
fn given_unknown_notice_style_when_parsing_then_config_error() {
    let result = Config::parse("[behavior]\nvalidation_notice = \"popup\"\n");
    assert!(matches!(result, Err(AppError::ConfigError { .. })));
}

/// WHAT: Malformed base URL surfaces as a navigation error
/// WHY: The backend client cannot be built without a valid base
#[test]
#[allow(clippy::unwrap_used)]
fn given_invalid_base_url_when_building_endpoints_then_nav_error() {
    // Given: A base URL without a scheme
    let config = Config::parse("[backend]\nbase_url = \"not a url\"\n").unwrap();

    // When/Then: Endpoint construction fails
    assert!(matches!(config.endpoints(), Err(AppError::Nav { .. })));
}

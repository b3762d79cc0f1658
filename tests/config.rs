use pedidobot::ai::config::{AiConfig, DEFAULT_MODEL};
use pedidobot::config::ApiServerConfig;
use pedidobot::Config;
use serial_test::serial;

fn clear_env() {
    for var in [
        "GOOGLE_API_KEY",
        "GEMINI_MODEL",
        "GEMINI_API_URL",
        "TELOXIDE_TOKEN",
        "PEDIDO_API_ADDR",
        "PEDIDO_API_RATE_LIMIT",
    ] {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn ai_config_from_env_missing_key() {
    clear_env();
    assert!(AiConfig::from_env().is_none());
}

#[test]
#[serial]
fn ai_config_from_env_blank_key() {
    clear_env();
    std::env::set_var("GOOGLE_API_KEY", "  ");
    assert!(AiConfig::from_env().is_none());
}

#[test]
#[serial]
fn ai_config_from_env_defaults() {
    clear_env();
    std::env::set_var("GOOGLE_API_KEY", "k");
    let cfg = AiConfig::from_env().unwrap();
    assert_eq!(cfg.api_key, "k");
    assert_eq!(cfg.model, DEFAULT_MODEL);
    assert_eq!(cfg.model, "gemma-3-27b-it");
    assert!(cfg.api_url.is_none());
}

#[test]
#[serial]
fn ai_config_from_env_custom_model() {
    clear_env();
    std::env::set_var("GOOGLE_API_KEY", "k");
    std::env::set_var("GEMINI_MODEL", "gemini-2.0-flash");
    std::env::set_var("GEMINI_API_URL", "http://localhost:9999/v1beta");
    let cfg = AiConfig::from_env().unwrap();
    assert_eq!(cfg.model, "gemini-2.0-flash");
    assert_eq!(cfg.api_url.as_deref(), Some("http://localhost:9999/v1beta"));
}

#[test]
#[serial]
fn api_config_requires_addr() {
    clear_env();
    assert!(ApiServerConfig::from_env().is_none());
}

#[test]
#[serial]
fn api_config_rate_limit() {
    clear_env();
    std::env::set_var("PEDIDO_API_ADDR", "127.0.0.1:3000");
    std::env::set_var("PEDIDO_API_RATE_LIMIT", "5");
    let cfg = ApiServerConfig::from_env().unwrap();
    assert_eq!(cfg.addr, "127.0.0.1:3000");
    assert_eq!(cfg.rate_limit_per_second, Some(5));

    std::env::set_var("PEDIDO_API_RATE_LIMIT", "zero");
    assert_eq!(ApiServerConfig::from_env().unwrap().rate_limit_per_second, None);

    std::env::set_var("PEDIDO_API_RATE_LIMIT", "0");
    assert_eq!(ApiServerConfig::from_env().unwrap().rate_limit_per_second, None);
}

#[test]
#[serial]
fn config_from_env_collects_sections() {
    clear_env();
    std::env::set_var("TELOXIDE_TOKEN", "123:abc");
    std::env::set_var("GOOGLE_API_KEY", "k");
    let cfg = Config::from_env();
    assert_eq!(cfg.telegram_token.as_deref(), Some("123:abc"));
    assert_eq!(cfg.ai.unwrap().api_key, "k");
    assert!(cfg.api.is_none());
}

use std::env;

use crate::ai::config::AiConfig;

#[derive(Clone)]
pub struct Config {
    pub telegram_token: Option<String>,
    pub ai: Option<AiConfig>,
    pub api: Option<ApiServerConfig>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiServerConfig {
    pub addr: String,
    pub rate_limit_per_second: Option<u64>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let telegram_token = env::var("TELOXIDE_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        let ai = AiConfig::from_env();
        let api = ApiServerConfig::from_env();
        Self {
            telegram_token,
            ai,
            api,
        }
    }
}

impl ApiServerConfig {
    pub fn from_env() -> Option<Self> {
        let addr = env::var("PEDIDO_API_ADDR").ok()?;
        let rate_limit_per_second = match env::var("PEDIDO_API_RATE_LIMIT") {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(0) => None,
                Ok(limit) => Some(limit),
                Err(err) => {
                    tracing::warn!(value = %raw, error = %err, "Ignoring invalid PEDIDO_API_RATE_LIMIT");
                    None
                }
            },
            Err(_) => None,
        };
        Some(Self {
            addr,
            rate_limit_per_second,
        })
    }
}

//! Server config: bind address, CORS origins, model selection, collaborator
//! API keys, default location. Loaded from env.

use anyhow::Result;
use std::env;
use tracing::warn;

/// Config for the chatbot HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// BIND_ADDR
    pub bind_addr: String,
    /// ALLOWED_ORIGINS (comma-separated)
    pub allowed_origins: Vec<String>,
    /// LOG_FILE
    pub log_file: String,
    /// OPENAI_API_KEY (required)
    pub openai_api_key: String,
    /// OPENAI_BASE_URL
    pub openai_base_url: Option<String>,
    /// MODEL
    pub model: String,
    /// WEATHER_API_KEY
    pub weather_api_key: Option<String>,
    /// NEWS_API_KEY
    pub news_api_key: Option<String>,
    /// DEFAULT_LOCATION: fallback city for weather requests without one
    pub default_location: Option<String>,
}

impl ServerConfig {
    /// Load from environment variables. `bind` overrides BIND_ADDR if provided.
    pub fn load(bind: Option<String>) -> Result<Self> {
        let openai_api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY not set"))?;
        let bind_addr = bind
            .or_else(|| env::var("BIND_ADDR").ok())
            .unwrap_or_else(|| "0.0.0.0:8000".to_string());
        let allowed_origins: Vec<String> = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
        let log_file =
            env::var("LOG_FILE").unwrap_or_else(|_| "logs/cbot-server.log".to_string());
        let model = env::var("MODEL").unwrap_or_else(|_| "gpt-4".to_string());
        let openai_base_url = env::var("OPENAI_BASE_URL").ok();
        let weather_api_key = env::var("WEATHER_API_KEY").ok();
        let news_api_key = env::var("NEWS_API_KEY").ok();
        let default_location = env::var("DEFAULT_LOCATION").ok();

        if weather_api_key.is_none() {
            warn!("WEATHER_API_KEY not set; weather requests will report a missing key");
        }
        if news_api_key.is_none() {
            warn!("NEWS_API_KEY not set; news requests will report a missing key");
        }

        Ok(Self {
            bind_addr,
            allowed_origins,
            log_file,
            openai_api_key,
            openai_base_url,
            model,
            weather_api_key,
            news_api_key,
            default_location,
        })
    }

    /// Validate config: bind address must parse, origins must be valid
    /// header values.
    pub fn validate(&self) -> Result<()> {
        if self.bind_addr.parse::<std::net::SocketAddr>().is_err() {
            anyhow::bail!("BIND_ADDR is not a valid socket address: {}", self.bind_addr);
        }
        if self.allowed_origins.is_empty() {
            anyhow::bail!("ALLOWED_ORIGINS resolved to an empty list");
        }
        for origin in &self.allowed_origins {
            if origin.parse::<axum::http::HeaderValue>().is_err() {
                anyhow::bail!("ALLOWED_ORIGINS entry is not a valid origin: {}", origin);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        env::remove_var("OPENAI_API_KEY");
        env::remove_var("BIND_ADDR");
        env::remove_var("ALLOWED_ORIGINS");
        env::remove_var("LOG_FILE");
        env::remove_var("MODEL");
        env::remove_var("OPENAI_BASE_URL");
        env::remove_var("WEATHER_API_KEY");
        env::remove_var("NEWS_API_KEY");
        env::remove_var("DEFAULT_LOCATION");
    }

    #[test]
    #[serial]
    fn load_with_defaults() {
        clear_env();
        env::set_var("OPENAI_API_KEY", "test_key");

        let config = ServerConfig::load(None).unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:8000");
        assert_eq!(config.allowed_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.log_file, "logs/cbot-server.log");
        assert_eq!(config.model, "gpt-4");
        assert!(config.weather_api_key.is_none());
        assert!(config.default_location.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn load_with_custom_values() {
        clear_env();
        env::set_var("OPENAI_API_KEY", "test_key");
        env::set_var("BIND_ADDR", "127.0.0.1:9100");
        env::set_var("ALLOWED_ORIGINS", "http://test.com, http://example.com");
        env::set_var("MODEL", "gpt-4o-mini");
        env::set_var("WEATHER_API_KEY", "wk");
        env::set_var("DEFAULT_LOCATION", "Tempe");

        let config = ServerConfig::load(None).unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:9100");
        assert_eq!(
            config.allowed_origins,
            vec!["http://test.com", "http://example.com"]
        );
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.weather_api_key.as_deref(), Some("wk"));
        assert_eq!(config.default_location.as_deref(), Some("Tempe"));
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn missing_openai_key_is_an_error() {
        clear_env();
        assert!(ServerConfig::load(None).is_err());
    }

    #[test]
    #[serial]
    fn bind_override_wins_over_env() {
        clear_env();
        env::set_var("OPENAI_API_KEY", "test_key");
        env::set_var("BIND_ADDR", "0.0.0.0:8000");

        let config = ServerConfig::load(Some("127.0.0.1:9200".to_string())).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9200");
    }

    #[test]
    #[serial]
    fn invalid_bind_addr_fails_validation() {
        clear_env();
        env::set_var("OPENAI_API_KEY", "test_key");
        env::set_var("BIND_ADDR", "not-an-address");

        let config = ServerConfig::load(None).unwrap();
        assert!(config.validate().is_err());
    }
}

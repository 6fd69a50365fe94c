//! IP geolocation collaborator. Best-effort: any failure yields no result
//! rather than an error, so callers can fall through their location chain.

use std::time::Duration;

use cbot_core::BotError;
use serde::Deserialize;
use tracing::{info, warn};

pub const DEFAULT_GEO_BASE_URL: &str = "https://ipinfo.io";

/// Location fields consumed from the geolocation API.
#[derive(Debug, Clone, Deserialize)]
pub struct GeoLocation {
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    /// "lat,long" as a single string.
    pub loc: Option<String>,
}

/// Client for the geolocation API. Base URL is overridable for tests.
#[derive(Clone)]
pub struct GeoService {
    client: reqwest::Client,
    base_url: String,
}

impl GeoService {
    pub fn new() -> cbot_core::Result<Self> {
        Self::with_base_url(DEFAULT_GEO_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> cbot_core::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| BotError::Config(format!("geolocation HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Looks up the location of `ip`. Network, status, and parse failures
    /// all yield `None`.
    pub async fn lookup(&self, ip: &str) -> Option<GeoLocation> {
        info!(ip = %ip, "looking up location for client address");
        let url = format!("{}/{}/json", self.base_url, ip);
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(ip = %ip, error = %e, "geolocation request failed");
                return None;
            }
        };
        if !response.status().is_success() {
            warn!(ip = %ip, status = %response.status(), "geolocation HTTP error");
            return None;
        }
        match response.json::<GeoLocation>().await {
            Ok(location) => {
                info!(
                    ip = %ip,
                    city = ?location.city,
                    region = ?location.region,
                    country = ?location.country,
                    "resolved client location"
                );
                Some(location)
            }
            Err(e) => {
                warn!(ip = %ip, error = %e, "malformed geolocation payload");
                None
            }
        }
    }
}

//! Weather collaborator: current conditions and multi-point forecast, both
//! rendered as displayable text. All fetch failures map to fixed messages.

use std::time::Duration;

use cbot_core::{BotError, PeriodTag, TemperatureUnit};
use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::forecast::{next_occurrence, render_day, render_week, weekday_title};

pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

const MSG_MISSING_KEY: &str = "Weather API key is missing. Please configure it.";
const MSG_UNAVAILABLE: &str = "Weather data is unavailable for this location.";
const MSG_CONNECT: &str =
    "There was an issue connecting to the weather service. Try again later.";

/// One weather condition entry as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct CurrentMain {
    temp: f64,
    feels_like: f64,
    humidity: i64,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    #[serde(default)]
    weather: Vec<Condition>,
    main: Option<CurrentMain>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PointMain {
    pub temp: f64,
}

/// One timestamped forecast point.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPoint {
    /// Unix timestamp of the point.
    pub dt: i64,
    pub main: PointMain,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastPoint>,
}

#[derive(Error, Debug)]
enum FetchError {
    #[error("city not found")]
    NotFound,
    #[error("HTTP status {0}")]
    Status(reqwest::StatusCode),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Client for the weather API. Base URL is overridable for tests.
#[derive(Clone)]
pub struct WeatherService {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl WeatherService {
    pub fn new(api_key: Option<String>) -> cbot_core::Result<Self> {
        Self::with_base_url(api_key, DEFAULT_WEATHER_BASE_URL)
    }

    pub fn with_base_url(
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> cbot_core::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| BotError::Config(format!("weather HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.into(),
        })
    }

    /// Renders the weather reply for `city`: current conditions when no
    /// period (or `now`) was requested, a bucketed forecast otherwise.
    pub async fn weather_reply(
        &self,
        city: &str,
        unit: TemperatureUnit,
        period: Option<PeriodTag>,
    ) -> String {
        match period {
            None | Some(PeriodTag::Now) => self.current_reply(city, unit).await,
            Some(tag) => self.forecast_reply(city, unit, tag).await,
        }
    }

    async fn current_reply(&self, city: &str, unit: TemperatureUnit) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("weather API key is missing");
            return MSG_MISSING_KEY.to_string();
        };

        info!(city = %city, unit = %unit.api_value(), "fetching current weather");
        let result: Result<CurrentResponse, FetchError> = self
            .get_json(&format!("{}/weather", self.base_url), city, unit, api_key)
            .await;

        match result {
            Ok(data) => match (data.weather.first(), data.main) {
                (Some(condition), Some(main)) => {
                    let symbol = unit.symbol();
                    format!(
                        "The weather in {} is {} with a temperature of {:.1}{} (feels like {:.1}{}) and humidity at {}%.",
                        city, condition.description, main.temp, symbol, main.feels_like, symbol, main.humidity
                    )
                }
                _ => {
                    warn!(city = %city, "incomplete current weather payload");
                    MSG_UNAVAILABLE.to_string()
                }
            },
            Err(e) => self.error_reply(city, e),
        }
    }

    async fn forecast_reply(&self, city: &str, unit: TemperatureUnit, tag: PeriodTag) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("weather API key is missing");
            return MSG_MISSING_KEY.to_string();
        };

        info!(city = %city, period = %tag, "fetching forecast");
        let result: Result<ForecastResponse, FetchError> = self
            .get_json(&format!("{}/forecast", self.base_url), city, unit, api_key)
            .await;
        let points = match result {
            Ok(data) => data.list,
            Err(e) => return self.error_reply(city, e),
        };

        let today = Utc::now().date_naive();
        match tag {
            PeriodTag::Now | PeriodTag::Today | PeriodTag::LaterToday => {
                render_day(city, unit, &points, today, "today")
            }
            PeriodTag::Tomorrow => {
                render_day(city, unit, &points, today + chrono::Duration::days(1), "tomorrow")
            }
            PeriodTag::Weekday(day) => {
                let date = next_occurrence(today, day);
                let when = format!("on {}", weekday_title(day));
                render_day(city, unit, &points, date, &when)
            }
            PeriodTag::Week | PeriodTag::FiveDay => render_week(city, unit, &points, today),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        city: &str,
        unit: TemperatureUnit,
        api_key: &str,
    ) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .query(&[
                ("q", city),
                ("appid", api_key),
                ("units", unit.api_value()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        Ok(response.json::<T>().await?)
    }

    fn error_reply(&self, city: &str, error: FetchError) -> String {
        match error {
            FetchError::NotFound => {
                warn!(city = %city, "city not found");
                format!(
                    "Could not find weather data for '{}'. Please check the city name.",
                    city
                )
            }
            FetchError::Status(status) => {
                warn!(city = %city, status = %status, "weather HTTP error");
                format!("HTTP Error: {}", status)
            }
            FetchError::Request(e) if e.is_decode() => {
                warn!(city = %city, error = %e, "malformed weather payload");
                MSG_UNAVAILABLE.to_string()
            }
            FetchError::Request(e) => {
                warn!(city = %city, error = %e, "weather request failed");
                MSG_CONNECT.to_string()
            }
        }
    }
}

//! # cbot-services
//!
//! Outbound data-fetch collaborators: current weather and forecast (with
//! bucketed natural-language rendering), top headlines, and IP geolocation.
//! Every service maps its own failures to stable user-facing text (weather,
//! news) or to an absent result (geolocation); callers never see raw
//! transport errors.

pub mod forecast;
pub mod geolocation;
pub mod news;
pub mod weather;

pub use geolocation::{GeoLocation, GeoService};
pub use news::NewsService;
pub use weather::WeatherService;

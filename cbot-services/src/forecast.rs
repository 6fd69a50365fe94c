//! Forecast bucketing and rendering: groups raw forecast points by calendar
//! date and time-of-day band, then summarizes each bucket as a mean
//! temperature plus the most frequent condition.

use cbot_core::{weekday_name, TemperatureUnit};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use tracing::debug;

use crate::weather::ForecastPoint;

/// Time-of-day bands used for single-day forecasts. Hours outside 06:00 to
/// 24:00 fall into no band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Morning,
    Afternoon,
    Evening,
}

impl Band {
    pub const ALL: [Band; 3] = [Band::Morning, Band::Afternoon, Band::Evening];

    pub fn label(&self) -> &'static str {
        match self {
            Band::Morning => "Morning",
            Band::Afternoon => "Afternoon",
            Band::Evening => "Evening",
        }
    }

    /// Band for an hour of day, naive wall clock.
    pub fn for_hour(hour: u32) -> Option<Band> {
        match hour {
            6..=11 => Some(Band::Morning),
            12..=17 => Some(Band::Afternoon),
            18..=23 => Some(Band::Evening),
            _ => None,
        }
    }
}

/// Wall-clock datetime of a forecast point, as returned by the collaborator.
pub fn point_datetime(point: &ForecastPoint) -> Option<NaiveDateTime> {
    chrono::DateTime::from_timestamp(point.dt, 0).map(|dt| dt.naive_utc())
}

/// Mean of the points' temperatures. `None` for an empty slice.
fn mean_temp(points: &[&ForecastPoint]) -> Option<f64> {
    if points.is_empty() {
        return None;
    }
    let sum: f64 = points.iter().map(|p| p.main.temp).sum();
    Some(sum / points.len() as f64)
}

/// Most frequent condition name; ties break to the first condition seen.
fn mode_condition<'a>(conditions: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for condition in conditions {
        match counts.iter_mut().find(|(name, _)| *name == condition) {
            Some((_, count)) => *count += 1,
            None => counts.push((condition, 1)),
        }
    }
    counts
        .iter()
        .max_by_key(|(_, count)| *count)
        .map(|(name, _)| *name)
}

/// Summary line for a bucket: mean temperature and, when any point carries a
/// condition, the mode condition.
fn bucket_line(label: &str, points: &[&ForecastPoint], unit: TemperatureUnit) -> Option<String> {
    let mean = mean_temp(points)?;
    let condition = mode_condition(
        points
            .iter()
            .filter_map(|p| p.weather.first())
            .map(|c| c.main.as_str()),
    );
    Some(match condition {
        Some(condition) => format!("{}: {:.1}{}, {}", label, mean, unit.symbol(), condition),
        None => format!("{}: {:.1}{}", label, mean, unit.symbol()),
    })
}

/// Points falling on `date`, in input order.
fn points_on<'a>(points: &'a [ForecastPoint], date: NaiveDate) -> Vec<&'a ForecastPoint> {
    points
        .iter()
        .filter(|p| point_datetime(p).is_some_and(|dt| dt.date() == date))
        .collect()
}

/// Renders a single day bucketed by morning/afternoon/evening. Empty bands
/// are omitted; a day with no points yields a no-data message.
pub fn render_day(
    city: &str,
    unit: TemperatureUnit,
    points: &[ForecastPoint],
    date: NaiveDate,
    when: &str,
) -> String {
    let day_points = points_on(points, date);
    if day_points.is_empty() {
        debug!(city = %city, date = %date, "no forecast points for requested day");
        return format!("No forecast data available for {} {}.", city, when);
    }

    let mut lines = vec![format!("Forecast for {} {}:", city, when)];
    for band in Band::ALL {
        let band_points: Vec<&ForecastPoint> = day_points
            .iter()
            .copied()
            .filter(|p| {
                point_datetime(p).is_some_and(|dt| Band::for_hour(dt.hour()) == Some(band))
            })
            .collect();
        if let Some(line) = bucket_line(band.label(), &band_points, unit) {
            lines.push(line);
        }
    }
    lines.join("\n")
}

/// Renders up to five calendar days starting today, one summary line per
/// day with data, labeled by weekday name.
pub fn render_week(
    city: &str,
    unit: TemperatureUnit,
    points: &[ForecastPoint],
    today: NaiveDate,
) -> String {
    let mut lines = vec![format!("5-day forecast for {}:", city)];
    for offset in 0..5i64 {
        let date = today + chrono::Duration::days(offset);
        let day_points = points_on(points, date);
        if day_points.is_empty() {
            continue;
        }
        if let Some(line) = bucket_line(&weekday_title(date.weekday()), &day_points, unit) {
            lines.push(line);
        }
    }
    if lines.len() == 1 {
        return format!("No forecast data available for {} this week.", city);
    }
    lines.join("\n")
}

/// Next future occurrence of `target`; a request for today's weekday means
/// next week, never today.
pub fn next_occurrence(today: NaiveDate, target: Weekday) -> NaiveDate {
    let mut days_ahead = (target.num_days_from_monday() as i64
        - today.weekday().num_days_from_monday() as i64)
        .rem_euclid(7);
    if days_ahead == 0 {
        days_ahead = 7;
    }
    today + chrono::Duration::days(days_ahead)
}

/// Capitalized weekday name ("Monday").
pub fn weekday_title(day: Weekday) -> String {
    let name = weekday_name(day);
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

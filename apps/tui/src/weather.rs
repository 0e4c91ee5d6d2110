use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

/// NEA 24-hour forecast endpoint. No auth, no query parameters.
pub const DEFAULT_FORECAST_URL: &str =
    "https://api.data.gov.sg/v1/environment/24-hour-weather-forecast";

/// Upper bound on rendered forecast entries.
pub const MAX_ENTRIES: usize = 8;

/// Internal failure kinds. Absorbed by `fetch_forecast`; every one of them
/// degrades to the fallback dataset rather than an outward error.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("forecast request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("forecast endpoint returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("forecast body undecodable: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("forecast body contained no data")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastSource {
    Live,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastEntry {
    pub label: String,
    pub icon: &'static str,
    pub condition: String,
    pub humidity: u8,
}

/// Everything the weather region renders: a header line and a bounded list
/// of entries. Replaces the whole region on each fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastView {
    pub source: ForecastSource,
    pub header: String,
    pub entries: Vec<ForecastEntry>,
}

impl ForecastView {
    pub const fn is_fallback(&self) -> bool {
        matches!(self.source, ForecastSource::Fallback)
    }
}

// Ordered first-match-wins rules over the lowercased condition text.
// "Partly Cloudy" matches "cloudy" before "partly"; substring matching is
// inherently fuzzy.
const ICON_RULES: &[(&str, &str)] = &[
    ("rain", "\u{1f327}"),
    ("shower", "\u{1f327}"),
    ("thunder", "\u{26c8}"),
    ("lightning", "\u{26c8}"),
    ("cloudy", "\u{2601}"),
    ("overcast", "\u{2601}"),
    ("clear", "\u{2600}"),
    ("sunny", "\u{2600}"),
    ("partly", "\u{26c5}"),
    ("haze", "\u{1f32b}"),
    ("mist", "\u{1f32b}"),
    ("fog", "\u{1f301}"),
];

const NEUTRAL_ICON: &str = "\u{1f324}";

pub fn condition_icon(condition: &str) -> &'static str {
    let lowered = condition.to_lowercase();
    ICON_RULES
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map_or(NEUTRAL_ICON, |(_, icon)| icon)
}

// The fixed fallback dataset, used verbatim (icons included) when the live
// call fails for any reason.
const FALLBACK_FORECAST: &[(&str, &str, &str, u8)] = &[
    ("12:00", "\u{2600}", "Sunny", 65),
    ("15:00", "\u{26c5}", "Partly Cloudy", 72),
    ("18:00", "\u{1f327}", "Light Rain", 85),
    ("21:00", "\u{26c8}", "Thunderstorm", 90),
    ("00:00", "\u{1f319}", "Clear Night", 60),
    ("03:00", "\u{1f32b}", "Haze", 70),
    ("06:00", "\u{2600}", "Sunny", 55),
    ("09:00", "\u{26c5}", "Mostly Sunny", 68),
];

pub fn fallback_view() -> ForecastView {
    ForecastView {
        source: ForecastSource::Fallback,
        header: "Singapore 24-Hour Forecast (demo data)".to_string(),
        entries: FALLBACK_FORECAST
            .iter()
            .map(|&(label, icon, condition, humidity)| ForecastEntry {
                label: label.to_string(),
                icon,
                condition: condition.to_string(),
                humidity,
            })
            .collect(),
    }
}

#[derive(Debug, Deserialize)]
struct NeaResponse {
    #[serde(default)]
    items: Vec<NeaItem>,
}

#[derive(Debug, Deserialize)]
struct NeaItem {
    valid_period: Option<NeaValidPeriod>,
    #[serde(default)]
    forecasts: Vec<NeaForecast>,
}

#[derive(Debug, Deserialize)]
struct NeaValidPeriod {
    start: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NeaForecast {
    timestamp: Option<String>,
    forecast: String,
    relative_humidity: u8,
}

/// One GET to the forecast endpoint. Never fails outward: any non-success
/// status, transport failure, decode failure or empty result list yields
/// the fallback dataset instead.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    http: Client,
    url: String,
}

impl ForecastClient {
    // No explicit timeout here; the fetch relies on platform defaults.
    pub fn new(url: String) -> reqwest::Result<Self> {
        let http = Client::builder().build()?;
        Ok(Self { http, url })
    }

    pub async fn fetch_forecast(&self) -> ForecastView {
        match self.fetch_live().await {
            Ok(view) => view,
            Err(e) => {
                eprintln!("weather: falling back to demo data: {e}");
                fallback_view()
            }
        }
    }

    async fn fetch_live(&self) -> Result<ForecastView, WeatherError> {
        let response = self
            .http
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status));
        }

        let body = response.text().await?;
        let parsed: NeaResponse = serde_json::from_str(&body)?;
        build_view(&parsed)
    }
}

fn build_view(response: &NeaResponse) -> Result<ForecastView, WeatherError> {
    let item = response.items.first().ok_or(WeatherError::Empty)?;
    if item.forecasts.is_empty() {
        return Err(WeatherError::Empty);
    }

    let issued = item
        .valid_period
        .as_ref()
        .and_then(|period| period.start.as_deref())
        .map(time_label);
    let header = match issued {
        Some(time) => format!("Singapore 24-Hour Forecast (updated {time})"),
        None => "Singapore 24-Hour Forecast".to_string(),
    };

    let entries = item
        .forecasts
        .iter()
        .take(MAX_ENTRIES)
        .map(|forecast| ForecastEntry {
            label: forecast
                .timestamp
                .as_deref()
                .map_or_else(String::new, |ts| time_label(ts)),
            icon: condition_icon(&forecast.forecast),
            condition: forecast.forecast.clone(),
            humidity: forecast.relative_humidity,
        })
        .collect();

    Ok(ForecastView {
        source: ForecastSource::Live,
        header,
        entries,
    })
}

// RFC 3339 timestamps become HH:MM; anything else is shown as-is.
fn time_label(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map_or_else(|_| timestamp.to_string(), |dt| dt.format("%H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifier_matches_known_vocabulary() {
        assert_eq!(condition_icon("Light Rain"), "\u{1f327}");
        assert_eq!(condition_icon("Heavy Showers"), "\u{1f327}");
        assert_eq!(condition_icon("Thunderstorm"), "\u{26c8}");
        assert_eq!(condition_icon("Overcast"), "\u{2601}");
        assert_eq!(condition_icon("Sunny"), "\u{2600}");
        assert_eq!(condition_icon("Clear"), "\u{2600}");
        assert_eq!(condition_icon("Hazy skies"), "\u{1f32b}");
        assert_eq!(condition_icon("Misty morning"), "\u{1f32b}");
        assert_eq!(condition_icon("Fog"), "\u{1f301}");
    }

    #[test]
    fn classifier_is_first_match_wins() {
        // "cloudy" precedes "partly" in the rule order, so the combined
        // condition picks the cloud icon.
        assert_eq!(condition_icon("Partly Cloudy"), "\u{2601}");
        // "partly" alone still has its own rule.
        assert_eq!(condition_icon("Partly sunny spells"), "\u{2600}");
        assert_eq!(condition_icon("Partly hazy"), "\u{26c5}");
        // "shower" precedes "thunder", so mixed conditions read as rain.
        assert_eq!(condition_icon("Thundery Showers"), "\u{1f327}");
    }

    #[test]
    fn classifier_defaults_to_neutral() {
        assert_eq!(condition_icon("Windy"), NEUTRAL_ICON);
        assert_eq!(condition_icon(""), NEUTRAL_ICON);
    }

    #[test]
    fn fallback_has_eight_verbatim_entries() {
        let view = fallback_view();
        assert!(view.is_fallback());
        assert_eq!(view.entries.len(), 8);
        assert_eq!(view.entries[0].label, "12:00");
        assert_eq!(view.entries[0].condition, "Sunny");
        assert_eq!(view.entries[0].humidity, 65);
        // Verbatim icons, not re-classified: "Clear Night" keeps its moon.
        assert_eq!(view.entries[4].condition, "Clear Night");
        assert_eq!(view.entries[4].icon, "\u{1f319}");
    }

    fn sample_body(count: usize) -> String {
        let forecasts: Vec<String> = (0..count)
            .map(|i| {
                format!(
                    r#"{{"timestamp":"2025-06-01T{:02}:00:00+08:00","forecast":"Partly Cloudy","relative_humidity":{}}}"#,
                    (i * 3) % 24,
                    60 + i
                )
            })
            .collect();
        format!(
            r#"{{"items":[{{"valid_period":{{"start":"2025-06-01T06:00:00+08:00"}},"forecasts":[{}]}}]}}"#,
            forecasts.join(",")
        )
    }

    #[test]
    fn build_view_bounds_entries_and_keeps_order() {
        let parsed: NeaResponse = serde_json::from_str(&sample_body(12)).unwrap();
        let view = build_view(&parsed).unwrap();

        assert_eq!(view.source, ForecastSource::Live);
        assert_eq!(view.entries.len(), MAX_ENTRIES);
        assert_eq!(view.entries[0].label, "00:00");
        assert_eq!(view.entries[1].label, "03:00");
        assert_eq!(view.entries[0].humidity, 60);
        assert_eq!(view.entries[7].humidity, 67);
        assert!(view.header.contains("updated 06:00"));
    }

    #[test]
    fn build_view_keeps_short_lists_whole() {
        let parsed: NeaResponse = serde_json::from_str(&sample_body(3)).unwrap();
        let view = build_view(&parsed).unwrap();
        assert_eq!(view.entries.len(), 3);
    }

    #[test]
    fn build_view_icons_match_classifier() {
        let parsed: NeaResponse = serde_json::from_str(&sample_body(2)).unwrap();
        let view = build_view(&parsed).unwrap();
        for entry in &view.entries {
            assert_eq!(entry.icon, condition_icon(&entry.condition));
        }
    }

    #[test]
    fn build_view_rejects_empty_items() {
        let parsed: NeaResponse = serde_json::from_str(r#"{"items":[]}"#).unwrap();
        assert!(matches!(build_view(&parsed), Err(WeatherError::Empty)));
    }

    #[test]
    fn build_view_rejects_missing_forecast_list() {
        let parsed: NeaResponse =
            serde_json::from_str(r#"{"items":[{"valid_period":null}]}"#).unwrap();
        assert!(matches!(build_view(&parsed), Err(WeatherError::Empty)));
    }

    #[test]
    fn body_without_items_key_decodes_then_rejects() {
        let parsed: NeaResponse = serde_json::from_str(r#"{"api_info":{"status":"healthy"}}"#).unwrap();
        assert!(matches!(build_view(&parsed), Err(WeatherError::Empty)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_fallback() {
        // Port 9 (discard) refuses connections locally; no network needed.
        let client = ForecastClient::new("http://127.0.0.1:9/forecast".to_string()).unwrap();
        let view = client.fetch_forecast().await;
        assert!(view.is_fallback());
        assert_eq!(view.entries.len(), 8);
    }

    #[test]
    fn time_label_falls_back_to_raw_text() {
        assert_eq!(time_label("2025-06-01T18:30:00+08:00"), "18:30");
        assert_eq!(time_label("later today"), "later today");
    }
}

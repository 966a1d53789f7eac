use anyhow::Result;
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    config::Endpoints,
    model::{CurrentConditions, Location},
    transport::{HttpRequest, Transport, fetch_json},
};

/// Geocode -> forecast lookup against Open-Meteo style endpoints.
#[derive(Debug, Clone)]
pub struct WeatherLookup {
    transport: Arc<dyn Transport>,
    geocoding_url: String,
    forecast_url: String,
}

impl WeatherLookup {
    pub fn new(transport: Arc<dyn Transport>, endpoints: &Endpoints) -> Self {
        Self {
            transport,
            geocoding_url: endpoints.geocoding_url.clone(),
            forecast_url: endpoints.forecast_url.clone(),
        }
    }

    /// Human-readable current weather for `city`.
    ///
    /// Unknown cities and empty input come back as ordinary replies; only transport
    /// and decoding failures are errors.
    pub async fn weather_for(&self, city: &str) -> Result<String> {
        let city = city.trim();
        if city.is_empty() {
            return Ok("Please provide a city name for the weather.".to_string());
        }

        let Some(location) = self.geocode(city).await? else {
            return Ok(format!("I couldn't find coordinates for {city}."));
        };

        let conditions = self.current_conditions(&location).await?;
        Ok(describe(&location, &conditions))
    }

    pub async fn geocode(&self, city: &str) -> Result<Option<Location>> {
        let request = HttpRequest::get(&self.geocoding_url)
            .query("name", city)
            .query("count", 1);

        let parsed: OmGeocodeResponse = fetch_json(self.transport.as_ref(), request).await?;
        Ok(parsed.results.into_iter().next())
    }

    pub async fn current_conditions(&self, location: &Location) -> Result<CurrentConditions> {
        let request = HttpRequest::get(&self.forecast_url)
            .query("latitude", location.latitude)
            .query("longitude", location.longitude)
            .query("current", "temperature_2m,weather_code");

        let parsed: OmForecastResponse = fetch_json(self.transport.as_ref(), request).await?;
        let current = parsed.current.unwrap_or_default();

        Ok(CurrentConditions {
            temperature: current.temperature_2m,
            temperature_unit: parsed
                .current_units
                .and_then(|u| u.temperature_2m)
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| "?C".to_string()),
            weather_code: current.weather_code,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OmGeocodeResponse {
    #[serde(default)]
    results: Vec<Location>,
}

#[derive(Debug, Default, Deserialize)]
struct OmCurrent {
    temperature_2m: Option<f64>,
    weather_code: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OmCurrentUnits {
    temperature_2m: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    current: Option<OmCurrent>,
    current_units: Option<OmCurrentUnits>,
}

fn describe(location: &Location, conditions: &CurrentConditions) -> String {
    let country = location
        .country
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(|c| format!(", {c}"))
        .unwrap_or_default();

    let temperature = conditions
        .temperature
        .map(|t| t.to_string())
        .unwrap_or_else(|| "?".to_string());

    format!(
        "Weather in {}{}: {}{}, {}.",
        location.name,
        country,
        temperature,
        conditions.temperature_unit,
        weather_code_text(conditions.weather_code),
    )
}

/// WMO weather code to a short phrase.
pub fn weather_code_text(code: Option<i64>) -> &'static str {
    match code {
        Some(0) => "clear sky",
        Some(1..=3) => "partly cloudy",
        Some(45 | 48) => "foggy",
        Some(51 | 53 | 55) => "drizzle",
        Some(61 | 63 | 65) => "rain",
        Some(71 | 73 | 75) => "snow",
        Some(95 | 96 | 99) => "thunderstorm",
        _ => "unavailable conditions",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::FakeTransport;

    const GEO: &str = "https://geo.test/search";
    const FORECAST: &str = "https://forecast.test/forecast";

    fn endpoints() -> Endpoints {
        Endpoints {
            geocoding_url: GEO.to_string(),
            forecast_url: FORECAST.to_string(),
            ..Endpoints::default()
        }
    }

    fn lookup(fake: &Arc<FakeTransport>) -> WeatherLookup {
        WeatherLookup::new(fake.clone(), &endpoints())
    }

    #[tokio::test]
    async fn empty_city_prompts_without_network() {
        let fake = Arc::new(FakeTransport::new());

        let reply = lookup(&fake).weather_for("   ").await.unwrap();

        assert_eq!(reply, "Please provide a city name for the weather.");
        assert_eq!(fake.calls(), 0);
    }

    #[tokio::test]
    async fn unknown_city_is_a_reply_not_an_error() {
        let fake = Arc::new(FakeTransport::new().respond(GEO, 200, r#"{"generationtime_ms": 0.5}"#));

        let reply = lookup(&fake).weather_for("Nowhereville").await.unwrap();

        assert_eq!(reply, "I couldn't find coordinates for Nowhereville.");
        assert_eq!(fake.calls(), 1);
    }

    #[tokio::test]
    async fn geocode_then_forecast_composes_reply() {
        let fake = Arc::new(
            FakeTransport::new()
                .respond(
                    GEO,
                    200,
                    r#"{"results":[{"name":"Paris","latitude":48.85,"longitude":2.35,"country":"France"}]}"#,
                )
                .respond(
                    FORECAST,
                    200,
                    r#"{"current":{"temperature_2m":18,"weather_code":1},"current_units":{"temperature_2m":"°C"}}"#,
                ),
        );

        let reply = lookup(&fake).weather_for("paris").await.unwrap();

        assert_eq!(reply, "Weather in Paris, France: 18°C, partly cloudy.");

        let geo = fake.request(0);
        assert_eq!(geo.url, GEO);
        assert!(geo.query.contains(&("name".to_string(), "paris".to_string())));
        assert!(geo.query.contains(&("count".to_string(), "1".to_string())));

        let forecast = fake.request(1);
        assert!(forecast.query.contains(&("latitude".to_string(), "48.85".to_string())));
        assert!(forecast.query.contains(&("longitude".to_string(), "2.35".to_string())));
    }

    #[tokio::test]
    async fn missing_fields_use_placeholders() {
        let fake = Arc::new(
            FakeTransport::new()
                .respond(GEO, 200, r#"{"results":[{"name":"Atlantis","latitude":0.0,"longitude":0.0}]}"#)
                .respond(FORECAST, 200, r#"{}"#),
        );

        let reply = lookup(&fake).weather_for("atlantis").await.unwrap();

        assert_eq!(reply, "Weather in Atlantis: ??C, unavailable conditions.");
    }

    #[tokio::test]
    async fn forecast_failure_propagates() {
        let fake = Arc::new(
            FakeTransport::new()
                .respond(GEO, 200, r#"{"results":[{"name":"Oslo","latitude":59.9,"longitude":10.7}]}"#)
                .respond(FORECAST, 502, "bad gateway"),
        );

        let err = lookup(&fake).weather_for("oslo").await.unwrap_err();

        assert_eq!(err.to_string(), format!("HTTP 502 for {FORECAST}"));
    }

    #[test]
    fn weather_code_table() {
        let table: &[(&[i64], &str)] = &[
            (&[0], "clear sky"),
            (&[1, 2, 3], "partly cloudy"),
            (&[45, 48], "foggy"),
            (&[51, 53, 55], "drizzle"),
            (&[61, 63, 65], "rain"),
            (&[71, 73, 75], "snow"),
            (&[95, 96, 99], "thunderstorm"),
        ];

        for (codes, phrase) in table {
            for code in *codes {
                assert_eq!(weather_code_text(Some(*code)), *phrase, "code {code}");
            }
        }
    }

    #[test]
    fn unmapped_codes_are_unavailable() {
        for code in [-1, 4, 44, 50, 56, 80, 100, i64::MAX] {
            assert_eq!(weather_code_text(Some(code)), "unavailable conditions");
        }
        assert_eq!(weather_code_text(None), "unavailable conditions");
    }
}

use serde::{Deserialize, Serialize};

/// What a user message is asking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Current weather for a city.
    Weather(String),
    /// Encyclopedia summary for a topic.
    Encyclopedia(String),
    Time,
    /// Nothing matched; goes to the generative fallback.
    Chat,
}

/// First geocoding hit for a city query.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub temperature: Option<f64>,
    pub temperature_unit: String,
    pub weather_code: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EncyclopediaPage {
    pub title: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncyclopediaSummary {
    pub title: String,
    pub extract: String,
    pub canonical_url: Option<String>,
}

/// The single reply produced for every routed message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteReply {
    pub reply: String,
    pub status: u16,
}

impl RouteReply {
    pub fn ok(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            status: 200,
        }
    }

    pub fn bad_request(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            status: 400,
        }
    }

    pub fn internal_error(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            status: 500,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

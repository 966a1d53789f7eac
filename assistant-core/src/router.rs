//! Routes a message through classifier -> tool -> generative fallback -> canned reply.

use anyhow::Result;
use chrono::{DateTime, Local};
use std::sync::Arc;

use crate::{
    config::Config,
    generative::GenerativeClient,
    intent::classify,
    model::{Intent, RouteReply},
    tools::{EncyclopediaLookup, WeatherLookup},
    transport::{HttpTransport, Transport},
};

pub const EMPTY_MESSAGE_REPLY: &str = "Please provide a message.";

pub const LOCAL_MODE_REPLY: &str =
    "I'm operating in local mode. Try asking for weather, quick facts, or provide an OpenAI key.";

/// Stateless per call; safe to share across concurrent requests.
#[derive(Debug, Clone)]
pub struct Assistant {
    weather: WeatherLookup,
    encyclopedia: EncyclopediaLookup,
    generative: GenerativeClient,
}

impl Assistant {
    pub fn new(
        weather: WeatherLookup,
        encyclopedia: EncyclopediaLookup,
        generative: GenerativeClient,
    ) -> Self {
        Self {
            weather,
            encyclopedia,
            generative,
        }
    }

    /// Build every client on top of a single shared transport.
    pub fn with_transport(transport: Arc<dyn Transport>, config: &Config) -> Self {
        Self::new(
            WeatherLookup::new(transport.clone(), &config.endpoints),
            EncyclopediaLookup::new(transport.clone(), &config.endpoints),
            GenerativeClient::new(transport, &config.generative, config.api_key()),
        )
    }

    pub fn from_config(config: &Config) -> Self {
        let transport = Arc::new(HttpTransport::new(&config.endpoints.user_agent));
        Self::with_transport(transport, config)
    }

    pub fn weather(&self) -> &WeatherLookup {
        &self.weather
    }

    pub fn encyclopedia(&self) -> &EncyclopediaLookup {
        &self.encyclopedia
    }

    /// Always produces exactly one reply: 200 on the normal path, 400 for an empty
    /// message, 500 when any stage fails.
    pub async fn route(&self, message: &str) -> RouteReply {
        let message = message.trim();
        if message.is_empty() {
            return RouteReply::bad_request(EMPTY_MESSAGE_REPLY);
        }

        match self.dispatch(message).await {
            Ok(reply) => RouteReply::ok(reply),
            Err(err) => {
                tracing::warn!(error = %err, "route failed");
                RouteReply::internal_error(format!("I ran into an error: {err}"))
            }
        }
    }

    async fn dispatch(&self, message: &str) -> Result<String> {
        match classify(message) {
            Intent::Weather(city) => {
                tracing::info!(%city, "dispatching to weather lookup");
                self.weather.weather_for(&city).await
            }
            Intent::Encyclopedia(topic) => {
                tracing::info!(%topic, "dispatching to encyclopedia lookup");
                self.encyclopedia.summary_for(&topic).await
            }
            Intent::Time => Ok(time_reply(Local::now())),
            Intent::Chat => {
                tracing::info!(
                    configured = self.generative.is_configured(),
                    "dispatching to generative fallback"
                );
                let reply = self.generative.generate(message).await?;
                Ok(reply.unwrap_or_else(|| LOCAL_MODE_REPLY.to_string()))
            }
        }
    }
}

/// Hour and minute only, e.g. "The current time is 09:05 PM."
pub fn time_reply(now: DateTime<Local>) -> String {
    format!("The current time is {}.", now.format("%I:%M %p"))
}

//! Core library for the `assistant` CLI.
//!
//! This crate defines:
//! - Rule-based intent classification
//! - Weather and encyclopedia lookups over third-party HTTP APIs
//! - A generative fallback over an OpenAI-compatible chat API
//! - The router that ties them together into one reply per message
//!
//! It is used by `assistant-cli`, but any transport (HTTP handler, chat bot) can
//! call [`Assistant::route`] with a plain string and get a plain string back.

pub mod config;
pub mod generative;
pub mod intent;
pub mod model;
pub mod router;
pub mod tools;
pub mod transport;

pub use config::{Config, Endpoints, GenerativeConfig};
pub use generative::GenerativeClient;
pub use intent::classify;
pub use model::{
    CurrentConditions, EncyclopediaPage, EncyclopediaSummary, Intent, Location, RouteReply,
};
pub use router::Assistant;
pub use tools::{EncyclopediaLookup, WeatherLookup};
pub use transport::{FetchError, HttpTransport, Transport};

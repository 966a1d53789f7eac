//! Deterministic lookups that can answer a message without the generative fallback.

pub mod encyclopedia;
pub mod weather;

pub use encyclopedia::EncyclopediaLookup;
pub use weather::{WeatherLookup, weather_code_text};

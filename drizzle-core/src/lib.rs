//! Core library for the `drizzle` weather viewer.
//!
//! This crate defines:
//! - OpenWeatherMap records and the retriever that fetches them
//! - An observable view state for loading several locations
//! - Persistent location settings and configuration
//! - Unit, time and colour helpers used when rendering
//!
//! It is used by `drizzle-cli`, but can also be reused by other front-ends.

pub mod color;
pub mod config;
pub mod model;
pub mod retriever;
pub mod settings;
pub mod state;
pub mod units;

pub use color::Color;
pub use config::Config;
pub use model::{CompleteWeather, CurrentWeather, Forecast, ForecastEntry};
pub use retriever::{OpenWeatherMapRetriever, RetrieveError, WeatherRetriever};
pub use settings::{LocationSlot, SettingsError, SettingsStore};
pub use state::{ViewState, WeatherViewModel};

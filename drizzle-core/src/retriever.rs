use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use thiserror::Error;

use crate::{
    Config,
    model::{CompleteWeather, CurrentWeather, Forecast},
};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const CURRENT_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";

#[derive(Debug, Error)]
pub enum RetrieveError {
    #[error("Failed to send {endpoint} request for '{location}': {source}")]
    Request {
        endpoint: &'static str,
        location: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Location '{location}' is unknown to OpenWeatherMap")]
    NotFound { location: String },

    #[error("OpenWeatherMap {endpoint} request failed with status {status}: {body}")]
    Status { endpoint: &'static str, status: StatusCode, body: String },

    #[error("Failed to parse OpenWeatherMap {endpoint} JSON: {source}")]
    Parse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait WeatherRetriever: Send + Sync + Debug {
    async fn current(&self, location: &str) -> Result<CurrentWeather, RetrieveError>;

    async fn forecast(&self, location: &str) -> Result<Forecast, RetrieveError>;

    /// Whether [`WeatherRetriever::weather_for_location`] also fetches the forecast.
    fn includes_forecast(&self) -> bool {
        true
    }

    /// Current conditions, plus the forecast when enabled.
    async fn weather_for_location(&self, location: &str) -> Result<CompleteWeather, RetrieveError> {
        let current = self.current(location).await?;
        let forecast = if self.includes_forecast() {
            Some(self.forecast(location).await?)
        } else {
            None
        };

        Ok(CompleteWeather { current, forecast })
    }
}

#[derive(Debug, Clone)]
pub struct OpenWeatherMapRetriever {
    api_key: String,
    base_url: String,
    include_forecast: bool,
    http: Client,
}

impl OpenWeatherMapRetriever {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            include_forecast: true,
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.resolve_api_key()?;
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        let retriever = Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            include_forecast: config.include_forecast,
            http,
        };

        Ok(match &config.base_url {
            Some(url) => retriever.with_base_url(url),
            None => retriever,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_forecast(mut self, include_forecast: bool) -> Self {
        self.include_forecast = include_forecast;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        location: &str,
    ) -> Result<T, RetrieveError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(endpoint, location, "requesting OpenWeatherMap");

        let request_err = |source| RetrieveError::Request {
            endpoint,
            location: location.to_string(),
            source,
        };

        let res = self
            .http
            .get(&url)
            .query(&[("q", location), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(request_err)?;

        let status = res.status();
        let body = res.text().await.map_err(request_err)?;

        if status == StatusCode::NOT_FOUND {
            return Err(RetrieveError::NotFound { location: location.to_string() });
        }

        if !status.is_success() {
            return Err(RetrieveError::Status { endpoint, status, body: truncate_body(&body) });
        }

        serde_json::from_str(&body).map_err(|source| RetrieveError::Parse { endpoint, source })
    }
}

#[async_trait]
impl WeatherRetriever for OpenWeatherMapRetriever {
    async fn current(&self, location: &str) -> Result<CurrentWeather, RetrieveError> {
        self.fetch("current weather", CURRENT_PATH, location).await
    }

    async fn forecast(&self, location: &str) -> Result<Forecast, RetrieveError> {
        self.fetch("forecast", FORECAST_PATH, location).await
    }

    fn includes_forecast(&self) -> bool {
        self.include_forecast
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

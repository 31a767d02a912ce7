//! Records mirroring the OpenWeatherMap JSON payloads.
//!
//! Field names follow the upstream schema so the structs deserialize
//! directly from response bodies. Values the API leaves out for some
//! locations are `Option`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lon: f64,
    pub lat: f64,
}

/// One element of the `weather` array: condition code, group and icon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// Measurements in API default units (kelvin, hPa, percent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Main {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    pub deg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    pub all: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sys {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunset: Option<i64>,
}

/// Response of `/data/2.5/weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub coord: Coord,
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub base: String,
    pub main: Main,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<u32>,
    pub wind: Wind,
    pub clouds: Clouds,
    /// Observation time, unix seconds.
    pub dt: i64,
    pub sys: Sys,
    /// Shift from UTC in seconds.
    pub timezone: i32,
    pub id: i64,
    pub name: String,
    pub cod: i32,
}

impl CurrentWeather {
    /// The primary condition, when the API reported any.
    pub fn condition(&self) -> Option<&Condition> {
        self.weather.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMain {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sea_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grnd_level: Option<f64>,
    pub humidity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_kf: Option<f64>,
}

/// Part of day: `d` or `n`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSys {
    pub pod: String,
}

/// Rain or snow volume for the last three hours, in mm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Precipitation {
    #[serde(rename = "3h", default)]
    pub three_hours: f64,
}

/// One three-hour bucket of the forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: ForecastMain,
    pub weather: Vec<Condition>,
    pub clouds: Clouds,
    pub wind: Wind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<u32>,
    /// Probability of precipitation, `0.0..=1.0`.
    #[serde(default)]
    pub pop: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sys: Option<ForecastSys>,
    pub dt_txt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rain: Option<Precipitation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snow: Option<Precipitation>,
}

impl ForecastEntry {
    pub fn condition(&self) -> Option<&Condition> {
        self.weather.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastCity {
    pub id: i64,
    pub name: String,
    pub coord: Coord,
    #[serde(default)]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,
    pub timezone: i32,
    pub sunrise: i64,
    pub sunset: i64,
}

/// Response of `/data/2.5/forecast` (5 days, 3-hour steps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub cod: String,
    #[serde(default)]
    pub message: f64,
    pub cnt: u32,
    pub list: Vec<ForecastEntry>,
    pub city: ForecastCity,
}

/// Everything fetched for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteWeather {
    pub current: CurrentWeather,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast: Option<Forecast>,
}

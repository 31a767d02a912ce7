//! Conversions and formatting for values coming straight from the API.

use chrono::{DateTime, FixedOffset, Utc};

const KELVIN_OFFSET: f64 = 273.15;

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Whole degrees as shown on a page (truncated toward zero).
pub fn kelvin_to_celsius_whole(kelvin: f64) -> i64 {
    kelvin_to_celsius(kelvin).trunc() as i64
}

/// Metres per second to kilometres per hour.
pub fn mps_to_kmh(speed: f64) -> f64 {
    speed * 3.6
}

/// Format a unix timestamp (seconds) in UTC with a strftime pattern.
///
/// Returns `None` when the timestamp is out of chrono's range.
pub fn epoch_to_date_string(epoch_secs: i64, format: &str) -> Option<String> {
    DateTime::<Utc>::from_timestamp(epoch_secs, 0).map(|dt| dt.format(format).to_string())
}

/// Like [`epoch_to_date_string`] but shifted by the location's UTC offset,
/// as reported in the `timezone` field.
pub fn epoch_to_local_string(epoch_secs: i64, utc_offset_secs: i32, format: &str) -> Option<String> {
    let offset = FixedOffset::east_opt(utc_offset_secs)?;
    DateTime::<Utc>::from_timestamp(epoch_secs, 0)
        .map(|dt| dt.with_timezone(&offset).format(format).to_string())
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kelvin_sample_lands_between_six_and_seven() {
        let celsius = kelvin_to_celsius(279.71);
        assert!((6.0..7.0).contains(&celsius), "got {celsius}");
        assert_eq!(kelvin_to_celsius_whole(279.71), 6);
    }

    #[test]
    fn freezing_point_is_zero() {
        assert!(kelvin_to_celsius(273.15).abs() < f64::EPSILON);
        assert_eq!(kelvin_to_celsius_whole(272.5), 0);
        assert_eq!(kelvin_to_celsius_whole(270.0), -3);
    }

    #[test]
    fn wind_speed_conversion() {
        assert!((mps_to_kmh(10.0) - 36.0).abs() < 1e-9);
    }

    #[test]
    fn epoch_formats_in_utc() {
        assert_eq!(
            epoch_to_date_string(1618020583, "%Y-%m-%d %H:%M").as_deref(),
            Some("2021-04-10 02:09")
        );
    }

    #[test]
    fn epoch_formats_with_location_offset() {
        assert_eq!(
            epoch_to_local_string(1618020583, -14400, "%-I:%M %p").as_deref(),
            Some("10:09 PM")
        );
    }

    #[test]
    fn invalid_offset_yields_none() {
        assert_eq!(epoch_to_local_string(0, 90_000, "%H"), None);
    }

    #[test]
    fn capitalize_first_letter_only() {
        assert_eq!(capitalize("overcast clouds"), "Overcast clouds");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("éclair"), "Éclair");
    }
}

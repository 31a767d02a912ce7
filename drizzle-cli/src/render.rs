//! Plain-text pages for the terminal.

use chrono::{DateTime, Utc};
use colored::Colorize;
use drizzle_core::{
    CompleteWeather, ForecastEntry,
    color::{DEFAULT_PALETTE, page_color},
    units::{capitalize, epoch_to_local_string, kelvin_to_celsius_whole, mps_to_kmh},
};

const PAGE_WIDTH: usize = 44;
const FORECAST_ROWS: usize = 8;

pub fn print_pages(pages: &[CompleteWeather], now: DateTime<Utc>) {
    for (index, weather) in pages.iter().enumerate() {
        let background = page_color(&DEFAULT_PALETTE, index, 0.0);
        let (br, bg, bb) = background.to_rgb8();
        let (fr, fg, fb) = background.contrasting().to_rgb8();

        for line in page_lines(weather, now) {
            let padded = format!(" {line:<width$}", width = PAGE_WIDTH - 1);
            println!("{}", padded.truecolor(fr, fg, fb).on_truecolor(br, bg, bb));
        }
        println!();
    }
}

/// Lines of one location's page, without colours.
pub fn page_lines(weather: &CompleteWeather, now: DateTime<Utc>) -> Vec<String> {
    let current = &weather.current;
    let offset = current.timezone;
    let mut lines = Vec::new();

    lines.push(current.name.to_uppercase());
    let updated = epoch_to_local_string(current.dt, offset, "%-I:%M %p")
        .unwrap_or_else(|| "unknown".to_string());
    lines.push(format!("updated on {updated}"));
    lines.push(rule());

    lines.push(format!("{}°C", kelvin_to_celsius_whole(current.main.temp)));
    let description = current
        .condition()
        .map(|c| capitalize(&c.description))
        .unwrap_or_else(|| "Unknown".to_string());
    lines.push(description);
    lines.push(format!("feels like {}°C", kelvin_to_celsius_whole(current.main.feels_like)));
    lines.push(rule());

    lines.push(format!(
        "max {}°C   min {}°C",
        kelvin_to_celsius_whole(current.main.temp_max),
        kelvin_to_celsius_whole(current.main.temp_min),
    ));
    lines.push(format!(
        "wind {:.0} km/h   humidity {:.0}%",
        mps_to_kmh(current.wind.speed),
        current.main.humidity,
    ));

    if let Some(forecast) = &weather.forecast {
        let upcoming: Vec<&ForecastEntry> = forecast
            .list
            .iter()
            .filter(|entry| entry.dt >= now.timestamp())
            .take(FORECAST_ROWS)
            .collect();

        if !upcoming.is_empty() {
            lines.push(rule());
            lines.extend(upcoming.into_iter().map(|entry| forecast_line(entry, offset)));
        }
    }

    lines
}

fn forecast_line(entry: &ForecastEntry, offset: i32) -> String {
    let when = epoch_to_local_string(entry.dt, offset, "%a %H:%M").unwrap_or_else(|| entry.dt_txt.clone());
    let condition = entry.condition().map(|c| c.description.as_str()).unwrap_or("");
    format!(
        "{when}  {:>4}°C  {:>3.0}%  {condition}",
        kelvin_to_celsius_whole(entry.main.temp),
        entry.pop * 100.0,
    )
}

fn rule() -> String {
    "─".repeat(PAGE_WIDTH - 2)
}

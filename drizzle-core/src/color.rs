//! Page colours: interpolation between a palette and contrast helpers.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const RED: Color = Color::new(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::new(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 1.0);

    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    /// Relative luminance (Rec. 709 weights), `0.0` for black and `1.0` for white.
    pub fn luminosity(&self) -> f32 {
        0.2126 * self.red + 0.7152 * self.green + 0.0722 * self.blue
    }

    pub fn is_light(&self) -> bool {
        self.luminosity() > 0.5
    }

    /// Foreground that stays readable on this background.
    pub fn contrasting(&self) -> Color {
        if self.is_light() { Color::BLACK } else { Color::WHITE }
    }

    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (channel(self.red), channel(self.green), channel(self.blue))
    }
}

/// Linear interpolation, `fraction` clamped to `[0, 1]`.
pub fn lerp(start: Color, stop: Color, fraction: f32) -> Color {
    let t = fraction.clamp(0.0, 1.0);
    let mix = |a: f32, b: f32| a + (b - a) * t;
    Color::new(
        mix(start.red, stop.red),
        mix(start.green, stop.green),
        mix(start.blue, stop.blue),
    )
}

pub const DEFAULT_PALETTE: [Color; 3] = [Color::RED, Color::GREEN, Color::BLUE];

/// Background for `page` while scrolled `offset` of the way to the next one.
///
/// Pages past the palette reuse its last colour. An empty palette is black.
pub fn page_color(palette: &[Color], page: usize, offset: f32) -> Color {
    let Some(last) = palette.last().copied() else {
        return Color::BLACK;
    };

    match (palette.get(page), palette.get(page + 1)) {
        (Some(&current), Some(&next)) => lerp(current, next, offset),
        (Some(&current), None) => current,
        _ => last,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luminosity_extremes() {
        assert_eq!(Color::BLACK.luminosity(), 0.0);
        assert!((Color::WHITE.luminosity() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn green_dominates_luminosity() {
        assert!(Color::GREEN.luminosity() > Color::RED.luminosity());
        assert!(Color::RED.luminosity() > Color::BLUE.luminosity());
        assert_eq!(Color::GREEN.contrasting(), Color::BLACK);
        assert_eq!(Color::BLUE.contrasting(), Color::WHITE);
    }

    #[test]
    fn lerp_clamps_fraction() {
        assert_eq!(lerp(Color::BLACK, Color::WHITE, -1.0), Color::BLACK);
        assert_eq!(lerp(Color::BLACK, Color::WHITE, 2.0), Color::WHITE);
        assert_eq!(lerp(Color::BLACK, Color::WHITE, 0.5), Color::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn page_color_blends_towards_next_page() {
        let halfway = page_color(&DEFAULT_PALETTE, 0, 0.5);
        assert_eq!(halfway, Color::new(0.5, 0.5, 0.0));
        assert_eq!(page_color(&DEFAULT_PALETTE, 1, 0.0), Color::GREEN);
    }

    #[test]
    fn page_color_past_palette_uses_last() {
        assert_eq!(page_color(&DEFAULT_PALETTE, 2, 0.7), Color::BLUE);
        assert_eq!(page_color(&DEFAULT_PALETTE, 9, 0.0), Color::BLUE);
        assert_eq!(page_color(&[], 0, 0.0), Color::BLACK);
    }

    #[test]
    fn rgb8_conversion() {
        assert_eq!(Color::WHITE.to_rgb8(), (255, 255, 255));
        assert_eq!(Color::new(0.5, 0.0, 2.0).to_rgb8(), (128, 0, 255));
    }
}

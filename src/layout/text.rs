use crate::config::LayoutConfig;
use crate::text_metrics;
use crate::theme::Theme;

use super::PersonLabel;

// Bold runs measured against regular advances run about this much wider.
const BOLD_WIDTH_SCALE: f32 = 1.07;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtent {
    pub width: f32,
    pub height: f32,
}

impl TextExtent {
    /// Non-finite or negative extents collapse to zero so layout can proceed.
    pub fn sanitized(self) -> Self {
        let clean = |v: f32| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self {
            width: clean(self.width),
            height: clean(self.height),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f32,
    pub line_height: f32,
}

impl TextStyle {
    pub fn new(theme: &Theme, config: &LayoutConfig) -> Self {
        Self {
            font_family: theme.font_family.clone(),
            font_size: theme.font_size,
            line_height: config.line_height,
        }
    }
}

/// Reports the drawn extent of a person's text block.
///
/// Layout cannot place a partner or the next sibling until the previous
/// block has been measured, so implementations answer synchronously.
pub trait TextMetrics {
    fn measure(&self, label: &PersonLabel, style: &TextStyle) -> TextExtent;
}

/// Glyph advances from installed system fonts, with the calibrated table as
/// the fallback when no face matches the requested family.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontMetrics;

impl TextMetrics for FontMetrics {
    fn measure(&self, label: &PersonLabel, style: &TextStyle) -> TextExtent {
        let run = |text: &str, bold: bool| {
            text_metrics::measure_text_width(text, style.font_size, &style.font_family, bold)
                .unwrap_or_else(|| calibrated_width(text, style.font_size, bold))
        };
        let mut width = run(&label.name, true);
        if let Some(years) = &label.years {
            width += run(years, false);
        }
        let height = text_metrics::line_height(style.font_size, &style.font_family)
            .unwrap_or(style.font_size * style.line_height);
        TextExtent { width, height }
    }
}

/// Per-character width table; needs no font access, so it also runs in wasm.
#[derive(Debug, Default, Clone, Copy)]
pub struct CalibratedMetrics;

impl TextMetrics for CalibratedMetrics {
    fn measure(&self, label: &PersonLabel, style: &TextStyle) -> TextExtent {
        let mut width = calibrated_width(&label.name, style.font_size, true);
        if let Some(years) = &label.years {
            width += calibrated_width(years, style.font_size, false);
        }
        TextExtent {
            width,
            height: style.font_size * style.line_height,
        }
    }
}

/// Every character is `char_width` wide and every block `height` tall.
#[derive(Debug, Clone, Copy)]
pub struct FixedMetrics {
    pub char_width: f32,
    pub height: f32,
}

impl FixedMetrics {
    pub fn new(char_width: f32, height: f32) -> Self {
        Self { char_width, height }
    }
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self::new(8.0, 18.0)
    }
}

impl TextMetrics for FixedMetrics {
    fn measure(&self, label: &PersonLabel, _style: &TextStyle) -> TextExtent {
        TextExtent {
            width: label.char_count() as f32 * self.char_width,
            height: self.height,
        }
    }
}

pub(crate) fn calibrated_width(text: &str, font_size: f32, bold: bool) -> f32 {
    let width = text.chars().map(char_width_factor).sum::<f32>() * font_size;
    if bold { width * BOLD_WIDTH_SCALE } else { width }
}

pub(super) fn char_width_factor(ch: char) -> f32 {
    // Advance widths as a fraction of the font size for a regular
    // sans-serif face.
    match ch {
        ' ' => 0.306,
        '\\' | '.' | ',' | ':' | ';' | '|' | '!' | '(' | ')' | '[' | ']' | '{' | '}' => 0.321,
        '-' => 0.333,
        'A' => 0.652,
        'B' => 0.648,
        'C' => 0.734,
        'D' => 0.723,
        'E' => 0.594,
        'F' => 0.575,
        'G' | 'H' => 0.742,
        'I' => 0.272,
        'J' => 0.557,
        'K' => 0.648,
        'L' => 0.559,
        'M' => 0.903,
        'N' => 0.763,
        'O' => 0.754,
        'P' => 0.623,
        'Q' => 0.755,
        'R' => 0.637,
        'S' => 0.633,
        'T' => 0.599,
        'U' => 0.746,
        'V' => 0.661,
        'W' => 0.958,
        'X' => 0.655,
        'Y' => 0.646,
        'Z' => 0.621,
        'a' => 0.550,
        'b' => 0.603,
        'c' => 0.547,
        'd' => 0.609,
        'e' => 0.570,
        'f' => 0.340,
        'g' | 'h' => 0.600,
        'i' => 0.235,
        'j' => 0.227,
        'k' => 0.522,
        'l' => 0.239,
        'm' => 0.867,
        'n' => 0.585,
        'o' => 0.574,
        'p' => 0.595,
        'q' => 0.585,
        'r' => 0.364,
        's' => 0.523,
        't' => 0.305,
        'u' => 0.585,
        'v' => 0.545,
        'w' => 0.811,
        'x' => 0.538,
        'y' => 0.556,
        'z' => 0.550,
        '0' => 0.613,
        '1' => 0.396,
        '2' => 0.609,
        '3' => 0.597,
        '4' => 0.614,
        '5' => 0.586,
        '6' => 0.608,
        '7' => 0.559,
        '8' => 0.611,
        '9' => 0.595,
        '@' | '#' | '%' | '&' => 0.946,
        _ => 0.568,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> TextStyle {
        TextStyle::new(&Theme::classic(), &LayoutConfig::default())
    }

    fn label(name: &str, years: Option<&str>) -> PersonLabel {
        PersonLabel {
            name: name.to_string(),
            years: years.map(str::to_string),
        }
    }

    #[test]
    fn char_width_factor_returns_positive_values() {
        for ch in ['a', 'Z', ' ', '0', '@', '\u{4e2d}', 'Ђ'] {
            assert!(char_width_factor(ch) > 0.0, "char {:?} has zero width", ch);
        }
    }

    #[test]
    fn calibrated_width_scales_with_font_size() {
        let w16 = calibrated_width("Hello", 16.0, false);
        let w32 = calibrated_width("Hello", 32.0, false);
        assert!((w32 - w16 * 2.0).abs() < 0.01, "width should double with font size");
    }

    #[test]
    fn bold_name_run_is_wider_than_regular() {
        assert!(calibrated_width("Milan", 16.0, true) > calibrated_width("Milan", 16.0, false));
    }

    #[test]
    fn years_run_adds_width() {
        let metrics = CalibratedMetrics;
        let bare = metrics.measure(&label("Milan", None), &style());
        let dated = metrics.measure(&label("Milan", Some(" 1901 1968")), &style());
        assert!(dated.width > bare.width);
        assert_eq!(dated.height, bare.height);
        assert!((bare.height - 16.0 * 1.15).abs() < 0.001);
    }

    #[test]
    fn fixed_metrics_counts_both_runs() {
        let metrics = FixedMetrics::new(10.0, 20.0);
        let extent = metrics.measure(&label("Ana", Some(" 1901")), &style());
        assert_eq!(extent, TextExtent { width: 80.0, height: 20.0 });
    }

    #[test]
    fn degenerate_extents_sanitize_to_zero() {
        let extent = TextExtent {
            width: f32::NAN,
            height: -4.0,
        }
        .sanitized();
        assert_eq!(extent, TextExtent::default());
    }
}

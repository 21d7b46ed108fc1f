/// Measures rendered text extents for layout.
///
/// Hosts with a real text shaper plug it in here; the chart only needs the
/// advance width of a single line.
pub trait TextMeasurer: Send + Sync {
    fn text_width_px(&self, text: &str, font_size_px: f64) -> f64;

    fn line_height_px(&self, font_size_px: f64) -> f64 {
        font_size_px * 1.2
    }
}

/// Deterministic per-glyph width estimate, independent of any backend.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn text_width_px(&self, text: &str, font_size_px: f64) -> f64 {
        estimate_text_width_px(text, font_size_px)
    }
}

pub(crate) fn estimate_text_width_px(text: &str, font_size_px: f64) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    let units = text.chars().fold(0.0, |acc, ch| {
        acc + match ch {
            '0'..='9' => 0.62,
            '.' | ',' => 0.34,
            '-' | '+' | '%' => 0.42,
            ' ' => 0.33,
            'i' | 'l' | 'j' | '\'' | '|' => 0.28,
            'm' | 'w' | 'M' | 'W' => 0.86,
            '…' => 1.0,
            _ => 0.58,
        }
    });
    units * font_size_px
}

/// Shortens `text` with a trailing ellipsis until it fits `max_width_px`.
///
/// Returns the text unchanged when it already fits, and just the ellipsis
/// when not even one character does.
pub fn truncate_to_width(
    measurer: &dyn TextMeasurer,
    text: &str,
    font_size_px: f64,
    max_width_px: f64,
) -> String {
    if measurer.text_width_px(text, font_size_px) <= max_width_px {
        return text.to_owned();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut keep = chars.len();
    while keep > 0 {
        keep -= 1;
        let mut candidate: String = chars[..keep].iter().collect::<String>().trim_end().to_owned();
        candidate.push('…');
        if measurer.text_width_px(&candidate, font_size_px) <= max_width_px {
            return candidate;
        }
    }
    "…".to_owned()
}

#[cfg(test)]
mod tests {
    use super::{HeuristicTextMeasurer, TextMeasurer, estimate_text_width_px, truncate_to_width};

    #[test]
    fn digits_are_wider_than_separators() {
        assert!(estimate_text_width_px("8", 10.0) > estimate_text_width_px(",", 10.0));
        assert_eq!(estimate_text_width_px("", 10.0), 0.0);
    }

    #[test]
    fn truncation_appends_ellipsis_only_when_needed() {
        let measurer = HeuristicTextMeasurer;
        assert_eq!(truncate_to_width(&measurer, "Q1", 10.0, 100.0), "Q1");

        let long = "Operating expenses";
        let truncated = truncate_to_width(&measurer, long, 10.0, 40.0);
        assert!(truncated.ends_with('…'));
        assert!(measurer.text_width_px(&truncated, 10.0) <= 40.0);
        assert!(truncated.chars().count() < long.chars().count());

        assert_eq!(truncate_to_width(&measurer, long, 10.0, 1.0), "…");
    }
}

use serde::{Deserialize, Serialize};

use label_types::LabelConfig;

use crate::font::Font;
use crate::measure::Measurer;

/// Font size per line count: one line gets the largest tier.
pub const FONT_SIZE_TIERS: [f64; 3] = [9.0, 6.5, 5.0];

/// Fixed baseline Y offsets per line count, relative to plate center.
pub const BASELINE_PRESETS: [&[f64]; 3] = [&[0.0], &[4.5, -4.5], &[6.5, 0.0, -6.5]];

/// Result of fitting up to three lines onto the plate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub fits: bool,
    pub lines: Vec<String>,
    pub widths: Vec<f64>,
    pub font_size: f64,
    pub line_count: usize,
    /// Index within the fitted sequence of the first line too wide for the
    /// usable width. Set iff `fits` is false and there is content.
    pub overflow_index: Option<usize>,
    pub baseline_offsets: Vec<f64>,
}

impl LayoutResult {
    fn no_content() -> Self {
        Self {
            fits: false,
            lines: Vec::new(),
            widths: Vec::new(),
            font_size: FONT_SIZE_TIERS[0],
            line_count: 0,
            overflow_index: None,
            baseline_offsets: Vec::new(),
        }
    }
}

/// Collapse whitespace runs to single spaces and trim.
pub fn normalize_line(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Non-empty normalized lines plus the original input slot of each, so
/// overflow errors can point at the right field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreparedLines {
    pub lines: Vec<String>,
    pub input_slots: Vec<usize>,
}

impl PreparedLines {
    /// One-based input line number for a fitted-sequence index. Every fitted
    /// line keeps its input slot, so any index a layout hands back (such as
    /// `overflow_index`) resolves here.
    pub fn line_number(&self, fitted_index: usize) -> usize {
        self.input_slots[fitted_index] + 1
    }
}

pub fn prepare_lines(values: &[String]) -> PreparedLines {
    let mut prepared = PreparedLines::default();
    for (slot, value) in values.iter().enumerate() {
        let normalized = normalize_line(value);
        if !normalized.is_empty() {
            prepared.lines.push(normalized);
            prepared.input_slots.push(slot);
        }
    }
    prepared
}

/// Fit lines using the default size tiers.
pub fn compute_layout(
    measurer: &mut Measurer,
    font: &Font,
    lines: &[String],
    config: &LabelConfig,
) -> LayoutResult {
    compute_layout_with_tiers(measurer, font, lines, config, FONT_SIZE_TIERS)
}

/// Fit up to three non-empty lines into the usable plate width.
///
/// Line counts above three are clamped to the three-line tier. Zero usable
/// lines is the benign empty state, not an error.
pub fn compute_layout_with_tiers(
    measurer: &mut Measurer,
    font: &Font,
    lines: &[String],
    config: &LabelConfig,
    tiers: [f64; 3],
) -> LayoutResult {
    let fitted: Vec<String> = lines
        .iter()
        .filter(|line| !line.is_empty())
        .take(3)
        .cloned()
        .collect();
    let line_count = fitted.len();
    if line_count == 0 {
        return LayoutResult::no_content();
    }

    let tier = line_count.min(3);
    let font_size = tiers[tier - 1];
    let usable_width = config.usable_width();

    let widths: Vec<f64> = fitted
        .iter()
        .map(|line| measurer.measure(font, line, font_size))
        .collect();
    let overflow_index = widths.iter().position(|w| *w > usable_width);
    let fits = overflow_index.is_none();

    LayoutResult {
        fits,
        baseline_offsets: BASELINE_PRESETS[tier - 1].to_vec(),
        lines: fitted,
        widths,
        font_size,
        line_count,
        overflow_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const MINI_FONT: &str = include_str!("../tests/fixtures/mini.typeface.json");

    fn font() -> Font {
        Font::from_json(MINI_FONT).unwrap()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_line("  Hello   world \t"), "Hello world");
        assert_eq!(normalize_line("   "), "");
    }

    #[test]
    fn prepare_retains_input_slots() {
        let prepared = prepare_lines(&strings(&["", "Top", "", "Bottom"]));
        assert_eq!(prepared.lines, vec!["Top", "Bottom"]);
        assert_eq!(prepared.input_slots, vec![1, 3]);
        assert_eq!(prepared.line_number(0), 2);
        assert_eq!(prepared.line_number(1), 4);
    }

    #[test]
    fn empty_input_is_benign_no_content() {
        let mut measurer = Measurer::new();
        let layout = compute_layout(&mut measurer, &font(), &[], &LabelConfig::default());
        assert!(!layout.fits);
        assert_eq!(layout.line_count, 0);
        assert_eq!(layout.overflow_index, None);
        assert!(layout.baseline_offsets.is_empty());
    }

    #[test]
    fn tier_follows_line_count() {
        let mut measurer = Measurer::new();
        let config = LabelConfig::default();
        let one = compute_layout(&mut measurer, &font(), &strings(&["I"]), &config);
        assert_relative_eq!(one.font_size, 9.0);
        assert_eq!(one.baseline_offsets, vec![0.0]);

        let two = compute_layout(&mut measurer, &font(), &strings(&["I", "I"]), &config);
        assert_relative_eq!(two.font_size, 6.5);
        assert_eq!(two.baseline_offsets, vec![4.5, -4.5]);

        let three = compute_layout(&mut measurer, &font(), &strings(&["I", "I", "I"]), &config);
        assert_relative_eq!(three.font_size, 5.0);
        assert_eq!(three.baseline_offsets, vec![6.5, 0.0, -6.5]);
    }

    #[test]
    fn more_than_three_lines_clamp_to_three() {
        let mut measurer = Measurer::new();
        let layout = compute_layout(
            &mut measurer,
            &font(),
            &strings(&["I", "I", "I", "I", "I"]),
            &LabelConfig::default(),
        );
        assert_eq!(layout.line_count, 3);
        assert_relative_eq!(layout.font_size, 5.0);
    }

    #[test]
    fn fits_iff_every_width_within_usable() {
        let mut measurer = Measurer::new();
        let config = LabelConfig::default();
        let layout = compute_layout(&mut measurer, &font(), &strings(&["III"]), &config);
        assert!(layout.fits);
        assert!(layout.widths[0] <= config.usable_width());
    }

    #[test]
    fn overflow_reports_first_offending_fitted_index() {
        let mut measurer = Measurer::new();
        let config = LabelConfig::default();
        // 'W' is 0.9 em wide; 13 of them at 6.5 mm measure ~75.4 mm, past
        // the 72.5 mm usable width.
        let long = "W".repeat(13);
        let layout = compute_layout(
            &mut measurer,
            &font(),
            &strings(&["OK", &long]),
            &config,
        );
        assert!(!layout.fits);
        assert_eq!(layout.overflow_index, Some(1));
    }

    #[test]
    fn widths_are_parallel_to_lines() {
        let mut measurer = Measurer::new();
        let layout = compute_layout(
            &mut measurer,
            &font(),
            &strings(&["I", "II"]),
            &LabelConfig::default(),
        );
        assert_eq!(layout.widths.len(), layout.lines.len());
        assert!(layout.widths[1] > layout.widths[0]);
    }
}

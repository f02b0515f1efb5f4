use std::collections::HashMap;

use crate::font::Font;

/// Curve flattening used for measurement only; coarser than the solid
/// builder since only the bounding box is read.
pub const MEASURE_CURVE_SEGMENTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MeasureKey {
    font: String,
    size_bits: u64,
    text: String,
}

/// Cached line-width measurement.
///
/// Repeated measurement of the same (font, size, text) triple is O(1) after
/// the first call; the cache key includes the font identity so swapping the
/// typeface never serves stale widths.
#[derive(Debug, Default)]
pub struct Measurer {
    cache: HashMap<MeasureKey, f64>,
    outline_builds: u64,
}

impl Measurer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered width of `text` at `size`. Empty text measures zero without
    /// touching the cache.
    pub fn measure(&mut self, font: &Font, text: &str, size: f64) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        let key = MeasureKey {
            font: font.identity(),
            size_bits: size.to_bits(),
            text: text.to_string(),
        };
        if let Some(width) = self.cache.get(&key) {
            return *width;
        }

        self.outline_builds += 1;
        let contours = font.line_contours(text, size, MEASURE_CURVE_SEGMENTS);
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        for contour in &contours {
            for p in contour {
                min_x = min_x.min(p.x);
                max_x = max_x.max(p.x);
            }
        }
        let width = if max_x > min_x { max_x - min_x } else { 0.0 };
        self.cache.insert(key, width);
        width
    }

    /// Number of outline constructions performed; repeat measurements must
    /// not increase this.
    pub fn outline_builds(&self) -> u64 {
        self.outline_builds
    }
}

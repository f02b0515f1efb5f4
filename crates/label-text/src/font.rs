use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use label_geom::profile::{ring_contains, signed_area, Polygon};
use label_geom::Point2d;

/// Errors loading a typeface asset. Load failure is fatal for the session;
/// there is no retry.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FontError {
    #[error("failed to parse font JSON: {0}")]
    Parse(String),

    #[error("font declares a non-positive resolution")]
    InvalidResolution,

    #[error("font contains no glyphs")]
    Empty,
}

/// One glyph of the typeface: horizontal advance plus an optional outline
/// command string (`m`/`l`/`q`/`b`, end point first, controls after).
#[derive(Debug, Clone, Deserialize)]
pub struct GlyphData {
    #[serde(default)]
    pub ha: f64,
    #[serde(default)]
    pub o: Option<String>,
}

/// The typeface-JSON payload: one font's glyph outlines in em units.
#[derive(Debug, Clone, Deserialize)]
pub struct FontData {
    #[serde(rename = "familyName")]
    pub family_name: String,
    #[serde(rename = "fullName", default)]
    pub full_name: Option<String>,
    pub resolution: f64,
    pub glyphs: HashMap<char, GlyphData>,
}

/// A loaded typeface.
#[derive(Debug, Clone)]
pub struct Font {
    data: FontData,
}

impl Font {
    pub fn from_json(json: &str) -> Result<Self, FontError> {
        let data: FontData =
            serde_json::from_str(json).map_err(|err| FontError::Parse(err.to_string()))?;
        if !(data.resolution > 0.0) {
            return Err(FontError::InvalidResolution);
        }
        if data.glyphs.is_empty() {
            return Err(FontError::Empty);
        }
        Ok(Self { data })
    }

    /// Stable identity used in measurement cache keys.
    pub fn identity(&self) -> String {
        format!(
            "{}|{}",
            self.data.family_name,
            self.data
                .full_name
                .as_deref()
                .unwrap_or(&self.data.family_name)
        )
    }

    pub fn family_name(&self) -> &str {
        &self.data.family_name
    }

    pub fn glyph_count(&self) -> usize {
        self.data.glyphs.len()
    }

    fn scale(&self, size: f64) -> f64 {
        size / self.data.resolution
    }

    /// Flattened outline contours of one text line at `size`, glyphs laid
    /// left to right by their advance. Characters without a glyph fall back
    /// to `?` and are skipped if that is missing too.
    pub fn line_contours(&self, text: &str, size: f64, curve_segments: usize) -> Vec<Vec<Point2d>> {
        let scale = self.scale(size);
        let mut contours = Vec::new();
        let mut cursor = 0.0;
        for ch in text.chars() {
            let glyph = match self.data.glyphs.get(&ch) {
                Some(glyph) => glyph,
                None => match self.data.glyphs.get(&'?') {
                    Some(fallback) => {
                        debug!(character = %ch, "glyph missing, substituting '?'");
                        fallback
                    }
                    None => {
                        debug!(character = %ch, "glyph missing, skipping");
                        continue;
                    }
                },
            };
            if let Some(outline) = &glyph.o {
                append_glyph_contours(
                    &mut contours,
                    outline,
                    scale,
                    cursor,
                    curve_segments.max(1),
                );
            }
            cursor += glyph.ha * scale;
        }
        contours
    }

    /// Outline contours of one line grouped into regions: exteriors with
    /// their holes, classified by containment depth.
    pub fn line_polygons(&self, text: &str, size: f64, curve_segments: usize) -> Vec<Polygon> {
        classify_contours(self.line_contours(text, size, curve_segments))
    }
}

fn append_glyph_contours(
    contours: &mut Vec<Vec<Point2d>>,
    outline: &str,
    scale: f64,
    offset_x: f64,
    segments: usize,
) {
    fn read<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Option<f64> {
        tokens.next().and_then(|t| t.parse::<f64>().ok())
    }

    let mut tokens = outline.split_ascii_whitespace();
    let mut current: Vec<Point2d> = Vec::new();

    while let Some(command) = tokens.next() {
        match command {
            "m" => {
                if current.len() >= 3 {
                    contours.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
                let (Some(x), Some(y)) = (read(&mut tokens), read(&mut tokens)) else {
                    break;
                };
                current.push(Point2d::new(x * scale + offset_x, y * scale));
            }
            "l" => {
                let (Some(x), Some(y)) = (read(&mut tokens), read(&mut tokens)) else {
                    break;
                };
                current.push(Point2d::new(x * scale + offset_x, y * scale));
            }
            "q" => {
                // Data order is end point, then control point.
                let (Some(x), Some(y), Some(cx), Some(cy)) = (
                    read(&mut tokens),
                    read(&mut tokens),
                    read(&mut tokens),
                    read(&mut tokens),
                ) else {
                    break;
                };
                let Some(start) = current.last().copied() else {
                    continue;
                };
                let control = Point2d::new(cx * scale + offset_x, cy * scale);
                let end = Point2d::new(x * scale + offset_x, y * scale);
                for i in 1..=segments {
                    let t = i as f64 / segments as f64;
                    let a = start.lerp(&control, t);
                    let b = control.lerp(&end, t);
                    current.push(a.lerp(&b, t));
                }
            }
            "b" => {
                // End point, then both control points.
                let (Some(x), Some(y), Some(c1x), Some(c1y), Some(c2x), Some(c2y)) = (
                    read(&mut tokens),
                    read(&mut tokens),
                    read(&mut tokens),
                    read(&mut tokens),
                    read(&mut tokens),
                    read(&mut tokens),
                ) else {
                    break;
                };
                let Some(start) = current.last().copied() else {
                    continue;
                };
                let c1 = Point2d::new(c1x * scale + offset_x, c1y * scale);
                let c2 = Point2d::new(c2x * scale + offset_x, c2y * scale);
                let end = Point2d::new(x * scale + offset_x, y * scale);
                for i in 1..=segments {
                    let t = i as f64 / segments as f64;
                    let ab = start.lerp(&c1, t);
                    let bc = c1.lerp(&c2, t);
                    let cd = c2.lerp(&end, t);
                    let abc = ab.lerp(&bc, t);
                    let bcd = bc.lerp(&cd, t);
                    current.push(abc.lerp(&bcd, t));
                }
            }
            _ => {}
        }
    }
    if current.len() >= 3 {
        contours.push(current);
    }
}

/// Group raw contours into exterior rings with their holes.
///
/// A contour contained by an even number of others is an exterior; an odd
/// containment depth makes it a hole of its tightest enclosing exterior.
/// Winding is ignored here; extrusion normalizes it.
pub fn classify_contours(contours: Vec<Vec<Point2d>>) -> Vec<Polygon> {
    let n = contours.len();
    let mut depth = vec![0usize; n];
    let mut tightest_parent: Vec<Option<usize>> = vec![None; n];
    let mut parent_area = vec![f64::INFINITY; n];

    for i in 0..n {
        let Some(probe) = contours[i].first().copied() else {
            continue;
        };
        for j in 0..n {
            if i == j || !ring_contains(&contours[j], probe) {
                continue;
            }
            depth[i] += 1;
            let area = signed_area(&contours[j]).abs();
            if area < parent_area[i] {
                parent_area[i] = area;
                tightest_parent[i] = Some(j);
            }
        }
    }

    let mut polygon_of_contour: Vec<Option<usize>> = vec![None; n];
    let mut polygons: Vec<Polygon> = Vec::new();
    for i in 0..n {
        if depth[i] % 2 == 0 {
            polygon_of_contour[i] = Some(polygons.len());
            polygons.push(Polygon::from_exterior(contours[i].clone()));
        }
    }
    for i in 0..n {
        if depth[i] % 2 == 1 {
            if let Some(slot) = tightest_parent[i].and_then(|p| polygon_of_contour[p]) {
                polygons[slot].holes.push(contours[i].clone());
            }
        }
    }
    polygons
}

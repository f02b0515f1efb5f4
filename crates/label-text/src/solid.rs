use label_geom::{extrude_polygon, TriangleMesh};

use crate::font::Font;

/// Curve flattening for the printable text solid; finer than measurement to
/// avoid sliver facets on curved glyphs.
pub const TEXT_CURVE_SEGMENTS: usize = 8;

/// Inputs for the text solid builder, taken from the current layout and
/// label configuration.
#[derive(Debug, Clone)]
pub struct TextSolidParams<'a> {
    pub lines: &'a [String],
    pub font_size: f64,
    pub depth: f64,
    pub line_spacing: f64,
    /// Baseline offsets from layout; when absent (or of the wrong length)
    /// lines are spaced evenly around zero at `font_size + line_spacing`.
    pub baseline_offsets: Option<&'a [f64]>,
    pub plate_thickness: f64,
    pub embed_depth: f64,
}

/// Build one merged solid for all text lines, or `None` when there is no
/// content to build.
///
/// Each line is extruded at the layout size, rescaled so its vertical extent
/// equals the nominal font size exactly (font metrics vary per glyph set),
/// centered on its own bounding box, then placed at its baseline, recessed
/// into the plate top by the embed depth.
pub fn build_text_solid(font: &Font, params: &TextSolidParams) -> Option<TriangleMesh> {
    if params.lines.is_empty() {
        return None;
    }

    let line_count = params.lines.len();
    let pitch = params.font_size + params.line_spacing;
    let custom = params
        .baseline_offsets
        .filter(|offsets| offsets.len() == line_count);
    let start_offset = (line_count - 1) as f64 * pitch / 2.0;

    let mut merged = TriangleMesh::new();
    for (index, line) in params.lines.iter().enumerate() {
        let baseline_y = match custom {
            Some(offsets) => offsets[index],
            None => start_offset - index as f64 * pitch,
        };
        if let Some(line_mesh) = build_line(font, line, params, baseline_y) {
            merged.merge(&line_mesh);
        }
    }

    if merged.is_empty() {
        return None;
    }
    merged.compute_vertex_normals();
    Some(merged)
}

fn build_line(
    font: &Font,
    line: &str,
    params: &TextSolidParams,
    baseline_y: f64,
) -> Option<TriangleMesh> {
    let mut mesh = TriangleMesh::new();
    for polygon in font.line_polygons(line, params.font_size, TEXT_CURVE_SEGMENTS) {
        mesh.merge(&extrude_polygon(&polygon, params.depth));
    }
    if mesh.is_empty() {
        return None;
    }

    // Normalize the glyph extent to the nominal size.
    let bounds = mesh.bounding_box()?;
    let height = bounds.size().y.max(1e-5);
    mesh.scale(1.0, params.font_size / height, 1.0);

    let bounds = mesh.bounding_box()?;
    let x_offset = -0.5 * (bounds.max.x + bounds.min.x);
    let y_offset = -0.5 * (bounds.max.y + bounds.min.y);
    let z_offset = params.plate_thickness - params.embed_depth;
    mesh.translate(x_offset, baseline_y + y_offset, z_offset);
    Some(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const MINI_FONT: &str = include_str!("../tests/fixtures/mini.typeface.json");

    fn font() -> Font {
        Font::from_json(MINI_FONT).unwrap()
    }

    fn params<'a>(lines: &'a [String], offsets: Option<&'a [f64]>) -> TextSolidParams<'a> {
        TextSolidParams {
            lines,
            font_size: 9.0,
            depth: 1.0,
            line_spacing: 2.0,
            baseline_offsets: offsets,
            plate_thickness: 1.0,
            embed_depth: 0.2,
        }
    }

    #[test]
    fn empty_lines_build_nothing() {
        let lines: Vec<String> = Vec::new();
        assert!(build_text_solid(&font(), &params(&lines, None)).is_none());
    }

    #[test]
    fn line_height_is_normalized_to_font_size() {
        let lines = vec!["II".to_string()];
        let mesh = build_text_solid(&font(), &params(&lines, Some(&[0.0]))).unwrap();
        let bounds = mesh.bounding_box().unwrap();
        assert_relative_eq!(bounds.size().y, 9.0, epsilon = 1e-9);
        // Centered on its baseline at zero.
        assert_relative_eq!(bounds.center().y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.center().x, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn text_sits_recessed_on_the_plate_top() {
        let lines = vec!["I".to_string()];
        let mesh = build_text_solid(&font(), &params(&lines, Some(&[0.0]))).unwrap();
        let bounds = mesh.bounding_box().unwrap();
        // Plate thickness 1.0, embed 0.2: the solid spans [0.8, 1.8].
        assert_relative_eq!(bounds.min.z, 0.8, epsilon = 1e-9);
        assert_relative_eq!(bounds.max.z, 1.8, epsilon = 1e-9);
    }

    #[test]
    fn custom_baselines_place_lines() {
        let lines = vec!["I".to_string(), "I".to_string()];
        let offsets = [4.5, -4.5];
        let mesh = build_text_solid(&font(), &params(&lines, Some(&offsets))).unwrap();
        let bounds = mesh.bounding_box().unwrap();
        // Two lines of height 9 centered at +-4.5 span [-9, 9].
        assert_relative_eq!(bounds.min.y, -9.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.max.y, 9.0, epsilon = 1e-9);
    }

    #[test]
    fn even_spacing_without_offsets() {
        let lines = vec!["I".to_string(), "I".to_string()];
        let mesh = build_text_solid(&font(), &params(&lines, None)).unwrap();
        let bounds = mesh.bounding_box().unwrap();
        // Pitch 11: baselines at +-5.5, glyph height 9 -> total span 20.
        assert_relative_eq!(bounds.size().y, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn wrong_length_offsets_fall_back_to_even_spacing() {
        let lines = vec!["I".to_string(), "I".to_string()];
        let bad_offsets = [0.0];
        let with_bad = build_text_solid(&font(), &params(&lines, Some(&bad_offsets))).unwrap();
        let with_none = build_text_solid(&font(), &params(&lines, None)).unwrap();
        assert_eq!(
            with_bad.bounding_box().unwrap(),
            with_none.bounding_box().unwrap()
        );
    }

    #[test]
    fn hole_glyph_produces_closed_solid() {
        let lines = vec!["O".to_string()];
        let mesh = build_text_solid(&font(), &params(&lines, Some(&[0.0]))).unwrap();
        assert!(mesh.is_indexed());
        // Ring cross-section: 8 boundary vertices per cap plane.
        assert_eq!(mesh.vertex_count(), 16);
        assert_eq!(mesh.normals.len(), mesh.positions.len());
    }
}

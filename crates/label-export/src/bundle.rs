use std::io::{Cursor, Write as _};

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use label_geom::TriangleMesh;
use label_types::{ColorChoice, WedgeParams};

use crate::errors::ExportError;
use crate::obj::{write_mtl, write_obj};

/// A finished export: the file name to offer and its bytes.
#[derive(Debug, Clone)]
pub struct ExportBundle {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Reduce a text line to a filename-safe slug: whitespace runs become a
/// single underscore, everything outside `[a-z0-9_-]` is stripped
/// case-insensitively, and the result is lowercased. Falls back to "label".
pub fn slugify(line: Option<&str>) -> String {
    let source = line.unwrap_or("label");
    let mut underscored = String::with_capacity(source.len());
    let mut in_whitespace = false;
    for ch in source.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                underscored.push('_');
            }
            in_whitespace = true;
        } else {
            underscored.push(ch);
            in_whitespace = false;
        }
    }
    let slug: String = underscored
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect::<String>()
        .to_lowercase();
    if slug.is_empty() {
        "label".to_string()
    } else {
        slug
    }
}

pub fn label_stl_filename(lines: &[String]) -> String {
    format!("label_{}.stl", slugify(lines.first().map(String::as_str)))
}

/// Wedge exports are named by their parameter tuple, e.g.
/// `wedge_20x3.5x190.stl`.
pub fn wedge_stl_filename(params: &WedgeParams) -> String {
    format!(
        "wedge_{}x{}x{}.stl",
        params.base_length, params.height, params.extrusion_length
    )
}

/// Build the OBJ+MTL zip archive for the plate/text pair.
///
/// Both meshes are required; their absence is a hard error rather than a
/// partial archive.
pub fn build_obj_bundle(
    plate: Option<&TriangleMesh>,
    text: Option<&TriangleMesh>,
    plate_color: &ColorChoice,
    text_color: &ColorChoice,
    lines: &[String],
) -> Result<ExportBundle, ExportError> {
    let (Some(plate), Some(text)) = (plate, text) else {
        return Err(ExportError::MissingGeometry);
    };

    let obj = write_obj(plate, text);
    let mtl = write_mtl(plate_color.rgb, text_color.rgb);

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    let archive = |err: zip::result::ZipError| ExportError::Archive(err.to_string());
    writer.start_file("label.obj", options).map_err(archive)?;
    writer
        .write_all(obj.as_bytes())
        .map_err(|err| ExportError::Archive(err.to_string()))?;
    writer.start_file("label.mtl", options).map_err(archive)?;
    writer
        .write_all(mtl.as_bytes())
        .map_err(|err| ExportError::Archive(err.to_string()))?;
    let cursor = writer.finish().map_err(archive)?;

    let filename = format!("label_{}.zip", slugify(lines.first().map(String::as_str)));
    debug!(%filename, bytes = cursor.get_ref().len(), "built OBJ bundle");
    Ok(ExportBundle {
        filename,
        bytes: cursor.into_inner(),
    })
}

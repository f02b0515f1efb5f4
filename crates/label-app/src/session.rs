use std::fmt;

use tracing::{debug, info, warn};

use label_export::{
    build_obj_bundle, label_stl_filename, wedge_stl_filename, write_ascii_stl, ExportBundle,
    ExportError,
};
use label_geom::{build_plate, build_wedge, repair, PlateParams, TriangleMesh, WELD_TOLERANCE};
use label_text::{
    build_text_solid, compute_layout, prepare_lines, Font, FontError, LayoutResult, Measurer,
    PreparedLines, TextSolidParams,
};
use label_types::{
    ColorChoice, ColorRole, LabelConfig, LabelField, WedgeField, WedgeParams, COLOR_OPTIONS,
};

use crate::slot::MeshSlot;

/// Which of the two tools the session is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolMode {
    Label,
    Wedge,
}

/// The status line shown under the preview.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    LoadingFont,
    FontFailed,
    EmptyInput,
    /// One-based input line number of the first line too wide to fit.
    LineTooLong { line: usize },
    Ready { line_count: usize, font_size: f64 },
    WedgeReady,
    ExportComplete { filename: String },
    ExportFailed,
}

impl Status {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Status::FontFailed | Status::LineTooLong { .. } | Status::ExportFailed
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::LoadingFont => f.write_str("Loading font..."),
            Status::FontFailed => f.write_str("Failed to load font JSON."),
            Status::EmptyInput => f.write_str("Enter text to generate a label."),
            Status::LineTooLong { line } => {
                write!(f, "Line {} is too long. Shorten it.", line)
            }
            Status::Ready {
                line_count,
                font_size,
            } => {
                let noun = if *line_count == 1 { "line" } else { "lines" };
                write!(f, "{} {} · font {:.1} mm", line_count, noun, font_size)
            }
            Status::WedgeReady => f.write_str("Wedge ready to export."),
            Status::ExportComplete { filename } => write!(f, "Exported {}.", filename),
            Status::ExportFailed => f.write_str("Export failed."),
        }
    }
}

/// The whole configurator state: inputs, derived layout, and the built
/// meshes. Every input setter recomputes whatever it invalidates, so the
/// slots and status always reflect the current inputs.
pub struct Session {
    mode: ToolMode,
    lines: [String; 3],
    config: LabelConfig,
    wedge: WedgeParams,
    plate_color: ColorChoice,
    text_color: ColorChoice,
    font: Option<Font>,
    font_failed: bool,
    measurer: Measurer,
    prepared: PreparedLines,
    layout: Option<LayoutResult>,
    plate_slot: MeshSlot,
    text_slot: MeshSlot,
    wedge_slot: MeshSlot,
    status: Status,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A fresh session: label mode, default plate, no font yet. The plate is
    /// built immediately so the preview is never blank.
    pub fn new() -> Self {
        let mut session = Self {
            mode: ToolMode::Label,
            lines: Default::default(),
            config: LabelConfig::default(),
            wedge: WedgeParams::default(),
            plate_color: COLOR_OPTIONS[0],
            text_color: COLOR_OPTIONS[1],
            font: None,
            font_failed: false,
            measurer: Measurer::new(),
            prepared: PreparedLines::default(),
            layout: None,
            plate_slot: MeshSlot::default(),
            text_slot: MeshSlot::default(),
            wedge_slot: MeshSlot::default(),
            status: Status::LoadingFont,
        };
        session.rebuild_plate();
        session
    }

    /// Install the typeface. Failure is terminal for the session: the status
    /// reports it and text never builds.
    pub fn load_font(&mut self, json: &str) -> Result<(), FontError> {
        match Font::from_json(json) {
            Ok(font) => {
                info!(font = %font.identity(), "font loaded");
                self.font = Some(font);
                self.font_failed = false;
                self.recompute();
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "font load failed");
                self.font = None;
                self.font_failed = true;
                self.status = Status::FontFailed;
                Err(err)
            }
        }
    }

    /// Replace the text of one of the three input slots. Returns `false` for
    /// an out-of-range slot or an unchanged value.
    pub fn set_line(&mut self, slot: usize, value: &str) -> bool {
        let Some(line) = self.lines.get_mut(slot) else {
            return false;
        };
        if line == value {
            return false;
        }
        *line = value.to_string();
        self.recompute();
        true
    }

    /// Apply a label field edit; rejected values leave everything untouched.
    pub fn set_label_field(&mut self, field: LabelField, value: f64) -> bool {
        if !self.config.set(field, value) {
            return false;
        }
        self.recompute();
        true
    }

    /// Apply a wedge field edit; same silent-reject contract.
    pub fn set_wedge_field(&mut self, field: WedgeField, value: f64) -> bool {
        if !self.wedge.set(field, value) {
            return false;
        }
        self.recompute();
        true
    }

    /// Colors only affect exports, so no geometry is rebuilt.
    pub fn set_color(&mut self, role: ColorRole, choice: ColorChoice) {
        match role {
            ColorRole::Plate => self.plate_color = choice,
            ColorRole::Text => self.text_color = choice,
        }
    }

    pub fn set_mode(&mut self, mode: ToolMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.recompute();
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn config(&self) -> &LabelConfig {
        &self.config
    }

    pub fn wedge_params(&self) -> &WedgeParams {
        &self.wedge
    }

    pub fn lines(&self) -> &[String; 3] {
        &self.lines
    }

    pub fn layout(&self) -> Option<&LayoutResult> {
        self.layout.as_ref()
    }

    pub fn plate_color(&self) -> ColorChoice {
        self.plate_color
    }

    pub fn text_color(&self) -> ColorChoice {
        self.text_color
    }

    pub fn font_loaded(&self) -> bool {
        self.font.is_some()
    }

    pub fn plate_mesh(&self) -> Option<&TriangleMesh> {
        self.plate_slot.get()
    }

    pub fn text_mesh(&self) -> Option<&TriangleMesh> {
        self.text_slot.get()
    }

    pub fn wedge_mesh(&self) -> Option<&TriangleMesh> {
        self.wedge_slot.get()
    }

    /// Whether the current state has something exportable.
    pub fn export_enabled(&self) -> bool {
        match self.mode {
            ToolMode::Label => {
                !self.plate_slot.is_empty()
                    && !self.text_slot.is_empty()
                    && self.layout.as_ref().map_or(false, |layout| layout.fits)
            }
            ToolMode::Wedge => !self.wedge_slot.is_empty(),
        }
    }

    /// Zip the plate and text as an OBJ/MTL pair. The outcome is also
    /// reflected in the status line.
    pub fn export_obj(&mut self) -> Result<ExportBundle, ExportError> {
        let result = build_obj_bundle(
            self.plate_slot.get(),
            self.text_slot.get(),
            &self.plate_color,
            &self.text_color,
            &self.prepared.lines,
        );
        self.record_export(result)
    }

    /// ASCII STL of the current tool's geometry: the merged plate and text in
    /// label mode, the wedge solid in wedge mode.
    pub fn export_stl(&mut self) -> Result<ExportBundle, ExportError> {
        let result = self.build_stl();
        self.record_export(result)
    }

    fn build_stl(&self) -> Result<ExportBundle, ExportError> {
        match self.mode {
            ToolMode::Label => {
                let (Some(plate), Some(text)) = (self.plate_slot.get(), self.text_slot.get())
                else {
                    return Err(ExportError::MissingGeometry);
                };
                let mut merged = plate.clone();
                merged.merge(text);
                let stl = write_ascii_stl(&merged, "label")?;
                Ok(ExportBundle {
                    filename: label_stl_filename(&self.prepared.lines),
                    bytes: stl.into_bytes(),
                })
            }
            ToolMode::Wedge => {
                let Some(mesh) = self.wedge_slot.get() else {
                    return Err(ExportError::MissingGeometry);
                };
                let stl = write_ascii_stl(mesh, "wedge")?;
                Ok(ExportBundle {
                    filename: wedge_stl_filename(&self.wedge),
                    bytes: stl.into_bytes(),
                })
            }
        }
    }

    fn record_export(
        &mut self,
        result: Result<ExportBundle, ExportError>,
    ) -> Result<ExportBundle, ExportError> {
        match &result {
            Ok(bundle) => {
                info!(filename = %bundle.filename, bytes = bundle.bytes.len(), "export built");
                self.status = Status::ExportComplete {
                    filename: bundle.filename.clone(),
                };
            }
            Err(err) => {
                warn!(error = %err, "export failed");
                self.status = Status::ExportFailed;
            }
        }
        result
    }

    fn recompute(&mut self) {
        match self.mode {
            ToolMode::Label => self.recompute_label(),
            ToolMode::Wedge => self.recompute_wedge(),
        }
    }

    fn rebuild_plate(&mut self) {
        let params = PlateParams {
            width: self.config.plate_width,
            height: self.config.plate_height,
            radius: self.config.corner_radius,
            thickness: self.config.plate_thickness,
        };
        let mesh = repair(build_plate(&params), WELD_TOLERANCE).into_mesh();
        self.plate_slot.replace(mesh);
    }

    fn recompute_label(&mut self) {
        self.rebuild_plate();
        self.prepared = prepare_lines(&self.lines);

        let Some(font) = self.font.as_ref() else {
            self.layout = None;
            self.text_slot.clear();
            self.status = if self.font_failed {
                Status::FontFailed
            } else {
                Status::LoadingFont
            };
            return;
        };

        if self.prepared.lines.is_empty() {
            self.layout = None;
            self.text_slot.clear();
            self.status = Status::EmptyInput;
            return;
        }

        let layout = compute_layout(&mut self.measurer, font, &self.prepared.lines, &self.config);
        if let Some(overflow) = layout.overflow_index {
            let line = self.prepared.line_number(overflow);
            debug!(line, width = layout.widths[overflow], "line overflow");
            self.text_slot.clear();
            self.status = Status::LineTooLong { line };
            self.layout = Some(layout);
            return;
        }

        let params = TextSolidParams {
            lines: &layout.lines,
            font_size: layout.font_size,
            depth: self.config.text_depth,
            line_spacing: self.config.line_spacing,
            baseline_offsets: Some(&layout.baseline_offsets),
            plate_thickness: self.config.plate_thickness,
            embed_depth: self.config.text_embed,
        };
        match build_text_solid(font, &params) {
            Some(mesh) => {
                self.text_slot
                    .replace(repair(mesh, WELD_TOLERANCE).into_mesh());
                self.status = Status::Ready {
                    line_count: layout.line_count,
                    font_size: layout.font_size,
                };
            }
            None => {
                self.text_slot.clear();
                self.status = Status::EmptyInput;
            }
        }
        self.layout = Some(layout);
    }

    fn recompute_wedge(&mut self) {
        self.wedge_slot.replace(build_wedge(&self.wedge));
        self.status = Status::WedgeReady;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINI_FONT: &str = include_str!("../../label-text/tests/fixtures/mini.typeface.json");

    fn loaded_session() -> Session {
        let mut session = Session::new();
        session.load_font(MINI_FONT).unwrap();
        session
    }

    #[test]
    fn new_session_has_plate_and_waits_for_font() {
        let session = Session::new();
        assert!(session.plate_mesh().is_some());
        assert_eq!(*session.status(), Status::LoadingFont);
        assert!(!session.export_enabled());
    }

    #[test]
    fn bad_font_is_terminal() {
        let mut session = Session::new();
        assert!(session.load_font("not json").is_err());
        assert_eq!(*session.status(), Status::FontFailed);
        assert!(session.status().is_error());
        session.set_line(0, "II");
        assert_eq!(*session.status(), Status::FontFailed);
        assert!(session.text_mesh().is_none());
    }

    #[test]
    fn loaded_font_with_no_text_prompts_for_input() {
        let session = loaded_session();
        assert_eq!(*session.status(), Status::EmptyInput);
        assert!(session.text_mesh().is_none());
        assert!(!session.export_enabled());
    }

    #[test]
    fn typing_builds_text_and_enables_export() {
        let mut session = loaded_session();
        assert!(session.set_line(0, "IO"));
        assert_eq!(
            *session.status(),
            Status::Ready {
                line_count: 1,
                font_size: 9.0
            }
        );
        assert!(session.text_mesh().is_some());
        assert!(session.export_enabled());
    }

    #[test]
    fn setting_same_line_value_is_rejected() {
        let mut session = loaded_session();
        session.set_line(0, "II");
        assert!(!session.set_line(0, "II"));
        assert!(!session.set_line(7, "II"));
    }

    #[test]
    fn overflow_reports_input_line_number() {
        let mut session = loaded_session();
        session.set_line(0, "OK");
        // Slot 1 left blank; the long line sits in input slot 2.
        session.set_line(2, &"W".repeat(13));
        assert_eq!(*session.status(), Status::LineTooLong { line: 3 });
        assert!(session.text_mesh().is_none());
        assert!(!session.export_enabled());
        assert!(matches!(
            session.export_obj(),
            Err(ExportError::MissingGeometry)
        ));
    }

    #[test]
    fn clearing_the_long_line_recovers() {
        let mut session = loaded_session();
        session.set_line(0, "OK");
        session.set_line(2, &"W".repeat(13));
        assert!(session.status().is_error());
        session.set_line(2, "");
        assert_eq!(
            *session.status(),
            Status::Ready {
                line_count: 1,
                font_size: 9.0
            }
        );
        assert!(session.export_enabled());
    }

    #[test]
    fn rejected_field_edit_changes_nothing() {
        let mut session = loaded_session();
        session.set_line(0, "II");
        let before = session.config().plate_width;
        assert!(!session.set_label_field(LabelField::PlateWidth, f64::NAN));
        assert!(!session.set_label_field(LabelField::PlateWidth, 1.0));
        assert_eq!(session.config().plate_width, before);
        assert!(session.export_enabled());
    }

    #[test]
    fn shrinking_the_plate_can_overflow_existing_text() {
        let mut session = loaded_session();
        session.set_line(0, "WWWWWWWW");
        assert!(session.export_enabled());
        // 8 W at 9 mm measure 63.9 mm; a 40 mm plate leaves 36 mm usable.
        assert!(session.set_label_field(LabelField::PlateWidth, 40.0));
        assert_eq!(*session.status(), Status::LineTooLong { line: 1 });
    }

    #[test]
    fn wedge_mode_builds_and_labels_survive_the_round_trip() {
        let mut session = loaded_session();
        session.set_line(0, "II");
        session.set_mode(ToolMode::Wedge);
        assert_eq!(*session.status(), Status::WedgeReady);
        assert!(session.wedge_mesh().is_some());
        assert!(session.export_enabled());

        session.set_mode(ToolMode::Label);
        assert_eq!(
            *session.status(),
            Status::Ready {
                line_count: 1,
                font_size: 9.0
            }
        );
    }

    #[test]
    fn status_messages_render() {
        assert_eq!(Status::LoadingFont.to_string(), "Loading font...");
        assert_eq!(
            Status::LineTooLong { line: 2 }.to_string(),
            "Line 2 is too long. Shorten it."
        );
        assert_eq!(
            Status::Ready {
                line_count: 2,
                font_size: 6.5
            }
            .to_string(),
            "2 lines · font 6.5 mm"
        );
        assert_eq!(
            Status::Ready {
                line_count: 1,
                font_size: 9.0
            }
            .to_string(),
            "1 line · font 9.0 mm"
        );
    }
}

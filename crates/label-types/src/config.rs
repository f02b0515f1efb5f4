use serde::{Deserialize, Serialize};

/// Numeric parameters of the label tool, all in millimetres.
///
/// Every field has an enforced minimum; setters silently reject values that
/// are non-finite, below the minimum, or unchanged, so the caller can revert
/// an input field to its prior value without surfacing an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelConfig {
    pub plate_width: f64,
    pub plate_height: f64,
    pub plate_thickness: f64,
    pub corner_radius: f64,
    pub text_depth: f64,
    pub text_embed: f64,
    pub horizontal_padding: f64,
    pub vertical_padding: f64,
    pub line_spacing: f64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            plate_width: 76.5,
            plate_height: 22.0,
            plate_thickness: 1.0,
            corner_radius: 1.0,
            text_depth: 1.0,
            text_embed: 0.2,
            horizontal_padding: 2.0,
            vertical_padding: 5.0,
            line_spacing: 2.0,
        }
    }
}

/// Addressable fields of [`LabelConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelField {
    PlateWidth,
    PlateHeight,
    PlateThickness,
    CornerRadius,
    TextDepth,
    TextEmbed,
    HorizontalPadding,
    VerticalPadding,
    LineSpacing,
}

impl LabelConfig {
    /// Width available to text after symmetric horizontal padding.
    pub fn usable_width(&self) -> f64 {
        self.plate_width - 2.0 * self.horizontal_padding
    }

    /// Height available to text after symmetric vertical padding.
    pub fn usable_height(&self) -> f64 {
        self.plate_height - 2.0 * self.vertical_padding
    }

    /// Minimum accepted value for a field.
    pub fn min(field: LabelField) -> f64 {
        match field {
            LabelField::PlateWidth => 10.0,
            LabelField::PlateHeight => 5.0,
            LabelField::PlateThickness => 0.5,
            LabelField::CornerRadius => 0.0,
            LabelField::TextDepth => 0.2,
            LabelField::TextEmbed => 0.0,
            LabelField::HorizontalPadding => 0.0,
            LabelField::VerticalPadding => 0.0,
            LabelField::LineSpacing => 0.0,
        }
    }

    pub fn get(&self, field: LabelField) -> f64 {
        match field {
            LabelField::PlateWidth => self.plate_width,
            LabelField::PlateHeight => self.plate_height,
            LabelField::PlateThickness => self.plate_thickness,
            LabelField::CornerRadius => self.corner_radius,
            LabelField::TextDepth => self.text_depth,
            LabelField::TextEmbed => self.text_embed,
            LabelField::HorizontalPadding => self.horizontal_padding,
            LabelField::VerticalPadding => self.vertical_padding,
            LabelField::LineSpacing => self.line_spacing,
        }
    }

    /// Apply a new value to a field. Returns `true` when the value was
    /// accepted, `false` when it was rejected (field keeps its prior value).
    pub fn set(&mut self, field: LabelField, value: f64) -> bool {
        let slot = match field {
            LabelField::PlateWidth => &mut self.plate_width,
            LabelField::PlateHeight => &mut self.plate_height,
            LabelField::PlateThickness => &mut self.plate_thickness,
            LabelField::CornerRadius => &mut self.corner_radius,
            LabelField::TextDepth => &mut self.text_depth,
            LabelField::TextEmbed => &mut self.text_embed,
            LabelField::HorizontalPadding => &mut self.horizontal_padding,
            LabelField::VerticalPadding => &mut self.vertical_padding,
            LabelField::LineSpacing => &mut self.line_spacing,
        };
        apply_field(slot, value, Self::min(field))
    }
}

/// Parameters of the wedge shim tool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WedgeParams {
    /// Length of the flat base of the triangular profile.
    pub base_length: f64,
    /// Height of the vertical back edge.
    pub height: f64,
    /// Length the profile is extruded along.
    pub extrusion_length: f64,
    /// Height at which the sharp tip is cut flat; 0 keeps the tip sharp.
    pub tip_height: f64,
    /// Radius rounding the top corner; 0 keeps the corner sharp.
    pub fillet_radius: f64,
}

impl Default for WedgeParams {
    fn default() -> Self {
        Self {
            base_length: 20.0,
            height: 3.5,
            extrusion_length: 190.0,
            tip_height: 0.0,
            fillet_radius: 0.0,
        }
    }
}

/// Addressable fields of [`WedgeParams`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WedgeField {
    BaseLength,
    Height,
    ExtrusionLength,
    TipHeight,
    FilletRadius,
}

impl WedgeParams {
    pub fn min(field: WedgeField) -> f64 {
        match field {
            WedgeField::BaseLength => 1.0,
            WedgeField::Height => 0.5,
            WedgeField::ExtrusionLength => 0.5,
            WedgeField::TipHeight => 0.0,
            WedgeField::FilletRadius => 0.0,
        }
    }

    pub fn get(&self, field: WedgeField) -> f64 {
        match field {
            WedgeField::BaseLength => self.base_length,
            WedgeField::Height => self.height,
            WedgeField::ExtrusionLength => self.extrusion_length,
            WedgeField::TipHeight => self.tip_height,
            WedgeField::FilletRadius => self.fillet_radius,
        }
    }

    /// Same silent-reject contract as [`LabelConfig::set`].
    pub fn set(&mut self, field: WedgeField, value: f64) -> bool {
        let slot = match field {
            WedgeField::BaseLength => &mut self.base_length,
            WedgeField::Height => &mut self.height,
            WedgeField::ExtrusionLength => &mut self.extrusion_length,
            WedgeField::TipHeight => &mut self.tip_height,
            WedgeField::FilletRadius => &mut self.fillet_radius,
        };
        apply_field(slot, value, Self::min(field))
    }
}

fn apply_field(slot: &mut f64, value: f64, min: f64) -> bool {
    if !value.is_finite() || value < min || value == *slot {
        return false;
    }
    *slot = value;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_plate() {
        let config = LabelConfig::default();
        assert!((config.plate_width - 76.5).abs() < 1e-12);
        assert!((config.usable_width() - 72.5).abs() < 1e-12);
        assert!((config.usable_height() - 12.0).abs() < 1e-12);
    }

    #[test]
    fn set_accepts_valid_value() {
        let mut config = LabelConfig::default();
        assert!(config.set(LabelField::PlateWidth, 100.0));
        assert_eq!(config.plate_width, 100.0);
    }

    #[test]
    fn set_rejects_below_minimum() {
        let mut config = LabelConfig::default();
        assert!(!config.set(LabelField::PlateWidth, 5.0));
        assert!((config.plate_width - 76.5).abs() < 1e-12);
    }

    #[test]
    fn set_rejects_non_finite() {
        let mut config = LabelConfig::default();
        assert!(!config.set(LabelField::PlateHeight, f64::NAN));
        assert!(!config.set(LabelField::PlateHeight, f64::INFINITY));
        assert!((config.plate_height - 22.0).abs() < 1e-12);
    }

    #[test]
    fn set_rejects_unchanged_value() {
        let mut config = LabelConfig::default();
        assert!(!config.set(LabelField::LineSpacing, 2.0));
    }

    #[test]
    fn wedge_defaults_and_setters() {
        let mut wedge = WedgeParams::default();
        assert!((wedge.base_length - 20.0).abs() < 1e-12);
        assert!((wedge.extrusion_length - 190.0).abs() < 1e-12);
        assert!(wedge.set(WedgeField::TipHeight, 0.7));
        assert!(!wedge.set(WedgeField::Height, 0.1));
        assert!((wedge.height - 3.5).abs() < 1e-12);
    }
}

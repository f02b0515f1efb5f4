pub mod font;
pub mod layout;
pub mod measure;
pub mod solid;

pub use font::{Font, FontError};
pub use layout::{
    compute_layout, normalize_line, prepare_lines, LayoutResult, PreparedLines,
    BASELINE_PRESETS, FONT_SIZE_TIERS,
};
pub use measure::Measurer;
pub use solid::{build_text_solid, TextSolidParams};

pub mod bundle;
pub mod errors;
pub mod obj;
pub mod stl;

pub use bundle::{
    build_obj_bundle, label_stl_filename, slugify, wedge_stl_filename, ExportBundle,
};
pub use errors::ExportError;
pub use obj::{write_mtl, write_obj};
pub use stl::write_ascii_stl;

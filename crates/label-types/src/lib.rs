pub mod colors;
pub mod config;

pub use colors::*;
pub use config::*;

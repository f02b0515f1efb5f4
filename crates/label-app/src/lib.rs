pub mod session;
pub mod slot;

pub use session::{Session, Status, ToolMode};
pub use slot::MeshSlot;

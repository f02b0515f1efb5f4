/// Errors raised at the export boundary.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExportError {
    #[error("missing geometry for export")]
    MissingGeometry,

    #[error("mesh has no triangles")]
    EmptyMesh,

    #[error("index {index} out of range (vertex count = {vertex_count})")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("archive write failed: {0}")]
    Archive(String),
}

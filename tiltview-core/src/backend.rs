/// The rendering collaborator the viewer submits frames to
use crate::color::ClearColor;
use crate::decode::DecodedImage;
use crate::error::Result;
use crate::geometry::{QuadVertex, QUAD_VERTEX_COUNT};
use crate::projection::{MatrixLayout, TransformUniform};

/// Receives one frame's worth of data per `Viewer::render_frame` call, in
/// this order: vertices, transform, clear, draw, present.
pub trait RenderBackend {
    /// Bind a new texture. On error the previously bound texture must stay.
    fn upload_texture(&mut self, image: &DecodedImage) -> Result<()>;

    fn upload_vertices(&mut self, vertices: &[QuadVertex; QUAD_VERTEX_COUNT]);

    fn upload_transform(&mut self, transform: &TransformUniform);

    fn clear(&mut self, color: ClearColor);

    /// Draw `vertex_count` non-indexed vertices as a triangle list
    fn draw(&mut self, vertex_count: u32);

    /// Show the frame, blocking on vsync where the backend has one
    fn present(&mut self) -> Result<()>;

    /// Memory order the backend's shader expects for the transform
    fn matrix_layout(&self) -> MatrixLayout {
        MatrixLayout::ColumnMajor
    }
}

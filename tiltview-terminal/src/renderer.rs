/// Half-block true-color rasterizer for terminal rendering
use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Matrix4;
use std::io::Write;
use tiltview_core::geometry::QUAD_VERTEX_COUNT;
use tiltview_core::projection::{project, ScreenPoint};
use tiltview_core::{
    ClearColor, DecodedImage, QuadVertex, RenderBackend, Result, TransformUniform, Viewport,
};

/// Upper half block: foreground paints the top pixel, background the bottom one
const HALF_BLOCK: char = '\u{2580}';

/// Texture color used before any image was bound
const UNTEXTURED: [u8; 3] = [255, 255, 255];

/// Software implementation of the render backend.
///
/// Every terminal cell holds two vertically stacked pixels, so the pixel
/// viewport is `columns x rows * 2`.
pub struct TerminalRenderer<W: Write> {
    writer: W,
    columns: usize,
    rows: usize,
    color_buffer: Vec<[u8; 3]>,
    depth_buffer: Vec<f32>,
    texture: Option<DecodedImage>,
    vertices: [QuadVertex; QUAD_VERTEX_COUNT],
    transform: Matrix4<f32>,
    overlay: String,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(writer: W, columns: usize, rows: usize) -> Self {
        let size = columns * rows * 2;
        Self {
            writer,
            columns,
            rows,
            color_buffer: vec![[0; 3]; size],
            depth_buffer: vec![f32::INFINITY; size],
            texture: None,
            vertices: [QuadVertex { position: [0.0; 3], uv: [0.0; 2] }; QUAD_VERTEX_COUNT],
            transform: Matrix4::identity(),
            overlay: String::new(),
        }
    }

    pub fn resize(&mut self, columns: usize, rows: usize) {
        let size = columns * rows * 2;
        self.columns = columns;
        self.rows = rows;
        self.color_buffer = vec![[0; 3]; size];
        self.depth_buffer = vec![f32::INFINITY; size];
    }

    /// Pixel dimensions of the drawable area
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.pixel_width() as u32, self.pixel_height() as u32)
    }

    /// Text drawn over the first row on the next present
    pub fn set_overlay(&mut self, text: impl Into<String>) {
        self.overlay = text.into();
    }

    /// Color of a pixel after the last draw
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        self.color_buffer[y * self.pixel_width() + x]
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    fn pixel_width(&self) -> usize {
        self.columns
    }

    fn pixel_height(&self) -> usize {
        self.rows * 2
    }

    fn render_triangle(&mut self, triangle: &[QuadVertex]) {
        let viewport = self.viewport();

        // Project vertices to screen space
        let mut screen = [ScreenPoint { x: 0.0, y: 0.0, depth: 0.0, inv_w: 0.0 }; 3];
        for (slot, vertex) in screen.iter_mut().zip(triangle) {
            match project(&self.transform, &vertex.position(), viewport) {
                Some(point) => *slot = point,
                None => return, // Triangle crosses the eye plane
            }
        }

        let uvs = [triangle[0].uv, triangle[1].uv, triangle[2].uv];
        self.rasterize_triangle(&screen, &uvs);
    }

    fn rasterize_triangle(&mut self, v: &[ScreenPoint; 3], uvs: &[[f32; 2]; 3]) {
        let width = self.pixel_width() as i32;
        let height = self.pixel_height() as i32;
        if width == 0 || height == 0 {
            return;
        }

        // Bounding box, clipped to screen bounds
        let min_x = (v[0].x.min(v[1].x).min(v[2].x).floor() as i32).max(0);
        let max_x = (v[0].x.max(v[1].x).max(v[2].x).ceil() as i32).min(width - 1);
        let min_y = (v[0].y.min(v[1].y).min(v[2].y).floor() as i32).max(0);
        let max_y = (v[0].y.max(v[1].y).max(v[2].y).ceil() as i32).min(height - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) = barycentric(
                    (v[0].x, v[0].y),
                    (v[1].x, v[1].y),
                    (v[2].x, v[2].y),
                    (px, py),
                ) else {
                    return; // Degenerate triangle, seen edge-on
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v[0].depth + w1 * v[1].depth + w2 * v[2].depth;
                let idx = y as usize * self.pixel_width() + x as usize;
                if depth >= self.depth_buffer[idx] {
                    continue;
                }

                // Perspective-correct texture coordinates
                let p0 = w0 * v[0].inv_w;
                let p1 = w1 * v[1].inv_w;
                let p2 = w2 * v[2].inv_w;
                let sum = p0 + p1 + p2;
                let u = (p0 * uvs[0][0] + p1 * uvs[1][0] + p2 * uvs[2][0]) / sum;
                let t = (p0 * uvs[0][1] + p1 * uvs[1][1] + p2 * uvs[2][1]) / sum;

                self.depth_buffer[idx] = depth;
                self.color_buffer[idx] = self.sample(u, t);
            }
        }
    }

    /// Nearest-neighbour sample with wrap addressing
    fn sample(&self, u: f32, v: f32) -> [u8; 3] {
        let Some(texture) = &self.texture else {
            return UNTEXTURED;
        };
        let x = ((u.rem_euclid(1.0) * texture.width() as f32) as u32).min(texture.width() - 1);
        let y = ((v.rem_euclid(1.0) * texture.height() as f32) as u32).min(texture.height() - 1);
        let [r, g, b, _] = texture.texel(x, y);
        [r, g, b]
    }

    fn write_frame(&mut self) -> std::io::Result<()> {
        let width = self.pixel_width();
        let mut current: Option<([u8; 3], [u8; 3])> = None;

        for row in 0..self.rows {
            self.writer.queue(MoveTo(0, row as u16))?;
            for column in 0..self.columns {
                let top = self.color_buffer[row * 2 * width + column];
                let bottom = self.color_buffer[(row * 2 + 1) * width + column];

                // Only emit color changes
                if current != Some((top, bottom)) {
                    self.writer.queue(SetForegroundColor(rgb(top)))?;
                    self.writer.queue(SetBackgroundColor(rgb(bottom)))?;
                    current = Some((top, bottom));
                }
                self.writer.queue(Print(HALF_BLOCK))?;
            }
        }
        self.writer.queue(ResetColor)?;

        if !self.overlay.is_empty() {
            let line: String = self.overlay.chars().take(self.columns).collect();
            self.writer
                .queue(MoveTo(0, 0))?
                .queue(SetForegroundColor(Color::Yellow))?
                .queue(SetBackgroundColor(Color::Black))?
                .queue(Print(line))?
                .queue(ResetColor)?;
        }

        self.writer.flush()
    }
}

impl<W: Write> RenderBackend for TerminalRenderer<W> {
    fn upload_texture(&mut self, image: &DecodedImage) -> Result<()> {
        self.texture = Some(image.clone());
        Ok(())
    }

    fn upload_vertices(&mut self, vertices: &[QuadVertex; QUAD_VERTEX_COUNT]) {
        self.vertices = *vertices;
    }

    fn upload_transform(&mut self, transform: &TransformUniform) {
        self.transform = transform.to_matrix(self.matrix_layout());
    }

    fn clear(&mut self, color: ClearColor) {
        let rgb = color.to_rgb8();
        self.color_buffer.fill(rgb);
        self.depth_buffer.fill(f32::INFINITY);
    }

    fn draw(&mut self, vertex_count: u32) {
        let count = (vertex_count as usize).min(QUAD_VERTEX_COUNT);
        let vertices = self.vertices;
        for triangle in vertices[..count].chunks_exact(3) {
            self.render_triangle(triangle);
        }
    }

    fn present(&mut self) -> Result<()> {
        self.write_frame()?;
        Ok(())
    }
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb { r, g, b }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiltview_core::{PresetColor, Viewer, ViewerEvent};

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    /// 2x2 texture: red on the left column, blue on the right
    fn split_texture() -> DecodedImage {
        let mut pixels = Vec::new();
        for _ in 0..2 {
            pixels.extend_from_slice(&RED);
            pixels.extend_from_slice(&BLUE);
        }
        DecodedImage::from_rgba(2, 2, pixels).unwrap()
    }

    fn setup(columns: usize, rows: usize) -> (Viewer, TerminalRenderer<Vec<u8>>) {
        let mut renderer = TerminalRenderer::new(Vec::new(), columns, rows);
        let mut viewer = Viewer::new(renderer.viewport());
        viewer.install_image(&mut renderer, split_texture()).unwrap();
        (viewer, renderer)
    }

    #[test]
    fn test_viewport_uses_half_blocks() {
        let renderer = TerminalRenderer::new(Vec::new(), 80, 24);
        assert_eq!(renderer.viewport(), Viewport::new(80, 48));
    }

    #[test]
    fn test_quad_covers_center_and_keeps_orientation() {
        let (viewer, mut renderer) = setup(120, 60);
        viewer.render_frame(&mut renderer).unwrap();

        // Center row: left of center samples red, right samples blue
        assert_eq!(renderer.pixel(50, 60), [255, 0, 0]);
        assert_eq!(renderer.pixel(70, 60), [0, 0, 255]);
        // Corners stay at the clear color
        assert_eq!(renderer.pixel(0, 0), [0, 0, 0]);
        assert_eq!(renderer.pixel(119, 119), [0, 0, 0]);
    }

    #[test]
    fn test_clear_uses_background() {
        let (mut viewer, mut renderer) = setup(40, 20);
        viewer.handle(ViewerEvent::Command(tiltview_core::Command::PresetColor(
            PresetColor::Green,
        )));
        viewer.render_frame(&mut renderer).unwrap();
        assert_eq!(renderer.pixel(0, 0), [0, 255, 0]);
    }

    #[test]
    fn test_zoom_grows_coverage() {
        let (mut viewer, mut renderer) = setup(100, 50);
        viewer.render_frame(&mut renderer).unwrap();
        let covered = |r: &TerminalRenderer<Vec<u8>>| {
            (0..100).filter(|&x| r.pixel(x, 50) != [0, 0, 0]).count()
        };
        let before = covered(&renderer);

        for _ in 0..5 {
            viewer.handle(ViewerEvent::Scroll { delta: 1.0 });
        }
        viewer.render_frame(&mut renderer).unwrap();
        assert!(covered(&renderer) > before);
    }

    #[test]
    fn test_present_writes_escape_sequences() {
        let (viewer, mut renderer) = setup(10, 4);
        renderer.set_overlay("status");
        viewer.render_frame(&mut renderer).unwrap();
        let output = String::from_utf8_lossy(renderer.writer());
        assert!(output.contains(HALF_BLOCK));
        assert!(output.contains("status"));
    }

    #[test]
    fn test_resize_reallocates_buffers() {
        let (mut viewer, mut renderer) = setup(10, 5);
        renderer.resize(30, 10);
        viewer.set_viewport(renderer.viewport());
        viewer.render_frame(&mut renderer).unwrap();
        assert_eq!(renderer.pixel(29, 19), [0, 0, 0]);
    }

    #[test]
    fn test_barycentric_degenerate() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
        let (w0, w1, w2) = barycentric((0.0, 0.0), (4.0, 0.0), (0.0, 4.0), (1.0, 1.0)).unwrap();
        assert!((w0 + w1 + w2 - 1.0).abs() < 1e-6);
        assert!(w0 > 0.0 && w1 > 0.0 && w2 > 0.0);
    }
}

/// Camera, viewport and the per-frame world-view-projection matrix
use bytemuck::{Pod, Zeroable};
use nalgebra::{Matrix4, Point3, Vector3};

pub const CAMERA_EYE: [f32; 3] = [0.0, 0.0, -2.0];
pub const CAMERA_FOV_Y: f32 = std::f32::consts::FRAC_PI_4; // 45 degrees
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;

/// Drawable area in pixels, owned by the windowing layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height. A collapsed viewport counts as one pixel high.
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    /// Map a pointer position to roughly `[-1, 1]` on both axes, measured
    /// from the viewport center. Y grows downwards like the input.
    pub fn normalize(&self, x: f32, y: f32) -> (f32, f32) {
        let half_w = self.width.max(1) as f32 / 2.0;
        let half_h = self.height.max(1) as f32 / 2.0;
        ((x - half_w) / half_w, (y - half_h) / half_h)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1600, 900)
    }
}

/// Memory order of a matrix handed to a shader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixLayout {
    /// Columns stored contiguously, for `M * v` shaders (WGSL, GLSL)
    #[default]
    ColumnMajor,
    /// Rows stored contiguously, i.e. the transpose, for `v * M` shaders
    RowMajor,
}

/// Transform constant buffer contents
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TransformUniform {
    pub matrix: [[f32; 4]; 4],
}

impl TransformUniform {
    pub fn new(matrix: &Matrix4<f32>, layout: MatrixLayout) -> Self {
        let mut packed = [[0.0; 4]; 4];
        for (outer, slot) in packed.iter_mut().enumerate() {
            for (inner, value) in slot.iter_mut().enumerate() {
                *value = match layout {
                    MatrixLayout::ColumnMajor => matrix[(inner, outer)],
                    MatrixLayout::RowMajor => matrix[(outer, inner)],
                };
            }
        }
        Self { matrix: packed }
    }

    /// Recover the column-vector matrix from its packed form
    pub fn to_matrix(&self, layout: MatrixLayout) -> Matrix4<f32> {
        Matrix4::from_fn(|row, col| match layout {
            MatrixLayout::ColumnMajor => self.matrix[col][row],
            MatrixLayout::RowMajor => self.matrix[row][col],
        })
    }
}

/// A vertex after projection to pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    /// Depth in `[0, 1]`, near to far
    pub depth: f32,
    /// Reciprocal of clip-space w, used for perspective-correct interpolation
    pub inv_w: f32,
}

/// Project a point through `matrix` into pixel space.
///
/// Returns `None` for points at or behind the eye. Points outside the
/// viewport are still returned so triangles can be clipped per pixel.
pub fn project(matrix: &Matrix4<f32>, point: &Point3<f32>, viewport: Viewport) -> Option<ScreenPoint> {
    let clip = matrix * point.to_homogeneous();

    // Prevent division by near-zero w values
    if clip.w < 1e-6 {
        return None;
    }

    let inv_w = 1.0 / clip.w;
    let ndc_x = clip.x * inv_w;
    let ndc_y = clip.y * inv_w;

    Some(ScreenPoint {
        x: (ndc_x + 1.0) * 0.5 * viewport.width as f32,
        y: (1.0 - ndc_y) * 0.5 * viewport.height as f32,
        depth: clip.z * inv_w,
        inv_w,
    })
}

/// Left-handed perspective projection with depth mapped to `[0, 1]`
#[rustfmt::skip]
pub fn perspective_fov_lh(fov_y: f32, aspect: f32, near: f32, far: f32) -> Matrix4<f32> {
    let y_scale = 1.0 / (fov_y / 2.0).tan();
    let x_scale = y_scale / aspect;
    let range = far / (far - near);

    Matrix4::new(
        x_scale, 0.0, 0.0, 0.0,
        0.0, y_scale, 0.0, 0.0,
        0.0, 0.0, range, -near * range,
        0.0, 0.0, 1.0, 0.0,
    )
}

/// Fixed camera looking at the origin from behind the image plane
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            position: Point3::from(CAMERA_EYE),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: CAMERA_FOV_Y,
            aspect: viewport.aspect(),
            near: NEAR_PLANE,
            far: FAR_PLANE,
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_lh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        perspective_fov_lh(self.fov, self.aspect, self.near, self.far)
    }

    /// Project a world-space point to pixel coordinates
    pub fn project_to_screen(&self, point: &Point3<f32>, viewport: Viewport) -> Option<ScreenPoint> {
        let matrix = self.projection_matrix() * self.view_matrix();
        project(&matrix, point, viewport)
    }
}

/// Computes the world-view-projection matrix once per frame
pub struct TransformPipeline;

impl TransformPipeline {
    /// World, then view, then projection, in column-vector form (`clip = M * v`)
    pub fn world_view_projection(viewport: Viewport) -> Matrix4<f32> {
        let camera = Camera::new(viewport);
        let world = Matrix4::identity();
        camera.projection_matrix() * camera.view_matrix() * world
    }

    /// The same matrix packed for upload in the backend's layout
    pub fn uniform(viewport: Viewport, layout: MatrixLayout) -> TransformUniform {
        TransformUniform::new(&Self::world_view_projection(viewport), layout)
    }
}

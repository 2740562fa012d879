/// Per-frame quad geometry for the displayed image
use bytemuck::{Pod, Zeroable};
use nalgebra::{Point2, Point3};

use crate::view_state::ViewState;

/// Length of the longer image side at zoom 1.0 (world units)
pub const BASE_SIZE: f32 = 0.6;

/// Number of vertices submitted per frame (two non-indexed triangles)
pub const QUAD_VERTEX_COUNT: usize = 6;

/// Corner of the quad, in the order corners are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft = 0,
    TopRight = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Texture coordinate pinned to this corner (origin at the top-left texel)
    pub fn uv(self) -> Point2<f32> {
        match self {
            Corner::TopLeft => Point2::new(0.0, 0.0),
            Corner::TopRight => Point2::new(1.0, 0.0),
            Corner::BottomLeft => Point2::new(0.0, 1.0),
            Corner::BottomRight => Point2::new(1.0, 1.0),
        }
    }
}

/// Corner order of the two triangles covering the quad
pub const TRIANGLE_CORNERS: [Corner; QUAD_VERTEX_COUNT] = [
    Corner::TopLeft,
    Corner::TopRight,
    Corner::BottomLeft,
    Corner::TopRight,
    Corner::BottomRight,
    Corner::BottomLeft,
];

/// A vertex as uploaded to the vertex buffer: position followed by UV
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl QuadVertex {
    pub fn new(position: Point3<f32>, uv: Point2<f32>) -> Self {
        Self {
            position: [position.x, position.y, position.z],
            uv: [uv.x, uv.y],
        }
    }

    pub fn position(&self) -> Point3<f32> {
        Point3::new(self.position[0], self.position[1], self.position[2])
    }
}

/// The tilted quad for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGeometry {
    pub corners: [Point3<f32>; 4],
}

impl FrameGeometry {
    pub fn corner(&self, corner: Corner) -> Point3<f32> {
        self.corners[corner as usize]
    }

    /// Expand the corners into two triangles with their texture coordinates
    pub fn vertices(&self) -> [QuadVertex; QUAD_VERTEX_COUNT] {
        TRIANGLE_CORNERS.map(|corner| QuadVertex::new(self.corner(corner), corner.uv()))
    }
}

/// Builds the image quad from the current view state
pub struct FrameGeometryBuilder;

impl FrameGeometryBuilder {
    /// Width and height of the quad before tilting.
    ///
    /// The longer image side spans `BASE_SIZE`, the shorter one follows the
    /// aspect ratio; both are then scaled by `zoom`.
    pub fn extents(aspect_ratio: f32, zoom: f32) -> (f32, f32) {
        let (width, height) = if aspect_ratio > 1.0 {
            (BASE_SIZE, BASE_SIZE / aspect_ratio)
        } else {
            (BASE_SIZE * aspect_ratio, BASE_SIZE)
        };
        (width * zoom, height * zoom)
    }

    /// Rotate a point around Y by `tilt_y`, then around X by `tilt_x`.
    ///
    /// The X rotation consumes the Z produced by the Y rotation, so the two
    /// rotations do not commute.
    pub fn tilt(point: Point3<f32>, tilt_x: f32, tilt_y: f32) -> Point3<f32> {
        let (sin_y, cos_y) = tilt_y.sin_cos();
        let (sin_x, cos_x) = tilt_x.sin_cos();

        let x = point.x * cos_y - point.z * sin_y;
        let z = point.x * sin_y + point.z * cos_y;

        let y = point.y * cos_x - z * sin_x;
        let z = point.y * sin_x + z * cos_x;

        Point3::new(x, y, z)
    }

    pub fn build(view: &ViewState) -> FrameGeometry {
        let (width, height) = Self::extents(view.image_aspect_ratio(), view.zoom());
        let (half_w, half_h) = (width / 2.0, height / 2.0);

        let local = [
            Point3::new(-half_w, half_h, 0.0),
            Point3::new(half_w, half_h, 0.0),
            Point3::new(-half_w, -half_h, 0.0),
            Point3::new(half_w, -half_h, 0.0),
        ];

        FrameGeometry {
            corners: local.map(|p| Self::tilt(p, view.tilt_x(), view.tilt_y())),
        }
    }

    /// Build and pack the six vertices for this frame
    pub fn vertices(view: &ViewState) -> [QuadVertex; QUAD_VERTEX_COUNT] {
        Self::build(view).vertices()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-6;

    fn close(a: Point3<f32>, b: Point3<f32>) -> bool {
        (a - b).norm() < 1e-5
    }

    #[test]
    fn test_six_vertices_with_fixed_uvs() {
        let expected: [[f32; 2]; QUAD_VERTEX_COUNT] = [
            [0.0, 0.0],
            [1.0, 0.0],
            [0.0, 1.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 1.0],
        ];
        for &(tx, ty, zoom, aspect) in &[
            (0.0, 0.0, 1.0, 1.0),
            (1.5, -1.5, 5.0, 3.0),
            (-0.7, 0.2, 0.1, 0.25),
        ] {
            let view = ViewState::with_view(tx, ty, zoom).with_aspect_ratio(aspect);
            let vertices = FrameGeometryBuilder::vertices(&view);
            assert_eq!(vertices.len(), QUAD_VERTEX_COUNT);
            let uvs: Vec<[f32; 2]> = vertices.iter().map(|v| v.uv).collect();
            assert_eq!(uvs, expected);
        }
    }

    #[test]
    fn test_triangles_share_diagonal() {
        let view = ViewState::with_view(0.3, -0.8, 1.7).with_aspect_ratio(1.6);
        let v = FrameGeometryBuilder::vertices(&view);
        // Top-right and bottom-left appear in both triangles
        assert_eq!(v[1].position, v[3].position);
        assert_eq!(v[2].position, v[5].position);
    }

    #[test]
    fn test_build_is_idempotent() {
        let view = ViewState::with_view(0.9, -1.2, 3.0).with_aspect_ratio(0.75);
        assert_eq!(
            FrameGeometryBuilder::vertices(&view),
            FrameGeometryBuilder::vertices(&view)
        );
    }

    #[test]
    fn test_landscape_extents() {
        let view = ViewState::new().with_aspect_ratio(2.0);
        let quad = FrameGeometryBuilder::build(&view);
        let width = quad.corner(Corner::TopRight).x - quad.corner(Corner::TopLeft).x;
        let height = quad.corner(Corner::TopLeft).y - quad.corner(Corner::BottomLeft).y;
        assert!((width - 0.6).abs() < EPS);
        assert!((height - 0.3).abs() < EPS);
    }

    #[test]
    fn test_portrait_extents() {
        let view = ViewState::new().with_aspect_ratio(0.5);
        let quad = FrameGeometryBuilder::build(&view);
        let width = quad.corner(Corner::TopRight).x - quad.corner(Corner::TopLeft).x;
        let height = quad.corner(Corner::TopLeft).y - quad.corner(Corner::BottomLeft).y;
        assert!((width - 0.3).abs() < EPS);
        assert!((height - 0.6).abs() < EPS);
    }

    #[test]
    fn test_square_and_zoom_extents() {
        let (w, h) = FrameGeometryBuilder::extents(1.0, 1.0);
        assert!((w - 0.6).abs() < EPS && (h - 0.6).abs() < EPS);

        let (w, h) = FrameGeometryBuilder::extents(2.0, 2.5);
        assert!((w - 1.5).abs() < EPS);
        assert!((h - 0.75).abs() < EPS);
    }

    #[test]
    fn test_untilted_quad_lies_in_plane() {
        let quad = FrameGeometryBuilder::build(&ViewState::new());
        for corner in quad.corners {
            assert_eq!(corner.z, 0.0);
        }
        assert!(close(quad.corner(Corner::TopLeft), Point3::new(-0.3, 0.3, 0.0)));
        assert!(close(quad.corner(Corner::BottomRight), Point3::new(0.3, -0.3, 0.0)));
    }

    #[test]
    fn test_y_rotation_sign() {
        let rotated = FrameGeometryBuilder::tilt(Point3::new(1.0, 0.0, 0.0), 0.0, FRAC_PI_2);
        assert!(close(rotated, Point3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_x_rotation_sign() {
        let rotated = FrameGeometryBuilder::tilt(Point3::new(0.0, 1.0, 0.0), FRAC_PI_2, 0.0);
        assert!(close(rotated, Point3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_rotation_order_is_y_then_x() {
        // Y moves the point onto +Z, X then carries that Z into -Y
        let p = FrameGeometryBuilder::tilt(Point3::new(1.0, 0.0, 0.0), FRAC_PI_2, FRAC_PI_2);
        assert!(close(p, Point3::new(0.0, -1.0, 0.0)));

        // The reverse order would leave the point on +Z
        assert!(!close(p, Point3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_tilt_preserves_distances() {
        let view = ViewState::with_view(0.4, 1.1, 1.0).with_aspect_ratio(1.5);
        let quad = FrameGeometryBuilder::build(&view);
        let top = (quad.corner(Corner::TopRight) - quad.corner(Corner::TopLeft)).norm();
        let side = (quad.corner(Corner::TopLeft) - quad.corner(Corner::BottomLeft)).norm();
        assert!((top - 0.6).abs() < 1e-5);
        assert!((side - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<QuadVertex>(), 20);
        let view = ViewState::new();
        let vertices = FrameGeometryBuilder::vertices(&view);
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 6 * 20);
    }
}

/// tiltview web - wasm bindings for a JavaScript/WebGL host
///
/// The host owns the canvas, the GL context and image decoding. It forwards
/// input to `WebViewer`, calls `frame()` once per animation frame and uploads
/// the returned vertices, matrix and clear color itself.
use std::path::PathBuf;

use tiltview_core::geometry::QUAD_VERTEX_COUNT;
use tiltview_core::{
    parse_color, ClearColor, Command, DecodedImage, Key, PresetColor, QuadVertex, RenderBackend,
    Response, Result, TransformUniform, Viewer, ViewerEvent, Viewport,
};
use wasm_bindgen::prelude::*;

/// Render backend that keeps the last frame for the host to read back
#[derive(Default)]
struct FrameCapture {
    vertices: Vec<f32>,
    transform: Vec<f32>,
    clear: [f32; 4],
    draw_count: u32,
    pending_texture: Option<DecodedImage>,
}

impl RenderBackend for FrameCapture {
    fn upload_texture(&mut self, image: &DecodedImage) -> Result<()> {
        self.pending_texture = Some(image.clone());
        Ok(())
    }

    fn upload_vertices(&mut self, vertices: &[QuadVertex; QUAD_VERTEX_COUNT]) {
        self.vertices = bytemuck::cast_slice::<QuadVertex, f32>(vertices).to_vec();
    }

    fn upload_transform(&mut self, transform: &TransformUniform) {
        self.transform = bytemuck::cast_slice::<[f32; 4], f32>(&transform.matrix).to_vec();
    }

    fn clear(&mut self, color: ClearColor) {
        self.clear = color.to_array();
    }

    fn draw(&mut self, vertex_count: u32) {
        self.draw_count = vertex_count;
    }

    fn present(&mut self) -> Result<()> {
        Ok(())
    }
}

#[wasm_bindgen]
pub struct WebViewer {
    viewer: Viewer,
    capture: FrameCapture,
    pending_open: Option<String>,
}

#[wasm_bindgen]
impl WebViewer {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> WebViewer {
        WebViewer {
            viewer: Viewer::new(Viewport::new(width, height)),
            capture: FrameCapture::default(),
            pending_open: None,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewer.set_viewport(Viewport::new(width, height));
    }

    pub fn pointer_down(&mut self) {
        self.viewer.handle(ViewerEvent::PointerDown);
    }

    pub fn pointer_up(&mut self) {
        self.viewer.handle(ViewerEvent::PointerUp);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.viewer.handle(ViewerEvent::PointerMove { x, y });
    }

    /// Forward a `WheelEvent.deltaY`; negative values scroll forward
    pub fn wheel(&mut self, delta_y: f32) {
        self.viewer.handle(ViewerEvent::Scroll { delta: -delta_y });
    }

    /// Forward a `KeyboardEvent.key`. Returns true when the key was used.
    pub fn key(&mut self, key: &str) -> bool {
        match Key::from_dom_key(key) {
            Some(key) => {
                self.dispatch(ViewerEvent::Key(key));
                true
            }
            None => false,
        }
    }

    pub fn reset_view(&mut self) {
        self.dispatch(ViewerEvent::Command(Command::ResetView));
    }

    pub fn exit(&mut self) {
        self.dispatch(ViewerEvent::Command(Command::Exit));
    }

    pub fn is_running(&self) -> bool {
        self.viewer.is_running()
    }

    /// Set the background from a color string (`#rrggbb`, name or `r,g,b`)
    pub fn set_background(&mut self, color: &str) -> std::result::Result<(), JsValue> {
        let color = parse_color(color).map_err(|err| JsValue::from_str(&err.to_string()))?;
        self.dispatch(ViewerEvent::Command(Command::SetBackgroundColor(color)));
        Ok(())
    }

    /// Pick a preset background: 0 black, 1 white, 2 gray, 3 blue, 4 green, 5 red
    pub fn preset_background(&mut self, index: usize) -> bool {
        match PresetColor::ALL.get(index) {
            Some(&preset) => {
                self.dispatch(ViewerEvent::Command(Command::PresetColor(preset)));
                true
            }
            None => false,
        }
    }

    /// Ask to open a file by name; the host reads it via `take_open_request`
    pub fn open_image(&mut self, name: &str) {
        self.dispatch(ViewerEvent::Command(Command::OpenImage(PathBuf::from(name))));
    }

    pub fn take_open_request(&mut self) -> Option<String> {
        self.pending_open.take()
    }

    /// Hand over pixels decoded by the host (e.g. from `ImageData.data`)
    pub fn image_decoded(&mut self, width: u32, height: u32, rgba: Vec<u8>) -> std::result::Result<(), JsValue> {
        let image = DecodedImage::from_rgba(width, height, rgba)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        self.viewer
            .install_image(&mut self.capture, image)
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Texture bound since the last call, as RGBA bytes
    pub fn take_texture(&mut self) -> Option<Vec<u8>> {
        self.capture.pending_texture.take().map(DecodedImage::into_pixels)
    }

    /// Recompute the frame; read it back with the accessors below
    pub fn frame(&mut self) -> std::result::Result<(), JsValue> {
        self.viewer
            .render_frame(&mut self.capture)
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Six vertices of `x, y, z, u, v`
    pub fn vertices(&self) -> Vec<f32> {
        self.capture.vertices.clone()
    }

    /// Column-major world-view-projection matrix
    pub fn transform(&self) -> Vec<f32> {
        self.capture.transform.clone()
    }

    pub fn clear_color(&self) -> Vec<f32> {
        self.capture.clear.to_vec()
    }

    pub fn draw_count(&self) -> u32 {
        self.capture.draw_count
    }

    pub fn tilt_x(&self) -> f32 {
        self.viewer.view().tilt_x()
    }

    pub fn tilt_y(&self) -> f32 {
        self.viewer.view().tilt_y()
    }

    pub fn zoom(&self) -> f32 {
        self.viewer.view().zoom()
    }
}

impl WebViewer {
    fn dispatch(&mut self, event: ViewerEvent) {
        match self.viewer.handle(event) {
            Response::OpenImage(path) => {
                self.pending_open = Some(path.to_string_lossy().into_owned());
            }
            Response::Quit => log::info!("viewer closed"),
            Response::Continue => {}
        }
    }
}

#[wasm_bindgen(start)]
pub fn main() -> std::result::Result<(), JsValue> {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
    }

    Ok(())
}

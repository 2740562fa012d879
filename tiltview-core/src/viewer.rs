/// The viewer context: view state plus everything the frame loop reads
use std::path::{Path, PathBuf};

use crate::backend::RenderBackend;
use crate::color::ClearColor;
use crate::decode::{DecodedImage, ImageDecoder};
use crate::error::Result;
use crate::event::{Command, Key, ViewerEvent};
use crate::geometry::{FrameGeometryBuilder, QuadVertex, QUAD_VERTEX_COUNT};
use crate::projection::{MatrixLayout, TransformPipeline, TransformUniform, Viewport};
use crate::view_state::{reduce, ScrollDirection, ViewAction, ViewState, KEY_TILT_STEP};

/// What the host has to do after an event was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Continue,
    /// Decode this file and pass the result to `Viewer::install_image`
    OpenImage(PathBuf),
    Quit,
}

/// Everything submitted to the backend for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub vertices: [QuadVertex; QUAD_VERTEX_COUNT],
    pub transform: TransformUniform,
    pub clear_color: ClearColor,
}

#[derive(Debug, Clone)]
pub struct Viewer {
    view: ViewState,
    pointer_held: bool,
    background: ClearColor,
    viewport: Viewport,
    running: bool,
}

impl Viewer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            view: ViewState::new(),
            pointer_held: false,
            background: ClearColor::default(),
            viewport,
            running: true,
        }
    }

    pub fn with_background(mut self, color: ClearColor) -> Self {
        self.set_background(color);
        self
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn background(&self) -> ClearColor {
        self.background
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_pointer_held(&self) -> bool {
        self.pointer_held
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Record the latest drawable size reported by the windowing layer
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Change the clear color. Alpha is forced to 1.0.
    pub fn set_background(&mut self, color: ClearColor) {
        self.background = ClearColor::rgb(color.r, color.g, color.b);
        log::debug!("background set to {:?}", self.background.to_rgb8());
    }

    pub fn apply(&mut self, action: ViewAction) {
        self.view = reduce(self.view, action);
    }

    /// Apply one input event and tell the host what to do next
    pub fn handle(&mut self, event: ViewerEvent) -> Response {
        match event {
            ViewerEvent::PointerDown => self.pointer_held = true,
            ViewerEvent::PointerUp => self.pointer_held = false,
            ViewerEvent::PointerMove { x, y } => {
                if self.pointer_held {
                    self.apply(ViewAction::Drag {
                        x,
                        y,
                        viewport: self.viewport,
                    });
                }
            }
            ViewerEvent::Key(key) => return self.handle_key(key),
            ViewerEvent::Scroll { delta } => {
                if let Some(direction) = ScrollDirection::from_delta(delta) {
                    self.apply(ViewAction::Zoom(direction));
                }
            }
            ViewerEvent::Command(command) => return self.handle_command(command),
        }
        Response::Continue
    }

    fn handle_key(&mut self, key: Key) -> Response {
        let action = match key {
            Key::Left => ViewAction::Nudge { dx: 0.0, dy: -KEY_TILT_STEP },
            Key::Right => ViewAction::Nudge { dx: 0.0, dy: KEY_TILT_STEP },
            Key::Up => ViewAction::Nudge { dx: -KEY_TILT_STEP, dy: 0.0 },
            Key::Down => ViewAction::Nudge { dx: KEY_TILT_STEP, dy: 0.0 },
            Key::Space => ViewAction::Reset,
            Key::Escape => return self.quit(),
        };
        self.apply(action);
        Response::Continue
    }

    fn handle_command(&mut self, command: Command) -> Response {
        match command {
            Command::OpenImage(path) => return Response::OpenImage(path),
            Command::ResetView => self.apply(ViewAction::Reset),
            Command::SetBackgroundColor(color) => self.set_background(color),
            Command::PresetColor(preset) => self.set_background(preset.color()),
            Command::Exit => return self.quit(),
        }
        Response::Continue
    }

    fn quit(&mut self) -> Response {
        self.running = false;
        Response::Quit
    }

    /// Bind a decoded image and adopt its aspect ratio.
    ///
    /// The view only changes once the backend accepted the texture. The pixel
    /// buffer is dropped on return either way.
    pub fn install_image<B>(&mut self, backend: &mut B, image: DecodedImage) -> Result<()>
    where
        B: RenderBackend + ?Sized,
    {
        backend.upload_texture(&image)?;
        self.apply(ViewAction::ImageLoaded {
            width: image.width(),
            height: image.height(),
        });
        log::info!(
            "showing {}x{} image (aspect {:.3})",
            image.width(),
            image.height(),
            self.view.image_aspect_ratio()
        );
        Ok(())
    }

    /// Decode `path` and install it. On failure nothing changes.
    pub fn load_image<D, B>(&mut self, decoder: &D, backend: &mut B, path: &Path) -> Result<()>
    where
        D: ImageDecoder + ?Sized,
        B: RenderBackend + ?Sized,
    {
        let image = decoder.decode(path).map_err(|err| {
            log::warn!("keeping current image: {}", err);
            err
        })?;
        self.install_image(backend, image)
    }

    /// Compute this frame's vertices and transform from the current state
    pub fn frame(&self, layout: MatrixLayout) -> Frame {
        Frame {
            vertices: FrameGeometryBuilder::vertices(&self.view),
            transform: TransformPipeline::uniform(self.viewport, layout),
            clear_color: self.background,
        }
    }

    /// Rebuild geometry and transform, then submit and present one frame
    pub fn render_frame<B>(&self, backend: &mut B) -> Result<()>
    where
        B: RenderBackend + ?Sized,
    {
        let frame = self.frame(backend.matrix_layout());
        backend.upload_vertices(&frame.vertices);
        backend.upload_transform(&frame.transform);
        backend.clear(frame.clear_color);
        backend.draw(QUAD_VERTEX_COUNT as u32);
        backend.present()
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PresetColor;
    use crate::view_state::TILT_LIMIT;

    fn viewer() -> Viewer {
        Viewer::new(Viewport::new(800, 600))
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut viewer = viewer();
        viewer.handle(ViewerEvent::PointerMove { x: 800.0, y: 0.0 });
        assert_eq!(*viewer.view(), ViewState::new());
    }

    #[test]
    fn test_drag_follows_pointer_until_release() {
        let mut viewer = viewer();
        viewer.handle(ViewerEvent::PointerDown);
        viewer.handle(ViewerEvent::PointerMove { x: 600.0, y: 150.0 });
        assert!((viewer.view().tilt_y() - 0.6).abs() < 1e-6);
        assert!((viewer.view().tilt_x() - 0.6).abs() < 1e-6);

        viewer.handle(ViewerEvent::PointerUp);
        viewer.handle(ViewerEvent::PointerMove { x: 0.0, y: 0.0 });
        assert!((viewer.view().tilt_y() - 0.6).abs() < 1e-6);
        assert!(!viewer.is_pointer_held());
    }

    #[test]
    fn test_arrow_keys() {
        let mut viewer = viewer();
        viewer.handle(ViewerEvent::Key(Key::Right));
        viewer.handle(ViewerEvent::Key(Key::Right));
        viewer.handle(ViewerEvent::Key(Key::Up));
        assert!((viewer.view().tilt_y() - 0.2).abs() < 1e-6);
        assert!((viewer.view().tilt_x() + 0.1).abs() < 1e-6);

        viewer.handle(ViewerEvent::Key(Key::Left));
        viewer.handle(ViewerEvent::Key(Key::Down));
        viewer.handle(ViewerEvent::Key(Key::Down));
        assert!((viewer.view().tilt_y() - 0.1).abs() < 1e-6);
        assert!((viewer.view().tilt_x() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_held_key_stops_at_limit() {
        let mut viewer = viewer();
        for _ in 0..50 {
            viewer.handle(ViewerEvent::Key(Key::Left));
        }
        assert_eq!(viewer.view().tilt_y(), -TILT_LIMIT);
    }

    #[test]
    fn test_space_and_reset_command() {
        let mut viewer = viewer();
        viewer.handle(ViewerEvent::Key(Key::Down));
        viewer.handle(ViewerEvent::Scroll { delta: 120.0 });
        viewer.handle(ViewerEvent::Key(Key::Space));
        assert_eq!(*viewer.view(), ViewState::new());

        viewer.handle(ViewerEvent::Key(Key::Up));
        viewer.handle(ViewerEvent::Scroll { delta: -120.0 });
        viewer.handle(ViewerEvent::Command(Command::ResetView));
        assert_eq!(*viewer.view(), ViewState::new());
    }

    #[test]
    fn test_zero_scroll_is_ignored() {
        let mut viewer = viewer();
        viewer.handle(ViewerEvent::Scroll { delta: 0.0 });
        assert_eq!(viewer.view().zoom(), 1.0);
    }

    #[test]
    fn test_background_commands() {
        let mut viewer = viewer();
        assert_eq!(viewer.background(), ClearColor::BLACK);

        viewer.handle(ViewerEvent::Command(Command::PresetColor(PresetColor::Blue)));
        assert_eq!(viewer.background(), ClearColor::rgb(0.0, 0.0, 1.0));

        let picked = ClearColor { r: 0.2, g: 0.4, b: 0.6, a: 0.0 };
        viewer.handle(ViewerEvent::Command(Command::SetBackgroundColor(picked)));
        assert_eq!(viewer.background(), ClearColor::rgb(0.2, 0.4, 0.6));
    }

    #[test]
    fn test_open_image_is_delegated() {
        let mut viewer = viewer();
        let path = PathBuf::from("photo.png");
        let response = viewer.handle(ViewerEvent::Command(Command::OpenImage(path.clone())));
        assert_eq!(response, Response::OpenImage(path));
        assert!(viewer.is_running());
    }

    #[test]
    fn test_quit_paths() {
        let mut viewer = viewer();
        assert_eq!(viewer.handle(ViewerEvent::Key(Key::Escape)), Response::Quit);
        assert!(!viewer.is_running());

        let mut viewer = Viewer::default();
        assert_eq!(viewer.handle(ViewerEvent::Command(Command::Exit)), Response::Quit);
        assert!(!viewer.is_running());
    }

    #[test]
    fn test_frame_uses_latest_viewport() {
        let mut viewer = viewer();
        let before = viewer.frame(MatrixLayout::ColumnMajor);
        viewer.set_viewport(Viewport::new(600, 600));
        let after = viewer.frame(MatrixLayout::ColumnMajor);
        assert_eq!(before.vertices, after.vertices);
        assert_ne!(before.transform, after.transform);
    }
}

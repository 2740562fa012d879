/// tiltview core library - view state, quad geometry and frame transforms
///
/// This library holds everything the viewer computes per frame. Windowing,
/// graphics devices and file dialogs live in the front-end crates and talk to
/// the core through `ViewerEvent`, `ImageDecoder` and `RenderBackend`.

pub mod backend;
pub mod color;
pub mod decode;
pub mod error;
pub mod event;
pub mod geometry;
pub mod projection;
pub mod view_state;
pub mod viewer;

// Re-export commonly used types
pub use backend::RenderBackend;
pub use color::{parse_color, ClearColor, PresetColor};
pub use decode::{DecodedImage, FileDecoder, ImageDecoder};
pub use error::{Result, ViewerError};
pub use event::{Command, Key, ViewerEvent};
pub use geometry::{FrameGeometry, FrameGeometryBuilder, QuadVertex};
pub use projection::{Camera, MatrixLayout, TransformPipeline, TransformUniform, Viewport};
pub use view_state::{reduce, ScrollDirection, ViewAction, ViewState};
pub use viewer::{Frame, Response, Viewer};

/// Error types shared by the viewer core and its front ends
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid image buffer: {width}x{height} with {len} bytes")]
    InvalidImage { width: u32, height: u32, len: usize },

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("resource creation failed: {0}")]
    ResourceCreation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ViewerError>;

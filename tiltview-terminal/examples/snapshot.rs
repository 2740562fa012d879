/// Example: Print one tilted frame of an image without entering raw mode
///
/// Usage: cargo run --example snapshot -- path/to/image.png [tilt-x] [tilt-y]

use std::env;
use std::io::{self, stdout, Write};
use std::path::Path;
use tiltview_core::{DecodedImage, FileDecoder, ImageDecoder, ViewAction, Viewer};
use tiltview_terminal::TerminalRenderer;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let image = match args.get(1) {
        Some(path) => FileDecoder.decode(Path::new(path))?,
        None => {
            eprintln!("Usage: {} <image> [tilt-x] [tilt-y]", args[0]);
            eprintln!("\nNo image provided, using a checkerboard...");
            DecodedImage::checkerboard(64, 48, 8, [255, 255, 255, 255], [200, 40, 40, 255])?
        }
    };
    let tilt_x: f32 = args.get(2).map(|s| s.parse()).transpose()?.unwrap_or(0.3);
    let tilt_y: f32 = args.get(3).map(|s| s.parse()).transpose()?.unwrap_or(-0.5);

    let mut renderer = TerminalRenderer::new(stdout(), 80, 24);
    let mut viewer = Viewer::new(renderer.viewport());
    viewer.install_image(&mut renderer, image)?;
    viewer.apply(ViewAction::Nudge { dx: tilt_x, dy: tilt_y });
    viewer.render_frame(&mut renderer)?;

    let mut out = io::stdout();
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

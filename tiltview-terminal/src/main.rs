/// tiltview - tilt, zoom and recolor an image in the terminal
///
/// Controls:
///   - Mouse drag / Arrow Keys: Tilt the image
///   - Mouse wheel: Zoom
///   - Space / R: Reset the view
///   - O: Open another image, C: Pick a background color, 1-6: Preset colors
///   - Q/ESC: Quit
use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use tiltview_core::{parse_color, ClearColor, DecodedImage, FileDecoder, ImageDecoder};
use tiltview_terminal::{AppSettings, TerminalApp};

#[derive(Parser)]
#[command(name = "tiltview", about = "Tilt, zoom and recolor an image in the terminal")]
#[command(version)]
struct Cli {
    /// Image to show (png, jpeg, bmp, gif); a checkerboard is shown when omitted
    image: Option<PathBuf>,

    /// Background color: #rrggbb, #rgb, a preset name or "r, g, b"
    #[arg(short, long, default_value = "black", value_parser = parse_background)]
    background: ClearColor,

    /// Target frames per second
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: u32,

    /// Write logs to this file; RUST_LOG sets the level
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_background(value: &str) -> std::result::Result<ClearColor, String> {
    parse_color(value).map_err(|err| err.to_string())
}

/// Log to a file only; stderr would draw over the alternate screen
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn default_image() -> Result<DecodedImage> {
    let light = [230, 230, 230, 255];
    let dark = [40, 90, 160, 255];
    Ok(DecodedImage::checkerboard(256, 192, 32, light, dark)?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let image = match &cli.image {
        Some(path) => {
            println!("Loading image: {}", path.display());
            FileDecoder
                .decode(path)
                .with_context(|| format!("Failed to load image {}", path.display()))?
        }
        None => default_image()?,
    };
    log::info!("starting with a {}x{} image", image.width(), image.height());

    let settings = AppSettings {
        background: cli.background,
        fps: cli.fps,
    };
    let mut app = TerminalApp::new(image, settings).context("Failed to start the terminal viewer")?;
    app.run()?;

    Ok(())
}

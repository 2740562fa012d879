/// Terminal front end for the tiltview image viewer
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{self},
};
use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};
use tiltview_core::{
    ClearColor, DecodedImage, FileDecoder, Response, Result, Viewer, ViewerEvent,
};

pub mod input;
pub mod prompt;
pub mod renderer;

use input::Input;
use prompt::{Prompt, PromptKind, PromptOutcome};
pub use renderer::TerminalRenderer;

/// How long a status message stays on screen
const MESSAGE_TIMEOUT: Duration = Duration::from_secs(4);

/// Startup options, usually taken from the command line
#[derive(Debug, Clone, Copy)]
pub struct AppSettings {
    pub background: ClearColor,
    pub fps: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            background: ClearColor::BLACK,
            fps: 30,
        }
    }
}

/// Main application struct for the terminal viewer
pub struct TerminalApp {
    viewer: Viewer,
    renderer: TerminalRenderer<Stdout>,
    decoder: FileDecoder,
    prompt: Option<Prompt>,
    message: Option<(String, Instant)>,
    target_frame_time: Duration,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(image: DecodedImage, settings: AppSettings) -> Result<Self> {
        let (columns, rows) = terminal::size()?;
        let mut renderer = TerminalRenderer::new(stdout(), columns as usize, rows as usize);
        let mut viewer = Viewer::new(renderer.viewport()).with_background(settings.background);
        viewer.install_image(&mut renderer, image)?;

        Ok(Self {
            viewer,
            renderer,
            decoder: FileDecoder,
            prompt: None,
            message: None,
            target_frame_time: Duration::from_secs(1) / settings.fps.max(1),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture
        )?;

        let result = self.main_loop();

        // Cleanup, restoring the shell even if one step fails
        let raw = terminal::disable_raw_mode();
        let screen = execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        );

        result?;
        raw?;
        screen?;
        Ok(())
    }

    fn main_loop(&mut self) -> Result<()> {
        while self.viewer.is_running() {
            let frame_start = Instant::now();

            // Drain pending input before drawing
            while event::poll(Duration::ZERO)? {
                let event = event::read()?;
                self.handle_event(&event);
                if !self.viewer.is_running() {
                    return Ok(());
                }
            }

            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.target_frame_time {
                std::thread::sleep(self.target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: &Event) {
        if let Event::Key(key) = event {
            if let Some(prompt) = self.prompt.as_mut() {
                let outcome = prompt.key(key);
                self.finish_prompt(outcome);
                return;
            }
        }

        match input::translate(event) {
            Some(Input::Viewer(event)) => self.dispatch(event),
            Some(Input::StartPrompt(PromptKind::BackgroundColor)) => {
                self.prompt = Some(Prompt::background(self.viewer.background()));
            }
            Some(Input::StartPrompt(kind)) => self.prompt = Some(Prompt::new(kind)),
            Some(Input::Resize(columns, rows)) => {
                self.renderer.resize(columns as usize, rows as usize);
                self.viewer.set_viewport(self.renderer.viewport());
                log::debug!("resized to {}x{} cells", columns, rows);
            }
            None => {}
        }
    }

    fn finish_prompt(&mut self, outcome: PromptOutcome) {
        match outcome {
            PromptOutcome::Pending => {}
            PromptOutcome::Cancelled => self.prompt = None,
            PromptOutcome::Submitted(command) => {
                self.prompt = None;
                self.dispatch(ViewerEvent::Command(command));
            }
            PromptOutcome::Invalid(reason) => {
                self.prompt = None;
                self.show_message(reason);
            }
        }
    }

    fn dispatch(&mut self, event: ViewerEvent) {
        if let Response::OpenImage(path) = self.viewer.handle(event) {
            match self
                .viewer
                .load_image(&self.decoder, &mut self.renderer, &path)
            {
                Ok(()) => self.show_message(format!("Opened {}", path.display())),
                Err(err) => self.show_message(err.to_string()),
            }
        }
    }

    fn show_message(&mut self, message: String) {
        self.message = Some((message, Instant::now()));
    }

    fn status_line(&self) -> String {
        if let Some(prompt) = &self.prompt {
            return prompt.line();
        }
        if let Some((message, shown)) = &self.message {
            if shown.elapsed() < MESSAGE_TIMEOUT {
                return message.clone();
            }
        }
        let view = self.viewer.view();
        format!(
            "tiltview | FPS: {:.1} | tilt {:+.2} {:+.2} zoom {:.2} | \
             Drag/Arrows=Tilt Wheel=Zoom Space=Reset O=Open C=Color 1-6=Presets Q=Quit",
            self.fps,
            view.tilt_x(),
            view.tilt_y(),
            view.zoom()
        )
    }

    fn render(&mut self) -> Result<()> {
        let status = self.status_line();
        self.renderer.set_overlay(status);
        self.viewer.render_frame(&mut self.renderer)
    }
}

/// Input events delivered by the windowing layer
use std::path::PathBuf;

use crate::color::{ClearColor, PresetColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    /// Resets the view
    Space,
    /// Quits the viewer
    Escape,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            "ArrowUp" => Some(Key::Up),
            "ArrowDown" => Some(Key::Down),
            " " | "Spacebar" => Some(Key::Space),
            "Escape" | "Esc" => Some(Key::Escape),
            _ => None,
        }
    }
}

/// Menu-style commands
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    OpenImage(PathBuf),
    ResetView,
    /// Result of the color picker
    SetBackgroundColor(ClearColor),
    PresetColor(PresetColor),
    Exit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    PointerDown,
    PointerUp,
    /// Absolute position in viewport pixels
    PointerMove { x: f32, y: f32 },
    Key(Key),
    /// Signed wheel delta, positive when scrolling forward
    Scroll { delta: f32 },
    Command(Command),
}

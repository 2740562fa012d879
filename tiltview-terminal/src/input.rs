/// Maps crossterm events onto viewer events
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use tiltview_core::{Command, Key, PresetColor, ViewerEvent};

use crate::prompt::PromptKind;

/// What a terminal event means to the app
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Viewer(ViewerEvent),
    StartPrompt(PromptKind),
    /// New terminal size in cells
    Resize(u16, u16),
}

/// Pixel position of the center of a cell's upper half
pub fn pointer_position(column: u16, row: u16) -> (f32, f32) {
    (column as f32 + 0.5, row as f32 * 2.0 + 0.5)
}

pub fn translate(event: &Event) -> Option<Input> {
    match event {
        Event::Key(key) => translate_key(key),
        Event::Mouse(mouse) => translate_mouse(mouse).map(Input::Viewer),
        Event::Resize(columns, rows) => Some(Input::Resize(*columns, *rows)),
        _ => None,
    }
}

fn translate_key(key: &KeyEvent) -> Option<Input> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let viewer = |event| Some(Input::Viewer(event));
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            viewer(ViewerEvent::Command(Command::Exit))
        }
        KeyCode::Left => viewer(ViewerEvent::Key(Key::Left)),
        KeyCode::Right => viewer(ViewerEvent::Key(Key::Right)),
        KeyCode::Up => viewer(ViewerEvent::Key(Key::Up)),
        KeyCode::Down => viewer(ViewerEvent::Key(Key::Down)),
        KeyCode::Char(' ') => viewer(ViewerEvent::Key(Key::Space)),
        KeyCode::Esc | KeyCode::Char('q') => viewer(ViewerEvent::Key(Key::Escape)),
        KeyCode::Char('r') => viewer(ViewerEvent::Command(Command::ResetView)),
        KeyCode::Char(digit @ '1'..='6') => {
            let index = digit as usize - '1' as usize;
            viewer(ViewerEvent::Command(Command::PresetColor(PresetColor::ALL[index])))
        }
        KeyCode::Char('o') => Some(Input::StartPrompt(PromptKind::OpenImage)),
        KeyCode::Char('c') => Some(Input::StartPrompt(PromptKind::BackgroundColor)),
        _ => None,
    }
}

fn translate_mouse(mouse: &MouseEvent) -> Option<ViewerEvent> {
    let (x, y) = pointer_position(mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(ViewerEvent::PointerDown),
        MouseEventKind::Up(MouseButton::Left) => Some(ViewerEvent::PointerUp),
        MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
            Some(ViewerEvent::PointerMove { x, y })
        }
        MouseEventKind::ScrollUp => Some(ViewerEvent::Scroll { delta: 1.0 }),
        MouseEventKind::ScrollDown => Some(ViewerEvent::Scroll { delta: -1.0 }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_arrow_and_control_keys() {
        assert_eq!(
            translate(&key(KeyCode::Left)),
            Some(Input::Viewer(ViewerEvent::Key(Key::Left)))
        );
        assert_eq!(
            translate(&key(KeyCode::Char(' '))),
            Some(Input::Viewer(ViewerEvent::Key(Key::Space)))
        );
        assert_eq!(
            translate(&key(KeyCode::Char('q'))),
            Some(Input::Viewer(ViewerEvent::Key(Key::Escape)))
        );
        assert_eq!(
            translate(&Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))),
            Some(Input::Viewer(ViewerEvent::Command(Command::Exit)))
        );
    }

    #[test]
    fn test_preset_digits() {
        assert_eq!(
            translate(&key(KeyCode::Char('1'))),
            Some(Input::Viewer(ViewerEvent::Command(Command::PresetColor(PresetColor::Black))))
        );
        assert_eq!(
            translate(&key(KeyCode::Char('6'))),
            Some(Input::Viewer(ViewerEvent::Command(Command::PresetColor(PresetColor::Red))))
        );
        assert_eq!(translate(&key(KeyCode::Char('7'))), None);
    }

    #[test]
    fn test_prompt_keys() {
        assert_eq!(
            translate(&key(KeyCode::Char('o'))),
            Some(Input::StartPrompt(PromptKind::OpenImage))
        );
        assert_eq!(
            translate(&key(KeyCode::Char('c'))),
            Some(Input::StartPrompt(PromptKind::BackgroundColor))
        );
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut release = KeyEvent::new(KeyCode::Left, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(translate(&Event::Key(release)), None);
    }

    #[test]
    fn test_mouse_events() {
        assert_eq!(
            translate(&mouse(MouseEventKind::Down(MouseButton::Left), 3, 4)),
            Some(Input::Viewer(ViewerEvent::PointerDown))
        );
        assert_eq!(
            translate(&mouse(MouseEventKind::Drag(MouseButton::Left), 10, 5)),
            Some(Input::Viewer(ViewerEvent::PointerMove { x: 10.5, y: 10.5 }))
        );
        assert_eq!(
            translate(&mouse(MouseEventKind::ScrollDown, 0, 0)),
            Some(Input::Viewer(ViewerEvent::Scroll { delta: -1.0 }))
        );
        assert_eq!(translate(&mouse(MouseEventKind::Down(MouseButton::Right), 0, 0)), None);
    }

    #[test]
    fn test_resize() {
        assert_eq!(translate(&Event::Resize(100, 40)), Some(Input::Resize(100, 40)));
    }
}

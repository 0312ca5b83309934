use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

/// User actions from terminal events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ClearAnnotation,
    /// Zero-based series position
    ToggleSeries(usize),
    NextSeries,
    /// Move the point cursor backwards (-1) or forwards (+1) in time
    StepPoint(isize),
    Click { column: u16, row: u16 },
    Resize,
    None,
}

/// Poll for terminal events and convert to actions
pub fn poll_action(timeout: Duration) -> anyhow::Result<Action> {
    if event::poll(timeout)? {
        return Ok(to_action(event::read()?));
    }
    Ok(Action::None)
}

pub fn to_action(event: Event) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => key_to_action(key),
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            ..
        }) => Action::Click { column, row },
        Event::Resize(..) => Action::Resize,
        _ => Action::None,
    }
}

fn key_to_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Char('q'), _) => Action::Quit,
        (KeyCode::Esc, _) => Action::ClearAnnotation,

        (KeyCode::Char(c @ '1'..='9'), _) => Action::ToggleSeries(c as usize - '1' as usize),

        (KeyCode::Tab, _) => Action::NextSeries,
        (KeyCode::Left, _) => Action::StepPoint(-1),
        (KeyCode::Right, _) => Action::StepPoint(1),

        _ => Action::None,
    }
}

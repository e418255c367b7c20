//! Input resolution: terminal events to `Action` tags.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Position;

use super::state::{AppState, Page};

/// Everything the controller can be asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Open the details popup for the focused card or hero.
    Info,
    /// Add or remove the focused card from favorites.
    ToggleFavorite,
    /// Go to the search page, or focus its input when already there.
    OpenSearch,
    /// Playback control.
    Play,
    /// Close the details popup.
    CloseModal,
    /// Move focus between the popup buttons.
    ModalSwitchButton,
    /// Press the focused popup button.
    ModalActivate,
    /// Dismiss the blocking acknowledgement.
    DismissAlert,
    /// Full reload into another page.
    Navigate(Page),
    /// Open the focused poster (or hero backdrop) in the browser.
    OpenPoster,
    /// Cursor to the previous element.
    MoveUp,
    /// Cursor to the next element.
    MoveDown,
    /// Cursor to the next section.
    NextSection,
    /// Cursor to the previous section.
    PrevSection,
    /// Type into the search box.
    Input(char),
    /// Delete from the search box.
    Backspace,
    /// Leave the search box.
    EndEditing,
    /// Exit.
    Quit,
}

/// Resolves a terminal event against the current state.
#[must_use]
pub fn resolve_event(state: &AppState, event: &Event) -> Option<Action> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => resolve_key(state, *key),
        Event::Mouse(mouse) => resolve_mouse(state, *mouse),
        _ => None,
    }
}

/// Resolves a key press.
#[must_use]
pub fn resolve_key(state: &AppState, key: KeyEvent) -> Option<Action> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }

    if state.alert.is_some() {
        return (key.code == KeyCode::Enter).then_some(Action::DismissAlert);
    }

    if state.modal.is_some() {
        return match key.code {
            KeyCode::Char('x') => Some(Action::CloseModal),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                Some(Action::ModalSwitchButton)
            }
            KeyCode::Enter => Some(Action::ModalActivate),
            KeyCode::Char('p') => Some(Action::Play),
            _ => None,
        };
    }

    if state.search.as_ref().is_some_and(|s| s.editing) {
        return match key.code {
            KeyCode::Char(c) => Some(Action::Input(c)),
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Down | KeyCode::Tab => {
                Some(Action::EndEditing)
            }
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => Some(Action::NextSection),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => Some(Action::PrevSection),
        KeyCode::Enter | KeyCode::Char('i') => Some(Action::Info),
        KeyCode::Char('f' | ' ') => Some(Action::ToggleFavorite),
        KeyCode::Char('p') => Some(Action::Play),
        KeyCode::Char('o') => Some(Action::OpenPoster),
        KeyCode::Char('/') => Some(Action::OpenSearch),
        KeyCode::Char('1') => Some(Action::Navigate(Page::Home)),
        KeyCode::Char('2') => Some(Action::Navigate(Page::Search)),
        KeyCode::Char('3') => Some(Action::Navigate(Page::Favorites)),
        _ => None,
    }
}

/// Resolves a mouse event. A click outside the popup is a backdrop click;
/// clicks on the popup buttons press them.
#[must_use]
pub fn resolve_mouse(state: &AppState, mouse: MouseEvent) -> Option<Action> {
    if state.alert.is_some() {
        return None;
    }
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let hits = state.modal_hits?;
            state.modal.as_ref()?;
            let position = Position::new(mouse.column, mouse.row);
            if hits.close.contains(position) || !hits.popup.contains(position) {
                Some(Action::CloseModal)
            } else if hits.play.contains(position) {
                Some(Action::Play)
            } else {
                None
            }
        }
        MouseEventKind::ScrollUp if !state.is_blocked() => Some(Action::MoveUp),
        MouseEventKind::ScrollDown if !state.is_blocked() => Some(Action::MoveDown),
        _ => None,
    }
}

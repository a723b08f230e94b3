//! PlaylistBar component: the configured playlists as a horizontal selector.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{layout::Rect, Frame};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    widgets::{
        option_row::{draw_options, hit_test, OptionHit},
        pane_chrome::pane_chrome,
    },
};

#[derive(Default)]
pub struct PlaylistBar {
    hits: Vec<OptionHit>,
}

impl PlaylistBar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for PlaylistBar {
    fn id(&self) -> ComponentId {
        ComponentId::PlaylistBar
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => vec![Action::PrevPlaylist],
            KeyCode::Right | KeyCode::Char('l') => vec![Action::NextPlaylist],
            // Re-selecting the current playlist reloads it.
            KeyCode::Enter => vec![Action::Reload],
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => hit_test(&self.hits, event.column)
                .map(|idx| vec![Action::SelectPlaylist(idx)])
                .unwrap_or_default(),
            MouseEventKind::ScrollUp => vec![Action::PrevPlaylist],
            MouseEventKind::ScrollDown => vec![Action::NextPlaylist],
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let block = pane_chrome("playlist", Some('p'), focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let labels: Vec<&str> = state
            .session
            .playlists()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        self.hits = draw_options(
            frame,
            inner,
            &labels,
            state.session.playlist_index(),
            focused,
        );
    }
}

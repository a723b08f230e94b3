//! SearchBar component: the channel-name search field.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{layout::Rect, Frame};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    widgets::{
        filter_input::{FilterAction, FilterInput},
        pane_chrome::pane_chrome,
    },
};

#[derive(Default)]
pub struct SearchBar {
    input: FilterInput,
}

impl SearchBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a restored search term without reporting a change.
    pub fn set_value(&mut self, value: &str) {
        self.input.set_value(value);
    }

    pub fn is_active(&self) -> bool {
        self.input.is_active()
    }
}

impl Component for SearchBar {
    fn id(&self) -> ComponentId {
        ComponentId::SearchBar
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if !self.input.is_active() {
            return match key.code {
                KeyCode::Enter | KeyCode::Char('/') | KeyCode::Char('i') => {
                    vec![Action::OpenSearch]
                }
                _ => vec![],
            };
        }
        match self.input.handle_key(key) {
            FilterAction::Changed(term) => vec![Action::SearchChanged(term)],
            FilterAction::Confirmed => vec![
                Action::CloseSearch,
                Action::FocusPane(ComponentId::ChannelGrid),
            ],
            FilterAction::Cancelled => vec![Action::CloseSearch],
            FilterAction::None => vec![],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => vec![Action::OpenSearch],
            _ => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::OpenSearch => self.input.activate(),
            Action::CloseSearch => self.input.deactivate(),
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, _state: &AppState) {
        let block = pane_chrome("search", Some('/'), focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.input.draw(frame, inner);
    }
}

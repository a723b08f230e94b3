//! CategoryBar component: "All" plus the loaded playlist's categories.

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

pub const ALL_LABEL: &str = "All";

/// Option labels in display order; index 0 is "all categories".
pub fn category_options(state: &AppState) -> Vec<&str> {
    std::iter::once(ALL_LABEL)
        .chain(state.session.categories())
        .collect()
}

/// Position of the active category within `category_options`.
pub fn selected_option(state: &AppState) -> usize {
    let current = state.session.filter().category.as_str();
    if current.is_empty() {
        return 0;
    }
    state
        .session
        .categories()
        .iter()
        .position(|c| *c == current)
        .map_or(0, |i| i + 1)
}

/// Category value for option `option` (`""` for "All").
pub fn option_value(state: &AppState, option: usize) -> Option<String> {
    if option == 0 {
        return Some(String::new());
    }
    state
        .session
        .categories()
        .get(option - 1)
        .map(|c| c.to_string())
}

#[derive(Default)]
pub struct CategoryBar {
    hits: Vec<OptionHit>,
}

impl CategoryBar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for CategoryBar {
    fn id(&self) -> ComponentId {
        ComponentId::CategoryBar
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => vec![Action::PrevCategory],
            KeyCode::Right | KeyCode::Char('l') => vec![Action::NextCategory],
            KeyCode::Home | KeyCode::Char('g') => vec![Action::SelectCategory(String::new())],
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => hit_test(&self.hits, event.column)
                .and_then(|option| option_value(state, option))
                .map(|value| vec![Action::SelectCategory(value)])
                .unwrap_or_default(),
            MouseEventKind::ScrollUp => vec![Action::PrevCategory],
            MouseEventKind::ScrollDown => vec![Action::NextCategory],
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let block = pane_chrome("category", Some('c'), focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let labels = category_options(state);
        self.hits = draw_options(frame, inner, &labels, Some(selected_option(state)), focused);
    }
}

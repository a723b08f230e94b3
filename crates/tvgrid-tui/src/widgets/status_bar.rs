//! Status bar: bottom line with input mode, load summary and keybindings.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_MODE_NORMAL, C_MODE_PLAYER, C_MODE_SEARCH, C_MUTED, C_SECONDARY};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    /// Keys go to the search field.
    Search,
    /// The player overlay is up; the grid ignores navigation.
    Player,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "GRID",
            Self::Search => "SEARCH",
            Self::Player => "PLAYER",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Search => C_MODE_SEARCH,
            Self::Player => C_MODE_PLAYER,
        }
    }

    fn keys(self) -> &'static str {
        match self {
            Self::Normal => {
                " ←↓↑→/hjkl move  Enter open  p/P playlist  c/C category  0 all  / search  y copy url  r reload  Tab panes  ? help  q quit"
            }
            Self::Search => " type to search  Enter keep  Esc clear+close  Tab next pane",
            Self::Player => " Esc/q close  y copy url  click outside to close",
        }
    }
}

/// Draw the footer: `[MODE] summary  keys`.
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, summary: &str) {
    let mut spans = vec![Span::styled(
        format!(" {} ", mode.label()),
        Style::default().fg(mode.color()).add_modifier(Modifier::BOLD),
    )];
    if !summary.is_empty() {
        spans.push(Span::styled(
            format!(" {} ", summary),
            Style::default().fg(C_SECONDARY),
        ));
    }
    spans.push(Span::styled(mode.keys(), Style::default().fg(C_MUTED)));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

//! PlayerOverlay component: modal over the grid while a channel is open.
//!
//! Video renders in the external player window; this popup names the channel
//! and offers the close affordance. Clicks on the dimmed backdrop close it.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::help_overlay::centered_rect,
    theme::{
        C_BACKDROP, C_ERROR, C_LOGO, C_MUTED, C_OVERLAY_BG, C_PANEL_BORDER_FOCUSED, C_PLAYING,
        C_PRIMARY, C_SECONDARY, C_TAG,
    },
};

const POPUP_HEIGHT: u16 = 11;

#[derive(Default)]
pub struct PlayerOverlay {
    /// Where the popup was last drawn; everything else is backdrop.
    popup: Rect,
}

impl PlayerOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    fn inside(&self, column: u16, row: u16) -> bool {
        self.popup.contains(Position::new(column, row))
    }
}

impl Component for PlayerOverlay {
    fn id(&self) -> ComponentId {
        ComponentId::PlayerOverlay
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('x') => vec![Action::ClosePlayer],
            KeyCode::Char('y') => state
                .session
                .player()
                .current()
                .map(|c| vec![Action::CopyToClipboard(c.url.clone())])
                .unwrap_or_default(),
            // Everything else is swallowed so the grid underneath stays put.
            _ => vec![Action::Noop],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => vec![Action::OverlayClick {
                inside: self.inside(event.column, event.row),
            }],
            _ => vec![Action::Noop],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        let player = state.session.player();
        let Some(channel) = player.current() else {
            self.popup = Rect::default();
            return;
        };

        frame.render_widget(Block::default().style(Style::default().bg(C_BACKDROP)), area);

        let popup = centered_rect(60, POPUP_HEIGHT, area);
        self.popup = popup;

        let status = match player.last_error() {
            Some(err) => Line::from(Span::styled(
                format!(" ✗ {}", err),
                Style::default().fg(C_ERROR),
            )),
            None => Line::from(Span::styled(
                " ▶ playing in the video window",
                Style::default().fg(C_PLAYING),
            )),
        };

        let lines = vec![
            Line::from(Span::styled(
                format!(" {}", channel.name),
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(" {}", channel.group_label()),
                Style::default().fg(C_TAG),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(" url   ", Style::default().fg(C_MUTED)),
                Span::styled(channel.url.as_str(), Style::default().fg(C_SECONDARY)),
            ]),
            Line::from(vec![
                Span::styled(" logo  ", Style::default().fg(C_MUTED)),
                Span::styled(
                    channel.logo_or(&state.default_logo),
                    Style::default().fg(C_LOGO),
                ),
            ]),
            Line::from(""),
            status,
            Line::from(""),
            Line::from(Span::styled(
                " esc close · y copy url · click outside to close",
                Style::default().fg(C_MUTED),
            )),
        ];

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(C_PANEL_BORDER_FOCUSED))
                        .title(Span::styled(
                            " now playing ",
                            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
                        ))
                        .style(Style::default().bg(C_OVERLAY_BG)),
                )
                .wrap(Wrap { trim: false }),
            popup,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inside_uses_last_popup_rect() {
        let mut overlay = PlayerOverlay::new();
        overlay.popup = Rect::new(10, 5, 20, 11);
        assert!(overlay.inside(10, 5));
        assert!(overlay.inside(29, 15));
        assert!(!overlay.inside(30, 15));
        assert!(!overlay.inside(9, 5));
    }
}

//! ChannelGrid component: the card grid of filtered channels.
//!
//! Each card is a bordered box of three lines:
//!
//! ```text
//!   ┌────────────────────┐
//!   │▣ logo.png          │
//!   │Channel name        │
//!   │Group               │
//!   └────────────────────┘
//! ```

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use tvgrid_core::filter::ChannelView;
use tvgrid_core::playlist::Channel;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        C_ERROR, C_LOADING, C_LOGO, C_MUTED, C_PANEL_BORDER, C_PANEL_BORDER_FOCUSED, C_PLAYING,
        C_PRIMARY, C_SECONDARY, C_SELECTION_BG, C_TAG,
    },
    widgets::pane_chrome::{pane_chrome, Badge},
};

/// Narrowest card when the column count is picked from the width.
pub const CARD_MIN_WIDTH: u16 = 24;
pub const CARD_HEIGHT: u16 = 5;

/// Card placement for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub inner: Rect,
    pub columns: usize,
    pub visible_rows: usize,
    pub card_width: u16,
}

impl GridLayout {
    /// `fixed_columns == 0` fits as many `CARD_MIN_WIDTH` cards as possible.
    pub fn new(inner: Rect, fixed_columns: u16) -> Self {
        let columns = if fixed_columns > 0 {
            fixed_columns
        } else {
            inner.width / CARD_MIN_WIDTH
        }
        .max(1);
        Self {
            inner,
            columns: columns as usize,
            visible_rows: (inner.height / CARD_HEIGHT).max(1) as usize,
            card_width: (inner.width / columns).max(1),
        }
    }

    pub fn row_of(&self, pos: usize) -> usize {
        pos / self.columns
    }

    pub fn rows_for(&self, len: usize) -> usize {
        len.div_ceil(self.columns)
    }

    /// Largest useful scroll offset for `len` cards.
    pub fn max_scroll(&self, len: usize) -> usize {
        self.rows_for(len).saturating_sub(self.visible_rows)
    }

    /// Screen rect of the card at `pos`, if it is on screen.
    pub fn card_rect(&self, pos: usize, scroll_row: usize) -> Option<Rect> {
        let row = self.row_of(pos).checked_sub(scroll_row)?;
        if row >= self.visible_rows {
            return None;
        }
        let col = (pos % self.columns) as u16;
        let y = self.inner.y + row as u16 * CARD_HEIGHT;
        let height = CARD_HEIGHT.min((self.inner.y + self.inner.height).saturating_sub(y));
        if height == 0 {
            return None;
        }
        Some(Rect {
            x: self.inner.x + col * self.card_width,
            y,
            width: self.card_width,
            height,
        })
    }

    /// Grid position under a screen cell. May exceed the card count. The
    /// strip below the last whole card row maps to nothing.
    pub fn hit(&self, column: u16, row: u16, scroll_row: usize) -> Option<usize> {
        let inner = self.inner;
        if column < inner.x
            || row < inner.y
            || column >= inner.x + inner.width
            || row >= inner.y + inner.height
        {
            return None;
        }
        let col = ((column - inner.x) / self.card_width) as usize;
        if col >= self.columns {
            return None;
        }
        let screen_row = ((row - inner.y) / CARD_HEIGHT) as usize;
        if screen_row >= self.visible_rows {
            return None;
        }
        Some((screen_row + scroll_row) * self.columns + col)
    }
}

/// Cut `text` to `max` terminal cells, ending in `…` when shortened.
pub fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Last path segment of a logo URL, for display.
fn logo_label(url: &str) -> &str {
    let trimmed = url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

pub struct ChannelGrid {
    /// Position within the visible channels, not a store index.
    selected: usize,
    scroll_row: usize,
    layout: Option<GridLayout>,
}

impl ChannelGrid {
    pub fn new() -> Self {
        Self {
            selected: 0,
            scroll_row: 0,
            layout: None,
        }
    }

    fn reset(&mut self) {
        self.selected = 0;
        self.scroll_row = 0;
    }

    fn columns(&self) -> usize {
        self.layout.map_or(1, |l| l.columns)
    }

    fn page(&self) -> usize {
        self.layout.map_or(1, |l| l.visible_rows * l.columns)
    }

    /// Move the selection by `delta` cards, clamped to the visible range.
    fn move_by(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let target = self.selected as isize + delta;
        self.selected = target.clamp(0, len as isize - 1) as usize;
        self.ensure_visible();
    }

    fn ensure_visible(&mut self) {
        let Some(layout) = self.layout else { return };
        let row = layout.row_of(self.selected);
        if row < self.scroll_row {
            self.scroll_row = row;
        } else if row >= self.scroll_row + layout.visible_rows {
            self.scroll_row = row + 1 - layout.visible_rows;
        }
    }

    /// Scroll the viewport by whole rows, dragging the selection along.
    fn scroll_by(&mut self, rows: isize, len: usize) {
        let Some(layout) = self.layout else { return };
        let max = layout.max_scroll(len) as isize;
        self.scroll_row = (self.scroll_row as isize + rows).clamp(0, max) as usize;
        let first = self.scroll_row * layout.columns;
        let last = ((self.scroll_row + layout.visible_rows) * layout.columns).min(len);
        if len > 0 && (self.selected < first || self.selected >= last) {
            self.selected = self.selected.clamp(first, last.saturating_sub(1));
        }
    }

    fn selected_channel<'a>(&self, state: &'a AppState) -> Option<(usize, &'a Channel)> {
        let view = state.view();
        let idx = *view.indices().get(self.selected)?;
        state.channel(idx).map(|c| (idx, c))
    }

    fn draw_message(frame: &mut Frame, inner: Rect, lines: Vec<Line>) {
        let y = inner.y + inner.height.saturating_sub(lines.len() as u16) / 2;
        let area = Rect {
            y,
            height: inner.height.saturating_sub(y - inner.y),
            ..inner
        };
        frame.render_widget(
            Paragraph::new(lines).alignment(ratatui::layout::Alignment::Center),
            area,
        );
    }

    fn draw_card(
        frame: &mut Frame,
        area: Rect,
        channel: &Channel,
        selected: bool,
        playing: bool,
        default_logo: &str,
    ) {
        let border = if playing {
            C_PLAYING
        } else if selected {
            C_PANEL_BORDER_FOCUSED
        } else {
            C_PANEL_BORDER
        };
        let bg = if selected {
            Style::default().bg(C_SELECTION_BG)
        } else {
            Style::default()
        };
        let width = area.width.saturating_sub(2) as usize;

        let glyph = if channel.logo.is_empty() { "▢ " } else { "▣ " };
        let logo = logo_label(channel.logo_or(default_logo));
        let mut name_style = Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD);
        if playing {
            name_style = name_style.fg(C_PLAYING);
        }
        let name = if playing {
            format!("▶ {}", channel.name)
        } else {
            channel.name.clone()
        };

        let lines = vec![
            Line::from(vec![
                Span::styled(glyph, Style::default().fg(C_LOGO)),
                Span::styled(
                    truncate_to_width(logo, width.saturating_sub(2)),
                    Style::default().fg(C_MUTED),
                ),
            ]),
            Line::from(Span::styled(truncate_to_width(&name, width), name_style)),
            Line::from(Span::styled(
                truncate_to_width(channel.group_label(), width),
                Style::default().fg(C_TAG),
            )),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(bg);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

impl Default for ChannelGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for ChannelGrid {
    fn id(&self) -> ComponentId {
        ComponentId::ChannelGrid
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let len = state.view().indices().len();
        let columns = self.columns() as isize;
        let page = self.page() as isize;
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.move_by(-1, len),
            KeyCode::Right | KeyCode::Char('l') => self.move_by(1, len),
            KeyCode::Up | KeyCode::Char('k') => self.move_by(-columns, len),
            KeyCode::Down | KeyCode::Char('j') => self.move_by(columns, len),
            KeyCode::PageUp => self.move_by(-page, len),
            KeyCode::PageDown => self.move_by(page, len),
            KeyCode::Home | KeyCode::Char('g') => self.move_by(-(len as isize), len),
            KeyCode::End | KeyCode::Char('G') => self.move_by(len as isize, len),
            KeyCode::Enter => {
                if let Some((idx, _)) = self.selected_channel(state) {
                    return vec![Action::OpenChannel(idx)];
                }
            }
            KeyCode::Char('y') => {
                if let Some((_, channel)) = self.selected_channel(state) {
                    return vec![Action::CopyToClipboard(channel.url.clone())];
                }
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        let len = state.view().indices().len();
        match event.kind {
            MouseEventKind::ScrollUp => self.scroll_by(-1, len),
            MouseEventKind::ScrollDown => self.scroll_by(1, len),
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(layout) = self.layout else {
                    return vec![];
                };
                if let Some(pos) = layout.hit(event.column, event.row, self.scroll_row) {
                    if pos < len {
                        self.selected = pos;
                        if let Some((idx, _)) = self.selected_channel(state) {
                            return vec![Action::OpenChannel(idx)];
                        }
                    }
                }
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::SearchChanged(_)
            | Action::SelectCategory(_)
            | Action::SelectPlaylist(_)
            | Action::Reload => self.reset(),
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let view = state.view();
        let count = format!("{}", view.indices().len());
        let badge = match &view {
            ChannelView::Loading => Some(Badge {
                text: "LOADING",
                color: C_LOADING,
            }),
            ChannelView::Failed(_) => Some(Badge {
                text: "ERR",
                color: C_ERROR,
            }),
            ChannelView::Channels(_) => Some(Badge {
                text: &count,
                color: C_SECONDARY,
            }),
            _ => None,
        };
        let block = pane_chrome("channels", None, focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = GridLayout::new(inner, state.grid_columns);
        self.layout = Some(layout);

        let indices = match &view {
            ChannelView::Idle => {
                Self::draw_message(
                    frame,
                    inner,
                    vec![Line::styled("No playlist selected.", Style::default().fg(C_MUTED))],
                );
                return;
            }
            ChannelView::Loading => {
                Self::draw_message(
                    frame,
                    inner,
                    vec![Line::styled("Loading channels…", Style::default().fg(C_LOADING))],
                );
                return;
            }
            ChannelView::Failed(reason) => {
                Self::draw_message(
                    frame,
                    inner,
                    vec![
                        Line::styled("Failed to load playlist.", Style::default().fg(C_ERROR)),
                        Line::styled(reason.as_str(), Style::default().fg(C_MUTED)),
                        Line::styled(
                            "select a playlist (p) or reload (r) to retry",
                            Style::default().fg(C_SECONDARY),
                        ),
                    ],
                );
                return;
            }
            ChannelView::Empty => {
                Self::draw_message(
                    frame,
                    inner,
                    vec![Line::styled("No channels found.", Style::default().fg(C_MUTED))],
                );
                return;
            }
            ChannelView::Channels(indices) => indices,
        };

        // The view may have shrunk since the last frame.
        if self.selected >= indices.len() {
            self.selected = indices.len().saturating_sub(1);
        }
        self.scroll_row = self.scroll_row.min(layout.max_scroll(indices.len()));
        self.ensure_visible();

        let playing_url = state.session.player().current().map(|c| c.url.as_str());
        let first = self.scroll_row * layout.columns;
        let last = (first + layout.visible_rows * layout.columns).min(indices.len());
        for pos in first..last {
            let Some(rect) = layout.card_rect(pos, self.scroll_row) else {
                continue;
            };
            let Some(channel) = state.channel(indices[pos]) else {
                continue;
            };
            Self::draw_card(
                frame,
                rect,
                channel,
                focused && pos == self.selected,
                playing_url == Some(channel.url.as_str()),
                &state.default_logo,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(width: u16, height: u16, fixed: u16) -> GridLayout {
        GridLayout::new(Rect::new(1, 1, width, height), fixed)
    }

    #[test]
    fn test_columns_fit_width() {
        assert_eq!(layout(100, 20, 0).columns, 4);
        assert_eq!(layout(10, 20, 0).columns, 1);
        assert_eq!(layout(100, 20, 3).columns, 3);
        assert_eq!(layout(100, 20, 3).card_width, 33);
    }

    #[test]
    fn test_card_rect_respects_scroll() {
        let grid = layout(96, 10, 0);
        assert_eq!(grid.visible_rows, 2);
        assert_eq!(grid.card_rect(0, 0), Some(Rect::new(1, 1, 24, 5)));
        assert_eq!(grid.card_rect(5, 0), Some(Rect::new(25, 6, 24, 5)));
        assert_eq!(grid.card_rect(8, 0), None);
        assert_eq!(grid.card_rect(0, 1), None);
        assert_eq!(grid.card_rect(8, 1), Some(Rect::new(1, 6, 24, 5)));
    }

    #[test]
    fn test_hit_maps_cells_to_positions() {
        let grid = layout(96, 10, 0);
        assert_eq!(grid.hit(1, 1, 0), Some(0));
        assert_eq!(grid.hit(30, 7, 0), Some(5));
        assert_eq!(grid.hit(30, 7, 2), Some(13));
        assert_eq!(grid.hit(0, 1, 0), None);
        assert_eq!(grid.hit(1, 11, 0), None);
    }

    #[test]
    fn test_hit_ignores_strip_below_last_row() {
        // 12 rows tall: two whole card rows plus a 2-row leftover strip.
        let grid = layout(96, 12, 0);
        assert_eq!(grid.visible_rows, 2);
        assert_eq!(grid.card_rect(8, 0), None);
        assert_eq!(grid.hit(1, 10, 0), Some(4));
        assert_eq!(grid.hit(1, 11, 0), None);
        assert_eq!(grid.hit(1, 12, 3), None);
        for row in 1..13 {
            if let Some(pos) = grid.hit(1, row, 0) {
                assert!(grid.card_rect(pos, 0).is_some());
            }
        }
    }

    #[test]
    fn test_max_scroll() {
        let grid = layout(96, 10, 0);
        assert_eq!(grid.rows_for(9), 3);
        assert_eq!(grid.max_scroll(9), 1);
        assert_eq!(grid.max_scroll(3), 0);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("Channel A", 20), "Channel A");
        assert_eq!(truncate_to_width("Channel A", 5), "Chan…");
        assert_eq!(truncate_to_width("日本テレビ", 5), "日本…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn test_logo_label() {
        assert_eq!(logo_label("http://x/a.png"), "a.png");
        assert_eq!(logo_label("https://cdn.example.com/"), "cdn.example.com");
        assert_eq!(logo_label(""), "");
    }

    #[test]
    fn test_move_by_clamps() {
        let mut grid = ChannelGrid::new();
        grid.layout = Some(layout(96, 10, 0));
        grid.move_by(5, 7);
        assert_eq!(grid.selected, 5);
        grid.move_by(4, 7);
        assert_eq!(grid.selected, 6);
        grid.move_by(-100, 7);
        assert_eq!(grid.selected, 0);
        grid.move_by(1, 0);
        assert_eq!(grid.selected, 0);
    }

    #[test]
    fn test_scroll_drags_selection() {
        let mut grid = ChannelGrid::new();
        grid.layout = Some(layout(96, 10, 0));
        grid.scroll_by(1, 16);
        assert_eq!(grid.scroll_row, 1);
        assert_eq!(grid.selected, 4);
        grid.scroll_by(5, 16);
        assert_eq!(grid.scroll_row, 2);
        assert_eq!(grid.selected, 8);
    }
}

//! App: component-based event loop.
//!
//! - `App` owns the components and the `AppState` (which owns the `Session`).
//! - A `tokio::mpsc` channel carries `AppMessage`s in from background tasks:
//!   terminal events from a blocking reader and playlist fetch completions.
//! - The loop draws a frame, then awaits the next message or tick.
//! - Components return `Vec<Action>`; `dispatch` applies them to the session.

use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::Style,
    widgets::Block,
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use tvgrid_core::config::UiConfig;
use tvgrid_core::fetch::PlaylistFetcher;
use tvgrid_core::playlist::Playlist;
use tvgrid_core::session::{LoadOutcome, Session};
use tvgrid_core::store::LoadTicket;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::{
        category_bar::{self, CategoryBar},
        channel_grid::ChannelGrid,
        help_overlay::HelpOverlay,
        player_overlay::PlayerOverlay,
        playlist_bar::PlaylistBar,
        search_bar::SearchBar,
    },
    focus::FocusRing,
    theme::C_BG,
    widgets::{
        status_bar::{self, InputMode},
        toast::{Severity, ToastManager},
    },
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    /// A playlist fetch finished; the ticket says which selection it was for.
    PlaylistLoaded(LoadTicket, Result<Playlist, String>),
}

/// Last-drawn rect of each pane, for mouse hit-testing.
#[derive(Default, Clone, Copy)]
struct PaneAreas {
    playlist_bar: Rect,
    search_bar: Rect,
    category_bar: Rect,
    channel_grid: Rect,
}

fn hit(r: Rect, col: u16, row: u16) -> bool {
    r.contains(Position::new(col, row))
}

pub struct App {
    state: AppState,
    fetcher: PlaylistFetcher,
    focus: FocusRing,
    playlist_bar: PlaylistBar,
    search_bar: SearchBar,
    category_bar: CategoryBar,
    channel_grid: ChannelGrid,
    player_overlay: PlayerOverlay,
    help_overlay: HelpOverlay,
    toast: ToastManager,
    pane_areas: PaneAreas,
    tx: Option<mpsc::Sender<AppMessage>>,
    should_quit: bool,
}

impl App {
    pub fn new(session: Session, fetcher: PlaylistFetcher, ui: &UiConfig) -> Self {
        let mut focus = FocusRing::new(vec![
            ComponentId::PlaylistBar,
            ComponentId::SearchBar,
            ComponentId::CategoryBar,
            ComponentId::ChannelGrid,
        ]);
        focus.set(ComponentId::ChannelGrid);

        Self {
            state: AppState::new(session, ui.default_logo.clone(), ui.grid_columns),
            fetcher,
            focus,
            playlist_bar: PlaylistBar::new(),
            search_bar: SearchBar::new(),
            category_bar: CategoryBar::new(),
            channel_grid: ChannelGrid::new(),
            player_overlay: PlayerOverlay::new(),
            help_overlay: HelpOverlay::new(),
            toast: ToastManager::new(),
            pane_areas: PaneAreas::default(),
            tx: None,
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let result = self.event_loop(&mut terminal).await;

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        info!("tvgrid exiting");

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);
        self.tx = Some(tx.clone());

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("terminal event read failed: {}", e);
                    break;
                }
            }
        });

        // ── Restore the saved selection and start the first load ─────────────
        let ticket = self.state.session.start();
        self.search_bar
            .set_value(&self.state.session.filter().search);
        self.begin_fetch(ticket);

        // Toast expiry + spinner animation.
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    self.handle_message(msg);
                    // Drain whatever queued up behind it before redrawing.
                    while let Ok(next) = rx.try_recv() {
                        self.handle_message(next);
                    }
                    needs_redraw = true;
                }

                _ = ui_tick.tick() => {
                    if !self.toast.is_empty() {
                        self.toast.tick();
                        needs_redraw = true;
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                let actions = self.handle_key(key);
                for action in actions {
                    self.dispatch(action);
                }
            }
            AppMessage::Event(Event::Mouse(mouse)) => {
                let actions = self.handle_mouse(mouse);
                for action in actions {
                    self.dispatch(action);
                }
            }
            AppMessage::Event(_) => {}
            AppMessage::PlaylistLoaded(ticket, result) => self.on_playlist_loaded(ticket, result),
        }
    }

    // ── Playlist loading ──────────────────────────────────────────────────────

    fn begin_fetch(&mut self, ticket: LoadTicket) {
        self.toast
            .spinner(format!("loading {}", self.state.playlist_name()));
        let Some(tx) = self.tx.clone() else {
            return;
        };
        let fetcher = self.fetcher.clone();
        tokio::spawn(async move {
            let result = fetcher.fetch(&ticket.url).await.map_err(|e| {
                warn!("[fetch] {} failed: {}", ticket.url, e);
                e.to_string()
            });
            let _ = tx.send(AppMessage::PlaylistLoaded(ticket, result)).await;
        });
    }

    fn on_playlist_loaded(&mut self, ticket: LoadTicket, result: Result<Playlist, String>) {
        match self.state.session.complete_load(&ticket, result) {
            LoadOutcome::Stale => {
                debug!("[fetch] dropped stale result for {}", ticket.url);
            }
            LoadOutcome::Failed(reason) => {
                error!("[fetch] failed to load {}: {}", ticket.url, reason);
                self.toast
                    .resolve_spinner(Severity::Error, format!("failed to load playlist: {}", reason));
            }
            LoadOutcome::Loaded { channels, restored } => {
                self.toast.resolve_spinner(
                    Severity::Success,
                    format!("{}: {} channels", self.state.playlist_name(), channels),
                );
                if channels == 0 {
                    self.toast.warning("playlist has no channels");
                }
                if let Some(name) = restored {
                    self.toast.info(format!("resumed {}", name));
                    self.report_player_error();
                }
            }
        }
        self.sync_input_mode();
    }

    fn report_player_error(&mut self) {
        if let Some(err) = self.state.session.player().last_error() {
            self.toast.error(err.to_string());
        }
    }

    fn sync_input_mode(&mut self) {
        self.state.input_mode = if self.state.session.player().is_open() {
            InputMode::Player
        } else if self.search_bar.is_active() {
            InputMode::Search
        } else {
            InputMode::Normal
        };
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Action::Quit];
        }

        // Overlays capture all keys while visible.
        if self.help_overlay.visible {
            return self.help_overlay.handle_key(key, &self.state);
        }
        if self.state.session.player().is_open() {
            return self.player_overlay.handle_key(key, &self.state);
        }

        let searching = self.search_bar.is_active();
        match key.code {
            KeyCode::Tab if searching => return vec![Action::CloseSearch, Action::FocusNext],
            KeyCode::BackTab if searching => return vec![Action::CloseSearch, Action::FocusPrev],
            KeyCode::Tab => return vec![Action::FocusNext],
            KeyCode::BackTab => return vec![Action::FocusPrev],
            _ => {}
        }
        if searching {
            return self.search_bar.handle_key(key, &self.state);
        }

        // Global keys (grid mode)
        match key.code {
            KeyCode::Char('q') => return vec![Action::Quit],
            KeyCode::Char('?') => return vec![Action::ToggleHelp],
            KeyCode::Char('/') => {
                return vec![Action::FocusPane(ComponentId::SearchBar), Action::OpenSearch]
            }
            KeyCode::Char('p') => return vec![Action::NextPlaylist],
            KeyCode::Char('P') => return vec![Action::PrevPlaylist],
            KeyCode::Char('c') => return vec![Action::NextCategory],
            KeyCode::Char('C') => return vec![Action::PrevCategory],
            KeyCode::Char('0') => return vec![Action::SelectCategory(String::new())],
            KeyCode::Char('r') => return vec![Action::Reload],
            _ => {}
        }

        let s = &self.state;
        match self.focus.current() {
            Some(ComponentId::PlaylistBar) => self.playlist_bar.handle_key(key, s),
            Some(ComponentId::SearchBar) => self.search_bar.handle_key(key, s),
            Some(ComponentId::CategoryBar) => self.category_bar.handle_key(key, s),
            Some(ComponentId::ChannelGrid) => self.channel_grid.handle_key(key, s),
            _ => vec![],
        }
    }

    // ── Mouse handling ────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let is_click = matches!(event.kind, MouseEventKind::Down(_));
        let is_wheel = matches!(
            event.kind,
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        );
        if !is_click && !is_wheel {
            return vec![];
        }

        let s = &self.state;
        if self.help_overlay.visible {
            if is_click {
                return self.help_overlay.handle_mouse(event, Rect::default(), s);
            }
            return vec![];
        }
        // The overlay sits over the whole screen; the wheel never reaches the grid.
        if s.session.player().background_scroll_locked() {
            return self.player_overlay.handle_mouse(event, Rect::default(), s);
        }

        let (col, row) = (event.column, event.row);
        let areas = self.pane_areas;
        let searching = self.search_bar.is_active();

        macro_rules! route {
            ($component:expr, $area:expr) => {{
                let mut actions = $component.handle_mouse(event, $area, s);
                if is_click {
                    let id = $component.id();
                    if !self.focus.is_focused(id) {
                        actions.insert(0, Action::FocusPane(id));
                    }
                    if searching && id != ComponentId::SearchBar {
                        actions.insert(0, Action::CloseSearch);
                    }
                }
                return actions;
            }};
        }

        if hit(areas.playlist_bar, col, row) {
            route!(self.playlist_bar, areas.playlist_bar);
        }
        if hit(areas.search_bar, col, row) {
            route!(self.search_bar, areas.search_bar);
        }
        if hit(areas.category_bar, col, row) {
            route!(self.category_bar, areas.category_bar);
        }
        if hit(areas.channel_grid, col, row) {
            route!(self.channel_grid, areas.channel_grid);
        }
        vec![]
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        // Components see the action first so they can reset view state.
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.search_bar.on_action(&action, s));
            out.extend(self.channel_grid.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        self.apply_action(action);

        for a in secondary {
            self.apply_action(a);
        }
        self.sync_input_mode();
    }

    fn apply_action(&mut self, action: Action) {
        if action != Action::Noop {
            debug!("apply_action: {:?}", action);
        }
        match action {
            // ── Playlist ──────────────────────────────────────────────────────
            Action::SelectPlaylist(idx) => {
                let Some(url) = self
                    .state
                    .session
                    .playlists()
                    .get(idx)
                    .map(|p| p.url.clone())
                else {
                    return;
                };
                let ticket = self.state.session.select_playlist(&url);
                self.begin_fetch(ticket);
            }
            Action::NextPlaylist | Action::PrevPlaylist => {
                let len = self.state.session.playlists().len();
                if len == 0 {
                    return;
                }
                let next = match (self.state.session.playlist_index(), &action) {
                    (None, _) => 0,
                    (Some(i), Action::NextPlaylist) => (i + 1) % len,
                    (Some(i), _) => (i + len - 1) % len,
                };
                self.dispatch(Action::SelectPlaylist(next));
            }
            Action::Reload => {
                let ticket = self.state.session.reload();
                self.begin_fetch(ticket);
            }

            // ── Search / category ─────────────────────────────────────────────
            Action::OpenSearch => self.focus.set(ComponentId::SearchBar),
            Action::CloseSearch => {}
            Action::SearchChanged(term) => self.state.session.set_search(&term),
            Action::SelectCategory(category) => self.state.session.set_category(&category),
            Action::NextCategory | Action::PrevCategory => {
                let len = category_bar::category_options(&self.state).len();
                let current = category_bar::selected_option(&self.state);
                let next = if action == Action::NextCategory {
                    (current + 1) % len
                } else {
                    (current + len - 1) % len
                };
                if let Some(value) = category_bar::option_value(&self.state, next) {
                    self.dispatch(Action::SelectCategory(value));
                }
            }

            // ── Player ────────────────────────────────────────────────────────
            Action::OpenChannel(idx) => {
                if self.state.session.open_channel(idx).is_some() {
                    self.report_player_error();
                }
            }
            Action::ClosePlayer => self.state.session.close_player(),
            Action::OverlayClick { inside } => self.state.session.overlay_click(inside),

            // ── Navigation ────────────────────────────────────────────────────
            Action::FocusNext => {
                self.focus.next();
            }
            Action::FocusPrev => {
                self.focus.prev();
            }
            Action::FocusPane(id) => self.focus.set(id),

            // ── UI ────────────────────────────────────────────────────────────
            Action::CopyToClipboard(text) => {
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                    Ok(()) => {
                        let display = if text.chars().count() > 40 {
                            format!("{}…", text.chars().take(40).collect::<String>())
                        } else {
                            text
                        };
                        self.toast.success(format!("copied: {}", display));
                    }
                    Err(e) => {
                        warn!("clipboard error: {}", e);
                        self.toast.error(format!("clipboard error: {}", e));
                    }
                }
            }
            Action::ToggleHelp | Action::Noop => {}
            Action::Quit => self.should_quit = true,
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        // ── Outer layout: selectors | category | grid | status ───────────────
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(outer[0]);

        self.pane_areas = PaneAreas {
            playlist_bar: top[0],
            search_bar: top[1],
            category_bar: outer[1],
            channel_grid: outer[2],
        };

        // Overlays take focus away from the panes underneath.
        let modal = self.help_overlay.visible || self.state.session.player().is_open();
        let focused = |id| !modal && self.focus.is_focused(id);
        let (f_playlist, f_search, f_category, f_grid) = (
            focused(ComponentId::PlaylistBar),
            focused(ComponentId::SearchBar),
            focused(ComponentId::CategoryBar),
            focused(ComponentId::ChannelGrid),
        );

        let s = &self.state;
        self.playlist_bar.draw(frame, top[0], f_playlist, s);
        self.search_bar.draw(frame, top[1], f_search, s);
        self.category_bar.draw(frame, outer[1], f_category, s);
        self.channel_grid.draw(frame, outer[2], f_grid, s);
        status_bar::draw_keys_bar(frame, outer[3], s.input_mode, &s.summary());

        self.player_overlay.draw(frame, area, true, s);
        self.help_overlay.draw(frame, area, true, s);

        // ── Toast notifications (topmost layer) ──────────────────────────────
        self.toast.draw(frame, area);
    }
}

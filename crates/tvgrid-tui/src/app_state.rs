//! AppState: what components read during render and input handling.
//!
//! The App event loop is the only writer; components get `&AppState`.

use tvgrid_core::filter::ChannelView;
use tvgrid_core::playlist::Channel;
use tvgrid_core::session::Session;
use tvgrid_core::store::LoadStatus;

use crate::widgets::status_bar::InputMode;

pub struct AppState {
    pub session: Session,
    pub input_mode: InputMode,
    /// Placeholder logo URL for cards without `tvg-logo`.
    pub default_logo: String,
    /// Fixed grid column count, 0 = fit to width.
    pub grid_columns: u16,
}

impl AppState {
    pub fn new(session: Session, default_logo: String, grid_columns: u16) -> Self {
        Self {
            session,
            input_mode: InputMode::Normal,
            default_logo,
            grid_columns,
        }
    }

    pub fn view(&self) -> ChannelView {
        self.session.view()
    }

    pub fn channel(&self, idx: usize) -> Option<&Channel> {
        self.session.store().channel(idx)
    }

    /// Display name of the selected playlist, falling back to its URL.
    pub fn playlist_name(&self) -> &str {
        self.session
            .playlist_index()
            .and_then(|i| self.session.playlists().get(i))
            .map(|p| p.name.as_str())
            .unwrap_or_else(|| self.session.playlist_url())
    }

    /// One-line summary for the status bar.
    pub fn summary(&self) -> String {
        match self.session.store().status() {
            LoadStatus::Idle => String::new(),
            LoadStatus::Loading { .. } => format!("loading {}", self.playlist_name()),
            LoadStatus::Failed { .. } => format!("{}: failed", self.playlist_name()),
            LoadStatus::Loaded => {
                let total = self.session.store().channels().len();
                let shown = self.view().indices().len();
                if shown == total {
                    format!("{} · {} channels", self.playlist_name(), total)
                } else {
                    format!("{} · {}/{} channels", self.playlist_name(), shown, total)
                }
            }
        }
    }
}

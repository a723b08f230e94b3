//! Session: the single owner of all mutable application state.
//!
//! The terminal front-end turns key presses and fetch completions into calls
//! on this type; nothing here knows about rendering. The ordering that
//! matters lives in `complete_load`:
//!
//! ```text
//!   parse → store → (render) → restore category → restore last channel
//! ```

use std::fmt::Display;

use tracing::{debug, info};

use crate::config::PlaylistSource;
use crate::filter::{ChannelFilter, ChannelView};
use crate::persist::{Field, Persistence};
use crate::player::{PlaybackSurface, Player};
use crate::playlist::{Channel, Playlist};
use crate::store::{ChannelStore, LoadTicket};

/// Result of feeding a fetch completion into the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A newer selection superseded this load; nothing changed.
    Stale,
    Failed(String),
    Loaded {
        channels: usize,
        /// Name of the last-played channel that was reopened, if any.
        restored: Option<String>,
    },
}

pub struct Session {
    playlists: Vec<PlaylistSource>,
    persistence: Persistence,
    store: ChannelStore,
    player: Player,
    playlist_url: String,
    filter: ChannelFilter,
}

impl Session {
    pub fn new(
        playlists: Vec<PlaylistSource>,
        persistence: Persistence,
        surface: Box<dyn PlaybackSurface>,
    ) -> Self {
        Self {
            playlists,
            persistence,
            store: ChannelStore::new(),
            player: Player::new(surface),
            playlist_url: String::new(),
            filter: ChannelFilter::default(),
        }
    }

    /// Restore the saved selection and begin loading the restored playlist.
    ///
    /// The saved category is deliberately not applied here; it can only be
    /// validated once the playlist's categories exist.
    pub fn start(&mut self) -> LoadTicket {
        let saved = self.persistence.load();
        debug!("[session] restored selection {:?}", saved);

        self.playlist_url = saved
            .playlist_url
            .filter(|url| self.playlists.iter().any(|p| p.url == *url))
            .or_else(|| self.playlists.first().map(|p| p.url.clone()))
            .unwrap_or_default();
        self.filter.search = saved.search_term;
        self.filter.category.clear();

        self.store.begin_load(&self.playlist_url)
    }

    /// The user picked a playlist (re-picking the current one reloads it).
    pub fn select_playlist(&mut self, url: &str) -> LoadTicket {
        info!("[session] select playlist {}", url);
        self.playlist_url = url.to_string();
        self.persistence.save(Field::Playlist, url);
        self.store.begin_load(url)
    }

    pub fn reload(&mut self) -> LoadTicket {
        let url = self.playlist_url.clone();
        self.select_playlist(&url)
    }

    pub fn complete_load<E: Display>(
        &mut self,
        ticket: &LoadTicket,
        result: Result<Playlist, E>,
    ) -> LoadOutcome {
        let result = result.map_err(|e| e.to_string());
        let failure = result.as_ref().err().cloned();
        if !self.store.complete_load(ticket, result) {
            return LoadOutcome::Stale;
        }
        if let Some(reason) = failure {
            return LoadOutcome::Failed(reason);
        }

        self.filter.category = self
            .persistence
            .restore_category(&self.store.playlist().categories);

        let restored = self
            .persistence
            .restore_last_channel(self.store.channels());
        let restored_name = restored.as_ref().map(|c| c.name.clone());
        if let Some(channel) = restored {
            let already_playing = self
                .player
                .current()
                .is_some_and(|c| c.url == channel.url);
            if !already_playing {
                self.open(channel);
            }
        }

        LoadOutcome::Loaded {
            channels: self.store.channels().len(),
            restored: restored_name,
        }
    }

    pub fn set_search(&mut self, term: &str) {
        self.filter.search = term.to_string();
        self.persistence.save(Field::Search, term);
    }

    /// `""` selects all categories.
    pub fn set_category(&mut self, category: &str) {
        self.filter.category = category.to_string();
        self.persistence.save(Field::Category, category);
    }

    /// Open the channel at store index `idx`.
    pub fn open_channel(&mut self, idx: usize) -> Option<&Channel> {
        let channel = self.store.channel(idx)?.clone();
        self.open(channel);
        self.player.current()
    }

    fn open(&mut self, channel: Channel) {
        self.persistence.save_last_channel(Some(&channel));
        self.player.open(channel);
    }

    pub fn close_player(&mut self) {
        if self.player.close() {
            self.persistence.save_last_channel(None);
        }
    }

    /// A click on the player overlay; `inside_surface` is false for the backdrop.
    pub fn overlay_click(&mut self, inside_surface: bool) {
        if self.player.overlay_click(inside_surface) {
            self.persistence.save_last_channel(None);
        }
    }

    pub fn view(&self) -> ChannelView {
        ChannelView::build(&self.store, &self.filter)
    }

    pub fn playlists(&self) -> &[PlaylistSource] {
        &self.playlists
    }

    pub fn playlist_url(&self) -> &str {
        &self.playlist_url
    }

    /// Index of the selected playlist among the configured options.
    pub fn playlist_index(&self) -> Option<usize> {
        self.playlists.iter().position(|p| p.url == self.playlist_url)
    }

    /// Category options in display order, without the "all" entry.
    pub fn categories(&self) -> Vec<&str> {
        self.store
            .playlist()
            .categories
            .iter()
            .map(String::as_str)
            .collect()
    }

    pub fn filter(&self) -> &ChannelFilter {
        &self.filter
    }

    pub fn store(&self) -> &ChannelStore {
        &self.store
    }

    pub fn player(&self) -> &Player {
        &self.player
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::{KeyValueStore, MemoryStore, KEY_CATEGORY, KEY_PLAYLIST};
    use crate::player::NullSurface;
    use crate::playlist::parse_m3u;

    fn sources() -> Vec<PlaylistSource> {
        vec![
            PlaylistSource {
                name: "One".into(),
                url: "http://one".into(),
            },
            PlaylistSource {
                name: "Two".into(),
                url: "http://two".into(),
            },
        ]
    }

    fn session_with(store: MemoryStore) -> Session {
        Session::new(
            sources(),
            Persistence::new(Box::new(store)),
            Box::new(NullSurface),
        )
    }

    #[test]
    fn test_start_falls_back_to_first_playlist() {
        let mut store = MemoryStore::new();
        store.set(KEY_PLAYLIST, "http://removed").unwrap();
        let mut session = session_with(store);
        let ticket = session.start();
        assert_eq!(ticket.url, "http://one");
        assert_eq!(session.playlist_index(), Some(0));
        assert_eq!(session.view(), ChannelView::Loading);
    }

    #[test]
    fn test_saved_category_waits_for_playlist() {
        let mut store = MemoryStore::new();
        store.set(KEY_PLAYLIST, "http://two").unwrap();
        store.set(KEY_CATEGORY, "News").unwrap();
        let mut session = session_with(store);

        let ticket = session.start();
        assert_eq!(ticket.url, "http://two");
        assert_eq!(session.filter().category, "");

        session.complete_load(
            &ticket,
            Ok::<_, String>(parse_m3u("#EXTINF:-1 group-title=\"News\",A\nhttp://a")),
        );
        assert_eq!(session.filter().category, "News");
        assert_eq!(session.categories(), vec!["News"]);
    }

    #[test]
    fn test_stale_load_does_not_touch_state() {
        let mut session = session_with(MemoryStore::new());
        let first = session.start();
        let second = session.select_playlist("http://two");
        let outcome = session.complete_load(
            &first,
            Ok::<_, String>(parse_m3u("#EXTINF:-1,Old\nhttp://old")),
        );
        assert_eq!(outcome, LoadOutcome::Stale);
        assert_eq!(session.view(), ChannelView::Loading);

        let outcome = session.complete_load(
            &second,
            Ok::<_, String>(parse_m3u("#EXTINF:-1,New\nhttp://new")),
        );
        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                channels: 1,
                restored: None
            }
        );
    }

    #[test]
    fn test_failed_load_then_reselect_recovers() {
        let mut session = session_with(MemoryStore::new());
        let ticket = session.start();
        let outcome = session.complete_load(&ticket, Err::<Playlist, _>("HTTP 502"));
        assert_eq!(outcome, LoadOutcome::Failed("HTTP 502".into()));
        assert_eq!(session.view(), ChannelView::Failed("HTTP 502".into()));

        let ticket = session.reload();
        assert_eq!(ticket.url, "http://one");
        session.complete_load(&ticket, Ok::<_, String>(parse_m3u("#EXTINF:-1,A\nhttp://a")));
        assert_eq!(session.view(), ChannelView::Channels(vec![0]));
    }

    #[test]
    fn test_open_channel_out_of_range() {
        let mut session = session_with(MemoryStore::new());
        let ticket = session.start();
        session.complete_load(&ticket, Ok::<_, String>(Playlist::default()));
        assert!(session.open_channel(3).is_none());
        assert!(!session.player().is_open());
        assert_eq!(session.view(), ChannelView::Empty);
    }
}

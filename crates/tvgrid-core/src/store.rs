//! ChannelStore: the currently loaded playlist plus its load status.
//!
//! The playlist is replaced wholesale on every completed load. Loads are
//! stamped with a generation number so that a response for an older
//! selection can never overwrite a newer one.

use tracing::debug;

use crate::playlist::{Channel, Playlist};

/// Identifies one playlist fetch. Handed out by `begin_load`, returned to
/// `complete_load` together with the fetch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading {
        url: String,
    },
    Loaded,
    Failed {
        url: String,
        reason: String,
    },
}

#[derive(Debug, Default)]
pub struct ChannelStore {
    playlist: Playlist,
    status: LoadStatus,
    generation: u64,
}

impl ChannelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load for `url`. Any load still in flight becomes stale.
    pub fn begin_load(&mut self, url: &str) -> LoadTicket {
        self.generation += 1;
        self.status = LoadStatus::Loading {
            url: url.to_string(),
        };
        LoadTicket {
            generation: self.generation,
            url: url.to_string(),
        }
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation
            && matches!(&self.status, LoadStatus::Loading { url } if *url == ticket.url)
    }

    /// Apply a finished load. Returns `false` (and changes nothing) when the
    /// ticket is stale.
    pub fn complete_load(&mut self, ticket: &LoadTicket, result: Result<Playlist, String>) -> bool {
        if !self.is_current(ticket) {
            debug!(
                "dropping stale playlist load gen={} (current gen={}) url={}",
                ticket.generation, self.generation, ticket.url
            );
            return false;
        }

        match result {
            Ok(playlist) => {
                self.playlist = playlist;
                self.status = LoadStatus::Loaded;
            }
            Err(reason) => {
                self.playlist = Playlist::default();
                self.status = LoadStatus::Failed {
                    url: ticket.url.clone(),
                    reason,
                };
            }
        }
        true
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn channels(&self) -> &[Channel] {
        &self.playlist.channels
    }

    pub fn channel(&self, idx: usize) -> Option<&Channel> {
        self.playlist.channels.get(idx)
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, LoadStatus::Loading { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playlist::parse_m3u;

    #[test]
    fn test_load_replaces_playlist() {
        let mut store = ChannelStore::new();
        let t1 = store.begin_load("a");
        assert!(store.is_loading());
        assert!(store.complete_load(&t1, Ok(parse_m3u("#EXTINF:-1,A\nu1"))));
        assert_eq!(store.channels().len(), 1);
        assert_eq!(store.status(), &LoadStatus::Loaded);

        let t2 = store.begin_load("b");
        assert!(store.complete_load(&t2, Ok(parse_m3u("#EXTINF:-1,B\nu2\n#EXTINF:-1,C\nu3"))));
        assert_eq!(store.channels().len(), 2);
        assert_eq!(store.channel(0).map(|c| c.name.as_str()), Some("B"));
    }

    #[test]
    fn test_stale_completion_is_dropped() {
        let mut store = ChannelStore::new();
        let old = store.begin_load("slow");
        let new = store.begin_load("fast");
        assert!(store.complete_load(&new, Ok(parse_m3u("#EXTINF:-1,Fast\nu"))));
        assert!(!store.complete_load(&old, Ok(parse_m3u("#EXTINF:-1,Slow\nu"))));
        assert_eq!(store.channel(0).map(|c| c.name.as_str()), Some("Fast"));
        assert_eq!(store.generation(), 2);
    }

    #[test]
    fn test_completion_after_finish_is_dropped() {
        let mut store = ChannelStore::new();
        let t = store.begin_load("a");
        assert!(store.complete_load(&t, Ok(Playlist::default())));
        assert!(!store.complete_load(&t, Err("late".into())));
        assert_eq!(store.status(), &LoadStatus::Loaded);
    }

    #[test]
    fn test_failure_clears_playlist() {
        let mut store = ChannelStore::new();
        let t = store.begin_load("a");
        store.complete_load(&t, Ok(parse_m3u("#EXTINF:-1 group-title=\"G\",A\nu")));
        let t = store.begin_load("a");
        store.complete_load(&t, Err("HTTP 404".into()));
        assert!(store.channels().is_empty());
        assert!(store.playlist().categories.is_empty());
        assert_eq!(
            store.status(),
            &LoadStatus::Failed {
                url: "a".into(),
                reason: "HTTP 404".into()
            }
        );
    }
}

use std::sync::{Arc, Mutex};

use tvgrid_core::config::PlaylistSource;
use tvgrid_core::error::{PlaybackError, StorageError};
use tvgrid_core::persist::{KeyValueStore, MemoryStore, Persistence};
use tvgrid_core::player::PlaybackSurface;
use tvgrid_core::session::Session;

pub const SCENARIO_PLAYLIST: &str = "#EXTINF:-1 tvg-logo=\"http://x/a.png\" group-title=\"News\",Channel A\nhttp://a.m3u8\n#EXTINF:-1,Channel B\nhttp://b.m3u8";

pub const PLAYLIST_ONE: &str = "http://playlists/one.m3u";
pub const PLAYLIST_TWO: &str = "http://playlists/two.m3u";

/// Storage that outlives a `Session`, standing in for the state file across
/// restarts.
#[derive(Clone, Default)]
pub struct SharedStore(pub Arc<Mutex<MemoryStore>>);

impl SharedStore {
    pub fn get(&self, key: &str) -> Option<String> {
        self.0.lock().unwrap().get(key)
    }
}

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.lock().unwrap().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.0.lock().unwrap().set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.0.lock().unwrap().remove(key)
    }
}

/// Surface that records every call.
#[derive(Clone, Default)]
pub struct RecordingSurface(pub Arc<Mutex<Vec<String>>>);

impl RecordingSurface {
    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl PlaybackSurface for RecordingSurface {
    fn load(&mut self, url: &str) -> Result<(), PlaybackError> {
        self.0.lock().unwrap().push(format!("load {url}"));
        Ok(())
    }

    fn stop(&mut self) {
        self.0.lock().unwrap().push("stop".to_string());
    }
}

pub fn sources() -> Vec<PlaylistSource> {
    vec![
        PlaylistSource {
            name: "One".to_string(),
            url: PLAYLIST_ONE.to_string(),
        },
        PlaylistSource {
            name: "Two".to_string(),
            url: PLAYLIST_TWO.to_string(),
        },
    ]
}

/// A fresh session over `store`, as on application start.
pub fn boot(store: &SharedStore, surface: &RecordingSurface) -> Session {
    Session::new(
        sources(),
        Persistence::new(Box::new(store.clone())),
        Box::new(surface.clone()),
    )
}

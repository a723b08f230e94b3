//! Persistence adapter: UI selection state ⇄ durable key-value storage.
//!
//! Every user-facing selection is written the moment it changes. Reads are
//! best-effort: a missing or corrupt value is simply "nothing saved".

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::StorageError;
use crate::playlist::Channel;

pub const KEY_PLAYLIST: &str = "playlistSelector";
pub const KEY_SEARCH: &str = "searchInput";
pub const KEY_CATEGORY: &str = "categorySelector";
pub const KEY_LAST_CHANNEL: &str = "lastChannel";

/// Durable string-to-string storage.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store, mostly for tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    map: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.map.remove(key);
        Ok(())
    }
}

/// A JSON object of string values, rewritten on every mutation.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    map: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`. An unreadable or corrupt
    /// file starts out empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let map = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                debug!("ignoring corrupt state file {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, map }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&self.map)?)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.map.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.map.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// A user-editable selection that is saved on every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Playlist,
    Search,
    Category,
}

impl Field {
    pub fn key(self) -> &'static str {
        match self {
            Self::Playlist => KEY_PLAYLIST,
            Self::Search => KEY_SEARCH,
            Self::Category => KEY_CATEGORY,
        }
    }
}

/// Everything restored at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub playlist_url: Option<String>,
    pub search_term: String,
    pub selected_category: String,
    pub last_channel: Option<Channel>,
}

pub struct Persistence {
    store: Box<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn save(&mut self, field: Field, value: &str) {
        if let Err(e) = self.store.set(field.key(), value) {
            warn!("[persist] failed to save {}: {}", field.key(), e);
        }
    }

    /// Record the channel being played, or forget it when `None`.
    pub fn save_last_channel(&mut self, channel: Option<&Channel>) {
        let result = match channel {
            Some(ch) => serde_json::to_string(ch)
                .map_err(StorageError::from)
                .and_then(|json| self.store.set(KEY_LAST_CHANNEL, &json)),
            None => self.store.remove(KEY_LAST_CHANNEL),
        };
        if let Err(e) = result {
            warn!("[persist] failed to save {}: {}", KEY_LAST_CHANNEL, e);
        }
    }

    pub fn load(&self) -> SelectionState {
        SelectionState {
            playlist_url: self.store.get(KEY_PLAYLIST).filter(|s| !s.is_empty()),
            search_term: self.store.get(KEY_SEARCH).unwrap_or_default(),
            selected_category: self.store.get(KEY_CATEGORY).unwrap_or_default(),
            last_channel: self.last_channel(),
        }
    }

    fn last_channel(&self) -> Option<Channel> {
        let raw = self.store.get(KEY_LAST_CHANNEL)?;
        match serde_json::from_str::<Channel>(&raw) {
            Ok(ch) => Some(ch),
            Err(e) => {
                debug!("[persist] unreadable {}: {}", KEY_LAST_CHANNEL, e);
                None
            }
        }
    }

    /// Saved category if the freshly loaded playlist still has it, otherwise
    /// "" (all categories). A stale value is reset in storage too.
    ///
    /// Must only be called once `categories` belongs to the new playlist.
    pub fn restore_category(&mut self, categories: &BTreeSet<String>) -> String {
        let saved = self.store.get(KEY_CATEGORY).unwrap_or_default();
        if saved.is_empty() || categories.contains(&saved) {
            return saved;
        }
        debug!("[persist] saved category {:?} not in playlist, resetting", saved);
        self.save(Field::Category, "");
        String::new()
    }

    /// The saved last-played channel, if its URL is in `channels`.
    pub fn restore_last_channel(&self, channels: &[Channel]) -> Option<Channel> {
        let saved = self.last_channel()?;
        channels.iter().find(|c| c.url == saved.url).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chan(name: &str, url: &str) -> Channel {
        Channel {
            name: name.into(),
            url: url.into(),
            ..Channel::default()
        }
    }

    #[test]
    fn test_field_round_trip() {
        let mut p = Persistence::new(Box::new(MemoryStore::new()));
        p.save(Field::Playlist, "http://list.m3u");
        p.save(Field::Search, "  bbc ");
        p.save(Field::Category, "News");
        let state = p.load();
        assert_eq!(state.playlist_url.as_deref(), Some("http://list.m3u"));
        assert_eq!(state.search_term, "  bbc ");
        assert_eq!(state.selected_category, "News");
        assert_eq!(state.last_channel, None);
    }

    #[test]
    fn test_last_channel_saved_and_removed() {
        let mut store = MemoryStore::new();
        let ch = chan("A", "http://a");
        {
            let mut p = Persistence::new(Box::new(store.clone()));
            p.save_last_channel(Some(&ch));
            assert_eq!(p.load().last_channel, Some(ch.clone()));
            p.save_last_channel(None);
            assert_eq!(p.load().last_channel, None);
        }
        store.set(KEY_LAST_CHANNEL, "{}").unwrap();
        let p = Persistence::new(Box::new(store));
        // `name` is required, so an empty object is unreadable.
        assert_eq!(p.load().last_channel, None);
    }

    #[test]
    fn test_removing_last_channel_deletes_key() {
        let mut store = MemoryStore::new();
        store.set(KEY_LAST_CHANNEL, "x").unwrap();
        store.remove(KEY_LAST_CHANNEL).unwrap();
        assert_eq!(store.get(KEY_LAST_CHANNEL), None);
    }

    #[test]
    fn test_corrupt_last_channel_is_ignored() {
        let mut store = MemoryStore::new();
        store.set(KEY_LAST_CHANNEL, "{not json").unwrap();
        let p = Persistence::new(Box::new(store));
        assert_eq!(p.load().last_channel, None);
        assert_eq!(p.restore_last_channel(&[chan("A", "http://a")]), None);
    }

    #[test]
    fn test_restore_category() {
        let cats: BTreeSet<String> = ["News".to_string()].into_iter().collect();

        let mut p = Persistence::new(Box::new(MemoryStore::new()));
        assert_eq!(p.restore_category(&cats), "");

        p.save(Field::Category, "News");
        assert_eq!(p.restore_category(&cats), "News");

        p.save(Field::Category, "Sports");
        assert_eq!(p.restore_category(&cats), "");
        assert_eq!(p.load().selected_category, "");
    }

    #[test]
    fn test_restore_last_channel_matches_by_url() {
        let mut p = Persistence::new(Box::new(MemoryStore::new()));
        p.save_last_channel(Some(&chan("Old name", "http://a")));
        let fresh = vec![chan("B", "http://b"), chan("A (HD)", "http://a")];
        assert_eq!(
            p.restore_last_channel(&fresh).map(|c| c.name),
            Some("A (HD)".to_string())
        );
        assert_eq!(p.restore_last_channel(&fresh[..1]), None);
    }

    #[test]
    fn test_json_file_store_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ui_state.json");

        let mut store = JsonFileStore::open(&path);
        store.set(KEY_SEARCH, "news").unwrap();
        store.set(KEY_LAST_CHANNEL, "{\"name\":\"A\",\"url\":\"u\"}").unwrap();
        store.remove(KEY_LAST_CHANNEL).unwrap();

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get(KEY_SEARCH).as_deref(), Some("news"));
        assert_eq!(reopened.get(KEY_LAST_CHANNEL), None);
    }

    #[test]
    fn test_json_file_store_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui_state.json");
        std::fs::write(&path, "][").unwrap();
        let store = JsonFileStore::open(&path);
        assert_eq!(store.get(KEY_SEARCH), None);
        assert_eq!(store.path(), path.as_path());
    }
}

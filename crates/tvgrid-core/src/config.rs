use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Options offered by the playlist selector, in display order.
    #[serde(default = "default_playlists")]
    pub playlists: Vec<PlaylistSource>,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// One entry of the playlist selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSource {
    pub name: String,
    /// `http(s)://` URL, `file://` URL, or a local path.
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Player executable; a bare name is searched beside the exe and on PATH.
    #[serde(default = "default_player_command")]
    pub command: String,
    /// Arguments passed before the stream URL.
    #[serde(default = "default_player_args")]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Shown on cards whose channel has no `tvg-logo`.
    #[serde(default = "default_logo")]
    pub default_logo: String,
    /// Fixed number of grid columns; 0 picks one from the terminal width.
    #[serde(default)]
    pub grid_columns: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Key-value file holding the persisted UI selection.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            command: default_player_command(),
            args: default_player_args(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_logo: default_logo(),
            grid_columns: 0,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
        }
    }
}

fn default_playlists() -> Vec<PlaylistSource> {
    [
        ("All channels", "https://iptv-org.github.io/iptv/index.m3u"),
        ("News", "https://iptv-org.github.io/iptv/categories/news.m3u"),
        ("Music", "https://iptv-org.github.io/iptv/categories/music.m3u"),
        ("Sports", "https://iptv-org.github.io/iptv/categories/sports.m3u"),
    ]
    .into_iter()
    .map(|(name, url)| PlaylistSource {
        name: name.to_string(),
        url: url.to_string(),
    })
    .collect()
}

fn default_player_command() -> String {
    platform::mpv_binary_name().to_string()
}

fn default_player_args() -> Vec<String> {
    vec![
        "--force-window=immediate".to_string(),
        "--really-quiet".to_string(),
    ]
}

fn default_logo() -> String {
    "https://static.thenounproject.com/png/2811695-200.png".to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_user_agent() -> String {
    format!("tvgrid/{}", env!("CARGO_PKG_VERSION"))
}

fn default_state_file() -> PathBuf {
    platform::data_dir().join("ui_state.json")
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            playlists: default_playlists(),
            player: PlayerConfig::default(),
            ui: UiConfig::default(),
            http: HttpConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.playlists.is_empty());
        assert!(config.playlists[0].url.starts_with("https://"));
        assert_eq!(config.http.timeout_secs, 20);
        assert_eq!(config.ui.grid_columns, 0);
        assert!(config.paths.state_file.ends_with("tvgrid/ui_state.json"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml_str = r#"
            [[playlists]]
            name = "Local"
            url = "/srv/tv/local.m3u"

            [ui]
            grid_columns = 3
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.playlists.len(), 1);
        assert_eq!(config.playlists[0].url, "/srv/tv/local.m3u");
        assert_eq!(config.ui.grid_columns, 3);
        assert!(!config.ui.default_logo.is_empty());
        assert_eq!(config.player.command, platform::mpv_binary_name());
    }

    #[test]
    fn test_config_roundtrips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.playlists, config.playlists);
        assert_eq!(back.player.args, config.player.args);
    }
}

//! Playlist fetching: HTTP(S) via reqwest, anything else from disk.

use std::time::Duration;

use tracing::info;

use crate::config::HttpConfig;
use crate::error::FetchError;
use crate::playlist::{parse_m3u, Playlist};

#[derive(Clone)]
pub struct PlaylistFetcher {
    client: reqwest::Client,
}

impl PlaylistFetcher {
    pub fn new(http: &HttpConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(http.timeout_secs.max(1)))
            .user_agent(http.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    pub async fn fetch(&self, source: &str) -> Result<Playlist, FetchError> {
        let text = self.fetch_text(source).await?;
        let playlist = parse_m3u(&text);
        info!(
            "Loaded {} channels ({} categories) from {}",
            playlist.len(),
            playlist.categories.len(),
            source
        );
        Ok(playlist)
    }

    pub async fn fetch_text(&self, source: &str) -> Result<String, FetchError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(FetchError::NoSource);
        }

        if is_remote(source) {
            let response = self.client.get(source).send().await?;
            if !response.status().is_success() {
                return Err(FetchError::Http(response.status()));
            }
            return Ok(response.text().await?);
        }

        let path = source.strip_prefix("file://").unwrap_or(source);
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| FetchError::Io {
                path: path.to_string(),
                source,
            })
    }
}

pub fn is_remote(source: &str) -> bool {
    let lower = source.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://iptv-org.github.io/iptv/index.m3u"));
        assert!(is_remote("HTTP://example.com/x.m3u"));
        assert!(!is_remote("/home/me/tv.m3u"));
        assert!(!is_remote("file:///home/me/tv.m3u"));
    }

    #[tokio::test]
    async fn test_fetch_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.m3u");
        std::fs::write(
            &path,
            "#EXTM3U\n#EXTINF:-1 group-title=\"Local\",Cam\nrtsp://cam/1\n",
        )
        .unwrap();

        let fetcher = PlaylistFetcher::new(&HttpConfig::default()).unwrap();
        let playlist = fetcher.fetch(path.to_str().unwrap()).await.unwrap();
        assert_eq!(playlist.channels[0].name, "Cam");
        assert!(playlist.categories.contains("Local"));

        let url = format!("file://{}", path.display());
        assert_eq!(fetcher.fetch(&url).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_errors() {
        let fetcher = PlaylistFetcher::new(&HttpConfig::default()).unwrap();
        assert!(matches!(fetcher.fetch("  ").await, Err(FetchError::NoSource)));
        assert!(matches!(
            fetcher.fetch("/definitely/not/here.m3u").await,
            Err(FetchError::Io { .. })
        ));
    }
}

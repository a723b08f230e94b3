//! M3U playlist parsing.
//!
//! Parsing is best-effort: every `#EXTINF` line yields exactly one channel,
//! and missing or malformed attributes degrade to empty strings. Nothing in
//! here returns an error.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Marker that starts a channel's metadata line.
pub const EXTINF: &str = "#EXTINF";

/// Display name used when the metadata line has no comma.
pub const PLACEHOLDER_NAME: &str = "Channel";

/// Card label for channels without a `group-title`.
pub const UNGROUPED_LABEL: &str = "Other";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Channel {
    pub name: String,
    /// `tvg-logo` attribute, empty when absent.
    #[serde(default)]
    pub logo: String,
    /// `group-title` attribute, empty when absent.
    #[serde(default)]
    pub group: String,
    /// Playback source. Used as the lookup key when restoring a channel.
    #[serde(default)]
    pub url: String,
}

impl Channel {
    pub fn group_label(&self) -> &str {
        if self.group.is_empty() {
            UNGROUPED_LABEL
        } else {
            &self.group
        }
    }

    pub fn logo_or<'a>(&'a self, default_logo: &'a str) -> &'a str {
        if self.logo.is_empty() {
            default_logo
        } else {
            &self.logo
        }
    }
}

/// A parsed playlist: channels in file order plus their distinct categories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playlist {
    pub channels: Vec<Channel>,
    /// Non-empty `group-title` values; iteration order is lexicographic.
    pub categories: BTreeSet<String>,
}

impl Playlist {
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

fn logo_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"tvg-logo="([^"]+)""#).expect("static regex"))
}

fn group_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"group-title="([^"]+)""#).expect("static regex"))
}

fn capture(re: &Regex, line: &str) -> String {
    re.captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn is_metadata_line(line: &str) -> bool {
    line.starts_with(EXTINF)
}

/// Parse a single `#EXTINF` line into a channel without a URL.
pub fn parse_extinf(info: &str) -> Channel {
    let name = info
        .rsplit_once(',')
        .map(|(_, name)| name.trim().to_string())
        .unwrap_or_else(|| PLACEHOLDER_NAME.to_string());

    Channel {
        name,
        logo: capture(logo_re(), info),
        group: capture(group_re(), info),
        url: String::new(),
    }
}

/// URL for the metadata line at `idx`: the next non-blank, non-directive
/// line before the following `#EXTINF`.
fn url_after(lines: &[&str], idx: usize) -> String {
    for line in &lines[idx + 1..] {
        if is_metadata_line(line) {
            break;
        }
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        return line.to_string();
    }
    String::new()
}

pub fn parse_m3u(text: &str) -> Playlist {
    let lines: Vec<&str> = text.lines().collect();
    let mut playlist = Playlist::default();

    for (idx, line) in lines.iter().enumerate() {
        if !is_metadata_line(line) {
            continue;
        }

        let mut channel = parse_extinf(line.trim_end());
        channel.url = url_after(&lines, idx);

        if !channel.group.is_empty() {
            playlist.categories.insert(channel.group.clone());
        }
        playlist.channels.push(channel);
    }

    playlist
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "#EXTINF:-1 tvg-logo=\"http://x/a.png\" group-title=\"News\",Channel A\nhttp://a.m3u8\n#EXTINF:-1,Channel B\nhttp://b.m3u8";

    #[test]
    fn test_parse_two_channels() {
        let playlist = parse_m3u(SAMPLE);
        assert_eq!(
            playlist.channels,
            vec![
                Channel {
                    name: "Channel A".into(),
                    logo: "http://x/a.png".into(),
                    group: "News".into(),
                    url: "http://a.m3u8".into(),
                },
                Channel {
                    name: "Channel B".into(),
                    logo: String::new(),
                    group: String::new(),
                    url: "http://b.m3u8".into(),
                },
            ]
        );
        assert_eq!(
            playlist.categories.iter().collect::<Vec<_>>(),
            vec!["News"]
        );
    }

    #[test]
    fn test_empty_and_garbage_input() {
        assert!(parse_m3u("").is_empty());
        assert!(parse_m3u("#EXTM3U\n").is_empty());
        assert!(parse_m3u("not a playlist\nhttp://x\n\"\"\"").is_empty());
    }

    #[test]
    fn test_count_matches_metadata_lines() {
        let text = "#EXTM3U\n#EXTINF:-1,One\n#EXTINF:-1,Two\nhttp://two\n#EXTINF\n\n#EXTINF:-1,Four";
        let playlist = parse_m3u(text);
        assert_eq!(playlist.len(), 4);
        // A metadata line directly followed by another has no URL.
        assert_eq!(playlist.channels[0].url, "");
        assert_eq!(playlist.channels[1].url, "http://two");
        assert_eq!(playlist.channels[2].name, PLACEHOLDER_NAME);
        assert_eq!(playlist.channels[3].url, "");
    }

    #[test]
    fn test_name_after_last_comma() {
        let ch = parse_extinf("#EXTINF:-1 group-title=\"A\",Foo, Bar  ");
        assert_eq!(ch.name, "Bar");
        assert_eq!(ch.group, "A");
    }

    #[test]
    fn test_directives_between_info_and_url() {
        let text = "#EXTINF:-1,Opt\r\n#EXTVLCOPT:http-referrer=x\r\n\r\n  http://opt.m3u8  \r\n";
        let playlist = parse_m3u(text);
        assert_eq!(playlist.channels[0].name, "Opt");
        assert_eq!(playlist.channels[0].url, "http://opt.m3u8");
    }

    #[test]
    fn test_empty_attribute_values_are_absent() {
        let ch = parse_extinf("#EXTINF:-1 tvg-logo=\"\" group-title=\"\",Blank");
        assert_eq!(ch.logo, "");
        assert_eq!(ch.group, "");
        let playlist = parse_m3u("#EXTINF:-1 group-title=\"\",Blank\nhttp://b");
        assert!(playlist.categories.is_empty());
    }

    #[test]
    fn test_ungrouped_label_and_logo_fallback() {
        let playlist = parse_m3u(SAMPLE);
        assert_eq!(playlist.channels[0].group_label(), "News");
        assert_eq!(playlist.channels[1].group_label(), UNGROUPED_LABEL);
        assert_eq!(playlist.channels[0].logo_or("default"), "http://x/a.png");
        assert_eq!(playlist.channels[1].logo_or("default"), "default");
    }

    #[test]
    fn test_categories_sorted_and_distinct() {
        let text = "#EXTINF:-1 group-title=\"Sports\",S1\nu1\n#EXTINF:-1 group-title=\"Kids\",K1\nu2\n#EXTINF:-1 group-title=\"Sports\",S2\nu3";
        let playlist = parse_m3u(text);
        assert_eq!(
            playlist.categories.iter().cloned().collect::<Vec<_>>(),
            vec!["Kids".to_string(), "Sports".to_string()]
        );
    }

    #[test]
    fn test_marker_must_start_the_line() {
        let text = "  #EXTINF:-1,Indented\nhttp://i\n#EXTINF:-1,Real\nhttp://r";
        let playlist = parse_m3u(text);
        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist.channels[0].name, "Real");
        assert_eq!(playlist.channels[0].url, "http://r");
    }
}

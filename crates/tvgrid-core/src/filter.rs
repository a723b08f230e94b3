//! Search/category filtering and the render model derived from it.

use crate::playlist::Channel;
use crate::store::{ChannelStore, LoadStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelFilter {
    pub search: String,
    /// Empty means "all categories".
    pub category: String,
}

impl ChannelFilter {
    pub fn new(search: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            category: category.into(),
        }
    }

    pub fn matches(&self, channel: &Channel) -> bool {
        let matches_search = channel
            .name
            .to_lowercase()
            .contains(&self.search.to_lowercase());
        let matches_category = self.category.is_empty() || channel.group == self.category;
        matches_search && matches_category
    }

    /// Indices of the matching channels, in their original order.
    pub fn apply(&self, channels: &[Channel]) -> Vec<usize> {
        channels
            .iter()
            .enumerate()
            .filter(|(_, c)| self.matches(c))
            .map(|(i, _)| i)
            .collect()
    }

    /// Filter an already filtered index list again.
    pub fn refine(&self, channels: &[Channel], indices: &[usize]) -> Vec<usize> {
        indices
            .iter()
            .copied()
            .filter(|&i| channels.get(i).is_some_and(|c| self.matches(c)))
            .collect()
    }
}

/// What the channel grid should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelView {
    /// Nothing selected yet.
    Idle,
    Loading,
    Failed(String),
    /// Playlist loaded, but nothing matches the filter (or it has no channels).
    Empty,
    /// Store indices of the visible channels.
    Channels(Vec<usize>),
}

impl ChannelView {
    pub fn build(store: &ChannelStore, filter: &ChannelFilter) -> Self {
        match store.status() {
            LoadStatus::Idle => Self::Idle,
            LoadStatus::Loading { .. } => Self::Loading,
            LoadStatus::Failed { reason, .. } => Self::Failed(reason.clone()),
            LoadStatus::Loaded => {
                let visible = filter.apply(store.channels());
                if visible.is_empty() {
                    Self::Empty
                } else {
                    Self::Channels(visible)
                }
            }
        }
    }

    pub fn indices(&self) -> &[usize] {
        match self {
            Self::Channels(v) => v,
            _ => &[],
        }
    }
}

//! Player controller: a two-state machine bound to one playback surface.
//!
//! ```text
//!   Closed ──open(ch)──▶ Open(ch) ──close()──▶ Closed
//!                         │   ▲
//!                         └───┘ open(other)
//! ```
//!
//! The surface is whatever actually renders video (an external `mpv`
//! window in the terminal app, a recorder in tests). Surface errors are
//! logged and shown, but never change the state machine.

use tracing::{info, warn};

use crate::error::PlaybackError;
use crate::playlist::Channel;

/// Something that can play a stream URL.
pub trait PlaybackSurface: Send {
    /// Bind the surface to `url` and start playback.
    fn load(&mut self, url: &str) -> Result<(), PlaybackError>;

    /// Stop playback and clear the bound source. Must be safe to call when
    /// nothing is playing.
    fn stop(&mut self);
}

/// Surface that plays nothing, for headless use.
#[derive(Debug, Default)]
pub struct NullSurface;

impl PlaybackSurface for NullSurface {
    fn load(&mut self, _url: &str) -> Result<(), PlaybackError> {
        Ok(())
    }

    fn stop(&mut self) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    Closed,
    Open(Channel),
}

pub struct Player {
    state: PlayerState,
    surface: Box<dyn PlaybackSurface>,
    /// Last surface error for the open channel, shown in the overlay.
    last_error: Option<String>,
}

impl Player {
    pub fn new(surface: Box<dyn PlaybackSurface>) -> Self {
        Self {
            state: PlayerState::Closed,
            surface,
            last_error: None,
        }
    }

    pub fn open(&mut self, channel: Channel) {
        if self.is_open() {
            self.surface.stop();
        }
        info!("[player] open {:?} -> {}", channel.name, channel.url);
        self.last_error = match self.surface.load(&channel.url) {
            Ok(()) => None,
            Err(e) => {
                warn!("[player] surface failed for {}: {}", channel.url, e);
                Some(e.to_string())
            }
        };
        self.state = PlayerState::Open(channel);
    }

    /// Returns `true` if the player was open.
    pub fn close(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.surface.stop();
        self.last_error = None;
        if let PlayerState::Open(ch) = std::mem::take(&mut self.state) {
            info!("[player] close {:?}", ch.name);
        }
        true
    }

    /// A click on the overlay. Clicks outside the surface close the player.
    /// Returns `true` if this closed the player.
    pub fn overlay_click(&mut self, inside_surface: bool) -> bool {
        if inside_surface {
            return false;
        }
        self.close()
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn current(&self) -> Option<&Channel> {
        match &self.state {
            PlayerState::Open(ch) => Some(ch),
            PlayerState::Closed => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PlayerState::Open(_))
    }

    /// While the overlay is up the channel grid must not scroll.
    pub fn background_scroll_locked(&self) -> bool {
        self.is_open()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

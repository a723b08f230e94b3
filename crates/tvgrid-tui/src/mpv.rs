//! External `mpv` window as the playback surface.
//!
//! Every `load` replaces the running process: the previous one is killed,
//! then a fresh `mpv <args> <url>` is spawned. `stop` kills it. The child is
//! also killed on drop, so quitting the TUI closes the video window.
//!
//! mpv's stderr is appended to `<data_dir>/mpv-stderr.log`.
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use tvgrid_core::config::PlayerConfig;
use tvgrid_core::error::PlaybackError;
use tvgrid_core::platform;
use tvgrid_core::player::PlaybackSurface;

pub struct MpvSurface {
    binary: PathBuf,
    args: Vec<String>,
    stderr_log: PathBuf,
    process: Option<Child>,
}

impl MpvSurface {
    /// Resolve the configured player. Fails if the binary cannot be found.
    pub fn new(config: &PlayerConfig) -> Result<Self, PlaybackError> {
        let binary = platform::resolve_player_binary(&config.command)
            .ok_or_else(|| PlaybackError::NotFound(config.command.clone()))?;
        info!("mpv: using {:?}", binary);
        Ok(Self {
            binary,
            args: config.args.clone(),
            stderr_log: platform::data_dir().join("mpv-stderr.log"),
            process: None,
        })
    }

    fn kill_current(&mut self) {
        if let Some(mut child) = self.process.take() {
            debug!("mpv: stopping pid {:?}", child.id());
            if let Err(e) = child.start_kill() {
                // Already exited on its own (window closed by the user).
                debug!("mpv: kill failed: {}", e);
            }
        }
    }

    fn stderr(&self) -> Stdio {
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.stderr_log)
        {
            Ok(file) => Stdio::from(file),
            Err(e) => {
                warn!("mpv: cannot open {:?}: {}", self.stderr_log, e);
                Stdio::null()
            }
        }
    }
}

impl PlaybackSurface for MpvSurface {
    fn load(&mut self, url: &str) -> Result<(), PlaybackError> {
        self.kill_current();
        let child = Command::new(&self.binary)
            .args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(self.stderr())
            .kill_on_drop(true)
            .spawn()?;
        info!("mpv: spawned pid {:?} for {}", child.id(), url);
        self.process = Some(child);
        Ok(())
    }

    fn stop(&mut self) {
        self.kill_current();
    }
}

impl Drop for MpvSurface {
    fn drop(&mut self) {
        self.kill_current();
    }
}

/// Stand-in when the configured player cannot be found: every `load` fails,
/// so the overlay reports the problem instead of pretending to play.
pub struct MissingPlayer {
    command: String,
}

impl MissingPlayer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl PlaybackSurface for MissingPlayer {
    fn load(&mut self, _url: &str) -> Result<(), PlaybackError> {
        Err(PlaybackError::NotFound(self.command.clone()))
    }

    fn stop(&mut self) {}
}

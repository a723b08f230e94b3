mod action;
mod app;
mod app_state;
mod component;
mod components;
mod focus;
mod mpv;
mod theme;
mod widgets;

use tvgrid_core::config::Config;
use tvgrid_core::fetch::PlaylistFetcher;
use tvgrid_core::persist::{JsonFileStore, Persistence};
use tvgrid_core::platform;
use tvgrid_core::player::PlaybackSurface;
use tvgrid_core::session::Session;

use crate::mpv::{MissingPlayer, MpvSurface};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = data_dir.join("tui.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // RUST_LOG overrides; HTTP client internals are noisy at debug.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    eprintln!("tvgrid log: {}", log_path.display());
    tracing::info!("tvgrid starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("config {:?} unusable ({:#}), using defaults", Config::config_path(), e);
        Config::default()
    });
    if config.playlists.is_empty() {
        tracing::warn!("no playlists configured in {:?}", Config::config_path());
    }

    // ── Session wiring ───────────────────────────────────────────────────────
    let store = JsonFileStore::open(&config.paths.state_file);
    tracing::info!("ui state file: {:?}", store.path());
    let persistence = Persistence::new(Box::new(store));

    let surface: Box<dyn PlaybackSurface> = match MpvSurface::new(&config.player) {
        Ok(mpv) => Box::new(mpv),
        Err(e) => {
            tracing::warn!("{}; channels will not play", e);
            Box::new(MissingPlayer::new(config.player.command.clone()))
        }
    };

    let fetcher = PlaylistFetcher::new(&config.http)?;
    let session = Session::new(config.playlists.clone(), persistence, surface);

    // ── Run TUI ──────────────────────────────────────────────────────────────
    app::App::new(session, fetcher, &config.ui).run().await
}

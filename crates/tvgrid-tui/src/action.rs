//! Action enum: all user-initiated intents and internal events.

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    PlaylistBar,
    SearchBar,
    CategoryBar,
    ChannelGrid,
    PlayerOverlay,
    HelpOverlay,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Playlist ─────────────────────────────────────────────────────────────
    SelectPlaylist(usize), // index into the configured playlists
    NextPlaylist,
    PrevPlaylist,
    Reload,

    // ── Search / category ────────────────────────────────────────────────────
    OpenSearch,
    CloseSearch,
    SearchChanged(String),
    /// `""` selects all categories.
    SelectCategory(String),
    NextCategory,
    PrevCategory,

    // ── Player ───────────────────────────────────────────────────────────────
    OpenChannel(usize), // store index
    ClosePlayer,
    /// Click on the player overlay; `inside` is false for the backdrop.
    OverlayClick { inside: bool },

    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    FocusPane(ComponentId),

    // ── UI ───────────────────────────────────────────────────────────────────
    CopyToClipboard(String),
    ToggleHelp,
    Quit,
    Noop,
}

pub mod category_bar;
pub mod channel_grid;
pub mod help_overlay;
pub mod player_overlay;
pub mod playlist_bar;
pub mod search_bar;

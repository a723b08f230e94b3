pub mod filter_input;
pub mod option_row;
pub mod pane_chrome;
pub mod status_bar;
pub mod toast;

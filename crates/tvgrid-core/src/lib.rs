pub mod config;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod persist;
pub mod platform;
pub mod player;
pub mod playlist;
pub mod session;
pub mod store;

pub mod config;
pub mod export;
pub mod http_cache;
pub mod http_client;
pub mod logging;
pub mod matchup;
pub mod provider;
pub mod source;
pub mod state;
pub mod statsapi;
pub mod streaks;
pub mod tables;

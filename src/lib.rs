// Library entry so integration tests can reach the bot's modules.
pub mod api;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod format;
pub mod forms;
pub mod handler;
pub mod model;
pub mod permissions;
pub mod preferences;
pub mod reply;

pub use model::AppState;

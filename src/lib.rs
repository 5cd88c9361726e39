//! chatroom is a themeable client for socket.io chat rooms
#![forbid(
    clippy::missing_docs_in_private_items,
    missing_docs,
    rustdoc::missing_crate_level_docs
)]

#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod error;
pub mod macros;
pub mod models;
pub mod rooms;
pub mod session;
pub mod theme;
pub mod transport;
pub mod utils;

/// the user agent sent with every http request
pub static USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

//! the main application
pub mod cli;
pub mod core;
pub mod handlers;
pub mod interrupt;
pub mod logging;

pub use core::ChatApp;

//! logic handler stuff
mod chat;
mod directory;
mod themes;

use {
    super::interrupt::InterruptHandler,
    crate::{config::instance::config, rooms::RoomDirectory},
    color_eyre::eyre::Result,
};

/// logic handlers
pub struct Handlers {
    /// the chat server everything talks to
    pub(crate) server_url: String,
    /// the interruption handler
    pub(crate) interrupt: InterruptHandler,
}

impl Handlers {
    /// make a new set of handlers
    pub fn new(server_url: String, interrupt: InterruptHandler) -> Self {
        Self {
            server_url,
            interrupt,
        }
    }

    /// see [`InterruptHandler::check_and_reset`]
    pub fn was_interrupted(&self) -> bool {
        self.interrupt.check_and_reset()
    }

    /// a client for the server's http api
    pub(crate) fn directory(&self) -> Result<RoomDirectory> {
        let settings = config()?.http_settings();
        Ok(RoomDirectory::new(&self.server_url, &settings)?)
    }
}

//! the realtime connection underneath the session client
//!
//! a [`Connector`] opens a [`Connection`]: a [`Transport`] handle for
//! outbound events plus a channel of [`Inbound`] events. connection upkeep
//! (heartbeats, reconnects) lives entirely behind this seam
pub mod memory;
pub mod packet;
pub mod socketio;

pub use {
    memory::{Emitted, MemoryConnector, MemoryServer},
    socketio::{DEFAULT_SOCKET_PATH, SocketIoConnector},
};

use {
    crate::error::Result,
    serde_json::Value,
    std::time::Duration,
    tokio::sync::mpsc::UnboundedReceiver,
    url::Url,
};

/// how often a dropped connection is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// whether to reconnect at all
    pub enabled: bool,
    /// attempts before giving up, reset after every successful connect
    pub attempts: u32,
    /// the pause between attempts
    pub delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            attempts: 5,
            delay: Duration::from_millis(1000),
        }
    }
}

/// something that happened on the connection
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// the connection is up (again)
    Connected,
    /// the connection went down
    Disconnected(String),
    /// the transport itself failed
    Error(String),
    /// the server sent an event
    Event {
        /// the event name
        name: String,
        /// the first event argument, if any
        payload: Option<Value>,
    },
}

impl Inbound {
    /// shorthand for a server event
    pub fn event(name: impl Into<String>, payload: Value) -> Self {
        Self::Event {
            name: name.into(),
            payload: Some(payload),
        }
    }
}

/// the outbound half of a connection
pub trait Transport: Send {
    /// queue an event for the server
    fn emit(&mut self, event: &str, payload: Option<Value>) -> Result<()>;
    /// tear the connection down for good
    fn close(&mut self);
}

/// an open connection
pub struct Connection {
    /// the outbound half
    pub transport: Box<dyn Transport>,
    /// the inbound half, closed once the connection is gone for good
    pub inbound: UnboundedReceiver<Inbound>,
}

/// opens connections
pub trait Connector: Send {
    /// open a connection to `url`, retrying according to `policy`
    fn connect(&mut self, url: &Url, policy: &ReconnectPolicy) -> Result<Connection>;
}

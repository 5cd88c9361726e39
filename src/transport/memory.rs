//! an in-process transport
//!
//! [`MemoryConnector`] hands out connections whose far end is a
//! [`MemoryServer`]: it records everything the client emits and lets the
//! caller play the server's part by pushing inbound events
use {
    crate::{
        error::{ChatError, Result},
        transport::{Connection, Connector, Inbound, ReconnectPolicy, Transport},
    },
    serde_json::Value,
    std::sync::{Arc, Mutex, MutexGuard, PoisonError},
    tokio::sync::mpsc::{UnboundedSender, unbounded_channel},
    tracing::debug,
    url::Url,
};

/// an event the client sent
#[derive(Debug, Clone, PartialEq)]
pub struct Emitted {
    /// the event name
    pub event: String,
    /// the payload, if any
    pub payload: Option<Value>,
}

/// shared state between the connector, its transports and the server handle
#[derive(Debug, Default)]
struct MemoryState {
    /// every event emitted on any connection, in order
    emitted: Vec<Emitted>,
    /// the inbound side of the newest connection
    inbound: Option<UnboundedSender<Inbound>>,
    /// the id of the newest connection
    current: usize,
    /// how many connections were opened
    opened: usize,
    /// how many connections were closed by the client
    closed: usize,
    /// the urls connections were opened to
    urls: Vec<String>,
}

/// the far end of every connection a [`MemoryConnector`] opens
#[derive(Debug, Clone, Default)]
pub struct MemoryServer {
    /// the shared state
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryServer {
    /// lock the shared state
    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// deliver an inbound event on the newest connection
    ///
    /// returns `false` if there's no live connection to deliver to
    pub fn push(&self, inbound: Inbound) -> bool {
        match &self.lock().inbound {
            Some(tx) => tx.send(inbound).is_ok(),
            None => false,
        }
    }

    /// deliver a server event with a payload
    pub fn send(&self, event: &str, payload: Value) -> bool {
        self.push(Inbound::event(event, payload))
    }

    /// report the connection as up
    pub fn accept(&self) -> bool {
        self.push(Inbound::Connected)
    }

    /// report the connection as down, without ending it
    pub fn drop_connection(&self, reason: &str) -> bool {
        self.push(Inbound::Disconnected(reason.to_string()))
    }

    /// end the newest connection for good, as if out of reconnects
    ///
    /// returns `false` if there was no live connection
    pub fn hang_up(&self) -> bool {
        self.lock().inbound.take().is_some()
    }

    /// everything emitted so far
    pub fn emitted(&self) -> Vec<Emitted> {
        self.lock().emitted.clone()
    }

    /// take everything emitted so far
    pub fn take_emitted(&self) -> Vec<Emitted> {
        std::mem::take(&mut self.lock().emitted)
    }

    /// how many connections were opened
    pub fn connections_opened(&self) -> usize {
        self.lock().opened
    }

    /// how many connections the client closed
    pub fn connections_closed(&self) -> usize {
        self.lock().closed
    }

    /// the urls connections were opened to
    pub fn urls(&self) -> Vec<String> {
        self.lock().urls.clone()
    }
}

/// opens in-process connections to a [`MemoryServer`]
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    /// the far end
    server: MemoryServer,
}

impl MemoryConnector {
    /// make a connector and the server handle its connections talk to
    pub fn new() -> (Self, MemoryServer) {
        let server = MemoryServer::default();
        (
            Self {
                server: server.clone(),
            },
            server,
        )
    }
}

impl Connector for MemoryConnector {
    fn connect(&mut self, url: &Url, _policy: &ReconnectPolicy) -> Result<Connection> {
        let (tx, rx) = unbounded_channel();

        let id = {
            let mut state = self.server.lock();
            state.opened += 1;
            state.current = state.opened;
            state.inbound = Some(tx);
            state.urls.push(url.to_string());
            state.current
        };

        debug!(id, "opened in-memory connection to {}", url);

        Ok(Connection {
            transport: Box::new(MemoryTransport {
                server: self.server.clone(),
                id,
                closed: false,
            }),
            inbound: rx,
        })
    }
}

/// the client end of an in-memory connection
struct MemoryTransport {
    /// the far end
    server: MemoryServer,
    /// which connection this is
    id: usize,
    /// whether `close` was called
    closed: bool,
}

impl Transport for MemoryTransport {
    fn emit(&mut self, event: &str, payload: Option<Value>) -> Result<()> {
        if self.closed {
            return Err(ChatError::ConnectionClosed);
        }

        self.server.lock().emitted.push(Emitted {
            event: event.to_string(),
            payload,
        });

        Ok(())
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }

        self.closed = true;
        let mut state = self.server.lock();
        state.closed += 1;

        if state.current == self.id {
            state.inbound = None;
        }
    }
}

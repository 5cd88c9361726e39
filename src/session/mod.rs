//! the realtime chat session
//!
//! [`SessionClient`] owns one connection to the chat server plus the little
//! state a chat ui needs: whether we're connected, who we are, which room
//! we're in. server events update that state and are then handed to
//! subscribers as typed [`SessionEvent`]s
pub mod bus;
pub mod events;

pub use {
    bus::{Callback, EventBus, Subscription},
    events::{EventKind, SessionEvent},
};

use {
    crate::{
        error::Result,
        models::{
            ChatHistory, ChatMessage, CreateRoomRequest, JoinRoomRequest, Presence,
            RegisterRequest, RegisterResponse, RoomCreated, RoomUsers, SendMessageRequest,
        },
        rooms::RoomDirectory,
        transport::{Connection, Connector, Inbound, ReconnectPolicy},
    },
    events::wire,
    serde::{Serialize, de::DeserializeOwned},
    serde_json::{Value, json},
    tokio::sync::mpsc::error::TryRecvError,
    tracing::{debug, error, info, warn},
    url::Url,
};

/// a single-use roster callback
type RosterCallback = Box<dyn FnOnce(Vec<String>) + Send>;

/// a connection to a chat server and the session state that goes with it
///
/// requests are fire-and-forget: they're dropped with a log line when their
/// preconditions don't hold, and answers come back as events. nothing happens
/// to the state until inbound events are fed through [`SessionClient::next_event`],
/// [`SessionClient::pump_pending`] or [`SessionClient::handle_inbound`]
pub struct SessionClient<C: Connector> {
    /// opens connections
    connector: C,
    /// the reconnect policy handed to the connector
    policy: ReconnectPolicy,
    /// the http side of the server
    rooms: RoomDirectory,
    /// the live connection
    connection: Option<Connection>,
    /// whether the connection is up
    connected: bool,
    /// the name the server assigned us
    username: Option<String>,
    /// the room we're in (or asked to join)
    room_id: Option<String>,
    /// the subscribers
    bus: EventBus,
    /// callbacks waiting for the next roster, tied to the current connection
    roster_waiters: Vec<RosterCallback>,
}

impl<C: Connector> SessionClient<C> {
    /// make a client, nothing is connected until [`SessionClient::init`]
    pub fn new(connector: C, rooms: RoomDirectory) -> Self {
        Self {
            connector,
            policy: ReconnectPolicy::default(),
            rooms,
            connection: None,
            connected: false,
            username: None,
            room_id: None,
            bus: EventBus::new(),
            roster_waiters: Vec::new(),
        }
    }

    /// use a different reconnect policy for future connections
    pub fn with_policy(mut self, policy: ReconnectPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// (re)connect to `server_url`, tearing down any previous connection first
    ///
    /// # Errors
    ///
    /// returns an error if `server_url` isn't a valid url
    /// returns an error if the connector can't open a connection
    pub fn init(&mut self, server_url: &str) -> Result<&mut Self> {
        let url = Url::parse(server_url)?;

        if let Some(mut old) = self.connection.take() {
            debug!("closing previous connection");
            old.transport.close();
        }

        self.connected = false;
        self.roster_waiters.clear();
        self.connection = Some(self.connector.connect(&url, &self.policy)?);

        info!("session connecting to {}", url);
        Ok(self)
    }

    /// ask the server for a name, or let it pick one
    pub fn register(&mut self, username: Option<&str>) {
        if !self.connected {
            error!("not connected to server");
            return;
        }

        let request = RegisterRequest {
            username: username.map(str::to_string),
        };
        self.emit(wire::REGISTER, Some(&request));
    }

    /// ask the server to open a room for us
    pub fn create_room(&mut self, password: Option<&str>) {
        if !self.connected || self.username.is_none() {
            error!("not connected or not registered");
            return;
        }

        let request = CreateRoomRequest {
            password: non_empty(password),
        };
        self.emit(wire::CREATE_ROOM, Some(&request));
    }

    /// ask to enter `room_id`
    ///
    /// the room id is recorded right away, before the server answers
    pub fn join_room(&mut self, room_id: &str, password: Option<&str>) {
        if !self.connected || self.username.is_none() {
            error!("not connected or not registered");
            return;
        }

        self.room_id = Some(room_id.to_string());

        let request = JoinRoomRequest {
            room_id: room_id.to_string(),
            password: non_empty(password),
        };
        self.emit(wire::JOIN_ROOM, Some(&request));
    }

    /// post a message to the current room
    pub fn send_message(&mut self, content: &str) {
        if !self.connected || self.room_id.is_none() {
            error!("not connected or not in a room");
            return;
        }

        let request = SendMessageRequest {
            content: content.to_string(),
        };
        self.emit(wire::SEND_MESSAGE, Some(&request));
    }

    /// close the connection and forget the session, subscribers included
    ///
    /// does nothing if there's no connection
    pub fn disconnect(&mut self) {
        let Some(mut conn) = self.connection.take() else {
            return;
        };

        conn.transport.close();
        self.connected = false;
        self.username = None;
        self.room_id = None;
        self.bus.clear();
        self.roster_waiters.clear();

        info!("session disconnected");
    }

    /// forget who we are, where we are, and every subscriber
    ///
    /// the connection stays up
    pub fn clear_user_data(&mut self) {
        self.username = None;
        self.room_id = None;
        self.bus.clear();
    }

    /// add a subscriber, chainable
    pub fn on<F>(&mut self, kind: EventKind, callback: F) -> &mut Self
    where
        F: FnMut(&SessionEvent) + Send + 'static,
    {
        self.bus.subscribe(kind, callback);
        self
    }

    /// add a subscriber and get a handle to remove it later
    pub fn subscribe<F>(&mut self, kind: EventKind, callback: F) -> Subscription
    where
        F: FnMut(&SessionEvent) + Send + 'static,
    {
        self.bus.subscribe(kind, callback)
    }

    /// remove a subscriber, returns whether it was still registered
    pub fn unsubscribe(&mut self, sub: Subscription) -> bool {
        self.bus.unsubscribe(sub)
    }

    /// ask for the roster of the current room
    ///
    /// `callback` runs once, with the next roster the server sends
    pub fn get_room_users<F>(&mut self, callback: F)
    where
        F: FnOnce(Vec<String>) + Send + 'static,
    {
        if !self.connected || self.room_id.is_none() {
            error!("not connected or not in a room");
            return;
        }

        self.roster_waiters.push(Box::new(callback));
        self.emit::<Value>(wire::GET_ROOM_USERS, None);
    }

    /// the ids of every open room, empty if the server couldn't be asked
    pub async fn get_room_list(&self) -> Vec<String> {
        self.rooms.list_rooms().await
    }

    /// the http side of the server
    pub fn rooms(&self) -> &RoomDirectory {
        &self.rooms
    }

    /// whether the connection is up
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// the name the server assigned us
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// the room we're in
    pub fn room_id(&self) -> Option<&str> {
        self.room_id.as_deref()
    }

    /// the subscribers
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// wait for the next inbound event and apply it
    ///
    /// returns `false` once there's no connection or it's gone for good
    pub async fn next_event(&mut self) -> bool {
        let Some(conn) = self.connection.as_mut() else {
            return false;
        };

        match conn.inbound.recv().await {
            Some(inbound) => {
                self.handle_inbound(inbound);
                true
            }
            None => false,
        }
    }

    /// apply every inbound event that already arrived, returns how many
    pub fn pump_pending(&mut self) -> usize {
        let mut handled = 0;

        loop {
            let Some(conn) = self.connection.as_mut() else {
                break;
            };

            match conn.inbound.try_recv() {
                Ok(inbound) => {
                    self.handle_inbound(inbound);
                    handled += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        handled
    }

    /// apply one inbound event to the session state and notify subscribers
    pub fn handle_inbound(&mut self, inbound: Inbound) {
        match inbound {
            Inbound::Connected => {
                info!("connected to server");
                self.connected = true;
                self.bus.publish(&SessionEvent::Connect);
            }
            Inbound::Disconnected(reason) => {
                info!("disconnected from server: {}", reason);
                self.connected = false;
                self.bus.publish(&SessionEvent::Disconnect(reason));
            }
            Inbound::Error(message) => {
                error!("socket error: {}", message);
                self.bus
                    .publish(&SessionEvent::Error(json!({ "message": message })));
            }
            Inbound::Event { name, payload } => {
                self.handle_server_event(&name, payload.unwrap_or(Value::Null));
            }
        }
    }

    /// apply a named server event
    fn handle_server_event(&mut self, name: &str, payload: Value) {
        match name {
            wire::ERROR => {
                error!("server error: {}", payload);
                self.bus.publish(&SessionEvent::Error(payload));
            }
            wire::REGISTER_RESPONSE => {
                let Some(response) = decode::<RegisterResponse>(name, payload) else {
                    return;
                };

                if !response.success {
                    warn!("registration rejected");
                    return;
                }

                self.username = response.username.clone();
                info!("registered as {:?}", self.username);
                self.bus.publish(&SessionEvent::Registered(response));
            }
            wire::ROOM_CREATED => {
                let Some(created) = decode::<RoomCreated>(name, payload) else {
                    return;
                };

                self.room_id = created.room_id.clone();
                self.bus.publish(&SessionEvent::RoomCreated(created));
            }
            wire::CHAT_HISTORY => {
                let Some(history) = decode_or_default::<ChatHistory>(name, payload) else {
                    return;
                };

                if let Some(room_id) = history.room_id.filter(|id| !id.is_empty()) {
                    self.room_id = Some(room_id);
                }

                self.bus
                    .publish(&SessionEvent::ChatHistory(history.messages));
            }
            wire::NEW_MESSAGE => {
                if let Some(message) = decode::<ChatMessage>(name, payload) {
                    self.bus.publish(&SessionEvent::NewMessage(message));
                }
            }
            wire::USER_JOINED => {
                if let Some(presence) = decode_or_default::<Presence>(name, payload) {
                    self.bus.publish(&SessionEvent::UserJoined(presence));
                }
            }
            wire::USER_LEFT => {
                if let Some(presence) = decode_or_default::<Presence>(name, payload) {
                    self.bus.publish(&SessionEvent::UserLeft(presence));
                }
            }
            wire::ROOM_USERS => {
                let users = serde_json::from_value::<RoomUsers>(payload)
                    .ok()
                    .and_then(|roster| roster.users)
                    .unwrap_or_default();

                self.bus.publish(&SessionEvent::RoomUsers(users.clone()));

                for waiter in self.roster_waiters.drain(..) {
                    waiter(users.clone());
                }
            }
            other => debug!("ignoring unknown event {:?}", other),
        }
    }

    /// send an event over the current connection
    fn emit<P: Serialize>(&mut self, event: &str, payload: Option<&P>) {
        let Some(conn) = self.connection.as_mut() else {
            error!("no connection to emit {} on", event);
            return;
        };

        let payload = match payload.map(serde_json::to_value).transpose() {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "failed to encode {}", event);
                return;
            }
        };

        if let Err(e) = conn.transport.emit(event, payload) {
            error!(error = %e, "failed to emit {}", event);
        }
    }
}

/// `None` for missing or empty strings
fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// decode an event payload, logging failures
fn decode<T: DeserializeOwned>(event: &str, payload: Value) -> Option<T> {
    match serde_json::from_value(payload) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, "dropping malformed {} payload", event);
            None
        }
    }
}

/// like [`decode`], but a missing payload decodes as the default
fn decode_or_default<T: DeserializeOwned + Default>(event: &str, payload: Value) -> Option<T> {
    if payload.is_null() {
        return Some(T::default());
    }

    decode(event, payload)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            models::MessageKind,
            rooms::tests::{dead_url, directory, serve_once},
            transport::{Emitted, MemoryConnector, MemoryServer},
        },
        std::sync::{Arc, Mutex},
    };

    const SERVER: &str = "http://localhost:8000";

    fn client() -> (SessionClient<MemoryConnector>, MemoryServer) {
        let (connector, server) = MemoryConnector::new();
        (SessionClient::new(connector, directory(SERVER)), server)
    }

    /// a client that's connected and pumped
    fn connected() -> (SessionClient<MemoryConnector>, MemoryServer) {
        let (mut client, server) = client();
        client.init(SERVER).unwrap();
        server.accept();
        client.pump_pending();
        (client, server)
    }

    /// a client that's connected and registered as alice
    fn registered() -> (SessionClient<MemoryConnector>, MemoryServer) {
        let (mut client, server) = connected();
        server.send(
            wire::REGISTER_RESPONSE,
            json!({"success": true, "username": "alice"}),
        );
        client.pump_pending();
        server.take_emitted();
        (client, server)
    }

    /// a client that's registered and in room 1a2b3c4d
    fn in_room() -> (SessionClient<MemoryConnector>, MemoryServer) {
        let (mut client, server) = registered();
        server.send(wire::ROOM_CREATED, json!({"room_id": "1a2b3c4d"}));
        client.pump_pending();
        (client, server)
    }

    /// collect every event of `kind` the client publishes
    fn record(
        client: &mut SessionClient<MemoryConnector>,
        kind: EventKind,
    ) -> Arc<Mutex<Vec<SessionEvent>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        client.on(kind, move |event| sink.lock().unwrap().push(event.clone()));
        seen
    }

    fn emitted(event: &str, payload: Option<Value>) -> Emitted {
        Emitted {
            event: event.to_string(),
            payload,
        }
    }

    #[test]
    fn test_requests_while_disconnected_emit_nothing() {
        let (mut client, server) = client();
        client.init(SERVER).unwrap();

        client.register(Some("alice"));
        client.create_room(None);
        client.join_room("1a2b3c4d", None);
        client.send_message("hello");
        client.get_room_users(|_| panic!("no roster expected"));

        assert!(server.emitted().is_empty());
        assert_eq!(client.room_id(), None);
    }

    #[test]
    fn test_requests_without_a_connection_at_all() {
        let (mut client, server) = client();

        client.register(None);
        client.send_message("hello");
        client.disconnect();

        assert!(server.emitted().is_empty());
        assert_eq!(server.connections_opened(), 0);
        assert_eq!(client.pump_pending(), 0);
    }

    #[test]
    fn test_connect_and_disconnect_events() {
        let (mut client, server) = client();
        let connects = record(&mut client, EventKind::Connect);
        let drops = record(&mut client, EventKind::Disconnect);

        client.init(SERVER).unwrap();
        assert!(!client.is_connected());

        server.accept();
        client.pump_pending();
        assert!(client.is_connected());

        server.drop_connection("transport close");
        client.pump_pending();
        assert!(!client.is_connected());

        assert_eq!(*connects.lock().unwrap(), [SessionEvent::Connect]);
        assert_eq!(
            *drops.lock().unwrap(),
            [SessionEvent::Disconnect("transport close".to_string())]
        );
    }

    #[test]
    fn test_register_flow() {
        let (mut client, server) = connected();
        let registered = record(&mut client, EventKind::Registered);
        let also = record(&mut client, EventKind::Registered);

        client.register(Some("alice"));
        assert_eq!(
            server.take_emitted(),
            [emitted(wire::REGISTER, Some(json!({"username": "alice"})))]
        );
        assert_eq!(client.username(), None);

        server.send(
            wire::REGISTER_RESPONSE,
            json!({"success": true, "username": "alice"}),
        );
        client.pump_pending();

        let expected = SessionEvent::Registered(RegisterResponse {
            success: true,
            username: Some("alice".to_string()),
        });
        assert_eq!(client.username(), Some("alice"));
        assert_eq!(*registered.lock().unwrap(), [expected.clone()]);
        assert_eq!(*also.lock().unwrap(), [expected]);
    }

    #[test]
    fn test_register_without_name_lets_server_pick() {
        let (mut client, server) = connected();
        client.register(None);
        assert_eq!(
            server.take_emitted(),
            [emitted(wire::REGISTER, Some(json!({})))]
        );
    }

    #[test]
    fn test_failed_registration_is_silent() {
        let (mut client, server) = connected();
        let registered = record(&mut client, EventKind::Registered);

        server.send(wire::REGISTER_RESPONSE, json!({"success": false}));
        client.pump_pending();

        assert_eq!(client.username(), None);
        assert!(registered.lock().unwrap().is_empty());
    }

    #[test]
    fn test_create_room_needs_registration() {
        let (mut client, server) = connected();
        client.create_room(Some("secret"));
        assert!(server.emitted().is_empty());

        let (mut client, server) = registered();
        client.create_room(Some("secret"));
        client.create_room(Some(""));
        assert_eq!(
            server.take_emitted(),
            [
                emitted(wire::CREATE_ROOM, Some(json!({"password": "secret"}))),
                emitted(wire::CREATE_ROOM, Some(json!({}))),
            ]
        );
    }

    #[test]
    fn test_room_created_sets_room() {
        let (mut client, server) = registered();
        let created = record(&mut client, EventKind::RoomCreated);

        server.send(wire::ROOM_CREATED, json!({"room_id": "1a2b3c4d"}));
        client.pump_pending();

        assert_eq!(client.room_id(), Some("1a2b3c4d"));
        assert_eq!(
            *created.lock().unwrap(),
            [SessionEvent::RoomCreated(RoomCreated {
                room_id: Some("1a2b3c4d".to_string())
            })]
        );
    }

    #[test]
    fn test_room_created_without_id_still_notifies() {
        let (mut client, server) = in_room();
        let created = record(&mut client, EventKind::RoomCreated);

        server.send(wire::ROOM_CREATED, json!({}));
        client.pump_pending();

        assert_eq!(client.room_id(), None);
        assert_eq!(
            *created.lock().unwrap(),
            [SessionEvent::RoomCreated(RoomCreated::default())]
        );
    }

    #[test]
    fn test_join_room_is_optimistic() {
        let (mut client, server) = registered();

        client.join_room("deadbeef", Some("pw"));
        assert_eq!(client.room_id(), Some("deadbeef"));
        assert_eq!(
            server.take_emitted(),
            [emitted(
                wire::JOIN_ROOM,
                Some(json!({"room_id": "deadbeef", "password": "pw"}))
            )]
        );

        // a rejection doesn't roll the room back
        server.send(wire::ERROR, json!({"message": "room does not exist"}));
        client.pump_pending();
        assert_eq!(client.room_id(), Some("deadbeef"));
    }

    #[test]
    fn test_chat_history() {
        let (mut client, server) = registered();
        let history = record(&mut client, EventKind::ChatHistory);

        server.send(
            wire::CHAT_HISTORY,
            json!({
                "room_id": "cafebabe",
                "messages": [
                    {"type": "system", "content": "alice joined"},
                    {"type": "user", "username": "bob", "content": "hey", "timestamp": "1"},
                ],
            }),
        );
        server.send(wire::CHAT_HISTORY, json!({"room_id": "", "messages": []}));
        client.pump_pending();

        assert_eq!(client.room_id(), Some("cafebabe"));

        let history = history.lock().unwrap();
        assert_eq!(history.len(), 2);
        let SessionEvent::ChatHistory(messages) = &history[0] else {
            panic!("expected history, got {:?}", history[0]);
        };
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].kind, MessageKind::System);
        assert_eq!(messages[1].username.as_deref(), Some("bob"));
    }

    #[test]
    fn test_send_message_needs_a_room() {
        let (mut client, server) = registered();
        client.send_message("hello");
        assert!(server.emitted().is_empty());

        let (mut client, server) = in_room();
        client.send_message("hello");
        assert_eq!(
            server.take_emitted(),
            [emitted(wire::SEND_MESSAGE, Some(json!({"content": "hello"})))]
        );
    }

    #[test]
    fn test_events_are_not_sequenced() {
        let (mut client, server) = connected();
        let messages = record(&mut client, EventKind::NewMessage);

        server.send(
            wire::NEW_MESSAGE,
            json!({"type": "user", "username": "bob", "content": "early"}),
        );
        server.send(wire::NEW_MESSAGE, json!("not an object"));
        client.pump_pending();

        let messages = messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        let SessionEvent::NewMessage(msg) = &messages[0] else {
            panic!("expected a message, got {:?}", messages[0]);
        };
        assert_eq!(msg.content, "early");
    }

    #[test]
    fn test_presence_and_errors() {
        let (mut client, server) = in_room();
        let joined = record(&mut client, EventKind::UserJoined);
        let left = record(&mut client, EventKind::UserLeft);
        let errors = record(&mut client, EventKind::Error);

        server.send(
            wire::USER_JOINED,
            json!({"username": "bob", "message": {"type": "system", "content": "bob joined"}}),
        );
        server.send(wire::USER_LEFT, json!({"username": "bob"}));
        server.send(wire::ERROR, json!({"message": "user not in a room"}));
        server.push(Inbound::Error("connection refused".to_string()));
        server.send("something_new", json!({}));
        client.pump_pending();

        assert_eq!(joined.lock().unwrap().len(), 1);
        assert_eq!(
            *left.lock().unwrap(),
            [SessionEvent::UserLeft(Presence {
                username: Some("bob".to_string()),
                message: None,
            })]
        );
        assert_eq!(
            *errors.lock().unwrap(),
            [
                SessionEvent::Error(json!({"message": "user not in a room"})),
                SessionEvent::Error(json!({"message": "connection refused"})),
            ]
        );
    }

    #[test]
    fn test_room_users_defaults_to_empty() {
        let (mut client, server) = in_room();
        let rosters = record(&mut client, EventKind::RoomUsers);

        server.send(wire::ROOM_USERS, json!({"users": ["alice", "bob"]}));
        server.send(wire::ROOM_USERS, json!({}));
        server.push(Inbound::Event {
            name: wire::ROOM_USERS.to_string(),
            payload: None,
        });
        client.pump_pending();

        assert_eq!(
            *rosters.lock().unwrap(),
            [
                SessionEvent::RoomUsers(vec!["alice".to_string(), "bob".to_string()]),
                SessionEvent::RoomUsers(vec![]),
                SessionEvent::RoomUsers(vec![]),
            ]
        );
    }

    #[test]
    fn test_get_room_users_fires_once() {
        let (mut client, server) = in_room();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();

        client.get_room_users(move |users| sink.lock().unwrap().push(users));
        assert_eq!(
            server.take_emitted(),
            [emitted(wire::GET_ROOM_USERS, None)]
        );

        server.send(wire::ROOM_USERS, json!({"users": ["alice"]}));
        server.send(wire::ROOM_USERS, json!({"users": ["alice", "bob"]}));
        client.pump_pending();

        assert_eq!(*calls.lock().unwrap(), [vec!["alice".to_string()]]);
    }

    #[test]
    fn test_get_room_users_needs_a_room() {
        let (mut client, server) = registered();
        client.get_room_users(|_| panic!("no roster expected"));
        server.send(wire::ROOM_USERS, json!({"users": ["alice"]}));
        client.pump_pending();
        assert!(server.emitted().is_empty());
    }

    #[test]
    fn test_disconnect_clears_everything() {
        let (mut client, server) = in_room();
        let messages = record(&mut client, EventKind::NewMessage);

        client.disconnect();

        assert!(!client.is_connected());
        assert_eq!(client.username(), None);
        assert_eq!(client.room_id(), None);
        assert!(client.bus().is_empty());
        assert_eq!(server.connections_closed(), 1);

        assert!(!server.send(wire::NEW_MESSAGE, json!({"content": "late"})));
        client.handle_inbound(Inbound::event(wire::NEW_MESSAGE, json!({"content": "late"})));
        assert!(messages.lock().unwrap().is_empty());

        client.disconnect();
        assert_eq!(server.connections_closed(), 1);
    }

    #[test]
    fn test_clear_user_data_keeps_connection() {
        let (mut client, server) = in_room();
        let messages = record(&mut client, EventKind::NewMessage);

        client.clear_user_data();

        assert!(client.is_connected());
        assert_eq!(client.username(), None);
        assert_eq!(client.room_id(), None);
        assert_eq!(server.connections_closed(), 0);

        server.send(wire::NEW_MESSAGE, json!({"content": "still here"}));
        client.pump_pending();
        assert!(messages.lock().unwrap().is_empty());
    }

    #[test]
    fn test_init_replaces_connection() {
        let (mut client, server) = in_room();
        client.get_room_users(|_| panic!("waiter belongs to the old connection"));

        client.init("http://localhost:9000").unwrap();
        assert!(!client.is_connected());
        assert_eq!(server.connections_opened(), 2);
        assert_eq!(server.connections_closed(), 1);
        assert_eq!(
            server.urls(),
            ["http://localhost:8000/", "http://localhost:9000/"]
        );

        server.accept();
        server.send(wire::ROOM_USERS, json!({"users": []}));
        client.pump_pending();
        assert!(client.is_connected());
    }

    #[test]
    fn test_init_rejects_bad_urls() {
        let (mut client, server) = client();
        assert!(client.init("not a url").is_err());
        assert_eq!(server.connections_opened(), 0);
    }

    #[test]
    fn test_unsubscribe_handle() {
        let (mut client, server) = connected();
        let seen = Arc::new(Mutex::new(0));
        let sink = seen.clone();

        let sub = client.subscribe(EventKind::NewMessage, move |_| *sink.lock().unwrap() += 1);
        server.send(wire::NEW_MESSAGE, json!({"content": "one"}));
        client.pump_pending();

        assert!(client.unsubscribe(sub));
        server.send(wire::NEW_MESSAGE, json!({"content": "two"}));
        client.pump_pending();

        assert_eq!(*seen.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_next_event_waits_for_events() {
        let (mut client, server) = client();
        client.init(SERVER).unwrap();

        let pusher = server.clone();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            pusher.accept();
        });

        assert!(client.next_event().await);
        assert!(client.is_connected());

        client.disconnect();
        assert!(!client.next_event().await);
    }

    #[tokio::test]
    async fn test_get_room_list() {
        let (connector, _server) = MemoryConnector::new();
        let base = serve_once("200 OK", r#"{"rooms":["1a2b3c4d"]}"#).await;
        let client = SessionClient::new(connector, directory(&base));
        assert_eq!(client.get_room_list().await, ["1a2b3c4d"]);

        let (connector, _server) = MemoryConnector::new();
        let client = SessionClient::new(connector, directory(&dead_url().await));
        assert!(client.get_room_list().await.is_empty());
    }
}

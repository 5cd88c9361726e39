//! session events and the wire names behind them
use {
    crate::models::{ChatMessage, Presence, RegisterResponse, RoomCreated},
    serde_json::Value,
    std::{fmt, str::FromStr},
};

/// event names as they appear on the wire
pub mod wire {
    /// out: ask for a name
    pub const REGISTER: &str = "register";
    /// out: open a room
    pub const CREATE_ROOM: &str = "create_room_event";
    /// out: enter a room
    pub const JOIN_ROOM: &str = "join_room_event";
    /// out: post a message
    pub const SEND_MESSAGE: &str = "send_message";
    /// out: ask for the roster
    pub const GET_ROOM_USERS: &str = "get_room_users";

    /// in: server-side failure
    pub const ERROR: &str = "error";
    /// in: answer to `register`
    pub const REGISTER_RESPONSE: &str = "register_response";
    /// in: a room was opened for us
    pub const ROOM_CREATED: &str = "room_created";
    /// in: the backlog of the room we entered
    pub const CHAT_HISTORY: &str = "chat_history";
    /// in: someone posted
    pub const NEW_MESSAGE: &str = "new_message";
    /// in: someone entered
    pub const USER_JOINED: &str = "user_joined";
    /// in: someone left
    pub const USER_LEFT: &str = "user_left";
    /// in: the roster changed
    pub const ROOM_USERS: &str = "room_users";
}

/// what subscribers can listen for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// the connection came up
    Connect,
    /// the connection went down
    Disconnect,
    /// the server or the transport reported an error
    Error,
    /// registration succeeded
    Registered,
    /// a room was created for us
    RoomCreated,
    /// the backlog of a room arrived
    ChatHistory,
    /// a message arrived
    NewMessage,
    /// someone joined the room
    UserJoined,
    /// someone left the room
    UserLeft,
    /// the roster changed
    RoomUsers,
}

impl EventKind {
    /// every kind
    pub const ALL: [EventKind; 10] = [
        EventKind::Connect,
        EventKind::Disconnect,
        EventKind::Error,
        EventKind::Registered,
        EventKind::RoomCreated,
        EventKind::ChatHistory,
        EventKind::NewMessage,
        EventKind::UserJoined,
        EventKind::UserLeft,
        EventKind::RoomUsers,
    ];

    /// the subscriber-facing name, e.g. `roomCreated`
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Connect => "connect",
            EventKind::Disconnect => "disconnect",
            EventKind::Error => "error",
            EventKind::Registered => "registered",
            EventKind::RoomCreated => "roomCreated",
            EventKind::ChatHistory => "chatHistory",
            EventKind::NewMessage => "newMessage",
            EventKind::UserJoined => "userJoined",
            EventKind::UserLeft => "userLeft",
            EventKind::RoomUsers => "roomUsers",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown event kind: {}", s))
    }
}

/// something subscribers get told about
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// the connection came up
    Connect,
    /// the connection went down, with the transport's reason
    Disconnect(String),
    /// an error payload, passed through as-is
    Error(Value),
    /// registration succeeded
    Registered(RegisterResponse),
    /// a room was created for us
    RoomCreated(RoomCreated),
    /// the backlog of the room we're in
    ChatHistory(Vec<ChatMessage>),
    /// a new message
    NewMessage(ChatMessage),
    /// someone joined
    UserJoined(Presence),
    /// someone left
    UserLeft(Presence),
    /// the current roster
    RoomUsers(Vec<String>),
}

impl SessionEvent {
    /// the kind subscribers register for
    pub fn kind(&self) -> EventKind {
        match self {
            SessionEvent::Connect => EventKind::Connect,
            SessionEvent::Disconnect(_) => EventKind::Disconnect,
            SessionEvent::Error(_) => EventKind::Error,
            SessionEvent::Registered(_) => EventKind::Registered,
            SessionEvent::RoomCreated(_) => EventKind::RoomCreated,
            SessionEvent::ChatHistory(_) => EventKind::ChatHistory,
            SessionEvent::NewMessage(_) => EventKind::NewMessage,
            SessionEvent::UserJoined(_) => EventKind::UserJoined,
            SessionEvent::UserLeft(_) => EventKind::UserLeft,
            SessionEvent::RoomUsers(_) => EventKind::RoomUsers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_parse_back() {
        for kind in EventKind::ALL {
            assert_eq!(kind.as_str().parse::<EventKind>(), Ok(kind));
        }

        assert!("room_created".parse::<EventKind>().is_err());
    }
}

//! payloads exchanged with the chat server
use {
    serde::{Deserialize, Serialize},
    serde_json::{Map, Value},
};

/// who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// a message written by a user
    #[default]
    User,
    /// a join/leave notice generated by the server
    System,
    /// anything newer servers may send
    #[serde(other)]
    Other,
}

/// a message in a room
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatMessage {
    /// who wrote it
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
    /// the author (absent on system messages)
    #[serde(default)]
    pub username: Option<String>,
    /// the text
    #[serde(default)]
    pub content: String,
    /// the server's message id/timestamp
    #[serde(default)]
    pub timestamp: Option<String>,
    /// any other fields the server attached
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `register_response`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// whether the server accepted the registration
    #[serde(default)]
    pub success: bool,
    /// the name the server assigned
    #[serde(default)]
    pub username: Option<String>,
}

/// `room_created`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoomCreated {
    /// the new room
    #[serde(default)]
    pub room_id: Option<String>,
}

/// `chat_history`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatHistory {
    /// the room the history belongs to
    #[serde(default)]
    pub room_id: Option<String>,
    /// the messages, oldest first
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

/// `user_joined`/`user_left`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Presence {
    /// who joined/left
    #[serde(default)]
    pub username: Option<String>,
    /// the system message announcing it
    #[serde(default)]
    pub message: Option<ChatMessage>,
}

/// `room_users`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoomUsers {
    /// the roster
    #[serde(default)]
    pub users: Option<Vec<String>>,
}

/// `GET /rooms`
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RoomList {
    /// ids of the open rooms
    #[serde(default)]
    pub rooms: Option<Vec<String>>,
}

/// `GET /random-username`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RandomUsername {
    /// the suggested name
    pub username: String,
}

/// `GET /health`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Health {
    /// `"ok"` when the server is fine
    pub status: String,
}

/// `register`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterRequest {
    /// the wanted name, left out to let the server pick one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// `create_room_event`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateRoomRequest {
    /// the room password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// `join_room_event`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinRoomRequest {
    /// the room to join
    pub room_id: String,
    /// the room password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// `send_message`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendMessageRequest {
    /// the text
    pub content: String,
}

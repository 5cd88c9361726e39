//! error handling stuff
use thiserror::Error;

#[derive(Debug, Error)]
/// An error
pub enum ChatError {
    /// an IO error
    #[error("i/o error: {0}")]
    IO(#[from] std::io::Error),

    /// a redb database error
    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    /// a redb transaction error
    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    /// a redb table error
    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    /// a redb storage error
    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    /// a redb commit error
    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    /// a reqwest error
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// a json error
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// a url parse error
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// a websocket error
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// the server broke the socket.io handshake
    #[error("handshake failed: {0}")]
    Handshake(String),

    /// a malformed socket.io packet
    #[error("malformed packet: {0}")]
    Packet(String),

    /// the connection task is gone
    #[error("connection closed")]
    ConnectionClosed,

    /// a custom error
    #[error("error: {0}")]
    Other(String),
}

/// A result using [`ChatError`] as the `Err` variant
pub type Result<T, U = ChatError> = miette::Result<T, U>;

//! socket.io (v5) over engine.io (v4) text frames
//!
//! one websocket text frame carries one engine.io packet. a socket.io packet
//! rides inside an engine.io `message` packet, so an event looks like
//! `42["new_message",{...}]`. binary packets and acks aren't supported
use {
    crate::error::{ChatError, Result},
    serde::Deserialize,
    serde_json::Value,
};

/// the engine.io `open` payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    /// the engine.io session id
    pub sid: String,
    /// transports the server can upgrade to
    #[serde(default)]
    pub upgrades: Vec<String>,
    /// how often the server pings, in ms
    pub ping_interval: u64,
    /// how long the server waits for a pong, in ms
    pub ping_timeout: u64,
    /// the max payload size in bytes
    #[serde(default)]
    pub max_payload: Option<u64>,
}

/// a decoded frame
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    /// engine.io open
    Open(Handshake),
    /// engine.io close
    Close,
    /// engine.io ping
    Ping,
    /// engine.io pong
    Pong,
    /// engine.io noop
    Noop,
    /// socket.io connect (request from the client, ack from the server)
    Connect(Option<Value>),
    /// socket.io disconnect
    Disconnect,
    /// socket.io event
    Event {
        /// the event name
        name: String,
        /// the first argument
        payload: Option<Value>,
    },
    /// socket.io connect error
    ConnectError(Value),
}

/// decode a text frame
pub fn decode(frame: &str) -> Result<Packet> {
    let mut chars = frame.chars();
    let kind = chars
        .next()
        .ok_or_else(|| ChatError::Packet("empty frame".to_string()))?;
    let rest = chars.as_str();

    match kind {
        '0' => Ok(Packet::Open(serde_json::from_str(rest)?)),
        '1' => Ok(Packet::Close),
        '2' => Ok(Packet::Ping),
        '3' => Ok(Packet::Pong),
        '4' => decode_message(rest),
        '6' => Ok(Packet::Noop),
        other => Err(ChatError::Packet(format!(
            "unsupported engine.io packet type {:?}",
            other
        ))),
    }
}

/// decode the socket.io packet inside an engine.io message
fn decode_message(msg: &str) -> Result<Packet> {
    let mut chars = msg.chars();
    let kind = chars
        .next()
        .ok_or_else(|| ChatError::Packet("empty message".to_string()))?;
    let body = skip_ack_id(skip_namespace(chars.as_str()));

    match kind {
        '0' => Ok(Packet::Connect(parse_optional(body)?)),
        '1' => Ok(Packet::Disconnect),
        '2' => decode_event(body),
        '4' => Ok(Packet::ConnectError(
            parse_optional(body)?.unwrap_or(Value::Null),
        )),
        other => Err(ChatError::Packet(format!(
            "unsupported socket.io packet type {:?}",
            other
        ))),
    }
}

/// decode `["name", payload, ...]`
fn decode_event(body: &str) -> Result<Packet> {
    let args: Vec<Value> = serde_json::from_str(body)?;
    let mut args = args.into_iter();

    let Some(Value::String(name)) = args.next() else {
        return Err(ChatError::Packet(format!("event without a name: {}", body)));
    };

    Ok(Packet::Event {
        name,
        payload: args.next(),
    })
}

/// drop a `/namespace,` prefix
fn skip_namespace(body: &str) -> &str {
    if body.starts_with('/') {
        match body.find(',') {
            Some(idx) => &body[idx + 1..],
            None => "",
        }
    } else {
        body
    }
}

/// drop a numeric ack id
fn skip_ack_id(body: &str) -> &str {
    body.trim_start_matches(|c: char| c.is_ascii_digit())
}

/// parse json if there is any
fn parse_optional(body: &str) -> Result<Option<Value>> {
    if body.is_empty() {
        Ok(None)
    } else {
        Ok(Some(serde_json::from_str(body)?))
    }
}

/// encode a packet as a text frame
pub fn encode(packet: &Packet) -> String {
    match packet {
        Packet::Open(h) => format!(
            "0{}",
            serde_json::json!({
                "sid": h.sid,
                "upgrades": h.upgrades,
                "pingInterval": h.ping_interval,
                "pingTimeout": h.ping_timeout,
                "maxPayload": h.max_payload,
            })
        ),
        Packet::Close => "1".to_string(),
        Packet::Ping => "2".to_string(),
        Packet::Pong => "3".to_string(),
        Packet::Noop => "6".to_string(),
        Packet::Connect(None) => "40".to_string(),
        Packet::Connect(Some(data)) => format!("40{}", data),
        Packet::Disconnect => "41".to_string(),
        Packet::Event { name, payload } => {
            let mut args = vec![Value::String(name.clone())];
            args.extend(payload.iter().cloned());
            format!("42{}", Value::Array(args))
        }
        Packet::ConnectError(data) => format!("44{}", data),
    }
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn test_decode_open() {
        let packet = decode(
            r#"0{"sid":"lv_VI97HAXpY6yYWAAAC","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#,
        )
        .unwrap();

        let Packet::Open(h) = packet else {
            panic!("expected open, got {:?}", packet);
        };
        assert_eq!(h.sid, "lv_VI97HAXpY6yYWAAAC");
        assert_eq!(h.ping_interval, 25000);
        assert_eq!(h.ping_timeout, 20000);
        assert_eq!(h.max_payload, Some(1_000_000));
    }

    #[test]
    fn test_decode_event_with_payload() {
        let packet =
            decode(r#"42["room_created",{"room_id":"1a2b3c4d"}]"#).unwrap();
        assert_eq!(
            packet,
            Packet::Event {
                name: "room_created".to_string(),
                payload: Some(json!({"room_id": "1a2b3c4d"})),
            }
        );
    }

    #[test]
    fn test_decode_event_in_namespace_with_ack() {
        let packet = decode(r#"42/chat,17["get_room_users"]"#).unwrap();
        assert_eq!(
            packet,
            Packet::Event {
                name: "get_room_users".to_string(),
                payload: None,
            }
        );
    }

    #[test]
    fn test_decode_connect_and_errors() {
        assert_eq!(
            decode(r#"40{"sid":"abc"}"#).unwrap(),
            Packet::Connect(Some(json!({"sid": "abc"})))
        );
        assert_eq!(decode("41").unwrap(), Packet::Disconnect);
        assert_eq!(
            decode(r#"44{"message":"nope"}"#).unwrap(),
            Packet::ConnectError(json!({"message": "nope"}))
        );
        assert_eq!(decode("2").unwrap(), Packet::Ping);
        assert_eq!(decode("6").unwrap(), Packet::Noop);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode("").is_err());
        assert!(decode("9").is_err());
        assert!(decode("45[]").is_err());
        assert!(decode(r#"42[1,2]"#).is_err());
        assert!(decode("42{not json").is_err());
    }

    #[test]
    fn test_encode_client_frames() {
        assert_eq!(encode(&Packet::Connect(None)), "40");
        assert_eq!(encode(&Packet::Pong), "3");
        assert_eq!(encode(&Packet::Disconnect), "41");
        assert_eq!(
            encode(&Packet::Event {
                name: "send_message".to_string(),
                payload: Some(json!({"content": "hi"})),
            }),
            r#"42["send_message",{"content":"hi"}]"#
        );
        assert_eq!(
            encode(&Packet::Event {
                name: "get_room_users".to_string(),
                payload: None,
            }),
            r#"42["get_room_users"]"#
        );
    }
}

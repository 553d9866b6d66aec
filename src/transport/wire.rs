// Wire message codec for the webrpc protocol
//
// Every frame on the socket is one JSON object: a message type tag, an
// optional ack number, an optional event name, and positional JSON
// arguments. Fields that are zero/empty are omitted entirely, matching the
// server's encoding.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of low-level message carried by a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MessageType {
    /// Handshake marker exchanged when the connection opens
    Init,
    /// A named event with positional arguments
    Event,
    /// A reply to an event that requested an ack
    Reply,
    /// Server keepalive probe
    Ping,
    /// Keepalive answer
    Pong,
}

impl From<MessageType> for u8 {
    fn from(kind: MessageType) -> u8 {
        match kind {
            MessageType::Init => 0,
            MessageType::Event => 1,
            MessageType::Reply => 2,
            MessageType::Ping => 3,
            MessageType::Pong => 4,
        }
    }
}

impl TryFrom<u8> for MessageType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MessageType::Init),
            1 => Ok(MessageType::Event),
            2 => Ok(MessageType::Reply),
            3 => Ok(MessageType::Ping),
            4 => Ok(MessageType::Pong),
            other => Err(format!("unknown message type {other}")),
        }
    }
}

/// A raw protocol message, as serialized on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: MessageType,

    /// Ack number correlating an Event with its Reply; 0 means "no ack"
    #[serde(default, skip_serializing_if = "is_zero")]
    pub ack: i64,

    /// Event name; only meaningful for Event and Reply frames
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Positional arguments, each an arbitrary JSON value
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<Value>,
}

fn is_zero(ack: &i64) -> bool {
    *ack == 0
}

impl Message {
    /// Build an outbound named event.
    pub fn event(name: impl Into<String>, data: Vec<Value>) -> Self {
        Self {
            kind: MessageType::Event,
            ack: 0,
            name: name.into(),
            data,
        }
    }

    /// Handshake echo sent in response to the server's Init frame.
    pub fn init() -> Self {
        Self::bare(MessageType::Init)
    }

    /// Keepalive answer to a server Ping.
    pub fn pong() -> Self {
        Self::bare(MessageType::Pong)
    }

    fn bare(kind: MessageType) -> Self {
        Self {
            kind,
            ack: 0,
            name: String::new(),
            data: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_frame_matches_server_encoding() {
        let msg = Message::event("msg", vec![json!("#welcome"), json!("hello")]);
        let encoded = serde_json::to_string(&msg).unwrap();

        // Zero ack must be omitted, matching the server's omitempty fields
        assert_eq!(
            encoded,
            r##"{"type":1,"name":"msg","data":["#welcome","hello"]}"##
        );
    }

    #[test]
    fn bare_frames_omit_empty_fields() {
        assert_eq!(serde_json::to_string(&Message::pong()).unwrap(), r#"{"type":4}"#);
        assert_eq!(serde_json::to_string(&Message::init()).unwrap(), r#"{"type":0}"#);
    }

    #[test]
    fn decodes_inbound_event_with_defaults() {
        let msg: Message =
            serde_json::from_str(r##"{"type":1,"name":"join","data":["2024-05-01T12:00:00Z","alice","#welcome"]}"##)
                .unwrap();

        assert_eq!(msg.kind, MessageType::Event);
        assert_eq!(msg.ack, 0);
        assert_eq!(msg.name, "join");
        assert_eq!(msg.data.len(), 3);
    }

    #[test]
    fn decodes_ping_without_name_or_data() {
        let msg: Message = serde_json::from_str(r#"{"type":3}"#).unwrap();
        assert_eq!(msg.kind, MessageType::Ping);
        assert!(msg.name.is_empty());
        assert!(msg.data.is_empty());
    }

    #[test]
    fn rejects_unknown_message_type() {
        let result: Result<Message, _> = serde_json::from_str(r#"{"type":9}"#);
        assert!(result.is_err());
    }
}

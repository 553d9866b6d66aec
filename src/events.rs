// Chat events decoded from the transport's named events
//
// The server announces three kinds: `join`, `part`, and `msg`. Each carries
// a timestamp, the user it concerns, and a kind-specific payload. Events of
// any other name are not ours to handle and are skipped; events with the
// right name but the wrong shape are dropped (logged by the dispatcher) -
// a missing log line, never a crash.

use crate::transport::ChannelEvent;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

/// A decoded inbound chat event.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    /// A user entered a channel
    Join {
        ts: DateTime<Utc>,
        user: String,
        channel: String,
    },
    /// A user left a channel
    Part {
        ts: DateTime<Utc>,
        user: String,
        channel: String,
    },
    /// A user said something
    Msg {
        ts: DateTime<Utc>,
        user: String,
        text: String,
    },
}

impl ChatEvent {
    /// Decode a transport event into a chat event.
    ///
    /// Returns `Ok(None)` for event names this client does not subscribe
    /// to, and an error when a known kind arrives with the wrong shape.
    pub fn decode(event: &ChannelEvent) -> Result<Option<ChatEvent>> {
        let decoded = match event.name.as_str() {
            "join" => {
                let (ts, user, channel) = triple(event)?;
                ChatEvent::Join { ts, user, channel }
            }
            "part" => {
                let (ts, user, channel) = triple(event)?;
                ChatEvent::Part { ts, user, channel }
            }
            "msg" => {
                let (ts, user, text) = triple(event)?;
                ChatEvent::Msg { ts, user, text }
            }
            _ => return Ok(None),
        };

        Ok(Some(decoded))
    }
}

/// All three inbound kinds share the (timestamp, user, payload) shape.
fn triple(event: &ChannelEvent) -> Result<(DateTime<Utc>, String, String)> {
    if event.args.len() != 3 {
        bail!(
            "{} event carries {} arguments, expected 3",
            event.name,
            event.args.len()
        );
    }

    Ok((arg(event, 0)?, arg(event, 1)?, arg(event, 2)?))
}

fn arg<T: DeserializeOwned>(event: &ChannelEvent, index: usize) -> Result<T> {
    serde_json::from_value(event.args[index].clone())
        .with_context(|| format!("argument {index} of {} event", event.name))
}

// Transport channel - WebSocket client for the chat server
//
// The connection is split into two background tasks joined by mpsc queues:
// - read loop: parses frames, answers protocol messages (Ping, Init)
//   and delivers Event frames to the consumer queue in arrival order
// - write loop: drains the send queue and writes frames to the socket
//
// Consumers receive named events from a single queue, so processing order
// is exactly delivery order. Outbound emits are fire-and-forget: a full or
// closed send queue drops the frame with a log line rather than blocking.

pub mod wire;

use anyhow::{Context, Result};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use wire::{Message, MessageType};

/// Queue depth for both the send queue and the inbound event queue
const QUEUE_LENGTH: usize = 256;

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, WsMessage>;
type WsStream = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// A named event delivered by the server, with positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelEvent {
    pub name: String,
    pub args: Vec<Value>,
}

/// Handle for publishing events to the server.
///
/// Cheap to clone; all clones feed the same send queue.
#[derive(Clone)]
pub struct Channel {
    sendq: mpsc::Sender<Message>,
}

impl Channel {
    pub(crate) fn new(sendq: mpsc::Sender<Message>) -> Self {
        Self { sendq }
    }

    /// Publish a named event. Best-effort: no delivery confirmation, and a
    /// full or closed send queue drops the frame.
    pub fn emit(&self, name: &str, args: Vec<Value>) {
        let msg = Message::event(name, args);
        if let Err(e) = self.sendq.try_send(msg) {
            tracing::warn!("dropping outbound {name} event: {e}");
        }
    }
}

/// Connect to a chat server and start the socket loops.
///
/// Returns the publish handle and the inbound event queue. The queue closes
/// when the server disconnects; there is no automatic reconnect.
pub async fn connect(endpoint: &str) -> Result<(Channel, mpsc::Receiver<ChannelEvent>)> {
    let (socket, _response) = connect_async(endpoint)
        .await
        .with_context(|| format!("failed to connect to {endpoint}"))?;
    tracing::info!("connected to {endpoint}");

    let (sink, stream) = socket.split();
    let (sendq_tx, sendq_rx) = mpsc::channel(QUEUE_LENGTH);
    let (event_tx, event_rx) = mpsc::channel(QUEUE_LENGTH);

    tokio::spawn(write_loop(sink, sendq_rx));
    tokio::spawn(read_loop(stream, event_tx, sendq_tx.clone()));

    Ok((Channel::new(sendq_tx), event_rx))
}

/// What the read loop should do with a parsed frame.
#[derive(Debug, PartialEq)]
enum Route {
    /// Protocol frame answered in-line (Ping -> Pong, Init -> Init)
    Respond(Message),
    /// Named event, forwarded to the consumer queue
    Deliver(ChannelEvent),
    /// Frame this client has no use for (Reply, stray Pong)
    Ignore,
}

fn route(msg: Message) -> Route {
    match msg.kind {
        MessageType::Ping => Route::Respond(Message::pong()),
        MessageType::Init => Route::Respond(Message::init()),
        MessageType::Event => Route::Deliver(ChannelEvent {
            name: msg.name,
            args: msg.data,
        }),
        // This client never requests acks, so replies carry nothing for us
        MessageType::Reply | MessageType::Pong => Route::Ignore,
    }
}

async fn read_loop(
    mut stream: WsStream,
    events: mpsc::Sender<ChannelEvent>,
    sendq: mpsc::Sender<Message>,
) {
    while let Some(frame) = stream.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("websocket read failed: {e}");
                break;
            }
        };

        let text = match frame {
            WsMessage::Text(text) => text,
            WsMessage::Close(_) => {
                tracing::info!("server closed the connection");
                break;
            }
            // WebSocket-level ping/pong is handled by tungstenite itself;
            // the protocol's own keepalive rides in Text frames
            _ => continue,
        };

        let msg: Message = match serde_json::from_str(&text) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!("invalid frame from server: {e}");
                break;
            }
        };

        match route(msg) {
            Route::Respond(reply) => {
                if sendq.send(reply).await.is_err() {
                    break;
                }
            }
            Route::Deliver(event) => {
                if events.send(event).await.is_err() {
                    // Consumer is gone; nothing left to deliver to
                    break;
                }
            }
            Route::Ignore => {}
        }
    }
    // Dropping `events` closes the consumer queue, which is how the rest of
    // the app observes the disconnect
}

async fn write_loop(mut sink: WsSink, mut sendq: mpsc::Receiver<Message>) {
    while let Some(msg) = sendq.recv().await {
        let text = match serde_json::to_string(&msg) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("failed to encode outbound frame: {e}");
                continue;
            }
        };

        if let Err(e) = sink.send(WsMessage::Text(text)).await {
            tracing::warn!("websocket send failed: {e}");
            break;
        }
    }

    let _ = sink.close().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ping_is_answered_with_pong() {
        match route(Message {
            kind: MessageType::Ping,
            ack: 0,
            name: String::new(),
            data: Vec::new(),
        }) {
            Route::Respond(reply) => assert_eq!(reply.kind, MessageType::Pong),
            other => panic!("expected pong response, got {other:?}"),
        }
    }

    #[test]
    fn init_is_echoed() {
        match route(Message::init()) {
            Route::Respond(reply) => assert_eq!(reply.kind, MessageType::Init),
            other => panic!("expected init echo, got {other:?}"),
        }
    }

    #[test]
    fn events_are_delivered_with_args_in_order() {
        let msg = Message::event("msg", vec![json!("ts"), json!("alice"), json!("hi")]);
        match route(msg) {
            Route::Deliver(event) => {
                assert_eq!(event.name, "msg");
                assert_eq!(event.args, vec![json!("ts"), json!("alice"), json!("hi")]);
            }
            other => panic!("expected delivery, got {other:?}"),
        }
    }

    #[test]
    fn replies_are_ignored() {
        let msg = Message {
            kind: MessageType::Reply,
            ack: 7,
            name: "msg".to_string(),
            data: Vec::new(),
        };
        assert_eq!(route(msg), Route::Ignore);
    }

    #[tokio::test]
    async fn emit_enqueues_exactly_one_event_frame() {
        let (tx, mut rx) = mpsc::channel(4);
        let channel = Channel::new(tx);

        channel.emit("msg", vec![json!("#welcome"), json!("hello")]);

        let frame = rx.try_recv().unwrap();
        assert_eq!(frame.kind, MessageType::Event);
        assert_eq!(frame.name, "msg");
        assert_eq!(frame.data, vec![json!("#welcome"), json!("hello")]);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn emit_on_full_queue_drops_instead_of_blocking() {
        let (tx, mut rx) = mpsc::channel(1);
        let channel = Channel::new(tx);

        channel.emit("msg", vec![json!("#welcome"), json!("first")]);
        channel.emit("msg", vec![json!("#welcome"), json!("second")]);

        // First frame made it, second was dropped
        assert_eq!(rx.try_recv().unwrap().data[1], json!("first"));
        assert!(rx.try_recv().is_err());
    }
}

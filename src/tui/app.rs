// TUI application state
//
// App is the single process-scoped context: the dispatcher (owning the
// templates), the outbound channel handle, the log view, and the compose
// line all live here. It is built once in main and mutated only from the
// TUI event loop, so the log surface has exactly one writer.

use crate::dispatch::Dispatcher;
use crate::logging::LogBuffer;
use crate::transport::{Channel, ChannelEvent};
use crate::tui::compose::Compose;
use crate::tui::log_view::LogView;
use serde_json::json;

/// The one channel outgoing messages are published to.
pub const OUTGOING_CHANNEL: &str = "#welcome";

/// Main application state for the TUI
pub struct App {
    /// The scrolling chat log surface
    pub log_view: LogView,

    /// The message being composed
    pub compose: Compose,

    /// Routes inbound events through the templates
    dispatcher: Dispatcher,

    /// Publish handle; None in demo mode
    channel: Option<Channel>,

    /// Whether the transport queue is still open
    pub connected: bool,

    /// Endpoint label for the status line
    pub endpoint: String,

    /// Captured system logs for the status line
    pub log_buffer: LogBuffer,

    /// Whether the app should quit
    pub should_quit: bool,
}

impl App {
    pub fn new(
        dispatcher: Dispatcher,
        channel: Option<Channel>,
        endpoint: String,
        log_buffer: LogBuffer,
    ) -> Self {
        let connected = channel.is_some();
        Self {
            log_view: LogView::new(),
            compose: Compose::new(),
            dispatcher,
            channel,
            connected,
            endpoint,
            log_buffer,
            should_quit: false,
        }
    }

    /// Running against scripted events rather than a server.
    pub fn is_demo(&self) -> bool {
        self.channel.is_none()
    }

    /// One inbound event: dispatch, render, append.
    pub fn handle_event(&mut self, event: ChannelEvent) {
        self.dispatcher.handle(&event, &mut self.log_view);
    }

    /// The inbound queue closed: the server is gone.
    pub fn handle_disconnect(&mut self) {
        if self.connected {
            self.connected = false;
            tracing::warn!("disconnected from {}", self.endpoint);
        }
    }

    /// Submit the compose line: emit an outgoing msg event on the fixed
    /// channel and clear the input. The clear happens regardless of what
    /// becomes of the emit, and the text goes out exactly as typed -
    /// untrimmed, even when empty.
    pub fn submit(&mut self) {
        let text = self.compose.take();
        match &self.channel {
            Some(channel) => channel.emit("msg", vec![json!(OUTGOING_CHANNEL), json!(text)]),
            None => tracing::debug!("demo mode, dropping submitted message"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateSet;
    use crate::transport::wire::{Message, MessageType};
    use serde_json::json;
    use tokio::sync::mpsc;

    fn app_with_channel() -> (App, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(8);
        let app = App::new(
            Dispatcher::new(TemplateSet::default()),
            Some(Channel::new(tx)),
            "ws://test".to_string(),
            LogBuffer::new(),
        );
        (app, rx)
    }

    #[tokio::test]
    async fn submit_emits_exactly_once_and_clears_the_input() {
        let (mut app, mut rx) = app_with_channel();
        for c in "hello".chars() {
            app.compose.insert(c);
        }

        app.submit();

        let frame = rx.try_recv().unwrap();
        assert_eq!(frame.kind, MessageType::Event);
        assert_eq!(frame.name, "msg");
        assert_eq!(frame.data, vec![json!("#welcome"), json!("hello")]);
        assert!(rx.try_recv().is_err(), "only one frame per submit");
        assert_eq!(app.compose.value(), "");
    }

    #[tokio::test]
    async fn empty_submit_is_emitted_as_is() {
        let (mut app, mut rx) = app_with_channel();

        app.submit();

        let frame = rx.try_recv().unwrap();
        assert_eq!(frame.data, vec![json!("#welcome"), json!("")]);
    }

    #[tokio::test]
    async fn inbound_events_render_into_the_log_view() {
        let (mut app, _rx) = app_with_channel();
        app.log_view.set_viewport(10);

        app.handle_event(ChannelEvent {
            name: "join".to_string(),
            args: vec![json!("2024-05-01T12:00:00Z"), json!("bob"), json!("#welcome")],
        });

        assert_eq!(
            app.log_view.entries(),
            ["--> bob joined #welcome".to_string()]
        );
    }

    #[test]
    fn demo_mode_submit_drops_without_panicking() {
        let mut app = App::new(
            Dispatcher::new(TemplateSet::default()),
            None,
            "demo".to_string(),
            LogBuffer::new(),
        );
        assert!(app.is_demo());

        app.compose.insert('x');
        app.submit();
        assert_eq!(app.compose.value(), "");
    }
}

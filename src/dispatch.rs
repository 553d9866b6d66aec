// Event dispatcher - routes inbound events to render instructions
//
// One handler per event kind. Each handler pairs the matching template with
// the values built from the event, renders, and hands the result to the log
// sink. Handlers share nothing with each other; the sink is the single
// side effect. Events are handled strictly in the order the transport
// queue delivers them.

use crate::events::ChatEvent;
use crate::template::{self, TemplateSet};
use crate::transport::ChannelEvent;
use chrono::{DateTime, Utc};

/// Where rendered entries go. The TUI's log view implements this; headless
/// mode uses [`StdoutSink`]. Tests collect into a `Vec`.
pub trait LogSink {
    fn append(&mut self, rendered: String);
}

/// Headless-mode sink: one rendered entry per stdout line.
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn append(&mut self, rendered: String) {
        println!("{rendered}");
    }
}

impl LogSink for Vec<String> {
    fn append(&mut self, rendered: String) {
        self.push(rendered);
    }
}

/// Routes each decoded event kind through its template.
///
/// Registered once at startup with the process-wide template set; lives for
/// the whole run (the subscription is never torn down).
pub struct Dispatcher {
    templates: TemplateSet,
}

impl Dispatcher {
    pub fn new(templates: TemplateSet) -> Self {
        Self { templates }
    }

    /// Handle one transport event: decode, render, append.
    ///
    /// Unknown event names are skipped quietly; malformed known kinds are
    /// dropped with a warning. Either way the surface is left untouched.
    pub fn handle(&self, event: &ChannelEvent, sink: &mut impl LogSink) {
        match ChatEvent::decode(event) {
            Ok(Some(chat)) => sink.append(self.render(&chat)),
            Ok(None) => tracing::trace!("no handler for {} event", event.name),
            Err(e) => tracing::warn!("dropping malformed {} event: {e:#}", event.name),
        }
    }

    /// Produce the render instruction for a chat event: the selected
    /// template applied to the event's values.
    pub fn render(&self, event: &ChatEvent) -> String {
        match event {
            ChatEvent::Join { ts, user, channel } => self.on_join(ts, user, channel),
            ChatEvent::Part { ts, user, channel } => self.on_part(ts, user, channel),
            ChatEvent::Msg { ts, user, text } => self.on_msg(ts, user, text),
        }
    }

    fn on_join(&self, ts: &DateTime<Utc>, user: &str, channel: &str) -> String {
        template::render(
            &self.templates.join,
            &[
                ("ts", ts.to_rfc3339()),
                ("user", user.to_string()),
                ("chan", channel.to_string()),
            ],
        )
    }

    fn on_part(&self, ts: &DateTime<Utc>, user: &str, channel: &str) -> String {
        template::render(
            &self.templates.part,
            &[
                ("ts", ts.to_rfc3339()),
                ("user", user.to_string()),
                ("chan", channel.to_string()),
            ],
        )
    }

    fn on_msg(&self, ts: &DateTime<Utc>, user: &str, text: &str) -> String {
        template::render(
            &self.templates.msg,
            &[
                ("ts", ts.to_rfc3339()),
                ("user", user.to_string()),
                ("msg", text.to_string()),
            ],
        )
    }
}

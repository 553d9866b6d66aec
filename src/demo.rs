// Demo mode: feed scripted chat events to showcase the TUI
//
// Events enter through the same queue the transport would use, so demo
// mode exercises the full decode/dispatch/render path. Timestamps are
// stamped at send time.
//
// Run with: rpchat --demo

use crate::transport::ChannelEvent;
use chrono::Utc;
use serde_json::json;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;

/// Scripted conversation, sent once at startup then looped with longer
/// pauses. Ends when the UI goes away (queue closed).
pub async fn run_demo(tx: mpsc::Sender<ChannelEvent>) {
    // Initial delay to let the TUI render an empty room first
    sleep(Duration::from_millis(800)).await;

    for (event, delay_ms) in opening() {
        if tx.send(event).await.is_err() {
            return;
        }
        sleep(Duration::from_millis(delay_ms)).await;
    }

    // Keep a slow trickle of chatter so the autoscroll behavior stays
    // visible however long the demo runs
    loop {
        for (event, delay_ms) in chatter() {
            if tx.send(event).await.is_err() {
                return;
            }
            sleep(Duration::from_millis(delay_ms)).await;
        }
    }
}

fn join(user: &str) -> ChannelEvent {
    ChannelEvent {
        name: "join".to_string(),
        args: vec![json!(Utc::now()), json!(user), json!("#welcome")],
    }
}

fn part(user: &str) -> ChannelEvent {
    ChannelEvent {
        name: "part".to_string(),
        args: vec![json!(Utc::now()), json!(user), json!("#welcome")],
    }
}

fn msg(user: &str, text: &str) -> ChannelEvent {
    ChannelEvent {
        name: "msg".to_string(),
        args: vec![json!(Utc::now()), json!(user), json!(text)],
    }
}

fn opening() -> Vec<(ChannelEvent, u64)> {
    vec![
        (join("mira"), 900),
        (msg("mira", "anyone around?"), 1500),
        (join("tom"), 700),
        (msg("tom", "hey mira"), 1200),
        (msg("mira", "tom! long time"), 1000),
        (join("ada"), 600),
        (msg("ada", "o/"), 900),
        (msg("tom", "we were just talking about the release"), 1400),
        (msg("mira", "scroll up if you missed it, nothing final yet"), 1600),
        (part("tom"), 1100),
        (msg("ada", "there he goes again"), 1000),
    ]
}

fn chatter() -> Vec<(ChannelEvent, u64)> {
    vec![
        (msg("mira", "still here, just quiet"), 6000),
        (join("tom"), 2500),
        (msg("tom", "dropped off, what did I miss?"), 3500),
        (msg("ada", "scroll back and see for yourself"), 5000),
        (msg("mira", "ha"), 7000),
        (part("tom"), 4000),
    ]
}

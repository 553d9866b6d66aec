// rpchat - terminal chat client for webrpc servers
//
// Architecture:
// - Transport (tokio-tungstenite): socket loops delivering named events
//   onto an mpsc queue, accepting outbound events on another
// - Dispatcher: decodes join/part/msg events and renders them through
//   display templates
// - TUI (ratatui): scrolling log view with autoscroll, compose line
// - Headless mode: rendered entries printed straight to stdout

mod cli;
mod config;
mod demo;
mod dispatch;
mod events;
mod logging;
mod template;
mod transport;
mod tui;

use anyhow::Result;
use clap::Parser;
use config::Config;
use dispatch::{Dispatcher, StdoutSink};
use logging::LogBuffer;
use tokio::sync::mpsc;
use transport::ChannelEvent;
use tui::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    // Handle `rpchat config ...` and exit early if it ran
    let cli = cli::Cli::parse();
    if cli::handle_command(&cli) {
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    // Load configuration, then apply CLI overrides on top
    let mut config = Config::from_env();
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if cli.demo {
        config.demo_mode = true;
    }
    if cli.no_tui {
        config.enable_tui = false;
    }

    // Initialize tracing. In TUI mode logs are captured to a buffer so
    // they cannot garble the alternate screen; the guard keeps the file
    // writer alive until exit.
    let log_buffer = LogBuffer::new();
    let _file_guard = logging::init(&config, &log_buffer);

    tracing::debug!("rpchat {} starting", config::VERSION);

    let dispatcher = Dispatcher::new(config.templates.clone());

    // Demo mode feeds scripted events through the same queue the
    // transport would use; otherwise connect for real
    let (channel, event_rx) = if config.demo_mode {
        tracing::info!("demo mode, not connecting to a server");
        let (tx, rx) = mpsc::channel(256);
        tokio::spawn(demo::run_demo(tx));
        (None, rx)
    } else {
        let (channel, rx) = transport::connect(&config.endpoint).await?;
        (Some(channel), rx)
    };

    if config.enable_tui {
        let label = if config.demo_mode {
            "demo".to_string()
        } else {
            config.endpoint.clone()
        };
        let app = App::new(dispatcher, channel, label, log_buffer);
        tui::run_tui(app, event_rx).await?;
    } else {
        headless(&dispatcher, event_rx).await;
    }

    tracing::debug!("shutdown complete");
    Ok(())
}

/// Headless mode: render inbound events to stdout until the connection
/// closes or the user interrupts. There is no input surface, so nothing
/// is ever emitted.
async fn headless(dispatcher: &Dispatcher, mut event_rx: mpsc::Receiver<ChannelEvent>) {
    let mut sink = StdoutSink;

    loop {
        tokio::select! {
            event = event_rx.recv() => match event {
                Some(event) => dispatcher.handle(&event, &mut sink),
                None => {
                    tracing::info!("connection closed");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }
}

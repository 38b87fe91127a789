//! touchpanel-daemon: interaction core for seamless touch panel demos
//!
//! This daemon drives the concept pages (sofa arm, steering wheel, vehicle
//! door) and provides:
//! - An interaction state machine with pressure-classified presses
//! - Spoken feedback through a simulated screen reader
//! - Audio cues standing in for haptic pulses
//! - IPC server for the presentation layer
//!
//! Rendering is out of scope; clients draw from the snapshots and events.

mod accessibility;
mod app;
mod concepts;
mod config;
mod events;
mod feedback;
mod interaction;
mod ipc;
mod lifecycle;
mod router;
mod scene;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::broadcast;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::accessibility::{
    AnnouncementService, ProcessSpeechBackend, SimulatedSpeechBackend, SpeechBackend,
};
use crate::app::App;
use crate::config::Config;
use crate::events::FeedbackEvent;
use crate::feedback::{AudioAdapter, TracingToneBackend};
use crate::interaction::FeedbackContext;
use crate::ipc::Server;
use crate::lifecycle::ShutdownSignal;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "touchpanel-daemon starting");

    // Load configuration
    let config = Config::load()?;
    config.ensure_dirs()?;
    info!(?config.socket_path, "configuration loaded");

    let mut shutdown = ShutdownSignal::new()?;

    // Feedback bus: machine, announcer and audio -> subscribed IPC clients
    let (event_tx, _event_rx) = broadcast::channel::<FeedbackEvent>(256);

    let speech: Arc<dyn SpeechBackend> = match &config.speech_command {
        Some(program) => {
            info!(%program, "using external speech synthesizer");
            Arc::new(ProcessSpeechBackend::new(program.clone()))
        }
        None => Arc::new(SimulatedSpeechBackend::default()),
    };
    let announcer = Arc::new(AnnouncementService::new(
        speech,
        config.hover_window,
        event_tx.clone(),
    ));
    let drain = announcer.spawn_drain();

    let audio = Arc::new(AudioAdapter::new(Arc::new(TracingToneBackend), event_tx.clone()));

    let feedback = FeedbackContext {
        announcer,
        audio,
        events: event_tx.clone(),
    };
    let app = App::new(feedback, config.app_settings());

    let server = Server::new(&config.socket_path, app, event_tx)?;

    info!("daemon initialized, entering main loop");

    tokio::select! {
        // Run the IPC server (accepts client connections)
        result = server.run() => {
            if let Err(e) = result {
                error!(?e, "IPC server error");
            }
        }

        // Wait for shutdown signal
        _ = shutdown.wait() => {
            info!("shutdown signal received");
        }
    }

    // Cleanup
    info!("shutting down...");

    drain.abort();
    server.shutdown().await;

    info!("touchpanel-daemon stopped");

    Ok(())
}

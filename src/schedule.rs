//! Delayed delivery of events to the main thread.

use std::time::Duration;

use tao::event_loop::EventLoopProxy;
use tokio::runtime::Runtime;
use tracing::debug;

use crate::event::OverlayEvent;

/// Runs timers on a small runtime and posts their events back to the event
/// loop once they fire. Nothing here touches application state.
pub struct Scheduler {
    runtime: Runtime,
    event_sender: EventLoopProxy<OverlayEvent>,
}

impl Scheduler {
    pub fn new(event_sender: EventLoopProxy<OverlayEvent>) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;

        Ok(Self {
            runtime,
            event_sender,
        })
    }

    /// Posts `event` to the event loop after `delay`.
    pub fn after(&self, delay: Duration, event: OverlayEvent) {
        let event_sender = self.event_sender.clone();
        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = event_sender.send_event(event) {
                debug!(event = ?e.0, "event loop closed, dropping scheduled event");
            }
        });
    }
}

//! System notifications.
//!
//! The overlay is usually hidden when something goes wrong with the shortcut,
//! so warnings and errors from mdfloat itself are surfaced as notifications.
//! Events from the windowing and hotkey crates only go to the log.

use notify_rust::Notification;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber, error};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

use crate::{APP_NAME, APP_NAME_PRETTY};

/// Send a system notification with a summary and body.
pub fn notify(summary: &str, body: &str) {
    Notification::new()
        .appname(APP_NAME)
        .summary(summary)
        .body(body)
        .show()
        // logged at error with a foreign target so it is not fed back into the layer
        .map_err(|e| error!(target: "notify_rust", "Failed to send notification: {}", e))
        .ok();
}

/// Visitor to extract the message field from tracing events.
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        }
    }
}

/// Tracing layer that sends notifications for mdfloat's warnings and errors.
#[derive(Debug, Default)]
pub struct NotificationLayer {}

impl NotificationLayer {
    pub fn new() -> Self {
        Self {}
    }
}

fn should_notify(level: Level, target: &str) -> Option<&'static str> {
    if !target.starts_with(APP_NAME) {
        return None;
    }
    match level {
        Level::ERROR => Some("error"),
        Level::WARN => Some("warning"),
        _ => None,
    }
}

/// Which part of mdfloat an event came from, named the way the user sees it.
fn topic(target: &str) -> Option<&'static str> {
    match target.rsplit("::").next()? {
        "registry" | "recording" | "backend" | "keymap" => Some("Shortcut"),
        "visibility" | "overlay" | "schedule" => Some("Overlay"),
        "config" => Some("Settings"),
        _ => None,
    }
}

/// e.g. "MarkdownFloat: Shortcut error"
fn summary(kind: &str, target: &str) -> String {
    match topic(target) {
        Some(topic) => format!("{APP_NAME_PRETTY}: {topic} {kind}"),
        None => format!("{APP_NAME_PRETTY} {kind}"),
    }
}

impl<S: Subscriber> Layer<S> for NotificationLayer {
    fn on_event(&self, event: &Event<'_>, _: Context<'_, S>) {
        let metadata = event.metadata();

        if let Some(kind) = should_notify(*metadata.level(), metadata.target()) {
            let mut visitor = MessageVisitor::default();
            event.record(&mut visitor);

            if let Some(message) = visitor.message {
                notify(&summary(kind, metadata.target()), &message);
            }
        }
    }
}

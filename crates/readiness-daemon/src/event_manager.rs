//! Central event management and broadcasting

use tokio::sync::broadcast;

use crate::events::{DaemonEvent, IssueEvent, SettingsEvent};

/// Central event manager that coordinates all daemon events
pub struct EventManager {
    event_tx: broadcast::Sender<DaemonEvent>,
}

impl EventManager {
    /// Create a new event manager with a broadcast channel
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self { event_tx }
    }

    /// Subscribe to all daemon events
    pub fn subscribe(&self) -> broadcast::Receiver<DaemonEvent> {
        self.event_tx.subscribe()
    }

    /// Emit a settings event
    pub fn emit_settings(&self, event: SettingsEvent) {
        self.emit(DaemonEvent::Settings(event));
    }

    /// Emit an issue event
    pub fn emit_issue(&self, event: IssueEvent) {
        self.emit(DaemonEvent::Issue(event));
    }

    fn emit(&self, event: DaemonEvent) {
        match self.event_tx.send(event) {
            Ok(count) => tracing::debug!("EventManager: Event sent to {} receivers", count),
            Err(_) => tracing::trace!("EventManager: No subscribers"),
        }
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

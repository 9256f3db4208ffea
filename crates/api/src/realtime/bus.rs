use std::collections::HashMap;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::realtime::Event;

const CHANNEL_CAPACITY: usize = 100;

/// Publish side of the realtime bus. Ingestion and membership workflows
/// depend on this trait rather than the bus itself, so tests can substitute
/// a recording stub.
pub trait EventSink: Send + Sync {
    fn publish_global(&self, event: Event);
    fn publish_tournament(&self, tournament_id: Uuid, event: Event);
}

/// Per-tournament subscriber groups plus one global channel. Owned by
/// `AppState`; the WebSocket endpoint subscribes, the services publish.
pub struct EventBus {
    global: broadcast::Sender<Event>,
    tournaments: Mutex<HashMap<Uuid, broadcast::Sender<Event>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            global: broadcast::channel(CHANNEL_CAPACITY).0,
            tournaments: Mutex::new(HashMap::new()),
        }
    }

    pub fn subscribe_global(&self) -> broadcast::Receiver<Event> {
        self.global.subscribe()
    }

    pub fn subscribe_tournament(&self, tournament_id: Uuid) -> broadcast::Receiver<Event> {
        let mut tournaments = self.tournaments.lock();
        tournaments
            .entry(tournament_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for EventBus {
    fn publish_global(&self, event: Event) {
        // Delivery is best-effort; no subscribers means nothing to do.
        let _ = self.global.send(event);
    }

    fn publish_tournament(&self, tournament_id: Uuid, event: Event) {
        let sender = {
            let tournaments = self.tournaments.lock();
            tournaments.get(&tournament_id).cloned()
        };

        if let Some(sender) = sender {
            let _ = sender.send(event);
        }
    }
}

//! Topic-based event bus implementation.

use std::sync::Arc;

use crawl_core::{PhaseChange, PhaseObserver};
use tokio::sync::broadcast;

use super::types::Event;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Topic {
    /// Phase machine transitions
    Phase,
    /// Commits, branches and checkouts
    History,
    /// Background save results
    Persistence,
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::PhaseChanged(_) => Topic::Phase,
            Event::History(_) => Topic::History,
            Event::Persistence(_) => Topic::Persistence,
        }
    }
}

struct Channels {
    phase: broadcast::Sender<Event>,
    history: broadcast::Sender<Event>,
    persistence: broadcast::Sender<Event>,
}

impl Channels {
    fn get(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Phase => &self.phase,
            Topic::History => &self.history,
            Topic::Persistence => &self.persistence,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; events nobody listens
/// to are dropped.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                phase: broadcast::channel(capacity).0,
                history: broadcast::channel(capacity).0,
                persistence: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels.get(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.get(topic).subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseObserver for EventBus {
    fn on_transition(&mut self, change: PhaseChange) {
        tracing::debug!(from = %change.from, to = %change.to, "phase changed");
        self.publish(Event::PhaseChanged(change));
    }
}

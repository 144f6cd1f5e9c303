//! Session-scoped notifications.
//!
//! Actions and state machines queue events on the scene while they run;
//! the session drains the queue after each operation and hands every event
//! to the subscribed handlers and to any broadcast receivers.

use serde::Serialize;
use shared::{AssetId, ObjectId};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::state::action::ActionKind;

/// Something observers may want to react to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EditorEvent {
    /// A create action instantiated a new object
    ObjectCreated { object: ObjectId, asset_id: AssetId },
    /// An object entered the selected state
    StartEditing { object: ObjectId },
    /// The selected object was released
    StopEditing,
    /// An action was applied and pushed to the history
    ActionApplied { kind: ActionKind },
    /// An action was popped and reverted
    ActionUndone { kind: ActionKind },
    /// A snapshot was loaded into the registry
    SceneRestored { restored: usize, skipped: usize },
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    Selection,
    History,
    Scene,
}

impl EditorEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            EditorEvent::StartEditing { .. } | EditorEvent::StopEditing => EventCategory::Selection,
            EditorEvent::ActionApplied { .. } | EditorEvent::ActionUndone { .. } => {
                EventCategory::History
            }
            EditorEvent::ObjectCreated { .. } | EditorEvent::SceneRestored { .. } => {
                EventCategory::Scene
            }
        }
    }
}

/// Pending events, in emission order
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: Vec<EditorEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: EditorEvent) {
        self.pending.push(event);
    }

    pub fn drain(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Filter to receive only specific event types
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    #[default]
    All,
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    pub fn matches(&self, event: &EditorEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

type EventHandler = Box<dyn FnMut(&EditorEvent)>;

/// Observer registry owned by one editing session
pub struct EventBus {
    handlers: Vec<(SubscriptionId, EventFilter, EventHandler)>,
    sender: broadcast::Sender<EditorEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(256);
        Self {
            handlers: Vec::new(),
            sender,
        }
    }

    /// Register a handler. Handlers run in subscription order.
    pub fn subscribe<F>(&mut self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: FnMut(&EditorEvent) + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers.push((id, filter, Box::new(handler)));
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Returns true if the subscription was found and removed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sub, _, _)| *sub != id);
        let removed = self.handlers.len() != before;
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Receiver for consumers living in async tasks
    pub fn receiver(&self) -> broadcast::Receiver<EditorEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }

    /// Deliver an event to every matching handler and broadcast receiver
    pub fn publish(&mut self, event: &EditorEvent) {
        for (_, filter, handler) in self.handlers.iter_mut() {
            if filter.matches(event) {
                handler(event);
            }
        }
        // No receivers is the common case
        let _ = self.sender.send(event.clone());
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

use crossbeam_channel::{Receiver, Sender, unbounded};
use serde::{Deserialize, Serialize};
use statemap_core::{ConnectionId, LocationIndex, StatementId};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    // Map
    MarkerClicked {
        location: LocationIndex,
    },
    /// A connection line or its midpoint label was clicked.
    ConnectionClicked {
        id: ConnectionId,
    },
    /// Click on empty map space (not a marker, line, label or tooltip).
    MapBackgroundClicked,

    // Detail panel
    /// From/to links and episode tags in the connection panel.
    StatementLinkClicked {
        statement: StatementId,
    },
    /// Show/Hide Connections button in the location panel.
    ToggleStatementConnections {
        statement: StatementId,
    },
    HighlightConnectionRequested {
        id: ConnectionId,
    },
    ClearConnectionsRequested,

    // Search
    SearchInput {
        text: String,
    },
    SearchFocused,
    SearchBlurred,
    SearchCleared,
    /// Ctrl/Cmd+F
    SearchShortcut,
    EscapePressed,
    SearchResultChosen {
        index: usize,
    },
    PickerLocationChosen {
        index: usize,
    },
    PickerDismissed,

    // Time
    /// Advance the deferred-effect clock.
    Tick {
        elapsed: Duration,
    },
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        if self.tx.send(event).is_err() {
            tracing::warn!("EventBus: receiver dropped, event discarded");
        }
    }

    /// Dispatch all pending events to a listener, in publish order.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }
}

/// Single entry point for components that react to events.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}

//! # TUMBLEBOX Window Events
//!
//! Platform glue pushes window events, the frame loop drains them once per
//! frame.
//!
//! ```text
//! ┌─────────────┐      ┌─────────────┐      ┌─────────────┐
//! │  Platform   │─────>│   Event     │─────>│ Frame loop  │
//! │  (window)   │      │   Channel   │      │  (drain)    │
//! └─────────────┘      └─────────────┘      └─────────────┘
//! ```
//!
//! Uses a bounded crossbeam channel so a stalled loop cannot grow memory.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// Default channel capacity; far above what a window produces per frame.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Events the window can raise.
///
/// Only `CloseRequested` changes what the loop does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowEvent {
    /// The user asked to close the window. The loop stops after the current
    /// frame.
    CloseRequested,
    /// The window gained (`true`) or lost (`false`) focus.
    Focused(bool),
}

/// Bounded channel between the platform and the frame loop.
pub struct EventBus {
    sender: Sender<WindowEvent>,
    receiver: Receiver<WindowEvent>,
}

impl EventBus {
    /// Creates a new event bus holding at most `capacity` pending events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Creates a sender handle (clone for multiple producers).
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle.
    #[must_use]
    pub fn receiver(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.receiver.clone(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

/// Handle for sending events.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<WindowEvent>,
}

impl EventSender {
    /// Sends an event (non-blocking).
    ///
    /// Returns `false` if the channel is full or the loop is gone.
    #[inline]
    pub fn send(&self, event: WindowEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                tracing::warn!(?event, "event channel full, dropping event");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Handle for receiving events.
#[derive(Clone)]
pub struct EventReceiver {
    receiver: Receiver<WindowEvent>,
}

impl EventReceiver {
    /// Takes every pending event (non-blocking).
    #[inline]
    pub fn drain(&self) -> Vec<WindowEvent> {
        self.receiver.try_iter().collect()
    }

    /// Receives one event (non-blocking).
    #[inline]
    pub fn try_recv(&self) -> Option<WindowEvent> {
        self.receiver.try_recv().ok()
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Checks if there are pending events.
    #[inline]
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.receiver.is_empty()
    }
}

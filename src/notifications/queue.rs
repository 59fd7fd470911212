//! Notification queue with bounded subscribers.

use crate::types::Timestamp;
use crossbeam_channel::{bounded, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

use super::types::{
    Notification, NotificationHandle, NotificationId, NotificationLevel, SubscriberId,
};

/// Default number of recent notifications kept for late subscribers.
pub const DEFAULT_BACKLOG: usize = 50;

/// Internal subscriber state.
struct Subscriber {
    sender: Sender<Notification>,
}

impl Subscriber {
    /// Try to deliver. Returns false if the buffer is full or the receiver is gone.
    fn try_send(&self, notification: Notification) -> bool {
        match self.sender.try_send(notification) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Broadcasts notifications to subscribers and keeps a short backlog.
pub struct NotificationQueue {
    subscribers: RwLock<HashMap<SubscriberId, Subscriber>>,
    recent: Mutex<VecDeque<Notification>>,
    backlog: usize,
    next_subscriber: AtomicU64,
    next_notification: AtomicU64,
}

impl NotificationQueue {
    /// Create a queue with the default backlog size.
    pub fn new() -> Self {
        Self::with_backlog(DEFAULT_BACKLOG)
    }

    /// Create a queue that keeps `backlog` recent notifications.
    pub fn with_backlog(backlog: usize) -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            recent: Mutex::new(VecDeque::with_capacity(backlog)),
            backlog,
            next_subscriber: AtomicU64::new(1),
            next_notification: AtomicU64::new(1),
        }
    }

    /// Subscribe with a buffer of `buffer_size` undelivered notifications.
    pub fn subscribe(&self, buffer_size: usize) -> NotificationHandle {
        let id = SubscriberId(self.next_subscriber.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(buffer_size.max(1));

        self.subscribers.write().insert(id, Subscriber { sender });

        NotificationHandle { id, receiver }
    }

    /// Remove a subscriber.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.subscribers.write().remove(&id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Post a notification to all subscribers.
    pub fn post(&self, level: NotificationLevel, message: impl Into<String>) -> Notification {
        let notification = Notification {
            id: NotificationId(self.next_notification.fetch_add(1, Ordering::SeqCst)),
            level,
            message: message.into(),
            timestamp: Timestamp::now(),
        };

        if self.backlog > 0 {
            let mut recent = self.recent.lock();
            if recent.len() == self.backlog {
                recent.pop_front();
            }
            recent.push_back(notification.clone());
        }

        self.broadcast(&notification);
        notification
    }

    /// Recent notifications, oldest first.
    pub fn recent(&self) -> Vec<Notification> {
        self.recent.lock().iter().cloned().collect()
    }

    /// Drops subscribers that fail to receive.
    fn broadcast(&self, notification: &Notification) {
        let mut to_remove = Vec::new();

        {
            let subs = self.subscribers.read();
            for (id, sub) in subs.iter() {
                if !sub.try_send(notification.clone()) {
                    to_remove.push(*id);
                }
            }
        }

        if !to_remove.is_empty() {
            let mut subs = self.subscribers.write();
            for id in to_remove {
                subs.remove(&id);
                warn!(subscriber = id.0, "dropped notification subscriber");
            }
        }
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

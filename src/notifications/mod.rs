//! Notification queue for surfacing editor outcomes.
//!
//! Persistence calls return `Result`s; the editor turns those outcomes into
//! notifications posted here, and UI layers subscribe to render them as
//! toasts or status lines:
//! - Save succeeded / failed
//! - Edits discarded
//! - Layout reloaded after a conflict
//!
//! Each subscriber gets a bounded buffer. Subscribers that fall behind or
//! disconnect are dropped. A short backlog of recent notifications is kept for
//! late joiners.
//!
//! # Example
//!
//! ```
//! use pagewright::{NotificationLevel, NotificationQueue};
//!
//! let queue = NotificationQueue::new();
//! let handle = queue.subscribe(16);
//!
//! queue.post(NotificationLevel::Success, "Page saved");
//!
//! let note = handle.try_recv().unwrap();
//! assert_eq!(note.message, "Page saved");
//! ```

mod queue;
mod types;

pub use queue::{NotificationQueue, DEFAULT_BACKLOG};
pub use types::{Notification, NotificationHandle, NotificationId, NotificationLevel, SubscriberId};

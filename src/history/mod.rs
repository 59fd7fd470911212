//! Linear undo/redo history.
//!
//! A history holds one present value plus a past stack and a future stack.
//! Every edit pushes the old present onto the past and discards the future;
//! undo and redo shuttle values between the three partitions. Saving or
//! cancelling an edit session resets the history to a single present value.
//!
//! # Example
//!
//! ```
//! use pagewright::History;
//!
//! let mut history = History::new(Vec::<&str>::new());
//! history.set(vec!["a"]);
//! history.set(vec!["a", "b"]);
//!
//! history.undo();
//! assert_eq!(history.present(), &vec!["a"]);
//! assert!(history.can_redo());
//!
//! history.redo();
//! assert_eq!(history.present(), &vec!["a", "b"]);
//! ```

mod buffer;

pub use buffer::History;

// src/lib.rs

//! stashq - bounded message-stashing buffers with a replay protocol.
//!
//! An actor-style message processor sometimes receives messages it cannot
//! handle in its current logical state. These buffers let it defer
//! ("stash") such messages, bounded by a fixed capacity, and later feed
//! them back ("unstash") through a [`Behavior`] that may change state
//! mid-replay, stash new messages while replaying old ones, or fail partway
//! through — while the buffer stays in a well-defined, recoverable state.
//!
//! Two variants cover two ownership models:
//! - [`PersistentStash`]: an immutable value; every mutating operation
//!   returns a new buffer and never touches shared state.
//! - [`ExclusiveStash`]: mutated in place through `&mut self` by its single
//!   owner, with no internal locking.
//!
//! Replay is a synchronous fold: messages are handed to the behavior oldest
//! first, each call produces the behavior for the next message, and a fault
//! halts the pass with the already-replayed prefix consumed and everything
//! else still buffered.
//!
//! # Example
//!
//! ```
//! use stashq::{BoundedStash, ExclusiveStash, Restash, StashError};
//!
//! fn record(
//!   seen: &mut Vec<&'static str>,
//!   _stash: &mut Restash<'_, &'static str>,
//!   message: &'static str,
//! ) -> Result<(), StashError> {
//!   seen.push(message);
//!   Ok(())
//! }
//!
//! # fn main() -> Result<(), StashError> {
//! let mut stash = ExclusiveStash::new(8);
//! stash.stash("hello")?;
//! stash.stash("world")?;
//!
//! let mut seen = Vec::new();
//! stash.unstash_all(&mut seen, record)?;
//! assert_eq!(seen, ["hello", "world"]);
//! assert!(stash.is_empty());
//! # Ok(())
//! # }
//! ```

/// The processing seam replayed messages are folded through.
pub mod behavior;
/// The two buffer variants and the shared replay machinery.
pub mod buffer;
/// Defines the crate's error types.
pub mod error;

// Re-export core types for user convenience, making them accessible
// directly from the crate root.
pub use behavior::Behavior;
pub use buffer::{BoundedStash, ExclusiveStash, PersistentStash, Restash};
pub use error::StashError;

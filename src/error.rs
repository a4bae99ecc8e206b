use thiserror::Error;

/// Errors raised by the stash buffers themselves.
///
/// Faults produced by a [`Behavior`](crate::Behavior) while messages are
/// being replayed are deliberately *not* represented here: replay propagates
/// them to the caller unchanged, with their original type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StashError {
  /// A stash was attempted against a full buffer.
  ///
  /// The buffer's contents are unchanged; nothing is dropped or truncated
  /// silently.
  #[error("stash buffer full (capacity {capacity})")]
  Overflow {
    /// Fixed capacity of the buffer that rejected the message.
    capacity: usize,
  },

  /// `head` or `drop_head` was attempted against an empty buffer.
  #[error("stash buffer is empty")]
  Empty,
}

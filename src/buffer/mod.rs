//! Bounded stash buffers: a persistent and an exclusively-owned variant,
//! sharing one replay protocol.

mod exclusive;
mod persistent;
mod replay;

pub use exclusive::ExclusiveStash;
pub use persistent::PersistentStash;
pub use replay::Restash;

/// Read-only surface shared by both stash buffer variants.
pub trait BoundedStash {
  /// Maximum number of messages the buffer will hold; fixed at construction.
  fn capacity(&self) -> usize;

  /// Number of messages currently stashed.
  fn len(&self) -> usize;

  /// True when no messages are stashed.
  fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// True when at least one message is stashed.
  fn non_empty(&self) -> bool {
    !self.is_empty()
  }

  /// True when the buffer holds `capacity` messages and the next stash will
  /// overflow.
  fn is_full(&self) -> bool {
    self.len() >= self.capacity()
  }
}

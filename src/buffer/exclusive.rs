use std::collections::VecDeque;
use std::fmt;

use crate::behavior::Behavior;
use crate::buffer::replay::{replay, ReplayQueue};
use crate::buffer::BoundedStash;
use crate::error::StashError;

/// A mutable, bounded FIFO stash owned by exactly one processor at a time.
///
/// All mutation goes through `&mut self`, so exclusive ownership is enforced
/// by the borrow checker rather than by a lock; there is no internal
/// synchronization. The enclosing processor is the sole serialization point,
/// which matches an actor handling at most one message at a time.
pub struct ExclusiveStash<T> {
  capacity: usize,
  queue: VecDeque<T>,
}

impl<T> ExclusiveStash<T> {
  /// Creates an empty stash holding at most `capacity` messages.
  pub fn new(capacity: usize) -> Self {
    Self {
      capacity,
      queue: VecDeque::new(),
    }
  }

  /// Appends `message` in place.
  ///
  /// Fails with [`StashError::Overflow`] when the buffer is full; an
  /// overflowing stash never partially applies.
  pub fn stash(&mut self, message: T) -> Result<(), StashError> {
    if self.queue.len() >= self.capacity {
      tracing::debug!(capacity = self.capacity, "stash rejected, buffer full");
      return Err(StashError::Overflow {
        capacity: self.capacity,
      });
    }
    self.queue.push_back(message);
    tracing::trace!(len = self.queue.len(), capacity = self.capacity, "message stashed");
    Ok(())
  }

  /// Returns the oldest stashed message without removing it.
  pub fn head(&self) -> Result<&T, StashError> {
    self.queue.front().ok_or(StashError::Empty)
  }

  /// Removes and returns the oldest stashed message.
  pub fn drop_head(&mut self) -> Result<T, StashError> {
    self.queue.pop_front().ok_or(StashError::Empty)
  }

  /// Visits every stashed message, oldest to newest, without mutating.
  pub fn for_each(&self, mut visit: impl FnMut(&T)) {
    for message in &self.queue {
      visit(message);
    }
  }

  /// Replays every currently buffered message through `behavior`, oldest
  /// first, returning the final behavior.
  ///
  /// If the behavior faults partway, every message handed to it so far —
  /// the faulting one included — is already gone from the buffer, and the
  /// rest remain. The buffer stays valid and resumable, so a supervisor can
  /// restart processing without redelivering already-attempted messages.
  pub fn unstash_all<C, B>(&mut self, cx: &mut C, behavior: B) -> Result<B, B::Fault>
  where
    B: Behavior<C, T>,
  {
    let count = self.queue.len();
    replay(self, cx, behavior, count, |message| message)
  }

  /// Replays at most `count` of the oldest buffered messages, passing each
  /// through `wrap` immediately before delivery. Fault handling matches
  /// [`unstash_all`](Self::unstash_all).
  pub fn unstash<C, B, W>(&mut self, cx: &mut C, behavior: B, count: usize, wrap: W) -> Result<B, B::Fault>
  where
    B: Behavior<C, T>,
    W: FnMut(T) -> T,
  {
    replay(self, cx, behavior, count, wrap)
  }
}

impl<T> BoundedStash for ExclusiveStash<T> {
  fn capacity(&self) -> usize {
    self.capacity
  }

  fn len(&self) -> usize {
    self.queue.len()
  }
}

impl<T> ReplayQueue<T> for ExclusiveStash<T> {
  fn pop_head(&mut self) -> Option<T> {
    self.queue.pop_front()
  }

  fn restash(&mut self, message: T) -> Result<(), StashError> {
    self.stash(message)
  }
}

impl<T> fmt::Debug for ExclusiveStash<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ExclusiveStash")
      .field("capacity", &self.capacity)
      .field("len", &self.queue.len())
      .finish()
  }
}

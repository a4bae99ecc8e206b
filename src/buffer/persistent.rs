use std::fmt;
use std::sync::Arc;

use crate::behavior::Behavior;
use crate::buffer::replay::{replay, ReplayQueue};
use crate::buffer::BoundedStash;
use crate::error::StashError;

/// One cell of the shared spine. Tails are `Arc`-shared between buffer
/// values derived from one another.
struct Node<T> {
  message: T,
  next: Link<T>,
}

type Link<T> = Option<Arc<Node<T>>>;

/// An immutable, bounded FIFO stash.
///
/// Every mutating operation returns a new buffer value and leaves the
/// original untouched, so values can be shared and read from any number of
/// threads without synchronization; "thread safety" here means "never
/// mutates", not "internally locked".
///
/// Internally a two-list persistent queue: `front` holds the oldest messages
/// in replay order, `back` holds the newest in reverse push order, and
/// `back` is rolled over into `front` when `front` runs out. Cloning the
/// buffer clones `Arc` spines only and never requires `T: Clone`; operations
/// that extract owned messages (`drop_head`, replay) do.
pub struct PersistentStash<T> {
  capacity: usize,
  front: Link<T>,
  front_len: usize,
  back: Link<T>,
  back_len: usize,
}

impl<T> PersistentStash<T> {
  /// Creates an empty buffer holding at most `capacity` messages.
  pub fn new(capacity: usize) -> Self {
    Self {
      capacity,
      front: None,
      front_len: 0,
      back: None,
      back_len: 0,
    }
  }

  /// Returns a new buffer with `message` appended at the tail.
  ///
  /// Fails with [`StashError::Overflow`] when the buffer is full. `self` is
  /// untouched either way.
  pub fn stash(&self, message: T) -> Result<Self, StashError> {
    if self.is_full() {
      tracing::debug!(capacity = self.capacity, "stash rejected, buffer full");
      return Err(StashError::Overflow {
        capacity: self.capacity,
      });
    }
    let mut next = self.clone();
    if next.front.is_none() {
      // Empty buffer: the new message is both head and tail. Keeping `front`
      // non-empty whenever the buffer is non-empty makes `head` O(1).
      next.front = Some(Arc::new(Node { message, next: None }));
      next.front_len = 1;
    } else {
      next.back = Some(Arc::new(Node {
        message,
        next: next.back.take(),
      }));
      next.back_len += 1;
    }
    tracing::trace!(len = next.len(), capacity = next.capacity, "message stashed");
    Ok(next)
  }

  /// Returns the oldest stashed message without removing it.
  pub fn head(&self) -> Result<&T, StashError> {
    self
      .front
      .as_deref()
      .map(|node| &node.message)
      .ok_or(StashError::Empty)
  }

  /// Visits every stashed message, oldest to newest, without mutating.
  ///
  /// Inspection only; replay goes through `unstash`/`unstash_all`.
  pub fn for_each(&self, mut visit: impl FnMut(&T)) {
    let mut cursor = self.front.as_deref();
    while let Some(node) = cursor {
      visit(&node.message);
      cursor = node.next.as_deref();
    }
    // `back` stores newest-first; gather it so it can be visited oldest-first.
    let mut reversed = Vec::with_capacity(self.back_len);
    let mut cursor = self.back.as_deref();
    while let Some(node) = cursor {
      reversed.push(&node.message);
      cursor = node.next.as_deref();
    }
    for message in reversed.into_iter().rev() {
      visit(message);
    }
  }
}

impl<T: Clone> PersistentStash<T> {
  /// Returns a new buffer with the oldest message removed.
  pub fn drop_head(&self) -> Result<Self, StashError> {
    let head = self.front.as_deref().ok_or(StashError::Empty)?;
    let mut next = Self {
      capacity: self.capacity,
      front: head.next.clone(),
      front_len: self.front_len - 1,
      back: self.back.clone(),
      back_len: self.back_len,
    };
    if next.front.is_none() && next.back.is_some() {
      next.roll_back_over();
    }
    Ok(next)
  }

  /// Returns a new buffer with the first `n` messages removed, clamped to
  /// empty when `n` exceeds the current size. `n == 0` is a no-op copy.
  pub fn drop_first(&self, n: usize) -> Self {
    let mut current = self.clone();
    for _ in 0..n.min(self.len()) {
      match current.drop_head() {
        Ok(next) => current = next,
        Err(_) => break,
      }
    }
    current
  }

  /// Replays every currently buffered message through `behavior`, oldest
  /// first, returning the final behavior.
  ///
  /// `self` is rebound to the post-replay value: empty on success, the
  /// unreplayed remainder (plus anything stashed mid-pass) on fault. Clones
  /// of the pre-replay value held elsewhere are untouched.
  pub fn unstash_all<C, B>(&mut self, cx: &mut C, behavior: B) -> Result<B, B::Fault>
  where
    B: Behavior<C, T>,
  {
    let count = self.len();
    replay(self, cx, behavior, count, |message| message)
  }

  /// Replays at most `count` of the oldest buffered messages, passing each
  /// through `wrap` immediately before delivery. See [`unstash_all`](Self::unstash_all)
  /// for how `self` is rebound.
  pub fn unstash<C, B, W>(&mut self, cx: &mut C, behavior: B, count: usize, wrap: W) -> Result<B, B::Fault>
  where
    B: Behavior<C, T>,
    W: FnMut(T) -> T,
  {
    replay(self, cx, behavior, count, wrap)
  }

  /// Reverses `back` into `front`. The touched spine is rebuilt, so the
  /// messages are cloned out of their possibly shared cells.
  fn roll_back_over(&mut self) {
    let mut front: Link<T> = None;
    let mut cursor = self.back.as_deref();
    while let Some(node) = cursor {
      front = Some(Arc::new(Node {
        message: node.message.clone(),
        next: front,
      }));
      cursor = node.next.as_deref();
    }
    self.front = front;
    self.front_len = self.back_len;
    self.back = None;
    self.back_len = 0;
  }
}

impl<T> BoundedStash for PersistentStash<T> {
  fn capacity(&self) -> usize {
    self.capacity
  }

  fn len(&self) -> usize {
    self.front_len + self.back_len
  }
}

impl<T: Clone> ReplayQueue<T> for PersistentStash<T> {
  fn pop_head(&mut self) -> Option<T> {
    let message = self.head().ok()?.clone();
    if let Ok(rest) = self.drop_head() {
      *self = rest;
    }
    Some(message)
  }

  fn restash(&mut self, message: T) -> Result<(), StashError> {
    *self = self.stash(message)?;
    Ok(())
  }
}

// Cloning shares the spine; `T: Clone` is not required.
impl<T> Clone for PersistentStash<T> {
  fn clone(&self) -> Self {
    Self {
      capacity: self.capacity,
      front: self.front.clone(),
      front_len: self.front_len,
      back: self.back.clone(),
      back_len: self.back_len,
    }
  }
}

impl<T> fmt::Debug for PersistentStash<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PersistentStash")
      .field("capacity", &self.capacity)
      .field("len", &self.len())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn stash_returns_new_value_and_leaves_source_untouched() {
    let b1: PersistentStash<u32> = PersistentStash::new(4);
    let b2 = b1.stash(1).unwrap();
    let b3 = b2.stash(2).unwrap();

    assert_eq!(b1.len(), 0);
    assert_eq!(b2.len(), 1);
    assert_eq!(b3.len(), 2);
    assert_eq!(b2.head().unwrap(), &1);
    assert_eq!(b3.head().unwrap(), &1);
  }

  #[test]
  fn derived_buffers_share_the_front_spine() {
    let b1 = PersistentStash::new(4).stash(1).unwrap();
    let b2 = b1.stash(2).unwrap();

    let f1 = b1.front.as_ref().unwrap();
    let f2 = b2.front.as_ref().unwrap();
    assert!(Arc::ptr_eq(f1, f2));
  }

  #[test]
  fn overflow_is_explicit_and_nondestructive() {
    let full = PersistentStash::new(2).stash("a").unwrap().stash("b").unwrap();
    let err = full.stash("c").unwrap_err();
    assert_eq!(err, StashError::Overflow { capacity: 2 });
    assert_eq!(full.len(), 2);
    assert_eq!(full.head().unwrap(), &"a");
  }

  #[test]
  fn zero_capacity_rejects_every_stash() {
    let empty: PersistentStash<u8> = PersistentStash::new(0);
    assert!(empty.is_full());
    assert_eq!(empty.stash(7).unwrap_err(), StashError::Overflow { capacity: 0 });
  }

  #[test]
  fn head_and_drop_head_fail_on_empty() {
    let empty: PersistentStash<u8> = PersistentStash::new(3);
    assert_eq!(empty.head().unwrap_err(), StashError::Empty);
    assert_eq!(empty.drop_head().unwrap_err(), StashError::Empty);
  }

  #[test]
  fn drop_head_walks_fifo_order() {
    let buf = PersistentStash::new(3)
      .stash(1)
      .unwrap()
      .stash(2)
      .unwrap()
      .stash(3)
      .unwrap();

    let rest = buf.drop_head().unwrap();
    assert_eq!(rest.head().unwrap(), &2);
    let rest = rest.drop_head().unwrap();
    assert_eq!(rest.head().unwrap(), &3);
    let rest = rest.drop_head().unwrap();
    assert!(rest.is_empty());
    // The source is still intact.
    assert_eq!(buf.len(), 3);
  }

  #[test]
  fn drop_first_clamps_and_ignores_zero() {
    let buf = PersistentStash::new(3).stash(1).unwrap().stash(2).unwrap();
    assert_eq!(buf.drop_first(0).len(), 2);
    assert_eq!(buf.drop_first(1).head().unwrap(), &2);
    assert!(buf.drop_first(10).is_empty());
  }

  #[test]
  fn for_each_spans_both_internal_lists_in_order() {
    // Force messages onto the back list: stash, drop, stash again.
    let buf = PersistentStash::new(8)
      .stash(1)
      .unwrap()
      .stash(2)
      .unwrap()
      .stash(3)
      .unwrap()
      .drop_head()
      .unwrap()
      .stash(4)
      .unwrap()
      .stash(5)
      .unwrap();

    let mut seen = Vec::new();
    buf.for_each(|m| seen.push(*m));
    assert_eq!(seen, [2, 3, 4, 5]);
  }
}

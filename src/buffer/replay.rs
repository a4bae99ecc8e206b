//! The replay fold shared by both buffer variants.

use crate::behavior::Behavior;
use crate::buffer::BoundedStash;
use crate::error::StashError;

/// Pop/append surface the replay fold runs against.
///
/// The exclusive variant implements it directly over its queue; the
/// persistent variant implements it by rebinding itself to derived values,
/// which keeps every previously shared buffer value untouched.
pub(crate) trait ReplayQueue<M>: BoundedStash {
  /// Removes and returns the oldest buffered message, if any.
  fn pop_head(&mut self) -> Option<M>;

  /// Appends a message behind everything currently buffered.
  fn restash(&mut self, message: M) -> Result<(), StashError>;
}

/// Write handle onto the buffer currently being replayed.
///
/// Handed to [`Behavior::receive`] so a behavior can stash messages back
/// into the same buffer mid-replay. The replay batch is fixed before the
/// fold starts, so anything stashed through this handle waits for a later
/// `unstash`/`unstash_all` call.
pub struct Restash<'a, M> {
  queue: &'a mut dyn ReplayQueue<M>,
}

impl<'a, M> Restash<'a, M> {
  pub(crate) fn new(queue: &'a mut dyn ReplayQueue<M>) -> Self {
    Self { queue }
  }

  /// Stashes a message behind the current replay batch.
  ///
  /// Fails with [`StashError::Overflow`] when the buffer is full; it is up
  /// to the behavior whether that counts as a fault.
  pub fn stash(&mut self, message: M) -> Result<(), StashError> {
    self.queue.restash(message)
  }

  /// Number of buffered messages, counting the not-yet-replayed remainder.
  pub fn len(&self) -> usize {
    self.queue.len()
  }

  /// True when nothing is buffered.
  pub fn is_empty(&self) -> bool {
    self.queue.len() == 0
  }

  /// Fixed capacity of the underlying buffer.
  pub fn capacity(&self) -> usize {
    self.queue.capacity()
  }

  /// True when the underlying buffer is at capacity.
  pub fn is_full(&self) -> bool {
    self.queue.is_full()
  }
}

/// Folds `behavior` over at most `count` already-buffered messages, oldest
/// first, applying `wrap` to each immediately before delivery.
///
/// Every popped message is gone from the queue before the behavior sees it;
/// a fault therefore leaves exactly the unreplayed remainder (plus anything
/// the behavior stashed mid-pass) buffered, and propagates unchanged.
pub(crate) fn replay<Q, C, B, M, W>(
  queue: &mut Q,
  cx: &mut C,
  behavior: B,
  count: usize,
  mut wrap: W,
) -> Result<B, B::Fault>
where
  Q: ReplayQueue<M>,
  B: Behavior<C, M>,
  W: FnMut(M) -> M,
{
  // The batch is fixed up front: messages stashed during the pass must not
  // join it.
  let batch = count.min(queue.len());
  tracing::trace!(batch, capacity = queue.capacity(), "starting stash replay");

  let mut current = behavior;
  for step in 0..batch {
    let Some(message) = queue.pop_head() else {
      break;
    };
    let message = wrap(message);
    tracing::trace!(step, remaining = queue.len(), "replaying stashed message");
    let mut restash = Restash::new(&mut *queue);
    current = current.receive(cx, &mut restash, message)?;
  }
  Ok(current)
}

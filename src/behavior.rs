//! The processing seam replayed messages are folded through.
//!
//! The buffer never interprets messages itself. During `unstash`/
//! `unstash_all` it hands each buffered message, oldest first, to a
//! [`Behavior`], and the value returned from each call processes the next
//! message. The environment handle `C` belongs entirely to the caller; the
//! buffer passes it through untouched.

use crate::buffer::Restash;

/// A processor state folded over replayed messages.
///
/// `receive` consumes the current state and returns the state for the next
/// message, so a behavior can swap itself out mid-replay (typically an enum
/// moving between variants). A fault halts the replay pass immediately and
/// is surfaced to the caller of `unstash`/`unstash_all` unchanged.
pub trait Behavior<C, M>: Sized {
  /// Failure signalled by [`receive`](Self::receive). The buffer never
  /// retries or suppresses it.
  type Fault;

  /// Handles one replayed message and returns the behavior for the next one.
  ///
  /// `stash` writes back into the buffer being replayed; messages stashed
  /// through it join the buffer behind the current pass and are only seen by
  /// a later `unstash`/`unstash_all` call.
  fn receive(self, cx: &mut C, stash: &mut Restash<'_, M>, message: M) -> Result<Self, Self::Fault>;
}

/// Stationary adapter: a plain handler processes every message without
/// changing state.
impl<C, M, F, E> Behavior<C, M> for F
where
  F: FnMut(&mut C, &mut Restash<'_, M>, M) -> Result<(), E>,
{
  type Fault = E;

  fn receive(mut self, cx: &mut C, stash: &mut Restash<'_, M>, message: M) -> Result<Self, E> {
    self(cx, stash, message)?;
    Ok(self)
  }
}

//! This module implements deferred results: values settled exactly once by a
//! [`Settler`] and awaited through a [`Deferred`] future.
//!
//! The first settlement wins, later ones are ignored. When every settler is
//! gone without settling, the deferred result completes with
//! [`Rejection::Abandoned`] instead of hanging forever.

use crate::{
    panic::{self, Payload},
    value::Value,
};
use futures::future::{FusedFuture, FutureExt, Shared};
use pin_project::pin_project;
use std::{cell::Cell, fmt, future::Future, pin::Pin, rc::Rc, task};
use thiserror::Error;

/// Why a deferred result did not fulfill.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection<E> {
    /// The target reported an error through its completion callback.
    #[error("{0}")]
    Failed(E),
    /// The target panicked before settling. Carries the panic message.
    #[error("target panicked: {0}")]
    Panicked(String),
    /// Every completion callback was dropped without being called.
    #[error("completion callback dropped without being called")]
    Abandoned,
}

impl<E> Rejection<E> {
    /// The error reported by the target, if that is why it was rejected.
    pub fn failure(&self) -> Option<&E> {
        match self {
            Rejection::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Converts this rejection into the error reported by the target. Fails if
    /// the target panicked or abandoned the result.
    pub fn into_failure(self) -> Result<E, Self> {
        match self {
            Rejection::Failed(error) => Ok(error),
            other => Err(other),
        }
    }

    /// Tests whether the target panicked.
    pub fn is_panic(&self) -> bool {
        matches!(self, Rejection::Panicked(_))
    }

    /// Tests whether the completion callback was dropped without being
    /// called.
    pub fn is_abandoned(&self) -> bool {
        matches!(self, Rejection::Abandoned)
    }
}

type Outcome<T, E> = Result<T, Rejection<E>>;

struct Slot<T, E> {
    settlers: Cell<usize>,
    settled: Cell<bool>,
    waker: Cell<Option<task::Waker>>,
    outcome: Cell<Option<Outcome<T, E>>>,
}

impl<T, E> Slot<T, E> {
    fn init_pending() -> Self {
        Self {
            settlers: Cell::new(0),
            settled: Cell::new(false),
            waker: Cell::new(None),
            outcome: Cell::new(None),
        }
    }

    fn notify(&self) {
        if let Some(waker) = self.waker.take() {
            waker.wake();
        }
    }
}

/// Creates a pending deferred result, returning the handle that settles it and
/// the future that waits for it.
///
/// # Examples
///
/// ```
/// use futures::executor::block_on;
/// use promisify::deferred;
///
/// let (settler, deferred) = deferred::channel::<u32, String>();
/// settler.fulfill(42);
/// settler.reject(String::from("too late"));
/// assert_eq!(block_on(deferred), Ok(42));
/// ```
pub fn channel<T, E>() -> (Settler<T, E>, Deferred<T, E>) {
    let slot = Rc::new(Slot::init_pending());
    (Settler::new(slot.clone()), Deferred::new(slot))
}

/// The settling side of a deferred result. Cloning yields another handle to
/// the same result.
pub struct Settler<T, E> {
    slot: Rc<Slot<T, E>>,
}

impl<T, E> Settler<T, E> {
    fn new(slot: Rc<Slot<T, E>>) -> Self {
        slot.settlers.set(slot.settlers.get() + 1);
        Self { slot }
    }

    /// Fulfills the result with `value`. Returns whether this call settled it.
    pub fn fulfill(&self, value: T) -> bool {
        self.settle_with(Ok(value))
    }

    /// Rejects the result with `error`. Returns whether this call settled it.
    pub fn reject(&self, error: E) -> bool {
        self.settle_with(Err(Rejection::Failed(error)))
    }

    /// Settles following the error-first convention: a present `error`
    /// rejects, otherwise `result` fulfills.
    pub fn settle(&self, error: Option<E>, result: T) -> bool {
        match error {
            Some(error) => self.reject(error),
            None => self.fulfill(result),
        }
    }

    /// Rejects the result because the target panicked.
    pub fn panicked(&self, payload: Payload) -> bool {
        let message = panic::message(&payload);
        let settled = self.settle_with(Err(Rejection::Panicked(message.clone())));
        if settled {
            log::warn!("target panicked before settling: {}", message);
        } else {
            log::warn!("target panicked after settling: {}", message);
        }
        settled
    }

    /// Tests whether the result has already been settled.
    pub fn is_settled(&self) -> bool {
        self.slot.settled.get()
    }

    fn settle_with(&self, outcome: Outcome<T, E>) -> bool {
        if self.slot.settled.replace(true) {
            log::trace!("ignoring settlement of an already settled result");
            return false;
        }
        self.slot.outcome.set(Some(outcome));
        self.slot.notify();
        true
    }
}

impl<T, E> Clone for Settler<T, E> {
    fn clone(&self) -> Self {
        Self::new(self.slot.clone())
    }
}

impl<T, E> Drop for Settler<T, E> {
    fn drop(&mut self) {
        let remaining = self.slot.settlers.get() - 1;
        self.slot.settlers.set(remaining);
        if remaining == 0 && !self.slot.settled.get() {
            log::trace!("result abandoned by its last settler");
            self.slot.notify();
        }
    }
}

impl<T, E> fmt::Debug for Settler<T, E> {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        fmtr.debug_struct("Settler")
            .field("settled", &self.slot.settled.get())
            .finish()
    }
}

/// A future waiting for a deferred result to settle.
pub struct Deferred<T, E> {
    slot: Rc<Slot<T, E>>,
    done: bool,
}

impl<T, E> Deferred<T, E> {
    fn new(slot: Rc<Slot<T, E>>) -> Self {
        Self { slot, done: false }
    }

    /// Tests whether awaiting this result would complete right away: it was
    /// settled, or abandoned by every settler.
    pub fn is_settled(&self) -> bool {
        self.slot.settled.get() || self.slot.settlers.get() == 0
    }
}

impl<T, E> Future for Deferred<T, E> {
    type Output = Result<T, Rejection<E>>;

    fn poll(
        self: Pin<&mut Self>,
        ctx: &mut task::Context<'_>,
    ) -> task::Poll<Self::Output> {
        let this = self.get_mut();
        if this.done {
            panic!("Deferred polled after completion");
        }

        if let Some(outcome) = this.slot.outcome.take() {
            this.done = true;
            return task::Poll::Ready(outcome);
        }

        if this.slot.settlers.get() == 0 {
            this.done = true;
            return task::Poll::Ready(Err(Rejection::Abandoned));
        }

        let mut waker = this.slot.waker.take();
        if !waker.as_ref().map_or(false, |stored| stored.will_wake(ctx.waker())) {
            waker = Some(ctx.waker().clone());
        }
        this.slot.waker.set(waker);
        task::Poll::Pending
    }
}

impl<T, E> FusedFuture for Deferred<T, E> {
    fn is_terminated(&self) -> bool {
        self.done
    }
}

impl<T, E> fmt::Debug for Deferred<T, E> {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        fmtr.debug_struct("Deferred")
            .field("settled", &self.is_settled())
            .field("done", &self.done)
            .finish()
    }
}

/// A deferred result over dynamic values, as returned by wrapped functions.
///
/// Promises can be cloned and every clone can be awaited: all of them see the
/// same outcome.
#[pin_project]
#[derive(Clone)]
pub struct Promise {
    #[pin]
    inner: Shared<Deferred<Value, Value>>,
}

impl Promise {
    /// Tests whether both handles refer to the same promise.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.inner.ptr_eq(&other.inner)
    }
}

impl From<Deferred<Value, Value>> for Promise {
    fn from(deferred: Deferred<Value, Value>) -> Self {
        Self { inner: deferred.shared() }
    }
}

impl Future for Promise {
    type Output = Result<Value, Rejection<Value>>;

    fn poll(
        self: Pin<&mut Self>,
        ctx: &mut task::Context<'_>,
    ) -> task::Poll<Self::Output> {
        self.project().inner.poll(ctx)
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        fmtr.debug_struct("Promise").finish_non_exhaustive()
    }
}

//! This module defines the completion callbacks handed to callback-style
//! targets, and converts typed callback-style closures into functions
//! returning deferred results.

use crate::{
    deferred::{self, Deferred, Settler},
    panic,
};
use std::fmt;

/// The completion callback synthesized for each call of a wrapped function.
///
/// It follows the error-first convention: calling it with an error rejects the
/// deferred result, calling it without one fulfills the deferred result with
/// the given value. Since calling consumes it, it settles at most once.
pub struct Fulfill<T, E> {
    settler: Settler<T, E>,
}

impl<T, E> Fulfill<T, E> {
    /// The name every completion callback carries.
    pub const NAME: &'static str = "fulfill";

    pub(crate) fn new(settler: Settler<T, E>) -> Self {
        Self { settler }
    }

    /// The name of this callback, which is always `fulfill`.
    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    /// Completes the call, error first.
    pub fn call(self, error: Option<E>, result: T) {
        self.settler.settle(error, result);
    }

    /// Completes the call successfully.
    pub fn resolve(self, result: T) {
        self.settler.fulfill(result);
    }

    /// Completes the call with an error.
    pub fn reject(self, error: E) {
        self.settler.reject(error);
    }

    /// Converts this callback into a plain closure with the error-first
    /// signature, for targets that expect one.
    pub fn into_fn(self) -> impl FnOnce(Option<E>, T) {
        move |error, result| self.call(error, result)
    }
}

impl<T, E> fmt::Debug for Fulfill<T, E> {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        fmtr.debug_struct("Fulfill").field("settler", &self.settler).finish()
    }
}

/// Creates a deferred result, hands its completion callback to `run` and
/// returns the result without waiting for it. A panic inside `run` rejects
/// the result.
pub(crate) fn invoke<T, E, F>(run: F) -> Deferred<T, E>
where
    F: FnOnce(Fulfill<T, E>),
{
    let (settler, deferred) = deferred::channel();
    let fulfill = Fulfill::new(settler.clone());
    if let Err(payload) = panic::catch(move || run(fulfill)) {
        settler.panicked(payload);
    }
    deferred
}

/// Converts a typed callback-style closure into a function returning deferred
/// results. The closure receives the caller's arguments and the completion
/// callback; it is invoked once per call, before the call returns.
///
/// # Examples
///
/// ```
/// use futures::executor::block_on;
/// use promisify::callback::{wrap_fn, Fulfill};
///
/// fn parse(input: String, done: Fulfill<u32, String>) {
///     match input.parse() {
///         Ok(number) => done.call(None, number),
///         Err(_) => done.call(Some(format!("not a number: {}", input)), 0),
///     }
/// }
///
/// let parse = wrap_fn(parse);
/// assert_eq!(block_on(parse(String::from("42"))), Ok(42));
/// assert!(block_on(parse(String::from("x"))).is_err());
/// ```
pub fn wrap_fn<A, T, E, F>(target: F) -> impl Fn(A) -> Deferred<T, E>
where
    F: Fn(A, Fulfill<T, E>),
{
    move |args| {
        log::trace!("invoking typed target");
        invoke(|fulfill| target(args, fulfill))
    }
}

/// Like [`wrap_fn`], but every invocation of `target` also receives
/// `context`, for targets depending on some receiver.
pub fn wrap_fn_with<C, A, T, E, F>(
    target: F,
    context: C,
) -> impl Fn(A) -> Deferred<T, E>
where
    F: Fn(&C, A, Fulfill<T, E>),
{
    move |args| {
        log::trace!("invoking typed target with context");
        invoke(|fulfill| target(&context, args, fulfill))
    }
}

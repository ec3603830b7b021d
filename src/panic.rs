use std::{any::Any, panic};

pub type Payload = Box<dyn Any + Send + 'static>;

/// Runs `body`, turning a panic into its payload instead of unwinding into the
/// caller.
pub fn catch<F, T>(body: F) -> Result<T, Payload>
where
    F: FnOnce() -> T,
{
    panic::catch_unwind(panic::AssertUnwindSafe(body))
}

/// Extracts the human readable part of a panic payload. Payloads produced by
/// `panic!` carry either a `&'static str` or a `String`.
pub fn message(payload: &Payload) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("opaque panic payload")
    }
}

//! Converts callback-style asynchronous functions into functions returning
//! deferred results.
//!
//! A callback-style function takes its arguments followed by a completion
//! callback, which it eventually calls error first: `(error, result)`. Wrapping
//! it yields a function taking only the arguments and returning a
//! [`Promise`](deferred::Promise), a future that rejects with the error or
//! fulfills with the result.
//!
//! Functions can be wrapped one at a time with [`wrap`], or as a mapping of
//! named functions with [`all`], [`some`] (also [`only`]) and [`except`].
//! Batches never wrap names ending with `Sync`, `Stream` or `Promise`, see
//! [`Convention`].
//!
//! # Examples
//!
//! ```
//! use futures::executor::block_on;
//! use promisify::value::{Function, Mapping, Value};
//!
//! fn callback_of(args: &[Value]) -> Function {
//!     args.last().and_then(Value::as_function).unwrap().clone()
//! }
//!
//! let api: Mapping = [
//!     (
//!         "load",
//!         Function::new("load", |_, args| {
//!             callback_of(&args).invoke(vec![Value::Null, Value::from("data")])
//!         }),
//!     ),
//!     (
//!         "loadSync",
//!         Function::new("loadSync", |_, _| Value::from("data")),
//!     ),
//! ]
//! .into_iter()
//! .collect();
//!
//! let api = promisify::all(&Value::from(api), None).unwrap();
//!
//! let load = api["load"].as_function().unwrap();
//! let promise = load.invoke(vec![]).into_promise().unwrap();
//! assert_eq!(block_on(promise), Ok(Value::from("data")));
//!
//! let load_sync = api["loadSync"].as_function().unwrap();
//! assert_eq!(load_sync.invoke(vec![]), Value::from("data"));
//! ```
//!
//! Typed Rust closures following the same convention are converted with
//! [`callback::wrap_fn`].

#![warn(missing_docs)]
#![cfg_attr(feature = "feature-doc-cfg", feature(doc_cfg))]

mod panic;

pub mod callback;

pub mod convention;

mod convert;

pub mod deferred;

pub mod error;

pub mod helpers;

#[cfg(feature = "js")]
#[cfg_attr(feature = "feature-doc-cfg", doc(cfg(feature = "js")))]
pub mod js;

pub mod value;

pub use convention::Convention;
pub use convert::{all, except, only, some, wrap, Promisify};
pub use error::Error;

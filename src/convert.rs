//! This module converts callback-style functions into functions returning
//! promises, either one at a time or in batches of named functions.
//!
//! A callback-style function takes its arguments followed by a completion
//! callback, and eventually calls that callback error first: `(error, result)`.
//! The converted function takes only the arguments and returns a
//! [`Promise`] that settles when the completion callback is called.

use crate::{
    callback::{self, Fulfill},
    convention::Convention,
    deferred::Promise,
    error::Error,
    helpers,
    value::{Function, Mapping, Value},
};
use std::cell::Cell;

/// Converter configuration: the receiver given to targets and the naming
/// convention applied to batches.
///
/// The free functions [`wrap`], [`all`], [`some`] and [`except`] use a
/// default converter.
#[derive(Debug, Clone, Default)]
pub struct Promisify {
    context: Option<Value>,
    convention: Convention,
}

impl Promisify {
    /// Creates a converter without context, using the default convention.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every target receive `context` as its receiver, instead of the
    /// receiver the wrapped function is called with. A `null` or `undefined`
    /// context means no context.
    pub fn context<V>(mut self, context: V) -> Self
    where
        V: Into<Value>,
    {
        let context = context.into();
        self.context = if context.is_nullish() { None } else { Some(context) };
        self
    }

    /// Replaces the naming convention used by batch conversions.
    pub fn convention(mut self, convention: Convention) -> Self {
        self.convention = convention;
        self
    }

    /// Wraps a single callback-style function.
    ///
    /// Fails if `target` is not a function.
    pub fn wrap(&self, target: &Value) -> Result<Function, Error> {
        let target = match target {
            Value::Function(function) => function.clone(),
            other => return Err(Error::expected_function(other.kind())),
        };
        let context = self.context.clone();

        Ok(Function::new(target.name().to_owned(), move |this, args| {
            let receiver = context.as_ref().unwrap_or(this);
            Value::Promise(invoke(&target, receiver, args))
        }))
    }

    /// Wraps every function of `targets`, except the ones excluded by the
    /// naming convention.
    pub fn all(&self, targets: &Value) -> Result<Mapping, Error> {
        let targets = targets_of(targets)?;
        self.convert(targets, |_| true)
    }

    /// Wraps the functions of `targets` named in `list`, except the ones
    /// excluded by the naming convention. Names without a matching target are
    /// ignored.
    pub fn some(&self, targets: &Value, list: &Value) -> Result<Mapping, Error> {
        let targets = targets_of(targets)?;
        let names = names_of(list)?;
        self.convert(targets, |name| names.iter().any(|listed| *listed == name))
    }

    /// Same as [`Promisify::some`].
    pub fn only(&self, targets: &Value, list: &Value) -> Result<Mapping, Error> {
        self.some(targets, list)
    }

    /// Wraps the functions of `targets` not named in `list`, except the ones
    /// excluded by the naming convention.
    pub fn except(
        &self,
        targets: &Value,
        list: &Value,
    ) -> Result<Mapping, Error> {
        let targets = targets_of(targets)?;
        let names = names_of(list)?;
        self.convert(targets, |name| names.iter().all(|listed| *listed != name))
    }

    fn convert<S>(&self, targets: &Mapping, selected: S) -> Result<Mapping, Error>
    where
        S: Fn(&str) -> bool,
    {
        helpers::try_map_mapping(targets, |target, name, _| {
            if self.convention.excludes(name) {
                log::debug!("passing `{}` through: naming convention", name);
                Ok(target.clone())
            } else if !selected(name) {
                log::debug!("passing `{}` through: not selected", name);
                Ok(target.clone())
            } else {
                log::debug!("wrapping `{}`", name);
                self.wrap(target).map(Value::Function)
            }
        })
    }
}

fn targets_of(targets: &Value) -> Result<&Mapping, Error> {
    match targets {
        Value::Object(mapping) => Ok(mapping),
        other => Err(Error::expected_targets(other.kind())),
    }
}

fn names_of(list: &Value) -> Result<Vec<&str>, Error> {
    let elements = match list {
        Value::Array(elements) => elements,
        other => return Err(Error::expected_list(other.kind())),
    };
    if !helpers::is_array_of(elements, |element, _, _| element.is_string()) {
        return Err(Error::expected_names());
    }
    Ok(elements.iter().filter_map(Value::as_str).collect())
}

fn invoke(target: &Function, receiver: &Value, mut args: Vec<Value>) -> Promise {
    log::trace!("invoking `{}` with {} argument(s)", target.name(), args.len());
    let deferred = callback::invoke(|fulfill| {
        args.push(Value::Function(completion(fulfill)));
        target.call(receiver, args);
    });
    Promise::from(deferred)
}

/// Exposes a completion callback as a function value named `fulfill`. Only the
/// first call has an effect.
fn completion(fulfill: Fulfill<Value, Value>) -> Function {
    let fulfill = Cell::new(Some(fulfill));
    Function::new(Fulfill::<Value, Value>::NAME, move |_, args| {
        let mut args = args.into_iter();
        let error = args.next().filter(|error| !error.is_nullish());
        let result = args.next().unwrap_or_default();
        match fulfill.take() {
            Some(fulfill) => fulfill.call(error, result),
            None => log::trace!("ignoring repeated call of `fulfill`"),
        }
        Value::Undefined
    })
}

/// Wraps a single callback-style function. With a `context`, the target
/// always receives it as its receiver; without, or with a `null` or
/// `undefined` one, it receives the receiver the wrapped function is called
/// with.
///
/// # Examples
///
/// ```
/// use futures::executor::block_on;
/// use promisify::value::{Function, Value};
///
/// let greet = Function::new("greet", |_this, args| {
///     let name = args[0].clone();
///     let callback = args[1].as_function().unwrap().clone();
///     callback.invoke(vec![Value::Null, Value::from(format!("hi {}", name))])
/// });
///
/// let greet = promisify::wrap(&Value::from(greet), None).unwrap();
/// let promise = greet.invoke(vec![Value::from("pony")]).into_promise().unwrap();
/// assert_eq!(block_on(promise), Ok(Value::from("hi pony")));
///
/// let error = promisify::wrap(&Value::from("nope"), None).unwrap_err();
/// assert_eq!(error.to_string(), "Expected target function. Received string");
/// ```
pub fn wrap(target: &Value, context: Option<&Value>) -> Result<Function, Error> {
    with_context(context).wrap(target)
}

/// Wraps every function of the mapping `targets`, except the ones whose name
/// ends with `Sync`, `Stream` or `Promise`.
pub fn all(targets: &Value, context: Option<&Value>) -> Result<Mapping, Error> {
    with_context(context).all(targets)
}

/// Wraps the functions of the mapping `targets` named in `list`, except the
/// ones whose name ends with `Sync`, `Stream` or `Promise`.
pub fn some(
    targets: &Value,
    list: &Value,
    context: Option<&Value>,
) -> Result<Mapping, Error> {
    with_context(context).some(targets, list)
}

pub use self::some as only;

/// Wraps the functions of the mapping `targets` not named in `list`, except
/// the ones whose name ends with `Sync`, `Stream` or `Promise`.
pub fn except(
    targets: &Value,
    list: &Value,
    context: Option<&Value>,
) -> Result<Mapping, Error> {
    with_context(context).except(targets, list)
}

fn with_context(context: Option<&Value>) -> Promisify {
    let context = context.filter(|context| !context.is_nullish()).cloned();
    Promisify { context, convention: Convention::default() }
}

//! This module defines the dynamic values exchanged with callback-style APIs:
//! the arguments given to targets, the results and errors they report, and
//! the functions and mappings of functions themselves.

mod function;
mod mapping;

use crate::deferred::Promise;
use regex::Regex;
use std::fmt;

pub use function::Function;
pub use mapping::{Entries, Mapping};

/// A dynamically typed value.
#[derive(Clone)]
pub enum Value {
    /// Absence of a value, e.g. a missing argument.
    Undefined,
    /// Explicit absence of a value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    String(String),
    /// An ordered sequence of values.
    Array(Vec<Value>),
    /// A plain mapping from names to values.
    Object(Mapping),
    /// A regular expression.
    RegExp(Regex),
    /// A primitive value boxed into a wrapper object.
    Boxed(Box<Value>),
    /// A function. Compared by identity.
    Function(Function),
    /// A deferred result. Compared by identity.
    Promise(Promise),
}

impl Value {
    /// Name of this value's type, as reported in error messages: `undefined`,
    /// `null`, `boolean`, `number`, `string`, `array`, `object`, `regexp`,
    /// `function` or `promise`. A boxed value is a wrapper object, so it
    /// reports `object`.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::RegExp(_) => "regexp",
            Value::Boxed(_) => "object",
            Value::Function(_) => "function",
            Value::Promise(_) => "promise",
        }
    }

    /// Tests whether this value is `undefined` or `null`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Tests whether this value counts as true in a condition. `undefined`,
    /// `null`, `false`, `0`, `NaN` and the empty string are falsy, everything
    /// else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(value) => *value,
            Value::Number(value) => *value != 0.0 && !value.is_nan(),
            Value::String(value) => !value.is_empty(),
            _ => true,
        }
    }

    /// Tests whether this value is a (non-boxed) string.
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Tests whether this value is a function.
    pub fn is_function(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// Tests whether this value is a promise.
    pub fn is_promise(&self) -> bool {
        matches!(self, Value::Promise(_))
    }

    /// The contents of a (non-boxed) string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    /// The function, if this is one.
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    /// The entries of a plain mapping.
    pub fn as_object(&self) -> Option<&Mapping> {
        match self {
            Value::Object(mapping) => Some(mapping),
            _ => None,
        }
    }

    /// The elements of an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(elements) => Some(elements),
            _ => None,
        }
    }

    /// Converts this value into a promise. Fails, giving the value back, if it
    /// is not one.
    pub fn into_promise(self) -> Result<Promise, Self> {
        match self {
            Value::Promise(promise) => Ok(promise),
            other => Err(other),
        }
    }

    /// Boxes a primitive into a wrapper object.
    pub fn boxed<V>(primitive: V) -> Self
    where
        V: Into<Value>,
    {
        Value::Boxed(Box::new(primitive.into()))
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Undefined
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(left), Value::Bool(right)) => left == right,
            (Value::Number(left), Value::Number(right)) => left == right,
            (Value::String(left), Value::String(right)) => left == right,
            (Value::Array(left), Value::Array(right)) => left == right,
            (Value::Object(left), Value::Object(right)) => left == right,
            (Value::RegExp(left), Value::RegExp(right)) => {
                left.as_str() == right.as_str()
            },
            (Value::Boxed(left), Value::Boxed(right)) => left == right,
            (Value::Function(left), Value::Function(right)) => {
                left.ptr_eq(right)
            },
            (Value::Promise(left), Value::Promise(right)) => {
                left.ptr_eq(right)
            },
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Undefined => write!(fmtr, "Undefined"),
            Value::Null => write!(fmtr, "Null"),
            Value::Bool(value) => fmtr.debug_tuple("Bool").field(value).finish(),
            Value::Number(value) => {
                fmtr.debug_tuple("Number").field(value).finish()
            },
            Value::String(value) => {
                fmtr.debug_tuple("String").field(value).finish()
            },
            Value::Array(elements) => fmtr.debug_list().entries(elements).finish(),
            Value::Object(mapping) => fmt::Debug::fmt(mapping, fmtr),
            Value::RegExp(regex) => {
                fmtr.debug_tuple("RegExp").field(&regex.as_str()).finish()
            },
            Value::Boxed(inner) => fmtr.debug_tuple("Boxed").field(inner).finish(),
            Value::Function(function) => fmt::Debug::fmt(function, fmtr),
            Value::Promise(promise) => fmt::Debug::fmt(promise, fmtr),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Undefined => write!(fmtr, "undefined"),
            Value::Null => write!(fmtr, "null"),
            Value::Bool(value) => write!(fmtr, "{}", value),
            Value::Number(value) => write!(fmtr, "{}", value),
            Value::String(value) => write!(fmtr, "{}", value),
            Value::Array(elements) => {
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        write!(fmtr, ",")?;
                    }
                    if !element.is_nullish() {
                        write!(fmtr, "{}", element)?;
                    }
                }
                Ok(())
            },
            Value::Object(_) => write!(fmtr, "[object Object]"),
            Value::RegExp(regex) => write!(fmtr, "/{}/", regex.as_str()),
            Value::Boxed(inner) => write!(fmtr, "{}", inner),
            Value::Function(function) => {
                write!(fmtr, "function {}() {{ [native code] }}", function.name())
            },
            Value::Promise(_) => write!(fmtr, "[object Promise]"),
        }
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Undefined
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(value.into())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<Value>,
{
    fn from(elements: Vec<T>) -> Self {
        Value::Array(elements.into_iter().map(Into::into).collect())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<Mapping> for Value {
    fn from(mapping: Mapping) -> Self {
        Value::Object(mapping)
    }
}

impl From<Regex> for Value {
    fn from(regex: Regex) -> Self {
        Value::RegExp(regex)
    }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self {
        Value::Function(function)
    }
}

impl From<Promise> for Value {
    fn from(promise: Promise) -> Self {
        Value::Promise(promise)
    }
}

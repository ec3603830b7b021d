//! Predicates and transforms over values, sequences and mappings.

use crate::value::{Mapping, Value};

/// Tests whether `value` is a plain mapping of names to values. Every other
/// kind of value, including arrays, regular expressions, functions and boxed
/// primitives, is rejected.
pub fn is_plain_object(value: &Value) -> bool {
    matches!(value, Value::Object(_))
}

/// Tests whether every element of `sequence` satisfies `predicate`, which
/// receives the element, its index and the whole sequence.
///
/// Only a verdict of exactly `false` stops the iteration and fails the test:
/// verdicts such as `undefined`, `0` or the empty string are not failures.
/// An empty sequence always passes.
///
/// # Examples
///
/// ```
/// use promisify::{helpers::is_array_of, value::Value};
///
/// let names = vec![Value::from("earth pony"), Value::from("unicorn")];
/// assert!(is_array_of(&names, |name, _, _| name.is_string()));
///
/// // `undefined` is not `false`.
/// let mixed = vec![Value::from("one"), Value::from(2)];
/// assert!(is_array_of(&mixed, |_, _, _| ()));
/// ```
pub fn is_array_of<T, P, R>(sequence: &[T], mut predicate: P) -> bool
where
    P: FnMut(&T, usize, &[T]) -> R,
    R: Into<Value>,
{
    for (index, element) in sequence.iter().enumerate() {
        if let Value::Bool(false) = predicate(element, index, sequence).into() {
            return false;
        }
    }
    true
}

/// Creates a mapping with the same keys as `mapping`, each value replaced by
/// `transform(value, key, mapping)`.
pub fn map_mapping<F>(mapping: &Mapping, mut transform: F) -> Mapping
where
    F: FnMut(&Value, &str, &Mapping) -> Value,
{
    mapping
        .iter()
        .map(|(key, value)| (key, transform(value, key, mapping)))
        .collect()
}

/// Fallible [`map_mapping`]: stops at, and returns, the first error.
pub fn try_map_mapping<F, E>(
    mapping: &Mapping,
    mut transform: F,
) -> Result<Mapping, E>
where
    F: FnMut(&Value, &str, &Mapping) -> Result<Value, E>,
{
    mapping
        .iter()
        .map(|(key, value)| Ok((key, transform(value, key, mapping)?)))
        .collect()
}

/// Creates a mapping holding only the entries of `mapping` whose verdict
/// `predicate(value, key, mapping)` is truthy, in their original order.
pub fn filter_mapping<P, R>(mapping: &Mapping, mut predicate: P) -> Mapping
where
    P: FnMut(&Value, &str, &Mapping) -> R,
    R: Into<Value>,
{
    mapping
        .iter()
        .filter(|(key, value)| predicate(value, key, mapping).into().is_truthy())
        .map(|(key, value)| (key, value.clone()))
        .collect()
}

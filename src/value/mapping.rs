use crate::value::Value;
use std::{fmt, ops::Index, slice, vec};

/// A mapping from names to values that remembers insertion order.
///
/// Keys are unique: inserting an existing key replaces its value in place.
#[derive(Clone, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<(String, Value)>,
}

impl Mapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty mapping with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::with_capacity(capacity) }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Tests whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.position(key).map(|index| &self.entries[index].1)
    }

    /// Tests whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Inserts a value, returning the one previously stored under `key`. A new
    /// key goes after every existing key; an existing key keeps its position.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<Value>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(index) => {
                Some(std::mem::replace(&mut self.entries[index].1, value))
            },
            None => {
                self.entries.push((key, value));
                None
            },
        }
    }

    /// Iterates over the keys, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Iterates over the values, in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Iterates over the entries, in insertion order.
    pub fn iter(&self) -> Entries<'_> {
        Entries { inner: self.entries.iter() }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(stored, _)| stored == key)
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        fmtr.debug_map().entries(self.iter()).finish()
    }
}

/// # Panics
/// Panics if `key` is not present in the mapping.
impl Index<&str> for Mapping {
    type Output = Value;

    fn index(&self, key: &str) -> &Self::Output {
        match self.get(key) {
            Some(value) => value,
            None => panic!("no entry found for key {:?}", key),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Mapping
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I>(iterable: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let iterator = iterable.into_iter();
        let mut mapping = Self::with_capacity(iterator.size_hint().0);
        for (key, value) in iterator {
            mapping.insert(key, value);
        }
        mapping
    }
}

impl<K, V> Extend<(K, V)> for Mapping
where
    K: Into<String>,
    V: Into<Value>,
{
    fn extend<I>(&mut self, iterable: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in iterable {
            self.insert(key, value);
        }
    }
}

/// Iterator over the entries of a [`Mapping`].
#[derive(Debug, Clone)]
pub struct Entries<'map> {
    inner: slice::Iter<'map, (String, Value)>,
}

impl<'map> Iterator for Entries<'map> {
    type Item = (&'map str, &'map Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, value)| (key.as_str(), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'map> IntoIterator for &'map Mapping {
    type Item = (&'map str, &'map Value);
    type IntoIter = Entries<'map>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Value);
    type IntoIter = vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

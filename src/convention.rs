//! The naming convention deciding which names are never wrapped.
//!
//! APIs commonly publish synchronous, streaming or already deferred variants of
//! their callback-style functions under suffixed names (`readFileSync`,
//! `createReadStream`, `readFilePromise`). Such names must not be wrapped.

use crate::error::Error;
use regex::Regex;

const DEFAULT_SUFFIXES: [&str; 3] = ["Sync", "Stream", "Promise"];

#[derive(Debug, Clone)]
enum Rule {
    Suffixes(Vec<String>),
    Pattern(Regex),
    Disabled,
}

/// Decides which names are excluded from wrapping whatever the caller asks
/// for.
#[derive(Debug, Clone)]
pub struct Convention {
    rule: Rule,
}

impl Convention {
    /// Excludes names ending with one of `suffixes`. The suffix alone is not
    /// enough: a name must have something before it to be excluded.
    pub fn suffixes<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rule: Rule::Suffixes(suffixes.into_iter().map(Into::into).collect()),
        }
    }

    /// Excludes names matched by the regular expression `source`.
    pub fn pattern(source: &str) -> Result<Self, Error> {
        Ok(Self { rule: Rule::Pattern(Regex::new(source)?) })
    }

    /// Excludes nothing.
    pub fn disabled() -> Self {
        Self { rule: Rule::Disabled }
    }

    /// Tests whether `name` must be passed through unwrapped.
    ///
    /// # Examples
    ///
    /// ```
    /// use promisify::Convention;
    ///
    /// let convention = Convention::default();
    /// assert!(convention.excludes("readFileSync"));
    /// assert!(convention.excludes("createReadStream"));
    /// assert!(!convention.excludes("readFile"));
    /// assert!(!convention.excludes("Sync"));
    /// ```
    pub fn excludes(&self, name: &str) -> bool {
        match &self.rule {
            Rule::Suffixes(suffixes) => suffixes.iter().any(|suffix| {
                name.len() > suffix.len() && name.ends_with(suffix.as_str())
            }),
            Rule::Pattern(pattern) => pattern.is_match(name),
            Rule::Disabled => false,
        }
    }
}

/// Excludes names ending with `Sync`, `Stream` or `Promise`.
impl Default for Convention {
    fn default() -> Self {
        Self::suffixes(DEFAULT_SUFFIXES)
    }
}

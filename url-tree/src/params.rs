use std::{borrow::Cow, ops::Index, sync::Arc};

use serde::{de, Deserialize};

use crate::de::ParamsDeserializer;

/// Name of the parameter holding the unmatched remainder of a resolved path.
pub const PATH_INFO: &str = "path_info";

/// Value captured for a single variable segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// Segment text, for unrestricted variables and for [`PATH_INFO`].
    Segment(String),

    /// Match of a pattern restriction.
    Match(SegmentMatch),

    /// Output of a predicate restriction.
    Converted(String),
}

impl Param {
    /// Returns the value as text; for pattern matches this is the whole match.
    pub fn as_str(&self) -> &str {
        match self {
            Param::Segment(s) | Param::Converted(s) => s,
            Param::Match(m) => m.as_str(),
        }
    }

    /// Returns the pattern match, if this value came from a pattern restriction.
    pub fn as_match(&self) -> Option<&SegmentMatch> {
        match self {
            Param::Match(m) => Some(m),
            _ => None,
        }
    }
}

impl PartialEq<str> for Param {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Param {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Capture groups of a pattern restriction matched against a segment.
///
/// Group 0 is the whole match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentMatch {
    groups: Vec<Option<String>>,
    names: Arc<[Option<String>]>,
}

impl SegmentMatch {
    pub(crate) fn new(groups: Vec<Option<String>>, names: Arc<[Option<String>]>) -> Self {
        SegmentMatch { groups, names }
    }

    pub fn as_str(&self) -> &str {
        self.get(0).unwrap_or_default()
    }

    /// Returns capture group `idx`, or `None` if it does not exist or did not participate.
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.groups.get(idx)?.as_deref()
    }

    /// Returns the named capture group `name`.
    pub fn name(&self, name: &str) -> Option<&str> {
        let idx = self.names.iter().position(|n| n.as_deref() == Some(name))?;
        self.get(idx)
    }

    /// Returns the numbered capture groups, without the whole match.
    pub fn captures(&self) -> impl ExactSizeIterator<Item = Option<&str>> + '_ {
        self.groups.iter().skip(1).map(Option::as_deref)
    }

    /// Returns the named capture groups, each with its value if it took part in the match.
    pub fn named(&self) -> impl Iterator<Item = (&str, Option<&str>)> + '_ {
        self.names
            .iter()
            .zip(&self.groups)
            .filter_map(|(name, group)| Some((name.as_deref()?, group.as_deref())))
    }

    /// Number of groups, including the whole match.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Parameters extracted while resolving a path.
///
/// Entries keep the order in which they were captured, with [`PATH_INFO`] last when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(Cow<'static, str>, Param)>,
}

impl Params {
    pub fn new() -> Self {
        Params::default()
    }

    /// Stores `value` under `name`, replacing an earlier value in place.
    pub(crate) fn set(&mut self, name: impl Into<Cow<'static, str>>, value: Param) {
        let name = name.into();

        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Returns the value of parameter `name` as text.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.param(name).map(Param::as_str)
    }

    /// Returns the value of parameter `name`.
    pub fn param(&self, name: &str) -> Option<&Param> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Returns the unmatched remainder of the resolved path, if any.
    pub fn path_info(&self) -> Option<&str> {
        self.get(PATH_INFO)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.param(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over `(name, value)` pairs, in capture order.
    pub fn iter(&self) -> ParamsIter<'_> {
        ParamsIter {
            inner: self.entries.iter(),
        }
    }

    /// Same as [`iter`](Self::iter), yielding the full [`Param`] values.
    pub fn iter_params(&self) -> impl ExactSizeIterator<Item = (&str, &Param)> + '_ {
        self.entries.iter().map(|(name, value)| (&**name, value))
    }

    /// Deserializes the parameters into `U`.
    ///
    /// Structs and maps are filled by name, tuples and sequences by position.
    ///
    /// # Errors
    /// Returns error when the parameters cannot be deserialized into a `U` type.
    pub fn load<'de, U: Deserialize<'de>>(&'de self) -> Result<U, de::value::Error> {
        Deserialize::deserialize(ParamsDeserializer::new(self))
    }
}

#[derive(Debug, Clone)]
pub struct ParamsIter<'a> {
    inner: std::slice::Iter<'a, (Cow<'static, str>, Param)>,
}

impl<'a> Iterator for ParamsIter<'a> {
    type Item = (&'a str, &'a str);

    #[inline]
    fn next(&mut self) -> Option<(&'a str, &'a str)> {
        self.inner
            .next()
            .map(|(name, value)| (name.as_ref(), value.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for ParamsIter<'_> {}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a str, &'a str);
    type IntoIter = ParamsIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> Index<&'a str> for Params {
    type Output = str;

    fn index(&self, name: &'a str) -> &str {
        self.get(name).expect("Value for parameter is not available")
    }
}

impl Index<usize> for Params {
    type Output = str;

    fn index(&self, idx: usize) -> &str {
        self.entries[idx].1.as_str()
    }
}

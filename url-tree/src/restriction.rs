//! Restrictions on variable segments and the regex backend they compile to.
//!
//! The regex engine is `regex` when the `unicode` crate feature is enabled and `regex-lite`
//! otherwise.

use std::{any::TypeId, fmt, str::FromStr, sync::Arc};

use cfg_if::cfg_if;

use crate::params::SegmentMatch;

cfg_if! {
    if #[cfg(feature = "unicode")] {
        use regex::Regex;
    } else {
        use regex_lite::Regex;
    }
}

/// Constraint on the segments a variable accepts.
///
/// A restriction is either a regular expression, whose match becomes the parameter value, or a
/// predicate, whose output becomes the parameter value.
///
/// Variables at the same tree level are told apart by their restriction, so restrictions are
/// compared: patterns by their source text and predicates by identity. Clone a predicate
/// restriction to reuse it for the same variable in several routes.
#[derive(Debug, Clone, PartialEq)]
pub enum Restriction {
    /// Regular expression source. It is tested from the start of the segment and anchored at
    /// the end (`$` is appended unless already present).
    Pattern(String),

    /// Conversion function; returning `None` rejects the segment.
    Predicate(Predicate),
}

impl Restriction {
    /// Restricts a variable to segments matching the regular expression `source`.
    pub fn pattern(source: impl Into<String>) -> Self {
        Restriction::Pattern(source.into())
    }

    /// Restricts a variable to segments accepted by `func`.
    ///
    /// The `Ok` value, rendered with [`ToString`], becomes the parameter value. Any `Err` is a
    /// non-match for this variable only; resolution goes on with the next candidate.
    ///
    /// # Examples
    /// ```
    /// # use url_tree::Restriction;
    /// let even = Restriction::predicate(|seg: &str| match seg.parse::<u64>() {
    ///     Ok(n) if n % 2 == 0 => Ok(n),
    ///     _ => Err(()),
    /// });
    ///
    /// // clones share identity, distinct closures do not
    /// assert_eq!(even, even.clone());
    /// ```
    pub fn predicate<F, V, E>(func: F) -> Self
    where
        F: Fn(&str) -> Result<V, E> + Send + Sync + 'static,
        V: ToString,
    {
        Restriction::Predicate(Predicate::new(func))
    }

    /// Restricts a variable to segments that parse as `V`.
    ///
    /// The parameter value is the parsed value rendered back to text, so `parse::<u32>()` turns
    /// `"007"` into `"7"`. Two `parse` restrictions for the same `V` compare equal.
    pub fn parse<V>() -> Self
    where
        V: FromStr + ToString + 'static,
    {
        let mut pred = Predicate::new(|seg: &str| seg.parse::<V>());
        pred.kind = Some(TypeId::of::<V>());
        Restriction::Predicate(pred)
    }
}

impl From<&str> for Restriction {
    fn from(source: &str) -> Self {
        Restriction::pattern(source)
    }
}

impl From<String> for Restriction {
    fn from(source: String) -> Self {
        Restriction::pattern(source)
    }
}

impl From<Predicate> for Restriction {
    fn from(pred: Predicate) -> Self {
        Restriction::Predicate(pred)
    }
}

type ConvertFn = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Shared conversion function used by [`Restriction::Predicate`].
#[derive(Clone)]
pub struct Predicate {
    func: Arc<ConvertFn>,
    kind: Option<TypeId>,
}

impl Predicate {
    pub fn new<F, V, E>(func: F) -> Self
    where
        F: Fn(&str) -> Result<V, E> + Send + Sync + 'static,
        V: ToString,
    {
        Predicate {
            func: Arc::new(move |seg: &str| func(seg).ok().map(|val| val.to_string())),
            kind: None,
        }
    }

    /// Runs the conversion, returning `None` when the segment is rejected.
    pub fn convert(&self, segment: &str) -> Option<String> {
        (self.func)(segment)
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        match (self.kind, other.kind) {
            (Some(a), Some(b)) => a == b,
            _ => Arc::as_ptr(&self.func) as *const () == Arc::as_ptr(&other.func) as *const (),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({:p})", Arc::as_ptr(&self.func) as *const ())
    }
}

/// Regex compiled from a [`Restriction::Pattern`] source.
#[derive(Debug, Clone)]
pub(crate) struct CompiledPattern {
    re: Regex,
    names: Arc<[Option<String>]>,
}

impl CompiledPattern {
    /// Compiles `source`, anchored at the start of the segment and at its end.
    ///
    /// Returns the engine's error message if `source` is not a valid expression.
    pub(crate) fn new(source: &str) -> Result<Self, String> {
        let mut anchored = String::with_capacity(source.len() + 6);
        anchored.push_str("^(?:");
        anchored.push_str(source);
        if !source.ends_with('$') {
            anchored.push('$');
        }
        anchored.push(')');

        let re = Regex::new(&anchored).map_err(|err| err.to_string())?;
        let names = re
            .capture_names()
            .map(|name| name.map(str::to_owned))
            .collect();

        Ok(CompiledPattern { re, names })
    }

    /// Tests `segment`, capturing all groups on success.
    pub(crate) fn captures(&self, segment: &str) -> Option<SegmentMatch> {
        let caps = self.re.captures(segment)?;
        let groups = caps
            .iter()
            .map(|group| group.map(|m| m.as_str().to_owned()))
            .collect();

        Some(SegmentMatch::new(groups, Arc::clone(&self.names)))
    }
}

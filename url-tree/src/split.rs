use std::iter::FusedIterator;

pub(crate) const SEPARATOR: char = '/';

/// Splits a path into its non-empty segments.
///
/// Runs of `/` collapse into a single boundary and leading or trailing slashes produce no empty
/// segments, so `"//a///b/"` and `"a/b"` yield the same sequence. The returned iterator borrows
/// from `path` and can be cloned to restart from the current position.
///
/// # Examples
/// ```
/// let segments: Vec<_> = url_tree::split("/root//elem1/elem2/").collect();
/// assert_eq!(segments, ["root", "elem1", "elem2"]);
///
/// assert_eq!(url_tree::split("///").count(), 0);
/// ```
pub fn split(path: &str) -> Segments<'_> {
    Segments { rest: path }
}

/// Iterator over the segments of a path, created by [`split`].
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    rest: &'a str,
}

impl<'a> Segments<'a> {
    /// Returns the part of the path that has not been yielded yet, leading slashes included.
    pub fn remainder(&self) -> &'a str {
        self.rest
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = self.rest.trim_start_matches(SEPARATOR);

        if rest.is_empty() {
            self.rest = rest;
            return None;
        }

        let end = rest.find(SEPARATOR).unwrap_or(rest.len());
        let (segment, tail) = rest.split_at(end);
        self.rest = tail;

        Some(segment)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // every segment takes at least one byte
        (0, Some(self.rest.len()))
    }
}

impl FusedIterator for Segments<'_> {}

use std::collections::{hash_map, HashMap};

/// Per-method destinations of a route, with a fallback for every other method.
///
/// Method names are stored upper-cased, so lookups are case insensitive. Lookups never fail: a
/// method without an explicit entry resolves to the default destination, which may itself be
/// unset.
///
/// Equality, [`len`](Self::len) and [`iter`](Self::iter) only consider the explicit entries.
#[derive(Debug, Clone)]
pub struct MethodTable<T> {
    methods: HashMap<String, T>,
    default: Option<T>,
}

impl<T> MethodTable<T> {
    pub fn new() -> Self {
        MethodTable {
            methods: HashMap::new(),
            default: None,
        }
    }

    /// Returns the destination for `method`, falling back to the default.
    ///
    /// # Examples
    /// ```
    /// # use url_tree::MethodTable;
    /// let mut table = MethodTable::new();
    /// table.insert("get", "show");
    /// assert_eq!(table.get("GET"), Some(&"show"));
    /// assert_eq!(table.get("POST"), None);
    ///
    /// table.set_default("any");
    /// assert_eq!(table.get("post"), Some(&"any"));
    /// ```
    pub fn get(&self, method: &str) -> Option<&T> {
        match self.methods.get(canonical(method).as_str()) {
            Some(dest) => Some(dest),
            None => self.default.as_ref(),
        }
    }

    /// Same as [`get`](Self::get) but returns a mutable reference.
    pub fn get_mut(&mut self, method: &str) -> Option<&mut T> {
        match self.methods.get_mut(canonical(method).as_str()) {
            Some(dest) => Some(dest),
            None => self.default.as_mut(),
        }
    }

    /// Stores `dest` under `method`, returning the destination it replaces.
    pub fn insert(&mut self, method: &str, dest: T) -> Option<T> {
        self.methods.insert(canonical(method), dest)
    }

    /// Sets the destination used for methods without an explicit entry.
    pub fn set_default(&mut self, dest: T) -> Option<T> {
        self.default.replace(dest)
    }

    pub fn default_dest(&self) -> Option<&T> {
        self.default.as_ref()
    }

    /// Returns true if `method` has an explicit entry.
    pub fn contains(&self, method: &str) -> bool {
        self.methods.contains_key(canonical(method).as_str())
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Iterates over the explicit entries, in arbitrary order.
    pub fn iter(&self) -> hash_map::Iter<'_, String, T> {
        self.methods.iter()
    }
}

impl<T> Default for MethodTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> PartialEq for MethodTable<T> {
    fn eq(&self, other: &Self) -> bool {
        self.methods == other.methods
    }
}

impl<T: Eq> Eq for MethodTable<T> {}

#[inline]
fn canonical(method: &str) -> String {
    method.to_ascii_uppercase()
}

use std::collections::{HashMap, HashSet};

use crate::{
    error::RouteError,
    node::Node,
    params::{Param, Params, PATH_INFO},
    restriction::Restriction,
    split::{split, SEPARATOR},
    RoutePath,
};

/// Definition of a route, registered with [`RouteTree::route`].
///
/// A route has a pattern and a destination. Without any [`method`](Self::method) the destination
/// serves every HTTP method.
///
/// Pattern segments wrapped in braces (`{name}`) are variables; each one captures exactly one
/// path segment. All other segments are matched literally.
#[derive(Debug, Clone)]
pub struct Route<T> {
    pattern: String,
    dest: T,
    methods: Vec<String>,
    restrictions: HashMap<String, Restriction>,
}

impl<T> Route<T> {
    pub fn new(pattern: impl Into<String>, dest: T) -> Self {
        Route {
            pattern: pattern.into(),
            dest,
            methods: Vec::new(),
            restrictions: HashMap::new(),
        }
    }

    /// Restricts the route to `method`. Methods are case insensitive.
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.methods.push(method.into());
        self
    }

    /// Restricts the route to each of `methods`.
    pub fn methods<I, M>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        self.methods.extend(methods.into_iter().map(Into::into));
        self
    }

    /// Constrains the segments variable `name` accepts.
    ///
    /// A string is taken as a regular expression. See [`Restriction`].
    pub fn restrict(
        mut self,
        name: impl Into<String>,
        restriction: impl Into<Restriction>,
    ) -> Self {
        self.restrictions.insert(name.into(), restriction.into());
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Tree-based URL route resolver.
///
/// Routes are split into their path segments and merged into a tree with one level per segment,
/// so resolving a path costs time proportional to its depth rather than to the number of routes.
///
/// Because routes share tree levels, the variables at a given level must be consistent: a name
/// always carries the same restriction and a restriction always carries the same name. When a
/// level has several variables, the restricted ones are tried first, in the order they were
/// added, and the unrestricted one last.
///
/// Build the tree up front, then share it read-only; [`resolve`](Self::resolve) takes `&self`.
///
/// # Examples
/// ```
/// use url_tree::{Route, RouteTree};
///
/// let mut tree = RouteTree::new();
/// tree.route(Route::new("/users/{id}", "user").method("get").restrict("id", "[0-9]+"))?;
/// tree.path("/static", "files")?;
///
/// let (dest, params) = tree.resolve("GET", "/users/42").unwrap();
/// assert_eq!(*dest, "user");
/// assert_eq!(params.get("id"), Some("42"));
///
/// assert!(tree.resolve("POST", "/users/42").is_none());
/// assert!(tree.resolve("GET", "/users/me").is_none());
///
/// let (dest, params) = tree.resolve("HEAD", "/static/css/site.css").unwrap();
/// assert_eq!(*dest, "files");
/// assert_eq!(params.path_info(), Some("css/site.css"));
/// # Ok::<(), url_tree::RouteError>(())
/// ```
#[derive(Debug)]
pub struct RouteTree<T> {
    root: Node<T>,
}

impl<T> RouteTree<T> {
    pub fn new() -> Self {
        RouteTree { root: Node::new() }
    }

    /// Adds a route to the tree.
    ///
    /// Returns the set of variable names bound by the pattern.
    ///
    /// # Errors
    /// Fails when the pattern binds a name twice, when a variable conflicts with another variable
    /// already registered at the same level, or when a pattern restriction does not compile.
    /// Levels created before the failing segment are kept.
    pub fn route(&mut self, route: Route<T>) -> Result<HashSet<String>, RouteError>
    where
        T: Clone,
    {
        let Route {
            pattern,
            dest,
            methods,
            restrictions,
        } = route;

        let mut node = &mut self.root;
        let mut names = HashSet::new();

        for segment in split(&pattern) {
            node = match variable_name(segment) {
                Some(name) => {
                    if !names.insert(name.to_owned()) {
                        return Err(RouteError::DuplicateParameter(name.to_owned()));
                    }

                    node.get_or_create_variable_child(name, restrictions.get(name))?
                }

                None => {
                    if segment.starts_with('{') {
                        tracing::warn!(
                            "Segment `{}` of route `{}` opens a variable but does not close it. \
                            It is matched literally.",
                            segment,
                            pattern
                        );
                    }

                    node.get_or_create_literal_child(segment)
                }
            };
        }

        for name in restrictions.keys().filter(|name| !names.contains(*name)) {
            tracing::warn!(
                "Restriction for `{}` is unused; route `{}` has no such variable.",
                name,
                pattern
            );
        }

        if methods.is_empty() {
            node.dest.set_default(dest);
        } else {
            for method in &methods {
                node.dest.insert(method, dest.clone());
            }
        }

        tracing::debug!(
            "registered route `{}` for {} with variables {:?}",
            pattern,
            if methods.is_empty() {
                "all methods".to_owned()
            } else {
                methods.join(", ")
            },
            names
        );

        Ok(names)
    }

    /// Adds a route without restrictions serving every method.
    pub fn path(
        &mut self,
        pattern: impl Into<String>,
        dest: T,
    ) -> Result<HashSet<String>, RouteError>
    where
        T: Clone,
    {
        self.route(Route::new(pattern, dest))
    }

    /// Resolves a request to its destination and parameters.
    ///
    /// The deepest level reachable by the path is looked up for `method`. Path segments past that
    /// level are joined into the [`PATH_INFO`] parameter, so any route acts as a prefix of the
    /// paths below it. Returns `None`, and no parameters, if that level has no destination for
    /// `method`.
    pub fn resolve<P: RoutePath>(&self, method: &str, path: P) -> Option<(&T, Params)> {
        let segments: Vec<&str> = split(path.path()).collect();
        let mut params = Params::new();
        let mut node = &self.root;
        let mut depth = 0;

        while let Some(segment) = segments.get(depth) {
            match node.match_child(segment, &mut params) {
                Some(child) => node = child,
                None => break,
            }
            depth += 1;
        }

        let dest = node.dest.get(method);
        trace_resolution(method, path.path(), depth, segments.len(), dest.is_some());

        let dest = dest?;
        add_path_info(&mut params, &segments[depth..]);
        Some((dest, params))
    }

    /// Same as [`resolve`](Self::resolve) but returns a mutable reference to the destination.
    pub fn resolve_mut<P: RoutePath>(
        &mut self,
        method: &str,
        path: P,
    ) -> Option<(&mut T, Params)> {
        let segments: Vec<&str> = split(path.path()).collect();
        let mut params = Params::new();
        let mut steps = Vec::with_capacity(segments.len());

        let mut node = &self.root;
        for segment in &segments {
            let Some(step) = node.match_step(segment, &mut params) else {
                break;
            };
            node = node.child(step, segment)?;
            steps.push(step);
        }

        let depth = steps.len();
        let mut node = &mut self.root;
        for (&step, segment) in steps.iter().zip(&segments) {
            node = node.child_mut(step, segment)?;
        }

        let dest = node.dest.get_mut(method);
        trace_resolution(method, path.path(), depth, segments.len(), dest.is_some());

        let dest = dest?;
        add_path_info(&mut params, &segments[depth..]);
        Some((dest, params))
    }
}

impl<T> Default for RouteTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the variable name if `segment` is a `{name}` marker.
fn variable_name(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

fn add_path_info(params: &mut Params, tail: &[&str]) {
    if !tail.is_empty() {
        let mut info = String::new();
        for (idx, segment) in tail.iter().enumerate() {
            if idx > 0 {
                info.push(SEPARATOR);
            }
            info.push_str(segment);
        }
        params.set(PATH_INFO, Param::Segment(info));
    }
}

fn trace_resolution(method: &str, path: &str, depth: usize, total: usize, found: bool) {
    tracing::trace!(
        "resolved {} `{}` to depth {}/{}: {}",
        method,
        path,
        depth,
        total,
        if found { "found" } else { "no destination" }
    );
}

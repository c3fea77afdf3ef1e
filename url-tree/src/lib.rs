//! Tree-based URL route resolution.
//!
//! A route pattern is broken into its path segments and merged into a tree with one level per
//! segment. Resolving a path walks that tree, so its cost follows the depth of the path instead of
//! the number of registered routes; no list of regular expressions is scanned.
//!
//! Constant segments are plain text. Variable segments are wrapped in braces, like `{id}`, and
//! always cover exactly one whole segment. A variable may be restricted by a regular expression or
//! by a conversion function, see [`Restriction`].
//!
//! ```
//! use url_tree::{Restriction, Route, RouteTree};
//!
//! let mut tree = RouteTree::new();
//! tree.route(
//!     Route::new("/repos/{owner}/{page}", "repo")
//!         .method("GET")
//!         .restrict("page", Restriction::parse::<u32>()),
//! )?;
//!
//! let (dest, params) = tree.resolve("get", "/repos/rust-lang/02/extra").unwrap();
//! assert_eq!(*dest, "repo");
//! assert_eq!(params.get("owner"), Some("rust-lang"));
//! assert_eq!(params.get("page"), Some("2"));
//! assert_eq!(params.path_info(), Some("extra"));
//! # Ok::<(), url_tree::RouteError>(())
//! ```

#![deny(rust_2018_idioms, nonstandard_style)]
#![warn(future_incompatible, missing_debug_implementations)]

mod de;
mod error;
mod method;
mod node;
mod params;
mod restriction;
mod split;
mod tree;

pub use self::de::ParamsDeserializer;
pub use self::error::RouteError;
pub use self::method::MethodTable;
pub use self::params::{Param, Params, ParamsIter, SegmentMatch, PATH_INFO};
pub use self::restriction::{Predicate, Restriction};
pub use self::split::{split, Segments};
pub use self::tree::{Route, RouteTree};

/// Types that can provide a request path to [`RouteTree::resolve`].
pub trait RoutePath {
    fn path(&self) -> &str;
}

impl RoutePath for str {
    fn path(&self) -> &str {
        self
    }
}

impl RoutePath for String {
    fn path(&self) -> &str {
        self.as_str()
    }
}

impl RoutePath for bytestring::ByteString {
    fn path(&self) -> &str {
        self
    }
}

impl<T: RoutePath + ?Sized> RoutePath for &T {
    fn path(&self) -> &str {
        (**self).path()
    }
}

#[cfg(feature = "http")]
impl RoutePath for http::Uri {
    fn path(&self) -> &str {
        self.path()
    }
}

use derive_more::{Display, Error};

/// Errors raised while registering a route.
///
/// Resolution never fails with an error; an unmatched path is a normal `None` result.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RouteError {
    /// The same variable name appears twice in one pattern.
    #[display("duplicate parameter name `{}`", _0)]
    DuplicateParameter(#[error(not(source))] String),

    /// A variable name is reused at the same tree level with a different restriction.
    #[display("variable `{}` is already registered with a different restriction", name)]
    RestrictionMismatch { name: String },

    /// A restriction is reused at the same tree level under a different name.
    #[display("variable name mismatch: `{}` != `{}`", name, existing)]
    NameMismatch { name: String, existing: String },

    /// A pattern restriction is not a valid regular expression.
    #[display("invalid pattern for variable `{}`: {}", name, message)]
    InvalidPattern { name: String, message: String },
}

impl RouteError {
    /// Returns true for the naming conflicts between variables at the same tree level.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            RouteError::RestrictionMismatch { .. } | RouteError::NameMismatch { .. }
        )
    }
}

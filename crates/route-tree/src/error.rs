/// Structural errors raised while building or flattening a route tree
///
/// Every variant is a configuration mistake in the route tree. They are
/// surfaced at build/flatten time and never while matching.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("index route must not have path, remove the path property from the index route nested under \"{from}\"")]
    IndexWithPath { from: String },

    #[error("index route must not have child routes, remove all child routes from the index route nested under \"{from}\"")]
    IndexWithChildren { from: String },

    #[error("layout or page route nested under \"{from}\" must not have index, remove the index property or set it to true")]
    IndexNotTrue { from: String },
    #[error("index route nested under \"{from}\" must not be marked available")]
    IndexAvailable { from: String },

    #[error("the route nested under \"{from}\" is not valid: it may be an index or page route, but is missing the index or path property")]
    MissingPath { from: String },

    #[error("property \"path\" of the route nested under \"{from}\" must be a non empty string")]
    EmptyPath { from: String },

    #[error("property \"children\" of layout route \"{path}\" must be a non empty list")]
    EmptyChildren { path: String },

    #[error("route \"{path}\" is marked available but has no child routes")]
    AvailableWithoutChildren { path: String },

    #[error("layout route \"{path}\" must not have guard unless it is available")]
    LayoutGuard { path: String },

    #[error("layout route \"{path}\" must not have sensitive unless it is available")]
    LayoutSensitive { path: String },

    #[error("the guard \"{name}\" of route \"{path}\" is not a registered guard")]
    InvalidGuard { path: String, name: String },

    #[error("duplicate parameter \":{name}\" in route path \"{path}\"")]
    DuplicateParam { path: String, name: String },

    #[error("trailing \"*\" in route path \"{path}\" must follow \"/\"")]
    TrailingWildcard { path: String },

    #[error("absolute route path \"{path}\" nested under \"{parent}\" is not valid: an absolute child route path must start with the combined path of all its parent routes")]
    ScopeViolation { path: String, parent: String },

    #[error("route path \"{path}\" compiled to an invalid pattern")]
    InvalidPattern {
        path: String,
        #[source]
        source: regex::Error,
    },
}

/// Result alias for route tree operations
pub type Result<T> = std::result::Result<T, RouteError>;

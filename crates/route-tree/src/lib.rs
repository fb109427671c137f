//! # Route Tree
//!
//! A resolver for declarative, nested route trees. Given a tree of routes and
//! a pathname, it finds the leaf route (and its ancestor chain) that matches,
//! extracting named and wildcard parameters:
//! - Static routes (`/about`)
//! - Dynamic parameters (`/users/:id`)
//! - Wildcard remainders (`/docs/*`)
//! - Index routes, layouts and matchable ("available") layouts
//! - Guards consulted after a pattern matched
//!
//! ## Pipeline
//!
//! ```text
//! routes ──flatten──▶ ranked branches ──match_route(pathname)──▶ RouteMatch
//! ```
//!
//! [`flatten`] walks the tree once, validates it, compiles every matchable
//! route and ranks the result by specificity. The branch list is immutable and
//! can be matched against any number of pathnames, from any number of threads.
//!
//! ## Ranking
//!
//! - Static segments beat dynamic segments, which beat wildcards
//! - An index route beats a sibling page resolving to the same path
//! - Equal-scoring siblings are tried in declaration order
//!
//! ## Example
//!
//! ```
//! use route_tree::{Route, Router};
//!
//! let routes: Vec<Route> = vec![
//!     Route::page("/login"),
//!     Route::nested("/", [
//!         Route::nested("courses", [Route::index(), Route::page("/courses/:id")]),
//!         Route::index(),
//!     ]),
//!     Route::page("*"),
//! ];
//!
//! let router = Router::new(&routes, "/").unwrap();
//!
//! let matched = router.match_route("/courses/1").unwrap();
//! assert_eq!(matched.params.get("id"), Some("1"));
//! assert_eq!(matched.matches.len(), 3);
//!
//! let fallback = router.match_route("/nowhere/else").unwrap();
//! assert_eq!(fallback.params.get("*"), Some("nowhere/else"));
//! ```

use std::fmt;

// ============================================================================
// Module Declarations
// ============================================================================

pub mod branch;
pub mod config;
pub mod error;
pub mod path;
pub mod rank;
pub mod route;
pub mod tree;

pub use branch::{collect_branches, flatten, BranchMeta, RouteBranch};
pub use config::RouterConfig;
pub use error::{Result, RouteError};
pub use path::{is_absolute, is_outside_root, is_wildcard, join, normalize, resolve};
pub use route::{
    AvailableLayoutRoute, Guard, GuardHandle, GuardRegistry, GuardSpec, IndexRoute, LayoutRoute,
    Matcher, PageRoute, Params, Route, RouteDef, RouteKind,
};

// ============================================================================
// Core Types
// ============================================================================

/// Result of matching a pathname against the branch list
pub struct RouteMatch<'r, M = (), E = ()> {
    /// Compiled path of the matched branch, basename included
    pub path: String,
    /// Basename the route tree is mounted under
    pub basename: String,
    /// The pathname that was matched
    pub pathname: String,
    /// Extracted parameters
    pub params: Params,
    /// Matched routes, root first, ending with the matched route
    pub matches: Vec<&'r Route<M, E>>,
}

impl<'r, M, E> RouteMatch<'r, M, E> {
    /// The matched (innermost) route
    pub fn route(&self) -> Option<&'r Route<M, E>> {
        self.matches.last().copied()
    }

    /// Resolves a navigation target relative to this match
    ///
    /// Absolute targets are rooted at the basename; relative targets are
    /// resolved against the matched pathname.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_tree::{Route, Router};
    ///
    /// let routes: Vec<Route> = vec![Route::page("/courses/:id")];
    /// let router = Router::new(&routes, "/app").unwrap();
    ///
    /// let matched = router.match_route("/app/courses/1").unwrap();
    /// assert_eq!(matched.resolve("../2"), "/app/courses/2");
    /// assert_eq!(matched.resolve("/login"), "/app/login");
    /// assert_eq!(matched.resolve(""), "/app/courses/1");
    /// ```
    pub fn resolve(&self, to: &str) -> String {
        if is_absolute(to) {
            join(&self.basename, to)
        } else {
            resolve(&self.pathname, to)
        }
    }
}

impl<M, E> Clone for RouteMatch<'_, M, E> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            basename: self.basename.clone(),
            pathname: self.pathname.clone(),
            params: self.params.clone(),
            matches: self.matches.clone(),
        }
    }
}

impl<M, E> fmt::Debug for RouteMatch<'_, M, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("path", &self.path)
            .field("basename", &self.basename)
            .field("pathname", &self.pathname)
            .field("params", &self.params)
            .field(
                "matches",
                &self.matches.iter().map(|route| route.kind()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

// ============================================================================
// Matching
// ============================================================================

/// Finds the first ranked branch that matches `pathname` and passes its guard
///
/// A relative pathname is treated as rooted at `/`. Returns `None` when no
/// branch accepts the pathname.
///
/// # Examples
///
/// ```
/// use route_tree::{flatten, match_route, PageRoute, Route};
///
/// let routes: Vec<Route> = vec![
///     PageRoute::new("/admin").with_guard(|_| false).into(),
///     Route::page("/:section"),
/// ];
/// let branches = flatten(&routes, "/").unwrap();
///
/// // The guard rejects `/admin`, so the dynamic route matches instead
/// let matched = match_route(&branches, "/admin").unwrap();
/// assert_eq!(matched.path, "/:section");
/// ```
pub fn match_route<'r, M, E>(
    branches: &[RouteBranch<'r, M, E>],
    pathname: &str,
) -> Option<RouteMatch<'r, M, E>> {
    let pathname = path::prefix(pathname, "/");

    let matched = branches.iter().find_map(|branch| {
        let params = branch.matcher().matches(&pathname)?;

        let candidate = RouteMatch {
            path: branch.path().to_string(),
            basename: branch.basename().to_string(),
            pathname: pathname.to_string(),
            params,
            matches: branch.meta().iter().map(|meta| meta.route).collect(),
        };

        match branch.guard() {
            Some(guard) if !guard.allows(&candidate) => {
                tracing::trace!(path = branch.path(), pathname = %pathname, "guard rejected match");
                None
            }
            _ => Some(candidate),
        }
    });

    match &matched {
        Some(found) => tracing::trace!(pathname = %pathname, path = %found.path, "route matched"),
        None => tracing::trace!(pathname = %pathname, "no route matched"),
    }

    matched
}

// ============================================================================
// Router
// ============================================================================

/// Ranked branches of a borrowed route tree
///
/// The router flattens once on construction; matching is a read-only scan of
/// the ranked branches, so a router can be shared between threads.
pub struct Router<'r, M = (), E = ()> {
    basename: String,
    branches: Vec<RouteBranch<'r, M, E>>,
}

impl<'r, M, E> Router<'r, M, E> {
    /// Flattens and ranks `routes` mounted under `basename`
    pub fn new(routes: &'r [Route<M, E>], basename: &str) -> Result<Self> {
        Ok(Self {
            basename: normalize(basename).into_owned(),
            branches: flatten(routes, basename)?,
        })
    }

    /// Matches a pathname (basename included) against the ranked branches
    pub fn match_route(&self, pathname: &str) -> Option<RouteMatch<'r, M, E>> {
        match_route(&self.branches, pathname)
    }

    pub fn basename(&self) -> &str {
        &self.basename
    }

    /// Branches in matching order
    pub fn branches(&self) -> &[RouteBranch<'r, M, E>] {
        &self.branches
    }
}

impl<M, E> fmt::Debug for Router<'_, M, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("basename", &self.basename)
            .field("branches", &self.branches)
            .finish()
    }
}

/// An owned route tree together with its basename
///
/// Useful when routes are loaded at runtime, e.g. from [`RouterConfig`].
#[derive(Debug, Clone)]
pub struct RouteTree<M = (), E = ()> {
    pub basename: String,
    pub routes: Vec<Route<M, E>>,
}

impl<M, E> RouteTree<M, E> {
    pub fn new(routes: Vec<Route<M, E>>, basename: impl Into<String>) -> Self {
        Self {
            basename: basename.into(),
            routes,
        }
    }

    /// Builds a router borrowing this tree
    pub fn router(&self) -> Result<Router<'_, M, E>> {
        Router::new(&self.routes, &self.basename)
    }
}

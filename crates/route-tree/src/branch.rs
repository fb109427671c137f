/// Route tree flattening
///
/// Turns a nested route tree into the flat list of matchable branches. Each
/// branch carries its compiled matcher, its specificity score and the chain
/// of routes from the root down to itself.

use std::fmt;

use crate::error::{Result, RouteError};
use crate::path::{is_absolute, is_outside_root, join, normalize, resolve};
use crate::rank::{compute_score, rank_branches};
use crate::route::{compile, GuardHandle, Matcher, Route};
use crate::tree::{Step, Walk};

/// Position of a route among its siblings
pub struct BranchMeta<'r, M, E> {
    /// Declaration order among siblings
    pub index: usize,
    pub route: &'r Route<M, E>,
}

impl<M, E> Clone for BranchMeta<'_, M, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M, E> Copy for BranchMeta<'_, M, E> {}

impl<M, E> fmt::Debug for BranchMeta<'_, M, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BranchMeta")
            .field("index", &self.index)
            .field("kind", &self.route.kind())
            .field("path", &self.route.path())
            .finish()
    }
}

/// One independently matchable route with its ancestor chain
pub struct RouteBranch<'r, M, E> {
    basename: String,
    score: i32,
    matcher: Matcher,
    guard: Option<&'r GuardHandle<M, E>>,
    route: &'r Route<M, E>,
    meta: Vec<BranchMeta<'r, M, E>>,
}

impl<'r, M, E> RouteBranch<'r, M, E> {
    fn new(
        basename: &str,
        path: &str,
        route: &'r Route<M, E>,
        meta: Vec<BranchMeta<'r, M, E>>,
    ) -> Result<Self> {
        let matcher = compile(path, route.is_sensitive())?;
        let score = compute_score(path, route.is_index());

        tracing::trace!(path, score, "flattened route branch");

        Ok(Self {
            basename: basename.to_string(),
            score,
            matcher,
            guard: route.guard(),
            route,
            meta,
        })
    }

    pub fn basename(&self) -> &str {
        &self.basename
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Full compiled path of the branch, basename included
    pub fn path(&self) -> &str {
        self.matcher.path()
    }

    pub fn guard(&self) -> Option<&'r GuardHandle<M, E>> {
        self.guard
    }

    /// Ancestor chain, root first, ending with the branch's own route
    pub fn meta(&self) -> &[BranchMeta<'r, M, E>] {
        &self.meta
    }

    /// The matchable route this branch was created for
    pub fn route(&self) -> &'r Route<M, E> {
        self.route
    }
}

impl<M, E> fmt::Debug for RouteBranch<'_, M, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteBranch")
            .field("basename", &self.basename)
            .field("score", &self.score)
            .field("matcher", &self.matcher)
            .field("guarded", &self.guard.is_some())
            .field("meta", &self.meta)
            .finish()
    }
}

/// Checks the structural rules the typed route model cannot express
fn validate<M, E>(route: &Route<M, E>, from: &str) -> Result<()> {
    match route {
        Route::Page(page) if page.path.is_empty() => {
            return Err(RouteError::MissingPath {
                from: from.to_string(),
            });
        }
        Route::Layout(_) | Route::AvailableLayout(_) if route.children().is_empty() => {
            return Err(RouteError::EmptyChildren {
                path: resolve(from, route.path().unwrap_or("")),
            });
        }
        _ => {}
    }

    if let Some(to) = route.path() {
        if is_absolute(to) && is_outside_root(from, to, route.is_sensitive()) {
            return Err(RouteError::ScopeViolation {
                path: to.to_string(),
                parent: from.to_string(),
            });
        }
    }

    Ok(())
}

/// Collects the matchable branches of a route tree in declaration order
///
/// Only page, index and available layout routes contribute a branch; plain
/// layouts only contribute ancestor context.
pub fn collect_branches<'r, M, E>(
    routes: &'r [Route<M, E>],
    basename: &str,
) -> Result<Vec<RouteBranch<'r, M, E>>> {
    let basename = normalize(basename);
    let mut branches = Vec::new();

    // Ancestor chain and resolved ancestor paths, maintained across the walk
    let mut meta: Vec<BranchMeta<'r, M, E>> = Vec::new();
    let mut scopes: Vec<String> = Vec::new();

    for step in Walk::new(routes, Route::children) {
        match step {
            Step::Enter { index, node, .. } => {
                let from = scopes.last().map(String::as_str).unwrap_or("/");
                let to = node.path().unwrap_or("");

                validate(node, from)?;

                let scope = resolve(from, to);
                meta.push(BranchMeta { index, route: node });

                if node.is_matchable() {
                    let target = if node.is_index() { "./" } else { to };
                    let path = join(&basename, &resolve(from, target));

                    branches.push(RouteBranch::new(&basename, &path, node, meta.clone())?);
                }

                scopes.push(scope);
            }
            Step::Leave { .. } => {
                meta.pop();
                scopes.pop();
            }
        }
    }

    Ok(branches)
}

/// Flattens a route tree into ranked branches
///
/// # Errors
///
/// Any structural problem of the tree: see [`RouteError`].
///
/// # Examples
///
/// ```
/// use route_tree::{flatten, Route};
///
/// let routes: Vec<Route> = vec![
///     Route::page("/users/:id"),
///     Route::page("/users/new"),
/// ];
///
/// let branches = flatten(&routes, "/").unwrap();
/// assert_eq!(branches[0].path(), "/users/new");
/// assert_eq!(branches[1].path(), "/users/:id");
/// ```
pub fn flatten<'r, M, E>(
    routes: &'r [Route<M, E>],
    basename: &str,
) -> Result<Vec<RouteBranch<'r, M, E>>> {
    let mut branches = collect_branches(routes, basename)?;
    rank_branches(&mut branches);

    tracing::debug!(basename, branches = branches.len(), "flattened route tree");

    Ok(branches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{LayoutRoute, PageRoute};
    use pretty_assertions::assert_eq;

    fn paths<'a>(branches: &'a [RouteBranch<'_, (), ()>]) -> Vec<&'a str> {
        branches.iter().map(RouteBranch::path).collect()
    }

    #[test]
    fn test_collect_skips_plain_layouts() {
        let routes: Vec<Route> = vec![Route::nested(
            "/",
            [
                Route::nested("courses", [Route::index(), Route::page("/courses/:id")]),
                Route::index(),
            ],
        )];

        let branches = collect_branches(&routes, "/").unwrap();
        assert_eq!(paths(&branches), vec!["/courses", "/courses/:id", "/"]);
    }

    #[test]
    fn test_meta_chain() {
        let routes: Vec<Route> = vec![
            Route::page("/login"),
            Route::nested("/", [Route::page("a"), Route::nested("b", [Route::page("c")])]),
        ];

        let branches = collect_branches(&routes, "/").unwrap();
        let chain: Vec<Vec<usize>> = branches
            .iter()
            .map(|branch| branch.meta().iter().map(|meta| meta.index).collect())
            .collect();

        assert_eq!(chain, vec![vec![0], vec![1, 0], vec![1, 1, 0]]);
        assert_eq!(branches[2].route().path(), Some("c"));
    }

    #[test]
    fn test_available_layout_contributes_branch() {
        let routes: Vec<Route> = vec![LayoutRoute::new([Route::page("cart")])
            .with_path("/shop")
            .available()
            .into()];

        let branches = collect_branches(&routes, "/").unwrap();
        assert_eq!(paths(&branches), vec!["/shop", "/shop/cart"]);
        assert_eq!(branches[1].meta().len(), 2);
    }

    #[test]
    fn test_basename_prefixes_paths() {
        let routes: Vec<Route> = vec![Route::nested("/", [Route::index(), Route::page("docs/*")])];

        let branches = collect_branches(&routes, "/app/").unwrap();
        assert_eq!(paths(&branches), vec!["/app", "/app/docs/*"]);
        assert!(branches.iter().all(|branch| branch.basename() == "/app"));
    }

    #[test]
    fn test_sensitivity_is_compiled() {
        let routes: Vec<Route> = vec![PageRoute::new("/Docs").case_sensitive(true).into()];

        let branches = collect_branches(&routes, "/").unwrap();
        assert!(branches[0].matcher().sensitive());
    }

    #[test]
    fn test_validation_errors() {
        let routes: Vec<Route> = vec![Route::nested("/shop", [Route::page("/other")])];
        match collect_branches(&routes, "/") {
            Err(RouteError::ScopeViolation { path, parent }) => {
                assert_eq!(path, "/other");
                assert_eq!(parent, "/shop");
            }
            other => panic!("expected scope violation, got {:?}", other),
        }

        let routes: Vec<Route> = vec![Route::nested("/shop", Vec::<Route>::new())];
        assert!(matches!(
            collect_branches(&routes, "/"),
            Err(RouteError::EmptyChildren { .. })
        ));

        let routes: Vec<Route> = vec![Route::page("")];
        assert!(matches!(
            collect_branches(&routes, "/"),
            Err(RouteError::MissingPath { .. })
        ));

        let routes: Vec<Route> = vec![Route::page("/files*")];
        assert!(matches!(
            collect_branches(&routes, "/"),
            Err(RouteError::TrailingWildcard { .. })
        ));
    }
}

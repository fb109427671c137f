/// Route module for nested route trees
///
/// Contains the typed route model and its supporting pieces:
/// - [`pattern`]: path template compilation
/// - [`def`]: the loosely-typed definition schema and its validating constructor
///
/// A route is one of four variants, distinguished by what it carries:
///
/// | Variant          | Path     | Children  | Guard / sensitive | Matchable |
/// |------------------|----------|-----------|-------------------|-----------|
/// | `Page`           | required | none      | allowed           | yes       |
/// | `Index`          | none     | none      | allowed           | yes       |
/// | `Layout`         | optional | non-empty | not allowed       | no        |
/// | `AvailableLayout`| optional | non-empty | allowed           | yes       |

use std::fmt;
use std::sync::Arc;

use crate::RouteMatch;

pub mod def;
pub mod pattern;

pub use def::{GuardRegistry, GuardSpec, RouteDef};
pub use pattern::{compile, Matcher, Params};

/// Predicate consulted after a route's pattern matched
///
/// Returning `false` rejects the match and lets lower-ranked branches try.
/// Any `Fn(&RouteMatch) -> bool + Send + Sync` closure is a guard.
pub trait Guard<M, E>: Send + Sync {
    fn allows(&self, matched: &RouteMatch<'_, M, E>) -> bool;
}

impl<M, E, F> Guard<M, E> for F
where
    F: Fn(&RouteMatch<'_, M, E>) -> bool + Send + Sync,
{
    fn allows(&self, matched: &RouteMatch<'_, M, E>) -> bool {
        self(matched)
    }
}

/// Shared, cloneable handle to a guard
pub struct GuardHandle<M, E>(Arc<dyn Guard<M, E>>);

impl<M, E> GuardHandle<M, E> {
    pub fn new<G>(guard: G) -> Self
    where
        G: Guard<M, E> + 'static,
    {
        GuardHandle(Arc::new(guard))
    }

    /// Wraps a closure, keeping its signature higher-ranked over the match lifetime
    pub fn from_fn<F>(guard: F) -> Self
    where
        F: Fn(&RouteMatch<'_, M, E>) -> bool + Send + Sync + 'static,
    {
        GuardHandle(Arc::new(guard))
    }

    pub fn allows(&self, matched: &RouteMatch<'_, M, E>) -> bool {
        self.0.allows(matched)
    }
}

impl<M, E> Clone for GuardHandle<M, E> {
    fn clone(&self) -> Self {
        GuardHandle(Arc::clone(&self.0))
    }
}

impl<M, E> fmt::Debug for GuardHandle<M, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GuardHandle(..)")
    }
}

/// A leaf route matched at its own path
#[derive(Debug, Clone)]
pub struct PageRoute<M = (), E = ()> {
    pub path: String,
    pub guard: Option<GuardHandle<M, E>>,
    pub sensitive: bool,
    pub meta: Option<M>,
    pub element: Option<E>,
}

impl<M, E> PageRoute<M, E> {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            guard: None,
            sensitive: false,
            meta: None,
            element: None,
        }
    }

    pub fn with_guard<F>(mut self, guard: F) -> Self
    where
        F: Fn(&RouteMatch<'_, M, E>) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(GuardHandle::from_fn(guard));
        self
    }

    pub fn case_sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = sensitive;
        self
    }

    pub fn with_meta(mut self, meta: M) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_element(mut self, element: E) -> Self {
        self.element = Some(element);
        self
    }
}

/// A leaf route matched at its parent's own path
#[derive(Debug, Clone)]
pub struct IndexRoute<M = (), E = ()> {
    pub guard: Option<GuardHandle<M, E>>,
    pub sensitive: bool,
    pub meta: Option<M>,
    pub element: Option<E>,
}

impl<M, E> IndexRoute<M, E> {
    pub fn new() -> Self {
        Self {
            guard: None,
            sensitive: false,
            meta: None,
            element: None,
        }
    }

    pub fn with_guard<F>(mut self, guard: F) -> Self
    where
        F: Fn(&RouteMatch<'_, M, E>) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(GuardHandle::from_fn(guard));
        self
    }

    pub fn case_sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = sensitive;
        self
    }

    pub fn with_meta(mut self, meta: M) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_element(mut self, element: E) -> Self {
        self.element = Some(element);
        self
    }
}

impl<M, E> Default for IndexRoute<M, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// A grouping route that only provides ancestor context
#[derive(Debug, Clone)]
pub struct LayoutRoute<M = (), E = ()> {
    pub path: Option<String>,
    pub children: Vec<Route<M, E>>,
    pub meta: Option<M>,
    pub element: Option<E>,
}

impl<M, E> LayoutRoute<M, E> {
    pub fn new(children: impl IntoIterator<Item = Route<M, E>>) -> Self {
        Self {
            path: None,
            children: children.into_iter().collect(),
            meta: None,
            element: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_meta(mut self, meta: M) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_element(mut self, element: E) -> Self {
        self.element = Some(element);
        self
    }

    /// Makes the layout matchable at its own path
    pub fn available(self) -> AvailableLayoutRoute<M, E> {
        AvailableLayoutRoute {
            path: self.path,
            children: self.children,
            guard: None,
            sensitive: false,
            meta: self.meta,
            element: self.element,
        }
    }
}

/// A layout that is also matchable at its own path
#[derive(Debug, Clone)]
pub struct AvailableLayoutRoute<M = (), E = ()> {
    pub path: Option<String>,
    pub children: Vec<Route<M, E>>,
    pub guard: Option<GuardHandle<M, E>>,
    pub sensitive: bool,
    pub meta: Option<M>,
    pub element: Option<E>,
}

impl<M, E> AvailableLayoutRoute<M, E> {
    pub fn with_guard<F>(mut self, guard: F) -> Self
    where
        F: Fn(&RouteMatch<'_, M, E>) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(GuardHandle::from_fn(guard));
        self
    }

    pub fn case_sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = sensitive;
        self
    }
}

/// Discriminant of a [`Route`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Page,
    Index,
    Layout,
    AvailableLayout,
}

/// A node of the route tree
///
/// # Examples
///
/// ```
/// use route_tree::{Route, PageRoute};
///
/// let routes: Vec<Route> = vec![
///     Route::page("/login"),
///     Route::nested("/", [
///         Route::index(),
///         PageRoute::new("admin").with_guard(|_| false).into(),
///     ]),
///     Route::page("*"),
/// ];
/// assert!(routes[1].is_layout());
/// ```
#[derive(Debug, Clone)]
pub enum Route<M = (), E = ()> {
    Page(PageRoute<M, E>),
    Index(IndexRoute<M, E>),
    Layout(LayoutRoute<M, E>),
    AvailableLayout(AvailableLayoutRoute<M, E>),
}

impl<M, E> Route<M, E> {
    /// Page route at `path`
    pub fn page(path: impl Into<String>) -> Self {
        Route::Page(PageRoute::new(path))
    }

    /// Index route of its parent
    pub fn index() -> Self {
        Route::Index(IndexRoute::new())
    }

    /// Pathless layout grouping `children`
    pub fn layout(children: impl IntoIterator<Item = Route<M, E>>) -> Self {
        Route::Layout(LayoutRoute::new(children))
    }

    /// Layout at `path` grouping `children`
    pub fn nested(path: impl Into<String>, children: impl IntoIterator<Item = Route<M, E>>) -> Self {
        Route::Layout(LayoutRoute::new(children).with_path(path))
    }

    pub fn with_meta(mut self, meta: M) -> Self {
        match &mut self {
            Route::Page(route) => route.meta = Some(meta),
            Route::Index(route) => route.meta = Some(meta),
            Route::Layout(route) => route.meta = Some(meta),
            Route::AvailableLayout(route) => route.meta = Some(meta),
        }
        self
    }

    pub fn with_element(mut self, element: E) -> Self {
        match &mut self {
            Route::Page(route) => route.element = Some(element),
            Route::Index(route) => route.element = Some(element),
            Route::Layout(route) => route.element = Some(element),
            Route::AvailableLayout(route) => route.element = Some(element),
        }
        self
    }

    pub fn kind(&self) -> RouteKind {
        match self {
            Route::Page(_) => RouteKind::Page,
            Route::Index(_) => RouteKind::Index,
            Route::Layout(_) => RouteKind::Layout,
            Route::AvailableLayout(_) => RouteKind::AvailableLayout,
        }
    }

    /// The route's own (unresolved) path
    pub fn path(&self) -> Option<&str> {
        match self {
            Route::Page(route) => Some(&route.path),
            Route::Index(_) => None,
            Route::Layout(route) => route.path.as_deref(),
            Route::AvailableLayout(route) => route.path.as_deref(),
        }
    }

    pub fn children(&self) -> &[Route<M, E>] {
        match self {
            Route::Layout(route) => &route.children,
            Route::AvailableLayout(route) => &route.children,
            Route::Page(_) | Route::Index(_) => &[],
        }
    }

    pub fn guard(&self) -> Option<&GuardHandle<M, E>> {
        match self {
            Route::Page(route) => route.guard.as_ref(),
            Route::Index(route) => route.guard.as_ref(),
            Route::AvailableLayout(route) => route.guard.as_ref(),
            Route::Layout(_) => None,
        }
    }

    pub fn is_sensitive(&self) -> bool {
        match self {
            Route::Page(route) => route.sensitive,
            Route::Index(route) => route.sensitive,
            Route::AvailableLayout(route) => route.sensitive,
            Route::Layout(_) => false,
        }
    }

    pub fn meta(&self) -> Option<&M> {
        match self {
            Route::Page(route) => route.meta.as_ref(),
            Route::Index(route) => route.meta.as_ref(),
            Route::Layout(route) => route.meta.as_ref(),
            Route::AvailableLayout(route) => route.meta.as_ref(),
        }
    }

    pub fn element(&self) -> Option<&E> {
        match self {
            Route::Page(route) => route.element.as_ref(),
            Route::Index(route) => route.element.as_ref(),
            Route::Layout(route) => route.element.as_ref(),
            Route::AvailableLayout(route) => route.element.as_ref(),
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Route::Index(_))
    }

    /// True for both plain and available layouts
    pub fn is_layout(&self) -> bool {
        matches!(self, Route::Layout(_) | Route::AvailableLayout(_))
    }

    /// Whether the route contributes a branch of its own
    pub fn is_matchable(&self) -> bool {
        !matches!(self, Route::Layout(_))
    }
}

impl<M, E> From<PageRoute<M, E>> for Route<M, E> {
    fn from(route: PageRoute<M, E>) -> Self {
        Route::Page(route)
    }
}

impl<M, E> From<IndexRoute<M, E>> for Route<M, E> {
    fn from(route: IndexRoute<M, E>) -> Self {
        Route::Index(route)
    }
}

impl<M, E> From<LayoutRoute<M, E>> for Route<M, E> {
    fn from(route: LayoutRoute<M, E>) -> Self {
        Route::Layout(route)
    }
}

impl<M, E> From<AvailableLayoutRoute<M, E>> for Route<M, E> {
    fn from(route: AvailableLayoutRoute<M, E>) -> Self {
        Route::AvailableLayout(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_kinds() {
        let page: Route = Route::page("/about");
        assert_eq!(page.kind(), RouteKind::Page);
        assert_eq!(page.path(), Some("/about"));
        assert!(page.is_matchable());
        assert!(page.children().is_empty());

        let index: Route = Route::index();
        assert!(index.is_index());
        assert_eq!(index.path(), None);

        let layout: Route = Route::layout([Route::index()]);
        assert!(layout.is_layout());
        assert!(!layout.is_matchable());
        assert_eq!(layout.path(), None);
        assert_eq!(layout.children().len(), 1);

        let available: Route = LayoutRoute::new([Route::index()])
            .with_path("/shop")
            .available()
            .case_sensitive(true)
            .into();
        assert_eq!(available.kind(), RouteKind::AvailableLayout);
        assert!(available.is_layout());
        assert!(available.is_matchable());
        assert!(available.is_sensitive());
        assert_eq!(available.path(), Some("/shop"));
    }

    #[test]
    fn test_meta_and_element() {
        let route: Route<u32, &str> = Route::nested("/", [Route::index()])
            .with_meta(7)
            .with_element("<Layout />");
        assert_eq!(route.meta(), Some(&7));
        assert_eq!(route.element(), Some(&"<Layout />"));
    }

    #[test]
    fn test_layout_has_no_guard() {
        let route: Route = Route::nested("/", [Route::page("a")]);
        assert!(route.guard().is_none());
        assert!(!route.is_sensitive());

        let page: Route = PageRoute::new("/a").with_guard(|_| true).into();
        assert!(page.guard().is_some());
    }
}

/// Route definition schema
///
/// [`RouteDef`] mirrors the loosely-typed shape route trees are usually
/// written in: every property is optional and the variant is implied by which
/// ones are present. [`RouteDef::build`] validates that shape and produces the
/// typed [`Route`] sum type.
///
/// Definitions deserialize from any serde format. Guards cannot be serialized,
/// so a definition refers to a guard by name and [`GuardRegistry`] resolves it.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer};

use crate::error::{Result, RouteError};
use crate::path::resolve;
use crate::RouteMatch;

use super::{
    AvailableLayoutRoute, GuardHandle, IndexRoute, LayoutRoute, PageRoute, Route,
};

/// A guard attached to a definition
pub enum GuardSpec<M, E> {
    /// A guard supplied in-process
    Handle(GuardHandle<M, E>),
    /// A guard looked up by name in a [`GuardRegistry`]
    Named(String),
}

impl<M, E> fmt::Debug for GuardSpec<M, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardSpec::Handle(handle) => fmt::Debug::fmt(handle, f),
            GuardSpec::Named(name) => f.debug_tuple("Named").field(name).finish(),
        }
    }
}

impl<'de, M, E> Deserialize<'de> for GuardSpec<M, E> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(GuardSpec::Named)
    }
}

/// Named guards available to route definitions
///
/// # Examples
///
/// ```
/// use route_tree::{GuardRegistry, RouteDef};
///
/// let registry: GuardRegistry = GuardRegistry::new()
///     .with_guard("signed_in", |_| true);
///
/// let route = RouteDef::new().path("/account").named_guard("signed_in");
/// assert!(route.build_with(&registry).is_ok());
///
/// let route: RouteDef = RouteDef::new().path("/account").named_guard("admin");
/// assert!(route.build_with(&registry).is_err());
/// ```
pub struct GuardRegistry<M = (), E = ()> {
    guards: HashMap<String, GuardHandle<M, E>>,
}

impl<M, E> GuardRegistry<M, E> {
    pub fn new() -> Self {
        Self {
            guards: HashMap::new(),
        }
    }

    /// Registers a closure under `name` (functional builder)
    pub fn with_guard<F>(mut self, name: impl Into<String>, guard: F) -> Self
    where
        F: Fn(&RouteMatch<'_, M, E>) -> bool + Send + Sync + 'static,
    {
        self.register(name, GuardHandle::from_fn(guard));
        self
    }

    /// Registers a handle under `name`, replacing any previous one
    pub fn register(&mut self, name: impl Into<String>, guard: GuardHandle<M, E>) {
        self.guards.insert(name.into(), guard);
    }

    pub fn get(&self, name: &str) -> Option<&GuardHandle<M, E>> {
        self.guards.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.guards.contains_key(name)
    }

    fn resolve_spec(&self, spec: GuardSpec<M, E>, path: &str) -> Result<GuardHandle<M, E>> {
        match spec {
            GuardSpec::Handle(handle) => Ok(handle),
            GuardSpec::Named(name) => match self.guards.get(&name) {
                Some(handle) => Ok(handle.clone()),
                None => Err(RouteError::InvalidGuard {
                    path: path.to_string(),
                    name,
                }),
            },
        }
    }
}

impl<M, E> Default for GuardRegistry<M, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M, E> fmt::Debug for GuardRegistry<M, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.guards.keys()).finish()
    }
}

/// Untyped route definition
///
/// # Examples
///
/// ```
/// use route_tree::{RouteDef, RouteKind};
///
/// let route: RouteDef = RouteDef::new()
///     .path("/")
///     .children([
///         RouteDef::new().index(),
///         RouteDef::new().path("about"),
///     ]);
///
/// let route = route.build().unwrap();
/// assert_eq!(route.kind(), RouteKind::Layout);
///
/// // Index routes cannot carry a path
/// let invalid: RouteDef = RouteDef::new().index().path("home");
/// assert!(invalid.build().is_err());
/// ```
#[derive(Debug, Deserialize)]
#[serde(
    deny_unknown_fields,
    bound(deserialize = "M: Deserialize<'de>, E: Deserialize<'de>")
)]
pub struct RouteDef<M = (), E = ()> {
    #[serde(default)]
    pub meta: Option<M>,
    #[serde(default)]
    pub path: Option<String>,
    /// Only `true` is meaningful; an explicit `false` is rejected by `build`
    #[serde(default)]
    pub index: Option<bool>,
    #[serde(default)]
    pub sensitive: Option<bool>,
    #[serde(default)]
    pub guard: Option<GuardSpec<M, E>>,
    #[serde(default)]
    pub children: Option<Vec<RouteDef<M, E>>>,
    #[serde(default, alias = "reachable")]
    pub available: bool,
    #[serde(default)]
    pub element: Option<E>,
}

impl<M, E> Default for RouteDef<M, E> {
    fn default() -> Self {
        Self {
            meta: None,
            path: None,
            index: None,
            sensitive: None,
            guard: None,
            children: None,
            available: false,
            element: None,
        }
    }
}

impl<M, E> RouteDef<M, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn index(mut self) -> Self {
        self.index = Some(true);
        self
    }

    pub fn sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = Some(sensitive);
        self
    }

    pub fn guard<F>(mut self, guard: F) -> Self
    where
        F: Fn(&RouteMatch<'_, M, E>) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(GuardSpec::Handle(GuardHandle::from_fn(guard)));
        self
    }

    pub fn named_guard(mut self, name: impl Into<String>) -> Self {
        self.guard = Some(GuardSpec::Named(name.into()));
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = RouteDef<M, E>>) -> Self {
        self.children = Some(children.into_iter().collect());
        self
    }

    /// Marks a layout as matchable at its own path
    pub fn available(mut self) -> Self {
        self.available = true;
        self
    }

    pub fn meta(mut self, meta: M) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn element(mut self, element: E) -> Self {
        self.element = Some(element);
        self
    }

    /// Validates the definition without named guards
    pub fn build(self) -> Result<Route<M, E>> {
        self.build_with(&GuardRegistry::new())
    }

    /// Validates the definition, resolving named guards against `registry`
    pub fn build_with(self, registry: &GuardRegistry<M, E>) -> Result<Route<M, E>> {
        self.build_at("/", registry)
    }

    /// Validates a list of root definitions
    pub fn build_all(
        defs: impl IntoIterator<Item = RouteDef<M, E>>,
        registry: &GuardRegistry<M, E>,
    ) -> Result<Vec<Route<M, E>>> {
        defs.into_iter()
            .map(|def| def.build_with(registry))
            .collect()
    }

    fn build_at(self, from: &str, registry: &GuardRegistry<M, E>) -> Result<Route<M, E>> {
        let RouteDef {
            meta,
            path,
            index,
            sensitive,
            guard,
            children,
            available,
            element,
        } = self;

        let from_owned = || from.to_string();

        let index = match index {
            Some(false) => return Err(RouteError::IndexNotTrue { from: from_owned() }),
            Some(true) => true,
            None => false,
        };

        if index {
            if path.is_some() {
                return Err(RouteError::IndexWithPath { from: from_owned() });
            }
            if children.is_some() {
                return Err(RouteError::IndexWithChildren { from: from_owned() });
            }
            if available {
                return Err(RouteError::IndexAvailable { from: from_owned() });
            }
        }

        if path.as_deref() == Some("") {
            return Err(RouteError::EmptyPath { from: from_owned() });
        }

        let resolved = resolve(from, path.as_deref().unwrap_or(""));

        let Some(children) = children else {
            if available {
                return Err(RouteError::AvailableWithoutChildren { path: resolved });
            }

            let guard = guard
                .map(|spec| registry.resolve_spec(spec, &resolved))
                .transpose()?;
            let sensitive = sensitive.unwrap_or(false);

            if index {
                return Ok(Route::Index(IndexRoute {
                    guard,
                    sensitive,
                    meta,
                    element,
                }));
            }

            return match path {
                Some(path) => Ok(Route::Page(PageRoute {
                    path,
                    guard,
                    sensitive,
                    meta,
                    element,
                })),
                None => Err(RouteError::MissingPath { from: from_owned() }),
            };
        };

        if children.is_empty() {
            return Err(RouteError::EmptyChildren { path: resolved });
        }

        if !available {
            if guard.is_some() {
                return Err(RouteError::LayoutGuard { path: resolved });
            }
            if sensitive.is_some() {
                return Err(RouteError::LayoutSensitive { path: resolved });
            }
        }

        let guard = guard
            .map(|spec| registry.resolve_spec(spec, &resolved))
            .transpose()?;

        let children = children
            .into_iter()
            .map(|child| child.build_at(&resolved, registry))
            .collect::<Result<Vec<_>>>()?;

        if available {
            Ok(Route::AvailableLayout(AvailableLayoutRoute {
                path,
                children,
                guard,
                sensitive: sensitive.unwrap_or(false),
                meta,
                element,
            }))
        } else {
            Ok(Route::Layout(LayoutRoute {
                path,
                children,
                meta,
                element,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RouteKind;

    fn build(def: RouteDef) -> Result<Route> {
        def.build()
    }

    #[test]
    fn test_build_variants() {
        let page = build(RouteDef::new().path("/about")).unwrap();
        assert_eq!(page.kind(), RouteKind::Page);

        let index = build(RouteDef::new().index().sensitive(true)).unwrap();
        assert_eq!(index.kind(), RouteKind::Index);
        assert!(index.is_sensitive());

        let layout = build(RouteDef::new().children([RouteDef::new().index()])).unwrap();
        assert_eq!(layout.kind(), RouteKind::Layout);

        let available = build(
            RouteDef::new()
                .path("/shop")
                .available()
                .guard(|_| true)
                .children([RouteDef::new().path("cart")]),
        )
        .unwrap();
        assert_eq!(available.kind(), RouteKind::AvailableLayout);
        assert!(available.guard().is_some());
    }

    #[test]
    fn test_index_shape_errors() {
        assert!(matches!(
            build(RouteDef::new().index().path("x")),
            Err(RouteError::IndexWithPath { .. })
        ));
        assert!(matches!(
            build(RouteDef::new().index().children([RouteDef::new().path("x")])),
            Err(RouteError::IndexWithChildren { .. })
        ));
        assert!(matches!(
            build(RouteDef::new().index().available()),
            Err(RouteError::IndexAvailable { .. })
        ));
    }

    #[test]
    fn test_index_must_be_true() {
        let def: RouteDef = serde_json::from_str(r#"{ "path": "/a", "index": false }"#).unwrap();
        match def.build() {
            Err(RouteError::IndexNotTrue { from }) => assert_eq!(from, "/"),
            other => panic!("expected index error, got {:?}", other),
        }

        let def: RouteDef =
            serde_json::from_str(r#"{ "path": "/a", "children": [{ "path": "b", "index": false }] }"#)
                .unwrap();
        assert!(matches!(def.build(), Err(RouteError::IndexNotTrue { .. })));

        let def: RouteDef = serde_json::from_str(r#"{ "index": true }"#).unwrap();
        assert_eq!(def.build().unwrap().kind(), RouteKind::Index);
    }

    #[test]
    fn test_missing_and_empty_path() {
        match build(RouteDef::new().path("/users").children([RouteDef::new()])) {
            Err(RouteError::MissingPath { from }) => assert_eq!(from, "/users"),
            other => panic!("expected missing path, got {:?}", other),
        }

        assert!(matches!(
            build(RouteDef::new().path("")),
            Err(RouteError::EmptyPath { .. })
        ));
    }

    #[test]
    fn test_layout_shape_errors() {
        assert!(matches!(
            build(RouteDef::new().path("/a").children([])),
            Err(RouteError::EmptyChildren { .. })
        ));
        assert!(matches!(
            build(
                RouteDef::new()
                    .path("/a")
                    .guard(|_| true)
                    .children([RouteDef::new().index()])
            ),
            Err(RouteError::LayoutGuard { .. })
        ));
        assert!(matches!(
            build(
                RouteDef::new()
                    .path("/a")
                    .sensitive(false)
                    .children([RouteDef::new().index()])
            ),
            Err(RouteError::LayoutSensitive { .. })
        ));
        assert!(matches!(
            build(RouteDef::new().path("/a").available()),
            Err(RouteError::AvailableWithoutChildren { .. })
        ));
    }

    #[test]
    fn test_named_guards() {
        let registry: GuardRegistry = GuardRegistry::new().with_guard("never", |_| false);
        assert!(registry.contains("never"));

        let route = RouteDef::new()
            .path("/admin")
            .named_guard("never")
            .build_with(&registry)
            .unwrap();
        assert!(route.guard().is_some());

        match RouteDef::<(), ()>::new()
            .path("/shop")
            .children([RouteDef::new().path("cart").named_guard("missing")])
            .build_with(&registry)
        {
            Err(RouteError::InvalidGuard { path, name }) => {
                assert_eq!(path, "/shop/cart");
                assert_eq!(name, "missing");
            }
            other => panic!("expected invalid guard, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_definition() {
        let json = r#"{
            "path": "/",
            "children": [
                { "index": true, "element": "Home" },
                { "path": "admin", "guard": "staff", "meta": 3 },
                { "path": "shop", "reachable": true, "children": [{ "path": "cart" }] }
            ]
        }"#;

        let def: RouteDef<u32, String> = serde_json::from_str(json).unwrap();
        let registry = GuardRegistry::new().with_guard("staff", |_| true);
        let route = def.build_with(&registry).unwrap();

        let children = route.children();
        assert_eq!(children[0].element().map(String::as_str), Some("Home"));
        assert_eq!(children[1].meta(), Some(&3));
        assert_eq!(children[2].kind(), RouteKind::AvailableLayout);
    }

    #[test]
    fn test_deserialize_rejects_unknown_fields() {
        let result: std::result::Result<RouteDef, _> =
            serde_json::from_str(r#"{ "path": "/a", "exact": true }"#);
        assert!(result.is_err());
    }
}

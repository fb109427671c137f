/// Path utilities for route templates and pathnames
///
/// All functions are **pure**: given same input, always produce same output with no side effects.
/// Separators are `/`; backslashes are accepted and treated as `/`.

use std::borrow::Cow;

/// Returns true iff the path begins with a separator
///
/// A leading `\` counts as a separator, consistent with [`normalize`], which
/// rewrites backslashes to `/`.
///
/// # Examples
///
/// ```
/// use route_tree::path::is_absolute;
///
/// assert!(is_absolute("/users"));
/// assert!(is_absolute("\\users"));
/// assert!(!is_absolute("users"));
/// assert!(!is_absolute(""));
/// ```
pub fn is_absolute(path: &str) -> bool {
    path.starts_with('/') || path.starts_with('\\')
}

/// Returns true iff the path ends with a `/*` wildcard (or is exactly `*`)
///
/// ```
/// use route_tree::path::is_wildcard;
///
/// assert!(is_wildcard("*"));
/// assert!(is_wildcard("/docs/*"));
/// assert!(!is_wildcard("/docs*"));
/// ```
pub fn is_wildcard(path: &str) -> bool {
    path == "*" || path.ends_with("/*")
}

/// Checks whether a path is already in normal form
///
/// A normal path has no empty, `.` or `..` segments, no backslashes and no
/// trailing separator (the root `/` excepted).
fn is_normalized(path: &str) -> bool {
    if path.is_empty() || path.contains('\\') || path.contains("//") {
        return false;
    }

    if path == "/" {
        return true;
    }

    !path.ends_with('/')
        && path
            .split('/')
            .all(|segment| segment != "." && segment != "..")
}

/// Normalize a path
///
/// **Pure function** with zero-copy optimization using `Cow<'_, str>`.
///
/// - `.` segments are dropped
/// - `..` pops the previous segment; it never climbs above the root of an
///   absolute path, and is kept verbatim at the front of a relative path
/// - Redundant and trailing separators are collapsed
/// - An empty result collapses to `/`
///
/// # Examples
///
/// ```
/// use route_tree::path::normalize;
/// use std::borrow::Cow;
///
/// assert!(matches!(normalize("/about"), Cow::Borrowed("/about")));
///
/// assert_eq!(normalize("/var/lib/../file"), "/var/file");
/// assert_eq!(normalize("a/b//../c/./d/"), "a/c/d");
/// assert_eq!(normalize("../../a"), "../../a");
/// assert_eq!(normalize("/../../a"), "/a");
/// assert_eq!(normalize(""), "/");
/// ```
pub fn normalize(path: &str) -> Cow<'_, str> {
    // Fast path: already normal, borrow as-is
    if is_normalized(path) {
        return Cow::Borrowed(path);
    }

    let unified = path.replace('\\', "/");
    let absolute = unified.starts_with('/');

    let segments = unified
        .split('/')
        .fold(Vec::new(), |mut segments: Vec<&str>, segment| {
            match segment {
                "" | "." => {}
                ".." => match segments.last().copied() {
                    Some(last) if last != ".." => {
                        segments.pop();
                    }
                    // Relative paths keep leading `..`, absolute ones stop at root
                    _ if !absolute => segments.push(".."),
                    _ => {}
                },
                segment => segments.push(segment),
            }

            segments
        });

    let joined = segments.join("/");

    if absolute {
        Cow::Owned(format!("/{}", joined))
    } else if joined.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(joined)
    }
}

/// Joins two paths and normalizes the result
///
/// An empty `base` or `path` degenerates to normalizing the other one.
///
/// ```
/// use route_tree::path::join;
///
/// assert_eq!(join("/app", "/users/:id"), "/app/users/:id");
/// assert_eq!(join("/", "/courses"), "/courses");
/// assert_eq!(join("", "docs/"), "docs");
/// ```
pub fn join(base: &str, path: &str) -> String {
    match (base.is_empty(), path.is_empty()) {
        (true, _) => normalize(path).into_owned(),
        (_, true) => normalize(base).into_owned(),
        _ => normalize(&format!("{}/{}", base, path)).into_owned(),
    }
}

/// Resolves `to` against `from`
///
/// - Empty `to` normalizes `from` alone
/// - Absolute `to` ignores `from`
/// - Otherwise `to` is appended to `from`
///
/// ```
/// use route_tree::path::resolve;
///
/// assert_eq!(resolve("/courses", ""), "/courses");
/// assert_eq!(resolve("/courses", "./"), "/courses");
/// assert_eq!(resolve("/courses", ":id"), "/courses/:id");
/// assert_eq!(resolve("/courses", "/login"), "/login");
/// assert_eq!(resolve("/courses/1", "../2"), "/courses/2");
/// ```
pub fn resolve(from: &str, to: &str) -> String {
    if to.is_empty() {
        return normalize(from).into_owned();
    }

    if is_absolute(to) {
        return normalize(to).into_owned();
    }

    normalize(&format!("{}/{}", from, to)).into_owned()
}

/// Prefixes the path with `symbol` unless it already starts with it
pub fn prefix<'a>(path: &'a str, symbol: &str) -> Cow<'a, str> {
    if path.starts_with(symbol) {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("{}{}", symbol, path))
    }
}

/// Suffixes the path with `symbol` unless it already ends with it
pub fn suffix<'a>(path: &'a str, symbol: &str) -> Cow<'a, str> {
    if path.ends_with(symbol) {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("{}{}", path, symbol))
    }
}

/// Checks whether an absolute `path` escapes the subtree rooted at `root`
///
/// The path must start with `root` followed by a separator. Comparison is
/// case-insensitive unless `sensitive` is set. Relative paths never escape.
///
/// ```
/// use route_tree::path::is_outside_root;
///
/// assert!(!is_outside_root("/shop", "/shop/cart", false));
/// assert!(!is_outside_root("/shop", "/SHOP/cart", false));
/// assert!(is_outside_root("/shop", "/SHOP/cart", true));
/// assert!(is_outside_root("/shop", "/other", false));
/// assert!(!is_outside_root("/shop", "cart", false));
/// ```
pub fn is_outside_root(root: &str, path: &str, sensitive: bool) -> bool {
    if !is_absolute(path) {
        return false;
    }

    let root = suffix(root, "/");

    if sensitive {
        !path.starts_with(root.as_ref())
    } else {
        !path.to_lowercase().starts_with(&root.to_lowercase())
    }
}

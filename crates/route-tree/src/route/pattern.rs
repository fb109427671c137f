/// Path template compilation
///
/// Turns a route path template like `/users/:id/*` into an anchored regular
/// expression plus the ordered list of parameter names it captures.
///
/// # Template Syntax
///
/// - `:name` → one or more non-separator characters, captured as `name`
/// - trailing `/*` → the (possibly empty) remainder of the path, captured as `*`
/// - everything else is literal

use std::collections::hash_map;
use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::{Captures, Regex, RegexBuilder};
use serde::Serialize;

use crate::error::{Result, RouteError};

/// Key under which the wildcard remainder is stored
pub const WILDCARD_KEY: &str = "*";

static PARAM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r":(\w+)").expect("valid param regex"));

static TRAILING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/*\*?$").expect("valid trailing regex"));

/// Parameters extracted from a matched pathname
///
/// A key maps to `None` when its group did not participate in the match, e.g.
/// the wildcard of `/users/:id/*` matched against `/users/42`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(HashMap<String, Option<String>>);

impl Params {
    /// Returns the decoded value of a parameter, if present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.as_deref())
    }

    /// Returns the raw entry, distinguishing unknown keys from absent values
    pub fn get_raw(&self, key: &str) -> Option<&Option<String>> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Shortcut for the wildcard remainder
    pub fn wildcard(&self) -> Option<&str> {
        self.get(WILDCARD_KEY)
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, Option<String>> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params(
            iter.into_iter()
                .map(|(key, value)| (key.into(), Some(value.into())))
                .collect(),
        )
    }
}

/// A compiled route path
#[derive(Clone)]
pub struct Matcher {
    path: String,
    pattern: Regex,
    sensitive: bool,
    keys: Vec<String>,
}

impl Matcher {
    /// The template this matcher was compiled from
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn sensitive(&self) -> bool {
        self.sensitive
    }

    /// Parameter names in capture order, `*` last for wildcard templates
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Runs the pattern against a pathname
    ///
    /// Returns `None` when the pathname does not match. Captured values are
    /// percent-decoded, falling back to the raw text when decoding fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_tree::route::pattern::compile;
    ///
    /// let matcher = compile("/users/:id/*", false).unwrap();
    /// let params = matcher.matches("/users/42/a/b").unwrap();
    /// assert_eq!(params.get("id"), Some("42"));
    /// assert_eq!(params.get("*"), Some("a/b"));
    ///
    /// assert!(matcher.matches("/posts/42").is_none());
    /// ```
    pub fn matches(&self, pathname: &str) -> Option<Params> {
        let captures = self.pattern.captures(pathname)?;

        let params = self
            .keys
            .iter()
            .enumerate()
            .map(|(index, key)| {
                let value = captures
                    .get(index + 1)
                    .map(|capture| safely_decode(capture.as_str()));

                (key.clone(), value)
            })
            .collect();

        Some(Params(params))
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("path", &self.path)
            .field("pattern", &self.pattern.as_str())
            .field("sensitive", &self.sensitive)
            .field("keys", &self.keys)
            .finish()
    }
}

/// Whether every `%` in `value` starts a complete `%XX` hex triplet
fn is_well_formed(value: &str) -> bool {
    let bytes = value.as_bytes();

    bytes.iter().enumerate().all(|(index, &byte)| {
        byte != b'%'
            || matches!(
                bytes.get(index + 1..index + 3),
                Some([high, low]) if high.is_ascii_hexdigit() && low.is_ascii_hexdigit()
            )
    })
}

/// Percent-decodes a captured value, keeping the raw text on failure
///
/// Malformed escapes (a `%` not followed by two hex digits) and escapes that
/// decode to invalid UTF-8 both fail the whole value, never half of it.
pub fn safely_decode(value: &str) -> String {
    if !is_well_formed(value) {
        return value.to_string();
    }

    urlencoding::decode(value)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

/// Compiles a route path template
///
/// # Errors
///
/// - [`RouteError::TrailingWildcard`] when a trailing `*` does not follow `/`
/// - [`RouteError::DuplicateParam`] when a parameter name repeats
///
/// # Examples
///
/// ```
/// use route_tree::route::pattern::compile;
///
/// let matcher = compile("/users/:id", false).unwrap();
/// assert_eq!(matcher.keys(), ["id"]);
/// assert_eq!(matcher.matches("/USERS/42/").unwrap().get("id"), Some("42"));
///
/// assert!(compile("/users*", false).is_err());
/// assert!(compile("/:id/:id", false).is_err());
/// ```
pub fn compile(path: &str, sensitive: bool) -> Result<Matcher> {
    let wildcard = path.ends_with('*');

    if wildcard && path != "*" && !path.ends_with("/*") {
        return Err(RouteError::TrailingWildcard {
            path: path.to_string(),
        });
    }

    // Trailing separators and the wildcard are re-added below
    let body = TRAILING_RE.replace(path, "");
    let body = format!("/{}", body.trim_start_matches('/'));
    let escaped = regex::escape(&body);

    let mut keys: Vec<String> = Vec::new();
    let mut duplicate: Option<String> = None;

    let mut source = String::from("^");
    source.push_str(&PARAM_RE.replace_all(&escaped, |captures: &Captures| {
        let name = &captures[1];

        if keys.iter().any(|key| key == name) {
            duplicate.get_or_insert_with(|| name.to_string());
        } else {
            keys.push(name.to_string());
        }

        r"([^/]+)"
    }));

    if let Some(name) = duplicate {
        return Err(RouteError::DuplicateParam {
            path: path.to_string(),
            name,
        });
    }

    if wildcard {
        keys.push(WILDCARD_KEY.to_string());

        if path == "*" || path == "/*" {
            // The leading `/` is already matched, capture the rest
            source.push_str("(.*)$");
        } else {
            // Keep the separator out of the captured remainder
            source.push_str(r"(?:/(.+)|/*)$");
        }
    } else {
        source.push_str("/*$");
    }

    let pattern = RegexBuilder::new(&source)
        .case_insensitive(!sensitive)
        .build()
        .map_err(|source| RouteError::InvalidPattern {
            path: path.to_string(),
            source,
        })?;

    tracing::trace!(path, pattern = pattern.as_str(), ?keys, "compiled route path");

    Ok(Matcher {
        path: path.to_string(),
        pattern,
        sensitive,
        keys,
    })
}

// File: src/config.rs
// Purpose: Route tree configuration parsing from TOML

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::route::{GuardRegistry, RouteDef};
use crate::RouteTree;

/// Route tree configuration
///
/// ```toml
/// basename = "/app"
///
/// [[routes]]
/// path = "/login"
///
/// [[routes]]
/// path = "/"
///
/// [[routes.children]]
/// index = true
///
/// [[routes.children]]
/// path = "admin"
/// guard = "staff"
/// ```
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "M: Deserialize<'de>, E: Deserialize<'de>"))]
pub struct RouterConfig<M = (), E = ()> {
    /// Path prefix the whole tree is mounted under (default: "/")
    #[serde(default = "default_basename")]
    pub basename: String,

    #[serde(default)]
    pub routes: Vec<RouteDef<M, E>>,
}

fn default_basename() -> String {
    "/".to_string()
}

impl<M, E> Default for RouterConfig<M, E> {
    fn default() -> Self {
        Self {
            basename: default_basename(),
            routes: Vec::new(),
        }
    }
}

impl<M, E> RouterConfig<M, E>
where
    M: DeserializeOwned,
    E: DeserializeOwned,
{
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read route config file: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse route config file: {:?}", path))
    }

    /// Parse configuration from TOML source; empty source yields the default
    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config = toml::from_str(content).context("Invalid route config")?;

        Ok(config)
    }
}

impl<M, E> RouterConfig<M, E> {
    /// Validates the route definitions into a typed tree
    pub fn build(self, registry: &GuardRegistry<M, E>) -> crate::Result<RouteTree<M, E>> {
        let routes = RouteDef::build_all(self.routes, registry)?;

        tracing::debug!(basename = %self.basename, routes = routes.len(), "built route tree from config");

        Ok(RouteTree::new(routes, self.basename))
    }
}

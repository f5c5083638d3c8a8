//! Route table lookup and reverse routing.
//!
//! # Responsibilities
//! - Store compiled routes in declaration order
//! - Resolve a request path to exactly one route or an explicit no-match
//! - Build concrete paths from a route name and parameters
//!
//! # Design Decisions
//! - Immutable after construction (shared without locks)
//! - O(n) scan over entries (the table is a handful of literals)
//! - Static segments outrank parameters; declaration order breaks ties
//! - Invariants (unique names, unambiguous patterns) checked at build time

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use crate::routing::matcher::{split_path, Params, PathPattern};
use crate::routing::RouteError;
use crate::views::View;

/// A single compiled route.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub name: String,
    pub pattern: PathPattern,
    pub view: Arc<dyn View>,
}

/// Result of resolving a path.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub name: String,
    pub view: Arc<dyn View>,
    pub params: Params,
}

impl PartialEq for Resolved {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.view.id() == other.view.id() && self.params == other.params
    }
}

/// Builder for a [`RouteTable`].
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    base_path: Option<String>,
    routes: Vec<(String, String, Arc<dyn View>)>,
}

impl RouteTableBuilder {
    /// Mount the table below a base path (the history base, e.g. `/site/`).
    pub fn base_path(mut self, base: impl Into<String>) -> Self {
        self.base_path = Some(base.into());
        self
    }

    /// Register a route. Order matters only for tie-breaking.
    pub fn route(
        mut self,
        path: impl Into<String>,
        name: impl Into<String>,
        view: Arc<dyn View>,
    ) -> Self {
        self.routes.push((path.into(), name.into(), view));
        self
    }

    /// Compile all routes, checking table invariants.
    pub fn build(self) -> Result<RouteTable, RouteError> {
        let base_path = normalize_base(self.base_path.as_deref().unwrap_or("/"))?;

        let mut entries: Vec<RouteEntry> = Vec::with_capacity(self.routes.len());
        let mut by_name = HashMap::with_capacity(self.routes.len());

        for (path, name, view) in self.routes {
            let pattern = PathPattern::parse(&path)?;

            if by_name.contains_key(&name) {
                return Err(RouteError::DuplicateName(name));
            }
            if let Some(existing) = entries.iter().find(|e| e.pattern.same_shape(&pattern)) {
                return Err(RouteError::AmbiguousPattern {
                    first: existing.pattern.to_string(),
                    second: pattern.to_string(),
                });
            }

            by_name.insert(name.clone(), entries.len());
            entries.push(RouteEntry {
                name,
                pattern,
                view,
            });
        }

        tracing::debug!(
            routes = entries.len(),
            base_path = %base_path,
            "Route table compiled"
        );

        Ok(RouteTable {
            base_path,
            entries,
            by_name,
        })
    }
}

/// Immutable route table.
#[derive(Debug)]
pub struct RouteTable {
    /// Normalized base, `/` or `/prefix` without a trailing slash.
    base_path: String,
    entries: Vec<RouteEntry>,
    by_name: HashMap<String, usize>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// All routes in declaration order.
    pub fn routes(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a concrete path to the unique matching route.
    pub fn resolve(&self, url: &str) -> Result<Resolved, RouteError> {
        let no_match = || RouteError::NoMatch(url.to_string());

        let local = self.strip_base(url).ok_or_else(no_match)?;
        let segments = split_path(local).ok_or_else(no_match)?;

        let mut best: Option<(&RouteEntry, Params)> = None;
        for entry in &self.entries {
            let Some(params) = entry.pattern.matches(&segments) else {
                continue;
            };
            let better = match &best {
                None => true,
                Some((current, _)) => {
                    entry.pattern.specificity(&current.pattern) == Ordering::Greater
                }
            };
            if better {
                best = Some((entry, params));
            }
        }

        let (entry, params) = best.ok_or_else(no_match)?;
        Ok(Resolved {
            name: entry.name.clone(),
            view: entry.view.clone(),
            params,
        })
    }

    /// Build the concrete path for a named route.
    pub fn navigate(&self, name: &str, params: &Params) -> Result<String, RouteError> {
        let index = self
            .by_name
            .get(name)
            .ok_or_else(|| RouteError::UnknownRoute(name.to_string()))?;
        let entry = &self.entries[*index];

        let path = entry
            .pattern
            .build(params)
            .map_err(|param| RouteError::MissingParameter {
                route: name.to_string(),
                param,
            })?;

        if self.base_path == "/" {
            Ok(path)
        } else if path == "/" {
            Ok(format!("{}/", self.base_path))
        } else {
            Ok(format!("{}{}", self.base_path, path))
        }
    }

    fn strip_base<'a>(&self, url: &'a str) -> Option<&'a str> {
        if self.base_path == "/" {
            return Some(url);
        }
        let rest = url.strip_prefix(self.base_path.as_str())?;
        match rest.chars().next() {
            None | Some('?') | Some('#') => Some("/"),
            Some('/') => Some(rest),
            Some(_) => None, // "/sitemap" is not under "/site"
        }
    }
}

fn normalize_base(base: &str) -> Result<String, RouteError> {
    if !base.starts_with('/') {
        return Err(RouteError::InvalidPattern {
            pattern: base.to_string(),
            reason: "base path must start with '/'".to_string(),
        });
    }
    let trimmed = base.trim_end_matches('/');
    if trimmed.is_empty() {
        Ok("/".to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

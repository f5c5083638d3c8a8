//! Path pattern matching.
//!
//! # Responsibilities
//! - Parse route patterns (`/projects/:slug`) into typed segments
//! - Match a split request path against a pattern, binding parameters
//! - Rank patterns so static segments beat parameters at the same position
//!
//! # Design Decisions
//! - Static segments compare case-sensitively
//! - Parameter values are percent-decoded on match
//! - No regex: matching is a single pass over the segments

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::routing::RouteError;

/// Characters escaped when a parameter value is written into a path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Parameters bound while resolving a path, keyed by parameter name.
pub type Params = BTreeMap<String, String>;

/// One `/`-separated piece of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text that must match exactly.
    Static(String),
    /// Named placeholder (`:slug`) that binds any non-empty segment.
    Param(String),
}

impl Segment {
    fn is_static(&self) -> bool {
        matches!(self, Segment::Static(_))
    }
}

/// A compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a pattern such as `/`, `/about` or `/blog/:slug`.
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        let invalid = |reason: &str| RouteError::InvalidPattern {
            pattern: raw.to_string(),
            reason: reason.to_string(),
        };

        let rest = raw
            .strip_prefix('/')
            .ok_or_else(|| invalid("pattern must start with '/'"))?;

        let mut segments = Vec::new();
        if !rest.is_empty() {
            for piece in rest.split('/') {
                if piece.is_empty() {
                    return Err(invalid("empty path segment"));
                }
                match piece.strip_prefix(':') {
                    Some("") => return Err(invalid("parameter name is empty")),
                    Some(name) => {
                        let taken = segments
                            .iter()
                            .any(|s| matches!(s, Segment::Param(p) if p == name));
                        if taken {
                            return Err(invalid("parameter name used twice"));
                        }
                        segments.push(Segment::Param(name.to_string()));
                    }
                    None => segments.push(Segment::Static(piece.to_string())),
                }
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The pattern as written in the route table.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of the parameters this pattern binds, in path order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Static(_) => None,
        })
    }

    /// Match already split path segments, returning the bound parameters.
    pub fn matches(&self, path: &[&str]) -> Option<Params> {
        if path.len() != self.segments.len() {
            return None;
        }

        let mut params = Params::new();
        for (segment, actual) in self.segments.iter().zip(path) {
            match segment {
                Segment::Static(text) => {
                    if text != actual {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if actual.is_empty() {
                        return None;
                    }
                    let value = percent_decode_str(actual).decode_utf8().ok()?;
                    params.insert(name.clone(), value.into_owned());
                }
            }
        }
        Some(params)
    }

    /// Compare how specific two patterns are.
    ///
    /// Walks segments left to right; the first position where one pattern is
    /// static and the other a parameter decides. `Greater` means `self` wins.
    pub fn specificity(&self, other: &PathPattern) -> Ordering {
        for (a, b) in self.segments.iter().zip(&other.segments) {
            match (a.is_static(), b.is_static()) {
                (true, false) => return Ordering::Greater,
                (false, true) => return Ordering::Less,
                _ => {}
            }
        }
        Ordering::Equal
    }

    /// True when both patterns accept exactly the same set of paths.
    pub fn same_shape(&self, other: &PathPattern) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| match (a, b) {
                    (Segment::Static(x), Segment::Static(y)) => x == y,
                    (Segment::Param(_), Segment::Param(_)) => true,
                    _ => false,
                })
    }

    /// Substitute parameters into the pattern to build a concrete path.
    ///
    /// Returns the name of the first missing (or empty) parameter on failure.
    pub fn build(&self, params: &Params) -> Result<String, String> {
        if self.segments.is_empty() {
            return Ok("/".to_string());
        }

        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Static(text) => path.push_str(text),
                Segment::Param(name) => match params.get(name) {
                    Some(value) if !value.is_empty() => {
                        path.extend(utf8_percent_encode(value, SEGMENT));
                    }
                    _ => return Err(name.clone()),
                },
            }
        }
        Ok(path)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.raw)
    }
}

/// Split a request path into segments.
///
/// Drops any query string or fragment and tolerates one trailing slash.
/// Returns `None` when the input is not an absolute path.
pub fn split_path(url: &str) -> Option<Vec<&str>> {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    let path = url[..end].strip_prefix('/')?;
    let path = match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path,
    };

    if path.is_empty() {
        return Some(Vec::new());
    }
    Some(path.split('/').collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_root_and_params() {
        let root = PathPattern::parse("/").unwrap();
        assert!(root.segments().is_empty());

        let detail = PathPattern::parse("/projects/:slug").unwrap();
        assert_eq!(
            detail.segments(),
            &[
                Segment::Static("projects".into()),
                Segment::Param("slug".into())
            ]
        );
        assert_eq!(detail.param_names().collect::<Vec<_>>(), vec!["slug"]);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(PathPattern::parse("about").is_err());
        assert!(PathPattern::parse("/blog//post").is_err());
        assert!(PathPattern::parse("/blog/:").is_err());
        assert!(PathPattern::parse("/:id/:id").is_err());
    }

    #[test]
    fn test_matches_binds_and_decodes() {
        let pattern = PathPattern::parse("/blog/:slug").unwrap();

        let params = pattern.matches(&["blog", "hello%20world"]).unwrap();
        assert_eq!(params.get("slug").map(String::as_str), Some("hello world"));

        assert!(pattern.matches(&["blog"]).is_none());
        assert!(pattern.matches(&["Blog", "x"]).is_none()); // Case sensitive
        assert!(pattern.matches(&["blog", ""]).is_none());
    }

    #[test]
    fn test_specificity_prefers_static() {
        let fixed = PathPattern::parse("/projects/featured").unwrap();
        let param = PathPattern::parse("/projects/:slug").unwrap();
        assert_eq!(fixed.specificity(&param), Ordering::Greater);
        assert_eq!(param.specificity(&fixed), Ordering::Less);
        assert!(!fixed.same_shape(&param));
        assert!(param.same_shape(&PathPattern::parse("/projects/:id").unwrap()));
    }

    #[test]
    fn test_build_encodes_values() {
        let pattern = PathPattern::parse("/blog/:slug").unwrap();
        let mut params = Params::new();
        params.insert("slug".into(), "a b/c".into());
        assert_eq!(pattern.build(&params).unwrap(), "/blog/a%20b%2Fc");

        assert_eq!(pattern.build(&Params::new()), Err("slug".to_string()));
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("/"), Some(vec![]));
        assert_eq!(split_path("/about/"), Some(vec!["about"]));
        assert_eq!(split_path("/blog/x?page=2#top"), Some(vec!["blog", "x"]));
        assert_eq!(split_path("about"), None);
        assert_eq!(split_path("//"), Some(vec!["", ""]));
    }
}

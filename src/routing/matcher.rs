//! Route matching against the live request path.
//!
//! # Responsibilities
//! - Rewrite dynamic `(name:type)` segments against the live path
//! - Produce a request-scoped [`MatchedRoute`] with captured parameters
//!
//! # Design Decisions
//! - Matching is a pure function over the repository; the stored table
//!   is never mutated, so one table serves concurrent requests
//! - Every dynamic segment is evaluated; an invalid segment does not
//!   short-circuit later ones, it just leaves itself unrewritten so
//!   the final exact comparison fails
//! - Literal routes are matched by direct lookup and never rewritten

use crate::http::method::Method;
use crate::routing::repository::{RouteOptions, RouteRepository};
use crate::routing::segment::{self, SegmentPattern};

/// Result of matching one request against the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRoute {
    /// The concrete URI the route resolved to.
    pub uri: String,
    /// Options declared for the route.
    pub options: RouteOptions,
    /// Captured dynamic segments as (segment index, live value),
    /// in declaration order.
    pub parameters: Vec<(usize, String)>,
}

/// Match `method` + `path` against the stored routes.
///
/// Literal routes win by exact lookup; otherwise every stored pattern
/// is rewritten against the live segments and compared for an exact
/// hit. Returns `None` when nothing matches.
pub fn match_route(
    repository: &RouteRepository,
    method: Method,
    path: &str,
) -> Option<MatchedRoute> {
    let live_uri = segment::normalize(path);

    if let Some(options) = repository.retrieve(method, &live_uri) {
        return Some(MatchedRoute {
            uri: live_uri,
            options: options.clone(),
            parameters: Vec::new(),
        });
    }

    let live_segments = segment::segments(path);

    for (stored_method, uri, options) in repository.stored() {
        if stored_method != method {
            continue;
        }
        if let Some((rewritten, parameters)) = rewrite(uri, &live_segments) {
            if rewritten == live_uri {
                return Some(MatchedRoute {
                    uri: rewritten,
                    options: options.clone(),
                    parameters,
                });
            }
        }
    }

    None
}

/// Rewrite one stored URI pattern against the live path segments.
///
/// Returns the rewritten URI and captured parameters, or `None` when
/// the pattern contains no dynamic segments at all (such routes only
/// match via exact lookup).
pub fn rewrite(uri: &str, live_segments: &[String]) -> Option<(String, Vec<(usize, String)>)> {
    let mut segments = segment::segments(uri);
    let mut parameters = Vec::new();
    let mut rewritten = false;

    for (index, stored) in segments.iter_mut().enumerate() {
        let Some(pattern) = SegmentPattern::parse(stored) else {
            continue;
        };
        rewritten = true;

        // Positional lookup: pattern segment N maps to live segment N.
        // An absent or rule-violating value leaves the pattern text in
        // place, so the exact comparison fails later.
        let Some(value) = live_segments.get(index) else {
            continue;
        };
        if pattern.rule.accepts(value) {
            *stored = value.clone();
            parameters.push((index, value.clone()));
        }
    }

    if rewritten {
        Some((segments.join("/"), parameters))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::ResponseFormat;

    fn repo_with(method: Method, uri: &str) -> RouteRepository {
        let mut repo = RouteRepository::new();
        repo.store(
            method,
            uri,
            RouteOptions::new("UserController", "show").format(ResponseFormat::View),
        );
        repo
    }

    #[test]
    fn literal_route_matches_without_parameters() {
        let repo = repo_with(Method::Get, "/users/all");
        let matched = match_route(&repo, Method::Get, "/users/all").unwrap();
        assert_eq!(matched.uri, "users/all");
        assert!(matched.parameters.is_empty());
    }

    #[test]
    fn matching_leaves_repository_unchanged() {
        let repo = repo_with(Method::Get, "/users/all");
        let before: Vec<_> = repo
            .stored()
            .map(|(m, u, o)| (m, u.to_string(), o.clone()))
            .collect();

        let _ = match_route(&repo, Method::Get, "/users/all");
        let _ = match_route(&repo, Method::Get, "/users/42");

        let after: Vec<_> = repo
            .stored()
            .map(|(m, u, o)| (m, u.to_string(), o.clone()))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn int_segment_captures_numeric_value() {
        let repo = repo_with(Method::Get, "/users/(id:int)");
        let matched = match_route(&repo, Method::Get, "/users/42").unwrap();
        assert_eq!(matched.uri, "users/42");
        assert_eq!(matched.parameters, vec![(1, "42".to_string())]);
    }

    #[test]
    fn int_segment_rejects_non_numeric_value() {
        let repo = repo_with(Method::Get, "/users/(id:int)");
        assert!(match_route(&repo, Method::Get, "/users/abc").is_none());
    }

    #[test]
    fn any_segment_accepts_everything() {
        let repo = repo_with(Method::Get, "/pages/(slug:any)");
        let matched = match_route(&repo, Method::Get, "/pages/hello-world").unwrap();
        assert_eq!(matched.parameters, vec![(1, "hello-world".to_string())]);
    }

    #[test]
    fn multiple_dynamic_segments_evaluate_independently() {
        let repo = repo_with(Method::Get, "/posts/(id:int)/(slug:any)");
        let matched = match_route(&repo, Method::Get, "/posts/7/title").unwrap();
        assert_eq!(
            matched.parameters,
            vec![(1, "7".to_string()), (2, "title".to_string())]
        );

        // First segment invalid: the second is still evaluated, but
        // the route as a whole no longer matches.
        assert!(match_route(&repo, Method::Get, "/posts/x/title").is_none());
    }

    #[test]
    fn method_mismatch_never_matches() {
        let repo = repo_with(Method::Get, "/users/(id:int)");
        assert!(match_route(&repo, Method::Post, "/users/42").is_none());
    }

    #[test]
    fn shorter_live_path_does_not_match() {
        let repo = repo_with(Method::Get, "/users/(id:int)");
        assert!(match_route(&repo, Method::Get, "/users").is_none());
    }

    #[test]
    fn rewrite_ignores_pattern_free_routes() {
        assert!(rewrite("users/all", &segment::segments("/users/all")).is_none());
    }
}

//! Fuzzy stop-name matching.
//!
//! Stop names in the dataset are noisy: duplicated spellings, coordinate
//! suffixes like `(12.9810N)`, route tags like `(Route M1)` and platform
//! markers like `#2`. This module consolidates every name comparison in
//! the crate into one tier cascade with a fixed precedence. A later tier
//! is never attempted once an earlier tier has matched, and no tier is
//! "more correct" than an earlier one; first success wins.

use std::sync::LazyLock;

use regex::Regex;

/// Coordinate suffix, e.g. `(12.9810n)` (input is lower-cased first).
static COORD_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\([\d.]+n\)").unwrap());

/// Route tag suffix, e.g. `(route m1)`.
static ROUTE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\(route\s+\w+\)").unwrap());

/// Numbered marker suffix, e.g. `#2`.
static HASH_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*#\d+").unwrap());

/// Road-name fragments shorter than this are too ambiguous to compare.
const MIN_ROAD_FRAGMENT_LEN: usize = 5;

/// Which tier of the cascade produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Lower-cased, trimmed strings are equal.
    Exact,

    /// One string contains the other (either direction).
    Substring,

    /// Equal or containing after stripping coordinate/route/marker suffixes.
    Normalized,

    /// The pre-comma road fragments agree (both longer than 5 characters).
    RoadName,
}

/// Strip coordinate, route-tag and numbered-marker suffixes from a stop
/// name, lower-casing and trimming first.
pub fn normalize(name: &str) -> String {
    let name = name.trim().to_lowercase();
    let name = COORD_SUFFIX.replace_all(&name, "");
    let name = ROUTE_SUFFIX.replace_all(&name, "");
    let name = HASH_SUFFIX.replace_all(&name, "");
    name.trim().to_string()
}

/// Check whether a free-text query matches a candidate stop name,
/// reporting the tier that succeeded.
///
/// Tiers are attempted in strict order and short-circuit: exact,
/// substring, normalized (exact/substring on suffix-stripped forms),
/// road name (pre-comma fragment).
pub fn match_tier(query: &str, candidate: &str) -> Option<MatchTier> {
    let q = query.trim().to_lowercase();
    let c = candidate.trim().to_lowercase();

    if q == c {
        return Some(MatchTier::Exact);
    }

    if q.contains(&c) || c.contains(&q) {
        return Some(MatchTier::Substring);
    }

    let q_norm = normalize(&q);
    let c_norm = normalize(&c);

    if q_norm == c_norm || q_norm.contains(&c_norm) || c_norm.contains(&q_norm) {
        return Some(MatchTier::Normalized);
    }

    let q_road = q_norm.split(',').next().unwrap_or("").trim();
    let c_road = c_norm.split(',').next().unwrap_or("").trim();

    if q_road.len() > MIN_ROAD_FRAGMENT_LEN
        && c_road.len() > MIN_ROAD_FRAGMENT_LEN
        && (q_road == c_road || q_road.contains(c_road) || c_road.contains(q_road))
    {
        return Some(MatchTier::RoadName);
    }

    None
}

/// Check whether a free-text query matches a candidate stop name.
///
/// Deterministic and side-effect free; see [`match_tier`] for the
/// precedence rules.
pub fn matches(query: &str, candidate: &str) -> bool {
    match_tier(query, candidate).is_some()
}

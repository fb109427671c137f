/// Branch scoring and ranking
///
/// Static segments outrank dynamic segments, which outrank wildcards, and an
/// index route outranks a sibling page resolving to the same path.

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::branch::RouteBranch;

const INDEX_ROUTE_VALUE: i32 = 2;
const EMPTY_SEGMENT_VALUE: i32 = 1;
const SPLAT_PENALTY_VALUE: i32 = -2;
const DYNAMIC_SEGMENT_VALUE: i32 = 3;
const STATIC_SEGMENT_VALUE: i32 = 10;

static PARAM_SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:\w+$").expect("valid param segment regex"));

/// Computes the specificity score of a compiled route path
///
/// # Examples
///
/// ```
/// use route_tree::rank::compute_score;
///
/// assert!(compute_score("/users/new", false) > compute_score("/users/:id", false));
/// assert!(compute_score("/users/:id", false) > compute_score("/users/*", false));
/// assert!(compute_score("/users", true) > compute_score("/users", false));
/// ```
pub fn compute_score(path: &str, index: bool) -> i32 {
    let mut segments: Vec<&str> = path.split('/').collect();
    let mut score = segments.len() as i32;

    if segments.last() == Some(&"*") {
        segments.pop();
        score += SPLAT_PENALTY_VALUE;
    }

    if index {
        score += INDEX_ROUTE_VALUE;
    }

    segments.iter().fold(score, |score, segment| match *segment {
        "" => score + EMPTY_SEGMENT_VALUE,
        segment if PARAM_SEGMENT_RE.is_match(segment) => score + DYNAMIC_SEGMENT_VALUE,
        _ => score + STATIC_SEGMENT_VALUE,
    })
}

/// Whether two branches differ only in their final ancestor level
pub fn is_siblings<M, E>(prev: &RouteBranch<'_, M, E>, next: &RouteBranch<'_, M, E>) -> bool {
    let (prev, next) = (prev.meta(), next.meta());

    prev.len() == next.len()
        && prev[..prev.len().saturating_sub(1)]
            .iter()
            .zip(next)
            .all(|(prev, next)| prev.index == next.index)
}

/// Orders two branches: higher score first, then earlier sibling first
///
/// Non-sibling branches with equal scores compare equal.
pub fn compare_branches<M, E>(prev: &RouteBranch<'_, M, E>, next: &RouteBranch<'_, M, E>) -> Ordering {
    next.score().cmp(&prev.score()).then_with(|| {
        if !is_siblings(prev, next) {
            return Ordering::Equal;
        }

        match (prev.meta().last(), next.meta().last()) {
            (Some(prev), Some(next)) => prev.index.cmp(&next.index),
            _ => Ordering::Equal,
        }
    })
}

/// Sorts branches into matching order
///
/// Stable: equal branches keep their declaration order. The sibling tie-break
/// is not transitive across non-siblings, so a plain insertion sort is used
/// rather than `sort_by`, which requires a total order.
pub fn rank_branches<M, E>(branches: &mut [RouteBranch<'_, M, E>]) {
    for current in 1..branches.len() {
        let mut position = current;

        while position > 0
            && compare_branches(&branches[position - 1], &branches[position]) == Ordering::Greater
        {
            branches.swap(position - 1, position);
            position -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/courses/:id", false, 17)]
    #[case("/courses", true, 15)]
    #[case("/login", false, 13)]
    #[case("/", true, 6)]
    #[case("/*", false, 1)]
    #[case("/users/:id/*", false, 16)]
    fn test_compute_score(#[case] path: &str, #[case] index: bool, #[case] expected: i32) {
        assert_eq!(compute_score(path, index), expected);
    }

    #[rstest]
    #[case("/shop/items", "/shop/:kind")]
    #[case("/a/b/c", "/a/:b/c")]
    #[case("/:a/b", "/:a/:b")]
    fn test_static_beats_dynamic(#[case] more_static: &str, #[case] less_static: &str) {
        assert!(compute_score(more_static, false) > compute_score(less_static, false));
    }

    #[test]
    fn test_wildcard_below_dynamic() {
        assert!(compute_score("/docs/:page", false) > compute_score("/docs/*", false));
        assert!(compute_score("/docs", false) > compute_score("/docs/*", false));
    }
}

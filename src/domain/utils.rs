//! Path helpers shared by the category handlers

/// Position named by the trailing path segment, e.g. `api/categories/2` -> `2`.
///
/// A missing or non-numeric trailing segment yields `None`.
pub fn position_from_path(path: &str) -> Option<i64> {
    path.rsplit('/')
        .next()
        .map(str::trim)
        .and_then(|segment| segment.parse::<i64>().ok())
}

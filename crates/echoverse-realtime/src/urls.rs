//! Avatar URL resolution.
//!
//! The Friends API returns avatar paths that may be relative to the API
//! host. Alerts and feed entries always carry absolute URLs, so the
//! resolution happens once at mapping time.

/// Resolve a possibly-relative avatar URL against `base`.
///
/// Absolute http(s) URLs pass through untouched. A `/api/...` path against
/// a base already ending in `/api` collapses the duplicated segment.
/// Missing or empty inputs resolve to `None`.
pub fn resolve_avatar_url(base: &str, url: Option<&str>) -> Option<String> {
    let url = url?;
    if url.is_empty() {
        return None;
    }
    let lowered = url.to_ascii_lowercase();
    if lowered.starts_with("http://") || lowered.starts_with("https://") {
        return Some(url.to_string());
    }
    let base = base.trim_end_matches('/');
    if url.starts_with("/api/") {
        if let Some(host) = base.strip_suffix("/api") {
            return Some(format!("{host}{url}"));
        }
    }
    if url.starts_with('/') {
        Some(format!("{base}{url}"))
    } else {
        Some(format!("{base}/{url}"))
    }
}

//! Static asset URLs.
//!
//! Uploaded files come back as server-relative paths, sometimes with
//! Windows separators (`uploads\\projects\\a.png`). Display URLs are built
//! against the static-asset base after normalizing every separator.

/// Normalize a stored path: every `\` becomes `/`, leading slashes go.
pub fn normalize_path(path: &str) -> String {
    path.trim().replace('\\', "/").trim_start_matches('/').to_string()
}

/// Absolute display URL of a stored file, or `None` for an empty path.
///
/// ```
/// use expo_admin_core::assets::asset_url;
///
/// assert_eq!(
///     asset_url("http://cdn.local/", "uploads\\img\\a.png").as_deref(),
///     Some("http://cdn.local/uploads/img/a.png"),
/// );
/// ```
pub fn asset_url(static_base: &str, path: &str) -> Option<String> {
    let path = normalize_path(path);
    if path.is_empty() {
        return None;
    }
    Some(format!("{}/{}", static_base.trim_end_matches('/'), path))
}

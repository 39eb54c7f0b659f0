//! Base URL normalization

use url::Url;

use crate::error::{Error, Result};

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.groundcover.com";

/// Add a scheme to a base URL that lacks one.
///
/// - `//host/path` becomes `https://host/path`
/// - `/host/path` becomes `https://host/path`
/// - `host/path` becomes `https://host/path`
/// - URLs that already carry a scheme are returned unchanged
///
/// Applying it twice gives the same result as applying it once.
pub fn normalize_base_url(base_url: &str) -> String {
    if base_url.is_empty() {
        return String::new();
    }

    if base_url.starts_with("//") {
        return format!("https:{}", base_url);
    }

    if let Some(rest) = base_url.strip_prefix('/') {
        return format!("https://{}", rest);
    }

    if !base_url.contains("://") {
        return format!("https://{}", base_url);
    }

    base_url.to_string()
}

/// Normalize and parse a base URL.
///
/// Values without a host, or carrying a query or fragment, are rejected.
pub fn parse_base_url(base_url: &str) -> Result<Url> {
    let normalized = normalize_base_url(base_url.trim());
    if normalized.is_empty() {
        return Err(Error::Configuration("base URL is required".to_string()));
    }

    let url = Url::parse(&normalized).map_err(|e| {
        Error::Configuration(format!("error parsing base URL '{}': {}", normalized, e))
    })?;

    if url.host_str().is_none_or(str::is_empty) {
        return Err(Error::Configuration(format!(
            "base URL '{}' has no host",
            normalized
        )));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(Error::Configuration(format!(
            "base URL '{}' must not carry a query or fragment",
            normalized
        )));
    }

    if url.cannot_be_a_base() {
        return Err(Error::Configuration(format!(
            "base URL '{}' cannot have endpoint paths appended",
            normalized
        )));
    }

    Ok(url)
}

/// Join an endpoint path onto the base URL, keeping any base path prefix.
///
/// Every `/`-separated part of `path` is pushed as one percent-encoded
/// segment: `?`, `#` and `%` stay inside the path, and `.` or `..` parts are
/// dropped instead of being resolved.
pub(crate) fn endpoint_url(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    // parse_base_url only accepts URLs that can be a base
    if let Ok(mut segments) = url.path_segments_mut() {
        segments
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
    }
    url
}

/// Check that a resource identifier can stand as a single path segment.
pub(crate) fn id_segment<'a>(kind: &str, id: &'a str) -> Result<&'a str> {
    if id.is_empty() || id.contains('/') || id == "." || id == ".." {
        return Err(Error::Validation(format!("invalid {} id '{}'", kind, id)));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_forms() {
        assert_eq!(
            normalize_base_url("api.groundcover.com"),
            "https://api.groundcover.com"
        );
        assert_eq!(
            normalize_base_url("//api.groundcover.com/v1"),
            "https://api.groundcover.com/v1"
        );
        assert_eq!(
            normalize_base_url("/api.groundcover.com"),
            "https://api.groundcover.com"
        );
        assert_eq!(
            normalize_base_url("http://localhost:8080"),
            "http://localhost:8080"
        );
        assert_eq!(normalize_base_url(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "api.groundcover.com",
            "//api.groundcover.com",
            "/api.groundcover.com/base",
            "https://api.groundcover.com",
            "http://127.0.0.1:1234/prefix/",
            "localhost:9000",
        ];
        for input in inputs {
            let once = normalize_base_url(input);
            assert_eq!(normalize_base_url(&once), once, "input: {}", input);
        }
    }

    #[test]
    fn test_parse_base_url() {
        let url = parse_base_url("api.groundcover.com").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("api.groundcover.com"));
        assert_eq!(url.path(), "/");

        let url = parse_base_url("http://localhost:8080/gateway").unwrap();
        assert_eq!(url.port(), Some(8080));
        assert_eq!(url.path(), "/gateway");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(parse_base_url(""), Err(Error::Configuration(_))));
        assert!(matches!(parse_base_url("   "), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_endpoint_url_joins_paths() {
        let root = parse_base_url("https://api.groundcover.com").unwrap();
        assert_eq!(
            endpoint_url(&root, "/api/logs/search").as_str(),
            "https://api.groundcover.com/api/logs/search"
        );

        let prefixed = parse_base_url("https://proxy.internal/gc/").unwrap();
        assert_eq!(
            endpoint_url(&prefixed, "/api/logs/search").as_str(),
            "https://proxy.internal/gc/api/logs/search"
        );
    }

    #[test]
    fn test_endpoint_url_keeps_reserved_characters_in_path() {
        let root = parse_base_url("https://api.groundcover.com").unwrap();

        let url = endpoint_url(&root, "/api/monitors/abc?x=1#frag");
        assert_eq!(url.path(), "/api/monitors/abc%3Fx=1%23frag");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);

        let url = endpoint_url(&root, "/api/monitors/50%/../x");
        assert_eq!(url.path(), "/api/monitors/50%25/x");
    }

    #[test]
    fn test_parse_rejects_query_and_fragment() {
        assert!(matches!(
            parse_base_url("https://h/?a=1"),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            parse_base_url("https://h/base#top"),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_id_segment() {
        assert_eq!(id_segment("monitor", "m-1").unwrap(), "m-1");
        assert_eq!(id_segment("monitor", "abc?x=1").unwrap(), "abc?x=1");
        for bad in ["", ".", "..", "a/b"] {
            assert!(
                matches!(id_segment("monitor", bad), Err(Error::Validation(_))),
                "accepted '{}'",
                bad
            );
        }
    }
}

use super::NormalizedUrl;
use crate::UrlError;
use url::Url;

/// Opaque schemes that must never be mistaken for a bare host
const NON_WEB_SCHEMES: &[&str] = &["mailto:", "javascript:", "tel:", "data:", "ftp:", "file:"];

/// Resolves a raw link against a base URL and normalizes it
///
/// # Normalization Steps
///
/// 1. Reject empty and fragment-only references (`#section`)
/// 2. Resolve the reference against `base` (handles `/a`, `./b`, `../c`,
///    `//host/d` and absolute URLs)
/// 3. Reject anything that is not `http` or `https`
/// 4. Lowercase scheme and host
/// 5. Normalize path:
///    - Remove dot segments (. and ..)
///    - Collapse repeated slashes
///    - Remove trailing slash (except for root /)
///    - Empty path becomes /
/// 6. Remove fragment (everything after #)
/// 7. Drop an empty query string (trailing ?); a non-empty query is kept
///    byte for byte, including its parameter order
///
/// # Arguments
///
/// * `raw` - The link as it appeared in the page
/// * `base` - The URL of the page the link was found on
///
/// # Returns
///
/// * `Ok(NormalizedUrl)` - Canonical URL
/// * `Err(UrlError)` - The link cannot be followed
///
/// # Examples
///
/// ```
/// use kb_harvest::url::normalize;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/blog/").unwrap();
/// let url = normalize("./post-1/#comments", &base).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/blog/post-1");
/// ```
pub fn normalize(raw: &str, base: &Url) -> Result<NormalizedUrl, UrlError> {
    let raw = raw.trim();

    if raw.is_empty() || raw.starts_with('#') {
        return Err(UrlError::NoTarget(raw.to_string()));
    }

    let url = base.join(raw).map_err(|e| UrlError::Parse(e.to_string()))?;
    canonicalize(url)
}

/// Normalizes a user-supplied entry URL
///
/// Users often type a bare host such as `quill.co/blog/`; when the input
/// carries no scheme, `https://` is assumed.
///
/// # Examples
///
/// ```
/// use kb_harvest::url::normalize_entry;
///
/// let url = normalize_entry("quill.co/blog/").unwrap();
/// assert_eq!(url.as_str(), "https://quill.co/blog");
/// ```
pub fn normalize_entry(raw: &str) -> Result<NormalizedUrl, UrlError> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(UrlError::NoTarget(String::new()));
    }

    let lower = raw.to_ascii_lowercase();
    let with_scheme = if raw.contains("://")
        || NON_WEB_SCHEMES
            .iter()
            .any(|scheme| lower.starts_with(scheme))
    {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    let url = Url::parse(&with_scheme).map_err(|e| UrlError::Parse(e.to_string()))?;
    canonicalize(url)
}

/// Applies the canonical form to an already absolute URL
fn canonicalize(mut url: Url) -> Result<NormalizedUrl, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    // The url crate already lowercases hosts of special schemes; the check
    // here only guards against hostless inputs such as `http:///path`.
    match url.host_str() {
        Some(host) if !host.is_empty() => {
            let lowered = host.to_lowercase();
            if lowered != host {
                url.set_host(Some(&lowered))
                    .map_err(|e| UrlError::Malformed(format!("Failed to set host: {}", e)))?;
            }
        }
        _ => return Err(UrlError::MissingDomain),
    }

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    url.set_fragment(None);

    if url.query() == Some("") {
        url.set_query(None);
    }

    Ok(NormalizedUrl(url))
}

/// Normalizes a URL path by removing dot segments and trailing slashes
fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let mut normalized_segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                normalized_segments.pop();
            }
            _ => normalized_segments.push(segment),
        }
    }

    if normalized_segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", normalized_segments.join("/"))
}

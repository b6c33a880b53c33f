use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host (which shouldn't happen for valid HTTP(S) URLs), it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use kb_harvest::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("https://sub.example.com/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("sub.example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true iff both URLs point at the same host
///
/// Hosts must be identical after lowercasing: `blog.example.com` and
/// `example.com` are different sites, as are `www.example.com` and
/// `example.com`. Ports are not compared.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use kb_harvest::url::same_host;
///
/// let a = Url::parse("https://example.com/a").unwrap();
/// let b = Url::parse("http://EXAMPLE.com/b").unwrap();
/// let c = Url::parse("https://blog.example.com/").unwrap();
/// assert!(same_host(&a, &b));
/// assert!(!same_host(&a, &c));
/// ```
pub fn same_host(a: &Url, b: &Url) -> bool {
    match (extract_domain(a), extract_domain(b)) {
        (Some(host_a), Some(host_b)) => host_a == host_b,
        _ => false,
    }
}

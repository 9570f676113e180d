use url::Url;

/// Extracts the comparable site identity of a URL
///
/// The host is lowercased with a leading `www.` removed, and paired with the
/// effective port so that `http://127.0.0.1:8080` and `http://127.0.0.1:9090`
/// are different sites.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_migrate::url::site_identity;
///
/// let a = Url::parse("https://www.Example.com/path").unwrap();
/// let b = Url::parse("https://example.com/").unwrap();
/// assert_eq!(site_identity(&a), site_identity(&b));
/// ```
pub fn site_identity(url: &Url) -> Option<(String, Option<u16>)> {
    let host = url.host_str()?.to_lowercase();
    let host = host.strip_prefix("www.").map(str::to_string).unwrap_or(host);
    Some((host, url.port_or_known_default()))
}

/// Returns true if both URLs belong to the same site
pub fn same_site(base: &Url, candidate: &Url) -> bool {
    match (site_identity(base), site_identity(candidate)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

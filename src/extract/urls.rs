//! Canonical article URLs.
//!
//! The same article is linked as `/en/news/deal`, `/en/news/deal/`,
//! `/en/news/deal?utm_source=x` or absolutely. All of them map to one string,
//! which is the record's identity everywhere else.

use url::Url;

/// Canonical identity of an article link.
///
/// Resolves `href` against `base`, drops query and fragment, and removes the
/// trailing slash. Hrefs that cannot be resolved come back as a best-effort
/// string; the source's article pattern is what rejects them.
///
/// # Arguments
///
/// * `base` - URL of the page the link was found on
/// * `href` - Raw `href` attribute value
///
/// # Returns
///
/// The normalized URL. Normalizing the result again returns it unchanged.
pub fn normalize_url(base: &Url, href: &str) -> String {
    let href = href.trim();
    match base.join(href) {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            url.as_str().trim_end_matches('/').to_string()
        }
        Err(_) => {
            let cut = href
                .find(|c| c == '?' || c == '#')
                .map_or(href, |i| &href[..i]);
            cut.trim_end_matches('/').to_string()
        }
    }
}

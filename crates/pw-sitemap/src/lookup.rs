//! Page lookup by navigated path.
//!
//! A page's url mask, when present, decides the match. Otherwise the url is
//! compared: if it contains [`PARAM_DELIMITER`], only the static prefix before
//! the delimiter is compared against the same number of leading bytes of the
//! path; without a delimiter the url must equal the path. The first matching
//! record in flattened order wins.

use crate::flatten::FlatPage;
use crate::pattern::{Params, UrlPattern};

/// Character that starts a parameterized url segment.
pub const PARAM_DELIMITER: char = ':';

/// Compare a page url against a navigated path.
///
/// A delimiter at position 0 disables the prefix rule and falls back to
/// exact equality.
#[must_use]
pub fn url_matches(url: &str, path: &str) -> bool {
    match url.find(PARAM_DELIMITER) {
        Some(pos) if pos > 0 => path.get(..pos) == Some(&url[..pos]),
        _ => url == path,
    }
}

/// Match one page against a path using an already compiled mask.
///
/// Pages with an empty url are not routable and never match.
pub(crate) fn match_page<C>(
    page: &FlatPage<C>,
    pattern: Option<&UrlPattern>,
    path: &str,
) -> Option<Params> {
    if page.url.is_empty() {
        return None;
    }
    match pattern {
        Some(pattern) => pattern.match_path(path),
        None => url_matches(&page.url, path).then(Params::new),
    }
}

/// Find the first page matching `path`.
///
/// Masks are compiled on every call; use
/// [`PageTable::find`](crate::PageTable::find) for repeated lookups.
#[must_use]
pub fn find_page<'a, C>(pages: &'a [FlatPage<C>], path: &str) -> Option<&'a FlatPage<C>> {
    pages.iter().find(|page| {
        let pattern = page.mask().map(UrlPattern::parse);
        match_page(page, pattern.as_ref(), path).is_some()
    })
}

//! Product image URL resolution.

use url::Url;

/// Shown in listings when a product has no image.
pub const LISTING_PLACEHOLDER: &str = "/placeholder.jpg";

/// Shown on the detail page when a product has no image.
pub const DETAIL_PLACEHOLDER: &str = "/placeholder.svg";

/// Turns stored image references into URLs a client can load.
///
/// Absolute `http(s)` references pass through. Relative references are
/// joined onto the configured base URL, or returned as stored when there is
/// none.
#[derive(Debug, Clone, Default)]
pub struct ImageResolver {
    base: Option<Url>,
}

impl ImageResolver {
    #[must_use]
    pub const fn new(base: Option<Url>) -> Self {
        Self { base }
    }

    /// Resolve `stored`, falling back to `placeholder` when it is missing.
    #[must_use]
    pub fn resolve(&self, stored: Option<&str>, placeholder: &str) -> String {
        let Some(stored) = stored.map(str::trim).filter(|s| !s.is_empty()) else {
            return placeholder.to_string();
        };

        if stored.starts_with("http://") || stored.starts_with("https://") {
            return stored.to_string();
        }

        match &self.base {
            Some(base) => base
                .join(stored.trim_start_matches('/'))
                .map_or_else(|_| stored.to_string(), String::from),
            None => stored.to_string(),
        }
    }
}

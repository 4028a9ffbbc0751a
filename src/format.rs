//! Format version resolution for content negotiation.
//!
//! Format identifiers may carry a version range block after the separator
//! token, e.g. `vendor+json;version={1,2,5}`. The resolver expands such
//! identifiers into concrete formats (`vendor+json;version=1`, ...) and
//! narrows a requested concrete format against a broader advertised one.
//!
//! Resolution never fails: a missing or malformed block degrades to the
//! identifier itself.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::trace;

use crate::types::DEFAULT_VERSION_SEPARATOR;

static GLOBAL_RESOLVER: Lazy<Arc<FormatResolver>> =
    Lazy::new(|| Arc::new(FormatResolver::new(DEFAULT_VERSION_SEPARATOR)));

type CacheKey = (String, Option<u64>);

#[derive(Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Outside,
    Inside,
}

/// Extract the version numbers of the first `{...}` block in `text`.
///
/// Digits inside the block accumulate into a number, `,` finishes it and `}`
/// finishes any pending number and ends the scan. Anything after `}` is
/// ignored. The result is sorted ascending; duplicates are kept.
///
/// ```
/// use apidoc_schema::parse_version_range;
///
/// assert_eq!(parse_version_range("{5,1,2}"), vec![1, 2, 5]);
/// assert!(parse_version_range("{}").is_empty());
/// ```
pub fn parse_version_range(text: &str) -> Vec<u64> {
    let mut state = ScanState::Outside;
    let mut versions = Vec::new();
    let mut pending: Option<u64> = None;

    for ch in text.chars() {
        match (state, ch) {
            (ScanState::Outside, '{') => state = ScanState::Inside,
            (ScanState::Outside, _) => {}
            (ScanState::Inside, '0'..='9') => {
                let digit = u64::from(ch as u8 - b'0');
                let value = pending.unwrap_or(0);
                pending = Some(value.saturating_mul(10).saturating_add(digit));
            }
            (ScanState::Inside, ',') => {
                // Empty segments ("{1,,2}") contribute nothing
                if let Some(version) = pending.take() {
                    versions.push(version);
                }
            }
            (ScanState::Inside, '}') => {
                if let Some(version) = pending.take() {
                    versions.push(version);
                }
                break;
            }
            (ScanState::Inside, _) => {}
        }
    }

    versions.sort_unstable();
    versions
}

/// Expands and filters versioned format identifiers.
///
/// Expansions are memoized per `(identifier, max_version)` for the lifetime of
/// the resolver. The cache is append-only and guarded by a mutex, so a shared
/// resolver can serve concurrent callers.
pub struct FormatResolver {
    separator: String,
    cache: Mutex<HashMap<CacheKey, Vec<String>>>,
}

impl std::fmt::Debug for FormatResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatResolver")
            .field("separator", &self.separator)
            .field("cached", &self.cached_len())
            .finish()
    }
}

impl FormatResolver {
    /// Create a resolver with its own cache for the given separator token.
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The process-wide resolver for the default `version=` separator.
    pub fn global() -> Arc<FormatResolver> {
        Arc::clone(&GLOBAL_RESOLVER)
    }

    /// Resolver for `separator`: the shared global one for the default
    /// separator, a fresh one otherwise.
    pub fn for_separator(separator: impl Into<String>) -> Arc<FormatResolver> {
        let separator = separator.into();
        if separator == DEFAULT_VERSION_SEPARATOR {
            Self::global()
        } else {
            Arc::new(Self::new(separator))
        }
    }

    /// The separator token this resolver splits on.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Number of memoized expansions.
    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Expand `identifier` into concrete formats, ascending by version.
    ///
    /// Versions above `max_version` are dropped. Identifiers without the
    /// separator, or with an empty range, come back unchanged as the only
    /// element.
    pub fn expand_format(&self, identifier: &str, max_version: Option<u64>) -> Vec<String> {
        let key = (identifier.to_string(), max_version);

        // Held across compute so concurrent misses on one key expand it once
        let mut cache = self.cache.lock();
        if let Some(hit) = cache.get(&key) {
            return hit.clone();
        }

        let expanded = self.expand_uncached(identifier, max_version);
        trace!(
            identifier,
            ?max_version,
            count = expanded.len(),
            "expanded format"
        );
        cache.insert(key, expanded.clone());
        expanded
    }

    /// Flatten the expansions of every advertised identifier, in input order.
    ///
    /// Duplicates across identifiers are preserved.
    pub fn collect_available<I, S>(&self, available: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        available
            .into_iter()
            .flat_map(|id| self.expand_format(id.as_ref(), None))
            .collect()
    }

    /// Resolve the concrete formats acceptable for `requested`.
    ///
    /// A concrete request such as `fmt;version=2` is matched against every
    /// advertised identifier sharing its name prefix (other than the request
    /// itself); the last such identifier is expanded and capped at the
    /// requested version. Requests without an integer version fall back to
    /// expanding the request literally.
    pub fn resolve_for_request<I, S>(&self, available: I, requested: &str) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut result = self.expand_format(requested, None);

        let Some((search_prefix, version_text)) = requested.split_once(self.separator.as_str())
        else {
            return result;
        };
        let Ok(version) = version_text.trim().parse::<u64>() else {
            return result;
        };

        for candidate in available {
            let candidate = candidate.as_ref();
            if candidate.starts_with(search_prefix) && candidate != requested {
                result = self.expand_format(candidate, Some(version));
            }
        }
        result
    }

    fn expand_uncached(&self, identifier: &str, max_version: Option<u64>) -> Vec<String> {
        let Some((name, range_text)) = identifier.split_once(self.separator.as_str()) else {
            return vec![identifier.to_string()];
        };

        let versions = parse_version_range(range_text);
        if versions.is_empty() {
            return vec![identifier.to_string()];
        }

        versions
            .into_iter()
            .filter(|version| max_version.map_or(true, |max| *version <= max))
            .map(|version| format!("{}{}{}", name, self.separator, version))
            .collect()
    }
}

impl Default for FormatResolver {
    fn default() -> Self {
        Self::new(DEFAULT_VERSION_SEPARATOR)
    }
}

/// [`FormatResolver::expand_format`] on the global resolver.
pub fn expand_format(identifier: &str, max_version: Option<u64>) -> Vec<String> {
    GLOBAL_RESOLVER.expand_format(identifier, max_version)
}

/// [`FormatResolver::collect_available`] on the global resolver.
pub fn collect_available<I, S>(available: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    GLOBAL_RESOLVER.collect_available(available)
}

/// [`FormatResolver::resolve_for_request`] on the global resolver.
pub fn resolve_for_request<I, S>(available: I, requested: &str) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    GLOBAL_RESOLVER.resolve_for_request(available, requested)
}

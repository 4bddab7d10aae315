/* src/client/core/src/route.rs */

use crate::errors::GlideError;

/// One entry in the route table. Multiple paths may alias the same
/// `page_id` (e.g. `/` and `/home` both map to `main_app`); `page_id`
/// is unique per distinct screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
  /// Canonical request path, e.g. `/diary`.
  pub path: String,
  /// Locator for the HTML fragment resource, relative or absolute.
  pub fragment_ref: String,
  /// Stable identifier used for event naming, asset manifest lookup and
  /// active-nav highlighting.
  pub page_id: String,
}

/// Path/query/hash split of a navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts {
  pub path: String,
  pub query: String,
  pub hash: String,
}

/// Split `"/diary?date=today#meals"` into path, query (`?`-prefixed) and
/// hash (`#`-prefixed). Missing parts come back empty.
pub fn split_url(target: &str) -> UrlParts {
  let (without_hash, hash) = match target.find('#') {
    Some(pos) => (&target[..pos], &target[pos..]),
    None => (target, ""),
  };
  let (path, query) = match without_hash.find('?') {
    Some(pos) => (&without_hash[..pos], &without_hash[pos..]),
    None => (without_hash, ""),
  };
  UrlParts { path: path.to_string(), query: query.to_string(), hash: hash.to_string() }
}

pub struct RouteTable {
  entries: Vec<RouteEntry>,
  default_index: usize,
}

impl RouteTable {
  /// Build a table from entries; `default_page_id` names the entry unknown
  /// paths fall back to. Falls back to the first entry when no entry
  /// carries that id.
  pub fn new(entries: Vec<RouteEntry>, default_page_id: &str) -> Result<Self, GlideError> {
    if entries.is_empty() {
      return Err(GlideError::Config("route table must not be empty".to_string()));
    }
    let default_index =
      entries.iter().position(|e| e.page_id == default_page_id).unwrap_or(0);
    Ok(Self { entries, default_index })
  }

  pub fn default_entry(&self) -> &RouteEntry {
    &self.entries[self.default_index]
  }

  pub fn entries(&self) -> &[RouteEntry] {
    &self.entries
  }

  /// Total route resolution: exact match on the normalized path, then a
  /// final-segment alias match against `page_id` (supports deep-linking by
  /// bare page name), then the default entry. Never fails; a dead link
  /// degrades to the home screen instead of a broken UI.
  pub fn resolve(&self, path: &str) -> &RouteEntry {
    let normalized = normalize(path);

    if let Some(entry) = self.entries.iter().find(|e| e.path == normalized) {
      return entry;
    }

    // Fallback: last path segment (minus a .html suffix) matching a page id.
    let segment = normalized.rsplit('/').next().unwrap_or(normalized);
    let segment = segment.strip_suffix(".html").unwrap_or(segment);
    if !segment.is_empty() {
      if let Some(entry) = self.entries.iter().find(|e| e.page_id == segment) {
        return entry;
      }
    }

    self.default_entry()
  }
}

/// Strip a single trailing slash (except for the root path). Empty input
/// normalizes to root.
fn normalize(path: &str) -> &str {
  if path.is_empty() {
    return "/";
  }
  if path.len() > 1 && path.ends_with('/') {
    &path[..path.len() - 1]
  } else {
    path
  }
}

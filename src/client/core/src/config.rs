/* src/client/core/src/config.rs */

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::GlideError;
use crate::route::{RouteEntry, RouteTable};

/// Content replacement strategy for the DOM swapper.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapStrategy {
  /// Clear and repopulate the live container. Tolerates a brief blank frame.
  Simple,
  /// Build an off-screen replacement and flip it in on the next animation
  /// frame. Flicker-free.
  #[default]
  Buffered,
}

/// Per-page CSS/JS manifest, keyed by page id in `GlideConfig::assets`.
/// Written by `glide build`, loaded through the resource cache at replay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageAssets {
  #[serde(default)]
  pub css: Vec<String>,
  #[serde(default)]
  pub js: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteDef {
  pub path: String,
  pub page: String,
  /// Fragment locator; defaults to `{fragment_base}/{page}.html`.
  #[serde(default)]
  pub fragment: Option<String>,
}

/// Runtime configuration, deserialized from the JSON value handed to the
/// wasm entry point at startup. The base URL is environment-dependent:
/// empty (same-origin relative) in development, the configured origin in
/// production builds.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlideConfig {
  #[serde(default)]
  pub base_url: String,
  #[serde(default = "default_fragment_base")]
  pub fragment_base: String,
  /// Class of the content-root element inside a fragment document.
  #[serde(default = "default_content_class")]
  pub content_class: String,
  /// Class carried by the live container; the single-container invariant is
  /// enforced over elements bearing this class.
  #[serde(default = "default_root_class")]
  pub root_class: String,
  #[serde(default)]
  pub swap: SwapStrategy,
  pub routes: Vec<RouteDef>,
  #[serde(default = "default_page")]
  pub default_page: String,
  #[serde(default)]
  pub assets: BTreeMap<String, PageAssets>,
  /// Shell scripts already loaded by the host page; fragment scripts whose
  /// src contains one of these names are never replayed.
  #[serde(default)]
  pub global_scripts: Vec<String>,
}

fn default_fragment_base() -> String {
  "/fragments".to_string()
}

fn default_content_class() -> String {
  "app-container".to_string()
}

fn default_root_class() -> String {
  "page-root".to_string()
}

fn default_page() -> String {
  "main_app".to_string()
}

impl GlideConfig {
  pub fn validate(&self) -> Result<(), GlideError> {
    if self.routes.is_empty() {
      return Err(GlideError::Config("routes must not be empty".to_string()));
    }
    if !self.routes.iter().any(|r| r.page == self.default_page) {
      return Err(GlideError::Config(format!(
        "default_page \"{}\" is not among the configured routes",
        self.default_page
      )));
    }
    Ok(())
  }

  /// Build the route table, filling in defaulted fragment locators.
  pub fn route_table(&self) -> Result<RouteTable, GlideError> {
    self.validate()?;
    let entries = self
      .routes
      .iter()
      .map(|def| RouteEntry {
        path: def.path.clone(),
        fragment_ref: def
          .fragment
          .clone()
          .unwrap_or_else(|| format!("{}/{}.html", self.fragment_base, def.page)),
        page_id: def.page.clone(),
      })
      .collect();
    RouteTable::new(entries, &self.default_page)
  }

  /// Join the environment base with a fragment locator, preserving the
  /// original query string and hash.
  pub fn fragment_url(&self, fragment_ref: &str, query: &str, hash: &str) -> String {
    let mut url = String::new();
    if !fragment_ref.starts_with("http://") && !fragment_ref.starts_with("https://") {
      url.push_str(self.base_url.trim_end_matches('/'));
    }
    url.push_str(fragment_ref);
    url.push_str(query);
    url.push_str(hash);
    url
  }

  /// Whether a script src belongs to the host shell and must never be
  /// replayed by the router.
  pub fn is_global_script(&self, src: &str) -> bool {
    self.global_scripts.iter().any(|g| src.contains(g.as_str()))
  }

  pub fn assets_for(&self, page_id: &str) -> Option<&PageAssets> {
    self.assets.get(page_id)
  }
}

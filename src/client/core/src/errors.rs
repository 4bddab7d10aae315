/* src/client/core/src/errors.rs */

use thiserror::Error;

/// Error taxonomy for the navigation runtime.
///
/// `Fetch`, `Network` and `Parse` are recoverable: the controller renders an
/// inline error panel and returns to idle. `Superseded` is silent (a newer
/// navigation took over). `Config` and `Host` indicate setup problems.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GlideError {
  #[error("HTTP {status} loading {url}")]
  Fetch { status: u16, url: String },

  #[error("network failure loading {url}: {reason}")]
  Network { url: String, reason: String },

  #[error("malformed fragment: {0}")]
  Parse(String),

  #[error("navigation superseded")]
  Superseded,

  #[error("invalid configuration: {0}")]
  Config(String),

  #[error("host error: {0}")]
  Host(String),
}

impl GlideError {
  /// Whether the failure should surface as an inline error panel.
  /// Superseded navigations abort without touching the document.
  pub fn is_visible(&self) -> bool {
    !matches!(self, Self::Superseded)
  }
}

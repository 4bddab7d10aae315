/* src/client/fragment/src/lib.rs */

pub mod hash;
pub mod scan;

pub use hash::content_hash;

use glide_core::GlideError;

/// A script extracted from a fragment document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Script {
  External { src: String },
  Inline { code: String },
}

impl Script {
  pub fn src(&self) -> Option<&str> {
    match self {
      Self::External { src } => Some(src),
      Self::Inline { .. } => None,
    }
  }
}

/// Everything the replayer and swapper need from one fragment document.
/// Created fresh per navigation and discarded after the swap; only the
/// script/style identities outlive it (in the resource cache).
#[derive(Debug, Clone, Default)]
pub struct FragmentPayload {
  /// Inner markup of the content region, script tags stripped.
  pub markup: String,
  /// Style-block texts in declaration order.
  pub inline_styles: Vec<String>,
  /// Scripts in declaration order, externals deduplicated by src.
  pub scripts: Vec<Script>,
  /// Document title; `None` keeps the current title.
  pub title: Option<String>,
}

/// Parse a fragment document into a payload.
///
/// The content region is the first element carrying `content_class`; when
/// absent the whole `<body>` is used, and a body-less document (a bare
/// pre-converted fragment) is taken verbatim. External scripts keep only
/// the first occurrence of a given src; inline scripts are always kept
/// (deduplicated later by content hash).
pub fn parse_document(html: &str, content_class: &str) -> Result<FragmentPayload, GlideError> {
  if html.trim().is_empty() {
    return Err(GlideError::Parse("empty fragment document".to_string()));
  }

  let region = scan::extract_container(html, content_class)
    .or_else(|| scan::extract_body(html))
    .unwrap_or_else(|| html.to_string());

  let mut scripts = Vec::new();
  let mut seen_srcs = std::collections::HashSet::new();
  for script in scan::extract_scripts(html) {
    match &script {
      Script::External { src } => {
        if seen_srcs.insert(src.clone()) {
          scripts.push(script);
        }
      }
      Script::Inline { .. } => scripts.push(script),
    }
  }

  Ok(FragmentPayload {
    markup: scan::strip_scripts(&region),
    inline_styles: scan::extract_styles(html),
    scripts,
    title: scan::extract_title(html),
  })
}

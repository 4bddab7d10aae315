/* src/client/engine/src/host.rs */

use std::future::Future;
use std::pin::Pin;

use glide_core::{GlideError, SwapStrategy};

/// Browser futures are single-threaded; no `Send` bound here.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + 'static>>;

pub struct FetchResponse {
  pub status: u16,
  pub body: String,
}

impl FetchResponse {
  pub fn ok(&self) -> bool {
    (200..300).contains(&self.status)
  }
}

/// Every effect the engine performs on the outside world. The wasm crate
/// implements this over `web-sys`; tests implement it over plain state.
///
/// Implementations are expected to be cheap clonable handles; the async
/// methods return `'static` futures that own whatever they need.
pub trait Host {
  // -- network --
  fn fetch(&self, url: &str) -> BoxFuture<Result<FetchResponse, GlideError>>;

  // -- document chrome --
  fn document_title(&self) -> String;
  fn set_document_title(&self, title: &str);
  fn append_inline_style(&self, css: &str);
  fn append_style_link(&self, href: &str);

  // -- scripts --
  /// Resolves on the script element's load-or-error event so subsequent
  /// scripts observe deterministic ordering.
  fn load_external_script(&self, src: &str) -> BoxFuture<Result<(), GlideError>>;
  fn run_inline_script(&self, code: &str) -> Result<(), GlideError>;

  // -- content region --
  fn swap_content(&self, markup: &str, strategy: SwapStrategy) -> Result<(), GlideError>;
  /// Remove all but the newest element bearing the page-root class.
  /// Returns how many orphans were removed.
  fn remove_orphan_containers(&self) -> usize;
  fn render_error_panel(&self, message: &str);
  fn scroll_to_top(&self);

  // -- history & events --
  fn push_history(&self, url: &str, replace: bool);
  /// Full page reload; the popstate fallback when no state is attached.
  fn reload(&self);
  fn dispatch_event(&self, name: &str, detail: &serde_json::Value);

  // -- diagnostics --
  fn warn(&self, message: &str);
}

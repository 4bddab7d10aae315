/* src/client/engine/src/replay.rs */

use std::cell::RefCell;

use glide_core::{GlideError, PageAssets, ResourceCache};
use glide_fragment::{FragmentPayload, Script, content_hash};

use crate::host::Host;

/// Re-apply a fragment's styles and scripts to the live document.
///
/// Ordering: inline styles first (idempotent, no dedup), then manifest CSS
/// and external scripts through the cache (each awaited before the next so
/// later inline scripts observe them), then manifest JS, then inline
/// scripts deduplicated by full content hash. A failing script is logged
/// and skipped; it never aborts the rest of the replay or the navigation.
///
/// Cache marks are committed before any await, so the skip decision for a
/// resource can never race with its own load. `still_current` is consulted
/// after every suspension point; a stale replay stops with `Superseded`.
pub async fn replay<H: Host>(
  host: &H,
  cache: &RefCell<ResourceCache>,
  assets: Option<&PageAssets>,
  payload: &FragmentPayload,
  still_current: impl Fn() -> bool,
) -> Result<(), GlideError> {
  for css in &payload.inline_styles {
    host.append_inline_style(css);
  }

  if let Some(assets) = assets {
    for href in &assets.css {
      if cache.borrow_mut().mark_style(href) {
        host.append_style_link(href);
      }
    }
  }

  for script in &payload.scripts {
    if let Script::External { src } = script {
      load_once(host, cache, src).await;
      if !still_current() {
        return Err(GlideError::Superseded);
      }
    }
  }

  if let Some(assets) = assets {
    for src in &assets.js {
      load_once(host, cache, src).await;
      if !still_current() {
        return Err(GlideError::Superseded);
      }
    }
  }

  for script in &payload.scripts {
    if let Script::Inline { code } = script {
      let hash = content_hash(code);
      // Marked before execution: a throwing script counts as attempted.
      if !cache.borrow_mut().mark_inline(&hash) {
        continue;
      }
      if let Err(err) = host.run_inline_script(&wrap_inline(code)) {
        host.warn(&format!("inline script failed: {err}"));
      }
    }
  }

  Ok(())
}

async fn load_once<H: Host>(host: &H, cache: &RefCell<ResourceCache>, src: &str) {
  if !cache.borrow_mut().mark_script(src) {
    return;
  }
  if let Err(err) = host.load_external_script(src).await {
    host.warn(&format!("script {src} failed: {err}"));
  }
}

/// Isolating function scope: structurally similar page modules re-declare
/// `let`/`const` bindings, which would throw at the top level.
pub(crate) fn wrap_inline(code: &str) -> String {
  format!("(function() {{\n{code}\n}})();")
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::MockHost;

  fn payload() -> FragmentPayload {
    FragmentPayload {
      markup: "<p>diary</p>".to_string(),
      inline_styles: vec![".meal{}".to_string()],
      scripts: vec![
        Script::External { src: "/assets/js/diary_logic.js".to_string() },
        Script::Inline { code: "window.__diaryCount = (window.__diaryCount || 0) + 1;".to_string() },
      ],
      title: None,
    }
  }

  #[tokio::test]
  async fn replaying_twice_runs_each_script_once() {
    let host = MockHost::new();
    let cache = RefCell::new(ResourceCache::new());
    let payload = payload();

    replay(&host, &cache, None, &payload, || true).await.unwrap();
    replay(&host, &cache, None, &payload, || true).await.unwrap();

    assert_eq!(host.loaded_scripts(), vec!["/assets/js/diary_logic.js"]);
    assert_eq!(host.inline_runs().len(), 1);
    // Styles are idempotent to re-apply and are not deduplicated.
    assert_eq!(host.inline_styles().len(), 2);
  }

  #[tokio::test]
  async fn manifest_assets_load_through_the_cache() {
    let host = MockHost::new();
    let cache = RefCell::new(ResourceCache::new());
    let assets = PageAssets {
      css: vec!["/assets/css/pages/diary.css".to_string()],
      js: vec!["/assets/js/pages/diary.js".to_string()],
    };

    replay(&host, &cache, Some(&assets), &FragmentPayload::default(), || true).await.unwrap();
    replay(&host, &cache, Some(&assets), &FragmentPayload::default(), || true).await.unwrap();

    assert_eq!(host.style_links(), vec!["/assets/css/pages/diary.css"]);
    assert_eq!(host.loaded_scripts(), vec!["/assets/js/pages/diary.js"]);
  }

  #[tokio::test]
  async fn external_before_inline() {
    let host = MockHost::new();
    let cache = RefCell::new(ResourceCache::new());
    replay(&host, &cache, None, &payload(), || true).await.unwrap();
    let order = host.effect_order();
    let external = order.iter().position(|e| e.contains("diary_logic")).unwrap();
    let inline = order.iter().position(|e| e.contains("inline:")).unwrap();
    assert!(external < inline, "external scripts must run before inline scripts");
  }

  #[tokio::test]
  async fn failing_external_script_is_logged_not_fatal() {
    let host = MockHost::new();
    host.fail_script("/assets/js/broken.js");
    let cache = RefCell::new(ResourceCache::new());
    let payload = FragmentPayload {
      scripts: vec![
        Script::External { src: "/assets/js/broken.js".to_string() },
        Script::Inline { code: "afterBroken();".to_string() },
      ],
      ..Default::default()
    };

    replay(&host, &cache, None, &payload, || true).await.unwrap();
    assert!(host.warnings().iter().any(|w| w.contains("broken.js")));
    assert_eq!(host.inline_runs().len(), 1, "replay continues past a failing script");
  }

  #[tokio::test]
  async fn throwing_inline_script_is_not_retried() {
    let host = MockHost::new();
    host.fail_inline_containing("boom");
    let cache = RefCell::new(ResourceCache::new());
    let payload = FragmentPayload {
      scripts: vec![Script::Inline { code: "boom();".to_string() }],
      ..Default::default()
    };

    replay(&host, &cache, None, &payload, || true).await.unwrap();
    replay(&host, &cache, None, &payload, || true).await.unwrap();
    assert_eq!(host.inline_runs().len(), 1, "a throwing script is marked as attempted");
    assert!(host.warnings().iter().any(|w| w.contains("inline script failed")));
  }

  #[tokio::test]
  async fn stale_replay_stops_after_suspension_point() {
    let host = MockHost::new();
    let cache = RefCell::new(ResourceCache::new());
    let result = replay(&host, &cache, None, &payload(), || false).await;
    assert_eq!(result, Err(GlideError::Superseded));
    assert!(host.inline_runs().is_empty(), "stale replay must not run inline scripts");
  }

  #[test]
  fn wrap_isolates_scope() {
    let wrapped = wrap_inline("const x = 1;");
    assert!(wrapped.starts_with("(function() {"));
    assert!(wrapped.ends_with("})();"));
    assert!(wrapped.contains("const x = 1;"));
  }
}

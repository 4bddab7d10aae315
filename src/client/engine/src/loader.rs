/* src/client/engine/src/loader.rs */

use glide_core::{GlideConfig, GlideError, route::RouteEntry};
use glide_fragment::{FragmentPayload, parse_document};

use crate::host::Host;

/// Fetch and parse one fragment. Fails without mutating any navigation
/// state; the controller decides what a failure means.
pub async fn load<H: Host>(
  host: &H,
  config: &GlideConfig,
  entry: &RouteEntry,
  query: &str,
  hash: &str,
) -> Result<FragmentPayload, GlideError> {
  let url = config.fragment_url(&entry.fragment_ref, query, hash);
  let response = host.fetch(&url).await?;
  if !response.ok() {
    return Err(GlideError::Fetch { status: response.status, url });
  }

  let mut payload = parse_document(&response.body, &config.content_class)?;

  // Shell scripts are already loaded by the host page.
  payload
    .scripts
    .retain(|script| script.src().map(|src| !config.is_global_script(src)).unwrap_or(true));

  if payload.title.is_none() {
    payload.title = Some(host.document_title());
  }

  Ok(payload)
}

#[cfg(test)]
mod tests {
  use glide_core::route::RouteEntry;

  use super::*;
  use crate::testing::MockHost;

  fn entry() -> RouteEntry {
    RouteEntry {
      path: "/diary".to_string(),
      fragment_ref: "/fragments/diary.html".to_string(),
      page_id: "diary".to_string(),
    }
  }

  fn config() -> GlideConfig {
    serde_json::from_value(serde_json::json!({
      "routes": [
        {"path": "/", "page": "main_app"},
        {"path": "/diary", "page": "diary"}
      ],
      "globalScripts": ["auth.js"]
    }))
    .unwrap()
  }

  #[tokio::test]
  async fn load_extracts_payload_and_filters_global_scripts() {
    let host = MockHost::new();
    host.respond(
      "/fragments/diary.html?date=today",
      200,
      concat!(
        "<html><head><title>Diary</title></head><body>",
        "<div class=\"app-container\"><p>meals</p></div>",
        "<script src=\"/assets/js/auth.js\"></script>",
        "<script src=\"/assets/js/diary_logic.js\"></script>",
        "</body></html>",
      ),
    );

    let payload = load(&host, &config(), &entry(), "?date=today", "").await.unwrap();
    assert!(payload.markup.contains("<p>meals</p>"));
    assert_eq!(payload.scripts.len(), 1, "auth.js is a shell script and must be filtered");
    assert_eq!(payload.scripts[0].src(), Some("/assets/js/diary_logic.js"));
  }

  #[tokio::test]
  async fn non_2xx_is_a_fetch_error_with_status() {
    let host = MockHost::new();
    host.respond("/fragments/diary.html", 404, "not found");
    let err = load(&host, &config(), &entry(), "", "").await.unwrap_err();
    assert!(matches!(err, GlideError::Fetch { status: 404, .. }));
  }

  #[tokio::test]
  async fn missing_title_falls_back_to_current_document_title() {
    let host = MockHost::new();
    host.set_document_title("ShapeFit");
    host.respond("/fragments/diary.html", 200, "<div class=\"app-container\">x</div>");
    let payload = load(&host, &config(), &entry(), "", "").await.unwrap();
    assert_eq!(payload.title.as_deref(), Some("ShapeFit"));
  }
}

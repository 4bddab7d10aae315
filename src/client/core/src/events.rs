/* src/client/core/src/events.rs */

use serde::Serialize;

/// Generic event dispatched after every completed navigation.
pub const ROUTE_CHANGED: &str = "routeChanged";

/// Event a page module listens to for its own activation.
pub fn enter_event(page_id: &str) -> String {
  format!("spa:enter-{page_id}")
}

/// Event a page module must treat as mandatory cleanup: the DOM it attached
/// to is about to be destroyed.
pub fn leave_event(page_id: &str) -> String {
  format!("spa:leave-{page_id}")
}

/// Detail payload of `spa:enter-*` / `spa:leave-*` events.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDetail {
  pub page_id: String,
  pub query_string: String,
  pub hash: String,
}

/// Detail payload of the generic `routeChanged` event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteChangedDetail {
  pub route: String,
  pub page_id: String,
  pub query_string: String,
  pub hash: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn event_names_follow_convention() {
    assert_eq!(enter_event("diary"), "spa:enter-diary");
    assert_eq!(leave_event("main_app"), "spa:leave-main_app");
  }

  #[test]
  fn detail_serializes_camel_case() {
    let detail = PageDetail {
      page_id: "diary".to_string(),
      query_string: "?date=today".to_string(),
      hash: String::new(),
    };
    let json = serde_json::to_value(&detail).unwrap();
    assert_eq!(json["pageId"], "diary");
    assert_eq!(json["queryString"], "?date=today");
  }
}

/* src/client/wasm/src/location.rs */

/// Rebuild the navigation target from `window.location` parts.
/// `search` and `hash` arrive already prefixed (`?...`, `#...`) or empty,
/// matching the Location API.
pub fn compose_target(pathname: &str, search: &str, hash: &str) -> String {
  let mut target = String::with_capacity(pathname.len() + search.len() + hash.len() + 1);
  if pathname.is_empty() {
    target.push('/');
  } else {
    target.push_str(pathname);
  }
  target.push_str(search);
  target.push_str(hash);
  target
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn full_location() {
    assert_eq!(compose_target("/diary", "?date=today", "#meals"), "/diary?date=today#meals");
  }

  #[test]
  fn empty_pathname_becomes_root() {
    assert_eq!(compose_target("", "", ""), "/");
  }

  #[test]
  fn path_only() {
    assert_eq!(compose_target("/progress", "", ""), "/progress");
  }
}

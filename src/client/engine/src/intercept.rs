/* src/client/engine/src/intercept.rs */

/// The attributes of a clicked anchor that decide interception.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkAttrs<'a> {
  pub href: &'a str,
  /// Raw `target` attribute when present (any target opts out, not just
  /// `_blank`: the author asked for a different browsing context).
  pub target: Option<&'a str>,
  pub has_download: bool,
  /// `data-no-spa` explicit opt-out marker.
  pub opt_out: bool,
}

/// Whether a click on this anchor becomes an in-app navigation.
/// Everything the router cannot serve (external schemes, same-page
/// anchors, downloads, opt-outs) falls through to the browser default.
pub fn should_intercept(link: &LinkAttrs<'_>) -> bool {
  if link.opt_out || link.has_download || link.target.is_some() {
    return false;
  }
  let href = link.href;
  if href.is_empty() || href.starts_with('#') {
    return false;
  }
  if href.starts_with("http://")
    || href.starts_with("https://")
    || href.starts_with("//")
    || href.starts_with("mailto:")
    || href.starts_with("tel:")
    || href.starts_with("javascript:")
  {
    return false;
  }
  true
}

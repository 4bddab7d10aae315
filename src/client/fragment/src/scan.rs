/* src/client/fragment/src/scan.rs */

// Byte-level scanning over fragment HTML. Fragments are machine-produced
// (full pages or `glide build` output), so a forgiving scanner beats a full
// HTML parser here: unbalanced markup degrades to "take the rest" instead
// of failing the navigation.

use crate::Script;

/// ASCII case-insensitive substring search starting at `from`.
fn find_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
  let hay = haystack.as_bytes();
  let ned = needle.as_bytes();
  if ned.is_empty() {
    return (from <= hay.len()).then_some(from);
  }
  if hay.len() < ned.len() || from > hay.len() - ned.len() {
    return None;
  }
  let last = hay.len() - ned.len();
  let mut i = from;
  while i <= last {
    if hay[i..i + ned.len()].iter().zip(ned).all(|(a, b)| a.eq_ignore_ascii_case(b)) {
      return Some(i);
    }
    i += 1;
  }
  None
}

/// Position of the `>` closing an open tag, honoring quoted attribute
/// values that may contain `>`.
fn tag_end(html: &str, from: usize) -> Option<usize> {
  let bytes = html.as_bytes();
  let mut quote: Option<u8> = None;
  let mut i = from;
  while i < bytes.len() {
    let b = bytes[i];
    match quote {
      Some(q) => {
        if b == q {
          quote = None;
        }
      }
      None => match b {
        b'"' | b'\'' => quote = Some(b),
        b'>' => return Some(i),
        _ => {}
      },
    }
    i += 1;
  }
  None
}

/// Next occurrence of `pattern` that sits on a tag-name boundary, so
/// `<script` does not match `<scripted>`.
fn next_tag_pos(html: &str, pattern: &str, from: usize) -> Option<usize> {
  let mut pos = from;
  while let Some(found) = find_ci(html, pattern, pos) {
    let after = found + pattern.len();
    let on_boundary = html
      .as_bytes()
      .get(after)
      .map(|b| b.is_ascii_whitespace() || *b == b'>' || *b == b'/')
      .unwrap_or(true);
    if on_boundary {
      return Some(found);
    }
    pos = found + 1;
  }
  None
}

/// Value of `name` inside an open tag's attribute text. Handles double,
/// single and unquoted values; `data-src` never matches `src`.
pub(crate) fn attr_value(attrs: &str, name: &str) -> Option<String> {
  let bytes = attrs.as_bytes();
  let mut i = 0;
  while let Some(pos) = find_ci(attrs, name, i) {
    let before_ok = pos == 0 || bytes[pos - 1].is_ascii_whitespace();
    let mut j = pos + name.len();
    while j < bytes.len() && bytes[j].is_ascii_whitespace() {
      j += 1;
    }
    if !before_ok || j >= bytes.len() || bytes[j] != b'=' {
      i = pos + name.len();
      continue;
    }
    j += 1;
    while j < bytes.len() && bytes[j].is_ascii_whitespace() {
      j += 1;
    }
    if j >= bytes.len() {
      return Some(String::new());
    }
    let value = match bytes[j] {
      quote @ (b'"' | b'\'') => {
        let start = j + 1;
        let end =
          attrs[start..].find(quote as char).map(|p| start + p).unwrap_or(attrs.len());
        &attrs[start..end]
      }
      _ => {
        let start = j;
        let end = attrs[start..]
          .find(|c: char| c.is_ascii_whitespace())
          .map(|p| start + p)
          .unwrap_or(attrs.len());
        &attrs[start..end]
      }
    };
    return Some(value.to_string());
  }
  None
}

fn has_class_token(value: &str, class: &str) -> bool {
  value.split_ascii_whitespace().any(|token| token == class)
}

/// All `<script>` elements in declaration order. External entries carry the
/// raw src; inline entries carry trimmed code. Empty scripts are dropped.
pub fn extract_scripts(html: &str) -> Vec<Script> {
  let mut out = Vec::new();
  let mut pos = 0;
  while let Some(open) = next_tag_pos(html, "<script", pos) {
    let after = open + "<script".len();
    let Some(gt) = tag_end(html, after) else { break };
    let attrs = &html[after..gt];
    let Some(close) = find_ci(html, "</script", gt + 1) else { break };
    let close_end = html[close..].find('>').map(|p| close + p + 1).unwrap_or(html.len());

    match attr_value(attrs, "src") {
      Some(src) if !src.is_empty() => out.push(Script::External { src }),
      _ => {
        let code = html[gt + 1..close].trim();
        if !code.is_empty() {
          out.push(Script::Inline { code: code.to_string() });
        }
      }
    }
    pos = close_end;
  }
  out
}

/// All `<style>` block texts, verbatim (trimmed), in declaration order.
pub fn extract_styles(html: &str) -> Vec<String> {
  let mut out = Vec::new();
  let mut pos = 0;
  while let Some(open) = next_tag_pos(html, "<style", pos) {
    let Some(gt) = tag_end(html, open + "<style".len()) else { break };
    let Some(close) = find_ci(html, "</style", gt + 1) else { break };
    let css = html[gt + 1..close].trim();
    if !css.is_empty() {
      out.push(css.to_string());
    }
    pos = html[close..].find('>').map(|p| close + p + 1).unwrap_or(html.len());
  }
  out
}

/// `<title>` text, `None` when absent or empty.
pub fn extract_title(html: &str) -> Option<String> {
  let open = next_tag_pos(html, "<title", 0)?;
  let gt = tag_end(html, open + "<title".len())?;
  let close = find_ci(html, "</title", gt + 1)?;
  let title = html[gt + 1..close].trim();
  (!title.is_empty()).then(|| title.to_string())
}

/// Inner markup of `<body>`, `None` when the document has no body tag.
pub fn extract_body(html: &str) -> Option<String> {
  let open = next_tag_pos(html, "<body", 0)?;
  let gt = tag_end(html, open + "<body".len())?;
  let end = find_ci(html, "</body", gt + 1).unwrap_or(html.len());
  Some(html[gt + 1..end].to_string())
}

/// Inner markup of the first element whose class attribute carries `class`
/// as a token. Nesting of the same tag is balanced by depth counting.
pub fn extract_container(html: &str, class: &str) -> Option<String> {
  let bytes = html.as_bytes();
  let mut pos = 0;
  while let Some(lt) = html[pos..].find('<').map(|p| pos + p) {
    let name_start = lt + 1;
    if !bytes.get(name_start).map(|b| b.is_ascii_alphabetic()).unwrap_or(false) {
      pos = name_start;
      continue;
    }
    let mut name_end = name_start;
    while name_end < bytes.len()
      && (bytes[name_end].is_ascii_alphanumeric() || bytes[name_end] == b'-')
    {
      name_end += 1;
    }
    let Some(gt) = tag_end(html, name_end) else { return None };
    let attrs = &html[name_end..gt];
    let self_closing = html[..gt].ends_with('/');
    let matches = attr_value(attrs, "class")
      .map(|value| has_class_token(&value, class))
      .unwrap_or(false);
    if matches && !self_closing {
      let tag = html[name_start..name_end].to_ascii_lowercase();
      return element_inner(html, &tag, gt + 1);
    }
    pos = gt + 1;
  }
  None
}

fn element_inner(html: &str, tag: &str, content_start: usize) -> Option<String> {
  let open_pat = format!("<{tag}");
  let close_pat = format!("</{tag}");
  let mut depth = 1usize;
  let mut pos = content_start;
  while pos < html.len() {
    let next_open = next_tag_pos(html, &open_pat, pos);
    let next_close = next_tag_pos(html, &close_pat, pos);
    match (next_open, next_close) {
      (Some(open), Some(close)) if open < close => {
        depth += 1;
        pos = open + open_pat.len();
      }
      (_, Some(close)) => {
        depth -= 1;
        if depth == 0 {
          return Some(html[content_start..close].to_string());
        }
        pos = close + close_pat.len();
      }
      // Unbalanced markup: degrade to the remainder.
      (_, None) => break,
    }
  }
  Some(html[content_start..].to_string())
}

/// Remove every `<script>` element, keeping all other markup untouched.
/// Applied to the content region before it is handed to the swapper; the
/// replayer executes scripts separately.
pub fn strip_scripts(html: &str) -> String {
  let mut out = String::with_capacity(html.len());
  let mut pos = 0;
  while let Some(open) = next_tag_pos(html, "<script", pos) {
    out.push_str(&html[pos..open]);
    let close = find_ci(html, "</script", open)
      .and_then(|c| html[c..].find('>').map(|p| c + p + 1));
    match close {
      Some(end) => pos = end,
      // Unterminated script: drop the rest.
      None => {
        pos = html.len();
        break;
      }
    }
  }
  out.push_str(&html[pos..]);
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  // -- attr_value --

  #[test]
  fn attr_double_single_and_unquoted() {
    assert_eq!(attr_value(r#" src="/a.js" defer"#, "src").as_deref(), Some("/a.js"));
    assert_eq!(attr_value(" src='/a.js'", "src").as_deref(), Some("/a.js"));
    assert_eq!(attr_value(" src=/a.js defer", "src").as_deref(), Some("/a.js"));
  }

  #[test]
  fn attr_name_requires_boundary() {
    assert_eq!(attr_value(r#" data-src="/b.js""#, "src"), None);
  }

  #[test]
  fn attr_case_insensitive_with_spaces() {
    assert_eq!(attr_value(r#" SRC = "/a.js""#, "src").as_deref(), Some("/a.js"));
  }

  // -- extract_scripts --

  #[test]
  fn scripts_in_order_with_kinds() {
    let html = concat!(
      "<script src=\"/first.js\"></script>",
      "<script>let x = 1;</script>",
      "<SCRIPT SRC='/second.js'></SCRIPT>",
    );
    let scripts = extract_scripts(html);
    assert_eq!(scripts.len(), 3);
    assert_eq!(scripts[0].src(), Some("/first.js"));
    assert!(matches!(&scripts[1], Script::Inline { code } if code == "let x = 1;"));
    assert_eq!(scripts[2].src(), Some("/second.js"));
  }

  #[test]
  fn empty_inline_script_dropped() {
    assert!(extract_scripts("<script>   </script>").is_empty());
  }

  #[test]
  fn script_body_containing_markup_like_text() {
    let html = "<script>if (a < b) { render('</div>'); }</script>";
    let scripts = extract_scripts(html);
    assert_eq!(scripts.len(), 1);
    assert!(matches!(&scripts[0], Script::Inline { code } if code.contains("a < b")));
  }

  // -- extract_styles / extract_title / extract_body --

  #[test]
  fn styles_verbatim_in_order() {
    let html = "<style>.a{}</style><div></div><style media=\"all\">.b{}</style>";
    assert_eq!(extract_styles(html), vec![".a{}", ".b{}"]);
  }

  #[test]
  fn title_text_trimmed() {
    assert_eq!(extract_title("<title>  Diary \n</title>").as_deref(), Some("Diary"));
    assert_eq!(extract_title("<title></title>"), None);
    assert_eq!(extract_title("<p>no title</p>"), None);
  }

  #[test]
  fn body_inner_markup() {
    let html = "<html><body class=\"x\"><p>hi</p></body></html>";
    assert_eq!(extract_body(html).as_deref(), Some("<p>hi</p>"));
    assert_eq!(extract_body("<p>bare</p>"), None);
  }

  // -- extract_container --

  #[test]
  fn container_by_class_token() {
    let html = r#"<body><div class="shell app-container dark"><p>inner</p></div></body>"#;
    assert_eq!(extract_container(html, "app-container").as_deref(), Some("<p>inner</p>"));
  }

  #[test]
  fn container_class_must_match_whole_token() {
    let html = r#"<div class="app-container-wide"><p>x</p></div>"#;
    assert_eq!(extract_container(html, "app-container"), None);
  }

  #[test]
  fn nested_same_tag_balanced() {
    let html = r#"<div class="app-container"><div><div>deep</div></div></div><div>after</div>"#;
    assert_eq!(
      extract_container(html, "app-container").as_deref(),
      Some("<div><div>deep</div></div>")
    );
  }

  #[test]
  fn unbalanced_container_degrades_to_rest() {
    let html = r#"<div class="app-container"><p>never closed"#;
    assert_eq!(extract_container(html, "app-container").as_deref(), Some("<p>never closed"));
  }

  // -- strip_scripts --

  #[test]
  fn strip_removes_all_script_elements() {
    let html = "<p>a</p><script src=\"/x.js\"></script><p>b</p><script>inline()</script>";
    assert_eq!(strip_scripts(html), "<p>a</p><p>b</p>");
  }

  #[test]
  fn strip_without_scripts_is_identity() {
    assert_eq!(strip_scripts("<p>plain</p>"), "<p>plain</p>");
  }

  #[test]
  fn strip_drops_unterminated_script_tail() {
    assert_eq!(strip_scripts("<p>a</p><script>openEnded("), "<p>a</p>");
  }
}

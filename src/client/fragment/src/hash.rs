/* src/client/fragment/src/hash.rs */

use sha2::{Digest as _, Sha256};

/// Identity of an inline script for replay deduplication.
///
/// Hashes the FULL script text (SHA-256, first 8 bytes as hex). Two scripts
/// sharing a long common prefix but differing later must not collide, so a
/// bounded-prefix hash is not enough here.
pub fn content_hash(text: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(text.as_bytes());
  let digest = hasher.finalize();
  let mut out = String::with_capacity(16);
  for byte in digest.iter().take(8) {
    out.push_str(&format!("{byte:02x}"));
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn identical_text_collides() {
    assert_eq!(content_hash("window.init();"), content_hash("window.init();"));
  }

  #[test]
  fn shared_prefix_differing_tail_does_not_collide() {
    let prefix = "function setup() { /* long shared preamble */ }\n".repeat(40);
    let a = format!("{prefix}loadDiary();");
    let b = format!("{prefix}loadProgress();");
    assert_ne!(content_hash(&a), content_hash(&b));
  }

  #[test]
  fn hash_is_16_hex_chars() {
    let hash = content_hash("x");
    assert_eq!(hash.len(), 16);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
  }
}

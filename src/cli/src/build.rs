/* src/cli/src/build.rs */

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glide_core::PageAssets;
use glide_fragment::{Script, parse_document};
use walkdir::WalkDir;

use crate::ui;

pub struct BuildOptions {
  pub pages_dir: PathBuf,
  pub out_dir: PathBuf,
  pub content_class: String,
  pub global_scripts: Vec<String>,
}

pub struct BuildSummary {
  pub pages: usize,
  pub script_files: usize,
}

/// Convert every HTML page under `pages_dir` into a fragment under
/// `{out}/fragments/`, move its inline scripts into
/// `{out}/assets/js/pages/{page}.js`, and write the per-page asset
/// manifest the runtime feeds into `GlideConfig.assets`.
pub fn run(options: &BuildOptions) -> Result<BuildSummary> {
  ui::step(&format!("building fragments from {}", options.pages_dir.display()));

  let fragments_dir = options.out_dir.join("fragments");
  let pages_js_dir = options.out_dir.join("assets/js/pages");
  std::fs::create_dir_all(&fragments_dir)
    .with_context(|| format!("failed to create {}", fragments_dir.display()))?;

  let mut manifest: BTreeMap<String, PageAssets> = BTreeMap::new();
  let mut summary = BuildSummary { pages: 0, script_files: 0 };

  for entry in WalkDir::new(&options.pages_dir).into_iter().filter_map(Result::ok) {
    if !entry.file_type().is_file() {
      continue;
    }
    let path = entry.path();
    if path.extension().and_then(|e| e.to_str()) != Some("html") {
      continue;
    }
    let page_id = page_id_for(path, &options.pages_dir);
    convert_page(options, path, &page_id, &fragments_dir, &pages_js_dir, &mut manifest)
      .with_context(|| format!("failed to convert {}", path.display()))?;
    summary.pages += 1;
    if manifest.get(&page_id).is_some_and(|a| a.js.iter().any(|j| j.contains("/pages/"))) {
      summary.script_files += 1;
    }
  }

  let manifest_path = options.out_dir.join("glide-manifest.json");
  let json = serde_json::to_string_pretty(&manifest)?;
  std::fs::write(&manifest_path, &json)
    .with_context(|| format!("failed to write {}", manifest_path.display()))?;
  ui::detail_ok("glide-manifest.json");

  Ok(summary)
}

/// Page id from the path relative to the pages root: nested pages flatten
/// with underscores (`auth/login.html` -> `auth_login`).
fn page_id_for(path: &Path, root: &Path) -> String {
  let relative = path.strip_prefix(root).unwrap_or(path);
  let mut id = String::new();
  for component in relative.components() {
    if !id.is_empty() {
      id.push('_');
    }
    id.push_str(&component.as_os_str().to_string_lossy());
  }
  id.strip_suffix(".html").unwrap_or(&id).to_string()
}

fn convert_page(
  options: &BuildOptions,
  path: &Path,
  page_id: &str,
  fragments_dir: &Path,
  pages_js_dir: &Path,
  manifest: &mut BTreeMap<String, PageAssets>,
) -> Result<()> {
  let html = std::fs::read_to_string(path)
    .with_context(|| format!("failed to read {}", path.display()))?;
  let payload = parse_document(&html, &options.content_class)?;

  // Fragment: page styles stay inline, content follows, scripts are gone.
  let mut fragment = String::new();
  for css in &payload.inline_styles {
    fragment.push_str("<style>");
    fragment.push_str(css);
    fragment.push_str("</style>\n");
  }
  fragment.push_str(&payload.markup);

  let fragment_path = fragments_dir.join(format!("{page_id}.html"));
  std::fs::write(&fragment_path, &fragment)
    .with_context(|| format!("failed to write {}", fragment_path.display()))?;

  let mut assets = PageAssets::default();
  let mut inline_blocks = Vec::new();
  for script in &payload.scripts {
    match script {
      Script::External { src } => {
        if !options.global_scripts.iter().any(|g| src.contains(g.as_str())) {
          assets.js.push(src.clone());
        }
      }
      Script::Inline { code } => inline_blocks.push(code.clone()),
    }
  }

  // Inline scripts move to one external per-page file so the runtime can
  // dedup them by URL like any other script.
  if !inline_blocks.is_empty() {
    std::fs::create_dir_all(pages_js_dir)
      .with_context(|| format!("failed to create {}", pages_js_dir.display()))?;
    let js_path = pages_js_dir.join(format!("{page_id}.js"));
    let mut code = format!("// Inline scripts extracted from {page_id}.html\n\n");
    for block in &inline_blocks {
      code.push_str("(function() {\n");
      code.push_str(block);
      code.push_str("\n})();\n\n");
    }
    std::fs::write(&js_path, &code)
      .with_context(|| format!("failed to write {}", js_path.display()))?;
    assets.js.push(format!("/assets/js/pages/{page_id}.js"));
  }

  ui::detail_ok(&format!(
    "{page_id}  {}({} script(s)){}",
    ui::DIM,
    assets.js.len(),
    ui::RESET
  ));
  manifest.insert(page_id.to_string(), assets);
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  const PAGE: &str = concat!(
    "<!DOCTYPE html><html><head><title>Diary</title>",
    "<style>.meal { color: green }</style>",
    "<script src=\"/assets/js/auth.js\"></script>",
    "</head><body>",
    "<div class=\"app-container\"><h1>Diary</h1>",
    "<script>window.initDiary();</script>",
    "</div>",
    "<script src=\"/assets/js/diary_logic.js\"></script>",
    "</body></html>",
  );

  fn options(root: &Path) -> BuildOptions {
    BuildOptions {
      pages_dir: root.join("www"),
      out_dir: root.join(".glide"),
      content_class: "app-container".to_string(),
      global_scripts: vec!["auth.js".to_string()],
    }
  }

  fn write_page(root: &Path, relative: &str, html: &str) {
    let path = root.join("www").join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, html).unwrap();
  }

  #[test]
  fn converts_a_page_into_fragment_js_and_manifest() {
    let dir = tempfile::tempdir().unwrap();
    write_page(dir.path(), "diary.html", PAGE);

    let summary = run(&options(dir.path())).unwrap();
    assert_eq!(summary.pages, 1);
    assert_eq!(summary.script_files, 1);

    let fragment =
      std::fs::read_to_string(dir.path().join(".glide/fragments/diary.html")).unwrap();
    assert!(fragment.contains("<style>.meal { color: green }</style>"));
    assert!(fragment.contains("<h1>Diary</h1>"));
    assert!(!fragment.contains("<script"), "fragments must not carry script tags");

    let page_js =
      std::fs::read_to_string(dir.path().join(".glide/assets/js/pages/diary.js")).unwrap();
    assert!(page_js.contains("window.initDiary();"));
    assert!(page_js.contains("(function() {"), "extracted scripts are scope-isolated");

    let manifest: BTreeMap<String, PageAssets> = serde_json::from_str(
      &std::fs::read_to_string(dir.path().join(".glide/glide-manifest.json")).unwrap(),
    )
    .unwrap();
    let diary = manifest.get("diary").unwrap();
    assert_eq!(
      diary.js,
      vec!["/assets/js/diary_logic.js".to_string(), "/assets/js/pages/diary.js".to_string()]
    );
    assert!(
      !diary.js.iter().any(|j| j.contains("auth.js")),
      "global shell scripts must not enter the manifest"
    );
  }

  #[test]
  fn nested_pages_flatten_with_underscores() {
    let dir = tempfile::tempdir().unwrap();
    write_page(dir.path(), "auth/login.html", "<div class=\"app-container\">login</div>");

    run(&options(dir.path())).unwrap();
    assert!(dir.path().join(".glide/fragments/auth_login.html").exists());
  }

  #[test]
  fn page_without_scripts_gets_empty_manifest_entry() {
    let dir = tempfile::tempdir().unwrap();
    write_page(dir.path(), "about.html", "<div class=\"app-container\"><p>about</p></div>");

    let summary = run(&options(dir.path())).unwrap();
    assert_eq!(summary.script_files, 0);
    let manifest: BTreeMap<String, PageAssets> = serde_json::from_str(
      &std::fs::read_to_string(dir.path().join(".glide/glide-manifest.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(manifest.get("about").unwrap(), &PageAssets::default());
  }

  #[test]
  fn non_html_files_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    write_page(dir.path(), "diary.html", PAGE);
    std::fs::write(dir.path().join("www/notes.txt"), "not a page").unwrap();

    let summary = run(&options(dir.path())).unwrap();
    assert_eq!(summary.pages, 1);
  }
}

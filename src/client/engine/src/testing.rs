/* src/client/engine/src/testing.rs */

// Scripted Host implementation backing the engine's unit tests. Models the
// document as plain state: a list of live containers, the injected styles
// and scripts, dispatched events and history entries.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glide_core::{GlideError, SwapStrategy};
use tokio::sync::oneshot;

use crate::host::{BoxFuture, FetchResponse, Host};

#[derive(Default)]
struct MockState {
  responses: HashMap<String, (u16, String)>,
  gates: HashMap<String, oneshot::Receiver<()>>,
  failing_scripts: Vec<String>,
  failing_inline: Vec<String>,
  containers: Vec<String>,
  inline_styles: Vec<String>,
  style_links: Vec<String>,
  loaded_scripts: Vec<String>,
  inline_runs: Vec<String>,
  effects: Vec<String>,
  events: Vec<(String, serde_json::Value)>,
  history: Vec<(String, bool)>,
  title: String,
  error_panel: Option<String>,
  warnings: Vec<String>,
  scrolls: usize,
  reloads: usize,
}

#[derive(Clone, Default)]
pub(crate) struct MockHost {
  state: Rc<RefCell<MockState>>,
}

impl MockHost {
  pub fn new() -> Self {
    Self::default()
  }

  // -- scripting --

  pub fn respond(&self, url: &str, status: u16, body: &str) {
    self.state.borrow_mut().responses.insert(url.to_string(), (status, body.to_string()));
  }

  /// Hold the response for `url` until the returned sender fires.
  pub fn gate(&self, url: &str) -> oneshot::Sender<()> {
    let (tx, rx) = oneshot::channel();
    self.state.borrow_mut().gates.insert(url.to_string(), rx);
    tx
  }

  pub fn fail_script(&self, src: &str) {
    self.state.borrow_mut().failing_scripts.push(src.to_string());
  }

  pub fn fail_inline_containing(&self, marker: &str) {
    self.state.borrow_mut().failing_inline.push(marker.to_string());
  }

  // -- observations --

  pub fn containers(&self) -> Vec<String> {
    self.state.borrow().containers.clone()
  }

  pub fn inline_styles(&self) -> Vec<String> {
    self.state.borrow().inline_styles.clone()
  }

  pub fn style_links(&self) -> Vec<String> {
    self.state.borrow().style_links.clone()
  }

  pub fn loaded_scripts(&self) -> Vec<String> {
    self.state.borrow().loaded_scripts.clone()
  }

  pub fn inline_runs(&self) -> Vec<String> {
    self.state.borrow().inline_runs.clone()
  }

  /// Every style/script/event effect in the order it happened.
  pub fn effect_order(&self) -> Vec<String> {
    self.state.borrow().effects.clone()
  }

  pub fn events(&self) -> Vec<(String, serde_json::Value)> {
    self.state.borrow().events.clone()
  }

  pub fn event_names(&self) -> Vec<String> {
    self.state.borrow().events.iter().map(|(name, _)| name.clone()).collect()
  }

  pub fn history(&self) -> Vec<(String, bool)> {
    self.state.borrow().history.clone()
  }

  pub fn title(&self) -> String {
    self.state.borrow().title.clone()
  }

  pub fn error_panel(&self) -> Option<String> {
    self.state.borrow().error_panel.clone()
  }

  pub fn warnings(&self) -> Vec<String> {
    self.state.borrow().warnings.clone()
  }

  pub fn scrolls(&self) -> usize {
    self.state.borrow().scrolls
  }

  pub fn reloads(&self) -> usize {
    self.state.borrow().reloads
  }
}

impl Host for MockHost {
  fn fetch(&self, url: &str) -> BoxFuture<Result<FetchResponse, GlideError>> {
    let state = self.state.clone();
    let url = url.to_string();
    Box::pin(async move {
      let gate = state.borrow_mut().gates.remove(&url);
      if let Some(rx) = gate {
        let _ = rx.await;
      }
      let response = state.borrow().responses.get(&url).cloned();
      match response {
        Some((status, body)) => Ok(FetchResponse { status, body }),
        None => Err(GlideError::Network { url, reason: "no scripted response".to_string() }),
      }
    })
  }

  fn document_title(&self) -> String {
    self.state.borrow().title.clone()
  }

  fn set_document_title(&self, title: &str) {
    self.state.borrow_mut().title = title.to_string();
  }

  fn append_inline_style(&self, css: &str) {
    let mut state = self.state.borrow_mut();
    state.inline_styles.push(css.to_string());
    state.effects.push(format!("style:{css}"));
  }

  fn append_style_link(&self, href: &str) {
    let mut state = self.state.borrow_mut();
    state.style_links.push(href.to_string());
    state.effects.push(format!("link:{href}"));
  }

  fn load_external_script(&self, src: &str) -> BoxFuture<Result<(), GlideError>> {
    let state = self.state.clone();
    let src = src.to_string();
    Box::pin(async move {
      let failing = state.borrow().failing_scripts.contains(&src);
      state.borrow_mut().effects.push(format!("script:{src}"));
      if failing {
        return Err(GlideError::Host(format!("load error for {src}")));
      }
      state.borrow_mut().loaded_scripts.push(src);
      Ok(())
    })
  }

  fn run_inline_script(&self, code: &str) -> Result<(), GlideError> {
    let mut state = self.state.borrow_mut();
    // The element is injected either way; failure happens during execution.
    state.inline_runs.push(code.to_string());
    state.effects.push(format!("inline:{code}"));
    if state.failing_inline.iter().any(|marker| code.contains(marker.as_str())) {
      return Err(GlideError::Host("inline execution threw".to_string()));
    }
    Ok(())
  }

  fn swap_content(&self, markup: &str, strategy: SwapStrategy) -> Result<(), GlideError> {
    let mut state = self.state.borrow_mut();
    match strategy {
      SwapStrategy::Simple => {
        state.containers.clear();
        state.containers.push(markup.to_string());
      }
      // Buffered swap appends the new container and leaves the old one
      // behind, emulating the overlap the orphan sweep protects against.
      SwapStrategy::Buffered => state.containers.push(markup.to_string()),
    }
    Ok(())
  }

  fn remove_orphan_containers(&self) -> usize {
    let mut state = self.state.borrow_mut();
    let extra = state.containers.len().saturating_sub(1);
    if extra > 0 {
      state.containers.drain(..extra);
    }
    extra
  }

  fn render_error_panel(&self, message: &str) {
    self.state.borrow_mut().error_panel = Some(message.to_string());
  }

  fn scroll_to_top(&self) {
    self.state.borrow_mut().scrolls += 1;
  }

  fn push_history(&self, url: &str, replace: bool) {
    self.state.borrow_mut().history.push((url.to_string(), replace));
  }

  fn reload(&self) {
    self.state.borrow_mut().reloads += 1;
  }

  fn dispatch_event(&self, name: &str, detail: &serde_json::Value) {
    let mut state = self.state.borrow_mut();
    state.events.push((name.to_string(), detail.clone()));
    state.effects.push(format!("event:{name}"));
  }

  fn warn(&self, message: &str) {
    self.state.borrow_mut().warnings.push(message.to_string());
  }
}

/* src/client/wasm/src/host.rs */

// Host implementation over web-sys. Strict on the Rust side, lenient
// toward the document: unexpected DOM state degrades to a warning or a
// no-op, never a panic.

use glide_core::{GlideError, SwapStrategy};
use glide_engine::host::{BoxFuture, FetchResponse, Host};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

#[derive(Clone)]
pub(crate) struct BrowserHost {
  window: web_sys::Window,
  document: web_sys::Document,
  root_class: String,
}

impl BrowserHost {
  pub(crate) fn new(root_class: &str) -> Result<Self, GlideError> {
    let window =
      web_sys::window().ok_or_else(|| GlideError::Host("no window object".to_string()))?;
    let document =
      window.document().ok_or_else(|| GlideError::Host("no document object".to_string()))?;
    Ok(Self { window, document, root_class: root_class.to_string() })
  }

  fn head(&self) -> Result<web_sys::HtmlHeadElement, GlideError> {
    self.document.head().ok_or_else(|| GlideError::Host("document has no head".to_string()))
  }

  fn container_selector(&self) -> String {
    format!(".{}", self.root_class)
  }

  /// The live container, created under `<body>` when the shell lacks one.
  fn container(&self) -> Result<web_sys::Element, GlideError> {
    if let Ok(Some(existing)) = self.document.query_selector(&self.container_selector()) {
      return Ok(existing);
    }
    let body =
      self.document.body().ok_or_else(|| GlideError::Host("document has no body".to_string()))?;
    let fresh = self
      .document
      .create_element("div")
      .map_err(|err| js_host_error("create container", &err))?;
    fresh.set_class_name(&self.root_class);
    body.append_child(&fresh).map_err(|err| js_host_error("attach container", &err))?;
    Ok(fresh)
  }

  /// Off-screen sibling inserted after the current container: identical
  /// class, invisible and inert until the flip.
  fn buffered_swap(&self, markup: &str) -> Result<(), GlideError> {
    let old = self.container()?;
    let fresh = self
      .document
      .create_element("div")
      .map_err(|err| js_host_error("create container", &err))?;
    fresh.set_class_name(&self.root_class);
    let _ = fresh.set_attribute(
      "style",
      "opacity:0;visibility:hidden;pointer-events:none;position:absolute;inset:0;",
    );
    fresh.set_inner_html(markup);

    let parent = old
      .parent_node()
      .ok_or_else(|| GlideError::Host("container has no parent".to_string()))?;
    parent
      .insert_before(&fresh, old.next_sibling().as_ref())
      .map_err(|err| js_host_error("insert buffered container", &err))?;

    // Force a layout pass with the new subtree in place, then flip. Both
    // mutations land in the same task, so no intermediate frame paints;
    // the displaced container is collected by the orphan sweep.
    if let Some(html) = fresh.dyn_ref::<web_sys::HtmlElement>() {
      let _ = html.offset_height();
    }
    let _ = fresh.remove_attribute("style");
    Ok(())
  }
}

impl Host for BrowserHost {
  fn fetch(&self, url: &str) -> BoxFuture<Result<FetchResponse, GlideError>> {
    let window = self.window.clone();
    let url = url.to_string();
    Box::pin(async move {
      let network = |err: &JsValue| GlideError::Network {
        url: url.clone(),
        reason: js_value_message(err),
      };
      let value = JsFuture::from(window.fetch_with_str(&url)).await.map_err(|e| network(&e))?;
      let response: web_sys::Response = value
        .dyn_into()
        .map_err(|_| GlideError::Host("fetch resolved to a non-Response".to_string()))?;
      let status = response.status();
      let text = response.text().map_err(|e| network(&e))?;
      let body =
        JsFuture::from(text).await.map_err(|e| network(&e))?.as_string().unwrap_or_default();
      Ok(FetchResponse { status, body })
    })
  }

  fn document_title(&self) -> String {
    self.document.title()
  }

  fn set_document_title(&self, title: &str) {
    self.document.set_title(title);
  }

  fn append_inline_style(&self, css: &str) {
    let Ok(head) = self.head() else { return };
    if let Ok(style) = self.document.create_element("style") {
      let _ = style.set_attribute("data-glide-style", "");
      style.set_text_content(Some(css));
      let _ = head.append_child(&style);
    }
  }

  fn append_style_link(&self, href: &str) {
    let Ok(head) = self.head() else { return };
    if let Ok(link) = self.document.create_element("link") {
      let _ = link.set_attribute("rel", "stylesheet");
      let _ = link.set_attribute("href", href);
      let _ = link.set_attribute("data-glide-style", "");
      let _ = head.append_child(&link);
    }
  }

  fn load_external_script(&self, src: &str) -> BoxFuture<Result<(), GlideError>> {
    let document = self.document.clone();
    let src = src.to_string();
    Box::pin(async move {
      let element = document
        .create_element("script")
        .map_err(|err| js_host_error("create script", &err))?;
      let script: web_sys::HtmlElement = element
        .dyn_into()
        .map_err(|_| GlideError::Host("script element cast failed".to_string()))?;
      script.set_attribute("src", &src).map_err(|err| js_host_error("set src", &err))?;

      // Resolve on load, reject on error; the caller decides that an error
      // is non-fatal.
      let promise = js_sys::Promise::new(&mut |resolve, reject| {
        script.set_onload(Some(&resolve));
        script.set_onerror(Some(&reject));
      });

      let head = document
        .head()
        .ok_or_else(|| GlideError::Host("document has no head".to_string()))?;
      head.append_child(&script).map_err(|err| js_host_error("attach script", &err))?;

      match JsFuture::from(promise).await {
        Ok(_) => Ok(()),
        Err(_) => Err(GlideError::Host(format!("failed to load {src}"))),
      }
    })
  }

  fn run_inline_script(&self, code: &str) -> Result<(), GlideError> {
    let element = self
      .document
      .create_element("script")
      .map_err(|err| js_host_error("create script", &err))?;
    element.set_text_content(Some(code));
    let body = self
      .document
      .body()
      .ok_or_else(|| GlideError::Host("document has no body".to_string()))?;
    // Execution happens synchronously on append; the element itself is
    // DOM hygiene afterwards.
    body.append_child(&element).map_err(|err| js_host_error("attach script", &err))?;
    element.remove();
    Ok(())
  }

  fn swap_content(&self, markup: &str, strategy: SwapStrategy) -> Result<(), GlideError> {
    match strategy {
      SwapStrategy::Simple => {
        let container = self.container()?;
        container.set_inner_html("");
        container.set_inner_html(markup);
        Ok(())
      }
      SwapStrategy::Buffered => self.buffered_swap(markup),
    }
  }

  fn remove_orphan_containers(&self) -> usize {
    let Ok(list) = self.document.query_selector_all(&self.container_selector()) else {
      return 0;
    };
    let count = list.length();
    if count <= 1 {
      return 0;
    }
    let mut removed = 0;
    // Keep the newest container (last in document order).
    for index in 0..count - 1 {
      if let Some(node) = list.get(index) {
        if let Ok(element) = node.dyn_into::<web_sys::Element>() {
          element.remove();
          removed += 1;
        }
      }
    }
    removed
  }

  fn render_error_panel(&self, message: &str) {
    let Ok(container) = self.container() else { return };
    container.set_inner_html(&format!(
      concat!(
        "<div class=\"glide-error\">",
        "<h2>Something went wrong</h2>",
        "<p>{}</p>",
        "</div>",
      ),
      escape_html(message)
    ));
  }

  fn scroll_to_top(&self) {
    self.window.scroll_to_with_x_and_y(0.0, 0.0);
  }

  fn push_history(&self, url: &str, replace: bool) {
    let Ok(history) = self.window.history() else { return };
    let state = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&state, &JsValue::from_str("url"), &JsValue::from_str(url));
    let result = if replace {
      history.replace_state_with_url(&state, "", Some(url))
    } else {
      history.push_state_with_url(&state, "", Some(url))
    };
    if let Err(err) = result {
      self.warn(&format!("history update failed: {}", js_value_message(&err)));
    }
  }

  fn reload(&self) {
    let _ = self.window.location().reload();
  }

  fn dispatch_event(&self, name: &str, detail: &serde_json::Value) {
    let init = web_sys::CustomEventInit::new();
    init.set_bubbles(true);
    match js_sys::JSON::parse(&detail.to_string()) {
      Ok(parsed) => init.set_detail(&parsed),
      Err(_) => init.set_detail(&JsValue::NULL),
    }
    if let Ok(event) = web_sys::CustomEvent::new_with_event_init_dict(name, &init) {
      let _ = self.window.dispatch_event(&event);
    }
  }

  fn warn(&self, message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
  }
}

fn js_value_message(value: &JsValue) -> String {
  value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn js_host_error(what: &str, err: &JsValue) -> GlideError {
  GlideError::Host(format!("{what}: {}", js_value_message(err)))
}

fn escape_html(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for c in text.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      _ => out.push(c),
    }
  }
  out
}

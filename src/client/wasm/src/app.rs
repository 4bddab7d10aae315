/* src/client/wasm/src/app.rs */

use std::rc::Rc;

use glide_core::GlideConfig;
use glide_engine::{LinkAttrs, ModuleRegistry, NavigationController, should_intercept};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::host::BrowserHost;
use crate::location::compose_target;

/// Browser entry point. Constructed once by the shell page:
///
/// ```js
/// const app = new GlideApp(config);
/// app.start();
/// ```
#[wasm_bindgen]
pub struct GlideApp {
  controller: Rc<NavigationController<BrowserHost>>,
}

#[wasm_bindgen]
impl GlideApp {
  #[wasm_bindgen(constructor)]
  pub fn new(config: JsValue) -> Result<GlideApp, JsValue> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let json: String = js_sys::JSON::stringify(&config)
      .map_err(|_| JsValue::from_str("config is not serializable"))?
      .into();
    let config: GlideConfig =
      serde_json::from_str(&json).map_err(|err| JsValue::from_str(&err.to_string()))?;

    let host = BrowserHost::new(&config.root_class)
      .map_err(|err| JsValue::from_str(&err.to_string()))?;
    let controller = NavigationController::new(host, config, ModuleRegistry::new())
      .map_err(|err| JsValue::from_str(&err.to_string()))?;

    Ok(GlideApp { controller: Rc::new(controller) })
  }

  /// Install the click and popstate listeners and render the initial route
  /// from the current location.
  pub fn start(&self) -> Result<(), JsValue> {
    self.install_click_listener()?;
    self.install_popstate_listener()?;

    let location = web_sys::window()
      .ok_or_else(|| JsValue::from_str("no window object"))?
      .location();
    let target = compose_target(
      &location.pathname().unwrap_or_default(),
      &location.search().unwrap_or_default(),
      &location.hash().unwrap_or_default(),
    );
    let controller = self.controller.clone();
    spawn_local(async move {
      controller.start(&target).await;
    });
    Ok(())
  }

  /// Programmatic navigation, for page modules and nav widgets.
  pub fn navigate(&self, target: String) {
    let controller = self.controller.clone();
    spawn_local(async move {
      controller.navigate(&target).await;
    });
  }

  #[wasm_bindgen(js_name = isNavigating)]
  pub fn is_navigating(&self) -> bool {
    self.controller.is_navigating()
  }

  fn install_click_listener(&self) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window object"))?;
    let document =
      window.document().ok_or_else(|| JsValue::from_str("no document object"))?;

    let controller = self.controller.clone();
    let on_click = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |event: web_sys::MouseEvent| {
      let Some(anchor) = event
        .target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .and_then(|el| el.closest("a[href]").ok().flatten())
      else {
        return;
      };
      let href = anchor.get_attribute("href").unwrap_or_default();
      let target_attr = anchor.get_attribute("target");
      let link = LinkAttrs {
        href: &href,
        target: target_attr.as_deref(),
        has_download: anchor.has_attribute("download"),
        opt_out: anchor.has_attribute("data-no-spa"),
      };
      if !should_intercept(&link) {
        return;
      }
      event.prevent_default();
      let controller = controller.clone();
      let target = href.clone();
      spawn_local(async move {
        controller.navigate(&target).await;
      });
    });

    // Capture phase: the router sees the click before page handlers do.
    document.add_event_listener_with_callback_and_bool(
      "click",
      on_click.as_ref().unchecked_ref(),
      true,
    )?;
    on_click.forget();
    Ok(())
  }

  fn install_popstate_listener(&self) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window object"))?;

    let controller = self.controller.clone();
    let on_pop = Closure::<dyn FnMut(web_sys::PopStateEvent)>::new(move |event: web_sys::PopStateEvent| {
      let state = event.state();
      let url = js_sys::Reflect::get(&state, &JsValue::from_str("url"))
        .ok()
        .and_then(|v| v.as_string());
      let controller = controller.clone();
      spawn_local(async move {
        controller.handle_pop(url.as_deref()).await;
      });
    });

    window.add_event_listener_with_callback("popstate", on_pop.as_ref().unchecked_ref())?;
    on_pop.forget();
    Ok(())
  }
}

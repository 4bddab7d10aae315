/* src/client/engine/src/modules.rs */

use std::collections::HashMap;

/// What a page module gets to see on activation and cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
  pub page_id: String,
  pub query_string: String,
  pub hash: String,
}

/// Per-screen behavior, registered once at startup and invoked by the
/// controller. `on_leave` is mandatory cleanup: the module's DOM is about
/// to be destroyed, so listeners and timers it owns must go.
///
/// This replaces the legacy pattern of ambient global function names
/// (`window.loadPageData` and friends).
pub trait PageModule {
  fn on_enter(&self, _ctx: &PageContext) {}
  fn on_leave(&self, _ctx: &PageContext) {}
}

/// Mapping from page id to its module. Pages without a module are fine;
/// they only get the window events.
#[derive(Default)]
pub struct ModuleRegistry {
  modules: HashMap<String, Box<dyn PageModule>>,
}

impl ModuleRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register(&mut self, page_id: &str, module: Box<dyn PageModule>) {
    self.modules.insert(page_id.to_string(), module);
  }

  pub fn enter(&self, ctx: &PageContext) {
    if let Some(module) = self.modules.get(&ctx.page_id) {
      module.on_enter(ctx);
    }
  }

  pub fn leave(&self, ctx: &PageContext) {
    if let Some(module) = self.modules.get(&ctx.page_id) {
      module.on_leave(ctx);
    }
  }
}

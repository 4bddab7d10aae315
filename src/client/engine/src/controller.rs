/* src/client/engine/src/controller.rs */

use std::cell::RefCell;

use glide_core::{
  GlideConfig, GlideError, PageDetail, ResourceCache, ROUTE_CHANGED, RouteChangedDetail,
  enter_event, leave_event,
  route::{RouteEntry, RouteTable, split_url},
};

use crate::host::Host;
use crate::loader;
use crate::modules::{ModuleRegistry, PageContext};
use crate::replay;
use crate::swap;

/// How a navigation touches browser history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
  Push,
  Replace,
  /// History already moved (popstate); only the content changes.
  None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
  Completed,
  /// Duplicate request for the path already in flight (double-click guard).
  Dropped,
  /// A newer navigation took over; this one stopped without mutating state.
  Superseded,
  /// Fetch/parse failure, surfaced as an inline error panel.
  Failed,
  /// Delegated to a full page reload (popstate with no attached state).
  Reloaded,
}

struct InFlight {
  seq: u64,
  path: String,
}

struct NavState {
  current: Option<PageContext>,
  seq: u64,
  in_flight: Option<InFlight>,
}

/// The orchestrator. Owns all navigation state; the `Idle`/`Navigating`
/// phase is observable only through [`NavigationController::is_navigating`].
///
/// Interior mutability keeps `navigate` callable from reentrant event
/// handlers: no `RefCell` borrow is ever held across an await.
pub struct NavigationController<H: Host> {
  host: H,
  config: GlideConfig,
  routes: RouteTable,
  cache: RefCell<ResourceCache>,
  state: RefCell<NavState>,
  modules: ModuleRegistry,
}

impl<H: Host> NavigationController<H> {
  pub fn new(host: H, config: GlideConfig, modules: ModuleRegistry) -> Result<Self, GlideError> {
    let routes = config.route_table()?;
    Ok(Self {
      host,
      config,
      routes,
      cache: RefCell::new(ResourceCache::new()),
      state: RefCell::new(NavState { current: None, seq: 0, in_flight: None }),
      modules,
    })
  }

  pub fn is_navigating(&self) -> bool {
    self.state.borrow().in_flight.is_some()
  }

  pub fn current_page_id(&self) -> Option<String> {
    self.state.borrow().current.as_ref().map(|ctx| ctx.page_id.clone())
  }

  pub fn resolve(&self, path: &str) -> &RouteEntry {
    self.routes.resolve(path)
  }

  /// First render: replaces the history entry so back/forward round-trips.
  pub async fn start(&self, location: &str) -> NavOutcome {
    self.run(location, HistoryMode::Replace).await
  }

  /// Link click or programmatic navigation.
  pub async fn navigate(&self, target: &str) -> NavOutcome {
    self.run(target, HistoryMode::Push).await
  }

  pub async fn replace(&self, target: &str) -> NavOutcome {
    self.run(target, HistoryMode::Replace).await
  }

  /// Browser back/forward. `state_url` is the URL carried by the popped
  /// history entry; without one (a pre-router entry) the only safe move is
  /// a full reload.
  pub async fn handle_pop(&self, state_url: Option<&str>) -> NavOutcome {
    match state_url {
      Some(url) => self.run(url, HistoryMode::None).await,
      None => {
        self.host.reload();
        NavOutcome::Reloaded
      }
    }
  }

  async fn run(&self, target: &str, mode: HistoryMode) -> NavOutcome {
    let parts = split_url(target);
    let entry = self.routes.resolve(&parts.path).clone();

    let seq = {
      let mut state = self.state.borrow_mut();
      if let Some(in_flight) = &state.in_flight {
        if in_flight.path == parts.path {
          return NavOutcome::Dropped;
        }
      }
      state.seq += 1;
      let seq = state.seq;
      state.in_flight = Some(InFlight { seq, path: parts.path.clone() });
      seq
    };

    // (a) leave lifecycle for the page being displaced
    let leaving = self.state.borrow().current.clone();
    if let Some(prev) = &leaving {
      self.host.dispatch_event(&leave_event(&prev.page_id), &page_detail(prev));
      self.modules.leave(prev);
    }

    // (b) history carries the target URL before the content changes
    match mode {
      HistoryMode::Push => self.host.push_history(target, false),
      HistoryMode::Replace => self.host.push_history(target, true),
      HistoryMode::None => {}
    }

    // (c) fragment
    let loaded = loader::load(&self.host, &self.config, &entry, &parts.query, &parts.hash).await;
    if self.is_stale(seq) {
      return NavOutcome::Superseded;
    }
    let payload = match loaded {
      Ok(payload) => payload,
      Err(err) => return self.fail(seq, &parts.path, &err),
    };

    // (d) swap
    if let Err(err) = swap::perform_swap(&self.host, &payload.markup, self.config.swap) {
      return self.fail(seq, &parts.path, &err);
    }
    if let Some(title) = &payload.title {
      self.host.set_document_title(title);
    }

    // (e) replay styles/scripts through the cache
    let assets = self.config.assets_for(&entry.page_id).cloned();
    let replayed =
      replay::replay(&self.host, &self.cache, assets.as_ref(), &payload, || !self.is_stale(seq))
        .await;
    if replayed.is_err() || self.is_stale(seq) {
      return NavOutcome::Superseded;
    }

    // (f) commit
    let ctx = PageContext {
      page_id: entry.page_id.clone(),
      query_string: parts.query.clone(),
      hash: parts.hash.clone(),
    };
    {
      let mut state = self.state.borrow_mut();
      state.current = Some(ctx.clone());
      state.in_flight = None;
    }

    // (g) enter lifecycle + generic route change
    self.host.dispatch_event(&enter_event(&ctx.page_id), &page_detail(&ctx));
    self.modules.enter(&ctx);
    let detail = RouteChangedDetail {
      route: parts.path,
      page_id: ctx.page_id.clone(),
      query_string: ctx.query_string.clone(),
      hash: ctx.hash.clone(),
    };
    self.host.dispatch_event(ROUTE_CHANGED, &serde_json::to_value(&detail).unwrap_or_default());

    // (h) viewport
    self.host.scroll_to_top();
    NavOutcome::Completed
  }

  fn is_stale(&self, seq: u64) -> bool {
    self.state.borrow().seq != seq
  }

  /// Terminal failure for one navigation: surface an inline panel, go back
  /// to idle. The user recovers by navigating somewhere else.
  fn fail(&self, seq: u64, path: &str, err: &GlideError) -> NavOutcome {
    if self.is_stale(seq) {
      return NavOutcome::Superseded;
    }
    {
      let mut state = self.state.borrow_mut();
      if state.in_flight.as_ref().map(|f| f.seq == seq).unwrap_or(false) {
        state.in_flight = None;
      }
    }
    self.host.warn(&format!("navigation to {path} failed: {err}"));
    self
      .host
      .render_error_panel(&format!("Could not load this page ({err}). Try another destination."));
    NavOutcome::Failed
  }
}

fn page_detail(ctx: &PageContext) -> serde_json::Value {
  let detail = PageDetail {
    page_id: ctx.page_id.clone(),
    query_string: ctx.query_string.clone(),
    hash: ctx.hash.clone(),
  };
  serde_json::to_value(&detail).unwrap_or_default()
}

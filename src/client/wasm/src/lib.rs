/* src/client/wasm/src/lib.rs */

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod host;
mod location;

#[cfg(target_arch = "wasm32")]
pub use app::GlideApp;
pub use location::compose_target;

/* src/client/engine/src/swap.rs */

use glide_core::{GlideError, SwapStrategy};

use crate::host::Host;

/// Replace the content region with `markup`, then defensively sweep for
/// duplicate containers. Overlapping buffered swaps can momentarily leave
/// the old container behind; the sweep restores the invariant that exactly
/// one element bears the page-root class.
pub fn perform_swap<H: Host>(
  host: &H,
  markup: &str,
  strategy: SwapStrategy,
) -> Result<(), GlideError> {
  host.swap_content(markup, strategy)?;
  let removed = host.remove_orphan_containers();
  if removed > 0 {
    host.warn(&format!("removed {removed} orphaned page container(s) after swap"));
  }
  Ok(())
}

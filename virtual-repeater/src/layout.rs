use alloc::collections::BTreeMap;

use crate::{Direction, LayoutEvent, Position, Size};

/// A pluggable strategy that turns viewport geometry and item sizes into a window.
///
/// Inputs are pushed through the setters; nothing is computed until [`Layout::reflow`], which
/// reports the outcome as [`LayoutEvent`]s. A reflow with no new input should emit nothing.
///
/// Contract for `LayoutEvent::RangeChange`:
/// - `first + num` must not exceed the last reported total;
/// - `stable` means the range will not move without new input. While it is `false` the
///   coordinator keeps displaced children alive for cheap reuse.
pub trait Layout {
    fn direction(&self) -> Direction;

    fn set_total_items(&mut self, total: usize);

    fn set_viewport_size(&mut self, size: Size);

    /// Scroll position of the viewport relative to the start of the list.
    fn scroll_to(&mut self, position: Position);

    /// Measured sizes of rendered children, keyed by item index.
    fn update_item_sizes(&mut self, sizes: &BTreeMap<usize, Size>) {
        let _ = sizes;
    }

    fn reflow(&mut self, emit: &mut dyn FnMut(LayoutEvent));
}

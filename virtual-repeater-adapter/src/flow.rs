use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::mem;

use virtual_repeater::{Direction, Layout, LayoutEvent, Position, RangeChange, Size};

use crate::fenwick::Fenwick;

/// Main-axis size assumed for an index until its child is measured.
pub type EstimateSizeCallback = Rc<dyn Fn(usize) -> u32>;

/// Configuration for [`FlowLayout`].
#[derive(Clone)]
pub struct FlowLayoutOptions {
    pub estimate_size: EstimateSizeCallback,
    /// Items rendered beyond each edge of the viewport.
    pub overscan: usize,
    /// Space between consecutive items.
    pub gap: u32,
    pub padding_start: u32,
    pub padding_end: u32,
}

impl FlowLayoutOptions {
    pub fn new(estimate_size: impl Fn(usize) -> u32 + 'static) -> Self {
        Self {
            estimate_size: Rc::new(estimate_size),
            overscan: 1,
            gap: 0,
            padding_start: 0,
            padding_end: 0,
        }
    }

    pub fn with_estimate_size(mut self, estimate_size: impl Fn(usize) -> u32 + 'static) -> Self {
        self.estimate_size = Rc::new(estimate_size);
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_gap(mut self, gap: u32) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_padding(mut self, padding_start: u32, padding_end: u32) -> Self {
        self.padding_start = padding_start;
        self.padding_end = padding_end;
        self
    }
}

impl Default for FlowLayoutOptions {
    fn default() -> Self {
        Self::new(|_| 50)
    }
}

impl core::fmt::Debug for FlowLayoutOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlowLayoutOptions")
            .field("overscan", &self.overscan)
            .field("gap", &self.gap)
            .field("padding_start", &self.padding_start)
            .field("padding_end", &self.padding_end)
            .finish_non_exhaustive()
    }
}

/// A one-dimensional list of variable-size items.
///
/// Sizes start from `estimate_size` and are replaced by measurements as children render.
/// Offsets are prefix sums (Fenwick tree), so mapping the scroll offset to an index is
/// `O(log n)` regardless of how many items were measured.
///
/// When items above the viewport change size, the difference is reported as a scroll error so
/// the visible content does not jump. A change of the cross-axis viewport size invalidates every
/// measurement.
#[derive(Debug)]
pub struct FlowLayout {
    direction: Direction,
    options: FlowLayoutOptions,
    /// Per-item main-axis size plus `gap`.
    extents: Fenwick,
    measured: Vec<bool>,
    viewport: Size,
    scroll: u64,
    scroll_error: i64,
    remeasure: bool,
    dirty: bool,

    emitted_size: Option<Size>,
    emitted_range: Option<RangeChange>,
    emitted_positions: BTreeMap<usize, Position>,
}

impl FlowLayout {
    pub fn new(direction: Direction, options: FlowLayoutOptions) -> Self {
        Self {
            direction,
            options,
            extents: Fenwick::default(),
            measured: Vec::new(),
            viewport: Size::default(),
            scroll: 0,
            scroll_error: 0,
            remeasure: false,
            dirty: true,
            emitted_size: None,
            emitted_range: None,
            emitted_positions: BTreeMap::new(),
        }
    }

    pub fn options(&self) -> &FlowLayoutOptions {
        &self.options
    }

    /// Replaces the options. Measured sizes are kept; unmeasured ones are re-estimated.
    pub fn set_options(&mut self, options: FlowLayoutOptions) {
        let old_gap = u64::from(self.options.gap);
        let gap = u64::from(options.gap);
        let values = (0..self.extents.len())
            .map(|i| {
                let size = if self.measured[i] {
                    self.extents.get(i) - old_gap
                } else {
                    u64::from((options.estimate_size)(i))
                };
                size + gap
            })
            .collect();
        self.extents = Fenwick::from_values(values);
        self.options = options;
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.extents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extents.len() == 0
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.measured.get(index).copied().unwrap_or(false)
    }

    /// Current main-axis size of an item (measured or estimated).
    pub fn item_size(&self, index: usize) -> Option<u32> {
        if index >= self.len() {
            return None;
        }
        let size = self.extents.get(index) - u64::from(self.options.gap);
        Some(size.min(u64::from(u32::MAX)) as u32)
    }

    /// Main-axis offset of an item from the start of the list.
    pub fn item_start(&self, index: usize) -> u64 {
        u64::from(self.options.padding_start) + self.extents.prefix_sum(index)
    }

    /// Total main-axis extent, padding included.
    pub fn total_size(&self) -> u64 {
        let padding = u64::from(self.options.padding_start) + u64::from(self.options.padding_end);
        if self.is_empty() {
            return padding;
        }
        padding + self.extents.total() - u64::from(self.options.gap)
    }

    /// The item covering a main-axis offset, clamped to the last item.
    pub fn index_at(&self, offset: u64) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        let in_list = offset.saturating_sub(u64::from(self.options.padding_start));
        Some(self.extents.lower_bound(in_list).min(self.len() - 1))
    }

    /// Inclusive index range covering the viewport, overscan included.
    pub fn visible_range(&self) -> Option<(usize, usize)> {
        let main = u64::from(self.direction.main(self.viewport));
        if main == 0 {
            return None;
        }
        let first_visible = self.index_at(self.scroll)?;
        let last_visible = self
            .index_at(self.scroll + main - 1)?
            .max(first_visible);
        let first = first_visible.saturating_sub(self.options.overscan);
        let last = last_visible
            .saturating_add(self.options.overscan)
            .min(self.len() - 1);
        Some((first, last))
    }

    fn scroll_size(&self) -> Size {
        let main = self.total_size().min(u64::from(u32::MAX)) as u32;
        self.direction.size(main, self.direction.cross(self.viewport))
    }

    fn range_change(&mut self) -> RangeChange {
        let remeasure = mem::take(&mut self.remeasure);
        match self.visible_range() {
            Some((first, last)) => RangeChange {
                first,
                num: last - first + 1,
                stable: self.measured[first..=last].iter().all(|m| *m),
                remeasure,
            },
            None => RangeChange {
                first: 0,
                num: 0,
                stable: true,
                remeasure,
            },
        }
    }
}

impl Layout for FlowLayout {
    fn direction(&self) -> Direction {
        self.direction
    }

    fn set_total_items(&mut self, total: usize) {
        if total == self.len() {
            return;
        }
        let gap = u64::from(self.options.gap);
        let estimate = Rc::clone(&self.options.estimate_size);
        self.extents
            .resize_with(total, |i| u64::from(estimate(i)) + gap);
        self.measured.resize(total, false);
        self.dirty = true;
    }

    fn set_viewport_size(&mut self, size: Size) {
        if size == self.viewport {
            return;
        }
        let old_cross = self.direction.cross(self.viewport);
        if old_cross != 0 && old_cross != self.direction.cross(size) {
            atrace!(
                from = old_cross,
                to = self.direction.cross(size),
                "FlowLayout: cross size changed, remeasuring"
            );
            self.remeasure = true;
            self.measured.fill(false);
        }
        self.viewport = size;
        self.dirty = true;
    }

    fn scroll_to(&mut self, position: Position) {
        let offset = self.direction.main_offset(position);
        if offset != self.scroll {
            self.scroll = offset;
            self.dirty = true;
        }
    }

    fn update_item_sizes(&mut self, sizes: &BTreeMap<usize, Size>) {
        let gap = u64::from(self.options.gap);
        let anchor = self.index_at(self.scroll).unwrap_or(0);
        for (&index, &size) in sizes {
            if index >= self.len() {
                continue;
            }
            let main = u64::from(self.direction.main(size));
            let old = self.extents.get(index) - gap;
            if main != old {
                self.extents.set(index, main + gap);
                if index < anchor {
                    self.scroll_error += main as i64 - old as i64;
                }
            }
            self.measured[index] = true;
        }
        self.dirty = true;
    }

    fn reflow(&mut self, emit: &mut dyn FnMut(LayoutEvent)) {
        if !mem::take(&mut self.dirty) {
            return;
        }

        let error = mem::take(&mut self.scroll_error);
        if error != 0 {
            self.scroll = self.scroll.saturating_add_signed(error);
            emit(LayoutEvent::ScrollErrorChange(
                self.direction.scroll_error(error),
            ));
        }

        let size = self.scroll_size();
        if self.emitted_size != Some(size) {
            self.emitted_size = Some(size);
            emit(LayoutEvent::ScrollSizeChange(size));
        }

        let change = self.range_change();
        if self.emitted_range != Some(change) || change.remeasure {
            atrace!(
                first = change.first,
                num = change.num,
                stable = change.stable,
                "FlowLayout: range"
            );
            self.emitted_range = Some(change);
            emit(LayoutEvent::RangeChange(change));
        }

        let positions: BTreeMap<usize, Position> = (change.first..change.first + change.num)
            .map(|i| (i, self.direction.position(self.item_start(i), 0)))
            .collect();
        if positions != self.emitted_positions {
            self.emitted_positions = positions.clone();
            emit(LayoutEvent::ItemPositionChange(positions));
        }
    }
}

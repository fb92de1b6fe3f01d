use alloc::collections::BTreeMap;
use core::mem;

use virtual_repeater::{Direction, Layout, LayoutEvent, Position, RangeChange, Size};

/// Configuration for [`GridLayout`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridLayoutOptions {
    /// Cell size assumed until the first child is measured.
    pub estimate_cell: Size,
    /// Lines rendered beyond each edge of the viewport.
    pub overscan: usize,
    /// Space between cells, along both axes.
    pub gap: u32,
    pub padding_start: u32,
    pub padding_end: u32,
}

impl GridLayoutOptions {
    pub fn new(estimate_cell: Size) -> Self {
        Self {
            estimate_cell,
            overscan: 1,
            gap: 0,
            padding_start: 0,
            padding_end: 0,
        }
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

impl Default for GridLayoutOptions {
    fn default() -> Self {
        Self::new(Size::new(100, 100))
    }
}

/// Uniform cells flowing along the cross axis, then wrapping into lines along the scroll axis.
///
/// Every cell takes the size of the first measured child; the layout is stable from then on.
#[derive(Clone, Debug)]
pub struct GridLayout {
    direction: Direction,
    options: GridLayoutOptions,
    total: usize,
    cell: Size,
    cell_measured: bool,
    viewport: Size,
    scroll: u64,
    scroll_error: i64,
    dirty: bool,

    emitted_size: Option<Size>,
    emitted_range: Option<RangeChange>,
    emitted_positions: BTreeMap<usize, Position>,
}

impl GridLayout {
    pub fn new(direction: Direction, options: GridLayoutOptions) -> Self {
        Self {
            direction,
            cell: options.estimate_cell,
            options,
            total: 0,
            cell_measured: false,
            viewport: Size::default(),
            scroll: 0,
            scroll_error: 0,
            dirty: true,
            emitted_size: None,
            emitted_range: None,
            emitted_positions: BTreeMap::new(),
        }
    }

    pub fn options(&self) -> &GridLayoutOptions {
        &self.options
    }

    pub fn cell(&self) -> Size {
        self.cell
    }

    pub fn is_cell_measured(&self) -> bool {
        self.cell_measured
    }

    fn line_extent(&self) -> u64 {
        u64::from(self.direction.main(self.cell)) + u64::from(self.options.gap)
    }

    fn cross_extent(&self) -> u64 {
        u64::from(self.direction.cross(self.cell)) + u64::from(self.options.gap)
    }

    /// Cells per line; at least one, even when the viewport is narrower than a cell.
    pub fn per_line(&self) -> usize {
        let available = u64::from(self.direction.cross(self.viewport)) + u64::from(self.options.gap);
        (available / self.cross_extent().max(1)).max(1) as usize
    }

    pub fn lines(&self) -> usize {
        self.total.div_ceil(self.per_line())
    }

    fn line_at(&self, offset: u64) -> usize {
        let in_list = offset.saturating_sub(u64::from(self.options.padding_start));
        let line = in_list / self.line_extent().max(1);
        (line as usize).min(self.lines().saturating_sub(1))
    }

    pub fn total_size(&self) -> u64 {
        let padding = u64::from(self.options.padding_start) + u64::from(self.options.padding_end);
        let lines = self.lines() as u64;
        if lines == 0 {
            return padding;
        }
        padding + lines * self.line_extent() - u64::from(self.options.gap)
    }

    pub fn item_position(&self, index: usize) -> Position {
        let per_line = self.per_line();
        let line = (index / per_line) as u64;
        let column = (index % per_line) as u64;
        self.direction.position(
            u64::from(self.options.padding_start) + line * self.line_extent(),
            column * self.cross_extent(),
        )
    }

    /// Inclusive index range covering the viewport, overscan lines included.
    pub fn visible_range(&self) -> Option<(usize, usize)> {
        let main = u64::from(self.direction.main(self.viewport));
        if self.total == 0 || main == 0 {
            return None;
        }
        let per_line = self.per_line();
        let first_line = self.line_at(self.scroll);
        let last_line = self.line_at(self.scroll + main - 1).max(first_line);
        let first_line = first_line.saturating_sub(self.options.overscan);
        let last_line = last_line
            .saturating_add(self.options.overscan)
            .min(self.lines() - 1);
        let first = first_line * per_line;
        let last = ((last_line + 1) * per_line).min(self.total) - 1;
        Some((first, last))
    }
}

impl Layout for GridLayout {
    fn direction(&self) -> Direction {
        self.direction
    }

    fn set_total_items(&mut self, total: usize) {
        if total != self.total {
            self.total = total;
            self.dirty = true;
        }
    }

    fn set_viewport_size(&mut self, size: Size) {
        if size != self.viewport {
            self.viewport = size;
            self.dirty = true;
        }
    }

    fn scroll_to(&mut self, position: Position) {
        let offset = self.direction.main_offset(position);
        if offset != self.scroll {
            self.scroll = offset;
            self.dirty = true;
        }
    }

    fn update_item_sizes(&mut self, sizes: &BTreeMap<usize, Size>) {
        if self.cell_measured {
            return;
        }
        let Some(&cell) = sizes
            .values()
            .find(|size| self.direction.main(**size) > 0)
        else {
            return;
        };
        let anchor_line = self.line_at(self.scroll) as i64;
        let old_extent = self.line_extent() as i64;
        self.cell = cell;
        self.cell_measured = true;
        self.scroll_error += anchor_line * (self.line_extent() as i64 - old_extent);
        adebug!(
            width = cell.width,
            height = cell.height,
            "GridLayout: cell size adopted"
        );
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

        let main = self.total_size().min(u64::from(u32::MAX)) as u32;
        let size = self
            .direction
            .size(main, self.direction.cross(self.viewport));
        if self.emitted_size != Some(size) {
            self.emitted_size = Some(size);
            emit(LayoutEvent::ScrollSizeChange(size));
        }

        let change = match self.visible_range() {
            Some((first, last)) => RangeChange {
                first,
                num: last - first + 1,
                stable: self.cell_measured,
                remeasure: false,
            },
            None => RangeChange {
                first: 0,
                num: 0,
                stable: true,
                remeasure: false,
            },
        };
        if self.emitted_range != Some(change) {
            self.emitted_range = Some(change);
            emit(LayoutEvent::RangeChange(change));
        }

        let positions: BTreeMap<usize, Position> = (change.first..change.first + change.num)
            .map(|i| (i, self.item_position(i)))
            .collect();
        if positions != self.emitted_positions {
            self.emitted_positions = positions.clone();
            emit(LayoutEvent::ItemPositionChange(positions));
        }
    }
}

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::mem;

use crate::key::HandleKey;
use crate::repeater::MeasureBatch;
use crate::scheduler::TaskQueue;
use crate::{
    Direction, ItemKey, Layout, LayoutEvent, Position, RangeChange, Rect, Repeater,
    RepeaterOptions, ScrollHost, Size, VisibleRange, Window,
};

/// Upper bound on tasks run by one [`ScrollCoordinator::flush`].
///
/// Reaching it means the layout keeps moving the window without settling.
pub const MAX_FLUSH_TASKS: usize = 10_000;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Task<C> {
    Render,
    Measure(MeasureBatch<C>),
    Reflow,
    UpdateView,
    ApplyPositions,
}

/// Computes the part of `scroller` covered by `container`, as a viewport size plus the scroll
/// position of that viewport relative to the container's origin.
///
/// The scroll axis always takes the scroller's full extent, so items just past the container's
/// visible edge are still considered in view.
pub fn visible_viewport(direction: Direction, container: Rect, scroller: Rect) -> (Size, Position) {
    let width = i64::from(scroller.width);
    let height = i64::from(scroller.height);
    let dx = container.left - scroller.left;
    let dy = container.top - scroller.top;

    let x_min = dx.clamp(0, width);
    let y_min = dy.clamp(0, height);
    let (x_max, y_max) = match direction {
        Direction::Vertical => ((dx + i64::from(container.width)).clamp(0, width), height),
        Direction::Horizontal => (width, (dy + i64::from(container.height)).clamp(0, height)),
    };

    let size = Size::new((x_max - x_min).max(0) as u32, (y_max - y_min).max(0) as u32);
    let position = Position {
        top: (-dy).max(0) as u64,
        left: (-dx).max(0) as u64,
    };
    (size, position)
}

/// Drives a [`Repeater`] from a [`Layout`]: the read/write loop of a scrolling list.
///
/// Read side: container and scroller geometry become `set_viewport_size`/`scroll_to` calls.
/// Write side: layout events become window updates, child positions, a minimum container size
/// and scroll corrections. Measured child sizes flow back to the layout after each render.
///
/// All work is queued; nothing happens until [`ScrollCoordinator::flush`].
pub struct ScrollCoordinator<T, Ct: ScrollHost, K = ItemKey> {
    repeater: Repeater<T, Ct, K>,
    layout: Option<Box<dyn Layout>>,
    tasks: TaskQueue<Task<Ct::Child>>,
    on_range_change: Option<crate::RangeChangeCallback>,

    scroll_size: Option<Size>,
    positions: BTreeMap<usize, Position>,
    layout_total: Option<usize>,

    notify_stable: bool,
    notified: Option<VisibleRange>,
}

impl<T, Ct: ScrollHost> Default for ScrollCoordinator<T, Ct, ItemKey> {
    fn default() -> Self {
        Self::new(RepeaterOptions::new())
    }
}

impl<T, Ct, K> ScrollCoordinator<T, Ct, K>
where
    Ct: ScrollHost,
    K: HandleKey,
{
    pub fn new(options: RepeaterOptions<T, Ct::Child, K>) -> Self {
        Self {
            repeater: Repeater::new(options),
            layout: None,
            tasks: TaskQueue::new(),
            on_range_change: None,
            scroll_size: None,
            positions: BTreeMap::new(),
            layout_total: None,
            notify_stable: false,
            notified: None,
        }
    }

    pub fn repeater(&self) -> &Repeater<T, Ct, K> {
        &self.repeater
    }

    /// Direct access to the repeater. Changes made through it are picked up by the next
    /// [`ScrollCoordinator::flush`].
    pub fn repeater_mut(&mut self) -> &mut Repeater<T, Ct, K> {
        &mut self.repeater
    }

    pub fn set_options(&mut self, options: RepeaterOptions<T, Ct::Child, K>) {
        self.repeater.set_options(options);
        self.sync_render();
    }

    pub fn set_items(&mut self, items: impl Into<Arc<[T]>>) {
        self.repeater.set_items(items);
        self.sync_render();
    }

    pub fn set_new_child(&mut self, f: impl Fn(&T, usize) -> Ct::Child + 'static) {
        self.repeater.set_new_child(f);
        self.sync_render();
    }

    pub fn set_update_child(&mut self, f: Option<impl Fn(&Ct::Child, &T, usize) + 'static>) {
        self.repeater.set_update_child(f);
        self.sync_render();
    }

    pub fn set_recycle_child(&mut self, f: Option<impl Fn(&Ct::Child, &T, usize) + 'static>) {
        self.repeater.set_recycle_child(f);
        self.sync_render();
    }

    pub fn set_item_key(&mut self, f: impl Fn(&T) -> K + 'static) {
        self.repeater.set_item_key(f);
        self.sync_render();
    }

    pub fn set_measure_callback(&mut self, f: Option<impl Fn(&BTreeMap<usize, Size>) + 'static>) {
        self.repeater.set_measure_callback(f);
        self.sync_render();
    }

    pub fn set_window(&mut self, window: Window) {
        self.repeater.set_window(window);
        self.sync_render();
    }

    pub fn container(&self) -> Option<&Ct> {
        self.repeater.container()
    }

    pub fn container_mut(&mut self) -> Option<&mut Ct> {
        self.repeater.container_mut()
    }

    /// Swaps the observed container and returns the previous one.
    ///
    /// The previous container stops being observed and loses its minimum size; the new one
    /// inherits the last known scroll size.
    pub fn set_container(&mut self, container: Option<Ct>) -> Option<Ct> {
        let mut previous = self.repeater.set_container(container);
        if let Some(previous) = previous.as_mut() {
            previous.set_observed(false);
            previous.set_min_size(None);
        }
        let scroll_size = self.scroll_size;
        if let Some(current) = self.repeater.container_mut() {
            current.set_observed(true);
            if scroll_size.is_some() {
                current.set_min_size(scroll_size);
            }
        }
        self.tasks.schedule(Task::UpdateView);
        self.sync_render();
        previous
    }

    pub fn layout(&self) -> Option<&dyn Layout> {
        self.layout.as_deref()
    }

    pub fn layout_mut(&mut self) -> Option<&mut (dyn Layout + 'static)> {
        self.layout.as_deref_mut()
    }

    /// Replaces the layout and returns the previous one.
    ///
    /// Pending replies of the previous layout are dropped and every rendered child is
    /// remeasured for the new one. Without a layout the whole list is rendered.
    pub fn set_layout(&mut self, layout: Option<Box<dyn Layout>>) -> Option<Box<dyn Layout>> {
        let previous = mem::replace(&mut self.layout, layout);
        self.tasks.retain(|task| *task != Task::Reflow);
        self.layout_total = None;
        self.repeater.set_measure_children(self.layout.is_some());

        if self.layout.is_some() {
            rdebug!("ScrollCoordinator::set_layout");
            let window = self.repeater.window();
            if window.is_unbounded() {
                // Nothing is rendered until the layout reports its first range.
                self.repeater.set_window(Window::new(window.first, 0));
            }
            self.repeater.request_remeasure();
            self.tasks.schedule(Task::UpdateView);
        } else {
            self.repeater.set_window(Window::ALL);
            self.repeater.set_incremental(false);
            self.positions.clear();
        }
        self.sync_render();
        previous
    }

    /// Registers the listener for settled windows.
    pub fn on_range_change(&mut self, f: Option<impl Fn(VisibleRange) + 'static>) {
        self.on_range_change = f.map(|f| Rc::new(f) as _);
    }

    /// Call when the observed scroller scrolled.
    pub fn handle_scroll(&mut self) {
        self.invalidate_view();
    }

    /// Call when the container or the scroller changed size.
    pub fn handle_resize(&mut self) {
        self.invalidate_view();
    }

    fn invalidate_view(&mut self) {
        self.tasks.schedule(Task::UpdateView);
        self.sync_render();
    }

    /// `false` while the container is detached or not laid out.
    pub fn is_visible(&self) -> bool {
        self.repeater
            .container()
            .is_some_and(|c| c.bounding_rect().is_laid_out())
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.is_idle()
    }

    /// The last scroll size reported by the layout.
    pub fn scroll_size(&self) -> Option<Size> {
        self.scroll_size
    }

    fn sync_render(&mut self) {
        if self.repeater.is_render_pending() {
            self.tasks.schedule(Task::Render);
        }
    }

    /// Runs queued work until the queue is empty.
    ///
    /// Returns the number of tasks run.
    pub fn flush(&mut self) -> usize {
        self.sync_render();
        let mut ran = 0usize;
        while !self.tasks.is_idle() {
            if ran >= MAX_FLUSH_TASKS {
                rwarn!(
                    pending = self.tasks.len(),
                    "ScrollCoordinator::flush: layout did not settle"
                );
                break;
            }
            let Some(task) = self.tasks.pop() else {
                break;
            };
            ran += 1;
            self.run(task);
        }
        ran
    }

    fn run(&mut self, task: Task<Ct::Child>) {
        match task {
            Task::Render => self.render(),
            Task::Measure(batch) => self.measure(batch),
            Task::Reflow => self.reflow(),
            Task::UpdateView => self.update_view(),
            Task::ApplyPositions => self.apply_positions(),
        }
    }

    fn render(&mut self) {
        if !self.is_visible() {
            rtrace!("ScrollCoordinator: render skipped, container not laid out");
            return;
        }
        if let Some(layout) = self.layout.as_mut() {
            let total = self.repeater.items().len();
            if self.layout_total != Some(total) {
                layout.set_total_items(total);
                self.layout_total = Some(total);
                self.tasks.schedule(Task::Reflow);
            }
        }

        let pass = self.repeater.render();
        if pass.stats.assigned > 0 && !self.positions.is_empty() {
            self.tasks.schedule(Task::ApplyPositions);
        }
        if let Some(batch) = pass.measure {
            self.tasks.schedule(Task::Measure(batch));
        }
        if mem::take(&mut self.notify_stable) {
            self.emit_stable();
        }
    }

    fn emit_stable(&mut self) {
        let Some(range) = self.repeater.committed_range() else {
            return;
        };
        if self.notified == Some(range) {
            return;
        }
        self.notified = Some(range);
        rdebug!(
            first = range.first,
            last = range.last,
            "ScrollCoordinator: range settled"
        );
        if let Some(callback) = self.on_range_change.clone() {
            callback(range);
        }
    }

    fn measure(&mut self, batch: MeasureBatch<Ct::Child>) {
        if !self.is_visible() {
            self.repeater.request_remeasure();
            return;
        }
        let sizes = self.repeater.measure(&batch);
        if sizes.is_empty() {
            return;
        }
        rtrace!(count = sizes.len(), "ScrollCoordinator: measured children");
        if let Some(callback) = self.repeater.options().measure.clone() {
            callback(&sizes);
        }
        if let Some(layout) = self.layout.as_mut() {
            layout.update_item_sizes(&sizes);
            self.tasks.schedule(Task::Reflow);
        }
    }

    fn reflow(&mut self) {
        if !self.is_visible() {
            return;
        }
        let Some(layout) = self.layout.as_mut() else {
            return;
        };
        let mut events = Vec::new();
        layout.reflow(&mut |event| events.push(event));
        for event in events {
            self.handle_layout_event(event);
        }
    }

    fn handle_layout_event(&mut self, event: LayoutEvent) {
        match event {
            LayoutEvent::ScrollSizeChange(size) => {
                self.scroll_size = Some(size);
                if let Some(container) = self.repeater.container_mut() {
                    container.set_min_size(Some(size));
                }
            }
            LayoutEvent::ScrollErrorChange(delta) => {
                rtrace!(top = delta.top, left = delta.left, "ScrollCoordinator: scroll error");
                if let Some(container) = self.repeater.container_mut() {
                    container.correct_scroll(delta);
                }
            }
            LayoutEvent::ItemPositionChange(positions) => {
                self.positions = positions;
                self.tasks.schedule(Task::ApplyPositions);
            }
            LayoutEvent::RangeChange(change) => self.apply_range_change(change),
        }
    }

    fn apply_range_change(&mut self, change: RangeChange) {
        rtrace!(
            first = change.first,
            num = change.num,
            stable = change.stable,
            remeasure = change.remeasure,
            "ScrollCoordinator: range change"
        );
        let window = change.window();
        self.repeater.set_window(window);
        if change.remeasure {
            self.repeater.request_remeasure();
        }
        self.repeater.set_incremental(!change.stable);

        if change.stable {
            self.notify_stable = true;
            self.tasks.schedule(Task::Render);
        } else {
            let len = self.repeater.items().len();
            if self.notified.is_some() && self.notified != window.resolve(len) {
                self.notified = None;
            }
        }
        self.sync_render();
    }

    fn apply_positions(&mut self) {
        let Some(range) = self.repeater.committed_range() else {
            return;
        };
        let placed: Vec<(Ct::Child, Position)> = self
            .positions
            .range(range.first..=range.last)
            .filter_map(|(index, position)| {
                self.repeater
                    .child_at(*index)
                    .map(|child| (child.clone(), *position))
            })
            .collect();
        if let Some(container) = self.repeater.container_mut() {
            for (child, position) in &placed {
                container.position_child(child, *position);
            }
        }
    }

    fn update_view(&mut self) {
        if !self.is_visible() {
            return;
        }
        let (Some(layout), Some(container)) = (self.layout.as_mut(), self.repeater.container())
        else {
            return;
        };
        let (size, position) = visible_viewport(
            layout.direction(),
            container.bounding_rect(),
            container.scroll_viewport(),
        );
        rtrace!(
            width = size.width,
            height = size.height,
            top = position.top,
            left = position.left,
            "ScrollCoordinator: view"
        );
        layout.set_viewport_size(size);
        layout.scroll_to(position);
        self.tasks.schedule(Task::Reflow);
    }
}

impl<T, Ct: ScrollHost, K> core::fmt::Debug for ScrollCoordinator<T, Ct, K>
where
    Ct::Child: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollCoordinator")
            .field("repeater", &self.repeater)
            .field("has_layout", &self.layout.is_some())
            .field("pending_tasks", &self.tasks.len())
            .field("scroll_size", &self.scroll_size)
            .field("notified", &self.notified)
            .finish_non_exhaustive()
    }
}

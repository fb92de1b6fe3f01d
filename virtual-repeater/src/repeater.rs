use alloc::collections::{BTreeMap, VecDeque};
use alloc::rc::Rc;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::mem;

use crate::key::{HandleKey, IdentityMap};
use crate::options::NewChildCallback;
use crate::{
    Container, ItemKey, RenderStats, RepeaterOptions, Size, VisibleRange, Window,
};

/// Children to measure once a render has been committed, with the index each was bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeasureBatch<C> {
    entries: Vec<(usize, C)>,
}

impl<C> MeasureBatch<C> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &(usize, C)> {
        self.entries.iter()
    }

    pub fn indexes(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|(i, _)| *i)
    }
}

/// Outcome of [`Repeater::render`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderPass<C> {
    pub stats: RenderStats,
    /// Present when the pass produced children that need measuring.
    pub measure: Option<MeasureBatch<C>>,
}

impl<C> Default for RenderPass<C> {
    fn default() -> Self {
        Self {
            stats: RenderStats::default(),
            measure: None,
        }
    }
}

/// A child that left the window but still holds its identity.
#[derive(Debug)]
struct Retired<T> {
    index: usize,
    /// The item list the index refers to.
    items: Arc<[T]>,
}

/// The reconciliation core: keeps the children of a container in sync with a window of items.
///
/// The repeater owns the index ↔ child ↔ key bookkeeping in side tables; child handles stay
/// opaque. Mutations only schedule work; [`Repeater::render`] (or [`Repeater::flush`]) applies
/// it in one pass.
///
/// Without a layout driving the window this is a keyed-diffing renderer of the whole list.
pub struct Repeater<T, Ct: Container, K = ItemKey> {
    options: RepeaterOptions<T, Ct::Child, K>,
    container: Option<Ct>,
    items: Arc<[T]>,
    /// The list the last committed render was built from.
    committed_items: Arc<[T]>,

    window: Window,
    committed: Option<VisibleRange>,

    ordered: VecDeque<Ct::Child>,
    active: IdentityMap<Ct::Child, usize>,
    prev_active: IdentityMap<Ct::Child, Retired<T>>,
    key_to_child: IdentityMap<K, Ct::Child>,
    child_to_key: IdentityMap<Ct::Child, K>,

    incremental: bool,
    needs_reset: bool,
    needs_remeasure: bool,
    render_pending: bool,
    measure_children: bool,
}

impl<T, Ct: Container> Default for Repeater<T, Ct, ItemKey> {
    fn default() -> Self {
        Self::new(RepeaterOptions::new())
    }
}

impl<T, Ct, K> Repeater<T, Ct, K>
where
    Ct: Container,
    K: HandleKey,
{
    /// Creates an inert repeater: no items, no container, nothing rendered.
    pub fn new(options: RepeaterOptions<T, Ct::Child, K>) -> Self {
        let empty: Arc<[T]> = Arc::from(Vec::new());
        Self {
            options,
            container: None,
            committed_items: Arc::clone(&empty),
            items: empty,
            window: Window::ALL,
            committed: None,
            ordered: VecDeque::new(),
            active: IdentityMap::new(),
            prev_active: IdentityMap::new(),
            key_to_child: IdentityMap::new(),
            child_to_key: IdentityMap::new(),
            incremental: false,
            needs_reset: false,
            needs_remeasure: false,
            render_pending: false,
            measure_children: false,
        }
    }

    pub fn options(&self) -> &RepeaterOptions<T, Ct::Child, K> {
        &self.options
    }

    /// Replaces every callback at once.
    ///
    /// The key cache survives unless `new_child` or `item_key` changed (compared by pointer).
    pub fn set_options(&mut self, options: RepeaterOptions<T, Ct::Child, K>) {
        let factory_unchanged = match (&self.options.new_child, &options.new_child) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        let key_unchanged = Rc::ptr_eq(&self.options.item_key, &options.item_key);
        let update_unchanged = match (&self.options.update_child, &options.update_child) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        self.options = options;

        if !factory_unchanged || !key_unchanged {
            self.clear_key_cache();
            self.request_reset();
        } else if !update_unchanged {
            self.request_reset();
        } else {
            self.schedule_render();
        }
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut RepeaterOptions<T, Ct::Child, K>)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn set_new_child(&mut self, f: impl Fn(&T, usize) -> Ct::Child + 'static) {
        self.options.new_child = Some(Rc::new(f));
        self.clear_key_cache();
        self.request_reset();
    }

    pub fn set_update_child(&mut self, f: Option<impl Fn(&Ct::Child, &T, usize) + 'static>) {
        self.options.update_child = f.map(|f| Rc::new(f) as _);
        self.request_reset();
    }

    pub fn set_recycle_child(&mut self, f: Option<impl Fn(&Ct::Child, &T, usize) + 'static>) {
        self.options.recycle_child = f.map(|f| Rc::new(f) as _);
        self.schedule_render();
    }

    pub fn set_item_key(&mut self, f: impl Fn(&T) -> K + 'static) {
        self.options.item_key = Rc::new(move |item, _| f(item));
        self.clear_key_cache();
        self.request_reset();
    }

    pub fn set_measure_callback(&mut self, f: Option<impl Fn(&BTreeMap<usize, Size>) + 'static>) {
        self.options.measure = f.map(|f| Rc::new(f) as _);
        self.schedule_render();
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn set_items(&mut self, items: impl Into<Arc<[T]>>) {
        self.items = items.into();
        rtrace!(len = self.items.len(), "Repeater::set_items");
        self.request_reset();
    }

    pub fn container(&self) -> Option<&Ct> {
        self.container.as_ref()
    }

    pub fn container_mut(&mut self) -> Option<&mut Ct> {
        self.container.as_mut()
    }

    /// Swaps the container and returns the previous one.
    ///
    /// Every child managed in the previous container is removed from it first. Passing `None`
    /// is the way to tear the repeater down.
    pub fn set_container(&mut self, container: Option<Ct>) -> Option<Ct> {
        let mut previous = mem::replace(&mut self.container, container);
        if let Some(previous) = previous.as_mut() {
            self.teardown(previous);
        }
        if previous.is_some() || self.container.is_some() {
            self.request_reset();
        }
        previous
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn set_window(&mut self, window: Window) {
        if self.window == window {
            return;
        }
        rtrace!(first = window.first, num = window.num, "Repeater::set_window");
        self.window = window;
        self.schedule_render();
    }

    pub fn set_first(&mut self, first: usize) {
        self.set_window(Window::new(first, self.window.num));
    }

    pub fn set_num(&mut self, num: usize) {
        self.set_window(Window::new(self.window.first, num));
    }

    pub fn incremental(&self) -> bool {
        self.incremental
    }

    /// In incremental mode children leaving the window keep their identity until a
    /// non-incremental render, so an oscillating window reuses them.
    pub fn set_incremental(&mut self, incremental: bool) {
        self.incremental = incremental;
    }

    /// Treats the whole window as stale on the next render.
    pub fn request_reset(&mut self) {
        self.needs_reset = true;
        self.schedule_render();
    }

    /// Marks previous measurements stale without churning children.
    pub fn request_remeasure(&mut self) {
        self.needs_remeasure = true;
        self.schedule_render();
    }

    pub fn should_render(&self) -> bool {
        self.container.is_some() && self.options.new_child.is_some()
    }

    pub fn is_render_pending(&self) -> bool {
        self.render_pending
    }

    fn schedule_render(&mut self) {
        self.render_pending = true;
    }

    pub(crate) fn set_measure_children(&mut self, measure: bool) {
        self.measure_children = measure;
    }

    fn measures(&self) -> bool {
        self.measure_children || self.options.measure.is_some()
    }

    fn clear_key_cache(&mut self) {
        self.key_to_child.clear();
        self.child_to_key.clear();
    }

    /// Children in display order; after a render this is exactly the committed range.
    pub fn ordered(&self) -> impl ExactSizeIterator<Item = &Ct::Child> {
        self.ordered.iter()
    }

    pub fn child_at(&self, index: usize) -> Option<&Ct::Child> {
        let range = self.committed?;
        if !range.contains(index) {
            return None;
        }
        self.ordered.get(index - range.first)
    }

    pub fn index_of(&self, child: &Ct::Child) -> Option<usize> {
        self.active.get(child).copied()
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Children that left the window but may still be reused by key.
    pub fn pooled_len(&self) -> usize {
        self.prev_active.len()
    }

    pub fn is_pooled(&self, child: &Ct::Child) -> bool {
        self.prev_active.contains_key(child)
    }

    pub fn key_cache_len(&self) -> usize {
        self.key_to_child.len()
    }

    pub fn committed_range(&self) -> Option<VisibleRange> {
        self.committed
    }

    /// Runs a pending render, then measures the children it produced and hands the sizes to the
    /// measure callback.
    ///
    /// Returns `false` when nothing was pending.
    pub fn flush(&mut self) -> bool {
        if !self.render_pending {
            return false;
        }
        let pass = self.render();
        if let (Some(batch), Some(callback)) = (pass.measure, self.options.measure.clone()) {
            let sizes = self.measure(&batch);
            callback(&sizes);
        }
        true
    }

    /// Reads sizes for a batch produced by an earlier render.
    ///
    /// Children that were unassigned or rebound since then are skipped.
    pub fn measure(&self, batch: &MeasureBatch<Ct::Child>) -> BTreeMap<usize, Size> {
        let mut sizes = BTreeMap::new();
        let Some(container) = self.container.as_ref() else {
            return sizes;
        };
        for (index, child) in batch.iter() {
            if self.active.get(child) == Some(index) {
                sizes.insert(*index, container.measure_child(child));
            }
        }
        sizes
    }

    /// Reconciles the children with the current window.
    pub fn render(&mut self) -> RenderPass<Ct::Child> {
        self.render_pending = false;
        let Some(factory) = self.options.new_child.clone() else {
            return RenderPass::default();
        };
        if self.container.is_none() {
            return RenderPass::default();
        }

        let len = self.items.len();
        if self.window.num > 0 && len > 0 && self.window.first >= len {
            rwarn!(
                first = self.window.first,
                len,
                "Repeater: window starts past the end of the items"
            );
        }

        let next = self.window.resolve(len);
        let prev = self.committed;
        let range_changed = next != prev;
        let mut stats = RenderStats::default();

        if range_changed || self.needs_reset {
            match (prev, next) {
                (Some(prev), Some(next)) if !self.needs_reset => {
                    self.shift(prev, next, &factory, &mut stats);
                }
                _ => self.reset(next, &factory, &mut stats),
            }
        }

        let measure = if range_changed || self.needs_reset || self.needs_remeasure {
            next.filter(|_| self.measures())
                .map(|next| self.measure_batch(next, prev))
                .filter(|batch| !batch.is_empty())
        } else {
            None
        };

        if !self.incremental {
            self.release_retired(&mut stats);
        }

        self.committed = next;
        self.committed_items = Arc::clone(&self.items);
        self.needs_reset = false;
        self.needs_remeasure = false;

        rdebug!(
            created = stats.created,
            assigned = stats.assigned,
            unassigned = stats.unassigned,
            released = stats.released,
            moved = stats.moved,
            "Repeater::render"
        );
        debug_assert_eq!(self.ordered.len(), next.map_or(0, |r| r.len()));
        debug_assert_eq!(self.active.len(), self.ordered.len());

        RenderPass { stats, measure }
    }

    fn measure_batch(
        &self,
        next: VisibleRange,
        prev: Option<VisibleRange>,
    ) -> MeasureBatch<Ct::Child> {
        let all = self.needs_reset || self.needs_remeasure;
        let entries = self
            .ordered
            .iter()
            .enumerate()
            .filter_map(|(offset, child)| {
                let index = next.first + offset;
                let fresh = all || prev.is_none_or(|p| !p.contains(index));
                fresh.then(|| (index, child.clone()))
            })
            .collect();
        MeasureBatch { entries }
    }

    /// Rebuilds the whole window, reusing children by key and keeping container moves low:
    /// a child already sitting at the marker is not reinserted.
    fn reset(
        &mut self,
        next: Option<VisibleRange>,
        factory: &NewChildCallback<T, Ct::Child>,
        stats: &mut RenderStats,
    ) {
        let mut marker = self.ordered.front().cloned();
        self.ordered.clear();

        let previous: Vec<Ct::Child> = self.active.keys().cloned().collect();
        for (child, index) in mem::take(&mut self.active) {
            let items = Arc::clone(&self.committed_items);
            self.prev_active.insert(child, Retired { index, items });
        }

        if let Some(next) = next {
            for index in next.first..=next.last {
                let child = self.assign(index, factory, stats);
                if let Some(container) = self.container.as_mut() {
                    if marker.as_ref() == Some(&child) {
                        marker = container.next_sibling(&child);
                    } else {
                        container.insert_before(&child, marker.as_ref());
                        stats.moved += 1;
                    }
                }
                self.ordered.push_back(child);
            }
        }

        // Former children that were not picked up again leave the window.
        for child in previous {
            if self.prev_active.contains_key(&child) {
                if let Some(container) = self.container.as_mut() {
                    container.set_child_visible(&child, false);
                }
                stats.unassigned += 1;
            }
        }
    }

    /// Moves the window by touching only the indexes that left or entered it.
    fn shift(
        &mut self,
        prev: VisibleRange,
        next: VisibleRange,
        factory: &NewChildCallback<T, Ct::Child>,
        stats: &mut RenderStats,
    ) {
        let head = next.first.saturating_sub(prev.first).min(self.ordered.len());
        for offset in 0..head {
            if let Some(child) = self.ordered.pop_front() {
                self.unassign(child, prev.first + offset, stats);
            }
        }

        let tail = prev.last.saturating_sub(next.last).min(self.ordered.len());
        for offset in 0..tail {
            if let Some(child) = self.ordered.pop_back() {
                self.unassign(child, prev.last - offset, stats);
            }
        }

        if next.first < prev.first {
            let end = next.last.min(prev.first - 1);
            for index in (next.first..=end).rev() {
                let child = self.assign(index, factory, stats);
                let before = self.ordered.front().cloned();
                if let Some(container) = self.container.as_mut() {
                    container.insert_before(&child, before.as_ref());
                    stats.moved += 1;
                }
                self.ordered.push_front(child);
            }
        }

        if next.last > prev.last {
            let start = next.first.max(prev.last + 1);
            for index in start..=next.last {
                let child = self.assign(index, factory, stats);
                if let Some(container) = self.container.as_mut() {
                    let before = self
                        .ordered
                        .back()
                        .and_then(|last| container.next_sibling(last));
                    if before.as_ref() != Some(&child) {
                        container.insert_before(&child, before.as_ref());
                        stats.moved += 1;
                    }
                }
                self.ordered.push_back(child);
            }
        }
    }

    fn assign(
        &mut self,
        index: usize,
        factory: &NewChildCallback<T, Ct::Child>,
        stats: &mut RenderStats,
    ) -> Ct::Child {
        let items = Arc::clone(&self.items);
        let item = &items[index];
        let key = (self.options.item_key)(item, index);

        let child = match self.key_to_child.get(&key).cloned() {
            Some(child) => {
                if self.active.contains_key(&child) {
                    rwarn!(index, "Repeater: duplicate item key");
                }
                assert!(
                    !self.active.contains_key(&child),
                    "duplicate item key: index {index} resolves to a child that is already active"
                );
                self.prev_active.remove(&child);
                child
            }
            None => {
                let child = factory(item, index);
                stats.created += 1;
                self.key_to_child.insert(key.clone(), child.clone());
                self.child_to_key.insert(child.clone(), key);
                child
            }
        };

        if let Some(container) = self.container.as_mut() {
            container.set_child_visible(&child, true);
        }
        self.active.insert(child.clone(), index);
        if let Some(update) = &self.options.update_child {
            update(&child, item, index);
        }
        stats.assigned += 1;
        child
    }

    fn unassign(&mut self, child: Ct::Child, index: usize, stats: &mut RenderStats) {
        self.active.remove(&child);
        if let Some(container) = self.container.as_mut() {
            container.set_child_visible(&child, false);
        }
        stats.unassigned += 1;

        let items = Arc::clone(&self.committed_items);
        if self.incremental {
            self.prev_active.insert(child, Retired { index, items });
        } else {
            self.release(child, index, &items, stats);
        }
    }

    fn release_retired(&mut self, stats: &mut RenderStats) {
        if self.prev_active.is_empty() {
            return;
        }
        for (child, retired) in mem::take(&mut self.prev_active) {
            self.release(child, retired.index, &retired.items, stats);
        }
    }

    /// Drops the identity of a child and hands it to the recycle callback, or removes it.
    fn release(&mut self, child: Ct::Child, index: usize, items: &[T], stats: &mut RenderStats) {
        if let Some(key) = self.child_to_key.remove(&child) {
            if self.key_to_child.get(&key) == Some(&child) {
                self.key_to_child.remove(&key);
            }
        }
        stats.released += 1;

        match (&self.options.recycle_child, items.get(index)) {
            (Some(recycle), Some(item)) => recycle(&child, item, index),
            _ => {
                if let Some(container) = self.container.as_mut() {
                    container.remove_child(&child);
                }
            }
        }
    }

    fn teardown(&mut self, container: &mut Ct) {
        rdebug!(
            active = self.active.len(),
            pooled = self.prev_active.len(),
            "Repeater::teardown"
        );
        for child in self.ordered.drain(..) {
            container.remove_child(&child);
        }
        for (child, _) in mem::take(&mut self.prev_active) {
            container.remove_child(&child);
        }
        self.active.clear();
        self.clear_key_cache();
        self.committed = None;
    }
}

impl<T, Ct: Container, K> core::fmt::Debug for Repeater<T, Ct, K>
where
    Ct::Child: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Repeater")
            .field("options", &self.options)
            .field("len", &self.items.len())
            .field("window", &self.window)
            .field("committed", &self.committed)
            .field("ordered", &self.ordered)
            .field("pooled", &self.prev_active.len())
            .field("incremental", &self.incremental)
            .field("needs_reset", &self.needs_reset)
            .field("needs_remeasure", &self.needs_remeasure)
            .field("render_pending", &self.render_pending)
            .finish_non_exhaustive()
    }
}

use crate::*;

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        debug_assert!(start < end_exclusive);
        let span = (end_exclusive - start) as u64;
        start + (self.next_u64() % span) as usize
    }

    fn gen_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

#[derive(Default)]
struct Probe {
    ids: NodeIds,
    /// Last item each node was bound to.
    bound: Rc<RefCell<BTreeMap<NodeId, u32>>>,
}

fn instrument<K: HandleKey>(
    options: RepeaterOptions<u32, NodeId, K>,
) -> (RepeaterOptions<u32, NodeId, K>, Probe) {
    let probe = Probe::default();
    let ids = probe.ids.clone();
    let bound = Rc::clone(&probe.bound);
    let options = options
        .with_new_child(move |_: &u32, _: usize| ids.next())
        .with_update_child(Some(move |node: &NodeId, item: &u32, _: usize| {
            bound.borrow_mut().insert(*node, *item);
        }));
    (options, probe)
}

fn list_container() -> HeadlessContainer {
    HeadlessContainer::new(Rect::new(0, 0, 100, 100), Rect::new(0, 0, 100, 100))
        .with_child_size(Size::new(100, 10))
}

fn items(len: usize) -> Vec<u32> {
    (0..len as u32).collect()
}

fn repeater(len: usize) -> (Repeater<u32, HeadlessContainer>, Probe) {
    let (options, probe) = instrument(RepeaterOptions::new());
    let mut r = Repeater::new(options);
    r.set_container(Some(list_container()));
    r.set_items(items(len));
    (r, probe)
}

fn keyed_repeater(values: Vec<u32>) -> (Repeater<u32, HeadlessContainer, u64>, Probe) {
    let (options, probe) =
        instrument(RepeaterOptions::new_with_key(|item: &u32, _| u64::from(*item)));
    let mut r = Repeater::new(options);
    r.set_container(Some(list_container()));
    r.set_items(values);
    (r, probe)
}

fn rendered<K: HandleKey>(r: &Repeater<u32, HeadlessContainer, K>) -> Vec<usize> {
    r.ordered()
        .map(|child| r.index_of(child).expect("ordered child is active"))
        .collect()
}

fn indexes(range: core::ops::Range<usize>) -> Vec<usize> {
    range.collect()
}

/// Checks a flushed repeater against its window and its container.
fn assert_consistent<K: HandleKey>(r: &Repeater<u32, HeadlessContainer, K>) {
    let len = r.items().len();
    let expected = r
        .window()
        .resolve(len)
        .map_or_else(Vec::new, |range| (range.first..=range.last).collect());
    assert_eq!(rendered(r), expected);
    assert_eq!(r.committed_range(), r.window().resolve(len));

    let ordered: Vec<NodeId> = r.ordered().copied().collect();
    for child in &ordered {
        assert!(!r.is_pooled(child));
    }
    let mut unique = ordered.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ordered.len());

    let container = r.container().expect("container");
    assert_eq!(container.visible_nodes(), ordered);
    assert_eq!(container.nodes().len(), r.active_len() + r.pooled_len());
}

#[test]
fn renders_window_in_container_order() {
    let (mut r, probe) = repeater(100);
    r.set_window(Window::new(0, 10));
    assert!(r.flush());

    assert_eq!(rendered(&r), indexes(0..10));
    assert_eq!(probe.ids.issued(), 10);
    assert_consistent(&r);
    assert!(!r.flush());
}

#[test]
fn window_shift_touches_only_the_delta() {
    let (mut r, probe) = repeater(100);
    r.set_window(Window::new(0, 10));
    r.flush();
    let kept: Vec<NodeId> = r.ordered().skip(5).copied().collect();

    r.set_first(5);
    let pass = r.render();

    assert_eq!(pass.stats.unassigned, 5);
    assert_eq!(pass.stats.assigned, 5);
    assert_eq!(pass.stats.created, 5);
    assert_eq!(pass.stats.released, 5);
    assert_eq!(rendered(&r), indexes(5..15));
    assert_eq!(r.ordered().take(5).copied().collect::<Vec<_>>(), kept);
    assert_eq!(probe.ids.issued(), 15);
    assert_consistent(&r);
}

#[test]
fn incremental_mode_keeps_displaced_children_for_reuse() {
    let (mut r, probe) = repeater(100);
    r.set_incremental(true);
    r.set_window(Window::new(0, 10));
    r.flush();
    let before: Vec<NodeId> = r.ordered().copied().collect();

    r.set_first(3);
    r.flush();
    assert_eq!(r.pooled_len(), 3);
    for child in &before[..3] {
        assert!(r.is_pooled(child));
        let container = r.container().expect("container");
        assert!(container.contains(child));
        assert!(container.is_hidden(*child));
    }
    assert_consistent(&r);

    r.set_first(0);
    let pass = r.render();
    assert_eq!(pass.stats.created, 0);
    assert_eq!(pass.stats.released, 0);
    assert_eq!(r.ordered().copied().collect::<Vec<_>>(), before);
    assert_eq!(r.pooled_len(), 3);
    assert_eq!(probe.ids.issued(), 13);
    assert_consistent(&r);

    r.set_incremental(false);
    let pass = r.render();
    assert_eq!(pass.stats.released, 3);
    assert_eq!(r.pooled_len(), 0);
    assert_consistent(&r);
}

#[test]
fn permutation_reuses_every_child_by_key() {
    let (mut r, probe) = keyed_repeater(vec![10, 20, 30, 40, 50]);
    r.flush();
    let by_item: BTreeMap<u32, NodeId> = probe
        .bound
        .borrow()
        .iter()
        .map(|(node, item)| (*item, *node))
        .collect();

    r.set_items(vec![50, 30, 10, 40, 20]);
    let pass = r.render();

    assert_eq!(pass.stats.created, 0);
    assert_eq!(probe.ids.issued(), 5);
    for (offset, child) in r.ordered().enumerate() {
        let item = r.items()[offset];
        assert_eq!(by_item[&item], *child);
        assert_eq!(probe.bound.borrow()[child], item);
    }
    assert_consistent(&r);
}

#[test]
fn reset_moves_only_children_out_of_place() {
    let (mut r, probe) = keyed_repeater(vec![10, 20, 30, 40, 50]);
    r.flush();

    r.request_reset();
    let pass = r.render();
    assert_eq!(pass.stats.created, 0);
    assert_eq!(pass.stats.moved, 0);

    r.set_items(vec![5, 10, 20, 30, 40, 50]);
    let pass = r.render();
    assert_eq!(pass.stats.created, 1);
    assert_eq!(pass.stats.moved, 1);
    assert_eq!(probe.ids.issued(), 6);
    assert_consistent(&r);
}

#[test]
fn mutations_coalesce_into_one_render() {
    let (mut r, probe) = repeater(50);
    r.set_window(Window::new(0, 10));
    r.set_first(20);
    r.set_num(5);
    r.set_items(items(60));
    assert!(r.is_render_pending());

    assert!(r.flush());
    assert_eq!(probe.ids.issued(), 5);
    assert_eq!(rendered(&r), indexes(20..25));
    assert!(!r.flush());
}

#[test]
fn window_past_the_end_renders_nothing() {
    let (mut r, probe) = repeater(10);
    r.set_window(Window::new(15, 5));
    r.flush();

    assert_eq!(r.ordered().len(), 0);
    assert_eq!(r.committed_range(), None);
    assert_eq!(probe.ids.issued(), 0);

    r.set_items(items(20));
    r.flush();
    assert_eq!(rendered(&r), indexes(15..20));
}

#[test]
fn measure_callback_sees_only_fresh_indexes() {
    let (mut r, _probe) = repeater(100);
    let measured: Rc<RefCell<Vec<Vec<usize>>>> = Rc::default();
    let sink = Rc::clone(&measured);
    r.set_measure_callback(Some(move |sizes: &BTreeMap<usize, Size>| {
        assert!(sizes.values().all(|size| *size == Size::new(100, 10)));
        sink.borrow_mut().push(sizes.keys().copied().collect());
    }));

    r.set_window(Window::new(0, 10));
    r.flush();
    r.set_first(5);
    r.flush();
    r.request_remeasure();
    r.flush();

    assert_eq!(
        *measured.borrow(),
        vec![indexes(0..10), indexes(10..15), indexes(5..15)]
    );
}

#[test]
fn stale_measure_batch_skips_unassigned_children() {
    let (mut r, _probe) = repeater(100);
    r.set_measure_callback(Some(|_: &BTreeMap<usize, Size>| {}));
    r.set_window(Window::new(0, 10));
    let batch = r.render().measure.expect("fresh children are measured");
    assert_eq!(batch.len(), 10);

    r.set_first(5);
    r.render();
    let sizes = r.measure(&batch);
    assert_eq!(sizes.keys().copied().collect::<Vec<_>>(), indexes(5..10));
}

#[test]
fn changing_item_key_drops_the_key_cache() {
    let (mut r, probe) = keyed_repeater(items(10));
    r.flush();
    assert_eq!(r.key_cache_len(), 10);

    r.set_item_key(|item: &u32| u64::from(*item) + 1_000);
    let pass = r.render();

    assert_eq!(pass.stats.created, 10);
    assert_eq!(pass.stats.released, 10);
    assert_eq!(probe.ids.issued(), 20);
    assert_eq!(r.key_cache_len(), 10);
    assert_eq!(r.container().expect("container").nodes().len(), 10);
    assert_consistent(&r);
}

#[test]
fn same_options_keep_children() {
    let (mut r, probe) = repeater(20);
    r.set_window(Window::new(0, 10));
    r.flush();

    r.set_options(r.options().clone());
    let pass = r.render();
    assert_eq!(pass.stats, RenderStats::default());

    r.update_options(|options| options.update_child = None);
    let pass = r.render();
    assert_eq!(pass.stats.created, 0);
    assert_eq!(pass.stats.assigned, 10);
    assert_eq!(probe.ids.issued(), 10);
}

#[test]
fn released_children_go_to_the_recycle_callback() {
    let (mut r, _probe) = repeater(50);
    let recycled: Rc<RefCell<Vec<(NodeId, u32, usize)>>> = Rc::default();
    let sink = Rc::clone(&recycled);
    r.set_recycle_child(Some(move |node: &NodeId, item: &u32, index: usize| {
        sink.borrow_mut().push((*node, *item, index));
    }));
    r.set_window(Window::new(0, 10));
    r.flush();
    let leaving: Vec<NodeId> = r.ordered().take(5).copied().collect();

    r.set_first(5);
    r.flush();

    let recycled = recycled.borrow();
    assert_eq!(
        recycled.iter().map(|(node, _, _)| *node).collect::<Vec<_>>(),
        leaving
    );
    assert_eq!(
        recycled
            .iter()
            .map(|(_, item, index)| (*item, *index))
            .collect::<Vec<_>>(),
        (0..5).map(|i| (i as u32, i)).collect::<Vec<_>>()
    );
    let container = r.container().expect("container");
    assert_eq!(container.nodes().len(), 15);
    assert_eq!(container.visible_nodes().len(), 10);
    assert!(leaving.iter().all(|node| container.is_hidden(*node)));
}

#[test]
fn clearing_the_container_tears_everything_down() {
    let (mut r, _probe) = repeater(20);
    r.set_incremental(true);
    r.set_window(Window::new(0, 10));
    r.flush();
    r.set_first(3);
    r.flush();
    assert_eq!(r.pooled_len(), 3);

    let old = r.set_container(None).expect("previous container");
    assert!(old.nodes().is_empty());
    assert_eq!(r.active_len(), 0);
    assert_eq!(r.pooled_len(), 0);
    assert_eq!(r.key_cache_len(), 0);
    assert_eq!(r.committed_range(), None);
    assert!(!r.should_render());

    r.flush();
    assert_eq!(r.ordered().len(), 0);

    r.set_container(Some(list_container()));
    r.flush();
    assert_consistent(&r);
}

#[test]
fn foreign_siblings_are_left_alone() {
    let (mut r, _probe) = repeater(20);
    let foreign = NodeId(u64::MAX);
    r.container_mut().expect("container").append_foreign(foreign);
    r.set_window(Window::new(0, 5));
    r.flush();
    r.set_first(2);
    r.flush();
    r.request_reset();
    r.flush();

    let container = r.container().expect("container");
    assert!(container.contains(&foreign));
    let ordered: Vec<NodeId> = r.ordered().copied().collect();
    let managed: Vec<NodeId> = container
        .visible_nodes()
        .into_iter()
        .filter(|node| *node != foreign)
        .collect();
    assert_eq!(managed, ordered);
}

#[test]
#[should_panic(expected = "duplicate item key")]
fn duplicate_keys_are_fatal() {
    let (mut r, _probe) = keyed_repeater(vec![1, 2, 1]);
    r.render();
}

#[test]
fn random_walk_keeps_container_in_sync() {
    let mut rng = Lcg::new(0x5eed_1234);
    let mut len = 200usize;
    let (mut r, _probe) = keyed_repeater(items(len));

    for _ in 0..600 {
        match rng.gen_range_usize(0, 10) {
            0 => r.set_incremental(rng.gen_bool()),
            1 => r.request_reset(),
            2 => {
                len = rng.gen_range_usize(0, 250);
                r.set_items(items(len));
            }
            3 => {
                let mut values = items(len);
                for i in (1..values.len()).rev() {
                    let j = rng.gen_range_usize(0, i + 1);
                    values.swap(i, j);
                }
                r.set_items(values);
            }
            _ => {
                let first = rng.gen_range_usize(0, len + 5);
                let num = rng.gen_range_usize(0, 40);
                r.set_window(Window::new(first, num));
            }
        }
        r.flush();
        assert_consistent(&r);
    }
}

// Coordinator

#[derive(Default)]
struct LayoutLog {
    totals: RefCell<Vec<usize>>,
    views: RefCell<Vec<(Size, Position)>>,
    sizes: RefCell<BTreeMap<usize, Size>>,
    pending: RefCell<Vec<LayoutEvent>>,
    reflows: Cell<usize>,
}

/// Records its inputs and replays whatever the test queued on the next reflow.
struct StubLayout {
    log: Rc<LayoutLog>,
    viewport: Size,
}

impl Layout for StubLayout {
    fn direction(&self) -> Direction {
        Direction::Vertical
    }

    fn set_total_items(&mut self, total: usize) {
        self.log.totals.borrow_mut().push(total);
    }

    fn set_viewport_size(&mut self, size: Size) {
        self.viewport = size;
    }

    fn scroll_to(&mut self, position: Position) {
        self.log.views.borrow_mut().push((self.viewport, position));
    }

    fn update_item_sizes(&mut self, sizes: &BTreeMap<usize, Size>) {
        self.log.sizes.borrow_mut().extend(sizes.iter().map(|(i, s)| (*i, *s)));
    }

    fn reflow(&mut self, emit: &mut dyn FnMut(LayoutEvent)) {
        self.log.reflows.set(self.log.reflows.get() + 1);
        let events: Vec<LayoutEvent> = self.log.pending.borrow_mut().drain(..).collect();
        for event in events {
            emit(event);
        }
    }
}

/// Moves the window on every reflow and never settles.
struct RestlessLayout {
    step: usize,
}

impl Layout for RestlessLayout {
    fn direction(&self) -> Direction {
        Direction::Vertical
    }

    fn set_total_items(&mut self, _total: usize) {}

    fn set_viewport_size(&mut self, _size: Size) {}

    fn scroll_to(&mut self, _position: Position) {}

    fn reflow(&mut self, emit: &mut dyn FnMut(LayoutEvent)) {
        self.step += 1;
        emit(LayoutEvent::RangeChange(RangeChange {
            first: self.step % 50,
            num: 5,
            stable: false,
            remeasure: false,
        }));
    }
}

fn stub(log: &Rc<LayoutLog>) -> Box<dyn Layout> {
    Box::new(StubLayout {
        log: Rc::clone(log),
        viewport: Size::default(),
    })
}

fn bare_coordinator(container: HeadlessContainer, len: usize) -> ScrollCoordinator<u32, HeadlessContainer> {
    let ids = NodeIds::new();
    let mut c = ScrollCoordinator::new(
        RepeaterOptions::new().with_new_child(move |_: &u32, _: usize| ids.next()),
    );
    c.set_container(Some(container));
    c.set_items(items(len));
    c
}

fn coordinator(len: usize) -> (ScrollCoordinator<u32, HeadlessContainer>, Rc<LayoutLog>) {
    let mut c = bare_coordinator(list_container(), len);
    let log = Rc::new(LayoutLog::default());
    c.set_layout(Some(stub(&log)));
    (c, log)
}

fn range(first: usize, num: usize, stable: bool) -> LayoutEvent {
    LayoutEvent::RangeChange(RangeChange {
        first,
        num,
        stable,
        remeasure: false,
    })
}

fn reply(
    c: &mut ScrollCoordinator<u32, HeadlessContainer>,
    log: &LayoutLog,
    events: impl IntoIterator<Item = LayoutEvent>,
) {
    log.pending.borrow_mut().extend(events);
    c.handle_scroll();
    c.flush();
}

#[test]
fn nothing_renders_before_the_layout_reports_a_range() {
    let (mut c, log) = coordinator(100);
    c.flush();

    assert!(c.is_idle());
    assert_eq!(c.repeater().ordered().len(), 0);
    assert_eq!(*log.totals.borrow(), vec![100]);
    assert_eq!(
        log.views.borrow().last().copied(),
        Some((Size::new(100, 100), Position::default()))
    );
    assert!(c.container().expect("container").is_observed());
}

#[test]
fn layout_range_renders_then_positions_children() {
    let (mut c, log) = coordinator(100);
    c.flush();

    let positions: BTreeMap<usize, Position> = (0..5)
        .map(|i| {
            (
                i,
                Position {
                    top: i as u64 * 10,
                    left: 0,
                },
            )
        })
        .collect();
    reply(
        &mut c,
        &log,
        [range(0, 5, false), LayoutEvent::ItemPositionChange(positions)],
    );

    let r = c.repeater();
    assert_eq!(rendered(r), indexes(0..5));
    assert!(r.incremental());
    let container = c.container().expect("container");
    for (index, child) in r.ordered().enumerate() {
        assert_eq!(
            container.position_of(*child),
            Some(Position {
                top: index as u64 * 10,
                left: 0
            })
        );
    }
    let sizes = log.sizes.borrow();
    assert_eq!(sizes.keys().copied().collect::<Vec<_>>(), indexes(0..5));
    assert_eq!(sizes[&0], Size::new(100, 10));
    assert!(c.is_idle());
}

#[test]
fn scroll_size_follows_container_swaps() {
    let (mut c, log) = coordinator(100);
    c.flush();
    reply(
        &mut c,
        &log,
        [LayoutEvent::ScrollSizeChange(Size::new(100, 5_000))],
    );

    assert_eq!(c.scroll_size(), Some(Size::new(100, 5_000)));
    assert_eq!(
        c.container().expect("container").min_size(),
        Some(Size::new(100, 5_000))
    );

    let old = c
        .set_container(Some(list_container()))
        .expect("previous container");
    assert_eq!(old.min_size(), None);
    assert!(!old.is_observed());
    let current = c.container().expect("container");
    assert_eq!(current.min_size(), Some(Size::new(100, 5_000)));
    assert!(current.is_observed());
}

#[test]
fn scroll_error_corrects_the_scroller() {
    let (mut c, log) = coordinator(100);
    c.flush();
    let error = ScrollError { top: 40, left: 0 };
    reply(&mut c, &log, [LayoutEvent::ScrollErrorChange(error)]);

    let container = c.container().expect("container");
    assert_eq!(container.scroll_corrections(), &[error]);
    assert_eq!(container.rect().top, -40);
}

#[test]
fn container_without_layout_box_defers_all_work() {
    let hidden = HeadlessContainer::new(Rect::default(), Rect::new(0, 0, 100, 100))
        .with_child_size(Size::new(100, 10));
    let mut c = bare_coordinator(hidden, 100);
    let log = Rc::new(LayoutLog::default());
    c.set_layout(Some(stub(&log)));
    c.flush();

    assert!(c.is_idle());
    assert!(log.totals.borrow().is_empty());
    assert!(log.views.borrow().is_empty());
    assert_eq!(log.reflows.get(), 0);
    assert_eq!(c.repeater().ordered().len(), 0);

    c.container_mut()
        .expect("container")
        .set_rect(Rect::new(0, 0, 100, 100));
    log.pending.borrow_mut().push(range(0, 5, true));
    c.handle_resize();
    c.flush();

    assert_eq!(*log.totals.borrow(), vec![100]);
    assert_eq!(rendered(c.repeater()), indexes(0..5));
}

#[test]
fn hiding_the_container_freezes_the_committed_window() {
    let (mut c, log) = coordinator(100);
    c.flush();
    reply(&mut c, &log, [range(0, 5, true)]);
    let reflows = log.reflows.get();

    c.container_mut().expect("container").set_rect(Rect::default());
    reply(&mut c, &log, [range(10, 5, true)]);
    assert_eq!(log.reflows.get(), reflows);
    assert_eq!(rendered(c.repeater()), indexes(0..5));

    c.container_mut()
        .expect("container")
        .set_rect(Rect::new(0, 0, 100, 100));
    c.handle_resize();
    c.flush();
    assert_eq!(rendered(c.repeater()), indexes(10..15));
}

#[test]
fn settled_range_is_reported_once() {
    let (mut c, log) = coordinator(100);
    let seen: Rc<RefCell<Vec<VisibleRange>>> = Rc::default();
    let sink = Rc::clone(&seen);
    c.on_range_change(Some(move |range: VisibleRange| sink.borrow_mut().push(range)));
    c.flush();

    reply(&mut c, &log, [range(0, 5, false)]);
    assert!(seen.borrow().is_empty());

    reply(&mut c, &log, [range(0, 5, true)]);
    reply(&mut c, &log, [range(0, 5, true)]);
    assert_eq!(*seen.borrow(), vec![VisibleRange { first: 0, last: 4 }]);

    reply(&mut c, &log, [range(3, 5, false)]);
    reply(&mut c, &log, [range(3, 5, true)]);
    assert_eq!(
        *seen.borrow(),
        vec![
            VisibleRange { first: 0, last: 4 },
            VisibleRange { first: 3, last: 7 }
        ]
    );
}

#[test]
fn unstable_ranges_keep_displaced_children_until_settled() {
    let (mut c, log) = coordinator(100);
    c.flush();
    reply(&mut c, &log, [range(0, 5, false)]);
    let first: Vec<NodeId> = c.repeater().ordered().copied().collect();

    reply(&mut c, &log, [range(2, 5, false)]);
    assert_eq!(c.repeater().pooled_len(), 2);
    assert!(c.repeater().is_pooled(&first[0]));
    assert!(c.repeater().is_pooled(&first[1]));

    reply(&mut c, &log, [range(0, 5, false)]);
    assert_eq!(c.repeater().ordered().copied().collect::<Vec<_>>(), first);

    reply(&mut c, &log, [range(2, 5, true)]);
    assert_eq!(c.repeater().pooled_len(), 0);
    assert_eq!(c.container().expect("container").nodes().len(), 5);
}

#[test]
fn replacing_the_layout_remeasures_rendered_children() {
    let (mut c, log) = coordinator(100);
    c.flush();
    reply(&mut c, &log, [range(0, 5, true)]);

    let next = Rc::new(LayoutLog::default());
    assert!(c.set_layout(Some(stub(&next))).is_some());
    log.pending.borrow_mut().push(range(50, 5, true));
    c.flush();

    assert_eq!(*next.totals.borrow(), vec![100]);
    assert_eq!(next.sizes.borrow().len(), 5);
    assert_eq!(rendered(c.repeater()), indexes(0..5));
}

#[test]
fn removing_the_layout_renders_every_item() {
    let (mut c, log) = coordinator(20);
    c.flush();
    reply(&mut c, &log, [range(0, 5, false)]);

    c.set_layout(None);
    c.flush();
    assert_eq!(rendered(c.repeater()), indexes(0..20));
    assert!(!c.repeater().incremental());
}

#[test]
fn flush_gives_up_on_a_layout_that_never_settles() {
    let mut c = bare_coordinator(list_container(), 100);
    c.set_layout(Some(Box::new(RestlessLayout { step: 0 })));

    assert_eq!(c.flush(), MAX_FLUSH_TASKS);
    assert!(!c.is_idle());
}

#[test]
fn viewport_is_the_covered_part_of_the_scroller() {
    let scroller = Rect::new(0, 0, 100, 100);

    let (size, position) =
        visible_viewport(Direction::Vertical, Rect::new(0, -250, 100, 5_000), scroller);
    assert_eq!(size, Size::new(100, 100));
    assert_eq!(position, Position { top: 250, left: 0 });

    let (size, position) =
        visible_viewport(Direction::Vertical, Rect::new(0, 40, 100, 5_000), scroller);
    assert_eq!(size, Size::new(100, 60));
    assert_eq!(position, Position::default());

    let (size, _) = visible_viewport(Direction::Vertical, Rect::new(20, 0, 50, 5_000), scroller);
    assert_eq!(size, Size::new(50, 100));

    let (size, position) = visible_viewport(
        Direction::Horizontal,
        Rect::new(-300, 0, 5_000, 80),
        Rect::new(0, 0, 200, 100),
    );
    assert_eq!(size, Size::new(200, 80));
    assert_eq!(position, Position { top: 0, left: 300 });
}

#[test]
fn window_resolves_against_the_item_count() {
    assert_eq!(Window::ALL.resolve(0), None);
    assert_eq!(Window::EMPTY.resolve(10), None);
    assert_eq!(
        Window::ALL.resolve(3),
        Some(VisibleRange { first: 0, last: 2 })
    );
    assert_eq!(
        Window::new(8, 5).resolve(10),
        Some(VisibleRange { first: 8, last: 9 })
    );
    assert_eq!(Window::new(10, 5).resolve(10), None);
}

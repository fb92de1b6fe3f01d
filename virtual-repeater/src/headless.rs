use alloc::collections::{BTreeMap, BTreeSet};
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use crate::{Container, Position, Rect, ScrollError, ScrollHost, Size};

/// Opaque handle of a node in a [`HeadlessContainer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u64);

/// A shared allocator for [`NodeId`]s, meant to be captured by a `new_child` factory.
#[derive(Clone, Debug, Default)]
pub struct NodeIds(Rc<Cell<u64>>);

impl NodeIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> NodeId {
        let id = self.0.get();
        self.0.set(id + 1);
        NodeId(id)
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.0.get()
    }
}

/// An in-memory [`ScrollHost`] for headless hosts, simulations and tests.
///
/// Geometry is driven by the host: set the container and viewport rects, and per-node sizes.
/// Scroll corrections move the container rect the way a real scroller would.
#[derive(Clone, Debug, Default)]
pub struct HeadlessContainer {
    nodes: Vec<NodeId>,
    hidden: BTreeSet<NodeId>,
    positions: BTreeMap<NodeId, Position>,
    sizes: BTreeMap<NodeId, Size>,
    default_child_size: Size,
    rect: Rect,
    viewport: Rect,
    min_size: Option<Size>,
    scroll_corrections: Vec<ScrollError>,
    observed: bool,
    insertions: usize,
}

impl HeadlessContainer {
    pub fn new(rect: Rect, viewport: Rect) -> Self {
        Self {
            rect,
            viewport,
            ..Self::default()
        }
    }

    /// Size reported for children without an explicit size.
    pub fn with_child_size(mut self, size: Size) -> Self {
        self.default_child_size = size;
        self
    }

    pub fn set_child_size(&mut self, node: NodeId, size: Size) {
        self.sizes.insert(node, size);
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Attached nodes that are not hidden, in container order.
    pub fn visible_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .copied()
            .filter(|n| !self.hidden.contains(n))
            .collect()
    }

    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.hidden.contains(&node)
    }

    pub fn position_of(&self, node: NodeId) -> Option<Position> {
        self.positions.get(&node).copied()
    }

    pub fn min_size(&self) -> Option<Size> {
        self.min_size
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    pub fn scroll_corrections(&self) -> &[ScrollError] {
        &self.scroll_corrections
    }

    pub fn is_observed(&self) -> bool {
        self.observed
    }

    /// Count of `insert_before` calls, moves included.
    pub fn insertions(&self) -> usize {
        self.insertions
    }

    /// Appends a node the engine does not manage (a foreign sibling).
    pub fn append_foreign(&mut self, node: NodeId) {
        self.nodes.push(node);
    }
}

impl Container for HeadlessContainer {
    type Child = NodeId;

    fn contains(&self, child: &NodeId) -> bool {
        self.nodes.contains(child)
    }

    fn next_sibling(&self, child: &NodeId) -> Option<NodeId> {
        let at = self.nodes.iter().position(|n| n == child)?;
        self.nodes.get(at + 1).copied()
    }

    fn insert_before(&mut self, child: &NodeId, before: Option<&NodeId>) {
        if before == Some(child) {
            return;
        }
        self.insertions += 1;
        self.nodes.retain(|n| n != child);
        let at = before
            .and_then(|b| self.nodes.iter().position(|n| n == b))
            .unwrap_or(self.nodes.len());
        self.nodes.insert(at, *child);
    }

    fn remove_child(&mut self, child: &NodeId) {
        self.nodes.retain(|n| n != child);
        self.hidden.remove(child);
        self.positions.remove(child);
    }

    fn set_child_visible(&mut self, child: &NodeId, visible: bool) {
        if visible {
            self.hidden.remove(child);
        } else {
            self.hidden.insert(*child);
        }
    }

    fn measure_child(&self, child: &NodeId) -> Size {
        self.sizes
            .get(child)
            .copied()
            .unwrap_or(self.default_child_size)
    }
}

impl ScrollHost for HeadlessContainer {
    fn bounding_rect(&self) -> Rect {
        self.rect
    }

    fn scroll_viewport(&self) -> Rect {
        self.viewport
    }

    fn set_min_size(&mut self, size: Option<Size>) {
        self.min_size = size;
    }

    fn correct_scroll(&mut self, delta: ScrollError) {
        self.rect.top -= delta.top;
        self.rect.left -= delta.left;
        self.scroll_corrections.push(delta);
    }

    fn position_child(&mut self, child: &NodeId, position: Position) {
        self.positions.insert(*child, position);
    }

    fn set_observed(&mut self, observed: bool) {
        self.observed = observed;
    }
}

use crate::key::HandleKey;
use crate::{Position, Rect, ScrollError, Size};

/// A DOM-like node that holds rendering handles.
///
/// The engine only ever inserts, moves, hides or removes the children it created itself.
/// Other nodes in the container are left alone, although [`Container::next_sibling`] may
/// return them.
pub trait Container {
    type Child: HandleKey;

    fn contains(&self, child: &Self::Child) -> bool;

    fn next_sibling(&self, child: &Self::Child) -> Option<Self::Child>;

    /// Inserts `child` before `before`, or at the end when `before` is `None`.
    ///
    /// An attached `child` is moved.
    fn insert_before(&mut self, child: &Self::Child, before: Option<&Self::Child>);

    fn remove_child(&mut self, child: &Self::Child);

    fn set_child_visible(&mut self, child: &Self::Child, visible: bool);

    /// Reads the committed box size of an attached child.
    fn measure_child(&self, child: &Self::Child) -> Size;
}

/// A container that lives inside a scrollable viewport.
pub trait ScrollHost: Container {
    /// The container's bounding box in viewport coordinates.
    fn bounding_rect(&self) -> Rect;

    /// The bounding box of the scroller the container is observed in.
    fn scroll_viewport(&self) -> Rect;

    /// Applies (or with `None`, clears) a minimum size so native scrollbars cover the total
    /// scrollable extent.
    ///
    /// Fragment-like containers (shadow roots) apply this to their host element.
    fn set_min_size(&mut self, size: Option<Size>);

    fn correct_scroll(&mut self, delta: ScrollError);

    fn position_child(&mut self, child: &Self::Child, position: Position);

    /// Starts or stops forwarding scroll/resize notifications for this container.
    fn set_observed(&mut self, observed: bool) {
        let _ = observed;
    }
}

use alloc::collections::BTreeMap;

pub type ItemKey = u64;

/// The requested slice of the item list: `num` items starting at `first`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Window {
    pub first: usize,
    pub num: usize,
}

impl Window {
    /// `num` value meaning "every remaining item".
    pub const UNBOUNDED: usize = usize::MAX;

    pub const ALL: Self = Self {
        first: 0,
        num: Self::UNBOUNDED,
    };

    pub const EMPTY: Self = Self { first: 0, num: 0 };

    pub fn new(first: usize, num: usize) -> Self {
        Self { first, num }
    }

    pub fn is_unbounded(&self) -> bool {
        self.num == Self::UNBOUNDED
    }

    /// Resolves the window against a list of `len` items.
    ///
    /// Returns `None` when nothing would be rendered.
    pub fn resolve(&self, len: usize) -> Option<VisibleRange> {
        if self.num == 0 || self.first >= len {
            return None;
        }
        let count = self.num.min(len - self.first);
        Some(VisibleRange {
            first: self.first,
            last: self.first + count - 1,
        })
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::ALL
    }
}

/// An inclusive index range of rendered items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleRange {
    pub first: usize,
    pub last: usize,
}

impl VisibleRange {
    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.first && index <= self.last
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub top: u64,
    pub left: u64,
}

/// A bounding box in host coordinates. The origin may be negative (scrolled out of view).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub left: i64,
    pub top: i64,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(left: i64, top: i64, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// `false` only for a box that was never laid out (zero extent at the origin).
    ///
    /// A zero-sized box that has an offset is still considered laid out.
    pub fn is_laid_out(&self) -> bool {
        !(self.width == 0 && self.height == 0 && self.top == 0 && self.left == 0)
    }
}

/// A scroll correction; positive values scroll forward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollError {
    pub top: i64,
    pub left: i64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    #[default]
    Vertical,
    Horizontal,
}

impl Direction {
    /// Extent along the scroll axis.
    pub fn main(self, size: Size) -> u32 {
        match self {
            Self::Vertical => size.height,
            Self::Horizontal => size.width,
        }
    }

    pub fn cross(self, size: Size) -> u32 {
        match self {
            Self::Vertical => size.width,
            Self::Horizontal => size.height,
        }
    }

    pub fn main_offset(self, position: Position) -> u64 {
        match self {
            Self::Vertical => position.top,
            Self::Horizontal => position.left,
        }
    }

    pub fn size(self, main: u32, cross: u32) -> Size {
        match self {
            Self::Vertical => Size::new(cross, main),
            Self::Horizontal => Size::new(main, cross),
        }
    }

    pub fn position(self, main: u64, cross: u64) -> Position {
        match self {
            Self::Vertical => Position {
                top: main,
                left: cross,
            },
            Self::Horizontal => Position {
                top: cross,
                left: main,
            },
        }
    }

    pub fn scroll_error(self, delta: i64) -> ScrollError {
        match self {
            Self::Vertical => ScrollError { top: delta, left: 0 },
            Self::Horizontal => ScrollError { top: 0, left: delta },
        }
    }
}

/// A window update reported by a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeChange {
    pub first: usize,
    pub num: usize,
    /// The layout will not move the window again without new input.
    pub stable: bool,
    /// Previously reported sizes are stale.
    pub remeasure: bool,
}

impl RangeChange {
    pub fn window(&self) -> Window {
        Window::new(self.first, self.num)
    }
}

/// Events a [`crate::Layout`] emits while reflowing.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutEvent {
    /// Total scrollable extent changed.
    ScrollSizeChange(Size),
    /// The real scroll position drifted from the estimate by this much.
    ScrollErrorChange(ScrollError),
    /// Offsets of items, keyed by index.
    ItemPositionChange(BTreeMap<usize, Position>),
    RangeChange(RangeChange),
}

/// Bookkeeping for one render pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderStats {
    /// Children produced by the factory.
    pub created: usize,
    /// Indexes bound to a child (created or reused).
    pub assigned: usize,
    /// Indexes that left the window.
    pub unassigned: usize,
    /// Children whose identity was released (recycled or removed).
    pub released: usize,
    /// Container insertions, including moves of attached children.
    pub moved: usize,
}

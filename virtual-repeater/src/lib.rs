//! A headless windowed-rendering engine.
//!
//! For the list facade and the compiled-in layout strategies, see the
//! `virtual-repeater-adapter` crate.
//!
//! The engine renders a bounded window of a potentially huge item list into a container,
//! recycling a small pool of child handles as the window slides:
//!
//! - [`Repeater`] reconciles children with the window: keyed reuse, container order with few
//!   moves, `O(|delta|)` work for window shifts, and deferred measurement.
//! - [`ScrollCoordinator`] closes the loop with a pluggable [`Layout`]: viewport geometry goes
//!   in, ranges, positions, scroll sizes and scroll corrections come out.
//!
//! It is UI-agnostic. A host provides:
//! - a [`Container`] / [`ScrollHost`] implementation over its node type
//! - a `new_child` factory (and optionally update/recycle callbacks)
//! - scroll/resize notifications, and a call to `flush` once per turn of its event loop
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod container;
mod coordinator;
mod headless;
mod key;
mod layout;
mod options;
mod repeater;
mod scheduler;
mod types;

#[cfg(test)]
mod tests;

pub use container::{Container, ScrollHost};
pub use coordinator::{MAX_FLUSH_TASKS, ScrollCoordinator, visible_viewport};
pub use headless::{HeadlessContainer, NodeId, NodeIds};
pub use layout::Layout;
pub use options::{
    ItemKeyCallback, MeasureCallback, NewChildCallback, RangeChangeCallback,
    RecycleChildCallback, RepeaterOptions, UpdateChildCallback,
};
pub use repeater::{MeasureBatch, RenderPass, Repeater};
pub use types::{
    Direction, ItemKey, LayoutEvent, Position, RangeChange, Rect, RenderStats, ScrollError,
    Size, VisibleRange, Window,
};

#[doc(hidden)]
pub use key::HandleKey;

//! List facade and compiled-in layout strategies for the `virtual-repeater` engine.
//!
//! `virtual-repeater` reconciles children against a window and runs the layout feedback loop,
//! but knows no concrete layout. This crate provides:
//!
//! - [`VirtualList`]: a list facade configured by items, callbacks and a layout name
//! - [`FlowLayout`]: vertical/horizontal lists of variable-size items
//! - [`GridLayout`]: vertical/horizontal grids of uniform cells
//! - [`LayoutRegistry`]: the mode → layout factory table the facade builds layouts from
//!
//! Like the engine, this crate is UI-agnostic (no DOM or toolkit bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod fenwick;
mod flow;
mod grid;
mod list;
mod mode;
mod registry;


pub use flow::{EstimateSizeCallback, FlowLayout, FlowLayoutOptions};
pub use grid::{GridLayout, GridLayoutOptions};
pub use list::VirtualList;
pub use mode::{LayoutMode, ParseLayoutModeError};
pub use registry::{LayoutFactory, LayoutRegistry};

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::Rc;

use virtual_repeater::Layout;

use crate::{FlowLayout, FlowLayoutOptions, GridLayout, GridLayoutOptions, LayoutMode};

/// Builds a fresh layout for a mode.
pub type LayoutFactory = Rc<dyn Fn(LayoutMode) -> Box<dyn Layout>>;

/// Maps each [`LayoutMode`] to the factory of its layout strategy.
///
/// `Default` registers [`FlowLayout`] for the list modes and [`GridLayout`] for the grid modes.
#[derive(Clone)]
pub struct LayoutRegistry {
    factories: BTreeMap<LayoutMode, LayoutFactory>,
}

impl LayoutRegistry {
    /// A registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// The compiled-in strategies, configured.
    pub fn new(flow: FlowLayoutOptions, grid: GridLayoutOptions) -> Self {
        let mut this = Self::empty();
        for mode in [LayoutMode::Vertical, LayoutMode::Horizontal] {
            let flow = flow.clone();
            this.register(mode, move |mode| {
                Box::new(FlowLayout::new(mode.direction(), flow.clone()))
            });
        }
        for mode in [LayoutMode::VerticalGrid, LayoutMode::HorizontalGrid] {
            this.register(mode, move |mode| {
                Box::new(GridLayout::new(mode.direction(), grid))
            });
        }
        this
    }

    /// Registers (or replaces) the factory for a mode and returns the previous one.
    pub fn register(
        &mut self,
        mode: LayoutMode,
        factory: impl Fn(LayoutMode) -> Box<dyn Layout> + 'static,
    ) -> Option<LayoutFactory> {
        self.factories.insert(mode, Rc::new(factory))
    }

    pub fn with(
        mut self,
        mode: LayoutMode,
        factory: impl Fn(LayoutMode) -> Box<dyn Layout> + 'static,
    ) -> Self {
        self.register(mode, factory);
        self
    }

    pub fn contains(&self, mode: LayoutMode) -> bool {
        self.factories.contains_key(&mode)
    }

    pub fn create(&self, mode: LayoutMode) -> Option<Box<dyn Layout>> {
        let factory = self.factories.get(&mode)?;
        Some(factory(mode))
    }
}

impl Default for LayoutRegistry {
    fn default() -> Self {
        Self::new(FlowLayoutOptions::default(), GridLayoutOptions::default())
    }
}

impl core::fmt::Debug for LayoutRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

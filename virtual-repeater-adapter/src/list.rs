use alloc::rc::Rc;
use alloc::sync::Arc;
use alloc::vec::Vec;

use virtual_repeater::{
    HandleKey, ItemKey, RangeChangeCallback, RepeaterOptions, ScrollCoordinator, ScrollHost,
    VisibleRange,
};

use crate::{LayoutMode, LayoutRegistry, ParseLayoutModeError};

/// A virtualized list: items, child callbacks and a layout mode chosen by name.
///
/// Everything can be configured before a container exists. The [`ScrollCoordinator`] is built
/// on the first [`VirtualList::connect`] and receives the stored configuration then; later
/// changes are forwarded as they happen.
///
/// The host drives it like the coordinator: report scroll/resize events and call
/// [`VirtualList::flush`] once per turn of its event loop.
pub struct VirtualList<T, Ct: ScrollHost, K = ItemKey> {
    options: RepeaterOptions<T, Ct::Child, K>,
    items: Arc<[T]>,
    mode: LayoutMode,
    registry: LayoutRegistry,
    on_range_change: Option<RangeChangeCallback>,

    coordinator: Option<ScrollCoordinator<T, Ct, K>>,
    installed: Option<LayoutMode>,
}

impl<T, Ct: ScrollHost> VirtualList<T, Ct, ItemKey> {
    /// A list keyed by index, using the vertical layout.
    pub fn new() -> Self {
        Self::from_options(RepeaterOptions::new())
    }
}

impl<T, Ct: ScrollHost> Default for VirtualList<T, Ct, ItemKey> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, Ct, K> VirtualList<T, Ct, K>
where
    Ct: ScrollHost,
    K: HandleKey,
{
    /// A list whose children follow items by `item_key` across reorders.
    pub fn with_item_key(item_key: impl Fn(&T) -> K + 'static) -> Self {
        Self::from_options(RepeaterOptions::new_with_key(move |item, _| item_key(item)))
    }

    pub fn from_options(options: RepeaterOptions<T, Ct::Child, K>) -> Self {
        Self {
            options,
            items: Arc::from(Vec::new()),
            mode: LayoutMode::default(),
            registry: LayoutRegistry::default(),
            on_range_change: None,
            coordinator: None,
            installed: None,
        }
    }

    /// Replaces the layout factories. Takes effect on the next layout installation.
    pub fn with_registry(mut self, registry: LayoutRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn set_items(&mut self, items: impl Into<Arc<[T]>>) {
        self.items = items.into();
        if let Some(coordinator) = self.coordinator.as_mut() {
            coordinator.set_items(Arc::clone(&self.items));
        }
    }

    pub fn set_new_child(&mut self, f: impl Fn(&T, usize) -> Ct::Child + 'static) {
        self.options.new_child = Some(Rc::new(f));
        self.forward_options();
    }

    pub fn set_update_child(&mut self, f: Option<impl Fn(&Ct::Child, &T, usize) + 'static>) {
        self.options.update_child = f.map(|f| Rc::new(f) as _);
        self.forward_options();
    }

    pub fn set_recycle_child(&mut self, f: Option<impl Fn(&Ct::Child, &T, usize) + 'static>) {
        self.options.recycle_child = f.map(|f| Rc::new(f) as _);
        self.forward_options();
    }

    pub fn set_item_key(&mut self, f: impl Fn(&T) -> K + 'static) {
        self.options.item_key = Rc::new(move |item, _| f(item));
        self.forward_options();
    }

    fn forward_options(&mut self) {
        if let Some(coordinator) = self.coordinator.as_mut() {
            coordinator.set_options(self.options.clone());
        }
    }

    /// Switches the layout by name: `vertical`, `horizontal`, `vertical-grid` or
    /// `horizontal-grid`.
    ///
    /// On a parse error the current layout is kept.
    pub fn set_layout(&mut self, name: &str) -> Result<(), ParseLayoutModeError> {
        let mode = name.parse()?;
        self.set_layout_mode(mode);
        Ok(())
    }

    pub fn set_layout_mode(&mut self, mode: LayoutMode) {
        self.mode = mode;
        self.install_layout();
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.mode
    }

    /// The mode of the layout currently driving the coordinator, if any.
    pub fn installed_layout(&self) -> Option<LayoutMode> {
        self.installed
    }

    fn install_layout(&mut self) {
        let Some(coordinator) = self.coordinator.as_mut() else {
            return;
        };
        if self.installed == Some(self.mode) {
            return;
        }
        let Some(layout) = self.registry.create(self.mode) else {
            awarn!(mode = %self.mode, "VirtualList: no layout registered for mode");
            return;
        };
        adebug!(from = ?self.installed, to = %self.mode, "VirtualList: layout swapped");
        coordinator.set_layout(Some(layout));
        self.installed = Some(self.mode);
    }

    /// Registers the listener for settled windows.
    pub fn on_range_change(&mut self, f: Option<impl Fn(VisibleRange) + 'static>) {
        self.on_range_change = f.map(|f| Rc::new(f) as _);
        if let Some(coordinator) = self.coordinator.as_mut() {
            coordinator.on_range_change(listener(&self.on_range_change));
        }
    }

    /// Attaches the list to a container and returns the previously attached one.
    ///
    /// The first connection builds the coordinator from the stored configuration.
    pub fn connect(&mut self, container: Ct) -> Option<Ct> {
        if self.coordinator.is_none() {
            let mut coordinator = ScrollCoordinator::new(self.options.clone());
            coordinator.set_items(Arc::clone(&self.items));
            coordinator.on_range_change(listener(&self.on_range_change));
            self.coordinator = Some(coordinator);
        }
        let previous = self
            .coordinator
            .as_mut()
            .and_then(|coordinator| coordinator.set_container(Some(container)));
        self.install_layout();
        previous
    }

    /// Detaches the container; every child the list created is removed from it first.
    pub fn disconnect(&mut self) -> Option<Ct> {
        self.coordinator.as_mut()?.set_container(None)
    }

    pub fn is_connected(&self) -> bool {
        self.coordinator
            .as_ref()
            .is_some_and(|coordinator| coordinator.container().is_some())
    }

    pub fn handle_scroll(&mut self) {
        if let Some(coordinator) = self.coordinator.as_mut() {
            coordinator.handle_scroll();
        }
    }

    pub fn handle_resize(&mut self) {
        if let Some(coordinator) = self.coordinator.as_mut() {
            coordinator.handle_resize();
        }
    }

    /// Runs queued work; returns the number of tasks run (zero before the first connection).
    pub fn flush(&mut self) -> usize {
        self.coordinator
            .as_mut()
            .map_or(0, |coordinator| coordinator.flush())
    }

    pub fn coordinator(&self) -> Option<&ScrollCoordinator<T, Ct, K>> {
        self.coordinator.as_ref()
    }

    pub fn coordinator_mut(&mut self) -> Option<&mut ScrollCoordinator<T, Ct, K>> {
        self.coordinator.as_mut()
    }
}

fn listener(callback: &Option<RangeChangeCallback>) -> Option<impl Fn(VisibleRange) + 'static> {
    let callback = Rc::clone(callback.as_ref()?);
    Some(move |range: VisibleRange| callback(range))
}

impl<T, Ct: ScrollHost, K> core::fmt::Debug for VirtualList<T, Ct, K>
where
    Ct::Child: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VirtualList")
            .field("len", &self.items.len())
            .field("mode", &self.mode)
            .field("installed", &self.installed)
            .field("registry", &self.registry)
            .field("coordinator", &self.coordinator)
            .finish_non_exhaustive()
    }
}

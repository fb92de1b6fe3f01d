use alloc::collections::BTreeMap;
use alloc::rc::Rc;

use crate::{ItemKey, Size, VisibleRange};

/// Produces a child for the item at an index.
pub type NewChildCallback<T, C> = Rc<dyn Fn(&T, usize) -> C>;

/// Binds a (new or reused) child to the item at an index.
pub type UpdateChildCallback<T, C> = Rc<dyn Fn(&C, &T, usize)>;

/// Receives a child whose identity was released, instead of removing it from the container.
///
/// The child stays attached (hidden); the callback owns it from now on and may hand it back
/// through `new_child` later.
pub type RecycleChildCallback<T, C> = Rc<dyn Fn(&C, &T, usize)>;

/// Computes the identity of an item. The index is provided for index-keyed lists.
pub type ItemKeyCallback<T, K> = Rc<dyn Fn(&T, usize) -> K>;

/// Receives `{index → size}` for freshly rendered children.
pub type MeasureCallback = Rc<dyn Fn(&BTreeMap<usize, Size>)>;

/// Receives the settled window once a layout reports it as stable.
pub type RangeChangeCallback = Rc<dyn Fn(VisibleRange)>;

/// Callback configuration for [`crate::Repeater`].
///
/// Every field is an `Rc`, so cloning is cheap and forwarding the same callbacks to a new
/// repeater keeps them pointer-equal.
pub struct RepeaterOptions<T, C, K = ItemKey> {
    pub new_child: Option<NewChildCallback<T, C>>,
    pub update_child: Option<UpdateChildCallback<T, C>>,
    pub recycle_child: Option<RecycleChildCallback<T, C>>,
    pub item_key: ItemKeyCallback<T, K>,
    pub measure: Option<MeasureCallback>,
}

impl<T, C, K> Clone for RepeaterOptions<T, C, K> {
    fn clone(&self) -> Self {
        Self {
            new_child: self.new_child.clone(),
            update_child: self.update_child.clone(),
            recycle_child: self.recycle_child.clone(),
            item_key: Rc::clone(&self.item_key),
            measure: self.measure.clone(),
        }
    }
}

impl<T, C> RepeaterOptions<T, C, ItemKey> {
    /// Options for a list keyed by index.
    pub fn new() -> Self {
        Self::new_with_key(|_, i| i as ItemKey)
    }
}

impl<T, C> Default for RepeaterOptions<T, C, ItemKey> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C, K> RepeaterOptions<T, C, K> {
    /// Options with a custom identity.
    ///
    /// Children follow items across reorders when `item_key` returns a stable id.
    pub fn new_with_key(item_key: impl Fn(&T, usize) -> K + 'static) -> Self {
        Self {
            new_child: None,
            update_child: None,
            recycle_child: None,
            item_key: Rc::new(item_key),
            measure: None,
        }
    }

    pub fn with_new_child(mut self, f: impl Fn(&T, usize) -> C + 'static) -> Self {
        self.new_child = Some(Rc::new(f));
        self
    }

    pub fn with_update_child(mut self, f: Option<impl Fn(&C, &T, usize) + 'static>) -> Self {
        self.update_child = f.map(|f| Rc::new(f) as _);
        self
    }

    pub fn with_recycle_child(mut self, f: Option<impl Fn(&C, &T, usize) + 'static>) -> Self {
        self.recycle_child = f.map(|f| Rc::new(f) as _);
        self
    }

    pub fn with_measure(mut self, f: Option<impl Fn(&BTreeMap<usize, Size>) + 'static>) -> Self {
        self.measure = f.map(|f| Rc::new(f) as _);
        self
    }
}

impl<T, C, K> core::fmt::Debug for RepeaterOptions<T, C, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RepeaterOptions")
            .field("new_child", &self.new_child.is_some())
            .field("update_child", &self.update_child.is_some())
            .field("recycle_child", &self.recycle_child.is_some())
            .field("measure", &self.measure.is_some())
            .finish_non_exhaustive()
    }
}

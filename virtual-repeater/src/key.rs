#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

/// Side table keyed by a child handle or an item key.
#[cfg(feature = "std")]
pub(crate) type IdentityMap<K, V> = HashMap<K, V>;
#[cfg(not(feature = "std"))]
pub(crate) type IdentityMap<K, V> = BTreeMap<K, V>;

/// Bound for anything the engine keeps in its identity side tables: item keys and child handles.
///
/// With `std` this is `Hash + Eq`; without it, `Ord`.
#[cfg(feature = "std")]
pub trait HandleKey: core::hash::Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq + Clone> HandleKey for K {}

#[cfg(not(feature = "std"))]
pub trait HandleKey: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<K: Ord + Clone> HandleKey for K {}

//! Typed attribute bags.
//!
//! Passes attach derived facts to elements without changing their shape. Each
//! concern declares its own key type, so two passes can only share a slot by
//! naming the same type.

use std::any::{Any, TypeId};
use std::fmt;

use rustc_hash::FxHashMap;

/// A typed attribute identifier.
///
/// ```
/// use protoscope::graph::{AttributeBag, AttributeKey};
///
/// struct PageName;
/// impl AttributeKey for PageName {
///     type Value = String;
///     const NAME: &'static str = "documentation.page";
/// }
///
/// let mut bag = AttributeBag::default();
/// bag.put::<PageName>("overview".to_string());
/// assert_eq!(bag.get::<PageName>().map(String::as_str), Some("overview"));
/// ```
pub trait AttributeKey: 'static {
    type Value: 'static;
    /// Name used in logs.
    const NAME: &'static str;
}

/// At most one value per key.
#[derive(Default)]
pub struct AttributeBag {
    slots: FxHashMap<TypeId, Box<dyn Any>>,
}

impl AttributeBag {
    pub fn get<K: AttributeKey>(&self) -> Option<&K::Value> {
        self.slots
            .get(&TypeId::of::<K>())
            .and_then(|v| v.downcast_ref::<K::Value>())
    }

    pub fn get_mut<K: AttributeKey>(&mut self) -> Option<&mut K::Value> {
        self.slots
            .get_mut(&TypeId::of::<K>())
            .and_then(|v| v.downcast_mut::<K::Value>())
    }

    /// Store a value, returning the one it overwrote.
    pub fn put<K: AttributeKey>(&mut self, value: K::Value) -> Option<K::Value> {
        self.slots
            .insert(TypeId::of::<K>(), Box::new(value))
            .and_then(|old| old.downcast::<K::Value>().ok())
            .map(|old| *old)
    }

    /// Get the value for `K`, inserting `init()` first if absent.
    pub fn get_or_insert_with<K: AttributeKey>(
        &mut self,
        init: impl FnOnce() -> K::Value,
    ) -> &mut K::Value {
        let slot = self
            .slots
            .entry(TypeId::of::<K>())
            .or_insert_with(|| Box::new(init()));
        match slot.downcast_mut::<K::Value>() {
            Some(value) => value,
            None => unreachable!("attribute slot for {} holds a foreign type", K::NAME),
        }
    }

    pub fn remove<K: AttributeKey>(&mut self) -> Option<K::Value> {
        self.slots
            .remove(&TypeId::of::<K>())
            .and_then(|old| old.downcast::<K::Value>().ok())
            .map(|old| *old)
    }

    pub fn contains<K: AttributeKey>(&self) -> bool {
        self.slots.contains_key(&TypeId::of::<K>())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Debug for AttributeBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeBag")
            .field("len", &self.slots.len())
            .finish()
    }
}

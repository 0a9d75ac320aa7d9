//! Element click subscription.
//!
//! Charts expose exactly one event kind. Subscribing replaces the previous
//! callback; there is no listener fan-out.

use airwave_core::Record;
use rustc_hash::FxHashSet;

use crate::container::ElementKey;

/// Payload delivered when a drawn element is clicked.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementClicked {
    pub key: ElementKey,
    pub id: String,
    /// Full record behind the clicked element
    pub datum: Record,
}

pub type ClickHandler = Box<dyn FnMut(&ElementClicked)>;

/// Single-slot callback plus the set of elements it is attached to.
#[derive(Default)]
pub struct ClickSlot {
    handler: Option<ClickHandler>,
    bound: FxHashSet<ElementKey>,
}

impl ClickSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `handler`, dropping any previous one.
    pub fn set<F>(&mut self, handler: F)
    where
        F: FnMut(&ElementClicked) + 'static,
    {
        self.handler = Some(Box::new(handler));
    }

    pub fn is_set(&self) -> bool {
        self.handler.is_some()
    }

    /// Replace the bound element set. Returns the keys that need a listener
    /// attached (all of them: drawing handles may have been replaced).
    pub fn rebind(&mut self, keys: &[ElementKey]) -> Vec<ElementKey> {
        self.bound.clear();
        if self.handler.is_none() {
            return Vec::new();
        }
        self.bound.extend(keys.iter().copied());
        keys.to_vec()
    }

    pub fn is_bound(&self, key: ElementKey) -> bool {
        self.bound.contains(&key)
    }

    /// Invoke the handler if `event.key` is bound. Returns whether it ran.
    pub fn dispatch(&mut self, event: &ElementClicked) -> bool {
        if !self.bound.contains(&event.key) {
            return false;
        }
        match self.handler.as_mut() {
            Some(h) => {
                h(event);
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for ClickSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickSlot")
            .field("handler", &self.handler.is_some())
            .field("bound", &self.bound.len())
            .finish()
    }
}

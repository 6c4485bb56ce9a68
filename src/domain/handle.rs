//! Stable handles for call graph entities.
//!
//! Handles are issued from a monotonic counter and resolve to graph indices
//! through a `HandleRegistry`, so callers never hold storage indices directly.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Conversion between a handle and its raw counter value.
pub trait Handle: Copy + Eq + Hash + fmt::Debug {
    fn from_raw(raw: u64) -> Self;
    fn raw(self) -> u64;
}

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub fn from_raw(raw: u64) -> Self {
                $name(raw)
            }

            pub fn raw(self) -> u64 {
                self.0
            }
        }

        impl Handle for $name {
            fn from_raw(raw: u64) -> Self {
                $name::from_raw(raw)
            }

            fn raw(self) -> u64 {
                $name::raw(self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_handle!(
    /// Opaque identifier of a function vertex.
    VertexHandle,
    "v"
);

define_handle!(
    /// Opaque identifier of a call edge.
    EdgeHandle,
    "e"
);

/// Maps issued handles to storage indices of type `S`.
///
/// The registry only holds back-references; entity data lives in the graph.
#[derive(Debug)]
pub struct HandleRegistry<H: Handle, S: Copy> {
    next: u64,
    slots: HashMap<H, S>,
}

impl<H: Handle, S: Copy> Default for HandleRegistry<H, S> {
    fn default() -> Self {
        Self {
            next: 0,
            slots: HashMap::new(),
        }
    }
}

impl<H: Handle, S: Copy> HandleRegistry<H, S> {
    /// Issue the next unused handle, letting `place` store the entity (which
    /// may embed the handle) and return its index.
    pub fn issue_with(&mut self, place: impl FnOnce(H) -> S) -> H {
        let handle = H::from_raw(self.next);
        self.next += 1;
        let slot = place(handle);
        self.slots.insert(handle, slot);
        handle
    }

    pub fn resolve(&self, handle: H) -> Option<S> {
        self.slots.get(&handle).copied()
    }

    pub fn contains(&self, handle: H) -> bool {
        self.slots.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

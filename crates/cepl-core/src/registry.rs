//! Native id → resource lookup.
//!
//! Backed by a growable array indexed by the driver-assigned id. Unused slots
//! hold the registry's null-resource sentinel, so every index below `len()`
//! resolves to a real object.

use std::rc::Rc;

use crate::error::{CeplError, Result};
use crate::resources::Resource;

#[derive(Debug)]
pub struct Registry<R> {
    slots: Vec<Rc<R>>,
    null: Rc<R>,
}

impl<R: Resource> Default for Registry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> Registry<R> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            null: Rc::new(R::null()),
        }
    }

    /// The null-resource sentinel returned for empty slots.
    pub fn null(&self) -> &Rc<R> {
        &self.null
    }

    /// Whether `resource` is this registry's sentinel.
    pub fn is_null(&self, resource: &Rc<R>) -> bool {
        Rc::ptr_eq(resource, &self.null)
    }

    /// Number of addressable slots (largest registered id + 1).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Grow to at least `len` slots, filling new ones with the sentinel.
    ///
    /// Never shrinks.
    pub fn grow_to(&mut self, len: usize) {
        if self.slots.len() < len {
            let null = &self.null;
            self.slots.resize_with(len, || Rc::clone(null));
        }
    }

    /// Store `resource` at its native id, growing as needed.
    ///
    /// Registering the same id again overwrites the slot.
    pub fn register(&mut self, resource: Rc<R>) -> Result<()> {
        let id = resource.native_id();
        if id == 0 {
            return Err(CeplError::Uninitialized { kind: R::KIND });
        }
        self.grow_to(id as usize + 1);
        self.slots[id as usize] = resource;
        Ok(())
    }

    /// Resource at `id`, or the sentinel for id 0 and out-of-range ids.
    pub fn resolve(&self, id: u32) -> Rc<R> {
        match self.slots.get(id as usize) {
            Some(resource) if id != 0 => Rc::clone(resource),
            _ => Rc::clone(&self.null),
        }
    }

    /// Resource at `id`, failing when nothing was ever registered there.
    pub fn get(&self, id: u32) -> Result<Rc<R>> {
        let resource = self.resolve(id);
        if self.is_null(&resource) {
            return Err(CeplError::IndexOutOfRange {
                id,
                len: self.slots.len(),
            });
        }
        Ok(resource)
    }
}

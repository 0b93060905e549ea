//! Resource objects that own a driver-assigned native id.
//!
//! A resource created before a native context exists starts with id 0 and
//! receives its real id when its deferred construction runs. Handles are
//! shared through `Rc`; the registry references them, it does not decide
//! their lifetime.

use std::cell::Cell;
use std::rc::Rc;

use crate::texture::Texture;

/// Anything identified by a native id.
pub trait Resource {
    /// Human readable kind, used in logs and errors.
    const KIND: &'static str;

    /// The null-resource sentinel: a real object standing for "no resource".
    fn null() -> Self;

    /// Native id, or 0 while no native object exists.
    fn native_id(&self) -> u32;

    fn is_null(&self) -> bool {
        self.native_id() == 0
    }
}

/// Something a deferred task can wait on.
pub trait Prerequisite {
    fn is_initialized(&self) -> bool;
}

impl<R: Resource> Prerequisite for R {
    fn is_initialized(&self) -> bool {
        !self.is_null()
    }
}

/// How the driver should expect a buffer's contents to be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferUsage {
    #[default]
    StaticDraw,
    DynamicDraw,
    StreamDraw,
    StaticRead,
    DynamicRead,
    StreamRead,
    StaticCopy,
    DynamicCopy,
    StreamCopy,
}

/// A GPU buffer object (the storage behind `gpu-array`s and uniform blocks).
#[derive(Debug)]
pub struct GpuBuffer {
    id: Cell<u32>,
    byte_size: usize,
    usage: BufferUsage,
}

impl GpuBuffer {
    pub(crate) fn pending(byte_size: usize, usage: BufferUsage) -> Self {
        Self {
            id: Cell::new(0),
            byte_size,
            usage,
        }
    }

    /// Wrap a buffer that already exists in the native context.
    pub fn from_raw(id: u32, byte_size: usize, usage: BufferUsage) -> Self {
        Self {
            id: Cell::new(id),
            byte_size,
            usage,
        }
    }

    pub fn id(&self) -> u32 {
        self.id.get()
    }

    /// Size of the data store in bytes.
    pub fn byte_size(&self) -> usize {
        self.byte_size
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    pub(crate) fn assign_id(&self, id: u32) {
        self.id.set(id);
    }
}

impl Resource for GpuBuffer {
    const KIND: &'static str = "buffer";

    fn null() -> Self {
        Self::pending(0, BufferUsage::default())
    }

    fn native_id(&self) -> u32 {
        self.id.get()
    }
}

/// A framebuffer object and the textures attached to its color outputs.
#[derive(Debug)]
pub struct Framebuffer {
    id: Cell<u32>,
    color_attachments: Vec<Rc<Texture>>,
}

impl Framebuffer {
    pub(crate) fn pending(color_attachments: Vec<Rc<Texture>>) -> Self {
        Self {
            id: Cell::new(0),
            color_attachments,
        }
    }

    /// Wrap a framebuffer that already exists in the native context.
    pub fn from_raw(id: u32) -> Self {
        Self {
            id: Cell::new(id),
            color_attachments: Vec::new(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id.get()
    }

    pub fn color_attachments(&self) -> &[Rc<Texture>] {
        &self.color_attachments
    }

    pub(crate) fn assign_id(&self, id: u32) {
        self.id.set(id);
    }
}

impl Resource for Framebuffer {
    const KIND: &'static str = "framebuffer";

    fn null() -> Self {
        Self::pending(Vec::new())
    }

    fn native_id(&self) -> u32 {
        self.id.get()
    }
}

/// A vertex array object, optionally carrying an element (index) buffer.
#[derive(Debug)]
pub struct VertexArray {
    id: Cell<u32>,
    element_buffer: Option<Rc<GpuBuffer>>,
}

impl VertexArray {
    pub(crate) fn pending(element_buffer: Option<Rc<GpuBuffer>>) -> Self {
        Self {
            id: Cell::new(0),
            element_buffer,
        }
    }

    /// Wrap a vertex array that already exists in the native context.
    pub fn from_raw(id: u32) -> Self {
        Self {
            id: Cell::new(id),
            element_buffer: None,
        }
    }

    pub fn id(&self) -> u32 {
        self.id.get()
    }

    pub fn element_buffer(&self) -> Option<&Rc<GpuBuffer>> {
        self.element_buffer.as_ref()
    }

    pub(crate) fn assign_id(&self, id: u32) {
        self.id.set(id);
    }
}

impl Resource for VertexArray {
    const KIND: &'static str = "vertex array";

    fn null() -> Self {
        Self::pending(None)
    }

    fn native_id(&self) -> u32 {
        self.id.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_resources_are_not_initialized() {
        let buffer = GpuBuffer::pending(64, BufferUsage::DynamicDraw);
        assert!(!buffer.is_initialized());
        buffer.assign_id(7);
        assert!(buffer.is_initialized());
        assert_eq!(buffer.native_id(), 7);
        assert_eq!(buffer.byte_size(), 64);
    }

    #[test]
    fn sentinels_are_null() {
        assert!(GpuBuffer::null().is_null());
        assert!(Framebuffer::null().is_null());
        assert!(VertexArray::null().is_null());
        assert!(!Framebuffer::from_raw(3).is_null());
    }
}

//! Textures and their storage kinds.

use std::cell::Cell;
use std::rc::Rc;

use crate::resources::{GpuBuffer, Resource};
use crate::target::TextureTarget;

/// Pixel layout of a texture's texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    R8,
    Rg8,
    Rgba8,
    R32f,
    Rgba32f,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::R8 => 1,
            PixelFormat::Rg8 => 2,
            PixelFormat::Rgba8 | PixelFormat::R32f => 4,
            PixelFormat::Rgba32f => 16,
        }
    }
}

/// Where a texture's texels live, which decides how uploads are issued.
#[derive(Debug, Clone)]
pub enum TextureStorage {
    /// Storage is respecified on every upload.
    Mutable,
    /// Storage is allocated once; uploads replace its contents in place.
    Immutable { levels: u32 },
    /// Texels are read from a buffer object; uploads write the buffer.
    BufferBacked(Rc<GpuBuffer>),
}

impl TextureStorage {
    pub fn target(&self) -> TextureTarget {
        match self {
            TextureStorage::BufferBacked(_) => TextureTarget::TextureBuffer,
            _ => TextureTarget::Texture2d,
        }
    }
}

/// A 2D or buffer texture (`gl-texture`).
#[derive(Debug)]
pub struct Texture {
    id: Cell<u32>,
    dimensions: (u32, u32),
    format: PixelFormat,
    storage: TextureStorage,
}

impl Texture {
    pub(crate) fn pending(dimensions: (u32, u32), format: PixelFormat, storage: TextureStorage) -> Self {
        Self {
            id: Cell::new(0),
            dimensions,
            format,
            storage,
        }
    }

    pub fn id(&self) -> u32 {
        self.id.get()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn storage(&self) -> &TextureStorage {
        &self.storage
    }

    /// Byte length of a full upload for this texture.
    pub fn byte_len(&self) -> usize {
        self.dimensions.0 as usize * self.dimensions.1 as usize * self.format.bytes_per_pixel()
    }

    pub(crate) fn assign_id(&self, id: u32) {
        self.id.set(id);
    }
}

impl Resource for Texture {
    const KIND: &'static str = "texture";

    fn null() -> Self {
        Self::pending((0, 0), PixelFormat::Rgba8, TextureStorage::Mutable)
    }

    fn native_id(&self) -> u32 {
        self.id.get()
    }
}

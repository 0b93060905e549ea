//! Named binding slots the driver exposes as "current" state.

use std::fmt;

/// A bindable target tracked by the [`BindingCache`](crate::cache::BindingCache).
///
/// Each variant is an independent cache slot. `UniformBuffer` is indexed: every
/// index is its own slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindTarget {
    ArrayBuffer,
    ElementArrayBuffer,
    VertexArray,
    ReadFramebuffer,
    DrawFramebuffer,
    UniformBuffer(u32),
}

impl BindTarget {
    /// Whether this target holds a buffer object.
    pub fn is_buffer(self) -> bool {
        matches!(
            self,
            BindTarget::ArrayBuffer | BindTarget::ElementArrayBuffer | BindTarget::UniformBuffer(_)
        )
    }

    /// Whether this target holds a framebuffer object.
    pub fn is_framebuffer(self) -> bool {
        matches!(self, BindTarget::ReadFramebuffer | BindTarget::DrawFramebuffer)
    }
}

impl fmt::Display for BindTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindTarget::ArrayBuffer => f.write_str("array-buffer"),
            BindTarget::ElementArrayBuffer => f.write_str("element-buffer"),
            BindTarget::VertexArray => f.write_str("vertex-array"),
            BindTarget::ReadFramebuffer => f.write_str("read-framebuffer"),
            BindTarget::DrawFramebuffer => f.write_str("draw-framebuffer"),
            BindTarget::UniformBuffer(index) => write!(f, "uniform-buffer[{index}]"),
        }
    }
}

/// Texture binding points used by [`Context::bind_texture`](crate::Context::bind_texture).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    Texture2d,
    TextureBuffer,
}

impl TextureTarget {
    /// Every target, in [`index`](Self::index) order.
    pub const ALL: [TextureTarget; 2] = [TextureTarget::Texture2d, TextureTarget::TextureBuffer];

    /// Position of this target in per-unit binding tables.
    pub fn index(self) -> usize {
        self as usize
    }
}

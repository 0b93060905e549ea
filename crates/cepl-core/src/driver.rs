//! The narrow interface the context drives the native graphics API through.

use crate::resources::BufferUsage;
use crate::target::{BindTarget, TextureTarget};
use crate::texture::PixelFormat;

/// Native object kinds [`Driver::create_object`] can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Buffer,
    Framebuffer,
    VertexArray,
    Texture,
}

/// Native driver calls used by [`Context`](crate::Context).
///
/// Implementations issue the calls and nothing more: no caching, no
/// validation. Every method assumes the native context is current on the
/// calling thread.
///
/// The binding calls are the only ones allowed to change bind state. The
/// object and data calls act on whatever the context has already bound.
pub trait Driver {
    // -----------------------------------------------------------------------
    // Binding
    // -----------------------------------------------------------------------

    /// Bind `id` to a single target (0 unbinds).
    fn bind(&mut self, target: BindTarget, id: u32);

    /// Bind `id` to both the read and the draw framebuffer in one call.
    fn bind_framebuffer_combined(&mut self, id: u32);

    /// Id currently bound to `target`, as the driver reports it.
    fn query_binding(&mut self, target: BindTarget) -> u32;

    /// Bind the whole buffer `id` to uniform slot `index`.
    fn bind_uniform_whole(&mut self, index: u32, id: u32);

    /// Bind `size` bytes of buffer `id` starting at `offset` to uniform slot `index`.
    fn bind_uniform_range(&mut self, index: u32, id: u32, offset: usize, size: usize);

    /// Select texture unit `unit` for subsequent texture binds.
    fn active_texture(&mut self, unit: u32);

    /// Bind texture `id` on the active unit.
    fn bind_texture(&mut self, target: TextureTarget, id: u32);

    // -----------------------------------------------------------------------
    // Objects and data
    // -----------------------------------------------------------------------

    /// Generate one native object and return its id.
    fn create_object(&mut self, kind: ObjectKind) -> u32;

    /// (Re)allocate the data store of the buffer bound to `target`.
    ///
    /// `size` bytes are allocated; `data`, when present, is `size` bytes long.
    fn buffer_data(&mut self, target: BindTarget, size: usize, data: Option<&[u8]>, usage: BufferUsage);

    /// Overwrite part of the data store of the buffer bound to `target`.
    fn buffer_sub_data(&mut self, target: BindTarget, offset: usize, data: &[u8]);

    /// Respecify the 2D texture bound on the active unit.
    fn tex_image_2d(&mut self, format: PixelFormat, dimensions: (u32, u32), data: Option<&[u8]>);

    /// Allocate immutable storage for the 2D texture bound on the active unit.
    fn tex_storage_2d(&mut self, format: PixelFormat, dimensions: (u32, u32), levels: u32);

    /// Replace the base level of the 2D texture bound on the active unit.
    fn tex_sub_image_2d(&mut self, format: PixelFormat, dimensions: (u32, u32), data: &[u8]);

    /// Attach buffer `buffer_id` as the store of the buffer texture bound on the active unit.
    fn tex_buffer(&mut self, format: PixelFormat, buffer_id: u32);

    /// Attach 2D texture `texture_id` to color output `slot` of the bound draw framebuffer.
    fn framebuffer_texture(&mut self, slot: u32, texture_id: u32);
}

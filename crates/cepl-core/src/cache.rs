//! Per-context record of what is bound where.
//!
//! Each target has one [`Binding`] slot. A `Known` slot must equal what the
//! driver has bound for that target, which only holds while every bind of
//! that target goes through [`Context`](crate::Context). A bind that bypasses
//! it cannot be detected here; call [`BindingCache::invalidate`] after one.

use crate::target::BindTarget;

/// State of one cache slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Binding {
    /// Never queried or set since the context was attached.
    #[default]
    Unknown,
    /// The driver has this id bound. 0 means nothing is bound.
    Known(u32),
}

impl Binding {
    pub fn id(self) -> Option<u32> {
        match self {
            Binding::Unknown => None,
            Binding::Known(id) => Some(id),
        }
    }

    /// Whether binding `id` requires a native call.
    pub fn needs_bind(self, id: u32) -> bool {
        self != Binding::Known(id)
    }
}

/// One slot per bindable target.
#[derive(Debug, Default)]
pub struct BindingCache {
    array_buffer: Binding,
    element_buffer: Binding,
    vertex_array: Binding,
    read_framebuffer: Binding,
    draw_framebuffer: Binding,
    uniform_buffers: Vec<Binding>,
}

impl BindingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, target: BindTarget) -> Binding {
        match target {
            BindTarget::ArrayBuffer => self.array_buffer,
            BindTarget::ElementArrayBuffer => self.element_buffer,
            BindTarget::VertexArray => self.vertex_array,
            BindTarget::ReadFramebuffer => self.read_framebuffer,
            BindTarget::DrawFramebuffer => self.draw_framebuffer,
            BindTarget::UniformBuffer(index) => self
                .uniform_buffers
                .get(index as usize)
                .copied()
                .unwrap_or_default(),
        }
    }

    /// Record that the driver now has `id` bound to `target`.
    pub fn record(&mut self, target: BindTarget, id: u32) {
        *self.slot_mut(target) = Binding::Known(id);
    }

    /// Return `target` to `Unknown`.
    pub fn invalidate(&mut self, target: BindTarget) {
        *self.slot_mut(target) = Binding::Unknown;
    }

    /// Return every slot to `Unknown`.
    pub fn invalidate_all(&mut self) {
        *self = Self::default();
    }

    fn slot_mut(&mut self, target: BindTarget) -> &mut Binding {
        match target {
            BindTarget::ArrayBuffer => &mut self.array_buffer,
            BindTarget::ElementArrayBuffer => &mut self.element_buffer,
            BindTarget::VertexArray => &mut self.vertex_array,
            BindTarget::ReadFramebuffer => &mut self.read_framebuffer,
            BindTarget::DrawFramebuffer => &mut self.draw_framebuffer,
            BindTarget::UniformBuffer(index) => {
                let index = index as usize;
                if self.uniform_buffers.len() <= index {
                    self.uniform_buffers.resize(index + 1, Binding::Unknown);
                }
                &mut self.uniform_buffers[index]
            }
        }
    }
}

//! Context limits and tunables.

/// Settings fixed at [`Context`](crate::Context) creation.
///
/// The defaults are the minimums OpenGL 4.x guarantees. A native backend can
/// build a config from the real driver limits instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextConfig {
    /// Indexed uniform-buffer slots the cache accepts.
    pub max_uniform_buffer_bindings: u32,
    /// Texture units [`Context::bind_texture`](crate::Context::bind_texture) accepts.
    pub max_texture_units: u32,
    /// Upper bound on passes of a single deferred flush.
    pub max_flush_passes: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_uniform_buffer_bindings: 36,
            max_texture_units: 16,
            max_flush_passes: 64,
        }
    }
}

impl ContextConfig {
    pub fn with_max_uniform_buffer_bindings(mut self, count: u32) -> Self {
        self.max_uniform_buffer_bindings = count;
        self
    }

    pub fn with_max_texture_units(mut self, count: u32) -> Self {
        self.max_texture_units = count;
        self
    }

    pub fn with_max_flush_passes(mut self, passes: usize) -> Self {
        self.max_flush_passes = passes.max(1);
        self
    }
}

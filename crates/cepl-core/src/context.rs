//! The per-native-context state object.
//!
//! A [`Context`] owns the binding cache, the resource registries, and the
//! deferred initialization queue for one native graphics context. Every bind
//! of a cached target must go through it; see [`crate::cache`] for what
//! happens otherwise.
//!
//! Nothing here is global. Pass the context to whatever needs it, and create
//! one per native context.

use std::rc::Rc;

use tracing::{debug, error, trace, warn};

use crate::cache::{Binding, BindingCache};
use crate::config::ContextConfig;
use crate::deferred::{DeferredQueue, FlushReport};
use crate::driver::{Driver, ObjectKind};
use crate::error::{CeplError, Result};
use crate::memo::Memo;
use crate::registry::Registry;
use crate::resources::{BufferUsage, Framebuffer, GpuBuffer, Prerequisite, Resource, VertexArray};
use crate::target::{BindTarget, TextureTarget};
use crate::texture::{PixelFormat, Texture, TextureStorage};

/// What [`Context::run_if_context_else_defer`] did with its action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Ran,
    Deferred,
}

/// Resources with a registry in the context.
pub trait Tracked: Resource + Sized {
    fn registry<D>(ctx: &Context<D>) -> &Registry<Self>;
    fn registry_mut<D>(ctx: &mut Context<D>) -> &mut Registry<Self>;
}

impl Tracked for GpuBuffer {
    fn registry<D>(ctx: &Context<D>) -> &Registry<Self> {
        &ctx.buffers
    }

    fn registry_mut<D>(ctx: &mut Context<D>) -> &mut Registry<Self> {
        &mut ctx.buffers
    }
}

impl Tracked for Framebuffer {
    fn registry<D>(ctx: &Context<D>) -> &Registry<Self> {
        &ctx.framebuffers
    }

    fn registry_mut<D>(ctx: &mut Context<D>) -> &mut Registry<Self> {
        &mut ctx.framebuffers
    }
}

impl Tracked for VertexArray {
    fn registry<D>(ctx: &Context<D>) -> &Registry<Self> {
        &ctx.vertex_arrays
    }

    fn registry_mut<D>(ctx: &mut Context<D>) -> &mut Registry<Self> {
        &mut ctx.vertex_arrays
    }
}

/// Native id of an optional resource; 0 for `None`.
fn resource_id<R: Resource>(resource: Option<&Rc<R>>) -> Result<u32> {
    match resource {
        None => Ok(0),
        Some(r) if r.is_null() => Err(CeplError::Uninitialized { kind: R::KIND }),
        Some(r) => Ok(r.native_id()),
    }
}

/// Binding cache, registries, and deferred work for one native context.
pub struct Context<D> {
    native: Option<D>,
    config: ContextConfig,
    cache: BindingCache,
    buffers: Registry<GpuBuffer>,
    framebuffers: Registry<Framebuffer>,
    vertex_arrays: Registry<VertexArray>,
    deferred: DeferredQueue<Context<D>>,
    active_texture: Memo<u32>,
    /// Per unit, the texture bound to each [`TextureTarget`], by [`TextureTarget::index`].
    texture_units: Vec<[Memo<u32>; TextureTarget::ALL.len()]>,
}

impl<D> std::fmt::Debug for Context<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("attached", &self.native.is_some())
            .field("config", &self.config)
            .field("cache", &self.cache)
            .field("buffers", &self.buffers.len())
            .field("framebuffers", &self.framebuffers.len())
            .field("vertex_arrays", &self.vertex_arrays.len())
            .field("deferred", &self.deferred.len())
            .finish()
    }
}

impl<D: Driver + 'static> Default for Context<D> {
    fn default() -> Self {
        Self::new(ContextConfig::default())
    }
}

impl<D: Driver + 'static> Context<D> {
    /// Create a context with no native context attached yet.
    pub fn new(config: ContextConfig) -> Self {
        Self {
            native: None,
            config,
            cache: BindingCache::new(),
            buffers: Registry::new(),
            framebuffers: Registry::new(),
            vertex_arrays: Registry::new(),
            deferred: DeferredQueue::new(),
            active_texture: Memo::new(),
            texture_units: Vec::new(),
        }
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    pub fn cache(&self) -> &BindingCache {
        &self.cache
    }

    pub fn is_attached(&self) -> bool {
        self.native.is_some()
    }

    pub fn driver(&self) -> Option<&D> {
        self.native.as_ref()
    }

    /// Direct access to the native driver.
    ///
    /// Binding a cached target through this breaks cache coherence; follow
    /// such a bind with [`invalidate`](Self::invalidate).
    pub fn driver_mut(&mut self) -> Option<&mut D> {
        self.native.as_mut()
    }

    fn native(&mut self) -> Result<&mut D> {
        self.native.as_mut().ok_or(CeplError::NoContext)
    }

    // -----------------------------------------------------------------------
    // Attachment
    // -----------------------------------------------------------------------

    /// Install the native context and run every deferred task it unblocks.
    ///
    /// All cached bindings start out unknown for the new native context.
    pub fn attach(&mut self, native: D) -> Result<FlushReport> {
        if self.native.replace(native).is_some() {
            debug!("replacing previously attached native context");
        }
        self.invalidate_all();
        debug!(pending = self.deferred.len(), "native context attached");
        self.flush_deferred()
    }

    /// Remove the native context, forgetting every cached binding.
    pub fn detach(&mut self) -> Option<D> {
        self.invalidate_all();
        self.native.take()
    }

    // -----------------------------------------------------------------------
    // Binding cache
    // -----------------------------------------------------------------------

    fn check_target(&self, target: BindTarget) -> Result<()> {
        match target {
            BindTarget::UniformBuffer(index) if index >= self.config.max_uniform_buffer_bindings => {
                Err(CeplError::IndexOutOfRange {
                    id: index,
                    len: self.config.max_uniform_buffer_bindings as usize,
                })
            }
            _ => Ok(()),
        }
    }

    /// Id bound to `target`.
    ///
    /// The first call for a target after attach asks the driver; later calls
    /// are answered from the cache.
    pub fn bound_id(&mut self, target: BindTarget) -> Result<u32> {
        self.check_target(target)?;
        if let Binding::Known(id) = self.cache.get(target) {
            return Ok(id);
        }
        let id = self.native()?.query_binding(target);
        trace!(%target, id, "queried binding");
        self.cache.record(target, id);
        Ok(id)
    }

    /// Bind `id` unless the cache says it already is. Returns whether a
    /// native call was made.
    fn bind_id(&mut self, target: BindTarget, id: u32) -> Result<bool> {
        self.check_target(target)?;
        if !self.cache.get(target).needs_bind(id) {
            trace!(%target, id, "bind elided");
            return Ok(false);
        }
        let native = self.native()?;
        match target {
            BindTarget::UniformBuffer(index) => native.bind_uniform_whole(index, id),
            _ => native.bind(target, id),
        }
        trace!(%target, id, "bound");
        self.cache.record(target, id);
        if target == BindTarget::VertexArray {
            // The element buffer binding belongs to the vertex array.
            self.cache.invalidate(BindTarget::ElementArrayBuffer);
        }
        Ok(true)
    }

    fn resolve_bound<R: Tracked>(&mut self, target: BindTarget) -> Result<Rc<R>> {
        let id = self.bound_id(target)?;
        let registry = R::registry(self);
        let resource = registry.resolve(id);
        if id != 0 && registry.is_null(&resource) {
            error!(%target, id, kind = R::KIND, "bound id was never registered");
            return Err(CeplError::InvariantViolation { target, id });
        }
        Ok(resource)
    }

    fn set_bound<'a, R: Resource>(
        &mut self,
        target: BindTarget,
        resource: Option<&'a Rc<R>>,
    ) -> Result<Option<&'a Rc<R>>> {
        let id = resource_id(resource)?;
        self.bind_id(target, id)?;
        Ok(resource)
    }

    /// Forget what is bound to `target`.
    ///
    /// The next query asks the driver again and the next bind always reaches
    /// it. Use after anything bound the target behind the context's back.
    pub fn invalidate(&mut self, target: BindTarget) {
        self.cache.invalidate(target);
    }

    /// Forget every cached binding, texture units included.
    pub fn invalidate_all(&mut self) {
        self.cache.invalidate_all();
        self.active_texture.forget();
        self.texture_units.clear();
    }

    pub fn array_buffer(&mut self) -> Result<Rc<GpuBuffer>> {
        self.resolve_bound(BindTarget::ArrayBuffer)
    }

    pub fn set_array_buffer<'a>(
        &mut self,
        buffer: Option<&'a Rc<GpuBuffer>>,
    ) -> Result<Option<&'a Rc<GpuBuffer>>> {
        self.set_bound(BindTarget::ArrayBuffer, buffer)
    }

    pub fn element_buffer(&mut self) -> Result<Rc<GpuBuffer>> {
        self.resolve_bound(BindTarget::ElementArrayBuffer)
    }

    pub fn set_element_buffer<'a>(
        &mut self,
        buffer: Option<&'a Rc<GpuBuffer>>,
    ) -> Result<Option<&'a Rc<GpuBuffer>>> {
        self.set_bound(BindTarget::ElementArrayBuffer, buffer)
    }

    pub fn vertex_array(&mut self) -> Result<Rc<VertexArray>> {
        self.resolve_bound(BindTarget::VertexArray)
    }

    pub fn set_vertex_array<'a>(
        &mut self,
        vao: Option<&'a Rc<VertexArray>>,
    ) -> Result<Option<&'a Rc<VertexArray>>> {
        self.set_bound(BindTarget::VertexArray, vao)
    }

    pub fn read_framebuffer(&mut self) -> Result<Rc<Framebuffer>> {
        self.resolve_bound(BindTarget::ReadFramebuffer)
    }

    pub fn set_read_framebuffer<'a>(
        &mut self,
        fbo: Option<&'a Rc<Framebuffer>>,
    ) -> Result<Option<&'a Rc<Framebuffer>>> {
        self.set_bound(BindTarget::ReadFramebuffer, fbo)
    }

    pub fn draw_framebuffer(&mut self) -> Result<Rc<Framebuffer>> {
        self.resolve_bound(BindTarget::DrawFramebuffer)
    }

    pub fn set_draw_framebuffer<'a>(
        &mut self,
        fbo: Option<&'a Rc<Framebuffer>>,
    ) -> Result<Option<&'a Rc<Framebuffer>>> {
        self.set_bound(BindTarget::DrawFramebuffer, fbo)
    }

    /// The (read, draw) framebuffer pair.
    pub fn framebuffers(&mut self) -> Result<(Rc<Framebuffer>, Rc<Framebuffer>)> {
        Ok((self.read_framebuffer()?, self.draw_framebuffer()?))
    }

    /// Bind `fbo` for both reading and drawing.
    ///
    /// Uses one combined native call when both slots need it, otherwise binds
    /// only the slot that differs.
    pub fn set_framebuffer<'a>(
        &mut self,
        fbo: Option<&'a Rc<Framebuffer>>,
    ) -> Result<Option<&'a Rc<Framebuffer>>> {
        let id = resource_id(fbo)?;
        let read = self.cache.get(BindTarget::ReadFramebuffer).needs_bind(id);
        let draw = self.cache.get(BindTarget::DrawFramebuffer).needs_bind(id);
        match (read, draw) {
            (true, true) => {
                self.native()?.bind_framebuffer_combined(id);
                trace!(id, "bound read+draw framebuffer");
                self.cache.record(BindTarget::ReadFramebuffer, id);
                self.cache.record(BindTarget::DrawFramebuffer, id);
            }
            (true, false) => {
                self.bind_id(BindTarget::ReadFramebuffer, id)?;
            }
            (false, true) => {
                self.bind_id(BindTarget::DrawFramebuffer, id)?;
            }
            (false, false) => trace!(id, "framebuffer bind elided"),
        }
        Ok(fbo)
    }

    /// Whole buffer bound to uniform slot `index`.
    pub fn uniform_buffer(&mut self, index: u32) -> Result<Rc<GpuBuffer>> {
        self.resolve_bound(BindTarget::UniformBuffer(index))
    }

    /// Bind `buffer` to uniform slot `index`.
    ///
    /// Without `offset` and `size` the whole buffer is bound through the
    /// cache. With both, the range is always bound natively and the slot is
    /// forgotten, since the cache only tracks whole-buffer bindings. Giving
    /// just one of them is an error.
    pub fn bind_uniform_buffer<'a>(
        &mut self,
        index: u32,
        buffer: Option<&'a Rc<GpuBuffer>>,
        offset: Option<usize>,
        size: Option<usize>,
    ) -> Result<Option<&'a Rc<GpuBuffer>>> {
        let target = BindTarget::UniformBuffer(index);
        let (offset, size) = match (offset, size) {
            (None, None) => return self.set_bound(target, buffer),
            (Some(offset), Some(size)) => (offset, size),
            _ => {
                return Err(CeplError::InvalidArguments(
                    "a ranged uniform bind needs both offset and size".into(),
                ))
            }
        };
        self.check_target(target)?;
        let Some(whole) = buffer else {
            return Err(CeplError::InvalidArguments(
                "a ranged uniform bind needs a buffer".into(),
            ));
        };
        let id = resource_id(buffer)?;
        if offset.checked_add(size).is_none_or(|end| end > whole.byte_size()) {
            return Err(CeplError::InvalidArguments(format!(
                "range {offset}+{size} overruns a {} byte buffer",
                whole.byte_size()
            )));
        }
        self.native()?.bind_uniform_range(index, id, offset, size);
        trace!(%target, id, offset, size, "bound uniform range");
        self.cache.invalidate(target);
        Ok(buffer)
    }

    /// Bind `texture` on texture unit `unit`, or unbind every target of the
    /// unit for `None`.
    ///
    /// The unit is always left active, so calls acting on the active unit
    /// reach it. Unit selection and each bind are skipped when unchanged.
    pub fn bind_texture<'a>(
        &mut self,
        unit: u32,
        texture: Option<&'a Rc<Texture>>,
    ) -> Result<Option<&'a Rc<Texture>>> {
        if unit >= self.config.max_texture_units {
            return Err(CeplError::IndexOutOfRange {
                id: unit,
                len: self.config.max_texture_units as usize,
            });
        }
        let id = resource_id(texture)?;
        let Self {
            native,
            active_texture,
            texture_units,
            ..
        } = self;
        let native = native.as_mut().ok_or(CeplError::NoContext)?;
        let slot = unit as usize;
        if texture_units.len() <= slot {
            texture_units.resize_with(slot + 1, Default::default);
        }
        let bindings = &mut texture_units[slot];
        active_texture.call_if_changed(unit, |&unit| native.active_texture(unit));
        let only;
        let targets: &[TextureTarget] = match texture {
            Some(texture) => {
                only = [texture.storage().target()];
                &only
            }
            None => &TextureTarget::ALL,
        };
        for &target in targets {
            let bound = bindings[target.index()]
                .call_if_changed(id, |&id| native.bind_texture(target, id));
            match bound {
                Some(()) => trace!(unit, ?target, id, "bound texture"),
                None => trace!(unit, ?target, id, "texture bind elided"),
            }
        }
        Ok(texture)
    }

    // -----------------------------------------------------------------------
    // Registry
    // -----------------------------------------------------------------------

    /// Make `resource` resolvable by its native id.
    pub fn register<R: Tracked>(&mut self, resource: Rc<R>) -> Result<()> {
        R::registry_mut(self).register(resource)
    }

    /// Resource registered at `id`, or the null sentinel.
    pub fn resolve<R: Tracked>(&self, id: u32) -> Rc<R> {
        R::registry(self).resolve(id)
    }

    pub fn buffer(&self, id: u32) -> Result<Rc<GpuBuffer>> {
        self.buffers.get(id)
    }

    pub fn framebuffer(&self, id: u32) -> Result<Rc<Framebuffer>> {
        self.framebuffers.get(id)
    }

    pub fn vertex_array_by_id(&self, id: u32) -> Result<Rc<VertexArray>> {
        self.vertex_arrays.get(id)
    }

    // -----------------------------------------------------------------------
    // Deferred initialization
    // -----------------------------------------------------------------------

    /// Run `action` now if a native context is attached and every resource in
    /// `depends_on` is initialized, otherwise queue it.
    pub fn run_if_context_else_defer(
        &mut self,
        action: impl FnOnce(&mut Self) -> Result<()> + 'static,
        depends_on: Vec<Rc<dyn Prerequisite>>,
    ) -> Result<Dispatch> {
        if self.is_attached() && depends_on.iter().all(|dep| dep.is_initialized()) {
            action(self)?;
            return Ok(Dispatch::Ran);
        }
        self.deferred.enqueue(action, depends_on);
        trace!(queued = self.deferred.len(), "action deferred");
        Ok(Dispatch::Deferred)
    }

    pub fn pending_tasks(&self) -> usize {
        self.deferred.len()
    }

    /// Run every queued task whose prerequisites are initialized.
    ///
    /// Passes repeat while they make progress, up to
    /// [`ContextConfig::max_flush_passes`]. Tasks still waiting stay queued.
    /// A failing task stops the flush; it is dropped and the tasks not yet
    /// run stay queued.
    pub fn flush_deferred(&mut self) -> Result<FlushReport> {
        let mut report = FlushReport::default();
        if self.is_attached() {
            while !self.deferred.is_empty() {
                if report.passes == self.config.max_flush_passes {
                    warn!(passes = report.passes, "deferred flush hit its pass limit");
                    break;
                }
                let ready = self.deferred.take_ready();
                if ready.is_empty() {
                    break;
                }
                report.passes += 1;
                let mut ready = ready.into_iter();
                while let Some(task) = ready.next() {
                    if let Err(err) = task.run(self) {
                        self.deferred.requeue_front(ready.collect());
                        return Err(err);
                    }
                    report.executed += 1;
                }
            }
        }
        report.pending = self.deferred.len();
        if self.is_attached() && report.pending > 0 {
            warn!(
                pending = report.pending,
                "deferred tasks still waiting on uninitialized resources"
            );
        }
        debug!(?report, "deferred flush finished");
        Ok(report)
    }

    // -----------------------------------------------------------------------
    // Resource construction
    // -----------------------------------------------------------------------

    /// Create a buffer holding `data`.
    ///
    /// The handle is returned at once; the native buffer exists once a
    /// native context is attached.
    pub fn make_buffer(&mut self, data: Vec<u8>, usage: BufferUsage) -> Result<Rc<GpuBuffer>> {
        let buffer = Rc::new(GpuBuffer::pending(data.len(), usage));
        let handle = Rc::clone(&buffer);
        self.run_if_context_else_defer(move |ctx| ctx.init_buffer(&handle, Some(data.as_slice())), Vec::new())?;
        Ok(buffer)
    }

    /// Create a buffer of `byte_size` uninitialized bytes.
    pub fn make_empty_buffer(&mut self, byte_size: usize, usage: BufferUsage) -> Result<Rc<GpuBuffer>> {
        let buffer = Rc::new(GpuBuffer::pending(byte_size, usage));
        let handle = Rc::clone(&buffer);
        self.run_if_context_else_defer(move |ctx| ctx.init_buffer(&handle, None), Vec::new())?;
        Ok(buffer)
    }

    fn init_buffer(&mut self, buffer: &Rc<GpuBuffer>, data: Option<&[u8]>) -> Result<()> {
        let id = self.native()?.create_object(ObjectKind::Buffer);
        buffer.assign_id(id);
        self.register(Rc::clone(buffer))?;
        self.set_array_buffer(Some(buffer))?;
        self.native()?
            .buffer_data(BindTarget::ArrayBuffer, buffer.byte_size(), data, buffer.usage());
        debug!(id, bytes = buffer.byte_size(), "buffer created");
        Ok(())
    }

    /// Overwrite `data.len()` bytes of `buffer` starting at `offset`.
    pub fn update_buffer(&mut self, buffer: &Rc<GpuBuffer>, offset: usize, data: Vec<u8>) -> Result<Dispatch> {
        if offset.checked_add(data.len()).is_none_or(|end| end > buffer.byte_size()) {
            return Err(CeplError::InvalidArguments(format!(
                "write of {} bytes at {offset} overruns a {} byte buffer",
                data.len(),
                buffer.byte_size()
            )));
        }
        let handle = Rc::clone(buffer);
        let depends_on: Vec<Rc<dyn Prerequisite>> = vec![Rc::clone(buffer) as Rc<dyn Prerequisite>];
        self.run_if_context_else_defer(
            move |ctx| {
                ctx.set_array_buffer(Some(&handle))?;
                ctx.native()?
                    .buffer_sub_data(BindTarget::ArrayBuffer, offset, &data);
                Ok(())
            },
            depends_on,
        )
    }

    /// Create a vertex array, optionally recording `element_buffer` in it.
    pub fn make_vertex_array(&mut self, element_buffer: Option<Rc<GpuBuffer>>) -> Result<Rc<VertexArray>> {
        let depends_on: Vec<Rc<dyn Prerequisite>> = element_buffer
            .iter()
            .map(|buffer| Rc::clone(buffer) as Rc<dyn Prerequisite>)
            .collect();
        let vao = Rc::new(VertexArray::pending(element_buffer));
        let handle = Rc::clone(&vao);
        self.run_if_context_else_defer(
            move |ctx| {
                let id = ctx.native()?.create_object(ObjectKind::VertexArray);
                handle.assign_id(id);
                ctx.register(Rc::clone(&handle))?;
                ctx.set_vertex_array(Some(&handle))?;
                ctx.set_element_buffer(handle.element_buffer())?;
                debug!(id, "vertex array created");
                Ok(())
            },
            depends_on,
        )?;
        Ok(vao)
    }

    /// Create a texture with the given storage kind.
    pub fn make_texture(
        &mut self,
        dimensions: (u32, u32),
        format: PixelFormat,
        storage: TextureStorage,
    ) -> Result<Rc<Texture>> {
        if dimensions.0 == 0 || dimensions.1 == 0 {
            return Err(CeplError::InvalidArguments(format!(
                "texture dimensions {dimensions:?} must be non-zero"
            )));
        }
        let texture = Rc::new(Texture::pending(dimensions, format, storage));
        let mut depends_on: Vec<Rc<dyn Prerequisite>> = Vec::new();
        match texture.storage() {
            TextureStorage::Mutable => {}
            TextureStorage::Immutable { levels: 0 } => {
                return Err(CeplError::InvalidArguments(
                    "immutable textures need at least one level".into(),
                ))
            }
            TextureStorage::Immutable { .. } => {}
            TextureStorage::BufferBacked(buffer) => {
                if buffer.byte_size() < texture.byte_len() {
                    return Err(CeplError::InvalidArguments(format!(
                        "backing buffer holds {} bytes, texture needs {}",
                        buffer.byte_size(),
                        texture.byte_len()
                    )));
                }
                depends_on.push(Rc::clone(buffer) as Rc<dyn Prerequisite>);
            }
        }
        let handle = Rc::clone(&texture);
        self.run_if_context_else_defer(
            move |ctx| {
                let id = ctx.native()?.create_object(ObjectKind::Texture);
                handle.assign_id(id);
                ctx.bind_texture(0, Some(&handle))?;
                let format = handle.format();
                let dimensions = handle.dimensions();
                let native = ctx.native()?;
                match handle.storage() {
                    TextureStorage::Mutable => native.tex_image_2d(format, dimensions, None),
                    TextureStorage::Immutable { levels } => {
                        native.tex_storage_2d(format, dimensions, *levels)
                    }
                    TextureStorage::BufferBacked(buffer) => native.tex_buffer(format, buffer.id()),
                }
                debug!(id, ?dimensions, ?format, "texture created");
                Ok(())
            },
            depends_on,
        )?;
        Ok(texture)
    }

    /// Replace the contents of `texture` with `data`.
    ///
    /// How the upload is issued depends on the texture's storage kind.
    pub fn upload_texture(&mut self, texture: &Rc<Texture>, data: Vec<u8>) -> Result<Dispatch> {
        if data.len() != texture.byte_len() {
            return Err(CeplError::InvalidArguments(format!(
                "texture upload of {} bytes, expected {}",
                data.len(),
                texture.byte_len()
            )));
        }
        let handle = Rc::clone(texture);
        let depends_on: Vec<Rc<dyn Prerequisite>> = vec![Rc::clone(texture) as Rc<dyn Prerequisite>];
        self.run_if_context_else_defer(
            move |ctx| {
                let format = handle.format();
                let dimensions = handle.dimensions();
                match handle.storage() {
                    TextureStorage::Mutable => {
                        ctx.bind_texture(0, Some(&handle))?;
                        ctx.native()?.tex_image_2d(format, dimensions, Some(data.as_slice()));
                    }
                    TextureStorage::Immutable { .. } => {
                        ctx.bind_texture(0, Some(&handle))?;
                        ctx.native()?.tex_sub_image_2d(format, dimensions, &data);
                    }
                    TextureStorage::BufferBacked(buffer) => {
                        ctx.set_array_buffer(Some(buffer))?;
                        ctx.native()?
                            .buffer_sub_data(BindTarget::ArrayBuffer, 0, &data);
                    }
                }
                Ok(())
            },
            depends_on,
        )
    }

    /// Create a framebuffer drawing into `color_attachments`, in order.
    pub fn make_framebuffer(&mut self, color_attachments: Vec<Rc<Texture>>) -> Result<Rc<Framebuffer>> {
        if color_attachments
            .iter()
            .any(|texture| matches!(texture.storage(), TextureStorage::BufferBacked(_)))
        {
            return Err(CeplError::InvalidArguments(
                "buffer textures cannot be framebuffer attachments".into(),
            ));
        }
        let depends_on: Vec<Rc<dyn Prerequisite>> = color_attachments
            .iter()
            .map(|texture| Rc::clone(texture) as Rc<dyn Prerequisite>)
            .collect();
        let fbo = Rc::new(Framebuffer::pending(color_attachments));
        let handle = Rc::clone(&fbo);
        self.run_if_context_else_defer(
            move |ctx| {
                let id = ctx.native()?.create_object(ObjectKind::Framebuffer);
                handle.assign_id(id);
                ctx.register(Rc::clone(&handle))?;
                ctx.set_draw_framebuffer(Some(&handle))?;
                let native = ctx.native()?;
                for (slot, texture) in handle.color_attachments().iter().enumerate() {
                    native.framebuffer_texture(slot as u32, texture.id());
                }
                debug!(id, attachments = handle.color_attachments().len(), "framebuffer created");
                Ok(())
            },
            depends_on,
        )?;
        Ok(fbo)
    }
}

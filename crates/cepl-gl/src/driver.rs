//! [`Driver`] backed by the process-wide OpenGL function pointers.

use std::marker::PhantomData;
use std::ptr;

use anyhow::{bail, Context as _};
use cepl_core::{BindTarget, BufferUsage, ContextConfig, Driver, ObjectKind, PixelFormat, TextureTarget};
use gl::types::{GLint, GLintptr, GLsizei, GLsizeiptr, GLuint};
use tracing::{debug, error, trace};

use crate::format;
use crate::loader;

/// Upper bound on errors drained by one [`GlDriver::check_errors`].
const MAX_DRAINED_ERRORS: usize = 32;

/// OpenGL implementation of [`Driver`].
///
/// Holds no GL objects of its own. It is `!Send` because GL contexts are
/// current per thread.
#[derive(Debug)]
pub struct GlDriver {
    _thread_bound: PhantomData<*const ()>,
}

impl GlDriver {
    /// Load GL function pointers and wrap the context current on this thread.
    ///
    /// # Safety
    ///
    /// The context current at this call must stay current on this thread for
    /// every later use of the returned driver.
    pub unsafe fn new() -> anyhow::Result<Self> {
        loader::load_gl();
        if !loader::is_context_current() {
            bail!("no GL context is current on this thread");
        }
        let version = loader::version_string().context("GL_VERSION unavailable")?;
        debug!(%version, "wrapping current GL context");
        Ok(Self {
            _thread_bound: PhantomData,
        })
    }

    /// Context limits reported by the driver.
    ///
    /// Values the driver does not report fall back to [`ContextConfig::default`].
    pub fn limits(&self) -> ContextConfig {
        let defaults = ContextConfig::default();
        let uniform = integer(gl::MAX_UNIFORM_BUFFER_BINDINGS);
        let units = integer(gl::MAX_COMBINED_TEXTURE_IMAGE_UNITS);
        let config = defaults
            .with_max_uniform_buffer_bindings(positive_or(uniform, defaults.max_uniform_buffer_bindings))
            .with_max_texture_units(positive_or(units, defaults.max_texture_units));
        debug!(
            uniform_buffers = config.max_uniform_buffer_bindings,
            texture_units = config.max_texture_units,
            "queried GL limits"
        );
        config
    }

    /// Drain the GL error queue, failing if it held anything.
    pub fn check_errors(&self) -> anyhow::Result<()> {
        let mut names = Vec::new();
        while names.len() < MAX_DRAINED_ERRORS {
            let code = unsafe { gl::GetError() };
            if code == gl::NO_ERROR {
                break;
            }
            names.push(format::error_name(code));
        }
        if names.is_empty() {
            return Ok(());
        }
        bail!("GL reported {}", names.join(", "))
    }

    /// Discard pending GL errors.
    pub fn clear_errors(&self) {
        unsafe { while gl::GetError() != gl::NO_ERROR {} }
    }

    /// Put program and blend state back to GL defaults.
    ///
    /// This state is not cached, so it is reset directly.
    pub fn reset_pipeline_state(&mut self) {
        unsafe {
            gl::UseProgram(0);
            gl::Disable(gl::BLEND);
            gl::BlendFunc(gl::ONE, gl::ZERO);
        }
    }
}

fn integer(name: gl::types::GLenum) -> GLint {
    let mut value: GLint = 0;
    unsafe { gl::GetIntegerv(name, &mut value) };
    value
}

fn positive_or(value: GLint, fallback: u32) -> u32 {
    u32::try_from(value).ok().filter(|&v| v > 0).unwrap_or(fallback)
}

fn data_ptr(data: Option<&[u8]>) -> *const std::ffi::c_void {
    data.map_or(ptr::null(), |bytes| bytes.as_ptr().cast())
}

impl Driver for GlDriver {
    fn bind(&mut self, target: BindTarget, id: u32) {
        unsafe {
            match target {
                BindTarget::ArrayBuffer => gl::BindBuffer(gl::ARRAY_BUFFER, id),
                BindTarget::ElementArrayBuffer => gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, id),
                BindTarget::VertexArray => gl::BindVertexArray(id),
                BindTarget::ReadFramebuffer => gl::BindFramebuffer(gl::READ_FRAMEBUFFER, id),
                BindTarget::DrawFramebuffer => gl::BindFramebuffer(gl::DRAW_FRAMEBUFFER, id),
                BindTarget::UniformBuffer(index) => gl::BindBufferBase(gl::UNIFORM_BUFFER, index, id),
            }
        }
    }

    fn bind_framebuffer_combined(&mut self, id: u32) {
        unsafe { gl::BindFramebuffer(gl::FRAMEBUFFER, id) }
    }

    fn query_binding(&mut self, target: BindTarget) -> u32 {
        let mut value: GLint = 0;
        unsafe {
            match target {
                BindTarget::UniformBuffer(index) => {
                    gl::GetIntegeri_v(gl::UNIFORM_BUFFER_BINDING, index, &mut value)
                }
                _ => gl::GetIntegerv(format::binding_query(target), &mut value),
            }
        }
        trace!(%target, value, "queried binding");
        u32::try_from(value).unwrap_or(0)
    }

    fn bind_uniform_whole(&mut self, index: u32, id: u32) {
        unsafe { gl::BindBufferBase(gl::UNIFORM_BUFFER, index, id) }
    }

    fn bind_uniform_range(&mut self, index: u32, id: u32, offset: usize, size: usize) {
        unsafe {
            gl::BindBufferRange(
                gl::UNIFORM_BUFFER,
                index,
                id,
                offset as GLintptr,
                size as GLsizeiptr,
            )
        }
    }

    fn active_texture(&mut self, unit: u32) {
        unsafe { gl::ActiveTexture(gl::TEXTURE0 + unit) }
    }

    fn bind_texture(&mut self, target: TextureTarget, id: u32) {
        unsafe { gl::BindTexture(format::texture_target(target), id) }
    }

    fn create_object(&mut self, kind: ObjectKind) -> u32 {
        let mut id: GLuint = 0;
        unsafe {
            match kind {
                ObjectKind::Buffer => gl::GenBuffers(1, &mut id),
                ObjectKind::Framebuffer => gl::GenFramebuffers(1, &mut id),
                ObjectKind::VertexArray => gl::GenVertexArrays(1, &mut id),
                ObjectKind::Texture => gl::GenTextures(1, &mut id),
            }
        }
        trace!(?kind, id, "generated GL object");
        id
    }

    fn buffer_data(&mut self, target: BindTarget, size: usize, data: Option<&[u8]>, usage: BufferUsage) {
        let Some(gl_target) = format::buffer_target(target) else {
            error!(%target, "buffer_data on a non-buffer target");
            return;
        };
        unsafe {
            gl::BufferData(gl_target, size as GLsizeiptr, data_ptr(data), format::usage(usage));
        }
    }

    fn buffer_sub_data(&mut self, target: BindTarget, offset: usize, data: &[u8]) {
        let Some(gl_target) = format::buffer_target(target) else {
            error!(%target, "buffer_sub_data on a non-buffer target");
            return;
        };
        unsafe {
            gl::BufferSubData(
                gl_target,
                offset as GLintptr,
                data.len() as GLsizeiptr,
                data.as_ptr().cast(),
            );
        }
    }

    fn tex_image_2d(&mut self, format: PixelFormat, (width, height): (u32, u32), data: Option<&[u8]>) {
        let pixel = format::pixel(format);
        unsafe {
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                pixel.internal as GLint,
                width as GLsizei,
                height as GLsizei,
                0,
                pixel.format,
                pixel.ty,
                data_ptr(data),
            );
        }
    }

    fn tex_storage_2d(&mut self, format: PixelFormat, (width, height): (u32, u32), levels: u32) {
        let pixel = format::pixel(format);
        unsafe {
            gl::TexStorage2D(
                gl::TEXTURE_2D,
                levels as GLsizei,
                pixel.internal,
                width as GLsizei,
                height as GLsizei,
            );
        }
    }

    fn tex_sub_image_2d(&mut self, format: PixelFormat, (width, height): (u32, u32), data: &[u8]) {
        let pixel = format::pixel(format);
        unsafe {
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexSubImage2D(
                gl::TEXTURE_2D,
                0,
                0,
                0,
                width as GLsizei,
                height as GLsizei,
                pixel.format,
                pixel.ty,
                data.as_ptr().cast(),
            );
        }
    }

    fn tex_buffer(&mut self, format: PixelFormat, buffer_id: u32) {
        unsafe { gl::TexBuffer(gl::TEXTURE_BUFFER, format::pixel(format).internal, buffer_id) }
    }

    fn framebuffer_texture(&mut self, slot: u32, texture_id: u32) {
        unsafe {
            gl::FramebufferTexture2D(
                gl::DRAW_FRAMEBUFFER,
                gl::COLOR_ATTACHMENT0 + slot,
                gl::TEXTURE_2D,
                texture_id,
                0,
            );
        }
    }
}

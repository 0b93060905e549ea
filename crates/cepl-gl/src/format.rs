//! Mapping from core enums to GL enums.

use cepl_core::{BindTarget, BufferUsage, PixelFormat, TextureTarget};
use gl::types::GLenum;

/// GL target a buffer bind target refers to, if it is a buffer target.
pub fn buffer_target(target: BindTarget) -> Option<GLenum> {
    match target {
        BindTarget::ArrayBuffer => Some(gl::ARRAY_BUFFER),
        BindTarget::ElementArrayBuffer => Some(gl::ELEMENT_ARRAY_BUFFER),
        BindTarget::UniformBuffer(_) => Some(gl::UNIFORM_BUFFER),
        BindTarget::VertexArray | BindTarget::ReadFramebuffer | BindTarget::DrawFramebuffer => None,
    }
}

/// `glGet` name reporting what is bound to `target`.
pub fn binding_query(target: BindTarget) -> GLenum {
    match target {
        BindTarget::ArrayBuffer => gl::ARRAY_BUFFER_BINDING,
        BindTarget::ElementArrayBuffer => gl::ELEMENT_ARRAY_BUFFER_BINDING,
        BindTarget::VertexArray => gl::VERTEX_ARRAY_BINDING,
        BindTarget::ReadFramebuffer => gl::READ_FRAMEBUFFER_BINDING,
        BindTarget::DrawFramebuffer => gl::DRAW_FRAMEBUFFER_BINDING,
        BindTarget::UniformBuffer(_) => gl::UNIFORM_BUFFER_BINDING,
    }
}

pub fn texture_target(target: TextureTarget) -> GLenum {
    match target {
        TextureTarget::Texture2d => gl::TEXTURE_2D,
        TextureTarget::TextureBuffer => gl::TEXTURE_BUFFER,
    }
}

pub fn usage(usage: BufferUsage) -> GLenum {
    match usage {
        BufferUsage::StaticDraw => gl::STATIC_DRAW,
        BufferUsage::DynamicDraw => gl::DYNAMIC_DRAW,
        BufferUsage::StreamDraw => gl::STREAM_DRAW,
        BufferUsage::StaticRead => gl::STATIC_READ,
        BufferUsage::DynamicRead => gl::DYNAMIC_READ,
        BufferUsage::StreamRead => gl::STREAM_READ,
        BufferUsage::StaticCopy => gl::STATIC_COPY,
        BufferUsage::DynamicCopy => gl::DYNAMIC_COPY,
        BufferUsage::StreamCopy => gl::STREAM_COPY,
    }
}

/// Internal format, pixel format, and component type for `format`.
pub struct GlPixelFormat {
    pub internal: GLenum,
    pub format: GLenum,
    pub ty: GLenum,
}

pub fn pixel(format: PixelFormat) -> GlPixelFormat {
    let (internal, format, ty) = match format {
        PixelFormat::R8 => (gl::R8, gl::RED, gl::UNSIGNED_BYTE),
        PixelFormat::Rg8 => (gl::RG8, gl::RG, gl::UNSIGNED_BYTE),
        PixelFormat::Rgba8 => (gl::RGBA8, gl::RGBA, gl::UNSIGNED_BYTE),
        PixelFormat::R32f => (gl::R32F, gl::RED, gl::FLOAT),
        PixelFormat::Rgba32f => (gl::RGBA32F, gl::RGBA, gl::FLOAT),
    };
    GlPixelFormat {
        internal,
        format,
        ty,
    }
}

pub fn error_name(error: GLenum) -> &'static str {
    match error {
        gl::INVALID_ENUM => "GL_INVALID_ENUM",
        gl::INVALID_VALUE => "GL_INVALID_VALUE",
        gl::INVALID_OPERATION => "GL_INVALID_OPERATION",
        gl::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        gl::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        gl::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        gl::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        _ => "unknown GL error",
    }
}

//! Reset GL state back to defaults a host expects.
//!
//! Bindings go through the context, so the cache stays coherent and binds that
//! are already in place are skipped.

use std::rc::Rc;

use cepl_core::{Context, Framebuffer, Result};
use tracing::debug;

use crate::driver::GlDriver;

/// Return every cached target and texture unit to 0.
///
/// The vertex array is unbound before the element buffer so the element
/// binding of the previously bound vertex array is left alone. Texture units
/// are walked from the top so unit 0 ends up active.
pub fn reset_bindings(ctx: &mut Context<GlDriver>) -> Result<()> {
    for unit in (0..ctx.config().max_texture_units).rev() {
        ctx.bind_texture(unit, None)?;
    }
    for index in 0..ctx.config().max_uniform_buffer_bindings {
        ctx.bind_uniform_buffer(index, None, None, None)?;
    }
    ctx.set_vertex_array(None)?;
    ctx.set_element_buffer(None)?;
    ctx.set_array_buffer(None)?;
    ctx.set_framebuffer(None)?;
    Ok(())
}

/// Reset bindings, program, and blend state, then bind `host_framebuffer`.
pub fn reset_state(
    ctx: &mut Context<GlDriver>,
    host_framebuffer: Option<&Rc<Framebuffer>>,
) -> Result<()> {
    if let Some(driver) = ctx.driver_mut() {
        driver.reset_pipeline_state();
    }
    reset_bindings(ctx)?;
    ctx.set_framebuffer(host_framebuffer)?;
    debug!(
        host_framebuffer = host_framebuffer.map_or(0, |fbo| fbo.id()),
        "reset GL state"
    );
    Ok(())
}

//! OpenGL backend for `cepl-core`.
//!
//! [`GlDriver`] issues the raw GL calls a [`cepl_core::Context`] needs. GL
//! function pointers are loaded once per process through `gl_loader`.
//!
//! ```no_run
//! use cepl_core::Context;
//! use cepl_gl::GlDriver;
//!
//! # fn main() -> anyhow::Result<()> {
//! // SAFETY: the host keeps its GL context current on this thread.
//! let driver = unsafe { GlDriver::new()? };
//! let mut ctx = Context::new(driver.limits());
//! ctx.attach(driver)?;
//! # Ok(())
//! # }
//! ```

pub mod driver;
pub mod format;
pub mod loader;
pub mod reset;

pub use driver::GlDriver;
pub use loader::{is_context_current, load_gl};
pub use reset::{reset_bindings, reset_state};

/// Build a context around the GL context current on this thread.
///
/// The config comes from the driver's reported limits.
///
/// # Safety
///
/// Same contract as [`GlDriver::new`].
pub unsafe fn current_context() -> anyhow::Result<cepl_core::Context<GlDriver>> {
    let driver = GlDriver::new()?;
    let mut ctx = cepl_core::Context::new(driver.limits());
    ctx.attach(driver)?;
    Ok(ctx)
}

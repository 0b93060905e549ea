//! GL function pointer loading and current-context detection.

use std::ffi::CStr;
use std::sync::Once;

pub(crate) static GL_INIT_ONCE: Once = Once::new();

/// Load GL function pointers for the process.
///
/// Pointers are loaded exactly once via `gl_loader`; later calls do nothing.
pub fn load_gl() {
    GL_INIT_ONCE.call_once(|| {
        gl_loader::init_gl();
        gl::load_with(|s| gl_loader::get_proc_address(s).cast());
        tracing::debug!("GL function pointers loaded");
    });
}

/// Whether a GL context is current on this thread.
pub fn is_context_current() -> bool {
    gl::GetString::is_loaded() && unsafe { !gl::GetString(gl::VERSION).is_null() }
}

/// `GL_VERSION` of the current context.
pub fn version_string() -> Option<String> {
    if !gl::GetString::is_loaded() {
        return None;
    }
    unsafe {
        let raw = gl::GetString(gl::VERSION);
        if raw.is_null() {
            return None;
        }
        Some(CStr::from_ptr(raw.cast()).to_string_lossy().into_owned())
    }
}

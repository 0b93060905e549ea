//! Binding-state cache and resource bookkeeping for an OpenGL context.
//!
//! The crate is driver-agnostic: all native calls go through the [`Driver`]
//! trait, which `cepl-gl` implements on top of the `gl` crate.
//!
//! # Overview
//!
//! - [`Context`] owns everything below for one native context and is the
//!   only way callers bind cached targets.
//! - [`BindingCache`] records what is bound to each target and lets the
//!   context skip binds that would change nothing. Slots start out unknown
//!   and are filled by asking the driver once, on first use.
//! - [`Registry`] maps native ids back to resource handles, so "what is
//!   bound" can answer with a [`GpuBuffer`] or [`Framebuffer`] rather than a
//!   bare id.
//! - [`DeferredQueue`] holds construction work issued before a native context
//!   exists; [`Context::attach`] flushes it.
//! - [`Memo`] elides repeated native calls with unchanged arguments.
//!
//! # Coherence
//!
//! A cached binding is trusted until invalidated. Anything that binds a
//! cached target without going through the context must call
//! [`Context::invalidate`] for that target afterwards.

pub mod cache;
pub mod config;
pub mod context;
pub mod deferred;
pub mod driver;
pub mod error;
pub mod logging;
pub mod memo;
pub mod registry;
pub mod resources;
pub mod target;
pub mod texture;

pub use cache::{Binding, BindingCache};
pub use config::ContextConfig;
pub use context::{Context, Dispatch, Tracked};
pub use deferred::{DeferredQueue, FlushReport};
pub use driver::{Driver, ObjectKind};
pub use error::{CeplError, Result};
pub use memo::Memo;
pub use registry::Registry;
pub use resources::{BufferUsage, Framebuffer, GpuBuffer, Prerequisite, Resource, VertexArray};
pub use target::{BindTarget, TextureTarget};
pub use texture::{PixelFormat, Texture, TextureStorage};

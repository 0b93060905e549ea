//! Fake driver that records native calls and emulates driver binding state.

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use cepl_core::{
    BindTarget, BufferUsage, Context, ContextConfig, Driver, ObjectKind, PixelFormat, Prerequisite,
    TextureTarget,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Bind(BindTarget, u32),
    BindFramebufferCombined(u32),
    Query(BindTarget),
    UniformWhole(u32, u32),
    UniformRange(u32, u32, usize, usize),
    ActiveTexture(u32),
    BindTexture(TextureTarget, u32),
    Create(ObjectKind),
    BufferData(BindTarget, usize, Option<Vec<u8>>, BufferUsage),
    BufferSubData(BindTarget, usize, Vec<u8>),
    TexImage(PixelFormat, (u32, u32), bool),
    TexStorage(PixelFormat, (u32, u32), u32),
    TexSubImage(PixelFormat, (u32, u32)),
    TexBuffer(PixelFormat, u32),
    FramebufferTexture(u32, u32),
}

#[derive(Debug, Default)]
pub struct RecordingDriver {
    pub calls: Vec<Call>,
    bound: HashMap<BindTarget, u32>,
    vao_elements: HashMap<u32, u32>,
    next_id: u32,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Driver state set up outside the context, e.g. by a host application.
    pub fn with_bound(mut self, target: BindTarget, id: u32) -> Self {
        self.bound.insert(target, id);
        self
    }

    pub fn bound(&self, target: BindTarget) -> u32 {
        self.bound.get(&target).copied().unwrap_or(0)
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| pred(call)).count()
    }

    pub fn queries(&self, target: BindTarget) -> usize {
        self.count(|call| *call == Call::Query(target))
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Driver for RecordingDriver {
    fn bind(&mut self, target: BindTarget, id: u32) {
        self.calls.push(Call::Bind(target, id));
        self.bound.insert(target, id);
        match target {
            BindTarget::VertexArray => {
                let element = self.vao_elements.get(&id).copied().unwrap_or(0);
                self.bound.insert(BindTarget::ElementArrayBuffer, element);
            }
            BindTarget::ElementArrayBuffer => {
                let vao = self.bound(BindTarget::VertexArray);
                self.vao_elements.insert(vao, id);
            }
            _ => {}
        }
    }

    fn bind_framebuffer_combined(&mut self, id: u32) {
        self.calls.push(Call::BindFramebufferCombined(id));
        self.bound.insert(BindTarget::ReadFramebuffer, id);
        self.bound.insert(BindTarget::DrawFramebuffer, id);
    }

    fn query_binding(&mut self, target: BindTarget) -> u32 {
        self.calls.push(Call::Query(target));
        self.bound(target)
    }

    fn bind_uniform_whole(&mut self, index: u32, id: u32) {
        self.calls.push(Call::UniformWhole(index, id));
        self.bound.insert(BindTarget::UniformBuffer(index), id);
    }

    fn bind_uniform_range(&mut self, index: u32, id: u32, offset: usize, size: usize) {
        self.calls.push(Call::UniformRange(index, id, offset, size));
        self.bound.insert(BindTarget::UniformBuffer(index), id);
    }

    fn active_texture(&mut self, unit: u32) {
        self.calls.push(Call::ActiveTexture(unit));
    }

    fn bind_texture(&mut self, target: TextureTarget, id: u32) {
        self.calls.push(Call::BindTexture(target, id));
    }

    fn create_object(&mut self, kind: ObjectKind) -> u32 {
        self.calls.push(Call::Create(kind));
        self.next_id += 1;
        self.next_id
    }

    fn buffer_data(&mut self, target: BindTarget, size: usize, data: Option<&[u8]>, usage: BufferUsage) {
        self.calls
            .push(Call::BufferData(target, size, data.map(<[u8]>::to_vec), usage));
    }

    fn buffer_sub_data(&mut self, target: BindTarget, offset: usize, data: &[u8]) {
        self.calls
            .push(Call::BufferSubData(target, offset, data.to_vec()));
    }

    fn tex_image_2d(&mut self, format: PixelFormat, dimensions: (u32, u32), data: Option<&[u8]>) {
        self.calls
            .push(Call::TexImage(format, dimensions, data.is_some()));
    }

    fn tex_storage_2d(&mut self, format: PixelFormat, dimensions: (u32, u32), levels: u32) {
        self.calls.push(Call::TexStorage(format, dimensions, levels));
    }

    fn tex_sub_image_2d(&mut self, format: PixelFormat, dimensions: (u32, u32), _data: &[u8]) {
        self.calls.push(Call::TexSubImage(format, dimensions));
    }

    fn tex_buffer(&mut self, format: PixelFormat, buffer_id: u32) {
        self.calls.push(Call::TexBuffer(format, buffer_id));
    }

    fn framebuffer_texture(&mut self, slot: u32, texture_id: u32) {
        self.calls.push(Call::FramebufferTexture(slot, texture_id));
    }
}

/// A context with a fresh fake driver already attached.
pub fn attached() -> Context<RecordingDriver> {
    attached_with(RecordingDriver::new())
}

pub fn attached_with(driver: RecordingDriver) -> Context<RecordingDriver> {
    let mut ctx = Context::new(ContextConfig::default());
    ctx.attach(driver).unwrap();
    ctx
}

pub fn driver(ctx: &Context<RecordingDriver>) -> &RecordingDriver {
    ctx.driver().unwrap()
}

pub fn calls(ctx: &Context<RecordingDriver>) -> &[Call] {
    &driver(ctx).calls
}

pub fn clear_calls(ctx: &mut Context<RecordingDriver>) {
    ctx.driver_mut().unwrap().clear();
}

/// Prerequisite whose readiness a test flips by hand.
#[derive(Debug, Default)]
pub struct Gate(Cell<bool>);

impl Gate {
    pub fn open(&self) {
        self.0.set(true);
    }
}

impl Prerequisite for Gate {
    fn is_initialized(&self) -> bool {
        self.0.get()
    }
}

pub fn gate() -> Rc<Gate> {
    Rc::new(Gate::default())
}

pub fn dep<P: Prerequisite + 'static>(prerequisite: &Rc<P>) -> Rc<dyn Prerequisite> {
    prerequisite.clone()
}

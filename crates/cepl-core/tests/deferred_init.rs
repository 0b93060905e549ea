mod common;

use std::cell::Cell;
use std::rc::Rc;

use cepl_core::{
    BufferUsage, CeplError, Context, ContextConfig, Dispatch, FlushReport, ObjectKind, PixelFormat,
    TextureStorage,
};
use common::{attached, calls, dep, driver, gate, Call, RecordingDriver};

fn counter() -> (Rc<Cell<u32>>, Rc<Cell<u32>>) {
    let count = Rc::new(Cell::new(0));
    (Rc::clone(&count), count)
}

#[test]
fn nothing_runs_before_a_context_is_attached() {
    let mut ctx: Context<RecordingDriver> = Context::default();
    let (seen, count) = counter();
    let dispatch = ctx
        .run_if_context_else_defer(
            move |_| {
                count.set(count.get() + 1);
                Ok(())
            },
            Vec::new(),
        )
        .unwrap();
    assert_eq!(dispatch, Dispatch::Deferred);
    assert_eq!(ctx.flush_deferred().unwrap().pending, 1);
    assert_eq!(seen.get(), 0);

    let report = ctx.attach(RecordingDriver::new()).unwrap();
    assert_eq!(
        report,
        FlushReport {
            executed: 1,
            pending: 0,
            passes: 1,
        }
    );
    assert_eq!(seen.get(), 1);
}

#[test]
fn runs_immediately_when_attached_and_ready() {
    let mut ctx = attached();
    let (seen, count) = counter();
    let dispatch = ctx
        .run_if_context_else_defer(
            move |_| {
                count.set(count.get() + 1);
                Ok(())
            },
            Vec::new(),
        )
        .unwrap();
    assert_eq!(dispatch, Dispatch::Ran);
    assert_eq!(seen.get(), 1);
    assert_eq!(ctx.pending_tasks(), 0);
}

#[test]
fn waits_for_every_dependency_across_flushes() {
    let (a, b) = (gate(), gate());
    let mut ctx: Context<RecordingDriver> = Context::default();
    let (seen, count) = counter();
    ctx.run_if_context_else_defer(
        move |_| {
            count.set(count.get() + 1);
            Ok(())
        },
        vec![dep(&a), dep(&b)],
    )
    .unwrap();

    let report = ctx.attach(RecordingDriver::new()).unwrap();
    assert_eq!((report.executed, report.pending), (0, 1));

    a.open();
    let report = ctx.flush_deferred().unwrap();
    assert_eq!((report.executed, report.pending), (0, 1));
    assert_eq!(seen.get(), 0);

    b.open();
    let report = ctx.flush_deferred().unwrap();
    assert_eq!((report.executed, report.pending), (1, 0));
    assert_eq!(seen.get(), 1);
}

#[test]
fn attached_context_still_defers_on_missing_dependencies() {
    let blocker = gate();
    let mut ctx = attached();
    let dispatch = ctx
        .run_if_context_else_defer(|_| Ok(()), vec![dep(&blocker)])
        .unwrap();
    assert_eq!(dispatch, Dispatch::Deferred);
    assert_eq!(ctx.pending_tasks(), 1);
}

#[test]
fn dependent_construction_resolves_over_several_passes() {
    let mut ctx: Context<RecordingDriver> = Context::default();
    let texture = ctx
        .make_texture((4, 4), PixelFormat::Rgba8, TextureStorage::Immutable { levels: 1 })
        .unwrap();
    let fbo = ctx.make_framebuffer(vec![Rc::clone(&texture)]).unwrap();
    assert_eq!((texture.id(), fbo.id()), (0, 0));

    let report = ctx.attach(RecordingDriver::new()).unwrap();
    assert_eq!(
        report,
        FlushReport {
            executed: 2,
            pending: 0,
            passes: 2,
        }
    );
    assert_ne!(texture.id(), 0);
    assert_ne!(fbo.id(), 0);
    assert!(Rc::ptr_eq(&ctx.framebuffer(fbo.id()).unwrap(), &fbo));
    assert!(calls(&ctx).contains(&Call::FramebufferTexture(0, texture.id())));

    // Creation bound the framebuffer through the cache.
    assert!(Rc::ptr_eq(&ctx.draw_framebuffer().unwrap(), &fbo));
    assert_eq!(driver(&ctx).count(|call| matches!(call, Call::Query(_))), 0);
}

#[test]
fn pass_limit_leaves_the_rest_for_a_later_flush() {
    let mut ctx = Context::new(ContextConfig::default().with_max_flush_passes(1));
    let texture = ctx
        .make_texture((4, 4), PixelFormat::Rgba8, TextureStorage::Mutable)
        .unwrap();
    let fbo = ctx.make_framebuffer(vec![texture]).unwrap();

    let report = ctx.attach(RecordingDriver::new()).unwrap();
    assert_eq!((report.executed, report.pending, report.passes), (1, 1, 1));
    assert_eq!(fbo.id(), 0);

    let report = ctx.flush_deferred().unwrap();
    assert_eq!((report.executed, report.pending), (1, 0));
    assert_ne!(fbo.id(), 0);
}

#[test]
fn failing_task_keeps_the_rest_queued() {
    let mut ctx: Context<RecordingDriver> = Context::default();
    let (seen, count) = counter();
    ctx.run_if_context_else_defer(
        |_| Err(CeplError::InvalidArguments("boom".into())),
        Vec::new(),
    )
    .unwrap();
    ctx.run_if_context_else_defer(
        move |_| {
            count.set(count.get() + 1);
            Ok(())
        },
        Vec::new(),
    )
    .unwrap();

    let err = ctx.attach(RecordingDriver::new()).unwrap_err();
    assert!(matches!(err, CeplError::InvalidArguments(_)));
    assert!(ctx.is_attached());
    assert_eq!(ctx.pending_tasks(), 1);
    assert_eq!(seen.get(), 0);

    assert_eq!(ctx.flush_deferred().unwrap().executed, 1);
    assert_eq!(seen.get(), 1);
}

#[test]
fn deferred_upload_waits_for_its_texture() {
    let mut ctx: Context<RecordingDriver> = Context::default();
    let texture = ctx
        .make_texture((2, 1), PixelFormat::R8, TextureStorage::Mutable)
        .unwrap();
    let dispatch = ctx.upload_texture(&texture, vec![1, 2]).unwrap();
    assert_eq!(dispatch, Dispatch::Deferred);

    let report = ctx.attach(RecordingDriver::new()).unwrap();
    assert_eq!((report.executed, report.passes), (2, 2));
    assert_eq!(
        calls(&ctx),
        [
            Call::Create(ObjectKind::Texture),
            Call::ActiveTexture(0),
            Call::BindTexture(cepl_core::TextureTarget::Texture2d, texture.id()),
            Call::TexImage(PixelFormat::R8, (2, 1), false),
            Call::TexImage(PixelFormat::R8, (2, 1), true),
        ]
    );
}

#[test]
fn tasks_can_issue_further_work_while_flushing() {
    let mut ctx: Context<RecordingDriver> = Context::default();
    let buffer = ctx.make_empty_buffer(8, BufferUsage::StreamDraw).unwrap();
    let handle = Rc::clone(&buffer);
    ctx.run_if_context_else_defer(
        move |ctx| {
            ctx.update_buffer(&handle, 0, vec![7; 8])?;
            Ok(())
        },
        vec![dep(&buffer)],
    )
    .unwrap();

    let report = ctx.attach(RecordingDriver::new()).unwrap();
    assert_eq!(report.pending, 0);
    assert!(calls(&ctx).contains(&Call::BufferSubData(
        cepl_core::BindTarget::ArrayBuffer,
        0,
        vec![7; 8]
    )));
}

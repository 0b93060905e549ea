//! Work that waits for a native context and for other resources.
//!
//! A [`Task`] pairs an action with the prerequisites it still waits on. The
//! queue never runs anything itself; [`Context::flush_deferred`] pulls ready
//! tasks out pass by pass and runs them against the context.
//!
//! [`Context::flush_deferred`]: crate::Context::flush_deferred

use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::resources::Prerequisite;

/// Deferred action, run once against the context `C`.
pub type Action<C> = Box<dyn FnOnce(&mut C) -> Result<()>>;

pub struct Task<C> {
    waiting: Vec<Rc<dyn Prerequisite>>,
    action: Action<C>,
}

impl<C> Task<C> {
    pub fn new(action: Action<C>, depends_on: Vec<Rc<dyn Prerequisite>>) -> Self {
        Self {
            waiting: depends_on,
            action,
        }
    }

    /// Prerequisites not yet seen initialized.
    pub fn waiting(&self) -> usize {
        self.waiting.len()
    }

    /// Drop prerequisites that are initialized now. Returns whether none remain.
    fn prune(&mut self) -> bool {
        self.waiting.retain(|dep| !dep.is_initialized());
        self.waiting.is_empty()
    }

    pub fn run(self, ctx: &mut C) -> Result<()> {
        (self.action)(ctx)
    }
}

impl<C> fmt::Debug for Task<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("waiting", &self.waiting.len())
            .finish_non_exhaustive()
    }
}

/// Tasks in enqueue order.
pub struct DeferredQueue<C> {
    tasks: Vec<Task<C>>,
}

impl<C> Default for DeferredQueue<C> {
    fn default() -> Self {
        Self { tasks: Vec::new() }
    }
}

impl<C> fmt::Debug for DeferredQueue<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("tasks", &self.tasks)
            .finish()
    }
}

impl<C> DeferredQueue<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task. Never runs it, whatever the context state.
    pub fn enqueue(
        &mut self,
        action: impl FnOnce(&mut C) -> Result<()> + 'static,
        depends_on: Vec<Rc<dyn Prerequisite>>,
    ) {
        self.tasks.push(Task::new(Box::new(action), depends_on));
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// One scan over the queue.
    ///
    /// Removes satisfied prerequisites from every task and takes out, in
    /// enqueue order, the tasks left with none. The rest stay queued.
    pub fn take_ready(&mut self) -> Vec<Task<C>> {
        let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .map(|mut task| (task.prune(), task))
            .partition(|(done, _)| *done);
        self.tasks = waiting.into_iter().map(|(_, task)| task).collect();
        ready.into_iter().map(|(_, task)| task).collect()
    }

    /// Put tasks back at the head of the queue, keeping their order.
    pub(crate) fn requeue_front(&mut self, tasks: Vec<Task<C>>) {
        if tasks.is_empty() {
            return;
        }
        let rest = std::mem::replace(&mut self.tasks, tasks);
        self.tasks.extend(rest);
    }
}

/// Outcome of one flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlushReport {
    pub executed: usize,
    /// Tasks still waiting on prerequisites afterwards.
    pub pending: usize,
    /// Passes that ran at least one task.
    pub passes: usize,
}

use alloc::collections::VecDeque;

/// A single-threaded deferred task queue.
///
/// Scheduling a task that is already queued is a no-op, so a burst of synchronous mutations
/// results in one pass of each kind of work.
#[derive(Clone, Debug)]
pub(crate) struct TaskQueue<T> {
    queue: VecDeque<T>,
}

impl<T: PartialEq> TaskQueue<T> {
    pub(crate) fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Returns `true` when the task was newly queued.
    pub(crate) fn schedule(&mut self, task: T) -> bool {
        if self.queue.contains(&task) {
            return false;
        }
        self.queue.push_back(task);
        true
    }

    pub(crate) fn pop(&mut self) -> Option<T> {
        self.queue.pop_front()
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    pub(crate) fn retain(&mut self, f: impl FnMut(&T) -> bool) {
        self.queue.retain(f);
    }
}

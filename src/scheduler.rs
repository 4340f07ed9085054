// Scheduler module
// Ordered queue of per-frame render tasks with a cap on how many may be in
// flight at once. The pipeline asks for work only while a slot is free, so a
// large batch never floods the blocking pool.

use std::collections::VecDeque;

/// A frame waiting to be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Task {
    pub frame_index: u32,
}

impl Task {
    pub fn new(frame_index: u32) -> Self {
        Self { frame_index }
    }
}

pub struct Scheduler {
    // pending, ascending frame index
    task_queue: VecDeque<Task>,
    max_concurrent: usize,
    active_tasks: usize,
}

impl Scheduler {
    /// `max_concurrent` is raised to at least 1.
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            task_queue: VecDeque::new(),
            max_concurrent: max_concurrent.max(1),
            active_tasks: 0,
        }
    }

    /// Queue every index, sorted once up front.
    pub fn from_indices(indices: impl IntoIterator<Item = u32>, max_concurrent: usize) -> Self {
        let mut tasks: Vec<Task> = indices.into_iter().map(Task::new).collect();
        tasks.sort_unstable();
        Self {
            task_queue: tasks.into(),
            ..Self::new(max_concurrent)
        }
    }

    /// Insert after any queued task with the same or a lower frame index.
    pub fn schedule_task(&mut self, task: Task) {
        let pos = self.task_queue.partition_point(|t| *t <= task);
        self.task_queue.insert(pos, task);
    }

    /// Next task, or `None` when the queue is empty or every slot is taken.
    pub fn next_task(&mut self) -> Option<Task> {
        if self.active_tasks >= self.max_concurrent {
            return None;
        }
        let task = self.task_queue.pop_front()?;
        self.active_tasks += 1;
        Some(task)
    }

    /// Free the slot of a finished task.
    pub fn complete_task(&mut self) {
        self.active_tasks = self.active_tasks.saturating_sub(1);
    }

    /// Drop everything still queued; running tasks keep their slots.
    pub fn clear_pending(&mut self) -> usize {
        let dropped = self.task_queue.len();
        self.task_queue.clear();
        dropped
    }

    pub fn pending(&self) -> usize {
        self.task_queue.len()
    }

    pub fn active(&self) -> usize {
        self.active_tasks
    }
}

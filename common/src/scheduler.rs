use crate::ports::TaskScheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskId {
    Redraw,
}

impl TaskId {
    fn mask(self) -> u32 {
        match self {
            Self::Redraw => 1 << 0,
        }
    }
}

/// Set of tasks waiting for their next run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingTasks {
    bits: u32,
}

impl PendingTasks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self, task: TaskId) -> bool {
        self.bits & task.mask() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Clears the request and reports whether one was outstanding.
    pub fn take(&mut self, task: TaskId) -> bool {
        let pending = self.is_pending(task);
        self.bits &= !task.mask();
        pending
    }
}

impl TaskScheduler for PendingTasks {
    fn request_run(&mut self, task: TaskId) {
        self.bits |= task.mask();
    }
}

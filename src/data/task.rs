use std::sync::{
    atomic::{AtomicBool, Ordering::Relaxed},
    Arc,
};

use super::Program;

/// Cloneable stop switch for a running [`RenderTask`].
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Uninitialized,
    Running,
    Stopped,
}

/// One frame per host callback. The host re-arms the task for as long
/// as [`RenderTask::run_frame`] returns `true`.
#[derive(Debug)]
pub struct RenderTask {
    state: TaskState,
    cancel: CancelHandle,
    frames: u64,
    limit: Option<u64>,
}

impl RenderTask {
    pub fn new(limit: Option<u64>) -> Self {
        Self {
            state: TaskState::Uninitialized,
            cancel: CancelHandle::default(),
            frames: 0,
            limit,
        }
    }

    #[cfg_attr(not(feature = "terminal"), allow(dead_code))]
    pub fn handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_running(&self) -> bool {
        self.state == TaskState::Running
    }

    pub fn start(&mut self) {
        if self.state == TaskState::Uninitialized && !self.cancel.is_cancelled() {
            self.state = TaskState::Running;
        }
    }

    pub fn stop(&mut self) {
        self.cancel.cancel();
        self.state = TaskState::Stopped;
    }

    /// Render one frame into `prog`. Returns whether another frame
    /// should be requested.
    pub fn run_frame(&mut self, prog: &mut Program) -> bool {
        if self.state != TaskState::Running {
            return false;
        }

        if self.cancel.is_cancelled() || self.limit_reached() {
            self.stop();
            return false;
        }

        prog.render();
        self.frames += 1;

        if self.limit_reached() {
            log::info!("Rendered {} frames, stopping.", self.frames);
            self.stop();
        }

        self.is_running()
    }

    fn limit_reached(&self) -> bool {
        self.limit.is_some_and(|limit| self.frames >= limit)
    }
}

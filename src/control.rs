//! Cooperative pause / stop control for a running render.
//!
//! The interpreter asks a [`Checkpoint`] before every symbol whether to go on. The renderer's
//! checkpoint consults a [`RenderControl`], which other threads may hold clones of.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};

/// A yield point consulted once per processed symbol.
pub trait Checkpoint {
    /// `Break` abandons the current pass.
    fn checkpoint(&mut self) -> ControlFlow<()>;
}

/// A checkpoint that never interrupts.
#[derive(Clone, Copy, Debug, Default)]
pub struct Uninterrupted;

impl Checkpoint for Uninterrupted {
    fn checkpoint(&mut self) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

#[derive(Debug, Default)]
struct ControlState {
    stopped: AtomicBool,
    paused: AtomicBool,
    lock: Mutex<()>,
    wake: Condvar,
}

/// Shared stop / pause flags of one renderer.
///
/// Cloning is cheap and every clone controls the same renderer.
#[derive(Clone, Debug, Default)]
pub struct RenderControl {
    state: Arc<ControlState>,
}

impl RenderControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the running pass to stop at the next symbol.
    ///
    /// Also lifts any pause, so a paused run is released and the next run starts unpaused.
    pub fn stop(&self) {
        let _guard = self.state.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.state.stopped.store(true, Ordering::SeqCst);
        self.state.paused.store(false, Ordering::SeqCst);
        self.state.wake.notify_all();
    }

    /// Requests the running pass to wait at the next symbol until resumed or stopped.
    pub fn pause(&self) {
        self.state.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        let _guard = self.state.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.state.paused.store(false, Ordering::SeqCst);
        self.state.wake.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        self.state.stopped.load(Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused.load(Ordering::SeqCst)
    }

    /// Clears a stop request left over from a previous run.
    pub(crate) fn clear_stop(&self) {
        self.state.stopped.store(false, Ordering::SeqCst);
    }

    /// Blocks while paused. Returns once resumed or stopped.
    pub(crate) fn wait_while_paused(&self) {
        let mut guard = self.state.lock.lock().unwrap_or_else(PoisonError::into_inner);
        while self.is_paused() && !self.is_stopped() {
            guard = self
                .state
                .wake
                .wait(guard)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clones_share_flags() {
        let control = RenderControl::new();
        let remote = control.clone();
        remote.pause();
        assert!(control.is_paused());
        remote.stop();
        assert!(control.is_stopped());
        assert!(!control.is_paused());
        control.clear_stop();
        assert!(!remote.is_stopped());
    }

    #[test]
    fn test_stop_releases_waiter() {
        let control = RenderControl::new();
        control.pause();
        let waiter = {
            let control = control.clone();
            thread::spawn(move || control.wait_while_paused())
        };
        control.stop();
        waiter.join().unwrap();
        assert!(!control.is_paused());
    }
}

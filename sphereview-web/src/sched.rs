//! Frame-loop bookkeeping, kept free of browser bindings so the
//! start/stop life cycle runs under host tests.

/// Scheduling state for a self-rescheduling frame callback: the running
/// flag plus the id of any frame request currently pending with the
/// host.
pub struct LoopState {
    running: bool,
    pending: Option<i32>,
}

impl LoopState {
    pub fn new() -> Self {
        Self {
            running: false,
            pending: None,
        }
    }

    /// Begin a run. Returns false when the loop is already running.
    pub fn try_start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// Record the id of a frame request accepted by the host.
    pub fn frame_requested(&mut self, id: i32) {
        self.pending = Some(id);
    }

    /// The host refused the frame request; the loop is dead.
    pub fn request_failed(&mut self) {
        self.running = false;
        self.pending = None;
    }

    /// A scheduled frame fired. Returns false when the loop was stopped
    /// while the request was in flight and the callback must not run.
    pub fn tick_started(&mut self) -> bool {
        self.pending = None;
        self.running
    }

    /// The callback finished with the given verdict. Returns true when
    /// another frame should be requested; otherwise the loop is over.
    pub fn tick_finished(&mut self, keep_going: bool) -> bool {
        if keep_going && self.running {
            true
        } else {
            self.running = false;
            false
        }
    }

    /// Stop the loop. Returns a pending request id for the caller to
    /// cancel, if one is in flight.
    pub fn stop(&mut self) -> Option<i32> {
        self.running = false;
        self.pending.take()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Default for LoopState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive the state the way the frame callback does: tick, decide,
    /// re-request. Returns how many ticks ran before the queue dried up.
    fn drain(state: &mut LoopState, refreshes: i32) -> i32 {
        let mut ticks = 0;
        let mut pending = state.is_running();
        for id in 1..=refreshes {
            if !pending || !state.tick_started() {
                break;
            }
            ticks += 1;
            pending = state.tick_finished(true);
            if pending {
                state.frame_requested(id);
            }
        }
        ticks
    }

    // ── steady state ──

    #[test]
    fn test_loop_reschedules_every_refresh() {
        let mut state = LoopState::new();
        assert!(state.try_start());
        state.frame_requested(0);
        assert_eq!(drain(&mut state, 10), 10);
        assert!(state.is_running());
    }

    #[test]
    fn test_double_start_is_refused() {
        let mut state = LoopState::new();
        assert!(state.try_start());
        assert!(!state.try_start());
    }

    // ── stopping ──

    #[test]
    fn test_stop_cancels_pending_request() {
        let mut state = LoopState::new();
        state.try_start();
        state.frame_requested(7);
        assert_eq!(state.stop(), Some(7));
        assert!(!state.is_running());
        // The cancelled frame must not run even if it still fires.
        assert!(!state.tick_started());
    }

    #[test]
    fn test_start_ticks_then_stop() {
        let mut state = LoopState::new();
        state.try_start();
        state.frame_requested(0);
        assert_eq!(drain(&mut state, 5), 5);
        state.stop();
        assert!(!state.is_running());
        assert_eq!(drain(&mut state, 5), 0);
    }

    #[test]
    fn test_callback_verdict_ends_loop() {
        let mut state = LoopState::new();
        state.try_start();
        state.frame_requested(0);
        state.tick_started();
        assert!(!state.tick_finished(false));
        assert!(!state.is_running());
    }

    // ── restarting ──

    #[test]
    fn test_restart_after_stop() {
        let mut state = LoopState::new();
        state.try_start();
        state.frame_requested(1);
        state.stop();
        assert!(state.try_start());
        state.frame_requested(2);
        assert_eq!(drain(&mut state, 3), 3);
    }

    #[test]
    fn test_request_failure_kills_loop() {
        let mut state = LoopState::new();
        state.try_start();
        state.request_failed();
        assert!(!state.is_running());
        assert!(state.try_start());
    }
}

// ─── First-play gate ─────────────────────────────────────────────────

/// Where the gate is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// No video yet, or autoplay was allowed.
    Idle,
    /// Waiting for the first qualifying user gesture.
    AwaitingGesture,
    /// Playback has been started; further gestures are ignored.
    Playing,
}

/// First-play gating for platforms where video may only start from a user
/// gesture.
///
/// Two live states (AwaitingGesture, Playing) plus the idle pre-state.
/// `gesture()` reports true exactly once, so the caller can guarantee a
/// single playback start and a single listener removal no matter how many
/// taps arrive.
#[derive(Debug, Clone, Copy)]
pub struct PlayGate {
    state: GateState,
}

impl PlayGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Idle,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Arm the gate: a gesture is now required before playback.
    pub fn arm(&mut self) {
        if self.state == GateState::Idle {
            self.state = GateState::AwaitingGesture;
        }
    }

    /// Skip the gesture requirement (autoplay platforms).
    pub fn begin(&mut self) {
        self.state = GateState::Playing;
    }

    /// Record a user gesture. Returns true only for the first gesture
    /// after arming; that transition also moves the gate to Playing.
    pub fn gesture(&mut self) -> bool {
        if self.state == GateState::AwaitingGesture {
            self.state = GateState::Playing;
            true
        } else {
            false
        }
    }
}

impl Default for PlayGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gesture_before_arming_is_ignored() {
        let mut gate = PlayGate::new();
        assert!(!gate.gesture());
        assert_eq!(gate.state(), GateState::Idle);
    }

    #[test]
    fn test_first_gesture_fires_once() {
        let mut gate = PlayGate::new();
        gate.arm();
        assert_eq!(gate.state(), GateState::AwaitingGesture);
        assert!(gate.gesture());
        assert_eq!(gate.state(), GateState::Playing);
        assert!(!gate.gesture());
        assert!(!gate.gesture());
    }

    #[test]
    fn test_begin_skips_gesture() {
        let mut gate = PlayGate::new();
        gate.begin();
        assert_eq!(gate.state(), GateState::Playing);
        assert!(!gate.gesture());
    }

    #[test]
    fn test_arm_after_playing_does_nothing() {
        let mut gate = PlayGate::new();
        gate.begin();
        gate.arm();
        assert_eq!(gate.state(), GateState::Playing);
    }
}

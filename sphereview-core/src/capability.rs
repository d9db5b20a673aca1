/// Platform capabilities and policies, decided once at boot by the host
/// layer and injected into the controller.
///
/// The web runtime fills these in from its environment (WebGL probe, mobile
/// user-agent heuristic, `debug` query flag). Keeping them as plain flags
/// means the controller's branches are exercised in host tests without any
/// device detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformCaps {
    /// The graphics API the renderer needs is available.
    pub webgl: bool,
    /// Video playback may only start from an explicit user gesture
    /// (mobile autoplay policy).
    pub requires_play_gesture: bool,
    /// Show the performance overlay.
    pub debug_overlay: bool,
}

impl PlatformCaps {
    /// Desktop-like defaults: graphics available, autoplay allowed.
    pub fn desktop() -> Self {
        Self {
            webgl: true,
            requires_play_gesture: false,
            debug_overlay: false,
        }
    }

    /// Mobile-like defaults: graphics available, gesture required.
    pub fn mobile() -> Self {
        Self {
            requires_play_gesture: true,
            ..Self::desktop()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_allows_autoplay() {
        let caps = PlatformCaps::desktop();
        assert!(caps.webgl);
        assert!(!caps.requires_play_gesture);
    }

    #[test]
    fn test_mobile_requires_gesture() {
        assert!(PlatformCaps::mobile().requires_play_gesture);
    }
}

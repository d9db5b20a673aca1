use crate::command::PlaybackCommand;

// ─── View mode ───────────────────────────────────────────────────────

/// Viewing mode reported by the renderer.
///
/// The controller never interprets this value; it only relays it to the
/// embedding page, which keys off the wire label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Normal,
    Fullscreen,
}

impl ViewMode {
    /// Stable label used in the outbound `modechange` message.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Fullscreen => "fullscreen",
        }
    }
}

// ─── Events ──────────────────────────────────────────────────────────

/// Everything that can happen to the viewer, as one typed stream.
///
/// Collaborators (loader, renderer, message receiver, input) feed these to
/// [`crate::Controller::handle`] instead of subscribing to each other
/// directly.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    /// The hosting page finished loading.
    PageReady,
    /// The scene loader produced a scene description.
    SceneLoaded,
    /// The scene loader failed.
    SceneError(String),
    /// The renderer finished setting up the attached scene.
    RendererLoaded { has_video: bool },
    /// The renderer failed at setup or runtime.
    RendererError(String),
    /// The renderer switched viewing mode.
    ModeChanged(ViewMode),
    /// A qualifying user gesture (tap) arrived while a gesture was armed.
    PlayGesture,
    /// A playback command arrived from the embedding page.
    Command(PlaybackCommand),
}

// ─── Actions ─────────────────────────────────────────────────────────

/// Side effects requested by the controller, applied by the host layer.
///
/// The controller returns these instead of mutating the DOM or the
/// renderer itself; the list order is the order the original embed
/// performed the effects in.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Start the scene loader.
    LoadScene,
    /// Request the first animation frame.
    StartFrameLoop,
    /// Attach the performance overlay.
    ShowStats,
    /// Hide the loading indicator.
    HideLoading,
    /// Show the error banner. Terminal; there is no corresponding hide.
    ShowError { title: String, message: String },
    /// Show the tap-to-play prompt.
    ShowPlayPrompt,
    /// Hide the tap-to-play prompt.
    HidePlayPrompt,
    /// Hand the pending scene to the renderer.
    AttachScene,
    /// Start video playback through the video proxy.
    StartPlayback,
    /// Pause video playback through the video proxy.
    PausePlayback,
    /// Install the one-shot tap listener.
    ArmPlayGesture,
    /// Remove the tap listener.
    DisarmPlayGesture,
    /// Forward a mode change to the embedding page.
    PostModeChange(ViewMode),
}

impl Action {
    /// Convenience constructor; every error banner uses the same title.
    pub fn error(message: impl Into<String>) -> Self {
        Self::ShowError {
            title: "Error".to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_labels() {
        assert_eq!(ViewMode::Normal.label(), "normal");
        assert_eq!(ViewMode::Fullscreen.label(), "fullscreen");
    }

    #[test]
    fn test_error_action_title() {
        match Action::error("boom") {
            Action::ShowError { title, message } => {
                assert_eq!(title, "Error");
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }
}

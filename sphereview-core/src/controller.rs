use crate::capability::PlatformCaps;
use crate::command::PlaybackCommand;
use crate::event::{Action, ViewerEvent};
use crate::gate::PlayGate;

/// Bootstrap controller for the viewer.
///
/// Consumes the single typed event stream and answers with the list of
/// side effects the host layer should perform, in order. The controller
/// owns no collaborators; it only tracks the little state the original
/// embed kept implicitly (whether boot ran, whether the scene was handed
/// over, the first-play gate).
pub struct Controller {
    caps: PlatformCaps,
    gate: PlayGate,
    booted: bool,
    scene_attached: bool,
}

impl Controller {
    pub fn new(caps: PlatformCaps) -> Self {
        Self {
            caps,
            gate: PlayGate::new(),
            booted: false,
            scene_attached: false,
        }
    }

    /// Dispatch one event. Returns the actions to apply, in order.
    pub fn handle(&mut self, event: ViewerEvent) -> Vec<Action> {
        match event {
            ViewerEvent::PageReady => self.on_page_ready(),
            ViewerEvent::SceneLoaded => self.on_scene_loaded(),
            ViewerEvent::SceneError(message) => {
                vec![Action::HideLoading, Action::error(format!("Loader: {message}"))]
            }
            ViewerEvent::RendererLoaded { has_video } => self.on_renderer_loaded(has_video),
            ViewerEvent::RendererError(message) => {
                vec![Action::HideLoading, Action::error(format!("Render: {message}"))]
            }
            ViewerEvent::ModeChanged(mode) => vec![Action::PostModeChange(mode)],
            ViewerEvent::PlayGesture => self.on_play_gesture(),
            ViewerEvent::Command(cmd) => match cmd {
                PlaybackCommand::Play => vec![Action::StartPlayback],
                PlaybackCommand::Pause => vec![Action::PausePlayback],
            },
        }
    }

    fn on_page_ready(&mut self) -> Vec<Action> {
        if self.booted {
            return Vec::new();
        }
        self.booted = true;

        if !self.caps.webgl {
            // Terminal: no scene load, no frame loop.
            return vec![
                Action::HideLoading,
                Action::error("WebGL not supported."),
            ];
        }

        let mut actions = vec![Action::LoadScene];
        if self.caps.debug_overlay {
            actions.push(Action::ShowStats);
        }
        actions.push(Action::StartFrameLoop);
        actions
    }

    fn on_scene_loaded(&mut self) -> Vec<Action> {
        if self.scene_attached {
            log::warn!("duplicate scene load event ignored");
            return Vec::new();
        }
        self.scene_attached = true;
        vec![Action::AttachScene]
    }

    fn on_renderer_loaded(&mut self, has_video: bool) -> Vec<Action> {
        let mut actions = Vec::new();
        if has_video {
            if self.caps.requires_play_gesture {
                self.gate.arm();
                actions.push(Action::ShowPlayPrompt);
                actions.push(Action::ArmPlayGesture);
            } else {
                self.gate.begin();
                actions.push(Action::StartPlayback);
            }
        }
        actions.push(Action::HideLoading);
        actions
    }

    fn on_play_gesture(&mut self) -> Vec<Action> {
        if self.gate.gesture() {
            vec![
                Action::StartPlayback,
                Action::HidePlayPrompt,
                Action::DisarmPlayGesture,
            ]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ViewMode;

    fn boot(caps: PlatformCaps) -> (Controller, Vec<Action>) {
        let mut ctrl = Controller::new(caps);
        let actions = ctrl.handle(ViewerEvent::PageReady);
        (ctrl, actions)
    }

    // ── boot ──

    #[test]
    fn test_boot_without_webgl_is_terminal() {
        let caps = PlatformCaps {
            webgl: false,
            ..PlatformCaps::desktop()
        };
        let (_, actions) = boot(caps);
        assert_eq!(
            actions,
            vec![
                Action::HideLoading,
                Action::ShowError {
                    title: "Error".into(),
                    message: "WebGL not supported.".into(),
                },
            ]
        );
        // In particular: no LoadScene, no StartFrameLoop.
        assert!(!actions.contains(&Action::LoadScene));
        assert!(!actions.contains(&Action::StartFrameLoop));
    }

    #[test]
    fn test_boot_loads_scene_and_starts_loop() {
        let (_, actions) = boot(PlatformCaps::desktop());
        assert_eq!(actions, vec![Action::LoadScene, Action::StartFrameLoop]);
    }

    #[test]
    fn test_boot_with_debug_flag_shows_stats() {
        let caps = PlatformCaps {
            debug_overlay: true,
            ..PlatformCaps::desktop()
        };
        let (_, actions) = boot(caps);
        assert_eq!(
            actions,
            vec![Action::LoadScene, Action::ShowStats, Action::StartFrameLoop]
        );
    }

    #[test]
    fn test_repeated_page_ready_is_ignored() {
        let (mut ctrl, _) = boot(PlatformCaps::desktop());
        assert!(ctrl.handle(ViewerEvent::PageReady).is_empty());
    }

    // ── scene handoff ──

    #[test]
    fn test_scene_attached_exactly_once() {
        let (mut ctrl, _) = boot(PlatformCaps::desktop());
        assert_eq!(
            ctrl.handle(ViewerEvent::SceneLoaded),
            vec![Action::AttachScene]
        );
        assert!(ctrl.handle(ViewerEvent::SceneLoaded).is_empty());
    }

    // ── renderer load / play gating ──

    #[test]
    fn test_video_on_desktop_autoplays() {
        let (mut ctrl, _) = boot(PlatformCaps::desktop());
        let actions = ctrl.handle(ViewerEvent::RendererLoaded { has_video: true });
        assert_eq!(actions, vec![Action::StartPlayback, Action::HideLoading]);
    }

    #[test]
    fn test_video_on_mobile_awaits_gesture() {
        let (mut ctrl, _) = boot(PlatformCaps::mobile());
        let actions = ctrl.handle(ViewerEvent::RendererLoaded { has_video: true });
        assert_eq!(
            actions,
            vec![
                Action::ShowPlayPrompt,
                Action::ArmPlayGesture,
                Action::HideLoading,
            ]
        );
        // Playback must not have started yet.
        assert!(!actions.contains(&Action::StartPlayback));
    }

    #[test]
    fn test_image_scene_only_hides_loading() {
        let (mut ctrl, _) = boot(PlatformCaps::mobile());
        let actions = ctrl.handle(ViewerEvent::RendererLoaded { has_video: false });
        assert_eq!(actions, vec![Action::HideLoading]);
    }

    #[test]
    fn test_first_gesture_starts_playback_exactly_once() {
        let (mut ctrl, _) = boot(PlatformCaps::mobile());
        ctrl.handle(ViewerEvent::RendererLoaded { has_video: true });

        let first = ctrl.handle(ViewerEvent::PlayGesture);
        assert_eq!(
            first,
            vec![
                Action::StartPlayback,
                Action::HidePlayPrompt,
                Action::DisarmPlayGesture,
            ]
        );

        // Second tap: nothing, in particular no second playback start.
        assert!(ctrl.handle(ViewerEvent::PlayGesture).is_empty());
    }

    #[test]
    fn test_gesture_without_armed_gate_is_ignored() {
        let (mut ctrl, _) = boot(PlatformCaps::desktop());
        assert!(ctrl.handle(ViewerEvent::PlayGesture).is_empty());
    }

    // ── errors ──

    #[test]
    fn test_loader_error_is_prefixed() {
        let (mut ctrl, _) = boot(PlatformCaps::desktop());
        let actions = ctrl.handle(ViewerEvent::SceneError("bad asset".into()));
        assert_eq!(
            actions,
            vec![
                Action::HideLoading,
                Action::ShowError {
                    title: "Error".into(),
                    message: "Loader: bad asset".into(),
                },
            ]
        );
    }

    #[test]
    fn test_render_error_is_prefixed() {
        let (mut ctrl, _) = boot(PlatformCaps::desktop());
        let actions = ctrl.handle(ViewerEvent::RendererError("context lost".into()));
        assert_eq!(
            actions,
            vec![
                Action::HideLoading,
                Action::ShowError {
                    title: "Error".into(),
                    message: "Render: context lost".into(),
                },
            ]
        );
    }

    // ── commands / mode relay ──

    #[test]
    fn test_commands_forward_intent_unchanged() {
        let (mut ctrl, _) = boot(PlatformCaps::desktop());
        assert_eq!(
            ctrl.handle(ViewerEvent::Command(PlaybackCommand::Play)),
            vec![Action::StartPlayback]
        );
        assert_eq!(
            ctrl.handle(ViewerEvent::Command(PlaybackCommand::Pause)),
            vec![Action::PausePlayback]
        );
    }

    #[test]
    fn test_mode_change_is_relayed() {
        let (mut ctrl, _) = boot(PlatformCaps::desktop());
        assert_eq!(
            ctrl.handle(ViewerEvent::ModeChanged(ViewMode::Fullscreen)),
            vec![Action::PostModeChange(ViewMode::Fullscreen)]
        );
    }
}

//! SphereView Core
//!
//! Platform-free logic for the embeddable 360° media viewer: playback
//! commands, typed viewer events and controller actions, the first-play
//! gate, the bootstrap controller, and scene-description parsing.
//!
//! Nothing in this crate touches the browser. The web runtime injects
//! platform capabilities as flags and interprets the controller's action
//! lists against the DOM, which keeps every branch here testable on the
//! host.

pub mod camera;
pub mod capability;
pub mod command;
pub mod controller;
pub mod event;
pub mod gate;
pub mod scene;

pub use camera::Camera;
pub use capability::PlatformCaps;
pub use command::PlaybackCommand;
pub use controller::Controller;
pub use event::{Action, ViewMode, ViewerEvent};
pub use scene::{SceneDescription, SceneError};

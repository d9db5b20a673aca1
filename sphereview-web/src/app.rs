use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Window};

use sphereview_core::{
    Action, Controller, PlatformCaps, SceneDescription, ViewMode, ViewerEvent,
};

use crate::dom::{LoadingIndicator, OverlayUi};
use crate::frame_loop::FrameLoop;
use crate::loader::{query_flag, SceneLoader};
use crate::receiver::{MessagePort, MessageReceiver};
use crate::renderer::{probe_webgl, ReadyCallback, WorldRenderer};
use crate::stats::StatsOverlay;

/// The assembled viewer: core controller plus every browser-side
/// collaborator. Lives in an `Rc<RefCell<…>>` so event closures can reach
/// it; everything runs on the one UI thread.
pub struct Viewer {
    controller: Controller,
    ui: OverlayUi,
    loading: LoadingIndicator,
    /// Absent when the capability probe failed; boot is terminal then.
    renderer: Option<WorldRenderer>,
    port: MessagePort,
    frame_loop: FrameLoop,
    stats: Option<StatsOverlay>,
    pending_scene: Option<SceneDescription>,
    gesture_listener: Option<Closure<dyn FnMut(web_sys::Event)>>,
    _receiver: Option<MessageReceiver>,
    _page_listeners: Vec<Closure<dyn FnMut(web_sys::Event)>>,
}

impl Viewer {
    /// Wire everything up and deliver the page-ready signal. `boot` is
    /// called from the page's load handler, so its invocation *is* that
    /// signal.
    pub fn boot(parent_origin: Option<String>) -> Result<(), String> {
        let window = web_sys::window().ok_or_else(|| "no window".to_string())?;
        let document = window.document().ok_or_else(|| "no document".to_string())?;

        // First thing on screen, before any heavier setup.
        let loading = LoadingIndicator::create(&document)?;
        let ui = OverlayUi::new(&document)?;

        let caps = PlatformCaps {
            webgl: probe_webgl(&document),
            requires_play_gesture: is_mobile(&window),
            debug_overlay: query_flag(&window, "debug"),
        };
        let renderer = if caps.webgl {
            Some(WorldRenderer::create(&document)?)
        } else {
            None
        };

        let viewer = Rc::new(RefCell::new(Viewer {
            controller: Controller::new(caps),
            ui,
            loading,
            renderer,
            port: MessagePort::new(&window, parent_origin),
            frame_loop: FrameLoop::new(),
            stats: None,
            pending_scene: None,
            gesture_listener: None,
            _receiver: None,
            _page_listeners: Vec::new(),
        }));

        let receiver = {
            let viewer = viewer.clone();
            MessageReceiver::install(&window, move |cmd| {
                log::debug!("embed command: {}", cmd.label());
                dispatch(&viewer, ViewerEvent::Command(cmd));
            })?
        };
        viewer.borrow_mut()._receiver = Some(receiver);

        install_page_listeners(&window, &document, &viewer)?;

        dispatch(&viewer, ViewerEvent::PageReady);
        Ok(())
    }
}

// ─── Event dispatch ──────────────────────────────────────────────────

/// Run one event through the controller and apply the resulting actions
/// in order. Actions may dispatch follow-up events (scene load, renderer
/// load); the controller borrow is released before any action runs.
fn dispatch(viewer: &Rc<RefCell<Viewer>>, event: ViewerEvent) {
    let actions = viewer.borrow_mut().controller.handle(event);
    for action in actions {
        apply(viewer, action);
    }
}

fn apply(viewer: &Rc<RefCell<Viewer>>, action: Action) {
    match action {
        Action::LoadScene => load_scene(viewer),
        Action::StartFrameLoop => start_frame_loop(viewer),
        Action::ShowStats => show_stats(viewer),
        Action::HideLoading => viewer.borrow().loading.hide(),
        Action::ShowError { title, message } => {
            log::error!("{title}: {message}");
            viewer.borrow().ui.show_error(&title, &message);
        }
        Action::ShowPlayPrompt => viewer.borrow().ui.show_play_prompt(),
        Action::HidePlayPrompt => viewer.borrow().ui.hide_play_prompt(),
        Action::AttachScene => attach_scene(viewer),
        Action::StartPlayback => {
            if let Some(video) = viewer.borrow().renderer.as_ref().and_then(|r| r.video()) {
                video.play();
            }
        }
        Action::PausePlayback => {
            if let Some(video) = viewer.borrow().renderer.as_ref().and_then(|r| r.video()) {
                video.pause();
            }
        }
        Action::ArmPlayGesture => arm_gesture(viewer),
        Action::DisarmPlayGesture => disarm_gesture(viewer),
        Action::PostModeChange(mode) => viewer.borrow().port.post_mode_change(mode),
    }
}

// ─── Action implementations ──────────────────────────────────────────

fn load_scene(viewer: &Rc<RefCell<Viewer>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    match SceneLoader::load_from_window(&window) {
        Ok(scene) => {
            viewer.borrow_mut().pending_scene = Some(scene);
            dispatch(viewer, ViewerEvent::SceneLoaded);
        }
        Err(message) => dispatch(viewer, ViewerEvent::SceneError(message)),
    }
}

fn attach_scene(viewer: &Rc<RefCell<Viewer>>) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let scene = viewer.borrow_mut().pending_scene.take();
    let Some(scene) = scene else {
        return;
    };

    let on_ready: ReadyCallback = {
        let viewer = viewer.clone();
        Box::new(move |result| match result {
            Ok(has_video) => dispatch(&viewer, ViewerEvent::RendererLoaded { has_video }),
            Err(message) => dispatch(&viewer, ViewerEvent::RendererError(message)),
        })
    };

    let result = match viewer.borrow_mut().renderer.as_mut() {
        Some(renderer) => renderer.set_scene(&document, scene, on_ready),
        None => return,
    };
    if let Err(message) = result {
        dispatch(viewer, ViewerEvent::RendererError(message));
    }
}

fn start_frame_loop(viewer: &Rc<RefCell<Viewer>>) {
    let tick_viewer = viewer.clone();
    viewer.borrow().frame_loop.start(move |time| {
        let mut v = tick_viewer.borrow_mut();
        if let Some(stats) = v.stats.as_mut() {
            stats.begin();
        }
        if let Some(video) = v.renderer.as_mut().and_then(|r| r.video_mut()) {
            video.update(time);
        }
        if let Some(renderer) = v.renderer.as_mut() {
            renderer.render(time);
        }
        if let Some(stats) = v.stats.as_mut() {
            stats.end(time);
        }
        true
    });
}

fn show_stats(viewer: &Rc<RefCell<Viewer>>) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    match StatsOverlay::create(&document) {
        Ok(stats) => viewer.borrow_mut().stats = Some(stats),
        Err(message) => log::warn!("{message}"),
    }
}

fn arm_gesture(viewer: &Rc<RefCell<Viewer>>) {
    let Some(body) = page_body() else {
        return;
    };
    let closure = {
        let viewer = viewer.clone();
        Closure::<dyn FnMut(_)>::new(move |_: web_sys::Event| {
            dispatch(&viewer, ViewerEvent::PlayGesture);
        })
    };
    if body
        .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref())
        .is_ok()
    {
        viewer.borrow_mut().gesture_listener = Some(closure);
    } else {
        log::warn!("failed to install tap-to-play listener");
    }
}

fn disarm_gesture(viewer: &Rc<RefCell<Viewer>>) {
    let listener = viewer.borrow_mut().gesture_listener.take();
    if let (Some(listener), Some(body)) = (listener, page_body()) {
        body.remove_event_listener_with_callback("touchend", listener.as_ref().unchecked_ref())
            .ok();
    }
}

// ─── Page-level listeners ────────────────────────────────────────────

fn install_page_listeners(
    window: &Window,
    document: &Document,
    viewer: &Rc<RefCell<Viewer>>,
) -> Result<(), String> {
    let mut listeners = Vec::new();

    // Page teardown cancels the frame loop instead of letting the
    // browser abandon it.
    {
        let viewer = viewer.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_: web_sys::Event| {
            viewer.borrow().frame_loop.stop();
        });
        window
            .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())
            .map_err(|_| "failed to install pagehide listener".to_string())?;
        listeners.push(closure);
    }

    {
        let viewer = viewer.clone();
        let doc = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_: web_sys::Event| {
            let mode = if doc.fullscreen_element().is_some() {
                ViewMode::Fullscreen
            } else {
                ViewMode::Normal
            };
            let changed = viewer
                .borrow_mut()
                .renderer
                .as_mut()
                .map(|r| r.set_mode(mode))
                .unwrap_or(false);
            if changed {
                log::info!("view mode: {}", mode.label());
                dispatch(&viewer, ViewerEvent::ModeChanged(mode));
            }
        });
        document
            .add_event_listener_with_callback("fullscreenchange", closure.as_ref().unchecked_ref())
            .map_err(|_| "failed to install fullscreenchange listener".to_string())?;
        listeners.push(closure);
    }

    viewer.borrow_mut()._page_listeners = listeners;
    Ok(())
}

// ─── Environment probes ──────────────────────────────────────────────

fn is_mobile(window: &Window) -> bool {
    let ua = window.navigator().user_agent().unwrap_or_default();
    ["Android", "iPhone", "iPad", "iPod", "Mobile"]
        .iter()
        .any(|token| ua.contains(token))
}

fn page_body() -> Option<HtmlElement> {
    web_sys::window()?.document()?.body()
}

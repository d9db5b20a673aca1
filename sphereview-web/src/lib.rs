//! SphereView WASM Web Runtime
//!
//! Embeddable 360° photo/video viewer. The hosting page embeds this module
//! in an iframe, describes the scene through query parameters, and drives
//! playback over `postMessage`. The runtime wires a loading indicator, the
//! message bridge, the scene loader, and the world renderer to the core
//! controller and pumps a cancellable requestAnimationFrame loop.

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod frame_loop;
#[cfg(target_arch = "wasm32")]
mod loader;
#[cfg(target_arch = "wasm32")]
mod receiver;
#[cfg(target_arch = "wasm32")]
mod renderer;
mod sched;
#[cfg(target_arch = "wasm32")]
mod stats;
#[cfg(target_arch = "wasm32")]
mod video;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Entry point — called when the WASM module loads.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    log::info!("SphereView web runtime initialized");
}

/// Boot the viewer. Called from JavaScript once the page has loaded.
///
/// `parent_origin` is the origin the `modechange` message may be posted
/// to. Without it outbound messages are dropped; there is deliberately no
/// `'*'` fallback.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn boot(parent_origin: Option<String>) -> Result<(), JsValue> {
    app::Viewer::boot(parent_origin).map_err(|e| JsValue::from_str(&e))
}

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlVideoElement};

use sphereview_core::SceneDescription;

/// Renderer-owned handle on the active video source.
///
/// The element itself stays hidden; it exists to decode frames for the
/// panorama texture. Looping is handled here in `update` rather than via
/// the native `loop` attribute, which some mobile browsers ignore for
/// programmatically created elements.
pub struct VideoProxy {
    element: HtmlVideoElement,
    loop_video: bool,
}

impl VideoProxy {
    pub fn create(document: &Document, scene: &SceneDescription) -> Result<Self, String> {
        let element: HtmlVideoElement = document
            .create_element("video")
            .map_err(|_| "failed to create video element".to_string())?
            .dyn_into()
            .map_err(|_| "element is not a video".to_string())?;

        element.set_src(scene.media_url());
        element.set_cross_origin(Some("anonymous"));
        element.set_preload("auto");
        // Keep iOS from hijacking playback into its own player.
        element.set_attribute("playsinline", "true").ok();
        element.set_muted(scene.muted);
        element.set_volume(scene.volume as f64);

        hide(&element);
        document
            .body()
            .ok_or_else(|| "no document body".to_string())?
            .append_child(&element)
            .map_err(|_| "failed to attach video element".to_string())?;

        Ok(Self {
            element,
            loop_video: scene.loop_video,
        })
    }

    pub fn play(&self) {
        match self.element.play() {
            Ok(promise) => {
                wasm_bindgen_futures::spawn_local(async move {
                    if JsFuture::from(promise).await.is_err() {
                        log::warn!("video play() was rejected by the browser");
                    }
                });
            }
            Err(_) => log::warn!("video play() failed"),
        }
    }

    pub fn pause(&self) {
        self.element.pause().ok();
    }

    /// Per-frame upkeep, called from the frame loop with the frame
    /// timestamp.
    pub fn update(&mut self, _time: f64) {
        if self.loop_video && self.element.ended() {
            self.element.set_current_time(0.0);
            self.play();
        }
    }

    pub fn element(&self) -> &HtmlVideoElement {
        &self.element
    }
}

fn hide(element: &HtmlVideoElement) {
    let style = element.style();
    let _ = style.set_property("position", "absolute");
    let _ = style.set_property("width", "1px");
    let _ = style.set_property("height", "1px");
    let _ = style.set_property("opacity", "0");
    let _ = style.set_property("pointer-events", "none");
}

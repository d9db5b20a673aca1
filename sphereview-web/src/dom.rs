use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

/// Marker class that shows an overlay region.
const VISIBLE_CLASS: &str = "visible";

fn set_visible(element: &Element, visible: bool) {
    let classes = element.class_list();
    let result = if visible {
        classes.add_1(VISIBLE_CLASS)
    } else {
        classes.remove_1(VISIBLE_CLASS)
    };
    if result.is_err() {
        log::warn!("failed to toggle visibility class");
    }
}

// ─── Loading indicator ───────────────────────────────────────────────

/// Busy indicator, created and shown as early as possible so the user
/// gets immediate feedback while the scene loads.
pub struct LoadingIndicator {
    element: Element,
}

impl LoadingIndicator {
    pub fn create(document: &Document) -> Result<Self, String> {
        let element = document
            .create_element("div")
            .map_err(|_| "failed to create loading indicator".to_string())?;
        element.set_id("loading-indicator");
        document
            .body()
            .ok_or_else(|| "no document body".to_string())?
            .append_child(&element)
            .map_err(|_| "failed to attach loading indicator".to_string())?;

        let indicator = Self { element };
        indicator.show();
        Ok(indicator)
    }

    pub fn show(&self) {
        set_visible(&self.element, true);
    }

    pub fn hide(&self) {
        set_visible(&self.element, false);
    }
}

// ─── Error banner and play prompt ────────────────────────────────────

/// The two overlay regions the embed page provides: the error container
/// (`#error` with nested `.title` / `.message`) and the tap-to-play
/// prompt (`#play-overlay`).
pub struct OverlayUi {
    error: Element,
    error_title: Element,
    error_message: Element,
    play_overlay: Element,
}

impl OverlayUi {
    pub fn new(document: &Document) -> Result<Self, String> {
        let error = query(document, "#error")?;
        let error_title = query(document, "#error .title")?;
        let error_message = query(document, "#error .message")?;
        let play_overlay = query(document, "#play-overlay")?;
        Ok(Self {
            error,
            error_title,
            error_message,
            play_overlay,
        })
    }

    /// Show the error banner. It stays up until replaced by another
    /// error; the viewer has no recovery path.
    pub fn show_error(&self, title: &str, message: &str) {
        self.error_title.set_text_content(Some(title));
        self.error_message.set_text_content(Some(message));
        set_visible(&self.error, true);
    }

    pub fn show_play_prompt(&self) {
        set_visible(&self.play_overlay, true);
    }

    pub fn hide_play_prompt(&self) {
        set_visible(&self.play_overlay, false);
    }
}

fn query(document: &Document, selector: &str) -> Result<Element, String> {
    document
        .query_selector(selector)
        .map_err(|_| format!("bad selector {selector:?}"))?
        .ok_or_else(|| format!("missing page element {selector:?}"))
}

/// Position an overlay widget at the bottom-left corner.
pub fn pin_bottom_left(element: &Element) {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        let style = html.style();
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("left", "0px");
        let _ = style.set_property("bottom", "0px");
    }
}

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{MessageEvent, Window};

use sphereview_core::{PlaybackCommand, ViewMode};

// ─── Inbound: embed API commands ─────────────────────────────────────

/// Listens for `message` events from the embedding page and surfaces the
/// two recognized commands. Anything else on the channel is ignored.
pub struct MessageReceiver {
    window: Window,
    on_message: Closure<dyn FnMut(MessageEvent)>,
}

impl MessageReceiver {
    pub fn install<F>(window: &Window, mut on_command: F) -> Result<Self, String>
    where
        F: FnMut(PlaybackCommand) + 'static,
    {
        let on_message = Closure::<dyn FnMut(_)>::new(move |event: MessageEvent| {
            if let Some(cmd) = parse_command(&event.data()) {
                on_command(cmd);
            }
        });
        window
            .add_event_listener_with_callback("message", on_message.as_ref().unchecked_ref())
            .map_err(|_| "failed to install message listener".to_string())?;
        Ok(Self {
            window: window.clone(),
            on_message,
        })
    }
}

impl Drop for MessageReceiver {
    fn drop(&mut self) {
        self.window
            .remove_event_listener_with_callback(
                "message",
                self.on_message.as_ref().unchecked_ref(),
            )
            .ok();
    }
}

/// Pull the `type` field out of a message payload.
fn parse_command(data: &JsValue) -> Option<PlaybackCommand> {
    let kind = js_sys::Reflect::get(data, &JsValue::from_str("type")).ok()?;
    PlaybackCommand::parse(&kind.as_string()?)
}

// ─── Outbound: mode changes to the parent ────────────────────────────

/// Posts `modechange` messages to the embedding page.
///
/// The target origin is explicit configuration. When the embedder did not
/// name one, messages are dropped with a warning instead of being posted
/// to `'*'`.
pub struct MessagePort {
    parent: Option<Window>,
    target_origin: Option<String>,
}

impl MessagePort {
    pub fn new(window: &Window, target_origin: Option<String>) -> Self {
        let parent = window.parent().ok().flatten();
        Self {
            parent,
            target_origin,
        }
    }

    pub fn post_mode_change(&self, mode: ViewMode) {
        let Some(parent) = &self.parent else {
            return;
        };
        let Some(origin) = &self.target_origin else {
            log::warn!(
                "dropping modechange ({}): no parent origin configured",
                mode.label()
            );
            return;
        };

        let message = js_sys::Object::new();
        let ok = js_sys::Reflect::set(
            &message,
            &JsValue::from_str("type"),
            &JsValue::from_str("modechange"),
        )
        .and_then(|_| {
            js_sys::Reflect::set(
                &message,
                &JsValue::from_str("data"),
                &JsValue::from_str(mode.label()),
            )
        });
        if ok.is_err() || parent.post_message(&message, origin).is_err() {
            log::warn!("failed to post modechange to parent");
        }
    }
}

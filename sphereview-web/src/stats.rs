use web_sys::{Document, Element};

use crate::dom::pin_bottom_left;

/// How often the readout text refreshes, in milliseconds.
const REFRESH_INTERVAL_MS: f64 = 500.0;

/// Debug performance overlay: frames per second and per-frame cost,
/// pinned to the bottom-left corner like the stock stats widget.
pub struct StatsOverlay {
    element: Element,
    frame_start: f64,
    frames: u32,
    frame_ms_acc: f64,
    window_start: f64,
}

impl StatsOverlay {
    pub fn create(document: &Document) -> Result<Self, String> {
        let element = document
            .create_element("div")
            .map_err(|_| "failed to create stats overlay".to_string())?;
        element.set_id("stats-overlay");
        pin_bottom_left(&element);
        document
            .body()
            .ok_or_else(|| "no document body".to_string())?
            .append_child(&element)
            .map_err(|_| "failed to attach stats overlay".to_string())?;

        Ok(Self {
            element,
            frame_start: 0.0,
            frames: 0,
            frame_ms_acc: 0.0,
            window_start: 0.0,
        })
    }

    /// Mark the start of frame work.
    pub fn begin(&mut self) {
        self.frame_start = now();
    }

    /// Mark the end of frame work; `time` is the frame timestamp.
    pub fn end(&mut self, time: f64) {
        self.frames += 1;
        self.frame_ms_acc += now() - self.frame_start;

        if self.window_start == 0.0 {
            self.window_start = time;
            return;
        }
        let elapsed = time - self.window_start;
        if elapsed >= REFRESH_INTERVAL_MS {
            let fps = self.frames as f64 * 1000.0 / elapsed;
            let avg_ms = self.frame_ms_acc / self.frames as f64;
            self.element
                .set_text_content(Some(&format!("{fps:.0} fps / {avg_ms:.1} ms")));
            self.frames = 0;
            self.frame_ms_acc = 0.0;
            self.window_start = time;
        }
    }
}

fn now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

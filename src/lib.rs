//! WebAssembly image slider puzzle.
//!
//! A source image is cut into a grid of tiles, the top-left tile becomes the
//! hole, the tiles are shuffled, and the player rebuilds the picture by
//! sliding neighbouring tiles into the hole. The puzzle logic lives in plain
//! Rust modules; drawing goes through the [`render::RenderAdapter`] seam so
//! the core is testable off the browser.
//!
//! On wasm32 a `SliderPuzzle` class is exported that draws on a
//! `<canvas>` from an `<img>`.

pub mod error;
pub mod geometry;
pub mod moves;
pub mod render;
pub mod rng;
pub mod session;
pub mod shuffle;
pub mod tiles;
pub mod types;
pub mod win;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use error::PuzzleError;
pub use geometry::{Geometry, PuzzleConfig, ShuffleBound};
pub use render::{RenderAdapter, SourceImage};
pub use session::{ClickOutcome, GameState, LoadOutcome, LoadTicket, PuzzleSession, PuzzleSnapshot};
pub use types::{Color, GridPos, Point, Rect, Tile};

/// Log level named by the host (`error`, `warn`, `info`, `debug`, `trace`,
/// any case). Missing or unknown names mean `info`.
pub fn log_level(name: Option<&str>) -> log::Level {
    name.and_then(|n| n.parse().ok()).unwrap_or(log::Level::Info)
}

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlImageElement};

    use crate::canvas::{source_image, CanvasRenderer};
    use crate::{log_level, ClickOutcome, LoadOutcome, LoadTicket, Point, PuzzleConfig, PuzzleError, PuzzleSession};

    fn to_js(err: PuzzleError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }

    fn outcome_to_js(outcome: ClickOutcome) -> Result<JsValue, JsValue> {
        let (name, solved) = match outcome {
            ClickOutcome::Ignored => ("ignored", false),
            ClickOutcome::PlayAgain => ("playAgain", true),
            ClickOutcome::Missed => ("missed", false),
            ClickOutcome::Rejected => ("rejected", false),
            ClickOutcome::Moved { solved } => ("moved", solved),
        };
        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"outcome".into(), &name.into())?;
        js_sys::Reflect::set(&obj, &"solved".into(), &solved.into())?;
        Ok(obj.into())
    }

    /// Route `log` output to the browser console.
    /// `level` is one of `error`, `warn`, `info`, `debug`, `trace`; default `info`.
    #[wasm_bindgen(js_name = "initLogging")]
    pub fn wasm_init_logging(level: Option<String>) {
        wasm_logger::init(wasm_logger::Config::new(log_level(level.as_deref())));
    }

    /// Ping function to verify WASM is loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "WASM slider ready".to_string()
    }

    /// One puzzle bound to one canvas.
    #[wasm_bindgen(js_name = "SliderPuzzle")]
    pub struct WasmSliderPuzzle {
        session: PuzzleSession<CanvasRenderer>,
    }

    #[wasm_bindgen(js_class = "SliderPuzzle")]
    impl WasmSliderPuzzle {
        /// `options` may be `undefined` or `{ rows?, cols?, shuffle?: "widened" | "classic" }`.
        #[wasm_bindgen(constructor)]
        pub fn new(canvas: HtmlCanvasElement, options: JsValue) -> Result<WasmSliderPuzzle, JsValue> {
            let config: PuzzleConfig = if options.is_undefined() || options.is_null() {
                PuzzleConfig::default()
            } else {
                serde_wasm_bindgen::from_value(options)?
            };
            let renderer = CanvasRenderer::new(canvas)?;
            Ok(Self {
                session: PuzzleSession::new(config, renderer),
            })
        }

        /// Show a decoded image whole, ready for `start()`.
        #[wasm_bindgen(js_name = "loadImage")]
        pub fn load_image(&mut self, image: HtmlImageElement) -> Result<(), JsValue> {
            self.session.load_image(source_image(image)).map_err(to_js)?;
            self.fit_canvas();
            Ok(())
        }

        pub fn start(&mut self) -> Result<(), JsValue> {
            self.session.start().map_err(to_js)
        }

        #[wasm_bindgen(js_name = "startNewPuzzle")]
        pub fn start_new_puzzle(&mut self, image: HtmlImageElement) -> Result<(), JsValue> {
            self.session.start_new_puzzle(source_image(image)).map_err(to_js)?;
            self.fit_canvas();
            Ok(())
        }

        /// Gate clicks while an image decodes. Pass the returned ticket to
        /// `finishImageLoad`.
        #[wasm_bindgen(js_name = "beginImageLoad")]
        pub fn begin_image_load(&mut self) -> u32 {
            self.session.begin_image_load().get()
        }

        /// Returns `true` if the image was taken, `false` if a newer load
        /// superseded this one. Throws on load failure.
        #[wasm_bindgen(js_name = "finishImageLoad")]
        pub fn finish_image_load(
            &mut self,
            ticket: u32,
            image: Option<HtmlImageElement>,
            error: Option<String>,
        ) -> Result<bool, JsValue> {
            let result = match (image, error) {
                (Some(image), None) => Ok(source_image(image)),
                (_, Some(reason)) => Err(reason),
                (None, None) => Err("no image".to_string()),
            };
            match self
                .session
                .finish_image_load(LoadTicket::from_raw(ticket), result)
                .map_err(to_js)?
            {
                LoadOutcome::Loaded => {
                    self.fit_canvas();
                    Ok(true)
                }
                LoadOutcome::Stale => Ok(false),
            }
        }

        /// Click at a drawing-surface coordinate.
        /// Returns `{ outcome: "ignored" | "playAgain" | "missed" | "rejected" | "moved", solved }`.
        #[wasm_bindgen(js_name = "handleClick")]
        pub fn handle_click(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
            outcome_to_js(self.session.handle_click(Point::new(x, y)))
        }

        /// Click at a window coordinate (`MouseEvent.clientX/Y`).
        #[wasm_bindgen(js_name = "handleClientClick")]
        pub fn handle_client_click(&mut self, client_x: f64, client_y: f64) -> Result<JsValue, JsValue> {
            let point = self.session.renderer().client_to_surface(client_x, client_y);
            outcome_to_js(self.session.handle_click(point))
        }

        #[wasm_bindgen(js_name = "isSolved")]
        pub fn is_solved(&self) -> bool {
            self.session.is_solved()
        }

        #[wasm_bindgen(js_name = "playAgain")]
        pub fn play_again(&mut self) -> Result<(), JsValue> {
            self.session.play_again().map_err(to_js)
        }

        pub fn reset(&mut self) {
            self.session.reset();
        }

        pub fn redraw(&mut self) {
            self.session.redraw();
        }

        /// Full board state as a plain JS object.
        pub fn snapshot(&self) -> Result<JsValue, JsValue> {
            Ok(serde_wasm_bindgen::to_value(&self.session.snapshot())?)
        }
    }

    impl WasmSliderPuzzle {
        /// Resizing a canvas wipes it, so repaint afterwards.
        fn fit_canvas(&mut self) {
            if let Some(image) = self.session.image() {
                self.session.renderer().fit_to(image);
            }
            self.session.redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_names() {
        assert_eq!(log_level(Some("debug")), log::Level::Debug);
        assert_eq!(log_level(Some("WARN")), log::Level::Warn);
        assert_eq!(log_level(Some("loud")), log::Level::Info);
        assert_eq!(log_level(None), log::Level::Info);
    }
}

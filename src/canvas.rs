//! `RenderAdapter` backed by a browser 2D canvas.

use log::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::render::{RenderAdapter, SourceImage};
use crate::types::{Color, Point, Rect};

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, context })
    }

    /// Makes the drawing surface exactly as large as the image.
    pub fn fit_to(&self, image: &SourceImage<HtmlImageElement>) {
        self.canvas.set_width(image.width);
        self.canvas.set_height(image.height);
    }

    /// Converts a window coordinate (e.g. `MouseEvent.clientX/Y`) to a
    /// drawing-surface coordinate.
    pub fn client_to_surface(&self, client_x: f64, client_y: f64) -> Point {
        let bbox = self.canvas.get_bounding_client_rect();
        crate::geometry::to_surface(
            Point::new(client_x, client_y),
            Rect::new(bbox.left(), bbox.top(), bbox.width(), bbox.height()),
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        )
    }
}

/// Wraps a decoded `<img>` for the session.
pub fn source_image(image: HtmlImageElement) -> SourceImage<HtmlImageElement> {
    SourceImage::new(image.natural_width(), image.natural_height(), image)
}

impl RenderAdapter for CanvasRenderer {
    type Image = HtmlImageElement;

    fn clear(&mut self) {
        self.context.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    fn draw_region(&mut self, image: &HtmlImageElement, src: Rect, dst: Rect) {
        let drawn = self
            .context
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                image, src.x, src.y, src.width, src.height, dst.x, dst.y, dst.width, dst.height,
            );
        if let Err(err) = drawn {
            warn!("drawImage failed for {:?}: {:?}", dst, err);
        }
    }

    fn fill_rect(&mut self, dst: Rect, color: Color) {
        self.context.set_fill_style_str(&color.to_css());
        self.context.fill_rect(dst.x, dst.y, dst.width, dst.height);
    }

    fn stroke_rect(&mut self, dst: Rect, color: Color) {
        self.context.set_stroke_style_str(&color.to_css());
        self.context.stroke_rect(dst.x, dst.y, dst.width, dst.height);
    }
}

//! Canvas 2D executor for draw lists

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::PlatformError;
use super::assets::AssetStore;
use super::browser::context_2d;
use crate::render::DrawCommand;
use crate::sim::Rect;

const FONT_FAMILY: &str = "Arial";

pub struct CanvasRenderer {
    context: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, PlatformError> {
        Ok(Self {
            context: context_2d(canvas)?,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
        })
    }

    /// Run a draw list in order. Images that are not ready are skipped.
    pub fn execute(&self, commands: &[DrawCommand], assets: &AssetStore) {
        for command in commands {
            if let Err(e) = self.draw(command, assets) {
                log::debug!("Draw failed: {e:?}");
            }
        }
    }

    fn draw(
        &self,
        command: &DrawCommand,
        assets: &AssetStore,
    ) -> Result<(), wasm_bindgen::JsValue> {
        let ctx = &self.context;
        match command {
            DrawCommand::Clear => ctx.clear_rect(0.0, 0.0, self.width, self.height),
            DrawCommand::Image { image, src, dst } => {
                let Some(element) = assets.get(*image) else {
                    return Ok(());
                };
                match src {
                    Some(src) => ctx
                        .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                            element,
                            src.x.into(),
                            src.y.into(),
                            src.width.into(),
                            src.height.into(),
                            dst.x.into(),
                            dst.y.into(),
                            dst.width.into(),
                            dst.height.into(),
                        )?,
                    None => ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        element,
                        dst.x.into(),
                        dst.y.into(),
                        dst.width.into(),
                        dst.height.into(),
                    )?,
                }
            }
            DrawCommand::FillRect { rect, color } => {
                ctx.set_fill_style_str(color);
                let (x, y, w, h) = to_f64(rect);
                ctx.fill_rect(x, y, w, h);
            }
            DrawCommand::StrokeRect {
                rect,
                color,
                line_width,
            } => {
                ctx.set_stroke_style_str(color);
                ctx.set_line_width(*line_width as f64);
                let (x, y, w, h) = to_f64(rect);
                ctx.stroke_rect(x, y, w, h);
            }
            DrawCommand::Text {
                text,
                x,
                y,
                size_px,
                color,
                align,
            } => {
                ctx.set_font(&format!("{size_px}px {FONT_FAMILY}"));
                ctx.set_fill_style_str(color);
                ctx.set_text_align(align.as_str());
                ctx.fill_text(text, *x as f64, *y as f64)?;
            }
        }
        Ok(())
    }
}

fn to_f64(rect: &Rect) -> (f64, f64, f64, f64) {
    (
        rect.x as f64,
        rect.y as f64,
        rect.width as f64,
        rect.height as f64,
    )
}

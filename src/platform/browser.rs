//! Thin typed wrappers over `web_sys` lookups

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

use super::PlatformError;

pub fn window() -> Result<Window, PlatformError> {
    web_sys::window().ok_or(PlatformError::NoWindow)
}

pub fn document() -> Result<Document, PlatformError> {
    window()?.document().ok_or(PlatformError::NoDocument)
}

pub fn canvas(id: &str) -> Result<HtmlCanvasElement, PlatformError> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| PlatformError::ElementNotFound(id.to_string()))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| PlatformError::WrongElement {
            id: id.to_string(),
            expected: "canvas",
        })
}

pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, PlatformError> {
    canvas
        .get_context("2d")
        .map_err(js_error)?
        .ok_or(PlatformError::NoContext)?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| PlatformError::NoContext)
}

/// Schedule `f` for the next animation frame
pub fn request_animation_frame(f: impl FnOnce(f64) + 'static) -> Result<i32, PlatformError> {
    let closure = Closure::once_into_js(f);
    window()?
        .request_animation_frame(closure.unchecked_ref())
        .map_err(js_error)
}

pub fn js_error(err: JsValue) -> PlatformError {
    PlatformError::Js(format!("{err:?}"))
}

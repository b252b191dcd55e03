//! Image loading and readiness
//!
//! All images are requested up front. A failed image is logged and left
//! out; draws that need it are skipped, so a missing file never blocks
//! the game.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::channel::oneshot::channel;
use futures::future::join_all;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlImageElement;

use super::PlatformError;
use super::browser::js_error;
use crate::consts::{SPRITE_COLUMNS, SPRITE_ROWS};
use crate::render::ImageId;

/// Load a single image, resolving once it has loaded or failed
pub async fn load_image(src: &str) -> Result<HtmlImageElement, PlatformError> {
    let image = HtmlImageElement::new().map_err(js_error)?;
    let (tx, rx) = channel::<Result<(), String>>();
    let success_tx = Rc::new(RefCell::new(Some(tx)));
    let error_tx = success_tx.clone();

    let on_load = Closure::once(move || {
        if let Some(tx) = success_tx.borrow_mut().take() {
            let _ = tx.send(Ok(()));
        }
    });
    let on_error = Closure::once(move |err: JsValue| {
        if let Some(tx) = error_tx.borrow_mut().take() {
            let _ = tx.send(Err(format!("{err:?}")));
        }
    });

    image.set_onload(Some(on_load.as_ref().unchecked_ref()));
    image.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    image.set_src(src);

    let settled = rx.await;

    // Detach before the closures are dropped
    image.set_onload(None);
    image.set_onerror(None);
    drop(on_load);
    drop(on_error);

    match settled {
        Ok(Ok(())) => Ok(image),
        Ok(Err(reason)) => Err(PlatformError::AssetLoad {
            src: src.to_string(),
            reason,
        }),
        Err(_) => Err(PlatformError::AssetLoad {
            src: src.to_string(),
            reason: "load callback dropped".into(),
        }),
    }
}

/// Every image the game uses, keyed by [`ImageId`]
#[derive(Default)]
pub struct AssetStore {
    images: HashMap<ImageId, HtmlImageElement>,
}

impl AssetStore {
    /// Request every image and wait until each has loaded or failed
    pub async fn load_all() -> Self {
        let results = join_all(ImageId::ALL.iter().map(|&id| async move {
            (id, load_image(id.file_name()).await)
        }))
        .await;

        let mut store = Self::default();
        for (id, result) in results {
            match result {
                Ok(image) => {
                    store.images.insert(id, image);
                }
                Err(e) => log::warn!("Asset unavailable, drawing without it: {e}"),
            }
        }
        log::info!(
            "Assets settled: {}/{} loaded",
            store.images.len(),
            ImageId::ALL.len()
        );
        store
    }

    /// Loaded and decoded with a non-zero size
    pub fn is_ready(&self, id: ImageId) -> bool {
        self.images
            .get(&id)
            .is_some_and(|image| image.complete() && image.natural_width() > 0)
    }

    /// The image, if it is ready to draw
    pub fn get(&self, id: ImageId) -> Option<&HtmlImageElement> {
        self.images.get(&id).filter(|_| self.is_ready(id))
    }

    /// Size of one cell of the player sprite sheet
    pub fn player_frame_size(&self) -> Option<(f32, f32)> {
        let sheet = self.get(ImageId::Player)?;
        Some((
            sheet.natural_width() as f32 / SPRITE_COLUMNS as f32,
            sheet.natural_height() as f32 / SPRITE_ROWS as f32,
        ))
    }
}

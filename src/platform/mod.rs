//! Browser adapters
//!
//! Everything that talks to the DOM lives here and only builds for wasm32.
//! Key mapping is pure and compiles everywhere.

#[cfg(target_arch = "wasm32")]
pub mod assets;
#[cfg(target_arch = "wasm32")]
pub mod browser;
#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod input;

use thiserror::Error;

pub use input::{InputIntent, PendingInput};

/// Failures while setting up the page or loading assets
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("no global `window`")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("no element with id `{0}`")]
    ElementNotFound(String),
    #[error("element `{id}` is not a {expected}")]
    WrongElement { id: String, expected: &'static str },
    #[error("canvas has no 2d context")]
    NoContext,
    #[error("failed to load `{src}`: {reason}")]
    AssetLoad { src: String, reason: String },
    #[error("browser call failed: {0}")]
    Js(String),
}

//! Canvas-agnostic rendering
//!
//! Turns session state into an ordered draw list. Executing the list is the
//! platform layer's job (see `platform::canvas` on wasm32).

pub mod commands;
pub mod scene;

pub use commands::{DrawCommand, ImageId, TextAlign};
pub use scene::compose_frame;

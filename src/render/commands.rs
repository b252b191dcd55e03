//! Draw list primitives
//!
//! The core never touches a canvas. It describes a frame as an ordered list
//! of [`DrawCommand`]s and the platform layer executes them.

use crate::consts::LAYER_COUNT;
use crate::sim::geometry::Rect;
use crate::sim::state::{EntitySprite, ObstacleKind};

/// Every image the game draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageId {
    /// Parallax layer, back (0) to front
    Layer(u8),
    /// Player sprite sheet
    Player,
    Obstacle(ObstacleKind),
    Coin,
    Buff,
}

const LAYER_FILES: [&str; LAYER_COUNT] = [
    "layer-1.png",
    "layer-2.png",
    "layer-3.png",
    "layer-4.png",
    "layer-5.png",
];

impl ImageId {
    pub const ALL: [ImageId; 10] = [
        ImageId::Layer(0),
        ImageId::Layer(1),
        ImageId::Layer(2),
        ImageId::Layer(3),
        ImageId::Layer(4),
        ImageId::Player,
        ImageId::Obstacle(ObstacleKind::Rock),
        ImageId::Obstacle(ObstacleKind::Crate),
        ImageId::Coin,
        ImageId::Buff,
    ];

    /// File name relative to the page
    pub fn file_name(self) -> &'static str {
        match self {
            ImageId::Layer(i) => LAYER_FILES[i as usize % LAYER_COUNT],
            ImageId::Player => "shadow_dog.png",
            ImageId::Obstacle(ObstacleKind::Rock) => "rock.png",
            ImageId::Obstacle(ObstacleKind::Crate) => "crate.png",
            ImageId::Coin => "coin.jpeg",
            ImageId::Buff => "buff.webp",
        }
    }

    pub fn for_sprite(sprite: EntitySprite) -> Self {
        match sprite {
            EntitySprite::Obstacle(kind) => ImageId::Obstacle(kind),
            EntitySprite::Coin => ImageId::Coin,
            EntitySprite::Buff => ImageId::Buff,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// One drawing operation. Colors are CSS color strings.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Clear the whole field
    Clear,
    /// Draw an image (or the `src` region of it) into `dst`.
    /// Skipped by the executor while the image is not ready.
    Image {
        image: ImageId,
        src: Option<Rect>,
        dst: Rect,
    },
    FillRect {
        rect: Rect,
        color: &'static str,
    },
    StrokeRect {
        rect: Rect,
        color: &'static str,
        line_width: f32,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        size_px: f32,
        color: &'static str,
        align: TextAlign,
    },
}

impl DrawCommand {
    pub fn text(
        text: impl Into<String>,
        x: f32,
        y: f32,
        size_px: f32,
        color: &'static str,
        align: TextAlign,
    ) -> Self {
        DrawCommand::Text {
            text: text.into(),
            x,
            y,
            size_px,
            color,
            align,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_image_has_a_distinct_file() {
        let files: HashSet<_> = ImageId::ALL.iter().map(|id| id.file_name()).collect();
        assert_eq!(files.len(), ImageId::ALL.len());
        assert_eq!(ImageId::Layer(0).file_name(), "layer-1.png");
        assert_eq!(ImageId::Layer(4).file_name(), "layer-5.png");
    }

    #[test]
    fn test_sprite_to_image() {
        assert_eq!(
            ImageId::for_sprite(EntitySprite::Obstacle(ObstacleKind::Crate)),
            ImageId::Obstacle(ObstacleKind::Crate)
        );
        assert_eq!(ImageId::for_sprite(EntitySprite::Coin), ImageId::Coin);
    }
}

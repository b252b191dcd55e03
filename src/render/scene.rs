//! Frame composition
//!
//! Builds the draw list for one frame from the session state: background,
//! player, entities, then either the HUD or the Start/Restart overlay.

use super::commands::{DrawCommand, ImageId, TextAlign};
use crate::sim::geometry::Rect;
use crate::sim::state::{GamePhase, GameState};

const HUD_FONT_PX: f32 = 24.0;
const TITLE_FONT_PX: f32 = 48.0;
const LABEL_FONT_PX: f32 = 28.0;

/// Compose the full frame for the current phase
pub fn compose_frame(state: &GameState, show_hitboxes: bool) -> Vec<DrawCommand> {
    let mut out = Vec::with_capacity(
        16 + state.obstacles.len() + state.coins.len() + state.buffs.len(),
    );
    out.push(DrawCommand::Clear);

    background(state, &mut out);
    player(state, &mut out);
    entities(state, &mut out);

    if show_hitboxes {
        hitboxes(state, &mut out);
    }

    match state.phase {
        GamePhase::Running => hud(state, &mut out),
        GamePhase::Menu => control(state, "Start", &mut out),
        GamePhase::GameOver => {
            game_over_banner(state, &mut out);
            control(state, "Restart", &mut out);
        }
    }
    out
}

/// Each layer is drawn twice so the wrap seam is never visible
fn background(state: &GameState, out: &mut Vec<DrawCommand>) {
    let field = state.field;
    for (i, &offset) in state.layer_offsets.iter().enumerate() {
        let image = ImageId::Layer(i as u8);
        for x in [offset, offset + field.x] {
            out.push(DrawCommand::Image {
                image,
                src: None,
                dst: Rect::new(x, 0.0, field.x, field.y),
            });
        }
    }
}

fn player(state: &GameState, out: &mut Vec<DrawCommand>) {
    let frame = state.frame_size;
    let src = Rect::new(
        state.player.frame as f32 * frame.x,
        state.player.anim.row() as f32 * frame.y,
        frame.x,
        frame.y,
    );
    out.push(DrawCommand::Image {
        image: ImageId::Player,
        src: Some(src),
        dst: state.player_rect(),
    });
}

fn entities(state: &GameState, out: &mut Vec<DrawCommand>) {
    let all = state
        .obstacles
        .iter()
        .chain(&state.coins)
        .chain(&state.buffs);
    for entity in all {
        out.push(DrawCommand::Image {
            image: ImageId::for_sprite(entity.sprite),
            src: None,
            dst: entity.rect(),
        });
    }
}

fn hitboxes(state: &GameState, out: &mut Vec<DrawCommand>) {
    out.push(DrawCommand::StrokeRect {
        rect: state.player_hitbox(),
        color: "lime",
        line_width: 2.0,
    });
    for entity in state
        .obstacles
        .iter()
        .chain(&state.coins)
        .chain(&state.buffs)
    {
        out.push(DrawCommand::StrokeRect {
            rect: entity.hitbox(),
            color: "red",
            line_width: 2.0,
        });
    }
}

fn hud(state: &GameState, out: &mut Vec<DrawCommand>) {
    out.push(DrawCommand::text(
        format!("Score: {}", state.score.floor()),
        state.field.x - 20.0,
        40.0,
        HUD_FONT_PX,
        "white",
        TextAlign::Right,
    ));
    out.push(DrawCommand::text(
        format!("Lives: {}", state.lives),
        20.0,
        40.0,
        HUD_FONT_PX,
        "white",
        TextAlign::Left,
    ));
    if let Some(buff) = state.active_buff {
        out.push(DrawCommand::text(
            format!("Buff: {}", buff.kind.label()),
            20.0,
            70.0,
            HUD_FONT_PX,
            "white",
            TextAlign::Left,
        ));
    }
}

fn game_over_banner(state: &GameState, out: &mut Vec<DrawCommand>) {
    let center_x = state.field.x / 2.0;
    let center_y = state.field.y / 2.0;
    out.push(DrawCommand::text(
        "GAME OVER",
        center_x,
        center_y - 40.0,
        TITLE_FONT_PX,
        "red",
        TextAlign::Center,
    ));
    out.push(DrawCommand::text(
        format!("Final Score: {}", state.score.floor()),
        center_x,
        center_y,
        LABEL_FONT_PX,
        "white",
        TextAlign::Center,
    ));
}

/// Start/Restart button at the bounds the state hit-tests against
fn control(state: &GameState, label: &str, out: &mut Vec<DrawCommand>) {
    let Some(button) = state.button else {
        return;
    };
    out.push(DrawCommand::FillRect {
        rect: button,
        color: "black",
    });
    out.push(DrawCommand::StrokeRect {
        rect: button,
        color: "white",
        line_width: 1.0,
    });
    out.push(DrawCommand::text(
        label,
        button.center().x,
        button.y + 40.0,
        LABEL_FONT_PX,
        "white",
        TextAlign::Center,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::LAYER_COUNT;
    use crate::sim::state::{BuffKind, Entity, EntitySprite, ObstacleKind};
    use crate::sim::{AnimState, PlayerAction, TickInput, tick};
    use glam::Vec2;

    fn texts(commands: &[DrawCommand]) -> Vec<&str> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn images(commands: &[DrawCommand], id: ImageId) -> Vec<Rect> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Image { image, dst, .. } if *image == id => Some(*dst),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_menu_frame_shows_start() {
        let state = GameState::new(1);
        let frame = compose_frame(&state, false);

        assert_eq!(frame[0], DrawCommand::Clear);
        assert_eq!(texts(&frame), vec!["Start"]);
        assert!(frame.contains(&DrawCommand::FillRect {
            rect: state.button_rect(),
            color: "black",
        }));
    }

    #[test]
    fn test_background_layers_drawn_twice() {
        let mut state = GameState::new(1);
        state.layer_offsets[2] = -300.0;
        let frame = compose_frame(&state, false);

        for i in 0..LAYER_COUNT {
            assert_eq!(images(&frame, ImageId::Layer(i as u8)).len(), 2);
        }
        let layer = images(&frame, ImageId::Layer(2));
        assert_eq!(layer[0].x, -300.0);
        assert_eq!(layer[1].x, 500.0);
        assert_eq!(layer[0].height, state.field.y);
    }

    #[test]
    fn test_running_frame_has_hud() {
        let mut state = GameState::new(1);
        state.transition(GamePhase::Running);
        state.score = 42.7;
        state.activate_buff(BuffKind::SlowObstacles);

        let frame = compose_frame(&state, false);
        assert_eq!(
            texts(&frame),
            vec!["Score: 42", "Lives: 2", "Buff: slowObstacles"]
        );
        assert!(
            !frame
                .iter()
                .any(|c| matches!(c, DrawCommand::FillRect { .. }))
        );
    }

    #[test]
    fn test_score_is_right_aligned() {
        let mut state = GameState::new(1);
        state.transition(GamePhase::Running);
        let frame = compose_frame(&state, false);

        let score = frame
            .iter()
            .find_map(|c| match c {
                DrawCommand::Text { x, align, .. } if *align == TextAlign::Right => Some(*x),
                _ => None,
            })
            .unwrap();
        assert_eq!(score, state.field.x - 20.0);
    }

    #[test]
    fn test_game_over_frame() {
        let mut state = GameState::new(1);
        state.transition(GamePhase::Running);
        state.score = 123.9;
        state.transition(GamePhase::GameOver);

        let frame = compose_frame(&state, false);
        assert_eq!(
            texts(&frame),
            vec!["GAME OVER", "Final Score: 123", "Restart"]
        );
    }

    #[test]
    fn test_player_source_rect_follows_animation() {
        let mut state = GameState::new(1);
        state.set_player_frame(100.0, 80.0);
        state.transition(GamePhase::Running);
        tick(&mut state, &TickInput::new([PlayerAction::SlidePress]), 16.0);
        assert_eq!(state.player.anim, AnimState::Slide);
        let column = state.player.frame as f32;

        let frame = compose_frame(&state, false);
        let src = frame
            .iter()
            .find_map(|c| match c {
                DrawCommand::Image {
                    image: ImageId::Player,
                    src,
                    ..
                } => *src,
                _ => None,
            })
            .unwrap();
        assert_eq!(src, Rect::new(column * 100.0, 160.0, 100.0, 80.0));
    }

    #[test]
    fn test_entities_and_hitbox_overlay() {
        let mut state = GameState::new(1);
        state.transition(GamePhase::Running);
        state.obstacles.push(Entity {
            id: 1,
            pos: Vec2::new(400.0, 570.0),
            size: Vec2::splat(80.0),
            sprite: EntitySprite::Obstacle(ObstacleKind::Crate),
        });
        state.coins.push(Entity {
            id: 2,
            pos: Vec2::new(500.0, 400.0),
            size: Vec2::splat(30.0),
            sprite: EntitySprite::Coin,
        });

        let plain = compose_frame(&state, false);
        assert_eq!(
            images(&plain, ImageId::Obstacle(ObstacleKind::Crate)),
            vec![Rect::new(400.0, 570.0, 80.0, 80.0)]
        );
        assert_eq!(images(&plain, ImageId::Coin).len(), 1);
        assert!(
            !plain
                .iter()
                .any(|c| matches!(c, DrawCommand::StrokeRect { .. }))
        );

        let debug = compose_frame(&state, true);
        let outlines: Vec<Rect> = debug
            .iter()
            .filter_map(|c| match c {
                DrawCommand::StrokeRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect();
        assert_eq!(outlines.len(), 3);
        assert_eq!(outlines[0], state.player_hitbox());
        assert_eq!(outlines[1], Rect::new(406.0, 576.0, 68.0, 68.0));
    }
}

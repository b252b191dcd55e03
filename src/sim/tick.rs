//! Per-frame simulation tick
//!
//! Advances a running session by one host frame. The order of the steps
//! below is part of the game's behavior: changing it changes outcomes for
//! the same seed and inputs.

use super::geometry::{Rect, intersects};
use super::spawner::Spawner;
use super::state::{Entity, GameEvent, GamePhase, GameState};

/// A player action taken between two ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Jump,
    /// Slide key went down
    SlidePress,
    /// Slide key went up
    SlideRelease,
}

/// Player actions collected since the previous tick, in the order they
/// happened
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub actions: Vec<PlayerAction>,
}

impl TickInput {
    pub fn new(actions: impl IntoIterator<Item = PlayerAction>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }

    pub fn push(&mut self, action: PlayerAction) {
        self.actions.push(action);
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Advance a running session by `dt_ms` milliseconds.
///
/// Does nothing outside [`GamePhase::Running`].
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    if state.phase != GamePhase::Running {
        return;
    }
    debug_assert!(dt_ms >= 0.0, "negative tick delta {dt_ms}");

    apply_input(state, input);
    state.clock_ms += dt_ms as f64;

    // 1. Buff expiry
    state.expire_buff();

    // 2. Score, then speed derived from it
    state.score += state.score_gain(dt_ms);
    let speed = state.game_speed();

    // 3. Extra lives
    state.grant_lives();

    // 4. Parallax
    scroll_layers(state, speed);

    // 5. Player physics and animation
    let ground = state.ground_y();
    state.player.integrate(ground, state.tuning.gravity);
    state.player.advance_animation(state.tuning.stagger_frames);

    // 6. Hitbox for this pose
    let hitbox = state.player_hitbox();

    // 7. Obstacle spawn
    let area = state.spawn_area();
    let spawned = state
        .spawner
        .advance_obstacles(dt_ms, &state.tuning, &area, &mut state.rng);
    if let Some(obstacle) = spawned {
        push_entity(state, obstacle, Collection::Obstacles);
    }

    let dx = speed * state.tuning.entity_speed_factor;

    // 8. Obstacles; a fatal hit ends the tick here
    if !resolve_obstacles(state, &hitbox, dx) {
        return;
    }

    // 9. Coins
    if let Some(coin) = Spawner::roll_coin(&state.tuning, &area, &mut state.rng) {
        push_entity(state, coin, Collection::Coins);
    }
    for _ in collect(&mut state.coins, &hitbox, dx) {
        state.score += state.tuning.coin_score;
        state.emit(GameEvent::CoinCollected);
    }

    // 10. Buffs
    if let Some(buff) = Spawner::roll_buff(&state.tuning, &area, &mut state.rng) {
        push_entity(state, buff, Collection::Buffs);
    }
    for _ in collect(&mut state.buffs, &hitbox, dx) {
        state.activate_random_buff();
    }

    debug_assert!(
        state
            .obstacles
            .iter()
            .chain(&state.coins)
            .chain(&state.buffs)
            .all(|e| !e.is_off_screen()),
        "off-screen entity survived a tick"
    );
}

/// Replay the actions in arrival order, as if each key event had been
/// handled the moment it fired
fn apply_input(state: &mut GameState, input: &TickInput) {
    let ground = state.ground_y();
    for action in &input.actions {
        match action {
            PlayerAction::Jump => {
                if state.player.jump(ground, state.tuning.jump_impulse) {
                    state.emit(GameEvent::Jumped);
                }
            }
            PlayerAction::SlidePress => {
                state.player.start_slide(ground);
            }
            PlayerAction::SlideRelease => {
                state.player.end_slide();
            }
        }
    }
}

fn scroll_layers(state: &mut GameState, speed: f32) {
    let width = state.field.x;
    for (offset, layer_speed) in state
        .layer_offsets
        .iter_mut()
        .zip(state.tuning.layer_speeds)
    {
        *offset -= speed * layer_speed;
        if *offset <= -width {
            *offset += width;
        }
    }
}

enum Collection {
    Obstacles,
    Coins,
    Buffs,
}

fn push_entity(state: &mut GameState, mut entity: Entity, into: Collection) {
    entity.id = state.next_entity_id();
    log::trace!("Spawned {:?} #{}", entity.sprite, entity.id);
    match into {
        Collection::Obstacles => state.obstacles.push(entity),
        Collection::Coins => state.coins.push(entity),
        Collection::Buffs => state.buffs.push(entity),
    }
}

/// Move obstacles and resolve hits, oldest first.
///
/// Returns false when a hit ended the run; the remaining obstacles are
/// left unmoved and the rest of the tick is skipped.
fn resolve_obstacles(state: &mut GameState, hitbox: &Rect, dx: f32) -> bool {
    let mut i = 0;
    while i < state.obstacles.len() {
        state.obstacles[i].pos.x -= dx;

        if intersects(hitbox, &state.obstacles[i].hitbox()) {
            state.emit(GameEvent::ObstacleHit);
            if state.consume_shield() {
                state.obstacles.remove(i);
                state.emit(GameEvent::ShieldConsumed);
                log::info!("Shield absorbed a hit");
                continue;
            }
            if state.lives > 0 {
                state.lives -= 1;
                state.obstacles.remove(i);
                state.emit(GameEvent::LifeLost);
                log::info!("Life lost, {} left", state.lives);
                continue;
            }
            state.transition(GamePhase::GameOver);
            return false;
        }

        if state.obstacles[i].is_off_screen() {
            state.obstacles.remove(i);
            continue;
        }
        i += 1;
    }
    true
}

/// Move pickups left and take out the ones the player touched.
///
/// Off-screen pickups are dropped; collected ones are returned in spawn
/// order.
fn collect(entities: &mut Vec<Entity>, hitbox: &Rect, dx: f32) -> Vec<Entity> {
    let mut collected = Vec::new();
    let mut i = 0;
    while i < entities.len() {
        entities[i].pos.x -= dx;
        if intersects(hitbox, &entities[i].hitbox()) {
            collected.push(entities.remove(i));
        } else if entities[i].is_off_screen() {
            entities.remove(i);
        } else {
            i += 1;
        }
    }
    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{BuffKind, EntitySprite, ObstacleKind};
    use crate::sim::{AnimState, Player};
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;

    const DT: f32 = 16.0;

    /// Running session with no random coin/buff spawns
    fn running(seed: u64) -> GameState {
        let mut state = GameState::with_tuning(seed, Tuning::without_pickups()).unwrap();
        state.transition(GamePhase::Running);
        state.drain_events();
        state
    }

    /// An obstacle that still overlaps the standing player after one step
    fn obstacle_on_player(state: &mut GameState) -> Entity {
        Entity {
            id: state.next_entity_id(),
            pos: Vec2::new(state.player_x(), state.ground_bottom() - 80.0),
            size: Vec2::splat(80.0),
            sprite: EntitySprite::Obstacle(ObstacleKind::Rock),
        }
    }

    fn pickup_on_player(state: &mut GameState, sprite: EntitySprite) -> Entity {
        let center = state.player_rect().center();
        Entity {
            id: state.next_entity_id(),
            pos: center - Vec2::splat(15.0),
            size: Vec2::splat(30.0),
            sprite,
        }
    }

    #[test]
    fn test_tick_ignored_outside_running() {
        let mut state = GameState::new(1);
        let input = TickInput::new([PlayerAction::Jump]);
        tick(&mut state, &input, DT);

        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.score, 0.0);
        assert_eq!(state.clock_ms, 0.0);
        assert_eq!(state.player.anim, AnimState::Run);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_score_and_clock_advance() {
        let mut state = running(1);
        tick(&mut state, &TickInput::default(), DT);
        assert!((state.score - 0.16).abs() < 1e-6);
        assert_eq!(state.clock_ms, 16.0);
    }

    #[test]
    fn test_double_score_gain() {
        let mut plain = running(5);
        let mut doubled = running(5);
        doubled.activate_buff(BuffKind::DoubleScore);

        tick(&mut plain, &TickInput::default(), 100.0);
        tick(&mut doubled, &TickInput::default(), 100.0);

        assert!((plain.score - 1.0).abs() < 1e-6);
        assert!((doubled.score - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_life_granted_when_crossing_threshold() {
        let mut state = running(1);
        state.score = 95.0;

        // 600ms at 0.01/ms brings the score to 101
        tick(&mut state, &TickInput::default(), 600.0);

        assert!(state.score >= 101.0 - 1e-3);
        assert_eq!(state.lives, 3);
        assert_eq!(state.next_life_threshold, 200.0);
        assert!(state.drain_events().contains(&GameEvent::ExtraLife));
    }

    #[test]
    fn test_jump_emits_event_and_leaves_ground() {
        let mut state = running(1);
        let input = TickInput::new([PlayerAction::Jump]);
        tick(&mut state, &input, DT);

        assert_eq!(state.player.anim, AnimState::Jump);
        assert!(state.player.y < state.ground_y());
        assert_eq!(state.drain_events(), vec![GameEvent::Jumped]);

        // Airborne: further jumps are ignored
        tick(&mut state, &input, DT);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_slide_held_then_released() {
        let mut state = running(1);
        tick(&mut state, &TickInput::new([PlayerAction::SlidePress]), DT);
        assert_eq!(state.player.anim, AnimState::Slide);

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.player.anim, AnimState::Slide);

        tick(&mut state, &TickInput::new([PlayerAction::SlideRelease]), DT);
        assert_eq!(state.player.anim, AnimState::Run);
    }

    #[test]
    fn test_slide_tap_within_one_tick_ends_running() {
        let mut state = running(1);
        let tap = TickInput::new([PlayerAction::SlidePress, PlayerAction::SlideRelease]);
        tick(&mut state, &tap, DT);
        assert_eq!(state.player.anim, AnimState::Run);

        for _ in 0..100 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.player.anim, AnimState::Run);
    }

    #[test]
    fn test_release_then_press_keeps_sliding() {
        let mut state = running(1);
        tick(&mut state, &TickInput::new([PlayerAction::SlidePress]), DT);

        let regrab = TickInput::new([PlayerAction::SlideRelease, PlayerAction::SlidePress]);
        tick(&mut state, &regrab, DT);
        assert_eq!(state.player.anim, AnimState::Slide);
    }

    #[test]
    fn test_parallax_wraps_each_layer() {
        let mut state = running(1);
        let width = state.field.x;
        state.layer_offsets[4] = -width + 1.0;
        tick(&mut state, &TickInput::default(), DT);

        for offset in state.layer_offsets {
            assert!(offset > -width && offset <= 0.0);
        }
        // Moved ~2px past -width and wrapped
        assert!((state.layer_offsets[4] + 1.0).abs() < 0.01);
        // Slowest layer moves at a fifth of the speed
        assert!((state.layer_offsets[0] + 0.4).abs() < 0.01);
    }

    #[test]
    fn test_first_obstacle_after_interval() {
        let mut state = running(3);
        for _ in 0..100 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(state.obstacles.is_empty());

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.obstacles.len(), 1);
        let obstacle = &state.obstacles[0];
        assert!(obstacle.pos.x < state.field.x);
        assert!(obstacle.id > 0);
    }

    #[test]
    fn test_obstacles_scroll_at_three_times_speed() {
        let mut state = running(1);
        let id = state.next_entity_id();
        state.obstacles.push(Entity {
            id,
            pos: Vec2::new(700.0, 0.0),
            size: Vec2::splat(60.0),
            sprite: EntitySprite::Obstacle(ObstacleKind::Crate),
        });

        tick(&mut state, &TickInput::default(), DT);
        let expected = 700.0 - state.game_speed() * 3.0;
        assert!((state.obstacles[0].pos.x - expected).abs() < 1e-3);
    }

    #[test]
    fn test_off_screen_entities_removed() {
        let mut state = running(1);
        let id = state.next_entity_id();
        state.obstacles.push(Entity {
            id,
            pos: Vec2::new(-61.0, 0.0),
            size: Vec2::splat(60.0),
            sprite: EntitySprite::Obstacle(ObstacleKind::Rock),
        });
        let coin_id = state.next_entity_id();
        state.coins.push(Entity {
            id: coin_id,
            pos: Vec2::new(-20.0, 0.0),
            size: Vec2::splat(30.0),
            sprite: EntitySprite::Coin,
        });

        tick(&mut state, &TickInput::default(), DT);
        assert!(state.obstacles.is_empty());
        assert!(state.coins.is_empty());
    }

    #[test]
    fn test_shield_absorbs_hit() {
        let mut state = running(1);
        state.activate_buff(BuffKind::Shield);
        let obstacle = obstacle_on_player(&mut state);
        state.obstacles.push(obstacle);
        state.drain_events();

        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.lives, 2);
        assert!(state.active_buff.is_none());
        assert!(state.obstacles.is_empty());
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::ObstacleHit, GameEvent::ShieldConsumed]
        );
    }

    #[test]
    fn test_hit_costs_a_life() {
        let mut state = running(1);
        let obstacle = obstacle_on_player(&mut state);
        state.obstacles.push(obstacle);

        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.lives, 1);
        assert!(state.obstacles.is_empty());
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::ObstacleHit, GameEvent::LifeLost]
        );
    }

    #[test]
    fn test_fatal_hit_skips_pickups_that_tick() {
        let mut state = running(1);
        state.lives = 0;
        let obstacle = obstacle_on_player(&mut state);
        state.obstacles.push(obstacle);
        let coin = pickup_on_player(&mut state, EntitySprite::Coin);
        state.coins.push(coin.clone());
        let buff = pickup_on_player(&mut state, EntitySprite::Buff);
        state.buffs.push(buff.clone());
        let score_before = state.score;

        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.button.is_some());
        // Only the time-based gain was applied; pickups are untouched
        assert!((state.score - (score_before + 0.16)).abs() < 1e-6);
        assert_eq!(state.coins, vec![coin]);
        assert_eq!(state.buffs, vec![buff]);
        assert_eq!(state.active_buff, None);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::ObstacleHit, GameEvent::GameOver]
        );

        // Further ticks are no-ops
        let score = state.score;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.score, score);
    }

    #[test]
    fn test_coin_collected() {
        let mut state = running(1);
        let coin = pickup_on_player(&mut state, EntitySprite::Coin);
        state.coins.push(coin);

        tick(&mut state, &TickInput::default(), DT);

        assert!(state.coins.is_empty());
        assert!((state.score - 5.16).abs() < 1e-4);
        assert_eq!(state.drain_events(), vec![GameEvent::CoinCollected]);
    }

    #[test]
    fn test_buff_collected() {
        let mut state = running(1);
        let buff = pickup_on_player(&mut state, EntitySprite::Buff);
        state.buffs.push(buff);

        tick(&mut state, &TickInput::default(), DT);

        assert!(state.buffs.is_empty());
        let active = state.active_buff.expect("buff activated");
        assert_eq!(active.expires_at_ms, 16.0 + 10_000.0);
        assert!(matches!(
            state.drain_events().as_slice(),
            [GameEvent::BuffActivated(_)]
        ));
    }

    #[test]
    fn test_buff_expires_on_clock() {
        let mut state = running(1);
        state.activate_buff(BuffKind::SlowObstacles);

        // Exactly 10s later it is still active (expiry is strict)
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), 1000.0);
        }
        assert!(state.has_buff(BuffKind::SlowObstacles));

        tick(&mut state, &TickInput::default(), 1.0);
        assert!(state.active_buff.is_none());
    }

    #[test]
    fn test_restart_resets_session() {
        let mut state = running(1);
        state.lives = 0;
        state.activate_buff(BuffKind::DoubleScore);
        for _ in 0..50 {
            tick(&mut state, &TickInput::default(), DT);
        }
        let obstacle = obstacle_on_player(&mut state);
        state.obstacles.push(obstacle);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::GameOver);

        let center = state.button_rect().center();
        assert!(state.click(center));

        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0.0);
        assert_eq!(state.lives, 2);
        assert_eq!(state.next_life_threshold, 100.0);
        assert_eq!(state.clock_ms, 0.0);
        assert!(state.obstacles.is_empty());
        assert!(state.coins.is_empty());
        assert!(state.buffs.is_empty());
        assert!(state.active_buff.is_none());
        assert_eq!(state.player, Player::new(state.ground_y()));
        // First tick after a reset uses the fallback delta
        assert_eq!(state.frame_delta(123_456.0), 16.0);
    }

    #[test]
    fn test_determinism() {
        let tuning = Tuning {
            coin_chance: 0.05,
            buff_chance: 0.01,
            ..Tuning::default()
        };
        let mut a = GameState::with_tuning(99, tuning.clone()).unwrap();
        let mut b = GameState::with_tuning(99, tuning).unwrap();
        a.transition(GamePhase::Running);
        b.transition(GamePhase::Running);

        for i in 0..2000 {
            let mut input = TickInput::default();
            if i % 90 == 0 {
                input.push(PlayerAction::Jump);
            }
            match i % 250 {
                0 => input.push(PlayerAction::SlidePress),
                40 => input.push(PlayerAction::SlideRelease),
                _ => {}
            }
            tick(&mut a, &input, DT);
            tick(&mut b, &input, DT);
        }

        assert_eq!(a.phase, b.phase);
        assert_eq!(a.score, b.score);
        assert_eq!(a.lives, b.lives);
        assert_eq!(a.obstacles, b.obstacles);
        assert_eq!(a.coins, b.coins);
        assert_eq!(a.buffs, b.buffs);
        assert_eq!(a.active_buff, b.active_buff);
        assert_eq!(a.drain_events(), b.drain_events());
    }

    proptest! {
        #[test]
        fn prop_score_never_decreases(
            seed in any::<u64>(),
            steps in prop::collection::vec((0.0f32..100.0, any::<bool>()), 1..300),
        ) {
            let mut state = GameState::new(seed);
            state.transition(GamePhase::Running);

            for (dt, jump) in steps {
                let before = state.score;
                let input = if jump {
                    TickInput::new([PlayerAction::Jump])
                } else {
                    TickInput::default()
                };
                tick(&mut state, &input, dt);
                prop_assert!(state.score >= before);
            }
        }

        #[test]
        fn prop_no_off_screen_entities_after_tick(
            seed in any::<u64>(),
            dts in prop::collection::vec(0.0f32..200.0, 1..400),
        ) {
            let tuning = Tuning {
                coin_chance: 0.05,
                buff_chance: 0.05,
                ..Tuning::default()
            };
            let mut state = GameState::with_tuning(seed, tuning).unwrap();
            state.transition(GamePhase::Running);

            for dt in dts {
                tick(&mut state, &TickInput::default(), dt);
                for e in state.obstacles.iter().chain(&state.coins).chain(&state.buffs) {
                    prop_assert!(e.pos.x + e.size.x >= 0.0);
                }
                if state.phase != GamePhase::Running {
                    break;
                }
            }
        }
    }
}

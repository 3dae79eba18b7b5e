//! Fixed timestep simulation tick
//!
//! One call advances the countdown, applies held movement keys, moves every
//! projectile and resolves collisions and level transitions. Each stage can
//! end the tick early once the outcome changes.

use super::collision::{collides, within_gate};
use super::state::{Direction, Entity, GameEvent, GameState, Key, LoseReason, Outcome};
use crate::consts::*;

/// Advance the game state by one tick of `dt` seconds
///
/// No-op in the menu and on the win/lose screens.
pub fn tick(state: &mut GameState, dt: f32) {
    if !state.outcome.is_playing() {
        return;
    }

    // Countdown first: running out of time beats every other outcome
    if !elapse(state, dt) {
        return;
    }

    move_player(state);
    advance_player_bullets(state);

    match state.outcome {
        Outcome::LevelOne => level_one(state),
        Outcome::LevelTwo => level_two(state),
        _ => {}
    }
}

/// Advance the sim clock and the level countdown by `secs` without moving
/// anything
///
/// Returns false once the run is no longer playing, including when this call
/// ran the countdown out.
pub fn elapse(state: &mut GameState, secs: f32) -> bool {
    if !state.outcome.is_playing() {
        return false;
    }
    state.clock_ms += f64::from(secs) * 1000.0;
    state.time_remaining -= secs;
    if state.time_remaining <= 0.0 {
        state.time_remaining = 0.0;
        state.lose(LoseReason::TimeUp);
        return false;
    }
    true
}

/// Drop every item whose flag is set, keeping order
fn compact<T>(items: &mut Vec<T>, dead: &[bool]) {
    let mut index = 0;
    items.retain(|_| {
        let keep = !dead[index];
        index += 1;
        keep
    });
}

fn move_player(state: &mut GameState) {
    let left = state.input.is_held(Key::Left);
    let right = state.input.is_held(Key::Right);
    let Some(player) = state.player.as_mut() else {
        return;
    };
    if left && player.pos.x > PLAYER_LEFT_MARGIN {
        player.pos.x -= PLAYER_STEP;
    }
    if right && player.pos.x < PLAYER_RIGHT_MARGIN {
        player.pos.x += PLAYER_STEP;
    }
}

fn advance_player_bullets(state: &mut GameState) {
    for bullet in &mut state.bullets {
        bullet.advance();
    }
    state.bullets.retain(|b| b.pos.y >= 0.0);
}

fn out_of_ammo(state: &GameState) -> bool {
    state.bullets_remaining == 0 && state.bullets.is_empty()
}

fn level_one(state: &mut GameState) {
    let mut spent = vec![false; state.bullets.len()];
    let mut destroyed = vec![false; state.asteroids.len()];

    for (bi, bullet) in state.bullets.iter().enumerate() {
        // A bullet takes out at most one asteroid
        let hit = state
            .asteroids
            .iter()
            .enumerate()
            .find(|(ai, rock)| !destroyed[*ai] && collides(bullet, rock))
            .map(|(ai, _)| ai);
        if let Some(ai) = hit {
            spent[bi] = true;
            destroyed[ai] = true;
            let pos = state.asteroids[ai].pos;
            state.events.push(GameEvent::AsteroidDestroyed { pos });
            log::debug!("Asteroid destroyed at ({:.0}, {:.0})", pos.x, pos.y);
        }
    }

    compact(&mut state.bullets, &spent);
    compact(&mut state.asteroids, &destroyed);

    // Field cleared wins over running dry on the same tick
    if state.asteroids.is_empty() {
        state.events.push(GameEvent::LevelCleared);
        state.start_level_two();
    } else if out_of_ammo(state) {
        state.lose(LoseReason::OutOfAmmo);
    }
}

fn level_two(state: &mut GameState) {
    if state.boss.is_none() {
        return;
    }

    move_boss(state);
    let fired = boss_fire(state);

    if let Some(reason) = update_boss_bullets(state) {
        state.lose(reason);
        return;
    }
    // Fresh shots start moving next tick
    state.boss_bullets.extend(fired);

    if rammed_boss(state) {
        state.lose(LoseReason::Rammed);
        return;
    }

    if hit_boss(state) {
        state.boss = None;
        state.win();
        return;
    }

    if out_of_ammo(state) {
        state.lose(LoseReason::OutOfAmmo);
    }
}

/// Alternate stationary and moving phases, bouncing between the margins
fn move_boss(state: &mut GameState) {
    let now = state.clock_ms;
    let phase_ms = state.tuning.boss_phase_ms;
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    if !boss.is_moving(now, phase_ms) {
        return;
    }

    boss.body.pos.x += boss.direction.sign() * BOSS_SPEED;
    if boss.body.pos.x <= BOSS_LEFT_MARGIN {
        boss.body.pos.x = BOSS_LEFT_MARGIN;
        boss.direction = Direction::Right;
    } else if boss.body.pos.x >= BOSS_RIGHT_MARGIN {
        boss.body.pos.x = BOSS_RIGHT_MARGIN;
        boss.direction = Direction::Left;
    }
}

fn boss_fire(state: &mut GameState) -> Option<Entity> {
    let now = state.clock_ms;
    let interval = state.tuning.boss_fire_interval_ms;
    let boss = state.boss.as_mut()?;
    if !boss.ready_to_fire(now, interval) {
        return None;
    }
    boss.last_shot_ms = now;
    state.events.push(GameEvent::BossFired);
    log::debug!("Boss fired from x={:.0}", boss.body.pos.x);
    Some(Entity::boss_bullet(boss.body.pos))
}

/// Move boss bullets, cancel them against player bullets
///
/// Returns the lose reason if one reached the ship.
fn update_boss_bullets(state: &mut GameState) -> Option<LoseReason> {
    for shot in &mut state.boss_bullets {
        shot.advance();
    }
    state.boss_bullets.retain(|b| b.pos.y <= FIELD_HEIGHT);

    let mut cancelled = vec![false; state.boss_bullets.len()];
    let mut spent = vec![false; state.bullets.len()];

    for (si, shot) in state.boss_bullets.iter().enumerate() {
        if let Some(player) = &state.player {
            if collides(shot, player) {
                return Some(LoseReason::ShotDown);
            }
        }
        let hit = state
            .bullets
            .iter()
            .enumerate()
            .find(|(bi, bullet)| !spent[*bi] && collides(shot, bullet))
            .map(|(bi, _)| bi);
        if let Some(bi) = hit {
            spent[bi] = true;
            cancelled[si] = true;
            state.events.push(GameEvent::BulletsCancelled);
        }
    }

    compact(&mut state.boss_bullets, &cancelled);
    compact(&mut state.bullets, &spent);
    None
}

fn rammed_boss(state: &GameState) -> bool {
    let (Some(player), Some(boss)) = (&state.player, &state.boss) else {
        return false;
    };
    within_gate(player, &boss.body, BOSS_RAM_GATE) && collides(player, &boss.body)
}

/// Apply player bullet hits to the boss; true once its hit points run out
fn hit_boss(state: &mut GameState) -> bool {
    let Some(boss) = state.boss.as_mut() else {
        return false;
    };

    let mut spent = vec![false; state.bullets.len()];
    for (bi, bullet) in state.bullets.iter().enumerate() {
        if boss.hp == 0 {
            break;
        }
        if collides(bullet, &boss.body) {
            spent[bi] = true;
            boss.hp -= 1;
            state.events.push(GameEvent::BossHit { hp: boss.hp });
            log::debug!("Boss hit, {} hp left", boss.hp);
        }
    }
    compact(&mut state.bullets, &spent);

    boss.hp == 0
}

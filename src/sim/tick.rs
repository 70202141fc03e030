//! Per-frame simulation tick
//!
//! Order within a frame: player (aim, fire, movement, bullets), dead-enemy
//! sweep, enemies (pursuit, bullet hits, contact damage), bullet sweep,
//! difficulty director.

use glam::Vec2;

use super::bullet::RemovalCause;
use super::clock::FrameDelta;
use super::collision::is_colliding;
use super::player::Controls;
use super::state::{GameEvent, GamePhase, GameState};

/// Input snapshot for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement controls
    pub controls: Controls,
    /// Fire pressed since the last tick (one-shot)
    pub fire: bool,
    /// Latest pointer position, if it moved since the last tick
    pub pointer: Option<Vec2>,
    /// Pause toggle (one-shot)
    pub pause: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: FrameDelta) {
    state.events.clear();

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    tick_player(state, input, dt);
    sweep_dead_enemies(state);
    tick_enemies(state, dt);

    for (id, cause) in state.player.gun.sweep(&mut state.scene) {
        state.events.push(GameEvent::BulletRemoved { id, cause });
    }

    if state.player.is_dead() {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver);
        log::info!(
            "Game over on wave {} after {} ticks",
            state.difficulty.wave,
            state.time_ticks
        );
        return;
    }

    run_director(state);
}

fn tick_player(state: &mut GameState, input: &TickInput, dt: FrameDelta) {
    let player = &mut state.player;
    player.controls = input.controls;

    if let Some(pointer) = input.pointer {
        player.aim_at(&mut state.scene, pointer);
    }

    if input.fire
        && let Some(id) = player.fire(&mut state.scene, state.environment.projectiles)
    {
        state.events.push(GameEvent::BulletFired { id });
    }

    player.on_tick(&mut state.scene, &state.environment, dt);
}

/// Remove enemies whose health ran out on a previous frame
fn sweep_dead_enemies(state: &mut GameState) {
    let scene = &mut state.scene;
    let difficulty = &mut state.difficulty;
    let events = &mut state.events;

    state.enemies.retain(|enemy| {
        if !enemy.is_dead() {
            return true;
        }
        scene.despawn(enemy.id);
        difficulty.record_kill();
        events.push(GameEvent::EnemyKilled { id: enemy.id });
        log::debug!("Enemy {} killed", enemy.id);
        false
    });
}

fn tick_enemies(state: &mut GameState, dt: FrameDelta) {
    let Some(target) = state.scene.global_position(state.player.id) else {
        return;
    };
    let damage = state.difficulty.bullet_damage(state.tuning.base_damage);
    let contact_damage = state.tuning.contact_damage;

    for enemy in &mut state.enemies {
        enemy.on_tick(&mut state.scene, target, dt);

        // Bullets against this enemy
        for bullet in &mut state.player.gun.bullets {
            if enemy.is_dead() {
                break;
            }
            if !bullet.is_alive() {
                continue;
            }
            if !is_colliding(&state.scene, &bullet.hitbox, &enemy.hitbox) {
                continue;
            }
            bullet.expire(RemovalCause::Hit);
            enemy.take_damage(damage);
            state.events.push(GameEvent::EnemyHit {
                id: enemy.id,
                damage,
            });
        }

        // Contact with the player
        if !enemy.is_dead()
            && is_colliding(&state.scene, &enemy.hitbox, &state.player.hitbox)
            && state.player.take_damage(contact_damage)
        {
            state.events.push(GameEvent::PlayerDamaged {
                amount: contact_damage,
                health: state.player.health,
            });
        }
    }
}

/// Spawn decision and wave escalation
fn run_director(state: &mut GameState) {
    state.difficulty.advance_frame();

    if state.difficulty.should_spawn(state.tuning.spawn_cadence_frames) {
        state.spawn_enemy();
    }

    if let Some(escalation) = state.difficulty.escalate() {
        state.player.speed += escalation.player_speed_bonus;
        log::info!(
            "Wave {}: multiplier={}, max_enemy={}, player speed={:.1}",
            escalation.wave,
            escalation.multiplier,
            escalation.max_enemy,
            state.player.speed
        );
        state.events.push(GameEvent::WaveStarted(escalation));
    }
}

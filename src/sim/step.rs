/// Step functions: the only code that mutates a running world.
///
///   - `handle_move`   one player step (walk, collect, unlock, or exit)
///   - `advance_level` leave the current board for the next one
///   - `advance_clock` turn host-clock seconds into the 100ms animation tick
///
/// Each returns the events it produced; rendering happens only between calls,
/// so a frame never observes a half-applied move.

use log::{debug, info};

use crate::domain::entity::MoveDir;
use crate::domain::rules;
use crate::domain::tile::Tile;
use super::event::GameEvent;
use super::world::{Phase, WorldState};

/// Length of one animation tick in milliseconds.
pub const TICK_MS: u64 = 100;

// ══════════════════════════════════════════════════════════════
// Level transitions
// ══════════════════════════════════════════════════════════════

/// Activate level `idx`, or finish the game if there is no such level.
/// Resets the tick clock either way.
pub fn enter_level(world: &mut WorldState, idx: usize) -> Vec<GameEvent> {
    world.tick = 0;
    world.last_tick = 0;
    world.level_started_at = world.now;

    match world.levels.get(idx) {
        Some(level) => {
            let (row, col) = level.start;
            world.phase = Phase::Playing(idx);
            world.player.start_level(row, col);
            info!("entered level {} of {}", idx + 1, world.levels.len());
            vec![GameEvent::LevelEntered { index: idx }]
        }
        None => {
            world.phase = Phase::Finished;
            info!("all {} levels cleared", world.levels.len());
            vec![GameEvent::GameFinished]
        }
    }
}

pub fn advance_level(world: &mut WorldState) -> Vec<GameEvent> {
    match world.phase {
        Phase::Playing(idx) => enter_level(world, idx + 1),
        Phase::Finished => vec![],
    }
}

// ══════════════════════════════════════════════════════════════
// Movement
// ══════════════════════════════════════════════════════════════

enum Target {
    Edge,
    Floor,
    Exit,
    Other,
}

pub fn handle_move(world: &mut WorldState, dir: MoveDir) -> Vec<GameEvent> {
    let mut events = Vec::new();

    let (level, player) = match world.board_and_player() {
        Some(pair) => pair,
        None => return events,
    };

    let (dr, dc) = dir.delta();
    let target = (
        usize::try_from(player.row as i64 + dr),
        usize::try_from(player.col as i64 + dc),
    );
    let (row, col) = match target {
        (Ok(r), Ok(c)) => (r, c),
        _ => {
            debug!("move {dir:?} blocked by board edge");
            return events;
        }
    };

    let kind = match level.tile(row, col) {
        None => Target::Edge,
        Some(Tile::Empty) => Target::Floor,
        Some(Tile::Exit) => Target::Exit,
        Some(_) => Target::Other,
    };

    match kind {
        Target::Edge => debug!("move {dir:?} blocked by board edge"),
        Target::Floor => player.move_to(row, col),
        Target::Exit => events.extend(advance_level(world)),
        Target::Other => {
            if rules::can_pass(level, player, row, col, &mut events) {
                player.move_to(row, col);
            } else {
                debug!("move {dir:?} into ({row}, {col}) refused");
            }
        }
    }

    events
}

// ══════════════════════════════════════════════════════════════
// Clock
// ══════════════════════════════════════════════════════════════

/// Record the host clock and recompute the tick.
/// Returns true when the tick passed the last rendered one.
pub fn advance_clock(world: &mut WorldState, now: f64) -> bool {
    world.now = now;
    if world.is_finished() {
        return false;
    }

    let elapsed_ms = ((now - world.level_started_at) * 1000.0).max(0.0).floor() as u64;
    world.tick = elapsed_ms / TICK_MS;

    if world.tick > world.last_tick {
        world.last_tick = world.tick;
        true
    } else {
        false
    }
}

/// WorldState: everything a running session owns.
///
/// All levels are parsed up front, so advancing never touches the disk
/// and the next board is complete before the player can step onto it.
/// Boards mutate only through `rules::can_pass` side effects.

use crate::domain::entity::Player;
use crate::sim::level::Level;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// Zero-based index of the active level.
    Playing(usize),
    Finished,
}

pub struct WorldState {
    pub levels: Vec<Level>,
    pub player: Player,
    pub phase: Phase,

    // ── Clock ──
    /// Animation tick of the active level (100ms steps since it started).
    pub tick: u64,
    /// Last tick a frame was produced for.
    pub last_tick: u64,
    /// Host-clock seconds at which the active level started.
    pub level_started_at: f64,
    /// Most recent host-clock reading seen by the session.
    pub now: f64,
}

impl WorldState {
    /// A world whose player is not yet placed. Call `step::enter_level`
    /// to activate the first board.
    pub fn new(levels: Vec<Level>, player: Player) -> Self {
        WorldState {
            levels,
            player,
            phase: Phase::Playing(0),
            tick: 0,
            last_tick: 0,
            level_started_at: 0.0,
            now: 0.0,
        }
    }

    pub fn level_index(&self) -> Option<usize> {
        match self.phase {
            Phase::Playing(idx) => Some(idx),
            Phase::Finished => None,
        }
    }

    pub fn level(&self) -> Option<&Level> {
        self.level_index().and_then(|idx| self.levels.get(idx))
    }

    /// Split borrow used by the move logic: the active board and the player.
    pub fn board_and_player(&mut self) -> Option<(&mut Level, &mut Player)> {
        let idx = self.level_index()?;
        let level = self.levels.get_mut(idx)?;
        Some((level, &mut self.player))
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn total_levels(&self) -> usize {
        self.levels.len()
    }
}

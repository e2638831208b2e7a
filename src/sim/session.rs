/// Session: the object the host loop owns for one run of the game.
///
///   start(name, resources)  parse every level, place the player on level 1
///   handle_key(key)         Continue or Quit
///   on_tick(seconds)        a new frame when the 100ms tick advances
///
/// Events produced by keys are queued until the host drains them.

use log::info;

use crate::domain::entity::Player;
use crate::error::{GameError, GameResult};
use crate::ui::frame::{self, Frame};
use crate::ui::input::Key;
use super::event::GameEvent;
use super::level::{parse_level, MessageDeck};
use super::resources::{greeting, ResourceSource};
use super::step;
use super::world::WorldState;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flow {
    Continue,
    Quit,
}

/// What the status line shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hud {
    pub level: usize,
    pub total_levels: usize,
    pub keys: Vec<char>,
    pub companions: usize,
}

pub struct Session {
    world: WorldState,
    pending: Vec<GameEvent>,
}

impl Session {
    pub fn start(player_name: &str, resources: &dyn ResourceSource) -> GameResult<Self> {
        let companions = resources.read_companion_messages()?;
        let mut banners = vec![greeting(player_name)];
        banners.extend(resources.read_banner_messages()?);
        let mut deck = MessageDeck::new(companions, banners);

        let count = resources.level_count();
        let mut levels = Vec::with_capacity(count);
        for idx in 0..count {
            let text = resources.read_level_text(idx)?;
            let level = parse_level(&text, &mut deck)
                .map_err(|source| GameError::LevelFormat { level: idx + 1, source })?;
            levels.push(level);
        }
        info!("loaded {count} levels for {player_name:?}");

        let mut world = WorldState::new(levels, Player::new(player_name));
        let pending = step::enter_level(&mut world, 0);
        Ok(Session { world, pending })
    }

    pub fn handle_key(&mut self, key: Key) -> Flow {
        let events = match key {
            Key::Quit => {
                info!("quit requested");
                return Flow::Quit;
            }
            Key::Advance => {
                info!("skipping level");
                step::advance_level(&mut self.world)
            }
            Key::Move(dir) => step::handle_move(&mut self.world, dir),
        };
        self.pending.extend(events);

        if self.world.is_finished() {
            Flow::Quit
        } else {
            Flow::Continue
        }
    }

    /// `elapsed` is host-clock seconds since the session started.
    pub fn on_tick(&mut self, elapsed: f64) -> Option<Frame> {
        if step::advance_clock(&mut self.world, elapsed) {
            self.frame()
        } else {
            None
        }
    }

    /// The current picture, regardless of the tick. None once finished.
    pub fn frame(&self) -> Option<Frame> {
        let level = self.world.level()?;
        Some(frame::compose(self.world.tick, level, &self.world.player))
    }

    pub fn hud(&self) -> Hud {
        let total_levels = self.world.total_levels();
        Hud {
            level: self.world.level_index().map_or(total_levels, |i| i + 1),
            total_levels,
            keys: self.world.player.keys.clone(),
            companions: self.world.player.companions.len(),
        }
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_finished(&self) -> bool {
        self.world.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::MoveDir;
    use crate::sim::level::LevelFormatError;
    use crate::sim::resources::{EmbeddedResources, MemoryResources};

    fn session(levels: &[&str]) -> Session {
        Session::start("Nia", &MemoryResources::with_levels(levels)).unwrap()
    }

    #[test]
    fn starts_on_first_level() {
        let mut s = session(&["#P E#"]);
        assert_eq!(s.take_events(), vec![GameEvent::LevelEntered { index: 0 }]);
        assert_eq!(s.frame().unwrap().to_string(), "#N E#\n");
        assert_eq!(s.hud().level, 1);
    }

    #[test]
    fn greeting_is_the_first_banner() {
        let s = session(&["PHHHHHHHHHHHHHHHHHHHHHHHHHHHHHH"]);
        let text = s.frame().unwrap().to_string();
        // the greeting starts with seven spaces, then "Happy"
        assert!(text.starts_with("N       Happy Birthday Nia"), "{text}");
    }

    #[test]
    fn frames_only_on_new_ticks() {
        let mut s = session(&["P"]);
        assert!(s.on_tick(0.02).is_none());
        assert!(s.on_tick(0.11).is_some());
        assert!(s.on_tick(0.12).is_none());
        assert!(s.on_tick(0.31).is_some());
    }

    #[test]
    fn exit_scenario_then_finish() {
        let mut s = session(&["P E", "PE"]);
        assert_eq!(s.handle_key(Key::Move(MoveDir::Right)), Flow::Continue);
        assert_eq!(s.handle_key(Key::Move(MoveDir::Right)), Flow::Continue);
        assert_eq!(s.hud().level, 2);
        assert_eq!(s.handle_key(Key::Move(MoveDir::Right)), Flow::Quit);
        assert!(s.is_finished());
        assert!(s.frame().is_none());
        assert!(s.on_tick(5.0).is_none());
        let events = s.take_events();
        assert_eq!(events.last(), Some(&GameEvent::GameFinished));
    }

    #[test]
    fn advance_key_skips_levels() {
        let mut s = session(&["P#E", "P", "P"]);
        assert_eq!(s.handle_key(Key::Advance), Flow::Continue);
        assert_eq!(s.handle_key(Key::Advance), Flow::Continue);
        assert_eq!(s.hud().level, 3);
        assert_eq!(s.handle_key(Key::Advance), Flow::Quit);
    }

    #[test]
    fn quit_ends_at_any_time() {
        let mut s = session(&["P E"]);
        assert_eq!(s.handle_key(Key::Quit), Flow::Quit);
        assert!(!s.is_finished());
    }

    #[test]
    fn hud_tracks_inventory() {
        let mut res = MemoryResources::with_levels(&["PaQ"]);
        res.companions = vec!["Bo".into()];
        let mut s = Session::start("x", &res).unwrap();
        s.handle_key(Key::Move(MoveDir::Right));
        s.handle_key(Key::Move(MoveDir::Right));
        let hud = s.hud();
        assert_eq!((hud.keys, hud.companions), (vec!['a'], 1));
    }

    #[test]
    fn bad_level_reports_its_number() {
        let res = MemoryResources::with_levels(&["P", "###"]);
        match Session::start("x", &res) {
            Err(GameError::LevelFormat { level, source }) => {
                assert_eq!(level, 2);
                assert_eq!(source, LevelFormatError::NoStart);
            }
            other => panic!("unexpected {:?}", other.err()),
        }
    }

    #[test]
    fn missing_companion_text_is_fatal() {
        let res = MemoryResources::with_levels(&["PQ"]);
        assert!(matches!(
            Session::start("x", &res),
            Err(GameError::LevelFormat { source: LevelFormatError::CompanionsExhausted { .. }, .. })
        ));
    }

    #[test]
    fn builtin_pack_starts() {
        let s = Session::start("Robin", &EmbeddedResources).unwrap();
        assert_eq!(s.hud().total_levels, 4);
        assert!(s.frame().unwrap().to_string().contains('R'));
    }
}

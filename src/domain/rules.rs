/// Passage rules: may the player step onto a tile, and what happens if so.
///
/// One function, pattern-matched over every tile kind. Passing may mutate
/// the player (keys, companions) and the board (the cell is cleared).
/// Exits are not handled here: the step function intercepts them first.

use log::debug;

use crate::domain::entity::Player;
use crate::domain::tile::Tile;
use crate::sim::event::GameEvent;
use crate::sim::level::Level;

/// Try to pass onto (row, col). Returns whether the player may move there.
/// Side effects of a successful pass are applied and reported in `events`.
pub fn can_pass(
    level: &mut Level,
    player: &mut Player,
    row: usize,
    col: usize,
    events: &mut Vec<GameEvent>,
) -> bool {
    let tile = match level.tile(row, col) {
        Some(t) => t,
        None => return false, // off the board
    };

    match tile {
        Tile::Empty => true,
        Tile::Static { passable, .. } => *passable,
        Tile::Animated(anim) => anim.passable,
        Tile::Exit => true,
        Tile::Key(letter) => {
            let letter = *letter;
            level.clear(row, col);
            player.add_key(letter);
            debug!("picked up key '{letter}' at ({row}, {col})");
            events.push(GameEvent::KeyCollected { letter });
            true
        }
        Tile::Door(letter) => {
            let letter = *letter;
            if player.holds_key(letter) {
                player.use_key(letter);
                level.clear(row, col);
                debug!("unlocked door '{letter}' at ({row}, {col})");
                events.push(GameEvent::DoorUnlocked { letter });
                true
            } else {
                debug!("door '{letter}' is locked");
                false
            }
        }
        Tile::Companion(_) => {
            if let Some(Tile::Companion(companion)) = level.take(row, col) {
                player.companions.push(companion);
                let total = player.companions.len();
                debug!("companion joined at ({row}, {col}), now {total}");
                events.push(GameEvent::CompanionJoined { total });
            }
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::{parse_level, MessageDeck};

    fn level(text: &str) -> Level {
        let mut deck = MessageDeck::new(vec!["pup".into()], vec!["hi".into()]);
        parse_level(text, &mut deck).unwrap()
    }

    #[test]
    fn walls_and_hazards_block() {
        let mut l = level("P#WFH");
        let mut p = Player::new("z");
        let mut ev = vec![];
        for col in 1..5 {
            assert!(!can_pass(&mut l, &mut p, 0, col, &mut ev), "col {col}");
        }
        assert!(ev.is_empty());
    }

    #[test]
    fn off_board_is_impassable() {
        let mut l = level("P");
        let mut p = Player::new("z");
        let mut ev = vec![];
        assert!(!can_pass(&mut l, &mut p, 0, 1, &mut ev));
        assert!(!can_pass(&mut l, &mut p, 1, 0, &mut ev));
    }

    #[test]
    fn key_then_door_consumes_one_key() {
        let mut l = level("PaA");
        let mut p = Player::new("z");
        p.add_key('a'); // a spare from an earlier level
        let mut ev = vec![];
        assert!(can_pass(&mut l, &mut p, 0, 1, &mut ev));
        assert_eq!(l.tile(0, 1), Some(&Tile::Empty));
        assert_eq!(p.keys, vec!['a', 'a']);

        assert!(can_pass(&mut l, &mut p, 0, 2, &mut ev));
        assert_eq!(l.tile(0, 2), Some(&Tile::Empty));
        assert_eq!(p.keys, vec!['a']);
        assert_eq!(
            ev,
            vec![GameEvent::KeyCollected { letter: 'a' }, GameEvent::DoorUnlocked { letter: 'A' }]
        );
    }

    #[test]
    fn locked_door_changes_nothing() {
        let mut l = level("PbA");
        let mut p = Player::new("z");
        p.add_key('b');
        let mut ev = vec![];
        assert!(!can_pass(&mut l, &mut p, 0, 2, &mut ev));
        assert_eq!(l.tile(0, 2), Some(&Tile::Door('A')));
        assert_eq!(p.keys, vec!['b']);
        assert!(ev.is_empty());
    }

    #[test]
    fn companion_is_collected_once() {
        let mut l = level("PQ");
        let mut p = Player::new("z");
        let mut ev = vec![];
        assert!(can_pass(&mut l, &mut p, 0, 1, &mut ev));
        assert_eq!(p.companions.len(), 1);
        assert_eq!(p.companions[0].marker(), 'p');
        assert_eq!(l.tile(0, 1), Some(&Tile::Empty));
        // the cell is plain floor now
        assert!(can_pass(&mut l, &mut p, 0, 1, &mut ev));
        assert_eq!(p.companions.len(), 1);
        assert_eq!(ev, vec![GameEvent::CompanionJoined { total: 1 }]);
    }
}

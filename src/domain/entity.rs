/// The player: position, inventory and the trail companions walk on.
/// Keys and companions are permanent progress; only the trail is per level.

use std::collections::VecDeque;

use super::tile::{Companion, Glyphs};

/// Movement direction for a single step.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Up,
    Left,
    Down,
    Right,
}

impl MoveDir {
    /// (row, col) delta.
    pub fn delta(self) -> (i64, i64) {
        match self {
            MoveDir::Up => (-1, 0),
            MoveDir::Left => (0, -1),
            MoveDir::Down => (1, 0),
            MoveDir::Right => (0, 1),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub row: usize,
    pub col: usize,
    pub glyphs: Glyphs,
    pub phase: usize,
    /// Held key letters, lower-cased. A multiset: duplicates are allowed.
    pub keys: Vec<char>,
    /// Insertion order is follow order.
    pub companions: Vec<Companion>,
    /// Recently vacated cells, oldest first. Never longer than `companions`.
    pub trail: VecDeque<(usize, usize)>,
}

impl Player {
    /// The on-board symbol is the upper-cased first character of the name,
    /// taken as given. An empty name shows as `@`.
    pub fn new(name: &str) -> Self {
        let symbol = name
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('@');
        Player {
            row: 0,
            col: 0,
            glyphs: Glyphs::single(symbol),
            phase: 0,
            keys: Vec::new(),
            companions: Vec::new(),
            trail: VecDeque::new(),
        }
    }

    pub fn symbol_at(&self, tick: u64) -> char {
        self.glyphs.at(tick as i64 + self.phase as i64)
    }

    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn move_to(&mut self, row: usize, col: usize) {
        let followers = self.companions.len();
        if followers > 0 {
            while self.trail.len() >= followers {
                self.trail.pop_front();
            }
            self.trail.push_back((self.row, self.col));
        }
        self.row = row;
        self.col = col;
    }

    /// Place the player on a fresh level. Keys and companions are kept.
    pub fn start_level(&mut self, row: usize, col: usize) {
        self.trail.clear();
        self.row = row;
        self.col = col;
    }

    pub fn holds_key(&self, letter: char) -> bool {
        self.keys.contains(&letter.to_ascii_lowercase())
    }

    pub fn add_key(&mut self, letter: char) {
        self.keys.push(letter.to_ascii_lowercase());
    }

    /// Remove one instance of a key. Returns false if none was held.
    pub fn use_key(&mut self, letter: char) -> bool {
        let letter = letter.to_ascii_lowercase();
        match self.keys.iter().position(|&k| k == letter) {
            Some(idx) => {
                self.keys.remove(idx);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn symbol_from_name() {
        assert_eq!(Player::new("alice").symbol_at(0), 'A');
        assert_eq!(Player::new("bob smith").symbol_at(5), 'B');
        // no trimming: a leading space is the symbol
        assert_eq!(Player::new(" bob").symbol_at(0), ' ');
        assert_eq!(Player::new("").symbol_at(0), '@');
    }

    #[test]
    fn no_trail_without_companions() {
        let mut p = Player::new("x");
        p.start_level(1, 1);
        p.move_to(1, 2);
        p.move_to(1, 3);
        assert!(p.trail.is_empty());
        assert_eq!(p.position(), (1, 3));
    }

    #[test]
    fn trail_keeps_newest_positions() {
        let mut p = Player::new("x");
        p.companions.push(Companion::new("q"));
        p.companions.push(Companion::new("r"));
        p.start_level(0, 0);
        p.move_to(0, 1);
        p.move_to(0, 2);
        p.move_to(0, 3);
        assert_eq!(p.trail, VecDeque::from(vec![(0, 1), (0, 2)]));
    }

    #[test]
    fn start_level_clears_trail_but_keeps_inventory() {
        let mut p = Player::new("x");
        p.companions.push(Companion::new("q"));
        p.add_key('B');
        p.move_to(0, 1);
        p.start_level(4, 4);
        assert!(p.trail.is_empty());
        assert_eq!(p.keys, vec!['b']);
        assert_eq!(p.companions.len(), 1);
        assert_eq!(p.position(), (4, 4));
    }

    #[test]
    fn keys_are_a_multiset() {
        let mut p = Player::new("x");
        p.add_key('a');
        p.add_key('a');
        assert!(p.use_key('A'));
        assert!(p.holds_key('a'));
        assert!(p.use_key('a'));
        assert!(!p.use_key('a'));
    }

    proptest! {
        #[test]
        fn trail_never_outgrows_companions(
            moves in proptest::collection::vec((0usize..20, 0usize..20, any::<bool>()), 0..60)
        ) {
            let mut p = Player::new("x");
            for (row, col, gain) in moves {
                if gain {
                    p.companions.push(Companion::new("c"));
                }
                p.move_to(row, col);
                prop_assert!(p.trail.len() <= p.companions.len());
            }
        }
    }
}

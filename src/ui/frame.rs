/// Frame composition: board + player + followers → a grid of characters.
///
/// Pure and deterministic. Identical inputs give identical frames;
/// the terminal renderer only decides colours and what to redraw.
///
/// Per cell, first match wins:
///   1. the player
///   2. a trail position: trail entry i (oldest first) shows companion i's marker
///   3. the board tile for this tick (blank when empty)

use std::fmt;

use crate::domain::entity::Player;
use crate::domain::tile::{Hazard, Tile};
use crate::sim::level::Level;

/// Colour class of a composed cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Paint {
    Blank,
    Wall,
    Water,
    Fire,
    Banner,
    Companion,
    Follower,
    Key,
    Door,
    Exit,
    Player,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FrameCell {
    pub ch: char,
    pub paint: Paint,
}

impl FrameCell {
    pub const BLANK: FrameCell = FrameCell { ch: ' ', paint: Paint::Blank };
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    cells: Vec<FrameCell>,
}

impl Frame {
    pub fn get(&self, row: usize, col: usize) -> FrameCell {
        if row < self.height && col < self.width {
            self.cells[row * self.width + col]
        } else {
            FrameCell::BLANK
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[FrameCell]> {
        // chunks() rejects a zero size
        self.cells.chunks(self.width.max(1))
    }
}

/// Row-major text, one trailing newline per row.
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                write!(f, "{}", cell.ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn tile_cell(tile: &Tile, tick: u64) -> FrameCell {
    let paint = match tile {
        Tile::Empty => Paint::Blank,
        Tile::Static { .. } => Paint::Wall,
        Tile::Animated(anim) => match anim.kind {
            Hazard::Water => Paint::Water,
            Hazard::Fire => Paint::Fire,
            Hazard::Banner => Paint::Banner,
        },
        Tile::Companion(_) => Paint::Companion,
        Tile::Key(_) => Paint::Key,
        Tile::Door(_) => Paint::Door,
        Tile::Exit => Paint::Exit,
    };
    FrameCell { ch: tile.symbol_at(tick), paint }
}

pub fn compose(tick: u64, level: &Level, player: &Player) -> Frame {
    let mut cells = Vec::with_capacity(level.width * level.height);

    for (row, tiles) in level.tiles.iter().enumerate() {
        for (col, tile) in tiles.iter().enumerate() {
            let cell = if (row, col) == player.position() {
                FrameCell { ch: player.symbol_at(tick), paint: Paint::Player }
            } else if let Some(i) = player.trail.iter().position(|&p| p == (row, col)) {
                let ch = player.companions.get(i).map_or(' ', |c| c.marker());
                FrameCell { ch, paint: Paint::Follower }
            } else {
                tile_cell(tile, tick)
            };
            cells.push(cell);
        }
    }

    Frame { width: level.width, height: level.height, cells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tile::Companion;
    use crate::sim::level::{parse_level, MessageDeck};

    fn level(text: &str) -> Level {
        let mut deck = MessageDeck::new(vec!["qt".into()], vec!["abc".into()]);
        parse_level(text, &mut deck).unwrap()
    }

    fn placed(name: &str, level: &Level) -> Player {
        let mut p = Player::new(name);
        p.start_level(level.start.0, level.start.1);
        p
    }

    #[test]
    fn renders_rows_with_trailing_newlines() {
        let l = level("#P E#\n#aAQ#");
        let p = placed("zed", &l);
        assert_eq!(compose(0, &l, &p).to_string(), "#Z E#\n#aAq#\n");
    }

    #[test]
    fn animated_cells_follow_the_tick() {
        let l = level("PHHH");
        let p = placed("x", &l);
        assert_eq!(compose(0, &l, &p).to_string(), "Xabc\n");
        assert_eq!(compose(1, &l, &p).to_string(), "Xbca\n");
        let frame = compose(1, &l, &p);
        assert_eq!(frame.get(0, 1).paint, Paint::Banner);
        assert_eq!(frame.get(0, 0).paint, Paint::Player);
    }

    #[test]
    fn followers_draw_companion_markers() {
        let l = level("P    ");
        let mut p = placed("x", &l);
        p.companions.push(Companion::new("dog"));
        p.companions.push(Companion::new("cat"));
        p.move_to(0, 1);
        p.move_to(0, 2);
        p.move_to(0, 3);
        // trail oldest first: (0,1) → first companion, (0,2) → second
        assert_eq!(compose(7, &l, &p).to_string(), " dcX \n");
        assert_eq!(compose(7, &l, &p).get(0, 1).paint, Paint::Follower);
    }

    #[test]
    fn player_hides_follower_on_same_cell() {
        let l = level("P  ");
        let mut p = placed("x", &l);
        p.companions.push(Companion::new("dog"));
        p.move_to(0, 1);
        p.move_to(0, 0);
        // trail is [(0,1)], player back at (0,0)
        assert_eq!(compose(0, &l, &p).to_string(), "Xd \n");
        p.move_to(0, 1);
        assert_eq!(compose(0, &l, &p).to_string(), "dX \n");
    }

    #[test]
    fn followers_cover_board_tiles() {
        let l = level("P#");
        let mut p = placed("x", &l);
        p.companions.push(Companion::new("owl"));
        p.trail.push_back((0, 1));
        assert_eq!(compose(0, &l, &p).to_string(), "Xo\n");
    }

    #[test]
    fn repeated_trail_cell_draws_first_marker_only() {
        let l = level("P   ");
        let mut p = placed("x", &l);
        p.companions.push(Companion::new("dog"));
        p.companions.push(Companion::new("cat"));
        p.trail.push_back((0, 1));
        p.trail.push_back((0, 1));
        let frame = compose(0, &l, &p);
        assert_eq!(frame.to_string(), "Xd  \n");
        assert!(!frame.to_string().contains('c'));
    }

    #[test]
    fn composing_is_deterministic() {
        let l = level("#PWF\n#HHQ");
        let p = placed("amy", &l);
        for tick in [0, 3, 99] {
            assert_eq!(compose(tick, &l, &p), compose(tick, &l, &p));
            assert_eq!(compose(tick, &l, &p).to_string(), compose(tick, &l, &p).to_string());
        }
    }

    #[test]
    fn out_of_range_reads_are_blank() {
        let l = level("P");
        let p = placed("x", &l);
        assert_eq!(compose(0, &l, &p).get(5, 5), FrameCell::BLANK);
    }
}

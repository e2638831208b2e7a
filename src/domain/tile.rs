/// Tile types and their per-tick symbols.
/// Passage rules (what happens when the player steps on a tile)
/// live in `rules`, so this file only knows how tiles look.

/// Glyph ramp for flowing water (played in reverse).
pub const WATER: &str = "░░░░░░░░░░░░▒▓";
/// Glyph ramp for flickering fire (played in reverse).
pub const FIRE: &str = "░░░▒▒▒▓▓▓";

/// An ordered, cyclic sequence of display characters.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Glyphs(Vec<char>);

impl Glyphs {
    pub fn new(text: &str) -> Self {
        Glyphs(text.chars().collect())
    }

    pub fn single(ch: char) -> Self {
        Glyphs(vec![ch])
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Character at a (possibly negative) index, wrapped onto the cycle.
    /// An empty sequence shows as blank.
    pub fn at(&self, index: i64) -> char {
        if self.0.is_empty() {
            return ' ';
        }
        let len = self.0.len() as i64;
        self.0[index.rem_euclid(len) as usize]
    }

    /// First character, used as the fixed marker of a following companion.
    pub fn first(&self) -> char {
        self.0.first().copied().unwrap_or(' ')
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flow {
    Forward,
    Reverse,
}

/// What an animated tile depicts. Only affects colouring.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Hazard {
    Water,
    Fire,
    Banner,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Animated {
    pub glyphs: Glyphs,
    pub phase: usize,
    pub flow: Flow,
    pub passable: bool,
    pub kind: Hazard,
}

impl Animated {
    pub fn water(col: usize) -> Self {
        Animated { glyphs: Glyphs::new(WATER), phase: col, flow: Flow::Reverse, passable: false, kind: Hazard::Water }
    }

    pub fn fire(col: usize) -> Self {
        Animated { glyphs: Glyphs::new(FIRE), phase: col, flow: Flow::Reverse, passable: false, kind: Hazard::Fire }
    }

    pub fn banner(message: &str, offset: usize) -> Self {
        Animated { glyphs: Glyphs::new(message), phase: offset, flow: Flow::Forward, passable: false, kind: Hazard::Banner }
    }

    pub fn symbol_at(&self, tick: u64) -> char {
        let tick = tick as i64;
        let phase = self.phase as i64;
        match self.flow {
            Flow::Forward => self.glyphs.at(tick + phase),
            Flow::Reverse => self.glyphs.at(phase - tick),
        }
    }
}

/// A collectible that follows the player once picked up.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Companion {
    pub glyphs: Glyphs,
    pub phase: usize,
}

impl Companion {
    pub fn new(message: &str) -> Self {
        Companion { glyphs: Glyphs::new(message), phase: 0 }
    }

    /// Companions animate at half speed while waiting on the board.
    pub fn symbol_at(&self, tick: u64) -> char {
        self.glyphs.at((tick / 2) as i64 + self.phase as i64)
    }

    pub fn marker(&self) -> char {
        self.glyphs.first()
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum Tile {
    #[default]
    Empty,
    Static { symbol: char, passable: bool },
    Animated(Animated),
    Companion(Companion),
    /// Stored lower-cased.
    Key(char),
    /// Stored upper-cased.
    Door(char),
    Exit,
}

impl Tile {
    pub fn wall(symbol: char) -> Self {
        Tile::Static { symbol, passable: false }
    }

    pub fn symbol_at(&self, tick: u64) -> char {
        match self {
            Tile::Empty => ' ',
            Tile::Static { symbol, .. } => *symbol,
            Tile::Animated(anim) => anim.symbol_at(tick),
            Tile::Companion(c) => c.symbol_at(tick),
            Tile::Key(letter) | Tile::Door(letter) => *letter,
            Tile::Exit => 'E',
        }
    }
}

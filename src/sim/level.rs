/// Level loader.
///
/// ## Tile legend:
///   ' ' = Empty                  'P' = Player start (empty cell)
///   'Q' = Companion              'E' = Exit
///   'W' = Water (animated)       'F' = Fire (animated)
///   'A'-'D' = Door               'a'-'d' = Key for that door
///   'H' = Banner run cell        anything else = wall showing that character
///
/// Companions and banners pull their text from a shared `MessageDeck`
/// so that consecutive levels keep consuming the lists in order.
/// A banner run is a row-local stretch of contiguous `H` cells; every cell
/// of the run shows the same message, offset by its distance from the run start.

use crate::domain::tile::{Animated, Companion, Tile};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelFormatError {
    #[error("the level has no rows")]
    Empty,
    #[error("no player start marker `P`")]
    NoStart,
    #[error("companion at row {row}, col {col} has no message left")]
    CompanionsExhausted { row: usize, col: usize },
    #[error("banner at row {row}, col {col} has no message left")]
    BannersExhausted { row: usize, col: usize },
}

/// Ordered companion and banner messages, consumed front to back.
#[derive(Clone, Debug, Default)]
pub struct MessageDeck {
    companions: Vec<String>,
    banners: Vec<String>,
    next_companion: usize,
    next_banner: usize,
}

impl MessageDeck {
    pub fn new(companions: Vec<String>, banners: Vec<String>) -> Self {
        MessageDeck { companions, banners, next_companion: 0, next_banner: 0 }
    }

    fn take_companion(&mut self) -> Option<&str> {
        let msg = self.companions.get(self.next_companion)?;
        self.next_companion += 1;
        Some(msg)
    }

    fn take_banner(&mut self) -> Option<&str> {
        let msg = self.banners.get(self.next_banner)?;
        self.next_banner += 1;
        Some(msg)
    }
}

/// A rectangular board. Shape is fixed after load; cells change only
/// when something is collected or unlocked.
#[derive(Clone, Debug)]
pub struct Level {
    pub tiles: Vec<Vec<Tile>>,
    pub width: usize,
    pub height: usize,
    pub start: (usize, usize),
}

impl Level {
    /// Tile at (row, col), or None outside the board.
    #[inline]
    pub fn tile(&self, row: usize, col: usize) -> Option<&Tile> {
        self.tiles.get(row)?.get(col)
    }

    #[inline]
    pub fn clear(&mut self, row: usize, col: usize) {
        if let Some(cell) = self.tiles.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = Tile::Empty;
        }
    }

    /// Replace a cell, returning what was there. Out-of-bounds is a no-op.
    pub fn take(&mut self, row: usize, col: usize) -> Option<Tile> {
        let cell = self.tiles.get_mut(row)?.get_mut(col)?;
        Some(std::mem::take(cell))
    }
}

/// Parse one level's text into a board.
pub fn parse_level(text: &str, deck: &mut MessageDeck) -> Result<Level, LevelFormatError> {
    let mut rows: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
    while rows.last().map_or(false, |r| r.trim().is_empty()) {
        rows.pop();
    }
    if rows.is_empty() {
        return Err(LevelFormatError::Empty);
    }

    let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    let mut tiles = Vec::with_capacity(rows.len());
    let mut start = None;

    for (row, line) in rows.iter().enumerate() {
        let mut cells = Vec::with_capacity(width);
        // (run start column, message) of the banner run we are inside, if any
        let mut banner: Option<(usize, String)> = None;

        let padded = line.chars().chain(std::iter::repeat(' ')).take(width);
        for (col, ch) in padded.enumerate() {
            if ch != 'H' {
                banner = None;
            }
            let tile = match ch {
                ' ' => Tile::Empty,
                'P' => {
                    start = Some((row, col));
                    Tile::Empty
                }
                'H' => {
                    if banner.is_none() {
                        let msg = deck
                            .take_banner()
                            .ok_or(LevelFormatError::BannersExhausted { row, col })?;
                        banner = Some((col, msg.to_string()));
                    }
                    match &banner {
                        Some((run_start, msg)) => Tile::Animated(Animated::banner(msg, col - run_start)),
                        None => Tile::Empty,
                    }
                }
                'Q' => {
                    let msg = deck
                        .take_companion()
                        .ok_or(LevelFormatError::CompanionsExhausted { row, col })?;
                    Tile::Companion(Companion::new(msg))
                }
                'W' => Tile::Animated(Animated::water(col)),
                'F' => Tile::Animated(Animated::fire(col)),
                'E' => Tile::Exit,
                'A'..='D' => Tile::Door(ch),
                'a'..='d' => Tile::Key(ch),
                other => Tile::wall(other),
            };
            cells.push(tile);
        }
        tiles.push(cells);
    }

    let start = start.ok_or(LevelFormatError::NoStart)?;
    Ok(Level { height: tiles.len(), width, tiles, start })
}

/// Keyboard input.
///
/// The session only understands `Key`s. Anything that can produce them
/// (terminal, gamepad) implements `InputSource`, so the
/// game loop never branches on where input comes from.
///
///   w / a / s / d, arrows  →  Move
///   n                      →  Advance (skip to the next level)
///   Esc, Ctrl+C            →  Quit

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::MoveDir;

/// How long `read_key` sleeps between polls.
#[allow(dead_code)]
const READ_POLL: Duration = Duration::from_millis(10);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Key {
    Move(MoveDir),
    Advance,
    Quit,
}

pub trait InputSource {
    /// Next pending key, without blocking.
    fn poll_key(&mut self) -> Option<Key>;

    /// Wait until a key arrives.
    #[allow(dead_code)]
    fn read_key(&mut self) -> Key {
        loop {
            if let Some(key) = self.poll_key() {
                return key;
            }
            std::thread::sleep(READ_POLL);
        }
    }
}

/// Map one terminal key press to a game key.
pub fn map_key_event(key: &KeyEvent) -> Option<Key> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    {
        return Some(Key::Quit);
    }
    match key.code {
        KeyCode::Char('w') | KeyCode::Up => Some(Key::Move(MoveDir::Up)),
        KeyCode::Char('a') | KeyCode::Left => Some(Key::Move(MoveDir::Left)),
        KeyCode::Char('s') | KeyCode::Down => Some(Key::Move(MoveDir::Down)),
        KeyCode::Char('d') | KeyCode::Right => Some(Key::Move(MoveDir::Right)),
        KeyCode::Char('n') => Some(Key::Advance),
        KeyCode::Esc => Some(Key::Quit),
        _ => None,
    }
}

/// Raw-mode terminal keyboard via crossterm.
pub struct TerminalInput {
    queued: VecDeque<Key>,
}

impl TerminalInput {
    pub fn new() -> Self {
        TerminalInput { queued: VecDeque::with_capacity(8) }
    }

    /// Drain every pending terminal event into the queue.
    fn drain_events(&mut self) {
        while event::poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    if let Some(k) = map_key_event(&key) {
                        self.queued.push_back(k);
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    log::warn!("terminal read failed: {e}");
                    break;
                }
            }
        }
    }
}

impl InputSource for TerminalInput {
    fn poll_key(&mut self) -> Option<Key> {
        if self.queued.is_empty() {
            self.drain_events();
        }
        self.queued.pop_front()
    }
}

/// Ask for the player's name on a cooked-mode terminal.
pub fn prompt_player_name(input: &mut impl BufRead, output: &mut impl Write) -> io::Result<String> {
    write!(output, "What is your name? ")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

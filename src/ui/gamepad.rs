/// Gamepad input using gilrs, exposed as another `InputSource`.
///
/// Button mapping for the two commands comes from `[gamepad]` in config.toml.
/// Default mapping:
///   D-pad / Left Stick    →  Move (one step per press)
///   Start                 →  Advance (skip level)
///   Select                →  Quit
///
/// Without the `gamepad` feature the source exists but never yields a key.

use std::collections::VecDeque;

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::domain::entity::MoveDir;
use super::input::{InputSource, Key};

const STICK_DEADZONE: f32 = 0.25;

/// Logical button identifiers (one per physical face/shoulder button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    L2,      // LeftTrigger2
    R2,      // RightTrigger2
    Start,
    Select,
}

impl Btn {
    pub fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "L2" | "LT" | "LEFTTRIGGER2"  => Some(Btn::L2),
            "R2" | "RT" | "RIGHTTRIGGER2" => Some(Btn::R2),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South     => Some(Btn::A),
            Button::East      => Some(Btn::B),
            Button::West      => Some(Btn::X),
            Button::North     => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::LeftTrigger2  => Some(Btn::L2),
            Button::RightTrigger2 => Some(Btn::R2),
            Button::Start     => Some(Btn::Start),
            Button::Select    => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Command-to-button mapping (loaded from config).
#[derive(Clone, Debug, PartialEq, Eq)]
struct Bindings {
    advance: Vec<Btn>,
    quit: Vec<Btn>,
}

impl Default for Bindings {
    fn default() -> Self {
        Bindings {
            advance: vec![Btn::Start],
            quit: vec![Btn::Select],
        }
    }
}

impl Bindings {
    /// Unknown names are skipped; an empty result keeps the default.
    fn from_config(cfg: &GamepadConfig) -> Self {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names
                .iter()
                .filter_map(|s| {
                    let btn = Btn::from_name(s);
                    if btn.is_none() {
                        log::warn!("unknown gamepad button {s:?} in config");
                    }
                    btn
                })
                .collect()
        }
        let mut map = Bindings::default();
        let adv = parse_list(&cfg.advance);
        if !adv.is_empty() { map.advance = adv; }
        let quit = parse_list(&cfg.quit);
        if !quit.is_empty() { map.quit = quit; }
        map
    }

    fn key_for(&self, btn: Btn) -> Option<Key> {
        if self.quit.contains(&btn) {
            Some(Key::Quit)
        } else if self.advance.contains(&btn) {
            Some(Key::Advance)
        } else {
            None
        }
    }
}

pub struct GamepadInput {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    bindings: Bindings,
    queued: VecDeque<Key>,

    // Left stick, reduced to one digital direction
    stick_x: f32,
    stick_y: f32,
    stick_dir: Option<MoveDir>,

    pub connected: bool,
}

impl GamepadInput {
    pub fn new(cfg: &GamepadConfig) -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = {
            match Gilrs::new() {
                Ok(g) => {
                    let has_pad = g.gamepads().next().is_some();
                    (Some(g), has_pad)
                }
                Err(e) => {
                    log::info!("gamepad support unavailable: {e}");
                    (None, false)
                }
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadInput {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            bindings: Bindings::from_config(cfg),
            queued: VecDeque::new(),
            stick_x: 0.0,
            stick_y: 0.0,
            stick_dir: None,
            connected,
        }
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    match btn {
                        Button::DPadUp    => self.dpad(MoveDir::Up),
                        Button::DPadDown  => self.dpad(MoveDir::Down),
                        Button::DPadLeft  => self.dpad(MoveDir::Left),
                        Button::DPadRight => self.dpad(MoveDir::Right),
                        other => {
                            if let Some(b) = Btn::from_gilrs(other) {
                                self.button(b);
                            }
                        }
                    }
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick(value, self.stick_y),
                        Axis::LeftStickY => self.stick(self.stick_x, value),
                        _ => {}
                    }
                }
                EventType::Connected => {
                    log::info!("gamepad connected");
                    self.connected = true;
                }
                EventType::Disconnected => {
                    log::info!("gamepad disconnected");
                    self.connected = false;
                    self.stick(0.0, 0.0);
                }
                _ => {}
            }
        }
    }

    // ── Edge handling (shared by gilrs and tests) ──

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn dpad(&mut self, dir: MoveDir) {
        self.queued.push_back(Key::Move(dir));
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn button(&mut self, btn: Btn) {
        if let Some(key) = self.bindings.key_for(btn) {
            self.queued.push_back(key);
        }
    }

    /// Stick positions become one move when they enter a new direction.
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn stick(&mut self, x: f32, y: f32) {
        self.stick_x = x;
        self.stick_y = y;

        let dir = if x.abs() >= y.abs() {
            if x < -STICK_DEADZONE {
                Some(MoveDir::Left)
            } else if x > STICK_DEADZONE {
                Some(MoveDir::Right)
            } else {
                None
            }
        } else if y > STICK_DEADZONE {
            Some(MoveDir::Up)
        } else if y < -STICK_DEADZONE {
            Some(MoveDir::Down)
        } else {
            None
        };

        if dir != self.stick_dir {
            if let Some(d) = dir {
                self.queued.push_back(Key::Move(d));
            }
            self.stick_dir = dir;
        }
    }
}

impl InputSource for GamepadInput {
    fn poll_key(&mut self) -> Option<Key> {
        #[cfg(feature = "gamepad")]
        if self.queued.is_empty() {
            self.poll_gilrs();
        }
        self.queued.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pad(advance: &[&str], quit: &[&str]) -> GamepadInput {
        let cfg = GamepadConfig {
            advance: advance.iter().map(|s| s.to_string()).collect(),
            quit: quit.iter().map(|s| s.to_string()).collect(),
        };
        let mut p = GamepadInput::new(&cfg);
        p.queued.clear();
        p
    }

    fn drain(p: &mut GamepadInput) -> Vec<Key> {
        p.queued.drain(..).collect()
    }

    #[test]
    fn button_names_parse_case_insensitively() {
        assert_eq!(Btn::from_name("start"), Some(Btn::Start));
        assert_eq!(Btn::from_name("Back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("rb"), Some(Btn::R1));
        assert_eq!(Btn::from_name("turbo"), None);
    }

    #[test]
    fn configured_buttons_map_to_commands() {
        let mut p = pad(&["A", "bogus"], &["B"]);
        p.button(Btn::A);
        p.button(Btn::B);
        p.button(Btn::Start);
        assert_eq!(drain(&mut p), vec![Key::Advance, Key::Quit]);
    }

    #[test]
    fn unusable_config_keeps_defaults() {
        let mut p = pad(&["bogus"], &[]);
        p.button(Btn::Start);
        p.button(Btn::Select);
        assert_eq!(drain(&mut p), vec![Key::Advance, Key::Quit]);
    }

    #[test]
    fn dpad_presses_move_once_each() {
        let mut p = pad(&[], &[]);
        p.dpad(MoveDir::Left);
        p.dpad(MoveDir::Left);
        assert_eq!(drain(&mut p), vec![Key::Move(MoveDir::Left); 2]);
    }

    #[test]
    fn stick_moves_on_direction_change_only() {
        let mut p = pad(&[], &[]);
        p.stick(0.9, 0.0);
        p.stick(0.8, 0.1);
        p.stick(0.1, 0.0);
        p.stick(0.0, 0.7);
        p.stick(0.0, -0.7);
        assert_eq!(
            drain(&mut p),
            vec![
                Key::Move(MoveDir::Right),
                Key::Move(MoveDir::Up),
                Key::Move(MoveDir::Down),
            ]
        );
    }

    #[test]
    fn poll_yields_queued_keys_in_order() {
        let mut p = pad(&[], &[]);
        p.dpad(MoveDir::Up);
        p.button(Btn::Select);
        assert_eq!(p.poll_key(), Some(Key::Move(MoveDir::Up)));
        assert_eq!(p.poll_key(), Some(Key::Quit));
    }
}

/// Events emitted by moves and level changes.
/// The host consumes these for sound and logging.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    KeyCollected { letter: char },
    DoorUnlocked { letter: char },
    CompanionJoined { total: usize },
    /// A level became active. Zero-based.
    LevelEntered { index: usize },
    GameFinished,
}

/// Error types shared by the loader, the session and the host loop.
///
/// Movement never produces an error: a blocked move is simply ignored.

use crate::sim::level::LevelFormatError;

#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// A level, companion or banner resource could not be read.
    #[error("could not load resource `{name}`: {source}")]
    ResourceLoad {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// A level text could not be turned into a playable board.
    #[error("level {level} is malformed: {source}")]
    LevelFormat {
        level: usize,
        #[source]
        source: LevelFormatError,
    },

    /// Terminal setup, drawing or teardown failed.
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_format_message_names_level() {
        let err = GameError::LevelFormat { level: 3, source: LevelFormatError::NoStart };
        let msg = err.to_string();
        assert!(msg.contains("level 3"), "{msg}");
    }

    #[test]
    fn io_errors_become_terminal_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "tty gone");
        let err: GameError = io.into();
        assert!(matches!(err, GameError::Terminal(_)));
    }
}

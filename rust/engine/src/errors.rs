use thiserror::Error;

/// Structural failures only. Illegal or out-of-turn inputs are not
/// errors: the engine drops them without touching state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Deck exhausted while dealing")]
    DeckExhausted,
    #[error("No hand in progress")]
    NoHandInProgress,
    #[error("Match is over")]
    MatchOver,
}

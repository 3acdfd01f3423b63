use thiserror::Error;

/// Errors surfaced by game actions.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// The action is not permitted in the current state: out of turn, a bad
    /// bet size, a buy over the cap, and so on. Callers are expected to
    /// recover, typically by re-prompting the player.
    #[error("this action cannot be performed at this time")]
    IllegalAction,

    /// The state machine reached a stage it does not know. Indicates a bug
    /// or a corrupted view; callers should fail loudly.
    #[error("internal error: bad game stage")]
    InternalBadGameStage,
}

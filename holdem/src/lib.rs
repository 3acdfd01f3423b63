//! A no-limit Texas Hold'em engine.
//!
//! The [`eval`] module reduces any 5-card hand to a 16-bit strength value in
//! constant time, with best-of-6 and best-of-7 selection on top. The
//! [`game`] module drives a multi-player hand through dealing, betting,
//! side-pot formation, and showdown behind a per-game exclusive lock.
//!
//! Persistence, transport, and player identity live outside this crate:
//! callers act on a [`Game`] by seat number and read state back through
//! views.

pub mod eval;
pub mod game;

pub use game::{
    Action,
    Game,
    GameConfig,
    GameError,
    GameStage,
    GameView,
    Player,
    Pot,
};

//! The table state machine: seats, blinds, betting rounds, side pots,
//! showdown, and censored views. All mutation goes through actions that
//! validate first and fail without side effects.

pub mod actions;
pub mod errors;
pub mod player;
pub mod table;
pub mod views;

pub use self::{
    actions::*,
    errors::*,
    player::*,
    table::*,
    views::*,
};

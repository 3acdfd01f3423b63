//! Card primitives and the constant-time hand evaluator.
//!
//! A 5-card hand reduces to a single value in `[1, 7462]` via a flush check,
//! a direct table lookup for five-distinct-rank hands, and a minimum perfect
//! hash over rank-prime products for everything else. Lower is stronger.

pub mod card;
pub mod chd;
pub mod deck;
pub mod hands;
mod tables;

pub use self::{
    card::*,
    chd::*,
    deck::*,
    hands::*,
};

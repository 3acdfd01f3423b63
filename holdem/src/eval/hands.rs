use itertools::Itertools;

use super::{
    card::Card,
    chd,
    tables,
};

/// Strongest possible hand value.
pub const BEST_HAND_VALUE: u16 = 1;
/// Weakest possible hand value (7-5-4-3-2 offsuit).
pub const WORST_HAND_VALUE: u16 = 7462;

// Upper bound of each equivalence class, strongest class first.
const STRAIGHT_FLUSH_MAX: u16 = 10;
const FOUR_OF_A_KIND_MAX: u16 = 166;
const FULL_HOUSE_MAX: u16 = 322;
const FLUSH_MAX: u16 = 1599;
const STRAIGHT_MAX: u16 = 1609;
const THREE_OF_A_KIND_MAX: u16 = 2467;
const TWO_PAIR_MAX: u16 = 3325;
const ONE_PAIR_MAX: u16 = 6185;

/// Ranks a 5-card hand. The result is in `[1, 7462]`; lower is stronger, and
/// equal values are exact ties. The order of the cards does not matter.
pub fn hand_value(cards: [Card; 5]) -> u16 {
    let [c1, c2, c3, c4, c5] = cards;
    let q = ((c1.bits() | c2.bits() | c3.bits() | c4.bits() | c5.bits()) >> 16) as usize;

    if c1.bits() & c2.bits() & c3.bits() & c4.bits() & c5.bits() & 0xF000 != 0 {
        // All five share a suit; five distinct ranks follow.
        return tables::FLUSHES[q];
    }
    if q.count_ones() == 5 {
        return tables::UNIQUE5[q];
    }
    // Repeated ranks: the product of rank primes identifies the multiset.
    let key = c1.prime() * c2.prime() * c3.prime() * c4.prime() * c5.prime();
    chd::paired_ranks().get(key)
}

/// Picks the strongest 5-card hand out of six cards, returning it along with
/// its value.
pub fn best_five_of_six(cards: [Card; 6]) -> ([Card; 5], u16) {
    best_five(&cards)
}

/// Picks the strongest 5-card hand out of seven cards, returning it along
/// with its value.
pub fn best_five_of_seven(cards: [Card; 7]) -> ([Card; 5], u16) {
    best_five(&cards)
}

fn best_five(cards: &[Card]) -> ([Card; 5], u16) {
    let mut best_hand = [Card::NONE; 5];
    let mut best_value = u16::MAX;
    for combo in cards.iter().copied().combinations(5) {
        let hand = [combo[0], combo[1], combo[2], combo[3], combo[4]];
        let value = hand_value(hand);
        if value < best_value {
            best_value = value;
            best_hand = hand;
        }
    }
    (best_hand, best_value)
}

/// Human-readable class of a hand value, e.g. for table chat or logs.
pub fn hand_class(value: u16) -> &'static str {
    match value {
        0 => "Invalid",
        1..=STRAIGHT_FLUSH_MAX => "Straight Flush",
        11..=FOUR_OF_A_KIND_MAX => "Four of a Kind",
        167..=FULL_HOUSE_MAX => "Full House",
        323..=FLUSH_MAX => "Flush",
        1600..=STRAIGHT_MAX => "Straight",
        1610..=THREE_OF_A_KIND_MAX => "Three of a Kind",
        2468..=TWO_PAIR_MAX => "Two Pair",
        3326..=ONE_PAIR_MAX => "One Pair",
        6186..=WORST_HAND_VALUE => "High Card",
        _ => "Invalid",
    }
}

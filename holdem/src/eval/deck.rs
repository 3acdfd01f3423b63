use std::sync::LazyLock;

use rand::{
    seq::SliceRandom,
    Rng,
};

use super::card::{
    Card,
    SUITS,
};

static DEFAULT_DECK: LazyLock<[Card; 52]> = LazyLock::new(|| {
    let mut cards = [Card::NONE; 52];
    let mut i = 0;
    for &suit in &SUITS {
        for rank in 0..13 {
            cards[i] = Card::from_rank_suit(rank, suit);
            i += 1;
        }
    }
    cards
});

/// All 52 cards in canonical order: clubs, diamonds, hearts, spades, each
/// suit deuce through ace.
pub fn default_deck() -> &'static [Card; 52] {
    &DEFAULT_DECK
}

/// An ordered stack of cards. The top of the deck is the highest index.
#[derive(Debug, Clone, Default, Hash, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn empty() -> Deck {
        Deck {
            cards: vec![],
        }
    }

    /// A full, unshuffled 52-card deck.
    pub fn standard() -> Deck {
        Deck {
            cards: DEFAULT_DECK.to_vec(),
        }
    }

    /// Removes and returns the top card, or the zero card if the deck is
    /// empty.
    pub fn pop(&mut self) -> Card {
        self.cards.pop().unwrap_or(Card::NONE)
    }

    /// Places `card` on top of the deck. Useful for constructing known
    /// orderings.
    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Resets the deck to the full 52 cards and Fisher-Yates shuffles them
    /// with the supplied generator.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.clear();
        self.cards.extend_from_slice(&*DEFAULT_DECK);
        self.cards.shuffle(rng);
    }
}

use std::fmt;

use log::debug;
use more_asserts::debug_assert_ge;

use crate::eval::Card;

use super::{
    errors::GameError,
    table::{
        Game,
        GameStage,
        GameState,
        MIN_READY_PLAYERS,
    },
};

/// Everything an external agent can do to a table, as data. `Game::apply`
/// dispatches these; the inherent methods below are equivalent.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Action {
    /// Wager this many additional chips (a call, check, raise, or all-in).
    Bet(u32),
    BuyIn(u32),
    Deal,
    Fold,
    ToggleReady,
    Leave,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Bet(amount) => write!(f, "Bet({})", amount),
            Action::BuyIn(amount) => write!(f, "BuyIn({})", amount),
            Action::Deal => write!(f, "Deal"),
            Action::Fold => write!(f, "Fold"),
            Action::ToggleReady => write!(f, "ToggleReady"),
            Action::Leave => write!(f, "Leave"),
        }
    }
}

impl Game {
    pub fn apply(&self, pn: usize, action: Action) -> Result<(), GameError> {
        match action {
            Action::Bet(amount) => self.bet(pn, amount),
            Action::BuyIn(amount) => self.buy_in(pn, amount),
            Action::Deal => self.deal(pn),
            Action::Fold => self.fold(pn),
            Action::ToggleReady => self.toggle_ready(pn),
            Action::Leave => self.leave(pn),
        }
    }

    /// Wagers `amount` additional chips for seat `pn`. A bet of the whole
    /// stack or more is always legal (all-in); otherwise it must at least
    /// match the street's high bet, and anything above a call must be a full
    /// minimum raise.
    pub fn bet(&self, pn: usize, amount: u32) -> Result<(), GameError> {
        self.lock().bet(pn, amount)
    }

    /// Adds `amount` chips to seat `pn`'s stack, subject to the configured
    /// buy cap. Not allowed while the seat holds live cards.
    pub fn buy_in(&self, pn: usize, amount: u32) -> Result<(), GameError> {
        self.lock().buy_in(pn, amount)
    }

    /// Advances the hand: starts it from `PreDeal` (shuffling, hole cards,
    /// blinds) or opens the next street. Only the dealer may deal, and never
    /// mid-round.
    pub fn deal(&self, pn: usize) -> Result<(), GameError> {
        self.lock().deal(pn)
    }

    /// Folds seat `pn`'s hand. Only legal for the seat holding the action.
    pub fn fold(&self, pn: usize) -> Result<(), GameError> {
        self.lock().fold(pn)
    }

    /// Flips seat `pn` between sitting in for the next hand and sitting out.
    /// Sitting in requires a nonzero stack; sitting out discards the seat's
    /// cards.
    pub fn toggle_ready(&self, pn: usize) -> Result<(), GameError> {
        self.lock().toggle_ready(pn)
    }

    /// Marks seat `pn` as having left the table. The seat number stays
    /// reserved; `toggle_ready` re-seats a returning player.
    pub fn leave(&self, pn: usize) -> Result<(), GameError> {
        self.lock().leave(pn)
    }
}

impl GameState {
    pub(crate) fn bet(&mut self, pn: usize, amount: u32) -> Result<(), GameError> {
        if !self.betting {
            return Err(GameError::IllegalAction);
        }
        if self.action_num != pn {
            return Err(GameError::IllegalAction);
        }
        let min_bet = self.to_call();
        let (stack, prior_bet) = {
            let p = self.players.get(pn).ok_or(GameError::IllegalAction)?;
            (p.stack, p.bet)
        };
        debug_assert_ge!(min_bet, prior_bet);

        if amount >= stack {
            // All-in is always allowed, even short of a call.
        } else if amount < min_bet - prior_bet {
            return Err(GameError::IllegalAction);
        } else if amount == min_bet - prior_bet {
            // Calling exactly (a check when nothing is owed).
        } else if amount < min_bet + self.min_raise - prior_bet {
            return Err(GameError::IllegalAction);
        } else {
            // A full raise reopens the action for everyone behind.
            self.min_raise = amount + prior_bet - min_bet;
            for p in &mut self.players {
                p.called = false;
            }
            self.called_num = pn;
        }

        debug!("seat {} bets {}", pn, amount);
        let p = &mut self.players[pn];
        p.put_in_chips(amount);
        p.called = true;
        self.update_round_info();
        Ok(())
    }

    pub(crate) fn buy_in(&mut self, pn: usize, amount: u32) -> Result<(), GameError> {
        let max_buy = self.config.max_buy;
        let p = self.players.get_mut(pn).ok_or(GameError::IllegalAction)?;
        if p.in_hand {
            return Err(GameError::IllegalAction);
        }
        let new_stack = p.stack.checked_add(amount).ok_or(GameError::IllegalAction)?;
        if max_buy != 0 && new_stack > max_buy {
            return Err(GameError::IllegalAction);
        }
        p.stack = new_stack;
        p.total_buy_in = p.total_buy_in.saturating_add(amount);
        Ok(())
    }

    pub(crate) fn deal(&mut self, pn: usize) -> Result<(), GameError> {
        if pn != self.dealer_num {
            return Err(GameError::IllegalAction);
        }
        if self.betting {
            return Err(GameError::IllegalAction);
        }
        let stage = self.stage;
        if stage == GameStage::PreDeal && self.ready_count() < MIN_READY_PLAYERS {
            return Err(GameError::IllegalAction);
        }

        self.init_stage();

        match stage {
            GameStage::PreDeal => {
                self.community_cards = [Card::NONE; 5];
                self.pots.clear();
                self.showdown_player_nums.clear();

                self.dealer_num = self.ready_seat_from(self.dealer_num);
                self.update_blind_nums();
                self.action_num = self.utg_num;

                for _ in 0..3 {
                    self.deck.shuffle(&mut self.rng);
                }

                for i in 0..self.players.len() {
                    if self.players[i].ready {
                        self.players[i].cards[0] = self.deck.pop();
                        self.players[i].cards[1] = self.deck.pop();
                        self.players[i].in_hand = true;
                    }
                }

                let (sb, bb) = (self.config.small_blind, self.config.big_blind);
                self.players[self.sb_num].put_in_chips(sb);
                self.players[self.bb_num].put_in_chips(bb);
            }
            GameStage::PreFlop => {
                self.community_cards[0] = self.deck.pop();
                self.community_cards[1] = self.deck.pop();
                self.community_cards[2] = self.deck.pop();
            }
            GameStage::Flop => {
                self.community_cards[3] = self.deck.pop();
            }
            GameStage::Turn => {
                self.community_cards[4] = self.deck.pop();
            }
            // The river round ends through its showdown, never a deal.
            GameStage::River => return Err(GameError::IllegalAction),
        }

        self.stage = stage.next().ok_or(GameError::InternalBadGameStage)?;
        self.betting = true;
        debug!("dealt into {}", self.stage);
        Ok(())
    }

    pub(crate) fn fold(&mut self, pn: usize) -> Result<(), GameError> {
        if self.action_num != pn {
            return Err(GameError::IllegalAction);
        }
        let p = self.players.get_mut(pn).ok_or(GameError::IllegalAction)?;
        p.in_hand = false;
        debug!("seat {} folds", pn);
        self.update_round_info();
        Ok(())
    }

    pub(crate) fn toggle_ready(&mut self, pn: usize) -> Result<(), GameError> {
        let p = self.players.get_mut(pn).ok_or(GameError::IllegalAction)?;
        if p.in_hand {
            return Err(GameError::IllegalAction);
        }
        if p.ready {
            p.ready = false;
            p.cards = [Card::NONE; 2];
        } else {
            if p.stack == 0 {
                return Err(GameError::IllegalAction);
            }
            p.ready = true;
            p.left = false;
        }
        if pn == self.dealer_num {
            self.dealer_num = self.ready_seat_from(self.dealer_num);
        }
        if self.stage == GameStage::PreDeal {
            self.update_blind_nums();
        }
        Ok(())
    }

    pub(crate) fn leave(&mut self, pn: usize) -> Result<(), GameError> {
        let p = self.players.get_mut(pn).ok_or(GameError::IllegalAction)?;
        if p.in_hand {
            return Err(GameError::IllegalAction);
        }
        p.ready = false;
        p.left = true;
        p.cards = [Card::NONE; 2];
        if pn == self.dealer_num {
            self.dealer_num = self.ready_seat_from(self.dealer_num);
        }
        if self.stage == GameStage::PreDeal {
            self.update_blind_nums();
        }
        Ok(())
    }
}

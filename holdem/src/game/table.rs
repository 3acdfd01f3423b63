use std::{
    cmp::Reverse,
    fmt,
    sync::{
        Mutex,
        MutexGuard,
    },
};

use log::{
    debug,
    info,
};
use rand::{
    rngs::StdRng,
    SeedableRng,
};

use crate::eval::{
    best_five_of_seven,
    hand_class,
    Card,
    Deck,
};

use super::player::Player;

/// Sentinel score worse than the weakest real hand; pots start here at
/// showdown.
pub const NO_SCORE: u16 = 8000;

pub(crate) const MIN_READY_PLAYERS: usize = 2;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum GameStage {
    PreDeal,
    PreFlop,
    Flop,
    Turn,
    River,
}

impl GameStage {
    pub(crate) fn next(self) -> Option<GameStage> {
        match self {
            GameStage::PreDeal => Some(GameStage::PreFlop),
            GameStage::PreFlop => Some(GameStage::Flop),
            GameStage::Flop => Some(GameStage::Turn),
            GameStage::Turn => Some(GameStage::River),
            GameStage::River => None,
        }
    }
}

impl fmt::Display for GameStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            GameStage::PreDeal => "PreDeal",
            GameStage::PreFlop => "PreFlop",
            GameStage::Flop => "Flop",
            GameStage::Turn => "Turn",
            GameStage::River => "River",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Largest total stack a player may buy up to. Zero disables the cap.
    pub max_buy: u32,
    pub big_blind: u32,
    pub small_blind: u32,
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        GameConfig {
            max_buy: 0,
            big_blind: 25,
            small_blind: 10,
        }
    }
}

/// One side pot. `top_share` caps what each seat contributes to it;
/// `eligible_player_nums` are the seats that can win it. The winning fields
/// are filled at showdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pot {
    pub top_share: u32,
    pub amt: u32,
    pub eligible_player_nums: Vec<usize>,
    pub winning_player_nums: Vec<usize>,
    pub winning_hand: Vec<Card>,
    pub winning_score: u16,
}

/// A game of no-limit hold'em. State is guarded by an exclusive lock; every
/// action and view acquires it on entry, so actions on one game are strictly
/// serialized while distinct games stay independent.
pub struct Game {
    inner: Mutex<GameState>,
}

pub(crate) struct GameState {
    pub(crate) dealer_num: usize,
    pub(crate) action_num: usize,
    pub(crate) utg_num: usize,
    pub(crate) sb_num: usize,
    pub(crate) bb_num: usize,
    pub(crate) called_num: usize,
    pub(crate) community_cards: [Card; 5],
    pub(crate) stage: GameStage,
    pub(crate) betting: bool,
    pub(crate) config: GameConfig,
    pub(crate) players: Vec<Player>,
    pub(crate) deck: Deck,
    pub(crate) pots: Vec<Pot>,
    pub(crate) min_raise: u32,
    /// Seats that were still live at the most recent showdown. The next-hand
    /// reset clears every `in_hand` flag, so the post-hand reveal walks this
    /// list instead. Empty after a conceded hand.
    pub(crate) showdown_player_nums: Vec<usize>,
    pub(crate) rng: StdRng,
}

impl Game {
    /// A fresh, empty table: stage `PreDeal`, big blind 25, small blind 10,
    /// unlimited buy-in, entropy-seeded shuffles.
    pub fn new() -> Game {
        Game::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Game {
        Game::from_parts(config, StdRng::from_entropy())
    }

    /// A table whose shuffles are reproducible. Seed each concurrent game
    /// differently or their decks will correlate.
    pub fn seeded(seed: u64) -> Game {
        Game::seeded_with_config(seed, GameConfig::default())
    }

    pub fn seeded_with_config(seed: u64, config: GameConfig) -> Game {
        Game::from_parts(config, StdRng::seed_from_u64(seed))
    }

    fn from_parts(config: GameConfig, rng: StdRng) -> Game {
        Game {
            inner: Mutex::new(GameState {
                dealer_num: 0,
                action_num: 0,
                utg_num: 0,
                sb_num: 0,
                bb_num: 0,
                called_num: 0,
                community_cards: [Card::NONE; 5],
                stage: GameStage::PreDeal,
                betting: false,
                config,
                players: Vec::new(),
                deck: Deck::standard(),
                pots: Vec::new(),
                min_raise: 0,
                showdown_player_nums: Vec::new(),
                rng,
            }),
        }
    }

    /// Seats a new player and returns its seat number. Seat numbers are
    /// stable and never reused.
    pub fn add_player(&self) -> usize {
        let mut g = self.lock();
        g.players.push(Player::default());
        g.players.len() - 1
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, GameState> {
        self.inner.lock().unwrap()
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new()
    }
}

impl GameState {
    pub(crate) fn ready_count(&self) -> usize {
        self.players.iter().filter(|p| p.ready).count()
    }

    /// The street's high-water bet.
    pub(crate) fn to_call(&self) -> u32 {
        self.players.iter().map(|p| p.bet).max().unwrap_or(0)
    }

    pub(crate) fn is_called(&self, pn: usize) -> bool {
        self.players[pn].all_in() || self.players[pn].called
    }

    /// First ready seat at or after `from`, wrapping. If nobody is ready the
    /// seat comes back unchanged; keeping at least one ready seat around is
    /// the caller's responsibility.
    pub(crate) fn ready_seat_from(&self, from: usize) -> usize {
        let n = self.players.len();
        let mut seat = from % n;
        for _ in 0..n {
            if self.players[seat].ready {
                return seat;
            }
            seat = (seat + 1) % n;
        }
        from % n
    }

    pub(crate) fn ready_seat_after(&self, from: usize) -> usize {
        self.ready_seat_from(from + 1)
    }

    /// First seat with live cards strictly after `from`, wrapping.
    pub(crate) fn in_seat_after(&self, from: usize) -> usize {
        let n = self.players.len();
        let mut seat = (from + 1) % n;
        for _ in 0..n {
            if self.players[seat].in_hand {
                return seat;
            }
            seat = (seat + 1) % n;
        }
        from % n
    }

    /// Opens a betting round: action starts left of the dealer (except
    /// preflop, where the deal sets it to UTG), per-street bets and called
    /// flags reset, and the minimum raise returns to one big blind.
    pub(crate) fn init_stage(&mut self) {
        if self.stage != GameStage::PreDeal {
            self.action_num = self.in_seat_after(self.dealer_num);
            self.called_num = self.action_num;
        }
        for p in &mut self.players {
            p.bet = 0;
            p.called = false;
        }
        self.min_raise = self.config.big_blind;
    }

    /// Recomputes blind and UTG seats from the dealer. Heads-up the dealer
    /// posts the small blind and acts first preflop.
    pub(crate) fn update_blind_nums(&mut self) {
        match self.ready_count() {
            0 | 1 => {
                self.sb_num = self.dealer_num;
                self.bb_num = self.dealer_num;
                self.utg_num = self.dealer_num;
            }
            2 => {
                self.sb_num = self.dealer_num;
                self.utg_num = self.dealer_num;
                self.bb_num = self.ready_seat_after(self.dealer_num);
            }
            _ => {
                self.sb_num = self.ready_seat_after(self.dealer_num);
                self.bb_num = self.ready_seat_after(self.sb_num);
                self.utg_num = self.ready_seat_after(self.bb_num);
            }
        }
    }

    pub(crate) fn reset_for_next_hand(&mut self) {
        for p in &mut self.players {
            p.in_hand = false;
            p.called = false;
            p.bet = 0;
            p.total_bet = 0;
            if p.stack == 0 {
                p.ready = false;
            }
        }
        self.dealer_num = self.ready_seat_after(self.dealer_num);
        self.stage = GameStage::PreDeal;
        self.betting = false;
    }

    /// Rebuilds the pot list from current contributions: one capped pot per
    /// all-in contribution level (ascending), then an uncapped pot for the
    /// seats still holding chips.
    fn rebuild_pots(&mut self, all_in_player_nums: &[usize]) {
        let mut remaining: Vec<u32> = self.players.iter().map(|p| p.total_bet).collect();
        self.pots.clear();

        for &ndx in all_in_player_nums {
            let mut pot = Pot {
                top_share: remaining[ndx],
                ..Pot::default()
            };
            for (i, p) in self.players.iter().enumerate() {
                if remaining[i] >= pot.top_share {
                    if p.in_hand {
                        pot.eligible_player_nums.push(i);
                    }
                    pot.amt += pot.top_share;
                    remaining[i] -= pot.top_share;
                } else {
                    pot.amt += remaining[i];
                    remaining[i] = 0;
                }
            }
            self.pots.push(pot);
        }

        let mut final_pot = Pot::default();
        for (i, p) in self.players.iter().enumerate() {
            if p.in_hand && !p.all_in() {
                final_pot.eligible_player_nums.push(i);
                final_pot.amt += remaining[i];
            }
        }
        self.pots.push(final_pot);
    }

    /// The heart of the engine, run after every bet and fold: rebuilds the
    /// pots, settles a conceded hand, advances the action, refunds an
    /// uncallable excess, and runs the showdown once river betting closes.
    pub(crate) fn update_round_info(&mut self) {
        let mut all_called = true;
        let mut in_player_nums = Vec::new();
        let mut all_in_player_nums = Vec::new();

        for (i, p) in self.players.iter().enumerate() {
            if p.in_hand {
                in_player_nums.push(i);
                if p.all_in() {
                    all_in_player_nums.push(i);
                } else if !self.is_called(i) {
                    all_called = false;
                }
            }
        }
        all_in_player_nums.sort_by_key(|&i| self.players[i].total_bet);

        self.rebuild_pots(&all_in_player_nums);

        // Fewer than two live seats: the hand was conceded. The survivor
        // takes every contribution outright, no showdown and no pot math.
        if in_player_nums.len() < 2 {
            if let Some(&winner) = in_player_nums.first() {
                let total: u32 = self.players.iter().map(|p| p.total_bet).sum();
                info!("hand conceded to seat {} for {}", winner, total);
                self.players[winner].stack += total;
            }
            // No cards were shown, so nothing is revealed afterwards.
            self.showdown_player_nums.clear();
            self.reset_for_next_hand();
            return;
        }

        if !all_called {
            // Someone still owes a decision; move the action to them.
            loop {
                let pn = self.action_num;
                if self.players[pn].in_hand && !self.is_called(pn) {
                    break;
                }
                self.action_num = (self.action_num + 1) % self.players.len();
            }
            return;
        }

        // With at most one live seat not all-in, the top bettor may have bet
        // more than anyone could call; return the difference.
        if in_player_nums.len() - all_in_player_nums.len() < 2 {
            let mut by_bet = in_player_nums.clone();
            by_bet.sort_by_key(|&i| Reverse(self.players[i].total_bet));
            let excess =
                self.players[by_bet[0]].total_bet - self.players[by_bet[1]].total_bet;
            if excess > 0 {
                debug!("returning uncalled excess {} to seat {}", excess, by_bet[0]);
                self.players[by_bet[0]].return_chips(excess);
                self.rebuild_pots(&all_in_player_nums);
            }
        }

        if self.stage == GameStage::River {
            self.showdown();
            self.reset_for_next_hand();
        } else {
            self.betting = false;
        }
    }

    /// Evaluates every pot against its eligible seats and pays the winners.
    /// Each pot splits evenly; the integer remainder is lost.
    fn showdown(&mut self) {
        self.showdown_player_nums = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.in_hand)
            .map(|(i, _)| i)
            .collect();
        let cc = self.community_cards;
        for (i, pot) in self.pots.iter_mut().enumerate() {
            pot.winning_score = NO_SCORE;
            for &num in &pot.eligible_player_nums {
                let hole = self.players[num].cards;
                let (hand, score) =
                    best_five_of_seven([hole[0], hole[1], cc[0], cc[1], cc[2], cc[3], cc[4]]);
                if score < pot.winning_score {
                    pot.winning_score = score;
                    pot.winning_player_nums = vec![num];
                    pot.winning_hand = hand.to_vec();
                } else if score == pot.winning_score {
                    pot.winning_player_nums.push(num);
                }
            }
            if !pot.winning_player_nums.is_empty() {
                let share = pot.amt / pot.winning_player_nums.len() as u32;
                for &num in &pot.winning_player_nums {
                    self.players[num].stack += share;
                }
                info!(
                    "pot {} ({} chips) won by seats {:?} with {}",
                    i,
                    pot.amt,
                    pot.winning_player_nums,
                    hand_class(pot.winning_score)
                );
            }
        }
    }
}

use crate::eval::{
    best_five_of_seven,
    Card,
    Deck,
};

use super::{
    player::Player,
    table::{
        Game,
        GameConfig,
        GameStage,
        GameState,
        Pot,
    },
};

/// A snapshot of a game. Every field owns its data, so cloning or mutating a
/// view can never touch the game it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameView {
    pub dealer_num: usize,
    pub action_num: usize,
    pub utg_num: usize,
    pub sb_num: usize,
    pub bb_num: usize,
    pub called_num: usize,
    pub community_cards: [Card; 5],
    pub stage: GameStage,
    pub betting: bool,
    pub config: GameConfig,
    pub players: Vec<Player>,
    pub deck: Deck,
    pub pots: Vec<Pot>,
    pub min_raise: u32,
    pub ready_count: usize,
}

impl GameState {
    fn copy_to_view(&self) -> GameView {
        GameView {
            dealer_num: self.dealer_num,
            action_num: self.action_num,
            utg_num: self.utg_num,
            sb_num: self.sb_num,
            bb_num: self.bb_num,
            called_num: self.called_num,
            community_cards: self.community_cards,
            stage: self.stage,
            betting: self.betting,
            config: self.config,
            players: self.players.clone(),
            deck: self.deck.clone(),
            pots: self.pots.clone(),
            min_raise: self.min_raise,
            ready_count: self.ready_count(),
        }
    }

    fn seven_card_score(&self, pn: usize) -> u16 {
        let hole = self.players[pn].cards;
        let cc = self.community_cards;
        best_five_of_seven([hole[0], hole[1], cc[0], cc[1], cc[2], cc[3], cc[4]]).1
    }
}

fn show_cards(src: &[Player], view: &mut GameView, pn: usize) {
    if let (Some(p), Some(v)) = (src.get(pn), view.players.get_mut(pn)) {
        v.cards = p.cards;
    }
}

impl Game {
    /// A complete, uncensored snapshot, deck included. Meant for a
    /// persistence layer, never for delivery to a player.
    pub fn generate_omni_view(&self) -> GameView {
        self.lock().copy_to_view()
    }

    /// A snapshot censored for delivery to seat `pn`. Hole cards are hidden
    /// except for the viewer's own live hand, an all-all-in runout, and the
    /// post-showdown reveal; the deck is always blanked.
    pub fn generate_player_view(&self, pn: usize) -> GameView {
        let g = self.lock();
        let mut view = g.copy_to_view();
        view.deck = Deck::empty();

        let mut all_in_count = 0;
        let mut in_count = 0;
        for (i, p) in g.players.iter().enumerate() {
            view.players[i].cards = [Card::NONE; 2];
            if p.all_in() {
                all_in_count += 1;
            }
            if p.in_hand {
                in_count += 1;
            }
        }

        if g.players.get(pn).map_or(false, |p| p.in_hand) {
            show_cards(&g.players, &mut view, pn);
        }

        // Everyone left in the hand is all-in: the cards get turned face up
        // for the runout.
        if all_in_count == in_count {
            for (i, p) in g.players.iter().enumerate() {
                if p.in_hand {
                    show_cards(&g.players, &mut view, i);
                }
            }
        }

        // Just after a showdown the reveal follows table etiquette: the
        // called seat shows first, then going around the table only hands
        // that beat the best one shown so far, and finally every pot winner.
        // The next-hand reset already cleared `in_hand`, so the walk covers
        // the seats recorded live at the showdown itself.
        if g.stage == GameStage::PreDeal && g.called_num < g.players.len() {
            show_cards(&g.players, &mut view, g.called_num);
            let mut best = g.seven_card_score(g.called_num);
            let n = g.players.len();
            for off in 1..=n {
                let ndx = (g.called_num + off) % n;
                if !g.showdown_player_nums.contains(&ndx) {
                    continue;
                }
                let score = g.seven_card_score(ndx);
                if score < best {
                    show_cards(&g.players, &mut view, ndx);
                    best = score;
                }
            }
            for pot in &g.pots {
                for &num in &pot.winning_player_nums {
                    show_cards(&g.players, &mut view, num);
                }
            }
        }

        view
    }

    /// Restores the game from a view, typically one stored by a persistence
    /// layer. The shuffle RNG is not part of a view and is left untouched.
    pub fn fill_from_view(&self, view: &GameView) {
        let mut g = self.lock();
        g.dealer_num = view.dealer_num;
        g.action_num = view.action_num;
        g.utg_num = view.utg_num;
        g.sb_num = view.sb_num;
        g.bb_num = view.bb_num;
        g.called_num = view.called_num;
        g.community_cards = view.community_cards;
        g.stage = view.stage;
        g.betting = view.betting;
        g.config = view.config;
        g.players = view.players.clone();
        g.deck = view.deck.clone();
        g.pots = view.pots.clone();
        g.min_raise = view.min_raise;
        // Views carry no showdown record; a restored game starts without one.
        g.showdown_player_nums.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{
        hand_class,
        parse_cards,
    };
    use crate::game::table::NO_SCORE;

    fn three_player_game() -> Game {
        let game = Game::seeded(11);
        for _ in 0..3 {
            let pn = game.add_player();
            game.buy_in(pn, 100).unwrap();
            game.toggle_ready(pn).unwrap();
        }
        game
    }

    fn two_hole_cards(s: &str) -> [Card; 2] {
        parse_cards(s).try_into().unwrap()
    }

    #[test]
    fn test_omni_view_round_trips() {
        let game = three_player_game();
        game.deal(0).unwrap();
        game.bet(0, 25).unwrap();

        let view = game.generate_omni_view();
        let restored = Game::new();
        restored.fill_from_view(&view);
        assert_eq!(view, restored.generate_omni_view());
    }

    #[test]
    fn test_mutating_a_view_leaves_the_game_alone() {
        let game = three_player_game();
        game.deal(0).unwrap();

        let before = game.generate_omni_view();
        let mut view = game.generate_omni_view();
        view.dealer_num += 1;
        view.community_cards[2] = Card::must_parse("AS");
        view.config.big_blind = 50;
        view.players[0].cards[0] = Card::NONE;
        view.players[0].stack = 9999;
        view.deck.pop();
        assert_eq!(before, game.generate_omni_view());
    }

    #[test]
    fn test_player_view_hides_the_deck_and_other_hands() {
        let game = three_player_game();
        game.deal(0).unwrap();

        let view = game.generate_player_view(1);
        assert!(view.deck.is_empty());
        assert!(!view.players[1].cards[0].is_none());
        assert!(!view.players[1].cards[1].is_none());
        for pn in [0, 2] {
            assert_eq!([Card::NONE; 2], view.players[pn].cards);
        }
        // The omni view still has everything.
        assert_eq!(52 - 6, game.generate_omni_view().deck.len());
    }

    #[test]
    fn test_player_view_for_a_spectator_seat_is_fully_censored() {
        let game = three_player_game();
        game.deal(0).unwrap();
        let view = game.generate_player_view(99);
        for p in &view.players {
            assert_eq!([Card::NONE; 2], p.cards);
        }
    }

    #[test]
    fn test_all_all_in_turns_cards_face_up() {
        let game = three_player_game();
        game.deal(0).unwrap();
        game.bet(0, 100).unwrap();
        game.bet(1, 90).unwrap();
        game.fold(2).unwrap();

        // Both live seats are all-in; even the folded viewer sees them.
        let view = game.generate_player_view(2);
        assert!(!view.players[0].cards[0].is_none());
        assert!(!view.players[1].cards[0].is_none());
        assert_eq!([Card::NONE; 2], view.players[2].cards);
    }

    #[test]
    fn test_showdown_reveal_shows_caller_and_winner() {
        // S7: preflop calls, a flop bet, one fold, then a checked-down
        // showdown between seats 0 and 1.
        let game = three_player_game();
        game.deal(0).unwrap();

        // Rig the holes and the rest of the deck so seat 0 wins with a
        // flush over seat 1's pair, then replay the state into the game.
        // The deck is a stack: the last card pushed is the first popped, so
        // the board runs out as QH JH 4H, 8S, 2S.
        let mut view = game.generate_omni_view();
        view.players[0].cards = two_hole_cards("AH KH");
        view.players[1].cards = two_hole_cards("AC QD");
        view.players[2].cards = two_hole_cards("2C 7D");
        view.deck = Deck::empty();
        for card in parse_cards("2S 8S 4H JH QH") {
            view.deck.push(card);
        }
        game.fill_from_view(&view);

        game.bet(0, 25).unwrap();
        game.bet(1, 15).unwrap();
        game.bet(2, 0).unwrap();
        game.deal(0).unwrap(); // flop
        game.bet(1, 25).unwrap();
        game.fold(2).unwrap();
        game.bet(0, 25).unwrap();
        game.deal(0).unwrap(); // turn
        game.bet(1, 0).unwrap();
        game.bet(0, 0).unwrap();
        game.deal(0).unwrap(); // river
        game.bet(1, 0).unwrap();
        game.bet(0, 0).unwrap();

        let omni = game.generate_omni_view();
        assert_eq!(GameStage::PreDeal, omni.stage);
        assert!(!omni.players[2].in_hand);
        assert_eq!(vec![0], omni.pots[0].winning_player_nums);

        // Seat 1 was first to act on the river, so it must show; seat 0
        // shows as the winner. Either remaining seat sees both hands.
        for viewer in [0, 2] {
            let view = game.generate_player_view(viewer);
            assert_eq!(two_hole_cards("AH KH"), view.players[0].cards);
            assert_eq!(two_hole_cards("AC QD"), view.players[1].cards);
            assert_eq!([Card::NONE; 2], view.players[2].cards);
        }
    }

    #[test]
    fn test_showdown_reveal_walks_past_the_called_seat() {
        // Four seats check a hand down to showdown. Seat 1 is the called
        // seat; going around from it, seat 2 must show (two pair beats the
        // pair of queens), seat 3 mucks (its pair loses to the two pair
        // already shown), and seat 0 shows as the winning trips.
        let game = Game::seeded(11);
        for _ in 0..4 {
            let pn = game.add_player();
            game.buy_in(pn, 100).unwrap();
            game.toggle_ready(pn).unwrap();
        }
        game.deal(0).unwrap();

        // Board runs out as 2H 7D 8C, QS, 3C.
        let mut view = game.generate_omni_view();
        view.players[0].cards = two_hole_cards("8D 8H");
        view.players[1].cards = two_hole_cards("QD 4H");
        view.players[2].cards = two_hole_cards("7S 8S");
        view.players[3].cards = two_hole_cards("QH 5D");
        view.deck = Deck::empty();
        for card in parse_cards("3C QS 8C 7D 2H") {
            view.deck.push(card);
        }
        game.fill_from_view(&view);

        game.bet(3, 25).unwrap();
        game.bet(0, 25).unwrap();
        game.bet(1, 15).unwrap();
        game.bet(2, 0).unwrap();
        for _ in 0..3 {
            game.deal(0).unwrap();
            game.bet(1, 0).unwrap();
            game.bet(2, 0).unwrap();
            game.bet(3, 0).unwrap();
            game.bet(0, 0).unwrap();
        }

        let omni = game.generate_omni_view();
        assert_eq!(GameStage::PreDeal, omni.stage);
        assert_eq!(1, omni.called_num);
        assert_eq!(vec![0], omni.pots[0].winning_player_nums);

        for viewer in 0..4 {
            let view = game.generate_player_view(viewer);
            assert_eq!(two_hole_cards("8D 8H"), view.players[0].cards);
            assert_eq!(two_hole_cards("QD 4H"), view.players[1].cards);
            assert_eq!(two_hole_cards("7S 8S"), view.players[2].cards);
            assert_eq!([Card::NONE; 2], view.players[3].cards);
        }
    }

    #[test]
    fn test_no_reveal_walk_after_a_conceded_hand() {
        // A showdown's reveal record must not outlive the hand: after a
        // later conceded hand only the called seat's stale cards can show,
        // never the survivor's live ones.
        let game = three_player_game();
        game.deal(0).unwrap();
        game.fold(0).unwrap();
        game.fold(1).unwrap();

        let omni = game.generate_omni_view();
        assert_eq!(GameStage::PreDeal, omni.stage);
        let view = game.generate_player_view(0);
        for pn in 0..3 {
            if pn != omni.called_num {
                assert_eq!([Card::NONE; 2], view.players[pn].cards, "seat {}", pn);
            }
        }
    }

    #[test]
    fn test_showdown_populates_pot_results() {
        let game = three_player_game();
        game.deal(0).unwrap();

        let mut view = game.generate_omni_view();
        view.players[0].cards = two_hole_cards("AH KH");
        view.players[1].cards = two_hole_cards("AC QD");
        view.players[2].cards = two_hole_cards("2C 7D");
        view.deck = Deck::empty();
        for card in parse_cards("2S 8S 4H JH QH") {
            view.deck.push(card);
        }
        game.fill_from_view(&view);

        game.bet(0, 25).unwrap();
        game.bet(1, 15).unwrap();
        game.bet(2, 0).unwrap();
        for _ in 0..3 {
            game.deal(0).unwrap();
            game.bet(1, 0).unwrap();
            game.bet(2, 0).unwrap();
            game.bet(0, 0).unwrap();
        }

        let omni = game.generate_omni_view();
        let pot = &omni.pots[0];
        assert_eq!(75, pot.amt);
        assert_ne!(NO_SCORE, pot.winning_score);
        assert_eq!("Flush", hand_class(pot.winning_score));
        assert_eq!(5, pot.winning_hand.len());
        assert_eq!(vec![0], pot.winning_player_nums);
        assert_eq!(150, omni.players[0].stack);
    }

    #[test]
    fn test_fresh_game_views_are_well_formed() {
        let game = Game::seeded(11);
        let omni = game.generate_omni_view();
        assert_eq!(GameStage::PreDeal, omni.stage);
        assert_eq!(52, omni.deck.len());
        assert!(omni.players.is_empty());
        // Player views of an empty table must not blow up.
        let view = game.generate_player_view(0);
        assert!(view.deck.is_empty());
    }
}

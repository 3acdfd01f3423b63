use clap::Parser;
use holdem::eval::hand_class;
use holdem::{
    Action,
    Game,
    GameConfig,
    GameStage,
};
use log::{
    debug,
    info,
};
use rand::{
    rngs::StdRng,
    SeedableRng,
};
use rand_distr::{
    Distribution,
    WeightedIndex,
};

#[derive(Parser)]
pub struct AppArgs {
    #[clap(long, value_parser, default_value_t = 10)]
    hands: u32,

    #[clap(long, value_parser, default_value_t = 4)]
    players: usize,

    #[clap(long, value_parser, default_value_t = 1000)]
    buy_in: u32,

    #[clap(long, value_parser, default_value_t = 25)]
    big_blind: u32,

    #[clap(long, value_parser, default_value_t = 10)]
    small_blind: u32,

    #[clap(long, value_parser)]
    seed: Option<u64>,
}

fn main() {
    // Initialize env_logger with a default log level of INFO.
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    let args = AppArgs::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(
        "dealing {} hands to {} seats, {} chips each (seed {})",
        args.hands, args.players, args.buy_in, seed
    );

    let game = Game::seeded_with_config(
        seed,
        GameConfig {
            max_buy: 0,
            big_blind: args.big_blind,
            small_blind: args.small_blind,
        },
    );
    for _ in 0..args.players {
        let pn = game.add_player();
        game.buy_in(pn, args.buy_in).expect("fresh seats can always buy in");
        game.toggle_ready(pn).expect("funded seats can always sit in");
    }

    // Bots weight fold / call / raise; anything illegal falls back to a call.
    let mut rng = StdRng::seed_from_u64(seed ^ 0x9E3779B97F4A7C15);
    let bot_moves = WeightedIndex::new([1.0, 6.0, 3.0]).expect("static weights are valid");

    let mut hands_played = 0;
    loop {
        let view = game.generate_omni_view();

        if !view.betting {
            if view.stage == GameStage::PreDeal {
                if view.ready_count < 2 || hands_played == args.hands {
                    break;
                }
                hands_played += 1;
                debug!("--- hand {} ---", hands_played);
            }
            game.deal(view.dealer_num).expect("the dealer can deal between rounds");
            continue;
        }

        let pn = view.action_num;
        let bettor = &view.players[pn];
        let high_bet = view.players.iter().map(|p| p.bet).max().unwrap_or(0);
        let call = high_bet - bettor.bet;
        let action = match bot_moves.sample(&mut rng) {
            0 if call > 0 => Action::Fold,
            1 => Action::Bet(call),
            _ => Action::Bet(call + view.min_raise),
        };
        debug!("seat {} plays {}", pn, action);
        if game.apply(pn, action).is_err() {
            game.apply(pn, Action::Bet(call)).expect("a flat call is always legal");
        }
    }

    let view = game.generate_omni_view();
    info!("{} hands played; final stacks:", hands_played);
    for (pn, p) in view.players.iter().enumerate() {
        info!("  seat {}: {} chips (bought in {})", pn, p.stack, p.total_buy_in);
    }
    for (i, pot) in view.pots.iter().enumerate() {
        if !pot.winning_player_nums.is_empty() {
            info!(
                "last pot {}: {} chips to seats {:?} ({})",
                i,
                pot.amt,
                pot.winning_player_nums,
                hand_class(pot.winning_score)
            );
        }
    }
}

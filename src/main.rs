//! Boccia entry point
//!
//! Native: runs a headless match with the computer playing both sides and
//! reports the result. The browser build is driven from JavaScript through
//! `boccia::platform::web`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use clap::Parser;

    use boccia::sim::{AutoPlayer, GameEvent, GameState, Owner, ThrowPlan, TickInput, tick};
    use boccia::{RulesConfig, Snapshot};

    /// Headless boccia match between two computer players
    #[derive(Debug, Parser)]
    #[command(name = "boccia", version, about)]
    pub struct Args {
        /// Seed for the computer players
        #[arg(long, default_value_t = 1)]
        pub seed: u64,
        /// JSON rule overrides, e.g. '{"total_ends": 2}'
        #[arg(long)]
        pub rules: Option<String>,
        /// Advance past notices without the acknowledge step
        #[arg(long)]
        pub no_ack: bool,
        /// Print the final snapshot as JSON
        #[arg(long)]
        pub json: bool,
        /// Give up after this many ticks
        #[arg(long, default_value_t = 1_000_000)]
        pub max_ticks: u64,
    }

    pub fn run(args: Args) -> Result<(), String> {
        let mut config = match args.rules.as_deref() {
            Some(json) => RulesConfig::from_json(json).map_err(|e| format!("bad --rules: {e}"))?,
            None => RulesConfig::default(),
        };
        if args.no_ack {
            config.require_acknowledge = false;
        }

        let mut state = GameState::new(config);
        let mut player = AutoPlayer::new(args.seed);
        log::info!("Boccia (native) starting, seed {}", args.seed);

        while !state.is_game_over() {
            if state.time_ticks >= args.max_ticks {
                return Err(format!("no result after {} ticks", args.max_ticks));
            }
            let input = if let Some(notice) = state.notice {
                log::info!("Notice: {:?}", notice);
                TickInput {
                    acknowledge: true,
                    ..Default::default()
                }
            } else {
                player
                    .plan_throw(&state)
                    .map(ThrowPlan::to_input)
                    .unwrap_or_default()
            };
            tick(&mut state, &input);
            log_events(&mut state);
        }

        let snapshot = Snapshot::capture(&state);
        if args.json {
            let json = snapshot.to_json().map_err(|e| e.to_string())?;
            println!("{json}");
        } else {
            for result in &snapshot.end_history {
                println!(
                    "end {}: {} +{}",
                    result.end,
                    result.winner.map_or("-", |s| s.as_str()),
                    result.points
                );
            }
            println!(
                "final: red {} - blue {} ({:?}) after {} ticks",
                snapshot.scores.red, snapshot.scores.blue, snapshot.outcome, state.time_ticks
            );
        }
        Ok(())
    }

    fn log_events(state: &mut GameState) {
        for event in state.drain_events() {
            match event {
                GameEvent::BallThrown { id, owner } => {
                    let who = owner.side().map_or("jack", |s| s.as_str());
                    log::debug!("ball {id} thrown ({who})");
                }
                GameEvent::BallDead { id, owner: Owner::Jack } => {
                    log::debug!("jack {id} left the court");
                }
                other => log::debug!("{other:?}"),
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = native::Args::parse();
    if let Err(e) = native::run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Entry point is `boccia::platform::web::start`
}

//! Headless Kaali Teeri table simulator.
//!
//! Spawns a batch of room actors, seats a bot on every chair and lets them
//! play every room to its round limit in parallel.

mod bots;
mod config;
mod logging;

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use anyhow::Error;
use ctrlc::set_handler;
use kaali_teeri::{
    Command, PlayerId,
    room::{InMemorySnapshotStore, RoomHandle, RoomManager, SnapshotStore},
};
use log::{info, warn};
use pico_args::Arguments;
use serde::Serialize;
use tokio::task::JoinSet;

use bots::{SeatBot, run_seat};
use config::{Overrides, SimConfig};

const HELP: &str = "\
Simulate Kaali Teeri games between bots

USAGE:
  kt_sim [OPTIONS]

OPTIONS:
  --rooms      N           Rooms played in parallel    [default: env SIM_ROOMS or 4]
  --players    N           Seats per room (4-8)        [default: env SIM_PLAYERS or 4]
  --rounds     N           Rounds per game             [default: env SIM_ROUND_LIMIT or 10]
  --seed       N           Base shuffle seed           [default: env SIM_SEED or random]

FLAGS:
  --manual-end-turn        Bots confirm every card with EndTurn
  --json                   Print the final report as JSON
  -h, --help               Print help information

ENVIRONMENT:
  SIM_AUTO_END_TURN        Advance turns automatically (true/false)
  SIM_TIMEOUT_SECS         Per-room time limit
  RUST_LOG                 Log filter (e.g., kt_sim=debug,kaali_teeri=info)
";

/// Final standing of one simulated room.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RoomReport {
    code: String,
    rounds_played: usize,
    successful_bids: usize,
    finished: bool,
    scores: BTreeMap<PlayerId, u32>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let json = pargs.contains("--json");
    let overrides = Overrides {
        rooms: pargs.opt_value_from_str("--rooms")?,
        players: pargs.opt_value_from_str("--players")?,
        round_limit: pargs.opt_value_from_str("--rounds")?,
        seed: pargs.opt_value_from_str("--seed")?,
        manual_end_turn: pargs.contains("--manual-end-turn"),
    };

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    logging::init();

    let config = SimConfig::from_env(overrides);
    config.validate()?;
    info!(
        "Simulating {} rooms of {} players, {} rounds each",
        config.rooms, config.players, config.round_limit
    );

    let store = Arc::new(InMemorySnapshotStore::new());
    let manager = RoomManager::new(store.clone(), config.room_config(0));

    let mut games = JoinSet::new();
    for index in 0..config.rooms {
        let handle = open_room(&manager, &config, index).await?;
        let config = config.clone();
        games.spawn(async move { play_room(handle, &config, index).await });
    }

    let mut reports = Vec::with_capacity(config.rooms);
    while let Some(joined) = games.join_next().await {
        let (code, finished) = joined??;
        let snapshot = manager.get_room(&code).await?.snapshot(None).await?;
        let history = store.rounds(&code).await?;
        reports.push(RoomReport {
            code: code.clone(),
            rounds_played: history.len(),
            successful_bids: history.iter().filter(|r| r.success).count(),
            finished,
            scores: snapshot.scores,
        });
        manager.close_room(&code).await?;
    }
    reports.sort_by(|a, b| a.code.cmp(&b.code));

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_report(report);
        }
    }

    Ok(())
}

/// Creates room `SIM-<index>` and seats the configured number of players.
async fn open_room(
    manager: &RoomManager,
    config: &SimConfig,
    index: usize,
) -> Result<RoomHandle, Error> {
    let code = format!("SIM-{index}");
    let handle = manager
        .create_named_room(&code, seat_id(0), "bot-0", config.room_config(index))
        .await?;

    for seat in 1..config.players {
        handle
            .command(
                seat_id(seat),
                Command::JoinRoom {
                    name: format!("bot-{seat}"),
                },
            )
            .await?;
    }
    Ok(handle)
}

fn seat_id(seat: usize) -> PlayerId {
    PlayerId::new(&format!("p{seat}"))
}

/// Runs every seat of one room to completion. Returns the room code and
/// whether the game ended before the time limit.
async fn play_room(
    handle: RoomHandle,
    config: &SimConfig,
    index: usize,
) -> Result<(String, bool), Error> {
    let base_seed = config.seed.unwrap_or_else(rand::random);
    let mut seats = JoinSet::new();
    for seat in 0..config.players {
        let seed = base_seed
            .wrapping_add((index * config.players + seat) as u64)
            .wrapping_mul(31);
        seats.spawn(run_seat(handle.clone(), SeatBot::new(seat_id(seat), seed)));
    }

    let limit = Duration::from_secs(config.timeout_secs);
    let finished = tokio::time::timeout(limit, async {
        while let Some(joined) = seats.join_next().await {
            joined??;
        }
        Ok::<_, Error>(())
    })
    .await;

    let code = handle.code().to_string();
    match finished {
        Ok(result) => {
            result?;
            info!("Room {} finished", code);
            Ok((code, true))
        }
        Err(_) => {
            warn!("Room {} did not finish within {:?}", code, limit);
            seats.abort_all();
            Ok((code, false))
        }
    }
}

fn print_report(report: &RoomReport) {
    let status = if report.finished { "ended" } else { "timed out" };
    println!(
        "{} ({status}): {} rounds, {} contracts made",
        report.code, report.rounds_played, report.successful_bids
    );
    for (player, score) in &report.scores {
        println!("  {player:<6} {score:>5}");
    }
}

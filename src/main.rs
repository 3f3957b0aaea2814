//! Nini Doesn't Want to Go Home - headless runner
//!
//! Plays one round at a fixed frame rate with walls given on the command
//! line, records the time if the pig gets home, and prints the round and the
//! daily leaderboard as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use glam::Vec2;

use nini_home::api::{self, ApiRequest, Method};
use nini_home::consts::FRAME_RATE;
use nini_home::platform::{Clock, SystemClock};
use nini_home::sim::{GameEvent, Round};
use nini_home::{
    Command, HomePlacement, Leaderboard, Session, Settings, SharedLeaderboard, format_seconds,
    logging, persistence,
};

/// Steer a runaway pig home with drawn walls
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed, overrides the settings file
    #[arg(long)]
    seed: Option<u64>,

    /// Home placement: fixed or random
    #[arg(long, value_parser = parse_placement)]
    placement: Option<HomePlacement>,

    /// Name to record on the leaderboard
    #[arg(short, long)]
    player: Option<String>,

    /// Wall to draw before the pig starts, as "x,y x,y ..." (repeatable)
    #[arg(short, long = "wall")]
    walls: Vec<String>,

    /// Give up after this many frames
    #[arg(long, default_value_t = 60 * 60 * 5)]
    frames: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_placement(s: &str) -> Result<HomePlacement, String> {
    HomePlacement::from_str(s).ok_or_else(|| format!("unknown placement '{s}'"))
}

/// Parse "x,y x,y ..." into canvas points
fn parse_wall(wall: &str) -> Result<Vec<Vec2>, String> {
    wall.split_whitespace()
        .map(|pair| {
            let (x, y) = pair
                .split_once(',')
                .ok_or_else(|| format!("expected x,y but got '{pair}'"))?;
            let x: f32 = x.trim().parse().map_err(|e| format!("bad x in '{pair}': {e}"))?;
            let y: f32 = y.trim().parse().map_err(|e| format!("bad y in '{pair}': {e}"))?;
            Ok(Vec2::new(x, y))
        })
        .collect()
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut settings = Settings::load(args.config.as_deref());
    if let Some(seed) = args.seed {
        settings.seed = Some(seed);
    }
    if let Some(placement) = args.placement {
        settings.home_placement = placement;
    }
    if let Some(player) = args.player {
        settings.player_name = player;
    }

    let clock = SystemClock::new(settings.utc_offset_minutes);
    let seed = settings.seed.unwrap_or_else(|| clock.now_ms() as u64);
    log::info!("Nini (headless) starting with seed {seed}");

    let board = match settings.leaderboard_path.as_deref().map(persistence::load) {
        Some(Ok(Some(file))) => Leaderboard::from_file(file, clock),
        Some(Err(err)) => {
            log::warn!("{err}; starting with an empty leaderboard");
            Leaderboard::new(clock)
        }
        Some(Ok(None)) | None => Leaderboard::new(clock),
    };
    let board = Arc::new(SharedLeaderboard::new(board));

    let round = Round::new(settings.round_config(), seed);
    let mut session = Session::new(round, board.clone(), settings.player_name.clone());
    session.push(Command::Reset);

    for wall in &args.walls {
        match parse_wall(wall) {
            Ok(points) => {
                let mut points = points.into_iter();
                if let Some(first) = points.next() {
                    session.push(Command::BeginStroke(first));
                    points.for_each(|p| session.push(Command::ExtendStroke(p)));
                    session.push(Command::EndStroke);
                }
            }
            Err(err) => log::warn!("Skipping wall: {err}"),
        }
    }

    // The reset above consumes the first booked ticket
    let mut ticket = session.schedule_tick();
    let mut won = None;
    for frame in 0..=args.frames {
        let now = f64::from(frame) / FRAME_RATE;
        if let Some(GameEvent::Won { elapsed_secs }) = session.frame(ticket, now) {
            won = Some(elapsed_secs);
            break;
        }
        ticket = session.schedule_tick();
    }

    match won {
        Some(secs) => log::info!("Nini is home! Time: {} seconds", format_seconds(secs)),
        None => log::info!(
            "Nini is still out after {} seconds",
            format_seconds(session.round().elapsed_secs())
        ),
    }

    if let Some(path) = settings.leaderboard_path.as_deref() {
        if let Err(err) = persistence::save(path, &board.to_file()) {
            log::warn!("{err}");
        }
    }

    let daily = api::handle(
        board.as_ref(),
        ApiRequest {
            method: Method::Get,
            path: api::DAILY_PATH,
            body: "",
        },
    );
    let report = serde_json::json!({
        "round": session.snapshot(),
        "leaderboard": daily.body,
    });
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Failed to encode report: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wall() {
        let points = parse_wall("10,20  30.5,40").unwrap();
        assert_eq!(points, vec![Vec2::new(10.0, 20.0), Vec2::new(30.5, 40.0)]);
        assert!(parse_wall("10;20").is_err());
        assert!(parse_wall("a,1").is_err());
    }
}

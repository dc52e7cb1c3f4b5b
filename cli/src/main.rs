use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use buscaminas_core::{
    Action, Game, GameConfig, GameError, RandomScatterer, Result, parse_coord,
};
use clap::Parser;

mod input;
mod render;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Board side length, label column included
    #[arg(long, default_value_t = 13)]
    size: u8,

    /// How many mines to scatter
    #[arg(long, default_value_t = 18)]
    mines: u16,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

const ERROR_PAUSE: Duration = Duration::from_millis(1500);

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = GameConfig::new(args.size, args.mines);
    let seed = args.seed.unwrap_or_else(time_seed);
    log::debug!("config: {config:?}, seed: {seed}");

    let mut game = Game::new(config, RandomScatterer::new(seed));
    run(&mut game)
}

fn run(game: &mut Game) -> anyhow::Result<()> {
    while !game.is_finished() {
        render::draw(game).context("could not draw the board")?;

        let coords = match read_coords() {
            Ok(coords) => coords,
            Err(err) => {
                report(err)?;
                continue;
            }
        };
        let action = match read_action() {
            Ok(action) => action,
            Err(err) => {
                report(err)?;
                continue;
            }
        };

        match game.resolve(action, coords) {
            Ok(outcome) => log::trace!("turn {action:?} at {coords:?}: {outcome:?}"),
            Err(err) => report(err)?,
        }
    }

    render::draw_final(game).context("could not draw the final board")
}

fn read_coords() -> Result<(u8, u8)> {
    let line = input::prompt("Enter your coordinate: ")
        .map_err(|_| GameError::MalformedCoordinate)?;
    parse_coord(&line)
}

fn read_action() -> Result<Action> {
    let line = input::prompt("Enter your choice, 1)Discover  -  2)Flag  -  3)Unflag, Type 1 or 2 or 3:  ")
        .map_err(|_| GameError::InvalidActionSelector)?;
    let selector = line
        .parse::<u8>()
        .map_err(|_| GameError::InvalidActionSelector)?;
    Action::from_selector(selector)
}

/// Shows a recoverable error long enough to read before the next redraw
/// wipes the screen.
fn report(err: GameError) -> anyhow::Result<()> {
    log::debug!("rejected turn: {err}");
    render::error(&err.to_string())?;
    thread::sleep(ERROR_PAUSE);
    Ok(())
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

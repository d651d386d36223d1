use anyhow::{Context, Result, ensure};
use clap::Parser;
use labyrinth::geom::circle_hits_wall;
use labyrinth::{
    Direction, GameMode, LevelCatalog, MazeSize, Session, SessionConfig, SessionState, SizePreset,
    TickEvent,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Sessions to play
    #[arg(short, long, default_value_t = 50)]
    runs: u32,
    /// Tick budget per session
    #[arg(short, long, default_value_t = 3000)]
    ticks: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn random_session(rng: &mut ChaCha8Rng, catalog: &LevelCatalog) -> Result<Session> {
    let config = SessionConfig::default();
    if rng.next_u64() % 2 == 0 {
        let level = choose(rng, catalog.levels());
        return Session::from_level(&level, config)
            .with_context(|| format!("level {} failed to load", level.id));
    }
    let mode = choose(rng, &[GameMode::Normal, GameMode::Darkness, GameMode::Dash]);
    let size: MazeSize = choose(rng, &SizePreset::ALL).size();
    let with_key = rng.next_u64() % 3 == 0;
    Session::generated(rng.next_u64(), size, with_key, mode, config)
        .context("generated session failed to start")
}

fn check_invariants(session: &Session, events: &[TickEvent]) -> Result<()> {
    let grid = session.grid();
    let player = session.player();
    let radius = session.config().collision_radius();
    let phasing = session.rules().hunters.phases_through_walls;

    ensure!(grid.is_path(player.pos), "player inside a wall at {:?}", player.pos);
    ensure!(
        !circle_hits_wall(grid, player.pixel, radius, session.config().cell_size_px),
        "player circle overlaps a wall at {:?}",
        player.pixel
    );
    for hunter in session.hunters() {
        ensure!(grid.in_bounds(hunter.pos), "hunter left the grid at {:?}", hunter.pos);
        ensure!(phasing || grid.is_path(hunter.pos), "hunter inside a wall at {:?}", hunter.pos);
    }
    ensure!(
        session.state().is_terminal() == session.outcome().is_some(),
        "terminal state and outcome disagree"
    );
    for (index, event) in events.iter().enumerate() {
        ensure!(
            !events[..index].iter().any(|earlier| earlier.same_kind(event)),
            "{event:?} published twice in one tick"
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let args = Args::parse();

    println!("Starting Fuzz harness on seed {} for {} runs...", args.seed, args.runs);
    let catalog = LevelCatalog::builtin();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let (mut won, mut lost, mut unfinished) = (0u32, 0u32, 0u32);

    for run in 0..args.runs {
        let mut session = random_session(&mut rng, &catalog)?;
        for _ in 0..args.ticks {
            if rng.next_u64() % 4 == 0 {
                session.push_input(choose(&mut rng, &Direction::ALL));
            }
            let state = session.tick();
            let events = session.drain_events();
            check_invariants(&session, &events)
                .with_context(|| format!("run {run} tick {}", session.current_tick()))?;
            if state.is_terminal() {
                break;
            }
        }
        match session.state() {
            SessionState::Won => won += 1,
            SessionState::Lost(_) => lost += 1,
            SessionState::Running => unfinished += 1,
        }
    }

    println!("Fuzzing completed successfully: {won} won, {lost} lost, {unfinished} unfinished.");
    Ok(())
}

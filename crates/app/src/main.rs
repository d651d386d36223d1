mod frame_input;
mod render;
mod window_config;

use std::env;

use app::app_loop::{AppMode, AppState};
use app::args::{Cli, LaunchArgs, generate_runtime_seed};
use app::controls_file::ControlsFile;
use app::keys::unmapped_bindings;
use app::layout::{compute_frame_layout, setup_layout};
use labyrinth::{Controls, LevelCatalog, Outcome, Session, SessionConfig};
use macroquad::prelude::*;
use clap::Parser;
use taffy::TaffyTree;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const TICK_RATE_ENV: &str = "LABYRINTH_TICK_RATE";

fn window_conf() -> Conf {
    window_config::build_window_conf()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn session_config() -> SessionConfig {
    let config = SessionConfig::default();
    match env::var(TICK_RATE_ENV) {
        Ok(raw) => match raw.parse::<u32>() {
            Ok(rate) => config.with_tick_rate(rate),
            Err(_) => {
                warn!(value = %raw, "ignoring {TICK_RATE_ENV}: not a whole number");
                config
            }
        },
        Err(_) => config,
    }
}

fn load_controls() -> Controls {
    let Some(path) = ControlsFile::get_default_path() else {
        return Controls::default();
    };
    let controls = match ControlsFile::load_or_default(&path) {
        Ok(controls) => controls,
        Err(err) => {
            warn!(path = %path.display(), %err, "using default key bindings");
            return Controls::default();
        }
    };
    if !path.exists()
        && let Err(err) = ControlsFile::new(controls.clone()).write_atomic(&path)
    {
        warn!(path = %path.display(), %err, "could not write default key bindings");
    }
    for name in unmapped_bindings(&controls) {
        warn!(key = %name, "binding has no keyboard equivalent");
    }
    for name in controls.conflicts() {
        warn!(key = %name, "key bound to more than one direction");
    }
    controls
}

fn start(launch: &LaunchArgs, catalog: &LevelCatalog, config: &SessionConfig) -> Option<Session> {
    match launch.build_session(catalog, config.clone()) {
        Ok(session) => {
            info!(source = ?launch.source(), mode = ?launch.mode, "session started");
            Some(session)
        }
        Err(err) => {
            error!(%err, "could not start session");
            None
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    init_tracing();

    let mut launch = match Cli::parse().resolve(generate_runtime_seed()) {
        Ok(launch) => launch,
        Err(err) => err.exit(),
    };

    let controls = load_controls();
    let config = session_config();
    let catalog = LevelCatalog::builtin();
    let Some(session) = start(&launch, &catalog, &config) else {
        return;
    };
    let mut app = AppState::new(session);

    let mut taffy = TaffyTree::new();
    let nodes = match setup_layout(&mut taffy) {
        Ok(nodes) => nodes,
        Err(err) => {
            error!(%err, "layout setup failed");
            return;
        }
    };

    loop {
        let input = frame_input::capture_frame_input(&controls);
        app.frame(&input.held, f64::from(get_frame_time()));
        for cue in app.drain_cues() {
            debug!(?cue, "feedback cue");
        }

        let next = match &app.mode {
            AppMode::Finished(outcome)
                if input.advance_level && outcome.outcome == Outcome::Won =>
            {
                launch.level.and_then(|id| catalog.next_after(id)).map(|level| level.id)
            }
            _ => None,
        };
        if let Some(id) = next {
            launch = launch.with_level(id);
        } else if input.restart && launch.level.is_none() {
            launch = launch.reseeded(generate_runtime_seed());
        }
        if (next.is_some() || input.restart)
            && let Some(session) = start(&launch, &catalog, &config)
        {
            app.restart(session);
        }

        clear_background(BLACK);
        match compute_frame_layout(&mut taffy, &nodes, screen_width(), screen_height()) {
            Ok(layout) => render::draw_frame(&app, &layout, get_time() as f32),
            Err(err) => warn!(%err, "layout failed"),
        }
        next_frame().await
    }
}

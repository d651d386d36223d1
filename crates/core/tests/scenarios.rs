use labyrinth::geom::PHYSICS_EPSILON;
use labyrinth::movement::dash_stop;
use labyrinth::{
    AdvanceStopReason, Direction, GameMode, Level, LossCause, MazeSize, Outcome, OutcomeEvent,
    Pos, Session, SessionConfig, SessionState, TickEvent,
};

fn finish(session: &mut Session, budget: u32) -> OutcomeEvent {
    match session.advance(budget).stop_reason {
        AdvanceStopReason::Finished(outcome) => outcome,
        AdvanceStopReason::BudgetExhausted => {
            panic!("session still running at tick {}", session.current_tick())
        }
    }
}

#[test]
fn corridor_three_moves_win_in_three_ticks() {
    let level = Level::new(7, "corridor", &["######", "#S..E#", "######"]);
    let mut session =
        Session::from_level(&level, SessionConfig::default()).expect("corridor parses");
    for _ in 0..3 {
        session.push_input(Direction::Right);
    }
    let outcome = finish(&mut session, 100);
    assert_eq!(outcome.outcome, Outcome::Won);
    assert_eq!(outcome.elapsed_ticks, 3);
    assert_eq!(outcome.source.level_or_size_id(), 7);
    let goals = session
        .drain_events()
        .into_iter()
        .filter(|event| matches!(event, TickEvent::GoalTouched { .. }))
        .count();
    assert_eq!(goals, 1);
}

#[test]
fn smallest_generated_maze_is_won_along_its_route() {
    for seed in 0..16 {
        let mut session = Session::generated(
            seed,
            MazeSize::new(5).expect("5 is valid"),
            false,
            GameMode::Normal,
            SessionConfig::default(),
        )
        .expect("generated session");
        let route = session.grid().route(session.start(), session.goal().end).expect("solvable");
        for direction in &route {
            session.push_input(*direction);
            session.tick();
        }
        let outcome = session.outcome().cloned().expect("route reaches the exit");
        assert_eq!(outcome.outcome, Outcome::Won);
        assert_eq!(outcome.elapsed_ticks, route.len() as u64);
        assert_eq!(outcome.source.level_or_size_id(), 5);
    }
}

#[test]
fn idle_player_times_out_after_the_limit() {
    let mut level = Level::new(4, "countdown", &["#######", "#S...E#", "#######"]);
    level.time_limit = Some(10);
    let config = SessionConfig::default();
    let idle_ticks = config.ticks_for_seconds(11) as u32;
    let mut session = Session::from_level(&level, config).expect("level parses");
    let result = session.advance(idle_ticks);
    let AdvanceStopReason::Finished(outcome) = result.stop_reason else {
        panic!("countdown never expired");
    };
    assert_eq!(outcome.outcome, Outcome::Lost);
    assert_eq!(outcome.cause, Some(LossCause::Timeout));
    assert_eq!(outcome.elapsed_ticks, 300);
    assert!((outcome.elapsed_time_seconds - 10.0).abs() < 1e-9);
    assert_eq!(session.state(), SessionState::Lost(LossCause::Timeout));
}

#[test]
fn goal_and_capture_on_the_same_tick_is_a_loss() {
    let mut level = Level::new(2, "ambush", &["#########", "#S....EH#", "#########"]);
    level.hunter_movement_type = Some(labyrinth::HunterMovement::Continuous);
    let mut session = Session::from_level(&level, SessionConfig::default()).expect("level parses");
    // Walk to the cell before the exit while the hunter closes in, then step onto the exit.
    for _ in 0..4 {
        session.push_input(Direction::Right);
        session.tick();
    }
    assert_eq!(session.state(), SessionState::Running);
    session.push_input(Direction::Right);
    let outcome = finish(&mut session, 1);
    assert_eq!(outcome.outcome, Outcome::Lost);
    assert_eq!(outcome.cause, Some(LossCause::Captured));
    let events = session.drain_events();
    assert!(events.contains(&TickEvent::GoalTouched { at: Pos::new(6, 1) }));
}

#[test]
fn repeated_wall_bumps_never_move_the_player() {
    let level = Level::new(1, "box", &["#####", "#S..#", "#..E#", "#####"]);
    let mut session = Session::from_level(&level, SessionConfig::default()).expect("level parses");
    for direction in [Direction::Up, Direction::Left, Direction::Up, Direction::Left] {
        session.push_input(direction);
        session.tick();
        assert_eq!(session.player().pos, Pos::new(1, 1));
        let bumps: Vec<TickEvent> = session.drain_events();
        assert_eq!(bumps, vec![TickEvent::WallBump { at: Pos::new(1, 1), direction }]);
    }
}

#[test]
fn dash_lands_flush_in_generated_mazes() {
    let config = SessionConfig::default();
    let radius = config.collision_radius();
    let cell = config.cell_size_px;
    for seed in 0..12 {
        let size = MazeSize::new(11).expect("size");
        let mut session = Session::generated(seed, size, false, GameMode::Dash, config.clone())
            .expect("dash session");
        for direction in Direction::ALL.into_iter().cycle().take(12) {
            let from = session.player().pos;
            if session.grid().is_wall(from.step(direction)) {
                continue;
            }
            let (last, stop) = dash_stop(session.grid(), from, direction, radius, cell);
            session.push_input(direction);
            session.advance(60);
            if session.state().is_terminal() {
                break;
            }
            assert!(!session.player().is_dashing(), "seed {seed}: dash never settled");
            let pixel = session.player().pixel;
            let landed = if direction.is_horizontal() { pixel.x } else { pixel.y };
            assert_eq!(session.player().pos, last);
            assert!(
                (landed - stop).abs() <= PHYSICS_EPSILON,
                "seed {seed}: dash {direction:?} landed at {landed}, wall face rest is {stop}"
            );
        }
    }
}

#[test]
fn darkness_mode_limits_visibility() {
    let mut session = Session::generated(
        3,
        MazeSize::new(21).expect("size"),
        false,
        GameMode::Darkness,
        SessionConfig::default(),
    )
    .expect("darkness session");
    assert!(session.is_lit(session.start()));
    assert!(!session.is_lit(Pos::new(19, 19)));
    session.advance(5);
    assert!(session.is_lit(session.player().pos));
}

use std::rc::Rc;

use white_tile::{
    CommandBuffer, FixedColumns, GameConfig, GameCore, GameState, HighscoreSubmitter,
    HostCommand, ManualClock, MemoryNameStore, MemoryScoreStore, ScoreStore, TapOutcome,
};

type Scripted = GameCore<ManualClock, FixedColumns>;

fn scripted(config: GameConfig) -> (Scripted, ManualClock, CommandBuffer) {
    let clock = ManualClock::new(10_000.0);
    let mut game = GameCore::new(config, clock.clone(), FixedColumns::new([1usize, 2, 3, 3, 2]));
    let mut host = CommandBuffer::new();
    game.reset(&mut host);
    (game, clock, host)
}

#[test]
fn wrong_cell_ends_the_run_with_score_two() {
    let (mut game, clock, mut host) = scripted(GameConfig::default());

    assert_eq!(game.tap(1, 1, &mut host), TapOutcome::Started);
    assert_eq!((game.state(), game.score()), (GameState::Running, 1));

    clock.advance(16.0);
    game.refresh(&mut host);
    assert_eq!(game.tap(2, 2, &mut host), TapOutcome::Hit);
    assert_eq!(game.score(), 2);

    clock.advance(16.0);
    assert_eq!(game.tap(3, 0, &mut host), TapOutcome::Fault);
    assert_eq!(game.state(), GameState::Stopped);

    game.effect_finished(&mut host);
    assert_eq!(game.state(), GameState::Ended);
    assert_eq!(game.score(), 2);
    assert!(host.commands().contains(&HostCommand::ShowEnd { score: 2 }));
}

#[test]
fn god_mode_survives_wrong_cells_and_timeouts() {
    let config = GameConfig {
        god_mode: true,
        ..GameConfig::default()
    };
    let (mut game, clock, mut host) = scripted(config);
    game.tap(1, 1, &mut host);
    assert_eq!(game.tap(2, 0, &mut host), TapOutcome::Hit);

    // Let many rows scroll past untouched.
    for _ in 0..300 {
        clock.advance(50.0);
        game.refresh(&mut host);
    }
    assert_eq!(game.state(), GameState::Running);
    assert!(game.offset() > 20.0);
}

#[test]
fn reset_after_end_returns_to_idle() {
    let (mut game, clock, mut host) = scripted(GameConfig::default());
    game.tap(1, 1, &mut host);
    for _ in 0..40 {
        clock.advance(50.0);
        game.refresh(&mut host);
    }
    assert_eq!(game.state(), GameState::Stopped);
    game.effect_finished(&mut host);
    assert_eq!(game.state(), GameState::Ended);

    game.reset(&mut host);
    assert_eq!(game.state(), GameState::Idle);
    assert_eq!(game.score(), 0);
    assert_eq!(game.offset(), 0.0);
    assert!(game.tiles().peek(0).is_some_and(|t| t.is_start()));

    // The fresh run starts from its own start tile.
    let column = game.tiles().peek(1).and_then(|t| t.active().column()).unwrap();
    assert_eq!(game.tap(1, column, &mut host), TapOutcome::Started);
}

#[test]
fn a_full_run_reaches_the_leaderboard() {
    let store = Rc::new(MemoryScoreStore::new());
    let shared: Rc<dyn ScoreStore> = store.clone();
    let clock = ManualClock::new(0.0);
    let columns = FixedColumns::new([0usize, 1, 2, 3]);
    let mut game = GameCore::new(GameConfig::default(), clock.clone(), columns)
        .with_highscores(HighscoreSubmitter::new(shared))
        .with_names(Box::new(MemoryNameStore::with_name("alice")));
    let mut host = CommandBuffer::new();
    game.reset(&mut host);

    let board = Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = Rc::clone(&board);
    let leaderboard = game.leaderboard().unwrap();
    assert_eq!(leaderboard.size(), 50);
    leaderboard.watch(move |top| *sink.borrow_mut() = top.to_vec());

    // Tap each tile as soon as it scrolls into view, stop after eleven.
    assert_eq!(game.tap(1, 0, &mut host), TapOutcome::Started);
    for _ in 0..200 {
        clock.advance(100.0);
        game.refresh(&mut host);
        if game.state() != GameState::Running {
            break;
        }
        let floor = game.offset().floor() as usize;
        let next = game.score() as usize + 1;
        if game.score() < 11 && next < floor + game.rows().slot_count() {
            let column = game.tiles().peek(next).and_then(|t| t.active().column()).unwrap();
            let slot = game.rows().slot_for_tile(next);
            assert_eq!(game.tap(slot, column, &mut host), TapOutcome::Hit);
        }
    }
    assert_eq!(game.state(), GameState::Stopped);
    assert_eq!(game.score(), 11);

    game.effect_finished(&mut host);
    assert_eq!(store.score("alice"), Some(11));
    assert_eq!(store.rank("alice"), Some(-11));
    assert_eq!(board.borrow().len(), 1);
    assert_eq!(board.borrow()[0].score, 11);
    assert!(host.commands().contains(&HostCommand::StoredHighscore(Some(11))));
}

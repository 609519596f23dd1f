pub mod clock;
pub mod identity;
pub mod runner;
pub mod store;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use white_tile::{GameConfig, HighscoreSubmitter, ScoreStore, PROTOCOL_VERSION};

pub use runner::GameRunner;

use identity::LocalStorageNames;
use store::JsScoreStore;

thread_local! {
    static RUNNER: RefCell<Option<GameRunner>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&mut GameRunner) -> R) -> R {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let runner = borrow.as_mut().expect("Game not initialized. Call game_init() first.");
        f(runner)
    })
}

fn parse_config(json: &str) -> GameConfig {
    if json.trim().is_empty() {
        return GameConfig::default();
    }
    GameConfig::from_json(json).unwrap_or_else(|err| {
        log::warn!("{}, using the default configuration", err);
        GameConfig::default()
    })
}

/// Create the game. `backend` is the highscore backend object, or
/// `null`/`undefined` to play without a leaderboard.
#[wasm_bindgen]
pub fn game_init(config_json: &str, backend: JsValue) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = parse_config(config_json);
    let seed = config.seed.unwrap_or_else(|| js_sys::Date::now() as u64);

    let highscores = if backend.is_object() {
        let store: Rc<dyn ScoreStore> = Rc::new(JsScoreStore::new(backend));
        Some(HighscoreSubmitter::new(store))
    } else {
        log::info!("no highscore backend given");
        None
    };

    let names = Box::new(LocalStorageNames::new());
    let mut runner = GameRunner::new(config, seed, names, highscores);
    runner.init();

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });

    log::info!("white-tile: initialized (protocol v{})", PROTOCOL_VERSION);
}

#[wasm_bindgen]
pub fn game_tick() {
    with_runner(|r| r.tick());
}

/// Pointer position in pixels relative to the board's top-left corner.
#[wasm_bindgen]
pub fn game_pointer_down(x: f32, y: f32) {
    with_runner(|r| {
        r.pointer_down(x, y);
    });
}

#[wasm_bindgen]
pub fn game_tap(slot: u32, column: u32) {
    with_runner(|r| {
        r.tap(slot as usize, column as usize);
    });
}

/// The fault or miss effect finished playing.
#[wasm_bindgen]
pub fn game_effect_done() {
    with_runner(|r| r.effect_done());
}

#[wasm_bindgen]
pub fn game_restart() {
    with_runner(|r| r.restart());
}

#[wasm_bindgen]
pub fn game_resize(width: f32, height: f32) {
    with_runner(|r| r.resize(width, height));
}

#[wasm_bindgen]
pub fn game_set_name(name: &str) {
    with_runner(|r| r.set_name(name));
}

#[wasm_bindgen]
pub fn game_saved_name() -> Option<String> {
    with_runner(|r| r.saved_name())
}

/// Run `function` on the microtask queue.
fn defer(function: &Function) -> Result<(), JsValue> {
    let promise = Promise::resolve(&JsValue::UNDEFINED);
    let then: Function = Reflect::get(&promise, &JsValue::from_str("then"))?.dyn_into()?;
    then.call1(&promise, function)?;
    Ok(())
}

/// Call `callback` with the top entries as `[{ name, score }, ...]` now and
/// on every change.
///
/// The runner is released before subscribing, and `callback` always runs on
/// a later microtask, so it may call any export.
#[wasm_bindgen]
pub fn game_watch_leaderboard(callback: Function) {
    let Some(leaderboard) = with_runner(|r| r.leaderboard()) else {
        log::info!("no highscore backend, leaderboard disabled");
        return;
    };
    leaderboard.watch(move |top| {
        let result = serde_json::to_string(top)
            .map_err(|err| JsValue::from_str(&err.to_string()))
            .and_then(|json| js_sys::JSON::parse(&json))
            .and_then(|entries| defer(callback.bind1(&JsValue::NULL, &entries).unchecked_ref::<Function>()));
        if let Err(err) = result {
            log::warn!("leaderboard callback failed: {:?}", err);
        }
    });
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_score() -> u32 {
    with_runner(|r| r.score())
}

/// 0 idle, 1 running, 2 stopped, 3 ended.
#[wasm_bindgen]
pub fn get_state() -> u32 {
    with_runner(|r| r.state_code())
}

#[wasm_bindgen]
pub fn get_commands_ptr() -> *const f32 {
    with_runner(|r| r.commands_ptr())
}

/// Number of 4-float command records.
#[wasm_bindgen]
pub fn get_commands_len() -> u32 {
    with_runner(|r| r.commands_len())
}

#[wasm_bindgen]
pub fn get_protocol_version() -> f32 {
    PROTOCOL_VERSION
}

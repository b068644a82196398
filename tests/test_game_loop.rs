use space_shooter::audio::{AudioCall, RecordingAudio};
use space_shooter::config::GameConfig;
use space_shooter::display::{RecordingCanvas, Sprite};
use space_shooter::entities::*;
use space_shooter::game_loop::{GameLoop, LoopControl, SessionEnd};
use space_shooter::input::ScriptedInput;
use space_shooter::schedule::Unthrottled;
use space_shooter::storage::MemoryScoreStore;

use rand::rngs::StdRng;
use rand::SeedableRng;

type TestLoop = GameLoop<RecordingCanvas, RecordingAudio, MemoryScoreStore, StdRng>;

fn make_loop(config: GameConfig, store: MemoryScoreStore) -> TestLoop {
    GameLoop::new(
        config,
        RecordingCanvas::default(),
        RecordingAudio::default(),
        store,
        StdRng::seed_from_u64(7),
    )
}

fn default_loop() -> TestLoop {
    make_loop(GameConfig::default(), MemoryScoreStore::default())
}

fn no_spawn(max_enemies: usize) -> GameConfig {
    GameConfig {
        max_enemies,
        ..GameConfig::default()
    }
}

/// One enemy about to be shot down by one bullet.
fn arrange_kill(game: &mut TestLoop) {
    let s = game.state_mut();
    s.enemies = vec![Enemy { x: 100, y: 60 }];
    s.bullets = vec![Bullet { x: 100, y: 65 }];
}

/// One enemy about to land on the ship.
fn arrange_crash(game: &mut TestLoop) {
    game.state_mut().enemies = vec![Enemy { x: 375, y: 455 }];
}

const SPACE: InputEvent = InputEvent::KeyDown(Key::Space);
const PAUSE: InputEvent = InputEvent::KeyDown(Key::PauseToggle);

// ── Setup ─────────────────────────────────────────────────────────────────────

#[test]
fn high_score_loaded_at_startup() {
    let store = MemoryScoreStore {
        value: Some(70),
        ..Default::default()
    };
    let game = make_loop(GameConfig::default(), store);
    assert_eq!(game.state().high_score, 70);
    assert_eq!(game.state().status, GameStatus::Running);
}

// ── Firing ────────────────────────────────────────────────────────────────────

#[test]
fn fire_once_spawns_bullet_above_ship() {
    let mut game = default_loop();
    assert_eq!(game.run_frame(&[SPACE]).unwrap(), LoopControl::Continue);
    // fired at (395, 490), then moved up one frame
    assert_eq!(game.state().bullets, vec![Bullet { x: 395, y: 483 }]);
    assert_eq!(game.audio().played(Sound::Shoot), 1);
}

#[test]
fn sixth_shot_is_rejected() {
    let mut game = default_loop();
    game.run_frame(&[SPACE; 6]).unwrap();
    assert_eq!(game.state().bullets.len(), 5);
    assert_eq!(game.audio().played(Sound::Shoot), 5);

    for _ in 0..3 {
        game.run_frame(&[SPACE]).unwrap();
        assert_eq!(game.state().bullets.len(), 5);
    }
}

#[test]
fn holding_fire_does_not_repeat() {
    let mut game = default_loop();
    game.run_frame(&[SPACE]).unwrap();
    for _ in 0..10 {
        game.run_frame(&[]).unwrap();
    }
    assert_eq!(game.state().bullets.len(), 1);
}

// ── Quit ──────────────────────────────────────────────────────────────────────

#[test]
fn quit_wins_over_the_rest_of_the_batch() {
    let mut game = default_loop();
    assert_eq!(game.run_frame(&[SPACE, InputEvent::Quit]).unwrap(), LoopControl::Quit);
    assert!(game.state().bullets.is_empty());
    assert_eq!(game.canvas().frames_presented, 0);
}

#[test]
fn quit_works_while_paused() {
    let mut game = default_loop();
    game.run_frame(&[PAUSE]).unwrap();
    assert_eq!(game.run_frame(&[InputEvent::Quit]).unwrap(), LoopControl::Quit);
}

#[test]
fn run_stops_on_quit() {
    let mut game = default_loop();
    let mut input = ScriptedInput::new(vec![vec![], vec![], vec![InputEvent::Quit]]);
    let mut pacer = Unthrottled::default();
    assert_eq!(game.run(&mut input, &mut pacer).unwrap(), SessionEnd::Quit);
    assert_eq!(pacer.frames, 2);
}

// ── Pause ─────────────────────────────────────────────────────────────────────

#[test]
fn pause_freezes_bullets_until_resumed() {
    let mut game = default_loop();
    game.run_frame(&[SPACE]).unwrap();
    game.run_frame(&[SPACE]).unwrap();
    assert_eq!(game.state().bullets.len(), 2);

    game.run_frame(&[PAUSE]).unwrap();
    assert_eq!(game.state().status, GameStatus::Paused);
    let frozen = game.state().clone();

    for _ in 0..20 {
        game.run_frame(&[]).unwrap();
        assert_eq!(game.state(), &frozen);
        assert_eq!(game.canvas().texts(), vec!["PAUSED"]);
        assert_eq!(game.canvas().count_sprites(Sprite::Player), 0);
    }

    game.run_frame(&[PAUSE]).unwrap();
    assert_eq!(game.state().status, GameStatus::Running);
    let resumed: Vec<i32> = game.state().bullets.iter().map(|b| b.y).collect();
    let before: Vec<i32> = frozen.bullets.iter().map(|b| b.y - 7).collect();
    assert_eq!(resumed, before);
}

#[test]
fn pause_pauses_and_resumes_audio() {
    let mut game = default_loop();
    game.run_frame(&[PAUSE]).unwrap();
    game.run_frame(&[SPACE]).unwrap(); // rejected while paused
    game.run_frame(&[PAUSE]).unwrap();
    assert_eq!(
        game.audio().calls,
        vec![AudioCall::PauseAll, AudioCall::ResumeAll]
    );
}

#[test]
fn paused_frames_are_still_presented() {
    let mut game = default_loop();
    game.run_frame(&[PAUSE]).unwrap();
    for _ in 0..4 {
        game.run_frame(&[]).unwrap();
    }
    assert_eq!(game.canvas().frames_presented, 5);
}

// ── Rendering ─────────────────────────────────────────────────────────────────

#[test]
fn running_frame_draws_entities_and_hud() {
    let store = MemoryScoreStore {
        value: Some(340),
        ..Default::default()
    };
    let mut game = make_loop(GameConfig::default(), store);
    game.run_frame(&[SPACE]).unwrap();
    game.run_frame(&[]).unwrap();

    let canvas = game.canvas();
    assert_eq!(canvas.count_sprites(Sprite::Player), 1);
    assert_eq!(canvas.count_sprites(Sprite::Enemy), game.state().enemies.len());
    assert_eq!(canvas.count_rects(), 1);
    assert_eq!(canvas.texts(), vec!["Score: 0", "High Score: 340"]);
}

// ── Scoring & persistence ─────────────────────────────────────────────────────

#[test]
fn kill_scores_and_persists_high_score_immediately() {
    let mut game = make_loop(no_spawn(1), MemoryScoreStore::default());
    arrange_kill(&mut game);
    game.run_frame(&[]).unwrap();
    assert_eq!(game.state().score, 20);
    assert_eq!(game.audio().played(Sound::Explosion), 1);
    assert_eq!(game.store().writes, vec![20]);

    arrange_kill(&mut game);
    game.run_frame(&[]).unwrap();
    assert_eq!(game.store().writes, vec![20, 40]);
    assert_eq!(game.store().value, Some(40));
}

#[test]
fn score_below_high_score_is_not_written() {
    let store = MemoryScoreStore {
        value: Some(500),
        ..Default::default()
    };
    let mut game = make_loop(no_spawn(1), store);
    arrange_kill(&mut game);
    game.run_frame(&[]).unwrap();
    assert_eq!(game.state().score, 20);
    assert!(game.store().writes.is_empty());
}

#[test]
fn failed_write_does_not_stop_play() {
    let store = MemoryScoreStore {
        fail_writes: true,
        ..Default::default()
    };
    let mut game = make_loop(no_spawn(1), store);
    arrange_kill(&mut game);
    assert_eq!(game.run_frame(&[]).unwrap(), LoopControl::Continue);
    assert_eq!(game.state().high_score, 20);
    assert_eq!(game.store().value, None);
}

// ── Game over ─────────────────────────────────────────────────────────────────

#[test]
fn crash_ends_game_in_the_same_frame() {
    let mut game = make_loop(no_spawn(1), MemoryScoreStore::default());
    arrange_crash(&mut game);
    assert_eq!(game.run_frame(&[]).unwrap(), LoopControl::GameOver);
    assert_eq!(game.state().status, GameStatus::GameOver);
    assert_eq!(game.audio().played(Sound::Explosion), 1);
    assert_eq!(game.canvas().texts(), vec!["GAME OVER"]);
}

#[test]
fn game_over_holds_banner_then_ends() {
    let mut game = make_loop(no_spawn(1), MemoryScoreStore::default());
    arrange_crash(&mut game);
    let mut input = ScriptedInput::default();
    let mut pacer = Unthrottled::default();
    assert_eq!(game.run(&mut input, &mut pacer).unwrap(), SessionEnd::GameOver);
    // the crash frame plus 3 s at 60 FPS
    assert_eq!(pacer.frames, 1 + 180);
    // the banner is drawn once, not every held frame
    assert_eq!(game.canvas().frames_presented, 1);
}

#[test]
fn quit_cuts_the_game_over_hold_short() {
    let mut game = make_loop(no_spawn(1), MemoryScoreStore::default());
    arrange_crash(&mut game);
    let mut input = ScriptedInput::new(vec![vec![], vec![], vec![InputEvent::Quit]]);
    let mut pacer = Unthrottled::default();
    assert_eq!(game.run(&mut input, &mut pacer).unwrap(), SessionEnd::Quit);
    assert_eq!(pacer.frames, 2);
}

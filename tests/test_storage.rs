use space_shooter::audio::RecordingAudio;
use space_shooter::config::GameConfig;
use space_shooter::display::RecordingCanvas;
use space_shooter::entities::{Bullet, Enemy};
use space_shooter::game_loop::GameLoop;
use space_shooter::storage::{FileScoreStore, ScoreStore};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

#[test]
fn missing_file_loads_as_zero() {
    let dir = tempdir().unwrap();
    let store = FileScoreStore::new(dir.path().join("high_score.txt"));
    assert_eq!(store.load(), 0);
}

#[test]
fn garbage_loads_as_zero() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("high_score.txt");
    std::fs::write(&path, "not a number").unwrap();
    assert_eq!(FileScoreStore::new(&path).load(), 0);
}

#[test]
fn stored_as_plain_decimal_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("high_score.txt");
    let mut store = FileScoreStore::new(&path);
    assert_eq!(store.path(), path.as_path());
    store.store(1460).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "1460");
    assert_eq!(store.load(), 1460);
}

#[test]
fn surrounding_whitespace_is_tolerated() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("high_score.txt");
    std::fs::write(&path, "  320\n").unwrap();
    assert_eq!(FileScoreStore::new(&path).load(), 320);
}

#[test]
fn write_into_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let mut store = FileScoreStore::new(dir.path().join("nope").join("high_score.txt"));
    assert!(store.store(10).is_err());
}

#[test]
fn best_score_survives_a_crash() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("high_score.txt");
    let config = GameConfig {
        max_enemies: 1,
        ..GameConfig::default()
    };

    {
        let mut game = GameLoop::new(
            config.clone(),
            RecordingCanvas::default(),
            RecordingAudio::default(),
            FileScoreStore::new(&path),
            StdRng::seed_from_u64(1),
        );
        for _ in 0..3 {
            let s = game.state_mut();
            s.enemies = vec![Enemy { x: 100, y: 60 }];
            s.bullets = vec![Bullet { x: 100, y: 65 }];
            game.run_frame(&[]).unwrap();
        }
        assert_eq!(game.state().score, 60);
        // dropped without any orderly shutdown
    }

    let reloaded = GameLoop::new(
        config,
        RecordingCanvas::default(),
        RecordingAudio::default(),
        FileScoreStore::new(&path),
        StdRng::seed_from_u64(2),
    );
    assert_eq!(reloaded.state().high_score, 60);
}
